use anyhow::{anyhow, Context, Result};
use chrono::{DateTime, NaiveDate, NaiveTime, Utc};

/// Parses `HH:MM:SS`, `HH:MM:SS.ms`, `MM:SS` or `SS` into whole seconds.
///
/// A comma is accepted as the decimal separator. Components that fail to
/// parse count as zero, matching the loose formats found in old records.
pub fn parse_duration_secs(value: &str) -> u64 {
    let cleaned = value.trim().replace(',', ".");
    if cleaned.is_empty() {
        return 0;
    }

    let parts: Vec<&str> = cleaned.split([':', '.']).collect();
    let whole = |raw: &str| raw.parse::<u64>().unwrap_or(0) as f64;
    let fractional = |raw: &str| raw.parse::<f64>().unwrap_or(0.0);

    let total = match parts.as_slice() {
        [hours, minutes, seconds, rest @ ..] => {
            let mut secs = fractional(seconds);
            if let Some(millis) = rest.first() {
                secs += format!("0.{millis}").parse::<f64>().unwrap_or(0.0);
            }
            whole(hours) * 3600.0 + whole(minutes) * 60.0 + secs
        }
        [minutes, seconds] => whole(minutes) * 60.0 + fractional(seconds),
        [seconds] => fractional(seconds),
        [] => 0.0,
    };

    total.round().max(0.0) as u64
}

/// Renders seconds as `HH:MM:SS`; hours grow past two digits when needed.
pub fn format_duration(total_secs: f64) -> String {
    let total = total_secs.max(0.0).floor() as u64;
    let hours = total / 3600;
    let minutes = (total % 3600) / 60;
    let seconds = total % 60;
    format!("{hours:02}:{minutes:02}:{seconds:02}")
}

/// Accepts `DD.MM.YYYY` as well as ISO `YYYY-MM-DD`.
pub fn parse_date(value: &str, field: &str) -> Result<NaiveDate> {
    NaiveDate::parse_from_str(value, "%d.%m.%Y")
        .or_else(|_| NaiveDate::parse_from_str(value, "%Y-%m-%d"))
        .with_context(|| format!("failed to parse {field} '{value}'"))
}

pub fn parse_clock_time(value: &str, field: &str) -> Result<NaiveTime> {
    NaiveTime::parse_from_str(value, "%H:%M")
        .with_context(|| format!("failed to parse {field} '{value}'"))
}

pub fn parse_datetime(value: &str, field: &str) -> Result<DateTime<Utc>> {
    DateTime::parse_from_rfc3339(value)
        .map(|dt| dt.with_timezone(&Utc))
        .map_err(|err| anyhow!("invalid {field} '{value}': {err}"))
}
