//! Bootstrap data loaded into a fresh store.
//!
//! The seed file carries historical challenges in their legacy display
//! format (`DD.MM.YYYY` dates, `HH:MM` start times, `HH:MM:SS[.ms]`
//! durations) and one template that becomes the next upcoming challenge.

use anyhow::{bail, Context, Result};
use chrono::{DateTime, Duration, Utc};
use serde::Deserialize;

use super::helpers::{parse_clock_time, parse_date, parse_datetime, parse_duration_secs};
use crate::models::{Challenge, ChallengeStatus, Game, GameStatus, NewGame, PlayerIssue};
use crate::settings::SeedSettings;
use crate::timer::TimerClock;

const SEED_FORMAT_VERSION: u32 = 1;
const SEED_JSON: &str = include_str!("seed/challenges.json");

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct SeedFile {
    version: u32,
    #[serde(default)]
    history: Vec<HistoryRecord>,
    template: Option<TemplateRecord>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct HistoryRecord {
    id: String,
    title: String,
    date: String,
    start_time: Option<String>,
    end_time: Option<String>,
    total_duration: Option<String>,
    image: Option<String>,
    image_hint: Option<String>,
    #[serde(default)]
    player_issues: Vec<PlayerIssue>,
    games: Vec<HistoryGame>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct HistoryGame {
    id: String,
    name: String,
    icon_name: String,
    objective: String,
    result: Option<String>,
    #[serde(default)]
    attempts: Vec<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct TemplateRecord {
    id: String,
    title: String,
    /// Fixed schedule; when absent the template is placed `template_lead_days` ahead.
    scheduled_date_time: Option<String>,
    image: Option<String>,
    image_hint: Option<String>,
    games: Vec<TemplateGame>,
}

#[derive(Debug, Deserialize)]
struct TemplateGame {
    id: String,
    #[serde(flatten)]
    game: NewGame,
}

/// Builds the initial store contents from the embedded seed file.
pub fn load_seed(settings: &SeedSettings, now: DateTime<Utc>) -> Result<Vec<Challenge>> {
    parse_seed(SEED_JSON, settings, now)
}

pub(crate) fn parse_seed(
    raw: &str,
    settings: &SeedSettings,
    now: DateTime<Utc>,
) -> Result<Vec<Challenge>> {
    let seed: SeedFile = serde_json::from_str(raw).context("failed to parse seed data")?;

    if seed.version != SEED_FORMAT_VERSION {
        bail!(
            "seed data version ({}) does not match supported format ({})",
            seed.version,
            SEED_FORMAT_VERSION
        );
    }

    let mut challenges = Vec::new();

    if settings.include_history {
        for record in seed.history {
            let id = record.id.clone();
            challenges.push(
                history_challenge(record)
                    .with_context(|| format!("invalid historical challenge {id}"))?,
            );
        }
    }

    if let Some(template) = seed.template {
        let scheduled = match template.scheduled_date_time.as_deref() {
            Some(raw) => parse_datetime(raw, "scheduledDateTime")?,
            None => now + Duration::days(i64::from(settings.template_lead_days)),
        };
        challenges.push(template_challenge(template, scheduled));
    }

    Ok(challenges)
}

fn history_challenge(record: HistoryRecord) -> Result<Challenge> {
    let date = parse_date(&record.date, "date")?;
    let scheduled = match record.start_time.as_deref() {
        Some(start) => Some(date.and_time(parse_clock_time(start, "startTime")?).and_utc()),
        None => None,
    };
    let accumulated = record
        .total_duration
        .as_deref()
        .map(parse_duration_secs)
        .unwrap_or(0);

    let games = record
        .games
        .into_iter()
        .map(|game| Game {
            id: game.id,
            name: game.name,
            icon_name: game.icon_name,
            objective: game.objective,
            status: GameStatus::Completed,
            current_progress: 0,
            target_progress: None,
            result: game.result,
            attempts: game.attempts,
            clock: TimerClock::new(),
            try_count: 0,
            enable_try_counter: false,
            enable_manual_log: false,
        })
        .collect();

    Ok(Challenge {
        id: record.id,
        title: record.title,
        date,
        scheduled_date_time: scheduled,
        status: ChallengeStatus::Past,
        clock: TimerClock::with_accumulated(accumulated as f64),
        active_game_id: None,
        overall_notes: Vec::new(),
        image: record.image,
        image_hint: record.image_hint,
        start_time: record.start_time,
        end_time: record.end_time,
        total_duration: record.total_duration,
        player_issues: record.player_issues,
        games,
    })
}

fn template_challenge(template: TemplateRecord, scheduled: DateTime<Utc>) -> Challenge {
    let games = template
        .games
        .into_iter()
        .map(|entry| entry.game.into_game(entry.id))
        .collect();

    Challenge {
        id: template.id,
        title: template.title,
        date: scheduled.date_naive(),
        scheduled_date_time: Some(scheduled),
        status: ChallengeStatus::Upcoming,
        clock: TimerClock::new(),
        active_game_id: None,
        overall_notes: Vec::new(),
        image: template.image,
        image_hint: template.image_hint,
        start_time: None,
        end_time: None,
        total_duration: None,
        player_issues: Vec::new(),
        games,
    }
}
