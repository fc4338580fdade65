use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Wall-clock stopwatch that survives pause/resume cycles.
///
/// Elapsed time is never ticked forward; it is derived on demand as
/// `accumulated_secs + (now - started_at)` while running and as
/// `accumulated_secs` while paused.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TimerClock {
    /// Seconds from earlier running windows; combines with `started_at`
    /// to compute the true elapsed duration.
    pub accumulated_secs: f64,
    pub started_at: Option<DateTime<Utc>>,
}

impl TimerClock {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_accumulated(accumulated_secs: f64) -> Self {
        Self {
            accumulated_secs,
            started_at: None,
        }
    }

    pub fn is_active(&self) -> bool {
        self.started_at.is_some()
    }

    pub fn elapsed_secs(&self, now: DateTime<Utc>) -> f64 {
        match self.started_at {
            Some(anchor) => self.accumulated_secs + running_secs(anchor, now),
            None => self.accumulated_secs,
        }
    }

    /// Starts the clock at `now`. A running clock keeps its existing anchor.
    pub fn start(&mut self, now: DateTime<Utc>) {
        if self.started_at.is_none() {
            self.started_at = Some(now);
        }
    }

    /// Folds the in-flight window into the accumulated total and stops.
    pub fn pause(&mut self, now: DateTime<Utc>) {
        if let Some(anchor) = self.started_at.take() {
            self.accumulated_secs += running_secs(anchor, now);
        }
    }

    pub fn toggle(&mut self, now: DateTime<Utc>) {
        if self.is_active() {
            self.pause(now);
        } else {
            self.start(now);
        }
    }

    pub fn reset(&mut self) {
        *self = Self::default();
    }
}

// A clock adjusted backwards never yields negative time.
fn running_secs(anchor: DateTime<Utc>, now: DateTime<Utc>) -> f64 {
    let millis = (now - anchor).num_milliseconds().max(0);
    millis as f64 / 1000.0
}
