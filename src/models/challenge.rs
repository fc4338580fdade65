//! Challenge-level data models.
//!
//! A `Challenge` owns its games; games never outlive the challenge that
//! holds them. Timer state lives in `TimerClock`, so "timer active" and
//! "start timestamp present" cannot disagree.

use chrono::{DateTime, NaiveDate, NaiveTime, Utc};
use serde::{Deserialize, Serialize};

use super::game::{Game, NewGame};
use crate::timer::TimerClock;

#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub enum ChallengeStatus {
    #[default]
    Upcoming,
    Live,
    Past,
}

impl ChallengeStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            ChallengeStatus::Upcoming => "upcoming",
            ChallengeStatus::Live => "live",
            ChallengeStatus::Past => "past",
        }
    }
}

/// Per-player crash tally kept for historical challenges.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct PlayerIssue {
    pub player_name: String,
    #[serde(default)]
    pub game_crashes: Option<u32>,
    #[serde(default)]
    pub sound_crashes: Option<u32>,
    #[serde(default)]
    pub pc_internet_crashes: Option<u32>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Challenge {
    pub id: String,
    pub title: String,
    pub date: NaiveDate,
    pub scheduled_date_time: Option<DateTime<Utc>>,
    pub status: ChallengeStatus,
    pub clock: TimerClock,
    pub active_game_id: Option<String>,
    pub overall_notes: Vec<String>,
    pub image: Option<String>,
    pub image_hint: Option<String>,
    /// Display-only fields carried by historical records.
    pub start_time: Option<String>,
    pub end_time: Option<String>,
    pub total_duration: Option<String>,
    pub player_issues: Vec<PlayerIssue>,
    pub games: Vec<Game>,
}

impl Challenge {
    pub fn is_timer_active(&self) -> bool {
        self.clock.is_active()
    }

    pub fn elapsed_secs(&self, now: DateTime<Utc>) -> f64 {
        self.clock.elapsed_secs(now)
    }

    /// Schedule when known, otherwise midnight UTC of `date`.
    pub fn effective_date(&self) -> DateTime<Utc> {
        self.scheduled_date_time
            .unwrap_or_else(|| self.date.and_time(NaiveTime::MIN).and_utc())
    }

    pub fn game(&self, game_id: &str) -> Option<&Game> {
        self.games.iter().find(|game| game.id == game_id)
    }

    pub fn game_mut(&mut self, game_id: &str) -> Option<&mut Game> {
        self.games.iter_mut().find(|game| game.id == game_id)
    }

    pub fn active_game(&self) -> Option<&Game> {
        self.active_game_id
            .as_deref()
            .and_then(|game_id| self.game(game_id))
    }

    /// Moves the schedule and keeps `date` in step with it.
    pub fn reschedule(&mut self, when: DateTime<Utc>) {
        self.scheduled_date_time = Some(when);
        self.date = when.date_naive();
    }
}

/// Input for `Store::create_challenge`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewChallenge {
    pub title: String,
    pub scheduled_date_time: DateTime<Utc>,
    #[serde(default)]
    pub image: Option<String>,
    pub games: Vec<NewGame>,
}
