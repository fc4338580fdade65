//! Game-level data models.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::timer::TimerClock;

#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub enum GameStatus {
    #[default]
    Pending,
    Active,
    Completed,
    Failed,
}

impl GameStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            GameStatus::Pending => "pending",
            GameStatus::Active => "active",
            GameStatus::Completed => "completed",
            GameStatus::Failed => "failed",
        }
    }

    pub fn is_terminal(&self) -> bool {
        matches!(self, GameStatus::Completed | GameStatus::Failed)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Game {
    pub id: String,
    pub name: String,
    /// Key into the UI's icon set.
    pub icon_name: String,
    pub objective: String,
    #[serde(default)]
    pub status: GameStatus,
    #[serde(default)]
    pub current_progress: u32,
    /// `None` marks a non-quantified game.
    #[serde(default)]
    pub target_progress: Option<u32>,
    #[serde(default)]
    pub result: Option<String>,
    #[serde(default)]
    pub attempts: Vec<String>,
    #[serde(default)]
    pub clock: TimerClock,
    #[serde(default)]
    pub try_count: u32,
    #[serde(default)]
    pub enable_try_counter: bool,
    #[serde(default)]
    pub enable_manual_log: bool,
}

impl Game {
    pub fn is_timer_active(&self) -> bool {
        self.clock.is_active()
    }

    pub fn elapsed_secs(&self, now: DateTime<Utc>) -> f64 {
        self.clock.elapsed_secs(now)
    }

    /// Any recorded duration, try or progress counts as activity.
    pub fn has_activity(&self) -> bool {
        self.clock.accumulated_secs > 0.0 || self.try_count > 0 || self.current_progress > 0
    }

    pub fn target_reached(&self) -> bool {
        self.target_progress
            .is_some_and(|target| self.current_progress >= target)
    }

    pub fn progress_label(&self) -> Option<String> {
        self.target_progress
            .map(|target| format!("{}/{}", self.current_progress, target))
    }

    /// Stops the clock and drops an untouched `Active` game back to `Pending`.
    pub fn pause_timer(&mut self, now: DateTime<Utc>) {
        self.clock.pause(now);
        if self.status == GameStatus::Active && !self.has_activity() {
            self.status = GameStatus::Pending;
        }
    }

    pub fn start_timer(&mut self, now: DateTime<Utc>) {
        self.clock.start(now);
        if self.status == GameStatus::Pending {
            self.status = GameStatus::Active;
        }
    }

    /// Zeroes everything a run produces: progress, clock, attempts, result.
    pub fn reset_run(&mut self) {
        self.current_progress = 0;
        self.clock.reset();
        self.status = GameStatus::Pending;
        self.result = None;
        self.attempts.clear();
        self.try_count = 0;
    }
}

/// Input for one game of a new challenge.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewGame {
    pub name: String,
    pub icon_name: String,
    pub objective: String,
    #[serde(default)]
    pub target_progress: Option<u32>,
    #[serde(default)]
    pub enable_try_counter: bool,
    #[serde(default)]
    pub enable_manual_log: bool,
}

impl NewGame {
    pub fn into_game(self, id: String) -> Game {
        Game {
            id,
            name: self.name,
            icon_name: self.icon_name,
            objective: self.objective,
            status: GameStatus::Pending,
            current_progress: 0,
            target_progress: self.target_progress,
            result: None,
            attempts: Vec::new(),
            clock: TimerClock::new(),
            try_count: 0,
            enable_try_counter: self.enable_try_counter,
            enable_manual_log: self.enable_manual_log,
        }
    }
}
