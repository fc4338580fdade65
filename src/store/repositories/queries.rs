use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::{
    models::{Challenge, ChallengeStatus},
    store::Store,
};

/// Live challenge together with clock readings taken at one instant.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DashboardSnapshot {
    pub captured_at: DateTime<Utc>,
    pub elapsed_secs: f64,
    pub games: Vec<GameElapsed>,
    pub challenge: Challenge,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GameElapsed {
    pub game_id: String,
    pub elapsed_secs: f64,
    pub is_timer_active: bool,
}

impl DashboardSnapshot {
    pub fn capture(challenge: Challenge, now: DateTime<Utc>) -> Self {
        let games = challenge
            .games
            .iter()
            .map(|game| GameElapsed {
                game_id: game.id.clone(),
                elapsed_secs: game.elapsed_secs(now),
                is_timer_active: game.is_timer_active(),
            })
            .collect();

        Self {
            captured_at: now,
            elapsed_secs: challenge.elapsed_secs(now),
            games,
            challenge,
        }
    }
}

/// Conditions that block creating another challenge.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CreationBlockers {
    pub has_live_challenge: bool,
    pub has_upcoming_challenge: bool,
}

impl CreationBlockers {
    pub fn any(&self) -> bool {
        self.has_live_challenge || self.has_upcoming_challenge
    }
}

/// Time left until a scheduled start, split for display.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Countdown {
    pub days: u64,
    pub hours: u64,
    pub minutes: u64,
    pub seconds: u64,
}

impl Countdown {
    /// `None` once `target` has been reached.
    pub fn until(target: DateTime<Utc>, now: DateTime<Utc>) -> Option<Self> {
        let remaining = (target - now).num_seconds();
        if remaining <= 0 {
            return None;
        }
        let remaining = remaining as u64;
        Some(Self {
            days: remaining / 86_400,
            hours: (remaining / 3_600) % 24,
            minutes: (remaining / 60) % 60,
            seconds: remaining % 60,
        })
    }
}

fn is_future_upcoming(challenge: &Challenge, now: DateTime<Utc>) -> bool {
    challenge.status == ChallengeStatus::Upcoming
        && challenge
            .scheduled_date_time
            .is_some_and(|scheduled| scheduled > now)
}

impl Store {
    /// Every challenge, newest effective date first.
    pub async fn list_challenges(&self) -> Vec<Challenge> {
        let mut challenges = self.execute(|challenges| challenges.clone()).await;
        challenges.sort_by_key(|challenge| std::cmp::Reverse(challenge.effective_date()));
        challenges
    }

    pub async fn get_challenge(&self, challenge_id: &str) -> Option<Challenge> {
        self.execute(|challenges| {
            challenges
                .iter()
                .find(|challenge| challenge.id == challenge_id)
                .cloned()
        })
        .await
    }

    /// The upcoming challenge with the earliest schedule still in the future.
    pub async fn get_upcoming_challenge(&self) -> Option<Challenge> {
        let now = self.now();
        self.execute(|challenges| {
            challenges
                .iter()
                .filter(|challenge| is_future_upcoming(challenge, now))
                .min_by_key(|challenge| challenge.scheduled_date_time)
                .cloned()
        })
        .await
    }

    pub async fn get_live_challenge(&self) -> Option<Challenge> {
        self.execute(|challenges| {
            challenges
                .iter()
                .find(|challenge| challenge.status == ChallengeStatus::Live)
                .cloned()
        })
        .await
    }

    pub async fn live_snapshot(&self) -> Option<DashboardSnapshot> {
        let now = self.now();
        self.get_live_challenge()
            .await
            .map(|challenge| DashboardSnapshot::capture(challenge, now))
    }

    pub async fn creation_blockers(&self) -> CreationBlockers {
        let now = self.now();
        self.execute(|challenges| CreationBlockers {
            has_live_challenge: challenges
                .iter()
                .any(|challenge| challenge.status == ChallengeStatus::Live),
            has_upcoming_challenge: challenges
                .iter()
                .any(|challenge| is_future_upcoming(challenge, now)),
        })
        .await
    }
}
