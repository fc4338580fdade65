use anyhow::{bail, Result};
use chrono::{DateTime, Utc};
use uuid::Uuid;

use crate::{
    log_debug, log_info,
    models::{Challenge, ChallengeStatus, NewChallenge},
    store::Store,
    timer::{engine, TimerClock},
};

const ENABLE_LOGS: bool = true;

fn validate_new_challenge(data: &NewChallenge) -> Result<()> {
    if data.title.trim().is_empty() {
        bail!("Challenge title must not be empty");
    }
    if data.games.is_empty() {
        bail!("A challenge needs at least one game");
    }
    for (index, game) in data.games.iter().enumerate() {
        if game.name.trim().is_empty() {
            bail!("Game {} has no name", index + 1);
        }
        if game.target_progress == Some(0) {
            bail!("Game {} target progress must be greater than zero", index + 1);
        }
    }
    Ok(())
}

fn new_challenge_id() -> String {
    format!("challenge-{}", Uuid::new_v4().simple())
}

impl Store {
    /// Adds a fresh upcoming challenge and returns a copy of it.
    ///
    /// Scheduling rules such as "only one upcoming challenge" are left to
    /// callers; see `commands::create_new_challenge`.
    pub async fn create_challenge(&self, data: NewChallenge) -> Result<Challenge> {
        validate_new_challenge(&data)?;

        let id = new_challenge_id();
        let image = data.image.filter(|image| !image.trim().is_empty());
        let image_hint = if image.is_some() {
            "custom challenge banner"
        } else {
            "gaming challenge generic"
        };
        let games = data
            .games
            .into_iter()
            .enumerate()
            .map(|(index, game)| game.into_game(format!("{id}-g{}", index + 1)))
            .collect();

        let challenge = Challenge {
            id,
            title: data.title.trim().to_string(),
            date: data.scheduled_date_time.date_naive(),
            scheduled_date_time: Some(data.scheduled_date_time),
            status: ChallengeStatus::Upcoming,
            clock: TimerClock::new(),
            active_game_id: None,
            overall_notes: Vec::new(),
            image,
            image_hint: Some(image_hint.to_string()),
            start_time: None,
            end_time: None,
            total_duration: None,
            player_issues: Vec::new(),
            games,
        };

        let record = challenge.clone();
        self.execute(move |challenges| challenges.push(record)).await;

        log_info!(
            "Created challenge {} with {} games",
            challenge.id,
            challenge.games.len()
        );
        Ok(challenge)
    }

    pub async fn set_challenge_status(
        &self,
        challenge_id: &str,
        status: ChallengeStatus,
    ) -> Option<Challenge> {
        let updated = self
            .mutate_challenge(challenge_id, |challenge, now| {
                engine::apply_status(challenge, status, now);
                true
            })
            .await;

        if updated.is_some() {
            log_info!("Challenge {} is now {}", challenge_id, status.as_str());
        }
        updated
    }

    /// Pauses or resumes the overall clock. `None` unless the challenge is live.
    pub async fn toggle_challenge_timer(&self, challenge_id: &str) -> Option<Challenge> {
        self.mutate_challenge(challenge_id, engine::toggle_challenge_timer)
            .await
    }

    pub async fn set_active_game_and_toggle_timer(
        &self,
        challenge_id: &str,
        game_id: &str,
    ) -> Option<Challenge> {
        let updated = self
            .mutate_challenge(challenge_id, |challenge, now| {
                engine::toggle_game_timer(challenge, game_id, now)
            })
            .await;

        if let Some(challenge) = &updated {
            log_debug!(
                "Challenge {} active game: {:?}",
                challenge_id,
                challenge.active_game_id
            );
        }
        updated
    }

    pub async fn update_game_progress(
        &self,
        challenge_id: &str,
        game_id: &str,
        delta: i64,
        note: Option<&str>,
    ) -> Option<Challenge> {
        self.mutate_challenge(challenge_id, |challenge, now| {
            engine::update_game_progress(challenge, game_id, delta, note, now)
        })
        .await
    }

    pub async fn log_game_try(
        &self,
        challenge_id: &str,
        game_id: &str,
        note: Option<&str>,
    ) -> Option<Challenge> {
        self.mutate_challenge(challenge_id, |challenge, _| {
            engine::log_game_try(challenge, game_id, note)
        })
        .await
    }

    /// Returns the challenge to `upcoming` at `when`, whatever its current status.
    pub async fn reset_challenge_to_upcoming(
        &self,
        challenge_id: &str,
        when: DateTime<Utc>,
    ) -> Option<Challenge> {
        let updated = self
            .mutate_challenge(challenge_id, |challenge, _| {
                engine::reset_to_upcoming(challenge, when);
                true
            })
            .await;

        if updated.is_some() {
            log_info!("Challenge {} reset, next start {}", challenge_id, when.to_rfc3339());
        }
        updated
    }

    /// Removes the challenge and its games. `false` when the id is unknown.
    pub async fn delete_challenge(&self, challenge_id: &str) -> bool {
        let deleted = self
            .execute(|challenges| {
                let before = challenges.len();
                challenges.retain(|challenge| challenge.id != challenge_id);
                challenges.len() < before
            })
            .await;

        if deleted {
            log_info!("Deleted challenge {}", challenge_id);
        }
        deleted
    }
}
