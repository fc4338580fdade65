use chrono::Duration;
use log::{info, warn};
use serde::Serialize;

use crate::{
    models::{Challenge, ChallengeStatus, NewChallenge},
    store::{CreationBlockers, DashboardSnapshot},
    AppState,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct DeleteOutcome {
    pub success: bool,
}

pub async fn create_new_challenge(
    state: &AppState,
    data: NewChallenge,
) -> Result<Challenge, String> {
    let blockers = state.store.creation_blockers().await;
    if blockers.has_live_challenge {
        return Err("A challenge is currently live".to_string());
    }
    if blockers.has_upcoming_challenge {
        return Err("An upcoming challenge is already scheduled".to_string());
    }

    state
        .store
        .create_challenge(data)
        .await
        .map_err(|e| e.to_string())
}

pub async fn challenge_creation_blockers(state: &AppState) -> CreationBlockers {
    state.store.creation_blockers().await
}

/// Puts the challenge live. Refused while a different challenge is live.
pub async fn start_challenge(state: &AppState, challenge_id: &str) -> Option<Challenge> {
    if let Some(live) = state.store.get_live_challenge().await {
        if live.id != challenge_id {
            warn!(
                "Refusing to start {}: challenge {} is already live",
                challenge_id, live.id
            );
            return None;
        }
    }

    state
        .store
        .set_challenge_status(challenge_id, ChallengeStatus::Live)
        .await
}

pub async fn end_challenge(state: &AppState, challenge_id: &str) -> Option<Challenge> {
    state
        .store
        .set_challenge_status(challenge_id, ChallengeStatus::Past)
        .await
}

/// Resets to upcoming with the start moved `reset_lead_days` into the future.
pub async fn reset_challenge(state: &AppState, challenge_id: &str) -> Option<Challenge> {
    let lead_days = state.settings.schedule().reset_lead_days;
    let when = state.store.now() + Duration::days(i64::from(lead_days));
    state
        .store
        .reset_challenge_to_upcoming(challenge_id, when)
        .await
}

pub async fn toggle_challenge_timer(state: &AppState, challenge_id: &str) -> Option<Challenge> {
    state.store.toggle_challenge_timer(challenge_id).await
}

pub async fn toggle_game_timer(
    state: &AppState,
    challenge_id: &str,
    game_id: &str,
) -> Option<Challenge> {
    state
        .store
        .set_active_game_and_toggle_timer(challenge_id, game_id)
        .await
}

pub async fn update_game_progress(
    state: &AppState,
    challenge_id: &str,
    game_id: &str,
    change: i64,
    note: Option<&str>,
) -> Option<Challenge> {
    state
        .store
        .update_game_progress(challenge_id, game_id, change, note)
        .await
}

pub async fn log_game_try(
    state: &AppState,
    challenge_id: &str,
    game_id: &str,
    note: Option<&str>,
) -> Option<Challenge> {
    state.store.log_game_try(challenge_id, game_id, note).await
}

pub async fn add_overall_note(
    state: &AppState,
    challenge_id: &str,
    note: &str,
) -> Option<Challenge> {
    state.store.add_overall_note(challenge_id, note).await
}

pub async fn edit_overall_note(
    state: &AppState,
    challenge_id: &str,
    note_index: usize,
    text: &str,
) -> Option<Challenge> {
    state
        .store
        .edit_overall_note(challenge_id, note_index, text)
        .await
}

pub async fn delete_overall_note(
    state: &AppState,
    challenge_id: &str,
    note_index: usize,
) -> Option<Challenge> {
    state
        .store
        .delete_overall_note(challenge_id, note_index)
        .await
}

pub async fn fetch_challenge_details(state: &AppState, challenge_id: &str) -> Option<Challenge> {
    state.store.get_challenge(challenge_id).await
}

pub async fn list_challenges(state: &AppState) -> Vec<Challenge> {
    state.store.list_challenges().await
}

/// What the live page shows: the live challenge, else the next upcoming one.
pub async fn fetch_live_page_data(state: &AppState) -> Option<Challenge> {
    match state.store.get_live_challenge().await {
        Some(live) => Some(live),
        None => state.store.get_upcoming_challenge().await,
    }
}

pub async fn fetch_dashboard(state: &AppState) -> Option<DashboardSnapshot> {
    state.store.live_snapshot().await
}

pub async fn delete_challenge(state: &AppState, challenge_id: &str) -> DeleteOutcome {
    let success = state.store.delete_challenge(challenge_id).await;
    if !success {
        info!("Delete requested for unknown challenge {}", challenge_id);
    }
    DeleteOutcome { success }
}
