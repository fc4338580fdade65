//! State transitions for a challenge and its games.
//!
//! Every function takes the wall-clock `now` captured once by the caller, so
//! a single operation folds all running clocks against the same instant.
//! Functions that require a live challenge return `false` without touching
//! anything when the precondition or the game lookup fails.

use chrono::{DateTime, Utc};

use crate::log_debug;
use crate::models::{Challenge, ChallengeStatus, Game, GameStatus};

const ENABLE_LOGS: bool = true;

const NOT_ATTEMPTED: &str = "Not Attempted";
const ACTIVITY_LOGGED: &str = "Activity Logged";

/// Moves `challenge` to `status`, applying the side effects of that lifecycle step.
pub fn apply_status(challenge: &mut Challenge, status: ChallengeStatus, now: DateTime<Utc>) {
    let previous = challenge.status;
    challenge.status = status;

    if status == ChallengeStatus::Live {
        // Only a fresh start wipes the run; re-entering live from past resumes.
        if previous == ChallengeStatus::Upcoming {
            challenge.clock.reset();
            challenge.active_game_id = None;
            challenge.games.iter_mut().for_each(Game::reset_run);
        }
        challenge.clock.start(now);
        return;
    }

    challenge.clock.pause(now);
    for game in challenge.games.iter_mut() {
        game.clock.pause(now);
        match status {
            ChallengeStatus::Past => finalize_game(game),
            ChallengeStatus::Upcoming => game.reset_run(),
            ChallengeStatus::Live => {}
        }
    }
    challenge.active_game_id = None;
}

/// Derives the terminal status and result text of a game when its challenge ends.
fn finalize_game(game: &mut Game) {
    match game.target_progress {
        Some(target) => {
            if !game.status.is_terminal() {
                let progress = game.current_progress;
                if progress >= target {
                    game.status = GameStatus::Completed;
                    game.result = Some(format!("{progress}/{target}"));
                } else {
                    game.status = GameStatus::Failed;
                    game.result = Some(format!("Failed ({progress}/{target})"));
                }
            }
        }
        None if !game.status.is_terminal() && game.has_activity() => {
            game.status = GameStatus::Completed;
            game.result.get_or_insert_with(|| ACTIVITY_LOGGED.to_string());
        }
        None if game.status == GameStatus::Pending && game.result.is_none() => {
            game.result = Some(NOT_ATTEMPTED.to_string());
        }
        None => {}
    }
}

/// Pauses or resumes the overall clock of a live challenge.
///
/// Pausing also stops whichever game is running, since no game clock may run
/// while the challenge clock is stopped.
pub fn toggle_challenge_timer(challenge: &mut Challenge, now: DateTime<Utc>) -> bool {
    if challenge.status != ChallengeStatus::Live {
        return false;
    }

    if challenge.is_timer_active() {
        challenge.clock.pause(now);
        pause_running_games(challenge, None, now);
        challenge.active_game_id = None;
    } else {
        challenge.clock.start(now);
    }
    true
}

/// Makes `game_id` the active game and flips its clock.
pub fn toggle_game_timer(challenge: &mut Challenge, game_id: &str, now: DateTime<Utc>) -> bool {
    if challenge.status != ChallengeStatus::Live || challenge.game(game_id).is_none() {
        return false;
    }

    if !challenge.is_timer_active() {
        pause_running_games(challenge, None, now);
        challenge.active_game_id = None;
        return true;
    }

    pause_running_games(challenge, Some(game_id), now);

    let started = match challenge.game_mut(game_id) {
        Some(game) if game.is_timer_active() => {
            game.pause_timer(now);
            false
        }
        Some(game) => {
            game.start_timer(now);
            true
        }
        None => return false,
    };

    challenge.active_game_id = started.then(|| game_id.to_string());
    true
}

fn pause_running_games(challenge: &mut Challenge, except: Option<&str>, now: DateTime<Utc>) {
    challenge
        .games
        .iter_mut()
        .filter(|game| game.is_timer_active() && Some(game.id.as_str()) != except)
        .for_each(|game| game.pause_timer(now));
}

/// Applies `delta` to a game's progress and re-derives its status.
pub fn update_game_progress(
    challenge: &mut Challenge,
    game_id: &str,
    delta: i64,
    note: Option<&str>,
    now: DateTime<Utc>,
) -> bool {
    if challenge.status != ChallengeStatus::Live {
        return false;
    }
    let Some(game) = challenge.game_mut(game_id) else {
        return false;
    };

    if game.status == GameStatus::Completed && delta < 0 {
        game.status = GameStatus::Active;
    }

    let next = i64::from(game.current_progress).saturating_add(delta).max(0);
    game.current_progress = u32::try_from(next).unwrap_or(u32::MAX);

    if let Some(note) = note.filter(|note| !note.is_empty()) {
        let prefix = if delta > 0 { "WIN" } else { "NOTE" };
        game.attempts.push(format!("{prefix}: {note}"));
    }
    if delta > 0 {
        game.try_count = game.try_count.saturating_add(1);
    }

    let mut stopped = false;
    if game.target_reached() {
        game.status = GameStatus::Completed;
        game.result = game.progress_label();
        if game.is_timer_active() {
            game.clock.pause(now);
            stopped = true;
        }
        log_debug!("Game {} reached its target", game.id);
    } else if game.status == GameStatus::Completed && game.target_progress.is_some() {
        game.status = if game.is_timer_active() || game.has_activity() {
            GameStatus::Active
        } else {
            GameStatus::Pending
        };
    } else if game.status != GameStatus::Completed
        && (game.is_timer_active() || game.has_activity())
    {
        game.status = GameStatus::Active;
    }

    if stopped && challenge.active_game_id.as_deref() == Some(game_id) {
        challenge.active_game_id = None;
    }
    true
}

/// Records one try against a game, optionally with a note.
pub fn log_game_try(challenge: &mut Challenge, game_id: &str, note: Option<&str>) -> bool {
    if challenge.status != ChallengeStatus::Live {
        return false;
    }
    let Some(game) = challenge.game_mut(game_id) else {
        return false;
    };

    game.try_count = game.try_count.saturating_add(1);
    if let Some(note) = note.filter(|note| !note.is_empty()) {
        game.attempts.push(format!("TRY: {note}"));
    }
    // A try was just logged, so the game counts as started.
    if game.status == GameStatus::Pending {
        game.status = GameStatus::Active;
    }
    true
}

/// Returns a challenge of any status to a clean, upcoming run at `when`.
pub fn reset_to_upcoming(challenge: &mut Challenge, when: DateTime<Utc>) {
    challenge.status = ChallengeStatus::Upcoming;
    challenge.reschedule(when);
    challenge.clock.reset();
    challenge.active_game_id = None;
    challenge.start_time = None;
    challenge.end_time = None;
    challenge.total_duration = None;
    challenge.overall_notes.clear();
    challenge.games.iter_mut().for_each(Game::reset_run);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::NewGame;
    use crate::timer::TimerClock;
    use chrono::{Duration, TimeZone};

    fn t(secs: i64) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2025, 6, 1, 12, 0, 0).unwrap() + Duration::seconds(secs)
    }

    fn game(id: &str, target: Option<u32>) -> Game {
        NewGame {
            name: id.to_uppercase(),
            icon_name: "default".into(),
            objective: "win".into(),
            target_progress: target,
            enable_try_counter: true,
            enable_manual_log: true,
        }
        .into_game(id.to_string())
    }

    fn challenge(games: Vec<Game>) -> Challenge {
        Challenge {
            id: "c1".into(),
            title: "Test".into(),
            date: t(0).date_naive(),
            scheduled_date_time: Some(t(0)),
            status: ChallengeStatus::Upcoming,
            clock: TimerClock::new(),
            active_game_id: None,
            overall_notes: Vec::new(),
            image: None,
            image_hint: None,
            start_time: None,
            end_time: None,
            total_duration: None,
            player_issues: Vec::new(),
            games,
        }
    }

    fn assert_clock_invariants(challenge: &Challenge) {
        let running: Vec<&Game> = challenge
            .games
            .iter()
            .filter(|game| game.is_timer_active())
            .collect();
        assert!(running.len() <= 1, "more than one game clock running");
        if let Some(game) = running.first() {
            assert!(challenge.is_timer_active());
            assert_eq!(challenge.active_game_id.as_deref(), Some(game.id.as_str()));
        } else {
            assert_eq!(challenge.active_game_id, None);
        }
    }

    #[test]
    fn test_going_live_from_upcoming_clears_the_run() {
        let mut dirty = game("g1", Some(3));
        dirty.current_progress = 2;
        dirty.try_count = 4;
        dirty.attempts.push("WIN: old".into());
        dirty.clock = TimerClock::with_accumulated(50.0);
        dirty.status = GameStatus::Active;
        let mut c = challenge(vec![dirty]);
        c.clock = TimerClock::with_accumulated(99.0);

        apply_status(&mut c, ChallengeStatus::Live, t(0));

        assert!(c.is_timer_active());
        assert_eq!(c.clock.accumulated_secs, 0.0);
        let g = &c.games[0];
        assert_eq!(g.current_progress, 0);
        assert_eq!(g.try_count, 0);
        assert!(g.attempts.is_empty());
        assert_eq!(g.clock, TimerClock::new());
        assert_eq!(g.status, GameStatus::Pending);
    }

    #[test]
    fn test_going_live_from_past_keeps_progress() {
        let mut c = challenge(vec![game("g1", Some(3))]);
        apply_status(&mut c, ChallengeStatus::Live, t(0));
        update_game_progress(&mut c, "g1", 1, None, t(5));
        apply_status(&mut c, ChallengeStatus::Past, t(10));

        apply_status(&mut c, ChallengeStatus::Live, t(20));
        assert_eq!(c.games[0].current_progress, 1);
        assert_eq!(c.clock.accumulated_secs, 10.0);
    }

    #[test]
    fn test_toggle_twice_preserves_elapsed() {
        let mut c = challenge(vec![game("g1", None)]);
        apply_status(&mut c, ChallengeStatus::Live, t(0));

        assert!(toggle_challenge_timer(&mut c, t(100)));
        assert!(!c.is_timer_active());
        assert_eq!(c.elapsed_secs(t(500)), 100.0);

        assert!(toggle_challenge_timer(&mut c, t(500)));
        assert!(c.is_timer_active());
        assert_eq!(c.elapsed_secs(t(530)), 130.0);
    }

    #[test]
    fn test_toggle_requires_live() {
        let mut c = challenge(vec![game("g1", None)]);
        assert!(!toggle_challenge_timer(&mut c, t(0)));
        assert!(!c.is_timer_active());
        assert!(!toggle_game_timer(&mut c, "g1", t(0)));
        assert!(!update_game_progress(&mut c, "g1", 1, None, t(0)));
        assert!(!log_game_try(&mut c, "g1", None));
    }

    #[test]
    fn test_unknown_game_is_rejected() {
        let mut c = challenge(vec![game("g1", None)]);
        apply_status(&mut c, ChallengeStatus::Live, t(0));
        assert!(!toggle_game_timer(&mut c, "nope", t(1)));
        assert!(!update_game_progress(&mut c, "nope", 1, None, t(1)));
        assert!(!log_game_try(&mut c, "nope", Some("x")));
    }

    #[test]
    fn test_only_one_game_clock_runs() {
        let mut c = challenge(vec![game("g1", None), game("g2", None)]);
        apply_status(&mut c, ChallengeStatus::Live, t(0));

        toggle_game_timer(&mut c, "g1", t(10));
        assert_clock_invariants(&c);
        assert_eq!(c.active_game_id.as_deref(), Some("g1"));
        assert_eq!(c.games[0].status, GameStatus::Active);

        toggle_game_timer(&mut c, "g2", t(40));
        assert_clock_invariants(&c);
        assert_eq!(c.active_game_id.as_deref(), Some("g2"));
        assert_eq!(c.games[0].clock.accumulated_secs, 30.0);
        // g1 accrued time, so it stays active rather than dropping to pending.
        assert_eq!(c.games[0].status, GameStatus::Active);

        toggle_game_timer(&mut c, "g2", t(50));
        assert_clock_invariants(&c);
        assert_eq!(c.games[1].clock.accumulated_secs, 10.0);
    }

    #[test]
    fn test_untouched_game_drops_back_to_pending() {
        let mut c = challenge(vec![game("g1", None)]);
        apply_status(&mut c, ChallengeStatus::Live, t(0));
        toggle_game_timer(&mut c, "g1", t(10));
        toggle_game_timer(&mut c, "g1", t(10));
        assert_eq!(c.games[0].status, GameStatus::Pending);
        assert_clock_invariants(&c);
    }

    #[test]
    fn test_paused_challenge_blocks_game_start() {
        let mut c = challenge(vec![game("g1", None), game("g2", None)]);
        apply_status(&mut c, ChallengeStatus::Live, t(0));
        toggle_game_timer(&mut c, "g1", t(0));

        toggle_challenge_timer(&mut c, t(20));
        assert_clock_invariants(&c);
        assert_eq!(c.games[0].clock.accumulated_secs, 20.0);

        assert!(toggle_game_timer(&mut c, "g2", t(30)));
        assert!(!c.games[1].is_timer_active());
        assert_clock_invariants(&c);
    }

    #[test]
    fn test_progress_to_target_completes_and_stops() {
        let mut c = challenge(vec![game("g1", Some(3))]);
        apply_status(&mut c, ChallengeStatus::Live, t(0));
        toggle_game_timer(&mut c, "g1", t(0));

        for step in 1..=3 {
            assert!(update_game_progress(&mut c, "g1", 1, None, t(step * 60)));
        }

        let g = &c.games[0];
        assert_eq!(g.status, GameStatus::Completed);
        assert_eq!(g.current_progress, 3);
        assert_eq!(g.result.as_deref(), Some("3/3"));
        assert!(!g.is_timer_active());
        assert_eq!(g.clock.accumulated_secs, 180.0);
        assert_eq!(c.active_game_id, None);
        assert_clock_invariants(&c);
    }

    #[test]
    fn test_decrement_reopens_completed_game() {
        let mut c = challenge(vec![game("g1", Some(1))]);
        apply_status(&mut c, ChallengeStatus::Live, t(0));
        update_game_progress(&mut c, "g1", 1, None, t(1));
        assert_eq!(c.games[0].status, GameStatus::Completed);

        update_game_progress(&mut c, "g1", -1, Some("misclick"), t(2));
        let g = &c.games[0];
        assert_eq!(g.status, GameStatus::Active);
        assert_eq!(g.current_progress, 0);
        assert_eq!(g.attempts.last().map(String::as_str), Some("NOTE: misclick"));
    }

    #[test]
    fn test_progress_notes_and_try_count() {
        let mut c = challenge(vec![game("g1", Some(5))]);
        apply_status(&mut c, ChallengeStatus::Live, t(0));

        update_game_progress(&mut c, "g1", 1, Some("13-8"), t(1));
        update_game_progress(&mut c, "g1", 0, Some("lag spike"), t(2));
        update_game_progress(&mut c, "g1", 1, None, t(3));
        update_game_progress(&mut c, "g1", -5, None, t(4));

        let g = &c.games[0];
        assert_eq!(g.attempts, vec!["WIN: 13-8", "NOTE: lag spike"]);
        assert_eq!(g.try_count, 2);
        assert_eq!(g.current_progress, 0);
        assert_eq!(g.status, GameStatus::Active);
    }

    #[test]
    fn test_extreme_deltas_saturate() {
        let mut c = challenge(vec![game("g1", Some(5))]);
        apply_status(&mut c, ChallengeStatus::Live, t(0));
        update_game_progress(&mut c, "g1", 1, None, t(1));

        assert!(update_game_progress(&mut c, "g1", i64::MAX, None, t(2)));
        assert_eq!(c.games[0].current_progress, u32::MAX);
        assert_eq!(c.games[0].status, GameStatus::Completed);

        assert!(update_game_progress(&mut c, "g1", i64::MIN, None, t(3)));
        assert_eq!(c.games[0].current_progress, 0);
        assert_eq!(c.games[0].status, GameStatus::Active);
    }

    #[test]
    fn test_log_try_promotes_pending() {
        let mut c = challenge(vec![game("g1", None)]);
        apply_status(&mut c, ChallengeStatus::Live, t(0));
        assert!(log_game_try(&mut c, "g1", Some("died at boss")));
        assert!(log_game_try(&mut c, "g1", Some("")));

        let g = &c.games[0];
        assert_eq!(g.try_count, 2);
        assert_eq!(g.attempts, vec!["TRY: died at boss"]);
        assert_eq!(g.status, GameStatus::Active);
    }

    #[test]
    fn test_ending_derives_terminal_statuses() {
        let mut c = challenge(vec![
            game("hit", Some(2)),
            game("miss", Some(3)),
            game("busy", None),
            game("idle", None),
        ]);
        apply_status(&mut c, ChallengeStatus::Live, t(0));
        update_game_progress(&mut c, "hit", 2, None, t(1));
        update_game_progress(&mut c, "miss", 1, None, t(2));
        log_game_try(&mut c, "busy", None);
        toggle_game_timer(&mut c, "miss", t(3));

        apply_status(&mut c, ChallengeStatus::Past, t(63));

        let by_id = |id: &str| c.game(id).unwrap().clone();
        assert_eq!(by_id("hit").status, GameStatus::Completed);
        assert_eq!(by_id("hit").result.as_deref(), Some("2/2"));
        assert_eq!(by_id("miss").status, GameStatus::Failed);
        assert_eq!(by_id("miss").result.as_deref(), Some("Failed (1/3)"));
        assert_eq!(by_id("miss").clock.accumulated_secs, 60.0);
        assert_eq!(by_id("busy").status, GameStatus::Completed);
        assert_eq!(by_id("busy").result.as_deref(), Some("Activity Logged"));
        assert_eq!(by_id("idle").status, GameStatus::Pending);
        assert_eq!(by_id("idle").result.as_deref(), Some("Not Attempted"));

        assert!(!c.is_timer_active());
        assert_eq!(c.clock.accumulated_secs, 63.0);
        assert_clock_invariants(&c);
    }

    #[test]
    fn test_back_to_upcoming_resets_games() {
        let mut c = challenge(vec![game("g1", Some(2))]);
        apply_status(&mut c, ChallengeStatus::Live, t(0));
        update_game_progress(&mut c, "g1", 1, Some("gg"), t(1));

        apply_status(&mut c, ChallengeStatus::Upcoming, t(2));
        let g = &c.games[0];
        assert_eq!(g.current_progress, 0);
        assert_eq!(g.status, GameStatus::Pending);
        assert!(g.attempts.is_empty());
        assert!(!c.is_timer_active());
    }

    #[test]
    fn test_reset_to_upcoming_clears_everything() {
        let mut c = challenge(vec![game("g1", Some(2))]);
        apply_status(&mut c, ChallengeStatus::Live, t(0));
        toggle_game_timer(&mut c, "g1", t(1));
        update_game_progress(&mut c, "g1", 1, Some("gg"), t(2));
        c.overall_notes.push("stream lagged".into());
        c.total_duration = Some("01:00:00".into());

        let when = t(2 * 24 * 3600);
        reset_to_upcoming(&mut c, when);

        assert_eq!(c.status, ChallengeStatus::Upcoming);
        assert_eq!(c.scheduled_date_time, Some(when));
        assert_eq!(c.date, when.date_naive());
        assert_eq!(c.clock, TimerClock::new());
        assert_eq!(c.active_game_id, None);
        assert!(c.overall_notes.is_empty());
        assert_eq!(c.total_duration, None);
        assert_eq!(c.games[0].clock, TimerClock::new());
        assert_eq!(c.games[0].current_progress, 0);
    }
}
