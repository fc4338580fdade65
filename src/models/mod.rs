pub mod challenge;
pub mod game;

pub use challenge::{Challenge, ChallengeStatus, NewChallenge, PlayerIssue};
pub use game::{Game, GameStatus, NewGame};
