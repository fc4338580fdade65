pub mod engine;
pub mod state;

pub use state::TimerClock;
