use std::sync::Arc;

use anyhow::Result;
use chrono::{DateTime, Utc};
use log::info;
use tokio::sync::Mutex;

pub mod helpers;
mod repositories;
pub mod seed;

pub use repositories::queries::{Countdown, CreationBlockers, DashboardSnapshot, GameElapsed};

use crate::models::Challenge;
use crate::settings::SeedSettings;

/// Source of "now" for every operation; swapped out in tests.
pub type ClockFn = Arc<dyn Fn() -> DateTime<Utc> + Send + Sync>;

/// Handle to the in-memory challenge collection.
///
/// Clones share the same collection. Every access runs under one lock, so an
/// operation observes and mutates the collection as a single step, and every
/// value handed back to callers is an owned copy.
#[derive(Clone)]
pub struct Store {
    challenges: Arc<Mutex<Vec<Challenge>>>,
    clock: ClockFn,
}

impl Store {
    pub fn new(challenges: Vec<Challenge>) -> Self {
        Self::with_clock(challenges, Arc::new(Utc::now))
    }

    pub fn with_clock(challenges: Vec<Challenge>, clock: ClockFn) -> Self {
        Self {
            challenges: Arc::new(Mutex::new(challenges)),
            clock,
        }
    }

    /// Store populated from the embedded seed data.
    pub fn seeded(settings: &SeedSettings) -> Result<Self> {
        let challenges = seed::load_seed(settings, Utc::now())?;
        info!("Store seeded with {} challenges", challenges.len());
        Ok(Self::new(challenges))
    }

    pub fn now(&self) -> DateTime<Utc> {
        (self.clock)()
    }

    pub async fn execute<F, T>(&self, task: F) -> T
    where
        F: FnOnce(&mut Vec<Challenge>) -> T,
    {
        let mut guard = self.challenges.lock().await;
        task(&mut *guard)
    }

    /// Runs `task` against one challenge with a single captured `now`.
    /// Returns a copy of the challenge when the task reports success.
    pub(crate) async fn mutate_challenge<F>(&self, challenge_id: &str, task: F) -> Option<Challenge>
    where
        F: FnOnce(&mut Challenge, DateTime<Utc>) -> bool,
    {
        let now = self.now();
        self.execute(move |challenges| {
            let challenge = challenges.iter_mut().find(|c| c.id == challenge_id)?;
            task(&mut *challenge, now).then(|| challenge.clone())
        })
        .await
    }

    pub async fn len(&self) -> usize {
        self.execute(|challenges| challenges.len()).await
    }

    pub async fn is_empty(&self) -> bool {
        self.len().await == 0
    }
}
