pub mod commands;
pub mod models;
pub mod settings;
pub mod store;
pub mod timer;
mod utils;

use std::path::PathBuf;

use anyhow::{Context, Result};
use log::info;
use settings::SettingsStore;
use store::{helpers::format_duration, Countdown, Store};

/// Everything a front end needs to call the command layer.
pub struct AppState {
    pub store: Store,
    pub settings: SettingsStore,
}

impl AppState {
    pub fn new(settings_path: PathBuf) -> Result<Self> {
        let settings = SettingsStore::new(settings_path)?;
        let store = Store::seeded(&settings.seed()).context("failed to seed challenge store")?;
        Ok(Self { store, settings })
    }

    pub fn from_parts(store: Store, settings: SettingsStore) -> Self {
        Self { store, settings }
    }
}

fn init_logging() {
    let level = if settings::debug_enabled() {
        log::LevelFilter::Debug
    } else {
        log::LevelFilter::Info
    };

    // RUST_LOG, when set, overrides the default level.
    let _ = env_logger::Builder::new()
        .filter_level(level)
        .parse_default_env()
        .try_init();
}

/// Boots the store from seed data and prints the challenge board.
pub fn run() -> Result<()> {
    init_logging();

    info!("Challenge tracker starting up...");

    let settings_path = SettingsStore::default_path();
    let state = AppState::new(settings_path)?;
    info!("Settings loaded from {}", state.settings.path().display());

    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
        .context("failed to build async runtime")?;

    runtime.block_on(async {
        let now = state.store.now();
        for challenge in commands::list_challenges(&state).await {
            println!(
                "{:<8} {:<12} {:>10}  {}",
                challenge.status.as_str(),
                challenge.date.to_string(),
                format_duration(challenge.elapsed_secs(now)),
                challenge.title
            );
        }

        match commands::fetch_live_page_data(&state).await {
            Some(next) => {
                let countdown = next
                    .scheduled_date_time
                    .and_then(|scheduled| Countdown::until(scheduled, now));
                if let Some(countdown) = countdown {
                    println!(
                        "\nNext: {} in {}d {:02}h {:02}m {:02}s",
                        next.title, countdown.days, countdown.hours, countdown.minutes, countdown.seconds
                    );
                } else {
                    println!("\nNext: {} ({})", next.title, next.status.as_str());
                }
            }
            None => println!("\nNo live or upcoming challenge"),
        }
    });

    Ok(())
}
