use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::{
    fs,
    path::{Path, PathBuf},
    sync::RwLock,
};

pub const SETTINGS_PATH_ENV: &str = "CHALLENGE_TRACKER_SETTINGS";
pub const DEBUG_ENV: &str = "CHALLENGE_TRACKER_DEBUG";
const DEFAULT_SETTINGS_FILE: &str = "challenge-tracker.json";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ScheduleSettings {
    /// Days between a reset and the challenge's new start.
    pub reset_lead_days: u32,
}

impl Default for ScheduleSettings {
    fn default() -> Self {
        Self { reset_lead_days: 2 }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct SeedSettings {
    pub include_history: bool,
    /// Days between boot and the template challenge's start.
    pub template_lead_days: u32,
}

impl Default for SeedSettings {
    fn default() -> Self {
        Self {
            include_history: true,
            template_lead_days: 7,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct UserSettings {
    pub schedule: ScheduleSettings,
    pub seed: SeedSettings,
}

pub struct SettingsStore {
    path: PathBuf,
    data: RwLock<UserSettings>,
}

impl SettingsStore {
    /// Reads settings from `path`, falling back to defaults when the file is
    /// missing. A file that exists but does not parse is an error.
    pub fn new(path: PathBuf) -> Result<Self> {
        let data = if path.exists() {
            let contents = fs::read_to_string(&path)
                .with_context(|| format!("Failed to read settings from {}", path.display()))?;
            serde_json::from_str(&contents)
                .with_context(|| format!("Failed to parse settings in {}", path.display()))?
        } else {
            UserSettings::default()
        };

        Ok(Self {
            path,
            data: RwLock::new(data),
        })
    }

    /// Settings path from `CHALLENGE_TRACKER_SETTINGS`, or the working directory default.
    pub fn default_path() -> PathBuf {
        std::env::var_os(SETTINGS_PATH_ENV)
            .map(PathBuf::from)
            .unwrap_or_else(|| PathBuf::from(DEFAULT_SETTINGS_FILE))
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn snapshot(&self) -> UserSettings {
        self.read().clone()
    }

    pub fn schedule(&self) -> ScheduleSettings {
        self.read().schedule.clone()
    }

    pub fn seed(&self) -> SeedSettings {
        self.read().seed.clone()
    }

    pub fn update_schedule(&self, schedule: ScheduleSettings) -> Result<()> {
        let mut guard = self.data.write().unwrap_or_else(|poisoned| poisoned.into_inner());
        let mut updated = guard.clone();
        updated.schedule = schedule;
        self.persist(&updated)?;
        *guard = updated;
        Ok(())
    }

    fn read(&self) -> std::sync::RwLockReadGuard<'_, UserSettings> {
        self.data.read().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    fn persist(&self, data: &UserSettings) -> Result<()> {
        let serialized = serde_json::to_string_pretty(data)?;
        fs::write(&self.path, serialized)
            .with_context(|| format!("Failed to write settings to {}", self.path.display()))
    }
}

/// `CHALLENGE_TRACKER_DEBUG=1` (or `true`) turns on debug-level logs.
pub fn debug_enabled() -> bool {
    std::env::var(DEBUG_ENV)
        .map(|value| value == "1" || value.eq_ignore_ascii_case("true"))
        .unwrap_or(false)
}
