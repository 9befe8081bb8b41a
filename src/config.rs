use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::fs;
use std::io::{ErrorKind, Write};
use std::path::{Path, PathBuf};

use crate::error::{ConfigError, SettingsError};

pub const SETTINGS_FILE: &str = "bot_settings.json";

/// Immutable snapshot handed to one worker run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BotConfig {
    pub token: String,
    pub channel_id: u64,
    pub remember_me: bool,
}

/// Raw form inputs as typed by the user.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ConfigForm {
    pub token: String,
    pub channel_id: String,
    pub remember_me: bool,
}

impl ConfigForm {
    /// Validate the form into a config snapshot.
    pub fn parse(&self) -> Result<BotConfig, ConfigError> {
        Ok(BotConfig {
            token: self.token.clone(),
            channel_id: parse_channel_id(&self.channel_id)?,
            remember_me: self.remember_me,
        })
    }
}

impl From<StoredSettings> for ConfigForm {
    fn from(s: StoredSettings) -> Self {
        Self {
            token: s.token,
            channel_id: s.channel_id.map(|id| id.to_string()).unwrap_or_default(),
            remember_me: s.remember_me,
        }
    }
}

pub fn parse_channel_id(input: &str) -> Result<u64, ConfigError> {
    input
        .trim()
        .parse::<u64>()
        .map_err(|_| ConfigError::InvalidChannelId {
            input: input.to_string(),
        })
}

/// Persisted form of the credential and preference tuple.
#[derive(Serialize, Deserialize, Clone, Debug, Default, PartialEq, Eq)]
pub struct StoredSettings {
    #[serde(default)]
    pub token: String,
    #[serde(default)]
    pub channel_id: Option<u64>,
    #[serde(default)]
    pub remember_me: bool,
}

impl From<&BotConfig> for StoredSettings {
    fn from(c: &BotConfig) -> Self {
        Self {
            token: c.token.clone(),
            channel_id: Some(c.channel_id),
            remember_me: c.remember_me,
        }
    }
}

/// Key/value persistence for [`StoredSettings`].
pub trait SettingsStore: Send {
    /// Saved settings, or defaults when nothing usable is stored.
    fn load(&self) -> StoredSettings;
    fn save(&self, settings: &StoredSettings) -> Result<(), SettingsError>;
}

/// Pretty-printed JSON file store.
#[derive(Debug, Clone)]
pub struct JsonSettingsStore {
    path: PathBuf,
}

impl JsonSettingsStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Store at the platform config location.
    pub fn default_location() -> Self {
        Self::new(settings_path())
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl SettingsStore for JsonSettingsStore {
    fn load(&self) -> StoredSettings {
        let content = match fs::read_to_string(&self.path) {
            Ok(content) => content,
            Err(e) if e.kind() == ErrorKind::NotFound => return StoredSettings::default(),
            Err(e) => {
                tracing::warn!(path = %self.path.display(), error = %e, "failed to read settings");
                return StoredSettings::default();
            }
        };
        match serde_json::from_str(&content) {
            Ok(settings) => settings,
            Err(e) => {
                tracing::warn!(path = %self.path.display(), error = %e, "ignoring malformed settings");
                StoredSettings::default()
            }
        }
    }

    fn save(&self, settings: &StoredSettings) -> Result<(), SettingsError> {
        if let Some(dir) = self.path.parent() {
            if !dir.as_os_str().is_empty() {
                fs::create_dir_all(dir)?;
            }
        }
        let data = serde_json::to_string_pretty(settings)?;
        let mut file = fs::File::create(&self.path)?;
        file.write_all(data.as_bytes())?;
        tracing::debug!(path = %self.path.display(), "settings saved");
        Ok(())
    }
}

/// Platform config dir, or the working directory when no home is known.
pub fn settings_path() -> PathBuf {
    match ProjectDirs::from("com", "discordwr", "discord-wr") {
        Some(proj) => proj.config_dir().join(SETTINGS_FILE),
        None => PathBuf::from(SETTINGS_FILE),
    }
}
