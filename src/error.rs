//! Error types for configuration, worker startup, the network client and settings I/O.

use thiserror::Error;

/// User input that cannot become a [`crate::config::BotConfig`].
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigError {
    #[error("Invalid Channel ID {input:?}. Please enter a number.")]
    InvalidChannelId { input: String },
}

/// Reasons `BotController::start` refuses to spawn a worker.
#[derive(Debug, Error)]
pub enum StartError {
    #[error(transparent)]
    InvalidConfig(#[from] ConfigError),
    #[error("the bot is already running")]
    AlreadyRunning,
    #[error("failed to spawn worker thread: {0}")]
    Spawn(#[source] std::io::Error),
}

/// Failures reported by a [`crate::client::NetworkClient`].
///
/// These are carried as values inside worker events, so they must be `Clone`
/// and own their messages.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ClientError {
    /// The token was rejected.
    #[error("Login failed: {0}")]
    LoginFailure(String),
    /// Network, TLS or HTTP-level failure.
    #[error("Connection error: {0}")]
    Transport(String),
    #[error("Unexpected error: {0}")]
    Generic(String),
}

impl ClientError {
    pub fn kind(&self) -> &'static str {
        match self {
            ClientError::LoginFailure(_) => "login",
            ClientError::Transport(_) => "transport",
            ClientError::Generic(_) => "generic",
        }
    }
}

#[derive(Debug, Error)]
pub enum SettingsError {
    #[error("settings I/O failed: {0}")]
    Io(#[from] std::io::Error),
    #[error("settings file is not valid JSON: {0}")]
    Json(#[from] serde_json::Error),
}
