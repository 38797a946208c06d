//! Error types for acquacotta-client.
//!
//! Gateway failures are kept in their own enum because most store
//! operations surface them unchanged to the UI layer. Everything else
//! (configuration, local I/O) folds into [`ClientError`].

use std::path::PathBuf;
use thiserror::Error;

/// Failure of a single remote call.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum GatewayError {
    /// The backend could not be reached or the connection broke mid-call.
    #[error("transport error calling '{command}': {message}")]
    Transport { command: String, message: String },

    /// The backend answered but refused the operation.
    #[error("'{command}' rejected by backend: {message}")]
    Rejected { command: String, message: String },

    /// The backend answered with a payload of the wrong shape.
    #[error("could not decode result of '{command}': {message}")]
    Decode { command: String, message: String },
}

impl GatewayError {
    pub fn transport(command: &str, message: impl Into<String>) -> Self {
        GatewayError::Transport {
            command: command.to_string(),
            message: message.into(),
        }
    }

    pub fn rejected(command: &str, message: impl Into<String>) -> Self {
        GatewayError::Rejected {
            command: command.to_string(),
            message: message.into(),
        }
    }

    pub fn decode(command: &str, message: impl Into<String>) -> Self {
        GatewayError::Decode {
            command: command.to_string(),
            message: message.into(),
        }
    }

    /// Name of the remote operation that failed.
    pub fn command(&self) -> &str {
        match self {
            GatewayError::Transport { command, .. }
            | GatewayError::Rejected { command, .. }
            | GatewayError::Decode { command, .. } => command,
        }
    }
}

/// Configuration-specific errors.
#[derive(Error, Debug)]
pub enum ConfigError {
    /// Failed to load configuration
    #[error("Failed to load configuration from {path}: {message}")]
    LoadFailed { path: PathBuf, message: String },

    /// Failed to save configuration
    #[error("Failed to save configuration to {path}: {message}")]
    SaveFailed { path: PathBuf, message: String },

    /// Invalid configuration value
    #[error("Invalid configuration value for '{key}': {message}")]
    InvalidValue { key: String, message: String },

    /// Unknown configuration key
    #[error("unknown config key: {0}")]
    UnknownKey(String),

    /// No home directory to place the config under
    #[error("could not determine home directory")]
    NoHomeDir,
}

/// Top-level error type for acquacotta-client.
#[derive(Error, Debug)]
pub enum ClientError {
    #[error("Gateway error: {0}")]
    Gateway(#[from] GatewayError),

    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Invalid value for '{field}': {message}")]
    InvalidValue { field: String, message: String },
}

/// Result type alias for ClientError
pub type Result<T, E = ClientError> = std::result::Result<T, E>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn gateway_error_reports_command() {
        let err = GatewayError::rejected("delete_pomodoro", "not found");
        assert_eq!(err.command(), "delete_pomodoro");
        assert_eq!(
            err.to_string(),
            "'delete_pomodoro' rejected by backend: not found"
        );
    }

    #[test]
    fn gateway_error_converts_into_client_error() {
        let err: ClientError = GatewayError::transport("get_settings", "refused").into();
        assert!(matches!(err, ClientError::Gateway(GatewayError::Transport { .. })));
    }
}
