//! Error types

use super::severity::Severity;
use std::io;
use std::path::PathBuf;

pub type Result<T> = std::result::Result<T, LoggerError>;

/// Everything that can go wrong while configuring or feeding a [`Log`](super::Log)
#[derive(Debug, thiserror::Error)]
pub enum LoggerError {
    #[error("{action} '{}': {source}", path.display())]
    FileIo {
        action: &'static str,
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error(transparent)]
    Io(#[from] io::Error),

    /// Malformed JSON settings
    #[error("invalid settings: {0}")]
    Settings(#[from] serde_json::Error),

    /// File strategy whose backing file never opened
    #[error("file not defined")]
    FileNotDefined,

    #[error("can't create directory for '{}': {message}", path.display())]
    DirectoryCreation { path: PathBuf, message: String },

    #[error("the channel was closed for recording ({severity} logger)")]
    ChannelClosed { severity: Severity },

    /// Required environment variable absent or empty
    #[error("environment variable {key} is not set")]
    MissingVariable { key: String },

    /// Env file present but unreadable or malformed
    #[error("failed to load env file: {0}")]
    EnvFile(#[source] dotenv::Error),

    #[error("invalid configuration for {component}: {message}")]
    InvalidConfiguration { component: String, message: String },

    #[error("mail delivery failed after {attempts} attempt(s): {message}")]
    MailDelivery { attempts: u32, message: String },

    #[error("failed to start {severity} worker: {source}")]
    WorkerSpawn {
        severity: Severity,
        #[source]
        source: io::Error,
    },

    #[error("{0}")]
    Other(String),
}

impl LoggerError {
    pub fn file_io(action: &'static str, path: impl Into<PathBuf>, source: io::Error) -> Self {
        LoggerError::FileIo {
            action,
            path: path.into(),
            source,
        }
    }

    pub fn file_not_defined() -> Self {
        LoggerError::FileNotDefined
    }

    pub fn directory(path: impl Into<PathBuf>, message: impl Into<String>) -> Self {
        LoggerError::DirectoryCreation {
            path: path.into(),
            message: message.into(),
        }
    }

    pub fn channel_closed(severity: Severity) -> Self {
        LoggerError::ChannelClosed { severity }
    }

    pub fn missing_variable(key: impl Into<String>) -> Self {
        LoggerError::MissingVariable { key: key.into() }
    }

    pub fn config(component: impl Into<String>, message: impl Into<String>) -> Self {
        LoggerError::InvalidConfiguration {
            component: component.into(),
            message: message.into(),
        }
    }

    pub fn mail_delivery(attempts: u32, message: impl Into<String>) -> Self {
        LoggerError::MailDelivery {
            attempts,
            message: message.into(),
        }
    }

    pub fn other(message: impl Into<String>) -> Self {
        LoggerError::Other(message.into())
    }
}
