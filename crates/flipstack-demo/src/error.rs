use std::path::PathBuf;

use flipstack_core::{ConfigError, StackError};
use thiserror::Error;

pub type Result<T> = std::result::Result<T, DemoError>;

/// Exit code for bad command-line input.
pub const EXIT_USAGE: i32 = 2;

/// Exit code for a config file that parses but fails validation.
pub const EXIT_INVALID_CONFIG: i32 = 3;

#[derive(Debug, Error)]
pub enum DemoError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("config error: {0}")]
    Config(#[from] ConfigError),

    #[error("stack error: {0}")]
    Stack(#[from] StackError),

    #[error("unknown scenario: {name} (try `list-scenarios`)")]
    UnknownScenario { name: String },

    #[error("{path}:{line}: {message}")]
    Trace {
        path: PathBuf,
        line: usize,
        message: String,
    },

    #[error("invalid argument: {message}")]
    InvalidArgument { message: String },
}

impl DemoError {
    #[must_use]
    pub fn exit_code(&self) -> i32 {
        match self {
            Self::UnknownScenario { .. } | Self::InvalidArgument { .. } => EXIT_USAGE,
            Self::Config(ConfigError::Invalid(_)) => EXIT_INVALID_CONFIG,
            _ => 1,
        }
    }

    #[must_use]
    pub fn invalid(message: impl Into<String>) -> Self {
        Self::InvalidArgument {
            message: message.into(),
        }
    }
}
