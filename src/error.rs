//! Error types of the crate.

use std::path::PathBuf;

use thiserror::Error;

/// A series handed to the renderer is internally inconsistent.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RenderError {
    #[error("{quantity} has {actual} samples but the time axis has {expected}")]
    LengthMismatch {
        quantity: &'static str,
        expected: usize,
        actual: usize,
    },
}

/// Writing a chart to disk failed.
#[derive(Debug, Error)]
pub enum ExportError {
    #[error("I/O error on {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("gnuplot failed: {0}")]
    Gnuplot(String),

    #[error("JSON encoding failed: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Unknown chart format: {0}")]
    UnknownFormat(String),
}

/// The tutoring assistant could not produce an answer.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CommunicationError {
    #[error("API key not configured (set MRUA_OPENAI_KEY or OPENAI_API_KEY)")]
    MissingKey,

    #[error("Network error: {0}")]
    Network(String),

    #[error("API error ({status}): {message}")]
    Api { status: u16, message: String },

    #[error("Failed to parse response: {0}")]
    Parse(String),

    #[error("Assistant returned an empty answer")]
    EmptyResponse,
}

/// A settings file could not be loaded.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse {}: {source}", .path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },
}

/// Result type for shell operations
pub type ShellResult<T> = Result<T, ShellError>;

/// Errors surfaced to the user by the interaction shell.
#[derive(Debug, Error)]
pub enum ShellError {
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("{samples} samples requested, the limit is {limit}")]
    TooManySamples { samples: usize, limit: usize },

    #[error(transparent)]
    Render(#[from] RenderError),

    #[error(transparent)]
    Export(#[from] ExportError),

    #[error(transparent)]
    Communication(#[from] CommunicationError),

    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}
