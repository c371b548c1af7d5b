use std::io;

use thiserror::Error;

use crate::bootstrap::EditorError;

/// Crate-wide error type.
#[derive(Debug, Error)]
pub enum Error {
    /// Underlying I/O failure.
    #[error(transparent)]
    Io(#[from] io::Error),

    /// Host table access failed.
    #[error("database: {0}")]
    Database(#[from] rusqlite::Error),

    /// Settings or request body is not valid JSON.
    #[error("json: {0}")]
    Json(#[from] serde_json::Error),

    /// `config.toml` could not be parsed.
    #[error("config: {0}")]
    Toml(#[from] toml::de::Error),

    /// A stored row holds a value the model does not accept.
    #[error("invalid stored value: {0}")]
    InvalidRow(String),

    /// Interactive prompt was cancelled or failed.
    #[error("prompt: {0}")]
    Prompt(#[from] inquire::InquireError),

    /// A host named on the command line is not registered.
    #[error("no host matches '{0}'")]
    UnknownHost(String),

    /// Bootstrap file editing failed.
    #[error(transparent)]
    Editor(#[from] EditorError),
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
