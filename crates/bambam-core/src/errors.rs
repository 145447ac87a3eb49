use std::path::PathBuf;

/// Core error type for the bot.
///
/// Adapter crates map their specific errors into this type. Whether a failure
/// is fatal or recoverable is decided by where it surfaces: startup code
/// propagates it out of `main`, the event loop logs it and moves on.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("config error: {0}")]
    Config(String),

    #[error("i/o error: {0}")]
    Io(#[from] std::io::Error),

    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("missing resource: {path}: {reason}")]
    Resource { path: PathBuf, reason: String },

    #[error("storage error: {0}")]
    Storage(String),

    #[error("external error: {0}")]
    External(String),
}

pub type Result<T> = std::result::Result<T, Error>;
