use std::io;
use std::path::PathBuf;

use thiserror::Error;

/// Failures of a watch run.
///
/// `Fetch`, `Extraction`, `Store` and `Config` are fatal. `Notification` is
/// logged by the runner and never ends a run.
#[derive(Debug, Error)]
pub enum WatchError {
    #[error("failed to fetch {url}: {reason}")]
    Fetch { url: String, reason: String },
    #[error("listing {index} is missing {field}")]
    Extraction { index: usize, field: String },
    #[error("unreadable page markup: {0}")]
    Markup(String),
    #[error("snapshot store {path}: {reason}")]
    Store { path: PathBuf, reason: String },
    #[error("notification failed: {0}")]
    Notification(String),
    #[error("configuration error: {0}")]
    Config(String),
    #[error(transparent)]
    Io(#[from] io::Error),
    #[error(transparent)]
    Json(#[from] serde_json::Error),
}

impl WatchError {
    pub fn is_fatal(&self) -> bool {
        !matches!(self, WatchError::Notification(_))
    }
}

pub type Result<T> = std::result::Result<T, WatchError>;
