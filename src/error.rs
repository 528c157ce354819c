use std::path::PathBuf;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum ScheduleError {
    #[error("failed to read {}: {source}", .path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to serialize schedule: {0}")]
    Serialize(#[from] serde_json::Error),

    #[error("failed to write {}: {source}", .path.display())]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

pub type Result<T> = std::result::Result<T, ScheduleError>;
