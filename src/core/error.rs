//! # Error Taxonomy
//!
//! Typed errors for the reminder store, the notification backends and
//! reminder form intake. Application flow still uses `anyhow`.
//!
//! - **Version**: 1.0.0
//! - **Since**: 0.1.0

use std::time::Duration;
use thiserror::Error;

/// Failures from the SQLite-backed store
#[derive(Debug, Error)]
pub enum StoreError {
    /// Persistence could not be opened, read or written
    #[error("storage unavailable: {0}")]
    StorageUnavailable(String),
}

impl From<sqlite::Error> for StoreError {
    fn from(e: sqlite::Error) -> Self {
        StoreError::StorageUnavailable(e.to_string())
    }
}

pub type StoreResult<T> = std::result::Result<T, StoreError>;

/// Failures from a notification backend
#[derive(Debug, Error)]
pub enum NotifierError {
    #[error("speech synthesis failed: {0}")]
    Synthesis(String),

    #[error("audio playback failed: {0}")]
    Playback(String),

    #[error("audio file error: {0}")]
    Io(#[from] std::io::Error),

    #[error("notification timed out after {0:?}")]
    TimedOut(Duration),
}

/// Rejections from the reminder form
#[derive(Debug, Error, PartialEq, Eq)]
pub enum RequestError {
    #[error("task must not be empty")]
    EmptyTask,

    #[error("hour must be between 1 and 12, got {0}")]
    InvalidHour(u32),

    #[error("minute must be between 0 and 59, got {0}")]
    InvalidMinute(u32),

    #[error("expected AM or PM, got '{0}'")]
    InvalidMeridiem(String),

    #[error("time must look like 'HH:MM AM', got '{0}'")]
    InvalidTime(String),

    #[error("unknown repeat policy '{0}'")]
    UnknownRepeat(String),

    #[error("unknown weekday '{0}'")]
    UnknownWeekday(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sqlite_error_maps_to_storage_unavailable() {
        let err = sqlite::open("/nonexistent-dir/does/not/exist.db")
            .err()
            .expect("opening inside a missing directory should fail");
        let store_err: StoreError = err.into();
        assert!(matches!(store_err, StoreError::StorageUnavailable(_)));
        assert!(store_err.to_string().starts_with("storage unavailable"));
    }

    #[test]
    fn test_request_error_messages() {
        assert_eq!(RequestError::EmptyTask.to_string(), "task must not be empty");
        assert_eq!(
            RequestError::InvalidHour(13).to_string(),
            "hour must be between 1 and 12, got 13"
        );
        assert_eq!(
            NotifierError::TimedOut(Duration::from_secs(5)).to_string(),
            "notification timed out after 5s"
        );
    }
}
