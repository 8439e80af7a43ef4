//! Error types for tweetmap.

use thiserror::Error;

pub type Result<T> = std::result::Result<T, TweetmapError>;

#[derive(Error, Debug)]
pub enum TweetmapError {
    /// No events were supplied, so there is no first window.
    #[error("Cannot aggregate an empty batch of events")]
    EmptyInput,

    #[error("Window width must be strictly positive and representable, got {width_ms} ms")]
    InvalidWindowWidth { width_ms: i64 },

    #[error("Malformed timestamp: {value:?}")]
    MalformedTimestamp { value: String },

    #[error("Malformed coordinates: {value:?}")]
    MalformedCoordinates { value: String },

    #[error("Event store error: {0}")]
    EventStore(#[from] StoreError),

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("Serialization error: {0}")]
    Serialization(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Failures of an event store backend.
#[derive(Error, Debug)]
pub enum StoreError {
    #[cfg(feature = "sqlite")]
    #[error("SQLite error: {0}")]
    Sqlite(#[from] rusqlite::Error),

    #[error("Store unavailable: {0}")]
    Unavailable(String),
}

impl From<serde_json::Error> for TweetmapError {
    fn from(err: serde_json::Error) -> Self {
        TweetmapError::Serialization(err.to_string())
    }
}

#[cfg(feature = "sqlite")]
impl From<rusqlite::Error> for TweetmapError {
    fn from(err: rusqlite::Error) -> Self {
        TweetmapError::EventStore(StoreError::Sqlite(err))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_store_error_is_wrapped_unchanged() {
        let err: TweetmapError = StoreError::Unavailable("disk gone".to_string()).into();
        match err {
            TweetmapError::EventStore(StoreError::Unavailable(msg)) => assert_eq!(msg, "disk gone"),
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn test_display_messages() {
        let err = TweetmapError::InvalidWindowWidth { width_ms: -5 };
        assert!(err.to_string().contains("-5 ms"));

        let err = TweetmapError::MalformedTimestamp {
            value: "yesterday".to_string(),
        };
        assert!(err.to_string().contains("yesterday"));
    }
}
