use thiserror::Error;

/// Error type for simulation setup, scripting and export
#[derive(Error, Debug)]
#[non_exhaustive]
pub enum Error {
    #[error("invalid configuration: {message}")]
    InvalidConfiguration { message: String },

    #[error("insufficient grid capacity: {requested} cells requested, {available} available")]
    InsufficientCapacity { requested: usize, available: usize },

    #[error("unknown action label '{label}'")]
    UnknownAction { label: String },

    #[error("invalid hidden type value {value} (expected 0 or 1)")]
    InvalidType { value: u8 },

    #[error("episode {episode} not found in trajectory log")]
    EpisodeNotFound { episode: usize },

    #[error("episode history has no recorded state")]
    EmptyHistory,

    #[error("failed to {operation}: {source}")]
    Io {
        operation: String,
        #[source]
        source: std::io::Error,
    },

    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl Error {
    pub fn config(message: impl Into<String>) -> Self {
        Error::InvalidConfiguration {
            message: message.into(),
        }
    }

    pub fn io(operation: impl Into<String>, source: std::io::Error) -> Self {
        Error::Io {
            operation: operation.into(),
            source,
        }
    }
}

pub type Result<T> = std::result::Result<T, Error>;
