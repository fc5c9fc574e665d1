//! Error types for UserDesk Core

use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    #[error("Database error: {0}")]
    Database(#[from] rusqlite::Error),

    /// Login lookup missed; deliberately does not say which field was wrong.
    #[error("Invalid email or password")]
    InvalidCredentials,

    #[error("A user with email {0} already exists")]
    DuplicateEmail(String),

    #[error("User #{0} not found")]
    RecordNotFound(u64),

    #[error("Malformed stored data under '{key}': {source}")]
    MalformedStoredData {
        key: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("{0}")]
    Validation(String),

    #[error("Not signed in")]
    NotAuthenticated,

    #[error("Configuration error: {0}")]
    Config(#[from] toml::de::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, Error>;
