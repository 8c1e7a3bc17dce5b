//! Persistence error types

use thiserror::Error;

#[derive(Error, Debug)]
pub enum PersistenceError {
    #[error("Database error: {0}")]
    Database(#[from] rusqlite::Error),

    #[error("Failed to open store at {path}: {message}")]
    Open { path: String, message: String },

    #[error("Background task failed: {0}")]
    Task(String),
}

impl From<tokio::task::JoinError> for PersistenceError {
    fn from(err: tokio::task::JoinError) -> Self {
        PersistenceError::Task(err.to_string())
    }
}

impl From<PersistenceError> for slack_translator_core::Error {
    fn from(err: PersistenceError) -> Self {
        slack_translator_core::Error::Store(err.to_string())
    }
}
