//! Error types for the lulu-journal application.
//!
//! This module defines custom error types that categorize different failures
//! that can occur while managing journal records and calling the AI
//! collaborator.

use std::{io, path::PathBuf};

use thiserror::Error;

/// The main error type for the lulu-journal application.
#[derive(Error, Debug)]
pub enum JournalError {
    /// Errors related to file I/O operations.
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// Errors related to serialization/deserialization operations.
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// The backing storage rejected a write because it ran out of space.
    /// In-memory state is kept; the user gets a warning instead.
    #[error("Storage quota exceeded, the collection could not be saved. Try removing embedded images.")]
    QuotaExceeded,

    /// Record was not found when performing an operation.
    #[error("Record not found: {id}")]
    RecordNotFound { id: String },

    /// Imported or loaded data does not have the expected shape.
    #[error("Invalid format: {message}")]
    InvalidFormat { message: String },

    /// Errors related to configuration.
    #[error("Configuration error: {message}")]
    ConfigError { message: String },

    /// Directory creation or access failed.
    #[error("Failed to create or access directory: {path}")]
    DirectoryError { path: PathBuf },

    /// Transport-level failure talking to the AI collaborator.
    #[error("AI request failed: {0}")]
    Http(#[from] reqwest::Error),

    /// The AI collaborator answered but not with anything usable.
    #[error("AI assistant error: {message}")]
    Collaborator { message: String },

    /// No API key available for the AI collaborator.
    #[error("No API key configured. Set GEMINI_API_KEY or add it to the config file.")]
    MissingApiKey,

    /// Generic application error with a custom message.
    #[error("{message}")]
    ApplicationError { message: String },
}

impl JournalError {
    /// Whether this error came from the write path running out of space.
    pub fn is_quota(&self) -> bool {
        matches!(self, JournalError::QuotaExceeded)
    }
}
