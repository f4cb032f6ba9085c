//! Participant error types.

use thiserror::Error;

use super::models::ParticipantId;

/// Participant errors
#[derive(Debug, Error)]
pub enum ParticipantError {
    /// Database error
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    /// Participant not found
    #[error("Participant not found: {0}")]
    NotFound(ParticipantId),

    /// Required field left blank
    #[error("Missing required field: {0}")]
    MissingField(&'static str),

    /// Field present but out of range
    #[error("Invalid {field}: {reason}")]
    InvalidField { field: &'static str, reason: String },
}

impl ParticipantError {
    /// Get a client-safe error message
    ///
    /// Database errors are replaced with a generic message so SQL details
    /// never reach API clients.
    pub fn client_message(&self) -> String {
        match self {
            ParticipantError::Database(_) => "Internal server error".to_string(),
            _ => self.to_string(),
        }
    }
}

/// Result type for participant operations
pub type ParticipantResult<T> = Result<T, ParticipantError>;
