//! Error responses shared by the API handlers.
//!
//! Handlers return `Result<_, ApiError>`; library errors are mapped to a
//! status code and a client-safe message. Store failures are logged here
//! and surface to clients only as "Internal server error".

use axum::{Json, http::StatusCode};
use club_bracket::{BracketError, ParticipantError};
use serde::{Deserialize, Serialize};

#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: String,
}

/// Error half of every handler result
pub type ApiError = (StatusCode, Json<ErrorResponse>);

pub fn error_response(status: StatusCode, message: impl Into<String>) -> ApiError {
    (
        status,
        Json(ErrorResponse {
            error: message.into(),
        }),
    )
}

fn participant_status(e: &ParticipantError) -> StatusCode {
    match e {
        ParticipantError::Database(_) => StatusCode::INTERNAL_SERVER_ERROR,
        ParticipantError::NotFound(_) => StatusCode::NOT_FOUND,
        ParticipantError::MissingField(_) | ParticipantError::InvalidField { .. } => {
            StatusCode::BAD_REQUEST
        }
    }
}

fn bracket_status(e: &BracketError) -> StatusCode {
    match e {
        BracketError::Database(_) | BracketError::InvalidRow(_) => {
            StatusCode::INTERNAL_SERVER_ERROR
        }
        BracketError::Participant(inner) => participant_status(inner),
        BracketError::TournamentNotFound(_)
        | BracketError::MatchNotFound(_)
        | BracketError::MatchNotInTournament { .. } => StatusCode::NOT_FOUND,
        BracketError::WinnerNotInMatch { .. }
        | BracketError::UnknownParticipant(_)
        | BracketError::DuplicateParticipant(_)
        | BracketError::InvalidName => StatusCode::BAD_REQUEST,
        BracketError::MatchCanceled(_) => StatusCode::CONFLICT,
        BracketError::AccessDenied(_) => StatusCode::FORBIDDEN,
    }
}

/// Map a participant error for `map_err`
pub fn participant_error(e: ParticipantError) -> ApiError {
    let status = participant_status(&e);
    if status.is_server_error() {
        tracing::error!(error = %e, "Participant store failure");
    }
    error_response(status, e.client_message())
}

/// Map a bracket or tournament error for `map_err`
pub fn bracket_error(e: BracketError) -> ApiError {
    let status = bracket_status(&e);
    if status.is_server_error() {
        tracing::error!(error = %e, "Bracket store failure");
    }
    error_response(status, e.client_message())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_mapping() {
        assert_eq!(
            bracket_error(BracketError::AccessDenied(1)).0,
            StatusCode::FORBIDDEN
        );
        assert_eq!(
            bracket_error(BracketError::TournamentNotFound(1)).0,
            StatusCode::NOT_FOUND
        );
        assert_eq!(
            bracket_error(BracketError::UnknownParticipant(5)).0,
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            bracket_error(BracketError::MatchCanceled(2)).0,
            StatusCode::CONFLICT
        );
        assert_eq!(
            participant_error(ParticipantError::MissingField("belt")).0,
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            bracket_error(BracketError::from(ParticipantError::NotFound(3))).0,
            StatusCode::NOT_FOUND
        );
    }

    #[test]
    fn test_store_failures_hide_details() {
        let (status, Json(body)) =
            bracket_error(BracketError::InvalidRow("status 'bogus'".to_string()));
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(body.error, "Internal server error");
    }
}
