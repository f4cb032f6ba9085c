//! Bracket error types.

use thiserror::Error;

use super::models::MatchId;
use crate::participant::{ParticipantError, ParticipantId};
use crate::tournament::TournamentId;

/// Tournament and match errors
#[derive(Debug, Error)]
pub enum BracketError {
    /// Database error
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    /// Participant lookup or win-count update failed
    #[error(transparent)]
    Participant(#[from] ParticipantError),

    #[error("Tournament not found: {0}")]
    TournamentNotFound(TournamentId),

    #[error("Match not found: {0}")]
    MatchNotFound(MatchId),

    #[error("Match {match_id} does not belong to tournament {tournament_id}")]
    MatchNotInTournament {
        match_id: MatchId,
        tournament_id: TournamentId,
    },

    /// Winner must be one of the match's two competitors
    #[error("Participant {winner_id} is not playing in match {match_id}")]
    WinnerNotInMatch {
        match_id: MatchId,
        winner_id: ParticipantId,
    },

    #[error("Match {0} is canceled")]
    MatchCanceled(MatchId),

    /// Selected participant does not exist
    #[error("Unknown participant: {0}")]
    UnknownParticipant(ParticipantId),

    /// Participant selected more than once
    #[error("Participant selected more than once: {0}")]
    DuplicateParticipant(ParticipantId),

    #[error("Tournament name must not be blank")]
    InvalidName,

    /// Access code did not match
    #[error("Access denied for tournament {0}")]
    AccessDenied(TournamentId),

    /// A stored row holds a value this crate cannot interpret
    #[error("Invalid stored row: {0}")]
    InvalidRow(String),
}

impl BracketError {
    /// Get a client-safe error message
    ///
    /// Database and storage details are hidden; everything else is safe to show.
    pub fn client_message(&self) -> String {
        match self {
            BracketError::Database(_) | BracketError::InvalidRow(_) => {
                "Internal server error".to_string()
            }
            BracketError::Participant(e) => e.client_message(),
            BracketError::AccessDenied(_) => "Invalid access code".to_string(),
            _ => self.to_string(),
        }
    }
}

/// Result type for bracket operations
pub type BracketResult<T> = Result<T, BracketError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_client_message_hides_database_details() {
        let err = BracketError::Database(sqlx::Error::RowNotFound);
        assert_eq!(err.client_message(), "Internal server error");

        let err = BracketError::InvalidRow("status 'bogus'".to_string());
        assert_eq!(err.client_message(), "Internal server error");
    }

    #[test]
    fn test_client_message_passes_through_participant_errors() {
        let err = BracketError::from(ParticipantError::NotFound(9));
        assert_eq!(err.client_message(), "Participant not found: 9");
    }

    #[test]
    fn test_winner_not_in_match_message() {
        let err = BracketError::WinnerNotInMatch {
            match_id: 3,
            winner_id: 7,
        };
        assert_eq!(err.to_string(), "Participant 7 is not playing in match 3");
    }
}
