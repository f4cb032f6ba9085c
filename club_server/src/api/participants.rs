//! Participant API handlers.
//!
//! Reads are public. Writes sit behind the edit-code layer.
//!
//! # Examples
//!
//! Register a participant:
//! ```bash
//! curl -X POST http://localhost:8080/api/v1/participants \
//!   -H "x-edit-code: CODE" \
//!   -H "Content-Type: application/json" \
//!   -d '{"first_name": "Ana", "last_name": "Silva", "belt": "blue", "age": 24}'
//! ```

use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
};
use club_bracket::{Participant, ParticipantDraft, ParticipantId};

use super::AppState;
use super::errors::{ApiError, participant_error};

/// List participants, most wins first.
///
/// # Response
///
/// Returns `200 OK` with an array of participants.
pub async fn list_participants(
    State(state): State<AppState>,
) -> Result<Json<Vec<Participant>>, ApiError> {
    state
        .participants
        .list()
        .await
        .map(Json)
        .map_err(participant_error)
}

/// Register a participant with zero wins.
///
/// # Errors
///
/// - `400 Bad Request`: Missing name or belt, negative age, non-positive weight
/// - `403 Forbidden`: Edit code required and missing or wrong
pub async fn create_participant(
    State(state): State<AppState>,
    Json(draft): Json<ParticipantDraft>,
) -> Result<(StatusCode, Json<Participant>), ApiError> {
    let participant = state
        .participants
        .register(&draft)
        .await
        .map_err(participant_error)?;

    tracing::info!(participant_id = participant.id, "Participant registered");
    Ok((StatusCode::CREATED, Json(participant)))
}

/// Get one participant.
///
/// # Errors
///
/// - `404 Not Found`: Participant doesn't exist
pub async fn get_participant(
    State(state): State<AppState>,
    Path(id): Path<ParticipantId>,
) -> Result<Json<Participant>, ApiError> {
    state
        .participants
        .get(id)
        .await
        .map(Json)
        .map_err(participant_error)
}

/// Replace a participant's descriptive fields. The win count is kept.
pub async fn update_participant(
    State(state): State<AppState>,
    Path(id): Path<ParticipantId>,
    Json(draft): Json<ParticipantDraft>,
) -> Result<Json<Participant>, ApiError> {
    state
        .participants
        .update(id, &draft)
        .await
        .map(Json)
        .map_err(participant_error)
}

/// Delete a participant.
///
/// Matches keep their rows; references to the participant become empty.
///
/// # Response
///
/// Returns `204 No Content` on success.
pub async fn delete_participant(
    State(state): State<AppState>,
    Path(id): Path<ParticipantId>,
) -> Result<StatusCode, ApiError> {
    state
        .participants
        .remove(id)
        .await
        .map_err(participant_error)?;

    tracing::info!(participant_id = id, "Participant deleted");
    Ok(StatusCode::NO_CONTENT)
}
