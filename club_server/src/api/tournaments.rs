//! Tournament API handlers.
//!
//! This module provides HTTP endpoints for:
//! - Listing tournaments and viewing a bracket
//! - Creating a tournament together with its round-1 draw
//! - Checking a tournament access code
//! - Recording and resetting match results
//!
//! Creation needs the club edit code when one is configured. Result writes
//! always need the tournament's access code in `x-access-code`.
//!
//! # Examples
//!
//! Record a winner:
//! ```bash
//! curl -X PUT http://localhost:8080/api/v1/tournaments/1/matches/3/result \
//!   -H "x-access-code: K7Q2ZD" \
//!   -H "Content-Type: application/json" \
//!   -d '{"winner_id": 12}'
//! ```

use axum::{
    Json,
    extract::{Path, State},
    http::{HeaderMap, StatusCode},
};
use club_bracket::{
    BracketError, Match, MatchId, ParticipantId, RecordedResult, Tournament, TournamentBracket,
    TournamentId,
};
use serde::{Deserialize, Serialize};

use super::AppState;
use super::errors::{ApiError, bracket_error};
use super::middleware::{ACCESS_CODE_HEADER, header_str};
use super::request_id::RequestId;
use crate::{logging, metrics};

#[derive(Debug, Deserialize)]
pub struct CreateTournamentRequest {
    pub name: String,
    #[serde(default)]
    pub participant_ids: Vec<ParticipantId>,
}

/// Returned once, at creation. The access code is not shown again.
#[derive(Debug, Serialize)]
pub struct CreatedTournamentResponse {
    pub tournament: Tournament,
    pub access_code: String,
    pub matches: Vec<Match>,
}

#[derive(Debug, Serialize)]
pub struct BracketResponse {
    pub tournament: Tournament,
    pub matches: Vec<Match>,
    pub rounds: Vec<i32>,
    pub champion: Option<ParticipantId>,
}

impl From<TournamentBracket> for BracketResponse {
    fn from(bracket: TournamentBracket) -> Self {
        let rounds = bracket.rounds();
        let champion = bracket.champion();
        Self {
            tournament: bracket.tournament,
            matches: bracket.matches,
            rounds,
            champion,
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct RecordResultRequest {
    pub winner_id: ParticipantId,
}

/// List tournaments, newest first. Access codes are never included.
pub async fn list_tournaments(
    State(state): State<AppState>,
) -> Result<Json<Vec<Tournament>>, ApiError> {
    state
        .tournaments
        .list_tournaments()
        .await
        .map(Json)
        .map_err(bracket_error)
}

/// Create a tournament and draw its round-1 bracket.
///
/// # Request Body
///
/// ```json
/// { "name": "Spring Open", "participant_ids": [3, 8, 11] }
/// ```
///
/// # Response
///
/// Returns `201 Created` with the tournament, its access code and the
/// round-1 matches.
///
/// # Errors
///
/// - `400 Bad Request`: Blank name, repeated or unknown participant
/// - `403 Forbidden`: Edit code required and missing or wrong
pub async fn create_tournament(
    State(state): State<AppState>,
    Json(request): Json<CreateTournamentRequest>,
) -> Result<(StatusCode, Json<CreatedTournamentResponse>), ApiError> {
    let bracket = state
        .tournaments
        .create_tournament(&request.name, &request.participant_ids)
        .await
        .map_err(bracket_error)?;

    metrics::tournaments_created_total();
    metrics::matches_generated_total(bracket.matches.len());
    tracing::info!(
        tournament_id = bracket.tournament.id,
        matches = bracket.matches.len(),
        "Tournament created"
    );

    let access_code = bracket.tournament.access_code.as_str().to_string();
    Ok((
        StatusCode::CREATED,
        Json(CreatedTournamentResponse {
            tournament: bracket.tournament,
            access_code,
            matches: bracket.matches,
        }),
    ))
}

/// Tournament with all matches, ordered by round then slot.
///
/// # Errors
///
/// - `404 Not Found`: Tournament doesn't exist
pub async fn get_tournament(
    State(state): State<AppState>,
    Path(tournament_id): Path<TournamentId>,
) -> Result<Json<BracketResponse>, ApiError> {
    state
        .tournaments
        .get_bracket(tournament_id)
        .await
        .map(|b| Json(b.into()))
        .map_err(bracket_error)
}

/// Check the access code in `x-access-code`.
///
/// # Response
///
/// Returns `204 No Content` when the code matches, `403 Forbidden` otherwise.
pub async fn unlock_tournament(
    State(state): State<AppState>,
    Path(tournament_id): Path<TournamentId>,
    request_id: RequestId,
    headers: HeaderMap,
) -> Result<StatusCode, ApiError> {
    state
        .tournaments
        .verify_access_code(tournament_id, header_str(&headers, ACCESS_CODE_HEADER))
        .await
        .map_err(|e| gate_error(e, tournament_id, &request_id))?;

    Ok(StatusCode::NO_CONTENT)
}

/// Record the winner of a match.
///
/// # Errors
///
/// - `400 Bad Request`: Winner is not one of the match's participants
/// - `403 Forbidden`: Missing or wrong access code
/// - `404 Not Found`: Tournament or match doesn't exist, or the match
///   belongs to another tournament
/// - `409 Conflict`: Match is canceled
pub async fn record_result(
    State(state): State<AppState>,
    Path((tournament_id, match_id)): Path<(TournamentId, MatchId)>,
    request_id: RequestId,
    headers: HeaderMap,
    Json(request): Json<RecordResultRequest>,
) -> Result<Json<RecordedResult>, ApiError> {
    apply_result(
        &state,
        tournament_id,
        match_id,
        Some(request.winner_id),
        &request_id,
        &headers,
    )
    .await
}

/// Clear the result of a match, returning it to pending.
pub async fn reset_result(
    State(state): State<AppState>,
    Path((tournament_id, match_id)): Path<(TournamentId, MatchId)>,
    request_id: RequestId,
    headers: HeaderMap,
) -> Result<Json<RecordedResult>, ApiError> {
    apply_result(&state, tournament_id, match_id, None, &request_id, &headers).await
}

async fn apply_result(
    state: &AppState,
    tournament_id: TournamentId,
    match_id: MatchId,
    winner: Option<ParticipantId>,
    request_id: &RequestId,
    headers: &HeaderMap,
) -> Result<Json<RecordedResult>, ApiError> {
    let outcome = state
        .tournaments
        .record_result(
            tournament_id,
            match_id,
            winner,
            header_str(headers, ACCESS_CODE_HEADER),
        )
        .await
        .map_err(|e| gate_error(e, tournament_id, request_id))?;

    metrics::results_recorded_total(if winner.is_some() { "record" } else { "reset" });
    if outcome.credited.is_some() {
        metrics::wins_credited_total("credit");
    }
    if outcome.revoked.is_some() {
        metrics::wins_credited_total("revoke");
    }

    tracing::info!(
        request_id = %request_id.as_str(),
        tournament_id,
        match_id,
        status = %outcome.recorded.status,
        final_round = outcome.final_round,
        "Match result updated"
    );

    Ok(Json(outcome))
}

/// Like `bracket_error`, but counts and logs rejected access codes
fn gate_error(e: BracketError, tournament_id: TournamentId, request_id: &RequestId) -> ApiError {
    if matches!(e, BracketError::AccessDenied(_)) {
        logging::log_access_event(
            "access",
            Some(tournament_id),
            Some(request_id.as_str()),
            "Invalid access code",
        );
        metrics::access_denied_total("access");
    }
    bracket_error(e)
}
