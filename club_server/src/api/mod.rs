//! HTTP API for the club bracket server.
//!
//! # Endpoints Overview
//!
//! ## Participants
//! - `GET /api/v1/participants` - List participants, most wins first
//! - `POST /api/v1/participants` - Register participant (edit code)
//! - `GET /api/v1/participants/{id}` - Get participant
//! - `PUT /api/v1/participants/{id}` - Update participant (edit code)
//! - `DELETE /api/v1/participants/{id}` - Delete participant (edit code)
//!
//! ## Tournaments
//! - `GET /api/v1/tournaments` - List tournaments, newest first
//! - `POST /api/v1/tournaments` - Create tournament and round-1 draw (edit code)
//! - `GET /api/v1/tournaments/{id}` - Tournament with its matches
//! - `POST /api/v1/tournaments/{id}/unlock` - Check an access code
//! - `PUT /api/v1/tournaments/{id}/matches/{match_id}/result` - Record winner (access code)
//! - `DELETE /api/v1/tournaments/{id}/matches/{match_id}/result` - Reset result (access code)
//!
//! ## Health Check
//! - `GET /health` - Store health status
//!
//! # Example Usage
//!
//! ```rust,no_run
//! use club_server::api::{create_router, AppState};
//! use club_bracket::{Repositories, WinCreditPolicy};
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let state = AppState::new(&Repositories::in_memory(), WinCreditPolicy::default(), None);
//! let app = create_router(state);
//!
//! let listener = tokio::net::TcpListener::bind("127.0.0.1:8080").await?;
//! axum::serve(listener, app).await?;
//! # Ok(())
//! # }
//! ```
//!
//! # CORS
//!
//! CORS is configured permissively so a browser front end on another
//! origin can call the API.

pub mod errors;
pub mod middleware;
pub mod participants;
pub mod request_id;
pub mod tournaments;

use axum::{
    Router,
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Json},
    routing::{get, post, put},
};
use club_bracket::{ParticipantManager, Repositories, TournamentManager, WinCreditPolicy};
use serde_json::json;
use tower_http::cors::CorsLayer;

/// Application state shared across all HTTP handlers.
///
/// Cloned for each request; the managers share their repositories by `Arc`.
#[derive(Clone)]
pub struct AppState {
    pub participants: ParticipantManager,
    pub tournaments: TournamentManager,
    /// Required in `x-edit-code` for participant and tournament writes when set
    pub edit_code: Option<String>,
}

impl AppState {
    pub fn new(repos: &Repositories, policy: WinCreditPolicy, edit_code: Option<String>) -> Self {
        Self {
            participants: ParticipantManager::new(repos.participants.clone()),
            tournaments: TournamentManager::new(repos, policy),
            edit_code,
        }
    }
}

/// Create the complete API router with all endpoints and middleware.
pub fn create_router(state: AppState) -> Router {
    let v1_routes = create_v1_router(state.clone());

    Router::new()
        .route("/health", get(health_check))
        .nest("/api/v1", v1_routes)
        .layer(axum::middleware::from_fn(request_id::request_id_middleware))
        .layer(CorsLayer::permissive())
        .with_state(state)
}

fn create_v1_router(state: AppState) -> Router<AppState> {
    // Reads and access-code gated result writes
    let public_routes = Router::new()
        .route("/participants", get(participants::list_participants))
        .route("/participants/{id}", get(participants::get_participant))
        .route("/tournaments", get(tournaments::list_tournaments))
        .route("/tournaments/{id}", get(tournaments::get_tournament))
        .route(
            "/tournaments/{id}/unlock",
            post(tournaments::unlock_tournament),
        )
        .route(
            "/tournaments/{id}/matches/{match_id}/result",
            put(tournaments::record_result).delete(tournaments::reset_result),
        );

    // Club data entry, gated by the edit code when one is configured
    let edit_routes = Router::new()
        .route("/participants", post(participants::create_participant))
        .route(
            "/participants/{id}",
            put(participants::update_participant).delete(participants::delete_participant),
        )
        .route("/tournaments", post(tournaments::create_tournament))
        .layer(axum::middleware::from_fn_with_state(
            state,
            middleware::edit_code_middleware,
        ));

    Router::new().merge(public_routes).merge(edit_routes)
}

/// Health check endpoint for monitoring and load balancers.
///
/// Returns `200 OK` if the store answers, or `503 Service Unavailable`.
///
/// ```bash
/// curl http://localhost:8080/health
/// # {"status":"healthy","version":"0.1.0","store":true,"win_credit_policy":"reconciled","timestamp":"..."}
/// ```
async fn health_check(State(state): State<AppState>) -> impl IntoResponse {
    let store_healthy = state.tournaments.health_check().await.is_ok();

    let status_code = if store_healthy {
        StatusCode::OK
    } else {
        StatusCode::SERVICE_UNAVAILABLE
    };

    let response = json!({
        "status": if store_healthy { "healthy" } else { "unhealthy" },
        "version": env!("CARGO_PKG_VERSION"),
        "store": store_healthy,
        "win_credit_policy": state.tournaments.win_credit_policy().to_string(),
        "timestamp": chrono::Utc::now().to_rfc3339(),
    });

    (status_code, Json(response))
}
