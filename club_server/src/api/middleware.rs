//! Edit-code middleware for participant and tournament writes.
//!
//! When the server is started with `CLUB_EDIT_CODE`, every route behind
//! this layer requires the same value in the `x-edit-code` header. Without
//! a configured code the layer lets everything through.
//!
//! # Usage
//!
//! ```rust,no_run
//! use axum::{Router, routing::post, middleware};
//! # use club_server::api::middleware::edit_code_middleware;
//! # use club_server::api::AppState;
//! # async fn handler() {}
//! # let state: AppState = unimplemented!();
//!
//! let writes: Router<AppState> = Router::new()
//!     .route("/participants", post(handler))
//!     .layer(middleware::from_fn_with_state(state.clone(), edit_code_middleware));
//! # let _ = writes;
//! ```

use axum::{
    extract::{Request, State},
    http::{HeaderMap, StatusCode},
    middleware::Next,
    response::{IntoResponse, Response},
};
use club_bracket::security::secrets_match;

use super::AppState;
use super::errors::error_response;
use super::request_id::RequestId;
use crate::{logging, metrics};

/// Header carrying the club edit code
pub const EDIT_CODE_HEADER: &str = "x-edit-code";

/// Header carrying a tournament access code
pub const ACCESS_CODE_HEADER: &str = "x-access-code";

/// Header value as text, empty when absent or not UTF-8
pub fn header_str<'a>(headers: &'a HeaderMap, name: &str) -> &'a str {
    headers
        .get(name)
        .and_then(|v| v.to_str().ok())
        .unwrap_or_default()
}

/// Reject writes without the configured edit code
///
/// - **No code configured**: calls next handler
/// - **Matching `x-edit-code`**: calls next handler
/// - **Missing or wrong header**: returns `403 Forbidden`
pub async fn edit_code_middleware(
    State(state): State<AppState>,
    request: Request,
    next: Next,
) -> Response {
    let Some(expected) = state.edit_code.as_deref() else {
        return next.run(request).await;
    };

    if secrets_match(expected, header_str(request.headers(), EDIT_CODE_HEADER).trim()) {
        return next.run(request).await;
    }

    let request_id = request.extensions().get::<RequestId>().cloned();
    logging::log_access_event(
        "edit",
        None,
        request_id.as_ref().map(RequestId::as_str),
        &format!("Rejected edit code for {} {}", request.method(), request.uri().path()),
    );
    metrics::access_denied_total("edit");

    error_response(StatusCode::FORBIDDEN, "Invalid edit code").into_response()
}
