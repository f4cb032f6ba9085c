//! Integration tests for the HTTP API.
//!
//! The router is driven with `oneshot` over an in-memory store.

use axum::Router;
use axum::body::Body;
use axum::http::{Method, Request, StatusCode};
use club_bracket::db::ParticipantRepository;
use club_bracket::{MemoryStore, Repositories, WinCreditPolicy};
use club_server::api::{self, AppState};
use http_body_util::BodyExt;
use serde_json::{Value, json};
use tower::ServiceExt; // For `oneshot` method

struct TestServer {
    app: Router,
    store: MemoryStore,
}

fn test_server(edit_code: Option<&str>) -> TestServer {
    test_server_with_policy(edit_code, WinCreditPolicy::Reconciled)
}

fn test_server_with_policy(edit_code: Option<&str>, policy: WinCreditPolicy) -> TestServer {
    let store = MemoryStore::new();
    let repos = Repositories::from_store(store.clone());
    let state = AppState::new(&repos, policy, edit_code.map(str::to_string));
    TestServer {
        app: api::create_router(state),
        store,
    }
}

struct Reply {
    status: StatusCode,
    request_id: Option<String>,
    body: Value,
}

async fn send(
    server: &TestServer,
    method: Method,
    uri: &str,
    headers: &[(&str, &str)],
    body: Option<Value>,
) -> Reply {
    let mut builder = Request::builder().method(method).uri(uri);
    for (name, value) in headers {
        builder = builder.header(*name, *value);
    }
    let request = match body {
        Some(json) => builder
            .header("content-type", "application/json")
            .body(Body::from(json.to_string()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    };

    let response = server.app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let request_id = response
        .headers()
        .get("x-request-id")
        .map(|v| v.to_str().unwrap().to_string());
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    let body = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap()
    };

    Reply {
        status,
        request_id,
        body,
    }
}

async fn register(server: &TestServer, first: &str, headers: &[(&str, &str)]) -> i64 {
    let reply = send(
        server,
        Method::POST,
        "/api/v1/participants",
        headers,
        Some(json!({"first_name": first, "last_name": "Test", "belt": "white"})),
    )
    .await;
    assert_eq!(reply.status, StatusCode::CREATED, "{}", reply.body);
    reply.body["id"].as_i64().unwrap()
}

/// Creates a tournament and returns (tournament id, access code, matches)
async fn create_tournament(server: &TestServer, ids: &[i64]) -> (i64, String, Vec<Value>) {
    let reply = send(
        server,
        Method::POST,
        "/api/v1/tournaments",
        &[],
        Some(json!({"name": "Club Night", "participant_ids": ids})),
    )
    .await;
    assert_eq!(reply.status, StatusCode::CREATED, "{}", reply.body);
    (
        reply.body["tournament"]["id"].as_i64().unwrap(),
        reply.body["access_code"].as_str().unwrap().to_string(),
        reply.body["matches"].as_array().unwrap().clone(),
    )
}

// ============================================================================
// Health Check Tests
// ============================================================================

#[tokio::test]
async fn test_health_check_endpoint() {
    let server = test_server(None);
    let reply = send(&server, Method::GET, "/health", &[], None).await;

    assert_eq!(reply.status, StatusCode::OK);
    assert_eq!(reply.body["status"], "healthy");
    assert_eq!(reply.body["win_credit_policy"], "reconciled");
}

#[tokio::test]
async fn test_request_id_is_echoed_or_generated() {
    let server = test_server(None);

    let reply = send(
        &server,
        Method::GET,
        "/api/v1/participants",
        &[("x-request-id", "abc-123")],
        None,
    )
    .await;
    assert_eq!(reply.request_id.as_deref(), Some("abc-123"));

    let reply = send(&server, Method::GET, "/api/v1/participants", &[], None).await;
    assert!(reply.request_id.is_some_and(|id| !id.is_empty()));
}

// ============================================================================
// Participant Tests
// ============================================================================

#[tokio::test]
async fn test_participant_crud() {
    let server = test_server(None);
    let id = register(&server, "Ana", &[]).await;

    let reply = send(
        &server,
        Method::GET,
        &format!("/api/v1/participants/{id}"),
        &[],
        None,
    )
    .await;
    assert_eq!(reply.status, StatusCode::OK);
    assert_eq!(reply.body["first_name"], "Ana");
    assert_eq!(reply.body["wins"], 0);

    let reply = send(
        &server,
        Method::PUT,
        &format!("/api/v1/participants/{id}"),
        &[],
        Some(json!({"first_name": "Ana", "last_name": "Test", "belt": "blue", "weight_kg": 61.5})),
    )
    .await;
    assert_eq!(reply.status, StatusCode::OK);
    assert_eq!(reply.body["belt"], "blue");
    assert_eq!(reply.body["weight_kg"], 61.5);

    let reply = send(
        &server,
        Method::DELETE,
        &format!("/api/v1/participants/{id}"),
        &[],
        None,
    )
    .await;
    assert_eq!(reply.status, StatusCode::NO_CONTENT);

    let reply = send(
        &server,
        Method::GET,
        &format!("/api/v1/participants/{id}"),
        &[],
        None,
    )
    .await;
    assert_eq!(reply.status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_participant_validation() {
    let server = test_server(None);
    let reply = send(
        &server,
        Method::POST,
        "/api/v1/participants",
        &[],
        Some(json!({"first_name": "  ", "last_name": "Test", "belt": "white"})),
    )
    .await;

    assert_eq!(reply.status, StatusCode::BAD_REQUEST);
    assert!(reply.body["error"].as_str().unwrap().contains("first_name"));
}

#[tokio::test]
async fn test_edit_code_gates_writes_only() {
    let server = test_server(Some("dojo"));

    let reply = send(
        &server,
        Method::POST,
        "/api/v1/participants",
        &[],
        Some(json!({"first_name": "Ana", "last_name": "Test", "belt": "white"})),
    )
    .await;
    assert_eq!(reply.status, StatusCode::FORBIDDEN);

    let reply = send(
        &server,
        Method::POST,
        "/api/v1/participants",
        &[("x-edit-code", "wrong")],
        Some(json!({"first_name": "Ana", "last_name": "Test", "belt": "white"})),
    )
    .await;
    assert_eq!(reply.status, StatusCode::FORBIDDEN);

    register(&server, "Ana", &[("x-edit-code", "dojo")]).await;

    // Reads stay open
    let reply = send(&server, Method::GET, "/api/v1/participants", &[], None).await;
    assert_eq!(reply.status, StatusCode::OK);
    assert_eq!(reply.body.as_array().unwrap().len(), 1);
}

// ============================================================================
// Tournament Tests
// ============================================================================

#[tokio::test]
async fn test_create_tournament_returns_code_once() {
    let server = test_server(None);
    let a = register(&server, "A", &[]).await;
    let b = register(&server, "B", &[]).await;
    let c = register(&server, "C", &[]).await;

    let (id, code, matches) = create_tournament(&server, &[a, b, c]).await;
    assert_eq!(code.len(), 6);
    assert_eq!(matches.len(), 2);

    let byes = matches
        .iter()
        .filter(|m| m["participant_a"].is_null() != m["participant_b"].is_null())
        .count();
    assert_eq!(byes, 1);

    let reply = send(
        &server,
        Method::GET,
        &format!("/api/v1/tournaments/{id}"),
        &[],
        None,
    )
    .await;
    assert_eq!(reply.status, StatusCode::OK);
    assert_eq!(reply.body["matches"].as_array().unwrap().len(), 2);
    assert_eq!(reply.body["rounds"], json!([1]));
    assert!(!reply.body.to_string().contains(&code));

    let reply = send(&server, Method::GET, "/api/v1/tournaments", &[], None).await;
    assert!(!reply.body.to_string().contains(&code));
}

#[tokio::test]
async fn test_create_tournament_rejects_bad_selection() {
    let server = test_server(None);
    let a = register(&server, "A", &[]).await;

    let reply = send(
        &server,
        Method::POST,
        "/api/v1/tournaments",
        &[],
        Some(json!({"name": "Cup", "participant_ids": [a, a]})),
    )
    .await;
    assert_eq!(reply.status, StatusCode::BAD_REQUEST);

    let reply = send(
        &server,
        Method::POST,
        "/api/v1/tournaments",
        &[],
        Some(json!({"name": "Cup", "participant_ids": [a, 404]})),
    )
    .await;
    assert_eq!(reply.status, StatusCode::BAD_REQUEST);

    let reply = send(&server, Method::GET, "/api/v1/tournaments", &[], None).await;
    assert_eq!(reply.body, json!([]));
}

#[tokio::test]
async fn test_unlock() {
    let server = test_server(None);
    let (id, code, _) = create_tournament(&server, &[]).await;
    let uri = format!("/api/v1/tournaments/{id}/unlock");

    let reply = send(&server, Method::POST, &uri, &[("x-access-code", code.as_str())], None).await;
    assert_eq!(reply.status, StatusCode::NO_CONTENT);

    let reply = send(&server, Method::POST, &uri, &[("x-access-code", "ZZZZZZ")], None).await;
    assert_eq!(reply.status, StatusCode::FORBIDDEN);

    let reply = send(
        &server,
        Method::POST,
        "/api/v1/tournaments/999/unlock",
        &[("x-access-code", code.as_str())],
        None,
    )
    .await;
    assert_eq!(reply.status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_record_and_reset_final_result() {
    let server = test_server(None);
    let a = register(&server, "A", &[]).await;
    let b = register(&server, "B", &[]).await;
    let (id, code, matches) = create_tournament(&server, &[a, b]).await;
    let match_id = matches[0]["id"].as_i64().unwrap();
    let winner = matches[0]["participant_a"].as_i64().unwrap();
    let uri = format!("/api/v1/tournaments/{id}/matches/{match_id}/result");

    let reply = send(
        &server,
        Method::PUT,
        &uri,
        &[("x-access-code", code.as_str())],
        Some(json!({"winner_id": winner})),
    )
    .await;
    assert_eq!(reply.status, StatusCode::OK, "{}", reply.body);
    assert_eq!(reply.body["match"]["status"], "done");
    assert_eq!(reply.body["match"]["winner_id"], winner);
    assert_eq!(reply.body["final_round"], true);
    assert_eq!(reply.body["credited"], winner);

    let stored = server.store.find_participant(winner).await.unwrap().unwrap();
    assert_eq!(stored.wins, 1);

    let reply = send(&server, Method::DELETE, &uri, &[("x-access-code", code.as_str())], None).await;
    assert_eq!(reply.status, StatusCode::OK);
    assert_eq!(reply.body["match"]["status"], "pending");
    assert!(reply.body["match"]["winner_id"].is_null());
    assert_eq!(reply.body["revoked"], winner);

    let stored = server.store.find_participant(winner).await.unwrap().unwrap();
    assert_eq!(stored.wins, 0);
}

#[tokio::test]
async fn test_legacy_policy_keeps_credit_after_reset() {
    let server = test_server_with_policy(None, WinCreditPolicy::Legacy);
    let a = register(&server, "A", &[]).await;
    let b = register(&server, "B", &[]).await;
    let (id, code, matches) = create_tournament(&server, &[a, b]).await;
    let match_id = matches[0]["id"].as_i64().unwrap();
    let uri = format!("/api/v1/tournaments/{id}/matches/{match_id}/result");
    let headers = [("x-access-code", code.as_str())];

    send(&server, Method::PUT, &uri, &headers, Some(json!({"winner_id": a}))).await;
    send(&server, Method::DELETE, &uri, &headers, None).await;
    send(&server, Method::PUT, &uri, &headers, Some(json!({"winner_id": a}))).await;

    let stored = server.store.find_participant(a).await.unwrap().unwrap();
    assert_eq!(stored.wins, 2);
}

#[tokio::test]
async fn test_record_result_errors() {
    let server = test_server(None);
    let a = register(&server, "A", &[]).await;
    let b = register(&server, "B", &[]).await;
    let c = register(&server, "C", &[]).await;
    let (id, code, matches) = create_tournament(&server, &[a, b]).await;
    let match_id = matches[0]["id"].as_i64().unwrap();
    let uri = format!("/api/v1/tournaments/{id}/matches/{match_id}/result");

    // Missing access code
    let reply = send(&server, Method::PUT, &uri, &[], Some(json!({"winner_id": a}))).await;
    assert_eq!(reply.status, StatusCode::FORBIDDEN);

    // Winner not in the match
    let reply = send(
        &server,
        Method::PUT,
        &uri,
        &[("x-access-code", code.as_str())],
        Some(json!({"winner_id": c})),
    )
    .await;
    assert_eq!(reply.status, StatusCode::BAD_REQUEST);

    // Unknown match
    let reply = send(
        &server,
        Method::PUT,
        &format!("/api/v1/tournaments/{id}/matches/999/result"),
        &[("x-access-code", code.as_str())],
        Some(json!({"winner_id": a})),
    )
    .await;
    assert_eq!(reply.status, StatusCode::NOT_FOUND);

    let reply = send(
        &server,
        Method::GET,
        &format!("/api/v1/tournaments/{id}"),
        &[],
        None,
    )
    .await;
    assert_eq!(reply.body["matches"][0]["status"], "pending");
}
