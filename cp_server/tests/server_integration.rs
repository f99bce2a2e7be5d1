//! Integration tests for the HTTP API.
//!
//! The router is driven in-process with `oneshot`; the completion backend is
//! replaced by a canned service so no Ollama server is needed.

use std::sync::Arc;

use async_trait::async_trait;
use axum::{
    Router,
    body::Body,
    http::{Request, StatusCode},
};
use casino_predictor::{
    Casino, Game,
    chat::{ChatAssistant, ChatError, ChatResult, CompletionService, ConnectionStatus},
};
use cp_server::api::{AppState, create_router, request_id::REQUEST_ID_HEADER};
use http_body_util::BodyExt;
use serde_json::{Value, json};
use tower::ServiceExt; // For `oneshot` method

struct CannedService {
    available: bool,
}

#[async_trait]
impl CompletionService for CannedService {
    async fn complete(&self, _prompt: &str) -> ChatResult<String> {
        if self.available {
            Ok("ANSWER: The house edge on a single-zero wheel is 2.7%.".to_string())
        } else {
            Err(ChatError::Connection)
        }
    }

    async fn check_connection(&self) -> ConnectionStatus {
        ConnectionStatus {
            available: self.available,
            message: (if self.available { "ready" } else { "not running" }).to_string(),
        }
    }
}

fn create_test_server(chat_available: bool) -> (Router, Arc<Casino>) {
    let casino = Arc::new(Casino::default());
    let assistant = Arc::new(ChatAssistant::new(Arc::new(CannedService {
        available: chat_available,
    })));
    let app = create_router(AppState {
        casino: casino.clone(),
        assistant,
    });
    (app, casino)
}

async fn send(app: &Router, request: Request<Body>) -> (StatusCode, Value) {
    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let body = response.into_body().collect().await.unwrap().to_bytes();
    let json = serde_json::from_slice(&body).unwrap_or(Value::Null);
    (status, json)
}

fn get(uri: &str) -> Request<Body> {
    Request::builder().uri(uri).body(Body::empty()).unwrap()
}

fn post_json(uri: &str, body: Value) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri(uri)
        .header("content-type", "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

fn post(uri: &str) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri(uri)
        .body(Body::empty())
        .unwrap()
}

// ============================================================================
// Health and index
// ============================================================================

#[tokio::test]
async fn test_health_check_endpoint() {
    let (app, _) = create_test_server(true);
    let (status, body) = send(&app, get("/health")).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "ok");
    assert_eq!(body["chat_available"], true);
    assert_eq!(body["tables"]["roulette"], 3);
    assert_eq!(body["tables"]["poker"], 2);
    assert_eq!(body["tables"]["jackpot"], 1);
}

#[tokio::test]
async fn test_health_reports_missing_chat_backend() {
    let (app, _) = create_test_server(false);
    let (status, body) = send(&app, get("/health")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["chat_available"], false);
}

#[tokio::test]
async fn test_api_index() {
    let (app, _) = create_test_server(true);
    let (status, body) = send(&app, get("/api/v1")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["name"], "Casino Predictor API");
    assert!(body["warning"].as_str().unwrap().contains("Educational"));
    assert_eq!(body["endpoints"]["predict"], "/api/v1/predict");
}

#[tokio::test]
async fn test_request_id_is_echoed_or_generated() {
    let (app, _) = create_test_server(true);

    let request = Request::builder()
        .uri("/api/v1/games")
        .header(REQUEST_ID_HEADER, "trace-42")
        .body(Body::empty())
        .unwrap();
    let response = app.clone().oneshot(request).await.unwrap();
    assert_eq!(response.headers()[REQUEST_ID_HEADER], "trace-42");

    let response = app.clone().oneshot(get("/api/v1/games")).await.unwrap();
    let generated = response.headers()[REQUEST_ID_HEADER].to_str().unwrap();
    assert_eq!(generated.len(), 36);
}

// ============================================================================
// Catalog and tables
// ============================================================================

#[tokio::test]
async fn test_list_games() {
    let (app, _) = create_test_server(true);
    let (status, body) = send(&app, get("/api/v1/games")).await;
    assert_eq!(status, StatusCode::OK);

    let ids: Vec<&str> = body["games"]
        .as_array()
        .unwrap()
        .iter()
        .map(|g| g["id"].as_str().unwrap())
        .collect();
    assert_eq!(ids, ["roulette", "blackjack", "poker", "jackpot"]);
}

#[tokio::test]
async fn test_list_tables() {
    let (app, _) = create_test_server(true);
    let (status, body) = send(&app, get("/api/v1/tables/Blackjack")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["game"], "blackjack");
    assert_eq!(body["tables"], json!(["table_1", "table_2", "table_3"]));
    assert_eq!(body["total"], 3);
}

#[tokio::test]
async fn test_list_tables_invalid_game() {
    let (app, _) = create_test_server(true);
    let (status, body) = send(&app, get("/api/v1/tables/baccarat")).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "Invalid game");
    assert!(body["message"].as_str().unwrap().contains("baccarat"));
}

// ============================================================================
// Simulation
// ============================================================================

#[tokio::test]
async fn test_simulate_roulette() {
    let (app, casino) = create_test_server(true);
    let (status, body) = send(
        &app,
        post_json("/api/v1/simulate", json!({"game": "roulette", "table": "table_2"})),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["result"]["game"], "roulette");
    assert_eq!(body["result"]["table"], "table_2");
    assert!(body["result"]["number"].as_u64().unwrap() <= 36);
    assert_eq!(casino.recent_numbers("table_2", 10).len(), 1);
}

#[tokio::test]
async fn test_simulate_unknown_table_falls_back() {
    let (app, _) = create_test_server(true);
    let (status, body) = send(
        &app,
        post_json("/api/v1/simulate", json!({"game": "poker", "table": "vip"})),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["result"]["table"], "table_1");
}

#[tokio::test]
async fn test_simulate_jackpot_uses_jackpot_id() {
    let (app, _) = create_test_server(true);
    let (status, body) = send(
        &app,
        post_json(
            "/api/v1/simulate",
            json!({"game": "jackpot", "jackpot_id": "progressive_1"}),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["result"]["jackpot_id"], "progressive_1");
    assert!(body["result"]["payouts"].as_array().unwrap().len() >= 5);
}

#[tokio::test]
async fn test_simulate_invalid_game_mutates_nothing() {
    let (app, casino) = create_test_server(true);
    let before = casino.stats();

    let (status, body) = send(
        &app,
        post_json("/api/v1/simulate", json!({"game": "craps"})),
    )
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "Invalid game");
    assert_eq!(casino.stats(), before);
}

// ============================================================================
// Prediction
// ============================================================================

#[tokio::test]
async fn test_predict_insufficient_history() {
    let (app, _) = create_test_server(true);
    let (status, body) = send(
        &app,
        post_json("/api/v1/predict", json!({"game": "roulette"})),
    )
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "Insufficient history");
    assert_eq!(
        body["message"],
        "At least 10 spins are needed for a roulette prediction"
    );
}

#[tokio::test]
async fn test_predict_roulette_after_simulation() {
    let (app, casino) = create_test_server(true);
    for _ in 0..12 {
        casino.simulate(Game::Roulette, "table_1").unwrap();
    }

    let (status, body) = send(
        &app,
        post_json("/api/v1/predict", json!({"game": "roulette", "table": "table_1"})),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["prediction"]["game"], "roulette");
    assert_eq!(body["prediction"]["spins_analyzed"], 12);
    assert!(body.get("simulated_deal").is_none());
}

#[tokio::test]
async fn test_predict_blackjack_needs_ten_cards() {
    let (app, casino) = create_test_server(true);
    // Two hands show 8 cards; three show 12.
    for _ in 0..2 {
        casino.simulate(Game::Blackjack, "table_1").unwrap();
    }
    let (status, body) = send(
        &app,
        post_json("/api/v1/predict", json!({"game": "blackjack"})),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "Insufficient cards");

    casino.simulate(Game::Blackjack, "table_1").unwrap();
    let (status, body) = send(
        &app,
        post_json("/api/v1/predict", json!({"game": "blackjack"})),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["prediction"]["game"], "blackjack");
}

#[tokio::test]
async fn test_predict_poker_returns_simulated_deal() {
    let (app, _) = create_test_server(true);
    let (status, body) = send(
        &app,
        post_json("/api/v1/predict", json!({"game": "poker", "table": "table_2"})),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["prediction"]["game"], "poker");
    assert_eq!(
        body["simulated_deal"]["player_hand"].as_array().unwrap().len(),
        2
    );
}

#[tokio::test]
async fn test_predict_jackpot_from_seeded_ledger() {
    let (app, _) = create_test_server(true);
    let (status, body) = send(
        &app,
        post_json("/api/v1/predict", json!({"game": "jackpot"})),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["prediction"]["payouts_analyzed"], 5);
}

// ============================================================================
// Chat
// ============================================================================

#[tokio::test]
async fn test_chat_empty_message_rejected() {
    let (app, _) = create_test_server(true);
    let (status, body) = send(&app, post_json("/api/v1/chat", json!({"message": "   "}))).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "Empty message");
}

#[tokio::test]
async fn test_chat_without_context() {
    let (app, _) = create_test_server(true);
    let (status, body) = send(
        &app,
        post_json("/api/v1/chat", json!({"message": "Is red due after five blacks?"})),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(
        body["response"],
        "The house edge on a single-zero wheel is 2.7%."
    );
    // Roulette was detected but table_1 has no spins yet.
    assert_eq!(body["context_detected"], false);
    assert_eq!(body["detected_game"], Value::Null);
}

#[tokio::test]
async fn test_chat_with_jackpot_context() {
    let (app, _) = create_test_server(true);
    let (status, body) = send(
        &app,
        post_json("/api/v1/chat", json!({"message": "When does the jackpot pay?"})),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["context_detected"], true);
    assert_eq!(body["detected_game"], "jackpot");
}

#[tokio::test]
async fn test_chat_backend_down_still_answers() {
    let (app, _) = create_test_server(false);
    let (status, body) = send(&app, post_json("/api/v1/chat", json!({"message": "hello"}))).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["response"], ChatError::Connection.user_message());
}

// ============================================================================
// Stats and reset
// ============================================================================

#[tokio::test]
async fn test_stats() {
    let (app, casino) = create_test_server(true);
    casino.simulate(Game::Roulette, "table_3").unwrap();

    let (status, body) = send(&app, get("/api/v1/stats")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["available_games"], 4);
    assert_eq!(body["games"]["roulette"]["stats"]["table_3"]["total_spins"], 1);
    assert_eq!(body["games"]["blackjack"]["stats"]["table_1"]["cards_remaining"], 312);
    assert_eq!(body["games"]["jackpot"]["tables"], json!(["progressive_1"]));
}

#[tokio::test]
async fn test_reset_table() {
    let (app, casino) = create_test_server(true);
    for _ in 0..5 {
        casino.simulate(Game::Roulette, "table_1").unwrap();
    }

    let (status, body) = send(&app, post("/api/v1/reset/roulette/table_1")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["success"], true);
    assert!(casino.recent_numbers("table_1", 100).is_empty());
}

#[tokio::test]
async fn test_reset_jackpot_is_refused() {
    let (app, _) = create_test_server(true);
    let (status, body) = send(&app, post("/api/v1/reset/jackpot/progressive_1")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["success"], false);
    assert_eq!(body["message"], "Progressive Jackpot pools cannot be reset");
}

#[tokio::test]
async fn test_reset_unknown_table_is_noop() {
    let (app, casino) = create_test_server(true);
    for _ in 0..3 {
        casino.simulate(Game::Roulette, "table_1").unwrap();
    }

    let (status, body) = send(&app, post("/api/v1/reset/roulette/table_9")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["success"], false);
    assert_eq!(body["message"], "No roulette table named table_9");
    assert_eq!(casino.recent_numbers("table_1", 100).len(), 3);
}

#[tokio::test]
async fn test_reset_invalid_game() {
    let (app, _) = create_test_server(true);
    let (status, _) = send(&app, post("/api/v1/reset/keno/table_1")).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}
