//! HTTP API for the casino server.
//!
//! # Modules
//!
//! - [`games`]: Catalog, tables, simulation, prediction, stats and resets
//! - [`chat`]: Natural-language questions answered by the completion backend
//! - [`request_id`]: `x-request-id` propagation and request logging
//!
//! # Endpoints Overview
//!
//! ```text
//! GET  /health                        - Server health status
//! GET  /api/v1                        - API index
//! GET  /api/v1/games                  - Game catalog
//! GET  /api/v1/tables/{game}          - Table ids for a game
//! POST /api/v1/simulate               - Play one round
//! POST /api/v1/predict                - Statistics over recent history
//! POST /api/v1/chat                   - Ask the assistant
//! GET  /api/v1/stats                  - Per-table statistics
//! POST /api/v1/reset/{game}/{table}   - Clear one table
//! ```
//!
//! # CORS
//!
//! CORS is configured permissively; the API is meant for a local front end.

pub mod chat;
pub mod games;
pub mod request_id;

use axum::{
    Json, Router,
    extract::State,
    http::StatusCode,
    response::IntoResponse,
    routing::{get, post},
};
use casino_predictor::{Casino, CasinoError, Game, chat::ChatAssistant};
use serde::Serialize;
use serde_json::json;
use std::sync::Arc;
use tower_http::cors::CorsLayer;

pub const API_NAME: &str = "Casino Predictor API";

pub const EDUCATIONAL_WARNING: &str = "Educational system. Do NOT use for real gambling";

/// Application state shared across all HTTP handlers.
///
/// Cloned per request; both fields are behind `Arc`.
#[derive(Clone)]
pub struct AppState {
    pub casino: Arc<Casino>,
    pub assistant: Arc<ChatAssistant>,
}

/// Error body returned by every failing endpoint.
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

pub type ApiError = (StatusCode, Json<ErrorResponse>);

pub(crate) fn bad_request(error: impl Into<String>, message: Option<String>) -> ApiError {
    (
        StatusCode::BAD_REQUEST,
        Json(ErrorResponse {
            error: error.into(),
            message,
        }),
    )
}

impl From<CasinoError> for ErrorResponse {
    fn from(err: CasinoError) -> Self {
        let message = match &err {
            CasinoError::InsufficientHistory { .. } => err.hint(),
            _ => Some(err.to_string()),
        };
        ErrorResponse {
            error: err.label().to_string(),
            message,
        }
    }
}

/// Every casino error reaching the HTTP layer is the caller's fault.
pub(crate) fn casino_error(err: CasinoError) -> ApiError {
    (StatusCode::BAD_REQUEST, Json(err.into()))
}

/// Parses a game path or body field; rejection happens before any state is touched.
pub(crate) fn parse_game(raw: &str) -> Result<Game, ApiError> {
    raw.parse().map_err(casino_error)
}

/// Create the complete API router with all endpoints and middleware.
///
/// # Example
///
/// ```rust,no_run
/// # use cp_server::api::{create_router, AppState};
/// # async fn example(state: AppState) -> Result<(), Box<dyn std::error::Error>> {
/// let app = create_router(state);
/// let listener = tokio::net::TcpListener::bind("127.0.0.1:5000").await?;
/// axum::serve(listener, app).await?;
/// # Ok(())
/// # }
/// ```
pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health_check))
        .nest("/api/v1", create_v1_router())
        .layer(axum::middleware::from_fn(request_id::request_id_middleware))
        .layer(CorsLayer::permissive())
        .with_state(state)
}

fn create_v1_router() -> Router<AppState> {
    Router::new()
        .route("/", get(index))
        .route("/games", get(games::list_games))
        .route("/tables/{game}", get(games::list_tables))
        .route("/simulate", post(games::simulate))
        .route("/predict", post(games::predict))
        .route("/chat", post(chat::chat))
        .route("/stats", get(games::stats))
        .route("/reset/{game}/{table}", post(games::reset_table))
}

/// API index: name, version, warning and the route map.
async fn index() -> impl IntoResponse {
    Json(json!({
        "name": API_NAME,
        "version": env!("CARGO_PKG_VERSION"),
        "warning": EDUCATIONAL_WARNING,
        "endpoints": {
            "health": "/health",
            "games": "/api/v1/games",
            "tables": "/api/v1/tables/{game}",
            "simulate": "/api/v1/simulate",
            "predict": "/api/v1/predict",
            "chat": "/api/v1/chat",
            "stats": "/api/v1/stats",
            "reset": "/api/v1/reset/{game}/{table}",
        },
    }))
}

/// Health check endpoint for monitoring and load balancers.
///
/// Always `200 OK`: the completion backend is optional, so its absence is
/// reported rather than treated as unhealthy.
///
/// ```bash
/// curl http://localhost:5000/health
/// # {"status":"ok","version":"1.0.0","chat_available":false,"tables":{"roulette":3,...},...}
/// ```
async fn health_check(State(state): State<AppState>) -> impl IntoResponse {
    let chat = state.assistant.check_connection().await;

    let tables: serde_json::Map<String, serde_json::Value> = Game::ALL
        .iter()
        .map(|&game| (game.id().to_string(), json!(state.casino.tables(game).len())))
        .collect();

    let response = json!({
        "status": "ok",
        "version": env!("CARGO_PKG_VERSION"),
        "chat_available": chat.available,
        "chat_status": chat.message,
        "tables": tables,
        "timestamp": chrono::Utc::now().to_rfc3339(),
    });

    (StatusCode::OK, Json(response))
}
