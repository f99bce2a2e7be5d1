//! Chat endpoint.
//!
//! When the question mentions a game with enough history on its default
//! table, the current prediction is attached to the prompt as context.

use axum::{Json, extract::State};
use casino_predictor::{Game, chat::prediction_context};
use serde::{Deserialize, Serialize};

use super::{ApiError, AppState, bad_request, request_id::RequestId};
use crate::metrics;

#[derive(Debug, Deserialize)]
pub struct ChatRequest {
    #[serde(default)]
    pub message: String,
}

#[derive(Debug, Serialize)]
pub struct ChatResponse {
    pub response: String,
    pub context_detected: bool,
    pub detected_game: Option<Game>,
}

/// Answer a question. Backend failures come back as readable text with
/// `200 OK`; only an empty message is rejected.
///
/// # Errors
///
/// - `400 Bad Request`: empty or whitespace-only message
pub async fn chat(
    State(state): State<AppState>,
    request_id: RequestId,
    Json(request): Json<ChatRequest>,
) -> Result<Json<ChatResponse>, ApiError> {
    let message = request.message.trim();
    if message.is_empty() {
        metrics::chat_requests_total("rejected");
        return Err(bad_request("Empty message", None));
    }

    let context = prediction_context(&state.casino, message);
    let detected_game = context.as_ref().map(|prediction| prediction.game());
    tracing::debug!(
        request_id = request_id.as_str(),
        detected_game = ?detected_game,
        "Answering chat message"
    );

    let response = state.assistant.respond(message, context.as_ref()).await;
    metrics::chat_requests_total("answered");

    Ok(Json(ChatResponse {
        response,
        context_detected: detected_game.is_some(),
        detected_game,
    }))
}
