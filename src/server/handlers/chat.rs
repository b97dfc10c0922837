use std::sync::Arc;

use axum::extract::State;
use axum::response::IntoResponse;
use axum::Json;
use serde::Deserialize;
use serde_json::{json, Value};

use crate::chat::ChatMode;
use crate::core::errors::ApiError;
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct ChatTurnRequest {
    pub message: String,
    pub mode: ChatMode,
}

/// Lists the selectable chat modes for the UI mode picker.
pub async fn list_modes(State(_state): State<Arc<AppState>>) -> impl IntoResponse {
    let modes: Vec<Value> = ChatMode::ALL
        .iter()
        .map(|mode| json!({"id": mode.as_str(), "label": mode.label()}))
        .collect();
    Json(json!({"modes": modes}))
}

pub async fn post_chat(
    State(state): State<Arc<AppState>>,
    Json(payload): Json<ChatTurnRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let mut session = state.session.lock().await;
    let outcome = state
        .engine
        .run_turn(&mut session, payload.mode, &payload.message)
        .await?;

    Ok(Json(json!({
        "mode": payload.mode.as_str(),
        "skipped": outcome.skipped,
        "turns": outcome.turns,
        "context": outcome.context,
    })))
}
