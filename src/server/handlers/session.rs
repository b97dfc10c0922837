use std::sync::Arc;

use axum::extract::State;
use axum::response::IntoResponse;
use axum::Json;
use serde_json::json;

use crate::state::AppState;

/// Clears every mode's history and starts a fresh session id.
pub async fn reset_session(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    let mut session = state.session.lock().await;
    session.reset();

    tracing::info!(session_id = %session.id, "session reset");

    Json(json!({
        "status": "reset",
        "session_id": session.id.to_string(),
    }))
}
