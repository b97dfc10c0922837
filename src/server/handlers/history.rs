use std::sync::Arc;

use axum::extract::{Path, State};
use axum::http::header;
use axum::response::IntoResponse;
use axum::Json;
use serde_json::json;

use crate::chat::ChatMode;
use crate::core::errors::ApiError;
use crate::state::AppState;

fn parse_mode(raw: &str) -> Result<ChatMode, ApiError> {
    raw.parse::<ChatMode>()
        .map_err(|_| ApiError::NotFound(format!("unknown mode: {raw}")))
}

pub async fn get_history(
    State(state): State<Arc<AppState>>,
    Path(mode): Path<String>,
) -> Result<impl IntoResponse, ApiError> {
    let mode = parse_mode(&mode)?;
    let session = state.session.lock().await;

    let mut payload = json!({
        "mode": mode.as_str(),
        "turns": session.history(mode),
    });

    // RAG history carries the documents retrieved by the latest turn so the
    // UI can restore its context panel.
    if mode == ChatMode::Rag {
        if let Some(obj) = payload.as_object_mut() {
            obj.insert("context".to_string(), json!(session.last_context()));
        }
    }

    Ok(Json(payload))
}

/// Returns the mode's history flattened to plain text, one line per turn,
/// as a download for the UI export button.
pub async fn export_history(
    State(state): State<Arc<AppState>>,
    Path(mode): Path<String>,
) -> Result<impl IntoResponse, ApiError> {
    let mode = parse_mode(&mode)?;
    let session = state.session.lock().await;
    let text = session.export(mode);

    Ok((
        [
            (
                header::CONTENT_TYPE,
                "text/plain; charset=utf-8".to_string(),
            ),
            (
                header::CONTENT_DISPOSITION,
                format!("attachment; filename=\"chat_history_{}.txt\"", mode.as_str()),
            ),
        ],
        text,
    ))
}
