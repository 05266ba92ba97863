//! HTTP API endpoint handlers.

use std::sync::Arc;

use axum::{
    Json,
    extract::{Query, State},
    http::StatusCode,
};

use crate::infrastructure::dto::http::{HistoryQuery, StoredMessageDto};
use crate::ui::state::AppState;
use crate::usecase::GetHistoryError;

/// Serve the stored history of one room, oldest first.
pub async fn get_messages(
    State(state): State<Arc<AppState>>,
    Query(query): Query<HistoryQuery>,
) -> Result<Json<Vec<StoredMessageDto>>, StatusCode> {
    match state
        .get_history
        .execute(query.room.as_deref(), query.limit)
        .await
    {
        Ok(records) => Ok(Json(records.iter().map(StoredMessageDto::from).collect())),
        Err(GetHistoryError::Store(e)) => {
            tracing::error!("history query failed: {}", e);
            Err(StatusCode::INTERNAL_SERVER_ERROR)
        }
    }
}

/// Health check endpoint
pub async fn health_check() -> Json<serde_json::Value> {
    Json(serde_json::json!({"status": "ok"}))
}
