//! HTTP API shapes.

use serde::{Deserialize, Serialize};

/// Query parameters of the history endpoint.
#[derive(Debug, Deserialize)]
pub struct HistoryQuery {
    #[serde(default)]
    pub room: Option<String>,
    #[serde(default)]
    pub limit: Option<usize>,
}

/// One persisted message as served by the history endpoint.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StoredMessageDto {
    pub id: String,
    pub username: String,
    pub text: String,
    pub timestamp: String,
    pub room: String,
}
