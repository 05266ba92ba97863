//! WebSocket frame shapes.

use serde::{Deserialize, Serialize};

/// Frame a client submits: `{text, room?, username?}`.
///
/// `username` is only honoured for anonymous sessions; the resolved
/// identity wins otherwise.
#[derive(Debug, Clone, Deserialize)]
pub struct InboundFrame {
    pub text: String,
    #[serde(default)]
    pub room: Option<String>,
    #[serde(default)]
    pub username: Option<String>,
}

/// Frame sent to peers: `{username, text, timestamp, room}` with an
/// RFC 3339 UTC timestamp.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OutboundFrame {
    pub username: String,
    pub text: String,
    pub timestamp: String,
    pub room: String,
}
