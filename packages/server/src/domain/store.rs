//! Message store boundary.
//!
//! The durable, append-only log of messages lives in an external system;
//! the core depends on this trait only. Writes go through the
//! persistence worker (best-effort, at-most-once); reads serve the
//! history endpoint.

use async_trait::async_trait;
use thiserror::Error;

use super::entity::PendingMessage;
use super::value_object::{RoomName, Timestamp};

/// History page size when the client does not ask for one.
pub const HISTORY_DEFAULT_LIMIT: usize = 100;

/// Upper bound a client may request for one history page.
pub const HISTORY_MAX_LIMIT: usize = 500;

/// Store-assigned identifier of a persisted message.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct RecordId(String);

impl RecordId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_string(self) -> String {
        self.0
    }
}

/// A message as returned from the store.
#[derive(Debug, Clone, PartialEq)]
pub struct StoredMessage {
    pub id: RecordId,
    pub user_id: Option<String>,
    pub username: String,
    pub room: RoomName,
    pub text: String,
    pub timestamp: Timestamp,
}

/// Failure of a store operation. Never surfaced to chat clients; writes
/// are logged and dropped, reads map to an HTTP error.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum StoreError {
    #[error("message store unavailable: {0}")]
    Unavailable(String),
    #[error("message store operation timed out")]
    Timeout,
}

/// Resolve the history page size actually queried.
///
/// Out-of-range requests (0, or above the maximum) fall back to the
/// default rather than clamping.
pub fn effective_history_limit(requested: Option<usize>) -> usize {
    match requested {
        Some(n) if (1..=HISTORY_MAX_LIMIT).contains(&n) => n,
        _ => HISTORY_DEFAULT_LIMIT,
    }
}

/// Append-only durable log of messages keyed by room.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait MessageStore: Send + Sync {
    /// Durably append one message record.
    async fn append(&self, message: &PendingMessage) -> Result<RecordId, StoreError>;

    /// Bounded, time-ordered retrieval for one room, oldest first.
    async fn history(&self, room: &RoomName, limit: usize)
    -> Result<Vec<StoredMessage>, StoreError>;
}
