//! Chat message entities.
//!
//! A message exists in two representations: the wire form broadcast to
//! peers immediately ([`ChatMessage`]) and the store form queued for
//! asynchronous persistence ([`PendingMessage`]). Both are immutable
//! once created.

use super::value_object::{Identity, RoomName, SERVER_NAME, Timestamp};

/// A chat message at the moment a client submitted it (wire form).
#[derive(Debug, Clone, PartialEq)]
pub struct ChatMessage {
    /// Effective sender name (resolved identity or client fallback).
    pub username: String,
    pub text: String,
    pub room: RoomName,
    /// Server-side timestamp, stamped at submission.
    pub timestamp: Timestamp,
    /// Stable user id of the sender; `None` for guests and announcements.
    pub sender_user_id: Option<String>,
}

impl ChatMessage {
    /// Build a message from a client frame.
    ///
    /// The sender name follows the identity's precedence rule; the
    /// timestamp is the server's, never the client's.
    pub fn from_client(
        identity: &Identity,
        client_username: Option<&str>,
        text: String,
        room: RoomName,
        timestamp: Timestamp,
    ) -> Self {
        Self {
            username: identity.effective_sender_name(client_username),
            text,
            room,
            timestamp,
            sender_user_id: identity.user_id.clone(),
        }
    }

    /// Build a synthetic system announcement from "Serveur".
    pub fn announcement(text: String, timestamp: Timestamp) -> Self {
        Self {
            username: SERVER_NAME.to_string(),
            text,
            room: RoomName::default(),
            timestamp,
            sender_user_id: None,
        }
    }

    /// Announcement broadcast when a session becomes active.
    pub fn join_announcement(display_name: &str, timestamp: Timestamp) -> Self {
        Self::announcement(format!("{} a rejoint le salon.", display_name), timestamp)
    }

    /// Announcement broadcast when a session closes.
    pub fn leave_announcement(display_name: &str, timestamp: Timestamp) -> Self {
        Self::announcement(format!("{} a quitté le salon.", display_name), timestamp)
    }
}

/// Store-form copy of a [`ChatMessage`] queued for persistence.
///
/// Queuing is best-effort: when the persistence queue is full the item
/// is dropped, and the drop is logged and counted.
#[derive(Debug, Clone, PartialEq)]
pub struct PendingMessage {
    pub user_id: Option<String>,
    pub username: String,
    pub room: RoomName,
    pub text: String,
    pub timestamp: Timestamp,
}

impl From<&ChatMessage> for PendingMessage {
    fn from(message: &ChatMessage) -> Self {
        Self {
            user_id: message.sender_user_id.clone(),
            username: message.username.clone(),
            room: message.room.clone(),
            text: message.text.clone(),
            timestamp: message.timestamp,
        }
    }
}
