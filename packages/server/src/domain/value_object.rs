//! Value objects shared across the chat core.

use ecrire_shared::time::timestamp_to_rfc3339;
use uuid::Uuid;

/// Display name used for sessions without a validated credential.
pub const GUEST_NAME: &str = "Invité";

/// Sender name of synthetic system announcements (join/leave).
pub const SERVER_NAME: &str = "Serveur";

/// Room label used when a client does not specify one.
pub const DEFAULT_ROOM: &str = "general";

/// Opaque handle identifying one live connection.
///
/// Generated at handshake time and never reused after the connection is
/// destroyed.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ConnectionId(Uuid);

impl ConnectionId {
    /// Generate a fresh connection id.
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for ConnectionId {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Display for ConnectionId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A room label partitioning persisted history (and display).
///
/// Fan-out is not partitioned by room; the label travels with messages
/// as metadata.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct RoomName(String);

impl RoomName {
    /// Create a room name; blank input falls back to the default room.
    pub fn new(name: &str) -> Self {
        let trimmed = name.trim();
        if trimmed.is_empty() {
            Self(DEFAULT_ROOM.to_string())
        } else {
            Self(trimmed.to_string())
        }
    }

    /// Resolve an optional client-supplied room to an effective one.
    pub fn or_default(name: Option<&str>) -> Self {
        Self::new(name.unwrap_or(""))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_string(self) -> String {
        self.0
    }
}

impl Default for RoomName {
    fn default() -> Self {
        Self(DEFAULT_ROOM.to_string())
    }
}

impl std::fmt::Display for RoomName {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// Unix timestamp in UTC milliseconds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct Timestamp(i64);

impl Timestamp {
    pub fn new(millis: i64) -> Self {
        Self(millis)
    }

    pub fn value(&self) -> i64 {
        self.0
    }

    /// Render as the wire format: RFC 3339, UTC, second precision.
    pub fn to_rfc3339(&self) -> String {
        timestamp_to_rfc3339(self.0)
    }
}

/// Immutable identity snapshot captured once per connection.
///
/// A connection's identity does not change mid-session even if the
/// credential it was derived from later expires.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Identity {
    /// Stable identifier in the external user system; `None` for guests.
    pub user_id: Option<String>,
    pub display_name: String,
    pub authenticated: bool,
}

impl Identity {
    /// Identity of a session whose credentials validated.
    pub fn authenticated(user_id: Option<String>, display_name: impl Into<String>) -> Self {
        Self {
            user_id,
            display_name: display_name.into(),
            authenticated: true,
        }
    }

    /// Identity of a session with no (valid) credential.
    pub fn anonymous() -> Self {
        Self {
            user_id: None,
            display_name: GUEST_NAME.to_string(),
            authenticated: false,
        }
    }

    pub fn is_anonymous(&self) -> bool {
        !self.authenticated
    }

    /// Determine the sender name attached to an outgoing message.
    ///
    /// The resolved display name wins; a client-supplied name is honoured
    /// only for anonymous sessions, and a blank one falls back to the
    /// guest name.
    pub fn effective_sender_name(&self, client_supplied: Option<&str>) -> String {
        if self.authenticated && !self.display_name.is_empty() {
            return self.display_name.clone();
        }
        match client_supplied.map(str::trim) {
            Some(name) if !name.is_empty() => name.to_string(),
            _ => GUEST_NAME.to_string(),
        }
    }
}
