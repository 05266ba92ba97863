//! Domain layer: value objects, entities, and the trait boundaries the
//! chat core depends on.
//!
//! The traits follow dependency inversion: the domain defines what it
//! needs (identity resolution, durable storage, connection fan-out) and
//! the infrastructure layer provides the implementations.

mod entity;
mod hub;
mod identity;
mod store;
mod value_object;

pub use entity::{ChatMessage, PendingMessage};
pub use hub::{BroadcastOutcome, ConnectionHub, SessionSender};
pub use identity::{IdentityResolver, InvalidCredential};
pub use store::{
    HISTORY_DEFAULT_LIMIT, HISTORY_MAX_LIMIT, MessageStore, RecordId, StoreError, StoredMessage,
    effective_history_limit,
};
#[cfg(test)]
pub use store::MockMessageStore;
pub use value_object::{
    ConnectionId, DEFAULT_ROOM, GUEST_NAME, Identity, RoomName, SERVER_NAME, Timestamp,
};
