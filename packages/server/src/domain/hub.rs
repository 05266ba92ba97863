//! Connection hub trait: the fan-out boundary the use cases depend on.
//!
//! The concrete implementation (`infrastructure::ConnectionRegistry`)
//! owns the map of live connections; use cases only see this trait, and
//! tests substitute recording mocks for it.

use async_trait::async_trait;
use tokio::sync::mpsc;

use super::value_object::{ConnectionId, Identity};

/// Channel used to push serialized frames to one connection's writer task.
pub type SessionSender = mpsc::UnboundedSender<String>;

/// Result of one broadcast call.
#[derive(Debug, Default)]
pub struct BroadcastOutcome {
    /// Number of recipients the frame was handed to.
    pub delivered: usize,
    /// Connections whose delivery failed and that were removed.
    pub evicted: Vec<(ConnectionId, Identity)>,
}

/// Registry of live connections plus fan-out over them.
///
/// `register`/`unregister` are idempotent with respect to the same
/// connection handle. `broadcast` attempts delivery independently per
/// recipient: a failed recipient is evicted and never aborts delivery to
/// the rest. A single internal critical section serializes broadcasts,
/// so the order of sequential `broadcast` calls is the order every
/// recipient observes.
#[async_trait]
pub trait ConnectionHub: Send + Sync {
    /// Register a connection with its immutable identity snapshot.
    async fn register(&self, id: ConnectionId, identity: Identity, sender: SessionSender);

    /// Remove a connection, returning the identity it was registered
    /// with, or `None` if it was not (or no longer) registered.
    async fn unregister(&self, id: &ConnectionId) -> Option<Identity>;

    /// Deliver `payload` to every registered connection except `exclude`.
    async fn broadcast(&self, payload: &str, exclude: Option<&ConnectionId>) -> BroadcastOutcome;

    /// Number of currently registered connections.
    async fn connection_count(&self) -> usize;
}
