//! Asynchronous, best-effort message persistence.
//!
//! A single background task drains a bounded queue into the message
//! store so storage latency never slows down real-time delivery.
//! Enqueueing never blocks: a full queue rejects the item, and the drop
//! is logged and counted. Store failures are logged and not retried
//! (at-most-once persistence).

use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;

use thiserror::Error;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;

use crate::domain::{MessageStore, PendingMessage};

/// Tuning knobs of the persistence pipeline.
#[derive(Debug, Clone, Copy)]
pub struct PersistenceConfig {
    /// Maximum number of queued messages; bounds memory under store
    /// slowness and defines the backpressure point.
    pub queue_capacity: usize,
    /// Upper bound for one store write; a stalled store blocks the
    /// worker for at most this long.
    pub write_timeout: Duration,
}

impl Default for PersistenceConfig {
    fn default() -> Self {
        Self {
            queue_capacity: 1000,
            write_timeout: Duration::from_secs(3),
        }
    }
}

/// Rejection returned by [`PersistenceWorker::try_enqueue`] when the
/// queue is at capacity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[error("persistence queue is full")]
pub struct QueueFull;

/// Owns the persistence queue and the background task draining it.
///
/// Constructed once at process start; there is no lazy global
/// initialization. Dropping the worker without calling
/// [`PersistenceWorker::shutdown`] leaves already-accepted messages to
/// the fate of the process, which is consistent with best-effort
/// semantics.
pub struct PersistenceWorker {
    queue: mpsc::Sender<PendingMessage>,
    dropped: AtomicU64,
    worker: JoinHandle<()>,
}

impl PersistenceWorker {
    /// Spawn the background consumer and return the handle owning it.
    pub fn start(store: Arc<dyn MessageStore>, config: PersistenceConfig) -> Self {
        let (queue, mut receiver) = mpsc::channel::<PendingMessage>(config.queue_capacity);
        let write_timeout = config.write_timeout;

        let worker = tokio::spawn(async move {
            while let Some(message) = receiver.recv().await {
                match tokio::time::timeout(write_timeout, store.append(&message)).await {
                    Ok(Ok(record_id)) => {
                        tracing::debug!(
                            "message from '{}' persisted with id {}",
                            message.username,
                            record_id.as_str()
                        );
                    }
                    Ok(Err(e)) => {
                        tracing::warn!("persist message failed: {}", e);
                    }
                    Err(_) => {
                        tracing::warn!(
                            "persist message timed out after {:?}, dropping write",
                            write_timeout
                        );
                    }
                }
            }
            tracing::debug!("persistence worker stopped");
        });

        Self {
            queue,
            dropped: AtomicU64::new(0),
            worker,
        }
    }

    /// Queue a message for storage without ever blocking the caller.
    ///
    /// Returns [`QueueFull`] when the queue is at capacity; the message
    /// is dropped and the drop counter incremented.
    pub fn try_enqueue(&self, message: PendingMessage) -> Result<(), QueueFull> {
        self.queue.try_send(message).map_err(|_| {
            self.dropped.fetch_add(1, Ordering::Relaxed);
            QueueFull
        })
    }

    /// Number of messages dropped because the queue was full.
    pub fn dropped_count(&self) -> u64 {
        self.dropped.load(Ordering::Relaxed)
    }

    /// Close the queue, drain already-accepted messages, and join the
    /// worker task.
    pub async fn shutdown(self) {
        let Self { queue, worker, .. } = self;
        drop(queue);
        if let Err(e) = worker.await {
            tracing::warn!("persistence worker terminated abnormally: {}", e);
        }
    }
}
