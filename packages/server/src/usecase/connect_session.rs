//! UseCase: セッション接続処理
//!
//! 接続をレジストリに登録し、既存の参加者全員に入室アナウンスを
//! ブロードキャストします。アナウンスは新規参加者自身には送られません
//! （参加者リストの初期化はクライアント側の責務）。

use std::sync::Arc;

use ecrire_shared::time::Clock;

use crate::domain::{ChatMessage, ConnectionHub, ConnectionId, Identity, SessionSender, Timestamp};
use crate::infrastructure::dto::websocket::OutboundFrame;

/// Registers a new connection and announces it to the room.
pub struct ConnectSessionUseCase {
    hub: Arc<dyn ConnectionHub>,
    clock: Arc<dyn Clock>,
}

impl ConnectSessionUseCase {
    pub fn new(hub: Arc<dyn ConnectionHub>, clock: Arc<dyn Clock>) -> Self {
        Self { hub, clock }
    }

    /// Register the connection with its identity snapshot and broadcast
    /// the join announcement to everyone already present.
    pub async fn execute(&self, id: ConnectionId, identity: Identity, sender: SessionSender) {
        self.hub
            .register(id.clone(), identity.clone(), sender)
            .await;

        let timestamp = Timestamp::new(self.clock.now_utc_millis());
        let announcement = ChatMessage::join_announcement(&identity.display_name, timestamp);
        let payload = serde_json::to_string(&OutboundFrame::from(&announcement))
            .expect("announcement frame is always serializable");

        let outcome = self.hub.broadcast(&payload, Some(&id)).await;
        tracing::info!(
            "'{}' joined, announced to {} connection(s)",
            identity.display_name,
            outcome.delivered
        );
    }
}
