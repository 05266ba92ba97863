//! UseCase: セッション切断処理
//!
//! 接続をレジストリから削除し、残りの参加者に退室アナウンスを
//! ブロードキャストします。既に除去済みの接続（配信失敗による eviction
//! など）に対しては何もせず、アナウンスも流しません。

use std::sync::Arc;

use ecrire_shared::time::Clock;

use crate::domain::{ChatMessage, ConnectionHub, ConnectionId, Identity, Timestamp};
use crate::infrastructure::dto::websocket::OutboundFrame;

/// Removes a connection and announces the departure.
pub struct DisconnectSessionUseCase {
    hub: Arc<dyn ConnectionHub>,
    clock: Arc<dyn Clock>,
}

impl DisconnectSessionUseCase {
    pub fn new(hub: Arc<dyn ConnectionHub>, clock: Arc<dyn Clock>) -> Self {
        Self { hub, clock }
    }

    /// Unregister the connection and broadcast the leave announcement to
    /// the remaining participants.
    ///
    /// Returns the identity the connection was registered with; removing
    /// a connection that is not registered returns the anonymous
    /// identity and mutates nothing.
    pub async fn execute(&self, id: &ConnectionId) -> Identity {
        let Some(identity) = self.hub.unregister(id).await else {
            return Identity::anonymous();
        };

        let timestamp = Timestamp::new(self.clock.now_utc_millis());
        let announcement = ChatMessage::leave_announcement(&identity.display_name, timestamp);
        let payload = serde_json::to_string(&OutboundFrame::from(&announcement))
            .expect("announcement frame is always serializable");

        let outcome = self.hub.broadcast(&payload, None).await;
        tracing::info!(
            "'{}' left, announced to {} connection(s)",
            identity.display_name,
            outcome.delivered
        );
        identity
    }
}
