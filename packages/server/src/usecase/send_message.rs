//! UseCase: メッセージ送信処理
//!
//! ## テスト実装の作業記録
//!
//! ### 何をテストしているか
//! - SendMessageUseCase::execute() メソッド
//! - 送信者名の決定（認証済み Identity 優先、匿名時のみクライアント指定名）
//! - 送信者を除外したブロードキャストと、永続化キューへの best-effort 投入
//!
//! ### なぜこのテストが必要か
//! - リアルタイム配信と永続化の分離（キュー満杯でも配信は成功する）を保証
//! - room 未指定時のデフォルト解決とサーバー側タイムスタンプの付与を確認
//!
//! ### どのような状況を想定しているか
//! - 正常系: ブロードキャストと永続化の両方が成功
//! - 異常系: キュー満杯でメッセージがドロップされる（配信は影響を受けない）

use std::sync::Arc;

use ecrire_shared::time::Clock;

use crate::domain::{
    ChatMessage, ConnectionHub, ConnectionId, Identity, PendingMessage, RoomName, Timestamp,
};
use crate::infrastructure::PersistenceWorker;
use crate::infrastructure::dto::websocket::{InboundFrame, OutboundFrame};

/// What happened to one submitted message.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SendOutcome {
    /// Number of peers the message was delivered to.
    pub delivered: usize,
    /// Whether the message was accepted by the persistence queue.
    pub enqueued: bool,
}

/// Fans a submitted message out to peers and queues it for storage.
pub struct SendMessageUseCase {
    hub: Arc<dyn ConnectionHub>,
    persistence: Arc<PersistenceWorker>,
    clock: Arc<dyn Clock>,
}

impl SendMessageUseCase {
    pub fn new(
        hub: Arc<dyn ConnectionHub>,
        persistence: Arc<PersistenceWorker>,
        clock: Arc<dyn Clock>,
    ) -> Self {
        Self {
            hub,
            persistence,
            clock,
        }
    }

    /// Broadcast one inbound frame to every connection except the
    /// sender, then enqueue it for persistence.
    ///
    /// A full persistence queue never affects delivery; the drop is
    /// logged and reported through [`SendOutcome::enqueued`].
    pub async fn execute(
        &self,
        sender_id: &ConnectionId,
        identity: &Identity,
        frame: InboundFrame,
    ) -> SendOutcome {
        let room = RoomName::or_default(frame.room.as_deref());
        let timestamp = Timestamp::new(self.clock.now_utc_millis());
        let message = ChatMessage::from_client(
            identity,
            frame.username.as_deref(),
            frame.text,
            room,
            timestamp,
        );

        let payload = serde_json::to_string(&OutboundFrame::from(&message))
            .expect("chat frame is always serializable");
        let outcome = self.hub.broadcast(&payload, Some(sender_id)).await;

        let enqueued = match self.persistence.try_enqueue(PendingMessage::from(&message)) {
            Ok(()) => true,
            Err(_) => {
                tracing::warn!(
                    "persist queue full: dropping message from user={}",
                    message.username
                );
                false
            }
        };

        SendOutcome {
            delivered: outcome.delivered,
            enqueued,
        }
    }
}
