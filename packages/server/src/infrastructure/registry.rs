//! 接続レジストリ（ConnectionHub の実装）
//!
//! ## 責務
//!
//! - 生存中の接続と Identity スナップショット・送信チャネルの対応表を管理
//! - ブロードキャスト（送信者を除く全接続への配信）
//! - 配信に失敗した接続の除去（eviction）
//!
//! ## 設計ノート
//!
//! 対応表は単一の `tokio::sync::Mutex` で保護されます。配信は接続ごとの
//! unbounded チャネルへの送信なので、ロック保持中にネットワーク I/O は
//! 発生しません。送信の失敗（受信側タスクの消滅）はイテレーション中に
//! 収集し、イテレーション後に同じクリティカルセクション内で除去します。
//! この単一ロックがブロードキャスト呼び出しを直列化し、全受信者が同じ
//! メッセージ順序を観測することを保証します。

use std::collections::HashMap;

use async_trait::async_trait;
use tokio::sync::Mutex;

use crate::domain::{BroadcastOutcome, ConnectionHub, ConnectionId, Identity, SessionSender};

struct RegisteredConnection {
    identity: Identity,
    sender: SessionSender,
}

/// Mutex-guarded map of live connections implementing [`ConnectionHub`].
pub struct ConnectionRegistry {
    connections: Mutex<HashMap<ConnectionId, RegisteredConnection>>,
}

impl ConnectionRegistry {
    pub fn new() -> Self {
        Self {
            connections: Mutex::new(HashMap::new()),
        }
    }
}

impl Default for ConnectionRegistry {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl ConnectionHub for ConnectionRegistry {
    async fn register(&self, id: ConnectionId, identity: Identity, sender: SessionSender) {
        let mut connections = self.connections.lock().await;
        connections.insert(id.clone(), RegisteredConnection { identity, sender });
        tracing::debug!("connection {} registered ({} live)", id, connections.len());
    }

    async fn unregister(&self, id: &ConnectionId) -> Option<Identity> {
        let mut connections = self.connections.lock().await;
        let removed = connections.remove(id).map(|conn| conn.identity);
        if removed.is_some() {
            tracing::debug!("connection {} unregistered ({} live)", id, connections.len());
        }
        removed
    }

    async fn broadcast(&self, payload: &str, exclude: Option<&ConnectionId>) -> BroadcastOutcome {
        let mut connections = self.connections.lock().await;
        let mut outcome = BroadcastOutcome::default();
        let mut failed: Vec<ConnectionId> = Vec::new();

        for (id, connection) in connections.iter() {
            if Some(id) == exclude {
                continue;
            }
            if connection.sender.send(payload.to_string()).is_ok() {
                outcome.delivered += 1;
            } else {
                failed.push(id.clone());
            }
        }

        // Eviction is deferred to after the iteration pass; still inside
        // the critical section, so no other broadcast can interleave.
        for id in failed {
            if let Some(connection) = connections.remove(&id) {
                tracing::warn!(
                    "delivery to connection {} failed, evicting (user={})",
                    id,
                    connection.identity.display_name
                );
                outcome.evicted.push((id, connection.identity));
            }
        }

        outcome
    }

    async fn connection_count(&self) -> usize {
        self.connections.lock().await.len()
    }
}
