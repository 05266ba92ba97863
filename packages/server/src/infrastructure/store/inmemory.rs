//! インメモリ MessageStore 実装
//!
//! ドメイン層が定義する MessageStore trait の具体的な実装。Vec を
//! インメモリの追記ログとして使用します。バイナリ単体での起動とテストの
//! ための実装であり、本番環境では外部のメッセージストア実装に差し替える
//! 前提です。

use async_trait::async_trait;
use tokio::sync::Mutex;
use uuid::Uuid;

use crate::domain::{MessageStore, PendingMessage, RecordId, RoomName, StoreError, StoredMessage};

/// In-memory append-only log implementing [`MessageStore`].
pub struct InMemoryMessageStore {
    messages: Mutex<Vec<StoredMessage>>,
}

impl InMemoryMessageStore {
    pub fn new() -> Self {
        Self {
            messages: Mutex::new(Vec::new()),
        }
    }

    /// Total number of records, across all rooms.
    pub async fn record_count(&self) -> usize {
        self.messages.lock().await.len()
    }
}

impl Default for InMemoryMessageStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl MessageStore for InMemoryMessageStore {
    async fn append(&self, message: &PendingMessage) -> Result<RecordId, StoreError> {
        let id = RecordId::new(Uuid::new_v4().to_string());
        let mut messages = self.messages.lock().await;
        messages.push(StoredMessage {
            id: id.clone(),
            user_id: message.user_id.clone(),
            username: message.username.clone(),
            room: message.room.clone(),
            text: message.text.clone(),
            timestamp: message.timestamp,
        });
        Ok(id)
    }

    async fn history(
        &self,
        room: &RoomName,
        limit: usize,
    ) -> Result<Vec<StoredMessage>, StoreError> {
        let messages = self.messages.lock().await;
        let mut selected: Vec<StoredMessage> = messages
            .iter()
            .filter(|message| &message.room == room)
            .cloned()
            .collect();
        // Oldest first; stable sort keeps insertion order for equal stamps.
        selected.sort_by_key(|message| message.timestamp);
        selected.truncate(limit);
        Ok(selected)
    }
}
