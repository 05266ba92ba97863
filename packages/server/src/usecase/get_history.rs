//! UseCase: 履歴取得処理
//!
//! room とページサイズを解決し、MessageStore から古い順の履歴を
//! 取得します。範囲外の limit はデフォルト値に戻します。

use std::sync::Arc;

use thiserror::Error;

use crate::domain::{MessageStore, RoomName, StoreError, StoredMessage, effective_history_limit};

/// Failure of a history query; mapped to an HTTP error by the UI layer.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum GetHistoryError {
    #[error("message store failed: {0}")]
    Store(#[from] StoreError),
}

/// Serves the bounded, oldest-first history of one room.
pub struct GetHistoryUseCase {
    store: Arc<dyn MessageStore>,
}

impl GetHistoryUseCase {
    pub fn new(store: Arc<dyn MessageStore>) -> Self {
        Self { store }
    }

    /// Fetch up to `limit` messages of `room`, oldest first.
    pub async fn execute(
        &self,
        room: Option<&str>,
        limit: Option<usize>,
    ) -> Result<Vec<StoredMessage>, GetHistoryError> {
        let room = RoomName::or_default(room);
        let limit = effective_history_limit(limit);
        let records = self.store.history(&room, limit).await?;
        Ok(records)
    }
}
