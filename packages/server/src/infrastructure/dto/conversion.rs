//! Conversion logic between DTOs and domain entities.

use crate::domain::{ChatMessage, StoredMessage};
use crate::infrastructure::dto::http::StoredMessageDto;
use crate::infrastructure::dto::websocket::OutboundFrame;

// ========================================
// Domain Entity → DTO
// ========================================

impl From<&ChatMessage> for OutboundFrame {
    fn from(message: &ChatMessage) -> Self {
        Self {
            username: message.username.clone(),
            text: message.text.clone(),
            timestamp: message.timestamp.to_rfc3339(),
            room: message.room.as_str().to_string(),
        }
    }
}

impl From<&StoredMessage> for StoredMessageDto {
    fn from(record: &StoredMessage) -> Self {
        Self {
            id: record.id.as_str().to_string(),
            username: record.username.clone(),
            text: record.text.clone(),
            timestamp: record.timestamp.to_rfc3339(),
            room: record.room.as_str().to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{Identity, RecordId, RoomName, Timestamp};

    #[test]
    fn test_chat_message_to_outbound_frame() {
        // テスト項目: ChatMessage がワイヤ形式の送信フレームに変換される
        // given (前提条件):
        let identity = Identity::authenticated(Some("u-1".to_string()), "alice");
        let message = ChatMessage::from_client(
            &identity,
            None,
            "hi".to_string(),
            RoomName::new("general"),
            Timestamp::new(1672531200000),
        );

        // when (操作):
        let frame = OutboundFrame::from(&message);

        // then (期待する結果):
        assert_eq!(frame.username, "alice");
        assert_eq!(frame.text, "hi");
        assert_eq!(frame.timestamp, "2023-01-01T00:00:00Z");
        assert_eq!(frame.room, "general");
    }

    #[test]
    fn test_stored_message_to_dto() {
        // テスト項目: StoredMessage が履歴レスポンスの DTO に変換される
        // given (前提条件):
        let record = StoredMessage {
            id: RecordId::new("rec-1"),
            user_id: Some("u-1".to_string()),
            username: "alice".to_string(),
            room: RoomName::new("general"),
            text: "hello".to_string(),
            timestamp: Timestamp::new(1672531200000),
        };

        // when (操作):
        let dto = StoredMessageDto::from(&record);

        // then (期待する結果):
        assert_eq!(dto.id, "rec-1");
        assert_eq!(dto.username, "alice");
        assert_eq!(dto.text, "hello");
        assert_eq!(dto.timestamp, "2023-01-01T00:00:00Z");
        assert_eq!(dto.room, "general");
    }
}
