// SPDX-FileCopyrightText: 2026 Parley Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Conversation store: the append-only transcript per chat room.

use std::sync::Arc;

use chrono::Utc;
use parley_core::types::{ChatRole, Message};
use parley_core::{ParleyError, StorageAdapter};
use uuid::Uuid;

/// Records and replays a chat room's transcript.
#[derive(Clone)]
pub struct ConversationLog {
    storage: Arc<dyn StorageAdapter>,
}

impl ConversationLog {
    pub fn new(storage: Arc<dyn StorageAdapter>) -> Self {
        Self { storage }
    }

    /// Appends one turn. Messages that trim to empty are dropped silently;
    /// repeated identical calls append repeated rows.
    pub async fn record(
        &self,
        chat_room_id: &str,
        message: &str,
        role: ChatRole,
    ) -> Result<(), ParleyError> {
        if message.trim().is_empty() {
            return Ok(());
        }
        self.storage
            .append_message(&Message {
                id: Uuid::new_v4().to_string(),
                chat_room_id: chat_room_id.to_string(),
                role,
                content: message.to_string(),
                created_at: Utc::now().to_rfc3339(),
            })
            .await
    }

    /// The room's transcript in creation order.
    pub async fn history(&self, chat_room_id: &str) -> Result<Vec<Message>, ParleyError> {
        self.storage.messages_for_room(chat_room_id).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use parley_test_utils::StorageFixture;

    async fn room_fixture() -> (StorageFixture, ConversationLog, String) {
        let fixture = StorageFixture::new().await.unwrap();
        let record = fixture
            .storage
            .create_customer(&fixture.domain_id, "bob@x.com", &[])
            .await
            .unwrap();
        let log = ConversationLog::new(fixture.storage.clone());
        (fixture, log, record.chat_room.id)
    }

    #[tokio::test]
    async fn blank_messages_are_not_persisted() {
        let (_fixture, log, room) = room_fixture().await;
        log.record(&room, "", ChatRole::User).await.unwrap();
        log.record(&room, "   \n\t", ChatRole::User).await.unwrap();
        assert!(log.history(&room).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn identical_records_append_twice() {
        let (_fixture, log, room) = room_fixture().await;
        log.record(&room, "hello", ChatRole::User).await.unwrap();
        log.record(&room, "hello", ChatRole::User).await.unwrap();
        assert_eq!(log.history(&room).await.unwrap().len(), 2);
    }

    #[tokio::test]
    async fn history_preserves_order_and_roles() {
        let (_fixture, log, room) = room_fixture().await;
        log.record(&room, "question", ChatRole::User).await.unwrap();
        log.record(&room, "answer", ChatRole::Assistant).await.unwrap();
        let history = log.history(&room).await.unwrap();
        assert_eq!(history[0].content, "question");
        assert_eq!(history[1].role, ChatRole::Assistant);
    }
}
