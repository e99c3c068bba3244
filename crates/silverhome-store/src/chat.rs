//! Operations on chat rooms and their messages.
//!
//! Rooms keep a denormalized `last_message`/`last_message_time` summary.
//! Posting a message appends to the message collection and refreshes the
//! summary inside one document save, so the two can never be observed out
//! of step.

use chrono::Utc;
use tracing::info;

use silverhome_shared::ids::new_id;

use crate::document::Store;
use crate::error::{require_non_empty, Result, StoreError};
use crate::models::{ChatMessage, ChatRoom};

impl Store {
    /// Create a chat room with the given participants.
    pub fn create_chat_room(&self, name: &str, participants: &[String]) -> Result<ChatRoom> {
        require_non_empty("room name", name)?;
        if participants.len() < 2 {
            return Err(StoreError::Validation(
                "a chat room needs at least two participants".to_string(),
            ));
        }

        let mut doc = self.load();
        for id in participants {
            if doc.user(id).is_none() {
                return Err(StoreError::NotFound(format!("user {id}")));
            }
        }

        let room = ChatRoom {
            id: new_id("room"),
            name: name.to_string(),
            participants: participants.to_vec(),
            created_at: Utc::now(),
            last_message: None,
            last_message_time: None,
        };
        doc.chat_rooms.push(room.clone());
        self.save(&mut doc)?;

        info!(room_id = %room.id, participants = room.participants.len(), "chat room created");
        Ok(room)
    }

    /// Post a message to a room the sender belongs to.
    pub fn post_chat_message(
        &self,
        room_id: &str,
        sender_id: &str,
        sender_name: &str,
        content: &str,
    ) -> Result<ChatMessage> {
        require_non_empty("message content", content)?;

        let mut doc = self.load();
        let room = doc
            .chat_rooms
            .iter_mut()
            .find(|r| r.id == room_id)
            .ok_or_else(|| StoreError::NotFound(format!("chat room {room_id}")))?;
        if !room.participants.iter().any(|p| p == sender_id) {
            return Err(StoreError::Forbidden(format!(
                "user {sender_id} is not a participant of room {room_id}"
            )));
        }

        let message = ChatMessage {
            id: new_id("msg"),
            room_id: room_id.to_string(),
            sender_id: sender_id.to_string(),
            sender_name: sender_name.to_string(),
            content: content.to_string(),
            timestamp: Utc::now(),
        };

        room.last_message = Some(message.content.clone());
        room.last_message_time = Some(message.timestamp);
        doc.chat_messages.push(message.clone());
        self.save(&mut doc)?;

        info!(room_id, sender_id, "chat message posted");
        Ok(message)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::query::messages_for_room;

    fn demo_room(store: &Store) -> ChatRoom {
        store
            .create_chat_room(
                "203 family chat",
                &["user-resident".to_string(), "user-family".to_string()],
            )
            .unwrap()
    }

    #[test]
    fn empty_content_is_rejected() {
        let store = Store::in_memory();
        let room = demo_room(&store);
        let err = store
            .post_chat_message(&room.id, "user-resident", "Kim Young-soo", " ")
            .unwrap_err();
        assert!(matches!(err, StoreError::Validation(_)));
    }

    #[test]
    fn non_participant_cannot_post() {
        let store = Store::in_memory();
        let room = demo_room(&store);
        let err = store
            .post_chat_message(&room.id, "user-admin", "Facility Manager", "hello")
            .unwrap_err();
        assert!(matches!(err, StoreError::Forbidden(_)));
    }

    #[test]
    fn room_summary_matches_newest_message() {
        let store = Store::in_memory();
        let room = demo_room(&store);

        for i in 1..=3 {
            store
                .post_chat_message(&room.id, "user-resident", "Kim Young-soo", &format!("message {i}"))
                .unwrap();
        }

        let doc = store.load();
        let room = doc.chat_rooms.iter().find(|r| r.id == room.id).unwrap();
        let newest = messages_for_room(&doc.chat_messages, &room.id)
            .last()
            .copied()
            .cloned()
            .unwrap();
        assert_eq!(room.last_message.as_deref(), Some("message 3"));
        assert_eq!(newest.content, "message 3");
        assert_eq!(room.last_message_time, Some(newest.timestamp));
    }

    #[test]
    fn messages_come_back_in_timestamp_order() {
        let store = Store::in_memory();
        let room = demo_room(&store);
        for i in 0..5 {
            store
                .post_chat_message(&room.id, "user-family", "Kim Min-ji", &format!("m{i}"))
                .unwrap();
        }

        let doc = store.load();
        let messages = messages_for_room(&doc.chat_messages, &room.id);
        assert_eq!(messages.len(), 5);
        for pair in messages.windows(2) {
            assert!(pair[0].timestamp <= pair[1].timestamp);
        }
    }

    #[test]
    fn room_needs_two_participants() {
        let store = Store::in_memory();
        let err = store
            .create_chat_room("lonely", &["user-resident".to_string()])
            .unwrap_err();
        assert!(matches!(err, StoreError::Validation(_)));
    }
}
