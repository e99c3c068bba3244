//! Operations on direct (two-party) conversations.
//!
//! Conversations embed their messages in the record itself, unlike chat
//! rooms which keep messages in a separate collection. The
//! `last_message_time` field always equals the timestamp of the last
//! embedded message.

use chrono::Utc;
use tracing::info;

use silverhome_shared::ids::new_id;

use crate::document::Store;
use crate::error::{require_non_empty, Result, StoreError};
use crate::models::{Conversation, ConversationMessage};

impl Store {
    /// Send a direct message, creating the conversation on first contact.
    ///
    /// The thread between two users is identified by its participant set,
    /// not by id: if no conversation holds exactly `{sender, recipient}`,
    /// one is created in the same save as the message.
    pub fn send_direct_message(
        &self,
        sender_id: &str,
        recipient_id: &str,
        content: &str,
    ) -> Result<Conversation> {
        require_non_empty("message content", content)?;
        if sender_id == recipient_id {
            return Err(StoreError::Validation(
                "cannot start a conversation with yourself".to_string(),
            ));
        }

        let mut doc = self.load();
        for id in [sender_id, recipient_id] {
            if doc.user(id).is_none() {
                return Err(StoreError::NotFound(format!("user {id}")));
            }
        }

        let now = Utc::now();
        let index = match doc
            .conversations
            .iter()
            .position(|c| c.is_between(sender_id, recipient_id))
        {
            Some(index) => index,
            None => {
                doc.conversations.push(Conversation {
                    id: new_id("conv"),
                    participants: vec![sender_id.to_string(), recipient_id.to_string()],
                    messages: Vec::new(),
                    created_at: now,
                    last_message_time: None,
                });
                doc.conversations.len() - 1
            }
        };
        let conversation = &mut doc.conversations[index];

        conversation.messages.push(ConversationMessage {
            id: new_id("msg"),
            sender_id: sender_id.to_string(),
            content: content.to_string(),
            timestamp: now,
        });
        conversation.last_message_time = Some(now);
        let updated = conversation.clone();
        self.save(&mut doc)?;

        info!(conversation_id = %updated.id, sender_id, "direct message sent");
        Ok(updated)
    }
}
