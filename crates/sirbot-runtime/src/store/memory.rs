//! In-process store, used with `database.url = "memory://"`.

use std::collections::HashMap;

use async_trait::async_trait;
use parking_lot::RwLock;
use serde_json::Value;

use sirbot_core::{
    ArchivedMessage, ChannelRecord, PersistenceError, PersistenceGateway, PersistenceResult,
    StoredUser,
};

/// Keeps archived messages and cached metadata in hash maps.
///
/// Message ids are unique, like the primary key of `slack.messages`.
#[derive(Debug, Default)]
pub struct MemoryStore {
    messages: RwLock<HashMap<String, ArchivedMessage>>,
    channels: RwLock<HashMap<String, Value>>,
    users: RwLock<HashMap<String, StoredUser>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Caches the raw payload of a channel.
    pub fn put_channel(&self, channel_id: impl Into<String>, raw: Value) {
        self.channels.write().insert(channel_id.into(), raw);
    }

    /// Caches a user profile.
    pub fn put_user(&self, user_id: impl Into<String>, user: StoredUser) {
        self.users.write().insert(user_id.into(), user);
    }

    pub fn message(&self, id: &str) -> Option<ArchivedMessage> {
        self.messages.read().get(id).cloned()
    }

    pub fn message_count(&self) -> usize {
        self.messages.read().len()
    }
}

#[async_trait]
impl PersistenceGateway for MemoryStore {
    async fn insert_message(&self, message: &ArchivedMessage) -> PersistenceResult<()> {
        let mut messages = self.messages.write();
        if messages.contains_key(&message.id) {
            return Err(PersistenceError::DuplicateKey {
                key: message.id.clone(),
            });
        }
        messages.insert(message.id.clone(), message.clone());
        Ok(())
    }

    async fn fetch_channel(&self, channel_id: &str) -> PersistenceResult<Option<ChannelRecord>> {
        Ok(self.channels.read().get(channel_id).map(|raw| ChannelRecord {
            id: channel_id.to_string(),
            raw: raw.clone(),
        }))
    }

    async fn fetch_user(&self, user_id: &str) -> PersistenceResult<Option<StoredUser>> {
        Ok(self.users.read().get(user_id).cloned())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::DateTime;
    use serde_json::json;
    use sirbot_core::{InboundEvent, UserProfile};

    fn archived(ts: &str) -> ArchivedMessage {
        let event = InboundEvent::from_raw(json!({
            "ts": ts,
            "user": "U1",
            "channel": "C1",
            "text": "hi",
        }))
        .unwrap();
        ArchivedMessage::from_event(&event).unwrap().unwrap()
    }

    #[tokio::test]
    async fn second_insert_is_a_duplicate() {
        let store = MemoryStore::new();
        let message = archived("1530000000.000100");

        store.insert_message(&message).await.unwrap();
        let err = store.insert_message(&message).await.unwrap_err();

        assert!(err.is_duplicate_key());
        assert_eq!(store.message_count(), 1);
        assert_eq!(store.message("1530000000.000100"), Some(message));
    }

    #[tokio::test]
    async fn cached_metadata_is_returned() {
        let store = MemoryStore::new();
        store.put_channel("C1", json!({ "topic": { "value": "rust" } }));
        store.put_user(
            "U1",
            StoredUser {
                profile: UserProfile(json!({ "id": "U1" })),
                join_date: DateTime::from_timestamp(1_500_000_000, 0).unwrap(),
            },
        );

        let channel = store.fetch_channel("C1").await.unwrap().unwrap();
        assert_eq!(channel.topic(), Some("rust"));
        assert!(store.fetch_channel("C2").await.unwrap().is_none());

        let user = store.fetch_user("U1").await.unwrap().unwrap();
        assert_eq!(user.profile.0["id"], "U1");
        assert!(store.fetch_user("U2").await.unwrap().is_none());
    }
}
