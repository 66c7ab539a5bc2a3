//! In-memory gateway doubles recording every call.

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use parking_lot::Mutex;
use serde_json::{Value, json};

use sirbot_core::{
    AdminSet, ApiError, ApiResult, ArchivedMessage, BotIdentity, ChannelRecord, InboundEvent,
    LinkChecker, MessagingGateway, OutboundEvent, PersistenceError, PersistenceGateway,
    PersistenceResult, StoredUser, UserProfile,
};
use sirbot_framework::{Gateways, HandlerContext};

pub fn identity() -> BotIdentity {
    BotIdentity::new("UBOT", AdminSet::new(["UADMIN"]), "GADMIN")
}

pub fn message(user: &str, channel: &str, text: &str) -> InboundEvent {
    InboundEvent::from_raw(json!({
        "type": "message",
        "ts": "1530000000.000100",
        "user": user,
        "channel": channel,
        "text": text,
    }))
    .unwrap()
}

pub fn topic_change(user: &str, channel: &str, topic: &str) -> InboundEvent {
    InboundEvent::from_raw(json!({
        "type": "message",
        "subtype": "channel_topic",
        "ts": "1530000000.000200",
        "user": user,
        "channel": channel,
        "text": format!("<@{user}> set the channel topic: {topic}"),
        "topic": topic,
    }))
    .unwrap()
}

/// Builds the context a handler receives for `event`.
pub fn context(
    event: InboundEvent,
    messaging: &Arc<MockMessaging>,
    links: &Arc<MockLinks>,
    store: Option<&Arc<MockStore>>,
) -> Arc<HandlerContext> {
    let mut gateways = Gateways::new(messaging.clone(), links.clone());
    if let Some(store) = store {
        gateways = gateways.with_persistence(store.clone());
    }
    Arc::new(HandlerContext::new(
        Arc::new(event),
        Arc::new(identity()),
        gateways,
    ))
}

// ============================================================================
// Messaging
// ============================================================================

#[derive(Debug, Clone, PartialEq)]
pub struct Reaction {
    pub channel: String,
    pub message_id: String,
    pub name: String,
}

#[derive(Default)]
pub struct MockMessaging {
    sent: Mutex<Vec<OutboundEvent>>,
    reactions: Mutex<Vec<Reaction>>,
    lookups: Mutex<Vec<String>>,
    reaction_error: Option<&'static str>,
}

impl MockMessaging {
    /// Every reaction fails with "already reacted".
    pub fn already_reacted() -> Self {
        Self {
            reaction_error: Some("already_reacted"),
            ..Default::default()
        }
    }

    /// Every reaction fails with a non-transient platform error.
    pub fn failing_reactions() -> Self {
        Self {
            reaction_error: Some("channel_not_found"),
            ..Default::default()
        }
    }

    pub fn sent(&self) -> Vec<OutboundEvent> {
        self.sent.lock().clone()
    }

    pub fn texts(&self) -> Vec<String> {
        self.sent
            .lock()
            .iter()
            .filter_map(|m| m.text.clone())
            .collect()
    }

    pub fn reactions(&self) -> Vec<Reaction> {
        self.reactions.lock().clone()
    }

    pub fn lookups(&self) -> Vec<String> {
        self.lookups.lock().clone()
    }
}

#[async_trait]
impl MessagingGateway for MockMessaging {
    async fn send(&self, message: &OutboundEvent) -> ApiResult<()> {
        self.sent.lock().push(message.clone());
        Ok(())
    }

    async fn add_reaction(&self, channel: &str, message_id: &str, name: &str) -> ApiResult<()> {
        if let Some(code) = self.reaction_error {
            return Err(ApiError::from_code(code));
        }
        self.reactions.lock().push(Reaction {
            channel: channel.to_string(),
            message_id: message_id.to_string(),
            name: name.to_string(),
        });
        Ok(())
    }

    async fn lookup_user(&self, user_id: &str) -> ApiResult<UserProfile> {
        self.lookups.lock().push(user_id.to_string());
        Ok(UserProfile(json!({ "id": user_id, "source": "live" })))
    }
}

// ============================================================================
// Persistence
// ============================================================================

#[derive(Default)]
pub struct MockStore {
    messages: Mutex<HashMap<String, ArchivedMessage>>,
    channels: Mutex<HashMap<String, Value>>,
    users: Mutex<HashMap<String, StoredUser>>,
    broken: bool,
}

impl MockStore {
    /// A store whose every call fails with a backend error.
    pub fn broken() -> Self {
        Self {
            broken: true,
            ..Default::default()
        }
    }

    pub fn with_channel(self, id: &str, raw: Value) -> Self {
        self.channels.lock().insert(id.to_string(), raw);
        self
    }

    pub fn with_user(self, id: &str, user: StoredUser) -> Self {
        self.users.lock().insert(id.to_string(), user);
        self
    }

    pub fn message_count(&self) -> usize {
        self.messages.lock().len()
    }

    pub fn message(&self, id: &str) -> Option<ArchivedMessage> {
        self.messages.lock().get(id).cloned()
    }

    fn check(&self) -> PersistenceResult<()> {
        if self.broken {
            return Err(PersistenceError::Backend("connection refused".to_string()));
        }
        Ok(())
    }
}

#[async_trait]
impl PersistenceGateway for MockStore {
    async fn insert_message(&self, message: &ArchivedMessage) -> PersistenceResult<()> {
        self.check()?;
        let mut messages = self.messages.lock();
        if messages.contains_key(&message.id) {
            return Err(PersistenceError::DuplicateKey {
                key: message.id.clone(),
            });
        }
        messages.insert(message.id.clone(), message.clone());
        Ok(())
    }

    async fn fetch_channel(&self, channel_id: &str) -> PersistenceResult<Option<ChannelRecord>> {
        self.check()?;
        Ok(self
            .channels
            .lock()
            .get(channel_id)
            .map(|raw| ChannelRecord {
                id: channel_id.to_string(),
                raw: raw.clone(),
            }))
    }

    async fn fetch_user(&self, user_id: &str) -> PersistenceResult<Option<StoredUser>> {
        self.check()?;
        Ok(self.users.lock().get(user_id).cloned())
    }
}

// ============================================================================
// Links
// ============================================================================

#[derive(Default)]
pub struct MockLinks {
    statuses: Mutex<HashMap<String, u16>>,
    checked: Mutex<Vec<String>>,
}

impl MockLinks {
    pub fn with_status(self, url: &str, status: u16) -> Self {
        self.statuses.lock().insert(url.to_string(), status);
        self
    }

    pub fn checked(&self) -> Vec<String> {
        self.checked.lock().clone()
    }
}

#[async_trait]
impl LinkChecker for MockLinks {
    async fn status(&self, url: &str) -> ApiResult<u16> {
        self.checked.lock().push(url.to_string());
        Ok(self.statuses.lock().get(url).copied().unwrap_or(404))
    }
}
