//! Contracts for the collaborators the dispatch core talks to.
//!
//! - [`MessagingGateway`]: posts messages, adds reactions, looks up users
//! - [`PersistenceGateway`]: archives messages, reads cached channel/user data
//! - [`LinkChecker`]: tells whether a URL exists
//!
//! The core never depends on a concrete platform client or database driver;
//! sirbot-runtime ships the production implementations.

use std::sync::Arc;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::{ApiResult, EventResult, PersistenceResult};
use crate::event::InboundEvent;
use crate::outbound::OutboundEvent;

// ============================================================================
// Records
// ============================================================================

/// A user profile as returned by the platform, kept as raw JSON.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct UserProfile(pub Value);

impl UserProfile {
    /// Returns a pretty-printed dump of the profile.
    pub fn pretty(&self) -> String {
        serde_json::to_string_pretty(&self.0).unwrap_or_else(|_| self.0.to_string())
    }
}

/// A user profile cached in the database, with the date the user joined.
#[derive(Debug, Clone, PartialEq)]
pub struct StoredUser {
    pub profile: UserProfile,
    pub join_date: DateTime<Utc>,
}

impl StoredUser {
    /// Merges the join date into the profile as an ISO-8601 `join_date` key.
    pub fn into_profile(self) -> UserProfile {
        let mut raw = self.profile.0;
        if let Value::Object(map) = &mut raw {
            map.insert(
                "join_date".to_string(),
                Value::String(self.join_date.to_rfc3339()),
            );
        }
        UserProfile(raw)
    }
}

/// The last known state of a channel.
#[derive(Debug, Clone, PartialEq)]
pub struct ChannelRecord {
    pub id: String,
    pub raw: Value,
}

impl ChannelRecord {
    /// The channel topic stored in the raw payload (`topic.value`).
    pub fn topic(&self) -> Option<&str> {
        self.raw.get("topic")?.get("value")?.as_str()
    }
}

/// A message as written to the archive.
#[derive(Debug, Clone, PartialEq)]
pub struct ArchivedMessage {
    pub id: String,
    pub text: Option<String>,
    pub sender_id: Option<String>,
    pub channel_id: String,
    pub raw: Value,
    pub timestamp: DateTime<Utc>,
}

impl ArchivedMessage {
    /// Builds the archive row for `event`.
    ///
    /// Returns `Ok(None)` for events without an id; they cannot be archived.
    pub fn from_event(event: &InboundEvent) -> EventResult<Option<Self>> {
        let (Some(id), Some(timestamp)) = (event.id(), event.timestamp()?) else {
            return Ok(None);
        };

        Ok(Some(Self {
            id: id.to_string(),
            text: event.text().map(str::to_string),
            sender_id: event.sender_id().map(str::to_string),
            channel_id: event.channel_id().to_string(),
            raw: event.raw().clone(),
            timestamp,
        }))
    }
}

// ============================================================================
// Gateways
// ============================================================================

/// Outbound side of the chat platform.
#[async_trait]
pub trait MessagingGateway: Send + Sync {
    /// Posts a message.
    async fn send(&self, message: &OutboundEvent) -> ApiResult<()>;

    /// Adds reaction `name` to the message `message_id` in `channel_id`.
    ///
    /// Fails with [`ApiError::AlreadyReacted`](crate::ApiError::AlreadyReacted)
    /// when the bot already reacted with the same name.
    async fn add_reaction(&self, channel_id: &str, message_id: &str, name: &str) -> ApiResult<()>;

    /// Fetches a user's live profile.
    async fn lookup_user(&self, user_id: &str) -> ApiResult<UserProfile>;
}

/// Storage for archived messages and cached platform metadata.
#[async_trait]
pub trait PersistenceGateway: Send + Sync {
    /// Inserts a message. A second insert for the same id fails with
    /// [`PersistenceError::DuplicateKey`](crate::PersistenceError::DuplicateKey).
    async fn insert_message(&self, message: &ArchivedMessage) -> PersistenceResult<()>;

    async fn fetch_channel(&self, channel_id: &str) -> PersistenceResult<Option<ChannelRecord>>;

    async fn fetch_user(&self, user_id: &str) -> PersistenceResult<Option<StoredUser>>;
}

/// Existence check for external links.
#[async_trait]
pub trait LinkChecker: Send + Sync {
    /// Issues a GET against `url` and returns the HTTP status code.
    async fn status(&self, url: &str) -> ApiResult<u16>;
}

pub type BoxedMessaging = Arc<dyn MessagingGateway>;
pub type BoxedPersistence = Arc<dyn PersistenceGateway>;
pub type BoxedLinkChecker = Arc<dyn LinkChecker>;
