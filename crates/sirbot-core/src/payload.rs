//! Interactive action payloads.
//!
//! The topic-change notice carries a `revert` button whose `value` is read
//! later by the component that handles button clicks. [`RevertTopic`] is the
//! schema of that value. The `v` field is additive: payloads written before it
//! existed (`{channel, old_topic}`) decode as version 1.

use serde::{Deserialize, Serialize};

/// Callback id attached to topic-change notices.
pub const TOPIC_CHANGE_CALLBACK: &str = "topic_change";

/// Name of the button accepting a topic change.
pub const VALIDATE_ACTION: &str = "validate";

/// Name of the button restoring the previous topic.
pub const REVERT_ACTION: &str = "revert";

/// Current version of the [`RevertTopic`] schema.
pub const REVERT_TOPIC_VERSION: u8 = 1;

/// Value of the `revert` button: which channel to restore, and to what.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RevertTopic {
    #[serde(rename = "v", default = "default_version")]
    pub version: u8,
    pub channel: String,
    pub old_topic: String,
}

fn default_version() -> u8 {
    REVERT_TOPIC_VERSION
}

impl RevertTopic {
    pub fn new(channel: impl Into<String>, old_topic: impl Into<String>) -> Self {
        Self {
            version: REVERT_TOPIC_VERSION,
            channel: channel.into(),
            old_topic: old_topic.into(),
        }
    }

    /// Encodes the payload as the JSON string stored in the action value.
    pub fn encode(&self) -> serde_json::Result<String> {
        serde_json::to_string(self)
    }

    /// Decodes an action value.
    pub fn decode(value: &str) -> serde_json::Result<Self> {
        serde_json::from_str(value)
    }
}
