//! Inbound chat events.
//!
//! An [`InboundEvent`] is the immutable, decoded view of one platform message
//! event. The raw payload is kept verbatim so it can be archived as received.
//!
//! ```rust,ignore
//! use sirbot_core::InboundEvent;
//!
//! let event = InboundEvent::from_raw(serde_json::json!({
//!     "type": "message",
//!     "ts": "1530000000.000100",
//!     "user": "U024BE7LH",
//!     "channel": "C2147483705",
//!     "text": "<@U0BOT> hello",
//! }))?;
//!
//! let addressed = event.addressed("U0BOT");
//! assert!(addressed.is_mentioned());
//! assert_eq!(addressed.text(), "hello");
//! ```

use chrono::{DateTime, Utc};
use serde_json::{Map, Value};

use crate::error::{EventError, EventResult};
use crate::outbound::OutboundEvent;

/// Subtype carried by topic-change notices.
pub const TOPIC_CHANGE_SUBTYPE: &str = "channel_topic";

/// Returns the mention token the platform uses for `user_id`.
pub fn mention_token(user_id: &str) -> String {
    format!("<@{user_id}>")
}

/// A decoded inbound chat event.
#[derive(Debug, Clone, PartialEq)]
pub struct InboundEvent {
    id: Option<String>,
    kind: String,
    sender_id: Option<String>,
    channel_id: String,
    text: Option<String>,
    subtype: Option<String>,
    topic: Option<String>,
    raw: Value,
}

impl InboundEvent {
    /// Decodes a platform message event, keeping the payload verbatim.
    ///
    /// Only `channel` is required. Empty `ts` values are treated as absent,
    /// since the platform occasionally delivers messages without one.
    pub fn from_raw(raw: Value) -> EventResult<Self> {
        let obj = raw.as_object().ok_or(EventError::NotAnObject)?;

        let channel_id = str_field(obj, "channel").ok_or(EventError::MissingField("channel"))?;

        Ok(Self {
            id: str_field(obj, "ts").filter(|ts| !ts.is_empty()),
            kind: str_field(obj, "type").unwrap_or_else(|| "message".to_string()),
            sender_id: str_field(obj, "user"),
            channel_id,
            text: str_field(obj, "text"),
            subtype: str_field(obj, "subtype"),
            topic: str_field(obj, "topic"),
            raw,
        })
    }

    /// Platform timestamp of the message, used as the archival key.
    pub fn id(&self) -> Option<&str> {
        self.id.as_deref()
    }

    /// Event type as reported by the platform (usually `message`).
    pub fn kind(&self) -> &str {
        &self.kind
    }

    pub fn sender_id(&self) -> Option<&str> {
        self.sender_id.as_deref()
    }

    pub fn channel_id(&self) -> &str {
        &self.channel_id
    }

    pub fn text(&self) -> Option<&str> {
        self.text.as_deref()
    }

    pub fn subtype(&self) -> Option<&str> {
        self.subtype.as_deref()
    }

    /// New topic value, present on topic-change notices.
    pub fn topic(&self) -> Option<&str> {
        self.topic.as_deref()
    }

    /// The payload exactly as it was received.
    pub fn raw(&self) -> &Value {
        &self.raw
    }

    /// Returns `true` if the sender is `user_id`.
    pub fn is_from(&self, user_id: &str) -> bool {
        self.sender_id.as_deref() == Some(user_id)
    }

    /// Converts the integer-seconds portion of the id into a UTC timestamp.
    ///
    /// Returns `Ok(None)` when the event has no id.
    pub fn timestamp(&self) -> EventResult<Option<DateTime<Utc>>> {
        let Some(id) = self.id.as_deref() else {
            return Ok(None);
        };

        let seconds = id.split('.').next().unwrap_or_default();
        seconds
            .parse::<i64>()
            .ok()
            .and_then(|secs| DateTime::from_timestamp(secs, 0))
            .map(Some)
            .ok_or_else(|| EventError::InvalidTimestamp(id.to_string()))
    }

    /// Resolves how the text addresses the bot `bot_user_id`.
    ///
    /// A missing text is treated as empty.
    pub fn addressed(&self, bot_user_id: &str) -> Addressed {
        Addressed::parse(self.text.as_deref().unwrap_or_default(), bot_user_id)
    }

    /// Starts a reply addressed to the channel this event came from.
    pub fn response(&self) -> OutboundEvent {
        OutboundEvent::to_channel(self.channel_id.clone())
    }
}

/// The text of an event as seen by the bot.
///
/// The bot counts as mentioned when its token (`<@BOT>` or `<@BOT|name>`)
/// appears anywhere in the text. Only a *leading* token is removed, together
/// with the `:`/`,` and whitespace that follow it; later mentions are part of
/// the message body and are kept.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Addressed {
    mentioned: bool,
    text: String,
}

impl Addressed {
    pub fn parse(text: &str, bot_user_id: &str) -> Self {
        let mentioned = text
            .match_indices("<@")
            .any(|(at, _)| mention_len(&text[at..], bot_user_id).is_some());

        let trimmed = text.trim_start();
        let text = match mention_len(trimmed, bot_user_id) {
            Some(len) => trimmed[len..]
                .trim_start_matches(|c: char| c.is_whitespace() || c == ':' || c == ',')
                .trim_end(),
            None => text,
        };

        Self {
            mentioned,
            text: text.to_string(),
        }
    }

    pub fn is_mentioned(&self) -> bool {
        self.mentioned
    }

    /// The text without the leading bot mention.
    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn into_text(self) -> String {
        self.text
    }
}

/// Length of the bot mention token `s` starts with, if any.
fn mention_len(s: &str, bot_user_id: &str) -> Option<usize> {
    let after = s.strip_prefix("<@")?.strip_prefix(bot_user_id)?;
    let end = match after.chars().next()? {
        '>' => 1,
        '|' => after.find('>')? + 1,
        _ => return None,
    };
    Some(s.len() - after.len() + end)
}

impl TryFrom<Value> for InboundEvent {
    type Error = EventError;

    fn try_from(raw: Value) -> EventResult<Self> {
        Self::from_raw(raw)
    }
}

fn str_field(obj: &Map<String, Value>, key: &str) -> Option<String> {
    obj.get(key).and_then(Value::as_str).map(str::to_string)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn event(text: &str) -> InboundEvent {
        InboundEvent::from_raw(json!({
            "type": "message",
            "ts": "1530000000.000100",
            "user": "U1",
            "channel": "C1",
            "text": text,
        }))
        .unwrap()
    }

    #[test]
    fn decodes_message_fields() {
        let ev = InboundEvent::from_raw(json!({
            "type": "message",
            "subtype": "channel_topic",
            "ts": "1530000000.000100",
            "user": "U1",
            "channel": "C1",
            "topic": "new topic",
        }))
        .unwrap();

        assert_eq!(ev.id(), Some("1530000000.000100"));
        assert_eq!(ev.subtype(), Some(TOPIC_CHANGE_SUBTYPE));
        assert_eq!(ev.topic(), Some("new topic"));
        assert_eq!(ev.text(), None);
        assert_eq!(ev.raw()["topic"], "new topic");
    }

    #[test]
    fn channel_is_required() {
        let err = InboundEvent::from_raw(json!({ "type": "message" })).unwrap_err();
        assert!(matches!(err, EventError::MissingField("channel")));
        assert!(matches!(
            InboundEvent::from_raw(json!("nope")),
            Err(EventError::NotAnObject)
        ));
    }

    #[test]
    fn empty_ts_is_absent() {
        let ev = InboundEvent::from_raw(json!({ "channel": "C1", "ts": "" })).unwrap();
        assert_eq!(ev.id(), None);
        assert_eq!(ev.timestamp().unwrap(), None);
    }

    #[test]
    fn timestamp_truncates_fraction() {
        let ts = event("hi").timestamp().unwrap().unwrap();
        assert_eq!(ts.timestamp(), 1_530_000_000);
    }

    #[test]
    fn invalid_timestamp_is_reported() {
        let ev = InboundEvent::from_raw(json!({ "channel": "C1", "ts": "abc.1" })).unwrap();
        assert!(matches!(ev.timestamp(), Err(EventError::InvalidTimestamp(_))));
    }

    #[test]
    fn leading_mention_is_stripped() {
        let ev = event("<@UBOT> tell <@U123> hello");
        let addressed = ev.addressed("UBOT");
        assert!(addressed.is_mentioned());
        assert_eq!(addressed.text(), "tell <@U123> hello");

        let ev = event("  <@UBOT|sirbot>: hello there ");
        let addressed = ev.addressed("UBOT");
        assert!(addressed.is_mentioned());
        assert_eq!(addressed.text(), "hello there");
    }

    #[test]
    fn later_mentions_stay_in_the_body() {
        let ev = event("<@UBOT> tell <#C9> say hi to <@UBOT> please");
        let addressed = ev.addressed("UBOT");
        assert!(addressed.is_mentioned());
        assert_eq!(addressed.text(), "tell <#C9> say hi to <@UBOT> please");
    }

    #[test]
    fn mention_anywhere_counts_but_is_not_removed() {
        let ev = event("hello <@UBOT|sirbot>");
        let addressed = ev.addressed("UBOT");
        assert!(addressed.is_mentioned());
        assert_eq!(addressed.text(), "hello <@UBOT|sirbot>");
    }

    #[test]
    fn other_users_are_not_the_bot() {
        let ev = event("<@UBOTX> hello <@UBOT");
        let addressed = ev.addressed("UBOT");
        assert!(!addressed.is_mentioned());
        assert_eq!(addressed.text(), "<@UBOTX> hello <@UBOT");
    }

    #[test]
    fn missing_text_is_empty() {
        let ev = InboundEvent::from_raw(json!({ "channel": "C1" })).unwrap();
        let addressed = ev.addressed("UBOT");
        assert!(!addressed.is_mentioned());
        assert_eq!(addressed.into_text(), "");
    }

    #[test]
    fn response_targets_source_channel() {
        assert_eq!(event("hi").response().channel, "C1");
    }
}
