//! Outbound messages and their rich attachments.
//!
//! [`OutboundEvent`] serializes to the body expected by the platform's
//! `chat.postMessage` call. Empty optional parts are omitted.

use serde::{Deserialize, Serialize};

/// A message to post on the chat platform.
///
/// Usually obtained from [`InboundEvent::response`](crate::InboundEvent::response)
/// so that it inherits the source channel.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct OutboundEvent {
    /// Destination channel (or user id, for direct messages).
    pub channel: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub attachments: Vec<Attachment>,
}

impl OutboundEvent {
    /// Creates an empty message addressed to `channel`.
    pub fn to_channel(channel: impl Into<String>) -> Self {
        Self {
            channel: channel.into(),
            ..Default::default()
        }
    }

    /// Sets the message text.
    pub fn text(mut self, text: impl Into<String>) -> Self {
        self.text = Some(text.into());
        self
    }

    /// Overrides the destination channel.
    pub fn channel(mut self, channel: impl Into<String>) -> Self {
        self.channel = channel.into();
        self
    }

    /// Appends an attachment.
    pub fn attachment(mut self, attachment: Attachment) -> Self {
        self.attachments.push(attachment);
        self
    }
}

/// Structured rich content attached to a message.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Attachment {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fallback: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,

    /// Sidebar color (`good`, `warning`, `danger` or a hex value).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub color: Option<String>,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub fields: Vec<Field>,

    /// Identifies the interaction when one of `actions` is clicked.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub callback_id: Option<String>,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub actions: Vec<Action>,
}

/// A titled value shown in an attachment table.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Field {
    pub title: String,
    pub value: String,
    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub short: bool,
}

impl Field {
    pub fn new(title: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            value: value.into(),
            short: false,
        }
    }

    /// Marks the field as short enough to be laid out side by side.
    pub fn short(mut self) -> Self {
        self.short = true;
        self
    }
}

/// Visual style of an interactive button.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ActionStyle {
    Default,
    Primary,
    Danger,
}

/// An interactive button attached to a message.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Action {
    pub name: String,
    pub text: String,
    pub style: ActionStyle,
    #[serde(rename = "type")]
    pub kind: String,
    /// Opaque value handed back to the action handler when clicked.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub value: Option<String>,
}

impl Action {
    /// Creates a button action.
    pub fn button(name: impl Into<String>, text: impl Into<String>, style: ActionStyle) -> Self {
        Self {
            name: name.into(),
            text: text.into(),
            style,
            kind: "button".to_string(),
            value: None,
        }
    }

    pub fn value(mut self, value: impl Into<String>) -> Self {
        self.value = Some(value.into());
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn omits_empty_parts() {
        let msg = OutboundEvent::to_channel("C1").text("hi");
        assert_eq!(
            serde_json::to_value(&msg).unwrap(),
            json!({ "channel": "C1", "text": "hi" })
        );
    }

    #[test]
    fn serializes_actions_like_the_platform() {
        let msg = OutboundEvent::to_channel("C1").attachment(Attachment {
            callback_id: Some("cb".into()),
            fields: vec![Field::new("a", "b").short()],
            actions: vec![Action::button("revert", "Revert", ActionStyle::Danger).value("{}")],
            ..Default::default()
        });

        let value = serde_json::to_value(&msg).unwrap();
        let attachment = &value["attachments"][0];
        assert_eq!(attachment["fields"][0]["short"], true);
        assert_eq!(attachment["actions"][0]["type"], "button");
        assert_eq!(attachment["actions"][0]["style"], "danger");
        assert_eq!(attachment["actions"][0]["value"], "{}");
    }
}
