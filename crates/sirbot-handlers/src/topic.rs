//! Topic-change audit.
//!
//! When someone other than an admin or the bot changes a channel topic, a
//! notice is posted in the admin channel with the previous and new topics.
//! If the channel was known to the store, the notice also carries `validate`
//! and `revert` buttons; the revert button's value is a [`RevertTopic`].

use std::sync::Arc;

use tracing::debug;

use sirbot_core::{
    Action, ActionStyle, Attachment, ChannelRecord, Field, OutboundEvent, REVERT_ACTION,
    RevertTopic, TOPIC_CHANGE_CALLBACK, TOPIC_CHANGE_SUBTYPE, VALIDATE_ACTION,
};
use sirbot_framework::{
    Condition, HandlerContext, HandlerError, HandlerResult, Pattern, Registration,
};

/// Shown when the previous topic is unknown.
pub const TOPIC_NOT_FOUND: &str = "Original topic not found";

pub fn registration() -> Registration {
    Registration::new(
        "topic_audit",
        Condition::new(Pattern::any()).subtype(TOPIC_CHANGE_SUBTYPE),
        topic_audit,
    )
}

pub async fn topic_audit(ctx: Arc<HandlerContext>) -> HandlerResult {
    let event = ctx.event();
    let identity = ctx.identity();
    let sender = event.sender_id().ok_or(HandlerError::MissingField("user"))?;

    if identity.is_admin(sender) || identity.is_bot(sender) {
        debug!(sender, "Topic changed by a trusted user");
        return Ok(());
    }

    let record = match ctx.persistence() {
        Some(store) => store.fetch_channel(event.channel_id()).await?,
        None => None,
    };

    let notice = Notice {
        sender,
        channel: event.channel_id(),
        new_topic: event.topic().unwrap_or_default(),
        record: record.as_ref(),
    }
    .build(OutboundEvent::to_channel(identity.admin_channel()))?;

    ctx.messaging().send(&notice).await?;
    Ok(())
}

struct Notice<'a> {
    sender: &'a str,
    channel: &'a str,
    new_topic: &'a str,
    record: Option<&'a ChannelRecord>,
}

impl Notice<'_> {
    fn build(self, message: OutboundEvent) -> Result<OutboundEvent, HandlerError> {
        let old_topic = self
            .record
            .and_then(ChannelRecord::topic)
            .unwrap_or(TOPIC_NOT_FOUND);

        let mut attachment = Attachment {
            fallback: Some("Channel topic changed notice: old topic".to_string()),
            title: Some(format!(
                "<@{}> changed <#{}> topic.",
                self.sender, self.channel
            )),
            fields: vec![
                Field::new("Previous topic", old_topic),
                Field::new("New topic", self.new_topic),
            ],
            ..Default::default()
        };

        if self.record.is_some() {
            let revert = RevertTopic::new(self.channel, old_topic).encode()?;
            attachment.callback_id = Some(TOPIC_CHANGE_CALLBACK.to_string());
            attachment.actions = vec![
                Action::button(VALIDATE_ACTION, "Validate", ActionStyle::Primary),
                Action::button(REVERT_ACTION, "Revert", ActionStyle::Danger).value(revert),
            ];
        }

        Ok(message.attachment(attachment))
    }
}
