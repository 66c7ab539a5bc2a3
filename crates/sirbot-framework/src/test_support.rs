//! Recording gateway doubles shared by the framework tests.

use async_trait::async_trait;
use parking_lot::Mutex;
use serde_json::json;

use sirbot_core::{
    AdminSet, ApiResult, BotIdentity, InboundEvent, LinkChecker, MessagingGateway, OutboundEvent,
    UserProfile,
};

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

#[derive(Default)]
pub struct RecordingMessaging {
    sent: Mutex<Vec<OutboundEvent>>,
}

impl RecordingMessaging {
    pub fn sent(&self) -> Vec<OutboundEvent> {
        self.sent.lock().clone()
    }
}

#[async_trait]
impl MessagingGateway for RecordingMessaging {
    async fn send(&self, message: &OutboundEvent) -> ApiResult<()> {
        self.sent.lock().push(message.clone());
        Ok(())
    }

    async fn add_reaction(&self, _channel: &str, _message_id: &str, _name: &str) -> ApiResult<()> {
        Ok(())
    }

    async fn lookup_user(&self, user_id: &str) -> ApiResult<UserProfile> {
        Ok(UserProfile(json!({ "id": user_id })))
    }
}

#[derive(Default)]
pub struct RecordingLinks;

#[async_trait]
impl LinkChecker for RecordingLinks {
    async fn status(&self, _url: &str) -> ApiResult<u16> {
        Ok(404)
    }
}
