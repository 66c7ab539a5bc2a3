//! # Sirbot Core
//!
//! The data model and collaborator contracts of the sirbot dispatch core.
//!
//! This crate provides:
//! - **Events**: decoded inbound chat events ([`InboundEvent`]) and the
//!   outbound message builder ([`OutboundEvent`])
//! - **Identity**: the bot's own id, its admins and the admin channel
//!   ([`BotIdentity`])
//! - **Gateways**: the narrow interfaces to the platform API, the database
//!   and the link checker ([`MessagingGateway`], [`PersistenceGateway`],
//!   [`LinkChecker`])
//! - **Payloads**: the versioned value of the topic `revert` button
//!   ([`RevertTopic`])
//!
//! ```text
//! ┌────────────┐     ┌────────────┐     ┌──────────┐     ┌───────────────────┐
//! │ Transport  │────▶│InboundEvent│────▶│ Handlers │────▶│ MessagingGateway  │
//! │ (external) │     └────────────┘     └──────────┘────▶│ PersistenceGateway│
//! └────────────┘                                   └───▶│ LinkChecker       │
//!                                                        └───────────────────┘
//! ```

pub mod error;
pub mod event;
pub mod gateway;
pub mod identity;
pub mod outbound;
pub mod payload;

pub use error::{
    ApiError, ApiResult, EventError, EventResult, PersistenceError, PersistenceResult,
};
pub use event::{Addressed, InboundEvent, TOPIC_CHANGE_SUBTYPE, mention_token};
pub use gateway::{
    ArchivedMessage, BoxedLinkChecker, BoxedMessaging, BoxedPersistence, ChannelRecord,
    LinkChecker, MessagingGateway, PersistenceGateway, StoredUser, UserProfile,
};
pub use identity::{AdminSet, BotIdentity};
pub use outbound::{Action, ActionStyle, Attachment, Field, OutboundEvent};
pub use payload::{
    REVERT_ACTION, REVERT_TOPIC_VERSION, RevertTopic, TOPIC_CHANGE_CALLBACK, VALIDATE_ACTION,
};
