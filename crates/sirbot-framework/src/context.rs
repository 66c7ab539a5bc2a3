//! Per-event handler context.
//!
//! A [`HandlerContext`] is created once per dispatched event and shared by
//! every handler that fires for it. It carries the event, the text with the
//! leading bot mention removed, the bot identity and the gateway handles.

use std::sync::Arc;

use sirbot_core::{
    Addressed, BotIdentity, BoxedLinkChecker, BoxedMessaging, BoxedPersistence, InboundEvent,
    LinkChecker, MessagingGateway, PersistenceGateway,
};

/// Handles to the external collaborators available to handlers.
///
/// Persistence is optional: when no database is configured, archival is
/// skipped and lookups behave as misses.
#[derive(Clone)]
pub struct Gateways {
    messaging: BoxedMessaging,
    persistence: Option<BoxedPersistence>,
    links: BoxedLinkChecker,
}

impl Gateways {
    pub fn new(messaging: BoxedMessaging, links: BoxedLinkChecker) -> Self {
        Self {
            messaging,
            persistence: None,
            links,
        }
    }

    pub fn with_persistence(mut self, persistence: BoxedPersistence) -> Self {
        self.persistence = Some(persistence);
        self
    }

    pub fn messaging(&self) -> &dyn MessagingGateway {
        self.messaging.as_ref()
    }

    pub fn persistence(&self) -> Option<&dyn PersistenceGateway> {
        self.persistence.as_deref()
    }

    pub fn links(&self) -> &dyn LinkChecker {
        self.links.as_ref()
    }
}

impl std::fmt::Debug for Gateways {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Gateways")
            .field("persistence", &self.persistence.is_some())
            .finish_non_exhaustive()
    }
}

/// Everything a handler sees for one event.
#[derive(Debug, Clone)]
pub struct HandlerContext {
    event: Arc<InboundEvent>,
    text: String,
    mentioned: bool,
    identity: Arc<BotIdentity>,
    gateways: Gateways,
}

impl HandlerContext {
    pub fn new(event: Arc<InboundEvent>, identity: Arc<BotIdentity>, gateways: Gateways) -> Self {
        let addressed = event.addressed(identity.bot_user_id());
        Self::with_addressed(event, addressed, identity, gateways)
    }

    /// Builds the context from addressing the caller already resolved.
    pub fn with_addressed(
        event: Arc<InboundEvent>,
        addressed: Addressed,
        identity: Arc<BotIdentity>,
        gateways: Gateways,
    ) -> Self {
        Self {
            event,
            mentioned: addressed.is_mentioned(),
            text: addressed.into_text(),
            identity,
            gateways,
        }
    }

    pub fn event(&self) -> &InboundEvent {
        &self.event
    }

    /// The event text without its leading bot mention; empty when absent.
    pub fn text(&self) -> &str {
        &self.text
    }

    /// Whether the text contained the bot's mention token.
    pub fn is_mentioned(&self) -> bool {
        self.mentioned
    }

    pub fn identity(&self) -> &BotIdentity {
        &self.identity
    }

    pub fn gateways(&self) -> &Gateways {
        &self.gateways
    }

    pub fn messaging(&self) -> &dyn MessagingGateway {
        self.gateways.messaging()
    }

    pub fn persistence(&self) -> Option<&dyn PersistenceGateway> {
        self.gateways.persistence()
    }

    pub fn links(&self) -> &dyn LinkChecker {
        self.gateways.links()
    }
}
