//! The handler registry.
//!
//! A [`HandlerRegistry`] is an ordered, immutable list of [`Registration`]s
//! built once at startup. Registration order is the order in which matching
//! handlers are started for an event.
//!
//! ```rust,ignore
//! let registry = HandlerRegistry::builder()
//!     .register(Registration::new(
//!         "greet",
//!         Condition::new(Pattern::insensitive("hello")?).mention(),
//!         greet,
//!     ))
//!     .register(Registration::new("archive", Condition::new(Pattern::any()), archive).detached())
//!     .build();
//! ```

use std::fmt;
use std::sync::Arc;

use sirbot_core::{Addressed, BotIdentity, InboundEvent};

use crate::handler::{BoxedHandlerService, Handler, HandlerService};
use crate::matcher::Condition;

/// How the dispatcher runs a handler.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum InvocationMode {
    /// The dispatcher waits for the handler before reporting the event.
    #[default]
    Awaited,
    /// The handler runs as a background task; its outcome is logged.
    Detached,
}

/// One handler with the condition that triggers it.
#[derive(Clone)]
pub struct Registration {
    name: String,
    condition: Condition,
    mode: InvocationMode,
    service: BoxedHandlerService,
}

impl Registration {
    pub fn new<H: Handler>(name: impl Into<String>, condition: Condition, handler: H) -> Self {
        Self::from_service(name, condition, HandlerService::new(handler).boxed())
    }

    /// Registers an already-built service, e.g. one wrapped in tower layers.
    pub fn from_service(
        name: impl Into<String>,
        condition: Condition,
        service: BoxedHandlerService,
    ) -> Self {
        Self {
            name: name.into(),
            condition,
            mode: InvocationMode::Awaited,
            service,
        }
    }

    /// Runs the handler in the background.
    pub fn detached(self) -> Self {
        self.mode(InvocationMode::Detached)
    }

    pub fn mode(mut self, mode: InvocationMode) -> Self {
        self.mode = mode;
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn condition(&self) -> &Condition {
        &self.condition
    }

    pub fn invocation_mode(&self) -> InvocationMode {
        self.mode
    }

    pub fn service(&self) -> BoxedHandlerService {
        self.service.clone()
    }
}

impl fmt::Debug for Registration {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Registration")
            .field("name", &self.name)
            .field("condition", &self.condition)
            .field("mode", &self.mode)
            .finish_non_exhaustive()
    }
}

/// Ordered, read-only collection of registrations.
#[derive(Debug, Clone)]
pub struct HandlerRegistry {
    entries: Arc<[Registration]>,
}

impl HandlerRegistry {
    pub fn builder() -> HandlerRegistryBuilder {
        HandlerRegistryBuilder::default()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Registration> {
        self.entries.iter()
    }

    pub fn get(&self, name: &str) -> Option<&Registration> {
        self.entries.iter().find(|r| r.name == name)
    }

    /// The registrations whose condition holds for `event`, in order.
    pub fn matching(&self, event: &InboundEvent, identity: &BotIdentity) -> Vec<&Registration> {
        let addressed = event.addressed(identity.bot_user_id());
        self.matching_addressed(event, identity, &addressed).collect()
    }

    /// Like [`matching`](Self::matching), with the addressing already resolved.
    pub fn matching_addressed<'s, 'e>(
        &'s self,
        event: &'e InboundEvent,
        identity: &'e BotIdentity,
        addressed: &'e Addressed,
    ) -> impl Iterator<Item = &'s Registration> + use<'s, 'e> {
        self.entries
            .iter()
            .filter(move |r| r.condition.matches_addressed(event, identity, addressed))
    }
}

#[derive(Debug, Default)]
pub struct HandlerRegistryBuilder {
    entries: Vec<Registration>,
}

impl HandlerRegistryBuilder {
    pub fn register(mut self, registration: Registration) -> Self {
        self.entries.push(registration);
        self
    }

    pub fn build(self) -> HandlerRegistry {
        HandlerRegistry {
            entries: self.entries.into(),
        }
    }
}

impl FromIterator<Registration> for HandlerRegistry {
    fn from_iter<I: IntoIterator<Item = Registration>>(iter: I) -> Self {
        Self {
            entries: iter.into_iter().collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::context::HandlerContext;
    use crate::error::HandlerResult;
    use crate::matcher::Pattern;
    use crate::test_support::{identity, message};

    async fn noop(_ctx: Arc<HandlerContext>) -> HandlerResult {
        Ok(())
    }

    fn registry() -> HandlerRegistry {
        HandlerRegistry::builder()
            .register(Registration::new(
                "hello",
                Condition::new(Pattern::insensitive("hello").unwrap()),
                noop,
            ))
            .register(Registration::new("all", Condition::new(Pattern::any()), noop).detached())
            .register(Registration::new(
                "bye",
                Condition::new(Pattern::insensitive("bye").unwrap()),
                noop,
            ))
            .build()
    }

    #[test]
    fn matching_preserves_registration_order() {
        let registry = registry();
        let ev = message("U1", "C1", "hello and bye");
        let names: Vec<_> = registry
            .matching(&ev, &identity())
            .into_iter()
            .map(Registration::name)
            .collect();
        assert_eq!(names, ["hello", "all", "bye"]);
    }

    #[test]
    fn only_matching_registrations_are_returned() {
        let registry = registry();
        let ev = message("U1", "C1", "bye");
        let names: Vec<_> = registry
            .matching(&ev, &identity())
            .into_iter()
            .map(Registration::name)
            .collect();
        assert_eq!(names, ["all", "bye"]);
    }

    #[test]
    fn matches_outlive_the_identity() {
        let registry = registry();
        let ev = message("U1", "C1", "hello");
        let matched = {
            let identity = identity();
            let addressed = ev.addressed(identity.bot_user_id());
            registry
                .matching_addressed(&ev, &identity, &addressed)
                .collect::<Vec<_>>()
        };
        let names: Vec<_> = matched.into_iter().map(Registration::name).collect();
        assert_eq!(names, ["hello", "all"]);
    }

    #[test]
    fn invocation_mode_defaults_to_awaited() {
        let registry = registry();
        assert_eq!(registry.len(), 3);
        assert_eq!(
            registry.get("hello").map(Registration::invocation_mode),
            Some(InvocationMode::Awaited)
        );
        assert_eq!(
            registry.get("all").map(Registration::invocation_mode),
            Some(InvocationMode::Detached)
        );
    }
}
