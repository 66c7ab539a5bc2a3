//! Event dispatcher.
//!
//! The [`Dispatcher`] evaluates every registration against an event and runs
//! the handlers whose condition holds:
//!
//! 1. All conditions are evaluated first, against the same immutable event
//!    and the same mention resolution.
//! 2. Matching handlers are started in registration order. Awaited handlers
//!    run one after the other and finish before `dispatch` returns; a slow
//!    one delays the later registrations for the same event. Detached
//!    handlers are spawned on a [`TaskTracker`] and only logged (and
//!    forwarded to the failure sink, if any).
//! 3. A failing handler never affects the others. Transient platform errors
//!    such as "already reacted" are logged at debug level and swallowed.
//!
//! ```rust,ignore
//! let dispatcher = Dispatcher::new(registry, identity, gateways);
//! let report = dispatcher.dispatch(event).await;
//! dispatcher.shutdown().await;
//! ```

use std::sync::Arc;

use tokio::sync::mpsc;
use tokio_util::task::TaskTracker;
use tower::{BoxError, ServiceExt};
use tracing::{Instrument, Level, debug, error, span, warn};

use crate::context::{Gateways, HandlerContext};
use crate::error::is_transient;
use crate::registry::{HandlerRegistry, InvocationMode};
use sirbot_core::{BotIdentity, InboundEvent};

/// A handler failure, as reported to the failure sink.
#[derive(Debug)]
pub struct HandlerFailure {
    pub handler: String,
    pub event_id: Option<String>,
    pub channel: String,
    pub error: BoxError,
}

/// What happened to one dispatched event.
#[derive(Debug, Default)]
pub struct DispatchReport {
    /// Names of the matching registrations, in registration order.
    pub matched: Vec<String>,
    /// Awaited handlers that succeeded.
    pub completed: usize,
    /// Awaited handlers whose transient error was swallowed.
    pub suppressed: usize,
    /// Handlers handed to the background tracker.
    pub detached: usize,
    /// Awaited handlers that failed.
    pub failures: Vec<HandlerFailure>,
}

impl DispatchReport {
    pub fn is_match(&self) -> bool {
        !self.matched.is_empty()
    }
}

/// Routes inbound events to the registered handlers.
#[derive(Debug, Clone)]
pub struct Dispatcher {
    registry: HandlerRegistry,
    identity: Arc<BotIdentity>,
    gateways: Gateways,
    tracker: TaskTracker,
    failures: Option<mpsc::UnboundedSender<HandlerFailure>>,
}

impl Dispatcher {
    pub fn new(registry: HandlerRegistry, identity: BotIdentity, gateways: Gateways) -> Self {
        Self {
            registry,
            identity: Arc::new(identity),
            gateways,
            tracker: TaskTracker::new(),
            failures: None,
        }
    }

    /// Forwards detached handler failures to `sink` in addition to logging them.
    pub fn with_failure_sink(mut self, sink: mpsc::UnboundedSender<HandlerFailure>) -> Self {
        self.failures = Some(sink);
        self
    }

    pub fn registry(&self) -> &HandlerRegistry {
        &self.registry
    }

    pub fn identity(&self) -> &BotIdentity {
        &self.identity
    }

    /// Number of detached handlers still running.
    pub fn pending(&self) -> usize {
        self.tracker.len()
    }

    /// Dispatches one event.
    pub async fn dispatch(&self, event: InboundEvent) -> DispatchReport {
        let span = span!(
            Level::DEBUG,
            "dispatch",
            event_id = event.id().unwrap_or_default(),
            channel = event.channel_id(),
        );

        async move {
            let event = Arc::new(event);
            let mut report = DispatchReport::default();

            let addressed = event.addressed(self.identity.bot_user_id());
            let matching: Vec<_> = self
                .registry
                .matching_addressed(&event, &self.identity, &addressed)
                .cloned()
                .collect();
            if matching.is_empty() {
                debug!("No handler matched");
                return report;
            }

            let ctx = Arc::new(HandlerContext::with_addressed(
                Arc::clone(&event),
                addressed,
                Arc::clone(&self.identity),
                self.gateways.clone(),
            ));

            for registration in matching {
                let name = registration.name().to_string();
                report.matched.push(name.clone());

                let handler_span = span!(Level::DEBUG, "handler", handler = %name);
                let call = registration
                    .service()
                    .oneshot(Arc::clone(&ctx))
                    .instrument(handler_span);

                match registration.invocation_mode() {
                    InvocationMode::Awaited => match call.await {
                        Ok(()) => report.completed += 1,
                        Err(e) if is_transient(&e) => {
                            debug!(handler = %name, "Ignoring transient error: {e}");
                            report.suppressed += 1;
                        }
                        Err(e) => {
                            error!(handler = %name, "Handler failed: {e}");
                            report.failures.push(failure(name, &event, e));
                        }
                    },
                    InvocationMode::Detached => {
                        report.detached += 1;
                        let sink = self.failures.clone();
                        let event = Arc::clone(&event);
                        self.tracker.spawn(
                            async move {
                                match call.await {
                                    Ok(()) => {}
                                    Err(e) if is_transient(&e) => {
                                        debug!(handler = %name, "Ignoring transient error: {e}");
                                    }
                                    Err(e) => {
                                        error!(handler = %name, "Detached handler failed: {e}");
                                        if let Some(sink) = sink {
                                            let _ = sink.send(failure(name, &event, e));
                                        }
                                    }
                                }
                            }
                            .in_current_span(),
                        );
                    }
                }
            }

            report
        }
        .instrument(span)
        .await
    }

    /// Stops accepting detached work and waits for the running tasks.
    pub async fn shutdown(&self) {
        self.tracker.close();
        let pending = self.tracker.len();
        if pending > 0 {
            warn!(pending, "Waiting for detached handlers");
        }
        self.tracker.wait().await;
    }
}

fn failure(handler: String, event: &InboundEvent, error: BoxError) -> HandlerFailure {
    HandlerFailure {
        handler,
        event_id: event.id().map(str::to_string),
        channel: event.channel_id().to_string(),
        error,
    }
}
