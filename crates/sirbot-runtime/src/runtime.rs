//! Runtime wiring and the event loop.
//!
//! The runtime turns a [`SirbotConfig`] into a ready [`Dispatcher`] and feeds
//! it the raw events produced by a transport (RTM socket, Events API
//! endpoint, ...). The transport itself lives outside this crate; it only
//! needs the sending half of an mpsc channel.
//!
//! ```rust,ignore
//! use sirbot_runtime::SirbotRuntime;
//!
//! let runtime = SirbotRuntime::builder()
//!     .config_file("sirbot.toml")
//!     .build()
//!     .await?;
//!
//! let (tx, rx) = tokio::sync::mpsc::channel(64);
//! tokio::spawn(my_transport(tx));
//! runtime.run(rx).await?;
//! ```

use std::future::Future;
use std::path::Path;
use std::sync::Arc;

use serde_json::Value;
use tokio::signal;
use tokio::sync::mpsc;
use tracing::{debug, info, warn};

use crate::config::{ConfigLoader, SirbotConfig};
use crate::error::RuntimeResult;
use crate::gateway::{HttpLinkChecker, SlackWebApi};
use crate::{logging, store};
use sirbot_core::InboundEvent;
use sirbot_framework::{DispatchReport, Dispatcher, Gateways, HandlerFailure};

/// The assembled bot: configuration, gateways, registry and dispatcher.
pub struct SirbotRuntime {
    config: SirbotConfig,
    dispatcher: Dispatcher,
}

impl SirbotRuntime {
    pub fn builder() -> RuntimeBuilder {
        RuntimeBuilder::new()
    }

    /// Initializes logging, connects the production gateways and builds the
    /// command registry.
    pub async fn from_config(config: &SirbotConfig) -> RuntimeResult<Self> {
        logging::init_from_config(&config.logging);

        let messaging = SlackWebApi::new(
            config.slack.api_url.clone(),
            config.slack.token.clone(),
            config.slack.timeout(),
        )?;
        let links = HttpLinkChecker::new(config.slack.timeout())?;

        let mut gateways = Gateways::new(Arc::new(messaging), Arc::new(links));
        if let Some(persistence) = store::open(&config.database).await? {
            gateways = gateways.with_persistence(persistence);
        }

        Self::with_gateways(config, gateways)
    }

    /// Builds the runtime around already constructed gateways.
    pub fn with_gateways(config: &SirbotConfig, gateways: Gateways) -> RuntimeResult<Self> {
        let identity = config.bot.identity();
        let registry = sirbot_handlers::registrations(&config.commands, &identity)?;

        info!(
            bot = %config.bot.user_id,
            handlers = registry.len(),
            archival = gateways.persistence().is_some(),
            log_level = %config.logging.level,
            "Runtime initialized from configuration"
        );

        Ok(Self {
            config: config.clone(),
            dispatcher: Dispatcher::new(registry, identity, gateways),
        })
    }

    /// Forwards detached handler failures to `sink`. Awaited failures are
    /// returned in the [`DispatchReport`].
    pub fn with_failure_sink(mut self, sink: mpsc::UnboundedSender<HandlerFailure>) -> Self {
        self.dispatcher = self.dispatcher.with_failure_sink(sink);
        self
    }

    pub fn config(&self) -> &SirbotConfig {
        &self.config
    }

    pub fn dispatcher(&self) -> &Dispatcher {
        &self.dispatcher
    }

    /// Decodes and dispatches one raw platform event.
    ///
    /// Returns `None` when the payload cannot be decoded.
    pub async fn handle(&self, raw: Value) -> Option<DispatchReport> {
        let event = match InboundEvent::from_raw(raw) {
            Ok(event) => event,
            Err(e) => {
                warn!(error = %e, "Dropping undecodable event");
                return None;
            }
        };
        Some(self.dispatcher.dispatch(event).await)
    }

    /// Processes events until the channel closes or Ctrl-C / SIGTERM arrives,
    /// then waits for detached handlers.
    pub async fn run(&self, events: mpsc::Receiver<Value>) -> RuntimeResult<()> {
        info!("Sirbot is running. Press Ctrl+C to stop.");
        self.run_until(events, wait_for_shutdown()).await
    }

    /// Like [`run`](Self::run) with a custom shutdown future.
    pub async fn run_until<F>(
        &self,
        mut events: mpsc::Receiver<Value>,
        shutdown: F,
    ) -> RuntimeResult<()>
    where
        F: Future<Output = ()>,
    {
        tokio::pin!(shutdown);

        loop {
            tokio::select! {
                biased;
                _ = &mut shutdown => {
                    info!("Shutdown requested");
                    break;
                }
                next = events.recv() => match next {
                    Some(raw) => {
                        if let Some(report) = self.handle(raw).await {
                            debug!(
                                matched = report.matched.len(),
                                failures = report.failures.len(),
                                "Event processed"
                            );
                        }
                    }
                    None => {
                        info!("Event source closed");
                        break;
                    }
                },
            }
        }

        self.dispatcher.shutdown().await;
        info!("Runtime stopped");
        Ok(())
    }
}

/// Waits for Ctrl-C or, on unix, SIGTERM.
async fn wait_for_shutdown() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            warn!(error = %e, "Failed to listen for Ctrl+C");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    {
        let terminate = async {
            match signal::unix::signal(signal::unix::SignalKind::terminate()) {
                Ok(mut sigterm) => {
                    sigterm.recv().await;
                }
                Err(e) => {
                    warn!(error = %e, "Failed to register SIGTERM handler");
                    std::future::pending::<()>().await;
                }
            }
        };

        tokio::select! {
            _ = ctrl_c => info!("Received Ctrl+C, shutting down"),
            _ = terminate => info!("Received SIGTERM, shutting down"),
        }
    }

    #[cfg(not(unix))]
    {
        ctrl_c.await;
        info!("Received Ctrl+C, shutting down");
    }
}

// =============================================================================
// RuntimeBuilder
// =============================================================================

/// Loads and validates configuration, then builds a [`SirbotRuntime`].
pub struct RuntimeBuilder {
    config_loader: ConfigLoader,
}

impl RuntimeBuilder {
    pub fn new() -> Self {
        Self {
            config_loader: ConfigLoader::new().with_current_dir(),
        }
    }

    pub fn config_file<P: AsRef<Path>>(mut self, path: P) -> Self {
        self.config_loader = self.config_loader.file(path);
        self
    }

    /// Sets the configuration profile (e.g. "development", "production").
    pub fn profile(mut self, profile: impl AsRef<str>) -> Self {
        self.config_loader = self.config_loader.profile(profile);
        self
    }

    pub fn search_path<P: AsRef<Path>>(mut self, path: P) -> Self {
        self.config_loader = self.config_loader.search_path(path);
        self
    }

    pub fn without_env(mut self) -> Self {
        self.config_loader = self.config_loader.without_env();
        self
    }

    pub fn merge(mut self, config: SirbotConfig) -> Self {
        self.config_loader = self.config_loader.merge(config);
        self
    }

    pub async fn build(self) -> RuntimeResult<SirbotRuntime> {
        let config = self.config_loader.load_validated()?;
        SirbotRuntime::from_config(&config).await
    }
}

impl Default for RuntimeBuilder {
    fn default() -> Self {
        Self::new()
    }
}
