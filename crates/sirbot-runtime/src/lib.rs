//! Sirbot Runtime - configuration, production gateways and the event loop.
//!
//! This crate provides:
//! - Layered configuration loading ([`ConfigLoader`], [`SirbotConfig`])
//! - Logging setup ([`LoggingBuilder`])
//! - The Slack Web API client and HTTP link checker ([`SlackWebApi`],
//!   [`HttpLinkChecker`])
//! - PostgreSQL and in-memory stores ([`PgStore`], [`MemoryStore`])
//! - [`SirbotRuntime`], which wires all of the above to the dispatcher and
//!   consumes raw events from a transport
//!
//! ```ignore
//! use sirbot_runtime::SirbotRuntime;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let runtime = SirbotRuntime::builder().build().await?;
//!
//!     let (tx, rx) = tokio::sync::mpsc::channel(64);
//!     tokio::spawn(rtm_client(tx));
//!
//!     // Runs until the transport closes or Ctrl+C
//!     runtime.run(rx).await?;
//!     Ok(())
//! }
//! ```

pub mod config;
pub mod error;
pub mod gateway;
pub mod logging;
pub mod runtime;
pub mod store;

pub use config::{
    BotConfig, ConfigError, ConfigLoader, ConfigResult, DatabaseConfig, SirbotConfig, SlackConfig,
};
pub use error::{RuntimeError, RuntimeResult};
pub use gateway::{HttpLinkChecker, SlackWebApi};
pub use logging::{LoggingBuilder, SpanEvents};
pub use runtime::{RuntimeBuilder, SirbotRuntime};
pub use store::{MemoryStore, PgStore};

// Re-export tracing for use by other crates
pub use tracing;
pub use tracing_subscriber;

/// Logging macros for code built on the runtime.
pub mod prelude {
    pub use tracing::{Level, debug, error, info, instrument, span, trace, warn};
}
