//! # Sirbot
//!
//! The event dispatch core of the Python Developers Slack bot.
//!
//! ## Architecture
//!
//! ```text
//! ┌───────────┐  mpsc  ┌───────────────┐     ┌────────────┐     ┌───────────────────┐
//! │ Transport │───────▶│ SirbotRuntime │────▶│ Dispatcher │────▶│ awaited handlers  │──▶ gateways
//! │ (external)│        └───────────────┘     └────────────┘────▶│ detached handlers │──▶ gateways
//! └───────────┘                                                 └───────────────────┘
//! ```
//!
//! - **Runtime**: loads configuration, connects the Slack/database/link
//!   gateways, feeds events to the dispatcher
//! - **Dispatcher**: evaluates every registration's condition and runs the
//!   matching handlers, isolating failures
//! - **Handlers**: tower services receiving a shared `HandlerContext`
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use sirbot::prelude::*;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let runtime = SirbotRuntime::builder().build().await?;
//!
//!     let (tx, rx) = tokio::sync::mpsc::channel(64);
//!     tokio::spawn(rtm_client(tx));
//!
//!     runtime.run(rx).await?;
//!     Ok(())
//! }
//! ```
//!
//! ## Features
//!
//! - `toml-config`: TOML configuration files (default)
//! - `yaml-config`: YAML configuration files
//! - `json-log`: JSON log output

pub use sirbot_core as core;
pub use sirbot_framework as framework;
pub use sirbot_handlers as handlers;
pub use sirbot_runtime as runtime;

/// Commonly used types for running the bot or writing extra handlers.
///
/// ```rust,ignore
/// use sirbot::prelude::*;
/// ```
pub mod prelude {
    // Runtime - main entry point
    pub use sirbot_runtime::{SirbotConfig, SirbotRuntime};

    // Routing
    pub use sirbot_framework::{
        Condition, Dispatcher, HandlerContext, HandlerError, HandlerRegistry, HandlerResult,
        Pattern, Registration,
    };

    // Events and gateways
    pub use sirbot_core::{
        Attachment, BotIdentity, InboundEvent, LinkChecker, MessagingGateway, OutboundEvent,
        PersistenceGateway,
    };

    pub use sirbot_handlers::CommandSettings;
}
