//! # Sirbot Framework
//!
//! Routing machinery for inbound chat events.
//!
//! This layer provides:
//! - [`Condition`] and [`Pattern`]: the declarative predicate of a handler
//! - [`Handler`] and [`HandlerService`]: handlers as tower services
//! - [`HandlerRegistry`]: the ordered list of registrations built at startup
//! - [`Dispatcher`]: evaluates conditions and runs the matching handlers,
//!   isolating their failures from each other
//!
//! Concrete commands live in `sirbot-handlers`; the runtime feeding events
//! into the dispatcher lives in `sirbot-runtime`.

pub mod context;
pub mod dispatcher;
pub mod error;
pub mod handler;
pub mod matcher;
pub mod registry;

#[cfg(test)]
pub(crate) mod test_support;

pub use context::{Gateways, HandlerContext};
pub use dispatcher::{DispatchReport, Dispatcher, HandlerFailure};
pub use error::{HandlerError, HandlerResult, RegistryError, RegistryResult, is_transient};
pub use handler::{BoxedHandlerService, Handler, HandlerService};
pub use matcher::{Condition, Pattern};
pub use registry::{HandlerRegistry, HandlerRegistryBuilder, InvocationMode, Registration};
