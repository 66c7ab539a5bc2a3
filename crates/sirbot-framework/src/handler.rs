//! Handlers as tower services.
//!
//! Any `async fn(Arc<HandlerContext>) -> HandlerResult` is a [`Handler`].
//! [`HandlerService`] adapts a handler to `tower::Service<Arc<HandlerContext>>`
//! so registrations can be stored as type-erased [`BoxedHandlerService`]s and
//! wrapped in ordinary tower layers.
//!
//! ```rust,ignore
//! use std::sync::Arc;
//! use sirbot_framework::{HandlerContext, HandlerResult, HandlerService};
//!
//! async fn greet(ctx: Arc<HandlerContext>) -> HandlerResult {
//!     let reply = ctx.event().response().text("hi");
//!     ctx.messaging().send(&reply).await?;
//!     Ok(())
//! }
//!
//! let svc = HandlerService::new(greet).boxed();
//! ```

use std::future::Future;
use std::sync::Arc;
use std::task::{Context, Poll};

use futures::FutureExt;
use futures::future::BoxFuture;
use tower::util::BoxCloneSyncService;
use tower::{BoxError, Service};

use crate::context::HandlerContext;
use crate::error::HandlerResult;

/// A command handler.
///
/// Implemented for every cloneable async function taking the shared
/// [`HandlerContext`].
pub trait Handler: Clone + Send + Sync + 'static {
    type Future: Future<Output = HandlerResult> + Send + 'static;

    fn call(&self, ctx: Arc<HandlerContext>) -> Self::Future;
}

impl<F, Fut> Handler for F
where
    F: Fn(Arc<HandlerContext>) -> Fut + Clone + Send + Sync + 'static,
    Fut: Future<Output = HandlerResult> + Send + 'static,
{
    type Future = Fut;

    fn call(&self, ctx: Arc<HandlerContext>) -> Self::Future {
        self(ctx)
    }
}

/// Type-erased handler service stored in the registry.
pub type BoxedHandlerService = BoxCloneSyncService<Arc<HandlerContext>, (), BoxError>;

/// A tower [`Service`] calling a single [`Handler`].
#[derive(Clone)]
pub struct HandlerService<H> {
    handler: H,
}

impl<H: Handler> HandlerService<H> {
    pub fn new(handler: H) -> Self {
        Self { handler }
    }

    pub fn boxed(self) -> BoxedHandlerService {
        BoxCloneSyncService::new(self)
    }
}

impl<H: Handler> Service<Arc<HandlerContext>> for HandlerService<H> {
    type Response = ();
    type Error = BoxError;
    type Future = BoxFuture<'static, Result<(), BoxError>>;

    fn poll_ready(&mut self, _cx: &mut Context<'_>) -> Poll<Result<(), Self::Error>> {
        Poll::Ready(Ok(()))
    }

    fn call(&mut self, ctx: Arc<HandlerContext>) -> Self::Future {
        self.handler
            .call(ctx)
            .map(|result| result.map_err(BoxError::from))
            .boxed()
    }
}
