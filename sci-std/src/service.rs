//! Tower integration.
//!
//! [`DispatchService`] exposes a [`Dispatcher`] as a `tower::Service<Request>`,
//! so hosts built on tower can stack their own layers (timeouts, concurrency
//! limits) in front of route dispatch.
//!
//! # Example
//!
//! ```rust,ignore
//! use sci::service::DispatchService;
//!
//! let service = DispatchService::new(dispatcher);
//! let with_timeout = tower::timeout::Timeout::new(service, Duration::from_secs(5));
//! ```

use crate::dispatch::{DispatchOutcome, Dispatcher};
use futures::future::{BoxFuture, FutureExt};
use sci_core::{DispatchError, Request};
use std::{
    sync::Arc,
    task::{Context, Poll},
};

/// Wraps a [`Dispatcher`] as a tower `Service`.
#[derive(Clone)]
pub struct DispatchService {
    dispatcher: Arc<Dispatcher>,
}

impl DispatchService {
    /// Create a new service over `dispatcher`.
    pub fn new(dispatcher: impl Into<Arc<Dispatcher>>) -> Self {
        Self {
            dispatcher: dispatcher.into(),
        }
    }

    /// Get a reference to the inner dispatcher.
    pub fn inner(&self) -> &Dispatcher {
        &self.dispatcher
    }
}

impl ::tower::Service<Request> for DispatchService {
    type Response = DispatchOutcome;
    type Error = DispatchError;
    type Future = BoxFuture<'static, Result<Self::Response, Self::Error>>;

    fn poll_ready(&mut self, _cx: &mut Context<'_>) -> Poll<Result<(), Self::Error>> {
        // The registry is sealed; dispatch is always ready.
        Poll::Ready(Ok(()))
    }

    fn call(&mut self, request: Request) -> Self::Future {
        let dispatcher = Arc::clone(&self.dispatcher);
        async move { dispatcher.dispatch(&request).await }.boxed()
    }
}
