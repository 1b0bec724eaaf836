//! # External collaborators
//!
//! The route engine talks to three things it does not implement itself:
//!
//! - [`RestServer`] - the HTTP host that exposes endpoints and forwards requests
//! - [`ActionResolver`] - locates and runs delegated `"controller.action"` targets
//! - [`FileIncluder`] - runs file actions with the captured parameters
//!
//! Each has a static trait (native `async fn`) and, where the dispatcher needs
//! to store it, an object-safe `Dyn*` twin with a blanket implementation.

use crate::{
    error::{BoxError, IncludeError, ResolveError},
    method::{Method, Methods},
    params::Params,
    response::Response,
};
use std::{future::Future, path::Path, pin::Pin};

/// An inbound request as handed over by the host.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Request {
    /// The namespace the host routed the request to.
    pub namespace: String,
    /// The request method.
    pub method: Method,
    /// The path below the namespace, e.g. `/users/42`.
    pub path: String,
}

impl Request {
    /// Create a request for `path` inside `namespace`.
    pub fn new(namespace: impl Into<String>, method: Method, path: impl Into<String>) -> Self {
        Self {
            namespace: namespace.into(),
            method,
            path: path.into(),
        }
    }

    /// Shorthand for a `GET` request.
    pub fn get(namespace: impl Into<String>, path: impl Into<String>) -> Self {
        Self::new(namespace, Method::Get, path)
    }

    /// Shorthand for a `POST` request.
    pub fn post(namespace: impl Into<String>, path: impl Into<String>) -> Self {
        Self::new(namespace, Method::Post, path)
    }
}

/// One route as exposed to the host.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Endpoint {
    /// The registry key of the route.
    pub key: String,
    /// The namespace, used by the host as a path prefix.
    pub namespace: String,
    /// The normalized pattern, e.g. `users/{id}`.
    pub pattern: String,
    /// The compiled matcher source.
    pub matcher: String,
    /// Allowed methods.
    pub methods: Methods,
}

/// The HTTP host the routes are exposed on.
///
/// The host owns sockets, authorization and not-found handling. For each
/// request it calls back into the dispatcher.
pub trait RestServer {
    /// Expose one endpoint.
    fn register_endpoint(&mut self, endpoint: Endpoint) -> Result<(), BoxError>;
}

/// Locates and invokes delegated action targets.
#[diagnostic::on_unimplemented(
    message = "`{Self}` cannot resolve delegated actions",
    label = "missing `ActionResolver` implementation",
    note = "Implement `ActionResolver::resolve` for `{Self}`."
)]
pub trait ActionResolver: Send + Sync + 'static {
    /// Run the target named `action`.
    ///
    /// `params` is `None` when the matched route captured no parameters.
    fn resolve(
        &self,
        action: &str,
        params: Option<&Params>,
    ) -> impl Future<Output = Result<Response, ResolveError>> + Send;
}

/// Dynamic object-safe version of [`ActionResolver`].
pub trait DynActionResolver: Send + Sync + 'static {
    /// Run the target named `action` (dynamic dispatch version).
    fn resolve_dyn<'a>(
        &'a self,
        action: &'a str,
        params: Option<&'a Params>,
    ) -> Pin<Box<dyn Future<Output = Result<Response, ResolveError>> + Send + 'a>>;
}

impl<T: ActionResolver> DynActionResolver for T {
    fn resolve_dyn<'a>(
        &'a self,
        action: &'a str,
        params: Option<&'a Params>,
    ) -> Pin<Box<dyn Future<Output = Result<Response, ResolveError>> + Send + 'a>> {
        Box::pin(self.resolve(action, params))
    }
}

/// A resolver that knows no actions.
///
/// Used by a dispatcher that was not given a resolver: every delegated
/// action fails with [`ResolveError::NotFound`].
#[derive(Debug, Clone, Copy, Default)]
pub struct UnconfiguredResolver;

impl ActionResolver for UnconfiguredResolver {
    async fn resolve(
        &self,
        action: &str,
        _params: Option<&Params>,
    ) -> Result<Response, ResolveError> {
        Err(ResolveError::NotFound(action.to_string()))
    }
}

/// Runs file actions.
///
/// Inclusion is synchronous file-system work. Failures are returned, never
/// panicked on.
pub trait FileIncluder: Send + Sync + 'static {
    /// Include `path` with `params` available to it.
    fn include(&self, path: &Path, params: &Params) -> Result<Response, IncludeError>;
}
