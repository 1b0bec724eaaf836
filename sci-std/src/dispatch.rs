//! Request dispatch.
//!
//! The [`Dispatcher`] owns a sealed [`Registry`] and the collaborators needed
//! to run actions. Matching scans the routes of the request namespace in
//! declaration order and stops at the first route whose method set and
//! matcher both accept the request.
//!
//! # Example
//!
//! ```rust,ignore
//! let dispatcher = Dispatcher::builder(registry)
//!     .resolver(TableResolver::builder().action("users.show", show).build())
//!     .includer(TemplateIncluder::new())
//!     .build();
//!
//! dispatcher.expose(&mut server)?;
//!
//! match dispatcher.dispatch(&Request::get("myplugin/v1", "/users/42")).await? {
//!     DispatchOutcome::Handled(response) => { /* ... */ }
//!     DispatchOutcome::NoMatch => { /* host answers 404 */ }
//! }
//! ```

use crate::{
    include::TemplateIncluder,
    pattern::normalize_path,
    registry::{Registry, RouteEntry, RouteKey},
    route::Route,
};
use sci_core::{
    Action, ActionResolver, Arguments, BoxError, DispatchError, DynActionResolver, FileIncluder,
    Method, Params, Request, ResolveError, Response, RestServer, UnconfiguredResolver,
};
use std::sync::Arc;
use tracing::Instrument;

/// What a dispatch produced.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DispatchOutcome {
    /// A route matched and its action ran.
    Handled(Response),
    /// No route matched. The host decides what to answer.
    NoMatch,
}

impl DispatchOutcome {
    /// Whether a route matched.
    pub fn is_handled(&self) -> bool {
        matches!(self, DispatchOutcome::Handled(_))
    }

    /// The response, if a route matched.
    pub fn response(&self) -> Option<&Response> {
        match self {
            DispatchOutcome::Handled(response) => Some(response),
            DispatchOutcome::NoMatch => None,
        }
    }

    /// Take the response, if a route matched.
    pub fn into_response(self) -> Option<Response> {
        match self {
            DispatchOutcome::Handled(response) => Some(response),
            DispatchOutcome::NoMatch => None,
        }
    }
}

/// A matched route and its captured parameters.
#[derive(Debug, Clone)]
pub struct Resolved<'a> {
    entry: &'a RouteEntry,
    params: Params,
}

impl<'a> Resolved<'a> {
    /// The key of the matched route.
    pub fn key(&self) -> &'a RouteKey {
        self.entry.key()
    }

    /// The matched route.
    pub fn route(&self) -> &'a Route {
        self.entry.route()
    }

    /// The captured parameters. Absent optional parameters are present with
    /// no value.
    pub fn params(&self) -> &Params {
        &self.params
    }

    /// Take the captured parameters.
    pub fn into_params(self) -> Params {
        self.params
    }
}

/// Builder for a [`Dispatcher`].
pub struct DispatcherBuilder {
    registry: Arc<Registry>,
    resolver: Option<Arc<dyn DynActionResolver>>,
    includer: Option<Arc<dyn FileIncluder>>,
}

impl DispatcherBuilder {
    /// Set the resolver for delegated actions.
    pub fn resolver<R: ActionResolver>(mut self, resolver: R) -> Self {
        self.resolver = Some(Arc::new(resolver));
        self
    }

    /// Set the includer for file actions.
    pub fn includer<F: FileIncluder>(mut self, includer: F) -> Self {
        self.includer = Some(Arc::new(includer));
        self
    }

    /// Build the dispatcher.
    ///
    /// Without a resolver every delegated action fails with
    /// [`DispatchError::ActionNotFound`]. Without an includer file actions use
    /// [`TemplateIncluder`].
    pub fn build(self) -> Dispatcher {
        Dispatcher {
            registry: self.registry,
            resolver: self
                .resolver
                .unwrap_or_else(|| Arc::new(UnconfiguredResolver)),
            includer: self
                .includer
                .unwrap_or_else(|| Arc::new(TemplateIncluder::new())),
        }
    }
}

/// Matches requests against a sealed registry and runs the matched action.
#[derive(Clone)]
pub struct Dispatcher {
    registry: Arc<Registry>,
    resolver: Arc<dyn DynActionResolver>,
    includer: Arc<dyn FileIncluder>,
}

impl Dispatcher {
    /// Start building a dispatcher over `registry`.
    pub fn builder(registry: impl Into<Arc<Registry>>) -> DispatcherBuilder {
        DispatcherBuilder {
            registry: registry.into(),
            resolver: None,
            includer: None,
        }
    }

    /// A dispatcher with no resolver and the default includer.
    pub fn new(registry: impl Into<Arc<Registry>>) -> Self {
        Self::builder(registry).build()
    }

    /// The registry.
    pub fn registry(&self) -> &Registry {
        &self.registry
    }

    /// Hand every route to the host. Returns the number of endpoints exposed.
    pub fn expose<S: RestServer + ?Sized>(&self, server: &mut S) -> Result<usize, BoxError> {
        let endpoints = self.registry.endpoints();
        let count = endpoints.len();
        for endpoint in endpoints {
            tracing::debug!(key = %endpoint.key, namespace = %endpoint.namespace, "exposing endpoint");
            server.register_endpoint(endpoint)?;
        }
        Ok(count)
    }

    /// Find the first route of `namespace` accepting `method` and `path`.
    pub fn resolve(&self, namespace: &str, method: Method, path: &str) -> Option<Resolved<'_>> {
        let path = normalize_path(path);
        self.registry
            .routes(namespace)
            .filter(|entry| entry.route().methods().allows(method))
            .find_map(|entry| {
                tracing::trace!(key = %entry.key(), matcher = %entry.route().matcher(), "trying route");
                entry
                    .route()
                    .matcher()
                    .captures(path)
                    .map(|params| Resolved { entry, params })
            })
    }

    /// Dispatch a request.
    ///
    /// Returns [`DispatchOutcome::NoMatch`] when no route accepts it. Action
    /// failures are returned as errors.
    pub async fn dispatch(&self, request: &Request) -> Result<DispatchOutcome, DispatchError> {
        let span = tracing::info_span!(
            "dispatch",
            namespace = %request.namespace,
            method = %request.method,
            path = %request.path,
        );

        async move {
            let Some(resolved) = self.resolve(&request.namespace, request.method, &request.path)
            else {
                tracing::debug!("no route matched");
                return Ok(DispatchOutcome::NoMatch);
            };
            self.invoke(&resolved).await.map(DispatchOutcome::Handled)
        }
        .instrument(span)
        .await
    }

    /// Dispatch a full route such as `/myplugin/v1/users/42`.
    ///
    /// Every registered namespace that prefixes the route is tried in order
    /// of first registration.
    pub async fn dispatch_route(
        &self,
        method: Method,
        route: &str,
    ) -> Result<DispatchOutcome, DispatchError> {
        let route = route.trim_start_matches('/');
        for namespace in self.registry.namespaces() {
            let Some(rest) = route.strip_prefix(namespace) else {
                continue;
            };
            if !(rest.is_empty() || rest.starts_with('/') || namespace.is_empty()) {
                continue;
            }
            if let Some(resolved) = self.resolve(namespace, method, rest) {
                let response = self.invoke(&resolved).await?;
                return Ok(DispatchOutcome::Handled(response));
            }
        }
        tracing::debug!(route, "no route matched");
        Ok(DispatchOutcome::NoMatch)
    }

    /// Run the action of a resolved route.
    pub async fn invoke(&self, resolved: &Resolved<'_>) -> Result<Response, DispatchError> {
        let key = resolved.key();
        let action = resolved.route().action();
        tracing::debug!(key = %key, action = action.kind(), params = %resolved.params(), "matched route");

        let result = match action {
            Action::Invocable(invocable) => {
                let args = Arguments::bind(invocable.parameter_names(), resolved.params());
                invocable
                    .invoke_dyn(args)
                    .await
                    .map_err(|source| DispatchError::invocation(key.as_str(), source))
            }
            Action::File(path) => Ok(self.includer.include(path, resolved.params())?),
            Action::Delegated(id) => {
                let params = (!resolved.params().is_empty()).then(|| resolved.params());
                match self.resolver.resolve_dyn(id, params).await {
                    Ok(response) => Ok(response),
                    Err(ResolveError::NotFound(id)) => Err(DispatchError::ActionNotFound(id)),
                    Err(ResolveError::Failed(source)) => {
                        Err(DispatchError::invocation(key.as_str(), source))
                    }
                }
            }
        };
        result.inspect_err(|error| tracing::warn!(key = %key, error = %error, "action failed"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{registry::RegistryBuilder, testing::RecordingResolver};
    use sci_core::invocable;

    fn registry() -> Registry {
        let mut builder = RegistryBuilder::new();
        Route::commit(
            &mut builder,
            "ns",
            "get",
            "users/{id}",
            Action::invocable(invocable(["id"], |args: Arguments| async move {
                format!("user {}", args.get("id").unwrap_or("-"))
            })),
        )
        .unwrap();
        Route::commit(&mut builder, "ns", "post", "users", "users.store").unwrap();
        builder.build()
    }

    #[test]
    fn test_resolve_first_match() {
        let dispatcher = Dispatcher::new(registry());
        let resolved = dispatcher.resolve("ns", Method::Get, "/users/42/").unwrap();
        assert_eq!(resolved.params().get("id"), Some("42"));
        assert!(dispatcher.resolve("ns", Method::Post, "/users/42").is_none());
        assert!(dispatcher.resolve("other", Method::Get, "/users/42").is_none());
    }

    #[tokio::test]
    async fn test_dispatch_invocable() {
        let dispatcher = Dispatcher::new(registry());
        let outcome = dispatcher
            .dispatch(&Request::get("ns", "/users/42"))
            .await
            .unwrap();
        assert_eq!(outcome, DispatchOutcome::Handled(Response::Text("user 42".into())));
    }

    #[tokio::test]
    async fn test_no_match_is_not_an_error() {
        let dispatcher = Dispatcher::new(registry());
        let outcome = dispatcher
            .dispatch(&Request::get("ns", "/nothing"))
            .await
            .unwrap();
        assert_eq!(outcome, DispatchOutcome::NoMatch);
    }

    #[tokio::test]
    async fn test_unconfigured_resolver() {
        let dispatcher = Dispatcher::new(registry());
        let err = dispatcher
            .dispatch(&Request::post("ns", "/users"))
            .await
            .unwrap_err();
        assert!(matches!(err, DispatchError::ActionNotFound(ref id) if id == "users.store"));
    }

    #[tokio::test]
    async fn test_delegated_without_params() {
        let resolver = RecordingResolver::new().with_response("users.store", "stored");
        let dispatcher = Dispatcher::builder(registry())
            .resolver(resolver.clone())
            .build();

        let outcome = dispatcher
            .dispatch(&Request::post("ns", "/users"))
            .await
            .unwrap();
        assert_eq!(outcome.response(), Some(&Response::Text("stored".into())));
        assert_eq!(resolver.calls(), vec![("users.store".to_string(), None)]);
    }

    #[tokio::test]
    async fn test_dispatch_route_strips_namespace() {
        let dispatcher = Dispatcher::new(registry());
        let outcome = dispatcher
            .dispatch_route(Method::Get, "/ns/users/7")
            .await
            .unwrap();
        assert_eq!(outcome.into_response(), Some(Response::Text("user 7".into())));

        let outcome = dispatcher
            .dispatch_route(Method::Get, "/nsx/users/7")
            .await
            .unwrap();
        assert!(!outcome.is_handled());
    }
}
