//! Route registry.
//!
//! Registration happens on a [`RegistryBuilder`]. [`RegistryBuilder::build`]
//! seals it into an immutable [`Registry`], which is what the dispatcher
//! reads from. Routes stay in declaration order per namespace.

use crate::{pattern::PatternCompiler, route::Route};
use sci_core::{Action, Endpoint, IntoMethods, Params, RegistryError, RouteError};
use std::{collections::HashMap, fmt};

/// The key a route is registered under.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum RouteKey {
    /// Given explicitly at registration.
    Named(String),
    /// Derived from methods, namespace and pattern, e.g. `GET|POST ns/users/{id}`.
    Derived(String),
}

impl RouteKey {
    /// The key as a string.
    pub fn as_str(&self) -> &str {
        match self {
            RouteKey::Named(key) | RouteKey::Derived(key) => key,
        }
    }

    /// Whether the key was given explicitly.
    pub fn is_named(&self) -> bool {
        matches!(self, RouteKey::Named(_))
    }
}

impl fmt::Display for RouteKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A registered route and its key.
#[derive(Debug, Clone)]
pub struct RouteEntry {
    key: RouteKey,
    route: Route,
}

impl RouteEntry {
    /// The registry key.
    pub fn key(&self) -> &RouteKey {
        &self.key
    }

    /// The route.
    pub fn route(&self) -> &Route {
        &self.route
    }

    /// The endpoint description handed to the host.
    pub fn endpoint(&self) -> Endpoint {
        Endpoint {
            key: self.key.to_string(),
            namespace: self.route.namespace().to_string(),
            pattern: self.route.pattern().normalized().to_string(),
            matcher: self.route.regex().to_string(),
            methods: self.route.methods(),
        }
    }
}

/// Collects routes during bootstrap.
#[derive(Debug, Clone, Default)]
pub struct RegistryBuilder {
    entries: Vec<RouteEntry>,
    compiler: PatternCompiler,
}

impl RegistryBuilder {
    /// Create an empty builder with the default compiler.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create an empty builder whose [`route`](Self::route) uses `compiler`.
    pub fn with_compiler(compiler: PatternCompiler) -> Self {
        Self {
            entries: Vec::new(),
            compiler,
        }
    }

    /// The compiler used by [`route`](Self::route).
    pub fn compiler(&self) -> &PatternCompiler {
        &self.compiler
    }

    /// Build a route with this builder's compiler. The route is not registered.
    pub fn route(
        &self,
        namespace: impl Into<String>,
        methods: impl IntoMethods,
        pattern: &str,
        action: impl Into<Action>,
    ) -> Result<Route, RouteError> {
        Route::with_compiler(&self.compiler, namespace, methods, pattern, action)
    }

    /// Register a route, under `name` if given.
    ///
    /// An explicit name that is already taken fails with
    /// [`RegistryError::DuplicateRoute`]. A derived key that is already taken
    /// gets a `#2`, `#3`... suffix.
    pub fn register(&mut self, route: Route, name: Option<&str>) -> Result<RouteKey, RegistryError> {
        let key = match name {
            Some(name) => {
                if self.is_taken(name) {
                    return Err(RegistryError::DuplicateRoute(name.to_string()));
                }
                RouteKey::Named(name.to_string())
            }
            None => RouteKey::Derived(self.derive_key(&route)),
        };

        tracing::debug!(
            key = %key,
            namespace = %route.namespace(),
            methods = %route.methods(),
            matcher = %route.matcher(),
            action = route.action().kind(),
            "registered route"
        );
        self.entries.push(RouteEntry {
            key: key.clone(),
            route,
        });
        Ok(key)
    }

    /// Register a batch of routes.
    ///
    /// Each route is registered independently: a failing route is logged and
    /// skipped, the others are kept. The failures are returned in order.
    pub fn load<I>(&mut self, routes: I) -> Vec<RegistryError>
    where
        I: IntoIterator<Item = Result<Route, RouteError>>,
    {
        let mut errors = Vec::new();
        for route in routes {
            let registered = route
                .map_err(RegistryError::from)
                .and_then(|route| self.register(route, None));
            if let Err(error) = registered {
                tracing::warn!(error = %error, "skipping route");
                errors.push(error);
            }
        }
        errors
    }

    /// Number of registered routes.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether no route is registered.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Seal the registry.
    pub fn build(self) -> Registry {
        let index = self
            .entries
            .iter()
            .enumerate()
            .map(|(i, entry)| (entry.key.to_string(), i))
            .collect();

        tracing::debug!(routes = self.entries.len(), "sealed route registry");
        Registry {
            entries: self.entries,
            index,
        }
    }

    fn is_taken(&self, key: &str) -> bool {
        self.entries.iter().any(|entry| entry.key.as_str() == key)
    }

    fn derive_key(&self, route: &Route) -> String {
        let base = format!(
            "{} {}/{}",
            route.methods(),
            route.namespace(),
            route.pattern().normalized()
        );
        if !self.is_taken(&base) {
            return base;
        }
        (2..)
            .map(|n| format!("{base}#{n}"))
            .find(|key| !self.is_taken(key))
            .unwrap_or(base)
    }
}

/// The sealed route table.
#[derive(Debug, Clone, Default)]
pub struct Registry {
    entries: Vec<RouteEntry>,
    index: HashMap<String, usize>,
}

impl Registry {
    /// Start a new registration phase.
    pub fn builder() -> RegistryBuilder {
        RegistryBuilder::new()
    }

    /// All routes, in declaration order.
    pub fn iter(&self) -> impl Iterator<Item = &RouteEntry> {
        self.entries.iter()
    }

    /// Routes of one namespace, in declaration order.
    pub fn routes<'a>(&'a self, namespace: &str) -> impl Iterator<Item = &'a RouteEntry> + use<'a> {
        let namespace = namespace.trim_matches('/').to_string();
        self.entries
            .iter()
            .filter(move |entry| entry.route.namespace() == namespace)
    }

    /// Look a route up by key.
    pub fn get(&self, key: &str) -> Option<&Route> {
        self.index.get(key).map(|&i| &self.entries[i].route)
    }

    /// Namespaces in order of first registration.
    pub fn namespaces(&self) -> Vec<&str> {
        let mut namespaces: Vec<&str> = Vec::new();
        for entry in &self.entries {
            let namespace = entry.route.namespace();
            if !namespaces.contains(&namespace) {
                namespaces.push(namespace);
            }
        }
        namespaces
    }

    /// Endpoint descriptions for the host, in declaration order.
    pub fn endpoints(&self) -> Vec<Endpoint> {
        self.entries.iter().map(RouteEntry::endpoint).collect()
    }

    /// Build the full path `/{namespace}/{path}` of a keyed route.
    pub fn url_for(&self, key: &str, params: &Params) -> Option<String> {
        let route = self.get(key)?;
        let path = route.url_for(params)?;
        Some(match (route.namespace(), path.as_str()) {
            ("", path) => format!("/{path}"),
            (namespace, "") => format!("/{namespace}"),
            (namespace, path) => format!("/{namespace}/{path}"),
        })
    }

    /// Number of routes.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the registry is empty.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use sci_core::{Method, Methods, PatternError};

    #[test]
    fn test_declaration_order_is_kept() {
        let mut builder = RegistryBuilder::new();
        Route::commit(&mut builder, "ns", "get", "items/{id}", "items.show").unwrap();
        Route::commit(&mut builder, "ns", "get", "items/latest", "items.latest").unwrap();
        Route::commit(&mut builder, "other", "get", "items", "other.index").unwrap();

        let registry = builder.build();
        let patterns: Vec<_> = registry
            .routes("/ns/")
            .map(|e| e.route().pattern().raw().to_string())
            .collect();
        assert_eq!(patterns, ["items/{id}", "items/latest"]);
        assert_eq!(registry.namespaces(), ["ns", "other"]);
    }

    #[test]
    fn test_derived_keys() {
        let mut builder = RegistryBuilder::new();
        let first = Route::commit(&mut builder, "ns", ["get", "post"], "a/{id}", "a.x").unwrap();
        let second = Route::commit(&mut builder, "ns", ["get", "post"], "a/{id}", "a.y").unwrap();

        assert_eq!(first, RouteKey::Derived("GET|POST ns/a/{id}".into()));
        assert_eq!(second.as_str(), "GET|POST ns/a/{id}#2");
        assert_eq!(builder.len(), 2);
    }

    #[test]
    fn test_duplicate_name_is_rejected() {
        let mut builder = RegistryBuilder::new();
        Route::get("ns", "a", "a.x")
            .unwrap()
            .register(&mut builder, Some("a"))
            .unwrap();
        let err = Route::get("ns", "b", "b.x")
            .unwrap()
            .register(&mut builder, Some("a"))
            .unwrap_err();

        assert!(matches!(err, RegistryError::DuplicateRoute(ref key) if key == "a"));
        assert_eq!(builder.len(), 1);
    }

    #[test]
    fn test_load_isolates_failures() {
        let mut builder = RegistryBuilder::new();
        let errors = builder.load([
            Route::get("ns", "a/{id}", "a.show"),
            Route::get("ns", "b/{id", "b.show"),
            Route::get("ns", "c", "c.index"),
        ]);

        assert_eq!(errors.len(), 1);
        assert!(matches!(
            errors[0],
            RegistryError::Route(RouteError::Pattern(PatternError::UnclosedPlaceholder { .. }))
        ));
        assert_eq!(builder.len(), 2);
    }

    #[test]
    fn test_builder_compiler_is_used() {
        let compiler = PatternCompiler::with_options(
            crate::pattern::CompilerOptions::default().with_default_constraint("[0-9]+"),
        );
        let builder = RegistryBuilder::with_compiler(compiler);
        let route = builder.route("ns", Method::Get, "a/{id}", "a.show").unwrap();
        assert!(route.matches(Method::Get, "a/12").is_some());
        assert!(route.matches(Method::Get, "a/ab").is_none());
    }

    #[test]
    fn test_lookup_and_endpoints() {
        let mut builder = Registry::builder();
        Route::get("myplugin/v1", "users/{id}", "users.show")
            .unwrap()
            .register(&mut builder, Some("users.show"))
            .unwrap();
        let registry = builder.build();

        assert!(registry.get("users.show").is_some());
        assert!(registry.get("missing").is_none());

        let endpoints = registry.endpoints();
        assert_eq!(endpoints.len(), 1);
        assert_eq!(endpoints[0].key, "users.show");
        assert_eq!(endpoints[0].namespace, "myplugin/v1");
        assert_eq!(endpoints[0].pattern, "users/{id}");
        assert_eq!(endpoints[0].methods, Methods::GET);

        let url = registry.url_for("users.show", &Params::new().with("id", "42"));
        assert_eq!(url.as_deref(), Some("/myplugin/v1/users/42"));
    }
}
