//! Route definitions.
//!
//! A [`Route`] binds a namespace, a method set, a compiled pattern and an
//! [`Action`]. It is built once, optionally refined with
//! [`where_param`](Route::where_param), then consumed by registration.
//!
//! # Example
//!
//! ```rust,ignore
//! let mut routes = RegistryBuilder::new();
//!
//! Route::get("myplugin/v1", "users/{id}", show_user)?
//!     .where_param("id", r"\d+")?
//!     .register(&mut routes, Some("users.show"))?;
//!
//! Route::commit(&mut routes, "myplugin/v1", ["get", "post"], "files/{name?}", "files.index")?;
//! ```

use crate::{
    pattern::{CompiledPattern, Matcher, ParamSpec, PatternCompiler, normalize_path},
    registry::{RegistryBuilder, RouteKey},
};
use sci_core::{Action, IntoMethods, Method, Methods, Params, RegistryError, RouteError};

/// A route definition.
#[derive(Debug, Clone)]
pub struct Route {
    namespace: String,
    methods: Methods,
    pattern: CompiledPattern,
    matcher: Matcher,
    action: Action,
    compiler: PatternCompiler,
}

impl Route {
    /// Build a route with the default compiler.
    pub fn new(
        namespace: impl Into<String>,
        methods: impl IntoMethods,
        pattern: &str,
        action: impl Into<Action>,
    ) -> Result<Self, RouteError> {
        Self::with_compiler(&PatternCompiler::default(), namespace, methods, pattern, action)
    }

    /// Build a route with a specific compiler.
    pub fn with_compiler(
        compiler: &PatternCompiler,
        namespace: impl Into<String>,
        methods: impl IntoMethods,
        pattern: &str,
        action: impl Into<Action>,
    ) -> Result<Self, RouteError> {
        let methods = methods.into_methods()?;
        let (pattern, matcher) = compiler.compile(pattern)?;
        let namespace = namespace.into().trim_matches('/').to_string();

        Ok(Self {
            namespace,
            methods,
            pattern,
            matcher,
            action: action.into(),
            compiler: compiler.clone(),
        })
    }

    /// Build a route without registering it. Alias of [`Route::new`].
    pub fn create(
        namespace: impl Into<String>,
        methods: impl IntoMethods,
        pattern: &str,
        action: impl Into<Action>,
    ) -> Result<Self, RouteError> {
        Self::new(namespace, methods, pattern, action)
    }

    /// Build a route and register it under a derived key.
    pub fn commit(
        registry: &mut RegistryBuilder,
        namespace: impl Into<String>,
        methods: impl IntoMethods,
        pattern: &str,
        action: impl Into<Action>,
    ) -> Result<RouteKey, RegistryError> {
        registry
            .route(namespace, methods, pattern, action)?
            .register(registry, None)
    }

    /// A route answering `GET`.
    pub fn get(
        namespace: impl Into<String>,
        pattern: &str,
        action: impl Into<Action>,
    ) -> Result<Self, RouteError> {
        Self::new(namespace, Method::Get, pattern, action)
    }

    /// A route answering `POST`.
    pub fn post(
        namespace: impl Into<String>,
        pattern: &str,
        action: impl Into<Action>,
    ) -> Result<Self, RouteError> {
        Self::new(namespace, Method::Post, pattern, action)
    }

    /// A route answering `PUT`.
    pub fn put(
        namespace: impl Into<String>,
        pattern: &str,
        action: impl Into<Action>,
    ) -> Result<Self, RouteError> {
        Self::new(namespace, Method::Put, pattern, action)
    }

    /// A route answering `PATCH`.
    pub fn patch(
        namespace: impl Into<String>,
        pattern: &str,
        action: impl Into<Action>,
    ) -> Result<Self, RouteError> {
        Self::new(namespace, Method::Patch, pattern, action)
    }

    /// A route answering `DELETE`.
    pub fn delete(
        namespace: impl Into<String>,
        pattern: &str,
        action: impl Into<Action>,
    ) -> Result<Self, RouteError> {
        Self::new(namespace, Method::Delete, pattern, action)
    }

    /// A route answering `OPTIONS`.
    pub fn options(
        namespace: impl Into<String>,
        pattern: &str,
        action: impl Into<Action>,
    ) -> Result<Self, RouteError> {
        Self::new(namespace, Method::Options, pattern, action)
    }

    /// A route answering every supported method.
    pub fn any(
        namespace: impl Into<String>,
        pattern: &str,
        action: impl Into<Action>,
    ) -> Result<Self, RouteError> {
        Self::new(namespace, Methods::all(), pattern, action)
    }

    /// A route answering an explicit method set.
    pub fn matching(
        namespace: impl Into<String>,
        methods: impl IntoMethods,
        pattern: &str,
        action: impl Into<Action>,
    ) -> Result<Self, RouteError> {
        Self::new(namespace, methods, pattern, action)
    }

    /// Refine the constraint of one parameter.
    ///
    /// Optional parameters stay optional. On error the route is dropped;
    /// use [`constrain`](Route::constrain) to keep it.
    pub fn where_param(mut self, name: &str, constraint: &str) -> Result<Self, RouteError> {
        self.constrain(name, constraint)?;
        Ok(self)
    }

    /// Refine the constraints of several parameters at once.
    pub fn where_params<'a, I>(mut self, constraints: I) -> Result<Self, RouteError>
    where
        I: IntoIterator<Item = (&'a str, &'a str)>,
    {
        self.constrain_all(constraints)?;
        Ok(self)
    }

    /// Refine one constraint in place.
    ///
    /// Either the constraint is replaced and the matcher rebuilt, or the
    /// route is left unchanged and the error returned.
    pub fn constrain(&mut self, name: &str, constraint: &str) -> Result<(), RouteError> {
        self.constrain_all([(name, constraint)])
    }

    /// Refine several constraints in place, all or nothing.
    pub fn constrain_all<'a, I>(&mut self, constraints: I) -> Result<(), RouteError>
    where
        I: IntoIterator<Item = (&'a str, &'a str)>,
    {
        let mut pattern = self.pattern.clone();
        for (name, constraint) in constraints {
            pattern.constrain(name, constraint)?;
        }
        let matcher = self.compiler.matcher(&pattern)?;

        tracing::debug!(
            namespace = %self.namespace,
            pattern = %pattern,
            matcher = %matcher,
            "refined route constraints"
        );
        self.pattern = pattern;
        self.matcher = matcher;
        Ok(())
    }

    /// Register this route, under `name` if given.
    pub fn register(
        self,
        registry: &mut RegistryBuilder,
        name: Option<&str>,
    ) -> Result<RouteKey, RegistryError> {
        registry.register(self, name)
    }

    /// Match a request against this route.
    ///
    /// Returns the captured parameters when the method is allowed and the
    /// path matches.
    pub fn matches(&self, method: Method, path: &str) -> Option<Params> {
        if !self.methods.allows(method) {
            return None;
        }
        self.matcher.captures(normalize_path(path))
    }

    /// Build a concrete path (below the namespace) from `params`.
    ///
    /// Returns `None` if a required parameter is missing or a value does not
    /// satisfy its constraint.
    pub fn url_for(&self, params: &Params) -> Option<String> {
        let path = self.pattern.fill(params)?;
        self.matcher.is_match(&path).then_some(path)
    }

    /// The namespace.
    pub fn namespace(&self) -> &str {
        &self.namespace
    }

    /// The allowed methods.
    pub fn methods(&self) -> Methods {
        self.methods
    }

    /// The action.
    pub fn action(&self) -> &Action {
        &self.action
    }

    /// The compiled pattern.
    pub fn pattern(&self) -> &CompiledPattern {
        &self.pattern
    }

    /// The compiled matcher.
    pub fn matcher(&self) -> &Matcher {
        &self.matcher
    }

    /// The matcher source.
    pub fn regex(&self) -> &str {
        self.matcher.as_str()
    }

    /// The parameter table.
    pub fn params(&self) -> &[ParamSpec] {
        self.pattern.params()
    }
}
