//! Testing utilities.
//!
//! Stand-ins for the collaborators a route engine talks to, so that routes
//! and dispatch can be tested without a real host.
//!
//! # Features
//!
//! - [`RecordingServer`]: A [`RestServer`] that records exposed endpoints
//! - [`RecordingResolver`]: An [`ActionResolver`] that records calls and returns canned responses
//! - [`CountingAction`]: An [`Invocable`] that counts calls and keeps the arguments it got

use sci_core::{
    ActionResolver, Arguments, BoxError, Endpoint, Invocable, Params, ResolveError, Response,
    RestServer,
};
use std::{
    collections::HashMap,
    sync::{
        Arc, Mutex,
        atomic::{AtomicUsize, Ordering},
    },
};

// ============================================================================
// Recording Server
// ============================================================================

/// A host that records every endpoint handed to it.
///
/// # Example
///
/// ```rust,ignore
/// let mut server = RecordingServer::new();
/// dispatcher.expose(&mut server)?;
/// assert_eq!(server.endpoints().len(), 2);
/// ```
#[derive(Debug, Clone, Default)]
pub struct RecordingServer {
    endpoints: Vec<Endpoint>,
    reject: Option<String>,
}

impl RecordingServer {
    /// Create an empty server.
    pub fn new() -> Self {
        Self::default()
    }

    /// A server that refuses endpoints whose key equals `key`.
    pub fn rejecting(key: impl Into<String>) -> Self {
        Self {
            endpoints: Vec::new(),
            reject: Some(key.into()),
        }
    }

    /// The recorded endpoints.
    pub fn endpoints(&self) -> &[Endpoint] {
        &self.endpoints
    }

    /// Recorded endpoint keys, in order.
    pub fn keys(&self) -> Vec<&str> {
        self.endpoints.iter().map(|e| e.key.as_str()).collect()
    }
}

impl RestServer for RecordingServer {
    fn register_endpoint(&mut self, endpoint: Endpoint) -> Result<(), BoxError> {
        if self.reject.as_deref() == Some(endpoint.key.as_str()) {
            return Err(format!("endpoint `{}` rejected", endpoint.key).into());
        }
        self.endpoints.push(endpoint);
        Ok(())
    }
}

// ============================================================================
// Recording Resolver
// ============================================================================

/// A resolver answering with canned responses and recording each call.
///
/// Unknown identifiers fail with [`ResolveError::NotFound`].
#[derive(Clone, Default)]
pub struct RecordingResolver {
    responses: HashMap<String, Response>,
    calls: Arc<Mutex<Vec<(String, Option<Params>)>>>,
}

impl RecordingResolver {
    /// Create a resolver that knows no actions.
    pub fn new() -> Self {
        Self::default()
    }

    /// Answer `action` with a text response.
    pub fn with_response(mut self, action: impl Into<String>, body: impl Into<String>) -> Self {
        self.responses
            .insert(action.into(), Response::Text(body.into()));
        self
    }

    /// Recorded calls: identifier and the parameters passed, if any.
    pub fn calls(&self) -> Vec<(String, Option<Params>)> {
        self.calls.lock().unwrap().clone()
    }

    /// Number of calls.
    pub fn call_count(&self) -> usize {
        self.calls.lock().unwrap().len()
    }
}

impl ActionResolver for RecordingResolver {
    async fn resolve(
        &self,
        action: &str,
        params: Option<&Params>,
    ) -> Result<Response, ResolveError> {
        self.calls
            .lock()
            .unwrap()
            .push((action.to_string(), params.cloned()));

        self.responses
            .get(action)
            .cloned()
            .ok_or_else(|| ResolveError::NotFound(action.to_string()))
    }
}

// ============================================================================
// Counting Action
// ============================================================================

/// An invocable that counts calls and keeps the last arguments.
///
/// # Example
///
/// ```rust,ignore
/// let counter = CountingAction::new(["id"]);
/// Route::get("ns", "users/{id}", Action::invocable(counter.clone()))?;
///
/// dispatcher.dispatch(&Request::get("ns", "users/1")).await?;
/// assert_eq!(counter.count(), 1);
/// ```
#[derive(Clone)]
pub struct CountingAction {
    names: Vec<&'static str>,
    count: Arc<AtomicUsize>,
    last: Arc<Mutex<Option<Arguments>>>,
    error: Option<String>,
}

impl CountingAction {
    /// Create a counter declaring `names` as its parameters.
    pub fn new(names: impl IntoIterator<Item = &'static str>) -> Self {
        Self {
            names: names.into_iter().collect(),
            count: Arc::new(AtomicUsize::new(0)),
            last: Arc::new(Mutex::new(None)),
            error: None,
        }
    }

    /// Make every call fail with `message` (after counting it).
    pub fn failing(mut self, message: impl Into<String>) -> Self {
        self.error = Some(message.into());
        self
    }

    /// Get the current count.
    pub fn count(&self) -> usize {
        self.count.load(Ordering::SeqCst)
    }

    /// The arguments of the last call.
    pub fn last_arguments(&self) -> Option<Arguments> {
        self.last.lock().unwrap().clone()
    }

    /// Reset the counter.
    pub fn reset(&self) {
        self.count.store(0, Ordering::SeqCst);
        *self.last.lock().unwrap() = None;
    }
}

impl Invocable for CountingAction {
    fn parameters(&self) -> &[&'static str] {
        &self.names
    }

    async fn invoke(&self, args: Arguments) -> Result<Response, BoxError> {
        self.count.fetch_add(1, Ordering::SeqCst);
        *self.last.lock().unwrap() = Some(args);

        match &self.error {
            Some(message) => Err(message.clone().into()),
            None => Ok(Response::Empty),
        }
    }
}
