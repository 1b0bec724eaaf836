//! Error types for Sci.
//!
//! This module provides a structured error hierarchy using `thiserror`:
//!
//! - [`SciError`] - Top-level error type for all Sci operations
//! - [`PatternError`] - Malformed route patterns and constraints
//! - [`ConfigurationError`] - Invalid route configuration
//! - [`RouteError`] - Anything that aborts building a single route
//! - [`RegistryError`] - Errors while registering a route
//! - [`DispatchError`] - Per-request resolution and invocation errors
//! - [`ResolveError`] / [`IncludeError`] - Collaborator errors

use std::path::PathBuf;
use thiserror::Error;

/// A boxed error type for dynamic error handling.
pub type BoxError = Box<dyn std::error::Error + Send + Sync + 'static>;

/// Top-level error type for all Sci operations.
#[derive(Error, Debug)]
pub enum SciError {
    /// A route could not be built.
    #[error("route error: {0}")]
    Route(#[from] RouteError),

    /// A route could not be registered.
    #[error("registry error: {0}")]
    Registry(#[from] RegistryError),

    /// A request could not be dispatched.
    #[error("dispatch error: {0}")]
    Dispatch(#[from] DispatchError),

    /// A custom error occurred.
    #[error(transparent)]
    Custom(BoxError),
}

/// A route pattern could not be compiled.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum PatternError {
    /// A `{` was never closed.
    #[error("unclosed placeholder starting at byte {position} in `{pattern}`")]
    UnclosedPlaceholder {
        /// The pattern being compiled.
        pattern: String,
        /// Byte offset of the `{`.
        position: usize,
    },

    /// A `}` appeared outside of a placeholder.
    #[error("unexpected `}}` at byte {position} in `{pattern}`")]
    UnexpectedClose {
        /// The pattern being compiled.
        pattern: String,
        /// Byte offset of the `}`.
        position: usize,
    },

    /// A placeholder has no parameter name, e.g. `{}` or `{?}`.
    #[error("empty parameter name at byte {position} in `{pattern}`")]
    EmptyName {
        /// The pattern being compiled.
        pattern: String,
        /// Byte offset of the placeholder.
        position: usize,
    },

    /// The parameter name cannot be used as a capture group name.
    #[error("invalid parameter name `{name}` in `{pattern}`")]
    InvalidName {
        /// The pattern being compiled.
        pattern: String,
        /// The rejected name.
        name: String,
    },

    /// The same parameter name appears twice in one pattern.
    #[error("parameter `{name}` declared more than once in `{pattern}`")]
    DuplicateParameter {
        /// The pattern being compiled.
        pattern: String,
        /// The repeated name.
        name: String,
    },

    /// The pattern is longer than the compiler accepts.
    #[error("pattern is {length} bytes long, the limit is {limit}")]
    TooLong {
        /// Length of the pattern, in bytes.
        length: usize,
        /// The configured maximum.
        limit: usize,
    },

    /// The generated matcher (usually a custom constraint) is not a valid regex.
    #[error("invalid constraint in `{pattern}`: {message}")]
    InvalidConstraint {
        /// The pattern being compiled.
        pattern: String,
        /// The regex error.
        message: String,
    },
}

/// A route was configured inconsistently.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ConfigurationError {
    /// `where` referenced a parameter the pattern does not declare.
    #[error("parameter `{name}` is not declared by pattern `{pattern}`")]
    UnknownParameter {
        /// The normalized pattern of the route.
        pattern: String,
        /// The undeclared name.
        name: String,
    },

    /// A method string is not a supported HTTP verb.
    #[error("unsupported HTTP method `{0}`")]
    UnknownMethod(String),

    /// A route was given an empty method set.
    #[error("a route needs at least one HTTP method")]
    NoMethods,
}

/// Errors that abort building a single route.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum RouteError {
    /// The pattern is malformed.
    #[error(transparent)]
    Pattern(#[from] PatternError),

    /// The route configuration is inconsistent.
    #[error(transparent)]
    Configuration(#[from] ConfigurationError),
}

/// Errors that can occur while registering a route.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum RegistryError {
    /// A route with the same explicit name is already registered.
    #[error("route already registered under name `{0}`")]
    DuplicateRoute(String),

    /// The route itself could not be built.
    #[error(transparent)]
    Route(#[from] RouteError),
}

impl From<PatternError> for RegistryError {
    fn from(err: PatternError) -> Self {
        RegistryError::Route(err.into())
    }
}

impl From<ConfigurationError> for RegistryError {
    fn from(err: ConfigurationError) -> Self {
        RegistryError::Route(err.into())
    }
}

/// Errors returned by an [`ActionResolver`](crate::ActionResolver).
#[derive(Error, Debug)]
pub enum ResolveError {
    /// No target is known for the action identifier.
    #[error("no action registered for `{0}`")]
    NotFound(String),

    /// The target was found but failed.
    #[error(transparent)]
    Failed(BoxError),
}

/// Errors returned by a [`FileIncluder`](crate::FileIncluder).
#[derive(Error, Debug)]
pub enum IncludeError {
    /// The file does not exist or could not be read.
    #[error("cannot include `{path}`")]
    Io {
        /// The file that was included.
        path: PathBuf,
        /// The I/O failure.
        #[source]
        source: std::io::Error,
    },

    /// The file was read but could not be rendered.
    #[error("cannot render `{path}`: {message}")]
    Render {
        /// The file that was included.
        path: PathBuf,
        /// What went wrong.
        message: String,
    },
}

/// Errors that can occur while dispatching one request.
///
/// These never affect other requests; the host decides how to report them.
#[derive(Error, Debug)]
pub enum DispatchError {
    /// A delegated action identifier is unknown to the resolver.
    #[error("action `{0}` not found")]
    ActionNotFound(String),

    /// The action ran and failed. The source is the action's own error.
    #[error("action for route `{route}` failed")]
    Invocation {
        /// Key of the matched route.
        route: String,
        /// The action's error.
        #[source]
        source: BoxError,
    },

    /// A file action could not be included.
    #[error(transparent)]
    Include(#[from] IncludeError),
}

impl DispatchError {
    /// Wrap an action failure for the given route key.
    pub fn invocation(route: impl Into<String>, source: impl Into<BoxError>) -> Self {
        DispatchError::Invocation {
            route: route.into(),
            source: source.into(),
        }
    }
}

// Convenience conversions
impl From<BoxError> for SciError {
    fn from(err: BoxError) -> Self {
        SciError::Custom(err)
    }
}

impl From<BoxError> for ResolveError {
    fn from(err: BoxError) -> Self {
        ResolveError::Failed(err)
    }
}
