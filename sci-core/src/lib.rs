//! # sci-core
//!
//! Core types for the Sci REST route engine.
//!
//! This crate has minimal dependencies and carries no regex engine. It is
//! meant to be imported by hosts and action crates that only need the
//! vocabulary, not the compiler and dispatcher in `sci-std`.
//!
//! # Vocabulary
//!
//! - [`Method`] / [`Methods`] - HTTP verbs a route answers to
//! - [`Params`] / [`Arguments`] - captured values and name-bound arguments
//! - [`Action`] - invocable, file, or delegated identifier
//! - [`Invocable`] - in-process actions, see also [`invocable`]
//! - [`Response`] / [`IntoResponse`] - what an action returns
//!
//! # Collaborators
//!
//! - [`RestServer`] - the HTTP host
//! - [`ActionResolver`] - delegated action targets
//! - [`FileIncluder`] - file actions
//!
//! # Error Types
//!
//! - [`SciError`] - Top-level error type
//! - [`RouteError`] / [`RegistryError`] - Registration-time errors
//! - [`DispatchError`] - Per-request errors

#![deny(clippy::wildcard_imports)]
#![warn(missing_docs)]

mod action;
mod collaborator;
mod error;
mod invocable;
mod method;
mod params;
mod response;

// Re-exports
pub use action::Action;
pub use collaborator::{
    ActionResolver, DynActionResolver, Endpoint, FileIncluder, Request, RestServer,
    UnconfiguredResolver,
};
pub use error::{
    BoxError, ConfigurationError, DispatchError, IncludeError, PatternError, RegistryError,
    ResolveError, RouteError, SciError,
};
pub use invocable::{DynInvocable, FnInvocable, Invocable, invocable};
pub use method::{IntoMethods, Method, Methods};
pub use params::{Arguments, ExtractError, FromParam, Params};
pub use response::{IntoResponse, Response};
