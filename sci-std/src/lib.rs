//! # sci-std
//!
//! Pattern compiler, route registry and dispatcher for the Sci REST route
//! engine.
//!
//! This crate provides:
//! - **Patterns**: [`pattern::PatternCompiler`] for the `{name?|regex}` placeholder syntax
//! - **Routes**: [`route::Route`] definitions with `where`-style refinement
//! - **Registry**: [`registry::RegistryBuilder`] and the sealed [`registry::Registry`]
//! - **Dispatch**: [`dispatch::Dispatcher`], first match in declaration order
//! - **Collaborators**: [`resolver::TableResolver`], [`include::TemplateIncluder`]

#![deny(clippy::wildcard_imports)]
#![warn(missing_docs)]

// Re-export core types
pub use sci_core;

// Modules
pub mod dispatch;
pub mod include;
pub mod pattern;
pub mod registry;
pub mod resolver;
pub mod route;
pub mod testing;

#[cfg(feature = "tower")]
pub mod service;
