//! # sci - Declarative REST routes
//!
//! `sci` lets a plugin declare REST routes with a compact placeholder syntax,
//! refine their parameter constraints, and dispatch incoming requests to the
//! bound action. Registration happens once at bootstrap; the sealed registry
//! is then read by the dispatcher for every request.
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use sci::prelude::*;
//!
//! #[sci::action]
//! async fn echo_id(id: String) -> String {
//!     id
//! }
//!
//! let mut routes = RegistryBuilder::new();
//! Route::get("myplugin/v1", "users/{id}", echo_id)?
//!     .where_param("id", r"\d+")?
//!     .register(&mut routes, Some("users.show"))?;
//! Route::commit(&mut routes, "myplugin/v1", ["get", "post"], "files/{name?}", "files.index")?;
//!
//! let dispatcher = Dispatcher::builder(routes.build())
//!     .resolver(TableResolver::builder().action("files.index", list_files).build())
//!     .build();
//!
//! let outcome = dispatcher.dispatch(&Request::get("myplugin/v1", "/users/42")).await?;
//! ```
//!
//! ## Placeholders
//!
//! | Form | Meaning |
//! |------|---------|
//! | `{name}` | required, default constraint |
//! | `{name?}` | optional |
//! | `{name\|regex}` | required, custom constraint |
//! | `{name?\|regex}` | optional, custom constraint |

#![deny(clippy::wildcard_imports)]
#![warn(missing_docs)]

pub use sci_core::{
    // Actions
    Action,
    // Collaborators
    ActionResolver,
    Arguments,
    // Error types
    BoxError,
    ConfigurationError,
    DispatchError,
    DynActionResolver,
    DynInvocable,
    Endpoint,
    ExtractError,
    FileIncluder,
    FnInvocable,
    FromParam,
    IncludeError,
    IntoMethods,
    IntoResponse,
    Invocable,
    // Methods
    Method,
    Methods,
    // Parameters
    Params,
    PatternError,
    RegistryError,
    Request,
    ResolveError,
    // Response
    Response,
    RestServer,
    RouteError,
    SciError,
    UnconfiguredResolver,
    invocable,
};

pub use sci_std::{
    dispatch::{DispatchOutcome, Dispatcher, DispatcherBuilder, Resolved},
    include::TemplateIncluder,
    pattern::{
        CompiledPattern, CompilerOptions, DEFAULT_CONSTRAINT, Matcher, ParamSpec, PatternCompiler,
        Segment,
    },
    registry::{Registry, RegistryBuilder, RouteEntry, RouteKey},
    resolver::{TableResolver, TableResolverBuilder},
    route::Route,
};

#[cfg(feature = "macros")]
pub use sci_macros::action;

/// Pattern compilation.
pub mod pattern {
    pub use sci_std::pattern::{
        CompiledPattern, CompilerOptions, DEFAULT_CONSTRAINT, Matcher, ParamSpec, PatternCompiler,
        Segment, normalize_path,
    };
}

/// Testing utilities.
pub mod testing {
    #![allow(clippy::wildcard_imports)]
    pub use sci_std::testing::*;
}

/// Tower integration.
#[cfg(feature = "tower")]
pub mod service {
    pub use sci_std::service::DispatchService;
}

/// Prelude module - common imports for Sci.
///
/// # Usage
///
/// ```rust,ignore
/// use sci::prelude::*;
/// ```
pub mod prelude {
    pub use crate::{
        // Actions
        Action,
        ActionResolver,
        Arguments,
        // Errors
        BoxError,
        DispatchError,
        DispatchOutcome,
        // Dispatch
        Dispatcher,
        Invocable,
        IntoResponse,
        Method,
        Params,
        RegistryBuilder,
        RegistryError,
        Request,
        Response,
        // Routes
        Route,
        RouteError,
        TableResolver,
        invocable,
    };
}
