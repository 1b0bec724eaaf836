//! Route actions.

use crate::invocable::{DynInvocable, Invocable};
use std::{
    fmt,
    path::{Path, PathBuf},
    sync::Arc,
};

/// The unit of work bound to a route.
///
/// Matched exhaustively by the dispatcher; there is no runtime type inspection.
#[derive(Clone)]
pub enum Action {
    /// An in-process function receiving arguments bound by name.
    Invocable(Arc<dyn DynInvocable>),
    /// A file included with the captured parameters available to it.
    File(PathBuf),
    /// An identifier such as `"users.show"` handed to the action resolver.
    Delegated(String),
}

impl Action {
    /// Wrap an [`Invocable`].
    pub fn invocable<I: Invocable>(action: I) -> Self {
        Action::Invocable(Arc::new(action))
    }

    /// A file action.
    pub fn file(path: impl Into<PathBuf>) -> Self {
        Action::File(path.into())
    }

    /// A delegated action identifier.
    pub fn delegated(id: impl Into<String>) -> Self {
        Action::Delegated(id.into())
    }

    /// Classify a string action.
    ///
    /// A string containing a `.` that names an existing file is a file
    /// action; anything else is delegated to the action resolver.
    pub fn infer(value: &str) -> Self {
        if value.contains('.') && Path::new(value).is_file() {
            Action::File(PathBuf::from(value))
        } else {
            Action::Delegated(value.to_string())
        }
    }

    /// A short label for logs.
    pub fn kind(&self) -> &'static str {
        match self {
            Action::Invocable(_) => "invocable",
            Action::File(_) => "file",
            Action::Delegated(_) => "delegated",
        }
    }
}

impl fmt::Debug for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Action::Invocable(inv) => f
                .debug_tuple("Invocable")
                .field(&inv.parameter_names())
                .finish(),
            Action::File(path) => f.debug_tuple("File").field(path).finish(),
            Action::Delegated(id) => f.debug_tuple("Delegated").field(id).finish(),
        }
    }
}

impl From<&str> for Action {
    fn from(value: &str) -> Self {
        Action::infer(value)
    }
}

impl From<String> for Action {
    fn from(value: String) -> Self {
        Action::infer(&value)
    }
}

impl From<PathBuf> for Action {
    fn from(path: PathBuf) -> Self {
        Action::File(path)
    }
}

impl From<Arc<dyn DynInvocable>> for Action {
    fn from(action: Arc<dyn DynInvocable>) -> Self {
        Action::Invocable(action)
    }
}
