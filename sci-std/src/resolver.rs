//! A table-backed [`ActionResolver`].
//!
//! Delegated identifiers such as `"users.show"` are looked up in a map built
//! at bootstrap. Arguments are bound by name exactly like in-process
//! invocables.

use sci_core::{
    Action, ActionResolver, Arguments, DynInvocable, Invocable, Params, ResolveError, Response,
};
use std::{collections::HashMap, fmt, sync::Arc};

/// Resolves delegated actions from a fixed table.
#[derive(Clone, Default)]
pub struct TableResolver {
    actions: HashMap<String, Arc<dyn DynInvocable>>,
}

impl TableResolver {
    /// Start building a table.
    pub fn builder() -> TableResolverBuilder {
        TableResolverBuilder::default()
    }

    /// Whether `action` is known.
    pub fn contains(&self, action: &str) -> bool {
        self.actions.contains_key(action)
    }

    /// Number of known actions.
    pub fn len(&self) -> usize {
        self.actions.len()
    }

    /// Whether the table is empty.
    pub fn is_empty(&self) -> bool {
        self.actions.is_empty()
    }
}

impl fmt::Debug for TableResolver {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut names: Vec<_> = self.actions.keys().collect();
        names.sort();
        f.debug_struct("TableResolver")
            .field("actions", &names)
            .finish()
    }
}

impl ActionResolver for TableResolver {
    async fn resolve(
        &self,
        action: &str,
        params: Option<&Params>,
    ) -> Result<Response, ResolveError> {
        let target = self
            .actions
            .get(action)
            .ok_or_else(|| ResolveError::NotFound(action.to_string()))?;

        let args = match params {
            Some(params) => Arguments::bind(target.parameter_names(), params),
            None => Arguments::default(),
        };
        target.invoke_dyn(args).await.map_err(ResolveError::Failed)
    }
}

/// Builder for a [`TableResolver`].
#[derive(Default)]
pub struct TableResolverBuilder {
    actions: HashMap<String, Arc<dyn DynInvocable>>,
}

impl TableResolverBuilder {
    /// Add an action. A later action with the same identifier replaces the
    /// earlier one.
    pub fn action<I: Invocable>(mut self, id: impl Into<String>, action: I) -> Self {
        self.actions.insert(id.into(), Arc::new(action));
        self
    }

    /// Add every action of a controller as `"{controller}.{action}"`.
    pub fn controller<I, N>(mut self, controller: &str, actions: I) -> Self
    where
        I: IntoIterator<Item = (N, Action)>,
        N: AsRef<str>,
    {
        for (name, action) in actions {
            if let Action::Invocable(invocable) = action {
                self.actions
                    .insert(format!("{controller}.{}", name.as_ref()), invocable);
            }
        }
        self
    }

    /// Build the resolver.
    pub fn build(self) -> TableResolver {
        TableResolver {
            actions: self.actions,
        }
    }
}
