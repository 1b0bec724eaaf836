//! # Invocable actions
//!
//! An invocable is the in-process kind of route action: a function that
//! declares the parameter names it wants and receives them as [`Arguments`].
//!
//! # Usage Patterns
//!
//! 1. **Attribute macro**: `#[sci::action] async fn show(id: u32) -> String`
//! 2. **Closure**: `invocable(["id"], |args: Arguments| async move { ... })`
//! 3. **Struct implementation**: `impl Invocable for MyAction`
//!
//! The dispatcher binds arguments by name: every declared name the matched
//! route captured is passed, names it does not capture are omitted.

use crate::{
    action::Action,
    error::BoxError,
    params::Arguments,
    response::{IntoResponse, Response},
};
use std::{future::Future, pin::Pin};

/// An action invoked with arguments bound by parameter name.
#[diagnostic::on_unimplemented(
    message = "`{Self}` cannot be used as a route action",
    label = "missing `Invocable` implementation",
    note = "Use `#[sci::action]`, `sci::invocable(..)`, or implement `Invocable`."
)]
pub trait Invocable: Send + Sync + 'static {
    /// Parameter names this action accepts, in declaration order.
    fn parameters(&self) -> &[&'static str];

    /// Executes the action.
    fn invoke(&self, args: Arguments) -> impl Future<Output = Result<Response, BoxError>> + Send;
}

/// Dynamic object-safe version of [`Invocable`].
///
/// Use this trait when you need runtime polymorphism (e.g., inside an [`Action`]).
///
/// [`Action`]: crate::Action
pub trait DynInvocable: Send + Sync + 'static {
    /// Parameter names this action accepts (dynamic dispatch version).
    fn parameter_names(&self) -> &[&'static str];

    /// Executes the action (dynamic dispatch version).
    fn invoke_dyn<'a>(
        &'a self,
        args: Arguments,
    ) -> Pin<Box<dyn Future<Output = Result<Response, BoxError>> + Send + 'a>>;
}

// Blanket implementation: Any type implementing Invocable implements DynInvocable automatically.
impl<T: Invocable> DynInvocable for T {
    fn parameter_names(&self) -> &[&'static str] {
        self.parameters()
    }

    fn invoke_dyn<'a>(
        &'a self,
        args: Arguments,
    ) -> Pin<Box<dyn Future<Output = Result<Response, BoxError>> + Send + 'a>> {
        Box::pin(self.invoke(args))
    }
}

/// An [`Invocable`] built from a closure and an explicit list of names.
pub struct FnInvocable<F> {
    names: Vec<&'static str>,
    func: F,
}

impl<F> FnInvocable<F> {
    /// Create a new closure-backed invocable.
    pub fn new(names: impl IntoIterator<Item = &'static str>, func: F) -> Self {
        Self {
            names: names.into_iter().collect(),
            func,
        }
    }
}

impl<F, Fut, Out> Invocable for FnInvocable<F>
where
    F: Fn(Arguments) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = Out> + Send,
    Out: IntoResponse,
{
    fn parameters(&self) -> &[&'static str] {
        &self.names
    }

    async fn invoke(&self, args: Arguments) -> Result<Response, BoxError> {
        (self.func)(args).await.into_response()
    }
}

impl<F> From<FnInvocable<F>> for Action
where
    FnInvocable<F>: Invocable,
{
    fn from(action: FnInvocable<F>) -> Self {
        Action::invocable(action)
    }
}

/// Shorthand for [`FnInvocable::new`].
///
/// ```rust,ignore
/// let show = invocable(["id"], |args: Arguments| async move {
///     format!("user {}", args.get("id").unwrap_or_default())
/// });
/// ```
pub fn invocable<F, Fut, Out>(
    names: impl IntoIterator<Item = &'static str>,
    func: F,
) -> FnInvocable<F>
where
    F: Fn(Arguments) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = Out> + Send,
    Out: IntoResponse,
{
    FnInvocable::new(names, func)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::params::Params;

    #[tokio::test]
    async fn test_closure_receives_bound_arguments() {
        let echo = invocable(["id"], |args: Arguments| async move {
            format!("id={}", args.get("id").unwrap_or("-"))
        });
        assert_eq!(echo.parameters(), &["id"]);

        let args = Arguments::bind(echo.parameters(), &Params::new().with("id", "7"));
        let out = echo.invoke(args).await.unwrap();
        assert_eq!(out, Response::Text("id=7".to_string()));
    }

    #[tokio::test]
    async fn test_dyn_invocable_error_surfaces() {
        let failing = invocable(Vec::new(), |_args: Arguments| async move {
            Err::<String, _>(std::io::Error::other("broken"))
        });
        let boxed: Box<dyn DynInvocable> = Box::new(failing);
        assert!(boxed.parameter_names().is_empty());

        let err = boxed.invoke_dyn(Arguments::default()).await.unwrap_err();
        assert_eq!(err.to_string(), "broken");
    }
}
