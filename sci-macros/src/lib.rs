//! Procedural macros for the Sci REST route engine.
//!
//! - `#[action]` - turn a function into an `Invocable` route action

use proc_macro::TokenStream;

mod action;

/// Turn a function into a route action.
///
/// The function's parameter names become the names the action is bound by.
/// Each parameter type must implement `FromParam`: `String` and the numeric
/// types require the value, `Option<T>` also accepts an absent one. The
/// return value goes through `IntoResponse`.
///
/// ```rust,ignore
/// #[sci::action]
/// async fn show_user(id: u64, tab: Option<String>) -> String {
///     format!("user {id} {}", tab.unwrap_or_default())
/// }
///
/// Route::get("myplugin/v1", "users/{id}/{tab?}", show_user)?;
/// ```
///
/// A unit struct named after the function is generated. Use
/// `#[action(name = "ShowUser")]` to pick another name.
#[proc_macro_attribute]
pub fn action(attr: TokenStream, item: TokenStream) -> TokenStream {
    action::action_impl(attr, item)
}
