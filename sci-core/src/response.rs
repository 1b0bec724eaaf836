//! Response values and conversion traits.

use crate::error::BoxError;

/// The value an action hands back to the host.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum Response {
    /// Nothing to send; the host decides the status.
    #[default]
    Empty,
    /// A text body.
    Text(String),
    /// A binary body.
    Bytes(Vec<u8>),
}

impl Response {
    /// Returns the body as text, if it is text.
    pub fn as_text(&self) -> Option<&str> {
        match self {
            Response::Text(s) => Some(s),
            _ => None,
        }
    }

    /// Returns true if there is no body.
    pub fn is_empty(&self) -> bool {
        match self {
            Response::Empty => true,
            Response::Text(s) => s.is_empty(),
            Response::Bytes(b) => b.is_empty(),
        }
    }
}

/// Trait for converting an action's output into a [`Response`].
///
/// # Default Implementations
///
/// - `()` → [`Response::Empty`]
/// - `String` / `&'static str` → [`Response::Text`]
/// - `Vec<u8>` → [`Response::Bytes`]
/// - `Option<T>` → `None` is [`Response::Empty`]
/// - `Result<T, E>` → Delegates to inner `T` or propagates error
#[diagnostic::on_unimplemented(
    message = "`{Self}` is not an `IntoResponse`",
    label = "missing `IntoResponse` implementation",
    note = "Actions must return a type implementing `IntoResponse`."
)]
pub trait IntoResponse {
    /// Convert the output into a response or an action error.
    fn into_response(self) -> Result<Response, BoxError>;
}

impl IntoResponse for Response {
    fn into_response(self) -> Result<Response, BoxError> {
        Ok(self)
    }
}

impl IntoResponse for () {
    fn into_response(self) -> Result<Response, BoxError> {
        Ok(Response::Empty)
    }
}

impl IntoResponse for String {
    fn into_response(self) -> Result<Response, BoxError> {
        Ok(Response::Text(self))
    }
}

impl IntoResponse for &'static str {
    fn into_response(self) -> Result<Response, BoxError> {
        Ok(Response::Text(self.to_string()))
    }
}

impl IntoResponse for Vec<u8> {
    fn into_response(self) -> Result<Response, BoxError> {
        Ok(Response::Bytes(self))
    }
}

impl<T: IntoResponse> IntoResponse for Option<T> {
    fn into_response(self) -> Result<Response, BoxError> {
        match self {
            Some(t) => t.into_response(),
            None => Ok(Response::Empty),
        }
    }
}

impl<T, E> IntoResponse for Result<T, E>
where
    T: IntoResponse,
    E: Into<BoxError>,
{
    fn into_response(self) -> Result<Response, BoxError> {
        match self {
            Ok(t) => t.into_response(),
            Err(e) => Err(e.into()),
        }
    }
}
