//! HTTP verbs a route answers to.

use crate::error::ConfigurationError;
use bitflags::bitflags;
use std::fmt;

bitflags! {
    /// A set of HTTP methods.
    ///
    /// Always rendered uppercase. A route never holds an empty set.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    pub struct Methods: u8 {
        /// `GET`
        const GET = 1 << 0;
        /// `POST`
        const POST = 1 << 1;
        /// `PUT`
        const PUT = 1 << 2;
        /// `PATCH`
        const PATCH = 1 << 3;
        /// `DELETE`
        const DELETE = 1 << 4;
        /// `OPTIONS`
        const OPTIONS = 1 << 5;
    }
}

/// A single HTTP method.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Method {
    /// `GET`
    Get,
    /// `POST`
    Post,
    /// `PUT`
    Put,
    /// `PATCH`
    Patch,
    /// `DELETE`
    Delete,
    /// `OPTIONS`
    Options,
}

impl Method {
    /// All supported methods, in canonical order.
    pub const ALL: [Method; 6] = [
        Method::Get,
        Method::Post,
        Method::Put,
        Method::Patch,
        Method::Delete,
        Method::Options,
    ];

    /// The uppercase verb.
    pub const fn as_str(self) -> &'static str {
        match self {
            Method::Get => "GET",
            Method::Post => "POST",
            Method::Put => "PUT",
            Method::Patch => "PATCH",
            Method::Delete => "DELETE",
            Method::Options => "OPTIONS",
        }
    }

    /// Parse a verb case-insensitively.
    pub fn parse(verb: &str) -> Result<Self, ConfigurationError> {
        let upper = verb.trim().to_ascii_uppercase();
        Method::ALL
            .into_iter()
            .find(|m| m.as_str() == upper)
            .ok_or_else(|| ConfigurationError::UnknownMethod(verb.to_string()))
    }

    const fn flag(self) -> Methods {
        match self {
            Method::Get => Methods::GET,
            Method::Post => Methods::POST,
            Method::Put => Methods::PUT,
            Method::Patch => Methods::PATCH,
            Method::Delete => Methods::DELETE,
            Method::Options => Methods::OPTIONS,
        }
    }
}

impl fmt::Display for Method {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for Method {
    type Err = ConfigurationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Method::parse(s)
    }
}

impl From<Method> for Methods {
    fn from(method: Method) -> Self {
        method.flag()
    }
}

impl Methods {
    /// Whether the set contains `method`.
    pub fn allows(self, method: Method) -> bool {
        self.contains(method.flag())
    }

    /// Iterate the methods in canonical order.
    pub fn methods(self) -> impl Iterator<Item = Method> {
        Method::ALL.into_iter().filter(move |m| self.allows(*m))
    }

    /// The uppercase verbs in canonical order.
    pub fn verbs(self) -> Vec<&'static str> {
        self.methods().map(Method::as_str).collect()
    }
}

impl fmt::Display for Methods {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.verbs().join("|"))
    }
}

/// Conversion into a non-empty [`Methods`] set.
///
/// Implemented for a single verb, a single [`Method`], and collections of either,
/// so route constructors accept `"get"`, `Method::Post`, or `["get", "post"]`.
pub trait IntoMethods {
    /// Normalize into a method set.
    fn into_methods(self) -> Result<Methods, ConfigurationError>;
}

impl IntoMethods for Methods {
    fn into_methods(self) -> Result<Methods, ConfigurationError> {
        if self.is_empty() {
            return Err(ConfigurationError::NoMethods);
        }
        Ok(self)
    }
}

impl IntoMethods for Method {
    fn into_methods(self) -> Result<Methods, ConfigurationError> {
        Ok(self.flag())
    }
}

impl IntoMethods for &str {
    fn into_methods(self) -> Result<Methods, ConfigurationError> {
        Method::parse(self).map(Method::flag)
    }
}

impl IntoMethods for String {
    fn into_methods(self) -> Result<Methods, ConfigurationError> {
        self.as_str().into_methods()
    }
}

fn collect<I, T>(items: I) -> Result<Methods, ConfigurationError>
where
    I: IntoIterator<Item = T>,
    T: IntoMethods,
{
    let mut set = Methods::empty();
    for item in items {
        set |= item.into_methods()?;
    }
    set.into_methods()
}

impl<T: IntoMethods> IntoMethods for Vec<T> {
    fn into_methods(self) -> Result<Methods, ConfigurationError> {
        collect(self)
    }
}

impl<T: IntoMethods, const N: usize> IntoMethods for [T; N] {
    fn into_methods(self) -> Result<Methods, ConfigurationError> {
        collect(self)
    }
}

impl<T: IntoMethods + Clone> IntoMethods for &[T] {
    fn into_methods(self) -> Result<Methods, ConfigurationError> {
        collect(self.iter().cloned())
    }
}
