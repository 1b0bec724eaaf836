//! Captured route parameters and the arguments bound from them.
//!
//! A matched route yields [`Params`]: one entry per declared parameter, in
//! pattern order. An optional parameter that did not take part in the match
//! is stored as `None`, which is distinct from an empty capture `Some("")`.
//!
//! [`Arguments`] is the subset of [`Params`] an invocable asked for by name.

use std::fmt;

/// Parameter values extracted from a request path.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Params {
    entries: Vec<(String, Option<String>)>,
}

impl Params {
    /// Create an empty parameter map.
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a captured value. Replaces an existing entry with the same name.
    pub fn insert(&mut self, name: impl Into<String>, value: Option<String>) {
        let name = name.into();
        match self.entries.iter_mut().find(|(n, _)| *n == name) {
            Some(entry) => entry.1 = value,
            None => self.entries.push((name, value)),
        }
    }

    /// Builder-style [`insert`](Self::insert) of a present value.
    pub fn with(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.insert(name, Some(value.into()));
        self
    }

    /// Builder-style [`insert`](Self::insert) of an absent value.
    pub fn with_absent(mut self, name: impl Into<String>) -> Self {
        self.insert(name, None);
        self
    }

    /// The value of `name`, if it was captured and present.
    pub fn get(&self, name: &str) -> Option<&str> {
        self.entry(name).and_then(|v| v.as_deref())
    }

    /// The raw entry for `name`: `None` if undeclared, `Some(None)` if absent.
    pub fn entry(&self, name: &str) -> Option<&Option<String>> {
        self.entries.iter().find(|(n, _)| n == name).map(|(_, v)| v)
    }

    /// Whether `name` is declared and resolved to the absent marker.
    pub fn is_absent(&self, name: &str) -> bool {
        matches!(self.entry(name), Some(None))
    }

    /// Whether `name` has an entry at all.
    pub fn contains(&self, name: &str) -> bool {
        self.entry(name).is_some()
    }

    /// Iterate `(name, value)` pairs in pattern order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, Option<&str>)> {
        self.entries
            .iter()
            .map(|(n, v)| (n.as_str(), v.as_deref()))
    }

    /// Parameter names in pattern order.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|(n, _)| n.as_str())
    }

    /// Number of entries.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether no parameters were captured.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl<N: Into<String>> FromIterator<(N, Option<String>)> for Params {
    fn from_iter<I: IntoIterator<Item = (N, Option<String>)>>(iter: I) -> Self {
        let mut params = Params::new();
        for (name, value) in iter {
            params.insert(name, value);
        }
        params
    }
}

impl fmt::Display for Params {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("{")?;
        for (i, (name, value)) in self.iter().enumerate() {
            if i > 0 {
                f.write_str(", ")?;
            }
            match value {
                Some(v) => write!(f, "{name}: {v:?}")?,
                None => write!(f, "{name}: <absent>")?,
            }
        }
        f.write_str("}")
    }
}

/// Arguments bound to an invocable by parameter name.
///
/// Built by intersecting the invocable's declared parameter names with the
/// captured [`Params`]; names the route does not capture are omitted.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Arguments {
    bound: Params,
}

impl Arguments {
    /// Bind `names` against `params`, keeping the invocable's order.
    pub fn bind(names: &[&str], params: &Params) -> Self {
        let bound = names
            .iter()
            .filter_map(|name| params.entry(name).map(|v| (*name, v.clone())))
            .collect();
        Self { bound }
    }

    /// Whether `name` was bound (the route captures it).
    pub fn is_bound(&self, name: &str) -> bool {
        self.bound.contains(name)
    }

    /// The bound value of `name`, `None` if omitted or absent.
    pub fn get(&self, name: &str) -> Option<&str> {
        self.bound.get(name)
    }

    /// Extract `name` as `T`.
    pub fn extract<T: FromParam>(&self, name: &str) -> Result<T, ExtractError> {
        T::from_param(name, self.get(name))
    }

    /// The bound values as a parameter map.
    pub fn params(&self) -> &Params {
        &self.bound
    }

    /// Number of bound arguments.
    pub fn len(&self) -> usize {
        self.bound.len()
    }

    /// Whether nothing was bound.
    pub fn is_empty(&self) -> bool {
        self.bound.is_empty()
    }
}

/// Error type for extraction failures.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExtractError {
    name: String,
    message: String,
}

impl ExtractError {
    /// Create a new extraction error for parameter `name`.
    pub fn new(name: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            message: message.into(),
        }
    }

    /// The parameter that failed to extract.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Get the error message.
    pub fn message(&self) -> &str {
        &self.message
    }
}

impl fmt::Display for ExtractError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "parameter `{}`: {}", self.name, self.message)
    }
}

impl std::error::Error for ExtractError {}

/// A trait for converting one bound parameter into a typed argument.
///
/// `value` is `None` both when the route does not capture the name and when
/// an optional parameter was absent. Use `Option<T>` to accept either.
pub trait FromParam: Sized {
    /// Convert the raw value.
    fn from_param(name: &str, value: Option<&str>) -> Result<Self, ExtractError>;
}

impl FromParam for String {
    fn from_param(name: &str, value: Option<&str>) -> Result<Self, ExtractError> {
        value
            .map(str::to_owned)
            .ok_or_else(|| ExtractError::new(name, "missing value"))
    }
}

impl<T: FromParam> FromParam for Option<T> {
    fn from_param(name: &str, value: Option<&str>) -> Result<Self, ExtractError> {
        match value {
            Some(_) => T::from_param(name, value).map(Some),
            None => Ok(None),
        }
    }
}

/// Macro to implement FromParam for `FromStr` scalars.
macro_rules! impl_from_param_parse {
    ($($T:ty),+ $(,)?) => {
        $(
            impl FromParam for $T {
                fn from_param(name: &str, value: Option<&str>) -> Result<Self, ExtractError> {
                    let raw = value.ok_or_else(|| ExtractError::new(name, "missing value"))?;
                    raw.parse::<$T>().map_err(|e| {
                        ExtractError::new(name, format!("cannot parse {raw:?}: {e}"))
                    })
                }
            }
        )+
    };
}

impl_from_param_parse!(i8, i16, i32, i64, u8, u16, u32, u64, usize, isize, f32, f64, bool, char);
