//! # Pattern compilation
//!
//! Turns a route pattern such as `users/{id}/posts/{slug?|[a-z\-]+}` into a
//! [`CompiledPattern`] (normalized pattern, ordered parameter table) and a
//! [`Matcher`] (anchored regex with one named capture per parameter).
//!
//! # Placeholder Syntax
//!
//! | placeholder      | meaning                               |
//! |------------------|---------------------------------------|
//! | `{name}`         | required, default charset             |
//! | `{name?}`        | optional, default charset             |
//! | `{name\|regex}`  | required, custom constraint           |
//! | `{name?\|regex}` | optional, custom constraint           |
//!
//! A constraint may itself contain balanced braces (`{year|\d{4}}`) and
//! backslash escapes.
//!
//! # Matcher Shape
//!
//! Literals are regex-escaped and `/` becomes `\/`. A required parameter is
//! `(?P<name>(?:constraint))`. An optional parameter is wrapped in `(?:...)?`
//! together with the `/` right before it, so `files/{name?}` matches both
//! `files` and `files/report`. A leading optional parameter takes the `/`
//! after it instead, so `{lang?}/users` matches `users` and `en/users`. The
//! expression is anchored as `^...\/?$`.
//!
//! Every constraint must be a valid regex on its own; a fragment such as
//! `1)|(x` is rejected instead of leaking out of its capture group.

use regex::{Regex, RegexBuilder};
use sci_core::{ConfigurationError, Params, PatternError};
use std::fmt;

/// Charset a parameter accepts when no constraint is given.
pub const DEFAULT_CONSTRAINT: &str = "[A-Za-z0-9_-]+";

/// Maximum compiled regex size, in bytes.
const DEFAULT_SIZE_LIMIT: usize = 1 << 20;

/// Maximum accepted pattern length, in bytes.
const DEFAULT_MAX_PATTERN_LEN: usize = 1024;

/// Options for a [`PatternCompiler`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CompilerOptions {
    /// Constraint used by placeholders without `|regex`.
    pub default_constraint: String,
    /// Match paths case-insensitively.
    pub case_insensitive: bool,
    /// Upper bound for the compiled regex, in bytes.
    pub size_limit: usize,
    /// Upper bound for the pattern string, in bytes.
    pub max_pattern_len: usize,
}

impl Default for CompilerOptions {
    fn default() -> Self {
        Self {
            default_constraint: DEFAULT_CONSTRAINT.to_string(),
            case_insensitive: false,
            size_limit: DEFAULT_SIZE_LIMIT,
            max_pattern_len: DEFAULT_MAX_PATTERN_LEN,
        }
    }
}

impl CompilerOptions {
    /// Set the default constraint.
    pub fn with_default_constraint(mut self, constraint: impl Into<String>) -> Self {
        self.default_constraint = constraint.into();
        self
    }

    /// Set case-insensitive matching.
    pub fn with_case_insensitive(mut self, yes: bool) -> Self {
        self.case_insensitive = yes;
        self
    }

    /// Set the compiled regex size limit.
    pub fn with_size_limit(mut self, bytes: usize) -> Self {
        self.size_limit = bytes;
        self
    }

    /// Set the maximum pattern length.
    pub fn with_max_pattern_len(mut self, bytes: usize) -> Self {
        self.max_pattern_len = bytes;
        self
    }
}

/// One parameter slot of a pattern.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParamSpec {
    name: String,
    optional: bool,
    constraint: String,
}

impl ParamSpec {
    /// The parameter name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Whether the parameter may be absent from the path.
    pub fn is_optional(&self) -> bool {
        self.optional
    }

    /// The regex fragment the value must match.
    pub fn constraint(&self) -> &str {
        &self.constraint
    }

    /// The named capture for this parameter, without optional wrapping.
    pub fn capture(&self) -> String {
        format!("(?P<{}>(?:{}))", self.name, self.constraint)
    }
}

/// A piece of a compiled pattern.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Segment {
    /// Literal text, matched verbatim.
    Literal(String),
    /// Index into the parameter table.
    Param(usize),
}

/// A parsed route pattern.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CompiledPattern {
    raw: String,
    normalized: String,
    segments: Vec<Segment>,
    params: Vec<ParamSpec>,
    case_insensitive: bool,
}

impl CompiledPattern {
    /// The input pattern with leading and trailing `/` trimmed.
    pub fn raw(&self) -> &str {
        &self.raw
    }

    /// The pattern with placeholder modifiers stripped, e.g. `users/{id}`.
    pub fn normalized(&self) -> &str {
        &self.normalized
    }

    /// Literal and parameter segments, left to right.
    pub fn segments(&self) -> &[Segment] {
        &self.segments
    }

    /// The parameter table, in order of first appearance.
    pub fn params(&self) -> &[ParamSpec] {
        &self.params
    }

    /// Look up a parameter by name.
    pub fn param(&self, name: &str) -> Option<&ParamSpec> {
        self.params.iter().find(|p| p.name == name)
    }

    /// Parameter names in order.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.params.iter().map(|p| p.name.as_str())
    }

    /// Replace the constraint of `name`, keeping its optionality.
    ///
    /// The matcher must be rebuilt afterwards, which is also where the new
    /// constraint is validated.
    pub fn constrain(&mut self, name: &str, constraint: &str) -> Result<(), ConfigurationError> {
        let pattern = self.normalized.clone();
        let spec = self
            .params
            .iter_mut()
            .find(|p| p.name == name)
            .ok_or_else(|| ConfigurationError::UnknownParameter {
                pattern,
                name: name.to_string(),
            })?;
        spec.constraint = constraint.to_string();
        Ok(())
    }

    /// The regex source of the matcher for this pattern.
    pub fn matcher_source(&self) -> String {
        let mut out = String::from(if self.case_insensitive { "(?i)^" } else { "^" });

        for (i, segment) in self.segments.iter().enumerate() {
            match segment {
                Segment::Literal(text) => {
                    // The slash before an optional parameter moves into its group.
                    let mut text = match self.segments.get(i + 1) {
                        Some(Segment::Param(idx)) if self.params[*idx].optional => {
                            text.strip_suffix('/').unwrap_or(text)
                        }
                        _ => text,
                    };
                    if i == 1 && self.leading_optional() {
                        text = text.strip_prefix('/').unwrap_or(text);
                    }
                    out.push_str(&escape_literal(text));
                }
                Segment::Param(idx) => {
                    let spec = &self.params[*idx];
                    if !spec.optional {
                        out.push_str(&spec.capture());
                        continue;
                    }
                    if i == 0 {
                        out.push_str("(?:");
                        out.push_str(&spec.capture());
                        if self.leading_optional() {
                            out.push_str("\\/");
                        }
                        out.push_str(")?");
                        continue;
                    }
                    let slash = matches!(
                        self.segments.get(i - 1),
                        Some(Segment::Literal(text)) if text.ends_with('/')
                    );
                    out.push_str("(?:");
                    if slash {
                        out.push_str("\\/");
                    }
                    out.push_str(&spec.capture());
                    out.push_str(")?");
                }
            }
        }

        out.push_str("\\/?$");
        out
    }

    /// Whether the pattern opens with an optional parameter followed by `/`.
    ///
    /// A lone `/` between two optional parameters stays with the second one.
    fn leading_optional(&self) -> bool {
        let is_optional = |segment: Option<&Segment>| {
            matches!(segment, Some(Segment::Param(idx)) if self.params[*idx].optional)
        };
        match self.segments.as_slice() {
            [first, Segment::Literal(next), rest @ ..] if is_optional(Some(first)) => {
                next.starts_with('/') && !(next.as_str() == "/" && is_optional(rest.first()))
            }
            _ => false,
        }
    }

    /// Fill the pattern with `params`.
    ///
    /// An absent optional parameter drops its segment together with the
    /// preceding `/`, or the following one when it opens the pattern.
    /// Returns `None` when a required parameter has no value.
    pub fn fill(&self, params: &Params) -> Option<String> {
        let mut out = String::new();
        for segment in &self.segments {
            match segment {
                Segment::Literal(text) if out.is_empty() && self.leading_optional() => {
                    out.push_str(text.strip_prefix('/').unwrap_or(text))
                }
                Segment::Literal(text) => out.push_str(text),
                Segment::Param(idx) => {
                    let spec = &self.params[*idx];
                    match params.get(&spec.name) {
                        Some(value) => out.push_str(value),
                        None if spec.optional => {
                            if out.ends_with('/') {
                                out.pop();
                            }
                        }
                        None => return None,
                    }
                }
            }
        }
        Some(out)
    }
}

impl fmt::Display for CompiledPattern {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.normalized)
    }
}

fn escape_literal(text: &str) -> String {
    regex::escape(text).replace('/', "\\/")
}

fn is_valid_name(name: &str) -> bool {
    let mut chars = name.chars();
    match chars.next() {
        Some(c) if c.is_ascii_alphabetic() || c == '_' => {}
        _ => return false,
    }
    chars.all(|c| c.is_ascii_alphanumeric() || c == '_')
}

/// A compiled matching expression.
#[derive(Debug, Clone)]
pub struct Matcher {
    regex: Regex,
    names: Vec<String>,
}

impl Matcher {
    /// The regex source.
    pub fn as_str(&self) -> &str {
        self.regex.as_str()
    }

    /// Whether `path` matches. `path` must already be normalized.
    pub fn is_match(&self, path: &str) -> bool {
        self.regex.is_match(path)
    }

    /// Match `path` and extract one entry per declared parameter.
    ///
    /// An optional parameter that did not participate is `None`.
    pub fn captures(&self, path: &str) -> Option<Params> {
        let caps = self.regex.captures(path)?;
        Some(
            self.names
                .iter()
                .map(|name| {
                    (
                        name.as_str(),
                        caps.name(name).map(|m| m.as_str().to_string()),
                    )
                })
                .collect(),
        )
    }
}

impl PartialEq for Matcher {
    fn eq(&self, other: &Self) -> bool {
        self.as_str() == other.as_str()
    }
}

impl Eq for Matcher {}

impl fmt::Display for Matcher {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Normalize an inbound path the way patterns are normalized.
///
/// Leading slashes are trimmed, and a single trailing slash.
pub fn normalize_path(path: &str) -> &str {
    let path = path.trim_start_matches('/');
    path.strip_suffix('/').unwrap_or(path)
}

/// Parses route patterns and builds their matchers.
#[derive(Debug, Clone, Default)]
pub struct PatternCompiler {
    options: CompilerOptions,
}

impl PatternCompiler {
    /// Create a compiler with default options.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a compiler with the given options.
    pub fn with_options(options: CompilerOptions) -> Self {
        Self { options }
    }

    /// The compiler options.
    pub fn options(&self) -> &CompilerOptions {
        &self.options
    }

    /// Parse `raw` into a pattern and build its matcher.
    pub fn compile(&self, raw: &str) -> Result<(CompiledPattern, Matcher), PatternError> {
        let pattern = self.parse(raw)?;
        let matcher = self.matcher(&pattern)?;
        tracing::debug!(
            pattern = %pattern.raw,
            matcher = %matcher,
            params = pattern.params.len(),
            "compiled route pattern"
        );
        Ok((pattern, matcher))
    }

    /// Build the matcher for an already parsed pattern.
    ///
    /// Each constraint is checked on its own first, so a fragment that is not
    /// a complete regex fails here instead of changing the shape of the
    /// matcher.
    pub fn matcher(&self, pattern: &CompiledPattern) -> Result<Matcher, PatternError> {
        for spec in &pattern.params {
            self.check_constraint(pattern, spec)?;
        }
        let source = pattern.matcher_source();
        let regex = RegexBuilder::new(&source)
            .size_limit(self.options.size_limit)
            .build()
            .map_err(|e| PatternError::InvalidConstraint {
                pattern: pattern.raw.clone(),
                message: e.to_string(),
            })?;
        Ok(Matcher {
            regex,
            names: pattern.params.iter().map(|p| p.name.clone()).collect(),
        })
    }

    fn check_constraint(
        &self,
        pattern: &CompiledPattern,
        spec: &ParamSpec,
    ) -> Result<(), PatternError> {
        let invalid = |message: String| PatternError::InvalidConstraint {
            pattern: pattern.raw.clone(),
            message,
        };
        if spec.constraint.is_empty() {
            return Err(invalid(format!("empty constraint for `{}`", spec.name)));
        }
        RegexBuilder::new(&spec.constraint)
            .size_limit(self.options.size_limit)
            .build()
            .map(drop)
            .map_err(|e| invalid(format!("constraint of `{}`: {e}", spec.name)))
    }

    /// Parse `raw` into a [`CompiledPattern`] without building a matcher.
    pub fn parse(&self, raw: &str) -> Result<CompiledPattern, PatternError> {
        let trimmed = raw.trim_matches('/');
        if trimmed.len() > self.options.max_pattern_len {
            return Err(PatternError::TooLong {
                length: trimmed.len(),
                limit: self.options.max_pattern_len,
            });
        }

        Parser {
            source: trimmed,
            chars: trimmed.char_indices().collect(),
            pos: 0,
            default_constraint: &self.options.default_constraint,
        }
        .run()
        .map(|(segments, params, normalized)| CompiledPattern {
            raw: trimmed.to_string(),
            normalized,
            segments,
            params,
            case_insensitive: self.options.case_insensitive,
        })
    }
}

struct Parser<'a> {
    source: &'a str,
    chars: Vec<(usize, char)>,
    pos: usize,
    default_constraint: &'a str,
}

type Parsed = (Vec<Segment>, Vec<ParamSpec>, String);

impl Parser<'_> {
    fn run(mut self) -> Result<Parsed, PatternError> {
        let mut segments = Vec::new();
        let mut params: Vec<ParamSpec> = Vec::new();
        let mut normalized = String::with_capacity(self.source.len());
        let mut literal = String::new();

        while let Some((offset, c)) = self.peek() {
            match c {
                '{' => {
                    if !literal.is_empty() {
                        segments.push(Segment::Literal(std::mem::take(&mut literal)));
                    }
                    let spec = self.placeholder(offset)?;
                    if params.iter().any(|p| p.name == spec.name) {
                        return Err(PatternError::DuplicateParameter {
                            pattern: self.source.to_string(),
                            name: spec.name,
                        });
                    }
                    normalized.push('{');
                    normalized.push_str(&spec.name);
                    normalized.push('}');
                    segments.push(Segment::Param(params.len()));
                    params.push(spec);
                }
                '}' => {
                    return Err(PatternError::UnexpectedClose {
                        pattern: self.source.to_string(),
                        position: offset,
                    });
                }
                _ => {
                    self.pos += 1;
                    literal.push(c);
                    normalized.push(c);
                }
            }
        }

        if !literal.is_empty() {
            segments.push(Segment::Literal(literal));
        }
        Ok((segments, params, normalized))
    }

    fn peek(&self) -> Option<(usize, char)> {
        self.chars.get(self.pos).copied()
    }

    fn next_char(&mut self, start: usize) -> Result<char, PatternError> {
        let (_, c) = self.peek().ok_or_else(|| PatternError::UnclosedPlaceholder {
            pattern: self.source.to_string(),
            position: start,
        })?;
        self.pos += 1;
        Ok(c)
    }

    /// Parse one placeholder; the cursor sits on its `{`.
    fn placeholder(&mut self, start: usize) -> Result<ParamSpec, PatternError> {
        self.pos += 1;

        let mut name = String::new();
        let mut optional = false;
        let mut constraint = None;

        loop {
            match self.next_char(start)? {
                '}' => break,
                '?' if !optional => optional = true,
                '|' => {
                    constraint = Some(self.constraint(start)?);
                    break;
                }
                c if optional => {
                    // Only `|` or `}` may follow the `?` marker.
                    return Err(PatternError::InvalidName {
                        pattern: self.source.to_string(),
                        name: format!("{name}?{c}"),
                    });
                }
                c => name.push(c),
            }
        }

        if name.is_empty() {
            return Err(PatternError::EmptyName {
                pattern: self.source.to_string(),
                position: start,
            });
        }
        if !is_valid_name(&name) {
            return Err(PatternError::InvalidName {
                pattern: self.source.to_string(),
                name,
            });
        }

        let constraint = constraint
            .filter(|c: &String| !c.is_empty())
            .unwrap_or_else(|| self.default_constraint.to_string());

        Ok(ParamSpec {
            name,
            optional,
            constraint,
        })
    }

    /// Read a constraint up to the `}` closing the placeholder.
    fn constraint(&mut self, start: usize) -> Result<String, PatternError> {
        let mut depth = 0usize;
        let mut out = String::new();
        loop {
            match self.next_char(start)? {
                '\\' => {
                    out.push('\\');
                    out.push(self.next_char(start)?);
                }
                '{' => {
                    depth += 1;
                    out.push('{');
                }
                '}' if depth == 0 => return Ok(out),
                '}' => {
                    depth -= 1;
                    out.push('}');
                }
                c => out.push(c),
            }
        }
    }
}
