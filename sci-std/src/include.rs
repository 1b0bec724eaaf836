//! File actions.
//!
//! [`TemplateIncluder`] reads the file and substitutes `{name}` markers with
//! captured parameter values. Markers naming no captured parameter are kept
//! as written. An absent optional parameter renders as an empty string.

use sci_core::{FileIncluder, IncludeError, Params, Response};
use std::path::{Path, PathBuf};

/// Reads a file and renders parameter markers into it.
#[derive(Debug, Clone, Default)]
pub struct TemplateIncluder {
    root: Option<PathBuf>,
}

impl TemplateIncluder {
    /// Resolve relative paths against the working directory.
    pub fn new() -> Self {
        Self::default()
    }

    /// Resolve relative paths against `root`.
    pub fn with_root(root: impl Into<PathBuf>) -> Self {
        Self {
            root: Some(root.into()),
        }
    }

    fn locate(&self, path: &Path) -> PathBuf {
        match &self.root {
            Some(root) if path.is_relative() => root.join(path),
            _ => path.to_path_buf(),
        }
    }
}

impl FileIncluder for TemplateIncluder {
    fn include(&self, path: &Path, params: &Params) -> Result<Response, IncludeError> {
        let path = self.locate(path);
        let body = std::fs::read_to_string(&path).map_err(|source| IncludeError::Io {
            path: path.clone(),
            source,
        })?;

        tracing::debug!(path = %path.display(), params = %params, "including file");
        Ok(Response::Text(render(&body, params)))
    }
}

/// Replace `{name}` markers with values from `params`.
pub fn render(template: &str, params: &Params) -> String {
    let mut out = String::with_capacity(template.len());
    let mut rest = template;

    while let Some(start) = rest.find('{') {
        out.push_str(&rest[..start]);
        let tail = &rest[start..];
        let marker = tail[1..]
            .find('}')
            .map(|end| &tail[1..=end])
            .and_then(|name| params.entry(name).map(|value| (name, value)));

        match marker {
            Some((name, value)) => {
                out.push_str(value.as_deref().unwrap_or_default());
                rest = &tail[name.len() + 2..];
            }
            None => {
                out.push('{');
                rest = &tail[1..];
            }
        }
    }
    out.push_str(rest);
    out
}
