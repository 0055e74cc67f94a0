//! Template engine abstraction.
//!
//! This module defines the [`TemplateEngine`] trait, the narrow interface the
//! document providers use to talk to whatever renders their HTML fragments.
//! The default implementation is [`MiniJinjaEngine`].
//!
//! An engine owns a set of assigned variables. Providers bind auxiliary
//! values with [`assign`](TemplateEngine::assign), read values the host bound
//! earlier with [`variable`](TemplateEngine::variable), and render a file
//! with [`fetch`](TemplateEngine::fetch). Every `fetch` re-reads the file.

use std::path::{Path, PathBuf};

use minijinja::Environment;
use serde_json::{Map, Value};

use super::filters::register_filters;
use crate::error::RenderError;

/// A template engine that renders files against assigned variables.
///
/// Engines handle:
/// - Variable storage (assign / read back)
/// - Rendering a template file or an in-memory source
/// - Includes, filters and control flow, if supported
pub trait TemplateEngine {
    /// Binds `value` under `name`, replacing any previous binding.
    fn assign(&mut self, name: &str, value: Value);

    /// Removes the binding for `name`, returning its value if there was one.
    fn unassign(&mut self, name: &str) -> Option<Value>;

    /// Returns a previously bound variable.
    fn variable(&self, name: &str) -> Option<&Value>;

    /// Returns all bound variables.
    fn variables(&self) -> &Map<String, Value>;

    /// Renders `source` with the current variables.
    ///
    /// `name` identifies the template in error messages and decides
    /// auto-escaping: names ending in `.html` are HTML-escaped.
    fn render_str(&self, name: &str, source: &str) -> Result<String, RenderError>;

    /// Reads the file at `path` and renders it with the current variables.
    fn fetch(&self, path: &Path) -> Result<String, RenderError> {
        let source = std::fs::read_to_string(path).map_err(|e| RenderError::io(path, e))?;
        self.render_str(&path.display().to_string(), &source)
    }

    /// Returns true if `name` is bound.
    fn has_variable(&self, name: &str) -> bool {
        self.variable(name).is_some()
    }
}

/// MiniJinja-based template engine.
///
/// - Jinja2-compatible syntax (loops, conditionals, macros)
/// - HTML auto-escaping for `.html` files
/// - `{% include %}` resolved relative to an optional template directory
/// - The `nl` and `nl2br` filters
///
/// # Example
///
/// ```rust
/// use accounting_template_render::{MiniJinjaEngine, TemplateEngine};
/// use serde_json::json;
///
/// let mut engine = MiniJinjaEngine::new();
/// engine.assign("number", json!("RE-1001"));
///
/// let output = engine.render_str("title.txt", "Invoice {{ number }}").unwrap();
/// assert_eq!(output, "Invoice RE-1001");
/// ```
pub struct MiniJinjaEngine {
    env: Environment<'static>,
    vars: Map<String, Value>,
    template_dir: Option<PathBuf>,
}

impl MiniJinjaEngine {
    /// Creates a new engine with the document filters registered.
    pub fn new() -> Self {
        let mut env = Environment::new();
        register_filters(&mut env);
        Self {
            env,
            vars: Map::new(),
            template_dir: None,
        }
    }

    /// Creates an engine whose `{% include %}` statements resolve inside `dir`.
    pub fn with_template_dir(dir: impl Into<PathBuf>) -> Self {
        let dir = dir.into();
        let mut engine = Self::new();
        engine.env.set_loader(minijinja::path_loader(&dir));
        engine.template_dir = Some(dir);
        engine
    }

    /// The directory includes are resolved against, if any.
    pub fn template_dir(&self) -> Option<&Path> {
        self.template_dir.as_deref()
    }

    /// Returns a mutable reference to the underlying MiniJinja environment.
    ///
    /// This allows hosts to register custom filters or functions.
    pub fn environment_mut(&mut self) -> &mut Environment<'static> {
        &mut self.env
    }

    /// Removes all bound variables.
    pub fn clear(&mut self) {
        self.vars.clear();
    }
}

impl Default for MiniJinjaEngine {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for MiniJinjaEngine {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MiniJinjaEngine")
            .field("vars", &self.vars.keys().collect::<Vec<_>>())
            .field("template_dir", &self.template_dir)
            .finish()
    }
}

impl TemplateEngine for MiniJinjaEngine {
    fn assign(&mut self, name: &str, value: Value) {
        self.vars.insert(name.to_string(), value);
    }

    fn unassign(&mut self, name: &str) -> Option<Value> {
        self.vars.remove(name)
    }

    fn variable(&self, name: &str) -> Option<&Value> {
        self.vars.get(name)
    }

    fn variables(&self) -> &Map<String, Value> {
        &self.vars
    }

    fn render_str(&self, name: &str, source: &str) -> Result<String, RenderError> {
        Ok(self.env.render_named_str(name, source, &self.vars)?)
    }
}
