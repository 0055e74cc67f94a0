//! # Accounting Template Render
//!
//! `accounting-template-render` is the rendering foundation for ERP document
//! templates: an engine abstraction that binds variables and renders HTML
//! fragments, and the lookup rules that find the right file for each area
//! of a document.
//!
//! It knows nothing about invoices or contracts. Document types appear only
//! as directory names; the `accounting-template` crate supplies the domain.
//!
//! ## Core Concepts
//!
//! - [`TemplateEngine`]: `assign` variables, `fetch` a file
//! - [`MiniJinjaEngine`]: Jinja2-compatible engine with HTML auto-escaping
//! - [`TemplateDir`]: override-then-shared file lookup per [`RenderArea`]
//!
//! ## Quick Start
//!
//! ```rust
//! use accounting_template_render::{MiniJinjaEngine, TemplateEngine};
//! use serde_json::json;
//!
//! let mut engine = MiniJinjaEngine::new();
//! engine.assign("dateFormatted", json!("15.01.2024"));
//!
//! let html = engine
//!     .render_str("header.html", "<p>Date: {{ dateFormatted }}</p>")
//!     .unwrap();
//! assert_eq!(html, "<p>Date: 15.01.2024</p>");
//! ```

mod error;
pub mod template;

pub use error::RenderError;

pub use template::{
    AssetKind, MiniJinjaEngine, RenderArea, ResolvedFile, TemplateDir, TemplateEngine,
};
