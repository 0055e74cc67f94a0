//! Template lookup and rendering for document areas.
//!
//! Rendering an area is a two-step affair:
//!
//! 1. **Lookup**: [`TemplateDir`] picks the HTML and CSS file for an area,
//!    preferring a document type's override directory over the shared
//!    default at the template root.
//! 2. **Render**: a [`TemplateEngine`] renders the HTML file against the
//!    variables bound for this request.
//!
//! ```rust,ignore
//! let dir = TemplateDir::new("/srv/pkg/template");
//! let html = dir.resolve(Some("Invoice"), RenderArea::Header, AssetKind::Html);
//! let output = engine.fetch(html.unwrap().path())?;
//! ```
//!
//! ## Key Types
//!
//! - [`TemplateEngine`]: assign / fetch contract used by providers
//! - [`MiniJinjaEngine`]: default engine
//! - [`TemplateDir`], [`RenderArea`], [`AssetKind`]: file lookup

pub mod area;
mod engine;
pub mod filters;

pub use area::{AssetKind, RenderArea, ResolvedFile, TemplateDir};
pub use engine::{MiniJinjaEngine, TemplateEngine};
