//! # Accounting Template
//!
//! Output templates for ERP accounting documents: invoices, credit notes,
//! cancellations, contracts, offers, dunning letters, open items lists, SEPA
//! direct debit mandates and purchasing processes.
//!
//! The host's output pipeline asks [`AccountingTemplate`] for the header,
//! body and footer of a document. Each answer is a stylesheet inlined as a
//! `<style>` block followed by rendered HTML. A PDF hook sets the page layout
//! for documents produced from these templates.
//!
//! ## Core Concepts
//!
//! - [`EntityType`] / [`DocumentKind`]: which document is being output
//! - [`Entity`]: read access to the business entity ([`JsonEntity`] for JSON data)
//! - [`Services`]: injected package store, locale and payment lookup
//! - [`binding`]: the per-type variables bound before the header renders
//! - [`PdfLayout`]: margins and folding marks for the PDF engine
//!
//! ## Template Directory
//!
//! ```text
//! <package dir>/template/
//! ├── header.html  header.css     shared defaults
//! ├── footer.html  footer.css
//! ├── body.css
//! └── <EntityType>/
//!     └── {header,body,footer}.{html,css}   per-type overrides
//! ```
//!
//! There is no shared `body.html`: every type renders its body from its own
//! directory.
//!
//! ## Example
//!
//! ```rust,no_run
//! use accounting_template::{
//!     AccountingTemplate, DirectoryPackageStore, JsonEntity, PaymentCatalog, ProviderConfig,
//!     Services, StaticLocale,
//! };
//!
//! let services = Services::new(
//!     DirectoryPackageStore::new("/srv/packages"),
//!     StaticLocale::new("%d.%m.%Y"),
//!     PaymentCatalog::new(),
//! );
//! let provider = AccountingTemplate::new(ProviderConfig::default(), services)?;
//!
//! let invoice = JsonEntity::new().with("date", "2024-01-15");
//! let mut engine = provider.engine();
//! let header = provider.get_header_html("system_default", "Invoice", &mut engine, &invoice)?;
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

pub mod binding;
pub mod config;
pub mod context;
pub mod entity;
mod error;
pub mod pdf;
mod provider;
pub mod services;

pub use config::ProviderConfig;
pub use context::{Entity, JsonEntity, RenderContext};
pub use entity::{DocumentKind, EntityType, TemplateDescriptor, SYSTEM_DEFAULT_TEMPLATE};
pub use error::{ConfigError, PaymentError, TemplateError};
pub use pdf::{OutputDescriptor, OutputSource, PdfAttributes, PdfDocument, PdfLayout};
pub use provider::{AccountingTemplate, TITLE_KEY};
pub use services::{
    DateFormatter, DirectoryPackageStore, Locale, MemoryPackageStore, Package, PackageConfig,
    PackageStore, Payment, PaymentBinding, PaymentCatalog, PaymentLookup, Services, StaticLocale,
};

// Rendering foundation
pub use accounting_template_render::{
    AssetKind, MiniJinjaEngine, RenderArea, RenderError, TemplateDir, TemplateEngine,
};
