//! Error types for the template provider and its collaborators.

use std::path::PathBuf;

use accounting_template_render::RenderError;

/// Errors surfaced by the provider's render calls.
#[derive(Debug, thiserror::Error)]
pub enum TemplateError {
    /// A required template file does not exist.
    #[error("Template file {} not found.", .path.display())]
    MissingTemplate { path: PathBuf },

    /// A package configuration could not be loaded.
    #[error("configuration unavailable: {0}")]
    ConfigUnavailable(#[from] ConfigError),

    /// The engine failed to render a fragment.
    #[error(transparent)]
    Render(#[from] RenderError),
}

impl TemplateError {
    pub fn missing(path: impl Into<PathBuf>) -> Self {
        Self::MissingTemplate { path: path.into() }
    }
}

/// Errors from the package/config store.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// No package with this name is installed.
    #[error("package '{0}' not found")]
    PackageNotFound(String),

    /// The configuration file exists but could not be read.
    #[error("failed to read {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The configuration file is malformed.
    #[error("failed to parse {}: {message}", .path.display())]
    Parse { path: PathBuf, message: String },

    /// A section was requested that the configuration lacks.
    #[error("config section '{section}' missing in package '{package}'")]
    MissingSection { package: String, section: String },
}

/// Errors from the payment lookup.
#[derive(Debug, thiserror::Error)]
pub enum PaymentError {
    #[error("payment method '{0}' not found")]
    NotFound(String),

    /// The backing store could not be queried. Raised by host
    /// [`PaymentLookup`](crate::PaymentLookup) implementations; the in-memory
    /// catalog never fails this way.
    #[error("payment lookup failed: {0}")]
    Lookup(String),
}
