//! Provider configuration.
//!
//! Every field has a default, so an empty document is a valid config:
//!
//! ```yaml
//! package: erp/accounting-templates   # this template package
//! erp_package: erp                    # holds `company` and the footer Config
//! template_dir: template              # below the package directory
//! body_css_fallback: true             # use template/body.css when a type has none
//! pdf:
//!   folding_marks: true
//!   margin_top: 110
//!   margin_bottom: 45
//!   margin_left: 0
//!   margin_right: 0
//!   disable_smart_shrinking: true
//!   header_spacing: 6
//! ```

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;
use crate::pdf::PdfLayout;

pub const DEFAULT_PACKAGE: &str = "erp/accounting-templates";
pub const DEFAULT_ERP_PACKAGE: &str = "erp";
pub const DEFAULT_TEMPLATE_DIR: &str = "template";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ProviderConfig {
    /// Name of this template package in the package store.
    pub package: String,

    /// Name of the ERP package whose configuration templates read.
    pub erp_package: String,

    /// Template directory, relative to the package directory.
    pub template_dir: String,

    /// Whether the body area falls back to the shared `body.css`.
    pub body_css_fallback: bool,

    /// Layout applied to PDFs produced from these templates.
    pub pdf: PdfLayout,
}

impl Default for ProviderConfig {
    fn default() -> Self {
        Self {
            package: DEFAULT_PACKAGE.to_string(),
            erp_package: DEFAULT_ERP_PACKAGE.to_string(),
            template_dir: DEFAULT_TEMPLATE_DIR.to_string(),
            body_css_fallback: true,
            pdf: PdfLayout::default(),
        }
    }
}

impl ProviderConfig {
    pub fn from_yaml(yaml: &str) -> Result<Self, serde_yaml::Error> {
        if yaml.trim().is_empty() {
            return Ok(Self::default());
        }
        serde_yaml::from_str(yaml)
    }

    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_yaml(&content).map_err(|e| ConfigError::Parse {
            path: path.to_path_buf(),
            message: e.to_string(),
        })
    }
}
