//! PDF layout hook.
//!
//! The host raises a "PDF about to be created" event for every output
//! document. [`PdfLayout::on_pdf_create`] answers it: when the output was
//! produced by [`AccountingTemplate`](crate::AccountingTemplate), the fixed
//! page layout (margins, folding marks, header spacing) is written onto the
//! PDF document. Outputs from any other provider are left untouched.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::provider::AccountingTemplate;

/// The output a PDF is being created for.
pub trait OutputSource {
    /// Identity of the template provider that produced the output.
    fn template_provider(&self) -> &str;
}

/// A PDF document handle that accepts rendering attributes.
pub trait PdfDocument {
    fn set_attribute(&mut self, name: &str, value: Value);
}

/// A plain output descriptor carrying only its provider identity.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutputDescriptor {
    pub template_provider: String,
}

impl OutputDescriptor {
    pub fn new(template_provider: impl Into<String>) -> Self {
        Self {
            template_provider: template_provider.into(),
        }
    }
}

impl OutputSource for OutputDescriptor {
    fn template_provider(&self) -> &str {
        &self.template_provider
    }
}

/// A PDF document recorded as an attribute map.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct PdfAttributes {
    attributes: BTreeMap<String, Value>,
}

impl PdfAttributes {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, name: &str) -> Option<&Value> {
        self.attributes.get(name)
    }

    pub fn len(&self) -> usize {
        self.attributes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.attributes.is_empty()
    }
}

impl PdfDocument for PdfAttributes {
    fn set_attribute(&mut self, name: &str, value: Value) {
        self.attributes.insert(name.to_string(), value);
    }
}

/// Page layout for documents rendered from these templates.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PdfLayout {
    pub folding_marks: bool,
    pub margin_top: u32,
    pub margin_bottom: u32,
    pub margin_left: u32,
    pub margin_right: u32,
    pub disable_smart_shrinking: bool,
    pub header_spacing: u32,
}

impl Default for PdfLayout {
    fn default() -> Self {
        Self {
            folding_marks: true,
            margin_top: 110,
            margin_bottom: 45,
            margin_left: 0,
            margin_right: 0,
            disable_smart_shrinking: true,
            header_spacing: 6,
        }
    }
}

impl PdfLayout {
    /// The attributes written to the document, under the PDF engine's names.
    pub fn attributes(&self) -> [(&'static str, Value); 7] {
        [
            ("foldingMarks", Value::from(self.folding_marks)),
            ("marginTop", Value::from(self.margin_top)),
            ("marginBottom", Value::from(self.margin_bottom)),
            ("marginLeft", Value::from(self.margin_left)),
            ("marginRight", Value::from(self.margin_right)),
            ("disableSmartShrinking", Value::from(self.disable_smart_shrinking)),
            ("headerSpacing", Value::from(self.header_spacing)),
        ]
    }

    /// Writes the layout onto `document` unconditionally.
    pub fn apply(&self, document: &mut dyn PdfDocument) {
        for (name, value) in self.attributes() {
            document.set_attribute(name, value);
        }
    }

    /// Handles the host's PDF-create event.
    ///
    /// A no-op unless `output` comes from [`AccountingTemplate`].
    pub fn on_pdf_create(&self, output: &dyn OutputSource, document: &mut dyn PdfDocument) {
        if output.template_provider() != AccountingTemplate::PROVIDER_ID {
            tracing::trace!(
                provider = output.template_provider(),
                "skipping pdf layout for foreign provider"
            );
            return;
        }
        self.apply(document);
    }
}
