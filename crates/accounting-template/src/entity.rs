//! Business-document kinds and the templates available for them.
//!
//! [`EntityType`] is the closed set of documents this package renders. Hosts
//! hand the provider a plain string, which parses into a [`DocumentKind`]:
//! either a known type or an unknown name. Unknown names are not errors.
//! They render with the shared default files and receive no extra bindings,
//! so a host can introduce a new document type before this package learns
//! about it.

use std::convert::Infallible;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Identifier of the only template variant each document type has.
pub const SYSTEM_DEFAULT_TEMPLATE: &str = "system_default";

/// A business-document kind.
///
/// The string form is the variant name and doubles as the name of the
/// type's override directory below the template root.
#[allow(clippy::upper_case_acronyms)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EntityType {
    Invoice,
    CreditNote,
    Canceled,
    Contract,
    Offer,
    Dunning,
    OpenItemsList,
    SEPADirectDebitAgreement,
    PurchasingProcess,
}

impl EntityType {
    /// Every document type this package provides templates for.
    pub const ALL: [EntityType; 9] = [
        EntityType::Canceled,
        EntityType::Contract,
        EntityType::CreditNote,
        EntityType::Invoice,
        EntityType::Offer,
        EntityType::Dunning,
        EntityType::OpenItemsList,
        EntityType::SEPADirectDebitAgreement,
        EntityType::PurchasingProcess,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            EntityType::Invoice => "Invoice",
            EntityType::CreditNote => "CreditNote",
            EntityType::Canceled => "Canceled",
            EntityType::Contract => "Contract",
            EntityType::Offer => "Offer",
            EntityType::Dunning => "Dunning",
            EntityType::OpenItemsList => "OpenItemsList",
            EntityType::SEPADirectDebitAgreement => "SEPADirectDebitAgreement",
            EntityType::PurchasingProcess => "PurchasingProcess",
        }
    }

    /// Looks up a type by its exact string form.
    pub fn parse(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|t| t.as_str() == name)
    }
}

impl fmt::Display for EntityType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A host-supplied document type name, recognized or not.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum DocumentKind {
    Known(EntityType),
    Unknown(String),
}

impl DocumentKind {
    pub fn entity_type(&self) -> Option<EntityType> {
        match self {
            DocumentKind::Known(t) => Some(*t),
            DocumentKind::Unknown(_) => None,
        }
    }

    /// The original name as the host passed it.
    pub fn name(&self) -> &str {
        match self {
            DocumentKind::Known(t) => t.as_str(),
            DocumentKind::Unknown(name) => name,
        }
    }
}

impl FromStr for DocumentKind {
    type Err = Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(match EntityType::parse(s) {
            Some(t) => DocumentKind::Known(t),
            None => DocumentKind::Unknown(s.to_string()),
        })
    }
}

impl From<&str> for DocumentKind {
    fn from(s: &str) -> Self {
        match s.parse() {
            Ok(kind) => kind,
            Err(never) => match never {},
        }
    }
}

impl From<EntityType> for DocumentKind {
    fn from(t: EntityType) -> Self {
        DocumentKind::Known(t)
    }
}

impl fmt::Display for DocumentKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// An available template for a document type.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TemplateDescriptor {
    pub id: String,
    pub title: String,
}
