//! The business entity a document is rendered for.
//!
//! Providers never own the entity. The host passes it by reference together
//! with the engine, and bindings read from it through the [`Entity`] trait:
//!
//! - [`Entity::attribute`]: a raw attribute (`date`, `payment_method`, ...)
//! - [`Entity::date`]: the entity's own date accessor, already formatted
//! - [`Entity::supplier`]: the supplier of a purchasing process
//! - [`Entity::to_value`]: the serialized form
//!
//! [`JsonEntity`] implements the trait over a JSON object, which is what most
//! hosts hand over anyway.

use serde::Serialize;
use serde_json::{Map, Value};

use crate::entity::DocumentKind;

/// A business entity being output (invoice, contract, purchasing process...).
pub trait Entity {
    /// Reads a raw attribute.
    fn attribute(&self, name: &str) -> Option<Value>;

    /// The entity's display date. Defaults to the `date` attribute.
    fn date(&self) -> Option<Value> {
        self.attribute("date")
    }

    /// The supplier record. Defaults to the `supplier` attribute.
    fn supplier(&self) -> Option<Value> {
        self.attribute("supplier")
    }

    /// The serialized form of the entity.
    fn to_value(&self) -> Value;
}

/// An [`Entity`] backed by a JSON object.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct JsonEntity {
    fields: Map<String, Value>,
}

impl JsonEntity {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds an entity from a JSON object. Any other value yields an empty entity.
    pub fn from_value(value: Value) -> Self {
        match value {
            Value::Object(fields) => Self { fields },
            _ => Self::default(),
        }
    }

    /// Serializes `data` into an entity.
    pub fn from_serialize<T: Serialize>(data: &T) -> Result<Self, serde_json::Error> {
        Ok(Self::from_value(serde_json::to_value(data)?))
    }

    /// Sets an attribute.
    pub fn with(mut self, name: impl Into<String>, value: impl Into<Value>) -> Self {
        self.fields.insert(name.into(), value.into());
        self
    }
}

impl Entity for JsonEntity {
    fn attribute(&self, name: &str) -> Option<Value> {
        self.fields.get(name).cloned()
    }

    fn to_value(&self) -> Value {
        Value::Object(self.fields.clone())
    }
}

/// Everything one render call knows about its document.
#[derive(Clone, Copy)]
pub struct RenderContext<'a> {
    /// The document type the host asked for.
    pub kind: &'a DocumentKind,

    /// The template variant. Every type has only `system_default`.
    pub template_id: &'a str,

    /// The entity being output.
    pub entity: &'a dyn Entity,
}

impl<'a> RenderContext<'a> {
    pub fn new(kind: &'a DocumentKind, template_id: &'a str, entity: &'a dyn Entity) -> Self {
        Self {
            kind,
            template_id,
            entity,
        }
    }
}

impl std::fmt::Debug for RenderContext<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RenderContext")
            .field("kind", self.kind)
            .field("template_id", &self.template_id)
            .field("entity", &self.entity.to_value())
            .finish()
    }
}
