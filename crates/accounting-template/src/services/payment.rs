//! Payment method lookup.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::PaymentError;

/// Resolves payment method ids to payment records.
pub trait PaymentLookup {
    fn payment(&self, method_id: &str) -> Result<Payment, PaymentError>;
}

/// A payment method as templates see it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Payment {
    pub id: String,
    pub title: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

impl Payment {
    pub fn new(id: impl Into<String>, title: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            title: title.into(),
            description: None,
        }
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }
}

/// What a template finds under `Payment`.
///
/// `None` serializes as `false`, so `{% if Payment %}` works and a template
/// can still tell "no payment" apart from a variable that was never bound.
#[derive(Debug, Clone, PartialEq)]
pub enum PaymentBinding {
    Method(Payment),
    None,
}

impl PaymentBinding {
    pub fn to_value(&self) -> Value {
        match self {
            PaymentBinding::Method(payment) => {
                serde_json::to_value(payment).unwrap_or(Value::Bool(false))
            }
            PaymentBinding::None => Value::Bool(false),
        }
    }
}

/// Payment methods registered in memory.
#[derive(Debug, Clone, Default)]
pub struct PaymentCatalog {
    methods: HashMap<String, Payment>,
}

impl PaymentCatalog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_payment(mut self, payment: Payment) -> Self {
        self.methods.insert(payment.id.clone(), payment);
        self
    }
}

impl PaymentLookup for PaymentCatalog {
    fn payment(&self, method_id: &str) -> Result<Payment, PaymentError> {
        self.methods
            .get(method_id)
            .cloned()
            .ok_or_else(|| PaymentError::NotFound(method_id.to_string()))
    }
}
