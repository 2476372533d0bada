//! # Domain Entities
//!
//! `Medicine` is the only value persisted by the contract. Its JSON form is
//! an interoperability contract with records already on the ledger, so the
//! member names and their order must not change.

use serde::{Deserialize, Serialize};

/// A medicine record as stored in world state.
///
/// Every field is an opaque string: `expiration` is conventionally
/// `DD/MM/YYYY` and `quantity` a decimal count, but neither is validated.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Medicine {
    pub name: String,
    pub concentration: String,
    pub form: String,
    pub expiration: String,
    pub quantity: String,
    pub code: String,
}

impl Medicine {
    pub fn new(
        name: impl Into<String>,
        concentration: impl Into<String>,
        form: impl Into<String>,
        expiration: impl Into<String>,
        quantity: impl Into<String>,
        code: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            concentration: concentration.into(),
            form: form.into(),
            expiration: expiration.into(),
            quantity: quantity.into(),
            code: code.into(),
        }
    }

    /// Copy of this record with a different quantity.
    pub fn with_quantity(mut self, quantity: impl Into<String>) -> Self {
        self.quantity = quantity.into();
        self
    }
}

/// One entry of a full ledger listing. Never persisted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QueryResult {
    #[serde(rename = "Key")]
    pub key: String,
    #[serde(rename = "Record")]
    pub record: Medicine,
}
