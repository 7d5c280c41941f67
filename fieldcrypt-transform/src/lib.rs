//! fieldcrypt transform - Field-level encryption for records
//!
//! This crate wires the path engine to a pluggable crypto backend. For each
//! record it:
//!
//! - Checks the optional condition
//! - Harvests every configured field with the compiled getters
//! - Sends the batch to the [`CryptoService`]
//! - Writes the results back into a new record with the compiled updaters
//!
//! Both schemaless (`serde_json::Value`) and structured ([`Struct`]) records
//! are supported. Logging goes through `tracing`; installing a subscriber is
//! left to the host.

#![deny(unsafe_code)]
#![warn(missing_docs)]

pub mod codec;
pub mod condition;
pub mod config;
pub mod error;
pub mod item;
pub mod selector;
pub mod service;
pub mod transform;

use fieldcrypt_path::Struct;
use serde_json::Value;

// Re-export commonly used types
pub use codec::LeafCodec;
pub use condition::Condition;
pub use config::{ConditionConfig, Mode, TransformConfig};
pub use error::{Result, ServiceError, TransformError};
pub use item::{Encoding, Item};
pub use selector::{FieldPlan, FieldSelector, FlavorPlans, Selectable};
pub use service::{CryptoService, FieldKey};
pub use transform::Transform;

/// A record handed to the transform by the host
#[derive(Debug, Clone, PartialEq)]
pub enum Record {
    /// Record without a schema
    Schemaless(Value),
    /// Record with a struct schema
    Structured(Struct),
    /// Record without a value (tombstone); passes through unchanged
    Empty,
}

impl Record {
    /// Whether the record carries no value
    pub fn is_empty(&self) -> bool {
        matches!(self, Record::Empty)
    }
}

impl From<Value> for Record {
    fn from(value: Value) -> Self {
        Record::Schemaless(value)
    }
}

impl From<Struct> for Record {
    fn from(record: Struct) -> Self {
        Record::Structured(record)
    }
}
