//! Crypto backend interface
//!
//! The transform hands a batch of items to a [`CryptoService`] and expects the
//! same keys back. Backends (KMS providers, secret managers) live outside this
//! crate and plug in by implementing the trait.
//!
//! # Example
//!
//! ```
//! use fieldcrypt_transform::{CryptoService, FieldKey, Item, ServiceError};
//! use std::collections::HashMap;
//!
//! struct Reverse;
//!
//! impl CryptoService for Reverse {
//!     fn name(&self) -> &str {
//!         "reverse"
//!     }
//!
//!     fn process(
//!         &self,
//!         items: HashMap<FieldKey, Item>,
//!     ) -> Result<HashMap<FieldKey, Item>, ServiceError> {
//!         Ok(items
//!             .into_iter()
//!             .map(|(key, item)| (key, Item::Text(item.as_text().chars().rev().collect())))
//!             .collect())
//!     }
//! }
//! ```

use crate::error::ServiceError;
use crate::item::Item;
use fieldcrypt_path::ResolvedPath;
use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

/// Compound key routing a backend result back to its origin field
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct FieldKey {
    /// Configured path expression that selected the field
    pub expression: String,
    /// Concrete location of the field in the record
    pub path: ResolvedPath,
}

impl FieldKey {
    /// Create a key
    pub fn new(expression: impl Into<String>, path: impl Into<ResolvedPath>) -> Self {
        FieldKey {
            expression: expression.into(),
            path: path.into(),
        }
    }
}

impl fmt::Display for FieldKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} @ {}", self.expression, self.path)
    }
}

/// Pluggable encrypt/decrypt backend
///
/// `process` receives every field harvested from one record and must return
/// results under the same keys. Keys it drops leave the field unchanged.
pub trait CryptoService: Send + Sync {
    /// Backend name used in logs
    fn name(&self) -> &str {
        "crypto-service"
    }

    /// Encrypt or decrypt a batch of items
    fn process(&self, items: HashMap<FieldKey, Item>)
        -> Result<HashMap<FieldKey, Item>, ServiceError>;

    /// Called once when the transform is built
    fn init(&self) -> Result<(), ServiceError> {
        Ok(())
    }

    /// Called once when the transform is dropped
    fn close(&self) {}
}

impl<S: CryptoService + ?Sized> CryptoService for Arc<S> {
    fn name(&self) -> &str {
        (**self).name()
    }

    fn process(
        &self,
        items: HashMap<FieldKey, Item>,
    ) -> Result<HashMap<FieldKey, Item>, ServiceError> {
        (**self).process(items)
    }

    fn init(&self) -> Result<(), ServiceError> {
        (**self).init()
    }

    fn close(&self) {
        (**self).close()
    }
}

impl<S: CryptoService + ?Sized> CryptoService for Box<S> {
    fn name(&self) -> &str {
        (**self).name()
    }

    fn process(
        &self,
        items: HashMap<FieldKey, Item>,
    ) -> Result<HashMap<FieldKey, Item>, ServiceError> {
        (**self).process(items)
    }

    fn init(&self) -> Result<(), ServiceError> {
        (**self).init()
    }

    fn close(&self) {
        (**self).close()
    }
}
