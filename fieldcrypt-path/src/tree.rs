//! Tree capability trait shared by both record flavors
//!
//! The interpreters only ever talk to records through [`Tree`]. Each flavor
//! implements it once:
//!
//! - [`serde_json::Value`]: schemaless maps and lists
//! - [`Datum`](crate::record::Datum): schema-typed records

use crate::error::AccessError;
use std::fmt;

/// Which record representation a plan targets
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TreeFlavor {
    /// Schemaless nested maps and lists
    Generic,
    /// Records with a declared schema
    Structured,
}

impl fmt::Display for TreeFlavor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TreeFlavor::Generic => f.write_str("generic"),
            TreeFlavor::Structured => f.write_str("structured"),
        }
    }
}

/// Navigation and mutation primitives the interpreters need from a record.
///
/// Field lookups return `Ok(None)` for a field that is absent but allowed to
/// be (missing map key, unset optional field). They return `Err` when the
/// node cannot have fields at all or, for schema-typed records, when the
/// field is not declared.
pub trait Tree: Clone + fmt::Debug {
    /// Flavor tag for plans compiled against this representation
    const FLAVOR: TreeFlavor;

    /// Human-readable kind of this node, used in error messages
    fn kind_name(&self) -> &'static str;

    /// Null placeholders contribute nothing to a path result
    fn is_null(&self) -> bool {
        false
    }

    /// Child field of an object node
    fn get_field(&self, name: &str) -> Result<Option<&Self>, AccessError>;

    /// Mutable child field of an object node
    fn get_field_mut(&mut self, name: &str) -> Result<Option<&mut Self>, AccessError>;

    /// Whether the node holds a value for `name`.
    ///
    /// Adapter API for hosts probing a record before building replacements;
    /// the interpreters themselves go through [`Tree::get_field`].
    fn has_field(&self, name: &str) -> bool {
        matches!(self.get_field(name), Ok(Some(_)))
    }

    /// Store `value` under `name` in an object node
    fn set_field(&mut self, name: &str, value: Self) -> Result<(), AccessError>;

    /// Elements of an array node, `None` for anything else
    fn elements(&self) -> Option<&[Self]>;

    /// Mutable elements of an array node
    fn elements_mut(&mut self) -> Option<&mut [Self]>;

    /// Length of an array node
    fn array_len(&self) -> Option<usize> {
        self.elements().map(<[Self]>::len)
    }

    /// Whether the node is an array
    fn is_array(&self) -> bool {
        self.elements().is_some()
    }

    /// Element of an array node
    fn get_index(&self, index: usize) -> Option<&Self> {
        self.elements()?.get(index)
    }

    /// Overwrite the element at `index` of an array node
    fn set_index(&mut self, index: usize, value: Self) -> Result<(), AccessError> {
        let found = self.kind_name();
        let elements = self
            .elements_mut()
            .ok_or(AccessError::NotAnArray { found })?;
        let len = elements.len();
        match elements.get_mut(index) {
            Some(slot) => {
                *slot = value;
                Ok(())
            }
            None => Err(AccessError::Rejected {
                reason: format!("index {} out of range for array of length {}", index, len),
            }),
        }
    }

    /// Independent structural copy sharing no mutable state with `self`
    fn deep_copy(&self) -> Self {
        self.clone()
    }
}
