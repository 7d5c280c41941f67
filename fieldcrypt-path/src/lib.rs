//! fieldcrypt path engine - Path expressions over nested records
//!
//! This crate compiles path expressions such as `$.buz.arr[*].haha` into
//! reusable plans and runs them against records, with no I/O dependencies.
//! It includes:
//!
//! - Tokenizer and recursive-descent parser
//! - Plan compiler producing immutable, shareable task lists
//! - Read interpreter extracting values keyed by resolved path
//! - Write interpreter applying replacements to a deep copy
//! - Two record flavors: schemaless `serde_json::Value` and schema-typed `Datum`
//! - Error types
//! - Expression limits
//!
//! ```
//! use fieldcrypt_path::{new_getter, new_updater, PathMap};
//! use serde_json::{json, Value};
//!
//! let doc = json!({"user": {"ssn": "123-45-6789", "name": "Ada"}});
//! let getter = new_getter::<Value>("$.user.ssn").unwrap();
//! let found = getter.run(&doc).unwrap();
//! assert_eq!(found["$.user.ssn"], &json!("123-45-6789"));
//!
//! let mut replacements = PathMap::new();
//! replacements.insert("$.user.ssn".to_string(), json!("***"));
//! let updater = new_updater::<Value>("$.user.ssn").unwrap();
//! let masked = updater.run(&doc, &replacements).unwrap();
//! assert_eq!(masked["user"]["ssn"], json!("***"));
//! assert_eq!(doc["user"]["ssn"], json!("123-45-6789"));
//! ```

#![deny(unsafe_code)]
#![warn(missing_docs)]

pub mod ast;
pub mod error;
pub mod getter;
pub mod json;
pub mod limits;
pub mod parser;
pub mod plan;
pub mod record;
pub mod resolved;
pub mod schema;
pub mod token;
pub mod tree;
pub mod updater;

// Re-export commonly used types
pub use ast::{ArraySub, FieldStep, Notation, PathExpression};
pub use error::{AccessError, LimitsError, ParseError, RecordError, ResolutionError};
pub use getter::Getter;
pub use limits::PathLimits;
pub use parser::{parse, parse_with_limits};
pub use plan::{compile, Task, TaskList};
pub use record::{Datum, Struct};
pub use resolved::{PathMap, ResolvedPath};
pub use schema::{Field, Schema, SchemaBuilder, SchemaType};
pub use tree::{Tree, TreeFlavor};
pub use updater::Updater;

/// Compile `path` into a getter for the record flavor `T`
pub fn new_getter<T: Tree>(path: &str) -> Result<Getter<T>, ParseError> {
    new_getter_with_limits(path, &PathLimits::default())
}

/// Compile `path` into a getter, enforcing `limits`
pub fn new_getter_with_limits<T: Tree>(
    path: &str,
    limits: &PathLimits,
) -> Result<Getter<T>, ParseError> {
    let expression = parse_with_limits(path, limits)?;
    Ok(Getter::from_expression(&expression))
}

/// Compile `path` into an updater for the record flavor `T`
pub fn new_updater<T: Tree>(path: &str) -> Result<Updater<T>, ParseError> {
    new_updater_with_limits(path, &PathLimits::default())
}

/// Compile `path` into an updater, enforcing `limits`
pub fn new_updater_with_limits<T: Tree>(
    path: &str,
    limits: &PathLimits,
) -> Result<Updater<T>, ParseError> {
    let expression = parse_with_limits(path, limits)?;
    Ok(Updater::from_expression(&expression))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::Value;

    #[test]
    fn constructors_reject_malformed_paths() {
        assert!(new_getter::<Value>("text").is_err());
        assert!(new_updater::<Datum>("$.[").is_err());
        assert!(new_getter::<Datum>("").is_err());
        assert!(new_getter::<Value>("$").unwrap().plan().tasks().is_empty());
    }

    #[test]
    fn constructors_honor_limits() {
        let limits = PathLimits {
            max_expression_len: 1024,
            max_tasks: 2,
        };
        assert!(new_getter_with_limits::<Value>("$.a[0]", &limits).is_ok());
        assert!(new_updater_with_limits::<Value>("$.a[0].b", &limits).is_err());
    }

    #[test]
    fn getter_and_updater_are_send_sync() {
        fn assert_send_sync<S: Send + Sync>() {}
        assert_send_sync::<Getter<Value>>();
        assert_send_sync::<Updater<Datum>>();
    }
}
