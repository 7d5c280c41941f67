//! Error types for the path engine

use thiserror::Error;

/// Malformed path expression.
///
/// Raised while compiling an expression, before any record is touched. Callers
/// should treat it as a configuration failure for that expression.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error(
    "Invalid path expression '{expression}' at position {position}: {reason}\n\
     \n\
     Path expressions must:\n\
     - Start with '$'\n\
     - Continue with '.field' or ['field'] subscripts\n\
     - Optionally follow a field with [index] or [*]"
)]
pub struct ParseError {
    /// The expression that failed to parse
    pub expression: String,
    /// Byte offset of the offending token
    pub position: usize,
    /// Explanation of the failure
    pub reason: String,
}

impl ParseError {
    pub(crate) fn new(expression: &str, position: usize, reason: impl Into<String>) -> Self {
        Self {
            expression: expression.to_string(),
            position,
            reason: reason.into(),
        }
    }
}

/// Failure to resolve a compiled path against a concrete record.
///
/// Every variant names the resolved path at which resolution stopped.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ResolutionError {
    /// Node shape does not match what the next step requires
    #[error("Path resolution failed at '{path}': expected {expected}, found {found}")]
    ShapeMismatch {
        /// Resolved path of the offending node
        path: String,
        /// Shape the step requires ("object" or "array")
        expected: &'static str,
        /// Shape actually found
        found: &'static str,
    },

    /// Structured record does not declare the addressed field
    #[error(
        "Path resolution failed at '{path}': field '{field}' is not declared by the record schema.\n\
         \n\
         Declared fields: {declared}"
    )]
    UndeclaredField {
        /// Resolved path of the record being addressed
        path: String,
        /// Field name that was requested
        field: String,
        /// Comma-separated list of declared field names
        declared: String,
    },

    /// Array step reached an element that is itself an array
    #[error("Path resolution failed at '{path}': nested arrays are not supported")]
    NestedArray {
        /// Resolved path of the nested array element
        path: String,
    },

    /// Record refused a replacement value
    #[error("Replacement for '{path}' was rejected: {reason}")]
    RejectedValue {
        /// Resolved path being written
        path: String,
        /// Reason reported by the record
        reason: String,
    },
}

impl ResolutionError {
    pub(crate) fn shape(path: &str, expected: &'static str, found: &'static str) -> Self {
        ResolutionError::ShapeMismatch {
            path: path.to_string(),
            expected,
            found,
        }
    }

    /// Resolved path at which resolution stopped
    pub fn path(&self) -> &str {
        match self {
            ResolutionError::ShapeMismatch { path, .. }
            | ResolutionError::UndeclaredField { path, .. }
            | ResolutionError::NestedArray { path }
            | ResolutionError::RejectedValue { path, .. } => path,
        }
    }
}

/// Path-less failure reported by a [`Tree`](crate::tree::Tree) implementation.
///
/// The interpreters attach the resolved path and turn it into a
/// [`ResolutionError`].
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AccessError {
    /// Field access on something that is not an object/record
    #[error("expected object, found {found}")]
    NotAnObject {
        /// Shape actually found
        found: &'static str,
    },
    /// Index access on something that is not an array
    #[error("expected array, found {found}")]
    NotAnArray {
        /// Shape actually found
        found: &'static str,
    },
    /// Field not declared by the record schema
    #[error("field '{field}' is not declared (declared: {declared})")]
    UndeclaredField {
        /// Field name that was requested
        field: String,
        /// Comma-separated declared field names
        declared: String,
    },
    /// Value refused by the record
    #[error("{reason}")]
    Rejected {
        /// Reason for the refusal
        reason: String,
    },
}

impl AccessError {
    /// Attach the resolved path where the access happened.
    pub fn at(self, path: &str) -> ResolutionError {
        let path = path.to_string();
        match self {
            AccessError::NotAnObject { found } => ResolutionError::ShapeMismatch {
                path,
                expected: "object",
                found,
            },
            AccessError::NotAnArray { found } => ResolutionError::ShapeMismatch {
                path,
                expected: "array",
                found,
            },
            AccessError::UndeclaredField { field, declared } => ResolutionError::UndeclaredField {
                path,
                field,
                declared,
            },
            AccessError::Rejected { reason } => ResolutionError::RejectedValue { path, reason },
        }
    }
}

/// Errors raised by schema-typed record operations
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RecordError {
    /// Operation requires a struct schema or struct value
    #[error("Expected a struct, found {found}")]
    NotAStruct {
        /// Schema type or value kind actually found
        found: &'static str,
    },
    /// Field is not part of the schema
    #[error("Unknown field '{field}' (declared fields: {declared})")]
    UnknownField {
        /// Requested field name
        field: String,
        /// Comma-separated declared field names
        declared: String,
    },
    /// Value does not conform to the field schema
    #[error("Invalid value for field '{field}': {reason}")]
    TypeMismatch {
        /// Field being written or validated
        field: String,
        /// Description of the mismatch
        reason: String,
    },
    /// Required field has no value
    #[error("Missing required field '{field}'")]
    MissingRequiredField {
        /// Field without a value
        field: String,
    },
    /// Schema construction was inconsistent
    #[error("Invalid schema: {reason}")]
    InvalidSchema {
        /// Description of the problem
        reason: String,
    },
}

impl From<RecordError> for AccessError {
    fn from(err: RecordError) -> Self {
        match err {
            RecordError::UnknownField { field, declared } => {
                AccessError::UndeclaredField { field, declared }
            }
            RecordError::NotAStruct { found } => AccessError::NotAnObject { found },
            other => AccessError::Rejected {
                reason: other.to_string(),
            },
        }
    }
}

/// Limits configuration exceeds hard maximums
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error(
    "Path limits exceed hard maximums: {reason}\n\
     \n\
     Hard limits:\n\
     - max_expression_len: {max_expression_len} bytes\n\
     - max_tasks: {max_tasks}"
)]
pub struct LimitsError {
    /// Which limit was exceeded
    pub reason: String,
    /// Hard maximum expression length
    pub max_expression_len: usize,
    /// Hard maximum compiled task count
    pub max_tasks: usize,
}
