//! Transform configuration

use crate::error::{Result, TransformError};
use crate::item::Encoding;
use fieldcrypt_path::{parse_with_limits, PathLimits};
use serde::Deserialize;
use std::fmt;

/// Direction of the crypto operation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Mode {
    /// Plaintext in, ciphertext out
    Encrypt,
    /// Ciphertext in, plaintext out
    Decrypt,
}

impl fmt::Display for Mode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Mode::Encrypt => f.write_str("encrypt"),
            Mode::Decrypt => f.write_str("decrypt"),
        }
    }
}

/// Only transform records where `field` renders equal to `equals`
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ConditionConfig {
    /// Path expression of the field to compare
    pub field: String,
    /// Expected rendered value
    pub equals: String,
}

/// Settings for a [`Transform`](crate::Transform)
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct TransformConfig {
    /// Path expressions of the fields to transform, in application order
    pub fields: Vec<String>,
    /// Encrypt or decrypt
    pub mode: Mode,
    /// How backend results are written back
    #[serde(default)]
    pub output_encoding: Encoding,
    /// Optional record filter
    #[serde(default)]
    pub condition: Option<ConditionConfig>,
    /// Expression limits (default: [`PathLimits::default`])
    #[serde(default)]
    pub limits: Option<PathLimits>,
    /// Worker threads for batch application (default: the global rayon pool)
    #[serde(default)]
    pub threads: Option<usize>,
}

impl TransformConfig {
    /// Configuration with default encoding, no condition and default limits
    pub fn new<I, S>(fields: I, mode: Mode) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        TransformConfig {
            fields: fields.into_iter().map(Into::into).collect(),
            mode,
            output_encoding: Encoding::default(),
            condition: None,
            limits: None,
            threads: None,
        }
    }

    /// Parse a JSON document
    pub fn from_json(text: &str) -> Result<Self> {
        Ok(serde_json::from_str(text)?)
    }

    /// Set the output encoding
    pub fn with_output_encoding(mut self, encoding: Encoding) -> Self {
        self.output_encoding = encoding;
        self
    }

    /// Set the record filter
    pub fn with_condition(mut self, field: impl Into<String>, equals: impl Into<String>) -> Self {
        self.condition = Some(ConditionConfig {
            field: field.into(),
            equals: equals.into(),
        });
        self
    }

    /// Effective expression limits
    pub fn limits(&self) -> PathLimits {
        self.limits.clone().unwrap_or_default()
    }

    /// Check the configuration, compiling every expression once.
    pub fn validate(&self) -> Result<()> {
        if self.fields.is_empty() {
            return Err(TransformError::InvalidConfig(
                "at least one field expression is required".to_string(),
            ));
        }
        if self.threads == Some(0) {
            return Err(TransformError::InvalidConfig(
                "threads must be greater than zero".to_string(),
            ));
        }

        let limits = self.limits();
        limits
            .validate()
            .map_err(|e| TransformError::InvalidConfig(e.to_string()))?;

        for field in &self.fields {
            parse_with_limits(field, &limits)?;
        }
        if let Some(condition) = &self.condition {
            parse_with_limits(&condition.field, &limits)?;
        }
        Ok(())
    }
}
