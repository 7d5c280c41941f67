//! Path expression limits

use crate::error::LimitsError;
use serde::Deserialize;

/// Bounds applied while compiling path expressions
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct PathLimits {
    /// Maximum expression length in bytes (default: 1,024, hard: 8,192)
    pub max_expression_len: usize,
    /// Maximum compiled task count (default: 32, hard: 256)
    pub max_tasks: usize,
}

impl Default for PathLimits {
    fn default() -> Self {
        Self {
            max_expression_len: 1024,
            max_tasks: 32,
        }
    }
}

impl PathLimits {
    /// Hard maximum limits that cannot be exceeded
    pub fn hard_maximums() -> Self {
        Self {
            max_expression_len: 8192,
            max_tasks: 256,
        }
    }

    /// Validate limits against hard maximums
    pub fn validate(&self) -> Result<(), LimitsError> {
        let hard = Self::hard_maximums();

        let reason = if self.max_expression_len > hard.max_expression_len {
            Some(format!(
                "max_expression_len {} exceeds hard limit {}",
                self.max_expression_len, hard.max_expression_len
            ))
        } else if self.max_tasks > hard.max_tasks {
            Some(format!(
                "max_tasks {} exceeds hard limit {}",
                self.max_tasks, hard.max_tasks
            ))
        } else {
            None
        };

        match reason {
            Some(reason) => Err(LimitsError {
                reason,
                max_expression_len: hard.max_expression_len,
                max_tasks: hard.max_tasks,
            }),
            None => Ok(()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_within_hard_max() {
        assert!(PathLimits::default().validate().is_ok());
        assert!(PathLimits::hard_maximums().validate().is_ok());
    }

    #[test]
    fn rejects_excessive_expression_len() {
        let limits = PathLimits {
            max_expression_len: 10_000,
            ..PathLimits::default()
        };
        let err = limits.validate().unwrap_err();
        assert!(err.reason.contains("max_expression_len"));
    }

    #[test]
    fn rejects_excessive_task_count() {
        let limits = PathLimits {
            max_tasks: 1_000,
            ..PathLimits::default()
        };
        assert!(limits.validate().is_err());
    }

    #[test]
    fn deserializes_with_defaults() {
        let limits: PathLimits = serde_json::from_str(r#"{"max_tasks": 8}"#).unwrap();
        assert_eq!(limits.max_tasks, 8);
        assert_eq!(limits.max_expression_len, 1024);
    }
}
