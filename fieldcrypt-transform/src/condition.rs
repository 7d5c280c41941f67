//! Record filter evaluated before any field is transformed

use crate::config::ConditionConfig;
use crate::selector::Selectable;
use fieldcrypt_path::{parse_with_limits, Datum, Getter, ParseError, PathLimits, ResolutionError};
use serde_json::Value;

/// Accepts a record when some value at `field` renders equal to `equals`.
///
/// A record where `field` resolves to nothing is rejected.
#[derive(Debug, Clone)]
pub struct Condition {
    field: String,
    equals: String,
    schemaless: Getter<Value>,
    structured: Getter<Datum>,
}

impl Condition {
    /// Compile a condition on `field`
    pub fn new(
        field: &str,
        equals: impl Into<String>,
        limits: &PathLimits,
    ) -> Result<Self, ParseError> {
        let expression = parse_with_limits(field, limits)?;
        Ok(Condition {
            field: field.to_string(),
            equals: equals.into(),
            schemaless: Getter::from_expression(&expression),
            structured: Getter::from_expression(&expression),
        })
    }

    /// Compile a configured condition
    pub fn from_config(config: &ConditionConfig, limits: &PathLimits) -> Result<Self, ParseError> {
        Self::new(&config.field, config.equals.clone(), limits)
    }

    /// Field expression
    pub fn field(&self) -> &str {
        &self.field
    }

    /// Expected rendered value
    pub fn equals(&self) -> &str {
        &self.equals
    }

    pub(crate) fn schemaless_getter(&self) -> &Getter<Value> {
        &self.schemaless
    }

    pub(crate) fn structured_getter(&self) -> &Getter<Datum> {
        &self.structured
    }

    /// Evaluate against a record of either flavor
    pub fn accepts<T: Selectable>(&self, record: &T) -> Result<bool, ResolutionError> {
        let values = T::condition_getter(self).run(record)?;
        Ok(values.values().any(|value| value.render() == self.equals))
    }
}
