//! Generic flavor: schemaless `serde_json::Value` trees

use crate::error::AccessError;
use crate::tree::{Tree, TreeFlavor};
use serde_json::Value;

impl Tree for Value {
    const FLAVOR: TreeFlavor = TreeFlavor::Generic;

    fn kind_name(&self) -> &'static str {
        type_name(self)
    }

    fn is_null(&self) -> bool {
        Value::is_null(self)
    }

    fn get_field(&self, name: &str) -> Result<Option<&Self>, AccessError> {
        match self {
            Value::Object(map) => Ok(map.get(name)),
            other => Err(AccessError::NotAnObject {
                found: type_name(other),
            }),
        }
    }

    fn get_field_mut(&mut self, name: &str) -> Result<Option<&mut Self>, AccessError> {
        match self {
            Value::Object(map) => Ok(map.get_mut(name)),
            other => Err(AccessError::NotAnObject {
                found: type_name(other),
            }),
        }
    }

    fn set_field(&mut self, name: &str, value: Self) -> Result<(), AccessError> {
        match self {
            Value::Object(map) => {
                map.insert(name.to_string(), value);
                Ok(())
            }
            other => Err(AccessError::NotAnObject {
                found: type_name(other),
            }),
        }
    }

    fn elements(&self) -> Option<&[Self]> {
        self.as_array().map(Vec::as_slice)
    }

    fn elements_mut(&mut self) -> Option<&mut [Self]> {
        self.as_array_mut().map(Vec::as_mut_slice)
    }
}

/// Get a human-readable type name for a JSON value
pub fn type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}
