//! Structured flavor: schema-typed records
//!
//! A [`Struct`] holds one optional [`Datum`] per declared field. Writes are
//! checked against the schema, reads of undeclared fields fail, and unset
//! optional fields read as absent.

use crate::error::{AccessError, RecordError};
use crate::schema::{Schema, SchemaType};
use crate::tree::{Tree, TreeFlavor};
use bytes::Bytes;
use std::fmt;
use std::sync::Arc;

/// A value inside a structured record
#[derive(Debug, Clone, PartialEq)]
pub enum Datum {
    /// 8-bit signed integer
    Int8(i8),
    /// 16-bit signed integer
    Int16(i16),
    /// 32-bit signed integer
    Int32(i32),
    /// 64-bit signed integer
    Int64(i64),
    /// 32-bit float
    Float32(f32),
    /// 64-bit float
    Float64(f64),
    /// Boolean
    Boolean(bool),
    /// UTF-8 string
    String(String),
    /// Raw bytes
    Bytes(Bytes),
    /// Homogeneous array
    Array(Vec<Datum>),
    /// Nested record
    Struct(Struct),
}

impl Datum {
    /// Schema type this value conforms to
    pub fn schema_type(&self) -> SchemaType {
        match self {
            Datum::Int8(_) => SchemaType::Int8,
            Datum::Int16(_) => SchemaType::Int16,
            Datum::Int32(_) => SchemaType::Int32,
            Datum::Int64(_) => SchemaType::Int64,
            Datum::Float32(_) => SchemaType::Float32,
            Datum::Float64(_) => SchemaType::Float64,
            Datum::Boolean(_) => SchemaType::Boolean,
            Datum::String(_) => SchemaType::String,
            Datum::Bytes(_) => SchemaType::Bytes,
            Datum::Array(_) => SchemaType::Array,
            Datum::Struct(_) => SchemaType::Struct,
        }
    }

    /// String payload
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Datum::String(s) => Some(s.as_str()),
            _ => None,
        }
    }

    /// Bytes payload
    pub fn as_bytes(&self) -> Option<&Bytes> {
        match self {
            Datum::Bytes(b) => Some(b),
            _ => None,
        }
    }

    /// Nested record
    pub fn as_struct(&self) -> Option<&Struct> {
        match self {
            Datum::Struct(s) => Some(s),
            _ => None,
        }
    }

    /// Array elements
    pub fn as_array(&self) -> Option<&[Datum]> {
        match self {
            Datum::Array(items) => Some(items.as_slice()),
            _ => None,
        }
    }
}

impl fmt::Display for Datum {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Datum::Int8(v) => write!(f, "{}", v),
            Datum::Int16(v) => write!(f, "{}", v),
            Datum::Int32(v) => write!(f, "{}", v),
            Datum::Int64(v) => write!(f, "{}", v),
            Datum::Float32(v) => write!(f, "{}", v),
            Datum::Float64(v) => write!(f, "{}", v),
            Datum::Boolean(v) => write!(f, "{}", v),
            Datum::String(v) => f.write_str(v),
            Datum::Bytes(v) => write!(f, "{:?}", v.as_ref()),
            Datum::Array(items) => {
                f.write_str("[")?;
                for (i, item) in items.iter().enumerate() {
                    if i > 0 {
                        f.write_str(", ")?;
                    }
                    write!(f, "{}", item)?;
                }
                f.write_str("]")
            }
            Datum::Struct(s) => write!(f, "{}", s),
        }
    }
}

impl From<&str> for Datum {
    fn from(v: &str) -> Self {
        Datum::String(v.to_string())
    }
}

impl From<String> for Datum {
    fn from(v: String) -> Self {
        Datum::String(v)
    }
}

impl From<i32> for Datum {
    fn from(v: i32) -> Self {
        Datum::Int32(v)
    }
}

impl From<i64> for Datum {
    fn from(v: i64) -> Self {
        Datum::Int64(v)
    }
}

impl From<f64> for Datum {
    fn from(v: f64) -> Self {
        Datum::Float64(v)
    }
}

impl From<bool> for Datum {
    fn from(v: bool) -> Self {
        Datum::Boolean(v)
    }
}

impl From<Bytes> for Datum {
    fn from(v: Bytes) -> Self {
        Datum::Bytes(v)
    }
}

impl From<Vec<Datum>> for Datum {
    fn from(v: Vec<Datum>) -> Self {
        Datum::Array(v)
    }
}

impl From<Struct> for Datum {
    fn from(v: Struct) -> Self {
        Datum::Struct(v)
    }
}

/// Record conforming to a struct schema.
///
/// `Clone` is a full structural copy: nested structs and arrays are owned, so
/// a clone shares nothing mutable with the original. The schema itself is
/// immutable and shared.
#[derive(Debug, Clone, PartialEq)]
pub struct Struct {
    schema: Arc<Schema>,
    values: Vec<Option<Datum>>,
}

impl Struct {
    /// Create an empty record for a struct schema
    pub fn new(schema: Arc<Schema>) -> Result<Self, RecordError> {
        if schema.schema_type() != SchemaType::Struct {
            return Err(RecordError::NotAStruct {
                found: schema.schema_type().name(),
            });
        }
        let values = vec![None; schema.fields().len()];
        Ok(Struct { schema, values })
    }

    /// Schema of this record
    pub fn schema(&self) -> &Arc<Schema> {
        &self.schema
    }

    fn field_index(&self, name: &str) -> Result<usize, RecordError> {
        self.schema
            .field(name)
            .map(|f| f.index())
            .ok_or_else(|| RecordError::UnknownField {
                field: name.to_string(),
                declared: self.schema.field_names(),
            })
    }

    /// Value of a declared field; `None` when unset
    pub fn get(&self, name: &str) -> Result<Option<&Datum>, RecordError> {
        let index = self.field_index(name)?;
        Ok(self.values[index].as_ref())
    }

    /// Mutable value of a declared field
    pub fn get_mut(&mut self, name: &str) -> Result<Option<&mut Datum>, RecordError> {
        let index = self.field_index(name)?;
        Ok(self.values[index].as_mut())
    }

    /// Set a declared field, validating the value against its schema
    pub fn put(&mut self, name: &str, value: impl Into<Datum>) -> Result<&mut Self, RecordError> {
        let index = self.field_index(name)?;
        let value = value.into();
        self.schema.fields()[index]
            .schema()
            .validate(&value)
            .map_err(|reason| RecordError::TypeMismatch {
                field: name.to_string(),
                reason,
            })?;
        self.values[index] = Some(value);
        Ok(self)
    }

    /// Unset a declared optional field
    pub fn clear(&mut self, name: &str) -> Result<&mut Self, RecordError> {
        let index = self.field_index(name)?;
        let field = &self.schema.fields()[index];
        if !field.schema().is_optional() {
            return Err(RecordError::MissingRequiredField {
                field: name.to_string(),
            });
        }
        self.values[index] = None;
        Ok(self)
    }

    /// Check every required field is set, recursing into nested records
    pub fn validate(&self) -> Result<(), RecordError> {
        for (field, value) in self.schema.fields().iter().zip(&self.values) {
            match value {
                None if !field.schema().is_optional() => {
                    return Err(RecordError::MissingRequiredField {
                        field: field.name().to_string(),
                    });
                }
                Some(Datum::Struct(nested)) => nested.validate()?,
                Some(Datum::Array(items)) => {
                    for item in items {
                        if let Datum::Struct(nested) = item {
                            nested.validate()?;
                        }
                    }
                }
                _ => {}
            }
        }
        Ok(())
    }
}

impl fmt::Display for Struct {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Struct{")?;
        let mut first = true;
        for (field, value) in self.schema.fields().iter().zip(&self.values) {
            if let Some(value) = value {
                if !first {
                    f.write_str(",")?;
                }
                write!(f, "{}={}", field.name(), value)?;
                first = false;
            }
        }
        f.write_str("}")
    }
}

impl Tree for Datum {
    const FLAVOR: TreeFlavor = TreeFlavor::Structured;

    fn kind_name(&self) -> &'static str {
        self.schema_type().name()
    }

    fn get_field(&self, name: &str) -> Result<Option<&Self>, AccessError> {
        match self {
            Datum::Struct(record) => record.get(name).map_err(AccessError::from),
            other => Err(AccessError::NotAnObject {
                found: other.kind_name(),
            }),
        }
    }

    fn get_field_mut(&mut self, name: &str) -> Result<Option<&mut Self>, AccessError> {
        match self {
            Datum::Struct(record) => record.get_mut(name).map_err(AccessError::from),
            other => Err(AccessError::NotAnObject {
                found: other.kind_name(),
            }),
        }
    }

    fn set_field(&mut self, name: &str, value: Self) -> Result<(), AccessError> {
        match self {
            Datum::Struct(record) => record
                .put(name, value)
                .map(|_| ())
                .map_err(AccessError::from),
            other => Err(AccessError::NotAnObject {
                found: other.kind_name(),
            }),
        }
    }

    fn elements(&self) -> Option<&[Self]> {
        self.as_array()
    }

    fn elements_mut(&mut self) -> Option<&mut [Self]> {
        match self {
            Datum::Array(items) => Some(items.as_mut_slice()),
            _ => None,
        }
    }

    // Arrays carry no schema of their own; keep them homogeneous by requiring
    // the replacement to match the element it overwrites, down to the struct
    // schema.
    fn set_index(&mut self, index: usize, value: Self) -> Result<(), AccessError> {
        let found = self.kind_name();
        let items = self
            .elements_mut()
            .ok_or(AccessError::NotAnArray { found })?;
        let len = items.len();
        let slot = items.get_mut(index).ok_or_else(|| AccessError::Rejected {
            reason: format!("index {} out of range for array of length {}", index, len),
        })?;
        if slot.schema_type() != value.schema_type() {
            return Err(AccessError::Rejected {
                reason: format!(
                    "array holds {} elements, replacement is {}",
                    slot.kind_name(),
                    value.kind_name()
                ),
            });
        }
        if let (Datum::Struct(current), Datum::Struct(replacement)) = (&*slot, &value) {
            if current.schema() != replacement.schema() {
                return Err(AccessError::Rejected {
                    reason: format!(
                        "array holds structs of schema '{}', replacement has schema '{}'",
                        current.schema().name().unwrap_or("<anonymous>"),
                        replacement.schema().name().unwrap_or("<anonymous>")
                    ),
                });
            }
        }
        *slot = value;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::SchemaBuilder;

    fn schema() -> Arc<Schema> {
        SchemaBuilder::structure()
            .field("text", Schema::string())
            .field("optional", Schema::optional_string())
            .field("count", Schema::int32())
            .build()
            .unwrap()
    }

    #[test]
    fn new_requires_struct_schema() {
        assert!(matches!(
            Struct::new(Schema::string()),
            Err(RecordError::NotAStruct { found: "string" })
        ));
    }

    #[test]
    fn put_validates_against_field_schema() {
        let mut record = Struct::new(schema()).unwrap();
        record.put("text", "plain").unwrap().put("count", 3).unwrap();
        assert_eq!(record.get("text").unwrap(), Some(&Datum::from("plain")));
        assert_eq!(record.get("optional").unwrap(), None);

        let err = record.put("count", "three").unwrap_err();
        assert!(matches!(err, RecordError::TypeMismatch { ref field, .. } if field == "count"));
    }

    #[test]
    fn undeclared_fields_are_errors() {
        let mut record = Struct::new(schema()).unwrap();
        let err = record.get("unknown").unwrap_err();
        assert_eq!(
            err,
            RecordError::UnknownField {
                field: "unknown".to_string(),
                declared: "text, optional, count".to_string(),
            }
        );
        assert!(record.put("unknown", "x").is_err());
    }

    #[test]
    fn validate_reports_missing_required_fields() {
        let mut record = Struct::new(schema()).unwrap();
        record.put("text", "plain").unwrap();
        assert_eq!(
            record.validate(),
            Err(RecordError::MissingRequiredField {
                field: "count".to_string()
            })
        );
        record.put("count", 1).unwrap();
        assert!(record.validate().is_ok());
        assert!(record.clear("count").is_err());
        assert!(record.clear("optional").is_ok());
    }

    #[test]
    fn tree_access_on_struct_datum() {
        let mut record = Struct::new(schema()).unwrap();
        record.put("text", "plain").unwrap();
        let mut datum = Datum::Struct(record);

        assert_eq!(datum.get_field("text").unwrap(), Some(&Datum::from("plain")));
        assert_eq!(datum.get_field("optional").unwrap(), None);
        assert!(matches!(
            datum.get_field("nope"),
            Err(AccessError::UndeclaredField { .. })
        ));

        datum.set_field("text", Datum::from("cipher")).unwrap();
        assert_eq!(datum.get_field("text").unwrap(), Some(&Datum::from("cipher")));
        assert!(matches!(
            datum.set_field("count", Datum::from("x")),
            Err(AccessError::Rejected { .. })
        ));
        assert_eq!(
            Datum::Int32(1).get_field("a"),
            Err(AccessError::NotAnObject { found: "int32" })
        );
    }

    #[test]
    fn set_index_keeps_arrays_homogeneous() {
        let mut array = Datum::Array(vec!["a".into(), "b".into()]);
        array.set_index(1, "B".into()).unwrap();
        assert_eq!(array, Datum::Array(vec!["a".into(), "B".into()]));
        assert!(array.set_index(0, Datum::Int32(1)).is_err());
        assert!(array.set_index(5, "x".into()).is_err());
    }

    #[test]
    fn has_field_reports_set_fields_only() {
        let mut record = Struct::new(schema()).unwrap();
        record.put("text", "plain").unwrap();
        let datum = Datum::Struct(record);
        assert!(datum.has_field("text"));
        assert!(!datum.has_field("optional"));
        assert!(!datum.has_field("undeclared"));
        assert!(!Datum::from("x").has_field("text"));
    }

    #[test]
    fn set_index_rejects_struct_of_other_schema() {
        let other = SchemaBuilder::structure()
            .name("other")
            .field("zzz", Schema::int32())
            .build()
            .unwrap();
        let mut foreign = Struct::new(other).unwrap();
        foreign.put("zzz", 1).unwrap();

        let mut element = Struct::new(schema()).unwrap();
        element.put("text", "a").unwrap().put("count", 1).unwrap();
        let mut array = Datum::Array(vec![Datum::Struct(element.clone())]);

        assert!(matches!(
            array.set_index(0, Datum::Struct(foreign)),
            Err(AccessError::Rejected { .. })
        ));
        array.set_index(0, Datum::Struct(element)).unwrap();
    }

    #[test]
    fn display_skips_unset_fields() {
        let mut record = Struct::new(schema()).unwrap();
        record.put("text", "plain").unwrap().put("count", 7).unwrap();
        assert_eq!(record.to_string(), "Struct{text=plain,count=7}");
    }
}
