//! Schemas for structured records

use crate::error::RecordError;
use crate::record::Datum;
use std::sync::Arc;

/// Schema type codes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SchemaType {
    /// 8-bit signed integer
    Int8,
    /// 16-bit signed integer
    Int16,
    /// 32-bit signed integer
    Int32,
    /// 64-bit signed integer
    Int64,
    /// 32-bit float
    Float32,
    /// 64-bit float
    Float64,
    /// Boolean
    Boolean,
    /// UTF-8 string
    String,
    /// Raw bytes
    Bytes,
    /// Homogeneous array
    Array,
    /// Record with named fields
    Struct,
}

impl SchemaType {
    /// Lowercase name used in messages
    pub fn name(&self) -> &'static str {
        match self {
            SchemaType::Int8 => "int8",
            SchemaType::Int16 => "int16",
            SchemaType::Int32 => "int32",
            SchemaType::Int64 => "int64",
            SchemaType::Float32 => "float32",
            SchemaType::Float64 => "float64",
            SchemaType::Boolean => "boolean",
            SchemaType::String => "string",
            SchemaType::Bytes => "bytes",
            SchemaType::Array => "array",
            SchemaType::Struct => "struct",
        }
    }

    /// Whether values of this type have no children
    pub fn is_primitive(&self) -> bool {
        !matches!(self, SchemaType::Array | SchemaType::Struct)
    }
}

/// A declared field of a struct schema
#[derive(Debug, Clone, PartialEq)]
pub struct Field {
    name: String,
    index: usize,
    schema: Arc<Schema>,
}

impl Field {
    /// Field name
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Position within the struct
    pub fn index(&self) -> usize {
        self.index
    }

    /// Schema of the field value
    pub fn schema(&self) -> &Arc<Schema> {
        &self.schema
    }
}

/// Immutable schema; shared between records through `Arc`
#[derive(Debug, Clone, PartialEq)]
pub struct Schema {
    schema_type: SchemaType,
    optional: bool,
    name: Option<String>,
    fields: Vec<Field>,
    value_schema: Option<Arc<Schema>>,
}

impl Schema {
    fn primitive(schema_type: SchemaType, optional: bool) -> Arc<Schema> {
        Arc::new(Schema {
            schema_type,
            optional,
            name: None,
            fields: Vec::new(),
            value_schema: None,
        })
    }

    /// Required string
    pub fn string() -> Arc<Schema> {
        Self::primitive(SchemaType::String, false)
    }

    /// Optional string
    pub fn optional_string() -> Arc<Schema> {
        Self::primitive(SchemaType::String, true)
    }

    /// Required bytes
    pub fn bytes() -> Arc<Schema> {
        Self::primitive(SchemaType::Bytes, false)
    }

    /// Optional bytes
    pub fn optional_bytes() -> Arc<Schema> {
        Self::primitive(SchemaType::Bytes, true)
    }

    /// Required 32-bit integer
    pub fn int32() -> Arc<Schema> {
        Self::primitive(SchemaType::Int32, false)
    }

    /// Required 64-bit integer
    pub fn int64() -> Arc<Schema> {
        Self::primitive(SchemaType::Int64, false)
    }

    /// Required 64-bit float
    pub fn float64() -> Arc<Schema> {
        Self::primitive(SchemaType::Float64, false)
    }

    /// Required boolean
    pub fn boolean() -> Arc<Schema> {
        Self::primitive(SchemaType::Boolean, false)
    }

    /// Schema type
    pub fn schema_type(&self) -> SchemaType {
        self.schema_type
    }

    /// Whether the value may be absent
    pub fn is_optional(&self) -> bool {
        self.optional
    }

    /// Optional schema name
    pub fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    /// Declared fields (struct schemas only)
    pub fn fields(&self) -> &[Field] {
        &self.fields
    }

    /// Look up a declared field
    pub fn field(&self, name: &str) -> Option<&Field> {
        self.fields.iter().find(|f| f.name == name)
    }

    /// Element schema (array schemas only)
    pub fn value_schema(&self) -> Option<&Arc<Schema>> {
        self.value_schema.as_ref()
    }

    /// Comma-separated declared field names, for error messages
    pub fn field_names(&self) -> String {
        if self.fields.is_empty() {
            return "<none>".to_string();
        }
        self.fields
            .iter()
            .map(|f| f.name.as_str())
            .collect::<Vec<_>>()
            .join(", ")
    }

    /// Check that `value` conforms to this schema, recursing into arrays and
    /// checking nested structs carry an equal schema.
    pub fn validate(&self, value: &Datum) -> Result<(), String> {
        if value.schema_type() != self.schema_type {
            return Err(format!(
                "expected {}, found {}",
                self.schema_type.name(),
                value.schema_type().name()
            ));
        }
        match value {
            Datum::Struct(record) => {
                if record.schema().as_ref() != self {
                    return Err("struct schema does not match the declared schema".to_string());
                }
                Ok(())
            }
            Datum::Array(items) => {
                let element = match &self.value_schema {
                    Some(element) => element,
                    None => return Err("array schema has no element schema".to_string()),
                };
                for (i, item) in items.iter().enumerate() {
                    element
                        .validate(item)
                        .map_err(|reason| format!("element {}: {}", i, reason))?;
                }
                Ok(())
            }
            _ => Ok(()),
        }
    }
}

/// Builder for struct and array schemas
#[derive(Debug, Clone)]
pub struct SchemaBuilder {
    schema: Schema,
}

impl SchemaBuilder {
    /// Start a struct schema
    pub fn structure() -> Self {
        Self::new(SchemaType::Struct)
    }

    /// Start an array schema with the given element schema
    pub fn array(value_schema: Arc<Schema>) -> Self {
        let mut builder = Self::new(SchemaType::Array);
        builder.schema.value_schema = Some(value_schema);
        builder
    }

    /// Start a schema of any type
    pub fn new(schema_type: SchemaType) -> Self {
        SchemaBuilder {
            schema: Schema {
                schema_type,
                optional: false,
                name: None,
                fields: Vec::new(),
                value_schema: None,
            },
        }
    }

    /// Declare a field (struct schemas)
    pub fn field(mut self, name: impl Into<String>, schema: Arc<Schema>) -> Self {
        let index = self.schema.fields.len();
        self.schema.fields.push(Field {
            name: name.into(),
            index,
            schema,
        });
        self
    }

    /// Mark the schema optional
    pub fn optional(mut self) -> Self {
        self.schema.optional = true;
        self
    }

    /// Name the schema
    pub fn name(mut self, name: impl Into<String>) -> Self {
        self.schema.name = Some(name.into());
        self
    }

    /// Finish the schema, checking it is internally consistent
    pub fn build(self) -> Result<Arc<Schema>, RecordError> {
        let schema = self.schema;
        if schema.schema_type != SchemaType::Struct && !schema.fields.is_empty() {
            return Err(RecordError::InvalidSchema {
                reason: format!("{} schema cannot declare fields", schema.schema_type.name()),
            });
        }
        if schema.schema_type == SchemaType::Array && schema.value_schema.is_none() {
            return Err(RecordError::InvalidSchema {
                reason: "array schema requires an element schema".to_string(),
            });
        }
        for (i, field) in schema.fields.iter().enumerate() {
            if schema.fields[..i].iter().any(|f| f.name == field.name) {
                return Err(RecordError::InvalidSchema {
                    reason: format!("duplicate field '{}'", field.name),
                });
            }
        }
        Ok(Arc::new(schema))
    }
}
