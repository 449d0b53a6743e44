//! Parameter kind to schema primitive mapping.

use crate::model::ParamKind;
use crate::schema::{Schema, SchemaType};
use serde_json::Value;

/// Target schema vocabulary.
///
/// OpenAPI schemas carry a `format` refinement; the JSON-Schema shapes used
/// by agent tool dialects only carry `type`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SchemaDialect {
    OpenApi,
    JsonSchema,
}

/// Primitive schema for a declared parameter kind. Unknown kinds map to string.
pub fn map_kind(kind: ParamKind, dialect: SchemaDialect) -> Schema {
    let (schema_type, format) = match kind {
        ParamKind::String | ParamKind::Other => (SchemaType::String, None),
        ParamKind::Number => (SchemaType::Number, Some("double")),
        ParamKind::Boolean => (SchemaType::Boolean, None),
        ParamKind::Date => (SchemaType::String, Some("date-time")),
        ParamKind::Object => (SchemaType::Object, None),
        ParamKind::Array => (SchemaType::Array, None),
    };
    let mut schema = Schema::of(schema_type);
    if dialect == SchemaDialect::OpenApi {
        schema.format = format.map(str::to_string);
    }
    schema
}

/// Schema type for a value found only in an example payload.
pub fn infer_example(value: &Value) -> Schema {
    let schema_type = match value {
        Value::Number(_) => SchemaType::Number,
        Value::Bool(_) => SchemaType::Boolean,
        Value::Object(_) => SchemaType::Object,
        Value::Array(_) => SchemaType::Array,
        Value::String(_) | Value::Null => SchemaType::String,
    };
    Schema::of(schema_type)
}
