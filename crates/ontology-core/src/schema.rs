//! Schema type and the request/response schema assembler.

use crate::model::Action;
use crate::typemap::{self, SchemaDialect};
use indexmap::IndexMap;
use serde::ser::SerializeStruct;
use serde::{Deserialize, Serialize, Serializer};
use serde_json::Value;

// ---------------------------------------------------------------------------
// SchemaType / Schema
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SchemaType {
    String,
    Number,
    Integer,
    Boolean,
    Array,
    Object,
}

impl SchemaType {
    pub fn as_str(self) -> &'static str {
        match self {
            SchemaType::String => "string",
            SchemaType::Number => "number",
            SchemaType::Integer => "integer",
            SchemaType::Boolean => "boolean",
            SchemaType::Array => "array",
            SchemaType::Object => "object",
        }
    }
}

/// Structural description shared by the OpenAPI document and tool dialects.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Schema {
    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    pub schema_type: Option<SchemaType>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub format: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(rename = "$ref", default, skip_serializing_if = "Option::is_none")]
    pub reference: Option<String>,
    #[serde(default, skip_serializing_if = "IndexMap::is_empty")]
    pub properties: IndexMap<String, Schema>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub required: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub items: Option<Box<Schema>>,
    #[serde(rename = "enum", default, skip_serializing_if = "Vec::is_empty")]
    pub enum_values: Vec<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub example: Option<Value>,
}

impl Schema {
    pub fn of(schema_type: SchemaType) -> Self {
        Self {
            schema_type: Some(schema_type),
            ..Default::default()
        }
    }

    pub fn object() -> Self {
        Self::of(SchemaType::Object)
    }

    /// `$ref` to a schema registered under `#/components/schemas`.
    pub fn component_ref(name: &str) -> Self {
        Self {
            reference: Some(format!("#/components/schemas/{name}")),
            ..Default::default()
        }
    }

    pub fn array_of(items: Schema) -> Self {
        Self {
            items: Some(Box::new(items)),
            ..Self::of(SchemaType::Array)
        }
    }

    pub fn with_description(mut self, description: &str) -> Self {
        let description = description.trim();
        if !description.is_empty() {
            self.description = Some(description.to_string());
        }
        self
    }

    pub fn is_required(&self, property: &str) -> bool {
        self.required.iter().any(|r| r == property)
    }
}

// ---------------------------------------------------------------------------
// ParameterSchema
// ---------------------------------------------------------------------------

/// Argument envelope of a tool. Always serializes as
/// `{type: object, properties, required}`, empty members included.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ParameterSchema {
    pub properties: IndexMap<String, Schema>,
    pub required: Vec<String>,
}

impl ParameterSchema {
    pub fn is_required(&self, property: &str) -> bool {
        self.required.iter().any(|r| r == property)
    }
}

impl From<Schema> for ParameterSchema {
    fn from(schema: Schema) -> Self {
        Self {
            properties: schema.properties,
            required: schema.required,
        }
    }
}

impl Serialize for ParameterSchema {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut envelope = serializer.serialize_struct("ParameterSchema", 3)?;
        envelope.serialize_field("type", &SchemaType::Object)?;
        envelope.serialize_field("properties", &self.properties)?;
        envelope.serialize_field("required", &self.required)?;
        envelope.end()
    }
}

// ---------------------------------------------------------------------------
// Assembler
// ---------------------------------------------------------------------------

/// Request schema for an action: declared parameters plus any keys that only
/// appear in the example payload. `None` when there are no properties at all.
///
/// Example values are attached only in the OpenAPI dialect; JSON-Schema
/// dialects keep the example-only keys but not the values.
pub fn request_schema(action: &Action, dialect: SchemaDialect) -> Option<Schema> {
    let mut schema = Schema::object();

    for param in action.parameters() {
        let name = param.name.trim();
        if name.is_empty() {
            continue;
        }
        let property = typemap::map_kind(param.kind, dialect).with_description(&param.description);
        schema.properties.insert(name.to_string(), property);
        if param.required && !schema.is_required(name) {
            schema.required.push(name.to_string());
        }
    }

    let payload = action
        .implementation_layer
        .as_ref()
        .and_then(|i| i.example_payload());
    if let Some(payload) = payload {
        for (key, value) in payload {
            let property = schema
                .properties
                .entry(key)
                .or_insert_with(|| typemap::infer_example(&value));
            if dialect == SchemaDialect::OpenApi {
                property.example = Some(value);
            }
        }
    }

    if schema.properties.is_empty() {
        None
    } else {
        Some(schema)
    }
}

/// Synthesized response envelope: `success`, `message`, and `changes` when
/// the action declares postconditions.
pub fn response_schema(action: &Action) -> Schema {
    let mut schema = Schema::object();
    schema
        .properties
        .insert("success".to_string(), Schema::of(SchemaType::Boolean));
    schema
        .properties
        .insert("message".to_string(), Schema::of(SchemaType::String));

    let postconditions = action.postconditions();
    if !postconditions.is_empty() {
        let mut changes = Schema::array_of(Schema::of(SchemaType::String));
        changes.example = Some(Value::from(postconditions.to_vec()));
        schema.properties.insert("changes".to_string(), changes);
    }
    schema
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
