use serde::{Deserialize, Deserializer, Serialize, Serializer};
use serde_json::{Map, Value};
use std::fmt;

// ---------------------------------------------------------------------------
// ActionKind
// ---------------------------------------------------------------------------

/// Matched case-insensitively; unrecognised kinds load as `Traditional`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ActionKind {
    #[default]
    Traditional,
    Generative,
}

impl ActionKind {
    pub fn as_str(self) -> &'static str {
        match self {
            ActionKind::Traditional => "traditional",
            ActionKind::Generative => "generative",
        }
    }

    /// Case-insensitive parse; `None` for kinds outside the known set.
    pub fn parse(s: &str) -> Option<ActionKind> {
        match s.trim().to_ascii_lowercase().as_str() {
            "traditional" => Some(ActionKind::Traditional),
            "generative" => Some(ActionKind::Generative),
            _ => None,
        }
    }
}

impl<'de> Deserialize<'de> for ActionKind {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        Ok(ActionKind::parse(&raw).unwrap_or_else(|| {
            tracing::warn!("unknown action type '{raw}', treating as traditional");
            ActionKind::default()
        }))
    }
}

impl fmt::Display for ActionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ---------------------------------------------------------------------------
// ParamKind
// ---------------------------------------------------------------------------

/// Declared kind of an action parameter.
///
/// Anything the editor writes that is not one of the known kinds lands in
/// `Other` and is compiled as a string.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ParamKind {
    #[default]
    String,
    Number,
    Boolean,
    Date,
    Object,
    Array,
    #[serde(other)]
    Other,
}

impl ParamKind {
    pub fn as_str(self) -> &'static str {
        match self {
            ParamKind::String => "string",
            ParamKind::Number => "number",
            ParamKind::Boolean => "boolean",
            ParamKind::Date => "date",
            ParamKind::Object => "object",
            ParamKind::Array => "array",
            ParamKind::Other => "other",
        }
    }
}

impl fmt::Display for ParamKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ---------------------------------------------------------------------------
// RiskLevel
// ---------------------------------------------------------------------------

/// Authored risk level. Known levels match case-insensitively; anything else
/// is kept as written.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum RiskLevel {
    #[default]
    Low,
    Medium,
    High,
    Critical,
    Other(String),
}

impl RiskLevel {
    pub fn parse(s: &str) -> RiskLevel {
        match s.trim().to_ascii_lowercase().as_str() {
            "" | "low" => RiskLevel::Low,
            "medium" => RiskLevel::Medium,
            "high" => RiskLevel::High,
            "critical" => RiskLevel::Critical,
            _ => RiskLevel::Other(s.trim().to_string()),
        }
    }

    pub fn as_str(&self) -> &str {
        match self {
            RiskLevel::Low => "low",
            RiskLevel::Medium => "medium",
            RiskLevel::High => "high",
            RiskLevel::Critical => "critical",
            RiskLevel::Other(s) => s,
        }
    }
}

impl fmt::Display for RiskLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl Serialize for RiskLevel {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for RiskLevel {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        Ok(RiskLevel::parse(&raw))
    }
}

// ---------------------------------------------------------------------------
// HttpMethod
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum HttpMethod {
    Get,
    #[default]
    Post,
    Put,
    Patch,
    Delete,
    Head,
    Options,
}

impl HttpMethod {
    /// Case-insensitive parse; `None` for verbs outside the supported set.
    pub fn parse(s: &str) -> Option<HttpMethod> {
        match s.trim().to_ascii_uppercase().as_str() {
            "GET" => Some(HttpMethod::Get),
            "POST" => Some(HttpMethod::Post),
            "PUT" => Some(HttpMethod::Put),
            "PATCH" => Some(HttpMethod::Patch),
            "DELETE" => Some(HttpMethod::Delete),
            "HEAD" => Some(HttpMethod::Head),
            "OPTIONS" => Some(HttpMethod::Options),
            _ => None,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            HttpMethod::Get => "GET",
            HttpMethod::Post => "POST",
            HttpMethod::Put => "PUT",
            HttpMethod::Patch => "PATCH",
            HttpMethod::Delete => "DELETE",
            HttpMethod::Head => "HEAD",
            HttpMethod::Options => "OPTIONS",
        }
    }

    /// Key used for this verb inside an OpenAPI path item.
    pub fn path_item_key(self) -> &'static str {
        match self {
            HttpMethod::Get => "get",
            HttpMethod::Post => "post",
            HttpMethod::Put => "put",
            HttpMethod::Patch => "patch",
            HttpMethod::Delete => "delete",
            HttpMethod::Head => "head",
            HttpMethod::Options => "options",
        }
    }

    /// Read verbs never carry a request body.
    pub fn is_read(self) -> bool {
        matches!(
            self,
            HttpMethod::Get | HttpMethod::Head | HttpMethod::Delete | HttpMethod::Options
        )
    }
}

impl fmt::Display for HttpMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ---------------------------------------------------------------------------
// Action layers
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ActionParameter {
    pub name: String,
    #[serde(rename = "type", alias = "kind", default)]
    pub kind: ParamKind,
    #[serde(default)]
    pub required: bool,
    #[serde(default)]
    pub description: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BusinessLayer {
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub target_object: String,
    #[serde(default)]
    pub executor_role: String,
    #[serde(default)]
    pub trigger_condition: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LogicLayer {
    #[serde(default)]
    pub preconditions: Vec<String>,
    #[serde(default)]
    pub parameters: Vec<ActionParameter>,
    #[serde(default)]
    pub postconditions: Vec<String>,
    #[serde(default)]
    pub side_effects: Vec<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AgentToolSpec {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub description: String,
    /// Hand-written parameter schema, used only when nothing can be derived.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub parameters: Option<Value>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ImplementationLayer {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub api_endpoint: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub api_method: Option<String>,
    /// Example request body. The editor stores it either as a JSON object or
    /// as the JSON text of one.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub request_payload: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub agent_tool_spec: Option<AgentToolSpec>,
}

impl ImplementationLayer {
    /// The example payload as an object, if it is one (directly or as JSON text).
    pub fn example_payload(&self) -> Option<Map<String, Value>> {
        match self.request_payload.as_ref()? {
            Value::Object(map) => Some(map.clone()),
            Value::String(text) => match serde_json::from_str::<Value>(text) {
                Ok(Value::Object(map)) => Some(map),
                _ => None,
            },
            _ => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Governance {
    #[serde(default = "default_tier")]
    pub permission_tier: u8,
    #[serde(default)]
    pub requires_human_approval: bool,
    #[serde(default)]
    pub audit_log: bool,
    #[serde(default)]
    pub risk_level: RiskLevel,
}

fn default_tier() -> u8 {
    1
}

impl Default for Governance {
    fn default() -> Self {
        Self {
            permission_tier: default_tier(),
            requires_human_approval: false,
            audit_log: false,
            risk_level: RiskLevel::default(),
        }
    }
}

impl Governance {
    /// Tier 2 and above are only reachable by authenticated callers.
    pub fn requires_auth(&self) -> bool {
        self.permission_tier >= 2
    }

    /// Whether losing this governance record would hide a meaningful control.
    pub fn is_significant(&self) -> bool {
        self.requires_auth() || self.requires_human_approval
    }
}

// ---------------------------------------------------------------------------
// Action
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Action {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    pub name: String,
    #[serde(rename = "type", alias = "kind", default)]
    pub kind: ActionKind,
    #[serde(default)]
    pub description: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub business_layer: Option<BusinessLayer>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub logic_layer: Option<LogicLayer>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub implementation_layer: Option<ImplementationLayer>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub governance: Option<Governance>,
}

impl Action {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Default::default()
        }
    }

    /// Business description, then the action's own description, then its name.
    pub fn summary(&self) -> &str {
        self.business_layer
            .as_ref()
            .map(|b| b.description.trim())
            .filter(|d| !d.is_empty())
            .or_else(|| Some(self.description.trim()).filter(|d| !d.is_empty()))
            .unwrap_or(self.name.trim())
    }

    pub fn parameters(&self) -> &[ActionParameter] {
        self.logic_layer
            .as_ref()
            .map(|l| l.parameters.as_slice())
            .unwrap_or(&[])
    }

    pub fn postconditions(&self) -> &[String] {
        self.logic_layer
            .as_ref()
            .map(|l| l.postconditions.as_slice())
            .unwrap_or(&[])
    }

    pub fn explicit_path(&self) -> Option<&str> {
        self.implementation_layer
            .as_ref()
            .and_then(|i| i.api_endpoint.as_deref())
            .map(str::trim)
            .filter(|p| !p.is_empty())
    }

    pub fn explicit_method(&self) -> Option<&str> {
        self.implementation_layer
            .as_ref()
            .and_then(|i| i.api_method.as_deref())
            .map(str::trim)
            .filter(|m| !m.is_empty())
    }

    pub fn agent_tool(&self) -> Option<&AgentToolSpec> {
        self.implementation_layer
            .as_ref()
            .and_then(|i| i.agent_tool_spec.as_ref())
    }
}

// ---------------------------------------------------------------------------
// Object / Ontology
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Property {
    pub name: String,
    #[serde(rename = "type", default)]
    pub kind: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub primary_key: bool,
    #[serde(default)]
    pub required: bool,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OntologyObject {
    #[serde(default)]
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub properties: Vec<Property>,
    #[serde(default)]
    pub actions: Vec<Action>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Ontology {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub version: Option<String>,
    #[serde(default)]
    pub objects: Vec<OntologyObject>,
}

impl Ontology {
    /// Look an object up by id first, then by case-insensitive name.
    pub fn object(&self, key: &str) -> Option<&OntologyObject> {
        self.objects
            .iter()
            .find(|o| !o.id.is_empty() && o.id == key)
            .or_else(|| {
                self.objects
                    .iter()
                    .find(|o| o.name.eq_ignore_ascii_case(key))
            })
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
