//! Per-dialect renderings of a [`ToolDescriptor`].
//!
//! | dialect     | envelope                                        | governance |
//! |-------------|-------------------------------------------------|------------|
//! | `openai`    | `{type: "function", function: {..parameters}}`  | dropped    |
//! | `langchain` | `{name, description, args_schema, metadata}`    | metadata   |
//! | `claude`    | `{name, description, input_schema}`             | dropped    |
//! | `mcp`       | `{name, description, inputSchema, outputSchema}`| dropped    |
//! | `universal` | `{name, description, parameters, returns, ..}`  | metadata   |

use super::{HttpBinding, ToolDescriptor};
use crate::error::OntologyError;
use crate::model::{ActionKind, Governance, RiskLevel};
use crate::schema::{ParameterSchema, Schema};
use serde::Serialize;
use std::fmt;

// ---------------------------------------------------------------------------
// Dialect
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Dialect {
    OpenAi,
    LangChain,
    Claude,
    Mcp,
    Universal,
}

impl Dialect {
    pub fn all() -> &'static [Dialect] {
        &[
            Dialect::OpenAi,
            Dialect::LangChain,
            Dialect::Claude,
            Dialect::Mcp,
            Dialect::Universal,
        ]
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Dialect::OpenAi => "openai",
            Dialect::LangChain => "langchain",
            Dialect::Claude => "claude",
            Dialect::Mcp => "mcp",
            Dialect::Universal => "universal",
        }
    }

    /// Whether the dialect defines a slot for governance metadata.
    pub fn carries_governance(self) -> bool {
        matches!(self, Dialect::LangChain | Dialect::Universal)
    }

    pub fn describe(self) -> &'static str {
        match self {
            Dialect::OpenAi => "OpenAI function calling (type/function envelope)",
            Dialect::LangChain => "LangChain tool with args_schema and metadata",
            Dialect::Claude => "Anthropic tool use (input_schema)",
            Dialect::Mcp => "Model Context Protocol tool (inputSchema/outputSchema)",
            Dialect::Universal => "Dialect-neutral descriptor with HTTP binding",
        }
    }
}

impl fmt::Display for Dialect {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for Dialect {
    type Err = OntologyError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "openai" => Ok(Dialect::OpenAi),
            "langchain" => Ok(Dialect::LangChain),
            "claude" | "anthropic" => Ok(Dialect::Claude),
            "mcp" => Ok(Dialect::Mcp),
            "universal" => Ok(Dialect::Universal),
            _ => Err(OntologyError::UnknownDialect(s.to_string())),
        }
    }
}

// ---------------------------------------------------------------------------
// Rendered shapes
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct OpenAiTool {
    #[serde(rename = "type")]
    pub kind: &'static str,
    pub function: OpenAiFunction,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct OpenAiFunction {
    pub name: String,
    pub description: String,
    pub parameters: ParameterSchema,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GovernanceMetadata {
    pub permission_tier: u8,
    pub requires_human_approval: bool,
    pub risk_level: RiskLevel,
    pub audit_log: bool,
}

impl From<&Governance> for GovernanceMetadata {
    fn from(gov: &Governance) -> Self {
        Self {
            permission_tier: gov.permission_tier,
            requires_human_approval: gov.requires_human_approval,
            risk_level: gov.risk_level.clone(),
            audit_log: gov.audit_log,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LangChainTool {
    pub name: String,
    pub description: String,
    pub args_schema: ParameterSchema,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub metadata: Option<GovernanceMetadata>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ClaudeTool {
    pub name: String,
    pub description: String,
    pub input_schema: ParameterSchema,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct McpTool {
    pub name: String,
    pub description: String,
    #[serde(rename = "inputSchema")]
    pub input_schema: ParameterSchema,
    #[serde(rename = "outputSchema")]
    pub output_schema: Schema,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct UniversalMetadata {
    pub object: String,
    pub action_kind: ActionKind,
    pub http: HttpBinding,
    #[serde(flatten)]
    pub governance: Option<GovernanceMetadata>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct UniversalTool {
    pub name: String,
    pub description: String,
    pub parameters: ParameterSchema,
    pub returns: Schema,
    pub metadata: UniversalMetadata,
}

/// One tool in one dialect. Serializes as the bare dialect shape.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum RenderedTool {
    OpenAi(OpenAiTool),
    LangChain(LangChainTool),
    Claude(ClaudeTool),
    Mcp(McpTool),
    Universal(UniversalTool),
}

impl RenderedTool {
    pub fn name(&self) -> &str {
        match self {
            RenderedTool::OpenAi(t) => &t.function.name,
            RenderedTool::LangChain(t) => &t.name,
            RenderedTool::Claude(t) => &t.name,
            RenderedTool::Mcp(t) => &t.name,
            RenderedTool::Universal(t) => &t.name,
        }
    }

    pub fn description(&self) -> &str {
        match self {
            RenderedTool::OpenAi(t) => &t.function.description,
            RenderedTool::LangChain(t) => &t.description,
            RenderedTool::Claude(t) => &t.description,
            RenderedTool::Mcp(t) => &t.description,
            RenderedTool::Universal(t) => &t.description,
        }
    }

    pub fn parameters(&self) -> &ParameterSchema {
        match self {
            RenderedTool::OpenAi(t) => &t.function.parameters,
            RenderedTool::LangChain(t) => &t.args_schema,
            RenderedTool::Claude(t) => &t.input_schema,
            RenderedTool::Mcp(t) => &t.input_schema,
            RenderedTool::Universal(t) => &t.parameters,
        }
    }
}

// ---------------------------------------------------------------------------
// Rendering
// ---------------------------------------------------------------------------

pub fn render(tool: &ToolDescriptor, dialect: Dialect) -> RenderedTool {
    let name = tool.name.clone();
    let description = tool.description.clone();
    let parameters = tool.parameters.clone();
    let governance = tool.governance.as_ref().map(GovernanceMetadata::from);

    match dialect {
        Dialect::OpenAi => RenderedTool::OpenAi(OpenAiTool {
            kind: "function",
            function: OpenAiFunction {
                name,
                description,
                parameters,
            },
        }),
        Dialect::LangChain => RenderedTool::LangChain(LangChainTool {
            name,
            description,
            args_schema: parameters,
            metadata: governance,
        }),
        Dialect::Claude => RenderedTool::Claude(ClaudeTool {
            name,
            description,
            input_schema: parameters,
        }),
        Dialect::Mcp => RenderedTool::Mcp(McpTool {
            name,
            description,
            input_schema: parameters,
            output_schema: tool.returns.clone(),
        }),
        Dialect::Universal => RenderedTool::Universal(UniversalTool {
            name,
            description,
            parameters,
            returns: tool.returns.clone(),
            metadata: UniversalMetadata {
                object: tool.object.clone(),
                action_kind: tool.action_kind,
                http: tool.http.clone(),
                governance,
            },
        }),
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::CompilerConfig;
    use crate::model::{Action, ActionParameter, LogicLayer, ParamKind};
    use crate::plan::Scope;
    use crate::tools::descriptors;
    use serde_json::json;

    fn descriptor() -> ToolDescriptor {
        let action = Action {
            description: "Cancel an order".to_string(),
            logic_layer: Some(LogicLayer {
                parameters: vec![ActionParameter {
                    name: "reason".to_string(),
                    kind: ParamKind::String,
                    required: true,
                    description: "Why".to_string(),
                }],
                ..Default::default()
            }),
            governance: Some(Governance {
                permission_tier: 2,
                risk_level: RiskLevel::Medium,
                ..Default::default()
            }),
            ..Action::new("Cancel Order")
        };
        descriptors(&CompilerConfig::default(), Scope::action(&action))
            .unwrap()
            .output
            .remove(0)
    }

    #[test]
    fn dialect_names_roundtrip() {
        for &dialect in Dialect::all() {
            assert_eq!(dialect.as_str().parse::<Dialect>().unwrap(), dialect);
        }
        assert!("gemini".parse::<Dialect>().is_err());
    }

    #[test]
    fn name_and_description_identical_across_dialects() {
        let tool = descriptor();
        for &dialect in Dialect::all() {
            let rendered = render(&tool, dialect);
            assert_eq!(rendered.name(), "cancel_order");
            assert_eq!(rendered.description(), "Cancel an order");
            assert_eq!(rendered.parameters().required, vec!["reason"]);
        }
    }

    #[test]
    fn openai_envelope() {
        let value = serde_json::to_value(render(&descriptor(), Dialect::OpenAi)).unwrap();
        assert_eq!(value["type"], "function");
        assert_eq!(value["function"]["name"], "cancel_order");
        assert_eq!(value["function"]["parameters"]["required"], json!(["reason"]));
        assert!(value.get("metadata").is_none());
    }

    #[test]
    fn langchain_carries_governance_verbatim() {
        let value = serde_json::to_value(render(&descriptor(), Dialect::LangChain)).unwrap();
        assert_eq!(value["metadata"]["permission_tier"], 2);
        assert_eq!(value["metadata"]["risk_level"], "medium");
        assert_eq!(value["args_schema"]["type"], "object");
    }

    #[test]
    fn claude_and_mcp_shapes() {
        let claude = serde_json::to_value(render(&descriptor(), Dialect::Claude)).unwrap();
        assert!(claude.get("input_schema").is_some());

        let mcp = serde_json::to_value(render(&descriptor(), Dialect::Mcp)).unwrap();
        assert!(mcp.get("inputSchema").is_some());
        assert_eq!(mcp["outputSchema"]["properties"]["success"]["type"], "boolean");
    }

    #[test]
    fn universal_flattens_governance_into_metadata() {
        let value = serde_json::to_value(render(&descriptor(), Dialect::Universal)).unwrap();
        let metadata = &value["metadata"];
        assert_eq!(metadata["http"]["method"], "POST");
        assert_eq!(metadata["http"]["path"], "/api/resources/{id}/cancel_order");
        assert_eq!(metadata["action_kind"], "traditional");
        assert_eq!(metadata["permission_tier"], 2);
    }
}
