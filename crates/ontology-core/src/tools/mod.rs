//! AI agent tool descriptors.
//!
//! Every action compiles to one canonical [`ToolDescriptor`]; dialects are
//! stateless renderings of that descriptor (see [`dialect`]).

pub mod dialect;

use crate::config::CompilerConfig;
use crate::diagnostic::{Compiled, Diagnostic};
use crate::error::Result;
use crate::model::{ActionKind, Governance, HttpMethod};
use crate::plan::{ActionPlan, Planner, Scope};
use crate::schema::{self, ParameterSchema, Schema};
use crate::typemap::SchemaDialect;
use serde::Serialize;

pub use dialect::{render, Dialect, RenderedTool};

/// HTTP endpoint an agent runtime would call to execute the tool.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct HttpBinding {
    pub method: HttpMethod,
    pub path: String,
}

/// Dialect-neutral description of one action as a callable tool.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ToolDescriptor {
    pub name: String,
    pub description: String,
    pub parameters: ParameterSchema,
    pub returns: Schema,
    pub object: String,
    pub action_kind: ActionKind,
    pub http: HttpBinding,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub governance: Option<Governance>,
}

impl ToolDescriptor {
    pub fn from_plan(plan: &ActionPlan<'_>, name: String) -> Self {
        let action = plan.action;
        let description = action
            .agent_tool()
            .map(|t| t.description.trim())
            .filter(|d| !d.is_empty())
            .unwrap_or_else(|| action.summary())
            .to_string();

        ToolDescriptor {
            name,
            description,
            parameters: parameters_for(plan),
            returns: schema::response_schema(action),
            object: plan.object_name.clone(),
            action_kind: action.kind,
            http: HttpBinding {
                method: plan.method,
                path: plan.path.clone(),
            },
            governance: action.governance.clone(),
        }
    }
}

/// Derived parameter schema; the authored agent-tool schema stands in only
/// when nothing can be derived.
fn parameters_for(plan: &ActionPlan<'_>) -> ParameterSchema {
    if let Some(derived) = schema::request_schema(plan.action, SchemaDialect::JsonSchema) {
        return derived.into();
    }
    plan.action
        .agent_tool()
        .and_then(|t| t.parameters.clone())
        .and_then(|value| serde_json::from_value::<Schema>(value).ok())
        .filter(|s| !s.properties.is_empty())
        .map(ParameterSchema::from)
        .unwrap_or_default()
}

/// Authored tool name if present, else the operation id.
fn candidate_name(plan: &ActionPlan<'_>) -> String {
    plan.action
        .agent_tool()
        .map(|t| t.name.trim())
        .filter(|n| !n.is_empty())
        .map(str::to_string)
        .unwrap_or_else(|| plan.identity.operation_id.clone())
}

/// Build canonical descriptors for every action in `scope`.
pub fn descriptors(config: &CompilerConfig, scope: Scope<'_>) -> Result<Compiled<Vec<ToolDescriptor>>> {
    let mut planner = Planner::new(config);
    let mut tools = Vec::new();
    for (object, action) in scope.actions() {
        let plan = planner.plan(object, action)?;
        let claim = planner
            .registry_mut()
            .claim_name(&plan.label, &candidate_name(&plan))?;
        if let Some(diagnostic) = claim.diagnostic {
            planner.report(diagnostic);
        }
        tools.push(ToolDescriptor::from_plan(&plan, claim.value));
    }
    Ok(Compiled {
        output: tools,
        diagnostics: planner.into_diagnostics(),
    })
}

/// Build descriptors for `scope` and render them in `dialect`.
pub fn emit(
    config: &CompilerConfig,
    scope: Scope<'_>,
    dialect: Dialect,
) -> Result<Compiled<Vec<RenderedTool>>> {
    let Compiled {
        output,
        mut diagnostics,
    } = descriptors(config, scope)?;

    let mut rendered = Vec::with_capacity(output.len());
    for tool in &output {
        if !dialect.carries_governance() {
            if let Some(gov) = tool.governance.as_ref().filter(|g| g.is_significant()) {
                let diagnostic = Diagnostic::warning(format!(
                    "{dialect} has no metadata slot; governance of tool '{}' \
                     (tier {}, risk {}) is not carried",
                    tool.name, gov.permission_tier, gov.risk_level
                ));
                tracing::warn!("{}", diagnostic.message);
                diagnostics.push(diagnostic);
            }
        }
        rendered.push(render(tool, dialect));
    }

    Ok(Compiled {
        output: rendered,
        diagnostics,
    })
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
