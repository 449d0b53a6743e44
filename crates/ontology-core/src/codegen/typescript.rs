//! OpenAI function-calling helper: a typed `tools` array plus one argument
//! interface per tool.

use super::{args_type_name, comment_text, string_literal, CodeTarget, Namespace};
use crate::diagnostic::Compiled;
use crate::error::Result;
use crate::schema::{Schema, SchemaType};
use crate::tools::{render as render_tool, Dialect, ToolDescriptor};
use regex::Regex;
use std::fmt::Write;
use std::sync::OnceLock;

const HEADER: &str = "// OpenAI tools generated from the ontology. Do not edit by hand.
import type { ChatCompletionTool } from \"openai/resources/chat/completions\";
";

static IDENT_RE: OnceLock<Regex> = OnceLock::new();

fn ident_re() -> &'static Regex {
    IDENT_RE.get_or_init(|| Regex::new(r"^[A-Za-z_$][A-Za-z0-9_$]*$").unwrap())
}

pub fn render(tools: &[ToolDescriptor]) -> Result<Compiled<String>> {
    let mut out = String::from(HEADER);
    let mut diagnostics = Vec::new();
    let mut module = Namespace::new(CodeTarget::TypeScript, &[]);

    for tool in tools {
        let type_name = module.bind(args_type_name(&tool.name), "", &tool.name, &mut diagnostics);
        out.push('\n');
        write_interface(&mut out, &type_name, tool);
    }

    out.push('\n');
    if tools.is_empty() {
        out.push_str("export const tools: ChatCompletionTool[] = [];\n");
    } else {
        out.push_str("export const tools: ChatCompletionTool[] = [\n");
        for tool in tools {
            let json = serde_json::to_string_pretty(&render_tool(tool, Dialect::OpenAi))?;
            let _ = writeln!(out, "{},", indent(&json, "  "));
        }
        out.push_str("];\n");
    }

    out.push('\n');
    let names: Vec<String> = tools.iter().map(|t| string_literal(&t.name)).collect();
    if names.is_empty() {
        out.push_str("export type ToolName = never;\n");
    } else {
        let _ = writeln!(out, "export type ToolName = {};", names.join(" | "));
    }
    Ok(Compiled {
        output: out,
        diagnostics,
    })
}

fn write_interface(out: &mut String, type_name: &str, tool: &ToolDescriptor) {
    let params = &tool.parameters;
    let _ = writeln!(out, "/** Arguments for `{}`. */", comment_text(&tool.name));
    if params.properties.is_empty() {
        let _ = writeln!(out, "export type {type_name} = Record<string, never>;");
        return;
    }

    let _ = writeln!(out, "export interface {type_name} {{");
    for (name, schema) in &params.properties {
        if let Some(description) = &schema.description {
            let _ = writeln!(out, "  /** {} */", comment_text(description));
        }
        let optional = if params.is_required(name) { "" } else { "?" };
        let _ = writeln!(out, "  {}{optional}: {};", property_key(name), ts_type(schema));
    }
    out.push_str("}\n");
}

fn property_key(name: &str) -> String {
    if ident_re().is_match(name) {
        name.to_string()
    } else {
        string_literal(name)
    }
}

fn ts_type(schema: &Schema) -> String {
    match schema.schema_type {
        Some(SchemaType::String) => "string".to_string(),
        Some(SchemaType::Number) | Some(SchemaType::Integer) => "number".to_string(),
        Some(SchemaType::Boolean) => "boolean".to_string(),
        Some(SchemaType::Array) => match &schema.items {
            Some(items) => format!("{}[]", ts_type(items)),
            None => "unknown[]".to_string(),
        },
        Some(SchemaType::Object) => "Record<string, unknown>".to_string(),
        None => "unknown".to_string(),
    }
}

/// Prefix every line of `text` with `pad`.
fn indent(text: &str, pad: &str) -> String {
    text.lines()
        .map(|line| format!("{pad}{line}"))
        .collect::<Vec<_>>()
        .join("\n")
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::CompilerConfig;
    use crate::model::{
        Action, ActionParameter, AgentToolSpec, ImplementationLayer, LogicLayer, OntologyObject,
        ParamKind,
    };
    use crate::plan::Scope;
    use crate::tools::descriptors;

    fn tools() -> Vec<ToolDescriptor> {
        let action = Action {
            description: "Refund a payment".to_string(),
            logic_layer: Some(LogicLayer {
                parameters: vec![
                    ActionParameter {
                        name: "paymentId".to_string(),
                        kind: ParamKind::String,
                        required: true,
                        description: "Payment to refund".to_string(),
                    },
                    ActionParameter {
                        name: "line-items".to_string(),
                        kind: ParamKind::Array,
                        required: false,
                        description: String::new(),
                    },
                ],
                ..Default::default()
            }),
            ..Action::new("Refund Payment")
        };
        descriptors(&CompilerConfig::default(), Scope::action(&action))
            .unwrap()
            .output
    }

    #[test]
    fn interface_reflects_requiredness() {
        let source = render(&tools()).unwrap().output;
        assert!(source.contains("export interface RefundPaymentArgs {"));
        assert!(source.contains("  /** Payment to refund */\n  paymentId: string;"));
        assert!(source.contains("  \"line-items\"?: unknown[];"));
    }

    #[test]
    fn tools_array_uses_function_envelope() {
        let source = render(&tools()).unwrap().output;
        assert!(source.contains("import type { ChatCompletionTool }"));
        assert!(source.contains("export const tools: ChatCompletionTool[] = [\n  {\n    \"type\": \"function\","));
        assert!(source.contains("\"name\": \"refund_payment\""));
        assert!(source.contains("export type ToolName = \"refund_payment\";"));
    }

    #[test]
    fn empty_inputs_render_valid_module() {
        let source = render(&[]).unwrap().output;
        assert!(source.contains("export const tools: ChatCompletionTool[] = [];"));
        assert!(source.contains("export type ToolName = never;"));
    }

    #[test]
    fn parameterless_tool_gets_empty_record() {
        let action = Action::new("Ping");
        let tools = descriptors(&CompilerConfig::default(), Scope::action(&action))
            .unwrap()
            .output;
        let source = render(&tools).unwrap().output;
        assert!(source.contains("export type PingArgs = Record<string, never>;"));
    }

    #[test]
    fn repeated_type_names_are_suffixed() {
        let authored = |action: &str, tool: &str| Action {
            implementation_layer: Some(ImplementationLayer {
                agent_tool_spec: Some(AgentToolSpec {
                    name: tool.to_string(),
                    ..Default::default()
                }),
                ..Default::default()
            }),
            ..Action::new(action)
        };
        let object = OntologyObject {
            name: "Order".to_string(),
            actions: vec![Action::new("Approve Order"), authored("Approve", "approve-order")],
            ..Default::default()
        };
        let tools = descriptors(&CompilerConfig::default(), Scope::Object(&object))
            .unwrap()
            .output;
        let compiled = render(&tools).unwrap();
        assert!(compiled.output.contains("export type ApproveOrderArgs = Record<string, never>;"));
        assert!(compiled.output.contains("export type ApproveOrderArgs2 = Record<string, never>;"));
        assert_eq!(compiled.diagnostics.len(), 1);
    }

    #[test]
    fn tool_name_cannot_close_doc_comment() {
        let action = Action {
            implementation_layer: Some(ImplementationLayer {
                agent_tool_spec: Some(AgentToolSpec {
                    name: "end*/start".to_string(),
                    ..Default::default()
                }),
                ..Default::default()
            }),
            ..Action::new("Escape")
        };
        let tools = descriptors(&CompilerConfig::default(), Scope::action(&action))
            .unwrap()
            .output;
        let source = render(&tools).unwrap().output;
        assert!(source.contains("/** Arguments for `end* /start`. */"));
        assert!(!source.contains("`end*/start`"));
    }
}
