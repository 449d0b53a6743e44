//! LangChain module: one Pydantic args model and one `StructuredTool` per
//! descriptor, collected in `TOOLS`.

use super::{args_type_name, comment_text, string_literal, CodeTarget, Namespace};
use crate::diagnostic::{Compiled, Diagnostic};
use crate::schema::{Schema, SchemaType};
use crate::tools::ToolDescriptor;
use std::fmt::Write;

const HEADER: &str = "\"\"\"LangChain tools generated from the ontology. Do not edit by hand.\"\"\"

from typing import Any, Optional

from langchain_core.tools import StructuredTool
from pydantic import BaseModel, ConfigDict, Field
";

const KEYWORDS: &[&str] = &[
    "False", "None", "True", "and", "as", "assert", "async", "await", "break", "class",
    "continue", "def", "del", "elif", "else", "except", "finally", "for", "from", "global",
    "if", "import", "in", "is", "lambda", "nonlocal", "not", "or", "pass", "raise", "return",
    "try", "while", "with", "yield",
];

pub fn render(tools: &[ToolDescriptor]) -> Compiled<String> {
    let mut out = String::from(HEADER);
    let mut diagnostics = Vec::new();
    let mut module = Namespace::new(CodeTarget::Python, &[]);
    let mut handles = Vec::with_capacity(tools.len());

    for tool in tools {
        let func = module.bind(identifier(&tool.name), "_", &tool.name, &mut diagnostics);
        let model = module.bind(args_type_name(&tool.name), "", &tool.name, &mut diagnostics);
        let handle = module.bind(format!("{func}_tool"), "_", &tool.name, &mut diagnostics);
        out.push_str("\n\n");
        write_model(&mut out, &model, tool, &mut diagnostics);
        out.push_str("\n\n");
        write_function(&mut out, &func, tool);
        out.push_str("\n\n");

        let _ = writeln!(out, "{handle} = StructuredTool.from_function(");
        let _ = writeln!(out, "    func={func},");
        let _ = writeln!(out, "    name={},", string_literal(&tool.name));
        let _ = writeln!(out, "    description={},", string_literal(&tool.description));
        let _ = writeln!(out, "    args_schema={model},");
        out.push_str(")\n");
        handles.push(handle);
    }

    out.push_str("\n\n");
    if handles.is_empty() {
        out.push_str("TOOLS: list[StructuredTool] = []\n");
    } else {
        out.push_str("TOOLS: list[StructuredTool] = [\n");
        for handle in &handles {
            let _ = writeln!(out, "    {handle},");
        }
        out.push_str("]\n");
    }
    Compiled {
        output: out,
        diagnostics,
    }
}

fn write_model(
    out: &mut String,
    model: &str,
    tool: &ToolDescriptor,
    diagnostics: &mut Vec<Diagnostic>,
) {
    let mut scope = Namespace::new(CodeTarget::Python, &["model_config"]);
    let fields: Vec<(String, &String, &Schema)> = tool
        .parameters
        .properties
        .iter()
        .map(|(name, schema)| {
            let owner = format!("{}.{name}", tool.name);
            (scope.bind(identifier(name), "_", &owner, diagnostics), name, schema)
        })
        .collect();

    let _ = writeln!(out, "class {model}(BaseModel):");
    let _ = writeln!(out, "    \"\"\"Arguments for {}.\"\"\"", comment_text(&tool.name));
    if fields.iter().any(|(field, name, _)| field != *name) {
        out.push_str("\n    model_config = ConfigDict(populate_by_name=True)\n");
    }
    if !fields.is_empty() {
        out.push('\n');
    }

    for (field, name, schema) in fields {
        let required = tool.parameters.is_required(name);
        let base = python_type(schema);
        let (annotation, default) = if required {
            (base.to_string(), "...")
        } else {
            (format!("Optional[{base}]"), "None")
        };

        let mut args = vec![default.to_string()];
        if field != *name {
            args.push(format!("alias={}", string_literal(name)));
        }
        if let Some(description) = &schema.description {
            args.push(format!("description={}", string_literal(description)));
        }
        let _ = writeln!(out, "    {field}: {annotation} = Field({})", args.join(", "));
    }
}

fn write_function(out: &mut String, func: &str, tool: &ToolDescriptor) {
    let _ = writeln!(out, "def {func}(**kwargs: Any) -> dict:");
    let _ = writeln!(out, "    {}", string_literal(&tool.description));
    let _ = writeln!(
        out,
        "    raise NotImplementedError({})",
        string_literal(&format!(
            "{} is served by {} {}",
            tool.name, tool.http.method, tool.http.path
        ))
    );
}

fn python_type(schema: &Schema) -> &'static str {
    match schema.schema_type {
        Some(SchemaType::String) => "str",
        Some(SchemaType::Number) => "float",
        Some(SchemaType::Integer) => "int",
        Some(SchemaType::Boolean) => "bool",
        Some(SchemaType::Array) => "list",
        Some(SchemaType::Object) => "dict",
        None => "Any",
    }
}

/// `orderId` → `order_id`; non-identifier characters become `_`, keywords get
/// a trailing `_`.
fn identifier(name: &str) -> String {
    let mut ident = String::with_capacity(name.len() + 4);
    let mut prev_lower = false;
    for c in name.trim().chars() {
        if c.is_ascii_uppercase() {
            if prev_lower {
                ident.push('_');
            }
            ident.push(c.to_ascii_lowercase());
            prev_lower = false;
        } else if c.is_ascii_alphanumeric() {
            ident.push(c);
            prev_lower = c.is_ascii_lowercase() || c.is_ascii_digit();
        } else {
            if !ident.ends_with('_') {
                ident.push('_');
            }
            prev_lower = false;
        }
    }
    let ident = ident.trim_matches('_').to_string();

    if ident.is_empty() {
        return "field".to_string();
    }
    if ident.starts_with(|c: char| c.is_ascii_digit()) {
        return format!("field_{ident}");
    }
    if KEYWORDS.contains(&ident.as_str()) {
        return format!("{ident}_");
    }
    ident
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
