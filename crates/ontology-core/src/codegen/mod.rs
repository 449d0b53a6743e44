//! Source-text emitters over canonical tool descriptors.
//!
//! Emitters do no derivation of their own: names, descriptions and parameter
//! schemas come from [`ToolDescriptor`] unchanged.

pub mod python;
pub mod typescript;

use crate::config::CompilerConfig;
use crate::diagnostic::{Compiled, Diagnostic};
use crate::error::{OntologyError, Result};
use crate::naming;
use crate::plan::Scope;
use crate::tools::{self, ToolDescriptor};
use std::collections::HashSet;
use std::fmt;

// ---------------------------------------------------------------------------
// CodeTarget
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CodeTarget {
    /// LangChain `StructuredTool` wrappers with Pydantic argument models.
    Python,
    /// OpenAI function-calling `tools` array with argument interfaces.
    TypeScript,
}

impl CodeTarget {
    pub fn all() -> &'static [CodeTarget] {
        &[CodeTarget::Python, CodeTarget::TypeScript]
    }

    pub fn as_str(self) -> &'static str {
        match self {
            CodeTarget::Python => "python",
            CodeTarget::TypeScript => "typescript",
        }
    }

    pub fn extension(self) -> &'static str {
        match self {
            CodeTarget::Python => "py",
            CodeTarget::TypeScript => "ts",
        }
    }

    pub fn render(self, tools: &[ToolDescriptor]) -> Result<Compiled<String>> {
        match self {
            CodeTarget::Python => Ok(python::render(tools)),
            CodeTarget::TypeScript => typescript::render(tools),
        }
    }
}

impl fmt::Display for CodeTarget {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for CodeTarget {
    type Err = OntologyError;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_ascii_lowercase().as_str() {
            "python" | "py" => Ok(CodeTarget::Python),
            "typescript" | "ts" => Ok(CodeTarget::TypeScript),
            _ => Err(OntologyError::UnknownTarget(s.to_string())),
        }
    }
}

/// Build descriptors for `scope` and render them as `target` source.
pub fn generate(
    config: &CompilerConfig,
    scope: Scope<'_>,
    target: CodeTarget,
) -> Result<Compiled<String>> {
    let Compiled {
        output,
        mut diagnostics,
    } = tools::descriptors(config, scope)?;
    let source = target.render(&output)?;
    diagnostics.extend(source.diagnostics);
    Ok(Compiled {
        output: source.output,
        diagnostics,
    })
}

// ---------------------------------------------------------------------------
// Shared helpers
// ---------------------------------------------------------------------------

/// Double-quoted literal valid in both Python and TypeScript.
pub(crate) fn string_literal(s: &str) -> String {
    serde_json::Value::String(s.to_string()).to_string()
}

/// Identifiers bound in one scope of an emitted module. A repeat takes the
/// first free numeric suffix and is reported as a warning.
pub(crate) struct Namespace {
    target: CodeTarget,
    taken: HashSet<String>,
}

impl Namespace {
    pub(crate) fn new(target: CodeTarget, reserved: &[&str]) -> Self {
        Self {
            target,
            taken: reserved.iter().map(|r| r.to_string()).collect(),
        }
    }

    /// Bind `candidate` on behalf of `owner`, trying `{candidate}{sep}2`,
    /// `{candidate}{sep}3`, ... while it is taken.
    pub(crate) fn bind(
        &mut self,
        candidate: String,
        sep: &str,
        owner: &str,
        diagnostics: &mut Vec<Diagnostic>,
    ) -> String {
        let mut bound = candidate.clone();
        let mut n = 2;
        while !self.taken.insert(bound.clone()) {
            bound = format!("{candidate}{sep}{n}");
            n += 1;
        }
        if bound != candidate {
            let diagnostic = Diagnostic::warning(format!(
                "{}: identifier '{candidate}' for '{owner}' is already used; emitted as '{bound}'",
                self.target
            ));
            tracing::warn!("{}", diagnostic.message);
            diagnostics.push(diagnostic);
        }
        bound
    }
}

/// Text safe inside a `/** ... */` or `""" ... """` comment.
pub(crate) fn comment_text(s: &str) -> String {
    s.replace("*/", "* /").replace('"', "'").replace('\\', "/")
}

/// `approve_order` → `ApproveOrderArgs`.
pub(crate) fn args_type_name(tool_name: &str) -> String {
    let stem = naming::schema_stem(tool_name);
    match stem.chars().next() {
        None => "ToolArgs".to_string(),
        Some(c) if c.is_ascii_digit() => format!("Tool{stem}Args"),
        Some(_) => format!("{stem}Args"),
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{Action, AgentToolSpec, ImplementationLayer, OntologyObject};

    #[test]
    fn target_names_parse() {
        assert_eq!("python".parse::<CodeTarget>().unwrap(), CodeTarget::Python);
        assert_eq!("TS".parse::<CodeTarget>().unwrap(), CodeTarget::TypeScript);
        assert!("rust".parse::<CodeTarget>().is_err());
        assert_eq!(CodeTarget::TypeScript.extension(), "ts");
    }

    #[test]
    fn string_literal_escapes_quotes_and_newlines() {
        assert_eq!(string_literal("say \"hi\"\nnow"), r#""say \"hi\"\nnow""#);
    }

    #[test]
    fn args_type_names() {
        assert_eq!(args_type_name("approve_order"), "ApproveOrderArgs");
        assert_eq!(args_type_name("2fa-reset"), "Tool2faResetArgs");
        assert_eq!(args_type_name(""), "ToolArgs");
    }

    #[test]
    fn namespace_suffixes_repeats_and_reports() {
        let mut diagnostics = Vec::new();
        let mut scope = Namespace::new(CodeTarget::Python, &["TOOLS"]);
        assert_eq!(scope.bind("approve".to_string(), "_", "a", &mut diagnostics), "approve");
        assert_eq!(scope.bind("approve".to_string(), "_", "b", &mut diagnostics), "approve_2");
        assert_eq!(scope.bind("approve".to_string(), "_", "c", &mut diagnostics), "approve_3");
        assert_eq!(scope.bind("TOOLS".to_string(), "_", "d", &mut diagnostics), "TOOLS_2");
        assert_eq!(diagnostics.len(), 3);
        assert!(diagnostics[0].message.contains("emitted as 'approve_2'"));
    }

    #[test]
    fn comment_text_cannot_close_the_comment() {
        assert_eq!(comment_text("end*/start"), "end* /start");
        assert_eq!(comment_text("say \"hi\" \\"), "say 'hi' /");
    }

    #[test]
    fn generate_reports_emitter_renames() {
        let object = OntologyObject {
            name: "Order".to_string(),
            actions: vec![
                Action::new("Approve Order"),
                Action {
                    implementation_layer: Some(ImplementationLayer {
                        agent_tool_spec: Some(AgentToolSpec {
                            name: "approve-order".to_string(),
                            ..Default::default()
                        }),
                        ..Default::default()
                    }),
                    ..Action::new("Approve")
                },
            ],
            ..Default::default()
        };
        let compiled =
            generate(&CompilerConfig::default(), Scope::Object(&object), CodeTarget::TypeScript)
                .unwrap();
        assert!(compiled.output.contains("export type ApproveOrderArgs2 = Record<string, never>;"));
        assert_eq!(compiled.diagnostics.len(), 1);
        assert!(!compiled.has_errors());
    }

    #[test]
    fn generate_renders_every_action_in_scope() {
        let object = OntologyObject {
            name: "Order".to_string(),
            actions: vec![Action::new("Submit"), Action::new("Cancel")],
            ..Default::default()
        };
        let compiled =
            generate(&CompilerConfig::default(), Scope::Object(&object), CodeTarget::Python)
                .unwrap();
        assert!(compiled.output.contains("name=\"submit\""));
        assert!(compiled.output.contains("name=\"cancel\""));
        assert!(compiled.diagnostics.is_empty());
    }
}
