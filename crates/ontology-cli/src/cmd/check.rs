use super::load_ontology;
use crate::output::{print_diagnostics, print_json};
use ontology_core::config::CompilerConfig;
use ontology_core::diagnostic::{Diagnostic, Level};
use ontology_core::tools::{self, Dialect};
use ontology_core::{openapi, Scope};
use std::path::Path;

pub fn run(config: &CompilerConfig, file: &Path, json: bool) -> anyhow::Result<()> {
    let ontology = load_ontology(file)?;
    let scope = Scope::Ontology(&ontology);

    let mut diagnostics = config.validate();
    diagnostics.extend(openapi::assemble(config, scope)?.diagnostics);
    for &dialect in Dialect::all() {
        diagnostics.extend(tools::emit(config, scope, dialect)?.diagnostics);
    }
    let diagnostics = dedup(diagnostics);

    let errors = diagnostics.iter().filter(|d| d.level == Level::Error).count();
    let warnings = diagnostics.len() - errors;

    if json {
        let value = serde_json::json!({
            "diagnostics": diagnostics,
            "errors": errors,
            "warnings": warnings,
        });
        print_json(&value)?;
    } else if diagnostics.is_empty() {
        println!("No problems found.");
    } else {
        print_diagnostics(&diagnostics);
        println!("{errors} error(s), {warnings} warning(s)");
    }

    if errors > 0 {
        anyhow::bail!("check found {errors} error(s)");
    }
    Ok(())
}

/// The OpenAPI and tool passes plan the same actions, so identical findings
/// show up more than once.
fn dedup(diagnostics: Vec<Diagnostic>) -> Vec<Diagnostic> {
    let mut unique: Vec<Diagnostic> = Vec::with_capacity(diagnostics.len());
    for d in diagnostics {
        if !unique.contains(&d) {
            unique.push(d);
        }
    }
    unique
}
