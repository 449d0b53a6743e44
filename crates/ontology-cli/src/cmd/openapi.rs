use super::{load_ontology, resolve_format, Selection};
use crate::output::emit;
use anyhow::Context;
use ontology_core::config::CompilerConfig;
use ontology_core::{openapi, output};
use std::path::Path;

pub fn run(
    config: &CompilerConfig,
    file: &Path,
    selection: &Selection,
    format: Option<&str>,
    out: Option<&Path>,
    json: bool,
) -> anyhow::Result<()> {
    let ontology = load_ontology(file)?;
    let scope = selection.scope(&ontology)?;
    let format = resolve_format(format, out, json)?;

    let compiled = openapi::assemble(config, scope).context("failed to compile OpenAPI document")?;
    tracing::debug!(
        paths = compiled.output.paths.len(),
        schemas = compiled.output.components.schemas.len(),
        "compiled OpenAPI document"
    );
    emit(&output::render(&compiled.output, format)?, out)
}
