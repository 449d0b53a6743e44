use super::{load_ontology, resolve_format, Selection};
use crate::output::emit;
use anyhow::Context;
use ontology_core::config::CompilerConfig;
use ontology_core::tools::{self, Dialect};
use ontology_core::output;
use std::path::Path;

pub fn run(
    config: &CompilerConfig,
    file: &Path,
    dialect: &str,
    selection: &Selection,
    format: Option<&str>,
    out: Option<&Path>,
    json: bool,
) -> anyhow::Result<()> {
    let dialect: Dialect = dialect.parse()?;
    let ontology = load_ontology(file)?;
    let scope = selection.scope(&ontology)?;
    let format = resolve_format(format, out, json)?;

    let compiled = tools::emit(config, scope, dialect)
        .with_context(|| format!("failed to compile {dialect} tools"))?;
    emit(&output::render(&compiled.output, format)?, out)
}
