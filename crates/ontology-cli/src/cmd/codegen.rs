use super::{load_ontology, Selection};
use crate::output::emit;
use anyhow::Context;
use ontology_core::codegen::{self, CodeTarget};
use ontology_core::config::CompilerConfig;
use std::path::Path;

pub fn run(
    config: &CompilerConfig,
    file: &Path,
    target: &str,
    selection: &Selection,
    out: Option<&Path>,
) -> anyhow::Result<()> {
    let target: CodeTarget = target.parse()?;
    let ontology = load_ontology(file)?;
    let scope = selection.scope(&ontology)?;

    let compiled = codegen::generate(config, scope, target)
        .with_context(|| format!("failed to generate {target} source"))?;
    emit(&compiled.output, out)
}
