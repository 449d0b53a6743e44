use crate::error::Result;
use crate::model::Ontology;
use std::io::Write;
use std::path::Path;
use tempfile::NamedTempFile;

/// What [`write_artifact`] did to the target file.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WriteOutcome {
    Written,
    Unchanged,
}

/// Replace `path` with `contents` through a sibling tempfile, so a reader
/// never sees a half-written artifact. Identical contents leave the file
/// (and its mtime) alone.
pub fn write_artifact(path: &Path, contents: &str) -> Result<WriteOutcome> {
    if std::fs::read(path).is_ok_and(|existing| existing == contents.as_bytes()) {
        tracing::debug!(path = %path.display(), "artifact unchanged");
        return Ok(WriteOutcome::Unchanged);
    }

    let dir = match path.parent().filter(|p| !p.as_os_str().is_empty()) {
        Some(parent) => {
            std::fs::create_dir_all(parent)?;
            parent
        }
        None => Path::new("."),
    };
    let mut staged = NamedTempFile::new_in(dir)?;
    staged.write_all(contents.as_bytes())?;
    staged.persist(path).map_err(|e| e.error)?;
    tracing::debug!(path = %path.display(), bytes = contents.len(), "wrote artifact");
    Ok(WriteOutcome::Written)
}

/// Read an ontology document. `.yaml`/`.yml` files are parsed as YAML,
/// everything else as JSON.
pub fn load_ontology(path: &Path) -> Result<Ontology> {
    let data = std::fs::read_to_string(path)?;
    let is_yaml = path
        .extension()
        .and_then(|e| e.to_str())
        .is_some_and(|e| e.eq_ignore_ascii_case("yaml") || e.eq_ignore_ascii_case("yml"));
    let ontology = if is_yaml {
        serde_yaml::from_str(&data)?
    } else {
        serde_json::from_str(&data)?
    };
    Ok(ontology)
}
