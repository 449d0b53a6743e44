use anyhow::Context;
use ontology_core::config::{CollisionPolicy, CompilerConfig, CONFIG_FILE};
use std::path::{Path, PathBuf};

/// Locate the compiler config.
///
/// Priority:
/// 1. `--config` flag / `ONTOLOGY_CONFIG` env var (passed in as `explicit`)
/// 2. Walk upward from `start` looking for `.ontology/compiler.yaml`
pub fn resolve(explicit: Option<&Path>, start: &Path) -> Option<PathBuf> {
    if let Some(p) = explicit {
        return Some(p.to_path_buf());
    }

    let mut dir = start.to_path_buf();
    loop {
        let candidate = dir.join(CONFIG_FILE);
        if candidate.is_file() {
            return Some(candidate);
        }
        match dir.parent() {
            Some(p) => dir = p.to_path_buf(),
            None => return None,
        }
    }
}

/// Load the config for this invocation; defaults when none is found.
pub fn load(
    explicit: Option<&Path>,
    collisions: Option<CollisionPolicy>,
) -> anyhow::Result<CompilerConfig> {
    let cwd = std::env::current_dir().unwrap_or_else(|_| PathBuf::from("."));
    let mut config = match resolve(explicit, &cwd) {
        Some(path) => {
            tracing::debug!(path = %path.display(), "loading compiler config");
            CompilerConfig::load(&path)
                .with_context(|| format!("failed to load config {}", path.display()))?
        }
        None => CompilerConfig::default(),
    };
    if let Some(policy) = collisions {
        config = config.with_policy(policy);
    }
    Ok(config)
}
