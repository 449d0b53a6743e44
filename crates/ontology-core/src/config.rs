use crate::diagnostic::Diagnostic;
use crate::error::{OntologyError, Result};
use crate::model::Ontology;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::Path;

pub const CONFIG_DIR: &str = ".ontology";
pub const CONFIG_FILE: &str = ".ontology/compiler.yaml";

pub const DEFAULT_TITLE: &str = "Ontology API";
pub const DEFAULT_VERSION: &str = "1.0.0";

// ---------------------------------------------------------------------------
// CollisionPolicy
// ---------------------------------------------------------------------------

/// What to do when two actions derive the same identifier, or two operations
/// land on the same path and verb.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CollisionPolicy {
    /// Later definitions replace earlier ones; each replacement is reported.
    #[default]
    Overwrite,
    /// Later identifiers get a numeric suffix (`_2`, `_3`, ...).
    Suffix,
    /// Compilation fails on the first collision.
    Reject,
}

impl CollisionPolicy {
    pub fn as_str(self) -> &'static str {
        match self {
            CollisionPolicy::Overwrite => "overwrite",
            CollisionPolicy::Suffix => "suffix",
            CollisionPolicy::Reject => "reject",
        }
    }
}

impl fmt::Display for CollisionPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for CollisionPolicy {
    type Err = OntologyError;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s {
            "overwrite" => Ok(CollisionPolicy::Overwrite),
            "suffix" => Ok(CollisionPolicy::Suffix),
            "reject" => Ok(CollisionPolicy::Reject),
            _ => Err(OntologyError::UnknownPolicy(s.to_string())),
        }
    }
}

// ---------------------------------------------------------------------------
// CompilerConfig
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CompilerConfig {
    /// OpenAPI `info.title`. Falls back to "<ontology name> API".
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    /// OpenAPI `info.version`. Falls back to the ontology version.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub version: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub servers: Vec<String>,
    #[serde(default)]
    pub collisions: CollisionPolicy,
    /// Treat actions with empty names as errors instead of warnings.
    #[serde(default)]
    pub strict: bool,
}

impl CompilerConfig {
    pub fn load(path: &Path) -> Result<Self> {
        let data = std::fs::read_to_string(path)?;
        let cfg: CompilerConfig = serde_yaml::from_str(&data)?;
        Ok(cfg)
    }

    pub fn save(&self, path: &Path) -> Result<()> {
        let data = serde_yaml::to_string(self)?;
        crate::io::write_artifact(path, &data)?;
        Ok(())
    }

    pub fn with_policy(mut self, policy: CollisionPolicy) -> Self {
        self.collisions = policy;
        self
    }

    pub fn resolved_title(&self, ontology: Option<&Ontology>) -> String {
        if let Some(title) = self.title.as_deref().filter(|t| !t.trim().is_empty()) {
            return title.to_string();
        }
        match ontology
            .and_then(|o| o.name.as_deref())
            .filter(|n| !n.trim().is_empty())
        {
            Some(name) => format!("{} API", name.trim()),
            None => DEFAULT_TITLE.to_string(),
        }
    }

    pub fn resolved_version(&self, ontology: Option<&Ontology>) -> String {
        self.version
            .as_deref()
            .or_else(|| ontology.and_then(|o| o.version.as_deref()))
            .filter(|v| !v.trim().is_empty())
            .unwrap_or(DEFAULT_VERSION)
            .to_string()
    }

    // -----------------------------------------------------------------------
    // Validation
    // -----------------------------------------------------------------------

    pub fn validate(&self) -> Vec<Diagnostic> {
        let mut warnings = Vec::new();

        if matches!(self.title.as_deref(), Some(t) if t.trim().is_empty()) {
            warnings.push(Diagnostic::warning(
                "title is empty; the document title will be derived from the ontology",
            ));
        }

        if matches!(self.version.as_deref(), Some(v) if v.trim().is_empty()) {
            warnings.push(Diagnostic::warning(
                "version is empty; the document version will be derived from the ontology",
            ));
        }

        for server in &self.servers {
            if !(server.starts_with("http://") || server.starts_with("https://") || server.starts_with('/')) {
                warnings.push(Diagnostic::warning(format!(
                    "server '{server}' is neither an absolute URL nor a relative path"
                )));
            }
        }

        warnings
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
