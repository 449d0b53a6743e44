use crate::error::{OntologyError, Result};
use crate::yaml;
use serde::Serialize;
use std::fmt;
use std::path::Path;

/// Serialization format for compiled documents.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Format {
    #[default]
    Json,
    Yaml,
}

impl Format {
    pub fn as_str(self) -> &'static str {
        match self {
            Format::Json => "json",
            Format::Yaml => "yaml",
        }
    }

    /// Infer from a file extension, if it names one of the formats.
    pub fn from_path(path: &Path) -> Option<Format> {
        match path.extension()?.to_str()?.to_ascii_lowercase().as_str() {
            "json" => Some(Format::Json),
            "yaml" | "yml" => Some(Format::Yaml),
            _ => None,
        }
    }
}

impl fmt::Display for Format {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for Format {
    type Err = OntologyError;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_ascii_lowercase().as_str() {
            "json" => Ok(Format::Json),
            "yaml" | "yml" => Ok(Format::Yaml),
            _ => Err(OntologyError::UnknownFormat(s.to_string())),
        }
    }
}

/// Serialize `value` as pretty JSON or through the YAML writer. Output
/// always ends with a newline.
pub fn render<T: Serialize>(value: &T, format: Format) -> Result<String> {
    match format {
        Format::Json => {
            let mut text = serde_json::to_string_pretty(value)?;
            text.push('\n');
            Ok(text)
        }
        Format::Yaml => Ok(yaml::to_yaml(&serde_json::to_value(value)?)),
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::CompilerConfig;
    use crate::model::{Action, OntologyObject};
    use crate::openapi::assemble;
    use crate::plan::Scope;

    fn object() -> OntologyObject {
        OntologyObject {
            name: "Order".to_string(),
            actions: vec![Action::new("Approve Order"), Action::new("Cancel")],
            ..Default::default()
        }
    }

    #[test]
    fn format_parsing_and_inference() {
        assert_eq!("YAML".parse::<Format>().unwrap(), Format::Yaml);
        assert!("toml".parse::<Format>().is_err());
        assert_eq!(Format::from_path(Path::new("api.yml")), Some(Format::Yaml));
        assert_eq!(Format::from_path(Path::new("api")), None);
    }

    #[test]
    fn compilation_is_deterministic() {
        let object = object();
        for format in [Format::Json, Format::Yaml] {
            let first = assemble(&CompilerConfig::default(), Scope::Object(&object)).unwrap();
            let second = assemble(&CompilerConfig::default(), Scope::Object(&object)).unwrap();
            assert_eq!(
                render(&first.output, format).unwrap(),
                render(&second.output, format).unwrap()
            );
        }
    }

    #[test]
    fn json_uses_two_space_indent() {
        let object = object();
        let doc = assemble(&CompilerConfig::default(), Scope::Object(&object)).unwrap();
        let json = render(&doc.output, Format::Json).unwrap();
        assert!(json.starts_with("{\n  \"openapi\": \"3.0.3\","));
        assert!(json.ends_with("}\n"));
    }

    #[test]
    fn yaml_document_has_expected_shape() {
        let object = object();
        let doc = assemble(&CompilerConfig::default(), Scope::Object(&object)).unwrap();
        let yaml = render(&doc.output, Format::Yaml).unwrap();
        assert!(yaml.starts_with("openapi: 3.0.3\ninfo:\n  title: Ontology API\n  version: 1.0.0\n"));
        assert!(yaml.contains("paths:\n  /api/orders/{id}/approve_order:\n    post:\n"));
        assert!(yaml.contains("      operationId: approve_order\n"));
        assert!(yaml.contains("$ref: \"#/components/schemas/ApproveOrderResponse\""));
    }
}
