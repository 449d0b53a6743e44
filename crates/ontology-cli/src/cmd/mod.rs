pub mod check;
pub mod codegen;
pub mod dialects;
pub mod init;
pub mod openapi;
pub mod tools;

use anyhow::Context;
use clap::Args;
use ontology_core::model::Ontology;
use ontology_core::output::Format;
use ontology_core::{OntologyError, Scope};
use std::path::Path;

/// Which part of the ontology to compile. Neither flag: every object.
#[derive(Args, Debug, Default)]
pub struct Selection {
    /// Compile one object (id or name)
    #[arg(long)]
    pub object: Option<String>,

    /// Compile one action of --object (id or name)
    #[arg(long, requires = "object")]
    pub action: Option<String>,
}

impl Selection {
    pub fn scope<'a>(&self, ontology: &'a Ontology) -> anyhow::Result<Scope<'a>> {
        let Some(key) = self.object.as_deref() else {
            return Ok(Scope::Ontology(ontology));
        };
        let object = ontology
            .object(key)
            .ok_or_else(|| OntologyError::ObjectNotFound(key.to_string()))?;

        let Some(action_key) = self.action.as_deref() else {
            return Ok(Scope::Object(object));
        };
        let action = object
            .actions
            .iter()
            .find(|a| a.id.as_deref() == Some(action_key))
            .or_else(|| {
                object
                    .actions
                    .iter()
                    .find(|a| a.name.trim().eq_ignore_ascii_case(action_key))
            })
            .with_context(|| format!("action '{action_key}' not found on object '{}'", object.name))?;
        Ok(Scope::Action {
            object: &object.name,
            action,
        })
    }
}

pub fn load_ontology(path: &Path) -> anyhow::Result<Ontology> {
    ontology_core::io::load_ontology(path)
        .with_context(|| format!("failed to read ontology {}", path.display()))
}

/// `--json` wins, then `--format`, then the `--out` extension, then JSON.
pub fn resolve_format(
    explicit: Option<&str>,
    out: Option<&Path>,
    json: bool,
) -> anyhow::Result<Format> {
    if json {
        return Ok(Format::Json);
    }
    if let Some(name) = explicit {
        return Ok(name.parse()?);
    }
    Ok(out.and_then(Format::from_path).unwrap_or_default())
}

#[cfg(test)]
mod tests {
    use super::*;
    use ontology_core::model::{Action, OntologyObject};

    fn ontology() -> Ontology {
        Ontology {
            objects: vec![OntologyObject {
                id: "obj-order".to_string(),
                name: "Order".to_string(),
                actions: vec![Action::new("Approve"), Action::new("Cancel")],
                ..Default::default()
            }],
            ..Default::default()
        }
    }

    #[test]
    fn no_selection_is_whole_ontology() {
        let ontology = ontology();
        let scope = Selection::default().scope(&ontology).unwrap();
        assert!(matches!(scope, Scope::Ontology(_)));
    }

    #[test]
    fn action_selection_by_name() {
        let ontology = ontology();
        let selection = Selection {
            object: Some("order".to_string()),
            action: Some("cancel".to_string()),
        };
        match selection.scope(&ontology).unwrap() {
            Scope::Action { object, action } => {
                assert_eq!(object, "Order");
                assert_eq!(action.name, "Cancel");
            }
            _ => panic!("expected action scope"),
        }
    }

    #[test]
    fn unknown_object_is_an_error() {
        let ontology = ontology();
        let selection = Selection {
            object: Some("Invoice".to_string()),
            action: None,
        };
        let err = selection.scope(&ontology).unwrap_err();
        assert!(err.to_string().contains("object not found: Invoice"));
    }

    #[test]
    fn format_resolution_order() {
        let yaml_out = Path::new("api.yaml");
        assert_eq!(resolve_format(None, Some(yaml_out), false).unwrap(), Format::Yaml);
        assert_eq!(resolve_format(Some("json"), Some(yaml_out), false).unwrap(), Format::Json);
        assert_eq!(resolve_format(Some("yaml"), None, true).unwrap(), Format::Json);
        assert!(resolve_format(Some("toml"), None, false).is_err());
    }
}
