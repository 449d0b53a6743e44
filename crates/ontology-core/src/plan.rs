//! Per-action compilation plan shared by the OpenAPI and tool pipelines.

use crate::config::CompilerConfig;
use crate::diagnostic::Diagnostic;
use crate::error::{OntologyError, Result};
use crate::model::{Action, HttpMethod, Ontology, OntologyObject};
use crate::naming::{self, Identity, IdentifierRegistry};

/// Object name used for a lone action that names no target object.
const DEFAULT_RESOURCE: &str = "resource";

// ---------------------------------------------------------------------------
// Scope
// ---------------------------------------------------------------------------

/// How much of the ontology a compilation covers.
#[derive(Debug, Clone, Copy)]
pub enum Scope<'a> {
    Action {
        object: &'a str,
        action: &'a Action,
    },
    Object(&'a OntologyObject),
    Ontology(&'a Ontology),
}

impl<'a> Scope<'a> {
    /// A single action, attributed to its business-layer target object.
    pub fn action(action: &'a Action) -> Self {
        let object = action
            .business_layer
            .as_ref()
            .map(|b| b.target_object.trim())
            .filter(|t| !t.is_empty())
            .unwrap_or(DEFAULT_RESOURCE);
        Scope::Action { object, action }
    }

    /// Actions in input order, paired with the name of their object.
    pub fn actions(&self) -> Vec<(&'a str, &'a Action)> {
        match *self {
            Scope::Action { object, action } => vec![(object, action)],
            Scope::Object(object) => object
                .actions
                .iter()
                .map(|a| (object.name.as_str(), a))
                .collect(),
            Scope::Ontology(ontology) => ontology
                .objects
                .iter()
                .filter(|o| !o.actions.is_empty())
                .flat_map(|o| o.actions.iter().map(move |a| (o.name.as_str(), a)))
                .collect(),
        }
    }

    pub fn ontology(&self) -> Option<&'a Ontology> {
        match *self {
            Scope::Ontology(ontology) => Some(ontology),
            _ => None,
        }
    }
}

// ---------------------------------------------------------------------------
// ActionPlan
// ---------------------------------------------------------------------------

#[derive(Debug, Clone)]
pub struct ActionPlan<'a> {
    pub action: &'a Action,
    pub object_name: String,
    /// `Object.Action`, used in diagnostics.
    pub label: String,
    pub identity: Identity,
    pub path: String,
    pub method: HttpMethod,
}

// ---------------------------------------------------------------------------
// Planner
// ---------------------------------------------------------------------------

/// Resolves identifiers, paths and verbs for a sequence of actions, running
/// every derived identifier through one uniqueness pass.
#[derive(Debug)]
pub struct Planner {
    registry: IdentifierRegistry,
    strict: bool,
    diagnostics: Vec<Diagnostic>,
}

impl Planner {
    pub fn new(config: &CompilerConfig) -> Self {
        Self {
            registry: IdentifierRegistry::new(config.collisions),
            strict: config.strict,
            diagnostics: Vec::new(),
        }
    }

    pub fn registry_mut(&mut self) -> &mut IdentifierRegistry {
        &mut self.registry
    }

    pub fn report(&mut self, diagnostic: Diagnostic) {
        tracing::warn!(level = %diagnostic.level, "{}", diagnostic.message);
        self.diagnostics.push(diagnostic);
    }

    pub fn plan<'a>(&mut self, object_name: &str, action: &'a Action) -> Result<ActionPlan<'a>> {
        let object_name = object_name.trim();
        let label = format!("{object_name}.{}", action.name.trim());

        if action.name.trim().is_empty() {
            if self.strict {
                return Err(OntologyError::EmptyActionName {
                    object: object_name.to_string(),
                });
            }
            self.report(Diagnostic::warning(format!(
                "action on object '{object_name}' has an empty name"
            )));
        }

        let derived = Identity::derive(&action.name);
        // Default paths use the unsuffixed id.
        let path = match action.explicit_path() {
            Some(path) => path.to_string(),
            None => naming::default_path(object_name, &derived.operation_id),
        };

        let claim = self.registry.claim(&label, derived)?;
        if let Some(diagnostic) = claim.diagnostic {
            self.report(diagnostic);
        }
        let identity = claim.value;

        let method = match action.explicit_method() {
            None => HttpMethod::default(),
            Some(raw) => HttpMethod::parse(raw).unwrap_or_else(|| {
                self.report(Diagnostic::warning(format!(
                    "'{label}' uses unsupported HTTP method '{raw}'; using {}",
                    HttpMethod::default()
                )));
                HttpMethod::default()
            }),
        };

        tracing::debug!(action = %label, %path, %method, operation = %identity.operation_id, "planned action");

        Ok(ActionPlan {
            action,
            object_name: object_name.to_string(),
            label,
            identity,
            path,
            method,
        })
    }

    pub fn into_diagnostics(self) -> Vec<Diagnostic> {
        self.diagnostics
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::CollisionPolicy;
    use crate::model::{BusinessLayer, ImplementationLayer};

    #[test]
    fn default_path_and_verb() {
        let mut planner = Planner::new(&CompilerConfig::default());
        let action = Action::new("Send");
        let plan = planner.plan("Invoice", &action).unwrap();
        assert_eq!(plan.path, "/api/invoices/{id}/send");
        assert_eq!(plan.method, HttpMethod::Post);
        assert_eq!(plan.label, "Invoice.Send");
        assert!(planner.into_diagnostics().is_empty());
    }

    #[test]
    fn explicit_path_and_verb_win() {
        let mut planner = Planner::new(&CompilerConfig::default());
        let action = Action {
            implementation_layer: Some(ImplementationLayer {
                api_endpoint: Some("/api/orders".to_string()),
                api_method: Some("get".to_string()),
                ..Default::default()
            }),
            ..Action::new("List Orders")
        };
        let plan = planner.plan("Order", &action).unwrap();
        assert_eq!(plan.path, "/api/orders");
        assert_eq!(plan.method, HttpMethod::Get);
    }

    #[test]
    fn unsupported_verb_defaults_with_warning() {
        let mut planner = Planner::new(&CompilerConfig::default());
        let action = Action {
            implementation_layer: Some(ImplementationLayer {
                api_method: Some("FETCH".to_string()),
                ..Default::default()
            }),
            ..Action::new("Sync")
        };
        let plan = planner.plan("Order", &action).unwrap();
        assert_eq!(plan.method, HttpMethod::Post);
        assert_eq!(planner.into_diagnostics().len(), 1);
    }

    #[test]
    fn empty_name_warns_or_fails_in_strict_mode() {
        let action = Action::new("  ");

        let mut lenient = Planner::new(&CompilerConfig::default());
        let plan = lenient.plan("Order", &action).unwrap();
        assert_eq!(plan.identity.operation_id, "action");
        assert_eq!(lenient.into_diagnostics().len(), 1);

        let strict = CompilerConfig {
            strict: true,
            ..Default::default()
        };
        let mut planner = Planner::new(&strict);
        assert!(matches!(
            planner.plan("Order", &action),
            Err(OntologyError::EmptyActionName { .. })
        ));
    }

    #[test]
    fn collisions_follow_policy() {
        let config = CompilerConfig::default().with_policy(CollisionPolicy::Suffix);
        let mut planner = Planner::new(&config);
        let a = Action::new("Archive");
        let first = planner.plan("Order", &a).unwrap();
        let second = planner.plan("Invoice", &a).unwrap();
        assert_eq!(first.identity.operation_id, "archive");
        assert_eq!(second.identity.operation_id, "archive_2");
        assert_eq!(first.path, "/api/orders/{id}/archive");
        assert_eq!(second.path, "/api/invoices/{id}/archive");
    }

    #[test]
    fn lone_action_uses_target_object() {
        let action = Action {
            business_layer: Some(BusinessLayer {
                target_object: "Shipment".to_string(),
                ..Default::default()
            }),
            ..Action::new("Dispatch")
        };
        let actions = Scope::action(&action).actions();
        assert_eq!(actions[0].0, "Shipment");

        let bare = Action::new("Dispatch");
        assert_eq!(Scope::action(&bare).actions()[0].0, "resource");
    }

    #[test]
    fn ontology_scope_skips_objects_without_actions() {
        let ontology = Ontology {
            objects: vec![
                OntologyObject {
                    name: "Customer".to_string(),
                    ..Default::default()
                },
                OntologyObject {
                    name: "Order".to_string(),
                    actions: vec![Action::new("Approve"), Action::new("Cancel")],
                    ..Default::default()
                },
            ],
            ..Default::default()
        };
        let names: Vec<(&str, &str)> = Scope::Ontology(&ontology)
            .actions()
            .into_iter()
            .map(|(o, a)| (o, a.name.as_str()))
            .collect();
        assert_eq!(names, vec![("Order", "Approve"), ("Order", "Cancel")]);
    }
}
