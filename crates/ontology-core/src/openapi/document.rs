use super::{
    build_operation, Components, Info, OpenApi, PathItem, SecurityScheme, Server,
    OPENAPI_VERSION, SECURITY_SCHEME,
};
use crate::config::{CollisionPolicy, CompilerConfig};
use crate::diagnostic::{Compiled, Diagnostic};
use crate::error::{OntologyError, Result};
use crate::plan::{ActionPlan, Planner, Scope};
use crate::schema::Schema;
use indexmap::IndexMap;

/// Accumulator of the document fold.
///
/// Each step consumes the state and returns the next one, so the order of
/// actions in the input is the only thing that decides which entry wins a
/// collision.
#[derive(Debug, Clone, Default)]
pub struct DocumentState {
    paths: IndexMap<String, PathItem>,
    schemas: IndexMap<String, Schema>,
    /// Label of the action that defined each `(path, verb)` entry.
    owners: IndexMap<(String, String), String>,
    secured: bool,
    diagnostics: Vec<Diagnostic>,
}

impl DocumentState {
    pub fn empty() -> Self {
        Self::default()
    }

    /// Fold one planned action into the document.
    pub fn with_action(mut self, plan: &ActionPlan<'_>, policy: CollisionPolicy) -> Result<Self> {
        let built = build_operation(plan);
        let verb = plan.method.path_item_key().to_string();
        let key = (plan.path.clone(), verb.clone());

        if let Some(first) = self.owners.get(&key) {
            match policy {
                CollisionPolicy::Reject => {
                    return Err(OntologyError::OperationCollision {
                        method: plan.method.to_string(),
                        path: plan.path.clone(),
                        first: first.clone(),
                        second: plan.label.clone(),
                    })
                }
                CollisionPolicy::Overwrite | CollisionPolicy::Suffix => {
                    let diagnostic = Diagnostic::error(format!(
                        "'{}' replaces '{first}' at {} {}",
                        plan.label, plan.method, plan.path
                    ));
                    tracing::warn!("{}", diagnostic.message);
                    self.diagnostics.push(diagnostic);
                }
            }
        }

        self.secured |= !built.operation.security.is_empty();
        self.owners.insert(key, plan.label.clone());
        self.paths
            .entry(plan.path.clone())
            .or_default()
            .insert(verb, built.operation);
        for (name, schema) in built.schemas {
            self.schemas.insert(name, schema);
        }
        Ok(self)
    }

    pub fn finish(self, info: Info, servers: Vec<Server>) -> Compiled<OpenApi> {
        let mut security_schemes = IndexMap::new();
        if self.secured {
            security_schemes.insert(SECURITY_SCHEME.to_string(), SecurityScheme::bearer_jwt());
        }
        Compiled {
            output: OpenApi {
                openapi: OPENAPI_VERSION.to_string(),
                info,
                servers,
                paths: self.paths,
                components: Components {
                    schemas: self.schemas,
                    security_schemes,
                },
            },
            diagnostics: self.diagnostics,
        }
    }
}

/// Compile every action in `scope` into one OpenAPI document.
pub fn assemble(config: &CompilerConfig, scope: Scope<'_>) -> Result<Compiled<OpenApi>> {
    let mut planner = Planner::new(config);
    let plans = scope
        .actions()
        .into_iter()
        .map(|(object, action)| planner.plan(object, action))
        .collect::<Result<Vec<_>>>()?;

    let state = plans.iter().try_fold(DocumentState::empty(), |doc, plan| {
        doc.with_action(plan, config.collisions)
    })?;

    let ontology = scope.ontology();
    let info = Info {
        title: config.resolved_title(ontology),
        version: config.resolved_version(ontology),
        description: config.description.clone(),
    };
    let servers = config
        .servers
        .iter()
        .map(|url| Server { url: url.clone() })
        .collect();

    let mut compiled = state.finish(info, servers);
    let mut diagnostics = planner.into_diagnostics();
    diagnostics.append(&mut compiled.diagnostics);
    compiled.diagnostics = diagnostics;
    Ok(compiled)
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{Action, Governance, ImplementationLayer, Ontology, OntologyObject};

    fn endpoint(name: &str, path: &str, method: &str) -> Action {
        Action {
            implementation_layer: Some(ImplementationLayer {
                api_endpoint: Some(path.to_string()),
                api_method: Some(method.to_string()),
                ..Default::default()
            }),
            ..Action::new(name)
        }
    }

    fn object(name: &str, actions: Vec<Action>) -> OntologyObject {
        OntologyObject {
            id: name.to_lowercase(),
            name: name.to_string(),
            actions,
            ..Default::default()
        }
    }

    #[test]
    fn verbs_on_same_path_merge_into_one_entry() {
        let ontology = Ontology {
            objects: vec![
                object("Order", vec![endpoint("List", "/api/orders", "GET")]),
                object("Cart", vec![endpoint("Create", "/api/orders", "POST")]),
            ],
            ..Default::default()
        };
        let doc = assemble(&CompilerConfig::default(), Scope::Ontology(&ontology))
            .unwrap()
            .output;
        assert_eq!(doc.paths.len(), 1);
        let item = &doc.paths["/api/orders"];
        let verbs: Vec<&str> = item.keys().map(String::as_str).collect();
        assert_eq!(verbs, vec!["get", "post"]);
    }

    #[test]
    fn same_path_and_verb_is_last_write_wins_by_default() {
        let order = object(
            "Order",
            vec![
                endpoint("Approve", "/api/orders/{id}", "PUT"),
                endpoint("Reject", "/api/orders/{id}", "PUT"),
            ],
        );
        let compiled = assemble(&CompilerConfig::default(), Scope::Object(&order)).unwrap();
        let op = &compiled.output.paths["/api/orders/{id}"]["put"];
        assert_eq!(op.operation_id, "reject");
        assert!(compiled.has_errors());
    }

    #[test]
    fn same_path_and_verb_rejected_under_reject_policy() {
        let order = object(
            "Order",
            vec![
                endpoint("Approve", "/api/orders/{id}", "PUT"),
                endpoint("Reject", "/api/orders/{id}", "PUT"),
            ],
        );
        let config = CompilerConfig::default().with_policy(CollisionPolicy::Reject);
        let err = assemble(&config, Scope::Object(&order)).unwrap_err();
        assert!(matches!(err, OntologyError::OperationCollision { .. }));
    }

    #[test]
    fn schema_registry_preserves_input_order() {
        let order = object("Order", vec![Action::new("Submit"), Action::new("Cancel")]);
        let doc = assemble(&CompilerConfig::default(), Scope::Object(&order))
            .unwrap()
            .output;
        let names: Vec<&str> = doc.components.schemas.keys().map(String::as_str).collect();
        assert_eq!(names, vec!["SubmitResponse", "CancelResponse"]);
        let paths: Vec<&str> = doc.paths.keys().map(String::as_str).collect();
        assert_eq!(paths, vec!["/api/orders/{id}/submit", "/api/orders/{id}/cancel"]);
    }

    #[test]
    fn security_scheme_only_when_needed() {
        let open = object("Order", vec![Action::new("Submit")]);
        let doc = assemble(&CompilerConfig::default(), Scope::Object(&open))
            .unwrap()
            .output;
        assert!(doc.components.security_schemes.is_empty());

        let mut guarded = Action::new("Refund");
        guarded.governance = Some(Governance {
            permission_tier: 2,
            ..Default::default()
        });
        let secured = object("Order", vec![guarded]);
        let doc = assemble(&CompilerConfig::default(), Scope::Object(&secured))
            .unwrap()
            .output;
        assert!(doc.components.security_schemes.contains_key(SECURITY_SCHEME));
    }

    #[test]
    fn default_path_synthesis() {
        let invoice = object("Invoice", vec![Action::new("Send")]);
        let doc = assemble(&CompilerConfig::default(), Scope::Object(&invoice))
            .unwrap()
            .output;
        assert!(doc.paths.contains_key("/api/invoices/{id}/send"));
        assert_eq!(doc.openapi, OPENAPI_VERSION);
    }

    #[test]
    fn info_block_from_config_and_ontology() {
        let ontology = Ontology {
            name: Some("Retail".to_string()),
            objects: vec![object("Order", vec![Action::new("Submit")])],
            ..Default::default()
        };
        let config = CompilerConfig {
            servers: vec!["https://api.example.com".to_string()],
            ..Default::default()
        };
        let doc = assemble(&config, Scope::Ontology(&ontology)).unwrap().output;
        assert_eq!(doc.info.title, "Retail API");
        assert_eq!(doc.servers[0].url, "https://api.example.com");
    }
}
