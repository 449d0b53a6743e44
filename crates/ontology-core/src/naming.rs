//! Identifier derivation: operation ids, schema names, default paths, and
//! path template variables.

use crate::config::CollisionPolicy;
use crate::diagnostic::Diagnostic;
use crate::error::{OntologyError, Result};
use regex::Regex;
use std::collections::HashMap;
use std::sync::OnceLock;

pub const REQUEST_SUFFIX: &str = "Request";
pub const RESPONSE_SUFFIX: &str = "Response";

/// Used when an action name normalizes to nothing.
const FALLBACK_OPERATION_ID: &str = "action";

static SEPARATOR_RE: OnceLock<Regex> = OnceLock::new();
static PATH_PARAM_RE: OnceLock<Regex> = OnceLock::new();

fn separator_re() -> &'static Regex {
    SEPARATOR_RE.get_or_init(|| Regex::new(r"[\s\-]+").unwrap())
}

fn path_param_re() -> &'static Regex {
    PATH_PARAM_RE.get_or_init(|| Regex::new(r"\{([^{}]+)\}").unwrap())
}

// ---------------------------------------------------------------------------
// Pure derivations
// ---------------------------------------------------------------------------

/// `"Approve Order"` → `"approve_order"`.
pub fn operation_id(name: &str) -> String {
    let lowered = name.trim().to_lowercase();
    separator_re()
        .replace_all(&lowered, "_")
        .chars()
        .filter(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || *c == '_')
        .collect()
}

/// `"Approve Order"` → `"ApproveOrder"`. Tokens split on whitespace, hyphens
/// and underscores; each token gets an upper-case first letter, and anything
/// that is not ASCII alphanumeric is dropped.
pub fn schema_stem(name: &str) -> String {
    name.split(|c: char| c.is_whitespace() || c == '-' || c == '_')
        .filter(|t| !t.is_empty())
        .map(|token| {
            let mut chars = token.chars();
            match chars.next() {
                Some(first) => first.to_uppercase().chain(chars).collect::<String>(),
                None => String::new(),
            }
        })
        .collect::<String>()
        .chars()
        .filter(char::is_ascii_alphanumeric)
        .collect()
}

pub fn request_schema_name(stem: &str) -> String {
    format!("{stem}{REQUEST_SUFFIX}")
}

pub fn response_schema_name(stem: &str) -> String {
    format!("{stem}{RESPONSE_SUFFIX}")
}

/// `/api/{object}s/{id}/{operation_id}` with the object name lower-cased and
/// inner whitespace collapsed to hyphens.
pub fn default_path(object_name: &str, operation_id: &str) -> String {
    let lowered = object_name.trim().to_lowercase();
    let resource = separator_re().replace_all(&lowered, "-");
    format!("/api/{resource}s/{{id}}/{operation_id}")
}

/// Variables of a path template in order of first appearance.
pub fn path_params(template: &str) -> Vec<String> {
    let mut params: Vec<String> = Vec::new();
    for cap in path_param_re().captures_iter(template) {
        let name = cap[1].trim();
        if !name.is_empty() && !params.iter().any(|p| p == name) {
            params.push(name.to_string());
        }
    }
    params
}

// ---------------------------------------------------------------------------
// Identity
// ---------------------------------------------------------------------------

/// The machine identifiers derived from one action name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Identity {
    pub operation_id: String,
    pub stem: String,
}

impl Identity {
    pub fn derive(name: &str) -> Self {
        let operation_id = operation_id(name);
        let stem = schema_stem(name);
        if operation_id.trim_matches('_').is_empty() {
            return Self {
                operation_id: FALLBACK_OPERATION_ID.to_string(),
                stem: schema_stem(FALLBACK_OPERATION_ID),
            };
        }
        let stem = if stem.is_empty() {
            schema_stem(&operation_id)
        } else {
            stem
        };
        Self { operation_id, stem }
    }

    pub fn request_schema(&self) -> String {
        request_schema_name(&self.stem)
    }

    pub fn response_schema(&self) -> String {
        response_schema_name(&self.stem)
    }

    fn suffixed(&self, n: usize) -> Self {
        Self {
            operation_id: format!("{}_{n}", self.operation_id),
            stem: format!("{}{n}", self.stem),
        }
    }
}

// ---------------------------------------------------------------------------
// IdentifierRegistry
// ---------------------------------------------------------------------------

/// Uniqueness pass over derived identifiers.
///
/// Keys map to the label of whoever claimed them first so collisions can be
/// reported with both sides.
#[derive(Debug, Clone, Default)]
pub struct IdentifierRegistry {
    policy: CollisionPolicy,
    operations: HashMap<String, String>,
    stems: HashMap<String, String>,
    names: HashMap<String, String>,
}

/// Result of claiming an identifier: the value to use and, when the claim
/// collided, the diagnostic describing what happened.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Claim<T> {
    pub value: T,
    pub diagnostic: Option<Diagnostic>,
}

impl IdentifierRegistry {
    pub fn new(policy: CollisionPolicy) -> Self {
        Self {
            policy,
            ..Default::default()
        }
    }

    pub fn policy(&self) -> CollisionPolicy {
        self.policy
    }

    fn holder(&self, identity: &Identity) -> Option<&String> {
        self.operations
            .get(&identity.operation_id)
            .or_else(|| self.stems.get(&identity.stem))
    }

    /// Claim the operation id and schema stem of an action.
    pub fn claim(&mut self, label: &str, identity: Identity) -> Result<Claim<Identity>> {
        let Some(first) = self.holder(&identity).cloned() else {
            self.record(label, &identity);
            return Ok(Claim {
                value: identity,
                diagnostic: None,
            });
        };

        match self.policy {
            CollisionPolicy::Reject => Err(OntologyError::IdentifierCollision {
                identifier: identity.operation_id,
                first,
                second: label.to_string(),
            }),
            CollisionPolicy::Overwrite => {
                let diagnostic = Diagnostic::error(format!(
                    "'{label}' derives identifier '{}' already used by '{first}'; \
                     its schemas replace the earlier ones",
                    identity.operation_id
                ));
                self.record(label, &identity);
                Ok(Claim {
                    value: identity,
                    diagnostic: Some(diagnostic),
                })
            }
            CollisionPolicy::Suffix => {
                let mut n = 2;
                let renamed = loop {
                    let candidate = identity.suffixed(n);
                    if self.holder(&candidate).is_none() {
                        break candidate;
                    }
                    n += 1;
                };
                let diagnostic = Diagnostic::warning(format!(
                    "'{label}' derives identifier '{}' already used by '{first}'; renamed to '{}'",
                    identity.operation_id, renamed.operation_id
                ));
                self.record(label, &renamed);
                Ok(Claim {
                    value: renamed,
                    diagnostic: Some(diagnostic),
                })
            }
        }
    }

    /// Claim a free-standing name such as an authored tool name.
    pub fn claim_name(&mut self, label: &str, name: &str) -> Result<Claim<String>> {
        let Some(first) = self.names.get(name).cloned() else {
            self.names.insert(name.to_string(), label.to_string());
            return Ok(Claim {
                value: name.to_string(),
                diagnostic: None,
            });
        };

        match self.policy {
            CollisionPolicy::Reject => Err(OntologyError::IdentifierCollision {
                identifier: name.to_string(),
                first,
                second: label.to_string(),
            }),
            CollisionPolicy::Overwrite => {
                self.names.insert(name.to_string(), label.to_string());
                Ok(Claim {
                    value: name.to_string(),
                    diagnostic: Some(Diagnostic::error(format!(
                        "'{label}' reuses tool name '{name}' already used by '{first}'"
                    ))),
                })
            }
            CollisionPolicy::Suffix => {
                let mut n = 2;
                let renamed = loop {
                    let candidate = format!("{name}_{n}");
                    if !self.names.contains_key(&candidate) {
                        break candidate;
                    }
                    n += 1;
                };
                self.names.insert(renamed.clone(), label.to_string());
                Ok(Claim {
                    diagnostic: Some(Diagnostic::warning(format!(
                        "'{label}' reuses tool name '{name}' already used by '{first}'; \
                         renamed to '{renamed}'"
                    ))),
                    value: renamed,
                })
            }
        }
    }

    fn record(&mut self, label: &str, identity: &Identity) {
        self.operations
            .insert(identity.operation_id.clone(), label.to_string());
        self.stems.insert(identity.stem.clone(), label.to_string());
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
