use thiserror::Error;

#[derive(Debug, Error)]
pub enum OntologyError {
    #[error("object not found: {0}")]
    ObjectNotFound(String),

    #[error("action on object '{object}' has an empty name")]
    EmptyActionName { object: String },

    #[error("identifier '{identifier}' derived from '{second}' collides with '{first}'")]
    IdentifierCollision {
        identifier: String,
        first: String,
        second: String,
    },

    #[error("operation {method} {path} is defined by both '{first}' and '{second}'")]
    OperationCollision {
        method: String,
        path: String,
        first: String,
        second: String,
    },

    #[error("unknown tool dialect '{0}': expected one of openai, langchain, claude, mcp, universal")]
    UnknownDialect(String),

    #[error("unknown output format '{0}': expected json or yaml")]
    UnknownFormat(String),

    #[error("unknown code target '{0}': expected python or typescript")]
    UnknownTarget(String),

    #[error("unknown collision policy '{0}': expected overwrite, suffix, or reject")]
    UnknownPolicy(String),

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Yaml(#[from] serde_yaml::Error),

    #[error(transparent)]
    Json(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, OntologyError>;
