pub mod codegen;
pub mod config;
pub mod diagnostic;
pub mod error;
pub mod io;
pub mod model;
pub mod naming;
pub mod openapi;
pub mod output;
pub mod plan;
pub mod schema;
pub mod tools;
pub mod typemap;
pub mod yaml;

pub use diagnostic::{Compiled, Diagnostic, Level};
pub use error::{OntologyError, Result};
pub use plan::Scope;
