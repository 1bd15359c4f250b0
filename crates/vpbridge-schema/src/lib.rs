//! Optional JSON Schema checks for callback arguments.
//!
//! The bridge only validates callback *names*. Arguments arrive exactly as the
//! player sent them. Attach a [`ParameterSchemas`] registry to a bridge to
//! require that the argument for a given callback matches a schema before the
//! callback runs.

pub mod config;
pub mod error;
pub mod registry;
pub mod validator;

pub use config::RegistryConfig;
pub use error::{Result, SchemaError};
pub use registry::ParameterSchemas;
