/// Errors that can occur during parameter schema handling.
#[derive(Debug, thiserror::Error)]
pub enum SchemaError {
    /// The schema file could not be loaded.
    #[error("failed to load schema: {0}")]
    LoadFailed(String),

    /// The schema could not be compiled.
    #[error("failed to compile schema: {0}")]
    CompileFailed(String),

    /// The callback argument failed schema validation.
    #[error("argument for {function} failed validation: {message}")]
    ValidationFailed { function: String, message: String },

    /// The schema text is not valid JSON.
    #[error("schema is not valid JSON: {0}")]
    InvalidJson(#[from] serde_json::Error),

    /// A schema was registered under a name callbacks can never have.
    #[error("invalid callback name for schema: {0:?}")]
    InvalidName(String),

    /// No schema registered for the given callback.
    #[error("no schema registered for {0}")]
    NoSchema(String),
}

pub type Result<T> = std::result::Result<T, SchemaError>;
