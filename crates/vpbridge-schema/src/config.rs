/// Controls parameter schema behavior.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RegistryConfig {
    /// When true, callbacks without a schema return `SchemaError::NoSchema`.
    pub fail_on_missing_schema: bool,
    /// Maximum number of schemas loaded from a directory.
    pub max_schemas_from_directory: usize,
    /// Maximum bytes allowed per schema file loaded from a directory.
    pub max_schema_file_size: usize,
}

impl Default for RegistryConfig {
    fn default() -> Self {
        Self {
            fail_on_missing_schema: false,
            max_schemas_from_directory: 128,
            max_schema_file_size: 64 * 1024,
        }
    }
}
