use std::collections::BTreeMap;
use std::io::Read;
use std::path::Path;

use jsonschema::Validator;
use serde_json::Value;
use vpbridge_protocol::is_alphanumeric;

use crate::config::RegistryConfig;
use crate::error::{Result, SchemaError};
use crate::validator::validate_argument;

const SCHEMA_SUFFIX: &str = ".schema.json";

/// Callback-name-keyed registry of compiled JSON Schema validators.
pub struct ParameterSchemas {
    validators: BTreeMap<String, Validator>,
    config: RegistryConfig,
}

impl ParameterSchemas {
    /// Create an empty registry with default config.
    pub fn new() -> Self {
        Self::with_config(RegistryConfig::default())
    }

    /// Create an empty registry with explicit config.
    pub fn with_config(config: RegistryConfig) -> Self {
        Self {
            validators: BTreeMap::new(),
            config,
        }
    }

    /// Register a schema for a callback from a JSON string.
    pub fn register(&mut self, function: &str, schema_json: &str) -> Result<()> {
        let schema: Value = serde_json::from_str(schema_json)?;
        self.register_value(function, &schema)
    }

    /// Register a schema for a callback from a JSON value.
    pub fn register_value(&mut self, function: &str, schema: &Value) -> Result<()> {
        if !is_alphanumeric(function) {
            return Err(SchemaError::InvalidName(function.to_string()));
        }
        let compiled = jsonschema::validator_for(schema)
            .map_err(|err| SchemaError::CompileFailed(err.to_string()))?;

        self.validators.insert(function.to_string(), compiled);
        Ok(())
    }

    /// Load from embedded schema strings.
    pub fn from_embedded(schemas: &[(&str, &str)]) -> Result<Self> {
        let mut registry = Self::new();
        for (function, schema) in schemas {
            registry.register(function, schema)?;
        }
        Ok(registry)
    }

    /// Load `<functionName>.schema.json` files from a directory.
    pub fn from_directory(path: &Path) -> Result<Self> {
        Self::from_directory_with_config(path, RegistryConfig::default())
    }

    /// Load schemas from a directory with explicit config.
    ///
    /// Symlinked schema files and files whose stem is not a valid callback name
    /// are refused. Other files are ignored.
    pub fn from_directory_with_config(path: &Path, config: RegistryConfig) -> Result<Self> {
        let mut registry = Self::with_config(config);

        let entries = std::fs::read_dir(path)
            .map_err(|err| SchemaError::LoadFailed(format!("{}: {err}", path.display())))?;

        for entry in entries {
            let entry = entry.map_err(|err| SchemaError::LoadFailed(err.to_string()))?;
            let file_name = entry.file_name().to_string_lossy().into_owned();
            let Some(function) = file_name.strip_suffix(SCHEMA_SUFFIX) else {
                continue;
            };

            let file_type = std::fs::symlink_metadata(entry.path())
                .map_err(|err| SchemaError::LoadFailed(err.to_string()))?
                .file_type();
            if file_type.is_symlink() {
                return Err(SchemaError::LoadFailed(format!(
                    "refusing to load schema symlink: {file_name}"
                )));
            }
            if !file_type.is_file() {
                continue;
            }
            if !is_alphanumeric(function) {
                return Err(SchemaError::LoadFailed(format!(
                    "unrecognized schema filename: {file_name}"
                )));
            }

            if registry.validators.len() >= registry.config.max_schemas_from_directory {
                return Err(SchemaError::LoadFailed(format!(
                    "schema count exceeds configured max ({})",
                    registry.config.max_schemas_from_directory
                )));
            }

            let content = read_limited(&entry.path(), registry.config.max_schema_file_size)?;
            registry.register(function, &content)?;
            tracing::debug!(function, "loaded parameter schema");
        }

        Ok(registry)
    }

    /// Validate a callback argument against its schema.
    pub fn validate(&self, function: &str, argument: &Value) -> Result<()> {
        match self.validators.get(function) {
            Some(validator) => validate_argument(function, argument, validator),
            None if self.config.fail_on_missing_schema => {
                Err(SchemaError::NoSchema(function.to_string()))
            }
            None => Ok(()),
        }
    }

    /// Check if a callback has a registered schema.
    pub fn has_schema(&self, function: &str) -> bool {
        self.validators.contains_key(function)
    }

    /// Callback names with registered schemas, sorted.
    pub fn functions(&self) -> Vec<&str> {
        self.validators.keys().map(String::as_str).collect()
    }

    pub fn config(&self) -> &RegistryConfig {
        &self.config
    }
}

impl Default for ParameterSchemas {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for ParameterSchemas {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ParameterSchemas")
            .field("functions", &self.functions())
            .field("config", &self.config)
            .finish()
    }
}

fn read_limited(path: &Path, max_bytes: usize) -> Result<String> {
    let file = std::fs::File::open(path).map_err(|err| {
        SchemaError::LoadFailed(format!("failed opening schema {}: {err}", path.display()))
    })?;
    let read_limit = u64::try_from(max_bytes.saturating_add(1)).unwrap_or(u64::MAX);
    let mut content = String::new();
    file.take(read_limit)
        .read_to_string(&mut content)
        .map_err(|err| {
            SchemaError::LoadFailed(format!("failed reading schema {}: {err}", path.display()))
        })?;
    if content.len() > max_bytes {
        return Err(SchemaError::LoadFailed(format!(
            "schema file too large: {}",
            path.display()
        )));
    }
    Ok(content)
}
