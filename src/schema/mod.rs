//! JSON-schema registry for request validation.
//!
//! Schemas are read from a directory once at startup and kept as raw text,
//! keyed by file name (e.g. `loginuser.json`). The validation interceptor
//! compiles the text it is given with [`compile`].

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use jsonschema::Validator;
use serde_json::Value;
use thiserror::Error;

/// Schema used when a route is given no schema text.
pub const PERMISSIVE_SCHEMA: &str = "{}";

#[derive(Debug, Error)]
pub enum SchemaError {
    #[error("cannot read schema directory {path}: {source}")]
    ReadDir {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("cannot read schema file {path}: {source}")]
    ReadFile {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("schema is not valid JSON: {0}")]
    InvalidJson(#[from] serde_json::Error),

    #[error("schema does not compile: {0}")]
    Compile(String),
}

/// Raw schema text by file name. Read-only after `load`.
#[derive(Debug, Clone, Default)]
pub struct SchemaRegistry {
    schemas: HashMap<String, String>,
}

impl SchemaRegistry {
    /// Read every `*.json` file directly inside `dir`.
    pub fn load(dir: impl AsRef<Path>) -> Result<Self, SchemaError> {
        let dir = dir.as_ref();
        tracing::info!("loading json schemas from {}", dir.display());

        let entries = std::fs::read_dir(dir).map_err(|source| SchemaError::ReadDir {
            path: dir.to_path_buf(),
            source,
        })?;

        let mut schemas = HashMap::new();
        for entry in entries {
            let entry = entry.map_err(|source| SchemaError::ReadDir {
                path: dir.to_path_buf(),
                source,
            })?;
            let path = entry.path();
            let is_json = path.extension().and_then(|ext| ext.to_str()) == Some("json");
            if !is_json || !path.is_file() {
                continue;
            }
            let Some(name) = path.file_name().and_then(|n| n.to_str()).map(str::to_string) else {
                continue;
            };

            tracing::debug!("loading {}", path.display());
            let content = std::fs::read_to_string(&path)
                .map_err(|source| SchemaError::ReadFile { path: path.clone(), source })?;
            schemas.insert(name, content);
        }

        tracing::info!("loaded {} json schemas", schemas.len());
        Ok(Self { schemas })
    }

    pub fn from_map(schemas: HashMap<String, String>) -> Self {
        Self { schemas }
    }

    pub fn get(&self, name: &str) -> Option<&str> {
        self.schemas.get(name).map(String::as_str)
    }
}

/// Compile raw schema text. Empty text means the permissive schema.
pub fn compile(raw: &str) -> Result<Validator, SchemaError> {
    let raw = if raw.trim().is_empty() {
        tracing::warn!("No schema text supplied, falling back to {}", PERMISSIVE_SCHEMA);
        PERMISSIVE_SCHEMA
    } else {
        raw
    };

    let schema: Value = serde_json::from_str(raw)?;
    jsonschema::validator_for(&schema).map_err(|e| SchemaError::Compile(e.to_string()))
}
