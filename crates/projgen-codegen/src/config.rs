//! Generator configuration, loaded from TOML.
//!
//! ```toml
//! package_name = "crate::generated"
//! query_module = "query"
//! projection_module = "client"
//!
//! [include_fields]
//! Query = ["people", "person"]
//! ```

use crate::error::{CodegenError, Result};
use serde::Deserialize;
use std::collections::{BTreeMap, BTreeSet};
use std::path::Path;

/// Target language of a generation run. Only Rust is generated here.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Language {
    #[default]
    Rust,
    Kotlin,
    Java,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct CodeGenConfig {
    /// Module path that holds all generated code.
    pub package_name: String,
    /// Module (under `package_name`) for the root query projection.
    pub query_module: String,
    /// Module (under `package_name`) for the per-type projections.
    pub projection_module: String,
    /// Path generated code uses to reach `projgen-runtime`.
    pub runtime_crate: String,
    pub language: Language,
    pub generate_client_api: bool,
    /// Owner type name -> the only fields generated for that type.
    pub include_fields: BTreeMap<String, BTreeSet<String>>,
}

impl Default for CodeGenConfig {
    fn default() -> Self {
        Self {
            package_name: "crate::generated".to_string(),
            query_module: "query".to_string(),
            projection_module: "client".to_string(),
            runtime_crate: "projgen_runtime".to_string(),
            language: Language::Rust,
            generate_client_api: true,
            include_fields: BTreeMap::new(),
        }
    }
}

impl CodeGenConfig {
    pub fn from_toml_str(text: &str) -> Result<Self> {
        Ok(toml::from_str(text)?)
    }

    /// Load a config file.
    pub fn load(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path).map_err(|source| CodegenError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml_str(&text)
    }

    /// Whether the projection generator runs at all for this config.
    pub fn generates_projections(&self) -> bool {
        self.language == Language::Rust && self.generate_client_api
    }

    /// Namespace of the root query artifact.
    pub fn query_package(&self) -> String {
        format!("{}::{}", self.package_name, self.query_module)
    }

    /// Namespace of the projection artifacts.
    pub fn projection_package(&self) -> String {
        format!("{}::{}", self.package_name, self.projection_module)
    }

    /// Fields allowed for `owner`, if generation is restricted for it.
    pub fn included_fields(&self, owner: &str) -> Option<&BTreeSet<String>> {
        self.include_fields.get(owner)
    }
}
