//! Error types for projgen.
//!
//! The projection algorithm itself cannot fail: unknown types become leaf
//! accessors and reserved names are sanitized. Errors come from the edges
//! around it (config, rendering, file output, schema fetch).

use std::path::PathBuf;

pub type Result<T> = std::result::Result<T, CodegenError>;

#[derive(Debug, thiserror::Error)]
pub enum CodegenError {
    #[error("failed to access {}: {source}", path.display())]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("invalid config: {0}")]
    Config(#[from] toml::de::Error),

    #[error("invalid module path `{0}`")]
    ModulePath(String),

    #[error("types `{generated_from}` and `{conflicting}` both map to projection `{class_name}`")]
    DuplicateProjection {
        class_name: String,
        generated_from: String,
        conflicting: String,
    },

    #[error("module `{module}` would define `{class_name}` twice")]
    DuplicateClass { module: String, class_name: String },

    #[error("generated code for {class_name} does not parse: {source}")]
    Render {
        class_name: String,
        source: syn::Error,
    },

    #[error("schema fetch failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("schema fetch failed: {0}")]
    Fetch(String),
}
