//! Generation driver: one call to [`CodeGen::generate`] is one run.

use crate::config::CodeGenConfig;
use crate::parser::{self, SchemaDocument};
use crate::projection::ProjectionBuilder;
use crate::result::CodeGenResult;
use tracing::{info, instrument, warn};

pub struct CodeGen {
    config: CodeGenConfig,
    document: SchemaDocument,
}

impl CodeGen {
    pub fn new(config: CodeGenConfig, document: SchemaDocument) -> Self {
        Self { config, document }
    }

    /// Parse `schemas` (concatenated in order) and prepare a generator.
    pub fn from_schemas<S: AsRef<str>>(config: CodeGenConfig, schemas: &[S]) -> Self {
        Self::new(config, parser::parse_all(schemas))
    }

    pub fn config(&self) -> &CodeGenConfig {
        &self.config
    }

    pub fn document(&self) -> &SchemaDocument {
        &self.document
    }

    /// Generate the root entry point and every projection reachable from it.
    ///
    /// Each call starts from an empty dedup registry, so repeated calls
    /// return equal results.
    #[instrument(skip_all, fields(root = %self.document.query_type))]
    pub fn generate(&self) -> CodeGenResult {
        if !self.config.generates_projections() {
            info!(
                language = ?self.config.language,
                generate_client_api = self.config.generate_client_api,
                "client projection generation disabled"
            );
            return CodeGenResult::default();
        }

        let Some(root) = self.document.query_root() else {
            warn!("schema has no `{}` type, nothing to generate", self.document.query_type);
            return CodeGenResult::default();
        };

        let mut builder = ProjectionBuilder::new(&self.document, &self.config);
        let result = builder.build_root(root);

        info!(
            query_types = result.query_types.len(),
            projections = result.projections.len(),
            "generated client projections"
        );
        result
    }
}
