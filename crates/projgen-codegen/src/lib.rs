//! Generate typed GraphQL projection builders from a schema.
//!
//! [`CodeGen`] walks the schema from its root query type and produces a
//! structural [`CodeGenResult`]: one root entry point plus one projection per
//! reachable object type. [`emit::render`] turns that into Rust source that
//! compiles against `projgen-runtime`.

pub mod codegen;
pub mod config;
pub mod emit;
pub mod error;
pub mod fetch_schema;
pub mod filter;
pub mod parser;
pub mod projection;
pub mod resolve;
pub mod result;
pub mod sanitize;

// Re-export key types at crate root for convenience.
pub use codegen::CodeGen;
pub use config::{CodeGenConfig, Language};
pub use error::{CodegenError, Result};
pub use parser::SchemaDocument;
pub use result::{Accessor, AccessorKind, CodeGenResult, GeneratedProjection, NameConflict};
