pub mod projection;
pub mod query;

// Re-export key types at crate root for convenience.
pub use projection::{NestedProjection, Projection, ProjectionNode, ProjectionScope};
pub use query::GraphQLQuery;
