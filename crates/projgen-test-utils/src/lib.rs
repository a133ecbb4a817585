//! Projections generated at build time from `schema/fixture.graphql` with the
//! default configuration, so tests can drive real generator output against
//! `projgen-runtime`.

pub mod generated {
    include!(concat!(env!("OUT_DIR"), "/projections.rs"));
}
