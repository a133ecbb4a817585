//! Projection tree construction.
//!
//! [`ProjectionBuilder`] walks the schema's type graph depth-first from the
//! root query type and produces one [`GeneratedProjection`] per reachable
//! object type. A run-scoped registry of generated class names keeps every
//! type to exactly one projection and stops the walk on cyclic schemas.

use crate::config::CodeGenConfig;
use crate::filter::filter_fields;
use crate::parser::{FieldDef, SchemaDocument, TypeDef};
use crate::resolve::composite_target;
use crate::result::{Accessor, AccessorKind, CodeGenResult, GeneratedProjection, NameConflict};
use crate::sanitize::{sanitize, unraw};
use std::collections::HashMap;
use tracing::{debug, warn};

/// Class name of the root entry point, whatever the root type is called.
pub const ROOT_PROJECTION_NAME: &str = "QueryProjection";

/// `Person` -> `PersonProjection`.
pub fn projection_class_name(prefix: &str) -> String {
    sanitize(&format!("{}Projection", capitalized(prefix)))
}

fn capitalized(s: &str) -> String {
    let mut chars = s.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

/// Builds projections for one generation run.
///
/// The registry maps class names to the type they were generated from and
/// lives as long as the builder; use a fresh builder per run.
pub struct ProjectionBuilder<'a> {
    document: &'a SchemaDocument,
    config: &'a CodeGenConfig,
    generated: HashMap<String, String>,
}

impl<'a> ProjectionBuilder<'a> {
    pub fn new(document: &'a SchemaDocument, config: &'a CodeGenConfig) -> Self {
        Self {
            document,
            config,
            generated: HashMap::new(),
        }
    }

    /// Whether a projection with this class name was already produced.
    pub fn is_generated(&self, class_name: &str) -> bool {
        self.generated.contains_key(class_name)
    }

    /// Build the projection for `ty` and, before it, every nested projection
    /// it needs that has not been generated yet.
    ///
    /// Returns an empty result when the class name is already registered.
    /// If it was registered by a different type, the clash is recorded as a
    /// [`NameConflict`] instead.
    pub fn build(&mut self, ty: &'a TypeDef, prefix: &str) -> CodeGenResult {
        let class_name = projection_class_name(prefix);

        // Register before descending: a self-referencing field must hit the
        // short-circuit instead of recursing.
        if let Some(generated_from) = self.generated.get(&class_name) {
            if *generated_from == ty.name {
                debug!(%class_name, "projection already generated");
                return CodeGenResult::default();
            }
            warn!(
                %class_name,
                %generated_from,
                conflicting = %ty.name,
                "projection class name already taken by another type"
            );
            return CodeGenResult::with_conflict(NameConflict {
                class_name,
                generated_from: generated_from.clone(),
                conflicting: ty.name.clone(),
            });
        }
        self.generated.insert(class_name.clone(), ty.name.clone());

        let (accessors, nested) = self.accessors(ty, false);
        debug!(%class_name, accessors = accessors.len(), "built projection");

        let mut projection =
            GeneratedProjection::new(class_name, self.config.projection_package());
        projection.description = ty.description.clone();
        projection.accessors = accessors;

        nested.merge(CodeGenResult::with_projection(projection))
    }

    /// Build the root entry point for the query type `root`.
    ///
    /// Only fields that resolve to object types get accessors on the root.
    /// The root itself never enters the registry.
    pub fn build_root(&mut self, root: &'a TypeDef) -> CodeGenResult {
        let (accessors, nested) = self.accessors(root, true);

        let mut query = GeneratedProjection::new(
            ROOT_PROJECTION_NAME.to_string(),
            self.config.query_package(),
        );
        query.description = root.description.clone();
        query.accessors = accessors;

        CodeGenResult::with_query_type(query).merge(nested)
    }

    fn accessors(&mut self, ty: &'a TypeDef, composite_only: bool) -> (Vec<Accessor>, CodeGenResult) {
        let fields = filter_fields(self.merged_fields(ty), &ty.name, self.config);

        let mut accessors: Vec<Accessor> = Vec::with_capacity(fields.len());
        let mut nested = CodeGenResult::default();

        for field in fields {
            let name = unique_accessor_name(&field.name, &accessors);
            if name != sanitize(&field.name) {
                warn!(
                    owner = %ty.name,
                    field = %field.name,
                    accessor = %name,
                    "accessor name collides with an earlier field, renamed"
                );
            }

            let kind = match composite_target(field, self.document) {
                Some(target) => {
                    nested = nested.merge(self.build(target, &target.name));
                    AccessorKind::Composite {
                        projection: projection_class_name(&target.name),
                        package: self.config.projection_package(),
                    }
                }
                None if composite_only => continue,
                None => AccessorKind::Leaf,
            };

            accessors.push(Accessor {
                name,
                field_name: field.name.clone(),
                description: field.description.clone(),
                kind,
            });
        }

        (accessors, nested)
    }

    /// The type's own fields followed by fields from its `extend type` blocks.
    fn merged_fields(&self, ty: &'a TypeDef) -> Vec<&'a FieldDef> {
        let mut fields: Vec<&'a FieldDef> = ty.fields.iter().collect();
        for extension in self.document.extensions_of(&ty.name) {
            for field in &extension.fields {
                if fields.iter().any(|f| f.name == field.name) {
                    continue;
                }
                fields.push(field);
            }
        }
        fields
    }
}

/// The sanitized field name, or `name2`, `name3`, ... when an earlier
/// accessor already took it (`self` and `self_` both sanitize to `self_`).
fn unique_accessor_name(field: &str, taken: &[Accessor]) -> String {
    let is_taken = |candidate: &str| taken.iter().any(|a| a.name == candidate);
    let name = sanitize(field);
    if !is_taken(&name) {
        return name;
    }
    let base = unraw(&name).to_string();
    (2..)
        .map(|n| sanitize(&format!("{}{}", base, n)))
        .find(|candidate| !is_taken(candidate))
        .unwrap_or(name)
}
