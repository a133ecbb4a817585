//! Structural description of generated projection types.
//!
//! Nothing here is rendered text: [`crate::emit`] turns these descriptions
//! into Rust source.

/// The abstract projection root every generated type implements.
pub const BASE_PROJECTION: &str = "Projection";

/// One generated projection type.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GeneratedProjection {
    pub class_name: String,
    /// Module path the type is generated into.
    pub package: String,
    pub supertype: &'static str,
    /// Marks the type as a builder scope for nested configuration.
    pub dsl_scope: bool,
    pub description: Option<String>,
    pub accessors: Vec<Accessor>,
}

impl GeneratedProjection {
    pub fn new(class_name: String, package: String) -> Self {
        Self {
            class_name,
            package,
            supertype: BASE_PROJECTION,
            dsl_scope: true,
            description: None,
            accessors: Vec::new(),
        }
    }

    pub fn accessor(&self, name: &str) -> Option<&Accessor> {
        self.accessors.iter().find(|a| a.name == name)
    }
}

/// A generated method that selects one field.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Accessor {
    /// Method identifier, sanitized.
    pub name: String,
    /// The GraphQL field the method records.
    pub field_name: String,
    pub description: Option<String>,
    pub kind: AccessorKind,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AccessorKind {
    /// Records the field with no nested selection.
    Leaf,
    /// Takes a configuration callback for the nested projection, records it
    /// as the field's selection and returns it.
    Composite {
        projection: String,
        package: String,
    },
}

impl Accessor {
    pub fn is_leaf(&self) -> bool {
        matches!(self.kind, AccessorKind::Leaf)
    }

    /// Class name of the nested projection, for composite accessors.
    pub fn projection(&self) -> Option<&str> {
        match &self.kind {
            AccessorKind::Leaf => None,
            AccessorKind::Composite { projection, .. } => Some(projection),
        }
    }
}

/// Two distinct schema types that map to the same projection class name.
/// Only the first one gets a projection.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NameConflict {
    pub class_name: String,
    pub generated_from: String,
    pub conflicting: String,
}

/// Output of a generation run, or of one step of it.
///
/// `query_types` holds the root entry point; `projections` holds every
/// per-type projection in dependency-first order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CodeGenResult {
    pub query_types: Vec<GeneratedProjection>,
    pub projections: Vec<GeneratedProjection>,
    pub conflicts: Vec<NameConflict>,
}

impl CodeGenResult {
    pub fn with_projection(projection: GeneratedProjection) -> Self {
        Self {
            projections: vec![projection],
            ..Self::default()
        }
    }

    pub fn with_query_type(query_type: GeneratedProjection) -> Self {
        Self {
            query_types: vec![query_type],
            ..Self::default()
        }
    }

    pub fn with_conflict(conflict: NameConflict) -> Self {
        Self {
            conflicts: vec![conflict],
            ..Self::default()
        }
    }

    /// Concatenate `other` after `self`. Duplicates are kept; deduplication
    /// belongs to the projection builder.
    pub fn merge(mut self, other: CodeGenResult) -> Self {
        self.query_types.extend(other.query_types);
        self.projections.extend(other.projections);
        self.conflicts.extend(other.conflicts);
        self
    }

    pub fn is_empty(&self) -> bool {
        self.query_types.is_empty() && self.projections.is_empty() && self.conflicts.is_empty()
    }

    pub fn projection(&self, class_name: &str) -> Option<&GeneratedProjection> {
        self.projections.iter().find(|p| p.class_name == class_name)
    }
}

impl FromIterator<CodeGenResult> for CodeGenResult {
    fn from_iter<I: IntoIterator<Item = CodeGenResult>>(iter: I) -> Self {
        iter.into_iter()
            .fold(CodeGenResult::default(), CodeGenResult::merge)
    }
}
