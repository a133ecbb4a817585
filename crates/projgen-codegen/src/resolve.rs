//! Resolution of field type references against the schema document.

use crate::parser::{FieldDef, GqlType, SchemaDocument, TypeDef, TypeKind};

/// Which definitions [`find_type_definition`] may return.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ResolveOptions {
    /// Never match an `extend type` block.
    pub exclude_extensions: bool,
    /// Match the built-in scalars (`String`, `Int`, ...).
    pub include_base_types: bool,
    /// Match user-declared `scalar` definitions.
    pub include_scalar_types: bool,
}

impl ResolveOptions {
    /// The options projection generation uses for `field`.
    ///
    /// Argument-bearing fields also resolve scalars so callers can tell them
    /// apart; only composite definitions lead to a sub-projection.
    pub fn for_field(field: &FieldDef) -> Self {
        Self {
            exclude_extensions: true,
            include_base_types: field.has_arguments(),
            include_scalar_types: field.has_arguments(),
        }
    }
}

/// Find the definition a (possibly list/non-null wrapped) type refers to.
///
/// Returns `None` for leaves: built-in and custom scalars outside the
/// requested modes, and names the document does not define at all.
pub fn find_type_definition<'a>(
    ty: &GqlType,
    document: &'a SchemaDocument,
    options: ResolveOptions,
) -> Option<&'a TypeDef> {
    let name = ty.base_name();

    if let Some(builtin) = document.builtin_scalar(name) {
        return options.include_base_types.then_some(builtin);
    }

    let matches = |def: &&TypeDef| {
        def.name == name && (options.include_scalar_types || def.kind != TypeKind::Scalar)
    };

    document
        .definitions
        .iter()
        .filter(|d| !d.is_extension)
        .find(matches)
        .or_else(|| {
            if options.exclude_extensions {
                None
            } else {
                document
                    .definitions
                    .iter()
                    .filter(|d| d.is_extension)
                    .find(matches)
            }
        })
}

/// Resolve `field` to the composite type its projection accessor descends
/// into, or `None` when the field is a leaf.
pub fn composite_target<'a>(field: &FieldDef, document: &'a SchemaDocument) -> Option<&'a TypeDef> {
    find_type_definition(&field.ty, document, ResolveOptions::for_field(field))
        .filter(|def| def.is_composite())
}
