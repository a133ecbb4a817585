use apollo_parser::cst::{self, CstNode};
use apollo_parser::Parser;

/// What kind of GraphQL type a definition declares.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TypeKind {
    Scalar,
    Enum,
    Object,
    InputObject,
    Interface,
    Union,
}

/// The directive that drops a field from generated projections.
pub const SKIP_DIRECTIVE: &str = "skipcodegen";

/// Built-in GraphQL scalar names.
pub const BUILTIN_SCALARS: &[&str] = &["String", "Int", "Float", "Boolean", "ID"];

/// A simplified field representation extracted from the CST.
#[derive(Debug, Clone)]
pub struct FieldDef {
    pub name: String,
    pub description: Option<String>,
    pub ty: GqlType,
    pub arguments: Vec<ArgumentDef>,
    /// Names of the directives applied to the field, without the `@`.
    pub directives: Vec<String>,
}

impl FieldDef {
    /// Whether the field is marked `@skipcodegen`.
    pub fn is_skipped(&self) -> bool {
        self.directives.iter().any(|d| d == SKIP_DIRECTIVE)
    }

    pub fn has_arguments(&self) -> bool {
        !self.arguments.is_empty()
    }
}

/// A simplified argument representation.
#[derive(Debug, Clone)]
pub struct ArgumentDef {
    pub name: String,
    pub description: Option<String>,
    pub ty: GqlType,
}

/// One named type definition (or object-type extension) from the document.
///
/// Scalars, enums and unions carry no fields. Input objects keep their input
/// fields in `fields` with empty argument lists.
#[derive(Debug, Clone)]
pub struct TypeDef {
    pub name: String,
    pub description: Option<String>,
    pub kind: TypeKind,
    pub fields: Vec<FieldDef>,
    /// `extend type Foo { ... }` rather than `type Foo { ... }`.
    pub is_extension: bool,
}

impl TypeDef {
    /// Object and interface types decompose into fields and get projections.
    pub fn is_composite(&self) -> bool {
        matches!(self.kind, TypeKind::Object | TypeKind::Interface)
    }

    fn builtin_scalar(name: &str) -> Self {
        TypeDef {
            name: name.to_string(),
            description: None,
            kind: TypeKind::Scalar,
            fields: Vec::new(),
            is_extension: false,
        }
    }
}

/// Represents a GraphQL type reference (NamedType, List, NonNull wrapping).
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GqlType {
    Named(String),
    List(Box<GqlType>),
    NonNull(Box<GqlType>),
}

impl GqlType {
    /// Get the base (innermost) named type.
    pub fn base_name(&self) -> &str {
        match self {
            GqlType::Named(name) => name,
            GqlType::List(inner) => inner.base_name(),
            GqlType::NonNull(inner) => inner.base_name(),
        }
    }
}

/// A parsed schema document.
#[derive(Debug, Clone)]
pub struct SchemaDocument {
    /// Type definitions and object-type extensions, in document order.
    pub definitions: Vec<TypeDef>,
    /// Synthetic definitions for the built-in scalars.
    pub builtin_scalars: Vec<TypeDef>,
    /// Name of the root query type, `Query` unless a `schema` block says otherwise.
    pub query_type: String,
}

impl SchemaDocument {
    /// The base (non-extension) definition named `name`.
    pub fn definition(&self, name: &str) -> Option<&TypeDef> {
        self.definitions
            .iter()
            .find(|d| !d.is_extension && d.name == name)
    }

    /// Every `extend type` block targeting `name`, in document order.
    pub fn extensions_of<'a>(&'a self, name: &'a str) -> impl Iterator<Item = &'a TypeDef> + 'a {
        self.definitions
            .iter()
            .filter(move |d| d.is_extension && d.name == name)
    }

    pub fn builtin_scalar(&self, name: &str) -> Option<&TypeDef> {
        self.builtin_scalars.iter().find(|s| s.name == name)
    }

    /// The root query type definition.
    pub fn query_root(&self) -> Option<&TypeDef> {
        self.definition(&self.query_type)
    }
}

/// Parse one or more SDL documents into a single [`SchemaDocument`].
///
/// Multiple inputs are concatenated in order before parsing.
pub fn parse_all<S: AsRef<str>>(schemas: &[S]) -> SchemaDocument {
    let joined: Vec<&str> = schemas.iter().map(|s| s.as_ref()).collect();
    parse(&joined.join("\n"))
}

pub fn parse(schema_text: &str) -> SchemaDocument {
    let parser = Parser::new(schema_text);
    let tree = parser.parse();

    // Report parse errors but continue (apollo-parser is error-resilient).
    for err in tree.errors() {
        tracing::warn!("schema parse warning: {}", err.message());
    }

    let doc = tree.document();

    let mut definitions = Vec::new();
    let mut query_type = "Query".to_string();

    for def in doc.definitions() {
        match def {
            cst::Definition::SchemaDefinition(s) => {
                // Only the query root matters; mutation and subscription
                // roots get no entry points.
                for root in s.root_operation_type_definitions() {
                    let is_query = root
                        .operation_type()
                        .is_some_and(|op| op.syntax().text().to_string() == "query");
                    if let (true, Some(named)) = (is_query, root.named_type()) {
                        query_type = extract_name(&named.name());
                    }
                }
            }
            cst::Definition::ScalarTypeDefinition(s) => {
                definitions.push(TypeDef {
                    name: extract_name(&s.name()),
                    description: extract_description(&s.description()),
                    kind: TypeKind::Scalar,
                    fields: Vec::new(),
                    is_extension: false,
                });
            }
            cst::Definition::EnumTypeDefinition(e) => {
                definitions.push(TypeDef {
                    name: extract_name(&e.name()),
                    description: extract_description(&e.description()),
                    kind: TypeKind::Enum,
                    fields: Vec::new(),
                    is_extension: false,
                });
            }
            cst::Definition::ObjectTypeDefinition(o) => {
                definitions.push(TypeDef {
                    name: extract_name(&o.name()),
                    description: extract_description(&o.description()),
                    kind: TypeKind::Object,
                    fields: extract_fields(&o.fields_definition()),
                    is_extension: false,
                });
            }
            cst::Definition::ObjectTypeExtension(o) => {
                definitions.push(TypeDef {
                    name: extract_name(&o.name()),
                    description: None,
                    kind: TypeKind::Object,
                    fields: extract_fields(&o.fields_definition()),
                    is_extension: true,
                });
            }
            cst::Definition::InputObjectTypeDefinition(i) => {
                definitions.push(extract_input(&i));
            }
            cst::Definition::InterfaceTypeDefinition(i) => {
                definitions.push(TypeDef {
                    name: extract_name(&i.name()),
                    description: extract_description(&i.description()),
                    kind: TypeKind::Interface,
                    fields: extract_fields(&i.fields_definition()),
                    is_extension: false,
                });
            }
            cst::Definition::UnionTypeDefinition(u) => {
                definitions.push(TypeDef {
                    name: extract_name(&u.name()),
                    description: extract_description(&u.description()),
                    kind: TypeKind::Union,
                    fields: Vec::new(),
                    is_extension: false,
                });
            }
            _ => {}
        }
    }

    SchemaDocument {
        definitions,
        builtin_scalars: BUILTIN_SCALARS
            .iter()
            .map(|s| TypeDef::builtin_scalar(s))
            .collect(),
        query_type,
    }
}

fn extract_name(name: &Option<cst::Name>) -> String {
    name.as_ref()
        .map(|n| n.text().to_string())
        .unwrap_or_default()
}

fn extract_description(desc: &Option<cst::Description>) -> Option<String> {
    desc.as_ref()
        .and_then(|d| d.string_value())
        .map(String::from)
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
}

fn extract_type(ty: &Option<cst::Type>) -> GqlType {
    match ty {
        None => GqlType::Named("String".to_string()),
        Some(t) => match t {
            cst::Type::NamedType(nt) => GqlType::Named(extract_name(&nt.name())),
            cst::Type::ListType(lt) => GqlType::List(Box::new(extract_type(&lt.ty()))),
            cst::Type::NonNullType(nnt) => {
                if let Some(named) = nnt.named_type() {
                    let name = extract_name(&named.name());
                    GqlType::NonNull(Box::new(GqlType::Named(name)))
                } else if let Some(list) = nnt.list_type() {
                    let inner = extract_type(&list.ty());
                    GqlType::NonNull(Box::new(GqlType::List(Box::new(inner))))
                } else {
                    GqlType::NonNull(Box::new(GqlType::Named("String".to_string())))
                }
            }
        },
    }
}

fn extract_directives(directives: &Option<cst::Directives>) -> Vec<String> {
    let Some(ds) = directives else {
        return Vec::new();
    };
    ds.directives().map(|d| extract_name(&d.name())).collect()
}

fn extract_fields(fields_def: &Option<cst::FieldsDefinition>) -> Vec<FieldDef> {
    let Some(fd) = fields_def else {
        return Vec::new();
    };
    fd.field_definitions()
        .map(|f| FieldDef {
            name: extract_name(&f.name()),
            description: extract_description(&f.description()),
            ty: extract_type(&f.ty()),
            arguments: extract_arguments(&f.arguments_definition()),
            directives: extract_directives(&f.directives()),
        })
        .collect()
}

fn extract_arguments(args_def: &Option<cst::ArgumentsDefinition>) -> Vec<ArgumentDef> {
    let Some(ad) = args_def else {
        return Vec::new();
    };
    ad.input_value_definitions()
        .map(|iv| ArgumentDef {
            name: extract_name(&iv.name()),
            description: extract_description(&iv.description()),
            ty: extract_type(&iv.ty()),
        })
        .collect()
}

fn extract_input(i: &cst::InputObjectTypeDefinition) -> TypeDef {
    let fields = i
        .input_fields_definition()
        .map(|ifd| {
            ifd.input_value_definitions()
                .map(|iv| FieldDef {
                    name: extract_name(&iv.name()),
                    description: extract_description(&iv.description()),
                    ty: extract_type(&iv.ty()),
                    arguments: Vec::new(),
                    directives: extract_directives(&iv.directives()),
                })
                .collect()
        })
        .unwrap_or_default();

    TypeDef {
        name: extract_name(&i.name()),
        description: extract_description(&i.description()),
        kind: TypeKind::InputObject,
        fields,
        is_extension: false,
    }
}
