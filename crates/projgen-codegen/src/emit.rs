//! Rendering of generated projections into Rust source files.
//!
//! Layout under the output directory:
//!
//! ```text
//! mod.rs                       pub mod query; pub mod client;
//! query/mod.rs                 mod query_projection; pub use ...;
//! query/query_projection.rs
//! client/mod.rs
//! client/person_projection.rs
//! ```
//!
//! [`render_single_file`] produces the same modules inline in one file.

use crate::config::CodeGenConfig;
use crate::error::{CodegenError, Result};
use crate::result::{Accessor, AccessorKind, CodeGenResult, GeneratedProjection};
use crate::sanitize::unraw;
use heck::ToSnakeCase;
use proc_macro2::{Ident, Span, TokenStream};
use quote::quote;
use std::collections::HashSet;
use std::path::{Path, PathBuf};

const HEADER: &str = " Generated by projgen. Do not edit.";

/// One rendered source file, relative to the output directory.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderedFile {
    pub path: PathBuf,
    pub contents: String,
}

/// One output module and the projections it holds, each with the name of
/// the private submodule (and file) it lives in.
struct ModuleGroup<'a> {
    module: Ident,
    entries: Vec<(Ident, &'a GeneratedProjection)>,
}

/// Render every artifact in `result`, plus the module index files.
///
/// Fails if two schema types were mapped to the same projection class, or
/// if one module would define a class twice.
pub fn render(result: &CodeGenResult, config: &CodeGenConfig) -> Result<Vec<RenderedFile>> {
    let runtime = parse_path(&config.runtime_crate)?;
    let groups = group_modules(result, config)?;

    let mut files = Vec::new();
    for group in &groups {
        let dir = PathBuf::from(group.module.to_string());
        let mut submodules = Vec::with_capacity(group.entries.len());
        for (submodule, projection) in &group.entries {
            let items = projection_items(projection, &runtime)?;
            files.push(RenderedFile {
                path: dir.join(format!("{}.rs", submodule)),
                contents: unparse(&projection.class_name, with_header(items))?,
            });
            submodules.push(quote! { mod #submodule; });
        }
        let uses = index_uses(group);
        files.push(RenderedFile {
            path: dir.join("mod.rs"),
            contents: unparse("mod.rs", with_header(quote! { #(#submodules)* #uses }))?,
        });
    }

    let modules = groups.iter().map(|g| &g.module);
    files.push(RenderedFile {
        path: PathBuf::from("mod.rs"),
        contents: unparse("mod.rs", with_header(quote! { #(pub mod #modules;)* }))?,
    });

    Ok(files)
}

/// Render everything as one source file of inline modules, for build scripts
/// that `include!` the output from `OUT_DIR`.
///
/// The file must be included at the module path named by `package_name`.
pub fn render_single_file(result: &CodeGenResult, config: &CodeGenConfig) -> Result<String> {
    let runtime = parse_path(&config.runtime_crate)?;
    let groups = group_modules(result, config)?;

    let mut modules = Vec::with_capacity(groups.len());
    for group in &groups {
        let module = &group.module;
        let mut submodules = Vec::with_capacity(group.entries.len());
        for (submodule, projection) in &group.entries {
            let items = projection_items(projection, &runtime)?;
            submodules.push(quote! { mod #submodule { #items } });
        }
        let uses = index_uses(group);
        modules.push(quote! {
            pub mod #module {
                #(#submodules)*
                #uses
            }
        });
    }

    let source = unparse("generated", quote! { #(#modules)* })?;
    Ok(format!("//{}\n\n{}", HEADER, source))
}

/// Validate the configured paths and lay out the output modules.
fn group_modules<'a>(
    result: &'a CodeGenResult,
    config: &CodeGenConfig,
) -> Result<Vec<ModuleGroup<'a>>> {
    if let Some(conflict) = result.conflicts.first() {
        return Err(CodegenError::DuplicateProjection {
            class_name: conflict.class_name.clone(),
            generated_from: conflict.generated_from.clone(),
            conflicting: conflict.conflicting.clone(),
        });
    }

    parse_path(&config.package_name)?;
    let query_module = parse_module(&config.query_module)?;
    let projection_module = parse_module(&config.projection_module)?;

    let mut layout: Vec<(Ident, Vec<&GeneratedProjection>)> = vec![(query_module, Vec::new())];
    if projection_module != layout[0].0 {
        layout.push((projection_module, Vec::new()));
    }
    let last = layout.len() - 1;
    layout[0].1.extend(&result.query_types);
    layout[last].1.extend(&result.projections);

    layout
        .into_iter()
        .map(|(module, projections)| {
            let mut classes = HashSet::new();
            let mut submodules = HashSet::new();
            let mut entries = Vec::with_capacity(projections.len());
            for projection in projections {
                if !classes.insert(projection.class_name.as_str()) {
                    return Err(CodegenError::DuplicateClass {
                        module: module.to_string(),
                        class_name: projection.class_name.clone(),
                    });
                }
                let submodule = unique_module_name(&projection.class_name, &mut submodules);
                entries.push((ident(&submodule), projection));
            }
            Ok(ModuleGroup { module, entries })
        })
        .collect()
}

/// `PersonProjection` -> `person_projection`. Classes that differ only in
/// case (`URLProjection`, `UrlProjection`) get `_2`, `_3`, ... suffixes.
fn unique_module_name(class_name: &str, taken: &mut HashSet<String>) -> String {
    let base = unraw(class_name).to_snake_case();
    let mut name = base.clone();
    let mut n = 1;
    while !taken.insert(name.clone()) {
        n += 1;
        name = format!("{}_{}", base, n);
    }
    name
}

fn index_uses(group: &ModuleGroup<'_>) -> TokenStream {
    let uses = group.entries.iter().map(|(submodule, projection)| {
        let class = ident(&projection.class_name);
        quote! { pub use #submodule::#class; }
    });
    quote! { #(#uses)* }
}

fn with_header(items: TokenStream) -> TokenStream {
    quote! {
        #![doc = #HEADER]
        #items
    }
}

/// The items of one projection type's source file.
fn projection_items(projection: &GeneratedProjection, runtime: &syn::Path) -> Result<TokenStream> {
    let class = ident(&projection.class_name);
    let supertype = ident(projection.supertype);
    let doc = doc_attrs(projection.description.as_deref());

    let accessors = projection
        .accessors
        .iter()
        .map(|a| render_accessor(a, &projection.package))
        .collect::<Result<Vec<_>>>()?;

    let (scope_import, scope_impl) = if projection.dsl_scope {
        (
            quote! { , ProjectionScope },
            quote! { impl ProjectionScope for #class {} },
        )
    } else {
        (TokenStream::new(), TokenStream::new())
    };

    Ok(quote! {
        use #runtime::{#supertype, ProjectionNode #scope_import};

        #doc
        #[derive(Debug, Clone, Default)]
        pub struct #class {
            node: ProjectionNode,
        }

        impl #supertype for #class {
            fn node(&self) -> &ProjectionNode {
                &self.node
            }
        }

        #scope_impl

        #[allow(non_snake_case)]
        impl #class {
            #(#accessors)*
        }
    })
}

fn render_accessor(accessor: &Accessor, current_package: &str) -> Result<TokenStream> {
    let doc = doc_attrs(accessor.description.as_deref());
    let method = ident(&accessor.name);
    let field = &accessor.field_name;

    let tokens = match &accessor.kind {
        AccessorKind::Leaf => quote! {
            #doc
            pub fn #method(&mut self) -> &mut Self {
                self.node.select(#field);
                self
            }
        },
        AccessorKind::Composite {
            projection,
            package,
        } => {
            let ty = projection_path(projection, package, current_package)?;
            quote! {
                #doc
                pub fn #method(&mut self, init: impl FnOnce(&mut #ty)) -> &mut #ty {
                    let projection = self.node.select_nested::<#ty>(#field);
                    init(&mut *projection);
                    projection
                }
            }
        }
    };
    Ok(tokens)
}

/// Same-module projections go through the module index (`super::X`),
/// others through their full package path.
fn projection_path(projection: &str, package: &str, current_package: &str) -> Result<TokenStream> {
    if package == current_package {
        let ty = ident(projection);
        Ok(quote! { super::#ty })
    } else {
        let path = parse_path(&format!("{}::{}", package, projection))?;
        Ok(quote! { #path })
    }
}

/// Write rendered files below `out_dir`, creating directories as needed.
pub fn write_files(files: &[RenderedFile], out_dir: &Path) -> Result<()> {
    for file in files {
        let path = out_dir.join(&file.path);
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).map_err(|source| CodegenError::Io {
                path: parent.to_path_buf(),
                source,
            })?;
        }
        std::fs::write(&path, &file.contents).map_err(|source| CodegenError::Io {
            path: path.clone(),
            source,
        })?;
        tracing::debug!(path = %path.display(), "wrote file");
    }
    tracing::info!(files = files.len(), out_dir = %out_dir.display(), "wrote generated code");
    Ok(())
}

fn unparse(name: &str, tokens: TokenStream) -> Result<String> {
    let file: syn::File = syn::parse2(tokens).map_err(|source| CodegenError::Render {
        class_name: name.to_string(),
        source,
    })?;
    Ok(prettyplease::unparse(&file))
}

/// Build an identifier from a sanitized name, keeping `r#` prefixes raw.
fn ident(name: &str) -> Ident {
    match name.strip_prefix("r#") {
        Some(raw) => Ident::new_raw(raw, Span::call_site()),
        None => Ident::new(name, Span::call_site()),
    }
}

fn parse_path(path: &str) -> Result<syn::Path> {
    syn::parse_str(path).map_err(|_| CodegenError::ModulePath(path.to_string()))
}

fn parse_module(module: &str) -> Result<Ident> {
    syn::parse_str(module).map_err(|_| CodegenError::ModulePath(module.to_string()))
}

/// `#[doc]` attributes for a schema description, one per line.
fn doc_attrs(description: Option<&str>) -> TokenStream {
    let text = description.map(sanitize_doc).unwrap_or_default();
    let lines = text.lines().map(|line| format!(" {}", line));
    quote! { #(#[doc = #lines])* }
}

/// Make a schema description safe for rustdoc.
///
/// `[Tag]` becomes a code span so rustdoc does not read it as an intra-doc
/// link; markdown links keep their brackets. Bare `https://` URLs are put in
/// angle brackets.
fn sanitize_doc(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut rest = text;
    while let Some(pos) = rest.find(|c: char| c == '[' || c == 'h') {
        out.push_str(&rest[..pos]);
        rest = &rest[pos..];
        let consumed = if rest.starts_with('[') {
            bracket_tag(rest, &mut out)
        } else if rest.starts_with("https://") {
            let bracketed = out.ends_with('<');
            bare_url(rest, bracketed, &mut out)
        } else {
            out.push('h');
            1
        };
        rest = &rest[consumed..];
    }
    out.push_str(rest);
    out
}

/// Handle a `[` at the start of `s`, returning the bytes consumed.
fn bracket_tag(s: &str, out: &mut String) -> usize {
    match s[1..].find(']') {
        Some(len) if len > 0 && !s[len + 2..].starts_with('(') => {
            out.push('`');
            out.push_str(&s[1..=len]);
            out.push('`');
            len + 2
        }
        _ => {
            out.push('[');
            1
        }
    }
}

/// Handle a URL at the start of `s`, returning the bytes consumed.
fn bare_url(s: &str, bracketed: bool, out: &mut String) -> usize {
    let end = s
        .find(|c: char| c.is_whitespace() || matches!(c, ')' | ',' | '>' | '\''))
        .unwrap_or(s.len());
    if bracketed {
        out.push_str(&s[..end]);
    } else {
        out.push('<');
        out.push_str(&s[..end]);
        out.push('>');
    }
    end
}
