//! Rust source generation for bound operations.
//!
//! Everything is built as token streams, parsed back with `syn` to make
//! sure it is a valid file, then formatted with `prettyplease`. Operations
//! and shared types are emitted sorted by name, so the same schema and
//! operations always produce the same bytes.

mod manifest;
mod naming;
mod operation_module;
mod shared_types;
mod type_mapping;

pub use operation_module::operation_id;

use crate::CodegenError;
use crate::CodegenOptions;
use crate::OutputFormat;
use crate::operation::BoundOperation;
use crate::schema::SchemaDocument;
use naming::NameAllocator;
use operation_module::OperationModule;
use operation_module::operation_struct_name;
use proc_macro2::Ident;
use proc_macro2::TokenStream;
use quote::quote;
use shared_types::SharedTypes;
use std::path::Path;
use std::path::PathBuf;
use type_mapping::TypeMapper;

pub const GENERATED_HEADER: &str =
    "// @generated by graphql-codegen. Do not edit; rerun `graphql-codegen generate` instead.";

const SCHEMA_TYPES_MODULE: &str = "schema_types";

/// One output file, rendered but not yet written.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct GeneratedFile {
    pub path: PathBuf,
    pub contents: String,
}

/// Naming decided for one operation before any code is emitted.
struct PlannedOperation<'op> {
    operation: &'op BoundOperation,
    module_ident: Ident,
    module_file_name: String,
    struct_name: String,
}

pub struct Emitter<'a> {
    options: &'a CodegenOptions,
    mapper: TypeMapper<'a>,
}

impl<'a> Emitter<'a> {
    /// Fails if a scalar override or the custom scalar prefix does not make
    /// a valid Rust type.
    pub fn new(schema: &'a SchemaDocument, options: &'a CodegenOptions) -> crate::Result<Self> {
        Ok(Self {
            options,
            mapper: TypeMapper::new(schema, options)?,
        })
    }

    /// Renders every output file, including the operation-ID manifest when
    /// one is configured. Nothing is written here.
    pub fn emit(&self, operations: &[BoundOperation]) -> crate::Result<Vec<GeneratedFile>> {
        let mut sorted: Vec<&BoundOperation> = operations.iter().collect();
        sorted.sort_by(|a, b| a.name.cmp(&b.name));

        let shared = SharedTypes::collect(self.mapper.schema(), &sorted);
        let shared_names = shared.declared_names();
        let shared_items =
            shared.shared_items(&self.mapper, self.options.omit_deprecated_enum_cases);
        let planned = plan_operations(&sorted, &shared_names);

        let mut files = match &self.options.output_format {
            OutputFormat::SingleFile(path) => {
                vec![self.single_file(path, shared_items, &planned, &shared_names)?]
            },
            OutputFormat::PerOperation(dir) => {
                self.per_operation_files(dir, shared_items, &planned, &shared_names)?
            },
        };

        if let Some(manifest_path) = &self.options.operation_ids_path {
            let contents = manifest::render_manifest(&sorted).map_err(|err| {
                CodegenError::GeneratedCodeError {
                    path: manifest_path.clone(),
                    message: err.to_string(),
                }
            })?;
            files.push(GeneratedFile {
                path: manifest_path.clone(),
                contents,
            });
        }

        tracing::debug!(
            "emitted {} operation(s) into {} file(s)",
            sorted.len(),
            files.len(),
        );
        Ok(files)
    }

    fn single_file(
        &self,
        path: &Path,
        shared_items: TokenStream,
        planned: &[PlannedOperation<'_>],
        shared_names: &[String],
    ) -> crate::Result<GeneratedFile> {
        let modules = planned.iter().map(|plan| {
            let module_ident = &plan.module_ident;
            let body = self.operation_body(plan, shared_names);
            quote! {
                pub mod #module_ident {
                    #body
                }
            }
        });
        let reexports = planned.iter().map(reexport);

        let tokens = quote! {
            #![allow(clippy::all, dead_code, non_camel_case_types, unused_imports)]

            #shared_items
            #(#modules)*
            #(#reexports)*
        };
        render_file(path, tokens)
    }

    fn per_operation_files(
        &self,
        dir: &Path,
        shared_items: TokenStream,
        planned: &[PlannedOperation<'_>],
        shared_names: &[String],
    ) -> crate::Result<Vec<GeneratedFile>> {
        let schema_types_ident = naming::rust_ident(SCHEMA_TYPES_MODULE);
        let module_idents = planned.iter().map(|plan| &plan.module_ident);
        let reexports = planned.iter().map(reexport);
        let mod_tokens = quote! {
            #![allow(clippy::all, dead_code, non_camel_case_types, unused_imports)]

            pub mod #schema_types_ident;
            #(pub mod #module_idents;)*

            pub use #schema_types_ident::*;
            #(#reexports)*
        };

        let mut files = vec![
            render_file(&dir.join("mod.rs"), mod_tokens)?,
            render_file(
                &dir.join(format!("{SCHEMA_TYPES_MODULE}.rs")),
                quote! {
                    #![allow(clippy::all, dead_code, non_camel_case_types)]

                    #shared_items
                },
            )?,
        ];
        for plan in planned {
            let body = self.operation_body(plan, shared_names);
            let tokens = quote! {
                #![allow(clippy::all, dead_code, non_camel_case_types, unused_imports)]

                #body
            };
            files.push(render_file(&dir.join(&plan.module_file_name), tokens)?);
        }
        Ok(files)
    }

    fn operation_body(&self, plan: &PlannedOperation<'_>, shared_names: &[String]) -> TokenStream {
        OperationModule::new(&self.mapper, plan.operation, &plan.struct_name, shared_names).body()
    }
}

/// Picks module and struct names for every operation, avoiding clashes
/// with each other and with the shared types.
fn plan_operations<'op>(
    operations: &[&'op BoundOperation],
    shared_names: &[String],
) -> Vec<PlannedOperation<'op>> {
    let mut module_names = NameAllocator::default();
    let mut struct_names = NameAllocator::default();
    module_names.reserve(SCHEMA_TYPES_MODULE);
    module_names.reserve("mod");
    for name in shared_names {
        module_names.reserve(name.clone());
        struct_names.reserve(name.clone());
    }

    operations
        .iter()
        .map(|operation| {
            let module_name = module_names.claim(&naming::module_name(&operation.name));
            let struct_name =
                struct_names.claim(&operation_struct_name(&operation.name, operation.kind));
            PlannedOperation {
                operation,
                module_ident: naming::rust_ident(&module_name),
                module_file_name: format!("{module_name}.rs"),
                struct_name,
            }
        })
        .collect()
}

fn reexport(plan: &PlannedOperation<'_>) -> TokenStream {
    let module_ident = &plan.module_ident;
    let struct_ident = naming::rust_ident(&plan.struct_name);
    quote! { pub use #module_ident::#struct_ident; }
}

/// Checks `tokens` parse as a Rust file and formats them behind the
/// generated-code header.
fn render_file(path: &Path, tokens: TokenStream) -> crate::Result<GeneratedFile> {
    let file = syn::parse2::<syn::File>(tokens).map_err(|err| CodegenError::GeneratedCodeError {
        path: path.to_path_buf(),
        message: err.to_string(),
    })?;
    Ok(GeneratedFile {
        path: path.to_path_buf(),
        contents: format!("{GENERATED_HEADER}\n\n{}", prettyplease::unparse(&file)),
    })
}
