//! The module emitted for one operation.

use crate::emitter::naming;
use crate::emitter::naming::NameAllocator;
use crate::emitter::shared_types::serde_rename;
use crate::emitter::type_mapping::TypeMapper;
use crate::operation::BoundOperation;
use crate::operation::BoundSelectionSet;
use graphql_codegen_parser::ast::OperationKind;
use proc_macro2::Ident;
use proc_macro2::TokenStream;
use quote::quote;
use sha2::Digest;
use sha2::Sha256;

/// Hex SHA-256 of an operation document.
pub fn operation_id(document: &str) -> String {
    hex::encode(Sha256::digest(document.as_bytes()))
}

/// `HeroName` becomes `HeroNameQuery`; names that already end in their
/// kind are left alone.
pub(crate) fn operation_struct_name(name: &str, kind: OperationKind) -> String {
    let base = naming::pascal_name(name);
    let suffix = match kind {
        OperationKind::Query => "Query",
        OperationKind::Mutation => "Mutation",
        OperationKind::Subscription => "Subscription",
    };
    if base.ends_with(suffix) {
        base
    } else {
        format!("{base}{suffix}")
    }
}

pub(crate) struct OperationModule<'a, 'm> {
    mapper: &'m TypeMapper<'a>,
    operation: &'m BoundOperation,
    struct_ident: Ident,

    /// Type names already used in the module's scope.
    type_names: NameAllocator,
}

impl<'a, 'm> OperationModule<'a, 'm> {
    pub(crate) fn new(
        mapper: &'m TypeMapper<'a>,
        operation: &'m BoundOperation,
        struct_name: &str,
        shared_names: &[String],
    ) -> Self {
        let mut type_names = NameAllocator::default();
        for name in shared_names {
            type_names.reserve(name.clone());
        }
        type_names.reserve("Variables");
        type_names.reserve("ResponseData");
        type_names.reserve(struct_name);
        Self {
            mapper,
            operation,
            struct_ident: naming::rust_ident(struct_name),
            type_names,
        }
    }

    /// The items of the module, without the `mod` wrapper.
    pub(crate) fn body(mut self) -> TokenStream {
        let operation = self.operation;
        let name = &operation.name;
        let document = &operation.document;
        let id = operation_id(document);
        let struct_ident = self.struct_ident.clone();
        let struct_doc = format!(" The `{name}` {}.", operation.kind);

        let variables = self.variables_struct();
        let mut response_structs = Vec::new();
        self.selection_struct("ResponseData", "", &operation.selection, &mut response_structs);

        quote! {
            use super::*;

            pub const OPERATION_NAME: &str = #name;
            pub const OPERATION_DOCUMENT: &str = #document;
            pub const OPERATION_ID: &str = #id;

            #variables

            #(#response_structs)*

            #[doc = #struct_doc]
            #[derive(Clone, Copy, Debug, Default)]
            pub struct #struct_ident;

            impl GraphQLOperation for #struct_ident {
                type Variables = Variables;
                type ResponseData = ResponseData;

                const OPERATION_NAME: &'static str = OPERATION_NAME;
                const OPERATION_DOCUMENT: &'static str = OPERATION_DOCUMENT;
                const OPERATION_ID: &'static str = OPERATION_ID;
            }
        }
    }

    /// Nullable variables and variables with a default may be left out,
    /// so both are `Option` and skipped when `None`.
    fn variables_struct(&self) -> TokenStream {
        let mut field_names = NameAllocator::default();
        let mut all_optional = true;
        let fields: Vec<TokenStream> = self
            .operation
            .variables
            .iter()
            .map(|variable| {
                let field_name = field_names.claim(&naming::field_name(&variable.name));
                let field_ident = naming::rust_ident(&field_name);
                let leaf = self.mapper.named_type(variable.type_ref.innermost_name());
                let mut ty = TypeMapper::wrapped(&variable.type_ref, &leaf);
                let optional = !variable.type_ref.is_non_null() || variable.default_value.is_some();
                if variable.type_ref.is_non_null() && optional {
                    ty = quote! { Option<#ty> };
                }
                all_optional &= optional;

                let rename = serde_rename(&field_ident, &variable.name);
                let skip = if optional {
                    quote! { #[serde(skip_serializing_if = "Option::is_none")] }
                } else {
                    TokenStream::new()
                };
                quote! {
                    #rename
                    #skip
                    pub #field_ident: #ty
                }
            })
            .collect();

        let default = if all_optional {
            quote! { Default, }
        } else {
            TokenStream::new()
        };
        quote! {
            #[derive(Clone, Debug, #default serde::Serialize)]
            pub struct Variables {
                #(#fields,)*
            }
        }
    }

    /// Emits the struct for `selection` and, after it, one struct per
    /// composite field, named by the path of response keys leading to it.
    fn selection_struct(
        &mut self,
        struct_name: &str,
        path: &str,
        selection: &BoundSelectionSet,
        out: &mut Vec<TokenStream>,
    ) {
        let struct_ident = naming::rust_ident(struct_name);
        let mut field_names = NameAllocator::default();
        let mut nested = Vec::new();
        let mut fields = Vec::with_capacity(selection.fields.len());

        for field in &selection.fields {
            let field_name = field_names.claim(&naming::field_name(&field.response_key));
            let field_ident = naming::rust_ident(&field_name);
            let leaf = match &field.selection {
                Some(sub_selection) => {
                    let sub_path = if path.is_empty() {
                        field.response_key.clone()
                    } else {
                        format!("{path}_{}", field.response_key)
                    };
                    let sub_name = self.type_names.claim(&naming::pascal_name(&sub_path));
                    let sub_ident = naming::rust_ident(&sub_name);
                    nested.push((sub_name, sub_path, sub_selection));
                    quote! { #sub_ident }
                },
                None => self.mapper.named_type(field.type_ref.innermost_name()),
            };

            let mut ty = TypeMapper::wrapped(&field.type_ref, &leaf);
            if field.conditional && field.type_ref.is_non_null() {
                ty = quote! { Option<#ty> };
            }
            let default = if field.conditional {
                quote! { #[serde(default)] }
            } else {
                TokenStream::new()
            };
            let rename = serde_rename(&field_ident, &field.response_key);
            fields.push(quote! {
                #rename
                #default
                pub #field_ident: #ty
            });
        }

        let doc = format!(" Selection on `{}`.", selection.type_name);
        out.push(quote! {
            #[doc = #doc]
            #[derive(Clone, Debug, serde::Deserialize)]
            pub struct #struct_ident {
                #(#fields,)*
            }
        });
        for (sub_name, sub_path, sub_selection) in nested {
            self.selection_struct(&sub_name, &sub_path, sub_selection, out);
        }
    }
}
