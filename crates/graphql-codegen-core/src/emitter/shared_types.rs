//! The part of the output every operation module shares: the operation
//! trait, request and response envelopes, and the schema enums, input
//! objects and scalar aliases the operations use.

use crate::emitter::naming;
use crate::emitter::naming::NameAllocator;
use crate::emitter::type_mapping::TypeMapper;
use crate::operation::BoundOperation;
use crate::operation::BoundSelectionSet;
use crate::schema::EnumType;
use crate::schema::InputObjectType;
use crate::schema::SchemaDocument;
use crate::schema::TypeDefinition;
use crate::schema::TypeRef;
use proc_macro2::Ident;
use proc_macro2::TokenStream;
use quote::quote;
use std::collections::BTreeSet;
use std::collections::HashSet;

/// Names the shared section always declares.
pub(crate) const ENVELOPE_NAMES: [&str; 5] = [
    "GraphQLError",
    "GraphQLErrorLocation",
    "GraphQLOperation",
    "GraphQLRequest",
    "GraphQLResponse",
];

/// Schema types some operation refers to, by kind, sorted by name.
#[derive(Debug, Default)]
pub(crate) struct SharedTypes {
    enums: BTreeSet<String>,
    inputs: BTreeSet<String>,
    scalars: BTreeSet<String>,
}

impl SharedTypes {
    pub(crate) fn collect(schema: &SchemaDocument, operations: &[&BoundOperation]) -> Self {
        let mut shared = Self::default();
        for operation in operations {
            for variable in &operation.variables {
                shared.visit(schema, variable.type_ref.innermost_name());
            }
            shared.visit_selection(schema, &operation.selection);
        }
        shared
    }

    fn visit_selection(&mut self, schema: &SchemaDocument, selection: &BoundSelectionSet) {
        for field in &selection.fields {
            match &field.selection {
                Some(nested) => self.visit_selection(schema, nested),
                None => self.visit(schema, field.type_ref.innermost_name()),
            }
        }
    }

    /// Records a leaf or input type, following input object fields.
    fn visit(&mut self, schema: &SchemaDocument, type_name: &str) {
        match schema.type_(type_name) {
            Some(TypeDefinition::Enum(_)) => {
                self.enums.insert(type_name.to_string());
            },
            Some(TypeDefinition::Scalar(scalar)) if !scalar.is_builtin() => {
                self.scalars.insert(type_name.to_string());
            },
            Some(TypeDefinition::Input(input)) => {
                if self.inputs.insert(type_name.to_string()) {
                    for field in input.fields.values() {
                        self.visit(schema, field.type_ref.innermost_name());
                    }
                }
            },
            _ => (),
        }
    }

    /// Every Rust type name the shared section declares.
    pub(crate) fn declared_names(&self) -> Vec<String> {
        let mut names: Vec<String> = ENVELOPE_NAMES.iter().map(|name| name.to_string()).collect();
        for name in self.enums.iter().chain(&self.inputs).chain(&self.scalars) {
            names.push(naming::type_ident(name).to_string());
        }
        names
    }

    pub(crate) fn shared_items(
        &self,
        mapper: &TypeMapper<'_>,
        omit_deprecated_enum_cases: bool,
    ) -> TokenStream {
        let schema = mapper.schema();
        let envelope = envelope_items();
        let aliases = self
            .scalars
            .iter()
            .filter(|name| mapper.needs_alias(name))
            .map(|name| scalar_alias(schema, name));
        let enums = self
            .enums
            .iter()
            .filter_map(|name| schema.type_(name)?.as_enum())
            .map(|enum_type| enum_item(enum_type, omit_deprecated_enum_cases));
        let inputs = self
            .inputs
            .iter()
            .filter_map(|name| schema.type_(name)?.as_input())
            .map(|input| input_item(mapper, input));

        quote! {
            #envelope
            #(#aliases)*
            #(#enums)*
            #(#inputs)*
        }
    }
}

fn envelope_items() -> TokenStream {
    quote! {
        /// An operation with typed variables and response data.
        pub trait GraphQLOperation {
            type Variables: serde::Serialize;
            type ResponseData: serde::de::DeserializeOwned;

            const OPERATION_NAME: &'static str;
            const OPERATION_DOCUMENT: &'static str;
            const OPERATION_ID: &'static str;

            fn build_request(variables: Self::Variables) -> GraphQLRequest<Self::Variables> {
                GraphQLRequest {
                    query: Self::OPERATION_DOCUMENT,
                    operation_name: Self::OPERATION_NAME,
                    variables,
                }
            }
        }

        /// The JSON body of a GraphQL request.
        #[derive(Clone, Debug, serde::Serialize)]
        pub struct GraphQLRequest<V> {
            pub query: &'static str,
            #[serde(rename = "operationName")]
            pub operation_name: &'static str,
            pub variables: V,
        }

        #[derive(Clone, Debug, serde::Deserialize)]
        pub struct GraphQLResponse<D> {
            pub data: Option<D>,
            #[serde(default)]
            pub errors: Vec<GraphQLError>,
        }

        #[derive(Clone, Debug, serde::Deserialize)]
        pub struct GraphQLError {
            pub message: String,
            #[serde(default)]
            pub locations: Vec<GraphQLErrorLocation>,
        }

        #[derive(Clone, Copy, Debug, serde::Deserialize)]
        pub struct GraphQLErrorLocation {
            pub line: u32,
            pub column: u32,
        }
    }
}

fn scalar_alias(schema: &SchemaDocument, name: &str) -> TokenStream {
    let ident = naming::type_ident(name);
    let doc = doc_attr(schema.type_(name).and_then(TypeDefinition::description));
    quote! {
        #doc
        pub type #ident = String;
    }
}

fn enum_item(enum_type: &EnumType, omit_deprecated: bool) -> TokenStream {
    let ident = naming::type_ident(&enum_type.name);
    let doc = doc_attr(enum_type.description.as_deref());

    let mut variant_names = NameAllocator::default();
    let variants: Vec<TokenStream> = enum_type
        .values
        .iter()
        .filter(|value| !(omit_deprecated && value.deprecation.is_deprecated()))
        .map(|value| {
            let variant_name = variant_names.claim(&naming::pascal_name(&value.name));
            let variant = naming::rust_ident(&variant_name);
            let doc = doc_attr(value.description.as_deref());
            let wire_name = &value.name;
            quote! {
                #doc
                #[serde(rename = #wire_name)]
                #variant
            }
        })
        .collect();
    let unknown = naming::rust_ident(&variant_names.claim("Unknown"));

    quote! {
        #doc
        #[derive(Clone, Copy, Debug, Eq, Hash, PartialEq, serde::Deserialize, serde::Serialize)]
        pub enum #ident {
            #(#variants,)*
            /// A value added to the schema after this code was generated.
            #[serde(other)]
            #unknown,
        }
    }
}

fn input_item(mapper: &TypeMapper<'_>, input: &InputObjectType) -> TokenStream {
    let ident = naming::type_ident(&input.name);
    let doc = doc_attr(input.description.as_deref());

    let mut field_names = NameAllocator::default();
    let fields = input.fields.values().map(|field| {
        let rust_name = field_names.claim(&naming::field_name(&field.name));
        let field_ident = naming::rust_ident(&rust_name);
        let mut leaf = mapper.named_type(field.type_ref.innermost_name());
        if needs_box(mapper.schema(), &input.name, &field.type_ref) {
            leaf = quote! { Box<#leaf> };
        }
        let ty = TypeMapper::wrapped(&field.type_ref, &leaf);
        let doc = doc_attr(field.description.as_deref());
        let rename = serde_rename(&field_ident, &field.name);
        let skip = if field.type_ref.is_non_null() {
            TokenStream::new()
        } else {
            quote! { #[serde(skip_serializing_if = "Option::is_none")] }
        };
        quote! {
            #doc
            #rename
            #skip
            pub #field_ident: #ty
        }
    });

    quote! {
        #doc
        #[derive(Clone, Debug, serde::Serialize)]
        pub struct #ident {
            #(#fields,)*
        }
    }
}

/// A field needs a `Box` when it holds an input object that leads back to
/// `owner` without passing through a list: the struct would otherwise
/// contain itself.
fn needs_box(schema: &SchemaDocument, owner: &str, type_ref: &TypeRef) -> bool {
    if has_list(type_ref) {
        return false;
    }
    let target = type_ref.innermost_name();
    let mut visited = HashSet::new();
    reaches_inline(schema, target, owner, &mut visited)
}

fn reaches_inline<'s>(
    schema: &'s SchemaDocument,
    from: &'s str,
    to: &str,
    visited: &mut HashSet<&'s str>,
) -> bool {
    if from == to {
        return true;
    }
    if !visited.insert(from) {
        return false;
    }
    let Some(input) = schema.type_(from).and_then(TypeDefinition::as_input) else {
        return false;
    };
    input
        .fields
        .values()
        .filter(|field| !has_list(&field.type_ref))
        .any(|field| reaches_inline(schema, field.type_ref.innermost_name(), to, visited))
}

fn has_list(type_ref: &TypeRef) -> bool {
    match type_ref {
        TypeRef::Named(_) => false,
        TypeRef::List(_) => true,
        TypeRef::NonNull(inner) => has_list(inner),
    }
}

pub(crate) fn doc_attr(description: Option<&str>) -> TokenStream {
    match description.map(str::trim).filter(|text| !text.is_empty()) {
        Some(text) => {
            let text = format!(" {}", text.replace('\n', "\n "));
            quote! { #[doc = #text] }
        },
        None => TokenStream::new(),
    }
}

/// `#[serde(rename = "...")]` when the Rust name differs from the wire name.
/// Serde strips the `r#` of raw identifiers itself.
pub(crate) fn serde_rename(ident: &Ident, wire_name: &str) -> TokenStream {
    let rust_name = ident.to_string();
    if rust_name.strip_prefix("r#").unwrap_or(&rust_name) == wire_name {
        TokenStream::new()
    } else {
        quote! { #[serde(rename = #wire_name)] }
    }
}
