//! Schema types to Rust types.

use crate::CodegenError;
use crate::CodegenOptions;
use crate::CustomScalarFormat;
use crate::emitter::naming;
use crate::schema::SchemaDocument;
use crate::schema::TypeDefinition;
use crate::schema::TypeRef;
use proc_macro2::TokenStream;
use quote::ToTokens;
use quote::quote;
use std::collections::BTreeMap;

/// Resolves the Rust type of every named schema type. Scalar overrides and
/// the custom scalar format are checked once, up front.
#[derive(Debug)]
pub(crate) struct TypeMapper<'a> {
    schema: &'a SchemaDocument,
    scalars: BTreeMap<String, ScalarMapping>,
}

#[derive(Clone, Debug)]
enum ScalarMapping {
    /// A Rust type written out in full: a primitive or an override.
    Direct(TokenStream),

    /// A custom scalar referred to by an alias the shared section declares.
    Alias,

    /// A custom scalar referred to by a name the user's code provides.
    Passthrough(syn::Ident),
}

impl<'a> TypeMapper<'a> {
    pub(crate) fn new(schema: &'a SchemaDocument, options: &CodegenOptions) -> crate::Result<Self> {
        let mut scalars = BTreeMap::new();
        for type_def in schema.types().values() {
            let TypeDefinition::Scalar(scalar) = type_def else {
                continue;
            };
            let mapping = match options.scalar_overrides.get(&scalar.name) {
                Some(rust_type) => ScalarMapping::Direct(parse_override(&scalar.name, rust_type)?),
                None => default_scalar_mapping(&scalar.name, &options.custom_scalar_format)?,
            };
            scalars.insert(scalar.name.clone(), mapping);
        }
        for (name, rust_type) in &options.scalar_overrides {
            if !scalars.contains_key(name) {
                tracing::warn!("scalar override for `{name}` matches no scalar in the schema");
                parse_override(name, rust_type)?;
            }
        }
        Ok(Self { schema, scalars })
    }

    /// The Rust type for the named schema type, with no wrappers applied.
    pub(crate) fn named_type(&self, name: &str) -> TokenStream {
        match self.scalars.get(name) {
            Some(ScalarMapping::Direct(tokens)) => tokens.clone(),
            Some(ScalarMapping::Passthrough(ident)) => ident.to_token_stream(),
            Some(ScalarMapping::Alias) | None => naming::type_ident(name).to_token_stream(),
        }
    }

    /// Custom scalars that get a `pub type Name = String;` alias.
    pub(crate) fn needs_alias(&self, name: &str) -> bool {
        matches!(self.scalars.get(name), Some(ScalarMapping::Alias))
    }

    /// The full Rust type for `type_ref` with `leaf` standing in for its
    /// named type. Nullable wrappers become `Option`, lists `Vec`.
    pub(crate) fn wrapped(type_ref: &TypeRef, leaf: &TokenStream) -> TokenStream {
        match type_ref {
            TypeRef::NonNull(inner) => Self::non_null(inner, leaf),
            nullable => {
                let inner = Self::non_null(nullable, leaf);
                quote! { Option<#inner> }
            },
        }
    }

    fn non_null(type_ref: &TypeRef, leaf: &TokenStream) -> TokenStream {
        match type_ref {
            TypeRef::NonNull(inner) => Self::non_null(inner, leaf),
            TypeRef::List(item) => {
                let item = Self::wrapped(item, leaf);
                quote! { Vec<#item> }
            },
            TypeRef::Named(_) => leaf.clone(),
        }
    }

    pub(crate) fn schema(&self) -> &'a SchemaDocument {
        self.schema
    }
}

fn default_scalar_mapping(name: &str, format: &CustomScalarFormat) -> crate::Result<ScalarMapping> {
    let primitive = match name {
        "Int" => Some(quote! { i32 }),
        "Float" => Some(quote! { f64 }),
        "String" | "ID" => Some(quote! { String }),
        "Boolean" => Some(quote! { bool }),
        _ => None,
    };
    if let Some(primitive) = primitive {
        return Ok(ScalarMapping::Direct(primitive));
    }

    let passthrough_name = match format {
        CustomScalarFormat::None => return Ok(ScalarMapping::Alias),
        CustomScalarFormat::Passthrough => name.to_string(),
        CustomScalarFormat::PassthroughWithPrefix(prefix) => format!("{prefix}{name}"),
    };
    let ident = syn::parse_str::<syn::Ident>(&passthrough_name).map_err(|err| {
        CodegenError::InvalidScalarOverride {
            scalar_name: name.to_string(),
            rust_type: passthrough_name.clone(),
            message: err.to_string(),
        }
    })?;
    Ok(ScalarMapping::Passthrough(ident))
}

fn parse_override(scalar_name: &str, rust_type: &str) -> crate::Result<TokenStream> {
    syn::parse_str::<syn::Type>(rust_type)
        .map(|ty| ty.to_token_stream())
        .map_err(|err| CodegenError::InvalidScalarOverride {
            scalar_name: scalar_name.to_string(),
            rust_type: rust_type.to_string(),
            message: err.to_string(),
        })
}
