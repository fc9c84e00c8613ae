//! The schema model, its introspection JSON contract, and loading plus
//! validation of persisted schemas.

mod field_definition;
pub mod introspection;
mod schema_document;
mod schema_loader;
mod schema_validator;
mod type_definition;
mod type_ref;

pub use field_definition::Deprecation;
pub use field_definition::EnumValueDefinition;
pub use field_definition::FieldDefinition;
pub use field_definition::InputValueDefinition;
pub use schema_document::DirectiveDefinition;
pub use schema_document::SchemaDocument;
pub use schema_loader::load_schema_file;
use schema_validator::SchemaValidator;
pub use type_definition::BUILTIN_SCALARS;
pub use type_definition::EnumType;
pub use type_definition::InputObjectType;
pub use type_definition::InterfaceType;
pub use type_definition::ObjectType;
pub use type_definition::ScalarType;
pub use type_definition::TypeDefinition;
pub use type_definition::UnionType;
pub use type_ref::TypeRef;

#[cfg(test)]
mod tests;
