//! Owned AST for GraphQL executable documents.
//!
//! Every node carries the [`GraphQLSourceSpan`](crate::GraphQLSourceSpan) it
//! was parsed from. `Display` on [`Document`] and on each definition prints
//! normalized GraphQL text (see [`printer`]).

mod executable_defs;
mod name;
pub mod printer;
mod type_annotation;
mod values;

pub use executable_defs::Argument;
pub use executable_defs::Definition;
pub use executable_defs::DirectiveAnnotation;
pub use executable_defs::Document;
pub use executable_defs::Field;
pub use executable_defs::FragmentDefinition;
pub use executable_defs::FragmentSpread;
pub use executable_defs::InlineFragment;
pub use executable_defs::OperationDefinition;
pub use executable_defs::OperationKind;
pub use executable_defs::Selection;
pub use executable_defs::SelectionSet;
pub use executable_defs::VariableDefinition;
pub use name::Name;
pub use type_annotation::TypeAnnotation;
pub use values::ObjectField;
pub use values::Value;
