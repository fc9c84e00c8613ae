//! Operation documents, the fragment registry, and binding of operations
//! against a schema.

mod binder;
mod bound_operation;
mod fragment_registry;
mod operation_document;

pub use binder::Binder;
pub use bound_operation::BoundField;
pub use bound_operation::BoundOperation;
pub use bound_operation::BoundSelectionSet;
pub use bound_operation::BoundVariable;
pub use fragment_registry::FragmentRegistry;
pub use operation_document::OperationDocument;
pub use operation_document::OperationDocumentKind;

#[cfg(test)]
mod tests;
