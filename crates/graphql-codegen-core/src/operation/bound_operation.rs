use crate::loc::SourceLocation;
use crate::schema::TypeRef;
use graphql_codegen_parser::ast::OperationKind;
use graphql_codegen_parser::ast::Value;

/// An operation after binding: every field resolved against the schema,
/// fragments flattened away.
#[derive(Clone, Debug, PartialEq)]
pub struct BoundOperation {
    pub name: String,
    pub kind: OperationKind,
    pub root_type: String,
    pub variables: Vec<BoundVariable>,
    pub selection: BoundSelectionSet,

    /// The operation text followed by every fragment it uses, sorted by
    /// name: exactly what is sent to the server.
    pub document: String,

    /// Names of the fragments included in `document`.
    pub fragment_names: Vec<String>,
    pub location: SourceLocation,
}

#[derive(Clone, Debug, PartialEq)]
pub struct BoundVariable {
    pub name: String,
    pub type_ref: TypeRef,
    pub default_value: Option<Value>,
}

/// The fields selected on one type, merged by response key, in first
/// occurrence order.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct BoundSelectionSet {
    pub type_name: String,
    pub fields: Vec<BoundField>,
}

#[derive(Clone, Debug, Eq, PartialEq)]
pub struct BoundField {
    pub response_key: String,
    pub field_name: String,
    pub type_ref: TypeRef,

    /// Present exactly when the field's type is composite.
    pub selection: Option<BoundSelectionSet>,

    /// The field is only in some responses: it came from a fragment that
    /// narrows to a more specific type, or it is guarded by `@skip` or
    /// `@include`.
    pub conditional: bool,
    pub location: SourceLocation,
}

impl BoundSelectionSet {
    pub fn field(&self, response_key: &str) -> Option<&BoundField> {
        self.fields
            .iter()
            .find(|field| field.response_key == response_key)
    }
}
