use crate::loc::SourceLocation;
use graphql_codegen_parser::ast;
use heck::ToUpperCamelCase;
use std::path::Path;

#[derive(Clone, Debug, Eq, PartialEq)]
pub enum OperationDocumentKind {
    Operation(ast::OperationKind),
    Fragment { type_condition: String },
}

/// One operation or fragment definition from an operation file.
#[derive(Clone, Debug, PartialEq)]
pub struct OperationDocument {
    /// Anonymous operations are named after their file.
    pub name: String,
    pub kind: OperationDocumentKind,
    pub variable_definitions: Vec<ast::VariableDefinition>,
    pub directives: Vec<ast::DirectiveAnnotation>,
    pub selection_set: ast::SelectionSet,

    /// The definition re-printed in normalized form (see
    /// [`graphql_codegen_parser::ast::printer`]).
    pub source_text: String,
    pub location: SourceLocation,
}

impl OperationDocument {
    /// Splits a parsed file into its definitions, in source order.
    pub fn from_document(file_path: &Path, document: ast::Document) -> Vec<OperationDocument> {
        let fallback_name = file_path
            .file_stem()
            .map(|stem| stem.to_string_lossy().to_upper_camel_case())
            .unwrap_or_default();

        document
            .definitions
            .into_iter()
            .map(|definition| match definition {
                ast::Definition::Operation(op) => Self::from_operation(op, &fallback_name),
                ast::Definition::Fragment(frag) => Self::from_fragment(frag),
            })
            .collect()
    }

    /// Anonymous operations are given their fallback name before printing,
    /// so the text sent to the server names the same operation as the
    /// request's `operationName`.
    fn from_operation(mut op: ast::OperationDefinition, fallback_name: &str) -> Self {
        if op.name.is_none() {
            op.name = Some(ast::Name::new(fallback_name, op.span.clone()));
            op.shorthand = false;
        }
        let source_text = op.to_string();
        let location = SourceLocation::from_span(&op.span);
        Self {
            name: op
                .name
                .map(|name| name.value)
                .unwrap_or_else(|| fallback_name.to_string()),
            kind: OperationDocumentKind::Operation(op.operation_kind),
            variable_definitions: op.variable_definitions,
            directives: op.directives,
            selection_set: op.selection_set,
            source_text,
            location,
        }
    }

    fn from_fragment(frag: ast::FragmentDefinition) -> Self {
        let source_text = frag.to_string();
        let location = SourceLocation::from_span(&frag.span);
        Self {
            name: frag.name.value,
            kind: OperationDocumentKind::Fragment {
                type_condition: frag.type_condition.value,
            },
            variable_definitions: Vec::new(),
            directives: frag.directives,
            selection_set: frag.selection_set,
            source_text,
            location,
        }
    }

    pub fn is_fragment(&self) -> bool {
        matches!(self.kind, OperationDocumentKind::Fragment { .. })
    }

    pub fn operation_kind(&self) -> Option<ast::OperationKind> {
        match self.kind {
            OperationDocumentKind::Operation(kind) => Some(kind),
            OperationDocumentKind::Fragment { .. } => None,
        }
    }

    pub fn type_condition(&self) -> Option<&str> {
        match &self.kind {
            OperationDocumentKind::Operation(_) => None,
            OperationDocumentKind::Fragment { type_condition } => Some(type_condition),
        }
    }
}
