//! Shared helpers for the parser tests.

use crate::ast;
use crate::token::GraphQLToken;
use crate::token::GraphQLTokenKind;
use crate::token_source::StrGraphQLTokenSource;
use crate::GraphQLParseError;
use crate::GraphQLParser;
use crate::GraphQLSourceSpan;
use crate::SourcePosition;

pub fn mock_token(kind: GraphQLTokenKind<'static>) -> GraphQLToken<'static> {
    let pos = SourcePosition::default();
    GraphQLToken::new(kind, GraphQLSourceSpan::new(pos, pos))
}

pub fn mock_name_token(name: &str) -> GraphQLToken<'static> {
    mock_token(GraphQLTokenKind::name_owned(name.to_string()))
}

/// Yields a fixed list of tokens.
pub struct MockTokenSource {
    tokens: std::vec::IntoIter<GraphQLToken<'static>>,
}

impl MockTokenSource {
    pub fn new(tokens: Vec<GraphQLToken<'static>>) -> Self {
        Self {
            tokens: tokens.into_iter(),
        }
    }
}

impl Iterator for MockTokenSource {
    type Item = GraphQLToken<'static>;

    fn next(&mut self) -> Option<Self::Item> {
        self.tokens.next()
    }
}

pub fn token_kinds(source: &str) -> Vec<GraphQLTokenKind<'_>> {
    StrGraphQLTokenSource::new(source)
        .map(|token| token.kind)
        .collect()
}

/// Parses `source`, panicking with the errors if there are any.
pub fn parse_ok(source: &str) -> ast::Document {
    match GraphQLParser::new(source).parse_executable_document().into_result() {
        Ok(document) => document,
        Err(errors) => panic!("unexpected parse errors: {errors:#?}"),
    }
}

/// Parses `source`, returning its errors; panics if there are none.
pub fn parse_errors(source: &str) -> Vec<GraphQLParseError> {
    let result = GraphQLParser::new(source).parse_executable_document();
    assert!(result.has_errors(), "expected parse errors for:\n{source}");
    result.errors
}

pub fn only_operation(document: &ast::Document) -> &ast::OperationDefinition {
    let operations: Vec<_> = document.operations().collect();
    assert_eq!(operations.len(), 1, "expected exactly one operation");
    operations[0]
}

pub fn field_at(set: &ast::SelectionSet, idx: usize) -> &ast::Field {
    match &set.selections[idx] {
        ast::Selection::Field(field) => field,
        other => panic!("expected a field at {idx}, found {other:?}"),
    }
}
