use crate::token::GraphQLToken;

/// Marker trait for lexers: finite iterators of [`GraphQLToken`]s.
///
/// A token source skips ignored tokens (whitespace, commas, comments),
/// reports lexical problems as
/// [`GraphQLTokenKind::Error`](crate::token::GraphQLTokenKind::Error) tokens
/// instead of stopping, and always ends with exactly one
/// [`GraphQLTokenKind::Eof`](crate::token::GraphQLTokenKind::Eof) token.
///
/// Buffering and lookahead live in
/// [`GraphQLTokenStream`](crate::GraphQLTokenStream), not in the source.
pub trait GraphQLTokenSource<'src>: Iterator<Item = GraphQLToken<'src>> {}

impl<'src, T> GraphQLTokenSource<'src> for T where T: Iterator<Item = GraphQLToken<'src>> {}
