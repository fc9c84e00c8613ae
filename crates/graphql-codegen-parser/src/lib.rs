//! Tokenizer and recursive-descent parser for GraphQL executable documents
//! (operations and fragments).
//!
//! Parsing never stops at the first problem: lexical errors travel through
//! the token stream as error tokens, the parser recovers at the next
//! selection or definition, and [`ParseResult`] carries every error found
//! together with the recovered AST.

pub mod ast;
mod graphql_parse_error;
mod graphql_parse_error_kind;
mod graphql_parser;
mod graphql_source_span;
mod graphql_token_stream;
mod parse_result;
mod source_position;
pub mod token;
pub mod token_source;

pub use graphql_parse_error::GraphQLParseError;
pub use graphql_parse_error_kind::GraphQLParseErrorKind;
pub use graphql_parser::GraphQLParser;
pub use graphql_source_span::GraphQLSourceSpan;
pub use graphql_token_stream::GraphQLTokenStream;
pub use parse_result::ParseResult;
pub use source_position::SourcePosition;

#[cfg(test)]
mod tests;
