//! Core token types produced by the lexer and consumed by the parser.

mod cook_string;
mod graphql_token;
mod graphql_token_kind;

pub use cook_string::cook_block_string;
pub use cook_string::cook_string;
pub use cook_string::GraphQLStringParsingError;
pub use graphql_token::GraphQLToken;
pub use graphql_token_kind::GraphQLTokenKind;
