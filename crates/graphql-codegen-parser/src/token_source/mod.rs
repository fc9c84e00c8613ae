//! Lexers that turn GraphQL source text into [`GraphQLToken`]s.
//!
//! [`GraphQLToken`]: crate::token::GraphQLToken

mod graphql_token_source;
mod str_to_graphql_token_source;

pub use graphql_token_source::GraphQLTokenSource;
pub use str_to_graphql_token_source::StrGraphQLTokenSource;
