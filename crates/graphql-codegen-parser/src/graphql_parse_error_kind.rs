use crate::token::GraphQLStringParsingError;

/// Machine-readable category of a [`GraphQLParseError`](crate::GraphQLParseError).
///
/// The human-readable text lives in the error's message; these variants
/// carry only what a caller needs to branch on.
#[derive(Clone, Debug, PartialEq, thiserror::Error)]
pub enum GraphQLParseErrorKind {
    #[error("unexpected token: `{found}`")]
    UnexpectedToken {
        expected: Vec<String>,
        found: String,
    },

    #[error("unexpected end of input")]
    UnexpectedEof { expected: Vec<String> },

    /// The lexer produced an error token; its message is the error message.
    #[error("lexer error")]
    LexerError,

    /// End of input reached while a `{`, `[` or `(` was still open.
    #[error("unclosed delimiter: `{delimiter}`")]
    UnclosedDelimiter { delimiter: String },

    /// `{ }` or `()` where at least one item is required.
    #[error("invalid empty construct: `{construct}`")]
    InvalidEmptyConstruct { construct: String },

    /// A name used where the grammar forbids it (`fragment on on T`).
    #[error("reserved name: `{name}`")]
    ReservedName { name: String },

    /// A type-system definition (`type`, `schema`, `directive`, ...) in a
    /// document that may only hold operations and fragments.
    #[error("`{keyword}` definitions are not allowed in operation documents")]
    TypeSystemDefinition { keyword: String },

    #[error("invalid string literal: {0}")]
    InvalidString(GraphQLStringParsingError),

    /// A number literal that does not fit its type (`Int` is 32-bit, `Float`
    /// must be finite).
    #[error("invalid value: `{raw}`")]
    InvalidValue { raw: String },

    /// A variable reference where only constants are allowed.
    #[error("variable not allowed here")]
    VariableInConstContext,

    /// Selection sets, lists or objects nested deeper than the parser allows.
    #[error("maximum nesting depth exceeded")]
    NestingTooDeep,
}
