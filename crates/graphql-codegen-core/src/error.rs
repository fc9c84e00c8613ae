use crate::loc::SourceLocation;
use graphql_codegen_parser::GraphQLParseError;
use graphql_codegen_parser::ast::OperationKind;
use std::path::PathBuf;

pub type Result<T> = std::result::Result<T, CodegenError>;

/// Every way a download or codegen run can fail. All of them end the run.
#[derive(Debug, thiserror::Error)]
pub enum CodegenError {
    /// The request never produced a response: connection refused, DNS
    /// failure, timeout.
    #[error("network error while contacting `{url}`: {message}")]
    NetworkError { url: String, message: String },

    /// The server answered, but not with an introspection result.
    #[error("{}", format_fetch_error(.url, .status, .message))]
    SchemaFetchError {
        url: String,
        status: Option<u16>,
        message: String,
    },

    /// The schema text is unreadable or is not the expected JSON shape.
    #[error("could not parse schema from {source_name}: {message}")]
    SchemaParseError {
        source_name: String,
        message: String,
    },

    #[error("invalid schema: {0}")]
    SchemaValidationError(#[from] SchemaValidationError),

    /// Every syntax error of every operation file.
    #[error("{}", format_syntax_errors(.0))]
    SyntaxErrors(Vec<SyntaxError>),

    #[error("{location}: type `{type_name}` has no field `{field_name}`")]
    UnknownFieldError {
        type_name: String,
        field_name: String,
        location: SourceLocation,
    },

    #[error("{location}: unknown type `{type_name}`")]
    UnknownTypeError {
        type_name: String,
        location: SourceLocation,
    },

    #[error("{location}: unknown fragment `{fragment_name}`")]
    UnknownFragment {
        fragment_name: String,
        location: SourceLocation,
    },

    #[error("fragment cycle: {}", .cycle_path.join(" -> "))]
    FragmentCycleError { cycle_path: Vec<String> },

    #[error("{second_location}: `{name}` is already defined at {first_location}")]
    DuplicateDefinition {
        name: String,
        first_location: SourceLocation,
        second_location: SourceLocation,
    },

    /// Sub-fields on a leaf, a missing sub-selection on a composite type, a
    /// fragment that can never match, or a value of the wrong kind.
    #[error("{location}: {message}")]
    InvalidSelection {
        message: String,
        location: SourceLocation,
    },

    #[error("{location}: schema has no {operation_kind} root type for `{operation_name}`")]
    MissingRootType {
        operation_name: String,
        operation_kind: OperationKind,
        location: SourceLocation,
    },

    #[error("could not read operation file `{}`: {message}", path.display())]
    OperationFileError { path: PathBuf, message: String },

    /// A `--scalar` mapping whose right-hand side is not a Rust type.
    #[error("scalar override `{scalar_name}={rust_type}` is not a valid Rust type: {message}")]
    InvalidScalarOverride {
        scalar_name: String,
        rust_type: String,
        message: String,
    },

    /// The emitted tokens did not parse back as a Rust file.
    #[error("generated code for `{}` is not valid Rust: {message}", path.display())]
    GeneratedCodeError { path: PathBuf, message: String },

    #[error("could not write `{}`: {source}", path.display())]
    EmissionIOError {
        path: PathBuf,
        source: std::io::Error,
    },
}

fn format_fetch_error(url: &str, status: &Option<u16>, message: &str) -> String {
    match status {
        Some(status) => format!("schema fetch from `{url}` failed with HTTP {status}: {message}"),
        None => format!("schema fetch from `{url}` failed: {message}"),
    }
}

fn format_syntax_errors(errors: &[SyntaxError]) -> String {
    let lines: Vec<String> = errors.iter().map(SyntaxError::to_string).collect();
    lines.join("\n")
}

/// One syntax error in one operation file.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct SyntaxError {
    pub file_path: PathBuf,
    pub line: usize,
    pub column: usize,
    pub message: String,
}

impl SyntaxError {
    pub fn from_parse_error(file_path: PathBuf, error: &GraphQLParseError) -> Self {
        Self {
            file_path,
            line: error.line(),
            column: error.column(),
            message: error.message().to_string(),
        }
    }
}

impl std::fmt::Display for SyntaxError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{}:{}:{}: {}",
            self.file_path.display(),
            self.line,
            self.column,
            self.message,
        )
    }
}

/// A structural problem with a schema, naming the offending type and field.
#[derive(Clone, Debug, Eq, PartialEq, thiserror::Error)]
pub enum SchemaValidationError {
    #[error("introspection result is missing `{0}`")]
    MissingIntrospectionField(String),

    #[error("malformed introspection result: {0}")]
    MalformedIntrospection(String),

    #[error("type `{0}` is defined more than once")]
    DuplicateTypeName(String),

    #[error("`{parent}` refers to undefined type `{type_name}`")]
    UndefinedTypeReference { parent: String, type_name: String },

    #[error("{kind} root type `{type_name}` is not defined")]
    UndefinedRootType { kind: OperationKind, type_name: String },

    #[error("{kind} root type `{type_name}` is not an object type")]
    RootTypeNotObject { kind: OperationKind, type_name: String },

    #[error("`{type_name}` defines `{member}` more than once")]
    DuplicateMember { type_name: String, member: String },

    #[error("`{parent}` uses `{type_name}` ({found}) where {expected} type is required")]
    WrongTypeKind {
        parent: String,
        type_name: String,
        expected: &'static str,
        found: &'static str,
    },

    #[error("type `{type_name}` has unsupported kind `{kind}`")]
    UnsupportedTypeKind { type_name: String, kind: String },
}
