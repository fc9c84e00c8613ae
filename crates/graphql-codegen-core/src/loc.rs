use graphql_codegen_parser::GraphQLSourceSpan;
use std::path::Path;
use std::path::PathBuf;

/// Where a definition or reference lives: file plus 1-based line and
/// column.
#[derive(Clone, Debug, Eq, Hash, PartialEq)]
pub struct SourceLocation {
    pub file_path: Option<PathBuf>,
    pub line: usize,
    pub column: usize,
}

impl SourceLocation {
    pub fn new(file_path: Option<PathBuf>, line: usize, column: usize) -> Self {
        Self {
            file_path,
            line,
            column,
        }
    }

    pub fn from_span(span: &GraphQLSourceSpan) -> Self {
        Self {
            file_path: span.file_path().map(Path::to_path_buf),
            line: span.start_inclusive.display_line(),
            column: span.start_inclusive.display_col(),
        }
    }
}

impl std::fmt::Display for SourceLocation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match &self.file_path {
            Some(path) => write!(f, "{}:{}:{}", path.display(), self.line, self.column),
            None => write!(f, "<input>:{}:{}", self.line, self.column),
        }
    }
}
