use crate::SourcePosition;
use std::path::Path;
use std::path::PathBuf;
use std::sync::Arc;

/// A half-open range of source text, optionally tied to the file it came
/// from.
///
/// The file path is reference counted: every token of a document carries
/// the same path, so cloning a span must stay cheap.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct GraphQLSourceSpan {
    pub start_inclusive: SourcePosition,
    pub end_exclusive: SourcePosition,
    pub file_path: Option<Arc<PathBuf>>,
}

impl GraphQLSourceSpan {
    pub fn new(start: SourcePosition, end: SourcePosition) -> Self {
        Self {
            start_inclusive: start,
            end_exclusive: end,
            file_path: None,
        }
    }

    pub fn with_file(
        start: SourcePosition,
        end: SourcePosition,
        file_path: Arc<PathBuf>,
    ) -> Self {
        Self {
            start_inclusive: start,
            end_exclusive: end,
            file_path: Some(file_path),
        }
    }

    pub fn file_path(&self) -> Option<&Path> {
        self.file_path.as_deref().map(PathBuf::as_path)
    }

    /// The source text covered by this span.
    ///
    /// Returns `None` if the span does not describe a valid range of
    /// `source` (e.g. the span came from a different document).
    pub fn slice<'a>(&self, source: &'a str) -> Option<&'a str> {
        source.get(
            self.start_inclusive.byte_offset()..self.end_exclusive.byte_offset()
        )
    }
}

impl std::fmt::Display for GraphQLSourceSpan {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self.file_path() {
            Some(path) => write!(f, "{}:{}", path.display(), self.start_inclusive),
            None => write!(f, "{}", self.start_inclusive),
        }
    }
}
