/// A position within a GraphQL source text.
///
/// Lexers compute these values as they scan; there are no mutation methods.
///
/// # Indexing Convention
///
/// Stored values are 0-based:
/// - `line`: 0 = first line of the document
/// - `col`: character count (not bytes) within the current line
/// - `byte_offset`: byte offset within the whole document
///
/// Use [`SourcePosition::display_line()`] and
/// [`SourcePosition::display_col()`] for the 1-based numbers shown to users.
#[derive(Clone, Copy, Debug, Default, Eq, Hash, PartialEq)]
pub struct SourcePosition {
    line: usize,
    col: usize,
    byte_offset: usize,
}

impl SourcePosition {
    pub fn new(line: usize, col: usize, byte_offset: usize) -> Self {
        Self {
            line,
            col,
            byte_offset,
        }
    }

    /// Returns the 0-based line number.
    pub fn line(&self) -> usize {
        self.line
    }

    /// Returns the 0-based character column within the current line.
    ///
    /// Both 'a' (1 byte) and '🎉' (4 bytes) advance this by 1.
    pub fn col(&self) -> usize {
        self.col
    }

    /// Returns the 0-based byte offset from the start of the document.
    pub fn byte_offset(&self) -> usize {
        self.byte_offset
    }

    /// 1-based line number, as editors and compilers print it.
    pub fn display_line(&self) -> usize {
        self.line + 1
    }

    /// 1-based column number, as editors and compilers print it.
    pub fn display_col(&self) -> usize {
        self.col + 1
    }
}

impl std::fmt::Display for SourcePosition {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}:{}", self.display_line(), self.display_col())
    }
}
