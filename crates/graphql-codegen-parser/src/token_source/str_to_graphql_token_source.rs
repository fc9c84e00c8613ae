//! A [`GraphQLTokenSource`](crate::token_source::GraphQLTokenSource) that
//! lexes a `&str`.
//!
//! Token values borrow from the source (`Cow::Borrowed`). Lexing is lazy:
//! each call to `next()` scans exactly one token.
//!
//! ```rust
//! use graphql_codegen_parser::token::GraphQLTokenKind;
//! use graphql_codegen_parser::token_source::StrGraphQLTokenSource;
//!
//! let kinds: Vec<_> = StrGraphQLTokenSource::new("{ name }")
//!     .map(|token| token.kind)
//!     .collect();
//! assert_eq!(kinds.len(), 4);
//! assert_eq!(kinds[3], GraphQLTokenKind::Eof);
//! ```

use crate::token::GraphQLToken;
use crate::token::GraphQLTokenKind;
use crate::GraphQLSourceSpan;
use crate::SourcePosition;
use std::path::PathBuf;
use std::sync::Arc;

pub struct StrGraphQLTokenSource<'src> {
    source: &'src str,

    /// The remaining text to lex is `&source[curr_byte_offset..]`.
    curr_byte_offset: usize,
    curr_line: usize,

    /// Counts characters, not bytes.
    curr_col: usize,

    /// Set after a `\r` so that a following `\n` does not count as a second
    /// line break.
    last_char_was_cr: bool,

    /// Set once `Eof` has been emitted.
    finished: bool,

    file_path: Option<Arc<PathBuf>>,
}

impl<'src> StrGraphQLTokenSource<'src> {
    pub fn new(source: &'src str) -> Self {
        Self {
            source,
            curr_byte_offset: 0,
            curr_line: 0,
            curr_col: 0,
            last_char_was_cr: false,
            finished: false,
            file_path: None,
        }
    }

    /// Creates a token source whose token spans all carry `file_path`.
    pub fn with_file_path(source: &'src str, file_path: Arc<PathBuf>) -> Self {
        Self {
            file_path: Some(file_path),
            ..Self::new(source)
        }
    }

    fn remaining(&self) -> &'src str {
        &self.source[self.curr_byte_offset..]
    }

    fn curr_position(&self) -> SourcePosition {
        SourcePosition::new(self.curr_line, self.curr_col, self.curr_byte_offset)
    }

    fn peek_char(&self) -> Option<char> {
        self.remaining().chars().next()
    }

    fn peek_char_nth(&self, n: usize) -> Option<char> {
        self.remaining().chars().nth(n)
    }

    /// Consumes one character, treating `\n`, `\r` and `\r\n` as a single
    /// line terminator each.
    fn consume(&mut self) -> Option<char> {
        let ch = self.peek_char()?;
        match ch {
            '\n' if self.last_char_was_cr => {
                self.last_char_was_cr = false;
            },
            '\n' | '\r' => {
                self.curr_line += 1;
                self.curr_col = 0;
                self.last_char_was_cr = ch == '\r';
            },
            _ => {
                self.curr_col += 1;
                self.last_char_was_cr = false;
            },
        }
        self.curr_byte_offset += ch.len_utf8();
        Some(ch)
    }

    fn consume_while(&mut self, pred: impl Fn(char) -> bool) {
        while self.peek_char().is_some_and(&pred) {
            self.consume();
        }
    }

    fn make_span(&self, start: SourcePosition) -> GraphQLSourceSpan {
        let end = self.curr_position();
        match &self.file_path {
            Some(path) => GraphQLSourceSpan::with_file(start, end, Arc::clone(path)),
            None => GraphQLSourceSpan::new(start, end),
        }
    }

    fn finish_token(
        &self,
        start: SourcePosition,
        kind: GraphQLTokenKind<'src>,
    ) -> GraphQLToken<'src> {
        GraphQLToken::new(kind, self.make_span(start))
    }

    fn punctuator(
        &mut self,
        start: SourcePosition,
        kind: GraphQLTokenKind<'src>,
    ) -> GraphQLToken<'src> {
        self.consume();
        self.finish_token(start, kind)
    }

    fn next_token(&mut self) -> GraphQLToken<'src> {
        self.skip_ignored();
        let start = self.curr_position();

        let Some(ch) = self.peek_char() else {
            return self.finish_token(start, GraphQLTokenKind::Eof);
        };

        match ch {
            '!' => self.punctuator(start, GraphQLTokenKind::Bang),
            '$' => self.punctuator(start, GraphQLTokenKind::Dollar),
            '&' => self.punctuator(start, GraphQLTokenKind::Ampersand),
            '(' => self.punctuator(start, GraphQLTokenKind::ParenOpen),
            ')' => self.punctuator(start, GraphQLTokenKind::ParenClose),
            ':' => self.punctuator(start, GraphQLTokenKind::Colon),
            '=' => self.punctuator(start, GraphQLTokenKind::Equals),
            '@' => self.punctuator(start, GraphQLTokenKind::At),
            '[' => self.punctuator(start, GraphQLTokenKind::SquareBracketOpen),
            ']' => self.punctuator(start, GraphQLTokenKind::SquareBracketClose),
            '{' => self.punctuator(start, GraphQLTokenKind::CurlyBraceOpen),
            '}' => self.punctuator(start, GraphQLTokenKind::CurlyBraceClose),
            '|' => self.punctuator(start, GraphQLTokenKind::Pipe),
            '.' => self.lex_ellipsis(start),
            '"' => self.lex_string(start),
            c if is_name_start(c) => self.lex_name(start),
            c if c == '-' || c.is_ascii_digit() => self.lex_number(start),
            c => {
                self.consume();
                let kind = GraphQLTokenKind::error(format!(
                    "Unexpected character {}",
                    describe_char(c),
                ));
                self.finish_token(start, kind)
            },
        }
    }

    /// Skips whitespace, line terminators, the BOM, commas and comments.
    fn skip_ignored(&mut self) {
        while let Some(ch) = self.peek_char() {
            match ch {
                ' ' | '\t' | '\n' | '\r' | ',' | '\u{FEFF}' => {
                    self.consume();
                },
                '#' => self.consume_while(|c| c != '\n' && c != '\r'),
                _ => break,
            }
        }
    }

    /// `...` must be written without gaps. One or two dots (possibly with
    /// spaces between them on the same line) become a single error token.
    fn lex_ellipsis(&mut self, start: SourcePosition) -> GraphQLToken<'src> {
        let line = self.curr_line;
        let mut dots = 0;
        let mut spaced = false;
        loop {
            self.consume();
            dots += 1;
            if dots == 3 {
                break;
            }
            let before_gap = self.curr_byte_offset;
            self.consume_while(|c| c == ' ' || c == '\t');
            if self.peek_char() != Some('.') || self.curr_line != line {
                break;
            }
            spaced |= self.curr_byte_offset != before_gap;
        }

        let kind = match (dots, spaced) {
            (3, false) => GraphQLTokenKind::Ellipsis,
            (1, _) => GraphQLTokenKind::error("Unexpected `.`"),
            (2, false) => GraphQLTokenKind::error_with_help(
                "Unexpected `..`",
                "add one more `.` to form the spread operator `...`",
            ),
            _ => GraphQLTokenKind::error_with_help(
                "Unexpected spaced dots",
                "remove the spacing between the dots to form a `...` spread",
            ),
        };
        self.finish_token(start, kind)
    }

    /// Names match `/[_A-Za-z][_0-9A-Za-z]*/`; `true`, `false` and `null`
    /// get their own token kinds.
    fn lex_name(&mut self, start: SourcePosition) -> GraphQLToken<'src> {
        let name_start = self.curr_byte_offset;
        self.consume_while(is_name_continue);
        let name = &self.source[name_start..self.curr_byte_offset];
        let kind = match name {
            "true" => GraphQLTokenKind::True,
            "false" => GraphQLTokenKind::False,
            "null" => GraphQLTokenKind::Null,
            _ => GraphQLTokenKind::name_borrowed(name),
        };
        self.finish_token(start, kind)
    }

    fn lex_number(&mut self, start: SourcePosition) -> GraphQLToken<'src> {
        let num_start = self.curr_byte_offset;
        let mut is_float = false;

        if self.peek_char() == Some('-') {
            self.consume();
        }

        match self.peek_char() {
            Some('0') => {
                self.consume();
                if self.peek_char().is_some_and(|c| c.is_ascii_digit()) {
                    return self.lex_number_error(
                        start,
                        num_start,
                        "Invalid number: leading zeros are not allowed",
                    );
                }
            },
            Some(c) if c.is_ascii_digit() => self.consume_while(|c| c.is_ascii_digit()),
            _ => {
                return self.finish_token(start, GraphQLTokenKind::error("Unexpected `-`"));
            },
        }

        if self.peek_char() == Some('.')
            && self.peek_char_nth(1).is_some_and(|c| c.is_ascii_digit())
        {
            is_float = true;
            self.consume();
            self.consume_while(|c| c.is_ascii_digit());
        }

        if matches!(self.peek_char(), Some('e' | 'E')) {
            is_float = true;
            self.consume();
            if matches!(self.peek_char(), Some('+' | '-')) {
                self.consume();
            }
            if !self.peek_char().is_some_and(|c| c.is_ascii_digit()) {
                return self.lex_number_error(
                    start,
                    num_start,
                    "Invalid number: exponent must have at least one digit",
                );
            }
            self.consume_while(|c| c.is_ascii_digit());
        }

        if self.peek_char().is_some_and(is_name_start) {
            return self.lex_number_error(
                start,
                num_start,
                "Invalid number: a name cannot directly follow a number",
            );
        }

        let text = &self.source[num_start..self.curr_byte_offset];
        let kind = if is_float {
            GraphQLTokenKind::float_value_borrowed(text)
        } else {
            GraphQLTokenKind::int_value_borrowed(text)
        };
        self.finish_token(start, kind)
    }

    /// Swallows the rest of a malformed number so that lexing resumes after
    /// it.
    fn lex_number_error(
        &mut self,
        start: SourcePosition,
        num_start: usize,
        message: &str,
    ) -> GraphQLToken<'src> {
        self.consume_while(|c| c.is_ascii_alphanumeric() || matches!(c, '.' | '+' | '-' | '_'));
        let text = &self.source[num_start..self.curr_byte_offset];
        self.finish_token(start, GraphQLTokenKind::error(format!("{message}: `{text}`")))
    }

    fn lex_string(&mut self, start: SourcePosition) -> GraphQLToken<'src> {
        let str_start = self.curr_byte_offset;
        if self.remaining().starts_with("\"\"\"") {
            return self.lex_block_string(start, str_start);
        }

        self.consume();
        loop {
            match self.peek_char() {
                None => {
                    let kind = GraphQLTokenKind::error_with_help(
                        "Unterminated string literal",
                        "add a closing `\"`",
                    );
                    return self.finish_token(start, kind);
                },
                Some('\n' | '\r') => {
                    let kind = GraphQLTokenKind::error_with_help(
                        "Unterminated string literal",
                        "use a block string (`\"\"\"`) for multi-line text, or escape \
                         the newline as `\\n`",
                    );
                    return self.finish_token(start, kind);
                },
                Some('"') => {
                    self.consume();
                    break;
                },
                Some('\\') => {
                    self.consume();
                    self.consume();
                },
                Some(_) => {
                    self.consume();
                },
            }
        }

        let text = &self.source[str_start..self.curr_byte_offset];
        self.finish_token(start, GraphQLTokenKind::string_value_borrowed(text))
    }

    fn lex_block_string(
        &mut self,
        start: SourcePosition,
        str_start: usize,
    ) -> GraphQLToken<'src> {
        for _ in 0..3 {
            self.consume();
        }
        loop {
            let rest = self.remaining();
            if rest.is_empty() {
                let kind = GraphQLTokenKind::error_with_help(
                    "Unterminated block string",
                    "add a closing `\"\"\"`",
                );
                return self.finish_token(start, kind);
            } else if rest.starts_with("\\\"\"\"") {
                for _ in 0..4 {
                    self.consume();
                }
            } else if rest.starts_with("\"\"\"") {
                for _ in 0..3 {
                    self.consume();
                }
                break;
            } else {
                self.consume();
            }
        }

        let text = &self.source[str_start..self.curr_byte_offset];
        self.finish_token(start, GraphQLTokenKind::string_value_borrowed(text))
    }
}

impl<'src> Iterator for StrGraphQLTokenSource<'src> {
    type Item = GraphQLToken<'src>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.finished {
            return None;
        }
        let token = self.next_token();
        if matches!(token.kind, GraphQLTokenKind::Eof) {
            self.finished = true;
        }
        Some(token)
    }
}

fn is_name_start(ch: char) -> bool {
    ch == '_' || ch.is_ascii_alphabetic()
}

fn is_name_continue(ch: char) -> bool {
    ch == '_' || ch.is_ascii_alphanumeric()
}

/// Invisible and control characters are shown with their code point.
fn describe_char(ch: char) -> String {
    if ch.is_control() || (ch.is_whitespace() && ch != ' ') {
        format!("`{}` (U+{:04X})", ch.escape_default(), ch as u32)
    } else {
        format!("`{ch}`")
    }
}
