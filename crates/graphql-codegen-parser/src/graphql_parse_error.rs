use crate::GraphQLParseErrorKind;
use crate::GraphQLSourceSpan;

/// A syntax error with its location and an optional hint.
///
/// `Display` renders the one-line `path:line:col: message` form.
#[derive(Clone, Debug, PartialEq, thiserror::Error)]
#[error("{}", self.format_oneline())]
pub struct GraphQLParseError {
    message: String,
    span: GraphQLSourceSpan,
    kind: GraphQLParseErrorKind,
    help: Option<String>,
}

impl GraphQLParseError {
    pub fn new(
        message: impl Into<String>,
        span: GraphQLSourceSpan,
        kind: GraphQLParseErrorKind,
    ) -> Self {
        Self {
            message: message.into(),
            span,
            kind,
            help: None,
        }
    }

    /// Wraps an error token produced by the lexer.
    pub fn from_lexer_error(
        message: impl Into<String>,
        span: GraphQLSourceSpan,
        help: Option<String>,
    ) -> Self {
        Self {
            message: message.into(),
            span,
            kind: GraphQLParseErrorKind::LexerError,
            help,
        }
    }

    pub fn with_help(mut self, help: impl Into<String>) -> Self {
        self.help = Some(help.into());
        self
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    pub fn span(&self) -> &GraphQLSourceSpan {
        &self.span
    }

    pub fn kind(&self) -> &GraphQLParseErrorKind {
        &self.kind
    }

    pub fn help(&self) -> Option<&str> {
        self.help.as_deref()
    }

    /// 1-based line of the error's start.
    pub fn line(&self) -> usize {
        self.span.start_inclusive.display_line()
    }

    /// 1-based column of the error's start.
    pub fn column(&self) -> usize {
        self.span.start_inclusive.display_col()
    }

    /// `path:line:col`, with `<input>` standing in for sources read from
    /// memory.
    pub fn location(&self) -> String {
        let file_name = self
            .span
            .file_path()
            .map(|path| path.display().to_string())
            .unwrap_or_else(|| "<input>".to_string());
        format!("{file_name}:{}:{}", self.line(), self.column())
    }

    /// `schema/hero.graphql:5:12: Expected `:` after argument name`
    pub fn format_oneline(&self) -> String {
        format!("{}: {}", self.location(), self.message)
    }

    /// Multi-line diagnostic with the offending source line underlined:
    ///
    /// ```text
    /// error: Expected `}`
    ///   --> hero.graphql:3:1
    ///    |
    ///  3 | query Other {
    ///    | ^^^^^
    ///    = help: ...
    /// ```
    pub fn format_detailed(&self, source: Option<&str>) -> String {
        let mut output = format!("error: {}\n", self.message);
        output.push_str(&format!("  --> {}\n", self.location()));

        let start = self.span.start_inclusive;
        if let Some(line_content) = source.and_then(|src| src.lines().nth(start.line())) {
            let gutter = start.display_line().to_string().len().max(2);
            let end = self.span.end_exclusive;
            let underline_len = if end.line() == start.line() && end.col() > start.col() {
                end.col() - start.col()
            } else {
                1
            };
            output.push_str(&format!("{:>gutter$} |\n", ""));
            output.push_str(&format!("{:>gutter$} | {line_content}\n", start.display_line()));
            output.push_str(&format!(
                "{:>gutter$} | {:>pad$}{}\n",
                "",
                "",
                "^".repeat(underline_len),
                pad = start.col(),
            ));
        }

        if let Some(help) = &self.help {
            output.push_str(&format!("   = help: {help}\n"));
        }
        output
    }
}
