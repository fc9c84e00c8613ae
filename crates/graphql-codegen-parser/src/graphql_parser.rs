//! Recursive-descent parser for GraphQL executable documents.
//!
//! Every grammar rule has a `parse_*` method returning `Result<Node, ()>`.
//! `Err(())` means an error has already been recorded and the caller should
//! recover: inside a selection set the parser skips to the next selection,
//! otherwise it skips to the next definition keyword. One pass therefore
//! reports every syntax error in a document.

use crate::ast;
use crate::token::cook_block_string;
use crate::token::cook_string;
use crate::token::GraphQLToken;
use crate::token::GraphQLTokenKind;
use crate::token_source::GraphQLTokenSource;
use crate::token_source::StrGraphQLTokenSource;
use crate::GraphQLParseError;
use crate::GraphQLParseErrorKind;
use crate::GraphQLSourceSpan;
use crate::GraphQLTokenStream;
use crate::ParseResult;
use crate::SourcePosition;
use smallvec::SmallVec;
use std::path::PathBuf;
use std::sync::Arc;

/// Keywords that start type-system definitions, which operation documents
/// may not contain.
const TYPE_SYSTEM_KEYWORDS: &[&str] = &[
    "directive",
    "enum",
    "extend",
    "input",
    "interface",
    "scalar",
    "schema",
    "type",
    "union",
];

#[derive(Clone, Copy, Debug)]
enum DelimiterContext {
    SelectionSet,
    Arguments,
    VariableDefinitions,
    ListType,
    ListValue,
    ObjectValue,
}

impl DelimiterContext {
    fn description(&self) -> &'static str {
        match self {
            DelimiterContext::SelectionSet => "selection set",
            DelimiterContext::Arguments => "argument list",
            DelimiterContext::VariableDefinitions => "variable definitions",
            DelimiterContext::ListType => "list type",
            DelimiterContext::ListValue => "list value",
            DelimiterContext::ObjectValue => "object value",
        }
    }

    fn delimiters(&self) -> (&'static str, &'static str) {
        match self {
            DelimiterContext::SelectionSet | DelimiterContext::ObjectValue => ("{", "}"),
            DelimiterContext::Arguments | DelimiterContext::VariableDefinitions => ("(", ")"),
            DelimiterContext::ListType | DelimiterContext::ListValue => ("[", "]"),
        }
    }
}

#[derive(Clone, Debug)]
struct OpenDelimiter {
    span: GraphQLSourceSpan,
    context: DelimiterContext,
}

/// Whether `$variables` may appear in the value being parsed.
#[derive(Clone, Copy, Debug)]
enum ConstContext {
    AllowVariables,
    VariableDefaultValue,
    VariableDirective,
}

impl ConstContext {
    fn allows_variables(&self) -> bool {
        matches!(self, ConstContext::AllowVariables)
    }
}

/// A recursive-descent parser over any [`GraphQLTokenSource`].
///
/// ```
/// use graphql_codegen_parser::GraphQLParser;
///
/// let result = GraphQLParser::new("query Hero { hero { name } }")
///     .parse_executable_document();
/// let document = result.valid_ast().unwrap();
/// assert_eq!(document.operations().count(), 1);
/// ```
pub struct GraphQLParser<'src, TTokenSource: GraphQLTokenSource<'src>> {
    token_stream: GraphQLTokenStream<'src, TTokenSource>,
    errors: Vec<GraphQLParseError>,

    /// Open `{`, `(` and `[`, innermost last. Used to name the unclosed
    /// delimiter when input ends early.
    delimiter_stack: SmallVec<[OpenDelimiter; 8]>,

    /// Shared by selection sets, values and type annotations.
    recursion_depth: usize,

    /// End of the most recently consumed token; anchors end-of-input errors.
    last_end_position: Option<SourcePosition>,

    /// Only the first end-of-input error is reported: once input runs out,
    /// every enclosing rule would fail the same way.
    eof_reported: bool,
}

impl<'src> GraphQLParser<'src, StrGraphQLTokenSource<'src>> {
    pub fn new(source: &'src str) -> Self {
        Self::from_token_source(StrGraphQLTokenSource::new(source))
    }

    /// Like [`GraphQLParser::new`], but every span (and so every error)
    /// names `file_path`.
    pub fn with_file_path(source: &'src str, file_path: Arc<PathBuf>) -> Self {
        Self::from_token_source(StrGraphQLTokenSource::with_file_path(source, file_path))
    }
}

impl<'src, TTokenSource: GraphQLTokenSource<'src>> GraphQLParser<'src, TTokenSource> {
    /// Deeply nested input (`{ a { a { a ...`, `[[[[...`) is rejected beyond
    /// this depth instead of overflowing the stack.
    pub const MAX_RECURSION_DEPTH: usize = 64;

    pub fn from_token_source(token_source: TTokenSource) -> Self {
        Self {
            token_stream: GraphQLTokenStream::new(token_source),
            errors: Vec::new(),
            delimiter_stack: SmallVec::new(),
            recursion_depth: 0,
            last_end_position: None,
            eof_reported: false,
        }
    }

    /// Parses a document that may contain only operations and fragments.
    pub fn parse_executable_document(mut self) -> ParseResult<ast::Document> {
        let mut definitions = Vec::new();
        while !self.token_stream.is_at_end() {
            match self.parse_definition() {
                Ok(def) => definitions.push(def),
                Err(()) => self.recover_to_next_definition(),
            }
        }

        let document = ast::Document { definitions };
        if self.errors.is_empty() {
            ParseResult::ok(document)
        } else {
            ParseResult::recovered(document, self.errors)
        }
    }

    // =========================================================================
    // Error recording and recovery
    // =========================================================================

    fn record_error(&mut self, error: GraphQLParseError) {
        self.errors.push(error);
    }

    fn push_delimiter(&mut self, span: GraphQLSourceSpan, context: DelimiterContext) {
        self.delimiter_stack.push(OpenDelimiter { span, context });
    }

    fn pop_delimiter(&mut self) -> Option<OpenDelimiter> {
        self.delimiter_stack.pop()
    }

    /// Records an error for the next token, which is not one of `expected`.
    ///
    /// Lexer error tokens are reported with the lexer's own message and
    /// consumed; other tokens are left for the caller's recovery.
    fn unexpected(&mut self, expected: &[&str]) {
        let Some(token) = self.token_stream.peek().cloned() else {
            self.record_eof_error(expected);
            return;
        };
        match token.kind {
            GraphQLTokenKind::Eof => self.record_eof_error(expected),
            GraphQLTokenKind::Error { message, help } => {
                self.consume_token();
                self.record_error(GraphQLParseError::from_lexer_error(message, token.span, help));
            },
            kind => {
                let found = kind.describe();
                self.record_error(GraphQLParseError::new(
                    format!("Expected {}, found `{found}`", expected.join(" or ")),
                    token.span,
                    GraphQLParseErrorKind::UnexpectedToken {
                        expected: expected.iter().map(|e| e.to_string()).collect(),
                        found,
                    },
                ));
            },
        }
    }

    /// Reports that input ended early, naming the innermost open delimiter
    /// if there is one.
    fn record_eof_error(&mut self, expected: &[&str]) {
        if self.eof_reported {
            return;
        }
        self.eof_reported = true;

        let span = self.eof_span();
        let error = match self.delimiter_stack.last() {
            Some(open) => {
                let (opening, closing) = open.context.delimiters();
                GraphQLParseError::new(
                    format!(
                        "Unclosed `{opening}` of {} opened at {}",
                        open.context.description(),
                        open.span.start_inclusive,
                    ),
                    span,
                    GraphQLParseErrorKind::UnclosedDelimiter {
                        delimiter: opening.to_string(),
                    },
                )
                .with_help(format!("add the missing `{closing}`"))
            },
            None => GraphQLParseError::new(
                format!("Unexpected end of input, expected {}", expected.join(" or ")),
                span,
                GraphQLParseErrorKind::UnexpectedEof {
                    expected: expected.iter().map(|e| e.to_string()).collect(),
                },
            ),
        };
        self.record_error(error);
    }

    /// Skips tokens until something that can start a definition.
    fn recover_to_next_definition(&mut self) {
        loop {
            let keyword = match self.token_stream.peek().map(|token| &token.kind) {
                None | Some(GraphQLTokenKind::Eof | GraphQLTokenKind::CurlyBraceOpen) => break,
                Some(GraphQLTokenKind::Name(name)) => Some(name.to_string()),
                Some(_) => None,
            };
            if keyword.is_some_and(|keyword| self.looks_like_definition_start(&keyword)) {
                break;
            }
            self.consume_token();
        }
        self.delimiter_stack.clear();
    }

    /// Looks one token past `keyword` so that, for example, a field called
    /// `type` is not mistaken for a type definition.
    fn looks_like_definition_start(&mut self, keyword: &str) -> bool {
        let next = self.token_stream.peek_nth(1).map(|token| &token.kind);
        let next_is_name = matches!(
            next,
            Some(
                GraphQLTokenKind::Name(_)
                    | GraphQLTokenKind::True
                    | GraphQLTokenKind::False
                    | GraphQLTokenKind::Null
            )
        );
        match keyword {
            "query" | "mutation" | "subscription" => {
                next_is_name
                    || matches!(
                        next,
                        Some(
                            GraphQLTokenKind::CurlyBraceOpen
                                | GraphQLTokenKind::ParenOpen
                                | GraphQLTokenKind::At
                        )
                    )
            },
            "fragment" => {
                next_is_name && !matches!(next, Some(GraphQLTokenKind::Name(n)) if n == "on")
            },
            "directive" => matches!(next, Some(GraphQLTokenKind::At)),
            "schema" => matches!(
                next,
                Some(GraphQLTokenKind::CurlyBraceOpen | GraphQLTokenKind::At)
            ),
            kw if TYPE_SYSTEM_KEYWORDS.contains(&kw) => next_is_name,
            _ => false,
        }
    }

    /// Skips tokens until something that can start (or end) a selection.
    fn skip_to_selection_recovery_point(&mut self) {
        loop {
            let stop = match self.token_stream.peek() {
                None => true,
                Some(token) => matches!(
                    token.kind,
                    GraphQLTokenKind::CurlyBraceClose
                        | GraphQLTokenKind::Eof
                        | GraphQLTokenKind::Ellipsis
                        | GraphQLTokenKind::Name(_)
                        | GraphQLTokenKind::True
                        | GraphQLTokenKind::False
                        | GraphQLTokenKind::Null
                ),
            };
            if stop {
                break;
            }
            self.consume_token();
        }
    }

    fn enter_recursion(&mut self) -> Result<(), ()> {
        if self.recursion_depth >= Self::MAX_RECURSION_DEPTH {
            let span = self.current_span();
            self.skip_nested_group();
            self.record_error(GraphQLParseError::new(
                format!(
                    "Maximum nesting depth of {} exceeded",
                    Self::MAX_RECURSION_DEPTH,
                ),
                span,
                GraphQLParseErrorKind::NestingTooDeep,
            ));
            return Err(());
        }
        self.recursion_depth += 1;
        Ok(())
    }

    fn exit_recursion(&mut self) {
        self.recursion_depth -= 1;
    }

    /// Skips the next token and, if it opens a delimiter, everything up to
    /// and including its matching close. Nesting inside a group that is
    /// already too deep is not reported again.
    fn skip_nested_group(&mut self) {
        let mut depth = 0usize;
        loop {
            let kind = match self.token_stream.peek() {
                None => break,
                Some(token) => token.kind.clone(),
            };
            match kind {
                GraphQLTokenKind::Eof => break,
                GraphQLTokenKind::CurlyBraceOpen
                | GraphQLTokenKind::ParenOpen
                | GraphQLTokenKind::SquareBracketOpen => depth += 1,
                GraphQLTokenKind::CurlyBraceClose
                | GraphQLTokenKind::ParenClose
                | GraphQLTokenKind::SquareBracketClose => depth = depth.saturating_sub(1),
                _ => (),
            }
            self.consume_token();
            if depth == 0 {
                break;
            }
        }
    }

    // =========================================================================
    // Token helpers
    // =========================================================================

    fn consume_token(&mut self) -> Option<GraphQLToken<'src>> {
        let token = self.token_stream.consume();
        if let Some(token) = &token {
            self.last_end_position = Some(token.span.end_exclusive);
        }
        token
    }

    fn peek_is(&mut self, kind: &GraphQLTokenKind) -> bool {
        self.token_stream
            .peek()
            .is_some_and(|token| {
                std::mem::discriminant(&token.kind) == std::mem::discriminant(kind)
            })
    }

    /// Keywords are plain `Name` tokens; `true`/`false`/`null` never match.
    fn peek_is_keyword(&mut self, keyword: &str) -> bool {
        self.token_stream
            .peek()
            .is_some_and(|token| matches!(&token.kind, GraphQLTokenKind::Name(n) if n == keyword))
    }

    /// `true`, `false` and `null` are valid names outside of value position.
    fn peek_is_name(&mut self) -> bool {
        self.token_stream.peek().is_some_and(|token| {
            matches!(
                token.kind,
                GraphQLTokenKind::Name(_)
                    | GraphQLTokenKind::True
                    | GraphQLTokenKind::False
                    | GraphQLTokenKind::Null
            )
        })
    }

    fn expect(&mut self, kind: &GraphQLTokenKind) -> Result<GraphQLToken<'src>, ()> {
        if self.peek_is(kind) {
            return self.consume_token().ok_or(());
        }
        let expected = format!("`{}`", kind.describe());
        self.unexpected(&[expected.as_str()]);
        Err(())
    }

    fn expect_name(&mut self) -> Result<ast::Name, ()> {
        let value = match self.token_stream.peek().map(|token| &token.kind) {
            Some(GraphQLTokenKind::Name(name)) => name.to_string(),
            Some(GraphQLTokenKind::True) => "true".to_string(),
            Some(GraphQLTokenKind::False) => "false".to_string(),
            Some(GraphQLTokenKind::Null) => "null".to_string(),
            _ => {
                self.unexpected(&["a name"]);
                return Err(());
            },
        };
        let token = self.consume_token().ok_or(())?;
        Ok(ast::Name::new(value, token.span))
    }

    fn expect_keyword(&mut self, keyword: &str) -> Result<GraphQLSourceSpan, ()> {
        if self.peek_is_keyword(keyword) {
            return self.consume_token().map(|token| token.span).ok_or(());
        }
        let expected = format!("`{keyword}`");
        self.unexpected(&[expected.as_str()]);
        Err(())
    }

    fn eof_span(&mut self) -> GraphQLSourceSpan {
        let file_path = self
            .token_stream
            .peek()
            .and_then(|token| token.span.file_path.clone());
        let pos = self.last_end_position.unwrap_or_default();
        GraphQLSourceSpan {
            start_inclusive: pos,
            end_exclusive: pos,
            file_path,
        }
    }

    fn current_span(&mut self) -> GraphQLSourceSpan {
        match self.token_stream.peek() {
            Some(token) => token.span.clone(),
            None => self.eof_span(),
        }
    }

    /// A span from the start of `start` to the end of the last consumed
    /// token.
    fn make_span(&self, start: GraphQLSourceSpan) -> GraphQLSourceSpan {
        GraphQLSourceSpan {
            end_exclusive: self.last_end_position.unwrap_or(start.end_exclusive),
            start_inclusive: start.start_inclusive,
            file_path: start.file_path,
        }
    }

    // =========================================================================
    // Definitions
    // =========================================================================

    fn parse_definition(&mut self) -> Result<ast::Definition, ()> {
        if self.peek_is(&GraphQLTokenKind::error("")) {
            self.unexpected(&["a definition"]);
            return Err(());
        }

        if self.peek_is(&GraphQLTokenKind::CurlyBraceOpen)
            || self.peek_is_keyword("query")
            || self.peek_is_keyword("mutation")
            || self.peek_is_keyword("subscription")
        {
            return self.parse_operation_definition().map(ast::Definition::Operation);
        }
        if self.peek_is_keyword("fragment") {
            return self.parse_fragment_definition().map(ast::Definition::Fragment);
        }

        // A description string may precede a type-system definition.
        let has_description = self.peek_is(&GraphQLTokenKind::string_value_borrowed(""));
        let keyword_idx = usize::from(has_description);
        let type_system_keyword = self.type_system_keyword_at(keyword_idx);

        let span = self.current_span();
        match type_system_keyword {
            Some(keyword) => {
                self.record_error(
                    GraphQLParseError::new(
                        format!("`{keyword}` definitions are not allowed in operation documents"),
                        span,
                        GraphQLParseErrorKind::TypeSystemDefinition {
                            keyword: keyword.to_string(),
                        },
                    )
                    .with_help("schema types come from the downloaded schema file"),
                );
                for _ in 0..=keyword_idx {
                    self.consume_token();
                }
                self.skip_type_system_definition();
            },
            None => {
                self.unexpected(&["`query`", "`mutation`", "`subscription`", "`fragment`", "`{`"]);
                self.consume_token();
            },
        }
        Err(())
    }

    /// Skips the rest of a rejected type-system definition, including its
    /// `{ ... }` body, so the body is not mistaken for a shorthand query.
    fn skip_type_system_definition(&mut self) {
        let mut depth = 0usize;
        loop {
            let kind = match self.token_stream.peek() {
                None => break,
                Some(token) => token.kind.clone(),
            };
            match kind {
                GraphQLTokenKind::Eof => break,
                GraphQLTokenKind::CurlyBraceOpen => depth += 1,
                GraphQLTokenKind::CurlyBraceClose if depth > 0 => {
                    depth -= 1;
                    if depth == 0 {
                        self.consume_token();
                        break;
                    }
                },
                GraphQLTokenKind::Name(name)
                    if depth == 0 && self.looks_like_definition_start(&name) =>
                {
                    break;
                },
                _ => (),
            }
            self.consume_token();
        }
    }

    fn type_system_keyword_at(&mut self, n: usize) -> Option<&'static str> {
        match self.token_stream.peek_nth(n).map(|token| &token.kind) {
            Some(GraphQLTokenKind::Name(name)) => TYPE_SYSTEM_KEYWORDS
                .iter()
                .find(|kw| **kw == &**name)
                .copied(),
            _ => None,
        }
    }

    fn parse_operation_definition(&mut self) -> Result<ast::OperationDefinition, ()> {
        if self.peek_is(&GraphQLTokenKind::CurlyBraceOpen) {
            let selection_set = self.parse_selection_set()?;
            return Ok(ast::OperationDefinition {
                span: selection_set.span.clone(),
                operation_kind: ast::OperationKind::Query,
                name: None,
                variable_definitions: Vec::new(),
                directives: Vec::new(),
                selection_set,
                shorthand: true,
            });
        }

        let operation_kind = match self.token_stream.peek().map(|token| &token.kind) {
            Some(GraphQLTokenKind::Name(name)) => ast::OperationKind::from_keyword(name),
            _ => None,
        };
        let Some(operation_kind) = operation_kind else {
            self.unexpected(&["`query`", "`mutation`", "`subscription`"]);
            return Err(());
        };
        let start = self.consume_token().ok_or(())?.span;

        let name = if self.peek_is_name() {
            Some(self.expect_name()?)
        } else {
            None
        };
        let variable_definitions = if self.peek_is(&GraphQLTokenKind::ParenOpen) {
            self.parse_variable_definitions()?
        } else {
            Vec::new()
        };
        let directives = self.parse_directives(ConstContext::AllowVariables)?;
        let selection_set = self.parse_selection_set()?;

        Ok(ast::OperationDefinition {
            span: self.make_span(start),
            operation_kind,
            name,
            variable_definitions,
            directives,
            selection_set,
            shorthand: false,
        })
    }

    fn parse_variable_definitions(&mut self) -> Result<Vec<ast::VariableDefinition>, ()> {
        let open = self.expect(&GraphQLTokenKind::ParenOpen)?;
        self.push_delimiter(open.span.clone(), DelimiterContext::VariableDefinitions);

        if self.peek_is(&GraphQLTokenKind::ParenClose) {
            self.record_error(GraphQLParseError::new(
                "Variable definitions cannot be empty; omit the parentheses instead",
                open.span.clone(),
                GraphQLParseErrorKind::InvalidEmptyConstruct {
                    construct: "variable definitions".to_string(),
                },
            ));
        }

        let mut definitions = Vec::new();
        while !self.peek_is(&GraphQLTokenKind::ParenClose) {
            if self.token_stream.is_at_end() {
                self.record_eof_error(&["`)`"]);
                return Err(());
            }
            definitions.push(self.parse_variable_definition()?);
        }
        self.expect(&GraphQLTokenKind::ParenClose)?;
        self.pop_delimiter();
        Ok(definitions)
    }

    fn parse_variable_definition(&mut self) -> Result<ast::VariableDefinition, ()> {
        let dollar = self.expect(&GraphQLTokenKind::Dollar)?;
        let variable = self.expect_name()?;
        self.expect(&GraphQLTokenKind::Colon)?;
        let var_type = self.parse_type_annotation()?;
        let default_value = if self.peek_is(&GraphQLTokenKind::Equals) {
            self.consume_token();
            Some(self.parse_value(ConstContext::VariableDefaultValue)?)
        } else {
            None
        };
        let directives = self.parse_directives(ConstContext::VariableDirective)?;

        Ok(ast::VariableDefinition {
            span: self.make_span(dollar.span),
            variable,
            var_type,
            default_value,
            directives,
        })
    }

    fn parse_fragment_definition(&mut self) -> Result<ast::FragmentDefinition, ()> {
        let start = self.expect_keyword("fragment")?;
        let name = self.expect_name()?;
        if name.as_str() == "on" {
            self.record_error(GraphQLParseError::new(
                "A fragment cannot be named `on`",
                name.span.clone(),
                GraphQLParseErrorKind::ReservedName {
                    name: "on".to_string(),
                },
            ));
        }
        self.expect_keyword("on")?;
        let type_condition = self.expect_name()?;
        let directives = self.parse_directives(ConstContext::AllowVariables)?;
        let selection_set = self.parse_selection_set()?;

        Ok(ast::FragmentDefinition {
            span: self.make_span(start),
            name,
            type_condition,
            directives,
            selection_set,
        })
    }

    // =========================================================================
    // Selections
    // =========================================================================

    fn parse_selection_set(&mut self) -> Result<ast::SelectionSet, ()> {
        self.enter_recursion()?;
        let result = self.parse_selection_set_impl();
        self.exit_recursion();
        result
    }

    fn parse_selection_set_impl(&mut self) -> Result<ast::SelectionSet, ()> {
        let open = self.expect(&GraphQLTokenKind::CurlyBraceOpen)?;
        self.push_delimiter(open.span.clone(), DelimiterContext::SelectionSet);
        let stack_len = self.delimiter_stack.len();

        if self.peek_is(&GraphQLTokenKind::CurlyBraceClose) {
            self.record_error(GraphQLParseError::new(
                "Selection set cannot be empty",
                open.span.clone(),
                GraphQLParseErrorKind::InvalidEmptyConstruct {
                    construct: "selection set".to_string(),
                },
            ));
        }

        let mut selections = Vec::new();
        while !self.peek_is(&GraphQLTokenKind::CurlyBraceClose) {
            if self.token_stream.is_at_end() {
                self.record_eof_error(&["`}`"]);
                return Err(());
            }
            match self.parse_selection() {
                Ok(selection) => selections.push(selection),
                Err(()) => {
                    self.delimiter_stack.truncate(stack_len);
                    self.skip_to_selection_recovery_point();
                },
            }
        }
        self.expect(&GraphQLTokenKind::CurlyBraceClose)?;
        self.pop_delimiter();

        Ok(ast::SelectionSet {
            span: self.make_span(open.span),
            selections,
        })
    }

    fn parse_selection(&mut self) -> Result<ast::Selection, ()> {
        if !self.peek_is(&GraphQLTokenKind::Ellipsis) {
            return self.parse_field().map(ast::Selection::Field);
        }

        let ellipsis = self.expect(&GraphQLTokenKind::Ellipsis)?;
        if self.peek_is_keyword("on")
            || self.peek_is(&GraphQLTokenKind::At)
            || self.peek_is(&GraphQLTokenKind::CurlyBraceOpen)
        {
            let type_condition = if self.peek_is_keyword("on") {
                self.consume_token();
                Some(self.expect_name()?)
            } else {
                None
            };
            let directives = self.parse_directives(ConstContext::AllowVariables)?;
            let selection_set = self.parse_selection_set()?;
            Ok(ast::Selection::InlineFragment(ast::InlineFragment {
                span: self.make_span(ellipsis.span),
                type_condition,
                directives,
                selection_set,
            }))
        } else {
            let name = self.expect_name()?;
            let directives = self.parse_directives(ConstContext::AllowVariables)?;
            Ok(ast::Selection::FragmentSpread(ast::FragmentSpread {
                span: self.make_span(ellipsis.span),
                name,
                directives,
            }))
        }
    }

    /// `alias: name(args) @directives { selections }`
    fn parse_field(&mut self) -> Result<ast::Field, ()> {
        let first = self.expect_name()?;
        let start = first.span.clone();
        let (alias, name) = if self.peek_is(&GraphQLTokenKind::Colon) {
            self.consume_token();
            (Some(first), self.expect_name()?)
        } else {
            (None, first)
        };

        let arguments = if self.peek_is(&GraphQLTokenKind::ParenOpen) {
            self.parse_arguments(ConstContext::AllowVariables)?
        } else {
            Vec::new()
        };
        let directives = self.parse_directives(ConstContext::AllowVariables)?;
        let selection_set = if self.peek_is(&GraphQLTokenKind::CurlyBraceOpen) {
            Some(self.parse_selection_set()?)
        } else {
            None
        };

        Ok(ast::Field {
            span: self.make_span(start),
            alias,
            name,
            arguments,
            directives,
            selection_set,
        })
    }

    fn parse_arguments(&mut self, context: ConstContext) -> Result<Vec<ast::Argument>, ()> {
        let open = self.expect(&GraphQLTokenKind::ParenOpen)?;
        self.push_delimiter(open.span.clone(), DelimiterContext::Arguments);

        if self.peek_is(&GraphQLTokenKind::ParenClose) {
            self.record_error(GraphQLParseError::new(
                "Argument list cannot be empty; omit the parentheses instead",
                open.span.clone(),
                GraphQLParseErrorKind::InvalidEmptyConstruct {
                    construct: "argument list".to_string(),
                },
            ));
        }

        let mut arguments = Vec::new();
        while !self.peek_is(&GraphQLTokenKind::ParenClose) {
            if self.token_stream.is_at_end() {
                self.record_eof_error(&["`)`"]);
                return Err(());
            }
            let name = self.expect_name()?;
            self.expect(&GraphQLTokenKind::Colon)?;
            let value = self.parse_value(context)?;
            arguments.push(ast::Argument {
                span: self.make_span(name.span.clone()),
                name,
                value,
            });
        }
        self.expect(&GraphQLTokenKind::ParenClose)?;
        self.pop_delimiter();
        Ok(arguments)
    }

    fn parse_directives(
        &mut self,
        context: ConstContext,
    ) -> Result<Vec<ast::DirectiveAnnotation>, ()> {
        let mut directives = Vec::new();
        while self.peek_is(&GraphQLTokenKind::At) {
            let at = self.expect(&GraphQLTokenKind::At)?;
            let name = self.expect_name()?;
            let arguments = if self.peek_is(&GraphQLTokenKind::ParenOpen) {
                self.parse_arguments(context)?
            } else {
                Vec::new()
            };
            directives.push(ast::DirectiveAnnotation {
                span: self.make_span(at.span),
                name,
                arguments,
            });
        }
        Ok(directives)
    }

    // =========================================================================
    // Types
    // =========================================================================

    fn parse_type_annotation(&mut self) -> Result<ast::TypeAnnotation, ()> {
        self.enter_recursion()?;
        let result = self.parse_type_annotation_impl();
        self.exit_recursion();
        result
    }

    fn parse_type_annotation_impl(&mut self) -> Result<ast::TypeAnnotation, ()> {
        let (base, start) = if self.peek_is(&GraphQLTokenKind::SquareBracketOpen) {
            let open = self.expect(&GraphQLTokenKind::SquareBracketOpen)?;
            self.push_delimiter(open.span.clone(), DelimiterContext::ListType);
            let inner = self.parse_type_annotation()?;
            self.expect(&GraphQLTokenKind::SquareBracketClose)?;
            self.pop_delimiter();
            let list = ast::TypeAnnotation::List {
                inner: Box::new(inner),
                span: self.make_span(open.span.clone()),
            };
            (list, open.span)
        } else {
            let name = self.expect_name()?;
            let start = name.span.clone();
            (ast::TypeAnnotation::Named(name), start)
        };

        if self.peek_is(&GraphQLTokenKind::Bang) {
            self.consume_token();
            return Ok(ast::TypeAnnotation::NonNull {
                inner: Box::new(base),
                span: self.make_span(start),
            });
        }
        Ok(base)
    }

    // =========================================================================
    // Values
    // =========================================================================

    fn parse_value(&mut self, context: ConstContext) -> Result<ast::Value, ()> {
        self.enter_recursion()?;
        let result = self.parse_value_impl(context);
        self.exit_recursion();
        result
    }

    fn parse_value_impl(&mut self, context: ConstContext) -> Result<ast::Value, ()> {
        let Some(token) = self.token_stream.peek().cloned() else {
            self.record_eof_error(&["a value"]);
            return Err(());
        };
        let span = token.span;

        match token.kind {
            GraphQLTokenKind::Dollar => {
                self.consume_token();
                if !context.allows_variables() {
                    self.record_error(GraphQLParseError::new(
                        match context {
                            ConstContext::VariableDirective => {
                                "Variables are not allowed in directives on variable definitions"
                            },
                            _ => "Variables are not allowed in default values",
                        },
                        span,
                        GraphQLParseErrorKind::VariableInConstContext,
                    ));
                    return Err(());
                }
                let name = self.expect_name()?;
                Ok(ast::Value::Variable(ast::Name::new(name.value, self.make_span(span))))
            },
            GraphQLTokenKind::IntValue(raw) => {
                self.consume_token();
                match raw.parse::<i32>() {
                    Ok(value) => Ok(ast::Value::Int { value, span }),
                    Err(_) => {
                        self.record_invalid_number(&raw, "does not fit in a 32-bit Int", span);
                        Err(())
                    },
                }
            },
            GraphQLTokenKind::FloatValue(raw) => {
                self.consume_token();
                match raw.parse::<f64>() {
                    Ok(value) if value.is_finite() => Ok(ast::Value::Float { value, span }),
                    _ => {
                        self.record_invalid_number(&raw, "is not a finite Float", span);
                        Err(())
                    },
                }
            },
            GraphQLTokenKind::StringValue(raw) => {
                self.consume_token();
                let block = raw.starts_with("\"\"\"");
                let cooked = if block {
                    cook_block_string(&raw)
                } else {
                    cook_string(&raw)
                };
                match cooked {
                    Ok(value) => Ok(ast::Value::String { value, block, span }),
                    Err(err) => {
                        self.record_error(GraphQLParseError::new(
                            format!("Invalid string literal: {err}"),
                            span,
                            GraphQLParseErrorKind::InvalidString(err),
                        ));
                        Err(())
                    },
                }
            },
            GraphQLTokenKind::True => {
                self.consume_token();
                Ok(ast::Value::Boolean { value: true, span })
            },
            GraphQLTokenKind::False => {
                self.consume_token();
                Ok(ast::Value::Boolean { value: false, span })
            },
            GraphQLTokenKind::Null => {
                self.consume_token();
                Ok(ast::Value::Null(span))
            },
            GraphQLTokenKind::Name(name) => {
                self.consume_token();
                Ok(ast::Value::Enum(ast::Name::new(name.into_owned(), span)))
            },
            GraphQLTokenKind::SquareBracketOpen => self.parse_list_value(context),
            GraphQLTokenKind::CurlyBraceOpen => self.parse_object_value(context),
            _ => {
                self.unexpected(&["a value"]);
                Err(())
            },
        }
    }

    fn record_invalid_number(&mut self, raw: &str, problem: &str, span: GraphQLSourceSpan) {
        self.record_error(GraphQLParseError::new(
            format!("Number `{raw}` {problem}"),
            span,
            GraphQLParseErrorKind::InvalidValue {
                raw: raw.to_string(),
            },
        ));
    }

    fn parse_list_value(&mut self, context: ConstContext) -> Result<ast::Value, ()> {
        let open = self.expect(&GraphQLTokenKind::SquareBracketOpen)?;
        self.push_delimiter(open.span.clone(), DelimiterContext::ListValue);

        let mut values = Vec::new();
        while !self.peek_is(&GraphQLTokenKind::SquareBracketClose) {
            if self.token_stream.is_at_end() {
                self.record_eof_error(&["`]`"]);
                return Err(());
            }
            values.push(self.parse_value(context)?);
        }
        self.expect(&GraphQLTokenKind::SquareBracketClose)?;
        self.pop_delimiter();

        Ok(ast::Value::List {
            values,
            span: self.make_span(open.span),
        })
    }

    fn parse_object_value(&mut self, context: ConstContext) -> Result<ast::Value, ()> {
        let open = self.expect(&GraphQLTokenKind::CurlyBraceOpen)?;
        self.push_delimiter(open.span.clone(), DelimiterContext::ObjectValue);

        let mut fields = Vec::new();
        while !self.peek_is(&GraphQLTokenKind::CurlyBraceClose) {
            if self.token_stream.is_at_end() {
                self.record_eof_error(&["`}`"]);
                return Err(());
            }
            let name = self.expect_name()?;
            self.expect(&GraphQLTokenKind::Colon)?;
            let value = self.parse_value(context)?;
            fields.push(ast::ObjectField {
                span: self.make_span(name.span.clone()),
                name,
                value,
            });
        }
        self.expect(&GraphQLTokenKind::CurlyBraceClose)?;
        self.pop_delimiter();

        Ok(ast::Value::Object {
            fields,
            span: self.make_span(open.span),
        })
    }
}
