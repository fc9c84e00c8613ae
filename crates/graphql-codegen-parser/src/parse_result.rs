use crate::GraphQLParseError;

/// The outcome of parsing a document: the (possibly partial) AST plus every
/// error found along the way.
///
/// After an error the parser skips to the next definition and keeps going,
/// so one pass reports every problem in a file. A recovered AST is only
/// useful for best-effort tooling; [`ParseResult::into_result`] gives the
/// strict view.
#[derive(Debug)]
pub struct ParseResult<TAst> {
    ast: Option<TAst>,
    pub errors: Vec<GraphQLParseError>,
}

impl<TAst> ParseResult<TAst> {
    pub(crate) fn ok(ast: TAst) -> Self {
        Self {
            ast: Some(ast),
            errors: Vec::new(),
        }
    }

    pub(crate) fn recovered(ast: TAst, errors: Vec<GraphQLParseError>) -> Self {
        Self {
            ast: Some(ast),
            errors,
        }
    }

    pub fn has_errors(&self) -> bool {
        !self.errors.is_empty()
    }

    /// The AST, only if there were no errors.
    pub fn valid_ast(&self) -> Option<&TAst> {
        if self.errors.is_empty() {
            self.ast.as_ref()
        } else {
            None
        }
    }

    /// The AST, even if it was produced by error recovery.
    pub fn ast(&self) -> Option<&TAst> {
        self.ast.as_ref()
    }

    /// `Ok(ast)` when parsing was error free, `Err(errors)` otherwise.
    pub fn into_result(self) -> Result<TAst, Vec<GraphQLParseError>> {
        match self.ast {
            Some(ast) if self.errors.is_empty() => Ok(ast),
            _ => Err(self.errors),
        }
    }
}
