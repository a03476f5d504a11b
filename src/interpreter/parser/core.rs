use crate::{
    ast::{Node, Program, Span},
    error::ParseError,
    interpreter::lexer::{Token, tokenize},
};

/// Outcome of a grammar production.
///
/// `None` means the production did not match. Productions that fail may leave
/// the cursor anywhere; callers go through [`Parser::attempt`] to restore it.
pub type ParseResult<T> = Option<T>;

/// A cursor over the tokens of one source text.
pub struct Parser<'src> {
    /// The text being parsed.
    pub(crate) source:       &'src str,
    /// All tokens read before the first lexing failure.
    pub(crate) tokens:       Vec<(Token, Span)>,
    /// Byte offset of the first character the lexer rejected.
    pub(crate) error_offset: Option<usize>,
    /// Index of the next unread token.
    pub(crate) pos:          usize,
}

impl<'src> Parser<'src> {
    /// Tokenizes `source` and positions the cursor on the first token.
    #[must_use]
    pub fn new(source: &'src str) -> Self {
        let stream = tokenize(source);
        Self { source,
               tokens: stream.tokens,
               error_offset: stream.error_offset,
               pos: 0 }
    }

    /// Runs `production`, restoring the cursor if it does not match.
    pub(crate) fn attempt<T>(&mut self,
                             production: impl FnOnce(&mut Self) -> ParseResult<T>)
                             -> ParseResult<T> {
        let start = self.pos;
        let result = production(self);
        if result.is_none() {
            self.pos = start;
        }
        result
    }

    /// The next unread token, if any.
    pub(crate) fn peek(&self) -> Option<&Token> {
        self.tokens.get(self.pos).map(|(token, _)| token)
    }

    /// The token `n` places after the next unread one.
    pub(crate) fn peek_nth(&self, n: usize) -> Option<&(Token, Span)> {
        self.tokens.get(self.pos + n)
    }

    /// Whether the next unread token is `expected`.
    pub(crate) fn at(&self, expected: &Token) -> bool {
        self.peek() == Some(expected)
    }

    /// Consumes the next token and returns it with its span.
    pub(crate) fn bump(&mut self) -> Option<(Token, Span)> {
        let token = self.tokens.get(self.pos).cloned()?;
        self.pos += 1;
        Some(token)
    }

    /// Consumes the next token if it is `expected`, returning its span.
    pub(crate) fn eat(&mut self, expected: &Token) -> Option<Span> {
        match self.tokens.get(self.pos) {
            Some((token, span)) if token == expected => {
                let span = *span;
                self.pos += 1;
                Some(span)
            },
            _ => None,
        }
    }

    /// Span of the most recently consumed token.
    pub(crate) fn previous_span(&self) -> Span {
        self.pos
            .checked_sub(1)
            .and_then(|i| self.tokens.get(i))
            .map_or_else(Span::default, |(_, span)| *span)
    }

    /// 0-based line containing byte `offset`.
    pub(crate) fn line_of(&self, offset: usize) -> usize {
        self.source
            .get(..offset)
            .map_or(0, |before| before.matches('\n').count())
    }

    /// Where parsing stopped, if it stopped before the end of the source.
    fn failure(&self) -> Option<ParseError> {
        self.tokens
            .get(self.pos)
            .map(|(_, span)| span.start)
            .or(self.error_offset)
            .map(|offset| ParseError::at(self.source, offset))
    }
}

/// Parses a complete program.
///
/// Parsing never fails outright: the statements read before the first
/// unparseable token are returned, and the failure is described by
/// [`Program::parse_error`].
///
/// # Example
/// ```
/// use tensorpad::interpreter::parser::core::parse_program;
///
/// let program = parse_program("x := 2; x + 1");
/// assert_eq!(program.statements.len(), 2);
/// assert!(!program.statements[0].show);
/// assert!(program.statements[1].show);
/// assert!(program.parse_error.is_none());
///
/// let broken = parse_program("x := 2\ny := )");
/// assert_eq!(broken.statements.len(), 1);
/// assert_eq!(broken.parse_error.unwrap().to_string(),
///            "Couldn't read line 2 pos 1: \"y := )\"");
/// ```
#[must_use]
pub fn parse_program(source: &str) -> Program {
    let mut parser = Parser::new(source);
    let statements = parser.parse_statement_list();

    Program { statements,
              parse_error: parser.failure() }
}

/// Parses a single expression that must span the whole of `source`.
///
/// Returns `None` when `source` holds anything other than exactly one
/// top-level expression or assignment.
#[must_use]
pub fn parse_expression(source: &str) -> Option<Node> {
    let mut parser = Parser::new(source);
    let node = parser.parse_assignment()?;
    if parser.pos == parser.tokens.len() && parser.error_offset.is_none() {
        Some(node)
    } else {
        None
    }
}
