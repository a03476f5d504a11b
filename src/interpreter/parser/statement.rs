use crate::{
    ast::{AssignOperator, Node, NodeKind, Span, Statement},
    interpreter::{
        lexer::Token,
        parser::core::{ParseResult, Parser},
    },
};

impl Parser<'_> {
    /// Parses statements until one fails to parse.
    ///
    /// Each statement is an assignment-level expression. A `;` directly
    /// after it is consumed and marks the statement as hidden; otherwise the
    /// statement is shown. The cursor is left on the first token that does not
    /// start a statement.
    pub(crate) fn parse_statement_list(&mut self) -> Vec<Statement> {
        let mut statements = Vec::new();

        while let Some(node) = self.attempt(Self::parse_assignment) {
            let show = self.eat(&Token::Semicolon).is_none();
            let line = self.line_of(node.span.start);
            statements.push(Statement { node, show, line });
        }

        statements
    }

    /// Parses an assignment, or a plain expression when no assignment
    /// operator follows.
    ///
    /// Grammar:
    /// ```text
    ///     assignment := top_level ((":=" | "=" | "+=" | "-=") top_level)?
    /// ```
    pub(crate) fn parse_assignment(&mut self) -> ParseResult<Node> {
        let target = self.parse_top_level()?;

        let op = match self.peek() {
            Some(Token::ColonAssign) => AssignOperator::Declare,
            Some(Token::Assign) => AssignOperator::Set,
            Some(Token::PlusAssign) => AssignOperator::Increment,
            Some(Token::MinusAssign) => AssignOperator::Decrement,
            _ => return Some(target),
        };
        self.pos += 1;

        let value = self.parse_top_level()?;
        let span = target.span.to(value.span);

        Some(Node::new(NodeKind::Assignment { target: Box::new(target),
                                              op,
                                              value: Box::new(value) },
                       span))
    }

    /// Parses a for-loop or a ternary expression, followed by any number of
    /// postfix indexes.
    ///
    /// Indexes apply to the whole expression before them, so `a + b[0]`
    /// indexes the sum.
    ///
    /// Grammar:
    /// ```text
    ///     top_level := (for_loop | ternary) ("[" top_level "]")*
    /// ```
    pub(crate) fn parse_top_level(&mut self) -> ParseResult<Node> {
        let expr = if self.at(&Token::For) {
            self.parse_for_loop()?
        } else {
            self.parse_ternary()?
        };

        if !self.at(&Token::LBracket) {
            return Some(expr);
        }

        match self.attempt(Self::parse_indexes) {
            Some((indexes, close)) => {
                let span = expr.span.to(close);
                Some(Node::new(NodeKind::Indexation { target: Box::new(expr),
                                                      indexes },
                               span))
            },
            None => Some(expr),
        }
    }

    /// Parses one or more `[index]` groups, returning the index expressions
    /// and the span of the last closing bracket.
    fn parse_indexes(&mut self) -> ParseResult<(Vec<Node>, Span)> {
        let mut indexes = Vec::new();
        let mut close = None;

        while self.eat(&Token::LBracket).is_some() {
            indexes.push(self.parse_top_level()?);
            close = Some(self.eat(&Token::RBracket)?);
        }

        close.map(|close| (indexes, close))
    }

    /// Parses a for-loop.
    ///
    /// Both assignment lists may be empty; the condition may not.
    ///
    /// Grammar:
    /// ```text
    ///     for_loop := "for" assignments ";" top_level ";" assignments block
    /// ```
    fn parse_for_loop(&mut self) -> ParseResult<Node> {
        let keyword = self.eat(&Token::For)?;
        let initializers =
            self.parse_comma_separated(Self::parse_assignment, &Token::Semicolon, true)?;
        let condition = self.parse_top_level()?;
        self.eat(&Token::Semicolon)?;
        let steps = self.parse_comma_separated(Self::parse_assignment, &Token::LBrace, false)?;
        let body = self.parse_block()?;
        let span = keyword.to(body.span);

        Some(Node::new(NodeKind::ForLoop { initializers,
                                           condition: Box::new(condition),
                                           steps,
                                           body: Box::new(body) },
                       span))
    }
}
