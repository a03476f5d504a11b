use crate::{
    ast::{Constant, Node, NodeKind, Span, UnaryOperator},
    interpreter::{
        lexer::Token,
        parser::core::{ParseResult, Parser},
    },
    util::stack::ensure_sufficient_stack,
};

impl Parser<'_> {
    /// Parses an atom.
    ///
    /// The alternatives are tried in a fixed order and the first one that
    /// matches wins:
    /// - block `{ ... }`
    /// - parenthesized group `( ... )`
    /// - prefix operator applied to an atom
    /// - function call `name(args)`
    /// - identifier or builtin constant
    /// - clock literal `7:30pm`
    /// - number literal
    /// - tensor literal `[ ... ]`
    /// - string literal
    /// - list literal `< ... >`
    ///
    /// Every nested group, block or literal passes through here, so this is
    /// where the native stack is grown for deeply nested source.
    pub(crate) fn parse_atom(&mut self) -> ParseResult<Node> {
        let productions: [fn(&mut Self) -> ParseResult<Node>; 10] =
            [Self::parse_block,
             Self::parse_group,
             Self::parse_unary,
             Self::parse_call,
             Self::parse_identifier,
             Self::parse_clock,
             Self::parse_number,
             Self::parse_tensor,
             Self::parse_string,
             Self::parse_list];

        ensure_sufficient_stack(|| {
            productions.into_iter()
                       .find_map(|production| self.attempt(production))
        })
    }

    /// Parses a parenthesized expression.
    ///
    /// No node is created for the parentheses; the inner node's span is
    /// widened to cover them instead.
    fn parse_group(&mut self) -> ParseResult<Node> {
        let open = self.eat(&Token::LParen)?;
        let mut inner = self.parse_top_level()?;
        let close = self.eat(&Token::RParen)?;
        inner.span = Span::new(open.start, close.end);

        Some(inner)
    }

    /// Parses a prefix operator applied to an atom.
    ///
    /// Grammar: `unary := ("-" | "+" | "~") atom`
    fn parse_unary(&mut self) -> ParseResult<Node> {
        let op = match self.peek()? {
            Token::Minus => UnaryOperator::Negate,
            Token::Plus => UnaryOperator::Plus,
            Token::Tilde => UnaryOperator::Transpose,
            _ => return None,
        };
        let (_, op_span) = self.bump()?;
        let operand = self.parse_atom()?;
        let span = op_span.to(operand.span);

        Some(Node::new(NodeKind::Unary { op,
                                         operand: Box::new(operand) },
                       span))
    }

    /// Parses a function call.
    ///
    /// The opening parenthesis must directly follow the name, so `f (x)` is
    /// not a call.
    fn parse_call(&mut self) -> ParseResult<Node> {
        let Some((Token::Identifier(name), name_span)) = self.bump() else {
            return None;
        };
        let paren = self.eat(&Token::LParen)?;
        if paren.start != name_span.end {
            return None;
        }

        let args = self.parse_comma_separated(Self::parse_assignment, &Token::RParen, true)?;
        let span = name_span.to(self.previous_span());

        Some(Node::new(NodeKind::FunctionCall { name,
                                                name_span,
                                                args },
                       span))
    }

    /// Parses an identifier. `PI`, `E` and `PHI` become builtin constants.
    fn parse_identifier(&mut self) -> ParseResult<Node> {
        let Some((Token::Identifier(name), span)) = self.bump() else {
            return None;
        };

        let kind = Constant::from_name(&name).map_or(NodeKind::Identifier(name),
                                                     NodeKind::BuiltinConstant);
        Some(Node::new(kind, span))
    }

    /// Parses a clock literal such as `7:30`, `7:30pm` or `11:15 AM`.
    ///
    /// The hour must be a whole number and the colon must touch both the hour
    /// and the minutes. `pm` adds twelve hours to hours below twelve. The
    /// value is the number of minutes since midnight.
    fn parse_clock(&mut self) -> ParseResult<Node> {
        let Some((Token::Number(hours), hour_span)) = self.bump() else {
            return None;
        };
        if hour_span.text(self.source).contains('.') {
            return None;
        }
        let colon = self.eat(&Token::Colon)?;
        let Some((Token::Number(minutes), minute_span)) = self.bump() else {
            return None;
        };
        if colon.start != hour_span.end || minute_span.start != colon.end {
            return None;
        }

        let mut hours = hours;
        let mut span = hour_span.to(minute_span);
        if let Some((Token::Identifier(suffix), suffix_span)) = self.peek_nth(0) {
            let is_am = suffix.eq_ignore_ascii_case("am");
            let is_pm = suffix.eq_ignore_ascii_case("pm");
            if is_am || is_pm {
                if is_pm && hours < 12.0 {
                    hours += 12.0;
                }
                span = span.to(*suffix_span);
                self.pos += 1;
            }
        }

        Some(Node::new(NodeKind::Number(hours * 60.0 + minutes), span))
    }

    /// Parses a numeric literal.
    fn parse_number(&mut self) -> ParseResult<Node> {
        match self.bump()? {
            (Token::Number(value), span) => Some(Node::new(NodeKind::Number(value), span)),
            _ => None,
        }
    }

    /// Parses a string literal.
    fn parse_string(&mut self) -> ParseResult<Node> {
        match self.bump()? {
            (Token::Str(value), span) => Some(Node::new(NodeKind::String(value), span)),
            _ => None,
        }
    }

    /// Parses a tensor literal.
    ///
    /// Grammar: `tensor := "[" (top_level ("," top_level)* ","?)? "]"`
    fn parse_tensor(&mut self) -> ParseResult<Node> {
        let open = self.eat(&Token::LBracket)?;
        let rows = self.parse_comma_separated(Self::parse_top_level, &Token::RBracket, true)?;
        let span = open.to(self.previous_span());

        Some(Node::new(NodeKind::Tensor { rows }, span))
    }

    /// Parses a list literal.
    ///
    /// Grammar: `list := "<" (top_level ("," top_level)* ","?)? ">"`
    fn parse_list(&mut self) -> ParseResult<Node> {
        let open = self.eat(&Token::Less)?;
        let items = self.parse_comma_separated(Self::parse_top_level, &Token::Greater, true)?;
        let span = open.to(self.previous_span());

        Some(Node::new(NodeKind::List { items }, span))
    }
}
