use crate::{
    ast::{BinaryOperator, Node, NodeKind},
    interpreter::{
        lexer::Token,
        parser::core::{ParseResult, Parser},
    },
};

impl Parser<'_> {
    /// Parses a conditional expression.
    ///
    /// The condition and the first branch are comparison chains; the second
    /// branch may itself be a ternary, which makes the operator
    /// right-associative.
    ///
    /// Grammar:
    /// ```text
    ///     ternary := comparison ("?" comparison ":" ternary)?
    /// ```
    pub(crate) fn parse_ternary(&mut self) -> ParseResult<Node> {
        let condition = self.parse_comparison()?;

        if self.eat(&Token::Question).is_none() {
            return Some(condition);
        }

        let if_true = self.parse_comparison()?;
        self.eat(&Token::Colon)?;
        let if_false = self.parse_ternary()?;
        let span = condition.span.to(if_false.span);

        Some(Node::new(NodeKind::Ternary { condition: Box::new(condition),
                                           if_true:   Box::new(if_true),
                                           if_false:  Box::new(if_false), },
                       span))
    }

    /// Parses comparison chains.
    ///
    /// The rule is: `comparison := additive (("<" | ">" | "<=" | ">=" | "==")
    /// additive)*`
    fn parse_comparison(&mut self) -> ParseResult<Node> {
        self.parse_chain(Self::parse_additive, |token| match token {
                Token::Less => Some(BinaryOperator::Less),
                Token::Greater => Some(BinaryOperator::Greater),
                Token::LessEqual => Some(BinaryOperator::LessEqual),
                Token::GreaterEqual => Some(BinaryOperator::GreaterEqual),
                Token::EqualEqual => Some(BinaryOperator::Equal),
                _ => None,
            })
    }

    /// Parses addition and subtraction chains.
    ///
    /// The rule is: `additive := multiplicative (("+" | "-") multiplicative)*`
    fn parse_additive(&mut self) -> ParseResult<Node> {
        self.parse_chain(Self::parse_multiplicative, |token| match token {
                Token::Plus => Some(BinaryOperator::Add),
                Token::Minus => Some(BinaryOperator::Sub),
                _ => None,
            })
    }

    /// Parses multiplication-level chains, including the matrix product.
    ///
    /// The rule is: `multiplicative := exponent (("*" | "/" | "%" | "**")
    /// exponent)*`
    fn parse_multiplicative(&mut self) -> ParseResult<Node> {
        self.parse_chain(Self::parse_exponent, |token| match token {
                Token::Star => Some(BinaryOperator::Mul),
                Token::Slash => Some(BinaryOperator::Div),
                Token::Percent => Some(BinaryOperator::Mod),
                Token::StarStar => Some(BinaryOperator::MatMul),
                _ => None,
            })
    }

    /// Parses exponent chains.
    ///
    /// Like every other chain this one is evaluated left to right, so
    /// `2^3^2` is `(2^3)^2`.
    ///
    /// The rule is: `exponent := atom ("^" atom)*`
    fn parse_exponent(&mut self) -> ParseResult<Node> {
        self.parse_chain(Self::parse_atom, |token| match token {
                Token::Caret => Some(BinaryOperator::Pow),
                _ => None,
            })
    }

    /// Parses `operand (operator operand)*` into a flat [`NodeKind::Chain`].
    ///
    /// If an operator is not followed by a valid operand, the chain ends
    /// before that operator and the cursor is left on it. A chain of one
    /// operand is returned as that operand.
    fn parse_chain(&mut self,
                   operand: fn(&mut Self) -> ParseResult<Node>,
                   operator: fn(&Token) -> Option<BinaryOperator>)
                   -> ParseResult<Node> {
        let first = operand(self)?;
        let mut rest = Vec::new();

        while let Some(op) = self.peek().and_then(operator) {
            let before = self.pos;
            self.pos += 1;
            match self.attempt(operand) {
                Some(node) => rest.push((op, node)),
                None => {
                    self.pos = before;
                    break;
                },
            }
        }

        let Some((_, last)) = rest.last() else {
            return Some(first);
        };
        let span = first.span.to(last.span);

        Some(Node::new(NodeKind::Chain { first: Box::new(first),
                                         rest },
                       span))
    }
}
