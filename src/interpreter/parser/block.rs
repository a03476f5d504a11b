use crate::{
    ast::{Node, NodeKind, Span},
    interpreter::{
        lexer::Token,
        parser::core::{ParseResult, Parser},
    },
};

impl Parser<'_> {
    /// Parses a block expression delimited by braces.
    ///
    /// A block holds zero or more statements separated by `;` or newlines.
    ///
    /// Grammar: `block := "{" statement* "}"`
    ///
    /// # Returns
    /// A [`NodeKind::Block`] spanning both braces.
    pub(crate) fn parse_block(&mut self) -> ParseResult<Node> {
        let open = self.eat(&Token::LBrace)?;
        let statements = self.parse_statement_list();
        let close = self.eat(&Token::RBrace)?;

        Some(Node::new(NodeKind::Block { statements },
                       Span::new(open.start, close.end)))
    }
}
