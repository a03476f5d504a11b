use crate::interpreter::{
    lexer::Token,
    parser::core::{ParseResult, Parser},
};

impl Parser<'_> {
    /// Parses a comma-separated list of items until a closing token.
    ///
    /// This utility is shared by tensor and list literals, call arguments and
    /// the two assignment lists of a for-loop. An immediately encountered
    /// closing token produces an empty list, and a trailing comma before the
    /// closing token is allowed.
    ///
    /// Grammar (simplified): `list := (item ("," item)* ","?)? closing`
    ///
    /// # Parameters
    /// - `parse_item`: Production used for each element.
    /// - `closing`: The token that terminates the list.
    /// - `consume_closing`: Whether the closing token is consumed. The step
    ///   list of a for-loop leaves its `{` for the body.
    ///
    /// # Returns
    /// The parsed items, or `None` when an item fails or a token other than a
    /// comma or `closing` follows an item.
    pub(crate) fn parse_comma_separated<T>(&mut self,
                                           parse_item: fn(&mut Self) -> ParseResult<T>,
                                           closing: &Token,
                                           consume_closing: bool)
                                           -> ParseResult<Vec<T>> {
        let mut items = Vec::new();
        let finish = |parser: &mut Self| {
            if consume_closing {
                parser.pos += 1;
            }
        };

        if self.at(closing) {
            finish(self);
            return Some(items);
        }

        loop {
            items.push(parse_item(self)?);

            if self.eat(&Token::Comma).is_some() {
                if self.at(closing) {
                    finish(self);
                    return Some(items);
                }
            } else if self.at(closing) {
                finish(self);
                return Some(items);
            } else {
                return None;
            }
        }
    }
}
