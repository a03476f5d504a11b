use logos::Logos;

use crate::ast::Span;

/// Represents a lexical token in the source input.
/// A token is a minimal but meaningful unit of text produced by the lexer.
/// This enum defines all recognized tokens in the language.
#[derive(Logos, Debug, PartialEq, Clone)]
pub enum Token {
    /// Numeric literal tokens, such as `3`, `3.14` or `2.`.
    #[regex(r"[0-9]+(\.[0-9]*)?", parse_number)]
    Number(f64),
    /// String literal tokens, such as `"hello"`. `\"` is the only escape.
    #[regex(r#""([^"\\]|\\.)*""#, parse_string, allow_greedy = true)]
    Str(String),
    /// `for`
    #[token("for")]
    For,
    /// Identifier tokens; variable or function names such as `x` or `área`.
    #[regex(r"[\p{L}_][\p{L}\p{N}_]*", |lex| lex.slice().to_string())]
    Identifier(String),
    /// `// Comments.`
    #[regex(r"//[^\n\r]*", logos::skip, allow_greedy = true)]
    Comment,
    /// `:=`
    #[token(":=")]
    ColonAssign,
    /// `+=`
    #[token("+=")]
    PlusAssign,
    /// `-=`
    #[token("-=")]
    MinusAssign,
    /// `=`
    #[token("=")]
    Assign,
    /// `==`
    #[token("==")]
    EqualEqual,
    /// `<=`
    #[token("<=")]
    LessEqual,
    /// `>=`
    #[token(">=")]
    GreaterEqual,
    /// `<`
    #[token("<")]
    Less,
    /// `>`
    #[token(">")]
    Greater,
    /// `+`
    #[token("+")]
    Plus,
    /// `-`
    #[token("-")]
    Minus,
    /// `*`
    #[token("*")]
    Star,
    /// `**`
    #[token("**")]
    StarStar,
    /// `/`
    #[token("/")]
    Slash,
    /// `%`
    #[token("%")]
    Percent,
    /// `^`
    #[token("^")]
    Caret,
    /// `~`
    #[token("~")]
    Tilde,
    /// `?`
    #[token("?")]
    Question,
    /// `:`
    #[token(":")]
    Colon,
    /// `;`
    #[token(";")]
    Semicolon,
    /// `,`
    #[token(",")]
    Comma,
    /// `(`
    #[token("(")]
    LParen,
    /// `)`
    #[token(")")]
    RParen,
    /// `[`
    #[token("[")]
    LBracket,
    /// `]`
    #[token("]")]
    RBracket,
    /// `{`
    #[token("{")]
    LBrace,
    /// `}`
    #[token("}")]
    RBrace,
    /// Spaces, tabs, newlines and byte order marks.
    #[regex(r"[\s\u{feff}]+", logos::skip)]
    Ignored,
}

/// Parses a numeric literal from the current token slice.
///
/// # Returns
/// - `Some(f64)`: The parsed value; a trailing `.` is accepted.
/// - `None`: If the slice is not a valid number.
fn parse_number(lex: &logos::Lexer<Token>) -> Option<f64> {
    lex.slice().parse().ok()
}

/// Strips the quotes of a string literal and resolves `\"`.
fn parse_string(lex: &logos::Lexer<Token>) -> String {
    let slice = lex.slice();
    slice.get(1..slice.len() - 1)
         .unwrap_or_default()
         .replace("\\\"", "\"")
}

/// The tokens of a source text together with their byte spans.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct TokenStream {
    /// Every token read before the first lexing failure.
    pub tokens:       Vec<(Token, Span)>,
    /// Byte offset of the first character that could not be tokenized.
    pub error_offset: Option<usize>,
}

/// Splits `source` into tokens.
///
/// Tokenizing stops at the first unrecognized character; everything before it
/// is still returned so the parser can read as much as possible.
///
/// # Example
/// ```
/// use tensorpad::interpreter::lexer::{Token, tokenize};
///
/// let stream = tokenize("x := 2 // two");
/// let tokens: Vec<_> = stream.tokens.into_iter().map(|(t, _)| t).collect();
/// assert_eq!(tokens,
///            vec![Token::Identifier("x".into()), Token::ColonAssign, Token::Number(2.0)]);
/// assert_eq!(stream.error_offset, None);
/// ```
#[must_use]
pub fn tokenize(source: &str) -> TokenStream {
    let mut stream = TokenStream::default();
    let mut lexer = Token::lexer(source);

    while let Some(token) = lexer.next() {
        let range = lexer.span();
        if let Ok(tok) = token {
            stream.tokens.push((tok, Span::new(range.start, range.end)));
        } else {
            stream.error_offset = Some(range.start);
            break;
        }
    }

    stream
}
