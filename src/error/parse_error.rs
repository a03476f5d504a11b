/// Longest source excerpt quoted in a parse error.
pub const SNIPPET_LENGTH: usize = 50;

#[derive(Debug, Clone, PartialEq, Eq)]
/// Reports the first position the parser could not read.
///
/// Parsing stops at the first failure, so a program carries at most one of
/// these. A program that carries one is not evaluated.
pub struct ParseError {
    /// 1-based line of the failure.
    pub line:    usize,
    /// 1-based column of the failure, counted in characters.
    pub column:  usize,
    /// Byte offset of the failure.
    pub offset:  usize,
    /// The unread remainder of the source, truncated to [`SNIPPET_LENGTH`]
    /// characters with `...` appended when longer.
    pub snippet: String,
}

impl ParseError {
    /// Builds the error for a failure at byte `offset` of `source`.
    ///
    /// # Example
    /// ```
    /// use tensorpad::error::ParseError;
    ///
    /// let err = ParseError::at("x := 1\ny := )", 12);
    /// assert_eq!(err.to_string(), "Couldn't read line 2 pos 6: \")\"");
    /// ```
    #[must_use]
    pub fn at(source: &str, offset: usize) -> Self {
        let offset = offset.min(source.len());
        let before = source.get(..offset).unwrap_or(source);
        let line = before.matches('\n').count() + 1;
        let line_start = before.rfind('\n').map_or(0, |i| i + 1);
        let column = source.get(line_start..offset)
                           .map_or(0, |s| s.chars().count())
                     + 1;

        let rest = source.get(offset..).unwrap_or("");
        let mut snippet: String = rest.chars().take(SNIPPET_LENGTH).collect();
        if rest.chars().count() > SNIPPET_LENGTH {
            snippet.push_str("...");
        }

        Self { line,
               column,
               offset,
               snippet }
    }
}

impl std::fmt::Display for ParseError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f,
               "Couldn't read line {} pos {}: \"{}\"",
               self.line, self.column, self.snippet)
    }
}

impl std::error::Error for ParseError {}
