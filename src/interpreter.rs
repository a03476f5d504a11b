/// The evaluator module executes AST nodes and computes results.
///
/// The evaluator walks the AST with a [`evaluator::core::Context`], manages
/// the scope stack, applies operators and builtins, and records runtime
/// errors at statement and loop-iteration boundaries.
///
/// # Responsibilities
/// - Evaluates every node kind, including assignments and for-loops.
/// - Resolves variables through nested scopes and captured cells.
/// - Collects the output records of `print`, `graph` and `plot`.
pub mod evaluator;
/// The lexer module tokenizes source code for further parsing.
///
/// The lexer reads the raw source text and produces tokens paired with their
/// byte spans: numbers, strings, identifiers, the `for` keyword, operators
/// and delimiters. Whitespace and `//` comments are skipped.
pub mod lexer;
/// The parser module builds the abstract syntax tree (AST) from tokens.
///
/// A backtracking recursive-descent parser. It returns every statement it
/// could read and stops at the first position it cannot, reporting it as a
/// [`crate::error::ParseError`].
pub mod parser;
/// The value module defines the runtime data types for evaluation.
///
/// Numbers, tensors, strings, user functions, lists, null, and errors, which
/// are values too.
pub mod value;
