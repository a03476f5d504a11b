//! # tensorpad
//!
//! tensorpad is the interpreter behind a notebook-style calculator for numbers
//! and tensors. A program is a list of statements separated by `;` or new
//! lines. Evaluating it yields the value of the last statement, every error
//! that happened on the way, and the records produced by `print`, `graph` and
//! `plot` for a renderer to draw.
//!
//! ```
//! use tensorpad::run;
//!
//! let context = run("A := [[1, 2], [3, 4]]\nv := [1, 1]\nA ** v");
//! assert_eq!(context.program_result.to_string(), "shape: 2, data: [3, 7]");
//! assert!(context.errors.is_empty());
//! ```

#![warn(
    clippy::redundant_clone,
    clippy::needless_pass_by_value,
    clippy::similar_names,
    clippy::large_enum_variant,
    clippy::string_lit_as_bytes,
    clippy::match_same_arms,
    clippy::cargo,
    clippy::nursery,
    clippy::perf,
    clippy::style,
    clippy::suspicious,
    clippy::correctness,
    clippy::complexity,
    clippy::pedantic,
    //missing_docs,
)]
#![allow(clippy::missing_errors_doc)]

use crate::{
    ast::Program,
    interpreter::{
        evaluator::core::{Context, EvalOptions},
        parser::core::parse_program,
        value::core::Value,
    },
};

/// Defines the structure of parsed code.
///
/// Every expression is a [`ast::Node`] carrying the half-open byte span of
/// the source it was parsed from. Spans are how errors point back into the
/// program and how functions remember the text they were defined with.
pub mod ast;
/// Provides the error types for parsing and evaluation.
///
/// A program has at most one [`error::ParseError`]; evaluation can record
/// any number of [`error::RuntimeError`]s, each tied to the span of the node
/// that raised it.
pub mod error;
/// Orchestrates the entire process of code execution.
///
/// Ties together lexing, parsing, evaluation and the runtime values.
pub mod interpreter;
/// General utilities for numeric conversion, formatting and stack growth.
pub mod util;

/// Parses `source` into a program without evaluating it.
///
/// # Example
/// ```
/// let program = tensorpad::parse("a := 1\na + 1");
/// assert_eq!(program.statements.len(), 2);
/// assert!(program.parse_error.is_none());
/// ```
#[must_use]
pub fn parse(source: &str) -> Program {
    parse_program(source)
}

/// Parses and evaluates `source` with the default limits.
///
/// The returned context holds the result, the recorded errors and the output
/// records.
///
/// # Example
/// ```
/// use tensorpad::interpreter::value::core::Value;
///
/// let context = tensorpad::run("x := 2\ny := q + 1\nx + 3");
///
/// assert_eq!(context.errors.len(), 1);
/// assert_eq!(context.program_result, Value::Number(5.0));
/// ```
#[must_use]
pub fn run(source: &str) -> Context {
    run_with_options(source, EvalOptions::default())
}

/// Parses and evaluates `source` with custom limits.
///
/// # Example
/// ```
/// use tensorpad::{
///     error::RuntimeError,
///     interpreter::evaluator::core::EvalOptions,
///     run_with_options,
/// };
///
/// let options = EvalOptions { max_iterations: 10,
///                             ..EvalOptions::default() };
/// let context = run_with_options("for i := 0; 1; i += 1 {}", options);
///
/// assert!(matches!(context.errors[0], RuntimeError::IterationLimitExceeded { limit: 10, .. }));
/// ```
#[must_use]
pub fn run_with_options(source: &str, options: EvalOptions) -> Context {
    let program = parse_program(source);
    let mut context = Context::new(source, options);
    context.run(&program);
    context
}

/// Evaluates `source` and returns the value of its last statement.
///
/// # Errors
/// The parse error if the source does not parse, otherwise the first runtime
/// error recorded while evaluating it.
///
/// # Examples
/// ```
/// use tensorpad::{get_result, interpreter::value::core::Value};
///
/// assert_eq!(get_result("2 + 3 * 4").unwrap(), Value::Number(14.0));
///
/// // `x` is not defined
/// assert!(get_result("y := x + 1").is_err());
///
/// // the closing bracket is missing
/// assert!(get_result("(1 + 2").is_err());
/// ```
pub fn get_result(source: &str) -> Result<Value, Box<dyn std::error::Error>> {
    let program = parse_program(source);
    if let Some(parse_error) = program.parse_error {
        return Err(Box::new(parse_error));
    }

    let mut context = Context::new(source, EvalOptions::default());
    context.run(&program);

    match context.errors.into_iter().next() {
        Some(error) => Err(Box::new(error)),
        None => Ok(context.program_result),
    }
}
