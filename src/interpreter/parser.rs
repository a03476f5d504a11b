/// Parser state, cursor handling and the program entry point.
///
/// Every production is a method on [`core::Parser`] that either matches and
/// advances the cursor or fails; failed attempts restore the cursor.
pub mod core;

/// Atom parsing.
///
/// Handles prefix operators and the atoms of the language: groups, calls,
/// identifiers, clock and number literals, tensors, strings and lists.
pub mod unary;

/// Operator chain parsing.
///
/// Implements the ternary and the comparison, additive, multiplicative and
/// exponent chains.
pub mod binary;

/// Block parsing.
pub mod block;

/// Shared helpers for delimited lists.
pub mod utils;

/// Statement parsing.
///
/// Implements statement lists, assignments, for-loops and postfix
/// indexation of top-level expressions.
pub mod statement;
