/// Binary operator evaluation logic.
///
/// Resolves every binary operator by the types of its two operands: scalar
/// arithmetic, elementwise tensor operations with broadcasting, matrix
/// multiplication, string concatenation and list appends.
pub mod binary;

/// Unary operator evaluation logic.
///
/// Implements negation, identity and tensor transposition.
pub mod unary;

/// Core evaluation logic and context management.
///
/// Contains the main evaluation engine, the per-run context, the evaluation
/// limits and the error recording rules.
pub mod core;

/// Hierarchical variable storage.
///
/// A stack of pooled frames mapping names to shared binding cells.
pub mod scope;

/// Evaluation of for-loop expressions.
///
/// Runs initializers, the condition check, the body and the step
/// assignments, enforcing the iteration ceiling.
pub mod for_loop;

/// Evaluation of `:=`, `=`, `+=` and `-=`.
///
/// Covers plain variables, indexed tensor and list cells, and function
/// definitions.
pub mod assignment;

/// Tensor and list indexing.
///
/// Turns index selectors into flat offsets and performs indexed reads and
/// writes.
pub mod index;

/// Free variable analysis for function definitions.
pub mod capture;

/// Sampling of graph records into points.
pub mod graph;

/// Utility functions for evaluation.
///
/// Provides helpers and reusable routines shared by evaluation logic.
pub mod utils;

/// Function evaluation.
///
/// Handles user-defined and built-in function calls, argument checking, and
/// the output records produced by `print`, `graph` and `plot`.
pub mod function;
