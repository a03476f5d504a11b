/// Operator dispatch on operand types and chain evaluation.
pub mod core;

/// Number with number arithmetic and comparisons.
pub mod scalar;

/// Elementwise tensor operations with broadcasting.
pub mod tensor;

/// Dot products and matrix multiplication for the `**` operator.
pub mod matmul;
