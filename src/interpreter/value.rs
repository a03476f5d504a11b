/// The `Value` enum and its display rules.
pub mod core;
/// N-dimensional tensor storage.
///
/// Defines the `Tensor` type: a flat row-major buffer plus an explicit
/// shape. Constructors enforce that the buffer length equals the product of
/// the shape and that no dimension is zero.
pub mod tensor;
/// User-defined functions and the binding cells they capture.
pub mod function;
