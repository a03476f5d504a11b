/// Numeric conversion and formatting helpers.
///
/// Collects the conversions between `f64` and the integer types used for
/// shapes and indices, together with the number formatting shared by every
/// value display.
pub mod num;
/// Native stack growth for deep recursion.
pub mod stack;
