use crate::{
    ast::BinaryOperator,
    util::num::{approx_eq, bool_to_f64},
};

/// Applies a binary operator to two numbers.
///
/// Arithmetic follows IEEE-754 doubles: `%` is the truncated remainder and
/// `^` is `powf`. Comparisons yield `1` or `0`, and `==` tolerates a
/// difference below `1e-10`.
///
/// # Returns
/// `None` for `**`, which is only defined on tensors.
///
/// # Example
/// ```
/// use tensorpad::{ast::BinaryOperator, interpreter::evaluator::binary::scalar::apply_scalar};
///
/// assert_eq!(apply_scalar(BinaryOperator::Mod, -7.0, 3.0), Some(-1.0));
/// assert_eq!(apply_scalar(BinaryOperator::Equal, 0.1 + 0.2, 0.3), Some(1.0));
/// assert_eq!(apply_scalar(BinaryOperator::MatMul, 1.0, 2.0), None);
/// ```
#[must_use]
pub fn apply_scalar(op: BinaryOperator, a: f64, b: f64) -> Option<f64> {
    use BinaryOperator::{
        Add, Div, Equal, Greater, GreaterEqual, Less, LessEqual, MatMul, Mod, Mul, Pow, Sub,
    };

    Some(match op {
        Add => a + b,
        Sub => a - b,
        Mul => a * b,
        Div => a / b,
        Mod => a % b,
        Pow => a.powf(b),
        Less => bool_to_f64(a < b),
        Greater => bool_to_f64(a > b),
        LessEqual => bool_to_f64(a <= b),
        GreaterEqual => bool_to_f64(a >= b),
        Equal => bool_to_f64(approx_eq(a, b)),
        MatMul => return None,
    })
}
