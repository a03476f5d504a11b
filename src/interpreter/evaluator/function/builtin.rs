use crate::{
    ast::Span,
    interpreter::{
        evaluator::{core::EvalResult, utils::expect_number},
        value::core::Value,
    },
    util::num::{format_number, to_int32},
};

/// Defines builtins that apply a function to one number.
///
/// The argument must be a [`Value::Number`]; anything else is a type
/// mismatch naming the builtin.
///
/// # Example
/// ```
/// use tensorpad::{
///     ast::Span,
///     interpreter::{evaluator::function::builtin::sqrt, value::core::Value},
/// };
///
/// let r = sqrt(&[Value::Number(9.0)], Span::default()).unwrap();
/// assert_eq!(r, Value::Number(3.0));
///
/// let err = sqrt(&[Value::from("nine")], Span::default()).unwrap_err();
/// assert_eq!(err.to_string(),
///            "Argument 0 to function sqrt was of type STRING, but it wants NUMBER");
/// ```
macro_rules! unary_builtin {
    ($($fname:ident => $func:expr),* $(,)?) => {
        $(
            pub fn $fname(args: &[Value], span: Span) -> EvalResult<Value> {
                let x = expect_number(args, 0, stringify!($fname), span)?;
                Ok(Value::Number($func(x)))
            }
        )*
    };
}

unary_builtin! {
    abs => f64::abs,
    acos => f64::acos,
    acosh => f64::acosh,
    asin => f64::asin,
    asinh => f64::asinh,
    atan => f64::atan,
    atanh => f64::atanh,
    ceil => f64::ceil,
    cos => f64::cos,
    cosh => f64::cosh,
    exp => f64::exp,
    floor => f64::floor,
    log => f64::ln,
    log1p => f64::ln_1p,
    log10 => f64::log10,
    log2 => f64::log2,
    round => round_half_up,
    sign => sign_of,
    sin => f64::sin,
    sinh => f64::sinh,
    sqrt => f64::sqrt,
    tan => f64::tan,
    tanh => f64::tanh,
    trunc => f64::trunc,
}

/// Rounds to the nearest integer, with halves going towards positive
/// infinity (`round(-2.5) == -2`).
fn round_half_up(x: f64) -> f64 {
    let floor = x.floor();
    if x - floor >= 0.5 { floor + 1.0 } else { floor }
}

/// `1` for positive numbers, `-1` for negative ones. Zeros and `NaN` are
/// returned unchanged.
fn sign_of(x: f64) -> f64 {
    if x > 0.0 {
        1.0
    } else if x < 0.0 {
        -1.0
    } else {
        x
    }
}

/// Collects every argument as a number.
fn numbers(args: &[Value], function: &str, span: Span) -> EvalResult<Vec<f64>> {
    (0..args.len()).map(|i| expect_number(args, i, function, span))
                   .collect()
}

/// `atan2(y, x)`: the angle of the point `(x, y)`.
pub fn atan2(args: &[Value], span: Span) -> EvalResult<Value> {
    let y = expect_number(args, 0, "atan2", span)?;
    let x = expect_number(args, 1, "atan2", span)?;
    Ok(Value::Number(y.atan2(x)))
}

/// `pow(base, exponent)`.
pub fn pow(args: &[Value], span: Span) -> EvalResult<Value> {
    let base = expect_number(args, 0, "pow", span)?;
    let exponent = expect_number(args, 1, "pow", span)?;
    Ok(Value::Number(base.powf(exponent)))
}

/// `imul(a, b)`: both arguments are truncated to 32-bit integers and
/// multiplied with wrap-around.
///
/// # Example
/// ```
/// use tensorpad::{
///     ast::Span,
///     interpreter::{evaluator::function::builtin::imul, value::core::Value},
/// };
///
/// let r = imul(&[Value::Number(4_294_967_295.0), Value::Number(5.0)], Span::default());
/// assert_eq!(r.unwrap(), Value::Number(-5.0));
/// ```
pub fn imul(args: &[Value], span: Span) -> EvalResult<Value> {
    let a = to_int32(expect_number(args, 0, "imul", span)?);
    let b = to_int32(expect_number(args, 1, "imul", span)?);
    Ok(Value::Number(f64::from(a.wrapping_mul(b))))
}

/// `hypot(x, y, ...)`: the square root of the sum of squares.
pub fn hypot(args: &[Value], span: Span) -> EvalResult<Value> {
    let values = numbers(args, "hypot", span)?;
    Ok(Value::Number(values.into_iter().fold(0.0, f64::hypot)))
}

/// `max(x, ...)`. Any `NaN` argument makes the result `NaN`.
pub fn max(args: &[Value], span: Span) -> EvalResult<Value> {
    let values = numbers(args, "max", span)?;
    Ok(Value::Number(extremum(&values, f64::NEG_INFINITY, f64::max)))
}

/// `min(x, ...)`. Any `NaN` argument makes the result `NaN`.
pub fn min(args: &[Value], span: Span) -> EvalResult<Value> {
    let values = numbers(args, "min", span)?;
    Ok(Value::Number(extremum(&values, f64::INFINITY, f64::min)))
}

fn extremum(values: &[f64], start: f64, pick: fn(f64, f64) -> f64) -> f64 {
    if values.iter().any(|x| x.is_nan()) {
        return f64::NAN;
    }
    values.iter().copied().fold(start, pick)
}

/// `random()`: a uniformly distributed number in `[0, 1)`. Arguments are
/// ignored.
pub fn random(_args: &[Value], _span: Span) -> EvalResult<Value> {
    Ok(Value::Number(rand::random::<f64>()))
}

/// `lerp(a, b, t)`: linear interpolation with `t` clamped to `[0, 1]`.
///
/// # Example
/// ```
/// use tensorpad::{
///     ast::Span,
///     interpreter::{evaluator::function::builtin::lerp, value::core::Value},
/// };
///
/// let at = |t: f64| {
///     lerp(&[Value::Number(10.0), Value::Number(20.0), Value::Number(t)], Span::default()).unwrap()
/// };
/// assert_eq!(at(0.25), Value::Number(12.5));
/// assert_eq!(at(-1.0), Value::Number(10.0));
/// assert_eq!(at(3.0), Value::Number(20.0));
/// ```
pub fn lerp(args: &[Value], span: Span) -> EvalResult<Value> {
    let a = expect_number(args, 0, "lerp", span)?;
    let b = expect_number(args, 1, "lerp", span)?;
    let t = expect_number(args, 2, "lerp", span)?;
    Ok(Value::Number(lerp_clamped(a, b, t)))
}

/// Interpolates between `a` and `b`, returning the nearer end when `t` lies
/// outside `[0, 1]`.
#[must_use]
pub fn lerp_clamped(a: f64, b: f64, t: f64) -> f64 {
    if t < 0.0 {
        a
    } else if t > 1.0 {
        b
    } else {
        (b - a).mul_add(t, a)
    }
}

/// `toHm(minutes)`: formats a number of minutes as `"{h}h {m}m"`.
///
/// # Example
/// ```
/// use tensorpad::{
///     ast::Span,
///     interpreter::{evaluator::function::builtin::to_hm, value::core::Value},
/// };
///
/// let r = to_hm(&[Value::Number(450.0)], Span::default()).unwrap();
/// assert_eq!(r, Value::from("7h 30m"));
/// ```
pub fn to_hm(args: &[Value], span: Span) -> EvalResult<Value> {
    let minutes = expect_number(args, 0, "toHm", span)?;
    Ok(Value::from(format!("{}h {}m",
                           format_number((minutes / 60.0).floor()),
                           format_number(minutes % 60.0))))
}
