/// Numbers closer than this compare equal under `==`.
pub const EPSILON: f64 = 1e-10;

/// Largest integer value exactly representable as an `f64` (`2^53 - 1`).
pub const MAX_SAFE_INT: f64 = 9_007_199_254_740_991.0;

/// Compares two numbers with the language's `==` tolerance.
///
/// # Example
/// ```
/// use tensorpad::util::num::approx_eq;
///
/// assert!(approx_eq(0.1 + 0.2, 0.3));
/// assert!(!approx_eq(1.0, 1.001));
/// ```
#[must_use]
pub fn approx_eq(a: f64, b: f64) -> bool {
    (a - b).abs() < EPSILON
}

/// Converts a language boolean into a number.
#[must_use]
pub const fn bool_to_f64(value: bool) -> f64 {
    if value { 1.0 } else { 0.0 }
}

/// Converts a `usize` to `f64`.
///
/// Shapes and lengths never come near `2^53`, so the conversion is exact in
/// practice.
#[must_use]
#[allow(clippy::cast_precision_loss)]
pub const fn usize_to_f64(value: usize) -> f64 {
    value as f64
}

/// Converts an `f64` to a `usize` index if it is a non-negative whole number
/// that fits.
///
/// ## Returns
/// - `Some(usize)`: The index.
/// - `None`: If the value is negative, fractional, not finite, or too large.
///
/// ## Example
/// ```
/// use tensorpad::util::num::f64_to_index;
///
/// assert_eq!(f64_to_index(3.0), Some(3));
/// assert_eq!(f64_to_index(-1.0), None);
/// assert_eq!(f64_to_index(1.5), None);
/// ```
#[must_use]
#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
pub fn f64_to_index(value: f64) -> Option<usize> {
    if value.is_finite() && value >= 0.0 && value.fract() == 0.0 && value <= MAX_SAFE_INT {
        usize::try_from(value as u64).ok()
    } else {
        None
    }
}

/// Converts an `f64` to a 32-bit signed integer with wrap-around, the way
/// JavaScript's `ToInt32` does. Non-finite values become `0`.
///
/// ## Example
/// ```
/// use tensorpad::util::num::to_int32;
///
/// assert_eq!(to_int32(4_294_967_297.0), 1);
/// assert_eq!(to_int32(-1.9), -1);
/// assert_eq!(to_int32(f64::NAN), 0);
/// ```
#[must_use]
#[allow(clippy::cast_possible_truncation)]
pub fn to_int32(value: f64) -> i32 {
    if !value.is_finite() {
        return 0;
    }
    let truncated = value.trunc().rem_euclid(4_294_967_296.0);
    (truncated as u32).cast_signed()
}

/// Formats a number the way it is displayed to users.
///
/// Whole numbers print without a fractional part, infinities print as
/// `Infinity` and `-Infinity`, and very large or very small magnitudes use
/// exponent notation with an explicit sign (`1e+21`, `1e-7`).
///
/// ## Example
/// ```
/// use tensorpad::util::num::format_number;
///
/// assert_eq!(format_number(3.0), "3");
/// assert_eq!(format_number(0.1 + 0.2), "0.30000000000000004");
/// assert_eq!(format_number(-0.0), "0");
/// assert_eq!(format_number(f64::INFINITY), "Infinity");
/// assert_eq!(format_number(1e21), "1e+21");
/// assert_eq!(format_number(1.5e-7), "1.5e-7");
/// ```
#[must_use]
pub fn format_number(value: f64) -> String {
    if value.is_nan() {
        return "NaN".to_string();
    }
    if value.is_infinite() {
        return if value > 0.0 { "Infinity" } else { "-Infinity" }.to_string();
    }
    if value == 0.0 {
        return "0".to_string();
    }

    let magnitude = value.abs();
    if (1e-6..1e21).contains(&magnitude) {
        return format!("{value}");
    }

    let formatted = format!("{value:e}");
    match formatted.split_once('e') {
        Some((mantissa, exponent)) if !exponent.starts_with('-') => {
            format!("{mantissa}e+{exponent}")
        },
        _ => formatted,
    }
}
