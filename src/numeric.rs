//! Floating-point precision control.
//!
//! Every family that emits a non-integer value runs it through [`round_sig`]
//! before it reaches a template or a canonical answer, and the checker's
//! tolerance lives here too, so generation precision and comparison precision
//! cannot drift apart.

/// Precision for exact decimal arithmetic (powers of 10).
pub const ARITHMETIC_SIG_DIGITS: usize = 15;

/// Precision for values a learner reads and types back (unit conversions, FDP).
pub const DISPLAY_SIG_DIGITS: usize = 10;

/// Absolute tolerance for decimal/percentage fields of FDP answers.
pub const ANSWER_TOLERANCE: f64 = 1e-9;

/// Round `x` to `digits` significant digits.
///
/// Goes through the decimal representation, so the result is the double
/// nearest to the rounded decimal: `round_sig(0.1 * 3.0, 10) == 0.3`.
/// Zero and non-finite values pass through unchanged.
pub fn round_sig(x: f64, digits: usize) -> f64 {
  if x == 0.0 || !x.is_finite() {
    return x;
  }
  let digits = digits.max(1);
  format!("{:.*e}", digits - 1, x).parse::<f64>().unwrap_or(x)
}

/// True when both values are finite and within [`ANSWER_TOLERANCE`].
pub fn approx_eq(a: f64, b: f64) -> bool {
  a.is_finite() && b.is_finite() && (a - b).abs() <= ANSWER_TOLERANCE
}
