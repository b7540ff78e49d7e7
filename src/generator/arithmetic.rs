//! Doubling, perfect squares and powers of ten.

use rand::Rng;

use super::{coin, pick};
use crate::domain::{Answer, Family, Question, INPUT_PLACEHOLDER as X};
use crate::numeric::{round_sig, ARITHMETIC_SIG_DIGITS};

const POWERS: [i64; 3] = [10, 100, 1000];
const OPERAND_SCALES: [i64; 5] = [1, 10, 100, 1000, 10000];

pub fn doubling<R: Rng + ?Sized>(max: i64, rng: &mut R) -> Question {
  let n = rng.gen_range(1..=max);
  Question::templated(Family::Doubling, format!("{n} \\times 2 = {X}"), Answer::Scalar { value: (2 * n) as f64 })
}

pub fn perfect_squares<R: Rng + ?Sized>(rng: &mut R) -> Question {
  let base: i64 = rng.gen_range(1..=20);
  let square = base * base;
  let (template, value) = if coin(rng) {
    (format!("{base}^2 = {X}"), square)
  } else {
    (format!("\\sqrt{{{square}}} = {X}"), base)
  };
  Question::templated(Family::PerfectSquares, template, Answer::Scalar { value: value as f64 })
}

/// Operand `k / scale` has at most three significant figures, so the exact
/// result has at most three as well and survives rounding to 15 digits.
pub fn powers_of_10<R: Rng + ?Sized>(rng: &mut R) -> Question {
  let power = pick(&POWERS, rng);
  let k: i64 = rng.gen_range(1..=999);
  let scale = pick(&OPERAND_SCALES, rng);
  let num = round_sig(k as f64 / scale as f64, ARITHMETIC_SIG_DIGITS);
  let (template, raw) = if coin(rng) {
    (format!("{num} \\times {power} = {X}"), num * power as f64)
  } else {
    (format!("{num} \\div {power} = {X}"), num / power as f64)
  };
  Question::templated(
    Family::PowersOf10,
    template,
    Answer::Scalar { value: round_sig(raw, ARITHMETIC_SIG_DIGITS) },
  )
}
