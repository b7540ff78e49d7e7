//! Equivalent fractions, simplification, and fractions of a quantity.

use rand::Rng;

use super::{coin, pick};
use crate::domain::{Answer, Family, Layout, Question, QuestionParts, INPUT_PLACEHOLDER as X};
use crate::number_theory::{gcd, reduce_fraction};

/// Angle numerators over 360: multiples of 30 and of 45, without repeats.
const ANGLE_NUMERATORS: [i64; 16] =
  [30, 60, 90, 120, 150, 180, 210, 240, 270, 300, 330, 360, 45, 135, 225, 315];
const ANGLE_DENOMINATOR: i64 = 360;
const ANGLE_MODE_PROBABILITY: f64 = 0.25;

const EASY_DENOMINATORS: [i64; 10] = [2, 3, 4, 5, 6, 8, 10, 12, 20, 25];
const MAX_REDUCED_NUMERATOR: i64 = 11;

/// Reduced proper fraction with numerator in `[1, 11]`, denominator in `[2, 12]`.
/// 1/2 always qualifies, so acceptance is at least 1/121.
fn reduced_proper<R: Rng + ?Sized>(rng: &mut R) -> (i64, i64) {
  loop {
    let n = rng.gen_range(1..=11);
    let d = rng.gen_range(2..=12);
    if n < d && gcd(n, d) == 1 {
      return (n, d);
    }
  }
}

pub fn equivalent_fractions<R: Rng + ?Sized>(rng: &mut R) -> Question {
  let (base_num, base_den) = reduced_proper(rng);
  let multiplier = rng.gen_range(2..=9);
  let (equiv_num, equiv_den) = (base_num * multiplier, base_den * multiplier);
  let blank_num = coin(rng);
  let answer = if blank_num { equiv_num } else { equiv_den };
  Question::structured(
    Family::EquivalentFractions,
    Layout::EquivalentFraction,
    Answer::Scalar { value: answer as f64 },
    QuestionParts::EquivalentFraction {
      base_num,
      base_den,
      equiv_num: (!blank_num).then_some(equiv_num),
      equiv_den: blank_num.then_some(equiv_den),
    },
  )
}

/// Distinct coprime pair in `[2, 11]`; proper or improper.
fn reduced_pair<R: Rng + ?Sized>(rng: &mut R) -> (i64, i64) {
  loop {
    let n = rng.gen_range(2..=11);
    let d = rng.gen_range(2..=11);
    if n != d && gcd(n, d) == 1 {
      return (n, d);
    }
  }
}

pub fn simplify_fractions<R: Rng + ?Sized>(rng: &mut R) -> Question {
  let (complex_num, complex_den, simple) = if rng.gen_bool(ANGLE_MODE_PROBABILITY) {
    let n = pick(&ANGLE_NUMERATORS, rng);
    (n, ANGLE_DENOMINATOR, reduce_fraction(n, ANGLE_DENOMINATOR))
  } else {
    let (n, d) = reduced_pair(rng);
    let m = rng.gen_range(2..=6);
    (n * m, d * m, (n, d))
  };
  Question::structured(
    Family::SimplifyFractions,
    Layout::SimplifyFraction,
    Answer::Fraction { num: simple.0, den: simple.1 },
    QuestionParts::SimplifyFraction { complex_num, complex_den },
  )
}

/// Reduced fraction for "n/d of q". Rejects whole numbers and reduced
/// numerators above the cap; 1/2 (drawn as 1/2, 2/4, ...) always passes.
pub(crate) fn quantity_fraction<R: Rng + ?Sized>(rng: &mut R) -> (i64, i64) {
  loop {
    let d0 = pick(&EASY_DENOMINATORS, rng);
    let max_numerator = d0 + d0 / 2 + 3;
    let mut n0 = rng.gen_range(1..=max_numerator);
    if n0 == d0 {
      n0 += 1;
    }
    let (n, d) = reduce_fraction(n0, d0);
    if d == 1 || n > MAX_REDUCED_NUMERATOR {
      continue;
    }
    return (n, d);
  }
}

pub fn fraction_of_quantity<R: Rng + ?Sized>(rng: &mut R) -> Question {
  let (n, d) = quantity_fraction(rng);
  let multiplier = rng.gen_range(2..=10);
  let quantity = d * multiplier;
  Question::templated(
    Family::FractionOfQuantity,
    format!("\\frac{{{n}}}{{{d}}} \\text{{ of }} {quantity} = {X}"),
    Answer::Scalar { value: (multiplier * n) as f64 },
  )
}
