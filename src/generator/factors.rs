//! Highest common factor and lowest common multiple.

use rand::Rng;

use super::{coin, pick};
use crate::domain::{Answer, Family, Question, INPUT_PLACEHOLDER as X};
use crate::number_theory::{gcd, lcm as lcm_of};

const HCF_VALUES: [i64; 15] = [1, 2, 3, 4, 5, 6, 7, 8, 9, 10, 11, 12, 20, 25, 30];
const LCM_CANDIDATES: [i64; 13] = [2, 3, 4, 5, 6, 7, 8, 9, 10, 12, 15, 16, 20];
const LCM_CEILING: i64 = 120;

/// Two distinct coprime multipliers in `[2, 11]`.
/// Accepts with probability > 1/2 (e.g. any pair of distinct primes).
fn coprime_multipliers<R: Rng + ?Sized>(rng: &mut R) -> (i64, i64) {
  loop {
    let m1 = rng.gen_range(2..=11);
    let m2 = rng.gen_range(2..=11);
    if m1 != m2 && gcd(m1, m2) == 1 {
      return (m1, m2);
    }
  }
}

pub fn hcf<R: Rng + ?Sized>(rng: &mut R) -> Question {
  let hcf = pick(&HCF_VALUES, rng);
  let (m1, m2) = coprime_multipliers(rng);
  let (mut a, mut b) = (hcf * m1, hcf * m2);
  if coin(rng) { std::mem::swap(&mut a, &mut b); }
  Question::templated(Family::Hcf, format!("\\text{{HCF}}({a}, {b}) = {X}"), Answer::Scalar { value: hcf as f64 })
}

/// Distinct pair with LCM at most 120. Many pairs qualify (2 and 3, ...),
/// so acceptance is bounded away from zero.
pub(crate) fn lcm_pair<R: Rng + ?Sized>(rng: &mut R) -> (i64, i64, i64) {
  loop {
    let i = rng.gen_range(0..LCM_CANDIDATES.len());
    let j = rng.gen_range(0..LCM_CANDIDATES.len());
    if i == j {
      continue;
    }
    let (a, b) = (LCM_CANDIDATES[i], LCM_CANDIDATES[j]);
    let l = lcm_of(a, b);
    if l <= LCM_CEILING {
      return (a, b, l);
    }
  }
}

pub fn lcm<R: Rng + ?Sized>(rng: &mut R) -> Question {
  let (mut a, mut b, l) = lcm_pair(rng);
  if coin(rng) { std::mem::swap(&mut a, &mut b); }
  Question::templated(Family::Lcm, format!("\\text{{LCM}}({a}, {b}) = {X}"), Answer::Scalar { value: l as f64 })
}
