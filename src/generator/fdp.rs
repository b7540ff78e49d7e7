//! Fraction / decimal / percentage conversions.
//!
//! Terminating values show one of the three forms and ask for the other two.
//! Recurring values (thirds) show a LaTeX `\overline` decimal or a mixed
//! percentage and ask only for the fraction.

use rand::Rng;

use super::{coin, pick};
use crate::domain::{Answer, FdpKind, Family, Fraction, Layout, Question, QuestionParts};
use crate::number_theory::gcd;
use crate::numeric::{round_sig, DISPLAY_SIG_DIGITS};

#[derive(Clone, Debug, PartialEq)]
pub(crate) enum Equivalence {
  Terminating { fraction: Fraction, decimal: f64, percentage: f64 },
  Recurring { fraction: Fraction, decimal: String, percentage: String },
}

const COMMON_TERMINATING: [(i64, i64, f64, f64); 7] = [
  (1, 100, 0.01, 1.0),
  (1, 50, 0.02, 2.0),
  (1, 20, 0.05, 5.0),
  (1, 10, 0.1, 10.0),
  (1, 5, 0.2, 20.0),
  (1, 4, 0.25, 25.0),
  (1, 2, 0.5, 50.0),
];

const MULTIPLE_DENOMINATORS: [i64; 6] = [3, 4, 5, 8, 10, 20];
const IMPROPER_PROBABILITY: f64 = 0.25;

/// Terminating common values plus recurring 1/3.
const COMMON_COUNT: usize = COMMON_TERMINATING.len() + 1;

/// The `index`-th common equivalence; the last index is 1/3.
fn common_equivalence(index: usize) -> Equivalence {
  match COMMON_TERMINATING.get(index) {
    Some(&(n, d, decimal, percentage)) => {
      Equivalence::Terminating { fraction: Fraction::new(n, d), decimal, percentage }
    }
    None => thirds(1),
  }
}

/// Recurring notation for `n/3` (`n` not a multiple of 3).
fn thirds(n: i64) -> Equivalence {
  let whole = n / 3;
  let rem = n % 3;
  let digit = if rem == 1 { '3' } else { '6' };
  let pct_whole = whole * 100 + if rem == 1 { 33 } else { 66 };
  Equivalence::Recurring {
    fraction: Fraction::new(n, 3),
    decimal: format!("{whole}.\\overline{{{digit}}}"),
    percentage: format!("{pct_whole} \\frac{{{rem}}}{{3}}\\%"),
  }
}

/// Coprime `n/d` over the denominator set; occasionally improper.
/// Numerator 1 is always coprime, so acceptance is at least 1/19 per draw.
pub(crate) fn multiple_equivalence<R: Rng + ?Sized>(rng: &mut R) -> Equivalence {
  let (mut n, d) = loop {
    let d = pick(&MULTIPLE_DENOMINATORS, rng);
    let n = rng.gen_range(1..d);
    if gcd(n, d) == 1 {
      break (n, d);
    }
  };
  if rng.gen_bool(IMPROPER_PROBABILITY) {
    n += d;
  }
  if d == 3 {
    return thirds(n);
  }
  let decimal = round_sig(n as f64 / d as f64, DISPLAY_SIG_DIGITS);
  let percentage = round_sig(n as f64 * 100.0 / d as f64, DISPLAY_SIG_DIGITS);
  Equivalence::Terminating { fraction: Fraction::new(n, d), decimal, percentage }
}

pub(crate) fn build<R: Rng + ?Sized>(family: Family, eq: Equivalence, rng: &mut R) -> Question {
  match eq {
    Equivalence::Recurring { fraction, decimal, percentage } => {
      let (given, given_value) = if coin(rng) {
        (FdpKind::Decimal, decimal.clone())
      } else {
        (FdpKind::Percentage, percentage.clone())
      };
      Question::structured(
        family,
        Layout::FdpConversion,
        Answer::Fdp { fraction: Some(fraction), decimal: None, percentage: None },
        QuestionParts::FdpRecurring { given, given_value, decimal, percentage },
      )
    }
    Equivalence::Terminating { fraction, decimal, percentage } => {
      let given = pick(&[FdpKind::Fraction, FdpKind::Decimal, FdpKind::Percentage], rng);
      let shown = |kind: FdpKind| kind == given;
      let blank = |kind: FdpKind| kind != given;
      Question::structured(
        family,
        Layout::FdpConversion,
        Answer::Fdp {
          fraction: blank(FdpKind::Fraction).then_some(fraction),
          decimal: blank(FdpKind::Decimal).then_some(decimal),
          percentage: blank(FdpKind::Percentage).then_some(percentage),
        },
        QuestionParts::Fdp {
          given,
          fraction: shown(FdpKind::Fraction).then_some(fraction),
          decimal: shown(FdpKind::Decimal).then_some(decimal),
          percentage: shown(FdpKind::Percentage).then_some(percentage),
        },
      )
    }
  }
}

pub fn fdp_conversions<R: Rng + ?Sized>(rng: &mut R) -> Question {
  let eq = common_equivalence(rng.gen_range(0..COMMON_COUNT));
  build(Family::FdpConversions, eq, rng)
}

pub fn fdp_conversions_multiples<R: Rng + ?Sized>(rng: &mut R) -> Question {
  let eq = multiple_equivalence(rng);
  build(Family::FdpConversionsMultiples, eq, rng)
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::generator::test_support::rng;

  fn fdp_answer(q: &Question) -> (Option<Fraction>, Option<f64>, Option<f64>) {
    match q.answer {
      Answer::Fdp { fraction, decimal, percentage } => (fraction, decimal, percentage),
      ref other => panic!("fdp answer expected, got {other:?}"),
    }
  }

  #[test]
  fn terminating_answers_hold_the_two_hidden_fields() {
    let mut r = rng(71);
    for _ in 0..500 {
      let q = fdp_conversions(&mut r);
      let (fraction, decimal, percentage) = fdp_answer(&q);
      match q.parts {
        Some(QuestionParts::Fdp { given, .. }) => {
          let present = [fraction.is_some(), decimal.is_some(), percentage.is_some()];
          assert_eq!(present.iter().filter(|p| **p).count(), 2);
          match given {
            FdpKind::Fraction => assert!(fraction.is_none()),
            FdpKind::Decimal => assert!(decimal.is_none()),
            FdpKind::Percentage => assert!(percentage.is_none()),
          }
        }
        Some(QuestionParts::FdpRecurring { .. }) => {
          assert_eq!(fraction, Some(Fraction::new(1, 3)));
          assert!(decimal.is_none() && percentage.is_none());
        }
        ref other => panic!("unexpected parts {other:?}"),
      }
    }
  }

  #[test]
  fn common_values_cover_every_entry_once() {
    let all: Vec<_> = (0..COMMON_COUNT).map(common_equivalence).collect();
    assert_eq!(all.len(), 8);
    assert_eq!(all[5], Equivalence::Terminating { fraction: Fraction::new(1, 4), decimal: 0.25, percentage: 25.0 });
    assert_eq!(all[COMMON_COUNT - 1], thirds(1));
    for eq in &all[..COMMON_COUNT - 1] {
      let Equivalence::Terminating { fraction, decimal, percentage } = eq else { panic!("{eq:?}") };
      assert!((fraction.num as f64 / fraction.den as f64 - decimal).abs() < 1e-12);
      assert!((decimal * 100.0 - percentage).abs() < 1e-9);
    }
  }

  #[test]
  fn recurring_third_always_answers_one_third() {
    let mut r = rng(72);
    let mut shown = std::collections::HashSet::new();
    for _ in 0..200 {
      let q = build(Family::FdpConversions, thirds(1), &mut r);
      assert_eq!(fdp_answer(&q).0, Some(Fraction::new(1, 3)));
      if let Some(QuestionParts::FdpRecurring { given, given_value, .. }) = q.parts {
        assert!(given == FdpKind::Decimal || given == FdpKind::Percentage);
        shown.insert(given_value);
      }
    }
    assert!(shown.contains("0.\\overline{3}"));
    assert!(shown.contains("33 \\frac{1}{3}\\%"));
  }

  #[test]
  fn thirds_notation_covers_improper_values() {
    assert_eq!(
      thirds(2),
      Equivalence::Recurring {
        fraction: Fraction::new(2, 3),
        decimal: "0.\\overline{6}".into(),
        percentage: "66 \\frac{2}{3}\\%".into(),
      }
    );
    let Equivalence::Recurring { decimal, percentage, .. } = thirds(4) else { panic!() };
    assert_eq!(decimal, "1.\\overline{3}");
    assert_eq!(percentage, "133 \\frac{1}{3}\\%");
    let Equivalence::Recurring { decimal, percentage, .. } = thirds(5) else { panic!() };
    assert_eq!(decimal, "1.\\overline{6}");
    assert_eq!(percentage, "166 \\frac{2}{3}\\%");
  }

  #[test]
  fn multiples_are_coprime_and_consistent() {
    let mut r = rng(73);
    for _ in 0..2000 {
      match multiple_equivalence(&mut r) {
        Equivalence::Terminating { fraction, decimal, percentage } => {
          assert_eq!(gcd(fraction.num, fraction.den), 1);
          assert!(MULTIPLE_DENOMINATORS.contains(&fraction.den));
          assert!(fraction.num < 2 * fraction.den);
          assert_eq!(decimal, round_sig(fraction.num as f64 / fraction.den as f64, DISPLAY_SIG_DIGITS));
          assert!((percentage - decimal * 100.0).abs() < 1e-9);
        }
        Equivalence::Recurring { fraction, .. } => {
          assert_eq!(fraction.den, 3);
          assert_ne!(fraction.num % 3, 0);
        }
      }
    }
  }

  #[test]
  fn percentages_have_no_float_noise() {
    // 7/20 * 100 is 35.00000000000001 in naive float arithmetic
    let p = round_sig(7.0 * 100.0 / 20.0, DISPLAY_SIG_DIGITS);
    assert_eq!(p, 35.0);
    let mut r = rng(74);
    for _ in 0..500 {
      if let Equivalence::Terminating { percentage, .. } = multiple_equivalence(&mut r) {
        assert!(format!("{percentage}").len() <= 6, "{percentage}");
      }
    }
  }
}
