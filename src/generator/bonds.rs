//! Number bonds: split a total into two addends and blank one of them.

use rand::Rng;

use crate::domain::{Answer, Family, Question, INPUT_PLACEHOLDER as X};

/// The drawn bond before it is laid out. `num1 + num2 == total`.
#[derive(Clone, Copy, Debug)]
pub(crate) struct Bond {
  pub total: i64,
  pub num1: i64,
  pub num2: i64,
  /// Which of the six equivalent layouts, `0..6`.
  pub layout: u8,
}

pub(crate) fn draw<R: Rng + ?Sized>(total: i64, rng: &mut R) -> Bond {
  let num1 = rng.gen_range(0..=total.abs());
  Bond { total, num1, num2: total - num1, layout: rng.gen_range(0..6) }
}

/// Render the bond and return `(template, missing value)`.
pub(crate) fn render(b: &Bond) -> (String, i64) {
  let Bond { total, num1, num2, .. } = *b;
  match b.layout {
    0 => (format!("{num1} + {X} = {total}"), num2),
    1 => (format!("{X} + {num2} = {total}"), num1),
    2 => (format!("{total} = {num1} + {X}"), num2),
    3 => (format!("{total} - {X} = {num2}"), num1),
    4 => (format!("{total} - {num1} = {X}"), num2),
    _ => (format!("{X} = {total} - {num1}"), num2),
  }
}

pub fn bonds<R: Rng + ?Sized>(total: i64, rng: &mut R) -> Question {
  let bond = draw(total, rng);
  let (template, missing) = render(&bond);
  Question::templated(Family::Bonds, template, Answer::Scalar { value: missing as f64 })
}
