//! Times-table facts: multiplication and the matching divisions.

use rand::Rng;

use super::{coin, pick};
use crate::domain::{Answer, Family, Question, INPUT_PLACEHOLDER as X};

/// `table × factor == product` for the triple shown.
#[derive(Clone, Copy, Debug)]
pub(crate) struct Fact {
  pub table: i64,
  pub factor: i64,
  pub product: i64,
  /// Which of the four layouts, `0..4`.
  pub layout: u8,
}

fn draw<R: Rng + ?Sized>(table: i64, negative: bool, rng: &mut R) -> Fact {
  let mut table = table;
  let mut factor = rng.gen_range(1..=12);
  if negative {
    // Exactly one operand flips, so the product is always negative.
    if coin(rng) { table = -table; } else { factor = -factor; }
  }
  Fact { table, factor, product: table * factor, layout: rng.gen_range(0..4) }
}

/// `(template, missing value)`.
pub(crate) fn render(f: &Fact) -> (String, i64) {
  let Fact { table, factor, product, .. } = *f;
  match f.layout {
    0 => (format!("{table} \\times {X} = {product}"), factor),
    1 => (format!("{X} \\times {factor} = {product}"), table),
    2 => (format!("{product} \\div {table} = {X}"), factor),
    _ => (format!("{product} \\div {X} = {factor}"), table),
  }
}

fn to_question(family: Family, fact: Fact) -> Question {
  let (template, missing) = render(&fact);
  Question::templated(family, template, Answer::Scalar { value: missing as f64 })
}

pub fn single_table<R: Rng + ?Sized>(table: i64, rng: &mut R) -> Question {
  to_question(Family::SingleTable, draw(table, false, rng))
}

/// `tables` is non-empty (checked by the dispatcher).
pub fn group_table<R: Rng + ?Sized>(tables: &[i64], rng: &mut R) -> Question {
  let table = pick(tables, rng);
  to_question(Family::GroupTable, draw(table, false, rng))
}

pub fn negative_table<R: Rng + ?Sized>(tables: &[i64], rng: &mut R) -> Question {
  let table = pick(tables, rng);
  to_question(Family::NegativeTable, draw(table, true, rng))
}
