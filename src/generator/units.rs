//! Metric and time unit conversions between nearby units.

use rand::Rng;

use super::{coin, pick};
use crate::domain::{Answer, Family, Question, INPUT_PLACEHOLDER as X};
use crate::numeric::{round_sig, DISPLAY_SIG_DIGITS};

#[derive(Clone, Copy, Debug, PartialEq)]
pub(crate) struct Unit {
  pub name: &'static str,
  /// Size relative to the category's base unit.
  pub multiplier: f64,
}

const fn u(name: &'static str, multiplier: f64) -> Unit {
  Unit { name, multiplier }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Category {
  Length,
  Mass,
  Capacity,
  Area,
  Time,
}

const CATEGORIES: [Category; 5] =
  [Category::Length, Category::Mass, Category::Capacity, Category::Area, Category::Time];

const LENGTH: [Unit; 4] = [u("mm", 0.001), u("cm", 0.01), u("m", 1.0), u("km", 1000.0)];
const MASS: [Unit; 4] = [u("mg", 0.001), u("g", 1.0), u("kg", 1000.0), u("t", 1_000_000.0)];
const CAPACITY: [Unit; 4] = [u("mL", 0.001), u("L", 1.0), u("kL", 1000.0), u("ML", 1_000_000.0)];
const AREA: [Unit; 5] = [
  u("mm²", 0.000_001),
  u("cm²", 0.0001),
  u("m²", 1.0),
  u("ha", 10_000.0),
  u("km²", 1_000_000.0),
];
const TIME: [Unit; 4] = [u("ms", 0.001), u("s", 1.0), u("min", 60.0), u("hr", 3600.0)];

impl Category {
  fn units(self) -> &'static [Unit] {
    match self {
      Category::Length => &LENGTH,
      Category::Mass => &MASS,
      Category::Capacity => &CAPACITY,
      Category::Area => &AREA,
      Category::Time => &TIME,
    }
  }
}

/// Time pairs whose ratio leaves repeating decimals. Checked in both directions.
const BANNED_TIME_PAIRS: [(&str, &str); 3] = [("s", "hr"), ("ms", "hr"), ("ms", "min")];

/// Multiples of the unit ratio used when converting to a larger time unit.
const EASY_TIME_MULTIPLES: [f64; 10] = [1.0, 2.0, 3.0, 4.0, 5.0, 10.0, 12.0, 15.0, 30.0, 45.0];
/// Inputs used when converting to a smaller time unit.
const EASY_TIME_INPUTS: [f64; 13] =
  [0.25, 0.5, 0.75, 1.0, 1.25, 1.5, 1.75, 2.0, 2.5, 3.0, 4.0, 5.0, 10.0];

pub(crate) const MIN_VALUE: f64 = 0.0001;
pub(crate) const MAX_VALUE: f64 = 100_000.0;

/// A converted pair: `from_value` in `from` equals `to_value` in `to`.
#[derive(Clone, Copy, Debug)]
pub(crate) struct Conversion {
  pub from: Unit,
  pub to: Unit,
  pub from_value: f64,
  pub to_value: f64,
}

pub(crate) fn is_banned_time_pair(a: &str, b: &str) -> bool {
  BANNED_TIME_PAIRS
    .iter()
    .any(|&(x, y)| (x == a && y == b) || (x == b && y == a))
}

fn in_window(v: f64) -> bool {
  (MIN_VALUE..=MAX_VALUE).contains(&v)
}

/// Second unit index at offset ±1 or ±2. Every list has at least four units,
/// so each draw lands in range with probability >= 1/2.
fn nearby_index<R: Rng + ?Sized>(index: usize, len: usize, rng: &mut R) -> usize {
  loop {
    let step: i64 = rng.gen_range(1..=2);
    let offset = if coin(rng) { -step } else { step };
    let candidate = index as i64 + offset;
    if candidate >= 0 && (candidate as usize) < len {
      return candidate as usize;
    }
  }
}

/// Rejects banned time pairs and values outside the magnitude window.
///
/// Acceptance is bounded below: picking length, then m → cm with a
/// one-significant-figure value in [1, 9] always passes.
pub(crate) fn draw<R: Rng + ?Sized>(rng: &mut R) -> Conversion {
  loop {
    let category = pick(&CATEGORIES, rng);
    let units = category.units();
    let i = rng.gen_range(0..units.len());
    let j = nearby_index(i, units.len(), rng);
    let (from, to) = (units[i], units[j]);

    if category == Category::Time && is_banned_time_pair(from.name, to.name) {
      continue;
    }

    let from_value = if category == Category::Time {
      if from.multiplier < to.multiplier {
        // e.g. s -> min: take a clean multiple of 60
        let ratio = to.multiplier / from.multiplier;
        ratio * pick(&EASY_TIME_MULTIPLES, rng)
      } else {
        pick(&EASY_TIME_INPUTS, rng)
      }
    } else {
      let sig_figs = rng.gen_range(1..=4);
      let mantissa = 1.0 + rng.gen::<f64>() * 9.0;
      let power: i32 = rng.gen_range(-3..=3);
      round_sig(mantissa * 10f64.powi(power), sig_figs)
    };
    let to_value = from_value * from.multiplier / to.multiplier;

    if !in_window(from_value) || !in_window(to_value) {
      continue;
    }

    return Conversion {
      from,
      to,
      from_value: round_sig(from_value, DISPLAY_SIG_DIGITS),
      to_value: round_sig(to_value, DISPLAY_SIG_DIGITS),
    };
  }
}

pub fn unit_conversions<R: Rng + ?Sized>(rng: &mut R) -> Question {
  let c = draw(rng);
  let (given, given_unit, answer, answer_unit) = if coin(rng) {
    (c.from_value, c.from.name, c.to_value, c.to.name)
  } else {
    (c.to_value, c.to.name, c.from_value, c.from.name)
  };
  Question::templated(
    Family::UnitConversions,
    format!("{given} \\text{{ {given_unit}}} = {X} \\text{{ {answer_unit}}}"),
    Answer::Scalar { value: answer },
  )
}
