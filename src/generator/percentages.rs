//! Percentage of a quantity, from a curated table of whole-number results.

use rand::Rng;

use super::pick;
use crate::domain::{Answer, Family, Question, INPUT_PLACEHOLDER as X};

/// Each percentage with quantities that give a whole-number answer.
pub(crate) const PERCENTAGE_TABLE: &[(i64, &[i64])] = &[
  (1, &[100, 200, 300, 400, 500, 1000, 2500]),
  (5, &[20, 40, 60, 80, 100, 200, 400, 600, 1000]),
  (10, &[10, 20, 30, 50, 80, 100, 150, 200, 500, 1000]),
  (20, &[5, 10, 15, 20, 25, 50, 100, 150, 200, 300]),
  (25, &[4, 8, 12, 16, 20, 40, 60, 80, 100, 200, 400]),
  (50, &[2, 4, 10, 12, 20, 30, 50, 80, 100, 150, 200]),
  (15, &[20, 40, 60, 80, 100, 120, 200, 400]),
  (30, &[10, 20, 30, 40, 50, 100, 120, 200, 300, 500]),
  (40, &[5, 10, 15, 20, 25, 50, 100, 150, 200, 500]),
  (60, &[5, 10, 15, 20, 25, 50, 100, 150, 200, 300]),
  (75, &[4, 8, 12, 16, 20, 40, 60, 80, 100, 200, 400]),
  (90, &[10, 20, 30, 50, 90, 100, 110, 200, 500, 1000]),
  (110, &[10, 20, 50, 80, 100, 120, 200, 300, 500]),
  (125, &[4, 8, 16, 20, 40, 80, 100, 200, 400]),
  (150, &[2, 4, 6, 8, 10, 20, 50, 100, 120, 200]),
  (200, &[1, 2, 5, 10, 15, 25, 50, 100, 120, 200]),
  (250, &[2, 4, 10, 20, 40, 50, 100, 200, 400]),
  (300, &[1, 2, 3, 5, 10, 25, 50, 100, 150, 200]),
];

pub fn percentage_of_quantity<R: Rng + ?Sized>(rng: &mut R) -> Question {
  let (percentage, quantities) = pick(PERCENTAGE_TABLE, rng);
  let quantity = pick(quantities, rng);
  // integer arithmetic keeps the result exact; rounding only guards the table
  let answer = (percentage * quantity + 50) / 100;
  Question::templated(
    Family::PercentageOfQuantity,
    format!("{percentage}\\% \\text{{ of }} {quantity} = {X}"),
    Answer::Scalar { value: answer as f64 },
  )
}
