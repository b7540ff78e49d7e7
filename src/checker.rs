//! Answer verification and display of the expected answer.
//!
//! A wrong or malformed answer is ordinary traffic: every path returns a
//! plain `bool`, never an error. No partial credit.

use serde::{Deserialize, Serialize};
use tracing::{debug, instrument};

use crate::domain::{Answer, Family, Fraction};
use crate::numeric::approx_eq;

/// Fraction fields as typed by the learner; blanks arrive as `None`.
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct FractionInput {
  #[serde(default)]
  pub num: Option<i64>,
  #[serde(default)]
  pub den: Option<i64>,
}

impl FractionInput {
  fn matches(&self, expected: &Fraction) -> bool {
    self.num == Some(expected.num) && self.den == Some(expected.den)
  }
}

/// Raw answer extracted by a client, shaped like the family's answer.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "shape", rename_all = "snake_case")]
pub enum UserAnswer {
  Scalar {
    #[serde(default)]
    value: Option<f64>,
  },
  Fraction {
    #[serde(default)]
    num: Option<i64>,
    #[serde(default)]
    den: Option<i64>,
  },
  Fdp {
    #[serde(default)]
    fraction: Option<FractionInput>,
    #[serde(default)]
    decimal: Option<f64>,
    #[serde(default)]
    percentage: Option<f64>,
  },
}

impl From<&Answer> for UserAnswer {
  /// Echo a canonical answer back as if the learner had typed it.
  fn from(answer: &Answer) -> Self {
    match *answer {
      Answer::Scalar { value } => UserAnswer::Scalar { value: Some(value) },
      Answer::Fraction { num, den } => UserAnswer::Fraction { num: Some(num), den: Some(den) },
      Answer::Fdp { fraction, decimal, percentage } => UserAnswer::Fdp {
        fraction: fraction.map(|f| FractionInput { num: Some(f.num), den: Some(f.den) }),
        decimal,
        percentage,
      },
    }
  }
}

/// Compare a learner's answer with the canonical one.
///
/// * FDP families: every field present in `expected` must match; the
///   fraction exactly, decimal and percentage within the shared tolerance.
/// * Fraction answers: both parts exactly.
/// * Scalars: exact equality. Generators round every scalar to the precision
///   it is displayed at, so the typed value parses to the same double.
#[instrument(level = "debug", skip(user, expected), fields(%family))]
pub fn check_answer(user: &UserAnswer, expected: &Answer, family: Family) -> bool {
  let correct = if family.is_fdp() {
    check_fdp(user, expected)
  } else {
    match (expected, user) {
      (Answer::Fraction { num, den }, UserAnswer::Fraction { num: un, den: ud }) => {
        *un == Some(*num) && *ud == Some(*den)
      }
      (Answer::Scalar { value }, UserAnswer::Scalar { value: Some(v) }) => v == value,
      _ => false,
    }
  };
  debug!(target: "drill", %family, correct, "Answer checked");
  correct
}

fn check_fdp(user: &UserAnswer, expected: &Answer) -> bool {
  let (
    Answer::Fdp { fraction, decimal, percentage },
    UserAnswer::Fdp { fraction: u_fraction, decimal: u_decimal, percentage: u_percentage },
  ) = (expected, user)
  else {
    return false;
  };

  if let Some(f) = fraction {
    if !u_fraction.is_some_and(|u| u.matches(f)) {
      return false;
    }
  }
  let scalar_ok = |want: &Option<f64>, got: &Option<f64>| match (want, got) {
    (None, _) => true,
    (Some(w), Some(g)) => approx_eq(*g, *w),
    (Some(_), None) => false,
  };
  scalar_ok(decimal, u_decimal) && scalar_ok(percentage, u_percentage)
}

/// `true` when a field the question asks for was left empty.
///
/// Blank input is refused before checking and never counts as a mistake.
pub fn is_blank(user: &UserAnswer, expected: &Answer) -> bool {
  match (expected, user) {
    (_, UserAnswer::Scalar { value }) => value.is_none(),
    (_, UserAnswer::Fraction { num, den }) => num.is_none() || den.is_none(),
    (
      Answer::Fdp { fraction, decimal, percentage },
      UserAnswer::Fdp { fraction: u_fraction, decimal: u_decimal, percentage: u_percentage },
    ) => {
      let fraction_blank = !u_fraction.is_some_and(|f| f.num.is_some() && f.den.is_some());
      (fraction.is_some() && fraction_blank)
        || (decimal.is_some() && u_decimal.is_none())
        || (percentage.is_some() && u_percentage.is_none())
    }
    (_, UserAnswer::Fdp { fraction, decimal, percentage }) => {
      fraction.is_none() && decimal.is_none() && percentage.is_none()
    }
  }
}

/// LaTeX text for the correct answer, shown after a wrong attempt.
pub fn format_answer_for_display(answer: &Answer) -> String {
  match answer {
    Answer::Scalar { value } => format!("{value}"),
    Answer::Fraction { num, den } => format!("\\frac{{{num}}}{{{den}}}"),
    Answer::Fdp { fraction, decimal, percentage } => {
      let mut parts = Vec::with_capacity(3);
      if let Some(f) = fraction {
        parts.push(format!("\\frac{{{}}}{{{}}}", f.num, f.den));
      }
      if let Some(d) = decimal {
        parts.push(format!("{d}"));
      }
      if let Some(p) = percentage {
        parts.push(format!("{p}\\%"));
      }
      parts.join(", ")
    }
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  fn scalar(v: f64) -> UserAnswer {
    UserAnswer::Scalar { value: Some(v) }
  }

  #[test]
  fn scalar_answers_need_exact_equality() {
    let expected = Answer::Scalar { value: 0.35 };
    assert!(check_answer(&scalar(0.35), &expected, Family::UnitConversions));
    assert!(!check_answer(&scalar(0.350000001), &expected, Family::UnitConversions));
    assert!(!check_answer(&UserAnswer::Scalar { value: None }, &expected, Family::UnitConversions));
    assert!(!check_answer(&scalar(f64::NAN), &expected, Family::UnitConversions));
  }

  #[test]
  fn typed_decimals_match_rounded_answers() {
    // what a learner types for 3.5 mm -> cm, parsed from text
    let typed: f64 = "0.35".parse().expect("parse");
    let expected = Answer::Scalar { value: crate::numeric::round_sig(3.5 * 0.001 / 0.01, 10) };
    assert!(check_answer(&scalar(typed), &expected, Family::UnitConversions));
  }

  #[test]
  fn fraction_answers_compare_both_parts() {
    let expected = Answer::Fraction { num: 3, den: 4 };
    let ok = UserAnswer::Fraction { num: Some(3), den: Some(4) };
    let unreduced = UserAnswer::Fraction { num: Some(6), den: Some(8) };
    let partial = UserAnswer::Fraction { num: Some(3), den: None };
    assert!(check_answer(&ok, &expected, Family::SimplifyFractions));
    assert!(!check_answer(&unreduced, &expected, Family::SimplifyFractions));
    assert!(!check_answer(&partial, &expected, Family::SimplifyFractions));
    assert!(!check_answer(&scalar(0.75), &expected, Family::SimplifyFractions));
  }

  #[test]
  fn fdp_requires_every_present_field() {
    let expected = Answer::Fdp { fraction: Some(Fraction::new(1, 4)), decimal: None, percentage: Some(25.0) };
    let good = UserAnswer::Fdp {
      fraction: Some(FractionInput { num: Some(1), den: Some(4) }),
      decimal: None,
      percentage: Some(25.0 + 1e-12),
    };
    assert!(check_answer(&good, &expected, Family::FdpConversions));

    let wrong_pct = UserAnswer::Fdp {
      fraction: Some(FractionInput { num: Some(1), den: Some(4) }),
      decimal: None,
      percentage: Some(25.1),
    };
    assert!(!check_answer(&wrong_pct, &expected, Family::FdpConversions));

    let missing_fraction = UserAnswer::Fdp { fraction: None, decimal: None, percentage: Some(25.0) };
    assert!(!check_answer(&missing_fraction, &expected, Family::FdpConversions));

    let nan = UserAnswer::Fdp {
      fraction: Some(FractionInput { num: Some(1), den: Some(4) }),
      decimal: None,
      percentage: Some(f64::NAN),
    };
    assert!(!check_answer(&nan, &expected, Family::FdpConversions));
  }

  #[test]
  fn fdp_ignores_extra_fields() {
    let expected = Answer::Fdp { fraction: None, decimal: Some(0.5), percentage: Some(50.0) };
    let user = UserAnswer::Fdp {
      fraction: Some(FractionInput { num: Some(9), den: Some(9) }),
      decimal: Some(0.5),
      percentage: Some(50.0),
    };
    assert!(check_answer(&user, &expected, Family::FdpConversionsMultiples));
  }

  #[test]
  fn shape_mismatch_is_incorrect() {
    let expected = Answer::Scalar { value: 7.0 };
    let user = UserAnswer::Fdp { fraction: None, decimal: Some(7.0), percentage: None };
    assert!(!check_answer(&user, &expected, Family::Doubling));
    assert!(!check_answer(&scalar(7.0), &Answer::Fdp { fraction: None, decimal: Some(7.0), percentage: None }, Family::FdpConversions));
  }

  #[test]
  fn blank_fields_are_detected_per_shape() {
    assert!(is_blank(&UserAnswer::Scalar { value: None }, &Answer::Scalar { value: 3.0 }));
    assert!(!is_blank(&scalar(0.0), &Answer::Scalar { value: 3.0 }));

    let fraction = Answer::Fraction { num: 3, den: 4 };
    assert!(is_blank(&UserAnswer::Fraction { num: Some(3), den: None }, &fraction));
    assert!(is_blank(&UserAnswer::Fraction { num: None, den: Some(4) }, &fraction));
    assert!(!is_blank(&UserAnswer::Fraction { num: Some(1), den: Some(2) }, &fraction));

    let fdp = Answer::Fdp { fraction: Some(Fraction::new(1, 4)), decimal: None, percentage: Some(25.0) };
    let half_fraction = UserAnswer::Fdp {
      fraction: Some(FractionInput { num: Some(1), den: None }),
      decimal: None,
      percentage: Some(25.0),
    };
    assert!(is_blank(&half_fraction, &fdp));
    let no_pct = UserAnswer::Fdp {
      fraction: Some(FractionInput { num: Some(1), den: Some(4) }),
      decimal: Some(0.25),
      percentage: None,
    };
    assert!(is_blank(&no_pct, &fdp));
    // the decimal is given, so leaving it empty is fine
    let filled = UserAnswer::Fdp {
      fraction: Some(FractionInput { num: Some(2), den: Some(4) }),
      decimal: None,
      percentage: Some(10.0),
    };
    assert!(!is_blank(&filled, &fdp));
  }

  #[test]
  fn user_answers_deserialize_from_client_json() {
    let a: UserAnswer = serde_json::from_str(r#"{"shape":"scalar","value":12}"#).expect("scalar");
    assert_eq!(a, scalar(12.0));
    let b: UserAnswer = serde_json::from_str(r#"{"shape":"fraction","num":2}"#).expect("fraction");
    assert_eq!(b, UserAnswer::Fraction { num: Some(2), den: None });
    let c: UserAnswer =
      serde_json::from_str(r#"{"shape":"fdp","fraction":{"num":1,"den":5},"decimal":0.2}"#).expect("fdp");
    assert!(check_answer(
      &c,
      &Answer::Fdp { fraction: Some(Fraction::new(1, 5)), decimal: Some(0.2), percentage: None },
      Family::FdpConversions
    ));
  }

  #[test]
  fn display_formats() {
    assert_eq!(format_answer_for_display(&Answer::Scalar { value: -12.0 }), "-12");
    assert_eq!(format_answer_for_display(&Answer::Scalar { value: 0.045 }), "0.045");
    assert_eq!(format_answer_for_display(&Answer::Fraction { num: 3, den: 8 }), "\\frac{3}{8}");
    let fdp = Answer::Fdp { fraction: Some(Fraction::new(3, 4)), decimal: Some(0.75), percentage: Some(75.0) };
    assert_eq!(format_answer_for_display(&fdp), "\\frac{3}{4}, 0.75, 75\\%");
  }
}
