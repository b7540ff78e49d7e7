//! Domain models used by the backend: questions and their answers, levels,
//! rating tiers and attempt records.

use std::{fmt, str::FromStr};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::GenerateError;

/// Reserved token marking where a blank answer field goes in a template.
pub const INPUT_PLACEHOLDER: &str = "{{INPUT}}";

/// Which question family a level draws from. Closed set; dispatch is a `match`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Family {
  Bonds,
  SingleTable,
  GroupTable,
  NegativeTable,
  Doubling,
  PerfectSquares,
  PowersOf10,
  UnitConversions,
  Hcf,
  Lcm,
  #[serde(rename = "equivFractions")]
  EquivalentFractions,
  SimplifyFractions,
  FractionOfQuantity,
  PercentageOfQuantity,
  FdpConversions,
  FdpConversionsMultiples,
}

impl Family {
  pub const ALL: [Family; 16] = [
    Family::Bonds,
    Family::SingleTable,
    Family::GroupTable,
    Family::NegativeTable,
    Family::Doubling,
    Family::PerfectSquares,
    Family::PowersOf10,
    Family::UnitConversions,
    Family::Hcf,
    Family::Lcm,
    Family::EquivalentFractions,
    Family::SimplifyFractions,
    Family::FractionOfQuantity,
    Family::PercentageOfQuantity,
    Family::FdpConversions,
    Family::FdpConversionsMultiples,
  ];

  pub fn key(self) -> &'static str {
    match self {
      Family::Bonds => "bonds",
      Family::SingleTable => "singleTable",
      Family::GroupTable => "groupTable",
      Family::NegativeTable => "negativeTable",
      Family::Doubling => "doubling",
      Family::PerfectSquares => "perfectSquares",
      Family::PowersOf10 => "powersOf10",
      Family::UnitConversions => "unitConversions",
      Family::Hcf => "hcf",
      Family::Lcm => "lcm",
      Family::EquivalentFractions => "equivFractions",
      Family::SimplifyFractions => "simplifyFractions",
      Family::FractionOfQuantity => "fractionOfQuantity",
      Family::PercentageOfQuantity => "percentageOfQuantity",
      Family::FdpConversions => "fdpConversions",
      Family::FdpConversionsMultiples => "fdpConversionsMultiples",
    }
  }

  /// FDP families answer with a multi-field record.
  pub fn is_fdp(self) -> bool {
    matches!(self, Family::FdpConversions | Family::FdpConversionsMultiples)
  }
}

impl fmt::Display for Family {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.write_str(self.key())
  }
}

impl FromStr for Family {
  type Err = GenerateError;

  fn from_str(s: &str) -> Result<Self, Self::Err> {
    Family::ALL
      .iter()
      .copied()
      .find(|f| f.key().eq_ignore_ascii_case(s))
      .ok_or_else(|| GenerateError::UnknownFamily(s.to_string()))
  }
}

/// Family-specific generation parameters. Which fields matter depends on the family.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct GenParams {
  /// Fixed bond total.
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub total: Option<i64>,
  /// Inclusive `[min, max]` for mixed bonds.
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub range: Option<(i64, i64)>,
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub table: Option<i64>,
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub tables: Option<Vec<i64>>,
  /// Upper bound for doubling.
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub max: Option<i64>,
}

/// Reduced (numerator, denominator) pair.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Fraction {
  pub num: i64,
  pub den: i64,
}

impl Fraction {
  pub fn new(num: i64, den: i64) -> Self {
    Self { num, den }
  }
}

/// Canonical answer computed by a generator.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "shape", rename_all = "snake_case")]
pub enum Answer {
  Scalar { value: f64 },
  Fraction { num: i64, den: i64 },
  /// Only the fields NOT shown in the question are present.
  Fdp {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    fraction: Option<Fraction>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    decimal: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    percentage: Option<f64>,
  },
}

/// How a client should lay the question out.
#[derive(Clone, Debug, PartialEq)]
pub enum Layout {
  /// LaTeX with one or more [`INPUT_PLACEHOLDER`] tokens.
  Template(String),
  EquivalentFraction,
  SimplifyFraction,
  FdpConversion,
}

impl Layout {
  /// Wire form: the template itself, or the structured layout tag.
  pub fn as_format(&self) -> &str {
    match self {
      Layout::Template(t) => t,
      Layout::EquivalentFraction => "{{EQUIV_FRACTION_CHALLENGE}}",
      Layout::SimplifyFraction => "{{SIMPLIFY_FRACTION_CHALLENGE}}",
      Layout::FdpConversion => "{{FDP_CONVERSION_CHALLENGE}}",
    }
  }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FdpKind {
  Fraction,
  Decimal,
  Percentage,
}

/// Structured payload for layouts that need more than a template.
#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case", rename_all_fields = "camelCase")]
pub enum QuestionParts {
  /// Exactly one of `equiv_num` / `equiv_den` is blank.
  EquivalentFraction {
    base_num: i64,
    base_den: i64,
    equiv_num: Option<i64>,
    equiv_den: Option<i64>,
  },
  SimplifyFraction {
    complex_num: i64,
    complex_den: i64,
  },
  /// One of fraction/decimal/percentage is given, the rest are blanks.
  Fdp {
    given: FdpKind,
    fraction: Option<Fraction>,
    decimal: Option<f64>,
    percentage: Option<f64>,
  },
  /// Recurring value shown as LaTeX; the learner supplies the fraction.
  FdpRecurring {
    given: FdpKind,
    given_value: String,
    decimal: String,
    percentage: String,
  },
}

/// One generated question. Immutable once built, never persisted.
#[derive(Clone, Debug)]
pub struct Question {
  pub id: Uuid,
  pub family: Family,
  pub layout: Layout,
  pub answer: Answer,
  pub parts: Option<QuestionParts>,
}

impl Question {
  pub fn templated(family: Family, template: String, answer: Answer) -> Self {
    Self { id: Uuid::new_v4(), family, layout: Layout::Template(template), answer, parts: None }
  }

  pub fn structured(family: Family, layout: Layout, answer: Answer, parts: QuestionParts) -> Self {
    Self { id: Uuid::new_v4(), family, layout, answer, parts: Some(parts) }
  }

  /// Scalar canonical value, if this question has one.
  #[cfg(test)]
  pub fn scalar_answer(&self) -> Option<f64> {
    match self.answer {
      Answer::Scalar { value } => Some(value),
      _ => None,
    }
  }
}

/// Static level configuration.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct LevelDefinition {
  pub key: String,
  pub name: String,
  pub family: Family,
  #[serde(default)]
  pub params: GenParams,
}

/// Named curriculum section. Group order then level order is the curriculum order.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct TopicGroup {
  pub name: String,
  /// Heading for the mastery panel, e.g. "Number Bonds Mastery".
  #[serde(default)]
  pub title: String,
  pub levels: Vec<LevelDefinition>,
}

/// Performance bracket. `max_avg = None` is the unbounded catch-all.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct RatingTier {
  pub key: String,
  pub name: String,
  #[serde(default, rename = "maxAvg", alias = "max_avg")]
  pub max_avg: Option<f64>,
}

/// One completed level run. Append-only.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AttemptRecord {
  pub id: Uuid,
  pub level_key: String,
  pub elapsed_seconds: u64,
  pub streak_length: u32,
  pub timestamp: DateTime<Utc>,
}

impl AttemptRecord {
  pub fn average_per_question(&self) -> f64 {
    if self.streak_length == 0 { return 0.0; }
    self.elapsed_seconds as f64 / self.streak_length as f64
  }
}
