//! Built-in curriculum used when no TOML config is provided.

use std::collections::HashMap;

use crate::domain::{Family, GenParams, LevelDefinition, RatingTier, TopicGroup};
use crate::rating::DifficultyTable;

pub const DEFAULT_REQUIRED_STREAK: u32 = 15;
pub const DEFAULT_MASTERY_TIER: &str = "mastery";

fn level(key: &str, name: &str, family: Family, params: GenParams) -> LevelDefinition {
  LevelDefinition { key: key.into(), name: name.into(), family, params }
}

fn total(t: i64) -> GenParams {
  GenParams { total: Some(t), ..Default::default() }
}

fn tables(list: &[i64]) -> GenParams {
  GenParams { tables: Some(list.to_vec()), ..Default::default() }
}

/// The three topic groups in curriculum order.
pub fn default_groups() -> Vec<TopicGroup> {
  let none = GenParams::default;
  vec![
    TopicGroup {
      name: "Number Bonds".into(),
      title: "Number Bonds Mastery".into(),
      levels: vec![
        level("bonds10", "Bonds to 10", Family::Bonds, total(10)),
        level("bonds20", "Bonds to 20", Family::Bonds, total(20)),
        level(
          "mixed10-20",
          "Mixed Bonds 10-20",
          Family::Bonds,
          GenParams { range: Some((10, 20)), ..Default::default() },
        ),
        level("bonds100", "Bonds to 100", Family::Bonds, total(100)),
        level("bonds90", "Bonds to 90", Family::Bonds, total(90)),
        level("bonds-10", "Bonds to -10", Family::Bonds, total(-10)),
        level("bonds-20", "Bonds to -20", Family::Bonds, total(-20)),
        level("bonds-50", "Bonds to -50", Family::Bonds, total(-50)),
      ],
    },
    TopicGroup {
      name: "Multiplication & Division".into(),
      title: "Multiplication Mastery".into(),
      levels: vec![
        level("group245", "2 4 5 10", Family::GroupTable, tables(&[2, 4, 5, 10])),
        level("group369", "3 6 9", Family::GroupTable, tables(&[3, 6, 9])),
        level("multall", "2 to 12", Family::GroupTable, tables(&[2, 3, 4, 5, 6, 7, 8, 9, 10, 11, 12])),
        level("mixed-negative-mult", "Negatives", Family::NegativeTable, none()),
        level("powersOf10", "Powers of 10", Family::PowersOf10, none()),
        level(
          "double100",
          "Doubling",
          Family::Doubling,
          GenParams { max: Some(100), ..Default::default() },
        ),
        level("squares", "Perfect Squares", Family::PerfectSquares, none()),
        level("unitConversions", "Unit Conversions", Family::UnitConversions, none()),
      ],
    },
    TopicGroup {
      name: "Fractions Decimals Percentages".into(),
      title: "Fractions Mastery".into(),
      levels: vec![
        level("hcf", "HCF", Family::Hcf, none()),
        level("lcm", "LCM", Family::Lcm, none()),
        level("equivFractions", "Equivalent Fractions", Family::EquivalentFractions, none()),
        level("simplifyFractions", "Simplifying Fractions", Family::SimplifyFractions, none()),
        level("fdpConversions", "Common FDP Equivalences", Family::FdpConversions, none()),
        level("fdpConversionsMultiples", "FDP Conversions", Family::FdpConversionsMultiples, none()),
        level("fractionOfQuantity", "Fraction of a Quantity", Family::FractionOfQuantity, none()),
        level("percentageOfQuantity", "Percentage of a Quantity", Family::PercentageOfQuantity, none()),
      ],
    },
  ]
}

/// Fastest first; the last tier is unbounded.
pub fn default_rating_tiers() -> Vec<RatingTier> {
  let tier = |key: &str, name: &str, max_avg: Option<f64>| RatingTier { key: key.into(), name: name.into(), max_avg };
  vec![
    tier("true-mastery", "💖 Maths Queen 💖", Some(1.5)),
    tier("mastery", "⚡️ Mastery ⚡️", Some(2.0)),
    tier("expert", "Expert", Some(3.0)),
    tier("developing", "Developing", Some(4.0)),
    tier("beginner", "Beginner", None),
  ]
}

pub fn default_difficulty() -> DifficultyTable {
  let multipliers: HashMap<String, f64> = [
    ("bonds10", 1.0),
    ("bonds20", 1.0),
    ("mixed10-20", 1.0),
    ("bonds90", 1.6),
    ("bonds100", 1.2),
    ("bonds-10", 1.5),
    ("bonds-20", 1.5),
    ("bonds-50", 1.6),
    ("group245", 1.0),
    ("group369", 1.0),
    ("multall", 1.1),
    ("mixed-negative-mult", 1.4),
    ("powersOf10", 2.0),
    ("double100", 1.2),
    ("squares", 1.0),
    ("unitConversions", 4.0),
    ("hcf", 1.5),
    ("lcm", 2.0),
    ("equivFractions", 1.5),
    ("simplifyFractions", 2.5),
    ("fdpConversions", 2.0),
    ("fdpConversionsMultiples", 2.2),
    ("fractionOfQuantity", 1.8),
    ("percentageOfQuantity", 1.8),
  ]
  .into_iter()
  .map(|(k, v)| (k.to_string(), v))
  .collect();
  DifficultyTable { multipliers, default: 1.0 }
}

pub fn default_positive_feedback() -> Vec<String> {
  ["Awesome!", "Great Job!", "You got it!", "Fantastic!", "Brilliant!", "Keep it up!"]
    .into_iter()
    .map(String::from)
    .collect()
}
