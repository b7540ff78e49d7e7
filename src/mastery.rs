//! Curriculum-wide progress, derived from each level's best rating.
//!
//! Nothing here is stored: progress is recomputed from the lookup on
//! every call, so it can never drift from the recorded best times.

use serde::Serialize;

use crate::domain::LevelDefinition;
use crate::rating::RatingScale;

#[derive(Clone, Copy, Debug, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TopicProgress {
  pub mastered_count: usize,
  pub total_count: usize,
  /// Fraction in `[0, 1]`.
  pub progress: f64,
  /// `round(progress * 100)`.
  pub percentage: u32,
}

fn is_mastered<L, K>(level: &LevelDefinition, lookup: &L, scale: &RatingScale) -> bool
where
  L: Fn(&str) -> Option<K>,
  K: AsRef<str>,
{
  lookup(level.key.as_str()).is_some_and(|tier| scale.is_mastered(tier.as_ref()))
}

/// Share of `levels` whose best rating is at or above mastery.
/// `lookup` maps a level key to its best tier key, `None` if never attempted.
pub fn topic_progress<L, K>(levels: &[LevelDefinition], lookup: L, scale: &RatingScale) -> TopicProgress
where
  L: Fn(&str) -> Option<K>,
  K: AsRef<str>,
{
  let total_count = levels.len();
  let mastered_count = levels.iter().filter(|l| is_mastered(l, &lookup, scale)).count();
  let progress = if total_count == 0 { 0.0 } else { mastered_count as f64 / total_count as f64 };
  TopicProgress {
    mastered_count,
    total_count,
    progress,
    percentage: (progress * 100.0).round() as u32,
  }
}

/// First level not yet mastered in curriculum order. Once everything is
/// mastered, practice starts over from the first level.
pub fn next_recommended_level<'a, L, K>(
  curriculum: &'a [LevelDefinition],
  lookup: L,
  scale: &RatingScale,
) -> Option<&'a LevelDefinition>
where
  L: Fn(&str) -> Option<K>,
  K: AsRef<str>,
{
  curriculum
    .iter()
    .find(|l| !is_mastered(l, &lookup, scale))
    .or_else(|| curriculum.first())
}

#[cfg(test)]
mod tests {
  use std::collections::HashMap;

  use super::*;
  use crate::domain::{Family, GenParams, RatingTier};

  fn level(key: &str) -> LevelDefinition {
    LevelDefinition { key: key.into(), name: key.into(), family: Family::Doubling, params: GenParams::default() }
  }

  fn scale() -> RatingScale {
    let tier = |k: &str, b: Option<f64>| RatingTier { key: k.into(), name: k.into(), max_avg: b };
    RatingScale::new(vec![tier("top", Some(1.5)), tier("mastery", Some(2.0)), tier("slow", None)], "mastery")
      .expect("scale")
  }

  fn lookup(pairs: &[(&str, &'static str)]) -> HashMap<String, &'static str> {
    pairs.iter().map(|(k, v)| (k.to_string(), *v)).collect()
  }

  #[test]
  fn two_of_three_mastered_is_67_percent() {
    let levels = vec![level("a"), level("b"), level("c")];
    let best = lookup(&[("a", "mastery"), ("b", "mastery")]);
    let p = topic_progress(&levels, |k| best.get(k).copied(), &scale());
    assert_eq!(p.mastered_count, 2);
    assert_eq!(p.total_count, 3);
    assert_eq!(p.percentage, 67);
  }

  #[test]
  fn below_mastery_does_not_count() {
    let levels = vec![level("a"), level("b")];
    let best = lookup(&[("a", "top"), ("b", "slow")]);
    let p = topic_progress(&levels, |k| best.get(k).copied(), &scale());
    assert_eq!(p.mastered_count, 1);
    assert_eq!(p.percentage, 50);
  }

  #[test]
  fn empty_group_is_zero_percent() {
    let p = topic_progress(&[], |_| None::<&str>, &scale());
    assert_eq!(p.total_count, 0);
    assert_eq!(p.progress, 0.0);
    assert_eq!(p.percentage, 0);
  }

  #[test]
  fn recommends_first_unmastered_level() {
    let levels = vec![level("a"), level("b"), level("c")];
    let best = lookup(&[("a", "top"), ("b", "slow")]);
    let next = next_recommended_level(&levels, |k| best.get(k).copied(), &scale());
    assert_eq!(next.map(|l| l.key.as_str()), Some("b"));

    let best = lookup(&[("a", "top"), ("b", "mastery")]);
    let next = next_recommended_level(&levels, |k| best.get(k).copied(), &scale());
    assert_eq!(next.map(|l| l.key.as_str()), Some("c"));
  }

  #[test]
  fn all_mastered_wraps_to_the_start() {
    let levels = vec![level("a"), level("b")];
    let best = lookup(&[("a", "top"), ("b", "mastery")]);
    let next = next_recommended_level(&levels, |k| best.get(k).copied(), &scale());
    assert_eq!(next.map(|l| l.key.as_str()), Some("a"));
    assert!(next_recommended_level(&[], |_| None::<&str>, &scale()).is_none());
  }
}
