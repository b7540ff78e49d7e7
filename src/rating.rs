//! Speed ratings for completed drills.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::domain::RatingTier;
use crate::error::ConfigError;

/// Ordered tiers, fastest first. Construction enforces the ordering, so a
/// `RatingScale` in hand always yields a tier for any non-negative average.
#[derive(Clone, Debug, PartialEq)]
pub struct RatingScale {
  tiers: Vec<RatingTier>,
  mastery_index: usize,
}

impl RatingScale {
  /// Bounds must be strictly increasing, only the last tier is unbounded,
  /// and `mastery_key` must name one of the tiers.
  pub fn new(tiers: Vec<RatingTier>, mastery_key: &str) -> Result<Self, ConfigError> {
    let last = tiers.len().checked_sub(1).ok_or(ConfigError::EmptyTiers)?;
    let mut previous: Option<f64> = None;
    for (i, tier) in tiers.iter().enumerate() {
      match (tier.max_avg, i == last) {
        (Some(_), true) => return Err(ConfigError::BoundedLastTier(tier.key.clone())),
        (None, false) => return Err(ConfigError::UnboundedBeforeLast(tier.key.clone())),
        (None, true) => {}
        (Some(bound), false) => {
          if let Some(prev) = previous {
            // NaN bounds fail here too
            if !(bound > prev) {
              return Err(ConfigError::NonMonotonicTiers { key: tier.key.clone(), bound, previous: prev });
            }
          }
          previous = Some(bound);
        }
      }
    }
    let mastery_index = tiers
      .iter()
      .position(|t| t.key == mastery_key)
      .ok_or_else(|| ConfigError::UnknownMasteryTier(mastery_key.to_string()))?;
    Ok(Self { tiers, mastery_index })
  }

  pub fn tiers(&self) -> &[RatingTier] {
    &self.tiers
  }

  pub fn mastery_tier(&self) -> &RatingTier {
    &self.tiers[self.mastery_index]
  }

  /// Position of the tier with `key`; 0 is the best.
  pub fn rank(&self, key: &str) -> Option<usize> {
    self.tiers.iter().position(|t| t.key == key)
  }

  /// At or above the mastery tier. Unknown keys are not mastered.
  pub fn is_mastered(&self, tier_key: &str) -> bool {
    self.rank(tier_key).is_some_and(|r| r <= self.mastery_index)
  }

  /// First tier whose bound admits `avg`; the unbounded tail catches the rest.
  pub fn classify(&self, avg: f64) -> &RatingTier {
    self
      .tiers
      .iter()
      .find(|t| t.max_avg.map_or(true, |bound| avg <= bound))
      .unwrap_or(&self.tiers[self.tiers.len() - 1])
  }
}

/// Per-level allowance: a multiplier above 1 makes a level's ratings easier.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct DifficultyTable {
  #[serde(default)]
  pub multipliers: HashMap<String, f64>,
  #[serde(default = "default_multiplier")]
  pub default: f64,
}

fn default_multiplier() -> f64 {
  1.0
}

impl Default for DifficultyTable {
  fn default() -> Self {
    Self { multipliers: HashMap::new(), default: default_multiplier() }
  }
}

impl DifficultyTable {
  pub fn multiplier(&self, level_key: &str) -> f64 {
    self.multipliers.get(level_key).copied().unwrap_or(self.default)
  }

  /// Every multiplier, `default` included, must be finite and above zero.
  pub fn validate(&self) -> Result<(), ConfigError> {
    let entries = std::iter::once(("default", self.default))
      .chain(self.multipliers.iter().map(|(k, v)| (k.as_str(), *v)));
    for (key, value) in entries {
      if !(value.is_finite() && value > 0.0) {
        return Err(ConfigError::InvalidMultiplier { key: key.to_string(), value });
      }
    }
    Ok(())
  }
}

/// Rate a drill finished in `elapsed` seconds.
pub fn rate<'a>(
  elapsed: f64,
  level_key: &str,
  required_streak: u32,
  difficulty: &DifficultyTable,
  scale: &'a RatingScale,
) -> &'a RatingTier {
  debug_assert!(required_streak > 0, "required streak must be positive");
  debug_assert!(elapsed >= 0.0, "elapsed time must be non-negative");
  let avg = elapsed / f64::from(required_streak);
  let adjusted = avg / difficulty.multiplier(level_key);
  scale.classify(adjusted)
}
