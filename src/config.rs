//! Loading the curriculum configuration from TOML.
//!
//! Every section is optional; anything left out keeps the built-in value
//! from `seeds`. Example:
//!
//! ```toml
//! required_streak = 10
//! mastery_tier = "expert"
//!
//! [difficulty]
//! default = 1.0
//! [difficulty.multipliers]
//! bonds10 = 1.2
//!
//! [[groups]]
//! name = "Tables"
//! title = "Tables Mastery"
//! [[groups.levels]]
//! key = "seven"
//! name = "7 times"
//! family = "singleTable"
//! params = { table = 7 }
//! ```

use std::collections::HashSet;

use serde::Deserialize;
use tracing::{error, info};

use crate::domain::{LevelDefinition, RatingTier, TopicGroup};
use crate::error::ConfigError;
use crate::generator::validate_params;
use crate::rating::{DifficultyTable, RatingScale};
use crate::seeds;

/// Raw TOML shape.
#[derive(Clone, Debug, Deserialize, Default)]
pub struct CurriculumFile {
  #[serde(default)] pub required_streak: Option<u32>,
  #[serde(default)] pub mastery_tier: Option<String>,
  #[serde(default)] pub rating_tiers: Option<Vec<RatingTier>>,
  #[serde(default)] pub difficulty: Option<DifficultyTable>,
  #[serde(default)] pub groups: Option<Vec<TopicGroup>>,
  #[serde(default)] pub positive_feedback: Option<Vec<String>>,
}

/// Validated, immutable configuration shared by the drill layer.
#[derive(Clone, Debug)]
pub struct AppConfig {
  pub required_streak: u32,
  pub scale: RatingScale,
  pub difficulty: DifficultyTable,
  pub groups: Vec<TopicGroup>,
  pub positive_feedback: Vec<String>,
}

impl Default for AppConfig {
  fn default() -> Self {
    Self {
      required_streak: seeds::DEFAULT_REQUIRED_STREAK,
      scale: default_scale(),
      difficulty: seeds::default_difficulty(),
      groups: seeds::default_groups(),
      positive_feedback: seeds::default_positive_feedback(),
    }
  }
}

fn default_scale() -> RatingScale {
  // the built-in tiers are covered by `defaults_are_valid`
  RatingScale::new(seeds::default_rating_tiers(), seeds::DEFAULT_MASTERY_TIER)
    .unwrap_or_else(|e| unreachable!("built-in rating tiers are invalid: {e}"))
}

impl AppConfig {
  /// Merge a parsed file over the defaults and validate the result.
  pub fn from_file(file: CurriculumFile) -> Result<Self, ConfigError> {
    let required_streak = file.required_streak.unwrap_or(seeds::DEFAULT_REQUIRED_STREAK);
    if required_streak == 0 {
      return Err(ConfigError::ZeroStreak);
    }

    let tiers = file.rating_tiers.unwrap_or_else(seeds::default_rating_tiers);
    let mastery = file.mastery_tier.as_deref().unwrap_or(seeds::DEFAULT_MASTERY_TIER);
    let scale = RatingScale::new(tiers, mastery)?;

    let groups = file.groups.unwrap_or_else(seeds::default_groups);
    let mut seen = HashSet::new();
    for level in groups.iter().flat_map(|g| &g.levels) {
      if !seen.insert(level.key.as_str()) {
        return Err(ConfigError::DuplicateLevel(level.key.clone()));
      }
      validate_params(level.family, &level.params)
        .map_err(|source| ConfigError::InvalidLevel { key: level.key.clone(), source })?;
    }

    let difficulty = file.difficulty.unwrap_or_else(seeds::default_difficulty);
    difficulty.validate()?;

    let positive_feedback = match file.positive_feedback {
      Some(list) if !list.is_empty() => list,
      _ => seeds::default_positive_feedback(),
    };

    Ok(Self {
      required_streak,
      scale,
      difficulty,
      groups,
      positive_feedback,
    })
  }

  /// All levels in curriculum order.
  pub fn curriculum(&self) -> Vec<LevelDefinition> {
    self.groups.iter().flat_map(|g| g.levels.iter().cloned()).collect()
  }

  pub fn level(&self, key: &str) -> Option<&LevelDefinition> {
    self.groups.iter().flat_map(|g| &g.levels).find(|l| l.key == key)
  }
}

/// Parse and validate TOML text.
pub fn parse_config(text: &str) -> Result<AppConfig, Box<dyn std::error::Error + Send + Sync>> {
  let file: CurriculumFile = toml::from_str(text)?;
  Ok(AppConfig::from_file(file)?)
}

/// Load from CURRICULUM_CONFIG_PATH. Any IO, parse or validation error is
/// logged and the built-in curriculum is used instead.
pub fn load_config_from_env() -> AppConfig {
  let Ok(path) = std::env::var("CURRICULUM_CONFIG_PATH") else {
    info!(target: "mathsfacts", "CURRICULUM_CONFIG_PATH not set; using built-in curriculum");
    return AppConfig::default();
  };
  match std::fs::read_to_string(&path) {
    Ok(s) => match parse_config(&s) {
      Ok(cfg) => {
        info!(target: "mathsfacts", %path, levels = cfg.curriculum().len(), "Loaded curriculum config (TOML)");
        cfg
      }
      Err(e) => {
        error!(target: "mathsfacts", %path, error = %e, "Invalid curriculum config; using built-in curriculum");
        AppConfig::default()
      }
    },
    Err(e) => {
      error!(target: "mathsfacts", %path, error = %e, "Failed to read curriculum config file");
      AppConfig::default()
    }
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::domain::Family;
  use crate::error::GenerateError;

  #[test]
  fn defaults_are_valid() {
    let cfg = AppConfig::from_file(CurriculumFile::default()).expect("defaults");
    assert_eq!(cfg.required_streak, 15);
    assert_eq!(cfg.groups.len(), 3);
    assert_eq!(cfg.curriculum().len(), 24);
    assert_eq!(cfg.scale.mastery_tier().key, "mastery");
    assert_eq!(cfg.difficulty.multiplier("unitConversions"), 4.0);
    assert_eq!(cfg.level("mixed10-20").map(|l| l.family), Some(Family::Bonds));
  }

  #[test]
  fn toml_overrides_sections() {
    let text = r#"
required_streak = 5
mastery_tier = "fast"
positive_feedback = ["Yes!"]

[[rating_tiers]]
key = "fast"
name = "Fast"
max_avg = 2.0

[[rating_tiers]]
key = "slow"
name = "Slow"

[[groups]]
name = "Tables"
[[groups.levels]]
key = "seven"
name = "7 times"
family = "singleTable"
params = { table = 7 }
"#;
    let cfg = parse_config(text).expect("config");
    assert_eq!(cfg.required_streak, 5);
    assert_eq!(cfg.scale.tiers().len(), 2);
    assert!(cfg.scale.is_mastered("fast"));
    assert_eq!(cfg.positive_feedback, vec!["Yes!".to_string()]);
    let level = cfg.level("seven").expect("level");
    assert_eq!(level.params.table, Some(7));
    // untouched sections keep their defaults
    assert_eq!(cfg.difficulty.multiplier("bonds90"), 1.6);
  }

  #[test]
  fn invalid_configs_are_rejected() {
    let zero = CurriculumFile { required_streak: Some(0), ..Default::default() };
    assert_eq!(AppConfig::from_file(zero).err(), Some(ConfigError::ZeroStreak));

    let mut groups = seeds::default_groups();
    let dup = groups[0].levels[0].clone();
    groups[1].levels.push(dup);
    let file = CurriculumFile { groups: Some(groups), ..Default::default() };
    assert_eq!(AppConfig::from_file(file).err(), Some(ConfigError::DuplicateLevel("bonds10".into())));

    let text = "[[groups]]\nname = \"x\"\n[[groups.levels]]\nkey = \"t\"\nname = \"t\"\nfamily = \"singleTable\"\n";
    let file: CurriculumFile = toml::from_str(text).expect("toml");
    assert_eq!(
      AppConfig::from_file(file).err(),
      Some(ConfigError::InvalidLevel {
        key: "t".into(),
        source: GenerateError::MissingParameter { family: Family::SingleTable, param: "table" },
      })
    );

    assert!(parse_config("groups = [[[").is_err());
  }

  #[test]
  fn non_positive_multipliers_are_rejected() {
    for (key, value) in [("bonds10", -1.0), ("bonds20", 0.0), ("bonds100", f64::INFINITY)] {
      let table = DifficultyTable { multipliers: [(key.to_string(), value)].into(), default: 1.0 };
      let file = CurriculumFile { difficulty: Some(table), ..Default::default() };
      assert_eq!(AppConfig::from_file(file).err(), Some(ConfigError::InvalidMultiplier { key: key.into(), value }));
    }

    let table = DifficultyTable { multipliers: Default::default(), default: f64::NAN };
    let file = CurriculumFile { difficulty: Some(table), ..Default::default() };
    assert!(matches!(
      AppConfig::from_file(file),
      Err(ConfigError::InvalidMultiplier { ref key, .. }) if key == "default"
    ));

    assert!(parse_config("[difficulty]\ndefault = 2.5\n").is_ok());
  }
}
