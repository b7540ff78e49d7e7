//! Error types for generation, configuration and drill sessions.

use thiserror::Error;

use crate::domain::Family;

/// Errors raised when a question cannot be generated.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum GenerateError {
  /// The family key does not name a known family.
  #[error("Unknown question family: {0}")]
  UnknownFamily(String),

  /// The family needs a parameter the level did not supply.
  #[error("Family {family} requires parameter '{param}'")]
  MissingParameter { family: Family, param: &'static str },

  /// A parameter would leave the family with an empty sample space.
  #[error("Invalid parameters for family {family}: {reason}")]
  InvalidParameter { family: Family, reason: String },
}

/// Errors raised while validating curriculum configuration.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum ConfigError {
  #[error("Rating scale has no tiers")]
  EmptyTiers,

  #[error("Rating tier '{key}' bound {bound} is not above the previous bound {previous}")]
  NonMonotonicTiers { key: String, bound: f64, previous: f64 },

  #[error("Only the last rating tier may be unbounded (tier '{0}')")]
  UnboundedBeforeLast(String),

  #[error("Last rating tier '{0}' must be unbounded")]
  BoundedLastTier(String),

  #[error("Mastery tier '{0}' is not one of the rating tiers")]
  UnknownMasteryTier(String),

  #[error("Difficulty multiplier for '{key}' must be finite and positive, got {value}")]
  InvalidMultiplier { key: String, value: f64 },

  #[error("Required streak must be at least 1")]
  ZeroStreak,

  #[error("Duplicate level key: {0}")]
  DuplicateLevel(String),

  #[error("Level '{key}' is misconfigured: {source}")]
  InvalidLevel {
    key: String,
    #[source]
    source: GenerateError,
  },
}

/// Errors surfaced by the drill-session layer.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum SessionError {
  #[error("Unknown session: {0}")]
  UnknownSession(String),

  #[error("Unknown level: {0}")]
  UnknownLevel(String),

  #[error("Curriculum has no levels")]
  EmptyCurriculum,

  #[error(transparent)]
  Generate(#[from] GenerateError),
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn generate_error_display() {
    let err = GenerateError::MissingParameter { family: Family::Bonds, param: "total" };
    let display = err.to_string();
    assert!(display.contains("bonds"));
    assert!(display.contains("total"));
  }

  #[test]
  fn session_error_wraps_generation_failures() {
    let err: SessionError = GenerateError::UnknownFamily("x".into()).into();
    assert_eq!(err.to_string(), "Unknown question family: x");
  }
}
