//! In-memory progress: best times and per-level drill history.
//!
//! Everything lives behind tokio `RwLock`s and is lost on restart.

use std::collections::{HashMap, VecDeque};
use std::sync::Arc;

use chrono::{DateTime, Utc};
use serde::Serialize;
use tokio::sync::RwLock;
use tracing::{debug, info, instrument};
use uuid::Uuid;

use crate::domain::AttemptRecord;

/// Attempts kept per level; older entries are dropped first.
pub const MAX_ATTEMPTS_PER_DRILL: usize = 500;
/// Completed drills kept across all levels.
pub const MAX_SESSIONS: usize = 1000;

#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AttemptEntry {
  pub elapsed_seconds: u64,
  pub timestamp: DateTime<Utc>,
  pub is_best: bool,
}

#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Improvement {
  pub previous_best: u64,
  pub new_best: u64,
  /// Seconds saved.
  pub improvement: u64,
  /// Rounded to one decimal place.
  pub percent_improvement: f64,
  pub timestamp: DateTime<Utc>,
}

#[derive(Clone, Debug, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DrillHistory {
  pub attempts: Vec<AttemptEntry>,
  pub best_time: Option<u64>,
  pub best_time_date: Option<DateTime<Utc>>,
  pub total_attempts: usize,
  pub average_time: f64,
  pub last_attempt: Option<DateTime<Utc>>,
  pub improvements: Vec<Improvement>,
}

impl DrillHistory {
  fn push(&mut self, elapsed: u64, timestamp: DateTime<Utc>) {
    match self.best_time {
      Some(best) if elapsed >= best => {}
      previous => {
        if let Some(prev) = previous {
          let saved = prev - elapsed;
          self.improvements.push(Improvement {
            previous_best: prev,
            new_best: elapsed,
            improvement: saved,
            percent_improvement: round_tenths(saved as f64 / prev as f64 * 100.0),
            timestamp,
          });
        }
        self.best_time = Some(elapsed);
        self.best_time_date = Some(timestamp);
      }
    }

    self.attempts.push(AttemptEntry { elapsed_seconds: elapsed, timestamp, is_best: self.best_time == Some(elapsed) });
    if self.attempts.len() > MAX_ATTEMPTS_PER_DRILL {
      let excess = self.attempts.len() - MAX_ATTEMPTS_PER_DRILL;
      self.attempts.drain(..excess);
    }

    self.total_attempts = self.attempts.len();
    self.last_attempt = Some(timestamp);
    let sum: u64 = self.attempts.iter().map(|a| a.elapsed_seconds).sum();
    self.average_time = sum as f64 / self.attempts.len() as f64;
  }
}

#[derive(Clone, Debug, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProgressSummary {
  pub total_drills: usize,
  pub total_attempts: usize,
  pub total_time_spent: u64,
  pub drills_with_improvement: usize,
  /// Mean of every recorded percentage improvement, one decimal place.
  pub average_improvement: f64,
}

fn round_tenths(x: f64) -> f64 {
  (x * 10.0).round() / 10.0
}

/// Outcome of recording a completed drill.
#[derive(Clone, Debug, PartialEq)]
pub struct RecordedAttempt {
  pub record: AttemptRecord,
  pub previous_best: Option<u64>,
  /// No previous best, or strictly faster than it.
  pub is_new_best: bool,
}

#[derive(Default)]
struct History {
  sessions: VecDeque<AttemptRecord>,
  drills: HashMap<String, DrillHistory>,
}

#[derive(Clone, Default)]
pub struct ProgressStore {
  best_times: Arc<RwLock<HashMap<String, u64>>>,
  history: Arc<RwLock<History>>,
}

impl ProgressStore {
  pub fn new() -> Self {
    Self::default()
  }

  #[instrument(level = "debug", skip(self))]
  pub async fn best_time(&self, level_key: &str) -> Option<u64> {
    self.best_times.read().await.get(level_key).copied()
  }

  /// Snapshot of every recorded best time.
  pub async fn best_times(&self) -> HashMap<String, u64> {
    self.best_times.read().await.clone()
  }

  #[instrument(level = "debug", skip(self))]
  pub async fn set_best_time(&self, level_key: &str, seconds: u64) {
    self.best_times.write().await.insert(level_key.to_string(), seconds);
    info!(target: "mathsfacts", %level_key, seconds, "Best time updated");
  }

  /// Append a completed drill to the session log and the level's history,
  /// updating the best time when it is beaten.
  ///
  /// Both locks are held together (best times first, then history) so
  /// concurrent completions cannot keep a slower time or let the two disagree.
  #[instrument(level = "debug", skip(self))]
  pub async fn record_attempt(&self, level_key: &str, elapsed_seconds: u64, streak_length: u32) -> RecordedAttempt {
    let record = AttemptRecord {
      id: Uuid::new_v4(),
      level_key: level_key.to_string(),
      elapsed_seconds,
      streak_length,
      timestamp: Utc::now(),
    };

    let mut best_times = self.best_times.write().await;
    let mut history = self.history.write().await;

    let previous_best = best_times.get(level_key).copied();
    let is_new_best = previous_best.map_or(true, |best| elapsed_seconds < best);
    if is_new_best {
      best_times.insert(level_key.to_string(), elapsed_seconds);
      info!(target: "mathsfacts", %level_key, seconds = elapsed_seconds, ?previous_best, "Best time updated");
    }

    history.sessions.push_back(record.clone());
    while history.sessions.len() > MAX_SESSIONS {
      history.sessions.pop_front();
    }
    let drill = history.drills.entry(level_key.to_string()).or_default();
    drill.push(elapsed_seconds, record.timestamp);
    debug!(
      target: "mathsfacts",
      %level_key, elapsed_seconds, attempts = drill.total_attempts, avg = record.average_per_question(),
      "Attempt recorded"
    );
    RecordedAttempt { record, previous_best, is_new_best }
  }

  /// Forget every best time and all drill history.
  #[instrument(level = "info", skip(self))]
  pub async fn clear(&self) {
    let mut best_times = self.best_times.write().await;
    let mut history = self.history.write().await;
    let (levels, drills) = (best_times.len(), history.sessions.len());
    best_times.clear();
    *history = History::default();
    info!(target: "mathsfacts", levels, drills, "Progress cleared");
  }

  pub async fn drill_history(&self, level_key: &str) -> Option<DrillHistory> {
    self.history.read().await.drills.get(level_key).cloned()
  }

  /// Most recent completed drills, newest first.
  pub async fn recent_attempts(&self, limit: usize) -> Vec<AttemptRecord> {
    self.history.read().await.sessions.iter().rev().take(limit).cloned().collect()
  }

  pub async fn summary(&self) -> ProgressSummary {
    let history = self.history.read().await;
    let mut summary = ProgressSummary { total_drills: history.drills.len(), ..Default::default() };
    let mut improvements = Vec::new();
    for drill in history.drills.values() {
      summary.total_attempts += drill.total_attempts;
      summary.total_time_spent += drill.attempts.iter().map(|a| a.elapsed_seconds).sum::<u64>();
      if !drill.improvements.is_empty() {
        summary.drills_with_improvement += 1;
      }
      improvements.extend(drill.improvements.iter().map(|i| i.percent_improvement));
    }
    if !improvements.is_empty() {
      summary.average_improvement = round_tenths(improvements.iter().sum::<f64>() / improvements.len() as f64);
    }
    summary
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[tokio::test]
  async fn best_times_round_trip() {
    let store = ProgressStore::new();
    assert_eq!(store.best_time("group2").await, None);
    store.set_best_time("group2", 41).await;
    assert_eq!(store.best_time("group2").await, Some(41));
    assert_eq!(store.best_times().await.len(), 1);
  }

  #[tokio::test]
  async fn history_tracks_bests_and_improvements() {
    let store = ProgressStore::new();
    store.record_attempt("bonds10", 40, 15).await;
    store.record_attempt("bonds10", 50, 15).await;
    let rec = store.record_attempt("bonds10", 30, 15).await;
    assert_eq!(rec.record.level_key, "bonds10");
    assert_eq!(rec.record.streak_length, 15);
    assert_eq!(rec.previous_best, Some(40));
    assert!(rec.is_new_best);

    let h = store.drill_history("bonds10").await.expect("history");
    assert_eq!(h.best_time, Some(30));
    assert_eq!(h.total_attempts, 3);
    assert!((h.average_time - 40.0).abs() < 1e-12);
    assert_eq!(h.attempts.iter().map(|a| a.is_best).collect::<Vec<_>>(), vec![true, false, true]);
    assert_eq!(h.improvements.len(), 1);
    assert_eq!(h.improvements[0].improvement, 10);
    assert_eq!(h.improvements[0].percent_improvement, 25.0);
    assert_eq!(h.last_attempt, Some(rec.record.timestamp));
    assert_eq!(store.best_time("bonds10").await, Some(30));
  }

  #[tokio::test]
  async fn slower_attempts_keep_the_best_time() {
    let store = ProgressStore::new();
    let first = store.record_attempt("hcf", 30, 15).await;
    assert_eq!((first.previous_best, first.is_new_best), (None, true));
    let slower = store.record_attempt("hcf", 40, 15).await;
    assert_eq!((slower.previous_best, slower.is_new_best), (Some(30), false));
    let tie = store.record_attempt("hcf", 30, 15).await;
    assert!(!tie.is_new_best);
    assert_eq!(store.best_time("hcf").await, Some(30));
  }

  #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
  async fn concurrent_completions_keep_the_fastest_time() {
    let store = ProgressStore::new();
    let tasks: Vec<_> = (0..50u64)
      .rev()
      .map(|i| {
        let store = store.clone();
        tokio::spawn(async move { store.record_attempt("lcm", 20 + i, 15).await })
      })
      .collect();
    let mut new_bests = 0;
    for task in tasks {
      if task.await.expect("join").is_new_best {
        new_bests += 1;
      }
    }
    assert!(new_bests >= 1);
    assert_eq!(store.best_time("lcm").await, Some(20));
    let h = store.drill_history("lcm").await.expect("history");
    assert_eq!(h.best_time, Some(20));
    assert_eq!(h.total_attempts, 50);
  }

  #[tokio::test]
  async fn clear_forgets_everything() {
    let store = ProgressStore::new();
    store.record_attempt("a", 40, 15).await;
    store.set_best_time("b", 12).await;
    store.clear().await;
    assert!(store.best_times().await.is_empty());
    assert!(store.drill_history("a").await.is_none());
    assert!(store.recent_attempts(10).await.is_empty());
    assert_eq!(store.summary().await, ProgressSummary::default());

    let again = store.record_attempt("a", 50, 15).await;
    assert_eq!(again.previous_best, None);
    assert!(again.is_new_best);
  }

  #[tokio::test]
  async fn attempts_and_sessions_are_capped() {
    let store = ProgressStore::new();
    for i in 0..(MAX_ATTEMPTS_PER_DRILL + 10) {
      store.record_attempt("a", 100 + i as u64, 15).await;
    }
    for _ in 0..MAX_SESSIONS {
      store.record_attempt("b", 20, 15).await;
    }
    let a = store.drill_history("a").await.expect("a");
    assert_eq!(a.attempts.len(), MAX_ATTEMPTS_PER_DRILL);
    assert_eq!(a.attempts[0].elapsed_seconds, 110);
    assert_eq!(a.best_time, Some(100));
    assert_eq!(store.recent_attempts(usize::MAX).await.len(), MAX_SESSIONS);
  }

  #[tokio::test]
  async fn recent_attempts_are_newest_first() {
    let store = ProgressStore::new();
    store.record_attempt("a", 10, 15).await;
    store.record_attempt("b", 20, 15).await;
    let recent = store.recent_attempts(1).await;
    assert_eq!(recent.len(), 1);
    assert_eq!(recent[0].level_key, "b");
  }

  #[tokio::test]
  async fn summary_aggregates_every_drill() {
    let store = ProgressStore::new();
    assert_eq!(store.summary().await, ProgressSummary::default());
    store.record_attempt("a", 40, 15).await;
    store.record_attempt("a", 30, 15).await;
    store.record_attempt("b", 60, 15).await;
    store.record_attempt("b", 45, 15).await;
    let s = store.summary().await;
    assert_eq!(s.total_drills, 2);
    assert_eq!(s.total_attempts, 4);
    assert_eq!(s.total_time_spent, 175);
    assert_eq!(s.drills_with_improvement, 2);
    assert_eq!(s.average_improvement, 25.0);
  }
}
