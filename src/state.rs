//! Application state: validated config, progress store and live drill sessions.
//!
//! This module owns:
//!   - the immutable `AppConfig` (curriculum, rating scale, multipliers)
//!   - the in-memory `ProgressStore` (best times, drill history)
//!   - active sessions keyed by id
//!
//! Ratings are derived from best times on demand, never stored.

use std::{collections::HashMap, sync::Arc, time::Duration};

use tokio::sync::RwLock;
use tokio::time::{interval, Instant, MissedTickBehavior};
use tracing::{debug, info, instrument};
use uuid::Uuid;

use crate::config::{load_config_from_env, AppConfig};
use crate::domain::{LevelDefinition, Question, RatingTier};
use crate::rating::rate;
use crate::store::ProgressStore;

/// Sessions untouched for this long are dropped by the sweeper.
pub const SESSION_IDLE_TIMEOUT: Duration = Duration::from_secs(30 * 60);
const SWEEP_INTERVAL: Duration = Duration::from_secs(60);

/// One drill in progress: the level, the current streak, when the timer
/// (re)started, and the question waiting for an answer.
#[derive(Clone, Debug)]
pub struct Session {
    pub id: Uuid,
    pub level: LevelDefinition,
    pub streak: u32,
    pub started_at: Instant,
    /// Last time the learner started, answered or was served a question.
    pub last_activity: Instant,
    pub current: Question,
}

impl Session {
    pub fn new(level: LevelDefinition, current: Question) -> Self {
        let now = Instant::now();
        Self { id: Uuid::new_v4(), level, streak: 0, started_at: now, last_activity: now, current }
    }
}

#[derive(Clone)]
pub struct AppState {
    pub config: Arc<AppConfig>,
    pub store: ProgressStore,
    pub sessions: Arc<RwLock<HashMap<Uuid, Session>>>,
}

impl AppState {
    /// Build state from env: load (or default) the curriculum config.
    #[instrument(level = "info", skip_all)]
    pub fn new() -> Self {
        let config = load_config_from_env();
        for group in &config.groups {
            info!(target: "mathsfacts", group = %group.name, levels = group.levels.len(), "Curriculum group loaded");
        }
        Self::with_config(config)
    }

    pub fn with_config(config: AppConfig) -> Self {
        Self {
            config: Arc::new(config),
            store: ProgressStore::new(),
            sessions: Arc::new(RwLock::new(HashMap::new())),
        }
    }

    /// Rating earned by a drill of `seconds` on `level_key`.
    pub fn rating_for(&self, level_key: &str, seconds: u64) -> &RatingTier {
        rate(
            seconds as f64,
            level_key,
            self.config.required_streak,
            &self.config.difficulty,
            &self.config.scale,
        )
    }

    /// Best tier key per level, derived from the recorded best times.
    pub async fn best_ratings(&self) -> HashMap<String, String> {
        self.store
            .best_times()
            .await
            .into_iter()
            .map(|(key, secs)| {
                let tier = self.rating_for(&key, secs).key.clone();
                (key, tier)
            })
            .collect()
    }

    #[instrument(level = "debug", skip(self, session), fields(id = %session.id, level = %session.level.key))]
    pub async fn insert_session(&self, session: Session) {
        self.sessions.write().await.insert(session.id, session);
    }

    /// Drop a session; `true` if it existed.
    #[instrument(level = "debug", skip(self))]
    pub async fn remove_session(&self, id: &Uuid) -> bool {
        self.sessions.write().await.remove(id).is_some()
    }

    /// Drop every session in `ids`; returns how many existed.
    pub async fn remove_sessions(&self, ids: &[Uuid]) -> usize {
        let mut sessions = self.sessions.write().await;
        ids.iter().filter(|id| sessions.remove(id).is_some()).count()
    }

    pub async fn session_count(&self) -> usize {
        self.sessions.read().await.len()
    }

    /// Drop sessions with no activity for at least `max_idle`.
    pub async fn evict_idle_sessions(&self, max_idle: Duration) -> usize {
        let mut sessions = self.sessions.write().await;
        let before = sessions.len();
        sessions.retain(|_, s| s.last_activity.elapsed() < max_idle);
        let evicted = before - sessions.len();
        if evicted > 0 {
            info!(target: "mathsfacts", evicted, active = sessions.len(), "Idle sessions evicted");
        }
        evicted
    }
}

/// Periodically evict abandoned sessions for the lifetime of the process.
pub fn spawn_session_sweeper(state: Arc<AppState>) -> tokio::task::JoinHandle<()> {
    tokio::spawn(async move {
        let mut ticker = interval(SWEEP_INTERVAL);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
        loop {
            ticker.tick().await;
            let evicted = state.evict_idle_sessions(SESSION_IDLE_TIMEOUT).await;
            debug!(target: "mathsfacts", evicted, "Session sweep");
        }
    })
}
