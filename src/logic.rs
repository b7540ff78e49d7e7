//! Core behaviors shared by both HTTP and WebSocket handlers.
//!
//! This includes:
//!   - Starting, continuing and quitting drill sessions
//!   - Checking answers, streaks, completion, best times and ratings
//!   - Curriculum, progress and history reports, and clearing progress

use rand::seq::SliceRandom;
use tokio::time::Instant;
use tracing::{debug, info, instrument, warn};
use uuid::Uuid;

use crate::checker::{check_answer, format_answer_for_display, is_blank, UserAnswer};
use crate::domain::{LevelDefinition, Question};
use crate::error::SessionError;
use crate::generator::generate;
use crate::mastery::{next_recommended_level, topic_progress};
use crate::protocol::*;
use crate::state::{AppState, Session};
use crate::util::format_time;

const DEFAULT_HISTORY_LIMIT: usize = 10;
const FALLBACK_FEEDBACK: &str = "Correct!";
const BLANK_ANSWER_MESSAGE: &str = "Please enter an answer";

fn new_question(level: &LevelDefinition) -> Result<Question, SessionError> {
  // thread_rng stays inside this sync call so handler futures remain Send
  Ok(generate(level.family, &level.params, &mut rand::thread_rng())?)
}

fn parse_session_id(id: &str) -> Result<Uuid, SessionError> {
  Uuid::parse_str(id).map_err(|_| SessionError::UnknownSession(id.to_string()))
}

fn positive_feedback(state: &AppState) -> String {
  state
    .config
    .positive_feedback
    .choose(&mut rand::thread_rng())
    .cloned()
    .unwrap_or_else(|| FALLBACK_FEEDBACK.to_string())
}

/// Begin a drill on `level_key`: streak 0, timer running, first question.
#[instrument(level = "info", skip(state))]
pub async fn start_session(state: &AppState, level_key: &str) -> Result<SessionOut, SessionError> {
  let level = state
    .config
    .level(level_key)
    .cloned()
    .ok_or_else(|| SessionError::UnknownLevel(level_key.to_string()))?;
  let question = new_question(&level)?;
  let best_time = state.store.best_time(&level.key).await;

  let session = Session::new(level, question);
  let id = session.id;
  let out = SessionOut {
    session_id: id.to_string(),
    level: LevelOut::from(&session.level),
    streak: 0,
    required_streak: state.config.required_streak,
    best_time,
    question: question_out(&session.current),
  };
  state.insert_session(session).await;
  let active = state.session_count().await;
  info!(target: "mathsfacts", session_id = %id, %level_key, active, "Session started");
  Ok(out)
}

/// Start the first level in curriculum order that is not yet mastered.
#[instrument(level = "info", skip(state))]
pub async fn start_next_level(state: &AppState) -> Result<SessionOut, SessionError> {
  let ratings = state.best_ratings().await;
  let curriculum = state.config.curriculum();
  let next = next_recommended_level(&curriculum, |k| ratings.get(k), &state.config.scale)
    .ok_or(SessionError::EmptyCurriculum)?;
  let key = next.key.clone();
  start_session(state, &key).await
}

/// Check an answer against the session's current question.
///
/// Correct answers extend the streak and either complete the drill or serve
/// the next question. A wrong answer resets the streak and restarts the timer.
/// A blank answer changes nothing and asks for input.
#[instrument(level = "info", skip(state, answer), fields(%session_id))]
pub async fn submit_answer(state: &AppState, session_id: &str, answer: &UserAnswer) -> Result<AnswerOut, SessionError> {
  let id = parse_session_id(session_id)?;
  let required_streak = state.config.required_streak;

  let completed = {
    let mut sessions = state.sessions.write().await;
    let session = sessions.get_mut(&id).ok_or_else(|| SessionError::UnknownSession(session_id.to_string()))?;
    session.last_activity = Instant::now();

    if is_blank(answer, &session.current.answer) {
      debug!(target: "drill", %session_id, "Blank answer ignored");
      return Ok(AnswerOut::Blank { message: BLANK_ANSWER_MESSAGE.to_string(), streak: session.streak });
    }

    let correct = check_answer(answer, &session.current.answer, session.level.family);

    if !correct {
      let expected = format_answer_for_display(&session.current.answer);
      session.streak = 0;
      session.started_at = Instant::now();
      session.current = new_question(&session.level)?;
      info!(target: "drill", %session_id, level = %session.level.key, %expected, "Incorrect answer; streak reset");
      return Ok(AnswerOut::Incorrect { expected, streak: 0, question: question_out(&session.current) });
    }

    session.streak += 1;
    if session.streak < required_streak {
      session.current = new_question(&session.level)?;
      return Ok(AnswerOut::Correct {
        feedback: positive_feedback(state),
        streak: session.streak,
        required_streak,
        question: question_out(&session.current),
      });
    }

    // whole seconds, floored
    let elapsed = session.started_at.elapsed().as_secs();
    let streak = session.streak;
    let level = session.level.clone();
    sessions.remove(&id);
    (level, elapsed, streak)
  };

  let (level, elapsed, streak) = completed;
  let recorded = state.store.record_attempt(&level.key, elapsed, streak).await;
  let (previous_best, is_new_best) = (recorded.previous_best, recorded.is_new_best);

  let tier = state.rating_for(&level.key, elapsed);
  let rating = RatingOut::new(tier, state.config.scale.is_mastered(&tier.key));

  let ratings = state.best_ratings().await;
  let lookup = |k: &str| ratings.get(k);
  let topic = state
    .config
    .groups
    .iter()
    .find(|g| g.levels.iter().any(|l| l.key == level.key))
    .map(|g| TopicOut {
      name: g.name.clone(),
      title: g.title.clone(),
      progress: topic_progress(&g.levels, lookup, &state.config.scale),
    });
  let curriculum = state.config.curriculum();
  let next_level = next_recommended_level(&curriculum, lookup, &state.config.scale).map(LevelOut::from);

  info!(
    target: "mathsfacts",
    %session_id, level = %level.key, elapsed, rating = %rating.key, is_new_best, ?previous_best,
    "Drill completed"
  );
  Ok(AnswerOut::Completed {
    feedback: positive_feedback(state),
    level_key: level.key.clone(),
    level_name: level.name.clone(),
    elapsed_seconds: elapsed,
    formatted_time: format_time(elapsed),
    rating,
    is_new_best,
    previous_best,
    topic,
    next_level,
  })
}

/// End a drill without recording anything.
#[instrument(level = "info", skip(state))]
pub async fn quit_session(state: &AppState, session_id: &str) -> Result<QuitOut, SessionError> {
  let id = parse_session_id(session_id)?;
  if !state.remove_session(&id).await {
    warn!(target: "mathsfacts", %session_id, "Quit for unknown session");
    return Err(SessionError::UnknownSession(session_id.to_string()));
  }
  info!(target: "mathsfacts", %session_id, "Session quit");
  Ok(QuitOut { session_id: session_id.to_string(), ended: true })
}

/// Curriculum with best time and rating per level.
#[instrument(level = "debug", skip(state))]
pub async fn list_levels(state: &AppState) -> LevelsOut {
  let best_times = state.store.best_times().await;
  let scale = &state.config.scale;
  let groups = state
    .config
    .groups
    .iter()
    .map(|g| {
      let levels = g
        .levels
        .iter()
        .map(|l| {
          let best_time = best_times.get(&l.key).copied();
          let rating = best_time.map(|secs| {
            let tier = state.rating_for(&l.key, secs);
            RatingOut::new(tier, scale.is_mastered(&tier.key))
          });
          LevelSummaryOut {
            key: l.key.clone(),
            name: l.name.clone(),
            family: l.family,
            best_time,
            formatted_best_time: best_time.map(format_time),
            rating,
          }
        })
        .collect::<Vec<_>>();
      let progress = topic_progress(
        &g.levels,
        |k| levels.iter().find(|s| s.key == k).and_then(|s| s.rating.as_ref()).map(|r| r.key.as_str()),
        scale,
      );
      GroupOut { name: g.name.clone(), title: g.title.clone(), progress, levels }
    })
    .collect();
  LevelsOut {
    required_streak: state.config.required_streak,
    rating_tiers: scale.tiers().to_vec(),
    mastery_tier: scale.mastery_tier().key.clone(),
    groups,
  }
}

/// Topic progress per group, overall progress, and the recommended next level.
#[instrument(level = "debug", skip(state))]
pub async fn progress_report(state: &AppState) -> ProgressOut {
  let ratings = state.best_ratings().await;
  let lookup = |k: &str| ratings.get(k);
  let scale = &state.config.scale;
  let curriculum = state.config.curriculum();
  let topics = state
    .config
    .groups
    .iter()
    .map(|g| TopicOut { name: g.name.clone(), title: g.title.clone(), progress: topic_progress(&g.levels, lookup, scale) })
    .collect();
  ProgressOut {
    overall: topic_progress(&curriculum, lookup, scale),
    topics,
    next_level: next_recommended_level(&curriculum, lookup, scale).map(LevelOut::from),
  }
}

/// Clear every best time and all drill history; live sessions keep running.
#[instrument(level = "info", skip(state))]
pub async fn reset_progress(state: &AppState) -> ProgressOut {
  state.store.clear().await;
  progress_report(state).await
}

/// Drill history for one level (when given) plus the overall summary.
#[instrument(level = "debug", skip(state))]
pub async fn history_report(state: &AppState, level_key: Option<String>, limit: Option<usize>) -> HistoryOut {
  let history = match &level_key {
    Some(key) => state.store.drill_history(key).await,
    None => None,
  };
  HistoryOut {
    level_key,
    history,
    summary: state.store.summary().await,
    recent: state.store.recent_attempts(limit.unwrap_or(DEFAULT_HISTORY_LIMIT)).await,
  }
}
