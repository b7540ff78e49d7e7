//! Public protocol structs for WebSocket and HTTP endpoints (serde ready).
//! Keys are camelCase on the wire. Question DTOs never carry the answer.

use serde::{Deserialize, Serialize};

use crate::checker::UserAnswer;
use crate::domain::{Answer, AttemptRecord, Family, LevelDefinition, Question, QuestionParts, RatingTier};
use crate::mastery::TopicProgress;
use crate::store::{DrillHistory, ProgressSummary};

/// Messages the client can send over WebSocket.
#[derive(Debug, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case", rename_all_fields = "camelCase")]
pub enum ClientWsMessage {
    Ping,
    Levels,
    StartLevel { level_key: String },
    NextLevel,
    SubmitAnswer { session_id: String, answer: UserAnswer },
    Quit { session_id: String },
    Progress,
    ResetProgress,
}

/// Messages the server sends back over WebSocket.
#[derive(Debug, Serialize)]
#[serde(tag = "type", rename_all = "snake_case", rename_all_fields = "camelCase")]
pub enum ServerWsMessage {
    Pong,
    Levels { levels: LevelsOut },
    Session { session: SessionOut },
    AnswerResult { result: AnswerOut },
    Quit { session_id: String },
    Progress { progress: ProgressOut },
    Error { message: String },
}

/// Question as shown to the learner.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct QuestionOut {
    pub id: String,
    pub family: Family,
    /// LaTeX template with `{{INPUT}}`, or a layout tag.
    pub format: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub parts: Option<QuestionParts>,
    /// Answer shape the client should send back (`scalar`, `fraction`, `fdp`).
    pub answer_shape: &'static str,
    /// Input fields expected, e.g. `["num", "den"]`.
    pub expects: Vec<&'static str>,
}

/// Convert a `Question` (internal) to the public DTO.
pub fn question_out(q: &Question) -> QuestionOut {
    let (answer_shape, expects) = match &q.answer {
        Answer::Scalar { .. } => ("scalar", vec!["value"]),
        Answer::Fraction { .. } => ("fraction", vec!["num", "den"]),
        Answer::Fdp { fraction, decimal, percentage } => {
            let mut fields = Vec::with_capacity(3);
            if fraction.is_some() {
                fields.push("fraction");
            }
            if decimal.is_some() {
                fields.push("decimal");
            }
            if percentage.is_some() {
                fields.push("percentage");
            }
            ("fdp", fields)
        }
    };
    QuestionOut {
        id: q.id.to_string(),
        family: q.family,
        format: q.layout.as_format().to_string(),
        parts: q.parts.clone(),
        answer_shape,
        expects,
    }
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LevelOut {
    pub key: String,
    pub name: String,
    pub family: Family,
}

impl From<&LevelDefinition> for LevelOut {
    fn from(l: &LevelDefinition) -> Self {
        Self { key: l.key.clone(), name: l.name.clone(), family: l.family }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RatingOut {
    pub key: String,
    pub name: String,
    pub mastered: bool,
}

impl RatingOut {
    pub fn new(tier: &RatingTier, mastered: bool) -> Self {
        Self { key: tier.key.clone(), name: tier.name.clone(), mastered }
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionOut {
    pub session_id: String,
    pub level: LevelOut,
    pub streak: u32,
    pub required_streak: u32,
    pub best_time: Option<u64>,
    pub question: QuestionOut,
}

/// Result of one submitted answer.
#[derive(Debug, Serialize)]
#[serde(tag = "status", rename_all = "snake_case", rename_all_fields = "camelCase")]
pub enum AnswerOut {
    Correct {
        feedback: String,
        streak: u32,
        required_streak: u32,
        question: QuestionOut,
    },
    /// Nothing was entered; streak, timer and question are unchanged.
    Blank {
        message: String,
        streak: u32,
    },
    /// Streak and timer are reset; `expected` is display LaTeX.
    Incorrect {
        expected: String,
        streak: u32,
        question: QuestionOut,
    },
    Completed {
        feedback: String,
        level_key: String,
        level_name: String,
        elapsed_seconds: u64,
        formatted_time: String,
        rating: RatingOut,
        is_new_best: bool,
        previous_best: Option<u64>,
        topic: Option<TopicOut>,
        next_level: Option<LevelOut>,
    },
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LevelSummaryOut {
    pub key: String,
    pub name: String,
    pub family: Family,
    pub best_time: Option<u64>,
    pub formatted_best_time: Option<String>,
    pub rating: Option<RatingOut>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GroupOut {
    pub name: String,
    pub title: String,
    pub progress: TopicProgress,
    pub levels: Vec<LevelSummaryOut>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LevelsOut {
    pub required_streak: u32,
    pub rating_tiers: Vec<RatingTier>,
    pub mastery_tier: String,
    pub groups: Vec<GroupOut>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TopicOut {
    pub name: String,
    pub title: String,
    pub progress: TopicProgress,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProgressOut {
    pub overall: TopicProgress,
    pub topics: Vec<TopicOut>,
    pub next_level: Option<LevelOut>,
}

//
// HTTP request/response DTOs
//

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StartIn {
    pub level_key: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnswerIn {
    pub session_id: String,
    pub answer: UserAnswer,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HistoryQuery {
    pub level_key: Option<String>,
    pub limit: Option<usize>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct HistoryOut {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub level_key: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub history: Option<DrillHistory>,
    pub summary: ProgressSummary,
    pub recent: Vec<AttemptRecord>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct QuitOut {
    pub session_id: String,
    pub ended: bool,
}

#[derive(Serialize)]
pub struct HealthOut {
    pub ok: bool,
}

#[derive(Debug, Serialize)]
pub struct ErrorOut {
    pub error: String,
}
