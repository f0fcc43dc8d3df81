use serde::{Deserialize, Serialize};

/// An interview question produced by one generation cycle.
///
/// `id` is whatever the model assigned; when the model omits it, the
/// interpreter synthesizes a 1-based positional tag ("q1", "q2", ...).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Question {
    pub id: String,
    pub question: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub area: Option<String>,
}

/// A candidate's free-text answer to one question, keyed by question id
/// in the scoring request. Supplied by the caller, never generated here.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnswerInput {
    pub question: String,
    pub answer: String,
}

/// One scored answer. Self-describing: carries its own id, question and
/// answer, so result ordering does not need to match presentation order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScoreResult {
    pub id: String,
    pub question: String,
    pub answer: String,
    pub score: i64,
    pub rationale: String,
}

/// The persisted record of one complete scoring cycle. Write-once: created,
/// serialized to a session file, and never mutated or read back.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Session {
    pub timestamp: String,
    pub job_description: String,
    pub resume_text: String,
    pub results: Vec<ScoreResult>,
}
