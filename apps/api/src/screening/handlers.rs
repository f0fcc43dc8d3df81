//! Axum route handlers for the screening API.

use std::collections::HashMap;

use axum::{
    extract::{Multipart, State},
    Json,
};
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::errors::AppError;
use crate::extract;
use crate::models::screening::{AnswerInput, Question, Session};
use crate::screening::questions::generate_questions;
use crate::screening::scoring::score_all;
use crate::screening::MAX_QUESTIONS;
use crate::session::SessionStore;
use crate::state::AppState;

// ────────────────────────────────────────────────────────────────────────────
// Request / Response types
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
pub struct GenerateQuestionsRequest {
    pub job_description: String,
    pub resume_text: String,
}

#[derive(Debug, Serialize)]
pub struct GenerateQuestionsResponse {
    pub questions: Vec<Question>,
}

#[derive(Debug, Deserialize)]
pub struct ScoreAnswersRequest {
    pub job_description: String,
    pub resume_text: String,
    /// Candidate answers keyed by question id. One answer per id; iteration
    /// order is not significant.
    pub answers: HashMap<String, AnswerInput>,
}

#[derive(Debug, Serialize)]
pub struct ScoreAnswersResponse {
    pub session: Session,
    /// Name of the persisted session file under the data directory.
    pub file: String,
}

#[derive(Debug, Serialize)]
pub struct ExtractResponse {
    pub text: String,
}

// ────────────────────────────────────────────────────────────────────────────
// Handlers
// ────────────────────────────────────────────────────────────────────────────

/// POST /api/v1/questions
///
/// One generation cycle: builds the prompt, calls the model, and returns at
/// most [`MAX_QUESTIONS`] questions. Any failure surfaces as a single error
/// response; there are no partial results on this path.
pub async fn handle_generate_questions(
    State(state): State<AppState>,
    Json(request): Json<GenerateQuestionsRequest>,
) -> Result<Json<GenerateQuestionsResponse>, AppError> {
    validate_inputs(&request.job_description, &request.resume_text)?;

    let mut questions = generate_questions(
        state.gateway.as_ref(),
        &state.prompts,
        &request.job_description,
        &request.resume_text,
    )
    .await?;
    // Only the first three reach the answering stage.
    questions.truncate(MAX_QUESTIONS);

    Ok(Json(GenerateQuestionsResponse { questions }))
}

/// POST /api/v1/score
///
/// One scoring cycle: scores every submitted answer (failures isolated
/// per answer), then persists the whole cycle as a write-once session file.
pub async fn handle_score_answers(
    State(state): State<AppState>,
    Json(request): Json<ScoreAnswersRequest>,
) -> Result<Json<ScoreAnswersResponse>, AppError> {
    validate_inputs(&request.job_description, &request.resume_text)?;
    if request.answers.is_empty() {
        return Err(AppError::Validation(
            "answers must contain at least one entry".to_string(),
        ));
    }

    let results = score_all(
        state.gateway.as_ref(),
        &state.prompts,
        &request.job_description,
        &request.resume_text,
        &request.answers,
    )
    .await;

    let session = Session {
        timestamp: SessionStore::timestamp_now(),
        job_description: request.job_description,
        resume_text: request.resume_text,
        results,
    };
    let file = state.store.persist(&session).map_err(AppError::Internal)?;
    info!("scoring cycle persisted to {file}");

    Ok(Json(ScoreAnswersResponse { session, file }))
}

/// POST /api/v1/extract
///
/// Multipart upload (`file` field) → best-effort plain text. Extraction
/// never fails outward; PDF parse errors come back inline in the text.
pub async fn handle_extract(
    mut multipart: Multipart,
) -> Result<Json<ExtractResponse>, AppError> {
    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| AppError::Validation(format!("Invalid multipart body: {e}")))?
    {
        if field.name() != Some("file") {
            continue;
        }
        let filename = field.file_name().unwrap_or("upload").to_string();
        let data = field
            .bytes()
            .await
            .map_err(|e| AppError::Validation(format!("Failed to read upload: {e}")))?;
        let text = extract::document_text(&filename, &data);
        return Ok(Json(ExtractResponse { text }));
    }

    Err(AppError::Validation(
        "multipart field 'file' is required".to_string(),
    ))
}

fn validate_inputs(job_description: &str, resume_text: &str) -> Result<(), AppError> {
    if job_description.trim().is_empty() || resume_text.trim().is_empty() {
        return Err(AppError::Validation(
            "Both job_description and resume_text are required".to_string(),
        ));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    use serde_json::{json, Value};

    use crate::screening::test_support::{stub_gateway, template_store};
    use crate::state::AppState;

    /// Full AppState wired to a stub gateway and temp-dir stores. The two
    /// TempDirs must outlive the state.
    fn state_with_reply(reply: Value) -> (tempfile::TempDir, tempfile::TempDir, AppState) {
        let (prompts_dir, prompts) = template_store();
        let data_dir = tempfile::tempdir().unwrap();
        let store = SessionStore::new(data_dir.path().to_path_buf());
        let state = AppState {
            gateway: Arc::new(stub_gateway(reply)),
            prompts,
            store,
        };
        (prompts_dir, data_dir, state)
    }

    fn questions_request(job_description: &str, resume_text: &str) -> GenerateQuestionsRequest {
        GenerateQuestionsRequest {
            job_description: job_description.to_string(),
            resume_text: resume_text.to_string(),
        }
    }

    /// The interpreter returns however many records the model produced; the
    /// cap lives here. Five records in, exactly the first three out.
    #[tokio::test]
    async fn test_handler_caps_questions_to_three_in_order() {
        let reply = json!({"candidates": [{"content": {"text":
            "[{\"id\":\"q1\",\"question\":\"A\"},\
              {\"id\":\"q2\",\"question\":\"B\"},\
              {\"id\":\"q3\",\"question\":\"C\"},\
              {\"id\":\"q4\",\"question\":\"D\"},\
              {\"id\":\"q5\",\"question\":\"E\"}]"}}]});
        let (_prompts_dir, _data_dir, state) = state_with_reply(reply);

        let Json(response) =
            handle_generate_questions(State(state), Json(questions_request("jd", "cv")))
                .await
                .unwrap();

        let ids: Vec<_> = response.questions.iter().map(|q| q.id.as_str()).collect();
        assert_eq!(ids, vec!["q1", "q2", "q3"]);
        assert_eq!(response.questions[2].question, "C");
    }

    #[tokio::test]
    async fn test_handler_passes_three_or_fewer_through_uncapped() {
        let reply = json!({"candidates": [{"content": {"text":
            "[{\"id\":\"q1\",\"question\":\"A\"},{\"id\":\"q2\",\"question\":\"B\"}]"}}]});
        let (_prompts_dir, _data_dir, state) = state_with_reply(reply);

        let Json(response) =
            handle_generate_questions(State(state), Json(questions_request("jd", "cv")))
                .await
                .unwrap();

        assert_eq!(response.questions.len(), 2);
    }

    #[tokio::test]
    async fn test_questions_rejects_empty_job_description() {
        let (_prompts_dir, _data_dir, state) =
            state_with_reply(json!({"candidates": []}));

        let err = handle_generate_questions(State(state), Json(questions_request("", "cv")))
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::Validation(_)));
    }

    #[tokio::test]
    async fn test_questions_rejects_whitespace_only_resume() {
        let (_prompts_dir, _data_dir, state) =
            state_with_reply(json!({"candidates": []}));

        let err = handle_generate_questions(State(state), Json(questions_request("jd", "  \n ")))
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::Validation(_)));
    }

    #[tokio::test]
    async fn test_score_rejects_empty_answers_map() {
        let (_prompts_dir, _data_dir, state) =
            state_with_reply(json!({"candidates": []}));

        let err = handle_score_answers(
            State(state),
            Json(ScoreAnswersRequest {
                job_description: "jd".to_string(),
                resume_text: "cv".to_string(),
                answers: HashMap::new(),
            }),
        )
        .await
        .unwrap_err();
        assert!(matches!(err, AppError::Validation(_)));
    }

    #[tokio::test]
    async fn test_score_validates_inputs_before_scoring() {
        let (_prompts_dir, _data_dir, state) =
            state_with_reply(json!({"candidates": []}));

        let mut answers = HashMap::new();
        answers.insert(
            "q1".to_string(),
            AnswerInput {
                question: "Why?".to_string(),
                answer: "Because.".to_string(),
            },
        );
        let err = handle_score_answers(
            State(state),
            Json(ScoreAnswersRequest {
                job_description: " ".to_string(),
                resume_text: "cv".to_string(),
                answers,
            }),
        )
        .await
        .unwrap_err();
        assert!(matches!(err, AppError::Validation(_)));
    }

    #[tokio::test]
    async fn test_score_persists_session_and_returns_results() {
        let reply = json!({"candidates": [{"content": {"text":
            "{\"score\": 8, \"rationale\": \"Strong detail on retries\"}"}}]});
        let (_prompts_dir, data_dir, state) = state_with_reply(reply);

        let mut answers = HashMap::new();
        answers.insert(
            "q1".to_string(),
            AnswerInput {
                question: "How do you handle retries?".to_string(),
                answer: "With backoff.".to_string(),
            },
        );
        let Json(response) = handle_score_answers(
            State(state),
            Json(ScoreAnswersRequest {
                job_description: "jd".to_string(),
                resume_text: "cv".to_string(),
                answers,
            }),
        )
        .await
        .unwrap();

        assert_eq!(response.session.results.len(), 1);
        assert_eq!(response.session.results[0].score, 8);
        assert!(data_dir.path().join(&response.file).is_file());
    }

    #[test]
    fn test_validate_inputs_accepts_non_empty_pair() {
        assert!(validate_inputs("jd", "cv").is_ok());
        assert!(validate_inputs("", "cv").is_err());
        assert!(validate_inputs("jd", "\t").is_err());
    }
}
