//! Scoring cycle — one model call per answered question, with per-answer
//! failure isolation: one bad call never aborts the rest of the batch.

use std::collections::HashMap;

use tracing::warn;

use crate::errors::AppError;
use crate::llm_client::{ModelGateway, SamplingParams};
use crate::models::screening::{AnswerInput, ScoreResult};
use crate::screening::prompts::PromptStore;
use crate::screening::reply::{candidate_text, parse_score_reply};

/// Scores a single candidate answer against the job description and résumé.
/// Returns `(score, rationale)`; parse fallbacks are handled inside
/// [`parse_score_reply`], so the only error paths left are prompt assembly
/// and the gateway call itself.
pub async fn score_answer(
    gateway: &dyn ModelGateway,
    prompts: &PromptStore,
    job_desc: &str,
    resume_text: &str,
    question: &str,
    answer: &str,
) -> Result<(i64, String), AppError> {
    let prompt = prompts.score_prompt(job_desc, resume_text, question, answer)?;
    let raw = gateway.invoke(&prompt, SamplingParams::default()).await?;
    let text = candidate_text(&raw);
    Ok(parse_score_reply(&text))
}

/// Scores every answer in the map, sequentially, in map iteration order.
/// Order is deliberately unspecified; each `ScoreResult` is self-describing.
///
/// A failure scoring one answer is recorded as
/// `(score: 0, rationale: "Error scoring: <message>")` and the loop moves on.
pub async fn score_all(
    gateway: &dyn ModelGateway,
    prompts: &PromptStore,
    job_desc: &str,
    resume_text: &str,
    answers: &HashMap<String, AnswerInput>,
) -> Vec<ScoreResult> {
    let mut results = Vec::with_capacity(answers.len());
    for (qid, qa) in answers {
        let (score, rationale) = match score_answer(
            gateway,
            prompts,
            job_desc,
            resume_text,
            &qa.question,
            &qa.answer,
        )
        .await
        {
            Ok(pair) => pair,
            Err(e) => {
                warn!("scoring failed for {qid}: {e}");
                (0, format!("Error scoring: {e}"))
            }
        };
        results.push(ScoreResult {
            id: qid.clone(),
            question: qa.question.clone(),
            answer: qa.answer.clone(),
            score,
            rationale,
        });
    }
    results
}
