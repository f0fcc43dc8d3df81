//! Generation cycle — one prompt, one model call, one parse ladder.

use tracing::info;

use crate::errors::AppError;
use crate::llm_client::{ModelGateway, SamplingParams};
use crate::models::screening::Question;
use crate::screening::prompts::PromptStore;
use crate::screening::reply::{candidate_text, parse_questions_reply};

/// Generates tailored interview questions from a job description and résumé.
///
/// Returns however many records the model produced; capping to
/// [`crate::screening::MAX_QUESTIONS`] is the caller's job, exactly as in
/// the workflow this service powers.
pub async fn generate_questions(
    gateway: &dyn ModelGateway,
    prompts: &PromptStore,
    job_desc: &str,
    resume_text: &str,
) -> Result<Vec<Question>, AppError> {
    let prompt = prompts.questions_prompt(job_desc, resume_text)?;
    let raw = gateway.invoke(&prompt, SamplingParams::default()).await?;
    let text = candidate_text(&raw);
    let questions = parse_questions_reply(&text);
    info!("generation cycle produced {} question(s)", questions.len());
    Ok(questions)
}
