//! Prompt template store for the screening module.
//!
//! The two task templates live as plain-text files next to the binary and
//! are read from disk on EVERY call, not cached at startup: an operator can
//! edit a prompt and the next model call picks it up without a restart.
//! The assembled prompt layout (labeled sections, trailing JSON-only
//! instruction) is a wire-compatibility contract with previously persisted
//! sessions — do not reformat it.

use std::path::{Path, PathBuf};

use anyhow::Context;

use crate::errors::AppError;

/// Template for the question-generation cycle.
pub const QUESTIONS_TEMPLATE_FILE: &str = "prompt_generate_questions.txt";
/// Template for the answer-scoring cycle.
pub const SCORE_TEMPLATE_FILE: &str = "prompt_score_answer.txt";

#[derive(Debug, Clone)]
pub struct PromptStore {
    dir: PathBuf,
}

impl PromptStore {
    pub fn new(dir: PathBuf) -> Self {
        Self { dir }
    }

    fn read_template(&self, file: &str) -> Result<String, AppError> {
        let path = self.dir.join(file);
        read_template_file(&path)
    }

    /// Assembles the "generate questions" prompt: template body, labeled
    /// job/résumé sections, and the JSON-only instruction.
    pub fn questions_prompt(&self, job_desc: &str, resume_text: &str) -> Result<String, AppError> {
        let base = self.read_template(QUESTIONS_TEMPLATE_FILE)?;
        Ok(format!(
            "{base}\n\nJOB_DESCRIPTION:\n{job_desc}\n\nRESUME:\n{resume_text}\n\nRespond with JSON only."
        ))
    }

    /// Assembles the "score answer" prompt. The answer may be empty; it is
    /// embedded verbatim either way.
    pub fn score_prompt(
        &self,
        job_desc: &str,
        resume_text: &str,
        question: &str,
        answer: &str,
    ) -> Result<String, AppError> {
        let base = self.read_template(SCORE_TEMPLATE_FILE)?;
        Ok(format!(
            "{base}\n\nJOB_DESCRIPTION:\n{job_desc}\n\nRESUME:\n{resume_text}\n\nQUESTION:\n{question}\n\nANSWER:\n{answer}\n\nRespond with JSON only."
        ))
    }
}

fn read_template_file(path: &Path) -> Result<String, AppError> {
    std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read prompt template {}", path.display()))
        .map_err(|e| AppError::Configuration(format!("{e:#}")))
}
