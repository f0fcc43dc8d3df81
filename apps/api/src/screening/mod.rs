// Candidate screening core: prompt assembly, model calls, and the parse
// fallback ladders that turn free-form model replies into structured
// records. All model interactions go through llm_client::ModelGateway —
// nothing in this module touches the network directly.

pub mod handlers;
pub mod prompts;
pub mod questions;
pub mod reply;
pub mod scoring;

/// Only this many questions ever reach the answering stage.
pub const MAX_QUESTIONS: usize = 3;
