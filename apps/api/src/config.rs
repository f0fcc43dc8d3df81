use anyhow::{Context, Result};
use std::path::PathBuf;

/// Application configuration loaded from environment variables.
///
/// The Gemini API key is deliberately optional here: a missing key is a
/// configuration failure at the first model call, not at startup, so the
/// service still boots (and serves /health and /api/v1/extract) without one.
#[derive(Debug, Clone)]
pub struct Config {
    pub gemini_api_key: Option<String>,
    pub prompts_dir: PathBuf,
    pub data_dir: PathBuf,
    pub port: u16,
    pub rust_log: String,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok(); // load .env if present; ignore if missing

        Ok(Config {
            gemini_api_key: std::env::var("GEMINI_API_KEY")
                .ok()
                .filter(|k| !k.is_empty()),
            prompts_dir: std::env::var("PROMPTS_DIR")
                .unwrap_or_else(|_| "prompts".to_string())
                .into(),
            data_dir: std::env::var("DATA_DIR")
                .unwrap_or_else(|_| "data".to_string())
                .into(),
            port: std::env::var("PORT")
                .unwrap_or_else(|_| "8080".to_string())
                .parse::<u16>()
                .context("PORT must be a valid port number")?,
            rust_log: std::env::var("RUST_LOG").unwrap_or_else(|_| "info".to_string()),
        })
    }
}
