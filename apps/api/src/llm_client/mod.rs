/// LLM Client — the single point of entry for all Gemini API calls.
///
/// ARCHITECTURAL RULE: No other module may call the generative-language API
/// directly. All model interactions MUST go through `ModelGateway`.
///
/// The response body is returned verbatim as `serde_json::Value`: the
/// provider's response shape is unstable and nested, so schema enforcement
/// is deferred to the screening interpreter, which navigates it defensively.
use async_trait::async_trait;
use reqwest::Client;
use serde::Serialize;
use serde_json::Value;
use thiserror::Error;
use tracing::debug;

use crate::errors::AppError;

const GEMINI_API_URL: &str =
    "https://generativelanguage.googleapis.com/v1beta/models/gemini-2.0-flash:generateContent";
const REQUEST_TIMEOUT_SECS: u64 = 30;

pub const DEFAULT_TEMPERATURE: f64 = 0.2;
pub const DEFAULT_MAX_OUTPUT_TOKENS: u32 = 512;

#[derive(Debug, Error)]
pub enum GatewayError {
    #[error("GEMINI_API_KEY is not set. Put it in a .env file.")]
    Configuration,

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("API error (status {status}): {message}")]
    Api { status: u16, message: String },
}

impl From<GatewayError> for AppError {
    fn from(e: GatewayError) -> Self {
        match e {
            GatewayError::Configuration => AppError::Configuration(e.to_string()),
            GatewayError::Http(_) | GatewayError::Api { .. } => AppError::Transport(e.to_string()),
        }
    }
}

/// Sampling parameters passed through to the model endpoint, unvalidated.
/// All current callers use the defaults; this is a tuning hook only.
#[derive(Debug, Clone, Copy)]
pub struct SamplingParams {
    pub temperature: f64,
    pub max_output_tokens: u32,
}

impl Default for SamplingParams {
    fn default() -> Self {
        Self {
            temperature: DEFAULT_TEMPERATURE,
            max_output_tokens: DEFAULT_MAX_OUTPUT_TOKENS,
        }
    }
}

#[derive(Debug, Serialize)]
struct GeminiRequest<'a> {
    prompt: GeminiPrompt<'a>,
    temperature: f64,
    #[serde(rename = "maxOutputTokens")]
    max_output_tokens: u32,
}

#[derive(Debug, Serialize)]
struct GeminiPrompt<'a> {
    text: &'a str,
}

/// The gateway trait. The screening interpreter talks to the model only
/// through this seam, so tests can substitute a stub with canned replies.
///
/// Carried in `AppState` as `Arc<dyn ModelGateway>`.
#[async_trait]
pub trait ModelGateway: Send + Sync {
    async fn invoke(&self, prompt: &str, params: SamplingParams) -> Result<Value, GatewayError>;
}

/// Synchronous-per-call Gemini REST wrapper. Stateless; no retries, no rate
/// limiting, no caching — every call is independent.
#[derive(Clone)]
pub struct GeminiClient {
    client: Client,
    api_key: Option<String>,
}

impl GeminiClient {
    pub fn new(api_key: Option<String>) -> Self {
        Self {
            client: Client::builder()
                .timeout(std::time::Duration::from_secs(REQUEST_TIMEOUT_SECS))
                .build()
                .expect("Failed to build HTTP client"),
            api_key,
        }
    }
}

#[async_trait]
impl ModelGateway for GeminiClient {
    /// Makes a single call to the Gemini endpoint and returns the decoded
    /// JSON body verbatim. No schema validation at this layer.
    async fn invoke(&self, prompt: &str, params: SamplingParams) -> Result<Value, GatewayError> {
        // Credential check happens before any request is built or sent.
        let api_key = self.api_key.as_deref().ok_or(GatewayError::Configuration)?;

        let request_body = GeminiRequest {
            prompt: GeminiPrompt { text: prompt },
            temperature: params.temperature,
            max_output_tokens: params.max_output_tokens,
        };

        let response = self
            .client
            .post(GEMINI_API_URL)
            .query(&[("key", api_key)])
            .json(&request_body)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(GatewayError::Api {
                status: status.as_u16(),
                message: body,
            });
        }

        let raw: Value = response.json().await?;

        debug!("model call succeeded ({} prompt bytes)", prompt.len());

        Ok(raw)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_request_body_matches_wire_format() {
        let body = GeminiRequest {
            prompt: GeminiPrompt {
                text: "Ask me anything",
            },
            temperature: 0.2,
            max_output_tokens: 512,
        };
        let json = serde_json::to_value(&body).unwrap();
        assert_eq!(
            json,
            serde_json::json!({
                "prompt": {"text": "Ask me anything"},
                "temperature": 0.2,
                "maxOutputTokens": 512
            })
        );
    }

    #[test]
    fn test_default_sampling_params() {
        let params = SamplingParams::default();
        assert!((params.temperature - 0.2).abs() < f64::EPSILON);
        assert_eq!(params.max_output_tokens, 512);
    }

    /// A client with no key must fail before any network I/O is attempted.
    /// (The endpoint URL is unreachable from tests; reaching it would hang
    /// or surface an Http error, not Configuration.)
    #[tokio::test]
    async fn test_missing_key_is_configuration_error() {
        let client = GeminiClient::new(None);
        let err = client
            .invoke("hello", SamplingParams::default())
            .await
            .unwrap_err();
        assert!(matches!(err, GatewayError::Configuration));
        assert!(err.to_string().contains("GEMINI_API_KEY"));
    }
}
