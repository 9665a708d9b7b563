/// LLM Client — the single point of entry for all Gemini API calls in ProRoteiro.
///
/// ARCHITECTURAL RULE: No other module may call the generative-text provider directly.
/// All LLM interactions MUST go through this module.
///
/// Model: gemini-3-flash-preview (hardcoded — do not make configurable to prevent drift)
use reqwest::Client;
use serde::{de::DeserializeOwned, Deserialize, Serialize};
use serde_json::Value;
use thiserror::Error;
use tracing::debug;

pub mod prompts;

pub const GEMINI_API_BASE_URL: &str = "https://generativelanguage.googleapis.com";
/// The model used for all LLM calls in ProRoteiro.
/// This is intentionally hardcoded to prevent accidental drift.
pub const MODEL: &str = "gemini-3-flash-preview";
const REQUEST_TIMEOUT_SECS: u64 = 120;

#[derive(Debug, Error)]
pub enum LlmError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("API error (status {status}): {message}")]
    Api { status: u16, message: String },

    #[error("JSON parse error: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("LLM returned empty content")]
    EmptyContent,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct GeminiRequest<'a> {
    contents: Vec<GeminiContent<'a>>,
    system_instruction: GeminiContent<'a>,
    generation_config: GenerationConfig<'a>,
}

#[derive(Debug, Serialize)]
struct GeminiContent<'a> {
    #[serde(skip_serializing_if = "Option::is_none")]
    role: Option<&'a str>,
    parts: Vec<GeminiTextPart<'a>>,
}

#[derive(Debug, Serialize)]
struct GeminiTextPart<'a> {
    text: &'a str,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerationConfig<'a> {
    response_mime_type: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    response_schema: Option<&'a Value>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LlmResponse {
    #[serde(default)]
    pub candidates: Vec<Candidate>,
    pub usage_metadata: Option<UsageMetadata>,
}

#[derive(Debug, Deserialize)]
pub struct Candidate {
    pub content: Option<CandidateContent>,
}

#[derive(Debug, Deserialize)]
pub struct CandidateContent {
    #[serde(default)]
    pub parts: Vec<ResponsePart>,
}

#[derive(Debug, Deserialize)]
pub struct ResponsePart {
    pub text: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UsageMetadata {
    #[serde(default)]
    pub prompt_token_count: u32,
    #[serde(default)]
    pub candidates_token_count: u32,
}

impl LlmResponse {
    /// Concatenates the text parts of the first candidate.
    /// Returns `None` when the provider produced no text at all.
    pub fn text(&self) -> Option<String> {
        let parts = &self.candidates.first()?.content.as_ref()?.parts;
        let text: String = parts.iter().filter_map(|p| p.text.as_deref()).collect();
        if text.trim().is_empty() {
            None
        } else {
            Some(text)
        }
    }
}

#[derive(Debug, Deserialize)]
struct GeminiError {
    error: GeminiErrorBody,
}

#[derive(Debug, Deserialize)]
struct GeminiErrorBody {
    message: String,
}

/// The single LLM client used by all services in ProRoteiro.
/// Wraps the Gemini `generateContent` API with structured output helpers.
/// A failed call is never retried.
#[derive(Clone)]
pub struct LlmClient {
    client: Client,
    api_key: String,
    base_url: String,
}

impl LlmClient {
    pub fn new(api_key: String) -> Result<Self, LlmError> {
        Self::with_base_url(api_key, GEMINI_API_BASE_URL)
    }

    /// Points the client at another host (a mock server in tests).
    pub fn with_base_url(api_key: String, base_url: &str) -> Result<Self, LlmError> {
        Ok(Self {
            client: Client::builder()
                .timeout(std::time::Duration::from_secs(REQUEST_TIMEOUT_SECS))
                .build()?,
            api_key,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    fn endpoint(&self) -> String {
        format!("{}/v1beta/models/{}:generateContent", self.base_url, MODEL)
    }

    /// Makes a raw call to the Gemini API, returning the full response object.
    /// When `schema` is given the provider is asked to constrain its JSON output to it.
    pub async fn call(
        &self,
        prompt: &str,
        system: &str,
        schema: Option<&Value>,
    ) -> Result<LlmResponse, LlmError> {
        let request_body = GeminiRequest {
            contents: vec![GeminiContent {
                role: Some("user"),
                parts: vec![GeminiTextPart { text: prompt }],
            }],
            system_instruction: GeminiContent {
                role: None,
                parts: vec![GeminiTextPart { text: system }],
            },
            generation_config: GenerationConfig {
                response_mime_type: "application/json",
                response_schema: schema,
            },
        };

        let response = self
            .client
            .post(self.endpoint())
            .header("x-goog-api-key", &self.api_key)
            .header("content-type", "application/json")
            .json(&request_body)
            .send()
            .await?;

        let status = response.status();

        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            // Try to parse error message
            let message = serde_json::from_str::<GeminiError>(&body)
                .map(|e| e.error.message)
                .unwrap_or(body);
            return Err(LlmError::Api {
                status: status.as_u16(),
                message,
            });
        }

        let llm_response: LlmResponse = response.json().await?;

        let usage = llm_response.usage_metadata.as_ref();
        debug!(
            "LLM call succeeded: prompt_tokens={}, output_tokens={}",
            usage.map(|u| u.prompt_token_count).unwrap_or_default(),
            usage.map(|u| u.candidates_token_count).unwrap_or_default()
        );

        Ok(llm_response)
    }

    /// Convenience method that calls the LLM and deserializes the text response as JSON.
    pub async fn call_json<T: DeserializeOwned>(
        &self,
        prompt: &str,
        system: &str,
        schema: Option<&Value>,
    ) -> Result<T, LlmError> {
        let response = self.call(prompt, system, schema).await?;

        let text = response.text().ok_or(LlmError::EmptyContent)?;

        // Strip markdown code fences if the model wraps JSON in them
        let text = strip_json_fences(&text);

        serde_json::from_str(text).map_err(LlmError::Parse)
    }
}

/// Strips ```json ... ``` or ``` ... ``` code fences from LLM output.
fn strip_json_fences(text: &str) -> &str {
    let text = text.trim();
    if let Some(stripped) = text.strip_prefix("```json") {
        stripped
            .trim_start()
            .strip_suffix("```")
            .map(|s| s.trim())
            .unwrap_or(stripped.trim_start())
    } else if let Some(stripped) = text.strip_prefix("```") {
        stripped
            .trim_start()
            .strip_suffix("```")
            .map(|s| s.trim())
            .unwrap_or(stripped.trim_start())
    } else {
        text
    }
}
