//! LLM Client: the single point of entry for all Gemini API calls in SkillGap.
//!
//! No other module may call the Gemini API directly.
//! Model: gemini-3-flash-preview. Only the base URL is configurable.
use reqwest::Client;
use serde::{de::DeserializeOwned, Deserialize, Serialize};
use serde_json::Value;
use thiserror::Error;
use tracing::{debug, warn};

pub mod prompts;

pub const DEFAULT_BASE_URL: &str = "https://generativelanguage.googleapis.com";
/// The model used for all LLM calls in SkillGap.
pub const MODEL: &str = "gemini-3-flash-preview";
const REQUEST_TIMEOUT_SECS: u64 = 120;

#[derive(Debug, Error)]
pub enum LlmError {
    #[error("API key is missing. Set API_KEY (or VITE_API_KEY) in the environment or .env file")]
    MissingApiKey,

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Model {model} not found: {message}")]
    ModelNotFound { model: String, message: String },

    #[error("API error (status {status}): {message}")]
    Api { status: u16, message: String },

    #[error("JSON parse error: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("LLM returned empty content")]
    EmptyContent,
}

// ────────────────────────────────────────────────────────────────────────────
// Request types
// ────────────────────────────────────────────────────────────────────────────

/// One piece of a multimodal message: either text or an inline binary blob.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum Part<'a> {
    Text {
        text: &'a str,
    },
    #[serde(rename_all = "camelCase")]
    InlineData { inline_data: InlineData<'a> },
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct InlineData<'a> {
    pub mime_type: &'a str,
    /// Base64-encoded bytes.
    pub data: &'a str,
}

/// Output constraints for a structured call.
#[derive(Debug, Clone)]
pub struct JsonCallOptions<'a> {
    pub response_schema: &'a Value,
    pub max_output_tokens: u32,
    pub thinking_budget: u32,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerateContentRequest<'a> {
    system_instruction: SystemInstruction<'a>,
    contents: Vec<Content<'a>>,
    generation_config: GenerationConfig<'a>,
}

#[derive(Debug, Serialize)]
struct SystemInstruction<'a> {
    parts: Vec<Part<'a>>,
}

#[derive(Debug, Serialize)]
struct Content<'a> {
    role: &'a str,
    parts: &'a [Part<'a>],
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerationConfig<'a> {
    response_mime_type: &'a str,
    response_schema: &'a Value,
    max_output_tokens: u32,
    thinking_config: ThinkingConfig,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct ThinkingConfig {
    thinking_budget: u32,
}

// ────────────────────────────────────────────────────────────────────────────
// Response types
// ────────────────────────────────────────────────────────────────────────────

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
    /// Set on reasoning summaries when thinking is enabled; never part of the answer.
    #[serde(default)]
    pub thought: bool,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UsageMetadata {
    #[serde(default)]
    pub prompt_token_count: u32,
    #[serde(default)]
    pub candidates_token_count: u32,
    #[serde(default)]
    pub thoughts_token_count: u32,
}

impl LlmResponse {
    /// Concatenates the answer text of the first candidate, skipping thought parts.
    /// Returns `None` when there is no non-blank text.
    pub fn text(&self) -> Option<String> {
        let parts = &self.candidates.first()?.content.as_ref()?.parts;
        let text: String = parts
            .iter()
            .filter(|p| !p.thought)
            .filter_map(|p| p.text.as_deref())
            .collect();
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

// ────────────────────────────────────────────────────────────────────────────
// Client
// ────────────────────────────────────────────────────────────────────────────

/// The single LLM client used by all services in SkillGap.
/// Wraps the Gemini `generateContent` API with structured output helpers.
///
/// A failed call is returned to the caller as-is; there is no retry.
#[derive(Clone)]
pub struct LlmClient {
    client: Client,
    api_key: String,
    base_url: String,
}

impl LlmClient {
    /// Builds a client. An empty key is accepted here and rejected on the first call.
    pub fn new(api_key: String, base_url: impl Into<String>) -> Result<Self, LlmError> {
        let client = Client::builder()
            .timeout(std::time::Duration::from_secs(REQUEST_TIMEOUT_SECS))
            .build()?;
        Ok(Self {
            client,
            api_key,
            base_url: base_url.into().trim_end_matches('/').to_string(),
        })
    }

    pub fn has_api_key(&self) -> bool {
        !self.api_key.trim().is_empty()
    }

    fn endpoint(&self) -> String {
        format!("{}/v1beta/models/{}:generateContent", self.base_url, MODEL)
    }

    /// Makes a raw call to the Gemini API, returning the full response object.
    pub async fn call(
        &self,
        parts: &[Part<'_>],
        system: &str,
        options: &JsonCallOptions<'_>,
    ) -> Result<LlmResponse, LlmError> {
        if !self.has_api_key() {
            return Err(LlmError::MissingApiKey);
        }

        let request_body = GenerateContentRequest {
            system_instruction: SystemInstruction {
                parts: vec![Part::Text { text: system }],
            },
            contents: vec![Content { role: "user", parts }],
            generation_config: GenerationConfig {
                response_mime_type: "application/json",
                response_schema: options.response_schema,
                max_output_tokens: options.max_output_tokens,
                thinking_config: ThinkingConfig {
                    thinking_budget: options.thinking_budget,
                },
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
            warn!("LLM API returned {}: {}", status, message);

            if status.as_u16() == 404 || message.to_lowercase().contains("not found") {
                return Err(LlmError::ModelNotFound {
                    model: MODEL.to_string(),
                    message,
                });
            }
            return Err(LlmError::Api {
                status: status.as_u16(),
                message,
            });
        }

        let llm_response: LlmResponse = response.json().await?;

        if let Some(usage) = &llm_response.usage_metadata {
            debug!(
                "LLM call succeeded: prompt_tokens={}, output_tokens={}, thought_tokens={}",
                usage.prompt_token_count, usage.candidates_token_count, usage.thoughts_token_count
            );
        }

        Ok(llm_response)
    }

    /// Calls the LLM with a response schema and deserializes the text response as JSON.
    ///
    /// The text must be exactly one JSON document; there is no fence stripping or
    /// partial-output recovery.
    pub async fn call_json<T: DeserializeOwned>(
        &self,
        parts: &[Part<'_>],
        system: &str,
        options: &JsonCallOptions<'_>,
    ) -> Result<T, LlmError> {
        let response = self.call(parts, system, options).await?;

        let text = response.text().ok_or(LlmError::EmptyContent)?;

        serde_json::from_str(&text).map_err(LlmError::Parse)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    const PATH: &str = "/v1beta/models/gemini-3-flash-preview:generateContent";

    fn options(schema: &Value) -> JsonCallOptions<'_> {
        JsonCallOptions {
            response_schema: schema,
            max_output_tokens: 1024,
            thinking_budget: 0,
        }
    }

    fn candidate_body(text: &str) -> String {
        json!({
            "candidates": [{"content": {"role": "model", "parts": [{"text": text}]}}],
            "usageMetadata": {"promptTokenCount": 10, "candidatesTokenCount": 5}
        })
        .to_string()
    }

    #[test]
    fn test_text_part_serializes_as_plain_text() {
        let part = Part::Text { text: "hello" };
        assert_eq!(serde_json::to_value(&part).unwrap(), json!({"text": "hello"}));
    }

    #[test]
    fn test_inline_part_serializes_camel_case() {
        let part = Part::InlineData {
            inline_data: InlineData {
                mime_type: "application/pdf",
                data: "JVBERi0=",
            },
        };
        assert_eq!(
            serde_json::to_value(&part).unwrap(),
            json!({"inlineData": {"mimeType": "application/pdf", "data": "JVBERi0="}})
        );
    }

    #[test]
    fn test_response_text_skips_thought_parts() {
        let response: LlmResponse = serde_json::from_value(json!({
            "candidates": [{"content": {"parts": [
                {"text": "let me think", "thought": true},
                {"text": "{\"a\":"},
                {"text": "1}"}
            ]}}]
        }))
        .unwrap();
        assert_eq!(response.text().as_deref(), Some("{\"a\":1}"));
    }

    #[test]
    fn test_response_text_none_without_candidates() {
        let response: LlmResponse = serde_json::from_value(json!({"candidates": []})).unwrap();
        assert!(response.text().is_none());

        let blank: LlmResponse = serde_json::from_value(json!({
            "candidates": [{"content": {"parts": [{"text": "  "}]}}]
        }))
        .unwrap();
        assert!(blank.text().is_none());
    }

    #[tokio::test]
    async fn test_missing_api_key_fails_before_network() {
        let client = LlmClient::new("  ".to_string(), "http://127.0.0.1:9").unwrap();
        let schema = json!({"type": "OBJECT"});
        let err = client
            .call(&[Part::Text { text: "hi" }], "sys", &options(&schema))
            .await
            .unwrap_err();
        assert!(matches!(err, LlmError::MissingApiKey));
    }

    #[tokio::test]
    async fn test_call_json_parses_schema_output() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("POST", PATH)
            .match_header("x-goog-api-key", "test-key")
            .match_body(mockito::Matcher::PartialJson(json!({
                "generationConfig": {"responseMimeType": "application/json"}
            })))
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(candidate_body(r#"{"value": 42}"#))
            .create_async()
            .await;

        let client = LlmClient::new("test-key".to_string(), server.url()).unwrap();
        let schema = json!({"type": "OBJECT"});
        let value: Value = client
            .call_json(&[Part::Text { text: "hi" }], "sys", &options(&schema))
            .await
            .unwrap();

        assert_eq!(value["value"], 42);
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn test_404_maps_to_model_not_found() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("POST", PATH)
            .with_status(404)
            .with_body(
                json!({"error": {"code": 404, "message": "models/x is not found", "status": "NOT_FOUND"}})
                    .to_string(),
            )
            .create_async()
            .await;

        let client = LlmClient::new("k".to_string(), server.url()).unwrap();
        let schema = json!({});
        let err = client
            .call(&[Part::Text { text: "hi" }], "sys", &options(&schema))
            .await
            .unwrap_err();
        assert!(matches!(err, LlmError::ModelNotFound { .. }));
    }

    #[tokio::test]
    async fn test_server_error_is_not_retried() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("POST", PATH)
            .with_status(503)
            .with_body(json!({"error": {"message": "overloaded"}}).to_string())
            .expect(1)
            .create_async()
            .await;

        let client = LlmClient::new("k".to_string(), server.url()).unwrap();
        let schema = json!({});
        let err = client
            .call(&[Part::Text { text: "hi" }], "sys", &options(&schema))
            .await
            .unwrap_err();

        match err {
            LlmError::Api { status, message } => {
                assert_eq!(status, 503);
                assert_eq!(message, "overloaded");
            }
            other => panic!("unexpected error: {other:?}"),
        }
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn test_fenced_output_is_rejected() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("POST", PATH)
            .with_status(200)
            .with_body(candidate_body("```json\n{\"value\": 1}\n```"))
            .create_async()
            .await;

        let client = LlmClient::new("k".to_string(), server.url()).unwrap();
        let schema = json!({});
        let result: Result<Value, _> = client
            .call_json(&[Part::Text { text: "hi" }], "sys", &options(&schema))
            .await;
        assert!(matches!(result, Err(LlmError::Parse(_))));
    }

    #[tokio::test]
    async fn test_empty_candidates_is_empty_content() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("POST", PATH)
            .with_status(200)
            .with_body(json!({"candidates": []}).to_string())
            .create_async()
            .await;

        let client = LlmClient::new("k".to_string(), server.url()).unwrap();
        let schema = json!({});
        let result: Result<Value, _> = client
            .call_json(&[Part::Text { text: "hi" }], "sys", &options(&schema))
            .await;
        assert!(matches!(result, Err(LlmError::EmptyContent)));
    }
}
