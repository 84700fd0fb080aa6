use crate::config::Settings;
use crate::llm::error::LlmDiagnosticsError;
use crate::llm::{Provider, ResponseFormat, TextGenerator};
use anyhow::Context;
use reqwest::header::{HeaderMap, HeaderValue};
use serde::{Deserialize, Serialize};
use std::time::Duration;

const API_KEY_HEADER: &str = "x-goog-api-key";
const JSON_MIME_TYPE: &str = "application/json";

#[derive(Debug, Clone)]
pub struct GeminiClient {
    http: reqwest::Client,
    api_key: String,
    base_url: String,
    model: String,
}

impl GeminiClient {
    /// Fails when `GEMINI_API_KEY` is not configured.
    pub fn from_settings(settings: &Settings) -> anyhow::Result<Self> {
        let api_key = settings.require_gemini_api_key()?.to_string();

        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(settings.gemini_timeout_secs))
            .build()
            .context("failed to build reqwest client")?;

        Ok(Self {
            http,
            api_key,
            base_url: settings.gemini_base_url.clone(),
            model: settings.gemini_model.clone(),
        })
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    fn endpoint(&self) -> String {
        format!(
            "{}/v1beta/models/{}:generateContent",
            self.base_url.trim_end_matches('/'),
            self.model
        )
    }

    async fn generate_content(
        &self,
        req: GenerateContentRequest,
    ) -> anyhow::Result<(serde_json::Value, GenerateContentResponse)> {
        let mut headers = HeaderMap::new();
        headers.insert(API_KEY_HEADER, HeaderValue::from_str(&self.api_key)?);

        let res = self
            .http
            .post(self.endpoint())
            .headers(headers)
            .json(&req)
            .send()
            .await
            .map_err(|e| {
                LlmDiagnosticsError::new(
                    Provider::Gemini,
                    "transport",
                    format!("request failed: {e}"),
                )
            })?;

        let status = res.status();
        let text = res.text().await.map_err(|e| {
            LlmDiagnosticsError::new(
                Provider::Gemini,
                "transport",
                format!("failed to read response body: {e}"),
            )
        })?;
        if !status.is_success() {
            return Err(
                LlmDiagnosticsError::new(Provider::Gemini, "http", format!("status={status}"))
                    .with_raw_output(text)
                    .into(),
            );
        }

        let raw_json = serde_json::from_str::<serde_json::Value>(&text).map_err(|e| {
            LlmDiagnosticsError::new(Provider::Gemini, "decode", format!("invalid JSON: {e}"))
                .with_raw_output(text.clone())
        })?;
        let parsed = serde_json::from_value::<GenerateContentResponse>(raw_json.clone())
            .map_err(|e| {
                LlmDiagnosticsError::new(
                    Provider::Gemini,
                    "decode",
                    format!("unexpected response shape: {e}"),
                )
                .with_raw_output(text.clone())
            })?;
        Ok((raw_json, parsed))
    }

    fn request(prompt: &str, format: ResponseFormat) -> GenerateContentRequest {
        GenerateContentRequest {
            contents: vec![Content {
                role: "user",
                parts: vec![RequestPart {
                    text: prompt.to_string(),
                }],
            }],
            generation_config: match format {
                ResponseFormat::Json => Some(GenerationConfig {
                    response_mime_type: JSON_MIME_TYPE,
                }),
                ResponseFormat::Text => None,
            },
        }
    }

    fn response_text(
        res: &GenerateContentResponse,
        raw_json: &serde_json::Value,
    ) -> Result<String, LlmDiagnosticsError> {
        let diagnostics = |stage: &'static str, detail: String| LlmDiagnosticsError {
            raw_response_json: Some(raw_json.clone()),
            ..LlmDiagnosticsError::new(Provider::Gemini, stage, detail)
        };

        if let Some(reason) = res
            .prompt_feedback
            .as_ref()
            .and_then(|f| f.block_reason.as_deref())
        {
            return Err(diagnostics("blocked", format!("prompt blocked: {reason}")));
        }

        let Some(candidate) = res.candidates.first() else {
            return Err(diagnostics("empty_response", "no candidates".to_string()));
        };

        match candidate.finish_reason.as_deref() {
            Some(reason @ ("SAFETY" | "PROHIBITED_CONTENT" | "BLOCKLIST" | "SPII")) => {
                return Err(diagnostics(
                    "blocked",
                    format!("candidate blocked: finish_reason={reason}"),
                ));
            }
            Some("MAX_TOKENS") => {
                tracing::warn!("Gemini finish_reason=MAX_TOKENS; response may be truncated");
            }
            _ => {}
        }

        let text: String = candidate
            .content
            .as_ref()
            .map(|c| {
                c.parts
                    .iter()
                    .filter(|p| !p.thought)
                    .filter_map(|p| p.text.as_deref())
                    .collect::<String>()
            })
            .unwrap_or_default();

        if text.trim().is_empty() {
            return Err(diagnostics(
                "empty_response",
                "candidate has no text".to_string(),
            ));
        }
        Ok(text)
    }
}

#[async_trait::async_trait]
impl TextGenerator for GeminiClient {
    fn provider(&self) -> Provider {
        Provider::Gemini
    }

    async fn generate(&self, prompt: &str, format: ResponseFormat) -> anyhow::Result<String> {
        tracing::debug!(
            model = %self.model,
            prompt_len = prompt.len(),
            ?format,
            "sending request to Gemini"
        );

        let (raw_json, res) = self.generate_content(Self::request(prompt, format)).await?;
        let text = Self::response_text(&res, &raw_json)?;

        tracing::debug!(
            model = %self.model,
            response_len = text.len(),
            prompt_tokens = res.usage_metadata.as_ref().and_then(|u| u.prompt_token_count),
            candidate_tokens = res.usage_metadata.as_ref().and_then(|u| u.candidates_token_count),
            "Gemini response received"
        );
        Ok(text)
    }
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerateContentRequest {
    contents: Vec<Content>,
    #[serde(skip_serializing_if = "Option::is_none")]
    generation_config: Option<GenerationConfig>,
}

#[derive(Debug, Clone, Serialize)]
struct Content {
    role: &'static str,
    parts: Vec<RequestPart>,
}

#[derive(Debug, Clone, Serialize)]
struct RequestPart {
    text: String,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerationConfig {
    response_mime_type: &'static str,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
struct GenerateContentResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
    #[serde(default)]
    prompt_feedback: Option<PromptFeedback>,
    #[serde(default)]
    usage_metadata: Option<UsageMetadata>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
struct Candidate {
    #[serde(default)]
    content: Option<CandidateContent>,
    #[serde(default)]
    finish_reason: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
struct CandidateContent {
    #[serde(default)]
    parts: Vec<ResponsePart>,
}

#[derive(Debug, Clone, Deserialize)]
struct ResponsePart {
    #[serde(default)]
    text: Option<String>,
    #[serde(default)]
    thought: bool,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
struct PromptFeedback {
    #[serde(default)]
    block_reason: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
struct UsageMetadata {
    #[serde(default)]
    prompt_token_count: Option<u32>,
    #[serde(default)]
    candidates_token_count: Option<u32>,
}
