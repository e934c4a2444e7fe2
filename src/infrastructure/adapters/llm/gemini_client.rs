//! Gemini Client - 调用 Google Generative Language 接口
//!
//! POST {base_url}/v1beta/models/{model}:generateContent?key={api_key}

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::time::Duration;

use super::{build_client, map_send_error, read_json, LlmClientConfig};
use crate::application::ports::{CompletionRequest, CompletionResponse, LlmError, LlmProviderPort};

const PROVIDER: &str = "gemini";

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerateRequest<'a> {
    contents: Vec<Content<'a>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    system_instruction: Option<Content<'a>>,
    generation_config: GenerationConfig,
}

#[derive(Debug, Serialize)]
struct Content<'a> {
    #[serde(skip_serializing_if = "Option::is_none")]
    role: Option<&'static str>,
    parts: Vec<Part<'a>>,
}

#[derive(Debug, Serialize)]
struct Part<'a> {
    text: &'a str,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerationConfig {
    temperature: f32,
    max_output_tokens: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    response_mime_type: Option<&'static str>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct GenerateResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
    #[serde(default)]
    model_version: Option<String>,
}

#[derive(Debug, Deserialize)]
struct Candidate {
    #[serde(default)]
    content: Option<CandidateContent>,
}

#[derive(Debug, Deserialize)]
struct CandidateContent {
    #[serde(default)]
    parts: Vec<CandidatePart>,
}

#[derive(Debug, Deserialize)]
struct CandidatePart {
    #[serde(default)]
    text: Option<String>,
}

/// Gemini 客户端
pub struct GeminiClient {
    client: Client,
    config: LlmClientConfig,
    api_key: String,
}

impl GeminiClient {
    /// 缺少 API Key 时返回 NotConfigured
    pub fn new(config: LlmClientConfig) -> Result<Self, LlmError> {
        let api_key = config.require_api_key(PROVIDER)?;
        let client = build_client(&config)?;
        Ok(Self {
            client,
            config,
            api_key,
        })
    }

    fn generate_url(&self) -> String {
        format!(
            "{}/v1beta/models/{}:generateContent",
            self.config.base_url, self.config.model
        )
    }

    fn model_url(&self) -> String {
        format!("{}/v1beta/models/{}", self.config.base_url, self.config.model)
    }
}

#[async_trait]
impl LlmProviderPort for GeminiClient {
    fn name(&self) -> &'static str {
        PROVIDER
    }

    async fn complete(&self, request: CompletionRequest) -> Result<CompletionResponse, LlmError> {
        let body = GenerateRequest {
            contents: vec![Content {
                role: Some("user"),
                parts: vec![Part {
                    text: &request.prompt,
                }],
            }],
            system_instruction: request.system.as_deref().map(|system| Content {
                role: None,
                parts: vec![Part { text: system }],
            }),
            generation_config: GenerationConfig {
                temperature: request.temperature,
                max_output_tokens: request.max_tokens,
                response_mime_type: request.json.then_some("application/json"),
            },
        };

        tracing::debug!(
            url = %self.generate_url(),
            prompt_len = request.prompt.len(),
            "Sending Gemini generate request"
        );

        let response = self
            .client
            .post(self.generate_url())
            .query(&[("key", self.api_key.as_str())])
            .json(&body)
            .send()
            .await
            .map_err(|e| map_send_error(PROVIDER, e))?;

        let parsed: GenerateResponse = read_json(response).await?;

        // 多个 part 直接拼接
        let text: String = parsed
            .candidates
            .into_iter()
            .next()
            .and_then(|candidate| candidate.content)
            .map(|content| content.parts.into_iter().filter_map(|p| p.text).collect())
            .unwrap_or_default();
        if text.is_empty() {
            return Err(LlmError::InvalidResponse(
                "no candidate text in response".to_string(),
            ));
        }

        Ok(CompletionResponse {
            text,
            model: parsed
                .model_version
                .unwrap_or_else(|| self.config.model.clone()),
        })
    }

    async fn health_check(&self) -> bool {
        match self
            .client
            .get(self.model_url())
            .query(&[("key", self.api_key.as_str())])
            .timeout(Duration::from_secs(5))
            .send()
            .await
        {
            Ok(response) => response.status().is_success(),
            Err(_) => false,
        }
    }
}
