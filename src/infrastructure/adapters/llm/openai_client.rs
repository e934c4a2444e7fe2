//! OpenAI Client - 调用 OpenAI 兼容的 Chat Completions 接口
//!
//! POST {base_url}/v1/chat/completions
//! Authorization: Bearer {api_key}

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::time::Duration;

use super::{build_client, map_send_error, read_json, LlmClientConfig};
use crate::application::ports::{CompletionRequest, CompletionResponse, LlmError, LlmProviderPort};

const PROVIDER: &str = "openai";

#[derive(Debug, Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: Vec<ChatMessage<'a>>,
    temperature: f32,
    max_tokens: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    response_format: Option<ResponseFormat>,
}

#[derive(Debug, Serialize)]
struct ChatMessage<'a> {
    role: &'static str,
    content: &'a str,
}

#[derive(Debug, Serialize)]
struct ResponseFormat {
    #[serde(rename = "type")]
    kind: &'static str,
}

#[derive(Debug, Deserialize)]
struct ChatResponse {
    #[serde(default)]
    model: Option<String>,
    choices: Vec<ChatChoice>,
}

#[derive(Debug, Deserialize)]
struct ChatChoice {
    message: ChatChoiceMessage,
}

#[derive(Debug, Deserialize)]
struct ChatChoiceMessage {
    #[serde(default)]
    content: Option<String>,
}

/// OpenAI 客户端
pub struct OpenAiClient {
    client: Client,
    config: LlmClientConfig,
    api_key: String,
}

impl OpenAiClient {
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

    fn completions_url(&self) -> String {
        format!("{}/v1/chat/completions", self.config.base_url)
    }

    fn models_url(&self) -> String {
        format!("{}/v1/models", self.config.base_url)
    }
}

#[async_trait]
impl LlmProviderPort for OpenAiClient {
    fn name(&self) -> &'static str {
        PROVIDER
    }

    async fn complete(&self, request: CompletionRequest) -> Result<CompletionResponse, LlmError> {
        let mut messages = Vec::with_capacity(2);
        if let Some(system) = request.system.as_deref() {
            messages.push(ChatMessage {
                role: "system",
                content: system,
            });
        }
        messages.push(ChatMessage {
            role: "user",
            content: &request.prompt,
        });

        let body = ChatRequest {
            model: &self.config.model,
            messages,
            temperature: request.temperature,
            max_tokens: request.max_tokens,
            response_format: request.json.then_some(ResponseFormat {
                kind: "json_object",
            }),
        };

        tracing::debug!(
            url = %self.completions_url(),
            model = %self.config.model,
            prompt_len = request.prompt.len(),
            "Sending OpenAI chat request"
        );

        let response = self
            .client
            .post(self.completions_url())
            .bearer_auth(&self.api_key)
            .json(&body)
            .send()
            .await
            .map_err(|e| map_send_error(PROVIDER, e))?;

        let parsed: ChatResponse = read_json(response).await?;
        let text = parsed
            .choices
            .into_iter()
            .next()
            .and_then(|choice| choice.message.content)
            .ok_or_else(|| LlmError::InvalidResponse("no choices in response".to_string()))?;

        Ok(CompletionResponse {
            text,
            model: parsed.model.unwrap_or_else(|| self.config.model.clone()),
        })
    }

    async fn health_check(&self) -> bool {
        match self
            .client
            .get(self.models_url())
            .bearer_auth(&self.api_key)
            .timeout(Duration::from_secs(5))
            .send()
            .await
        {
            Ok(response) => response.status().is_success(),
            Err(_) => false,
        }
    }
}
