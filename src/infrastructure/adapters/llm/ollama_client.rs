//! Ollama Client - 调用本地 Ollama 服务
//!
//! POST {base_url}/api/chat（stream: false）

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::time::Duration;

use super::{build_client, map_send_error, read_json, LlmClientConfig};
use crate::application::ports::{CompletionRequest, CompletionResponse, LlmError, LlmProviderPort};

const PROVIDER: &str = "ollama";

#[derive(Debug, Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: Vec<ChatMessage<'a>>,
    stream: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    format: Option<&'static str>,
    options: ChatOptions,
}

#[derive(Debug, Serialize)]
struct ChatMessage<'a> {
    role: &'static str,
    content: &'a str,
}

#[derive(Debug, Serialize)]
struct ChatOptions {
    temperature: f32,
    num_predict: u32,
}

#[derive(Debug, Deserialize)]
struct ChatResponse {
    #[serde(default)]
    model: Option<String>,
    message: Option<ChatResponseMessage>,
}

#[derive(Debug, Deserialize)]
struct ChatResponseMessage {
    #[serde(default)]
    content: String,
}

/// Ollama 客户端（无需 API Key）
pub struct OllamaClient {
    client: Client,
    config: LlmClientConfig,
}

impl OllamaClient {
    pub fn new(config: LlmClientConfig) -> Result<Self, LlmError> {
        let client = build_client(&config)?;
        Ok(Self { client, config })
    }

    fn chat_url(&self) -> String {
        format!("{}/api/chat", self.config.base_url)
    }

    fn tags_url(&self) -> String {
        format!("{}/api/tags", self.config.base_url)
    }
}

#[async_trait]
impl LlmProviderPort for OllamaClient {
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
            stream: false,
            format: request.json.then_some("json"),
            options: ChatOptions {
                temperature: request.temperature,
                num_predict: request.max_tokens,
            },
        };

        tracing::debug!(
            url = %self.chat_url(),
            model = %self.config.model,
            prompt_len = request.prompt.len(),
            "Sending Ollama chat request"
        );

        let response = self
            .client
            .post(self.chat_url())
            .json(&body)
            .send()
            .await
            .map_err(|e| map_send_error(PROVIDER, e))?;

        let parsed: ChatResponse = read_json(response).await?;
        let text = parsed
            .message
            .map(|m| m.content)
            .filter(|content| !content.is_empty())
            .ok_or_else(|| LlmError::InvalidResponse("empty message in response".to_string()))?;

        Ok(CompletionResponse {
            text,
            model: parsed.model.unwrap_or_else(|| self.config.model.clone()),
        })
    }

    async fn health_check(&self) -> bool {
        match self
            .client
            .get(self.tags_url())
            .timeout(Duration::from_secs(5))
            .send()
            .await
        {
            Ok(response) => response.status().is_success(),
            Err(_) => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use httpmock::prelude::*;
    use serde_json::json;

    fn client(server: &MockServer) -> OllamaClient {
        OllamaClient::new(LlmClientConfig::new(server.base_url(), "llama3.1")).unwrap()
    }

    #[tokio::test]
    async fn test_complete_non_streaming() {
        let server = MockServer::start_async().await;
        let mock = server
            .mock_async(|when, then| {
                when.method(POST)
                    .path("/api/chat")
                    .json_body_partial(r#"{"stream": false, "format": "json", "model": "llama3.1"}"#);
                then.status(200).json_body(json!({
                    "model": "llama3.1",
                    "message": {"role": "assistant", "content": "{\"chapters\": []}"},
                    "done": true
                }));
            })
            .await;

        let response = client(&server)
            .complete(CompletionRequest::new("章立てを").json())
            .await
            .unwrap();

        mock.assert_async().await;
        assert_eq!(response.text, "{\"chapters\": []}");
    }

    #[tokio::test]
    async fn test_health_check() {
        let server = MockServer::start_async().await;
        server
            .mock_async(|when, then| {
                when.method(GET).path("/api/tags");
                then.status(200).json_body(json!({"models": []}));
            })
            .await;

        assert!(client(&server).health_check().await);
    }

    #[tokio::test]
    async fn test_unreachable_server_is_network_error() {
        let client =
            OllamaClient::new(LlmClientConfig::new("http://127.0.0.1:9", "llama3.1").with_timeout(2))
                .unwrap();
        let result = client.complete(CompletionRequest::new("hi")).await;
        assert!(matches!(
            result,
            Err(LlmError::NetworkError(_)) | Err(LlmError::Timeout)
        ));
    }
}
