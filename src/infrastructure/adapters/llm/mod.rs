//! LLM Adapter - 各模型服务的 HTTP 客户端实现

mod fake_llm_client;
mod gemini_client;
mod ollama_client;
mod openai_client;

pub use fake_llm_client::FakeLlmClient;
pub use gemini_client::GeminiClient;
pub use ollama_client::OllamaClient;
pub use openai_client::OpenAiClient;

use reqwest::{Client, Response};
use serde::de::DeserializeOwned;
use std::sync::Arc;
use std::time::Duration;

use crate::application::ports::{LlmError, LlmRegistry};
use crate::config::{LlmConfig, ProviderConfig};

/// LLM HTTP 客户端配置
#[derive(Debug, Clone)]
pub struct LlmClientConfig {
    /// 服务基础 URL（不带末尾斜杠）
    pub base_url: String,
    pub model: String,
    pub api_key: Option<String>,
    /// 请求超时时间（秒）
    pub timeout_secs: u64,
}

impl LlmClientConfig {
    pub fn new(base_url: impl Into<String>, model: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into().trim_end_matches('/').to_string(),
            model: model.into(),
            api_key: None,
            timeout_secs: 120,
        }
    }

    pub fn with_api_key(mut self, api_key: impl Into<String>) -> Self {
        self.api_key = Some(api_key.into());
        self
    }

    pub fn with_timeout(mut self, secs: u64) -> Self {
        self.timeout_secs = secs;
        self
    }

    fn require_api_key(&self, provider: &str) -> Result<String, LlmError> {
        self.api_key
            .clone()
            .filter(|key| !key.trim().is_empty())
            .ok_or_else(|| LlmError::NotConfigured(format!("{}: missing api key", provider)))
    }
}

/// 按配置注册提供方
///
/// OpenAI / Gemini 缺少 API Key 时不注册；Ollama 本地服务无需 Key，总是注册
pub fn build_registry(config: &LlmConfig) -> Result<LlmRegistry, LlmError> {
    let client_config = |provider: &ProviderConfig| {
        let client = LlmClientConfig::new(&provider.base_url, &provider.model)
            .with_timeout(config.timeout_secs);
        match provider.api_key() {
            Some(key) => client.with_api_key(key),
            None => client,
        }
    };

    let mut registry = LlmRegistry::new(&config.default_provider)
        .with_temperature(config.temperature)
        .register(Arc::new(OllamaClient::new(client_config(&config.ollama))?));

    if config.openai.api_key().is_some() {
        registry = registry.register(Arc::new(OpenAiClient::new(client_config(&config.openai))?));
    } else {
        tracing::info!(provider = "openai", "No API key configured, provider skipped");
    }

    if config.gemini.api_key().is_some() {
        registry = registry.register(Arc::new(GeminiClient::new(client_config(&config.gemini))?));
    } else {
        tracing::info!(provider = "gemini", "No API key configured, provider skipped");
    }

    if registry.resolve(None).is_err() {
        tracing::warn!(
            default_provider = %config.default_provider,
            available = ?registry.names(),
            "Default LLM provider is not registered; requests must name a provider"
        );
    }

    Ok(registry)
}

fn build_client(config: &LlmClientConfig) -> Result<Client, LlmError> {
    Client::builder()
        .timeout(Duration::from_secs(config.timeout_secs))
        .build()
        .map_err(|e| LlmError::NetworkError(e.to_string()))
}

fn map_send_error(provider: &str, e: reqwest::Error) -> LlmError {
    if e.is_timeout() {
        LlmError::Timeout
    } else if e.is_connect() {
        LlmError::NetworkError(format!("Cannot connect to {}: {}", provider, e))
    } else {
        LlmError::NetworkError(e.to_string())
    }
}

/// 检查状态码并解析响应体
async fn read_json<T: DeserializeOwned>(response: Response) -> Result<T, LlmError> {
    let status = response.status();
    if !status.is_success() {
        let error_text = response.text().await.unwrap_or_default();
        return Err(LlmError::ServiceError(format!(
            "HTTP {}: {}",
            status, error_text
        )));
    }

    response
        .json::<T>()
        .await
        .map_err(|e| LlmError::InvalidResponse(e.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::ports::LlmProviderPort;

    #[test]
    fn test_config_builder() {
        let config = LlmClientConfig::new("http://localhost:11434/", "llama3")
            .with_timeout(30)
            .with_api_key("sk-test");
        assert_eq!(config.base_url, "http://localhost:11434");
        assert_eq!(config.timeout_secs, 30);
        assert_eq!(config.require_api_key("openai").unwrap(), "sk-test");
    }

    #[test]
    fn test_registry_skips_providers_without_key() {
        let registry = build_registry(&LlmConfig::default()).unwrap();
        assert_eq!(registry.names(), ["ollama"]);
        assert_eq!(registry.default_provider(), "ollama");

        let mut config = LlmConfig::default();
        config.default_provider = "openai".to_string();
        config.temperature = 0.3;
        config.openai.api_key = Some("sk-test".to_string());
        config.gemini.api_key = Some("  ".to_string());

        let registry = build_registry(&config).unwrap();
        assert_eq!(registry.names(), ["ollama", "openai"]);
        assert_eq!(registry.resolve(None).unwrap().name(), "openai");
        assert!((registry.temperature() - 0.3).abs() < f32::EPSILON);
    }

    #[test]
    fn test_blank_api_key_is_not_configured() {
        let config = LlmClientConfig::new("https://api.openai.com", "gpt-4o-mini").with_api_key(" ");
        assert!(matches!(
            config.require_api_key("openai"),
            Err(LlmError::NotConfigured(_))
        ));
    }
}
