//! LLM Provider Port - 大模型推理抽象
//!
//! 定义文本生成的抽象接口，具体实现在 infrastructure/adapters 层
//! （OpenAI / Gemini / Ollama）

use async_trait::async_trait;
use std::collections::BTreeMap;
use std::sync::Arc;
use thiserror::Error;

/// LLM 错误
#[derive(Debug, Error)]
pub enum LlmError {
    #[error("Network error: {0}")]
    NetworkError(String),

    #[error("Request timeout")]
    Timeout,

    #[error("Service error: {0}")]
    ServiceError(String),

    #[error("Invalid response: {0}")]
    InvalidResponse(String),

    #[error("Provider not configured: {0}")]
    NotConfigured(String),
}

/// 生成请求
#[derive(Debug, Clone)]
pub struct CompletionRequest {
    /// 系统提示词
    pub system: Option<String>,
    /// 用户提示词
    pub prompt: String,
    pub temperature: f32,
    pub max_tokens: u32,
    /// 要求模型输出 JSON
    pub json: bool,
}

impl CompletionRequest {
    pub fn new(prompt: impl Into<String>) -> Self {
        Self {
            system: None,
            prompt: prompt.into(),
            temperature: 0.8,
            max_tokens: 4096,
            json: false,
        }
    }

    pub fn with_system(mut self, system: impl Into<String>) -> Self {
        self.system = Some(system.into());
        self
    }

    pub fn with_temperature(mut self, temperature: f32) -> Self {
        self.temperature = temperature;
        self
    }

    pub fn json(mut self) -> Self {
        self.json = true;
        self
    }
}

/// 生成响应
#[derive(Debug, Clone)]
pub struct CompletionResponse {
    /// 模型输出的原始文本
    pub text: String,
    /// 实际使用的模型
    pub model: String,
}

/// LLM Provider Port
#[async_trait]
pub trait LlmProviderPort: Send + Sync {
    /// 提供方名称（openai / gemini / ollama）
    fn name(&self) -> &'static str;

    /// 执行一次补全
    async fn complete(&self, request: CompletionRequest) -> Result<CompletionResponse, LlmError>;

    /// 检查服务是否可用
    async fn health_check(&self) -> bool {
        true
    }
}

/// 已注册的 LLM 提供方
///
/// 按名称选择，未指定时使用默认提供方
pub struct LlmRegistry {
    providers: BTreeMap<String, Arc<dyn LlmProviderPort>>,
    default_provider: String,
    temperature: f32,
}

impl LlmRegistry {
    pub fn new(default_provider: impl Into<String>) -> Self {
        Self {
            providers: BTreeMap::new(),
            default_provider: default_provider.into(),
            temperature: 0.8,
        }
    }

    /// 生成请求使用的采样温度
    pub fn with_temperature(mut self, temperature: f32) -> Self {
        self.temperature = temperature;
        self
    }

    pub fn temperature(&self) -> f32 {
        self.temperature
    }

    pub fn is_empty(&self) -> bool {
        self.providers.is_empty()
    }

    pub fn register(mut self, provider: Arc<dyn LlmProviderPort>) -> Self {
        self.providers.insert(provider.name().to_string(), provider);
        self
    }

    pub fn default_provider(&self) -> &str {
        &self.default_provider
    }

    pub fn names(&self) -> Vec<&str> {
        self.providers.keys().map(String::as_str).collect()
    }

    /// 选择提供方
    pub fn resolve(&self, name: Option<&str>) -> Result<Arc<dyn LlmProviderPort>, LlmError> {
        let name = name
            .map(str::trim)
            .filter(|n| !n.is_empty())
            .unwrap_or(self.default_provider.as_str());

        self.providers
            .get(name)
            .cloned()
            .ok_or_else(|| LlmError::NotConfigured(name.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Echo(&'static str);

    #[async_trait]
    impl LlmProviderPort for Echo {
        fn name(&self) -> &'static str {
            self.0
        }

        async fn complete(
            &self,
            request: CompletionRequest,
        ) -> Result<CompletionResponse, LlmError> {
            Ok(CompletionResponse {
                text: request.prompt,
                model: "echo".to_string(),
            })
        }
    }

    #[test]
    fn test_resolve_default_and_named() {
        let registry = LlmRegistry::new("ollama")
            .register(Arc::new(Echo("ollama")))
            .register(Arc::new(Echo("openai")));

        assert_eq!(registry.resolve(None).unwrap().name(), "ollama");
        assert_eq!(registry.resolve(Some("")).unwrap().name(), "ollama");
        assert_eq!(registry.resolve(Some("openai")).unwrap().name(), "openai");
        assert!(matches!(
            registry.resolve(Some("gemini")),
            Err(LlmError::NotConfigured(_))
        ));
        assert_eq!(registry.names(), vec!["ollama", "openai"]);
    }

    #[test]
    fn test_request_builder() {
        let request = CompletionRequest::new("hi")
            .with_system("sys")
            .with_temperature(0.2)
            .json();
        assert_eq!(request.system.as_deref(), Some("sys"));
        assert!(request.json);
        assert!((request.temperature - 0.2).abs() < f32::EPSILON);
    }
}
