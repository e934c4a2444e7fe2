//! Fake LLM Client - 用于测试的 LLM 客户端
//!
//! 按顺序返回预设的回复，不实际调用模型服务

use async_trait::async_trait;
use std::collections::VecDeque;
use std::sync::{Mutex, MutexGuard};

use crate::application::ports::{CompletionRequest, CompletionResponse, LlmError, LlmProviderPort};

/// Fake LLM Client
///
/// 预设回复用完后返回 ServiceError；收到的请求全部记录下来供断言
pub struct FakeLlmClient {
    name: &'static str,
    replies: Mutex<VecDeque<String>>,
    requests: Mutex<Vec<CompletionRequest>>,
}

impl FakeLlmClient {
    pub fn new(name: &'static str) -> Self {
        Self {
            name,
            replies: Mutex::new(VecDeque::new()),
            requests: Mutex::new(Vec::new()),
        }
    }

    /// 追加一条预设回复
    pub fn reply(self, text: impl Into<String>) -> Self {
        lock(&self.replies).push_back(text.into());
        self
    }

    /// 已收到的请求
    pub fn requests(&self) -> Vec<CompletionRequest> {
        lock(&self.requests).clone()
    }
}

// 测试中某个断言 panic 不应连带后续调用失败
fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
}

#[async_trait]
impl LlmProviderPort for FakeLlmClient {
    fn name(&self) -> &'static str {
        self.name
    }

    async fn complete(&self, request: CompletionRequest) -> Result<CompletionResponse, LlmError> {
        tracing::debug!(
            provider = self.name,
            prompt_len = request.prompt.len(),
            "FakeLlmClient: returning scripted reply"
        );

        lock(&self.requests).push(request);
        let text = lock(&self.replies)
            .pop_front()
            .ok_or_else(|| LlmError::ServiceError("no scripted reply left".to_string()))?;

        Ok(CompletionResponse {
            text,
            model: format!("{}-fake", self.name),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_replies_in_order() {
        let client = FakeLlmClient::new("fake").reply("一").reply("二");

        let first = client.complete(CompletionRequest::new("a")).await.unwrap();
        let second = client.complete(CompletionRequest::new("b")).await.unwrap();
        assert_eq!(first.text, "一");
        assert_eq!(second.text, "二");
        assert_eq!(second.model, "fake-fake");

        assert!(matches!(
            client.complete(CompletionRequest::new("c")).await,
            Err(LlmError::ServiceError(_))
        ));
        assert_eq!(client.requests().len(), 3);
    }
}
