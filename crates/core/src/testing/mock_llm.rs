//! Mock LLM client for testing.

use async_trait::async_trait;
use std::collections::VecDeque;
use std::sync::Arc;
use tokio::sync::RwLock;

use crate::classifier::{CompletionRequest, CompletionResponse, LlmClient, LlmError, LlmUsage};

/// Mock implementation of the [`LlmClient`] trait.
///
/// Replies are served from a queue; once the queue is empty the default
/// reply is repeated. Every request is recorded.
pub struct MockLlmClient {
    queued: Arc<RwLock<VecDeque<Result<String, String>>>>,
    default_reply: String,
    requests: Arc<RwLock<Vec<CompletionRequest>>>,
}

impl MockLlmClient {
    pub fn new(default_reply: impl Into<String>) -> Self {
        Self {
            queued: Arc::new(RwLock::new(VecDeque::new())),
            default_reply: default_reply.into(),
            requests: Arc::new(RwLock::new(Vec::new())),
        }
    }

    pub async fn push_reply(&self, text: impl Into<String>) {
        self.queued.write().await.push_back(Ok(text.into()));
    }

    /// Queue an API failure for the next call.
    pub async fn push_error(&self, message: impl Into<String>) {
        self.queued.write().await.push_back(Err(message.into()));
    }

    pub async fn requests(&self) -> Vec<CompletionRequest> {
        self.requests.read().await.clone()
    }
}

#[async_trait]
impl LlmClient for MockLlmClient {
    fn provider(&self) -> &str {
        "mock"
    }

    fn model(&self) -> &str {
        "mock-model"
    }

    async fn complete(&self, request: CompletionRequest) -> Result<CompletionResponse, LlmError> {
        self.requests.write().await.push(request);

        let next = self.queued.write().await.pop_front();
        let text = match next {
            Some(Ok(text)) => text,
            Some(Err(message)) => {
                return Err(LlmError::Api {
                    status: 500,
                    message,
                })
            }
            None => self.default_reply.clone(),
        };

        Ok(CompletionResponse {
            text,
            usage: LlmUsage {
                input_tokens: 100,
                output_tokens: 50,
            },
            model: "mock-model".to_string(),
        })
    }
}
