//! LLM client trait and an in-memory mock

use std::collections::VecDeque;
use std::sync::Mutex;

use async_trait::async_trait;

use crate::error::{PlannerError, Result};
use crate::llm::types::{CompletionRequest, CompletionResponse};

/// Stateless LLM client - each call is independent
#[async_trait]
pub trait LlmClient: Send + Sync {
    /// Single completion request
    async fn complete(&self, request: CompletionRequest) -> Result<CompletionResponse>;

    /// Model identifier used for requests
    fn model(&self) -> &str;

    /// Whether the client has what it needs to make calls
    fn is_ready(&self) -> bool;
}

/// Scripted client for tests: replays queued replies in order and records
/// every request it receives.
#[derive(Debug, Default)]
pub struct MockLlmClient {
    replies: Mutex<VecDeque<std::result::Result<CompletionResponse, String>>>,
    requests: Mutex<Vec<CompletionRequest>>,
    unavailable: bool,
}

impl MockLlmClient {
    pub fn new() -> Self {
        Self::default()
    }

    /// A client that reports itself as not ready.
    pub fn unavailable() -> Self {
        Self {
            unavailable: true,
            ..Self::default()
        }
    }

    /// Queue a successful text reply.
    pub fn with_reply(self, content: impl Into<String>) -> Self {
        self.with_response(CompletionResponse::text(content))
    }

    /// Queue a full response, stop reason and usage included.
    pub fn with_response(self, response: CompletionResponse) -> Self {
        self.lock_replies().push_back(Ok(response));
        self
    }

    /// Queue a failure.
    pub fn with_error(self, message: impl Into<String>) -> Self {
        self.lock_replies().push_back(Err(message.into()));
        self
    }

    /// Requests received so far.
    pub fn requests(&self) -> Vec<CompletionRequest> {
        self.requests.lock().unwrap_or_else(|e| e.into_inner()).clone()
    }

    fn lock_replies(&self) -> std::sync::MutexGuard<'_, VecDeque<std::result::Result<CompletionResponse, String>>> {
        self.replies.lock().unwrap_or_else(|e| e.into_inner())
    }
}

#[async_trait]
impl LlmClient for MockLlmClient {
    async fn complete(&self, request: CompletionRequest) -> Result<CompletionResponse> {
        self.requests.lock().unwrap_or_else(|e| e.into_inner()).push(request);

        match self.lock_replies().pop_front() {
            Some(Ok(response)) => Ok(response),
            Some(Err(message)) => Err(PlannerError::Llm(message)),
            None => Err(PlannerError::Llm("no mock reply queued".to_string())),
        }
    }

    fn model(&self) -> &str {
        "mock-model"
    }

    fn is_ready(&self) -> bool {
        !self.unavailable
    }
}
