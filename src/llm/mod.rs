//! LLM client layer
//!
//! This module provides:
//! - Request/response types for a planning completion
//! - LlmClient trait, the seam the assisted scheduler is built against
//! - OpenAiClient implementation
//! - MockLlmClient for tests

pub mod client;
pub mod openai;
pub mod types;

pub use client::{LlmClient, MockLlmClient};
pub use openai::{DEFAULT_API_KEY_ENV, OpenAiClient, OpenAiConfig};
pub use types::{CompletionRequest, CompletionResponse, StopReason, Usage};
