//! Chat model abstraction used by the agent loop.

pub mod openai;

use crate::{core::message::Message, error::Result};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fmt;

pub use openai::ChatOpenAI;

/// A chat model that produces the next assistant turn
#[async_trait]
pub trait ChatModel: Send + Sync + fmt::Debug {
    /// Name reported in logs
    fn model_name(&self) -> &str;

    /// Produce the next assistant message given the history and the
    /// tool definitions (chat-completions `tools[]` format) on offer.
    async fn complete(&self, messages: &[Message], tools: &[Value]) -> Result<Message>;
}

/// Token usage information from the API
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenUsage {
    pub prompt_tokens: u32,
    pub completion_tokens: u32,
    pub total_tokens: u32,
}

impl TokenUsage {
    pub(crate) fn from_response(response: &Value) -> Option<Self> {
        let usage = response.get("usage")?;
        Some(Self {
            prompt_tokens: count(usage, "prompt_tokens")?,
            completion_tokens: count(usage, "completion_tokens")?,
            total_tokens: count(usage, "total_tokens")?,
        })
    }
}

fn count(usage: &Value, field: &str) -> Option<u32> {
    u32::try_from(usage.get(field)?.as_u64()?).ok()
}
