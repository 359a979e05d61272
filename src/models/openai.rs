use super::{ChatModel, TokenUsage};
use crate::{
    config::{AgentConfig, DEFAULT_BASE_URL, DEFAULT_MODEL, DEFAULT_TIMEOUT_SECS},
    core::message::{Message, Role},
    error::{AgentError, Result},
    services::openai_client::{ChatCompletionRequest, OpenAIClient},
};
use async_trait::async_trait;
use serde_json::{json, Value};
use std::time::Duration;
use tokio::time::timeout;
use tracing::debug;

/// Chat model backed by an OpenAI-compatible chat completions endpoint
#[derive(Debug, Clone)]
pub struct ChatOpenAI {
    client: OpenAIClient,
    model: String,
    temperature: f32,
    max_tokens: Option<u32>,
    timeout: Duration,
}

impl ChatOpenAI {
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            client: OpenAIClient::new(api_key, DEFAULT_BASE_URL),
            model: DEFAULT_MODEL.to_string(),
            temperature: 0.0,
            max_tokens: None,
            timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
        }
    }

    pub fn from_config(config: &AgentConfig) -> Self {
        Self::new(config.api_key())
            .with_base_url(config.base_url.clone())
            .with_model(config.model.clone())
            .with_temperature(config.temperature)
            .with_max_tokens(config.max_tokens)
            .with_timeout(config.timeout)
    }

    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = model.into();
        self
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.client.set_base_url(base_url);
        self
    }

    pub fn with_temperature(mut self, temperature: f32) -> Self {
        self.temperature = temperature;
        self
    }

    pub fn with_max_tokens(mut self, max_tokens: Option<u32>) -> Self {
        self.max_tokens = max_tokens;
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    fn build_request(&self, messages: &[Message], tools: &[Value]) -> Value {
        let wire_messages = messages.iter().map(Message::to_openai_format).collect();

        let mut request = ChatCompletionRequest::new(self.model.clone(), wire_messages)
            .with_temperature(self.temperature)
            .with_max_tokens(self.max_tokens);

        if !tools.is_empty() {
            request = request
                .with_tools(tools.to_vec())
                .with_tool_choice(json!("auto"));
        }

        request.into_value()
    }
}

#[async_trait]
impl ChatModel for ChatOpenAI {
    fn model_name(&self) -> &str {
        &self.model
    }

    async fn complete(&self, messages: &[Message], tools: &[Value]) -> Result<Message> {
        let body = self.build_request(messages, tools);

        let response = timeout(self.timeout, self.client.chat_completion(&body, self.timeout))
            .await
            .map_err(|_| AgentError::Timeout("chat completion call timed out".to_string()))??;

        if let Some(usage) = TokenUsage::from_response(&response) {
            debug!(
                target: "react_agent::model",
                "tokens: {} prompt + {} completion = {} total",
                usage.prompt_tokens,
                usage.completion_tokens,
                usage.total_tokens
            );
        }

        parse_assistant_message(&response)
    }
}

/// Pull `choices[0].message` out of a completion response
pub(crate) fn parse_assistant_message(response: &Value) -> Result<Message> {
    let first_choice = response
        .get("choices")
        .and_then(Value::as_array)
        .ok_or_else(|| {
            AgentError::InvalidResponse("missing 'choices' array in completion response".into())
        })?
        .first()
        .ok_or_else(|| AgentError::InvalidResponse("completion response contained no choices".into()))?;

    let raw_message = first_choice.get("message").ok_or_else(|| {
        AgentError::InvalidResponse("completion response missing assistant message".into())
    })?;

    let message = Message::from_openai_format(raw_message)?;
    if message.role != Role::Assistant {
        return Err(AgentError::InvalidResponse(format!(
            "expected an assistant message, got role `{}`",
            message.role
        )));
    }

    Ok(message)
}
