use super::tool_call::ToolCall;
use crate::error::{AgentError, Result};
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use std::fmt;

/// Author of a message in a conversation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    System,
    User,
    Assistant,
    Tool,
}

impl Role {
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::System => "system",
            Role::User => "user",
            Role::Assistant => "assistant",
            Role::Tool => "tool",
        }
    }

    fn parse(raw: &str) -> Option<Self> {
        match raw {
            "system" => Some(Role::System),
            "user" => Some(Role::User),
            "assistant" => Some(Role::Assistant),
            "tool" => Some(Role::Tool),
            _ => None,
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A role-tagged unit of conversation
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Message {
    pub role: Role,
    pub content: String,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub tool_calls: Vec<ToolCall>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tool_call_id: Option<String>,
}

impl Message {
    fn plain(role: Role, content: impl Into<String>) -> Self {
        Self {
            role,
            content: content.into(),
            tool_calls: Vec::new(),
            tool_call_id: None,
        }
    }

    pub fn system(content: impl Into<String>) -> Self {
        Self::plain(Role::System, content)
    }

    /// A human-authored message
    pub fn human(content: impl Into<String>) -> Self {
        Self::plain(Role::User, content)
    }

    pub fn ai(content: impl Into<String>) -> Self {
        Self::plain(Role::Assistant, content)
    }

    pub fn ai_with_tool_calls(content: impl Into<String>, tool_calls: Vec<ToolCall>) -> Self {
        Self {
            tool_calls,
            ..Self::plain(Role::Assistant, content)
        }
    }

    pub fn tool(tool_call_id: impl Into<String>, content: impl Into<String>) -> Self {
        Self {
            tool_call_id: Some(tool_call_id.into()),
            ..Self::plain(Role::Tool, content)
        }
    }

    pub fn has_tool_calls(&self) -> bool {
        !self.tool_calls.is_empty()
    }

    /// Convert to the chat-completions message format
    pub fn to_openai_format(&self) -> Value {
        let mut message = json!({
            "role": self.role.as_str(),
            "content": self.content,
        });

        if self.has_tool_calls() {
            if self.content.is_empty() {
                message["content"] = Value::Null;
            }
            message["tool_calls"] = Value::Array(
                self.tool_calls
                    .iter()
                    .map(ToolCall::to_openai_format)
                    .collect(),
            );
        }

        if let Some(id) = &self.tool_call_id {
            message["tool_call_id"] = json!(id);
        }

        message
    }

    /// Parse a message in chat-completions format.
    ///
    /// `content` may be null for assistant turns that only call tools.
    pub fn from_openai_format(raw: &Value) -> Result<Self> {
        let role = raw
            .get("role")
            .and_then(Value::as_str)
            .and_then(Role::parse)
            .ok_or_else(|| AgentError::InvalidResponse(format!("message has no valid role: {raw}")))?;

        let content = raw
            .get("content")
            .and_then(Value::as_str)
            .unwrap_or_default()
            .to_string();

        let tool_calls = match raw.get("tool_calls").and_then(Value::as_array) {
            Some(calls) => calls
                .iter()
                .map(ToolCall::from_openai_format)
                .collect::<Result<Vec<_>>>()?,
            None => Vec::new(),
        };

        let tool_call_id = raw
            .get("tool_call_id")
            .and_then(Value::as_str)
            .map(str::to_string);

        Ok(Self {
            role,
            content,
            tool_calls,
            tool_call_id,
        })
    }

    /// Get a human-readable description of the message
    pub fn describe(&self) -> String {
        match self.role {
            Role::System => format!("⚙ System: {}", self.content),
            Role::User => format!("🧭 Human: {}", self.content),
            Role::Assistant if self.has_tool_calls() => {
                let calls: Vec<String> = self.tool_calls.iter().map(ToolCall::describe).collect();
                format!("🔧 Action: {}", calls.join(", "))
            }
            Role::Assistant => format!("✅ AI: {}", self.content),
            Role::Tool => format!("👁 Observation: {}", self.content),
        }
    }
}
