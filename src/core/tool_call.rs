use crate::error::{AgentError, Result};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::time::Instant;
use tracing::warn;

/// Represents a tool call request from the LLM
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ToolCall {
    /// Unique identifier for this tool call
    pub id: String,
    /// Name of the tool to execute
    pub name: String,
    /// Arguments to pass to the tool
    pub arguments: Value,
    /// Argument text the model sent that could not be parsed as JSON;
    /// `arguments` is null when this is set
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub raw_arguments: Option<String>,
}

impl ToolCall {
    pub fn new(id: impl Into<String>, name: impl Into<String>, arguments: Value) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            arguments,
            raw_arguments: None,
        }
    }

    /// Whether the model sent arguments that are not valid JSON
    pub fn is_malformed(&self) -> bool {
        self.raw_arguments.is_some()
    }

    /// Parse a tool call from the chat-completions `tool_calls[]` format.
    ///
    /// `arguments` is normally a JSON-encoded string, but an inline JSON value
    /// is accepted as-is. Text that is not valid JSON is kept in
    /// `raw_arguments` so the failure can be reported back to the model.
    pub fn from_openai_format(tool_call: &Value) -> Result<Self> {
        let id = tool_call
            .get("id")
            .and_then(Value::as_str)
            .unwrap_or_default()
            .to_string();

        let function = tool_call.get("function").ok_or_else(|| {
            AgentError::InvalidFunctionCall(format!("tool call `{id}` has no function"))
        })?;

        let name = function
            .get("name")
            .and_then(Value::as_str)
            .filter(|name| !name.is_empty())
            .ok_or_else(|| {
                AgentError::InvalidFunctionCall(format!("tool call `{id}` has no function name"))
            })?
            .to_string();

        let mut raw_arguments = None;
        let arguments = match function.get("arguments") {
            None | Some(Value::Null) => Value::Object(Default::default()),
            Some(Value::String(text)) if text.trim().is_empty() => Value::Object(Default::default()),
            Some(Value::String(text)) => serde_json::from_str(text).unwrap_or_else(|err| {
                warn!(target: "react_agent::tools", "unparseable arguments for `{}`: {}", name, err);
                raw_arguments = Some(text.clone());
                Value::Null
            }),
            Some(inline) => inline.clone(),
        };

        Ok(Self {
            id,
            name,
            arguments,
            raw_arguments,
        })
    }

    /// Convert to the chat-completions tool call format
    pub fn to_openai_format(&self) -> Value {
        let arguments = match &self.raw_arguments {
            Some(raw) => raw.clone(),
            None => serde_json::to_string(&self.arguments).unwrap_or_default(),
        };
        serde_json::json!({
            "id": self.id,
            "type": "function",
            "function": {
                "name": self.name,
                "arguments": arguments
            }
        })
    }

    /// Get a human-readable description
    pub fn describe(&self) -> String {
        format!("{}({})", self.name, self.arguments)
    }
}

/// Represents the output from a tool execution
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ToolOutput {
    /// The tool call ID this output corresponds to
    pub tool_call_id: String,
    /// The tool name that was executed
    pub tool_name: String,
    /// The output/result from the tool
    pub output: Value,
    /// Whether the execution resulted in an error
    pub is_error: bool,
    /// Execution duration in milliseconds
    pub duration_ms: Option<u128>,
}

impl ToolOutput {
    /// Get the output as a string for message content
    pub fn as_string(&self) -> String {
        match &self.output {
            Value::String(s) => s.clone(),
            other => other.to_string(),
        }
    }

    /// Convert into the `tool` message answering the originating call
    pub fn into_message(self) -> super::message::Message {
        let content = self.as_string();
        super::message::Message::tool(self.tool_call_id, content)
    }
}

/// Tracks the execution of a tool call with timing information
#[derive(Debug)]
pub struct ToolExecution {
    pub tool_call: ToolCall,
    start_time: Instant,
}

impl ToolExecution {
    /// Start tracking a tool execution
    pub fn start(tool_call: ToolCall) -> Self {
        Self {
            tool_call,
            start_time: Instant::now(),
        }
    }

    /// Complete the execution with either the tool's value or its error payload
    pub fn finish(self, result: Result<Value>) -> ToolOutput {
        let duration = self.start_time.elapsed();
        let (output, is_error) = match result {
            Ok(value) => (value, false),
            Err(err) => (err.to_error_payload(), true),
        };
        ToolOutput {
            tool_call_id: self.tool_call.id,
            tool_name: self.tool_call.name,
            output,
            is_error,
            duration_ms: Some(duration.as_millis()),
        }
    }
}
