use super::{tool::ToolRegistry, Tool};
use crate::{schemas::validate_arguments, AgentError, Result};
use serde_json::Value;
use tracing::{debug, info};

/// The set of tools an agent may call, with validated dispatch
#[derive(Debug, Default)]
pub struct FunctionFactory {
    registry: ToolRegistry,
}

impl FunctionFactory {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a tool with the factory
    pub fn register_tool<T: Tool + 'static>(&mut self, tool: T) {
        self.registry.register(tool);
    }

    /// Builder-style variant of [`FunctionFactory::register_tool`]
    pub fn with_tool<T: Tool + 'static>(mut self, tool: T) -> Self {
        self.register_tool(tool);
        self
    }

    /// Validate `parameters` against the tool's schema, then execute it
    pub async fn execute_function(&self, function_name: &str, parameters: Value) -> Result<Value> {
        let tool = self
            .registry
            .get(function_name)
            .ok_or_else(|| AgentError::ToolNotFound(function_name.to_string()))?;

        validate_arguments(function_name, &tool.parameters_schema(), &parameters)?;

        info!(target: "react_agent::tools", "calling {}({})", function_name, parameters);
        let result = tool.execute(parameters).await;
        if let Err(err) = &result {
            debug!(target: "react_agent::tools", "{} failed: {}", function_name, err);
        }
        result
    }

    /// Get all available tools for function calling
    pub fn get_openai_tools(&self) -> Vec<Value> {
        self.registry.to_openai_tools()
    }

    pub fn has_function(&self, name: &str) -> bool {
        self.registry.get(name).is_some()
    }

    pub fn tool_names(&self) -> Vec<&str> {
        self.registry.names()
    }
}
