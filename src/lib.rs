//! react-agent-rs: a prebuilt ReAct agent with web search and thread checkpoints
//!
//! The agent alternates chat-model turns and tool calls until the model answers
//! in plain text. Conversation history is kept per thread by a [`Checkpointer`],
//! so later invocations on the same thread see earlier turns.
//!
//! # Quick Start
//!
//! ```rust,no_run
//! use std::sync::Arc;
//! use react_agent_rs::{
//!     run_conversation, AgentConfig, DuckDuckGoSearchTool, FunctionFactory, MemorySaver,
//!     ReactAgent,
//! };
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = AgentConfig::from_env()?;
//!     let tools = FunctionFactory::new()
//!         .with_tool(DuckDuckGoSearchTool::new().with_max_results(config.max_search_results));
//!
//!     let agent = ReactAgent::from_config(&config, tools)
//!         .with_checkpointer(Arc::new(MemorySaver::new()));
//!
//!     let prompts = vec![
//!         "what is the current weather in sf".to_string(),
//!         "what about ny".to_string(),
//!     ];
//!     run_conversation(&agent, &config.thread_id, &prompts, &mut std::io::stdout()).await?;
//!     Ok(())
//! }
//! ```

extern crate self as react_agent_rs;

pub mod config;
pub mod core;
pub mod driver;
pub mod error;
pub mod models;
pub mod schemas;
pub(crate) mod services;
pub mod tools;

pub use config::AgentConfig;
pub use crate::core::{
    AgentState, Checkpoint, Checkpointer, ConversationAgent, MemorySaver, Message, ReactAgent,
    Role, ThreadId, ToolCall, ToolExecution, ToolOutput,
};
pub use driver::{run_conversation, DEFAULT_PROMPTS};
pub use error::{AgentError, Result};
pub use models::{ChatModel, ChatOpenAI, TokenUsage};
pub use react_agent_macros::tool;
pub use tools::{DuckDuckGoSearchTool, FunctionFactory, ReverseString, Tool};

#[cfg(feature = "cli")]
pub mod cli;
