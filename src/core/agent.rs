use super::{
    checkpoint::{Checkpointer, ThreadId},
    message::Message,
};
use crate::{
    config::{AgentConfig, DEFAULT_MAX_ITERATIONS},
    error::Result,
    models::{ChatModel, ChatOpenAI},
    tools::FunctionFactory,
};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::{collections::HashMap, sync::Arc};
use tokio::sync::Mutex;

/// Conversation state returned from one invocation
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AgentState {
    pub messages: Vec<Message>,
}

impl AgentState {
    pub fn new(messages: Vec<Message>) -> Self {
        Self { messages }
    }

    pub fn last_message(&self) -> Option<&Message> {
        self.messages.last()
    }
}

/// Anything that can continue a conversation thread.
///
/// `input` is appended to the thread's history; the returned state holds the
/// full, updated history. Invocations on the same thread run one at a time so
/// that no turn is lost between reading and writing the checkpoint;
/// different threads proceed independently.
#[async_trait]
pub trait ConversationAgent: Send + Sync {
    async fn invoke(&self, input: Vec<Message>, thread_id: &ThreadId) -> Result<AgentState>;
}

/// Tool-calling agent that alternates model turns and tool execution
#[derive(Debug)]
pub struct ReactAgent {
    model: Arc<dyn ChatModel>,
    function_factory: FunctionFactory,
    checkpointer: Option<Arc<dyn Checkpointer>>,
    prompt: Option<String>,
    max_iterations: usize,
    thread_locks: Mutex<HashMap<ThreadId, Arc<Mutex<()>>>>,
}

impl ReactAgent {
    pub fn new(model: Arc<dyn ChatModel>, function_factory: FunctionFactory) -> Self {
        Self {
            model,
            function_factory,
            checkpointer: None,
            prompt: None,
            max_iterations: DEFAULT_MAX_ITERATIONS,
            thread_locks: Mutex::new(HashMap::new()),
        }
    }

    /// Wire an OpenAI-compatible model from validated configuration
    pub fn from_config(config: &AgentConfig, function_factory: FunctionFactory) -> Self {
        let model = Arc::new(ChatOpenAI::from_config(config));
        Self::new(model, function_factory)
            .with_max_iterations(config.max_iterations)
            .with_prompt(config.system_prompt.clone())
    }

    pub fn with_checkpointer(mut self, checkpointer: Arc<dyn Checkpointer>) -> Self {
        self.checkpointer = Some(checkpointer);
        self
    }

    /// System prompt sent ahead of the history on every model call
    pub fn with_prompt(mut self, prompt: Option<String>) -> Self {
        self.prompt = prompt;
        self
    }

    pub fn with_max_iterations(mut self, max_iterations: usize) -> Self {
        self.max_iterations = max_iterations;
        self
    }

    pub(crate) fn model(&self) -> &dyn ChatModel {
        self.model.as_ref()
    }

    pub(crate) fn function_factory(&self) -> &FunctionFactory {
        &self.function_factory
    }

    pub(crate) fn checkpointer(&self) -> Option<&dyn Checkpointer> {
        self.checkpointer.as_deref()
    }

    pub(crate) fn prompt(&self) -> Option<&str> {
        self.prompt.as_deref()
    }

    pub(crate) fn max_iterations(&self) -> usize {
        self.max_iterations
    }

    /// Lock guarding one thread's checkpoint for the length of a run
    pub(crate) async fn thread_lock(&self, thread_id: &ThreadId) -> Arc<Mutex<()>> {
        let mut locks = self.thread_locks.lock().await;
        locks.entry(thread_id.clone()).or_default().clone()
    }
}

#[async_trait]
impl ConversationAgent for ReactAgent {
    async fn invoke(&self, input: Vec<Message>, thread_id: &ThreadId) -> Result<AgentState> {
        self.run_thread(input, thread_id).await
    }
}
