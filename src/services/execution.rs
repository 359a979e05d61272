use crate::{
    core::{
        agent::{AgentState, ReactAgent},
        checkpoint::{Checkpoint, ThreadId},
        message::Message,
        tool_call::{ToolCall, ToolExecution, ToolOutput},
    },
    error::{AgentError, Result},
};
use std::time::Instant;
use tracing::{debug, info, warn};

impl ReactAgent {
    /// Continue `thread_id` with `input`, looping model turns and tool calls
    /// until the model answers without requesting a tool.
    ///
    /// The checkpoint is only written after a completed run, so a failed
    /// invocation leaves the thread as it was. Runs on one thread are
    /// serialised.
    pub(crate) async fn run_thread(
        &self,
        input: Vec<Message>,
        thread_id: &ThreadId,
    ) -> Result<AgentState> {
        let thread_lock = self.thread_lock(thread_id).await;
        let _turn = thread_lock.lock().await;
        let start_time = Instant::now();

        let (mut history, step) = match self.checkpointer() {
            Some(saver) => match saver.get(thread_id).await? {
                Some(checkpoint) => (checkpoint.messages, checkpoint.step),
                None => (Vec::new(), 0),
            },
            None => (Vec::new(), 0),
        };
        debug!(
            target: "react_agent::loop",
            "thread {} resumed with {} messages at step {} (model {}, tools [{}])",
            thread_id,
            history.len(),
            step,
            self.model().model_name(),
            self.function_factory().tool_names().join(", ")
        );

        for message in &input {
            info!(target: "react_agent::steps", "{}", message.describe());
        }
        history.extend(input);

        let tools = self.function_factory().get_openai_tools();
        let mut iteration = 0;

        loop {
            if iteration >= self.max_iterations() {
                warn!(
                    target: "react_agent::loop",
                    "thread {} hit the iteration limit ({})",
                    thread_id,
                    self.max_iterations()
                );
                return Err(AgentError::MaxIterations(self.max_iterations()));
            }
            iteration += 1;

            let request = self.request_messages(&history);
            let reply = self.model().complete(&request, &tools).await?;
            info!(target: "react_agent::steps", "{}", reply.describe());

            let tool_calls = reply.tool_calls.clone();
            history.push(reply);

            if tool_calls.is_empty() {
                break;
            }

            for tool_call in tool_calls {
                let output = self.execute_tool_call(tool_call).await;
                let message = output.into_message();
                info!(target: "react_agent::steps", "{}", message.describe());
                history.push(message);
            }
        }

        if let Some(saver) = self.checkpointer() {
            saver
                .put(Checkpoint::new(thread_id.clone(), history.clone(), step + 1))
                .await?;
        }

        info!(
            target: "react_agent::loop",
            "thread {} finished in {:.2}s after {} model call(s)",
            thread_id,
            start_time.elapsed().as_secs_f64(),
            iteration
        );

        Ok(AgentState::new(history))
    }

    fn request_messages(&self, history: &[Message]) -> Vec<Message> {
        let mut messages = Vec::with_capacity(history.len() + 1);
        if let Some(prompt) = self.prompt() {
            messages.push(Message::system(prompt));
        }
        messages.extend_from_slice(history);
        messages
    }

    /// Run one tool call; failures are captured in the output, never raised
    async fn execute_tool_call(&self, tool_call: ToolCall) -> ToolOutput {
        let name = tool_call.name.clone();
        let raw_arguments = tool_call.raw_arguments.clone();
        let arguments = tool_call.arguments.clone();
        let execution = ToolExecution::start(tool_call);

        let result = match raw_arguments {
            Some(raw) => Err(AgentError::InvalidFunctionCall(format!(
                "arguments for tool '{}' are not valid JSON: {}",
                name, raw
            ))),
            None => {
                self.function_factory()
                    .execute_function(&name, arguments)
                    .await
            }
        };

        let output = execution.finish(result);
        if output.is_error {
            warn!(target: "react_agent::tools", "{} returned an error: {}", name, output.as_string());
        }
        output
    }
}
