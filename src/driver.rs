//! Sequential invocation driver.
//!
//! Sends each prompt as a human message to the same thread, one after the
//! other, and writes the final message of every response as one line.

use crate::{
    core::{
        agent::ConversationAgent,
        checkpoint::ThreadId,
        message::Message,
    },
    error::{AgentError, Result},
};
use std::io::Write;
use tracing::info;

/// The two turns of the weather conversation; the second relies on the first
pub const DEFAULT_PROMPTS: [&str; 2] = ["what is the current weather in sf", "what about ny"];

/// Invoke `agent` once per prompt on `thread_id`, in order.
///
/// Stops at the first failure; prompts after it are never sent.
pub async fn run_conversation<A, W>(
    agent: &A,
    thread_id: &ThreadId,
    prompts: &[String],
    out: &mut W,
) -> Result<Vec<String>>
where
    A: ConversationAgent + ?Sized,
    W: Write,
{
    let mut answers = Vec::with_capacity(prompts.len());

    for (turn, prompt) in prompts.iter().enumerate() {
        info!(target: "react_agent::driver", "turn {} on thread {}: {}", turn + 1, thread_id, prompt);

        let state = agent
            .invoke(vec![Message::human(prompt.as_str())], thread_id)
            .await?;

        let last = state.last_message().ok_or_else(|| {
            AgentError::InvalidResponse(format!("agent returned no messages for turn {}", turn + 1))
        })?;

        writeln!(out, "{}", last.content)?;
        out.flush()?;
        answers.push(last.content.clone());
    }

    Ok(answers)
}
