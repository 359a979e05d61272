pub mod agent;
pub mod checkpoint;
pub mod message;
pub mod tool_call;

pub use agent::{AgentState, ConversationAgent, ReactAgent};
pub use checkpoint::{Checkpoint, Checkpointer, MemorySaver, ThreadId};
pub use message::{Message, Role};
pub use tool_call::{ToolCall, ToolExecution, ToolOutput};
