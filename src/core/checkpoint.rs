//! Per-thread conversation persistence.
//!
//! A [`Checkpointer`] stores the message history of each conversation thread
//! between agent invocations. [`MemorySaver`] keeps everything in process.

use super::message::Message;
use crate::error::Result;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::{collections::HashMap, fmt, sync::Arc};
use tokio::sync::RwLock;

/// Opaque key selecting one conversation thread
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ThreadId(String);

impl ThreadId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ThreadId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for ThreadId {
    fn from(id: &str) -> Self {
        Self::new(id)
    }
}

impl From<String> for ThreadId {
    fn from(id: String) -> Self {
        Self(id)
    }
}

/// Saved state of one thread after a completed invocation
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Checkpoint {
    pub thread_id: ThreadId,
    pub messages: Vec<Message>,
    /// Number of invocations persisted on this thread so far
    pub step: u64,
}

impl Checkpoint {
    pub fn new(thread_id: ThreadId, messages: Vec<Message>, step: u64) -> Self {
        Self {
            thread_id,
            messages,
            step,
        }
    }
}

/// Storage backend for thread checkpoints
#[async_trait]
pub trait Checkpointer: Send + Sync + fmt::Debug {
    /// Latest checkpoint of a thread, if it has one
    async fn get(&self, thread_id: &ThreadId) -> Result<Option<Checkpoint>>;

    /// Replace the checkpoint stored for `checkpoint.thread_id`
    async fn put(&self, checkpoint: Checkpoint) -> Result<()>;

    async fn list_threads(&self) -> Result<Vec<ThreadId>>;
}

/// In-memory checkpointer; clones share the same storage
#[derive(Debug, Clone, Default)]
pub struct MemorySaver {
    threads: Arc<RwLock<HashMap<ThreadId, Checkpoint>>>,
}

impl MemorySaver {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl Checkpointer for MemorySaver {
    async fn get(&self, thread_id: &ThreadId) -> Result<Option<Checkpoint>> {
        Ok(self.threads.read().await.get(thread_id).cloned())
    }

    async fn put(&self, checkpoint: Checkpoint) -> Result<()> {
        self.threads
            .write()
            .await
            .insert(checkpoint.thread_id.clone(), checkpoint);
        Ok(())
    }

    async fn list_threads(&self) -> Result<Vec<ThreadId>> {
        let mut threads: Vec<ThreadId> = self.threads.read().await.keys().cloned().collect();
        threads.sort();
        Ok(threads)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn empty_thread_has_no_checkpoint() {
        let saver = MemorySaver::new();
        assert!(saver.get(&ThreadId::from("42")).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn put_replaces_and_clones_share_storage() {
        let saver = MemorySaver::new();
        let shared = saver.clone();
        let thread = ThreadId::from("42");

        saver
            .put(Checkpoint::new(thread.clone(), vec![Message::human("hi")], 1))
            .await
            .unwrap();
        shared
            .put(Checkpoint::new(
                thread.clone(),
                vec![Message::human("hi"), Message::ai("hello")],
                2,
            ))
            .await
            .unwrap();

        let checkpoint = saver.get(&thread).await.unwrap().unwrap();
        assert_eq!(checkpoint.step, 2);
        assert_eq!(checkpoint.messages.len(), 2);
        assert_eq!(saver.list_threads().await.unwrap(), vec![thread]);
    }

    #[test]
    fn thread_id_is_opaque_string() {
        let id = ThreadId::from("42".to_string());
        assert_eq!(id, ThreadId::new("42"));
        assert_eq!(id.to_string(), "42");
        assert_eq!(serde_json::to_value(&id).unwrap(), serde_json::json!("42"));
    }
}
