//! Startup configuration for the agent.
//!
//! Everything the process needs is read once, validated, and passed down as an
//! [`AgentConfig`]. A missing API key is reported here, before any client or
//! tool is constructed.

use crate::{
    core::checkpoint::ThreadId,
    error::{AgentError, Result},
};
use std::{fmt, time::Duration};

pub const API_KEY_VAR: &str = "OPENAI_API_KEY";
pub const DEFAULT_MODEL: &str = "gpt-4";
pub const DEFAULT_BASE_URL: &str = "https://api.openai.com/v1";
pub const DEFAULT_THREAD_ID: &str = "42";
pub const DEFAULT_MAX_SEARCH_RESULTS: usize = 3;
pub const DEFAULT_MAX_ITERATIONS: usize = 25;
pub const DEFAULT_TIMEOUT_SECS: u64 = 120;

/// Validated configuration for one agent process
#[derive(Clone)]
pub struct AgentConfig {
    api_key: String,
    pub model: String,
    pub temperature: f32,
    pub base_url: String,
    pub thread_id: ThreadId,
    pub max_search_results: usize,
    pub max_iterations: usize,
    pub max_tokens: Option<u32>,
    pub timeout: Duration,
    pub system_prompt: Option<String>,
}

impl AgentConfig {
    /// Build a configuration around an explicit API key.
    ///
    /// Fails with [`AgentError::Config`] when the key is blank.
    pub fn new(api_key: impl Into<String>) -> Result<Self> {
        let api_key = api_key.into();
        if api_key.trim().is_empty() {
            return Err(missing_key());
        }

        Ok(Self {
            api_key,
            model: DEFAULT_MODEL.to_string(),
            temperature: 0.0,
            base_url: DEFAULT_BASE_URL.to_string(),
            thread_id: ThreadId::from(DEFAULT_THREAD_ID),
            max_search_results: DEFAULT_MAX_SEARCH_RESULTS,
            max_iterations: DEFAULT_MAX_ITERATIONS,
            max_tokens: None,
            timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
            system_prompt: None,
        })
    }

    /// Load `.env` (if present) and read the process environment.
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok();
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Resolve configuration through an arbitrary variable lookup.
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let api_key = lookup(API_KEY_VAR).ok_or_else(missing_key)?;
        let mut config = Self::new(api_key)?;

        let non_blank = |key: &str| lookup(key).filter(|url| !url.trim().is_empty());
        if let Some(base_url) =
            non_blank("OPENAI_BASE_URL").or_else(|| non_blank("OPENROUTER_BASE_URL"))
        {
            config.base_url = base_url;
        }

        Ok(config)
    }

    pub fn api_key(&self) -> &str {
        &self.api_key
    }

    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = model.into();
        self
    }

    pub fn with_temperature(mut self, temperature: f32) -> Self {
        self.temperature = temperature;
        self
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    pub fn with_thread_id(mut self, thread_id: impl Into<ThreadId>) -> Self {
        self.thread_id = thread_id.into();
        self
    }

    pub fn with_max_search_results(mut self, max_results: usize) -> Self {
        self.max_search_results = max_results;
        self
    }

    pub fn with_max_iterations(mut self, max_iterations: usize) -> Self {
        self.max_iterations = max_iterations;
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

    pub fn with_system_prompt(mut self, prompt: Option<String>) -> Self {
        self.system_prompt = prompt;
        self
    }
}

impl fmt::Debug for AgentConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AgentConfig")
            .field("api_key", &"<redacted>")
            .field("model", &self.model)
            .field("temperature", &self.temperature)
            .field("base_url", &self.base_url)
            .field("thread_id", &self.thread_id)
            .field("max_search_results", &self.max_search_results)
            .field("max_iterations", &self.max_iterations)
            .field("max_tokens", &self.max_tokens)
            .field("timeout", &self.timeout)
            .field("system_prompt", &self.system_prompt)
            .finish()
    }
}

fn missing_key() -> AgentError {
    AgentError::Config(format!("Missing {API_KEY_VAR} in environment variables"))
}
