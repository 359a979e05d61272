use crate::{
    config::{AgentConfig, API_KEY_VAR},
    core::{MemorySaver, ReactAgent},
    driver::{run_conversation, DEFAULT_PROMPTS},
    tools::{DuckDuckGoSearchTool, FunctionFactory, ReverseString},
    Result,
};
use clap::{value_parser, Arg, ArgAction, ArgMatches, Command};
use std::{env, sync::Arc, time::Duration};
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

/// CLI entry point for the react-agent binary
pub async fn run() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    let matches = command().get_matches();

    let config = match config_from_matches(&matches, |key| env::var(key).ok()) {
        Ok(config) => config,
        Err(e) => {
            error!("{}", e);
            return Err(e.into());
        }
    };

    let search = DuckDuckGoSearchTool::new().with_max_results(config.max_search_results);
    info!("Search results per query: {}", search.max_results());
    let mut function_factory = FunctionFactory::new().with_tool(search);
    if matches.get_flag("with-reverse") {
        function_factory.register_tool(ReverseString);
    }

    let agent = ReactAgent::from_config(&config, function_factory)
        .with_checkpointer(Arc::new(MemorySaver::new()));

    let prompts: Vec<String> = match matches.get_many::<String>("prompts") {
        Some(values) => values.cloned().collect(),
        None => DEFAULT_PROMPTS.iter().map(|p| p.to_string()).collect(),
    };

    info!("Using model: {}", config.model);
    info!("Base URL: {}", config.base_url);
    info!("Thread: {}", config.thread_id);

    let mut stdout = std::io::stdout().lock();
    match run_conversation(&agent, &config.thread_id, &prompts, &mut stdout).await {
        Ok(answers) => {
            info!("Conversation finished with {} answer(s)", answers.len());
            Ok(())
        }
        Err(e) => {
            error!("Agent execution failed: {}", e);
            Err(e.into())
        }
    }
}

pub fn command() -> Command {
    Command::new("react-agent")
        .version(env!("CARGO_PKG_VERSION"))
        .about("Run a web-search ReAct agent over a persisted conversation thread")
        .arg(
            Arg::new("prompts")
                .help("Prompts sent in order on the same thread (defaults to the sf/ny weather pair)")
                .num_args(1..)
                .index(1),
        )
        .arg(
            Arg::new("model")
                .short('m')
                .long("model")
                .value_name("MODEL")
                .help("Chat model name (default: gpt-4)"),
        )
        .arg(
            Arg::new("api-key")
                .short('k')
                .long("api-key")
                .value_name("KEY")
                .help("API key (or set OPENAI_API_KEY env var)"),
        )
        .arg(
            Arg::new("base-url")
                .short('u')
                .long("base-url")
                .value_name("URL")
                .help("Chat completions base URL (or set OPENAI_BASE_URL / OPENROUTER_BASE_URL)"),
        )
        .arg(
            Arg::new("thread-id")
                .long("thread-id")
                .value_name("ID")
                .help("Conversation thread identifier")
                .default_value("42"),
        )
        .arg(
            Arg::new("max-results")
                .long("max-results")
                .value_name("COUNT")
                .help("Maximum search results returned per query")
                .value_parser(value_parser!(usize))
                .default_value("3"),
        )
        .arg(
            Arg::new("temperature")
                .long("temperature")
                .value_name("TEMP")
                .help("Sampling temperature")
                .value_parser(value_parser!(f32))
                .default_value("0"),
        )
        .arg(
            Arg::new("timeout")
                .short('t')
                .long("timeout")
                .value_name("SECONDS")
                .help("Request timeout in seconds")
                .value_parser(value_parser!(u64))
                .default_value("120"),
        )
        .arg(
            Arg::new("max-iterations")
                .short('i')
                .long("max-iterations")
                .value_name("COUNT")
                .help("Maximum model calls per invocation")
                .value_parser(value_parser!(usize))
                .default_value("25"),
        )
        .arg(
            Arg::new("system-prompt")
                .short('s')
                .long("system-prompt")
                .value_name("TEXT")
                .help("System prompt sent ahead of the conversation"),
        )
        .arg(
            Arg::new("with-reverse")
                .long("with-reverse")
                .help("Also offer the reverse_string tool")
                .action(ArgAction::SetTrue),
        )
}

/// Resolve the validated configuration from parsed flags and a variable lookup
pub fn config_from_matches<F>(matches: &ArgMatches, lookup: F) -> Result<AgentConfig>
where
    F: Fn(&str) -> Option<String>,
{
    let cli_key = matches.get_one::<String>("api-key").cloned();
    let mut config = AgentConfig::from_lookup(|key| {
        if key == API_KEY_VAR {
            cli_key.clone().or_else(|| lookup(key))
        } else {
            lookup(key)
        }
    })?;

    if let Some(model) = matches.get_one::<String>("model") {
        config = config.with_model(model.as_str());
    }
    if let Some(base_url) = matches.get_one::<String>("base-url") {
        config = config.with_base_url(base_url.as_str());
    }
    if let Some(thread_id) = matches.get_one::<String>("thread-id") {
        config = config.with_thread_id(thread_id.as_str());
    }
    if let Some(max_results) = matches.get_one::<usize>("max-results") {
        config = config.with_max_search_results(*max_results);
    }
    if let Some(temperature) = matches.get_one::<f32>("temperature") {
        config = config.with_temperature(*temperature);
    }
    if let Some(timeout) = matches.get_one::<u64>("timeout") {
        config = config.with_timeout(Duration::from_secs(*timeout));
    }
    if let Some(max_iterations) = matches.get_one::<usize>("max-iterations") {
        config = config.with_max_iterations(*max_iterations);
    }

    Ok(config.with_system_prompt(matches.get_one::<String>("system-prompt").cloned()))
}
