use async_trait::async_trait;
use serde_json::{json, Value};
use std::{
    collections::VecDeque,
    sync::{Arc, Mutex},
    time::Duration,
};
use react_agent_rs::{
    run_conversation, AgentConfig, AgentError, ChatModel, ChatOpenAI, Checkpointer,
    ConversationAgent, FunctionFactory, MemorySaver, Message, ReactAgent, ReverseString, Role,
    ThreadId, ToolCall, DEFAULT_PROMPTS,
};

/// Chat model that replays canned replies and records every request
#[derive(Debug, Default)]
struct ScriptedModel {
    replies: Mutex<VecDeque<Message>>,
    requests: Mutex<Vec<Vec<Message>>>,
    tools_offered: Mutex<Vec<usize>>,
}

impl ScriptedModel {
    fn new(replies: Vec<Message>) -> Arc<Self> {
        Arc::new(Self {
            replies: Mutex::new(replies.into()),
            ..Default::default()
        })
    }

    fn requests(&self) -> Vec<Vec<Message>> {
        self.requests.lock().unwrap().clone()
    }
}

#[async_trait]
impl ChatModel for ScriptedModel {
    fn model_name(&self) -> &str {
        "scripted"
    }

    async fn complete(&self, messages: &[Message], tools: &[Value]) -> react_agent_rs::Result<Message> {
        self.requests.lock().unwrap().push(messages.to_vec());
        self.tools_offered.lock().unwrap().push(tools.len());
        self.replies
            .lock()
            .unwrap()
            .pop_front()
            .ok_or_else(|| AgentError::Api("script exhausted".to_string()))
    }
}

fn tool_call(id: &str, name: &str, arguments: Value) -> Message {
    Message::ai_with_tool_calls("", vec![ToolCall::new(id, name, arguments)])
}

fn default_prompts() -> Vec<String> {
    DEFAULT_PROMPTS.iter().map(|p| p.to_string()).collect()
}

#[test]
fn test_missing_api_key_is_config_error() {
    let err = AgentConfig::from_lookup(|_| None).unwrap_err();
    assert_eq!(err.error_code(), "CONFIG_ERROR");
    assert!(err.to_string().contains("OPENAI_API_KEY"));

    let err = AgentConfig::from_lookup(|_| Some(String::new())).unwrap_err();
    assert!(matches!(err, AgentError::Config(_)));
}

#[tokio::test]
async fn test_driver_prints_one_line_per_invocation_in_order() {
    let model = ScriptedModel::new(vec![
        Message::ai("It is 60 degrees and foggy in San Francisco."),
        Message::ai("It is 90 degrees and sunny in New York."),
    ]);
    let saver = MemorySaver::new();
    let agent = ReactAgent::new(model.clone(), FunctionFactory::new())
        .with_checkpointer(Arc::new(saver.clone()));
    let thread = ThreadId::from("42");

    let mut out = Vec::new();
    let answers = run_conversation(&agent, &thread, &default_prompts(), &mut out)
        .await
        .unwrap();

    assert_eq!(
        String::from_utf8(out).unwrap(),
        "It is 60 degrees and foggy in San Francisco.\nIt is 90 degrees and sunny in New York.\n"
    );
    assert_eq!(answers.len(), 2);

    let requests = model.requests();
    assert_eq!(requests.len(), 2);
    assert_eq!(requests[0].len(), 1);
    assert_eq!(requests[0][0].content, "what is the current weather in sf");

    // the second turn carries the first exchange
    let second = &requests[1];
    assert_eq!(second.len(), 3);
    assert_eq!(second[0].content, "what is the current weather in sf");
    assert_eq!(second[1].role, Role::Assistant);
    assert_eq!(second[2].content, "what about ny");

    let checkpoint = saver.get(&thread).await.unwrap().unwrap();
    assert_eq!(checkpoint.step, 2);
    assert_eq!(checkpoint.messages.len(), 4);
}

#[tokio::test]
async fn test_tool_call_round_trip() {
    let model = ScriptedModel::new(vec![
        tool_call("call_1", "reverse_string", json!({"text": "LangGraph"})),
        Message::ai("hparGgnaL"),
    ]);
    let agent = ReactAgent::new(model.clone(), FunctionFactory::new().with_tool(ReverseString));

    let state = agent
        .invoke(
            vec![Message::human("Can you reverse the word 'LangGraph'?")],
            &ThreadId::from("t"),
        )
        .await
        .unwrap();

    let roles: Vec<Role> = state.messages.iter().map(|m| m.role).collect();
    assert_eq!(
        roles,
        vec![Role::User, Role::Assistant, Role::Tool, Role::Assistant]
    );
    assert_eq!(state.messages[2].tool_call_id.as_deref(), Some("call_1"));
    assert_eq!(state.messages[2].content, "hparGgnaL");
    assert_eq!(state.last_message().unwrap().content, "hparGgnaL");

    assert_eq!(model.tools_offered.lock().unwrap().as_slice(), &[1, 1]);
    assert_eq!(model.requests()[1].last().unwrap().role, Role::Tool);
}

#[tokio::test]
async fn test_tool_failures_are_reported_to_the_model() {
    let model = ScriptedModel::new(vec![
        Message::ai_with_tool_calls(
            "",
            vec![
                ToolCall::new("call_missing", "weather", json!({"location": "sf"})),
                ToolCall::new("call_invalid", "reverse_string", json!({})),
            ],
        ),
        Message::ai("sorry"),
    ]);
    let agent = ReactAgent::new(model, FunctionFactory::new().with_tool(ReverseString));

    let state = agent
        .invoke(vec![Message::human("hi")], &ThreadId::from("t"))
        .await
        .unwrap();

    let missing: Value = serde_json::from_str(&state.messages[2].content).unwrap();
    assert_eq!(missing["error"]["code"], "TOOL_NOT_FOUND");

    let invalid: Value = serde_json::from_str(&state.messages[3].content).unwrap();
    assert_eq!(invalid["error"]["code"], "VALIDATION_ERROR");

    assert_eq!(state.last_message().unwrap().content, "sorry");
}

#[tokio::test]
async fn test_argument_shapes_reach_the_right_error() {
    let parse = |raw: Value| ToolCall::from_openai_format(&raw).unwrap();
    let model = ScriptedModel::new(vec![
        Message::ai_with_tool_calls(
            "",
            vec![
                parse(json!({"id": "call_inline", "function": {"name": "reverse_string", "arguments": {"text": "abc"}}})),
                parse(json!({"id": "call_scalar", "function": {"name": "reverse_string", "arguments": "\"abc\""}})),
                parse(json!({"id": "call_broken", "function": {"name": "reverse_string", "arguments": "{\"text\": "}})),
            ],
        ),
        Message::ai("done"),
    ]);
    let agent = ReactAgent::new(model, FunctionFactory::new().with_tool(ReverseString));

    let state = agent
        .invoke(vec![Message::human("reverse abc")], &ThreadId::from("t"))
        .await
        .unwrap();

    assert_eq!(state.messages[2].content, "cba");

    let scalar: Value = serde_json::from_str(&state.messages[3].content).unwrap();
    assert_eq!(scalar["error"]["code"], "VALIDATION_ERROR");

    let broken: Value = serde_json::from_str(&state.messages[4].content).unwrap();
    assert_eq!(broken["error"]["code"], "INVALID_FUNCTION_CALL");
}

#[tokio::test]
async fn test_max_iterations_leaves_thread_untouched() {
    let model = ScriptedModel::new(vec![
        tool_call("call_1", "reverse_string", json!({"text": "a"})),
        tool_call("call_2", "reverse_string", json!({"text": "b"})),
    ]);
    let saver = MemorySaver::new();
    let agent = ReactAgent::new(model, FunctionFactory::new().with_tool(ReverseString))
        .with_checkpointer(Arc::new(saver.clone()))
        .with_max_iterations(2);

    let thread = ThreadId::from("42");
    let err = agent
        .invoke(vec![Message::human("loop forever")], &thread)
        .await
        .unwrap_err();

    assert!(matches!(err, AgentError::MaxIterations(2)));
    assert!(saver.get(&thread).await.unwrap().is_none());
}

#[tokio::test]
async fn test_threads_are_isolated() {
    let model = ScriptedModel::new(vec![Message::ai("first"), Message::ai("second")]);
    let agent = ReactAgent::new(model.clone(), FunctionFactory::new())
        .with_checkpointer(Arc::new(MemorySaver::new()));

    agent
        .invoke(vec![Message::human("on a")], &ThreadId::from("a"))
        .await
        .unwrap();
    let state = agent
        .invoke(vec![Message::human("on b")], &ThreadId::from("b"))
        .await
        .unwrap();

    assert_eq!(state.messages.len(), 2);
    assert_eq!(model.requests()[1].len(), 1);
}

#[tokio::test]
async fn test_without_checkpointer_history_is_not_kept() {
    let model = ScriptedModel::new(vec![Message::ai("one"), Message::ai("two")]);
    let agent = ReactAgent::new(model.clone(), FunctionFactory::new());
    let thread = ThreadId::from("42");

    agent.invoke(vec![Message::human("a")], &thread).await.unwrap();
    agent.invoke(vec![Message::human("b")], &thread).await.unwrap();

    assert_eq!(model.requests()[1].len(), 1);
}

#[tokio::test]
async fn test_system_prompt_is_sent_but_not_stored() {
    let model = ScriptedModel::new(vec![Message::ai("done")]);
    let agent = ReactAgent::new(model.clone(), FunctionFactory::new())
        .with_prompt(Some("You are a witty assistant.".to_string()));

    let state = agent
        .invoke(vec![Message::human("hi")], &ThreadId::from("t"))
        .await
        .unwrap();

    let request = &model.requests()[0];
    assert_eq!(request[0].role, Role::System);
    assert_eq!(request.len(), 2);
    assert!(state.messages.iter().all(|m| m.role != Role::System));
}

#[tokio::test]
async fn test_first_failure_stops_the_driver() {
    let model = ScriptedModel::new(Vec::new());
    let agent = ReactAgent::new(model.clone(), FunctionFactory::new());

    let mut out = Vec::new();
    let err = run_conversation(&agent, &ThreadId::from("42"), &default_prompts(), &mut out)
        .await
        .unwrap_err();

    assert!(matches!(err, AgentError::Api(_)));
    assert!(out.is_empty());
    assert_eq!(model.requests().len(), 1);
}

#[tokio::test]
async fn test_openai_model_through_driver() {
    let mut server = mockito::Server::new_async().await;
    let mock = server
        .mock("POST", "/chat/completions")
        .match_header("authorization", "Bearer sk-test")
        .match_body(mockito::Matcher::PartialJson(json!({
            "model": "gpt-4",
            "temperature": 0.0
        })))
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(
            json!({
                "choices": [{"message": {"role": "assistant", "content": "Mild and clear."}}]
            })
            .to_string(),
        )
        .expect(2)
        .create_async()
        .await;

    let config = AgentConfig::new("sk-test").unwrap().with_base_url(server.url());
    let model = Arc::new(ChatOpenAI::from_config(&config));
    let agent = ReactAgent::new(model, FunctionFactory::new())
        .with_checkpointer(Arc::new(MemorySaver::new()));

    let mut out = Vec::new();
    run_conversation(&agent, &config.thread_id, &default_prompts(), &mut out)
        .await
        .unwrap();

    assert_eq!(
        String::from_utf8(out).unwrap(),
        "Mild and clear.\nMild and clear.\n"
    );
    mock.assert_async().await;
}

/// Answers after a pause so that concurrent runs overlap
#[derive(Debug)]
struct SlowModel;

#[async_trait]
impl ChatModel for SlowModel {
    fn model_name(&self) -> &str {
        "slow"
    }

    async fn complete(&self, messages: &[Message], _tools: &[Value]) -> react_agent_rs::Result<Message> {
        tokio::time::sleep(Duration::from_millis(50)).await;
        Ok(Message::ai(format!("seen {}", messages.len())))
    }
}

#[tokio::test]
async fn test_concurrent_invokes_on_one_thread_keep_every_turn() {
    let saver = MemorySaver::new();
    let agent = ReactAgent::new(Arc::new(SlowModel), FunctionFactory::new())
        .with_checkpointer(Arc::new(saver.clone()));
    let thread = ThreadId::from("42");

    let (first, second) = tokio::join!(
        agent.invoke(vec![Message::human("what is the current weather in sf")], &thread),
        agent.invoke(vec![Message::human("what about ny")], &thread),
    );
    first.unwrap();
    second.unwrap();

    let checkpoint = saver.get(&thread).await.unwrap().unwrap();
    assert_eq!(checkpoint.step, 2);
    assert_eq!(checkpoint.messages.len(), 4);
    assert_eq!(checkpoint.messages[3].content, "seen 3");
}
