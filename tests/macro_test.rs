use react_agent_rs::{tools::Tool, FunctionFactory};
use schemars::JsonSchema;
use serde::Deserialize;
use serde_json::json;

#[derive(Debug, Deserialize, JsonSchema)]
struct ForecastParams {
    city: String,
    #[serde(default)]
    days: Option<u8>,
}

react_agent_rs::tool!(
    name = "stub_forecast",
    description = "Returns a canned forecast for a city",
    params = ForecastParams,
    |params: ForecastParams| async move {
        if params.city.is_empty() {
            return Err("city must not be empty".to_string());
        }
        Ok(json!({
            "city": params.city,
            "days": params.days.unwrap_or(1),
            "summary": "fog in the morning, sun in the afternoon"
        }))
    }
);

#[tokio::test]
async fn test_macro_generated_tool() {
    let tool = StubForecast;

    assert_eq!(tool.name(), "stub_forecast");
    assert_eq!(tool.description(), "Returns a canned forecast for a city");

    let schema = tool.parameters_schema();
    assert!(schema.is_object());
    assert_eq!(schema["required"], json!(["city"]));

    let result = tool
        .execute(json!({"city": "San Francisco", "days": 3}))
        .await
        .unwrap();
    assert_eq!(result["city"], "San Francisco");
    assert_eq!(result["days"], 3);
}

#[tokio::test]
async fn test_macro_tool_handler_error() {
    let err = StubForecast.execute(json!({"city": ""})).await.unwrap_err();
    assert_eq!(err.error_code(), "TOOL_EXECUTION_ERROR");
}

#[tokio::test]
async fn test_macro_tool_through_factory() {
    let factory = FunctionFactory::new().with_tool(StubForecast);
    assert!(factory.has_function("stub_forecast"));

    let definitions = factory.get_openai_tools();
    assert_eq!(definitions[0]["function"]["name"], "stub_forecast");

    let err = factory
        .execute_function("stub_forecast", json!({"days": 2}))
        .await
        .unwrap_err();
    assert_eq!(err.error_code(), "VALIDATION_ERROR");
}

#[test]
fn test_macro_tool_sync_block_on() {
    let result = tokio_test::block_on(StubForecast.execute(json!({"city": "New York"}))).unwrap();
    assert_eq!(result["days"], 1);
}
