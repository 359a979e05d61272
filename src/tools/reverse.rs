use schemars::JsonSchema;
use serde::Deserialize;
use serde_json::json;

/// Parameters for [`ReverseString`]
#[derive(Debug, Deserialize, JsonSchema)]
pub struct ReverseParams {
    /// Text to reverse
    pub text: String,
}

crate::tool!(
    name = "reverse_string",
    description = "Reverses a string.",
    params = ReverseParams,
    |params: ReverseParams| async move {
        Ok::<_, String>(json!(params.text.chars().rev().collect::<String>()))
    }
);

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{tools::Tool, AgentError};

    #[tokio::test]
    async fn reverses_text() {
        let result = ReverseString.execute(json!({"text": "LangGraph"})).await.unwrap();
        assert_eq!(result, json!("hparGgnaL"));
    }

    #[tokio::test]
    async fn empty_string_stays_empty() {
        let result = ReverseString.execute(json!({"text": ""})).await.unwrap();
        assert_eq!(result, json!(""));
    }

    #[tokio::test]
    async fn non_string_input_is_a_validation_error() {
        let err = ReverseString.execute(json!({"text": 123})).await.unwrap_err();
        assert!(matches!(err, AgentError::Validation(_)));
    }

    #[test]
    fn schema_requires_text() {
        let schema = ReverseString.parameters_schema();
        assert_eq!(schema["required"], json!(["text"]));
        assert_eq!(ReverseString.name(), "reverse_string");
    }
}
