use crate::{AgentError, Result};
use jsonschema::{Draft, JSONSchema};
use serde::de::DeserializeOwned;
use serde_json::Value;

const MAX_SCHEMA_ERRORS: usize = 3;

/// Deserialize tool parameters, reporting the JSON path of the first mismatch
pub fn parse_params<T: DeserializeOwned>(tool_name: &str, params: Value) -> Result<T> {
    serde_path_to_error::deserialize(params).map_err(|err| {
        let path = err.path().to_string();
        let location = if path.is_empty() || path == "." {
            "<root>".to_string()
        } else {
            path
        };
        AgentError::Validation(format!(
            "invalid parameters for `{}` at {}: {}",
            tool_name,
            location,
            err.inner()
        ))
    })
}

/// Check tool arguments against the tool's JSON Schema before execution
pub fn validate_arguments(tool_name: &str, schema: &Value, arguments: &Value) -> Result<()> {
    let validator = JSONSchema::options()
        .with_draft(Draft::Draft7)
        .compile(schema)
        .map_err(|err| {
            AgentError::Validation(format!(
                "failed to prepare `{}` schema for validation: {}",
                tool_name, err
            ))
        })?;

    if let Err(errors) = validator.validate(arguments) {
        let mut details = Vec::new();
        let mut truncated = false;

        for (idx, error) in errors.enumerate() {
            if idx < MAX_SCHEMA_ERRORS {
                let mut path = error.instance_path.to_string();
                if path.is_empty() {
                    path = "<root>".to_string();
                }
                details.push(format!("{}: {}", path, error));
            } else {
                truncated = true;
                break;
            }
        }

        let mut detail_str = if details.is_empty() {
            "arguments failed schema validation".to_string()
        } else {
            details.join("; ")
        };

        if truncated {
            detail_str.push_str("; additional errors truncated");
        }

        return Err(AgentError::Validation(format!(
            "arguments for `{}` do not match its schema: {}",
            tool_name, detail_str
        )));
    }

    Ok(())
}
