//! Parameter validation for tool calls.

pub mod validator;

pub use validator::{parse_params, validate_arguments};
