//! Tool abstractions and the built-in tools

pub mod duckduckgo;
pub mod function_factory;
pub mod reverse;
pub mod tool;

pub use duckduckgo::{DuckDuckGoSearchTool, SearchResult};
pub use function_factory::FunctionFactory;
pub use reverse::ReverseString;
pub use tool::{Tool, ToolRegistry};
