use super::Tool;
use crate::{config::DEFAULT_MAX_SEARCH_RESULTS, schemas::parse_params, AgentError};
use reqwest::{header::USER_AGENT, Client, Url};
use serde::{Deserialize, Serialize};
use std::pin::Pin;

const DEFAULT_ENDPOINT: &str = "https://html.duckduckgo.com";
const BROWSER_AGENT: &str = "Mozilla/5.0 (compatible; react-agent-rs/0.1)";

/// Parameters accepted by the search tool
#[derive(Debug, Serialize, Deserialize, schemars::JsonSchema)]
pub struct SearchParams {
    /// Free-text web search query
    pub query: String,
}

/// One organic search hit
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SearchResult {
    pub title: String,
    pub link: String,
    pub snippet: String,
}

/// Web search through the DuckDuckGo HTML endpoint (no API key needed)
#[derive(Debug, Clone)]
pub struct DuckDuckGoSearchTool {
    client: Client,
    endpoint: String,
    max_results: usize,
}

impl Default for DuckDuckGoSearchTool {
    fn default() -> Self {
        Self::new()
    }
}

impl DuckDuckGoSearchTool {
    pub fn new() -> Self {
        Self {
            client: Client::new(),
            endpoint: DEFAULT_ENDPOINT.to_string(),
            max_results: DEFAULT_MAX_SEARCH_RESULTS,
        }
    }

    pub fn with_max_results(mut self, max_results: usize) -> Self {
        self.max_results = max_results;
        self
    }

    /// Point the tool at another host serving the same HTML layout
    pub fn with_endpoint(mut self, endpoint: impl Into<String>) -> Self {
        self.endpoint = endpoint.into();
        self
    }

    pub fn max_results(&self) -> usize {
        self.max_results
    }
}

impl Tool for DuckDuckGoSearchTool {
    fn name(&self) -> &'static str {
        "duckduckgo_search"
    }

    fn description(&self) -> &'static str {
        "Search the web with DuckDuckGo. Useful for current events and facts such as today's weather. Input is a search query."
    }

    fn parameters_schema(&self) -> serde_json::Value {
        let schema = schemars::schema_for!(SearchParams);
        serde_json::to_value(&schema.schema).unwrap_or_default()
    }

    fn execute(
        &self,
        parameters: serde_json::Value,
    ) -> Pin<Box<dyn std::future::Future<Output = crate::Result<serde_json::Value>> + Send + '_>>
    {
        Box::pin(async move {
            let params: SearchParams = parse_params(self.name(), parameters)?;
            let query = params.query.trim();
            if query.is_empty() {
                return Err(AgentError::ToolExecution(
                    "search query must not be empty".to_string(),
                ));
            }

            let url = format!("{}/html/", self.endpoint.trim_end_matches('/'));
            let response = self
                .client
                .get(&url)
                .query(&[("q", query)])
                .header(USER_AGENT, BROWSER_AGENT)
                .send()
                .await
                .map_err(|err| {
                    AgentError::ToolExecution(format!("failed to call DuckDuckGo: {}", err))
                })?;

            if !response.status().is_success() {
                return Err(AgentError::ToolExecution(format!(
                    "DuckDuckGo returned status {}",
                    response.status()
                )));
            }

            let body = response.text().await.map_err(|err| {
                AgentError::ToolExecution(format!("failed to read DuckDuckGo response: {}", err))
            })?;

            let results = parse_results(&body, self.max_results);
            serde_json::to_value(results).map_err(|err| {
                AgentError::ToolExecution(format!("failed to serialize results: {}", err))
            })
        })
    }
}

/// Extract up to `limit` organic results from a DuckDuckGo HTML page
fn parse_results(html: &str, limit: usize) -> Vec<SearchResult> {
    let mut results = Vec::new();

    for chunk in html.split("class=\"result__a\"").skip(1) {
        if results.len() >= limit {
            break;
        }

        let href = attribute(chunk, "href").unwrap_or_default();
        let link = resolve_link(href);
        // sponsored entries go through the ad redirector
        if link.is_empty() || link.contains("duckduckgo.com/y.js") {
            continue;
        }

        let title = element_text(chunk).unwrap_or_default();
        if title.is_empty() {
            continue;
        }

        let snippet = chunk
            .split("class=\"result__snippet\"")
            .nth(1)
            .and_then(element_text)
            .unwrap_or_default();

        results.push(SearchResult {
            title,
            link,
            snippet,
        });
    }

    results
}

fn attribute<'a>(tag_rest: &'a str, name: &str) -> Option<&'a str> {
    let tag_end = tag_rest.find('>')?;
    let tag = &tag_rest[..tag_end];
    let needle = format!("{}=\"", name);
    let start = tag.find(&needle)? + needle.len();
    let len = tag[start..].find('"')?;
    Some(&tag[start..start + len])
}

/// Text between the end of the current opening tag and the closing `</a>`
fn element_text(tag_rest: &str) -> Option<String> {
    let start = tag_rest.find('>')? + 1;
    let body = &tag_rest[start..];
    let end = body.find("</a>").unwrap_or(body.len());
    Some(html_decode(&strip_tags(&body[..end])).trim().to_string())
}

/// Unwrap `//duckduckgo.com/l/?uddg=<encoded>` redirect links
fn resolve_link(href: &str) -> String {
    let href = html_decode(href);
    let absolute = if href.starts_with("//") {
        format!("https:{}", href)
    } else {
        href
    };

    match Url::parse(&absolute) {
        Ok(url) => url
            .query_pairs()
            .find(|(key, _)| key == "uddg")
            .map(|(_, target)| target.into_owned())
            .unwrap_or(absolute),
        Err(_) => absolute,
    }
}

fn strip_tags(fragment: &str) -> String {
    let mut text = String::with_capacity(fragment.len());
    let mut in_tag = false;
    for ch in fragment.chars() {
        match ch {
            '<' => in_tag = true,
            '>' => in_tag = false,
            _ if !in_tag => text.push(ch),
            _ => {}
        }
    }
    text
}

fn html_decode(s: &str) -> String {
    s.replace("&amp;", "&")
        .replace("&lt;", "<")
        .replace("&gt;", ">")
        .replace("&quot;", "\"")
        .replace("&#x27;", "'")
        .replace("&#39;", "'")
        .replace("&nbsp;", " ")
}
