//! Web tools — search (DuckDuckGo HTML endpoint) and browse (HTTP fetch with
//! text extraction).

use std::sync::LazyLock;
use std::time::Duration;

use async_trait::async_trait;
use regex::Regex;
use reqwest::Client;
use serde_json::{json, Value};
use tracing::{debug, warn};

use neochat_core::config::schema::{SearchToolConfig, WebToolConfig};
use neochat_core::utils::truncate_string;

use super::base::{optional_u64, require_string, Tool, ToolArgs};
use super::name::ToolName;
use super::USER_AGENT;

/// Upper bound for a caller-supplied fetch timeout (seconds).
const MAX_FETCH_TIMEOUT: u64 = 120;

/// Upper bound for `num_results`.
const MAX_SEARCH_RESULTS: u64 = 20;

// ─────────────────────────────────────────────
// BrowseWebTool
// ─────────────────────────────────────────────

/// Fetches a URL and returns its content as text.
pub struct BrowseWebTool {
    client: Client,
    default_timeout: u64,
    max_chars: usize,
}

impl BrowseWebTool {
    pub fn new(config: &WebToolConfig) -> Self {
        Self {
            client: Client::builder()
                .user_agent(USER_AGENT)
                .redirect(reqwest::redirect::Policy::limited(5))
                .build()
                .unwrap_or_default(),
            default_timeout: config.fetch_timeout.max(1),
            max_chars: config.max_chars,
        }
    }

    fn failure(url: &str, content: String, status_code: Option<u16>) -> Value {
        json!({
            "url": url,
            "content": content,
            "status_code": status_code,
            "success": false,
        })
    }
}

#[async_trait]
impl Tool for BrowseWebTool {
    fn name(&self) -> ToolName {
        ToolName::BrowseWeb
    }

    fn description(&self) -> &str {
        "Fetch content from a web page, open links or execute api requests."
    }

    fn parameters(&self) -> Value {
        json!({
            "type": "object",
            "properties": {
                "url": {
                    "type": "string",
                    "description": "The URL to fetch"
                },
                "timeout": {
                    "type": "integer",
                    "description": "Request timeout in seconds",
                    "minimum": 1
                }
            },
            "required": ["url"],
            "additionalProperties": false
        })
    }

    async fn execute(&self, args: ToolArgs) -> anyhow::Result<Value> {
        let url = require_string(&args, "url")?;
        let timeout_secs = optional_u64(&args, "timeout")
            .unwrap_or(self.default_timeout)
            .clamp(1, MAX_FETCH_TIMEOUT);

        if !url.starts_with("http://") && !url.starts_with("https://") {
            return Ok(Self::failure(
                &url,
                "Invalid URL: must start with http:// or https://".into(),
                None,
            ));
        }

        debug!(url = %url, timeout_secs, "fetching web page");

        let resp = match self
            .client
            .get(&url)
            .timeout(Duration::from_secs(timeout_secs))
            .send()
            .await
        {
            Ok(resp) => resp,
            Err(e) if e.is_timeout() => {
                warn!(url = %url, "web fetch timed out");
                return Ok(Self::failure(
                    &url,
                    format!("Request timed out after {timeout_secs} seconds"),
                    None,
                ));
            }
            Err(e) => {
                warn!(url = %url, error = %e, "web fetch failed");
                return Ok(Self::failure(&url, e.to_string(), None));
            }
        };

        let status = resp.status().as_u16();
        let resp = match resp.error_for_status() {
            Ok(resp) => resp,
            Err(e) => return Ok(Self::failure(&url, e.to_string(), Some(status))),
        };

        let content_type = resp
            .headers()
            .get("content-type")
            .and_then(|v| v.to_str().ok())
            .unwrap_or("")
            .to_string();

        let body = match resp.text().await {
            Ok(body) => body,
            Err(e) => {
                let content = if e.is_timeout() {
                    format!("Request timed out after {timeout_secs} seconds")
                } else {
                    format!("Failed to read response body: {e}")
                };
                return Ok(Self::failure(&url, content, Some(status)));
            }
        };

        let text = if content_type.contains("json") {
            match serde_json::from_str::<Value>(&body) {
                Ok(v) => serde_json::to_string_pretty(&v).unwrap_or(body),
                Err(_) => body,
            }
        } else if content_type.contains("html") || body.trim_start().starts_with('<') {
            strip_html_tags(&body)
        } else {
            body
        };

        Ok(json!({
            "url": url,
            "content": truncate_string(&text, self.max_chars),
            "status_code": status,
            "success": true,
        }))
    }
}

// ─────────────────────────────────────────────
// SearchWebTool (DuckDuckGo)
// ─────────────────────────────────────────────

/// Searches the web through DuckDuckGo's HTML endpoint. No API key needed.
pub struct SearchWebTool {
    client: Client,
    endpoint: String,
    max_results: u64,
}

impl SearchWebTool {
    pub fn new(config: &SearchToolConfig) -> Self {
        Self {
            client: Client::builder()
                .user_agent(USER_AGENT)
                .timeout(Duration::from_secs(15))
                .build()
                .unwrap_or_default(),
            endpoint: config.endpoint.clone(),
            max_results: u64::from(config.max_results).clamp(1, MAX_SEARCH_RESULTS),
        }
    }

    async fn search(&self, query: &str, limit: usize) -> anyhow::Result<Vec<Value>> {
        let url = format!("{}?q={}", self.endpoint, urlencoding::encode(query));
        let html = self
            .client
            .get(&url)
            .send()
            .await?
            .error_for_status()?
            .text()
            .await?;
        Ok(extract_results(&html, limit))
    }
}

#[async_trait]
impl Tool for SearchWebTool {
    fn name(&self) -> ToolName {
        ToolName::SearchWeb
    }

    fn description(&self) -> &str {
        "Search the web using a search engine. \
         Use this tool for all tasks that require searching the web. \
         Examples are: finding information, news, articles, websites, etc."
    }

    fn parameters(&self) -> Value {
        json!({
            "type": "object",
            "properties": {
                "query": {
                    "type": "string",
                    "description": "The search query"
                },
                "num_results": {
                    "type": "integer",
                    "description": "Number of results to return (1-20)",
                    "minimum": 1,
                    "maximum": MAX_SEARCH_RESULTS
                }
            },
            "required": ["query"],
            "additionalProperties": false
        })
    }

    async fn execute(&self, args: ToolArgs) -> anyhow::Result<Value> {
        let query = require_string(&args, "query")?;
        let limit = optional_u64(&args, "num_results")
            .unwrap_or(self.max_results)
            .clamp(1, MAX_SEARCH_RESULTS) as usize;

        debug!(query = %query, limit, "searching web");

        match self.search(&query, limit).await {
            Ok(results) => Ok(json!({
                "query": query,
                "results": results,
                "success": true,
            })),
            Err(e) => {
                warn!(query = %query, error = %e, "web search failed");
                Ok(json!({
                    "query": query,
                    "results": [],
                    "success": false,
                    "error": e.to_string(),
                }))
            }
        }
    }
}

static ANCHOR_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"(?s)<a([^>]*class="result__a"[^>]*)>(.*?)</a>"#).expect("valid anchor regex")
});
static HREF_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r#"href="([^"]*)""#).expect("valid href regex"));
static SNIPPET_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"(?s)class="result__snippet"[^>]*>(.*?)</(?:a|div|td)>"#)
        .expect("valid snippet regex")
});

/// Pull `{title, href, body}` records out of a DuckDuckGo results page.
fn extract_results(html: &str, limit: usize) -> Vec<Value> {
    let mut results = Vec::new();
    for chunk in html.split("result__body").skip(1) {
        if results.len() >= limit {
            break;
        }

        let Some(anchor) = ANCHOR_RE.captures(chunk) else {
            continue;
        };
        let title = strip_html_tags(&anchor[2]);
        if title.is_empty() {
            continue;
        }
        let href = HREF_RE
            .captures(&anchor[1])
            .map(|c| resolve_result_href(&c[1]))
            .unwrap_or_default();
        let body = SNIPPET_RE
            .captures(chunk)
            .map(|c| strip_html_tags(&c[1]))
            .unwrap_or_default();

        results.push(json!({ "title": title, "href": href, "body": body }));
    }

    results
}

/// Result links point at a redirector carrying the target in `uddg=`.
fn resolve_result_href(raw: &str) -> String {
    let href = decode_entities(raw);
    if let Some((_, rest)) = href.split_once("uddg=") {
        let target = rest.split('&').next().unwrap_or(rest);
        if let Ok(decoded) = urlencoding::decode(target) {
            return decoded.into_owned();
        }
    }
    if href.starts_with("//") {
        format!("https:{href}")
    } else {
        href
    }
}

// ─────────────────────────────────────────────
// HTML helpers
// ─────────────────────────────────────────────

fn decode_entities(s: &str) -> String {
    s.replace("&amp;", "&")
        .replace("&lt;", "<")
        .replace("&gt;", ">")
        .replace("&quot;", "\"")
        .replace("&#39;", "'")
        .replace("&#x27;", "'")
        .replace("&nbsp;", " ")
}

/// Remove HTML tags, scripts, and styles, then collapse whitespace.
fn strip_html_tags(html: &str) -> String {
    let mut result = String::with_capacity(html.len());
    let mut in_tag = false;
    let mut in_script = false;
    let mut in_style = false;
    let mut tag_name = String::new();
    let mut collecting_tag_name = false;

    for ch in html.chars() {
        if ch == '<' {
            in_tag = true;
            collecting_tag_name = true;
            tag_name.clear();
            continue;
        }
        if ch == '>' {
            in_tag = false;
            collecting_tag_name = false;
            match tag_name.to_lowercase().as_str() {
                "script" => in_script = true,
                "/script" => in_script = false,
                "style" => in_style = true,
                "/style" => in_style = false,
                "br" | "br/" | "p" | "/p" | "div" | "/div" | "li" | "/li" | "tr" => {
                    result.push('\n')
                }
                _ => {}
            }
            continue;
        }
        if in_tag {
            if collecting_tag_name && (ch.is_alphanumeric() || ch == '/') {
                tag_name.push(ch);
            } else {
                collecting_tag_name = false;
            }
            continue;
        }
        if in_script || in_style {
            continue;
        }
        result.push(ch);
    }

    let result = decode_entities(&result);

    // Collapse runs of spaces, then runs of newlines
    let mut collapsed = String::with_capacity(result.len());
    let mut prev_space = false;
    let mut prev_newline = false;
    for c in result.chars() {
        if c == '\n' {
            if !prev_newline {
                let trimmed_len = collapsed.trim_end_matches(' ').len();
                collapsed.truncate(trimmed_len);
                collapsed.push('\n');
            }
            prev_newline = true;
            prev_space = false;
        } else if c.is_whitespace() {
            if !prev_space && !prev_newline {
                collapsed.push(' ');
            }
            prev_space = true;
        } else {
            collapsed.push(c);
            prev_space = false;
            prev_newline = false;
        }
    }

    collapsed.trim().to_string()
}

// ─────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────
