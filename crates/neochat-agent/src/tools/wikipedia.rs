//! Wikipedia summary tool — REST `page/summary` lookup.

use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use serde_json::{json, Value};
use tracing::debug;

use neochat_core::config::schema::WikipediaToolConfig;

use super::base::{require_string, Tool, ToolArgs};
use super::name::ToolName;
use super::USER_AGENT;

const SUMMARY_UNAVAILABLE: &str = "No summary available.";
const SUMMARY_ERROR: &str = "Error fetching summary.";

#[derive(Debug, Deserialize)]
struct SummaryResponse {
    extract: Option<String>,
    content_urls: Option<ContentUrls>,
}

#[derive(Debug, Deserialize)]
struct ContentUrls {
    desktop: Option<PageUrl>,
}

#[derive(Debug, Deserialize)]
struct PageUrl {
    page: Option<String>,
}

/// Fetches the lead summary of a Wikipedia article.
///
/// Never fails: lookup errors produce an error-flagged payload.
pub struct WikipediaSummaryTool {
    client: Client,
    api_base: String,
}

impl WikipediaSummaryTool {
    pub fn new(config: &WikipediaToolConfig) -> Self {
        Self {
            client: Client::builder()
                .user_agent(USER_AGENT)
                .timeout(std::time::Duration::from_secs(15))
                .build()
                .unwrap_or_default(),
            api_base: config.api_base.trim_end_matches('/').to_string(),
        }
    }

    fn summary_url(&self, topic: &str) -> String {
        let title = topic.trim().replace(' ', "_");
        format!("{}/page/summary/{}", self.api_base, urlencoding::encode(&title))
    }

    async fn fetch(&self, topic: &str) -> anyhow::Result<(String, String)> {
        let resp = self
            .client
            .get(self.summary_url(topic))
            .send()
            .await?
            .error_for_status()?;
        let body: SummaryResponse = resp.json().await?;

        let summary = body
            .extract
            .filter(|s| !s.is_empty())
            .unwrap_or_else(|| SUMMARY_UNAVAILABLE.to_string());
        let url = body
            .content_urls
            .and_then(|u| u.desktop)
            .and_then(|d| d.page)
            .unwrap_or_default();
        Ok((summary, url))
    }
}

#[async_trait]
impl Tool for WikipediaSummaryTool {
    fn name(&self) -> ToolName {
        ToolName::FetchWikipediaSummary
    }

    fn description(&self) -> &str {
        "Fetch a summary of a topic from Wikipedia."
    }

    fn parameters(&self) -> Value {
        json!({
            "type": "object",
            "properties": {
                "topic": {
                    "type": "string",
                    "description": "The topic to fetch."
                }
            },
            "required": ["topic"],
            "additionalProperties": false
        })
    }

    async fn execute(&self, args: ToolArgs) -> anyhow::Result<Value> {
        let topic = require_string(&args, "topic")?;
        debug!(topic = %topic, "fetching wikipedia summary");

        let (summary, url) = match self.fetch(&topic).await {
            Ok(found) => found,
            Err(e) => {
                debug!(topic = %topic, error = %e, "wikipedia lookup failed");
                (SUMMARY_ERROR.to_string(), String::new())
            }
        };

        Ok(json!({ "topic": topic, "summary": summary, "url": url }))
    }
}
