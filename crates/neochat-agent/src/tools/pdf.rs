//! PDF tool — download a PDF and extract its text.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde_json::{json, Value};
use tracing::{debug, warn};

use neochat_core::config::schema::PdfToolConfig;
use neochat_core::utils::truncate_string;

use super::base::{require_string, Tool, ToolArgs};
use super::name::ToolName;
use super::USER_AGENT;

/// Downloads a PDF over HTTP and returns the extracted text.
pub struct ParsePdfTool {
    client: Client,
    max_chars: usize,
}

impl ParsePdfTool {
    pub fn new(config: &PdfToolConfig) -> Self {
        Self {
            client: Client::builder()
                .user_agent(USER_AGENT)
                .timeout(Duration::from_secs(config.timeout.max(1)))
                .build()
                .unwrap_or_default(),
            max_chars: config.max_chars,
        }
    }

    async fn download_and_extract(&self, url: &str) -> anyhow::Result<String> {
        let bytes = self
            .client
            .get(url)
            .send()
            .await?
            .error_for_status()?
            .bytes()
            .await?;
        debug!(url = %url, size = bytes.len(), "downloaded pdf");

        // Extraction is CPU-bound and the parser may panic on malformed input.
        let text = tokio::task::spawn_blocking(move || pdf_extract::extract_text_from_mem(&bytes))
            .await
            .map_err(|e| anyhow::anyhow!("PDF extraction aborted: {e}"))?
            .map_err(|e| anyhow::anyhow!("{e}"))?;

        Ok(text.trim().to_string())
    }
}

#[async_trait]
impl Tool for ParsePdfTool {
    fn name(&self) -> ToolName {
        ToolName::ParseOnlinePdf
    }

    fn description(&self) -> &str {
        "Parse and extract text content from an online PDF file."
    }

    fn parameters(&self) -> Value {
        json!({
            "type": "object",
            "properties": {
                "url": {
                    "type": "string",
                    "description": "The URL of the PDF file to parse"
                }
            },
            "required": ["url"],
            "additionalProperties": false
        })
    }

    async fn execute(&self, args: ToolArgs) -> anyhow::Result<Value> {
        let url = require_string(&args, "url")?;

        match self.download_and_extract(&url).await {
            Ok(text) => Ok(json!({
                "url": url,
                "content": truncate_string(&text, self.max_chars),
                "success": true,
            })),
            Err(e) => {
                warn!(url = %url, error = %e, "pdf parsing failed");
                Ok(json!({
                    "url": url,
                    "content": format!("Error parsing PDF: {e}"),
                    "success": false,
                }))
            }
        }
    }
}
