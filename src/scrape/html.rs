//! HTML scraper backend.
//!
//! Fetches the resource URL and applies the selector as a CSS query
//! against the parsed document, returning the concatenated text content
//! of every match. No matches yield an empty string, not an error.

use crate::core::{Resource, ScrapeError, Scraper};
use anyhow::Context;
use async_trait::async_trait;
use scraper::{Html, Selector};
use std::time::Duration;

/// Request budget for page fetches. Conservative, non-retrying.
const REQUEST_TIMEOUT: Duration = Duration::from_secs(5);

pub struct HtmlScraper {
    client: reqwest::Client,
}

impl HtmlScraper {
    pub fn new() -> anyhow::Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()
            .context("failed to build HTTP client for HTML scraper")?;
        Ok(Self { client })
    }
}

#[async_trait]
impl Scraper for HtmlScraper {
    async fn scrape(&self, resource: &Resource) -> Result<String, ScrapeError> {
        let body = super::fetch_body(&self.client, &resource.url).await?;
        // `Html` is not Send, so parsing and extraction stay inside a
        // synchronous helper and never live across an await point.
        extract_text(&body, &resource.selector.value)
    }
}

/// Parses the document and returns the concatenated text of all nodes
/// matching the CSS selector.
fn extract_text(body: &str, selector: &str) -> Result<String, ScrapeError> {
    let query = Selector::parse(selector)
        .map_err(|e| ScrapeError::Extraction(format!("invalid CSS selector `{selector}`: {e}")))?;
    let document = Html::parse_document(body);
    Ok(document
        .select(&query)
        .flat_map(|element| element.text())
        .collect())
}
