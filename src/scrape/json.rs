//! JSON scraper backend.
//!
//! Fetches the resource URL with a short timeout and drills into the
//! response with a dotted path (`a.b.0.c` over objects and arrays). When
//! the resource carries a `json_key`, that path is applied first to peel
//! off an envelope; if the sub-tree turns out to be a JSON-encoded string
//! it is re-parsed, so nested payloads behave like plain ones.

use crate::core::{Resource, ScrapeError, Scraper};
use anyhow::Context;
use async_trait::async_trait;
use serde_json::Value;
use std::time::Duration;

/// Request budget for JSON endpoints. Conservative, non-retrying.
const REQUEST_TIMEOUT: Duration = Duration::from_secs(3);

pub struct JsonScraper {
    client: reqwest::Client,
}

impl JsonScraper {
    pub fn new() -> anyhow::Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()
            .context("failed to build HTTP client for JSON scraper")?;
        Ok(Self { client })
    }
}

#[async_trait]
impl Scraper for JsonScraper {
    async fn scrape(&self, resource: &Resource) -> Result<String, ScrapeError> {
        let body = super::fetch_body(&self.client, &resource.url).await?;
        let root: Value = serde_json::from_str(&body)
            .map_err(|e| ScrapeError::Extraction(format!("malformed JSON body: {e}")))?;

        let scope = if resource.json_key.is_empty() {
            root
        } else {
            reparse_if_embedded(lookup(&root, &resource.json_key))
        };

        Ok(render(lookup(&scope, &resource.selector.value)))
    }
}

/// Walks a dotted path through objects and arrays. A path segment that
/// matches nothing yields `Null`, which renders as the empty string
/// (indistinguishable from an observed empty value).
fn lookup(root: &Value, path: &str) -> Value {
    if path.is_empty() {
        return root.clone();
    }
    let mut current = root;
    for segment in path.split('.') {
        current = match current {
            Value::Object(map) => match map.get(segment) {
                Some(v) => v,
                None => return Value::Null,
            },
            Value::Array(items) => match segment.parse::<usize>().ok().and_then(|i| items.get(i)) {
                Some(v) => v,
                None => return Value::Null,
            },
            _ => return Value::Null,
        };
    }
    current.clone()
}

/// Some APIs wrap their payload in a JSON-encoded string field. If the
/// sub-key lands on such a string, parse it so the selector can keep
/// drilling; otherwise keep the value as-is.
fn reparse_if_embedded(value: Value) -> Value {
    match &value {
        Value::String(s) => serde_json::from_str(s).unwrap_or(value),
        _ => value,
    }
}

/// Renders an extracted value the way an untyped consumer expects:
/// strings unquoted, scalars via their display form, missing values as
/// the empty string, and composites as raw JSON.
fn render(value: Value) -> String {
    match value {
        Value::Null => String::new(),
        Value::String(s) => s,
        Value::Bool(b) => b.to_string(),
        Value::Number(n) => n.to_string(),
        composite => composite.to_string(),
    }
}
