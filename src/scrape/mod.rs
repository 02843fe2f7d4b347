//! Scraper backends and the registry that selects them.
//!
//! Backends are looked up by the resource's `scraping_type` tag, so new
//! extraction mechanisms can be registered without touching the pipeline.

pub mod html;
pub mod json;

use crate::core::Scraper;
use std::collections::HashMap;
use std::sync::Arc;

pub use html::HtmlScraper;
pub use json::JsonScraper;

/// Lookup table of scraper backends keyed on a kind tag.
#[derive(Default)]
pub struct ScraperRegistry {
    backends: HashMap<String, Arc<dyn Scraper>>,
}

impl ScraperRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds a registry with the built-in `json` and `html` backends.
    pub fn with_defaults() -> anyhow::Result<Self> {
        let mut registry = Self::new();
        registry.register("json", Arc::new(JsonScraper::new()?));
        registry.register("html", Arc::new(HtmlScraper::new()?));
        Ok(registry)
    }

    pub fn register(&mut self, kind: impl Into<String>, scraper: Arc<dyn Scraper>) {
        self.backends.insert(kind.into(), scraper);
    }

    /// Selects the backend for a kind tag. `None` for unregistered kinds;
    /// the dispatcher turns that into an `UnsupportedBackend` failure for
    /// the work item rather than skipping it.
    pub fn select(&self, kind: &str) -> Option<Arc<dyn Scraper>> {
        self.backends.get(kind).cloned()
    }
}

/// Fetches `url` and returns the response body, mapping non-2xx statuses
/// to `ScrapeError::HttpStatus`. Shared by both HTTP-backed scrapers.
pub(crate) async fn fetch_body(
    client: &reqwest::Client,
    url: &str,
) -> Result<String, crate::core::ScrapeError> {
    let response = client.get(url).send().await?;
    let status = response.status();
    if !status.is_success() {
        return Err(crate::core::ScrapeError::HttpStatus(status.as_u16()));
    }
    Ok(response.text().await?)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_registry_knows_builtin_backends() {
        let registry = ScraperRegistry::with_defaults().unwrap();
        assert!(registry.select("json").is_some());
        assert!(registry.select("html").is_some());
        assert!(registry.select("rss").is_none());
    }
}
