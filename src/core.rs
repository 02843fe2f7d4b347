//! Core domain types and service traits for sitewatch
//!
//! This module defines the fundamental data structures and trait contracts
//! that govern component interactions throughout the application.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::sync::Arc;
use thiserror::Error;

/// The declarative extraction rule attached to a [`Resource`].
///
/// `kind`, `threshold` and `frequency` are carried through from the record
/// files but not interpreted by the pipeline (reserved fields).
#[derive(Debug, Clone, Deserialize, Serialize, Default, PartialEq)]
pub struct Selector {
    /// The extraction path: a dotted JSON path for the `json` backend,
    /// a CSS selector for the `html` backend.
    #[serde(default)]
    pub value: String,
    #[serde(default, rename = "type")]
    pub kind: String,
    #[serde(default)]
    pub threshold: String,
    #[serde(default)]
    pub frequency: String,
}

/// A monitored web resource: a URL plus how to extract a value from it.
#[derive(Debug, Clone, Deserialize, Serialize, Default, PartialEq)]
pub struct Resource {
    pub id: String,
    #[serde(default)]
    pub name: String,
    pub url: String,
    #[serde(default)]
    pub selector: Selector,
    /// Extraction backend kind (`json` or `html` out of the box). Used to
    /// select a scraper from the registry; an unknown kind fails at
    /// execution time, never silently.
    pub scraping_type: String,
    /// Optional sub-key applied by the JSON backend before the selector
    /// path, for drilling into nested payloads.
    #[serde(default)]
    pub json_key: String,
    /// Reserved: render the page in a real browser before extraction.
    /// No current backend honors this.
    #[serde(default)]
    pub real_browser: bool,
}

/// A watcher binding a [`Resource`] to a threshold and a notification channel.
#[derive(Debug, Clone, Deserialize, Serialize, Default, PartialEq)]
pub struct Subscription {
    pub id: String,
    /// Identity of the monitored [`Resource`].
    pub website_id: String,
    /// Threshold expression (`<op> <literal>`). Empty means no threshold
    /// check is performed for this subscription.
    #[serde(default)]
    pub threshold: String,
    /// Recurrence hint. Carried but not interpreted by the pipeline.
    #[serde(default)]
    pub frequency: String,
    #[serde(default)]
    pub notification: NotificationSetting,
}

/// How a subscription wants to be notified.
#[derive(Debug, Clone, Deserialize, Serialize, Default, PartialEq)]
pub struct NotificationSetting {
    /// Channel kind: `""` (none), `console` or `email`.
    #[serde(default, rename = "type")]
    pub kind: String,
    #[serde(default)]
    pub address: String,
}

/// Read-only lookup table of resources, keyed by identity.
#[derive(Debug, Clone, Default)]
pub struct ResourceTable {
    by_id: HashMap<String, Arc<Resource>>,
}

impl ResourceTable {
    pub fn new(resources: impl IntoIterator<Item = Resource>) -> Self {
        Self {
            by_id: resources
                .into_iter()
                .map(|r| (r.id.clone(), Arc::new(r)))
                .collect(),
        }
    }

    /// Looks up a resource by identity. A missing identity is a
    /// configuration error surfaced by the caller, not papered over with
    /// an empty placeholder resource.
    pub fn get(&self, id: &str) -> Option<Arc<Resource>> {
        self.by_id.get(id).cloned()
    }

    pub fn len(&self) -> usize {
        self.by_id.len()
    }

    pub fn is_empty(&self) -> bool {
        self.by_id.is_empty()
    }
}

/// Errors produced while executing one unit of scrape work.
#[derive(Error, Debug)]
pub enum ScrapeError {
    /// Network or transport failure, including request construction.
    #[error("request failed: {0}")]
    Fetch(String),
    /// The server answered with a non-2xx status.
    #[error("status code error: {0}")]
    HttpStatus(u16),
    /// The response body could not be parsed, or the selector is invalid.
    #[error("extraction failed: {0}")]
    Extraction(String),
    /// The resource names a backend kind with no registered scraper.
    #[error("no scraper registered for backend kind `{0}`")]
    UnsupportedBackend(String),
    /// The subscription references a resource identity that does not exist.
    #[error("subscription `{0}` references unknown resource `{1}`")]
    UnknownResource(String, String),
}

impl From<reqwest::Error> for ScrapeError {
    fn from(err: reqwest::Error) -> Self {
        ScrapeError::Fetch(err.to_string())
    }
}

// =============================================================================
// Service Traits
// =============================================================================

/// Extracts a string value from a monitored resource.
///
/// Implementations perform one bounded-timeout fetch and apply the
/// resource's selector. A selector that matches nothing yields an empty
/// string, not an error.
#[async_trait]
pub trait Scraper: Send + Sync {
    async fn scrape(&self, resource: &Resource) -> Result<String, ScrapeError>;
}

/// Delivers a notification message over some channel.
#[async_trait]
pub trait Notifier: Send + Sync {
    /// A unique, descriptive name for the channel (e.g., "console",
    /// "email"). Used for logging.
    fn name(&self) -> &str;

    /// Delivers the message, returning the number of bytes written.
    ///
    /// The pipeline imposes no timeout here; slow channels must bound
    /// their own delivery time internally.
    async fn deliver(&self, message: &str) -> anyhow::Result<usize>;
}

/// One unit of dispatched scrape work: a subscription joined with its
/// resolved resource and scraper. Consumed exactly once by exactly one
/// worker.
pub struct WorkItem {
    pub subscription: Arc<Subscription>,
    pub notifier: Option<Arc<dyn Notifier>>,
    /// The resolved scrape target, or the resolution error the worker will
    /// surface as a failure outcome. Dispatch never drops a subscription
    /// silently.
    pub target: Result<(Arc<Resource>, Arc<dyn Scraper>), ScrapeError>,
}

/// The result of executing one [`WorkItem`]. Exactly one outcome is
/// produced per dispatched item.
pub struct Outcome {
    pub subscription: Arc<Subscription>,
    pub notifier: Option<Arc<dyn Notifier>>,
    pub result: Result<(Arc<Resource>, String), ScrapeError>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use figment::providers::{Format, Toml};
    use figment::Figment;

    fn resource(id: &str) -> Resource {
        Resource {
            id: id.to_string(),
            name: format!("Resource {id}"),
            url: format!("http://example.com/{id}"),
            scraping_type: "json".to_string(),
            ..Default::default()
        }
    }

    #[test]
    fn resource_table_lookup_hit_and_miss() {
        let table = ResourceTable::new(vec![resource("a"), resource("b")]);
        assert_eq!(table.len(), 2);
        assert_eq!(table.get("a").unwrap().name, "Resource a");
        assert!(table.get("missing").is_none());
    }

    #[test]
    fn resource_record_deserializes_from_toml() {
        let raw = r#"
            id = "btc"
            name = "Bitcoin price"
            url = "https://api.example.com/price"
            scraping_type = "json"
            json_key = "data"

            [selector]
            value = "quote.usd"
        "#;
        let r: Resource = Figment::new().merge(Toml::string(raw)).extract().unwrap();
        assert_eq!(r.id, "btc");
        assert_eq!(r.selector.value, "quote.usd");
        assert_eq!(r.json_key, "data");
        assert!(!r.real_browser);
    }

    #[test]
    fn subscription_record_defaults_optional_fields() {
        let raw = r#"
            id = "sub-1"
            website_id = "btc"

            [notification]
            type = "email"
            address = "ops@example.com"
        "#;
        let s: Subscription = Figment::new().merge(Toml::string(raw)).extract().unwrap();
        assert_eq!(s.threshold, "");
        assert_eq!(s.frequency, "");
        assert_eq!(s.notification.kind, "email");
        assert_eq!(s.notification.address, "ops@example.com");
    }
}
