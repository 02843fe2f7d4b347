#![allow(dead_code)]
//! Shared test doubles for the integration tests.

use async_trait::async_trait;
use sitewatch::core::{Notifier, Resource, ScrapeError, Scraper, Subscription};
use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

/// A scraper that returns a fixed value and counts how many times each
/// resource was scraped.
#[derive(Clone, Default)]
pub struct SpyingScraper {
    pub value: String,
    pub counts: Arc<Mutex<HashMap<String, u32>>>,
}

impl SpyingScraper {
    pub fn returning(value: &str) -> Self {
        Self {
            value: value.to_string(),
            counts: Arc::default(),
        }
    }
}

#[async_trait]
impl Scraper for SpyingScraper {
    async fn scrape(&self, resource: &Resource) -> Result<String, ScrapeError> {
        let mut counts = self.counts.lock().unwrap();
        *counts.entry(resource.id.clone()).or_insert(0) += 1;
        Ok(self.value.clone())
    }
}

/// A scraper that always fails with a transport error.
pub struct FailingScraper;

#[async_trait]
impl Scraper for FailingScraper {
    async fn scrape(&self, _resource: &Resource) -> Result<String, ScrapeError> {
        Err(ScrapeError::Fetch("connection refused".to_string()))
    }
}

/// A notifier that records every delivered message and counts deliveries.
#[derive(Clone, Default)]
pub struct RecordingNotifier {
    pub messages: Arc<Mutex<Vec<String>>>,
    pub deliveries: Arc<AtomicUsize>,
}

impl RecordingNotifier {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn messages(&self) -> Vec<String> {
        self.messages.lock().unwrap().clone()
    }
}

#[async_trait]
impl Notifier for RecordingNotifier {
    fn name(&self) -> &str {
        "recording"
    }

    async fn deliver(&self, message: &str) -> anyhow::Result<usize> {
        self.messages.lock().unwrap().push(message.to_string());
        self.deliveries.fetch_add(1, Ordering::SeqCst);
        Ok(message.len())
    }
}

/// Builds a resource bound to the given backend kind.
pub fn resource(id: &str, kind: &str) -> Resource {
    Resource {
        id: id.to_string(),
        name: format!("Resource {id}"),
        url: format!("http://127.0.0.1/{id}"),
        scraping_type: kind.to_string(),
        ..Default::default()
    }
}

/// Builds a subscription watching `website_id` with the given threshold
/// and notification kind.
pub fn subscription(id: &str, website_id: &str, threshold: &str, kind: &str) -> Subscription {
    Subscription {
        id: id.to_string(),
        website_id: website_id.to_string(),
        threshold: threshold.to_string(),
        notification: sitewatch::core::NotificationSetting {
            kind: kind.to_string(),
            address: String::new(),
        },
        ..Default::default()
    }
}
