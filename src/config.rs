//! Configuration management for sitewatch
//!
//! The main `Config` struct is loaded with `figment` by layering defaults,
//! a `sitewatch.toml` file, `SITEWATCH_`-prefixed environment variables
//! and command-line arguments. The monitored-record files
//! (`websites.toml`, `subscriptions.toml`) are decoded here too, into the
//! core `Resource` and `Subscription` records.

use crate::cli::Cli;
use crate::core::{Resource, Subscription};
use anyhow::{Context, Result};
use figment::{
    providers::{Env, Format, Serialized, Toml},
    Figment,
};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// The main configuration struct for the application.
#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct Config {
    /// The logging level for the application.
    pub log_level: String,
    /// Width of the scrape worker pool.
    pub concurrency: usize,
    /// Capacity of the work and outcome queues.
    pub queue_capacity: usize,
    /// Path to the monitored-resource record file.
    pub resources_file: PathBuf,
    /// Path to the subscription record file.
    pub subscriptions_file: PathBuf,
}

impl Config {
    /// Loads the configuration by layering sources: defaults, file,
    /// environment, and CLI arguments (highest precedence last).
    pub fn load(cli: Cli) -> Result<Self> {
        let config_path = cli
            .config
            .clone()
            .unwrap_or_else(|| PathBuf::from("sitewatch.toml"));
        let config: Config = Figment::new()
            .merge(Serialized::defaults(Config::default()))
            .merge(Toml::file(config_path))
            .merge(Env::prefixed("SITEWATCH_"))
            .merge(cli)
            .extract()?;
        Ok(config)
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
            concurrency: 4,
            queue_capacity: 100,
            resources_file: PathBuf::from("websites.toml"),
            subscriptions_file: PathBuf::from("subscriptions.toml"),
        }
    }
}

#[derive(Debug, Deserialize, Default)]
struct ResourceFile {
    #[serde(default)]
    website: Vec<Resource>,
}

#[derive(Debug, Deserialize, Default)]
struct SubscriptionFile {
    #[serde(default)]
    subscription: Vec<Subscription>,
}

/// Loads the monitored-resource records from a TOML file of `[[website]]`
/// tables.
pub fn load_resources(path: &Path) -> Result<Vec<Resource>> {
    let file: ResourceFile = Figment::new()
        .merge(Toml::file_exact(path))
        .extract()
        .with_context(|| format!("failed to load resources from {}", path.display()))?;
    Ok(file.website)
}

/// Loads the subscription records from a TOML file of `[[subscription]]`
/// tables.
pub fn load_subscriptions(path: &Path) -> Result<Vec<Subscription>> {
    let file: SubscriptionFile = Figment::new()
        .merge(Toml::file_exact(path))
        .extract()
        .with_context(|| format!("failed to load subscriptions from {}", path.display()))?;
    Ok(file.subscription)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn write_temp(content: &str) -> tempfile::NamedTempFile {
        let mut file = tempfile::Builder::new().suffix(".toml").tempfile().unwrap();
        write!(file, "{content}").unwrap();
        file
    }

    #[test]
    fn loads_resource_records() {
        let file = write_temp(
            r#"
            [[website]]
            id = "btc"
            name = "Bitcoin price"
            url = "https://api.example.com/price"
            scraping_type = "json"
            json_key = "data"
            [website.selector]
            value = "quote.usd"

            [[website]]
            id = "shop"
            name = "Widget shop"
            url = "https://shop.example.com"
            scraping_type = "html"
            [website.selector]
            value = ".price"
            "#,
        );

        let resources = load_resources(file.path()).unwrap();
        assert_eq!(resources.len(), 2);
        assert_eq!(resources[0].id, "btc");
        assert_eq!(resources[1].selector.value, ".price");
    }

    #[test]
    fn loads_subscription_records() {
        let file = write_temp(
            r#"
            [[subscription]]
            id = "sub-1"
            website_id = "btc"
            threshold = "> 50000"
            [subscription.notification]
            type = "console"
            "#,
        );

        let subscriptions = load_subscriptions(file.path()).unwrap();
        assert_eq!(subscriptions.len(), 1);
        assert_eq!(subscriptions[0].threshold, "> 50000");
        assert_eq!(subscriptions[0].notification.kind, "console");
    }

    #[test]
    fn empty_record_file_yields_no_records() {
        let file = write_temp("");
        assert!(load_resources(file.path()).unwrap().is_empty());
        assert!(load_subscriptions(file.path()).unwrap().is_empty());
    }

    #[test]
    fn missing_record_file_is_an_error() {
        let missing = Path::new("/nonexistent/records.toml");
        assert!(load_resources(missing).is_err());
    }
}
