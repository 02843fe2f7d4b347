//! Command-Line Interface (CLI) argument parsing.
//!
//! Defines the command-line arguments using `clap`. The parsed arguments
//! are merged on top of the `sitewatch.toml` file and environment
//! variables via the `figment::Provider` implementation below.

use clap::Parser;
use figment::{
    value::{Dict, Map, Value},
    Error, Metadata, Profile, Provider,
};
use std::path::PathBuf;

/// Watches web resources and notifies subscribers when an extracted value
/// crosses a threshold.
#[derive(Parser, Debug, Default)]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Path to the TOML configuration file.
    #[arg(short, long, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Path to the monitored-resource record file.
    #[arg(long, value_name = "FILE")]
    pub resources: Option<PathBuf>,

    /// Path to the subscription record file.
    #[arg(long, value_name = "FILE")]
    pub subscriptions: Option<PathBuf>,

    /// Width of the scrape worker pool.
    #[arg(long, value_name = "N")]
    pub concurrency: Option<usize>,

    /// Logging level (error, warn, info, debug, trace).
    #[arg(long, value_name = "LEVEL")]
    pub log_level: Option<String>,
}

impl Provider for Cli {
    fn metadata(&self) -> Metadata {
        Metadata::named("Command-Line Arguments")
    }

    fn data(&self) -> Result<Map<Profile, Dict>, Error> {
        let mut dict = Dict::new();

        if let Some(path) = &self.resources {
            dict.insert(
                "resources_file".into(),
                Value::from(path.display().to_string()),
            );
        }

        if let Some(path) = &self.subscriptions {
            dict.insert(
                "subscriptions_file".into(),
                Value::from(path.display().to_string()),
            );
        }

        if let Some(concurrency) = self.concurrency {
            dict.insert("concurrency".into(), Value::from(concurrency as u64));
        }

        if let Some(level) = &self.log_level {
            dict.insert("log_level".into(), Value::from(level.clone()));
        }

        let mut map = Map::new();
        map.insert(Profile::Default, dict);
        Ok(map)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Config;

    #[test]
    fn cli_overrides_take_precedence() {
        let cli = Cli {
            concurrency: Some(16),
            log_level: Some("debug".to_string()),
            ..Default::default()
        };
        let config = Config::load(cli).unwrap();
        assert_eq!(config.concurrency, 16);
        assert_eq!(config.log_level, "debug");
    }

    #[test]
    fn defaults_apply_without_overrides() {
        let config = Config::load(Cli::default()).unwrap();
        assert_eq!(config.concurrency, 4);
        assert_eq!(config.queue_capacity, 100);
    }
}
