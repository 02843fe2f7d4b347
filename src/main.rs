//! sitewatch - watch web resources and notify on threshold crossings.

use anyhow::Result;
use clap::Parser;
use log::{error, info};
use sitewatch::{
    cli::Cli,
    config::{self, Config},
    core::ResourceTable,
    notification::NotifierRegistry,
    pipeline::{Pipeline, PipelineConfig},
    scrape::ScraperRegistry,
};
use std::sync::Arc;

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Load configuration by layering sources: defaults, file, environment,
    // and CLI args.
    let config = Config::load(cli).unwrap_or_else(|err| {
        // Manually initialize the logger for this specific error.
        env_logger::init();
        error!("Failed to load configuration: {}", err);
        std::process::exit(1);
    });

    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(&config.log_level))
        .init();

    info!("sitewatch starting up...");
    info!("-------------------- Configuration --------------------");
    info!("Log Level: {}", config.log_level);
    info!("Concurrency: {}", config.concurrency);
    info!("Queue Capacity: {}", config.queue_capacity);
    info!("Resources File: {}", config.resources_file.display());
    info!("Subscriptions File: {}", config.subscriptions_file.display());
    info!("-------------------------------------------------------");

    let resources = config::load_resources(&config.resources_file)?;
    let subscriptions = config::load_subscriptions(&config.subscriptions_file)?;
    info!(
        "loaded {} resources and {} subscriptions",
        resources.len(),
        subscriptions.len()
    );

    let table = ResourceTable::new(resources);
    let scrapers = Arc::new(ScraperRegistry::with_defaults()?);
    let notifiers = Arc::new(NotifierRegistry::with_defaults());
    let pipeline = Pipeline::new(
        scrapers,
        notifiers,
        PipelineConfig {
            worker_count: config.concurrency,
            queue_capacity: config.queue_capacity,
        },
    );

    let report = pipeline.run(&table, subscriptions).await?;
    info!(
        "run complete: {} dispatched, {} processed, {} notified, {} failed",
        report.dispatched, report.processed, report.notified, report.failed
    );

    Ok(())
}
