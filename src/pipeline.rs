//! The concurrent dispatch pipeline: one dispatcher, a fixed pool of
//! scrape workers, and a single collector, coordinated only through two
//! bounded queues and one outstanding-completion counter.
//!
//! Per run the pipeline moves through Idle -> Dispatching -> Draining ->
//! Complete. The work queue closes when the dispatcher drops its sender;
//! the outcome queue closes when the last worker drops its sender clone,
//! so the collector can never observe a write-after-close. The counter is
//! incremented before each enqueue and decremented by the collector after
//! each processed outcome, and must read zero once the collector drains.

use crate::core::{
    Outcome, Resource, ResourceTable, ScrapeError, Scraper, Subscription, WorkItem,
};
use crate::notification::NotifierRegistry;
use crate::processor::{self, Disposition};
use crate::scrape::ScraperRegistry;
use anyhow::{Context, Result};
use futures::future::join_all;
use log::{debug, error, info};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

/// Deployment parameters for one run.
#[derive(Debug, Clone)]
pub struct PipelineConfig {
    /// Width of the scrape worker pool. Must be at least 1.
    pub worker_count: usize,
    /// Capacity of the work and outcome queues.
    pub queue_capacity: usize,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            worker_count: 4,
            queue_capacity: 100,
        }
    }
}

/// Aggregated counts for one completed run.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RunReport {
    /// Work items enqueued, one per subscription.
    pub dispatched: usize,
    /// Outcomes drained by the collector.
    pub processed: usize,
    /// Outcomes whose threshold was reached.
    pub notified: usize,
    /// Outcomes that failed (scrape, threshold parse, or delivery).
    pub failed: usize,
    /// Value of the outstanding-completion counter after the join.
    /// Always zero when every dispatched item produced exactly one
    /// outcome.
    pub outstanding: usize,
}

pub struct Pipeline {
    scrapers: Arc<ScraperRegistry>,
    notifiers: Arc<NotifierRegistry>,
    config: PipelineConfig,
}

impl Pipeline {
    pub fn new(
        scrapers: Arc<ScraperRegistry>,
        notifiers: Arc<NotifierRegistry>,
        config: PipelineConfig,
    ) -> Self {
        Self {
            scrapers,
            notifiers,
            config,
        }
    }

    /// Executes one run over the given subscriptions and returns once
    /// every dispatched item has been fully processed.
    pub async fn run(
        &self,
        resources: &ResourceTable,
        subscriptions: Vec<Subscription>,
    ) -> Result<RunReport> {
        let capacity = self.config.queue_capacity.max(1);
        let (work_tx, work_rx) = async_channel::bounded::<WorkItem>(capacity);
        let (outcome_tx, outcome_rx) = async_channel::bounded::<Outcome>(capacity);
        let outstanding = Arc::new(AtomicUsize::new(0));

        let worker_count = self.config.worker_count.max(1);
        let mut worker_handles = Vec::with_capacity(worker_count);
        for worker_id in 0..worker_count {
            let work_rx = work_rx.clone();
            let outcome_tx = outcome_tx.clone();
            worker_handles.push(tokio::spawn(async move {
                debug!("scrape worker {worker_id} started");
                while let Ok(item) = work_rx.recv().await {
                    let outcome = execute(item).await;
                    if outcome_tx.send(outcome).await.is_err() {
                        error!("outcome queue closed early, worker {worker_id} stopping");
                        break;
                    }
                }
                debug!("scrape worker {worker_id} finished");
            }));
        }
        // The workers now hold the only outcome senders and the only work
        // receivers. The outcome queue closes exactly when the last worker
        // exits.
        drop(outcome_tx);
        drop(work_rx);

        let collector_outstanding = outstanding.clone();
        let collector = tokio::spawn(async move {
            let mut report = RunReport::default();
            while let Ok(outcome) = outcome_rx.recv().await {
                match processor::process(outcome).await {
                    Disposition::Notified => report.notified += 1,
                    Disposition::Failed => report.failed += 1,
                    Disposition::Silent => {}
                }
                report.processed += 1;
                collector_outstanding.fetch_sub(1, Ordering::AcqRel);
            }
            report
        });

        // Dispatching: one work item per subscription. The counter is
        // bumped before the enqueue so the collector cannot observe a
        // zero count while items are still being produced.
        let mut dispatched = 0;
        for subscription in subscriptions {
            let subscription = Arc::new(subscription);
            let notifier = self.notifiers.bind(&subscription.notification);
            let target = self.resolve_target(resources, &subscription);

            outstanding.fetch_add(1, Ordering::AcqRel);
            dispatched += 1;
            let item = WorkItem {
                subscription,
                notifier,
                target,
            };
            if work_tx.send(item).await.is_err() {
                // Workers are gone; nothing will drain this run.
                outstanding.fetch_sub(1, Ordering::AcqRel);
                dispatched -= 1;
                error!("work queue closed early, aborting dispatch");
                break;
            }
        }
        // Closing the work queue is the dispatcher's responsibility.
        drop(work_tx);
        info!("dispatched {dispatched} work items");

        // Draining: join the pool, then the collector.
        join_all(worker_handles).await;
        let mut report = collector.await.context("collector task panicked")?;
        report.dispatched = dispatched;
        report.outstanding = outstanding.load(Ordering::Acquire);
        if report.outstanding != 0 {
            error!(
                "{} work items never produced an outcome",
                report.outstanding
            );
        }
        Ok(report)
    }

    /// Resolves a subscription to its resource and scraper. Resolution
    /// errors are carried in the work item so the worker surfaces them as
    /// failure outcomes instead of the dispatcher skipping the item.
    fn resolve_target(
        &self,
        resources: &ResourceTable,
        subscription: &Subscription,
    ) -> Result<(Arc<Resource>, Arc<dyn Scraper>), ScrapeError> {
        let resource = resources.get(&subscription.website_id).ok_or_else(|| {
            ScrapeError::UnknownResource(
                subscription.id.clone(),
                subscription.website_id.clone(),
            )
        })?;
        let scraper = self
            .scrapers
            .select(&resource.scraping_type)
            .ok_or_else(|| ScrapeError::UnsupportedBackend(resource.scraping_type.clone()))?;
        Ok((resource, scraper))
    }
}

/// Executes one work item, always producing exactly one outcome. Scraper
/// failures are captured, never raised.
async fn execute(item: WorkItem) -> Outcome {
    let WorkItem {
        subscription,
        notifier,
        target,
    } = item;
    let result = match target {
        Ok((resource, scraper)) => scraper
            .scrape(&resource)
            .await
            .map(|value| (resource, value)),
        Err(e) => Err(e),
    };
    Outcome {
        subscription,
        notifier,
        result,
    }
}
