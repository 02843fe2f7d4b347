//! Result processing: threshold decision and notification routing.
//!
//! Called by the pipeline's single collector, so outcomes are processed
//! one at a time. Every error here is terminal for the outcome only --
//! a failed scrape or a malformed threshold expression is reported against
//! its subscription and never aborts the rest of the run.

use crate::core::Outcome;
use crate::threshold;
use log::{debug, error, info};

/// What the processor decided for one outcome. The pipeline aggregates
/// these into its run report.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Disposition {
    /// The scrape failed, the threshold expression was malformed, or
    /// delivery failed.
    Failed,
    /// Processed without a notification (no threshold configured, or the
    /// threshold was not reached).
    Silent,
    /// The threshold was reached and the notification went out.
    Notified,
}

/// Processes one completed outcome.
pub async fn process(outcome: Outcome) -> Disposition {
    let subscription = outcome.subscription;

    let (resource, value) = match outcome.result {
        Err(e) => {
            error!("subscription `{}`: scrape failed: {}", subscription.id, e);
            return Disposition::Failed;
        }
        Ok(pair) => pair,
    };

    // No threshold configured means nothing to check and nothing to send.
    if subscription.threshold.is_empty() {
        debug!(
            "subscription `{}`: no threshold configured, value `{}` observed",
            subscription.id, value
        );
        return Disposition::Silent;
    }

    let reached = match threshold::evaluate(&subscription.threshold, &value) {
        Ok(reached) => reached,
        Err(e) => {
            error!("subscription `{}`: {}", subscription.id, e);
            return Disposition::Failed;
        }
    };

    if !reached {
        debug!(
            "subscription `{}`: threshold `{}` not reached by `{}`",
            subscription.id, subscription.threshold, value
        );
        return Disposition::Silent;
    }

    match &outcome.notifier {
        Some(notifier) => {
            let message = format!(
                "{} reached the threshold. The new value is: {}.",
                resource.name, value
            );
            match notifier.deliver(&message).await {
                Ok(written) => {
                    debug!(
                        "subscription `{}`: delivered {} bytes via {}",
                        subscription.id,
                        written,
                        notifier.name()
                    );
                }
                Err(e) => {
                    error!(
                        "subscription `{}`: delivery via {} failed: {}",
                        subscription.id,
                        notifier.name(),
                        e
                    );
                    return Disposition::Failed;
                }
            }
        }
        None => info!("Threshold reached for {}", resource.name),
    }
    Disposition::Notified
}
