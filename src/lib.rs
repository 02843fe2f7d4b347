//! sitewatch - a threshold watcher for web resources
//!
//! This library fetches a set of monitored resources concurrently,
//! extracts a value from each via a declarative selector, and notifies
//! subscribers when the value crosses a configured threshold.

pub mod cli;
pub mod config;
pub mod core;
pub mod notification;
pub mod pipeline;
pub mod processor;
pub mod scrape;
pub mod threshold;

// Re-export core types for convenience
pub use crate::core::*;
