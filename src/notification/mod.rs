//! Notification channels.
//!
//! Channels implement the [`Notifier`](crate::core::Notifier) trait and
//! are bound to a subscription at most once, before dispatch, by looking
//! up the notification kind tag in a registry. New channels can be
//! registered without touching the pipeline.

pub mod console;
pub mod email;

use crate::core::{NotificationSetting, Notifier};
use std::collections::HashMap;
use std::sync::Arc;

pub use console::ConsoleNotifier;
pub use email::EmailNotifier;

type NotifierFactory = dyn Fn(&NotificationSetting) -> Arc<dyn Notifier> + Send + Sync;

/// Lookup table of notification channel factories keyed on a kind tag.
#[derive(Default)]
pub struct NotifierRegistry {
    factories: HashMap<String, Box<NotifierFactory>>,
}

impl NotifierRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds a registry with the built-in `console` and `email` channels.
    pub fn with_defaults() -> Self {
        let mut registry = Self::new();
        registry.register("console", |_| Arc::new(ConsoleNotifier));
        registry.register("email", |setting| {
            Arc::new(EmailNotifier::new(setting.address.clone()))
        });
        registry
    }

    pub fn register<F>(&mut self, kind: impl Into<String>, factory: F)
    where
        F: Fn(&NotificationSetting) -> Arc<dyn Notifier> + Send + Sync + 'static,
    {
        self.factories.insert(kind.into(), Box::new(factory));
    }

    /// Binds the notifier for a subscription's notification setting.
    ///
    /// An empty kind means the subscription wants no channel; an unknown
    /// kind is treated the same way (the result processor falls back to a
    /// local log line when the threshold is reached).
    pub fn bind(&self, setting: &NotificationSetting) -> Option<Arc<dyn Notifier>> {
        self.factories
            .get(&setting.kind)
            .map(|factory| factory(setting))
    }
}
