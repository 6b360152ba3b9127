//! User-visible notifications.
//!
//! Notifications are fire-and-forget toasts: no return value, no delivery
//! ordering guarantee relative to remote calls. Session operations take the
//! seam as `Arc<dyn Notifier>` so tests can record what was emitted.

use async_trait::async_trait;
use atrium_core::NotifyConfig;
use std::sync::{Arc, RwLock};

/// Fire-and-forget user-visible notification sink.
#[async_trait]
pub trait Notifier: Send + Sync {
    /// Emit one notification with a short title and a longer description.
    async fn notify(&self, title: &str, description: &str);
}

/// Notifier that forwards to the tracing pipeline.
pub struct TraceNotifier;

#[async_trait]
impl Notifier for TraceNotifier {
    async fn notify(&self, title: &str, description: &str) {
        tracing::info!(title, description, "notification");
    }
}

/// Notifier that drops everything (notifications disabled).
pub struct NullNotifier;

#[async_trait]
impl Notifier for NullNotifier {
    async fn notify(&self, _title: &str, _description: &str) {}
}

/// Notifier that records messages in memory. Used by tests.
#[derive(Default)]
pub struct MemoryNotifier {
    messages: RwLock<Vec<(String, String)>>,
}

impl MemoryNotifier {
    pub fn new() -> Self {
        Self::default()
    }

    /// All notifications emitted so far, in order.
    pub fn messages(&self) -> Vec<(String, String)> {
        self.messages.read().map(|m| m.clone()).unwrap_or_default()
    }

    /// Titles only, in emission order.
    pub fn titles(&self) -> Vec<String> {
        self.messages()
            .into_iter()
            .map(|(title, _)| title)
            .collect()
    }
}

#[async_trait]
impl Notifier for MemoryNotifier {
    async fn notify(&self, title: &str, description: &str) {
        if let Ok(mut messages) = self.messages.write() {
            messages.push((title.to_string(), description.to_string()));
        }
    }
}

/// Build a notifier from configuration.
pub fn from_config(config: &NotifyConfig) -> Arc<dyn Notifier> {
    if config.enabled {
        Arc::new(TraceNotifier)
    } else {
        Arc::new(NullNotifier)
    }
}
