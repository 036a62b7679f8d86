use crate::logging::{LogEvent, LogFields, LogLevel};
use serde::Serialize;
use serde_json::json;

/// Counters accumulated by a [`crate::SessionRouter`] across its lifetime.
#[derive(Debug, Default, Clone)]
pub struct RouterMetrics {
    transitions: u64,
    attaches: u64,
    detaches: u64,
    presents: u64,
    dismisses: u64,
    plugin_failures: u64,
}

impl RouterMetrics {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record_transition(&mut self) {
        self.transitions = self.transitions.saturating_add(1);
    }

    pub fn record_attach(&mut self) {
        self.attaches = self.attaches.saturating_add(1);
    }

    pub fn record_detach(&mut self) {
        self.detaches = self.detaches.saturating_add(1);
    }

    pub fn record_present(&mut self) {
        self.presents = self.presents.saturating_add(1);
    }

    pub fn record_dismiss(&mut self) {
        self.dismisses = self.dismisses.saturating_add(1);
    }

    pub fn record_plugin_failure(&mut self) {
        self.plugin_failures = self.plugin_failures.saturating_add(1);
    }

    /// Attached children not yet detached. Never exceeds one.
    pub fn live_children(&self) -> u64 {
        self.attaches.saturating_sub(self.detaches)
    }

    pub fn snapshot(&self) -> MetricSnapshot {
        MetricSnapshot {
            transitions: self.transitions,
            attaches: self.attaches,
            detaches: self.detaches,
            presents: self.presents,
            dismisses: self.dismisses,
            plugin_failures: self.plugin_failures,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MetricSnapshot {
    pub transitions: u64,
    pub attaches: u64,
    pub detaches: u64,
    pub presents: u64,
    pub dismisses: u64,
    pub plugin_failures: u64,
}

impl MetricSnapshot {
    pub fn as_fields(&self) -> LogFields {
        let mut map = LogFields::new();
        map.insert("transitions".to_string(), json!(self.transitions));
        map.insert("attaches".to_string(), json!(self.attaches));
        map.insert("detaches".to_string(), json!(self.detaches));
        map.insert("presents".to_string(), json!(self.presents));
        map.insert("dismisses".to_string(), json!(self.dismisses));
        map.insert("plugin_failures".to_string(), json!(self.plugin_failures));
        map
    }

    pub fn to_log_event(&self, target: &str) -> LogEvent {
        LogEvent::with_fields(LogLevel::Info, target, "router_metrics", self.as_fields())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn snapshot_reflects_counters() {
        let mut metrics = RouterMetrics::new();
        metrics.record_attach();
        metrics.record_present();
        metrics.record_dismiss();
        metrics.record_detach();
        metrics.record_attach();
        metrics.record_plugin_failure();

        let snapshot = metrics.snapshot();
        assert_eq!(snapshot.attaches, 2);
        assert_eq!(snapshot.detaches, 1);
        assert_eq!(snapshot.plugin_failures, 1);
        assert_eq!(metrics.live_children(), 1);

        let event = snapshot.to_log_event("room::router.metrics");
        assert_eq!(event.message, "router_metrics");
        assert_eq!(event.field("attaches"), Some(&json!(2)));
    }
}
