//! Router lifecycle audit hooks.
//!
//! Every attach, detach, present and dismiss the router performs is reported
//! as a [`RouterAuditEvent`], so hosts can trace transitions or assert on their
//! ordering without wrapping the collaborators themselves.

use std::time::SystemTime;

use serde_json::Value;

/// Distinct checkpoints emitted by `SessionRouter`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RouterAuditStage {
    /// The default screen was installed by `load`.
    RouterLoaded,
    /// A factory produced a new child.
    ChildBuilt,
    /// A child was installed into the session tree.
    ChildAttached,
    /// A child's view was handed to the surface.
    ViewPresented,
    /// A child's view was removed from the surface.
    ViewDismissed,
    /// A child was removed from the session tree.
    ChildDetached,
    /// A plugin route was ignored because the id did not resolve or build.
    PluginUnavailable,
    /// `cleanup_views` ran.
    ViewsCleaned,
    /// The router reached its terminal state.
    RouterTornDown,
}

impl RouterAuditStage {
    pub fn as_str(&self) -> &'static str {
        match self {
            RouterAuditStage::RouterLoaded => "router_loaded",
            RouterAuditStage::ChildBuilt => "child_built",
            RouterAuditStage::ChildAttached => "child_attached",
            RouterAuditStage::ViewPresented => "view_presented",
            RouterAuditStage::ViewDismissed => "view_dismissed",
            RouterAuditStage::ChildDetached => "child_detached",
            RouterAuditStage::PluginUnavailable => "plugin_unavailable",
            RouterAuditStage::ViewsCleaned => "views_cleaned",
            RouterAuditStage::RouterTornDown => "router_torn_down",
        }
    }
}

/// Structured audit entry.
#[derive(Debug, Clone)]
pub struct RouterAuditEvent {
    pub timestamp: SystemTime,
    pub stage: RouterAuditStage,
    pub details: Vec<(String, Value)>,
}

impl RouterAuditEvent {
    fn new(stage: RouterAuditStage) -> Self {
        Self {
            timestamp: SystemTime::now(),
            stage,
            details: Vec::new(),
        }
    }

    pub fn detail(&self, key: &str) -> Option<&Value> {
        self.details
            .iter()
            .find(|(name, _)| name == key)
            .map(|(_, value)| value)
    }
}

/// Builder helper to append fields ergonomically.
pub struct RouterAuditEventBuilder {
    event: RouterAuditEvent,
}

impl RouterAuditEventBuilder {
    pub fn new(stage: RouterAuditStage) -> Self {
        Self {
            event: RouterAuditEvent::new(stage),
        }
    }

    pub fn detail(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.event.details.push((key.into(), value.into()));
        self
    }

    pub fn finish(self) -> RouterAuditEvent {
        self.event
    }
}

/// Trait implemented by any audit sink.
pub trait RouterAudit: Send + Sync {
    fn record(&self, event: RouterAuditEvent);
}

/// Default no-op implementation used when auditing is disabled.
#[derive(Debug, Default)]
pub struct NullRouterAudit;

impl RouterAudit for NullRouterAudit {
    fn record(&self, _event: RouterAuditEvent) {}
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn builder_collects_details() {
        let event = RouterAuditEventBuilder::new(RouterAuditStage::ChildAttached)
            .detail("kind", "match")
            .detail("screen", json!("tic_tac_toe"))
            .finish();

        assert_eq!(event.stage, RouterAuditStage::ChildAttached);
        assert_eq!(event.detail("kind"), Some(&json!("match")));
        assert_eq!(event.detail("missing"), None);
        assert_eq!(event.stage.as_str(), "child_attached");
    }
}
