use std::collections::VecDeque;
use std::sync::{Arc, Mutex};

use crate::logging::{LogLevel, Logger, event_with_fields};

use super::audit::{RouterAudit, RouterAuditEvent, RouterAuditStage};

/// Forwards audit events into a [`Logger`].
///
/// Plugin failures are logged at `warn`; everything else at the configured level.
pub struct LoggingAudit {
    logger: Logger,
    level: LogLevel,
    target: String,
}

impl LoggingAudit {
    pub fn new(logger: Logger) -> Self {
        Self {
            logger,
            level: LogLevel::Debug,
            target: "room::router.audit".to_string(),
        }
    }

    pub fn with_level(mut self, level: LogLevel) -> Self {
        self.level = level;
        self
    }

    pub fn with_target(mut self, target: impl Into<String>) -> Self {
        self.target = target.into();
        self
    }

    fn level_for(&self, stage: RouterAuditStage) -> LogLevel {
        match stage {
            RouterAuditStage::PluginUnavailable => LogLevel::Warn,
            _ => self.level,
        }
    }
}

impl RouterAudit for LoggingAudit {
    fn record(&self, event: RouterAuditEvent) {
        let level = self.level_for(event.stage);
        let log_event = event_with_fields(level, &self.target, event.stage.as_str(), event.details);
        let _ = self.logger.log_event(log_event);
    }
}

/// Keeps the most recent audit events in a bounded ring.
#[derive(Clone)]
pub struct BufferedAudit {
    events: Arc<Mutex<VecDeque<RouterAuditEvent>>>,
    capacity: usize,
}

impl BufferedAudit {
    pub fn new(capacity: usize) -> Self {
        Self {
            events: Arc::new(Mutex::new(VecDeque::with_capacity(capacity))),
            capacity,
        }
    }

    pub fn events(&self) -> Vec<RouterAuditEvent> {
        self.events
            .lock()
            .map(|guard| guard.iter().cloned().collect())
            .unwrap_or_default()
    }

    pub fn stages(&self) -> Vec<RouterAuditStage> {
        self.events().into_iter().map(|event| event.stage).collect()
    }

    pub fn clear(&self) {
        if let Ok(mut guard) = self.events.lock() {
            guard.clear();
        }
    }
}

impl RouterAudit for BufferedAudit {
    fn record(&self, event: RouterAuditEvent) {
        if self.capacity == 0 {
            return;
        }
        if let Ok(mut guard) = self.events.lock() {
            if guard.len() == self.capacity {
                guard.pop_front();
            }
            guard.push_back(event);
        }
    }
}
