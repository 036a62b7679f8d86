use std::fmt;
use std::path::Path;
use std::sync::{Arc, Mutex};

use serde::Deserialize;

use crate::logging::{FileSink, LogLevel, Logger};
use crate::metrics::RouterMetrics;
use crate::Result;

use super::audit::RouterAudit;

pub const DEFAULT_LOG_TARGET: &str = "room::router";
pub const DEFAULT_METRICS_TARGET: &str = "room::router.metrics";

/// Configuration knobs for a [`crate::SessionRouter`].
#[derive(Clone)]
pub struct RouterConfig {
    /// Optional structured logger used for transition diagnostics.
    pub logger: Option<Logger>,
    /// Target field attached to every router log event.
    pub log_target: String,
    /// Optional audit sink receiving one event per lifecycle step.
    pub audit: Option<Arc<dyn RouterAudit>>,
    /// Shared counters; `None` disables metrics.
    pub metrics: Option<Arc<Mutex<RouterMetrics>>>,
    /// Target used when emitting metrics snapshots.
    pub metrics_target: String,
    /// When set, `cleanup_views` also detaches the child and tears the router down.
    pub detach_on_cleanup: bool,
}

impl Default for RouterConfig {
    fn default() -> Self {
        Self {
            logger: None,
            log_target: DEFAULT_LOG_TARGET.to_string(),
            audit: None,
            metrics: None,
            metrics_target: DEFAULT_METRICS_TARGET.to_string(),
            detach_on_cleanup: false,
        }
    }
}

impl RouterConfig {
    pub fn with_logger(mut self, logger: Logger) -> Self {
        self.logger = Some(logger);
        self
    }

    pub fn with_audit<A>(mut self, audit: A) -> Self
    where
        A: RouterAudit + 'static,
    {
        self.audit = Some(Arc::new(audit));
        self
    }

    /// Log to a JSON-lines file, truncated once it grows past `max_bytes`.
    pub fn with_file_logger(mut self, path: impl AsRef<Path>, max_bytes: u64) -> Result<Self> {
        let sink = FileSink::new(path, max_bytes)?;
        self.logger = Some(Logger::new(sink));
        Ok(self)
    }

    /// Enable metrics collection if it has not already been configured.
    pub fn enable_metrics(&mut self) {
        if self.metrics.is_none() {
            self.metrics = Some(Arc::new(Mutex::new(RouterMetrics::new())));
        }
    }

    pub fn metrics_handle(&self) -> Option<Arc<Mutex<RouterMetrics>>> {
        self.metrics.as_ref().map(Arc::clone)
    }

    /// Overlay file-provided settings onto this config.
    pub fn apply_settings(&mut self, settings: &RouterSettings) {
        if let Some(target) = settings.log_target.as_ref() {
            self.log_target = target.clone();
        }
        if let Some(detach) = settings.detach_on_cleanup {
            self.detach_on_cleanup = detach;
        }
        if let Some(level) = settings.log_level {
            self.logger = self.logger.take().map(|logger| logger.with_min_level(level));
        }
        if settings.metrics {
            self.enable_metrics();
        }
    }
}

impl fmt::Debug for RouterConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RouterConfig")
            .field("logger", &self.logger.as_ref().map(Logger::min_level))
            .field("log_target", &self.log_target)
            .field("audit", &self.audit.is_some())
            .field("metrics", &self.metrics.is_some())
            .field("metrics_target", &self.metrics_target)
            .field("detach_on_cleanup", &self.detach_on_cleanup)
            .finish()
    }
}

/// Serializable subset of [`RouterConfig`] loaded from JSON.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct RouterSettings {
    pub log_target: Option<String>,
    pub log_level: Option<LogLevel>,
    pub detach_on_cleanup: Option<bool>,
    pub metrics: bool,
}

impl RouterSettings {
    pub fn from_json_str(raw: &str) -> Result<Self> {
        Ok(serde_json::from_str(raw)?)
    }

    pub fn from_path(path: impl AsRef<Path>) -> Result<Self> {
        let raw = std::fs::read_to_string(path)?;
        Self::from_json_str(&raw)
    }

    pub fn into_config(self) -> RouterConfig {
        let mut config = RouterConfig::default();
        config.apply_settings(&self);
        config
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::logging::MemorySink;
    use crate::RouterError;

    #[test]
    fn settings_overlay_config() {
        let settings = RouterSettings::from_json_str(
            r#"{"log_target":"app::session","log_level":"warn","detach_on_cleanup":true,"metrics":true}"#,
        )
        .unwrap();

        let mut config = RouterConfig::default().with_logger(Logger::new(MemorySink::new()));
        config.apply_settings(&settings);

        assert_eq!(config.log_target, "app::session");
        assert!(config.detach_on_cleanup);
        assert!(config.metrics_handle().is_some());
        assert_eq!(config.logger.as_ref().map(Logger::min_level), Some(LogLevel::Warn));
    }

    #[test]
    fn empty_settings_keep_defaults() {
        let config = RouterSettings::from_json_str("{}").unwrap().into_config();
        assert_eq!(config.log_target, DEFAULT_LOG_TARGET);
        assert!(!config.detach_on_cleanup);
        assert!(config.metrics.is_none());
    }

    #[test]
    fn unknown_keys_are_rejected() {
        let err = RouterSettings::from_json_str(r#"{"detach":true}"#).unwrap_err();
        assert!(matches!(err, RouterError::Settings(_)));
    }

    #[test]
    fn settings_without_level_keep_logger() {
        let sink = MemorySink::new();
        let mut config = RouterConfig::default()
            .with_logger(Logger::new(sink.clone()).with_min_level(LogLevel::Info));
        config.apply_settings(&RouterSettings::from_json_str(r#"{"metrics":true}"#).unwrap());

        let logger = config.logger.as_ref().expect("logger kept");
        assert_eq!(logger.min_level(), LogLevel::Info);
        logger.log(LogLevel::Warn, "room::test", "still wired").unwrap();
        assert_eq!(sink.messages(), vec!["still wired".to_string()]);
    }

    fn temp_path(name: &str) -> std::path::PathBuf {
        std::env::temp_dir().join(format!("room_session_{}_{name}", std::process::id()))
    }

    #[test]
    fn settings_load_from_file() {
        let path = temp_path("settings.json");
        std::fs::write(&path, r#"{"log_target":"app::lobby","detach_on_cleanup":true}"#).unwrap();

        let settings = RouterSettings::from_path(&path).unwrap();
        let _ = std::fs::remove_file(&path);

        assert_eq!(settings.log_target.as_deref(), Some("app::lobby"));
        assert_eq!(settings.detach_on_cleanup, Some(true));
        assert!(!settings.metrics);
    }

    #[test]
    fn missing_settings_file_is_io_error() {
        let err = RouterSettings::from_path(temp_path("absent.json")).unwrap_err();
        assert!(matches!(err, RouterError::Io(_)));
    }

    #[test]
    fn file_logger_writes_and_reports_open_failures() {
        let path = temp_path("router.jsonl");
        let config = RouterConfig::default().with_file_logger(&path, 0).unwrap();
        config
            .logger
            .as_ref()
            .expect("file logger")
            .log(LogLevel::Info, "room::test", "to_file")
            .unwrap();
        let written = std::fs::read_to_string(&path).unwrap();
        let _ = std::fs::remove_file(&path);
        assert!(written.contains("\"message\":\"to_file\""));

        let err = RouterConfig::default()
            .with_file_logger(std::env::temp_dir(), 0)
            .unwrap_err();
        assert!(matches!(err, RouterError::Logging(_)));
    }

    #[test]
    fn debug_hides_trait_objects() {
        let config = RouterConfig::default().with_logger(Logger::new(MemorySink::new()));
        let rendered = format!("{config:?}");
        assert!(rendered.contains("RouterConfig"));
        assert!(rendered.contains("log_target: \"room::router\""));
        assert!(rendered.contains("audit: false"));
    }
}
