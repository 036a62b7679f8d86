use thiserror::Error;

use crate::logging::LoggingError;

/// Unified result type for the session router crate.
pub type Result<T> = std::result::Result<T, RouterError>;

/// Errors surfaced by the session router.
///
/// Plugin resolution problems are not returned through this type by the routing
/// operations themselves; they come back as [`PluginFailure`] inside a
/// [`crate::RouteOutcome`] so the caller never loses its visible screen.
#[derive(Debug, Error)]
pub enum RouterError {
    #[error("router has not been loaded")]
    NotLoaded,
    #[error("router is already loaded")]
    AlreadyLoaded,
    #[error("router has been torn down")]
    TornDown,
    #[error("plugin `{0}` is not registered")]
    UnknownPlugin(String),
    #[error("plugin `{id}` failed to build: {reason}")]
    PluginBuild { id: String, reason: String },
    #[error("logging failure: {0}")]
    Logging(#[from] LoggingError),
    #[error("invalid router settings: {0}")]
    Settings(#[from] serde_json::Error),
    #[error(transparent)]
    Io(#[from] std::io::Error),
}

/// Why a plugin route left the active child untouched.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PluginFailure {
    #[error("no plugin registered under this id")]
    Unknown,
    #[error("plugin builder failed: {0}")]
    BuildFailed(String),
}

impl PluginFailure {
    pub fn into_error(self, id: impl Into<String>) -> RouterError {
        match self {
            PluginFailure::Unknown => RouterError::UnknownPlugin(id.into()),
            PluginFailure::BuildFailed(reason) => RouterError::PluginBuild {
                id: id.into(),
                reason,
            },
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            PluginFailure::Unknown => "unknown",
            PluginFailure::BuildFailed(_) => "build_failed",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn plugin_failure_maps_to_router_error() {
        let err = PluginFailure::Unknown.into_error("chess");
        assert_eq!(err.to_string(), "plugin `chess` is not registered");

        let err = PluginFailure::BuildFailed("missing asset".into()).into_error("chess");
        assert!(matches!(err, RouterError::PluginBuild { ref id, .. } if id == "chess"));
        assert_eq!(
            err.to_string(),
            "plugin `chess` failed to build: missing asset"
        );
    }
}
