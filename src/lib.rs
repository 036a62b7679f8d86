//! Single-active-child session router.
//!
//! A logged-in session hosts exactly one child screen at a time: the default
//! screen, a match screen, or a plugin screen resolved by id. [`SessionRouter`]
//! swaps that child, releasing the outgoing one before the incoming one is
//! attached and presented, and reports plugin resolution failures through the
//! logger and audit hooks instead of surfacing them as errors.

pub mod error;
pub mod logging;
pub mod metrics;
pub mod router;

pub use error::{PluginFailure, Result, RouterError};
pub use logging::{
    FileSink, LogEvent, LogFields, LogLevel, LogSink, Logger, LoggingError, LoggingResult,
    MemorySink, StderrSink,
};
pub use metrics::{MetricSnapshot, RouterMetrics};
pub use router::audit::{
    NullRouterAudit, RouterAudit, RouterAuditEvent, RouterAuditEventBuilder, RouterAuditStage,
};
pub use router::config::{RouterConfig, RouterSettings};
pub use router::diagnostics::{BufferedAudit, LoggingAudit};
pub use router::interactor::{RouteRequest, SessionInteractor};
pub use router::plugins::{PluginCatalog, PluginDescriptor, PluginRegistry, PluginScreenFactory};
pub use router::screens::{
    DefaultListener, DefaultScreenFactory, MatchListener, MatchScreenFactory, PluginListener,
    Screen, ScreenBuilders, ScreenKind, SessionListener, StaticScreen, ViewHandle,
};
pub use router::surface::{PresentationSurface, TerminalSurface};
pub use router::{RouteOutcome, RouterState, SessionRouter};
