//! Session router: keeps exactly one child screen installed under a logged-in
//! session and swaps it on request.
//!
//! Every transition releases the outgoing child (dismiss its view, then detach
//! it) before the incoming child is attached and presented. Plugin routes are
//! resolved before anything is released, so an id that does not resolve or
//! build leaves the current screen untouched.

use std::sync::Arc;

use serde_json::{Value, json};

use crate::error::PluginFailure;
use crate::logging::{LogLevel, event_with_fields, json_kv};
use crate::metrics::{MetricSnapshot, RouterMetrics};
use crate::{Result, RouterError};

pub mod audit;
pub mod config;
pub mod diagnostics;
pub mod interactor;
pub mod plugins;
pub mod screens;
pub mod surface;

use audit::{RouterAuditEventBuilder, RouterAuditStage};
use config::RouterConfig;
use interactor::RouteRequest;
use plugins::PluginRegistry;
use screens::{
    DefaultListener, MatchListener, PluginListener, Screen, ScreenBuilders, ScreenKind,
    SessionListener, ViewHandle,
};
use surface::PresentationSurface;

/// Observable position of the router in its lifecycle.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RouterState {
    Uninitialized,
    DefaultActive,
    MatchActive,
    PluginActive(String),
    TornDown,
}

/// Result of a routing call that did not hit a lifecycle error.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RouteOutcome {
    /// The requested child is now the active child.
    Attached(ScreenKind),
    /// The plugin could not be resolved; the previous child is still active.
    PluginUnavailable { id: String, failure: PluginFailure },
}

impl RouteOutcome {
    pub fn is_attached(&self) -> bool {
        matches!(self, RouteOutcome::Attached(_))
    }

    /// Converts a plugin failure into an error for hosts that treat an
    /// unavailable plugin as fatal.
    pub fn into_result(self) -> Result<ScreenKind> {
        match self {
            RouteOutcome::Attached(kind) => Ok(kind),
            RouteOutcome::PluginUnavailable { id, failure } => Err(failure.into_error(id)),
        }
    }
}

struct ActiveChild {
    kind: ScreenKind,
    screen: Box<dyn Screen>,
    presented: bool,
}

/// Coordinates the single active child of a session.
pub struct SessionRouter<L: SessionListener + 'static> {
    listener: Arc<L>,
    surface: Box<dyn PresentationSurface>,
    builders: ScreenBuilders,
    plugins: Box<dyn PluginRegistry>,
    config: RouterConfig,
    active: Option<ActiveChild>,
    loaded: bool,
    torn_down: bool,
}

impl<L: SessionListener + 'static> SessionRouter<L> {
    pub fn new<S, P>(listener: Arc<L>, surface: S, builders: ScreenBuilders, plugins: P) -> Self
    where
        S: PresentationSurface + 'static,
        P: PluginRegistry + 'static,
    {
        Self::with_config(listener, surface, builders, plugins, RouterConfig::default())
    }

    pub fn with_config<S, P>(
        listener: Arc<L>,
        surface: S,
        builders: ScreenBuilders,
        plugins: P,
        config: RouterConfig,
    ) -> Self
    where
        S: PresentationSurface + 'static,
        P: PluginRegistry + 'static,
    {
        Self {
            listener,
            surface: Box::new(surface),
            builders,
            plugins: Box::new(plugins),
            config,
            active: None,
            loaded: false,
            torn_down: false,
        }
    }

    pub fn config(&self) -> &RouterConfig {
        &self.config
    }

    pub fn config_mut(&mut self) -> &mut RouterConfig {
        &mut self.config
    }

    pub fn listener(&self) -> &Arc<L> {
        &self.listener
    }

    /// Installs the default screen. Must be called exactly once before routing.
    pub fn load(&mut self) -> Result<()> {
        if self.torn_down {
            return Err(RouterError::TornDown);
        }
        if self.loaded {
            return Err(RouterError::AlreadyLoaded);
        }

        self.loaded = true;
        let screen = self.build_default();
        self.install(ScreenKind::Default, screen);
        self.emit(LogLevel::Info, RouterAuditStage::RouterLoaded, std::iter::empty());
        Ok(())
    }

    pub fn route_to_match(&mut self) -> Result<RouteOutcome> {
        self.ensure_routable()?;
        self.release_active();

        let listener: Arc<dyn MatchListener> = self.listener.clone();
        let screen = (self.builders.match_screen)(listener);
        self.note_built(&ScreenKind::Match, screen.as_ref());
        self.install(ScreenKind::Match, screen);
        self.record_transition(&ScreenKind::Match);
        Ok(RouteOutcome::Attached(ScreenKind::Match))
    }

    pub fn route_to_default(&mut self) -> Result<RouteOutcome> {
        self.ensure_routable()?;
        self.release_active();

        let screen = self.build_default();
        self.install(ScreenKind::Default, screen);
        self.record_transition(&ScreenKind::Default);
        Ok(RouteOutcome::Attached(ScreenKind::Default))
    }

    /// Routes to the plugin registered under `id`.
    ///
    /// An unknown id or a failing builder is reported through the logger,
    /// audit sink and metrics and returned as
    /// [`RouteOutcome::PluginUnavailable`]; the active child is not touched.
    pub fn route_to_plugin(&mut self, id: &str) -> Result<RouteOutcome> {
        self.ensure_routable()?;

        let screen = match self.resolve_plugin(id) {
            Ok(screen) => screen,
            Err(failure) => {
                self.report_plugin_failure(id, &failure);
                return Ok(RouteOutcome::PluginUnavailable {
                    id: id.to_string(),
                    failure,
                });
            }
        };

        let kind = ScreenKind::Plugin(id.to_string());
        self.note_built(&kind, screen.as_ref());
        self.release_active();
        self.install(kind.clone(), screen);
        self.record_transition(&kind);
        Ok(RouteOutcome::Attached(kind))
    }

    pub fn apply(&mut self, request: RouteRequest) -> Result<RouteOutcome> {
        match request {
            RouteRequest::Default => self.route_to_default(),
            RouteRequest::Match => self.route_to_match(),
            RouteRequest::Plugin(id) => self.route_to_plugin(&id),
        }
    }

    /// Hides the active child's view without detaching it, for when the whole
    /// session surface is going away. Calling it again is a no-op.
    ///
    /// With `detach_on_cleanup` set this performs a full [`Self::teardown`].
    pub fn cleanup_views(&mut self) {
        if self.config.detach_on_cleanup {
            self.teardown();
            return;
        }

        let Some(child) = self.active.as_mut() else {
            return;
        };
        if !child.presented {
            return;
        }

        child.presented = false;
        self.surface.dismiss(child.screen.view());
        let view = child.screen.view().id().to_string();
        self.with_metrics(RouterMetrics::record_dismiss);
        self.emit(
            LogLevel::Debug,
            RouterAuditStage::ViewDismissed,
            [json_kv("view", json!(view.clone()))],
        );
        self.emit(
            LogLevel::Info,
            RouterAuditStage::ViewsCleaned,
            [json_kv("view", json!(view))],
        );
    }

    /// Releases the active child and moves to the terminal state. Idempotent.
    pub fn teardown(&mut self) {
        if self.torn_down {
            return;
        }

        self.release_active();
        self.torn_down = true;
        self.emit(LogLevel::Info, RouterAuditStage::RouterTornDown, std::iter::empty());
        self.emit_metrics_snapshot();
    }

    pub fn state(&self) -> RouterState {
        if self.torn_down {
            return RouterState::TornDown;
        }
        match self.active.as_ref().map(|child| &child.kind) {
            None => RouterState::Uninitialized,
            Some(ScreenKind::Default) => RouterState::DefaultActive,
            Some(ScreenKind::Match) => RouterState::MatchActive,
            Some(ScreenKind::Plugin(id)) => RouterState::PluginActive(id.clone()),
        }
    }

    pub fn is_loaded(&self) -> bool {
        self.loaded
    }

    pub fn has_active_child(&self) -> bool {
        self.active.is_some()
    }

    pub fn active_kind(&self) -> Option<&ScreenKind> {
        self.active.as_ref().map(|child| &child.kind)
    }

    pub fn active_view(&self) -> Option<&ViewHandle> {
        self.active.as_ref().map(|child| child.screen.view())
    }

    pub fn active_screen_name(&self) -> Option<&str> {
        self.active.as_ref().map(|child| child.screen.name())
    }

    /// Whether the active child's view is currently on the surface.
    pub fn is_presented(&self) -> bool {
        self.active.as_ref().is_some_and(|child| child.presented)
    }

    pub fn metrics_snapshot(&self) -> Option<MetricSnapshot> {
        let metrics = self.config.metrics.as_ref()?;
        metrics.lock().ok().map(|guard| guard.snapshot())
    }

    fn ensure_routable(&self) -> Result<()> {
        if self.torn_down {
            return Err(RouterError::TornDown);
        }
        if !self.loaded {
            return Err(RouterError::NotLoaded);
        }
        Ok(())
    }

    fn build_default(&self) -> Box<dyn Screen> {
        let listener: Arc<dyn DefaultListener> = self.listener.clone();
        let screen = (self.builders.default_screen)(listener);
        self.note_built(&ScreenKind::Default, screen.as_ref());
        screen
    }

    fn resolve_plugin(&self, id: &str) -> std::result::Result<Box<dyn Screen>, PluginFailure> {
        let descriptor = self.plugins.lookup(id).ok_or(PluginFailure::Unknown)?;
        let listener: Arc<dyn PluginListener> = self.listener.clone();
        descriptor
            .build(listener)
            .map_err(|err| PluginFailure::BuildFailed(err.to_string()))
    }

    /// Dismisses (if shown) and detaches the active child, leaving the slot empty.
    fn release_active(&mut self) {
        let Some(mut child) = self.active.take() else {
            return;
        };

        let view = child.screen.view().id().to_string();
        if child.presented {
            self.surface.dismiss(child.screen.view());
            self.with_metrics(RouterMetrics::record_dismiss);
            self.emit(
                LogLevel::Debug,
                RouterAuditStage::ViewDismissed,
                [json_kv("view", json!(view.clone()))],
            );
        }

        child.screen.on_detach();
        self.with_metrics(RouterMetrics::record_detach);
        self.emit(
            LogLevel::Debug,
            RouterAuditStage::ChildDetached,
            [
                json_kv("kind", json!(child.kind.to_string())),
                json_kv("screen", json!(child.screen.name())),
                json_kv("view", json!(view)),
            ],
        );
    }

    fn install(&mut self, kind: ScreenKind, mut screen: Box<dyn Screen>) {
        debug_assert!(
            self.active.is_none(),
            "attempted to attach a child while another is still installed"
        );

        screen.on_attach();
        self.with_metrics(RouterMetrics::record_attach);
        self.emit(
            LogLevel::Debug,
            RouterAuditStage::ChildAttached,
            [
                json_kv("kind", json!(kind.to_string())),
                json_kv("screen", json!(screen.name())),
            ],
        );

        self.surface.present(screen.view());
        self.with_metrics(RouterMetrics::record_present);
        self.emit(
            LogLevel::Debug,
            RouterAuditStage::ViewPresented,
            [json_kv("view", json!(screen.view().id()))],
        );

        self.active = Some(ActiveChild {
            kind,
            screen,
            presented: true,
        });
    }

    fn note_built(&self, kind: &ScreenKind, screen: &dyn Screen) {
        self.emit(
            LogLevel::Trace,
            RouterAuditStage::ChildBuilt,
            [
                json_kv("kind", json!(kind.to_string())),
                json_kv("screen", json!(screen.name())),
            ],
        );
    }

    fn report_plugin_failure(&self, id: &str, failure: &PluginFailure) {
        self.with_metrics(RouterMetrics::record_plugin_failure);
        self.emit(
            LogLevel::Warn,
            RouterAuditStage::PluginUnavailable,
            [
                json_kv("plugin", json!(id)),
                json_kv("failure", json!(failure.as_str())),
                json_kv("reason", json!(failure.to_string())),
                json_kv(
                    "active",
                    json!(self.active_kind().map(ScreenKind::to_string)),
                ),
            ],
        );
    }

    fn record_transition(&self, kind: &ScreenKind) {
        self.with_metrics(RouterMetrics::record_transition);
        self.log(
            LogLevel::Info,
            "routed",
            [json_kv("kind", json!(kind.to_string()))],
        );
    }

    fn emit<I>(&self, level: LogLevel, stage: RouterAuditStage, details: I)
    where
        I: IntoIterator<Item = (String, Value)>,
    {
        let details: Vec<(String, Value)> = details.into_iter().collect();
        if let Some(audit) = self.config.audit.as_ref() {
            let event = details
                .iter()
                .cloned()
                .fold(RouterAuditEventBuilder::new(stage), |builder, (key, value)| {
                    builder.detail(key, value)
                })
                .finish();
            audit.record(event);
        }
        self.log(level, stage.as_str(), details);
    }

    fn log<I>(&self, level: LogLevel, message: &str, fields: I)
    where
        I: IntoIterator<Item = (String, Value)>,
    {
        if let Some(logger) = self.config.logger.as_ref() {
            let event = event_with_fields(level, &self.config.log_target, message, fields);
            let _ = logger.log_event(event);
        }
    }

    fn with_metrics(&self, record: impl FnOnce(&mut RouterMetrics)) {
        if let Some(metrics) = self.config.metrics.as_ref() {
            if let Ok(mut guard) = metrics.lock() {
                record(&mut *guard);
            }
        }
    }

    fn emit_metrics_snapshot(&self) {
        if let (Some(logger), Some(snapshot)) =
            (self.config.logger.as_ref(), self.metrics_snapshot())
        {
            let _ = logger.log_event(snapshot.to_log_event(&self.config.metrics_target));
        }
    }
}

impl<L: SessionListener + 'static> Drop for SessionRouter<L> {
    fn drop(&mut self) {
        if self.loaded {
            self.teardown();
        }
    }
}
