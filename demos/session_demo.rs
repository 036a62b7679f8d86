//! Session Router Demo
//!
//! Loads a session, starts a match, asks for a plugin that does not exist, opens
//! the leaderboard plugin and finally returns to the lobby. Views are printed by
//! a terminal surface; structured diagnostics go to stderr.
//!
//! ```bash
//! cargo run --example session_demo 2>diagnostics.jsonl
//! ```

use std::io;
use std::sync::Arc;

use room_session::{
    LogLevel, Logger, LoggingAudit, PluginCatalog, PluginDescriptor, Result, RouteOutcome,
    RouteRequest, RouterConfig, Screen, ScreenBuilders, SessionInteractor, SessionRouter,
    StaticScreen, StderrSink, TerminalSurface,
};

fn main() -> Result<()> {
    println!("Room Session · routing walkthrough\n");

    let logger = Logger::new(StderrSink).with_min_level(LogLevel::Info);
    let mut config = RouterConfig::default()
        .with_logger(logger.clone())
        .with_audit(LoggingAudit::new(logger).with_level(LogLevel::Info));
    config.enable_metrics();

    let interactor = Arc::new(SessionInteractor::new());
    let mut router = SessionRouter::with_config(
        Arc::clone(&interactor),
        TerminalSurface::new(io::stdout()),
        ScreenBuilders::new(
            |_listener| Box::new(StaticScreen::new("lobby")) as Box<dyn Screen>,
            |_listener| Box::new(StaticScreen::new("tic_tac_toe")) as Box<dyn Screen>,
        ),
        demo_plugins(),
        config,
    );

    router.load()?;
    interactor.request(RouteRequest::Match);
    interactor.request(RouteRequest::Plugin("chess".into()));
    interactor.request(RouteRequest::Plugin("leaderboard".into()));
    interactor.request(RouteRequest::Default);

    for request in interactor.drain() {
        match router.apply(request)? {
            RouteOutcome::Attached(kind) => println!("  -> now showing {kind}"),
            RouteOutcome::PluginUnavailable { id, failure } => {
                println!("  -> plugin `{id}` unavailable ({failure}); still on {:?}", router.state())
            }
        }
    }

    router.cleanup_views();
    router.teardown();

    if let Some(snapshot) = router.metrics_snapshot() {
        println!(
            "\n{} transitions, {} plugin failures",
            snapshot.transitions, snapshot.plugin_failures
        );
    }
    Ok(())
}

fn demo_plugins() -> PluginCatalog {
    PluginCatalog::new().with_plugin(PluginDescriptor::new(
        "leaderboard",
        "Leaderboard",
        |_listener| Ok(Box::new(StaticScreen::new("leaderboard")) as Box<dyn Screen>),
    ))
}
