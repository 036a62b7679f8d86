use std::sync::Arc;

use criterion::{Criterion, black_box, criterion_group, criterion_main};
use room_session::logging::{LogEvent, LogSink};
use room_session::{
    LogLevel, Logger, LoggingAudit, LoggingResult, PluginCatalog, PluginDescriptor,
    PresentationSurface, RouteRequest, RouterConfig, Screen, ScreenBuilders, SessionInteractor,
    SessionRouter, StaticScreen, ViewHandle,
};

#[derive(Clone, Default)]
struct NullSink;

impl LogSink for NullSink {
    fn log(&self, _event: &LogEvent) -> LoggingResult<()> {
        Ok(())
    }
}

#[derive(Default)]
struct CountingSurface {
    presents: u64,
    dismisses: u64,
}

impl PresentationSurface for CountingSurface {
    fn present(&mut self, _view: &ViewHandle) {
        self.presents += 1;
    }

    fn dismiss(&mut self, _view: &ViewHandle) {
        self.dismisses += 1;
    }
}

fn routing_cycle(c: &mut Criterion) {
    let script = scripted_requests();
    c.bench_function("routing_cycle", |b| {
        b.iter(|| {
            let mut router = build_router(RouterConfig::default());
            router.load().expect("load");
            for request in black_box(script.clone()) {
                router.apply(request).expect("apply");
            }
        });
    });
}

fn routing_cycle_instrumented(c: &mut Criterion) {
    let script = scripted_requests();
    c.bench_function("routing_cycle_instrumented", |b| {
        b.iter(|| {
            let logger = Logger::new(NullSink).with_min_level(LogLevel::Debug);
            let mut config = RouterConfig::default()
                .with_logger(logger.clone())
                .with_audit(LoggingAudit::new(logger));
            config.enable_metrics();
            let mut router = build_router(config);
            router.load().expect("load");
            for request in black_box(script.clone()) {
                router.apply(request).expect("apply");
            }
        });
    });
}

fn build_router(config: RouterConfig) -> SessionRouter<SessionInteractor> {
    let builders = ScreenBuilders::new(
        |_listener| Box::new(StaticScreen::new("lobby")) as Box<dyn Screen>,
        |_listener| Box::new(StaticScreen::new("tic_tac_toe")) as Box<dyn Screen>,
    );
    let plugins = PluginCatalog::new().with_plugin(PluginDescriptor::new(
        "leaderboard",
        "Leaderboard",
        |_listener| Ok(Box::new(StaticScreen::new("leaderboard")) as Box<dyn Screen>),
    ));

    SessionRouter::with_config(
        Arc::new(SessionInteractor::new()),
        CountingSurface::default(),
        builders,
        plugins,
        config,
    )
}

fn scripted_requests() -> Vec<RouteRequest> {
    let mut requests = Vec::with_capacity(200);
    for _ in 0..50 {
        requests.push(RouteRequest::Match);
        requests.push(RouteRequest::Plugin("leaderboard".into()));
        requests.push(RouteRequest::Plugin("missing".into()));
        requests.push(RouteRequest::Default);
    }
    requests
}

criterion_group!(benches, routing_cycle, routing_cycle_instrumented);
criterion_main!(benches);
