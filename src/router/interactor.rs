use std::collections::VecDeque;
use std::sync::Mutex;

use super::screens::{DefaultListener, MatchListener, PluginListener};

/// A routing intent raised by a child and applied by the session's owner.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RouteRequest {
    Default,
    Match,
    Plugin(String),
}

/// Session owner that plays every listener role by queueing route requests.
///
/// Children call back synchronously while the router may be mid-transition, so
/// requests are parked here and applied by the owner afterwards via
/// [`crate::SessionRouter::apply`].
#[derive(Debug, Default)]
pub struct SessionInteractor {
    pending: Mutex<VecDeque<RouteRequest>>,
}

impl SessionInteractor {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn request(&self, request: RouteRequest) {
        if let Ok(mut guard) = self.pending.lock() {
            guard.push_back(request);
        }
    }

    /// Takes every queued request in arrival order.
    pub fn drain(&self) -> Vec<RouteRequest> {
        self.pending
            .lock()
            .map(|mut guard| guard.drain(..).collect())
            .unwrap_or_default()
    }

    pub fn pending(&self) -> usize {
        self.pending.lock().map(|guard| guard.len()).unwrap_or(0)
    }
}

impl DefaultListener for SessionInteractor {
    fn start_match(&self) {
        self.request(RouteRequest::Match);
    }

    fn open_plugin(&self, id: &str) {
        self.request(RouteRequest::Plugin(id.to_string()));
    }
}

impl MatchListener for SessionInteractor {
    fn match_did_end(&self) {
        self.request(RouteRequest::Default);
    }
}

impl PluginListener for SessionInteractor {
    fn plugin_did_close(&self, _id: &str) {
        self.request(RouteRequest::Default);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn listener_roles_queue_requests_in_order() {
        let interactor = SessionInteractor::new();
        interactor.start_match();
        interactor.match_did_end();
        interactor.open_plugin("chess");
        interactor.plugin_did_close("chess");

        assert_eq!(interactor.pending(), 4);
        assert_eq!(
            interactor.drain(),
            vec![
                RouteRequest::Match,
                RouteRequest::Default,
                RouteRequest::Plugin("chess".into()),
                RouteRequest::Default,
            ]
        );
        assert!(interactor.drain().is_empty());
    }
}
