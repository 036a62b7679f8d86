//! Screen contract shared by every child the router can host, plus the listener
//! roles children use to report upward.

use std::fmt;
use std::sync::Arc;

/// Opaque handle to a screen's visual representation.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ViewHandle {
    id: String,
}

impl ViewHandle {
    pub fn new(id: impl Into<String>) -> Self {
        Self { id: id.into() }
    }

    pub fn id(&self) -> &str {
        &self.id
    }
}

impl fmt::Display for ViewHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.id)
    }
}

/// Which kind of child currently occupies the session.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum ScreenKind {
    Default,
    Match,
    Plugin(String),
}

impl ScreenKind {
    pub fn label(&self) -> &str {
        match self {
            ScreenKind::Default => "default",
            ScreenKind::Match => "match",
            ScreenKind::Plugin(_) => "plugin",
        }
    }
}

impl fmt::Display for ScreenKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ScreenKind::Plugin(id) => write!(f, "plugin:{id}"),
            other => f.write_str(other.label()),
        }
    }
}

/// Contract implemented by every screen a factory can produce.
///
/// The attach hooks mirror logical installation into the session tree and are
/// independent from presentation, which the router delegates to its surface.
pub trait Screen: Send {
    fn name(&self) -> &str;

    fn view(&self) -> &ViewHandle;

    fn on_attach(&mut self) {}

    fn on_detach(&mut self) {}
}

/// Upward events from the idle/default screen.
pub trait DefaultListener: Send + Sync {
    fn start_match(&self);

    fn open_plugin(&self, id: &str);
}

/// Upward events from a match screen.
pub trait MatchListener: Send + Sync {
    fn match_did_end(&self);
}

/// Upward events from a plugin screen.
pub trait PluginListener: Send + Sync {
    fn plugin_did_close(&self, id: &str);
}

/// Every role the session's owner plays for its children.
pub trait SessionListener: DefaultListener + MatchListener + PluginListener {}

impl<T> SessionListener for T where T: DefaultListener + MatchListener + PluginListener {}

/// Builds the idle screen the session falls back to.
pub type DefaultScreenFactory =
    Arc<dyn Fn(Arc<dyn DefaultListener>) -> Box<dyn Screen> + Send + Sync>;

/// Builds a gameplay screen.
pub type MatchScreenFactory =
    Arc<dyn Fn(Arc<dyn MatchListener>) -> Box<dyn Screen> + Send + Sync>;

/// The two factories the router always owns.
#[derive(Clone)]
pub struct ScreenBuilders {
    pub default_screen: DefaultScreenFactory,
    pub match_screen: MatchScreenFactory,
}

impl ScreenBuilders {
    pub fn new<D, M>(default_screen: D, match_screen: M) -> Self
    where
        D: Fn(Arc<dyn DefaultListener>) -> Box<dyn Screen> + Send + Sync + 'static,
        M: Fn(Arc<dyn MatchListener>) -> Box<dyn Screen> + Send + Sync + 'static,
    {
        Self {
            default_screen: Arc::new(default_screen),
            match_screen: Arc::new(match_screen),
        }
    }
}

/// Screen with no behaviour beyond its name and view, handy for placeholder
/// children and plugin stubs.
pub struct StaticScreen {
    name: String,
    view: ViewHandle,
}

impl StaticScreen {
    pub fn new(name: impl Into<String>) -> Self {
        let name = name.into();
        let view = ViewHandle::new(format!("{name}.view"));
        Self { name, view }
    }
}

impl Screen for StaticScreen {
    fn name(&self) -> &str {
        &self.name
    }

    fn view(&self) -> &ViewHandle {
        &self.view
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn kind_display_includes_plugin_id() {
        assert_eq!(ScreenKind::Default.to_string(), "default");
        assert_eq!(ScreenKind::Match.to_string(), "match");
        assert_eq!(ScreenKind::Plugin("chess".into()).to_string(), "plugin:chess");
        assert_eq!(ScreenKind::Plugin("chess".into()).label(), "plugin");
    }

    #[test]
    fn static_screen_derives_view_from_name() {
        let screen = StaticScreen::new("lobby");
        assert_eq!(screen.name(), "lobby");
        assert_eq!(screen.view().id(), "lobby.view");
    }
}
