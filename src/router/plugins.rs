use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

use crate::Result;

use super::screens::{PluginListener, Screen};

/// Builds a plugin screen. Unlike the default and match factories this one may fail.
pub type PluginScreenFactory =
    Arc<dyn Fn(Arc<dyn PluginListener>) -> Result<Box<dyn Screen>> + Send + Sync>;

/// Registry entry pairing a plugin id with its builder. Resolved on every
/// request and never retained by the router.
#[derive(Clone)]
pub struct PluginDescriptor {
    pub id: String,
    pub title: String,
    pub builder: PluginScreenFactory,
}

impl PluginDescriptor {
    pub fn new<F>(id: impl Into<String>, title: impl Into<String>, builder: F) -> Self
    where
        F: Fn(Arc<dyn PluginListener>) -> Result<Box<dyn Screen>> + Send + Sync + 'static,
    {
        Self {
            id: id.into(),
            title: title.into(),
            builder: Arc::new(builder),
        }
    }

    pub fn build(&self, listener: Arc<dyn PluginListener>) -> Result<Box<dyn Screen>> {
        (self.builder)(listener)
    }
}

impl fmt::Debug for PluginDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PluginDescriptor")
            .field("id", &self.id)
            .field("title", &self.title)
            .finish_non_exhaustive()
    }
}

/// Resolves a plugin id to its descriptor.
pub trait PluginRegistry: Send + Sync {
    fn lookup(&self, id: &str) -> Option<PluginDescriptor>;
}

impl<F> PluginRegistry for F
where
    F: Fn(&str) -> Option<PluginDescriptor> + Send + Sync,
{
    fn lookup(&self, id: &str) -> Option<PluginDescriptor> {
        self(id)
    }
}

/// Map-backed registry for plugins known at startup.
#[derive(Default, Clone)]
pub struct PluginCatalog {
    plugins: HashMap<String, PluginDescriptor>,
}

impl PluginCatalog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a descriptor, replacing any previous entry with the same id.
    pub fn register(&mut self, descriptor: PluginDescriptor) -> Option<PluginDescriptor> {
        self.plugins.insert(descriptor.id.clone(), descriptor)
    }

    pub fn with_plugin(mut self, descriptor: PluginDescriptor) -> Self {
        self.register(descriptor);
        self
    }

    pub fn unregister(&mut self, id: &str) -> Option<PluginDescriptor> {
        self.plugins.remove(id)
    }

    pub fn ids(&self) -> Vec<&str> {
        let mut ids: Vec<_> = self.plugins.keys().map(String::as_str).collect();
        ids.sort_unstable();
        ids
    }

    pub fn len(&self) -> usize {
        self.plugins.len()
    }

    pub fn is_empty(&self) -> bool {
        self.plugins.is_empty()
    }
}

impl PluginRegistry for PluginCatalog {
    fn lookup(&self, id: &str) -> Option<PluginDescriptor> {
        self.plugins.get(id).cloned()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::router::screens::StaticScreen;
    use crate::RouterError;

    struct Quiet;

    impl PluginListener for Quiet {
        fn plugin_did_close(&self, _id: &str) {}
    }

    fn descriptor(id: &str) -> PluginDescriptor {
        let name = id.to_string();
        PluginDescriptor::new(id, id.to_uppercase(), move |_listener| {
            Ok(Box::new(StaticScreen::new(name.clone())) as Box<dyn Screen>)
        })
    }

    #[test]
    fn catalog_lookup_and_ids() {
        let catalog = PluginCatalog::new()
            .with_plugin(descriptor("weather"))
            .with_plugin(descriptor("chess"));

        assert_eq!(catalog.ids(), vec!["chess", "weather"]);
        let found = catalog.lookup("chess").expect("chess registered");
        assert_eq!(found.title, "CHESS");
        let screen = found.build(Arc::new(Quiet)).expect("build");
        assert_eq!(screen.name(), "chess");
        assert!(catalog.lookup("poker").is_none());
    }

    #[test]
    fn register_replaces_and_unregister_removes() {
        let mut catalog = PluginCatalog::new();
        assert!(catalog.register(descriptor("chess")).is_none());
        assert!(catalog.register(descriptor("chess")).is_some());
        assert_eq!(catalog.len(), 1);
        catalog.unregister("chess");
        assert!(catalog.is_empty());
    }

    #[test]
    fn closures_act_as_registries() {
        let registry = |id: &str| {
            (id == "broken").then(|| {
                PluginDescriptor::new("broken", "Broken", |_listener| {
                    Err(RouterError::PluginBuild {
                        id: "broken".into(),
                        reason: "no assets".into(),
                    })
                })
            })
        };

        assert!(registry.lookup("other").is_none());
        let descriptor = registry.lookup("broken").expect("descriptor");
        assert!(descriptor.build(Arc::new(Quiet)).is_err());
    }
}
