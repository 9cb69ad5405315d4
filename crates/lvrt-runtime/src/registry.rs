//! Component registration on behalf of the host

use std::collections::BTreeSet;

use log::debug;

use crate::error::{RuntimeError, RuntimeResult};
use crate::provider::WidgetProvider;

/// Component name the render pipeline registers the document under
pub const ROOT_COMPONENT: &str = "lvrt_root_view";

/// Host-registered component names, kept in step with the provider
#[derive(Debug, Default, Clone)]
pub struct ComponentBridge {
    names: BTreeSet<String>,
}

impl ComponentBridge {
    /// Create an empty bridge
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Register `source` under `name` with the provider
    ///
    /// Missing or blank XML is rejected before the provider sees it. A
    /// rejected registration leaves any earlier definition in place.
    pub fn register<P: WidgetProvider>(
        &mut self,
        provider: &mut P,
        name: &str,
        source: Option<&str>,
    ) -> RuntimeResult<()> {
        if name.trim().is_empty() {
            return Err(registration_error(name, "component name is empty"));
        }
        let Some(source) = source.filter(|s| !s.trim().is_empty()) else {
            return Err(registration_error(name, "no XML data"));
        };

        provider
            .register_component(name, source)
            .map_err(|err| registration_error(name, &err.to_string()))?;

        if name != ROOT_COMPONENT {
            self.names.insert(name.to_string());
        }
        debug!("registered component {name}");
        Ok(())
    }

    /// Remove a component; returns whether the provider knew it
    pub fn unregister<P: WidgetProvider>(&mut self, provider: &mut P, name: &str) -> bool {
        self.names.remove(name);
        provider.unregister_component(name)
    }

    /// Whether `name` was registered through the bridge
    #[must_use]
    pub fn contains(&self, name: &str) -> bool {
        self.names.contains(name)
    }

    /// Registered names in sorted order
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.names.iter().map(String::as_str)
    }

    /// Number of registered names
    #[must_use]
    pub fn len(&self) -> usize {
        self.names.len()
    }

    /// Whether no names are registered
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }

    /// Forget every name without touching the provider
    pub fn clear(&mut self) {
        self.names.clear();
    }
}

fn registration_error(name: &str, reason: &str) -> RuntimeError {
    RuntimeError::Registration {
        name: name.to_string(),
        reason: reason.to_string(),
    }
}
