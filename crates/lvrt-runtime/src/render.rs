//! Render pipeline
//!
//! Rendering replaces the active screen with a fresh one built from an XML
//! document. The document is registered as the root component, a new screen
//! is created with the host's style overrides and loaded, the previous
//! screen is deleted and the root component is instantiated on the new one.
//! Every attempt ends in exactly one host event: a render error or a render
//! complete notification.

use log::{debug, warn};
use lvrt_engine::EngineError;

use crate::error::{RuntimeError, RuntimeResult};
use crate::lifecycle::RuntimeSession;
use crate::provider::WidgetProvider;
use crate::registry::ROOT_COMPONENT;

/// Widget class of the screens the pipeline creates
pub const SCREEN_WIDGET: &str = "lv_obj";

/// One style attribute applied to the render screen
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StyleOverride {
    pub key: String,
    pub value: String,
}

impl StyleOverride {
    /// Create an override from a key and a value
    #[must_use]
    pub fn new(key: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            value: value.into(),
        }
    }

    /// Pair up a flat `[key, value, key, value, ...]` list
    pub fn from_flat<S: AsRef<str>>(flat: &[S]) -> RuntimeResult<Vec<Self>> {
        if flat.len() % 2 != 0 {
            return Err(RuntimeError::InvalidOverrides(flat.len()));
        }
        Ok(flat
            .chunks_exact(2)
            .map(|pair| Self::new(pair[0].as_ref(), pair[1].as_ref()))
            .collect())
    }

    /// Parse `key=value`
    #[must_use]
    pub fn parse(raw: &str) -> Option<Self> {
        let (key, value) = raw.split_once('=')?;
        let key = key.trim();
        if key.is_empty() {
            return None;
        }
        Some(Self::new(key, value.trim()))
    }
}

impl<P: WidgetProvider> RuntimeSession<P> {
    /// Register a component the rendered document can reference
    ///
    /// The root component name is reserved for the pipeline. Every rejected
    /// registration is also reported to the host as a log event.
    pub fn register_component(&mut self, name: &str, source: Option<&str>) -> RuntimeResult<()> {
        let result = self.try_register_component(name, source);
        if let Err(err) = &result {
            let has_data = source.is_some_and(|data| !data.trim().is_empty());
            let line = match err {
                RuntimeError::Registration { .. } if !has_data => format!("Cannot register {name}. No data."),
                other => other.to_string(),
            };
            warn!("{line}");
            self.sink.log(&line);
        }
        result
    }

    fn try_register_component(&mut self, name: &str, source: Option<&str>) -> RuntimeResult<()> {
        self.ensure_running()?;
        if name == ROOT_COMPONENT {
            return Err(RuntimeError::Registration {
                name: name.to_string(),
                reason: "name is reserved".to_string(),
            });
        }
        self.components.register(&mut self.provider, name, source)
    }

    /// Remove a previously registered component
    pub fn unregister_component(&mut self, name: &str) -> RuntimeResult<bool> {
        self.ensure_running()?;
        Ok(self.components.unregister(&mut self.provider, name))
    }

    /// Whether the provider currently knows component `name`
    #[must_use]
    pub fn is_registered(&self, name: &str) -> bool {
        self.is_running() && self.provider.has_component(name)
    }

    /// Render `xml` onto a new active screen
    ///
    /// On failure the host receives one render error and the new screen is
    /// left empty; on success it receives one render complete event.
    pub fn render(&mut self, xml: &str, overrides: &[StyleOverride]) -> RuntimeResult<()> {
        if let Err(err) = self.ensure_running() {
            return self.fail_render(err);
        }
        let attempt = self.sink.begin_attempt();

        self.provider.unregister_component(ROOT_COMPONENT);
        if let Err(err) = self.components.register(&mut self.provider, ROOT_COMPONENT, Some(xml)) {
            drop(attempt);
            return self.fail_render(err);
        }

        let attrs: Vec<(String, String)> = overrides
            .iter()
            .map(|o| (o.key.clone(), o.value.clone()))
            .collect();
        let screen = match self.provider.create(None, SCREEN_WIDGET, &attrs) {
            Ok(screen) => screen,
            Err(err) => {
                drop(attempt);
                return self.fail_render(RuntimeError::RenderFailure(err.to_string()));
            }
        };

        let previous = self.provider.screen_active();
        if let Err(err) = self.provider.screen_load(screen) {
            self.provider.delete(screen);
            drop(attempt);
            return self.fail_render(RuntimeError::RenderFailure(err.to_string()));
        }
        if let Some(previous) = previous.filter(|p| *p != screen) {
            self.provider.delete(previous);
        }

        let outcome = self.provider.create(Some(screen), ROOT_COMPONENT, &[]);
        let logged = attempt.unknown_element();
        drop(attempt);

        let failure = match (outcome, logged) {
            (Ok(_), None) => None,
            (Err(EngineError::UnknownElement(name)), _) | (_, Some(name)) => Some(RuntimeError::UnknownElement(name)),
            (Err(err), None) => Some(RuntimeError::RenderFailure(err.to_string())),
        };
        if let Some(err) = failure {
            self.provider.clean(screen);
            return self.fail_render(err);
        }

        self.provider.refresh_now();
        self.sink.render_complete();
        debug!("render complete");
        Ok(())
    }

    /// Render with overrides given as a flat key/value list
    pub fn render_flat<S: AsRef<str>>(&mut self, xml: &str, flat: &[S]) -> RuntimeResult<()> {
        match StyleOverride::from_flat(flat) {
            Ok(overrides) => self.render(xml, &overrides),
            Err(err) => self.fail_render(err),
        }
    }

    fn fail_render(&self, err: RuntimeError) -> RuntimeResult<()> {
        warn!("render failed: {err}");
        self.sink.render_error(&err.to_string());
        Err(err)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_flat_pairs_values() {
        let overrides = StyleOverride::from_flat(&["style_bg_color", "0x112233", "style_pad_all", "4"]).unwrap();
        assert_eq!(
            overrides,
            vec![
                StyleOverride::new("style_bg_color", "0x112233"),
                StyleOverride::new("style_pad_all", "4"),
            ]
        );
        assert!(StyleOverride::from_flat::<&str>(&[]).unwrap().is_empty());
    }

    #[test]
    fn test_from_flat_rejects_odd_length() {
        let err = StyleOverride::from_flat(&["style_bg_color"]).unwrap_err();
        assert!(matches!(err, RuntimeError::InvalidOverrides(1)));
    }

    #[test]
    fn test_parse_key_value() {
        assert_eq!(
            StyleOverride::parse("style_bg_color = 0xff0000"),
            Some(StyleOverride::new("style_bg_color", "0xff0000"))
        );
        assert_eq!(StyleOverride::parse("no_equals"), None);
        assert_eq!(StyleOverride::parse("=value"), None);
    }
}
