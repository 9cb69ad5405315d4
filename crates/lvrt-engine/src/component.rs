//! XML component definitions
//!
//! A definition is either a bare view element:
//!
//! ```xml
//! <lv_obj width="200"><lv_label text="Hi"/></lv_obj>
//! ```
//!
//! or a full component with an API and a view:
//!
//! ```xml
//! <component>
//!   <api><prop name="title" default="Volume"/></api>
//!   <view extends="lv_obj"><lv_label text="$title"/></view>
//! </component>
//! ```

use std::collections::{BTreeMap, HashMap};
use std::sync::Arc;

use crate::error::{EngineError, EngineResult};
use crate::xml::{parse_document, XmlNode};

/// Base widget of a view without an `extends` attribute
pub const DEFAULT_BASE: &str = "lv_obj";

/// A declared component property
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PropDef {
    pub name: String,
    pub default: Option<String>,
}

/// A parsed, registered component
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ComponentDef {
    name: String,
    source: String,
    props: Vec<PropDef>,
    view: XmlNode,
}

impl ComponentDef {
    /// Parse a component definition from XML text
    pub fn parse(name: &str, source: &str) -> EngineResult<Self> {
        let root = parse_document(source)?;

        let (props, view) = if root.tag == "component" {
            let props = root
                .child("api")
                .map(|api| {
                    api.children
                        .iter()
                        .filter(|child| child.tag == "prop")
                        .map(|prop| {
                            prop.attr("name")
                                .map(|prop_name| PropDef {
                                    name: prop_name.to_string(),
                                    default: prop.attr("default").map(str::to_string),
                                })
                                .ok_or_else(|| {
                                    EngineError::Parse(format!("<prop> in '{name}' has no name"))
                                })
                        })
                        .collect::<EngineResult<Vec<_>>>()
                })
                .transpose()?
                .unwrap_or_default();

            let view = root
                .child("view")
                .ok_or_else(|| EngineError::Parse(format!("component '{name}' has no <view>")))?;

            let mut base = XmlNode::new(view.attr("extends").unwrap_or(DEFAULT_BASE));
            base.attrs = view
                .attrs
                .iter()
                .filter(|(key, _)| key != "extends")
                .cloned()
                .collect();
            base.children.clone_from(&view.children);

            (props, base)
        } else {
            (Vec::new(), root)
        };

        Ok(Self {
            name: name.to_string(),
            source: source.to_string(),
            props,
            view,
        })
    }

    /// Name the definition is registered under
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// XML text the definition was parsed from
    #[must_use]
    pub fn source(&self) -> &str {
        &self.source
    }

    /// Declared props with their defaults
    #[must_use]
    pub fn props(&self) -> &[PropDef] {
        &self.props
    }

    /// The view element; its tag is the base widget or component
    #[must_use]
    pub fn view(&self) -> &XmlNode {
        &self.view
    }

    /// Whether `attr` names a declared property
    #[must_use]
    pub fn has_prop(&self, attr: &str) -> bool {
        self.props.iter().any(|prop| prop.name == attr)
    }

    /// Property values for one instance: declared defaults overlaid with the
    /// instance attributes that name a property
    #[must_use]
    pub fn bind_props(&self, instance_attrs: &[(String, String)]) -> HashMap<String, String> {
        let mut values: HashMap<String, String> = self
            .props
            .iter()
            .filter_map(|prop| prop.default.clone().map(|d| (prop.name.clone(), d)))
            .collect();

        for (key, value) in instance_attrs {
            if self.has_prop(key) {
                values.insert(key.clone(), value.clone());
            }
        }
        values
    }
}

/// Replace a whole-value `$prop` reference with the bound property value
#[must_use]
pub fn substitute<'a>(value: &'a str, props: &'a HashMap<String, String>) -> Option<&'a str> {
    match value.strip_prefix('$') {
        Some(prop) => props.get(prop).map(String::as_str),
        None => Some(value),
    }
}

/// Components by name; registering a name again replaces the old definition
#[derive(Debug, Default)]
pub struct ComponentRegistry {
    components: BTreeMap<String, Arc<ComponentDef>>,
}

impl ComponentRegistry {
    /// Create an empty registry
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse and register; on error the previous definition is kept
    pub fn register_from_data(&mut self, name: &str, source: &str) -> EngineResult<()> {
        let def = ComponentDef::parse(name, source)?;
        self.components.insert(name.to_string(), Arc::new(def));
        Ok(())
    }

    /// Remove a definition; returns whether it existed
    pub fn unregister(&mut self, name: &str) -> bool {
        self.components.remove(name).is_some()
    }

    /// Definition registered under `name`
    #[must_use]
    pub fn get(&self, name: &str) -> Option<Arc<ComponentDef>> {
        self.components.get(name).cloned()
    }

    /// Whether `name` is registered
    #[must_use]
    pub fn contains(&self, name: &str) -> bool {
        self.components.contains_key(name)
    }

    /// Registered names in sorted order
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.components.keys().map(String::as_str)
    }

    /// Number of registered definitions
    #[must_use]
    pub fn len(&self) -> usize {
        self.components.len()
    }

    /// Whether no definitions are registered
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.components.is_empty()
    }

    /// Drop every definition
    pub fn clear(&mut self) {
        self.components.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const CARD: &str = r#"
        <component>
            <api>
                <prop name="title" default="Volume"/>
                <prop name="hint"/>
            </api>
            <view extends="lv_button" width="120">
                <lv_label text="$title"/>
            </view>
        </component>
    "#;

    #[test]
    fn test_parse_bare_view() {
        let def = ComponentDef::parse("plain", "<lv_obj><lv_label/></lv_obj>").unwrap();
        assert_eq!(def.view().tag, "lv_obj");
        assert!(def.props().is_empty());
    }

    #[test]
    fn test_parse_full_component() {
        let def = ComponentDef::parse("card", CARD).unwrap();

        assert_eq!(def.view().tag, "lv_button");
        assert_eq!(def.view().attr("width"), Some("120"));
        assert_eq!(def.view().attr("extends"), None);
        assert_eq!(def.props().len(), 2);
        assert!(def.has_prop("title"));
    }

    #[test]
    fn test_component_without_view_is_rejected() {
        let err = ComponentDef::parse("broken", "<component><api/></component>").unwrap_err();
        assert!(matches!(err, EngineError::Parse(msg) if msg.contains("<view>")));
    }

    #[test]
    fn test_bind_props_and_substitute() {
        let def = ComponentDef::parse("card", CARD).unwrap();

        let defaults = def.bind_props(&[]);
        assert_eq!(substitute("$title", &defaults), Some("Volume"));
        assert_eq!(substitute("$hint", &defaults), None);
        assert_eq!(substitute("plain", &defaults), Some("plain"));

        let bound = def.bind_props(&[
            ("title".to_string(), "Bass".to_string()),
            ("width".to_string(), "10".to_string()),
        ]);
        assert_eq!(substitute("$title", &bound), Some("Bass"));
        assert!(!bound.contains_key("width"));
    }

    #[test]
    fn test_failed_registration_keeps_previous() {
        let mut registry = ComponentRegistry::new();
        registry.register_from_data("x", "<lv_obj/>").unwrap();

        assert!(registry.register_from_data("x", "<lv_obj>").is_err());
        assert_eq!(registry.get("x").unwrap().source(), "<lv_obj/>");

        registry.register_from_data("x", "<lv_label/>").unwrap();
        assert_eq!(registry.get("x").unwrap().view().tag, "lv_label");
        assert_eq!(registry.len(), 1);
    }
}
