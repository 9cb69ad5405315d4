//! Style descriptors and the shared style registry
//!
//! Styles are immutable once built. Widget factories do not build their
//! styles on first use; the engine builds a [`StyleRegistry`] once during
//! initialization and factories attach shared handles from it.

use std::collections::{BTreeMap, HashMap};
use std::sync::Arc;

use serde::Serialize;

/// A single style property value
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum StyleValue {
    /// Plain integer (sizes, paddings, opacity)
    Int(i32),
    /// 24-bit RGB color
    Color(u32),
    /// Anything else, kept verbatim
    Text(String),
}

impl StyleValue {
    /// Parse a raw attribute value
    ///
    /// `0xRRGGBB` and `#RRGGBB` become colors, decimal numbers become
    /// integers, everything else is kept as text.
    #[must_use]
    pub fn parse(raw: &str) -> Self {
        let raw = raw.trim();
        let hex = raw
            .strip_prefix("0x")
            .or_else(|| raw.strip_prefix("0X"))
            .or_else(|| raw.strip_prefix('#'));

        if let Some(hex) = hex {
            if let Ok(color) = u32::from_str_radix(hex, 16) {
                return Self::Color(color & 0x00FF_FFFF);
            }
        }

        raw.parse::<i32>()
            .map_or_else(|_| Self::Text(raw.to_string()), Self::Int)
    }

    /// Integer view of the value, if it has one
    #[must_use]
    pub fn as_int(&self) -> Option<i32> {
        match self {
            Self::Int(v) => Some(*v),
            _ => None,
        }
    }
}

/// An immutable set of style properties
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Style {
    props: BTreeMap<String, StyleValue>,
}

impl Style {
    /// Start building a style
    #[must_use]
    pub fn builder() -> StyleBuilder {
        StyleBuilder::default()
    }

    /// Get a property
    #[must_use]
    pub fn get(&self, prop: &str) -> Option<&StyleValue> {
        self.props.get(prop)
    }

    /// Get an integer property
    #[must_use]
    pub fn int(&self, prop: &str) -> Option<i32> {
        self.get(prop).and_then(StyleValue::as_int)
    }

    /// Number of properties set
    #[must_use]
    pub fn len(&self) -> usize {
        self.props.len()
    }

    /// Check if no property is set
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.props.is_empty()
    }

    /// Iterate over the properties in name order
    pub fn iter(&self) -> impl Iterator<Item = (&str, &StyleValue)> {
        self.props.iter().map(|(k, v)| (k.as_str(), v))
    }

    // Local styles are the only mutable ones; they live inside an object.
    pub(crate) fn set(&mut self, prop: impl Into<String>, value: StyleValue) {
        self.props.insert(prop.into(), value);
    }
}

/// Builder for [`Style`]
#[derive(Debug, Default)]
pub struct StyleBuilder {
    style: Style,
}

impl StyleBuilder {
    /// Set an integer property
    #[must_use]
    pub fn int(mut self, prop: &str, value: i32) -> Self {
        self.style.set(prop, StyleValue::Int(value));
        self
    }

    /// Set a color property
    #[must_use]
    pub fn color(mut self, prop: &str, rgb: u32) -> Self {
        self.style.set(prop, StyleValue::Color(rgb));
        self
    }

    /// Set `pad_left`, `pad_right`, `pad_top` and `pad_bottom` at once
    #[must_use]
    pub fn pad_all(self, value: i32) -> Self {
        self.int("pad_left", value)
            .int("pad_right", value)
            .int("pad_top", value)
            .int("pad_bottom", value)
    }

    /// Finish the style
    #[must_use]
    pub fn build(self) -> Style {
        self.style
    }
}

/// Named styles shared between all objects of the engine
#[derive(Debug, Default)]
pub struct StyleRegistry {
    styles: HashMap<String, Arc<Style>>,
}

impl StyleRegistry {
    /// Create an empty registry
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Registry holding the styles used by the built-in widgets
    #[must_use]
    pub fn builtin() -> Self {
        let mut registry = Self::new();

        registry.insert(
            "screen",
            Style::builder().color("bg_color", 0xFF_FFFF).int("bg_opa", 255).build(),
        );
        registry.insert(
            "button",
            Style::builder()
                .color("bg_color", 0x21_96F3)
                .int("radius", 6)
                .pad_all(8)
                .build(),
        );
        registry.insert(
            "slider",
            Style::builder().color("bg_color", 0x21_96F3).int("radius", 100).build(),
        );

        registry.insert(
            "slider_box.main",
            Style::builder()
                .color("bg_color", 0x66_6666)
                .int("bg_opa", 255)
                .int("border_width", 2)
                .color("border_color", 0xAA_AAAA)
                .int("radius", 20)
                .int("width", 250)
                .int("height", 100)
                .pad_all(10)
                .build(),
        );
        registry.insert(
            "slider_box.transp_cont",
            Style::builder().int("bg_opa", 0).int("border_width", 2).build(),
        );
        registry.insert("slider_box.button", Style::builder().int("radius", 100).build());

        registry
    }

    /// Add or replace a named style
    pub fn insert(&mut self, name: impl Into<String>, style: Style) {
        self.styles.insert(name.into(), Arc::new(style));
    }

    /// Get a shared handle to a named style
    #[must_use]
    pub fn get(&self, name: &str) -> Option<Arc<Style>> {
        self.styles.get(name).cloned()
    }

    /// Number of registered styles
    #[must_use]
    pub fn len(&self) -> usize {
        self.styles.len()
    }

    /// Check if the registry is empty
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.styles.is_empty()
    }
}
