//! Widget factories
//!
//! Each widget class is a leaf factory: it creates the object's internal
//! parts and attaches shared styles. Generic attributes (`name`, geometry,
//! `style_*`) are handled by the engine; factories only see the attributes
//! specific to their class.

use std::sync::Arc;

use crate::object::{Align, Coord, FlexFlow, ObjId, Object};
use crate::style::StyleRegistry;
use crate::tree::ObjectTree;

/// Access to the tree while a factory builds or configures an object
pub struct BuildContext<'a> {
    tree: &'a mut ObjectTree,
    styles: &'a StyleRegistry,
}

impl<'a> BuildContext<'a> {
    pub(crate) fn new(tree: &'a mut ObjectTree, styles: &'a StyleRegistry) -> Self {
        Self { tree, styles }
    }

    /// Create a bare child object of `class`
    pub fn spawn(&mut self, class: &str, parent: ObjId, default_size: (Coord, Coord)) -> ObjId {
        self.tree.insert(class, Some(parent), default_size)
    }

    /// Create a label child with the given text
    pub fn spawn_label(&mut self, parent: ObjId, text: &str) -> ObjId {
        let label = self.spawn(LABEL, parent, (Coord::Content, Coord::Content));
        if let Some(obj) = self.tree.get_mut(label) {
            obj.text = Some(text.to_string());
        }
        label
    }

    /// Attach a named shared style; returns false when the style is unknown
    pub fn add_style(&mut self, obj: ObjId, style: &str) -> bool {
        match (self.styles.get(style), self.tree.get_mut(obj)) {
            (Some(style), Some(obj)) => {
                obj.styles.push(style);
                true
            }
            _ => false,
        }
    }

    /// Look up an object
    pub fn object(&self, obj: ObjId) -> Option<&Object> {
        self.tree.get(obj)
    }

    /// Look up an object for mutation
    pub fn object_mut(&mut self, obj: ObjId) -> Option<&mut Object> {
        self.tree.get_mut(obj)
    }
}

/// A widget class the engine can instantiate from XML
pub trait WidgetFactory {
    /// Tag and class name, e.g. `lv_label`
    fn class_name(&self) -> &str;

    /// Size used when neither attributes nor styles set one
    fn default_size(&self) -> (Coord, Coord) {
        (Coord::Px(100), Coord::Px(100))
    }

    /// Build internal parts after the object has been created
    fn construct(&self, _ctx: &mut BuildContext<'_>, _obj: ObjId) {}

    /// Apply a class-specific attribute; returns false if it is not recognised
    fn apply_attr(&self, _ctx: &mut BuildContext<'_>, _obj: ObjId, _key: &str, _value: &str) -> bool {
        false
    }
}

/// Base object class
pub const OBJ: &str = "lv_obj";
/// Text label class
pub const LABEL: &str = "lv_label";
/// Button class
pub const BUTTON: &str = "lv_button";
/// Slider class
pub const SLIDER: &str = "lv_slider";
/// Titled slider box class
pub const SLIDER_BOX: &str = "slider_box";

/// Factories registered by [`crate::Engine::init`]
#[must_use]
pub fn builtin_factories() -> Vec<Arc<dyn WidgetFactory>> {
    vec![
        Arc::new(ObjFactory),
        Arc::new(LabelFactory),
        Arc::new(ButtonFactory),
        Arc::new(SliderFactory),
        Arc::new(SliderBoxFactory),
    ]
}

/// Plain container
#[derive(Debug, Clone, Copy, Default)]
pub struct ObjFactory;

impl WidgetFactory for ObjFactory {
    fn class_name(&self) -> &str {
        OBJ
    }
}

/// Text label sized to its content
#[derive(Debug, Clone, Copy, Default)]
pub struct LabelFactory;

impl WidgetFactory for LabelFactory {
    fn class_name(&self) -> &str {
        LABEL
    }

    fn default_size(&self) -> (Coord, Coord) {
        (Coord::Content, Coord::Content)
    }

    fn construct(&self, ctx: &mut BuildContext<'_>, obj: ObjId) {
        if let Some(label) = ctx.object_mut(obj) {
            label.text = Some("Text".to_string());
        }
    }

    fn apply_attr(&self, ctx: &mut BuildContext<'_>, obj: ObjId, key: &str, value: &str) -> bool {
        match key {
            "text" => {
                if let Some(label) = ctx.object_mut(obj) {
                    label.text = Some(value.to_string());
                }
                true
            }
            // Scrolling and wrapping do not change the box size.
            "long_mode" => true,
            _ => false,
        }
    }
}

/// Clickable container sized to its content
#[derive(Debug, Clone, Copy, Default)]
pub struct ButtonFactory;

impl WidgetFactory for ButtonFactory {
    fn class_name(&self) -> &str {
        BUTTON
    }

    fn default_size(&self) -> (Coord, Coord) {
        (Coord::Content, Coord::Content)
    }

    fn construct(&self, ctx: &mut BuildContext<'_>, obj: ObjId) {
        ctx.add_style(obj, "button");
    }

    fn apply_attr(&self, _ctx: &mut BuildContext<'_>, _obj: ObjId, key: &str, _value: &str) -> bool {
        key == "checkable"
    }
}

/// Horizontal slider holding a value within a range
#[derive(Debug, Clone, Copy, Default)]
pub struct SliderFactory;

impl WidgetFactory for SliderFactory {
    fn class_name(&self) -> &str {
        SLIDER
    }

    fn default_size(&self) -> (Coord, Coord) {
        (Coord::Px(150), Coord::Px(10))
    }

    fn construct(&self, ctx: &mut BuildContext<'_>, obj: ObjId) {
        ctx.add_style(obj, "slider");
    }

    fn apply_attr(&self, ctx: &mut BuildContext<'_>, obj: ObjId, key: &str, value: &str) -> bool {
        let Some(slider) = ctx.object_mut(obj) else {
            return false;
        };
        let Ok(number) = value.trim().parse::<i32>() else {
            return false;
        };

        match key {
            "value" => slider.value = number,
            "min_value" | "min" => slider.range.0 = number,
            "max_value" | "max" => slider.range.1 = number,
            _ => return false,
        }

        let (min, max) = slider.range;
        slider.value = slider.value.clamp(min.min(max), max.max(min));
        true
    }
}

/// Titled box with a -/+ button pair around a slider
#[derive(Debug, Clone, Copy, Default)]
pub struct SliderBoxFactory;

impl WidgetFactory for SliderBoxFactory {
    fn class_name(&self) -> &str {
        SLIDER_BOX
    }

    fn default_size(&self) -> (Coord, Coord) {
        (Coord::Content, Coord::Content)
    }

    fn construct(&self, ctx: &mut BuildContext<'_>, obj: ObjId) {
        for style in ["slider_box.main", "slider_box.transp_cont", "slider_box.button"] {
            ctx.add_style(obj, style);
        }

        ctx.spawn_label(obj, "Title");

        let row = ctx.spawn(OBJ, obj, (Coord::Pct(100), Coord::Content));
        if let Some(cont) = ctx.object_mut(row) {
            cont.flex = Some(FlexFlow::Row);
            cont.align = Align::BottomMid;
        }

        let minus = ctx.spawn(BUTTON, row, (Coord::Content, Coord::Content));
        ctx.add_style(minus, "button");
        ctx.spawn_label(minus, "-");

        let plus = ctx.spawn(BUTTON, row, (Coord::Content, Coord::Content));
        ctx.add_style(plus, "button");
        ctx.spawn_label(plus, "+");

        let slider = ctx.spawn(SLIDER, row, SliderFactory.default_size());
        ctx.add_style(slider, "slider");
    }

    fn apply_attr(&self, ctx: &mut BuildContext<'_>, obj: ObjId, key: &str, value: &str) -> bool {
        if key != "title" {
            return false;
        }

        let title = ctx.object(obj).and_then(|o| o.children().first().copied());
        if let Some(label) = title.and_then(|id| ctx.object_mut(id)) {
            label.text = Some(value.to_string());
        }
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn with_ctx<R>(f: impl FnOnce(&mut BuildContext<'_>, ObjId) -> R) -> R {
        let mut tree = ObjectTree::new();
        let styles = StyleRegistry::builtin();
        let root = tree.insert(OBJ, None, (Coord::Px(10), Coord::Px(10)));
        let mut ctx = BuildContext::new(&mut tree, &styles);
        f(&mut ctx, root)
    }

    #[test]
    fn test_slider_value_is_clamped() {
        with_ctx(|ctx, root| {
            let slider = ctx.spawn(SLIDER, root, SliderFactory.default_size());
            assert!(SliderFactory.apply_attr(ctx, slider, "max", "50"));
            assert!(SliderFactory.apply_attr(ctx, slider, "value", "80"));
            assert_eq!(ctx.object(slider).unwrap().value(), 50);
            assert!(!SliderFactory.apply_attr(ctx, slider, "value", "lots"));
        });
    }

    #[test]
    fn test_slider_box_builds_parts() {
        with_ctx(|ctx, root| {
            let boxed = ctx.spawn(SLIDER_BOX, root, SliderBoxFactory.default_size());
            SliderBoxFactory.construct(ctx, boxed);
            assert!(SliderBoxFactory.apply_attr(ctx, boxed, "title", "Volume"));

            let obj = ctx.object(boxed).unwrap();
            assert_eq!(obj.styles().len(), 3);
            assert_eq!(obj.style_int("width"), Some(250));
            assert_eq!(obj.children().len(), 2);

            let title = obj.children()[0];
            assert_eq!(ctx.object(title).unwrap().text(), Some("Volume"));
        });
    }

    #[test]
    fn test_unknown_style_is_reported() {
        with_ctx(|ctx, root| {
            assert!(!ctx.add_style(root, "nope"));
            assert!(ctx.add_style(root, "button"));
        });
    }
}
