//! Widget objects and their geometry types

use std::fmt;
use std::sync::Arc;

use serde::Serialize;

use crate::style::Style;

/// Handle to a live object in the engine's tree
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
pub struct ObjId(u32);

impl ObjId {
    /// Create an object ID from a raw value
    #[must_use]
    pub const fn new(id: u32) -> Self {
        Self(id)
    }

    /// Get the raw ID value
    #[must_use]
    pub const fn raw(self) -> u32 {
        self.0
    }
}

impl fmt::Display for ObjId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Clamp a wide intermediate result into the coordinate range
#[must_use]
pub(crate) fn saturate(value: i64) -> i32 {
    i32::try_from(value).unwrap_or(if value < 0 { i32::MIN } else { i32::MAX })
}

/// Absolute object coordinates; both corners are inclusive
///
/// Coordinate arithmetic saturates at the `i32` range.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub struct Area {
    pub x1: i32,
    pub y1: i32,
    pub x2: i32,
    pub y2: i32,
}

impl Area {
    /// Build an area from a position and a size
    #[must_use]
    pub const fn from_size(x: i32, y: i32, width: i32, height: i32) -> Self {
        Self {
            x1: x,
            y1: y,
            x2: x.saturating_add(width.saturating_sub(1)),
            y2: y.saturating_add(height.saturating_sub(1)),
        }
    }

    /// Width in pixels
    #[must_use]
    pub const fn width(&self) -> i32 {
        self.x2.saturating_sub(self.x1).saturating_add(1)
    }

    /// Height in pixels
    #[must_use]
    pub const fn height(&self) -> i32 {
        self.y2.saturating_sub(self.y1).saturating_add(1)
    }

    /// The area left after removing padding on each side
    #[must_use]
    pub fn inset(&self, left: i32, top: i32, right: i32, bottom: i32) -> Self {
        let width = self.width().saturating_sub(left).saturating_sub(right).max(0);
        let height = self.height().saturating_sub(top).saturating_sub(bottom).max(0);
        Self::from_size(self.x1.saturating_add(left), self.y1.saturating_add(top), width, height)
    }
}

/// A width or height specification
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Coord {
    /// Fixed size in pixels
    Px(i32),
    /// Percentage of the parent's content box
    Pct(i32),
    /// Fit the object's own content
    Content,
}

impl Coord {
    /// Parse `"120"`, `"50%"` or `"content"`
    #[must_use]
    pub fn parse(raw: &str) -> Option<Self> {
        let raw = raw.trim();
        if raw == "content" {
            return Some(Self::Content);
        }
        if let Some(pct) = raw.strip_suffix('%') {
            return pct.trim().parse().ok().map(Self::Pct);
        }
        raw.parse().ok().map(Self::Px)
    }

    /// Resolve against the parent extent and the object's content extent
    #[must_use]
    pub fn resolve(self, parent_extent: i32, content_extent: i32) -> i32 {
        match self {
            Self::Px(v) => v,
            Self::Pct(p) => saturate(i64::from(parent_extent) * i64::from(p) / 100),
            Self::Content => content_extent,
        }
        .max(0)
    }
}

/// Object alignment inside its parent, with the engine's numeric codes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[repr(i32)]
pub enum Align {
    #[default]
    Default = 0,
    TopLeft = 1,
    TopMid = 2,
    TopRight = 3,
    BottomLeft = 4,
    BottomMid = 5,
    BottomRight = 6,
    LeftMid = 7,
    RightMid = 8,
    Center = 9,
}

impl Align {
    /// Parse an alignment name such as `"top_mid"` or `"center"`
    #[must_use]
    pub fn parse(raw: &str) -> Option<Self> {
        let align = match raw.trim() {
            "default" => Self::Default,
            "top_left" => Self::TopLeft,
            "top_mid" => Self::TopMid,
            "top_right" => Self::TopRight,
            "bottom_left" => Self::BottomLeft,
            "bottom_mid" => Self::BottomMid,
            "bottom_right" => Self::BottomRight,
            "left_mid" => Self::LeftMid,
            "right_mid" => Self::RightMid,
            "center" => Self::Center,
            _ => return None,
        };
        Some(align)
    }

    /// Numeric code reported to hosts
    #[must_use]
    pub const fn code(self) -> i32 {
        self as i32
    }

    /// Top-left corner of a `width` x `height` box aligned in `parent`
    #[must_use]
    pub fn origin(self, parent: &Area, width: i32, height: i32) -> (i32, i32) {
        let mid = |start: i32, extent: i32, size: i32| {
            saturate(i64::from(start) + (i64::from(extent) - i64::from(size)) / 2)
        };
        let end = |last: i32, size: i32| saturate(i64::from(last) - i64::from(size) + 1);

        let left = parent.x1;
        let mid_x = mid(parent.x1, parent.width(), width);
        let right = end(parent.x2, width);
        let top = parent.y1;
        let mid_y = mid(parent.y1, parent.height(), height);
        let bottom = end(parent.y2, height);

        match self {
            Self::Default | Self::TopLeft => (left, top),
            Self::TopMid => (mid_x, top),
            Self::TopRight => (right, top),
            Self::BottomLeft => (left, bottom),
            Self::BottomMid => (mid_x, bottom),
            Self::BottomRight => (right, bottom),
            Self::LeftMid => (left, mid_y),
            Self::RightMid => (right, mid_y),
            Self::Center => (mid_x, mid_y),
        }
    }
}

/// Flex flow of a container
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum FlexFlow {
    Row,
    Column,
}

impl FlexFlow {
    /// Parse `"row"` or `"column"`; wrapping variants map to the same flow
    #[must_use]
    pub fn parse(raw: &str) -> Option<Self> {
        match raw.trim() {
            "row" | "row_wrap" => Some(Self::Row),
            "column" | "column_wrap" => Some(Self::Column),
            _ => None,
        }
    }
}

/// A widget object in the tree
#[derive(Debug, Clone)]
pub struct Object {
    pub(crate) id: ObjId,
    pub(crate) class: String,
    pub(crate) name: Option<String>,
    pub(crate) parent: Option<ObjId>,
    pub(crate) children: Vec<ObjId>,
    pub(crate) x: i32,
    pub(crate) y: i32,
    pub(crate) width: Option<Coord>,
    pub(crate) height: Option<Coord>,
    pub(crate) default_size: (Coord, Coord),
    pub(crate) align: Align,
    pub(crate) flex: Option<FlexFlow>,
    pub(crate) hidden: bool,
    pub(crate) text: Option<String>,
    pub(crate) value: i32,
    pub(crate) range: (i32, i32),
    pub(crate) styles: Vec<Arc<Style>>,
    pub(crate) local_style: Style,
    pub(crate) area: Area,
    pub(crate) layout_positioned: bool,
}

impl Object {
    pub(crate) fn new(id: ObjId, class: &str, parent: Option<ObjId>, default_size: (Coord, Coord)) -> Self {
        Self {
            id,
            class: class.to_string(),
            name: None,
            parent,
            children: Vec::new(),
            x: 0,
            y: 0,
            width: None,
            height: None,
            default_size,
            align: Align::Default,
            flex: None,
            hidden: false,
            text: None,
            value: 0,
            range: (0, 100),
            styles: Vec::new(),
            local_style: Style::default(),
            area: Area::default(),
            layout_positioned: false,
        }
    }

    /// Handle of this object
    #[must_use]
    pub fn id(&self) -> ObjId {
        self.id
    }

    /// Widget class name, e.g. `lv_label`
    #[must_use]
    pub fn class(&self) -> &str {
        &self.class
    }

    /// Explicit name, if one was given
    #[must_use]
    pub fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    /// Parent object; screens have none
    #[must_use]
    pub fn parent(&self) -> Option<ObjId> {
        self.parent
    }

    /// Children in creation order
    #[must_use]
    pub fn children(&self) -> &[ObjId] {
        &self.children
    }

    /// Coordinates from the last layout pass
    #[must_use]
    pub fn area(&self) -> Area {
        self.area
    }

    /// Alignment inside the parent
    #[must_use]
    pub fn align(&self) -> Align {
        self.align
    }

    /// Whether the position comes from the parent's layout rather than x/y
    #[must_use]
    pub fn is_layout_positioned(&self) -> bool {
        self.layout_positioned
    }

    /// Whether the object is skipped by layout
    #[must_use]
    pub fn is_hidden(&self) -> bool {
        self.hidden
    }

    /// Label text, if the widget carries any
    #[must_use]
    pub fn text(&self) -> Option<&str> {
        self.text.as_deref()
    }

    /// Current value of value-carrying widgets (sliders)
    #[must_use]
    pub fn value(&self) -> i32 {
        self.value
    }

    /// Shared styles attached by the widget's factory
    #[must_use]
    pub fn styles(&self) -> &[Arc<Style>] {
        &self.styles
    }

    /// Style set directly on this object
    #[must_use]
    pub fn local_style(&self) -> &Style {
        &self.local_style
    }

    /// Resolve an integer style property; local style wins, then the most
    /// recently attached shared style.
    #[must_use]
    pub fn style_int(&self, prop: &str) -> Option<i32> {
        self.local_style
            .int(prop)
            .or_else(|| self.styles.iter().rev().find_map(|style| style.int(prop)))
    }

    pub(crate) fn padding(&self) -> (i32, i32, i32, i32) {
        let pad = |prop| self.style_int(prop).unwrap_or(0).max(0);
        (pad("pad_left"), pad("pad_top"), pad("pad_right"), pad("pad_bottom"))
    }

    pub(crate) fn width_spec(&self) -> Coord {
        self.width
            .or_else(|| self.style_int("width").map(Coord::Px))
            .unwrap_or(self.default_size.0)
    }

    pub(crate) fn height_spec(&self) -> Coord {
        self.height
            .or_else(|| self.style_int("height").map(Coord::Px))
            .unwrap_or(self.default_size.1)
    }
}

/// Serializable dump of a subtree
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TreeSnapshot {
    /// Name used for path lookups
    pub name: String,
    pub class: String,
    pub area: Area,
    pub layout_positioned: bool,
    pub align: i32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub children: Vec<TreeSnapshot>,
}

impl TreeSnapshot {
    /// Total number of objects in the snapshot
    #[must_use]
    pub fn count(&self) -> usize {
        1 + self.children.iter().map(TreeSnapshot::count).sum::<usize>()
    }
}
