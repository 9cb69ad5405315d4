//! Display and input handles

use std::fmt;

/// Handle to a display
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct DisplayId(u32);

impl DisplayId {
    /// Get the raw handle value
    #[must_use]
    pub const fn raw(self) -> u32 {
        self.0
    }
}

/// Handle to an input group
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct GroupId(u32);

impl GroupId {
    /// Get the raw handle value
    #[must_use]
    pub const fn raw(self) -> u32 {
        self.0
    }
}

/// Handle to an input device
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct InputDeviceId(u32);

impl InputDeviceId {
    /// Get the raw handle value
    #[must_use]
    pub const fn raw(self) -> u32 {
        self.0
    }
}

/// The drawing surface the active screen is laid out on
#[derive(Debug, Clone)]
pub struct Display {
    id: DisplayId,
    width: u32,
    height: u32,
    title: String,
    dirty: bool,
    refresh_count: u64,
}

impl Display {
    pub(crate) fn new(raw_id: u32, width: u32, height: u32) -> Self {
        Self {
            id: DisplayId(raw_id),
            width,
            height,
            title: String::new(),
            dirty: true,
            refresh_count: 0,
        }
    }

    /// Handle of this display
    #[must_use]
    pub fn id(&self) -> DisplayId {
        self.id
    }

    /// Current `(width, height)` in pixels
    #[must_use]
    pub fn resolution(&self) -> (u32, u32) {
        (self.width, self.height)
    }

    /// Window title
    #[must_use]
    pub fn title(&self) -> &str {
        &self.title
    }

    /// Whether something changed since the last refresh
    #[must_use]
    pub fn is_dirty(&self) -> bool {
        self.dirty
    }

    /// Number of completed refresh passes
    #[must_use]
    pub fn refresh_count(&self) -> u64 {
        self.refresh_count
    }

    pub(crate) fn set_title(&mut self, title: &str) {
        self.title = title.to_string();
    }

    pub(crate) fn set_resolution(&mut self, width: u32, height: u32) {
        self.width = width;
        self.height = height;
        self.dirty = true;
    }

    pub(crate) fn invalidate(&mut self) {
        self.dirty = true;
    }

    pub(crate) fn mark_refreshed(&mut self) {
        self.dirty = false;
        self.refresh_count += 1;
    }
}

impl fmt::Display for Display {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "display {} ({}x{})", self.id.0, self.width, self.height)
    }
}

/// Kind of input device
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum InputKind {
    Pointer,
    Keyboard,
    Wheel,
}

/// An input device, optionally bound to a group
#[derive(Debug, Clone)]
pub struct InputDevice {
    id: InputDeviceId,
    kind: InputKind,
    group: Option<GroupId>,
}

impl InputDevice {
    pub(crate) fn new(raw_id: u32, kind: InputKind) -> Self {
        Self {
            id: InputDeviceId(raw_id),
            kind,
            group: None,
        }
    }

    /// Handle of this device
    #[must_use]
    pub fn id(&self) -> InputDeviceId {
        self.id
    }

    /// Kind of input the device reads
    #[must_use]
    pub fn kind(&self) -> InputKind {
        self.kind
    }

    /// Group the device sends focus events to
    #[must_use]
    pub fn group(&self) -> Option<GroupId> {
        self.group
    }

    pub(crate) fn set_group(&mut self, group: Option<GroupId>) {
        self.group = group;
    }
}

/// A focus group that input devices navigate
#[derive(Debug, Clone)]
pub struct InputGroup {
    id: GroupId,
}

impl InputGroup {
    pub(crate) fn new(raw_id: u32) -> Self {
        Self { id: GroupId(raw_id) }
    }

    /// Handle of this group
    #[must_use]
    pub fn id(&self) -> GroupId {
        self.id
    }
}
