//! Canvas selector resolution

/// Maps a host canvas selector to a display size
///
/// [`crate::config::CanvasConfig`] is the table-backed implementation; hosts
/// embedding the runtime in a page can resolve selectors against real
/// elements instead.
pub trait CanvasResolver {
    /// Size of the canvas named by `selector`, if it exists
    fn canvas_size(&self, selector: &str) -> Option<(u32, u32)>;
}

/// Resolves every selector to one fixed size
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FixedCanvas {
    pub width: u32,
    pub height: u32,
}

impl FixedCanvas {
    /// Resolve every selector to `width` x `height`
    #[must_use]
    pub const fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }
}

impl CanvasResolver for FixedCanvas {
    fn canvas_size(&self, _selector: &str) -> Option<(u32, u32)> {
        Some((self.width, self.height))
    }
}
