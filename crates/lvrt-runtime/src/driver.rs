//! Per-frame callback registration
//!
//! The host owns the actual loop (a browser animation frame, a timer, a
//! `while` in a CLI). The runtime only registers interest through a
//! [`LoopDriver`] and is called back via [`crate::RuntimeSession::frame`].

/// Host-side frame loop registration
pub trait LoopDriver {
    /// Start delivering frames
    fn start(&mut self);

    /// Stop delivering frames; no frame reaches the runtime afterwards
    fn cancel(&mut self);

    fn is_active(&self) -> bool;

    /// Called after each delivered frame
    fn on_frame(&mut self) {}
}

/// Loop driven by whoever calls `frame`, one frame per call
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct CooperativeLoop {
    active: bool,
    frames: u64,
}

impl CooperativeLoop {
    /// Create an inactive loop
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Frames delivered since the last `start`
    #[must_use]
    pub fn frames(&self) -> u64 {
        self.frames
    }
}

impl LoopDriver for CooperativeLoop {
    fn start(&mut self) {
        self.active = true;
        self.frames = 0;
    }

    fn cancel(&mut self) {
        self.active = false;
    }

    fn is_active(&self) -> bool {
        self.active
    }

    fn on_frame(&mut self) {
        self.frames += 1;
    }
}
