//! Session lifecycle
//!
//! A [`RuntimeSession`] owns the widget provider and everything the host
//! interacts with. It moves `Uninitialized -> Running` on
//! [`RuntimeSession::initialize`] and back through `ShuttingDown` on
//! [`RuntimeSession::cleanup`]. Only a running session renders, ticks or
//! answers queries.

use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::mpsc::Receiver;

use chrono::Utc;
use log::{debug, info};
use lvrt_engine::{DisplayId, Engine, GroupId, InputDeviceId, InputKind, LogRecord, MAX_RESOLUTION};

use crate::canvas::CanvasResolver;
use crate::config::RuntimeConfig;
use crate::diagnostics::{DiagnosticSink, HostEvent};
use crate::driver::{CooperativeLoop, LoopDriver};
use crate::error::{RuntimeError, RuntimeResult};
use crate::provider::WidgetProvider;
use crate::registry::ComponentBridge;

/// Lifecycle phase of a session
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LifecyclePhase {
    /// Not initialized, or cleaned up
    Uninitialized,
    /// Display and inputs exist, frames are delivered
    Running,
    /// Cleanup in progress
    ShuttingDown,
}

static LAST_SESSION_ID: AtomicU64 = AtomicU64::new(0);

/// Identifier of one initialization of a session
///
/// Derived from the wall clock in seconds and bumped when two sessions start
/// within the same second, so ids never repeat within a process.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct SessionId(u64);

impl SessionId {
    /// Placeholder carried before the first initialization
    pub const UNASSIGNED: Self = Self(0);

    /// Allocate a fresh ID, unique within the process
    #[must_use]
    pub fn next() -> Self {
        let now = u64::try_from(Utc::now().timestamp()).unwrap_or(0);
        let previous = match LAST_SESSION_ID.fetch_update(Ordering::Relaxed, Ordering::Relaxed, |last| {
            Some(now.max(last + 1))
        }) {
            Ok(last) | Err(last) => last,
        };
        Self(now.max(previous + 1))
    }

    /// Get the raw ID value
    #[must_use]
    pub const fn raw(self) -> u64 {
        self.0
    }
}

impl fmt::Display for SessionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A runtime bound to one widget provider
pub struct RuntimeSession<P: WidgetProvider = Engine> {
    pub(crate) id: SessionId,
    pub(crate) phase: LifecyclePhase,
    pub(crate) provider: P,
    pub(crate) config: RuntimeConfig,
    pub(crate) sink: DiagnosticSink,
    pub(crate) components: ComponentBridge,
    driver: Box<dyn LoopDriver>,
    canvas: Box<dyn CanvasResolver>,
    display: Option<DisplayId>,
    group: Option<GroupId>,
    inputs: Vec<InputDeviceId>,
}

impl RuntimeSession<Engine> {
    /// Session over a fresh [`Engine`]
    #[must_use]
    pub fn with_config(config: RuntimeConfig) -> (Self, Receiver<HostEvent>) {
        Self::new(Engine::new(), config)
    }
}

impl<P: WidgetProvider> RuntimeSession<P> {
    /// Create an uninitialized session and the host's event receiver
    #[must_use]
    pub fn new(provider: P, config: RuntimeConfig) -> (Self, Receiver<HostEvent>) {
        let (sink, events) = DiagnosticSink::channel();
        let canvas = Box::new(config.canvas.clone());
        let session = Self {
            id: SessionId::UNASSIGNED,
            phase: LifecyclePhase::Uninitialized,
            provider,
            config,
            sink,
            components: ComponentBridge::new(),
            driver: Box::new(CooperativeLoop::new()),
            canvas,
            display: None,
            group: None,
            inputs: Vec::new(),
        };
        (session, events)
    }

    /// Replace the frame loop registration
    #[must_use]
    pub fn with_driver(mut self, driver: Box<dyn LoopDriver>) -> Self {
        self.driver = driver;
        self
    }

    /// Replace the canvas selector resolution
    #[must_use]
    pub fn with_canvas(mut self, canvas: Box<dyn CanvasResolver>) -> Self {
        self.canvas = canvas;
        self
    }

    /// ID of the current or most recent session
    #[must_use]
    pub fn id(&self) -> SessionId {
        self.id
    }

    /// Current lifecycle phase
    #[must_use]
    pub fn phase(&self) -> LifecyclePhase {
        self.phase
    }

    /// Whether the session is between initialize and cleanup
    #[must_use]
    pub fn is_running(&self) -> bool {
        self.phase == LifecyclePhase::Running
    }

    /// The widget provider
    #[must_use]
    pub fn provider(&self) -> &P {
        &self.provider
    }

    /// Configuration the session was created with
    #[must_use]
    pub fn config(&self) -> &RuntimeConfig {
        &self.config
    }

    /// Display created at initialization
    #[must_use]
    pub fn display(&self) -> Option<DisplayId> {
        self.display
    }

    /// Default input group created at initialization
    #[must_use]
    pub fn input_group(&self) -> Option<GroupId> {
        self.group
    }

    /// Input devices created at initialization
    #[must_use]
    pub fn input_devices(&self) -> &[InputDeviceId] {
        &self.inputs
    }

    /// Host-registered components
    #[must_use]
    pub fn components(&self) -> &ComponentBridge {
        &self.components
    }

    pub(crate) fn ensure_running(&self) -> RuntimeResult<()> {
        if self.is_running() {
            Ok(())
        } else {
            Err(RuntimeError::NotInitialized)
        }
    }

    /// Log a lifecycle note and forward it to the host
    pub(crate) fn note(&self, message: &str) {
        info!("{message}");
        self.sink.log(message);
    }

    /// Bring up the provider, display, input group and frame loop
    ///
    /// `canvas_selector` picks the display size. On failure the session
    /// stays uninitialized and the provider is torn down again.
    pub fn initialize(&mut self, canvas_selector: &str) -> RuntimeResult<()> {
        if self.phase != LifecyclePhase::Uninitialized {
            return Err(RuntimeError::AlreadyInitialized(self.id));
        }

        let (width, height) = self
            .canvas
            .canvas_size(canvas_selector)
            .filter(|&(w, h)| (1..=MAX_RESOLUTION).contains(&w) && (1..=MAX_RESOLUTION).contains(&h))
            .ok_or_else(|| RuntimeError::InvalidCanvas(format!("no usable size for canvas '{canvas_selector}'")))?;

        self.id = SessionId::next();
        self.provider.init();
        let sink = self.sink.clone();
        self.provider
            .set_log_hook(Some(Box::new(move |record: &LogRecord| sink.intercept(record.message()))));
        self.note(&format!("Initializing runtime with ID: {}", self.id));

        if let Err(err) = self.bring_up(width, height) {
            self.provider.set_log_hook(None);
            self.provider.deinit();
            self.reset_handles();
            return Err(err);
        }

        self.driver.start();
        self.phase = LifecyclePhase::Running;
        debug!("runtime {} running on a {width}x{height} canvas", self.id);
        Ok(())
    }

    fn bring_up(&mut self, width: u32, height: u32) -> RuntimeResult<()> {
        let display = self
            .provider
            .create_display(width, height, &self.config.window_title)?;
        self.display = Some(display);

        let group = self.provider.create_group()?;
        self.provider.set_default_group(Some(group));
        self.group = Some(group);

        let input = self.config.input;
        let wanted = [
            (input.pointer, InputKind::Pointer),
            (input.keyboard, InputKind::Keyboard),
            (input.wheel, InputKind::Wheel),
        ];
        for (_, kind) in wanted.into_iter().filter(|(enabled, _)| *enabled) {
            let device = self.provider.create_input(kind, group)?;
            self.inputs.push(device);
        }
        Ok(())
    }

    fn reset_handles(&mut self) {
        self.display = None;
        self.group = None;
        self.inputs.clear();
        self.components.clear();
    }

    /// Run one provider tick
    pub fn task_handler(&mut self) -> RuntimeResult<()> {
        self.ensure_running()?;
        self.provider.task_handler();
        Ok(())
    }

    /// Deliver one host frame; returns false once the loop is cancelled
    pub fn frame(&mut self) -> bool {
        if !self.is_running() || !self.driver.is_active() {
            return false;
        }
        self.provider.task_handler();
        self.driver.on_frame();
        true
    }

    /// Stop the loop, clear the screen and tear the provider down
    ///
    /// Calling this on a session that is not running does nothing.
    pub fn cleanup(&mut self) {
        if self.phase != LifecyclePhase::Running {
            debug!("cleanup requested while {:?}; nothing to do", self.phase);
            return;
        }
        self.phase = LifecyclePhase::ShuttingDown;
        self.note(&format!("Cleaning up runtime with ID: {}", self.id));

        self.driver.cancel();
        match self.provider.screen_active() {
            Some(screen) => {
                self.provider.clean(screen);
                self.note("Active screen cleaned successfully");
            }
            None => self.note("No active screen to clean"),
        }

        self.provider.deinit();
        self.reset_handles();
        self.phase = LifecyclePhase::Uninitialized;
        self.note(&format!("Cleaning up runtime is complete ID: {}", self.id));
    }
}

impl<P: WidgetProvider> fmt::Debug for RuntimeSession<P> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RuntimeSession")
            .field("id", &self.id)
            .field("phase", &self.phase)
            .field("display", &self.display)
            .field("inputs", &self.inputs.len())
            .field("components", &self.components)
            .finish_non_exhaustive()
    }
}
