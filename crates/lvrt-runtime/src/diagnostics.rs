//! Diagnostic sink and host events
//!
//! Every provider log line is forwarded to the host as [`HostEvent::Log`].
//! While a render attempt is open, lines reporting an unknown element also
//! record that element's name, so the pipeline can still name the culprit
//! when the provider only reports it through its log.

use std::cell::RefCell;
use std::rc::Rc;
use std::sync::mpsc::{self, Receiver, Sender};

use log::debug;

/// Substring identifying an unknown-element log line
pub const UNKNOWN_ELEMENT_MARKER: &str = "not a known widget";

/// Longest element name recorded from a log line, in bytes
pub const MAX_ELEMENT_NAME_LEN: usize = 255;

/// Event delivered to the host
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HostEvent {
    /// One provider or runtime log line
    Log(String),
    /// A render attempt failed
    RenderError(String),
    /// A render attempt succeeded
    RenderComplete,
}

impl HostEvent {
    /// Wire name of the event
    #[must_use]
    pub fn name(&self) -> &'static str {
        match self {
            Self::Log(_) => "lvgl-log",
            Self::RenderError(_) => "lvgl-render-error",
            Self::RenderComplete => "xml-is-rendered",
        }
    }

    /// Event payload, if any
    #[must_use]
    pub fn detail(&self) -> Option<&str> {
        match self {
            Self::Log(detail) | Self::RenderError(detail) => Some(detail),
            Self::RenderComplete => None,
        }
    }
}

/// Element name quoted in an unknown-element log line
///
/// The name runs from the first single quote to the next one, or to the end
/// of the line, capped at [`MAX_ELEMENT_NAME_LEN`] bytes.
#[must_use]
pub fn unknown_element_name(line: &str) -> Option<String> {
    if !line.contains(UNKNOWN_ELEMENT_MARKER) {
        return None;
    }
    let name = line.split('\'').nth(1)?;
    Some(truncate(name, MAX_ELEMENT_NAME_LEN).to_string())
}

fn truncate(text: &str, max: usize) -> &str {
    if text.len() <= max {
        return text;
    }
    let mut end = max;
    while !text.is_char_boundary(end) {
        end -= 1;
    }
    &text[..end]
}

#[derive(Debug, Default)]
struct AttemptState {
    unknown_element: Option<String>,
}

type AttemptSlot = Rc<RefCell<Option<AttemptState>>>;

/// Forwards diagnostics to the host and tracks the open render attempt
#[derive(Debug, Clone)]
pub struct DiagnosticSink {
    events: Sender<HostEvent>,
    attempt: AttemptSlot,
}

impl DiagnosticSink {
    /// Create a sink and the receiver the host reads events from
    #[must_use]
    pub fn channel() -> (Self, Receiver<HostEvent>) {
        let (events, receiver) = mpsc::channel();
        let sink = Self {
            events,
            attempt: Rc::new(RefCell::new(None)),
        };
        (sink, receiver)
    }

    /// Handle one provider log line
    pub fn intercept(&self, line: &str) {
        if let Some(name) = unknown_element_name(line) {
            if let Some(state) = self.attempt.borrow_mut().as_mut() {
                state.unknown_element.get_or_insert(name);
            }
        }
        self.emit(HostEvent::Log(line.to_string()));
    }

    /// Forward a runtime log line
    pub fn log(&self, line: &str) {
        self.emit(HostEvent::Log(line.to_string()));
    }

    /// Report a failed render attempt
    pub fn render_error(&self, message: &str) {
        self.emit(HostEvent::RenderError(message.to_string()));
    }

    /// Report a successful render attempt
    pub fn render_complete(&self) {
        self.emit(HostEvent::RenderComplete);
    }

    /// Open a render attempt with cleared error state
    ///
    /// The state is cleared again when the returned guard drops.
    #[must_use]
    pub fn begin_attempt(&self) -> RenderAttempt {
        *self.attempt.borrow_mut() = Some(AttemptState::default());
        RenderAttempt {
            slot: Rc::clone(&self.attempt),
        }
    }

    fn emit(&self, event: HostEvent) {
        if self.events.send(event).is_err() {
            debug!("host event receiver dropped");
        }
    }
}

/// Error state of one render attempt
#[derive(Debug)]
pub struct RenderAttempt {
    slot: AttemptSlot,
}

impl RenderAttempt {
    /// First unknown element reported through the log during this attempt
    #[must_use]
    pub fn unknown_element(&self) -> Option<String> {
        self.slot
            .borrow()
            .as_ref()
            .and_then(|state| state.unknown_element.clone())
    }
}

impl Drop for RenderAttempt {
    fn drop(&mut self) {
        self.slot.borrow_mut().take();
    }
}
