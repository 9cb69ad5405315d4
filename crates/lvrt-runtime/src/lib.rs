//! LVRT Runtime - renders XML UI definitions for a host
//!
//! The runtime sits between a host (a browser page, an editor, a CLI) and a
//! widget-tree provider. The host initializes a [`RuntimeSession`] against a
//! canvas, registers components, submits XML documents to render and queries
//! object geometry; the runtime reports back through [`HostEvent`]s.
//!
//! # Core Components
//!
//! - [`RuntimeSession`]: Lifecycle, rendering and introspection
//! - [`WidgetProvider`]: The widget-tree engine the session drives
//! - [`DiagnosticSink`]: Log forwarding and render error state
//! - [`RuntimeConfig`]: Window, canvas and input settings
//! - [`host`]: Integer status-code wrappers
//!
//! # Example
//!
//! ```
//! use lvrt_runtime::{HostEvent, RuntimeConfig, RuntimeSession};
//!
//! let (mut session, events) = RuntimeSession::with_config(RuntimeConfig::default());
//! session.initialize("#canvas").unwrap();
//! session.render(r#"<lv_label name="greeting" text="Hello"/>"#, &[]).unwrap();
//!
//! let area = session.get_object_area("greeting").unwrap().unwrap();
//! assert_eq!((area.width, area.height), (40, 16));
//! assert!(events.try_iter().any(|event| event == HostEvent::RenderComplete));
//! ```

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Error types for runtime operations
pub mod error;

/// Runtime configuration
pub mod config;

/// Widget provider contract
pub mod provider;

/// Host events and render error state
pub mod diagnostics;

/// Component registration
pub mod registry;

/// Canvas selector resolution
pub mod canvas;

/// Frame loop registration
pub mod driver;

/// Session lifecycle
pub mod lifecycle;

/// Render pipeline
pub mod render;

/// Geometry queries and resizing
pub mod introspect;

/// Status-code host surface
pub mod host;

pub use canvas::{CanvasResolver, FixedCanvas};
pub use config::{CanvasConfig, ConfigError, InputConfig, RuntimeConfig};
pub use diagnostics::{DiagnosticSink, HostEvent, RenderAttempt};
pub use driver::{CooperativeLoop, LoopDriver};
pub use error::{RuntimeError, RuntimeResult};
pub use introspect::ObjectArea;
pub use lifecycle::{LifecyclePhase, RuntimeSession, SessionId};
pub use provider::WidgetProvider;
pub use registry::{ComponentBridge, ROOT_COMPONENT};
pub use render::{StyleOverride, SCREEN_WIDGET};
