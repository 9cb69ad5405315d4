//! Error types for the runtime

use lvrt_engine::EngineError;
use thiserror::Error;

use crate::config::ConfigError;
use crate::lifecycle::SessionId;

/// Runtime errors
#[derive(Debug, Error)]
pub enum RuntimeError {
    /// Component XML was absent, empty or rejected by the provider
    #[error("failed to register component '{name}': {reason}")]
    Registration { name: String, reason: String },

    /// A referenced widget, element or component is not registered
    #[error("Invalid or unknown element: <{0}>")]
    UnknownElement(String),

    /// Instantiation produced no object for another reason
    #[error("render failed: {0}")]
    RenderFailure(String),

    /// Operation invoked outside a running session
    #[error("runtime is not initialized")]
    NotInitialized,

    /// `initialize` called on a running session
    #[error("runtime {0} is already initialized")]
    AlreadyInitialized(SessionId),

    /// The canvas selector or size is unusable
    #[error("invalid canvas: {0}")]
    InvalidCanvas(String),

    /// A flat override list did not hold key/value pairs
    #[error("style overrides must be key/value pairs, got {0} strings")]
    InvalidOverrides(usize),

    /// Configuration could not be loaded
    #[error(transparent)]
    Config(#[from] ConfigError),

    /// Provider failure outside rendering
    #[error("engine error: {0}")]
    Engine(#[from] EngineError),
}

impl RuntimeError {
    /// Status code reported through the host surface
    ///
    /// Render and registration failures all map to `1`; the detail travels
    /// through the host events instead.
    #[must_use]
    pub fn status_code(&self) -> i32 {
        match self {
            Self::AlreadyInitialized(_) => 1,
            Self::InvalidCanvas(_) => 2,
            Self::Config(_) | Self::Engine(_) => 3,
            _ => 1,
        }
    }
}

/// Result type alias for runtime operations
pub type RuntimeResult<T> = Result<T, RuntimeError>;
