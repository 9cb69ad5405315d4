//! Error types for the widget tree engine

use thiserror::Error;

use crate::object::ObjId;

/// Engine-level errors
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum EngineError {
    /// The XML text could not be parsed or has the wrong shape
    #[error("XML parse error: {0}")]
    Parse(String),

    /// A tag names neither a widget class nor a registered component
    #[error("'{0}' is not a known widget, element, or component")]
    UnknownElement(String),

    /// A component (directly or indirectly) instantiates itself
    #[error("component '{0}' instantiates itself")]
    ComponentRecursion(String),

    /// The object handle does not refer to a live object
    #[error("object {0} does not exist")]
    ObjectNotFound(ObjId),

    /// Only root objects (screens) can be loaded
    #[error("object {0} is not a screen")]
    NotAScreen(ObjId),

    /// An operation needs a display and none has been created
    #[error("no display has been created")]
    NoDisplay,

    /// Display resolution must be non-zero and fit the coordinate range
    #[error("invalid display resolution {width}x{height}")]
    InvalidResolution { width: u32, height: u32 },

    /// A display, group or input device handle is stale
    #[error("handle {0} does not exist")]
    UnknownHandle(u32),

    /// Engine has not been initialized (or was deinitialized)
    #[error("engine is not initialized")]
    NotInitialized,
}

/// Result type alias for engine operations
pub type EngineResult<T> = Result<T, EngineError>;
