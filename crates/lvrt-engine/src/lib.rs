//! LVRT Engine - retained-mode widget tree with XML components
//!
//! This crate is the widget-tree provider behind the LVRT runtime. It keeps
//! a tree of widget objects, instantiates them from XML component
//! definitions, lays them out on a display and reports everything it does
//! through a log hook.
//!
//! # Core Components
//!
//! - [`Engine`]: Owns the object tree, components, display and input state
//! - [`ComponentRegistry`]: Named XML component definitions
//! - [`WidgetFactory`]: Leaf constructors for widget classes
//! - [`StyleRegistry`]: Immutable shared styles, built once at init
//! - [`ObjectTree`]: Object arena with name-path lookups

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Error types for engine operations
pub mod error;

/// XML documents as owned element trees
pub mod xml;

/// Component definitions and registry
pub mod component;

/// Widget objects and geometry
pub mod object;

/// Object arena
pub mod tree;

/// Style descriptors
pub mod style;

/// Widget factories
pub mod widgets;

/// Box layout
pub mod layout;

/// Display and input handles
pub mod display;

/// Log records and hook
pub mod logging;

/// The engine itself
pub mod engine;

pub use component::{ComponentDef, ComponentRegistry, PropDef};
pub use display::{Display, DisplayId, GroupId, InputDevice, InputDeviceId, InputGroup, InputKind};
pub use engine::{Engine, MAX_RESOLUTION};
pub use error::{EngineError, EngineResult};
pub use logging::{LogHook, LogRecord};
pub use object::{Align, Area, Coord, FlexFlow, ObjId, Object, TreeSnapshot};
pub use style::{Style, StyleBuilder, StyleRegistry, StyleValue};
pub use tree::ObjectTree;
pub use widgets::{BuildContext, WidgetFactory};
pub use xml::{parse_document, XmlNode};
