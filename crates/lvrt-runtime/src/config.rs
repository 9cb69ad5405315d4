//! Runtime configuration (`lvrt.toml`) parsing and validation.

use std::collections::BTreeMap;
use std::path::Path;

use log::LevelFilter;
use lvrt_engine::MAX_RESOLUTION;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::canvas::CanvasResolver;

/// Canvas size used when no selector matches and none is configured.
pub const DEFAULT_CANVAS_SIZE: [u32; 2] = [800, 480];

/// Title given to the display window.
pub const DEFAULT_WINDOW_TITLE: &str = "LVRT Preview";

/// Errors that can occur when loading a configuration.
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("failed to read config file: {0}")]
    Io(#[from] std::io::Error),

    #[error("failed to parse config: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("invalid canvas size {width}x{height} for '{selector}'")]
    InvalidCanvasSize { selector: String, width: u32, height: u32 },
}

/// The complete runtime configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct RuntimeConfig {
    /// Title of the display window.
    pub window_title: String,

    /// Maximum level of runtime log output.
    pub log_level: LevelFilter,

    /// Canvas selector table.
    pub canvas: CanvasConfig,

    /// Which input devices are created at initialization.
    pub input: InputConfig,
}

/// Canvas sizes, keyed by the host's canvas selector.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct CanvasConfig {
    /// Size for selectors missing from `selectors`; `None` rejects them.
    pub default_size: Option<[u32; 2]>,

    /// Explicit sizes per selector.
    pub selectors: BTreeMap<String, [u32; 2]>,
}

/// Input devices to create.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct InputConfig {
    pub pointer: bool,
    pub keyboard: bool,
    pub wheel: bool,
}

impl Default for RuntimeConfig {
    fn default() -> Self {
        Self {
            window_title: DEFAULT_WINDOW_TITLE.to_string(),
            log_level: LevelFilter::Info,
            canvas: CanvasConfig::default(),
            input: InputConfig::default(),
        }
    }
}

impl Default for CanvasConfig {
    fn default() -> Self {
        Self {
            default_size: Some(DEFAULT_CANVAS_SIZE),
            selectors: BTreeMap::new(),
        }
    }
}

impl Default for InputConfig {
    fn default() -> Self {
        Self {
            pointer: true,
            keyboard: false,
            wheel: false,
        }
    }
}

impl RuntimeConfig {
    /// Load a configuration from a file.
    ///
    /// # Errors
    /// Returns an error if the file cannot be read, parsed or validated.
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)?;
        Self::parse(&content)
    }

    /// Parse a configuration from TOML text.
    ///
    /// # Errors
    /// Returns an error if the text is not valid TOML or fails validation.
    pub fn parse(content: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    fn validate(&self) -> Result<(), ConfigError> {
        let default = self.canvas.default_size.map(|size| ("<default>", size));
        let explicit = self.canvas.selectors.iter().map(|(name, size)| (name.as_str(), *size));

        for (selector, [width, height]) in default.into_iter().chain(explicit) {
            if !(1..=MAX_RESOLUTION).contains(&width) || !(1..=MAX_RESOLUTION).contains(&height) {
                return Err(ConfigError::InvalidCanvasSize {
                    selector: selector.to_string(),
                    width,
                    height,
                });
            }
        }
        Ok(())
    }

    /// Serialize the configuration to TOML.
    ///
    /// # Errors
    /// Returns an error if serialization fails.
    pub fn to_toml_string(&self) -> Result<String, toml::ser::Error> {
        toml::to_string_pretty(self)
    }
}

impl CanvasResolver for CanvasConfig {
    fn canvas_size(&self, selector: &str) -> Option<(u32, u32)> {
        self.selectors
            .get(selector)
            .copied()
            .or(self.default_size)
            .map(|[width, height]| (width, height))
    }
}
