//! Render settings loaded from JSON
//!
//! Every field is optional in the file; missing fields take the defaults
//! below.
//!
//! ```json
//! {
//!   "background": { "r": 16, "g": 16, "b": 32 },
//!   "default_color": { "r": 255, "g": 255, "b": 255 },
//!   "height_factor": 0.5,
//!   "screen_width": 1280,
//!   "screen_height": 720
//! }
//! ```

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

use crate::core_types::Rgba;
use crate::grid::ParserConfig;

/// Settings shared by the engine and front ends.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RenderConfig {
    /// Color of pixels no line touches
    pub background: Rgba,
    /// Color of map cells without an explicit color
    pub default_color: Rgba,
    /// Multiplier applied to every height before projecting
    pub height_factor: f64,
    /// Target screen width for auto-fit, in pixels
    pub screen_width: u32,
    /// Target screen height for auto-fit, in pixels
    pub screen_height: u32,
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            background: Rgba::BLACK,
            default_color: Rgba::WHITE,
            height_factor: 1.0,
            screen_width: 1024,
            screen_height: 1024,
        }
    }
}

impl RenderConfig {
    /// Parse settings from a JSON string.
    ///
    /// # Errors
    /// Returns [`ConfigError::Parse`] if the text is not a valid config
    pub fn from_json_str(text: &str) -> Result<Self, ConfigError> {
        serde_json::from_str(text).map_err(ConfigError::Parse)
    }

    /// Load settings from a JSON file.
    ///
    /// # Errors
    /// Returns error if the file cannot be read or parsed
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let contents = fs::read_to_string(path).map_err(ConfigError::Io)?;
        Self::from_json_str(&contents)
    }

    pub fn parser_config(&self) -> ParserConfig {
        ParserConfig {
            default_color: self.default_color,
        }
    }
}

/// Errors that can occur while loading a [`RenderConfig`]
#[derive(Debug)]
pub enum ConfigError {
    /// Failed to read the file
    Io(std::io::Error),
    /// Failed to parse the file contents
    Parse(serde_json::Error),
}

impl std::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ConfigError::Io(e) => write!(f, "Failed to read config: {e}"),
            ConfigError::Parse(e) => write!(f, "Failed to parse config: {e}"),
        }
    }
}

impl std::error::Error for ConfigError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ConfigError::Io(e) => Some(e),
            ConfigError::Parse(e) => Some(e),
        }
    }
}
