//! Configuration loading and parsing.
//!
//! Parses `runbox.toml` (or an override path provided by the binary). Every
//! field has a default mirroring the stock launcher, so a missing file, a
//! missing section or an unparsable file all yield a usable configuration.
//! Unknown fields are ignored (TOML deserialization tolerance).
//!
//! The configuration is static for the process lifetime: it is loaded once,
//! validated once via [`Config::validated`], and then only borrowed.

use anyhow::Result;
use serde::Deserialize;
use std::{fs, path::PathBuf};
use tracing::{info, warn};

pub const CONFIG_FILE_NAME: &str = "runbox.toml";

/// Smallest capacity that can still hold one byte of text: an insert needs
/// `len + n < max - 1`, so `max = 3` admits exactly one byte.
pub const MIN_INPUT_MAX: usize = 3;

#[derive(Debug, Deserialize, Clone, PartialEq, Eq)]
pub struct ColorConfig {
    #[serde(default = "ColorConfig::default_background")]
    pub background: String,
    #[serde(default = "ColorConfig::default_foreground")]
    pub foreground: String,
}

impl Default for ColorConfig {
    fn default() -> Self {
        Self {
            background: Self::default_background(),
            foreground: Self::default_foreground(),
        }
    }
}

impl ColorConfig {
    fn default_background() -> String {
        "#1e1e2e".to_string()
    }
    fn default_foreground() -> String {
        "#cdd6f4".to_string()
    }
}

#[derive(Debug, Deserialize, Clone, PartialEq, Eq)]
pub struct FontConfig {
    #[serde(default = "FontConfig::default_name")]
    pub name: String,
}

impl Default for FontConfig {
    fn default() -> Self {
        Self {
            name: Self::default_name(),
        }
    }
}

impl FontConfig {
    fn default_name() -> String {
        "monospace:size=12".to_string()
    }
}

/// Window interior size in cells plus horizontal text padding per side.
#[derive(Debug, Deserialize, Clone, Copy, PartialEq, Eq)]
pub struct WindowConfig {
    #[serde(default = "WindowConfig::default_width")]
    pub width: u16,
    #[serde(default = "WindowConfig::default_height")]
    pub height: u16,
    #[serde(default = "WindowConfig::default_padding")]
    pub padding: u16,
}

impl Default for WindowConfig {
    fn default() -> Self {
        Self {
            width: Self::default_width(),
            height: Self::default_height(),
            padding: Self::default_padding(),
        }
    }
}

impl WindowConfig {
    const fn default_width() -> u16 {
        60
    }
    const fn default_height() -> u16 {
        1
    }
    const fn default_padding() -> u16 {
        1
    }
}

#[derive(Debug, Deserialize, Clone, Copy, PartialEq, Eq)]
pub struct InputConfig {
    /// Buffer capacity in bytes, including the reserved terminator slot.
    #[serde(default = "InputConfig::default_max")]
    pub max: usize,
}

impl Default for InputConfig {
    fn default() -> Self {
        Self {
            max: Self::default_max(),
        }
    }
}

impl InputConfig {
    const fn default_max() -> usize {
        256
    }
}

#[derive(Debug, Deserialize, Default, Clone, PartialEq, Eq)]
pub struct ConfigFile {
    #[serde(default)]
    pub colors: ColorConfig,
    #[serde(default)]
    pub font: FontConfig,
    #[serde(default)]
    pub window: WindowConfig,
    #[serde(default)]
    pub input: InputConfig,
}

#[derive(Debug, Clone, Default)]
pub struct Config {
    pub source: Option<PathBuf>,
    pub file: ConfigFile, // parsed (or default) data
}

/// Best-effort config path following platform conventions (XDG / AppData Roaming).
pub fn discover() -> PathBuf {
    let local = PathBuf::from(CONFIG_FILE_NAME);
    if local.exists() {
        return local;
    }
    if let Some(dir) = dirs::config_dir() {
        return dir.join("runbox").join(CONFIG_FILE_NAME);
    }
    PathBuf::from(CONFIG_FILE_NAME)
}

pub fn load_from(path: Option<PathBuf>) -> Result<Config> {
    let path = path.unwrap_or_else(discover);
    let Ok(content) = fs::read_to_string(&path) else {
        info!(target: "config", path = %path.display(), "config_absent_using_defaults");
        return Ok(Config::default());
    };
    match toml::from_str::<ConfigFile>(&content) {
        Ok(file) => Ok(Config {
            source: Some(path),
            file,
        }),
        Err(e) => {
            // Parse errors fall back to defaults; the launcher must still start.
            warn!(target: "config", path = %path.display(), error = %e, "config_parse_failed");
            Ok(Config::default())
        }
    }
}

impl Config {
    /// Clamp values the session cannot work with, logging each adjustment.
    pub fn validated(mut self) -> Self {
        let window = &mut self.file.window;
        if window.width == 0 {
            info!(target: "config", field = "window.width", raw = 0, clamped = 1, "config_value_clamped");
            window.width = 1;
        }
        if window.height == 0 {
            info!(target: "config", field = "window.height", raw = 0, clamped = 1, "config_value_clamped");
            window.height = 1;
        }
        let input = &mut self.file.input;
        if input.max < MIN_INPUT_MAX {
            info!(
                target: "config",
                field = "input.max",
                raw = input.max,
                clamped = MIN_INPUT_MAX,
                "config_value_clamped"
            );
            input.max = MIN_INPUT_MAX;
        }
        self
    }

    pub fn colors(&self) -> &ColorConfig {
        &self.file.colors
    }

    pub fn font_name(&self) -> &str {
        &self.file.font.name
    }

    pub fn window(&self) -> WindowConfig {
        self.file.window
    }

    pub fn input_max(&self) -> usize {
        self.file.input.max
    }
}
