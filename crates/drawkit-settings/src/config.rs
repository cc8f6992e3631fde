//! Configuration and settings management for drawkit
//!
//! Provides configuration file handling and validation.
//! Supports JSON and TOML file formats stored in platform-specific directories.
//!
//! Configuration is organized into logical sections:
//! - Canvas defaults (size, background) for new documents
//! - History depth (number of retained undo steps)
//! - Input tolerances (resize-handle grab distance)
//! - Style defaults for newly created shapes

use drawkit_core::{Color, Error, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Canvas defaults for new documents
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CanvasSettings {
    /// Width of a new canvas in pixels
    pub width: u32,
    /// Height of a new canvas in pixels
    pub height: u32,
    /// Background color of a new canvas
    pub background: Color,
}

impl Default for CanvasSettings {
    fn default() -> Self {
        Self {
            width: 800,
            height: 600,
            background: Color::WHITE,
        }
    }
}

/// Undo history settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct HistorySettings {
    /// Number of snapshots retained, including the current one
    pub capacity: usize,
}

impl Default for HistorySettings {
    fn default() -> Self {
        Self { capacity: 100 }
    }
}

/// Pointer input settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct InputSettings {
    /// Distance in screen pixels within which a resize handle is grabbed
    pub handle_tolerance_px: f64,
}

impl Default for InputSettings {
    fn default() -> Self {
        Self {
            handle_tolerance_px: 5.0,
        }
    }
}

/// Style applied to newly created shapes
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct StyleDefaults {
    pub stroke_color: Color,
    pub fill_color: Color,
    pub text_color: Color,
    pub text_background: Color,
    /// Stroke width in canvas units
    pub thickness: f64,
    /// Corner rounding radius for rectangles and triangles
    pub corner_round: f64,
    /// Rotation in degrees for rectangles and ovals
    pub rotation: f64,
    /// Opening half-angle in degrees at a triangle's apex
    pub triangle_angle: f64,
    /// Font description, family followed by size ("Sans 12")
    pub font_name: String,
}

impl Default for StyleDefaults {
    fn default() -> Self {
        Self {
            stroke_color: Color::BLACK,
            fill_color: Color::TRANSPARENT,
            text_color: Color::BLACK,
            text_background: Color::TRANSPARENT,
            thickness: 2.0,
            corner_round: 0.0,
            rotation: 0.0,
            triangle_angle: 30.0,
            font_name: "Sans 12".to_string(),
        }
    }
}

/// Complete editor configuration
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Canvas defaults
    pub canvas: CanvasSettings,
    /// History settings
    pub history: HistorySettings,
    /// Input settings
    pub input: InputSettings,
    /// Default shape style
    pub style: StyleDefaults,
}

impl Config {
    /// Create new config with defaults
    pub fn new() -> Self {
        Self::default()
    }

    /// Default location of the config file (`<config dir>/drawkit/config.toml`)
    pub fn default_path() -> Option<PathBuf> {
        dirs::config_dir().map(|dir| dir.join("drawkit").join("config.toml"))
    }

    /// Load config from file (JSON or TOML)
    pub fn load_from_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;

        let config: Self = if path.extension().is_some_and(|ext| ext == "json") {
            serde_json::from_str(&content)
                .map_err(|e| Error::config(format!("Invalid JSON config: {}", e)))?
        } else if path.extension().is_some_and(|ext| ext == "toml") {
            toml::from_str(&content)
                .map_err(|e| Error::config(format!("Invalid TOML config: {}", e)))?
        } else {
            return Err(Error::config("Config file must be .json or .toml"));
        };

        config.validate()?;
        tracing::debug!("Loaded config from {}", path.display());
        Ok(config)
    }

    /// Load the config at [`Config::default_path`], falling back to defaults
    /// when there is no config file yet.
    pub fn load_or_default() -> Result<Self> {
        match Self::default_path() {
            Some(path) if path.exists() => Self::load_from_file(&path),
            _ => Ok(Self::default()),
        }
    }

    /// Save config to file (JSON or TOML)
    pub fn save_to_file(&self, path: &Path) -> Result<()> {
        self.validate()?;

        let content = if path.extension().is_some_and(|ext| ext == "json") {
            serde_json::to_string_pretty(self)
                .map_err(|e| Error::config(format!("Failed to serialize config: {}", e)))?
        } else if path.extension().is_some_and(|ext| ext == "toml") {
            toml::to_string_pretty(self)
                .map_err(|e| Error::config(format!("Failed to serialize config: {}", e)))?
        } else {
            return Err(Error::config("Config file must be .json or .toml"));
        };

        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        std::fs::write(path, content)?;

        Ok(())
    }

    /// Validate configuration
    pub fn validate(&self) -> Result<()> {
        if self.canvas.width == 0 || self.canvas.height == 0 {
            return Err(Error::config("Canvas size must be at least 1x1"));
        }

        if self.history.capacity < 2 {
            return Err(Error::config(format!(
                "History capacity must be >= 2, got {}",
                self.history.capacity
            )));
        }

        let tolerance = self.input.handle_tolerance_px;
        if !tolerance.is_finite() || tolerance <= 0.0 {
            return Err(Error::config(format!(
                "Handle tolerance must be > 0, got {}",
                tolerance
            )));
        }

        if !self.style.thickness.is_finite() || self.style.thickness < 0.0 {
            return Err(Error::config("Stroke thickness must be >= 0"));
        }

        if !self.style.corner_round.is_finite() || self.style.corner_round < 0.0 {
            return Err(Error::config("Corner round must be >= 0"));
        }

        let angle = self.style.triangle_angle;
        if !(angle > 0.0 && angle < 90.0) {
            return Err(Error::config(format!(
                "Triangle angle must be between 0 and 90 degrees, got {}",
                angle
            )));
        }

        Ok(())
    }
}
