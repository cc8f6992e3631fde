//! # Drawkit Settings
//!
//! Editor configuration: default canvas, history depth, pointer tolerance and
//! the default style applied to newly drawn shapes. Stored as JSON or TOML in
//! the platform configuration directory.

pub mod config;

pub use config::{CanvasSettings, Config, HistorySettings, InputSettings, StyleDefaults};
