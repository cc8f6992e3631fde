//! RGBA colors with 16-bit normalized channels.
//!
//! Channels are stored as `u16` so a color survives the document format
//! (which persists exactly four `u16` values) without drift.

use serde::{Deserialize, Serialize};

/// Straight-alpha RGBA color, each channel normalized to `0..=u16::MAX`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Color {
    pub r: u16,
    pub g: u16,
    pub b: u16,
    pub a: u16,
}

impl Color {
    pub const BLACK: Color = Color::from_u16(0, 0, 0, u16::MAX);
    pub const WHITE: Color = Color::from_u16(u16::MAX, u16::MAX, u16::MAX, u16::MAX);
    pub const RED: Color = Color::from_u16(u16::MAX, 0, 0, u16::MAX);
    pub const TRANSPARENT: Color = Color::from_u16(0, 0, 0, 0);

    /// Creates a color from raw 16-bit channels.
    pub const fn from_u16(r: u16, g: u16, b: u16, a: u16) -> Self {
        Self { r, g, b, a }
    }

    /// Creates a color from normalized `[0, 1]` channels (clamped).
    pub fn from_rgba(r: f64, g: f64, b: f64, a: f64) -> Self {
        Self {
            r: quantize(r),
            g: quantize(g),
            b: quantize(b),
            a: quantize(a),
        }
    }

    /// Creates an opaque color from normalized channels.
    pub fn from_rgb(r: f64, g: f64, b: f64) -> Self {
        Self::from_rgba(r, g, b, 1.0)
    }

    /// Creates a color from 8-bit channels.
    pub fn from_rgba8(r: u8, g: u8, b: u8, a: u8) -> Self {
        // 0xFF * 0x101 == 0xFFFF, so 8-bit values map exactly onto the range.
        Self::from_u16(
            r as u16 * 0x101,
            g as u16 * 0x101,
            b as u16 * 0x101,
            a as u16 * 0x101,
        )
    }

    pub fn red(&self) -> f64 {
        normalize(self.r)
    }

    pub fn green(&self) -> f64 {
        normalize(self.g)
    }

    pub fn blue(&self) -> f64 {
        normalize(self.b)
    }

    pub fn alpha(&self) -> f64 {
        normalize(self.a)
    }

    /// Channels reduced to 8 bits, rounded to nearest.
    pub fn to_rgba8(&self) -> [u8; 4] {
        [
            to_u8(self.r),
            to_u8(self.g),
            to_u8(self.b),
            to_u8(self.a),
        ]
    }

    pub fn is_transparent(&self) -> bool {
        self.a == 0
    }

    /// The four channels in persistence order (r, g, b, a).
    pub fn channels(&self) -> [u16; 4] {
        [self.r, self.g, self.b, self.a]
    }
}

impl Default for Color {
    fn default() -> Self {
        Self::BLACK
    }
}

impl From<[u16; 4]> for Color {
    fn from(c: [u16; 4]) -> Self {
        Self::from_u16(c[0], c[1], c[2], c[3])
    }
}

fn quantize(v: f64) -> u16 {
    if v.is_nan() {
        return 0;
    }
    (v.clamp(0.0, 1.0) * u16::MAX as f64).round() as u16
}

fn normalize(v: u16) -> f64 {
    v as f64 / u16::MAX as f64
}

fn to_u8(v: u16) -> u8 {
    ((v as u32 * 255 + 32767) / 65535) as u8
}
