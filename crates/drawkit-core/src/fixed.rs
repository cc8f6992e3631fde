//! Fixed-point coordinates for compact serialization.
//!
//! A fixed-point value is an `i32` holding `value × 256`, i.e. 8 fractional
//! bits. Conversion saturates at the `i32` range.

/// Scale factor between a real value and its fixed-point encoding.
pub const FIXED_ONE: f64 = 256.0;

/// Encodes a real value as signed fixed-point with 8 fractional bits.
pub fn to_fixed(value: f64) -> i32 {
    if value.is_nan() {
        return 0;
    }
    let scaled = (value * FIXED_ONE).round();
    scaled.clamp(i32::MIN as f64, i32::MAX as f64) as i32
}

/// Decodes a fixed-point value back into a real value.
pub fn from_fixed(value: i32) -> f64 {
    value as f64 / FIXED_ONE
}
