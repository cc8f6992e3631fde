//! # Drawkit Core
//!
//! Core types shared by every drawkit crate: the unified error type, the
//! 16-bit-per-channel [`Color`] used by documents and settings, and the
//! fixed-point helpers used by the binary document format.

pub mod color;
pub mod error;
pub mod fixed;

pub use color::Color;
pub use error::{CodecError, Error, FormatError, Result};
pub use fixed::{from_fixed, to_fixed, FIXED_ONE};
