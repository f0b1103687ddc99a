//! # raster-core
//!
//! Core types for 8-bit RGBA raster processing.
//!
//! - [`Rgba8`] - Stored pixel, one byte per channel
//! - [`Color`] - Floating-point working pixel used for all arithmetic
//! - [`ImageBuffer`] - Owned row-major pixel grid with a [`SamplingMethod`]
//! - [`Rect`] - Region type for crop and paste
//!
//! ## Crate Structure
//!
//! ```text
//! raster-core (this crate)
//!    ^
//!    |
//!    +-- raster-ops (point ops, dithering, convolution, resampling)
//!    +-- raster-tests, raster-bench
//! ```
//!
//! Decoding and encoding container formats is left to the caller: build a
//! buffer with [`ImageBuffer::from_rgba8`] from decoded bytes and hand
//! [`ImageBuffer::to_rgba8`] to an encoder.
//!
//! ## Feature Flags
//!
//! - `serde` - Serialize/deserialize [`Rgba8`], [`Channel`],
//!   [`SamplingMethod`] and [`Rect`]

#![warn(missing_docs)]
#![warn(rustdoc::missing_crate_level_docs)]

pub mod error;
pub mod image;
pub mod pixel;
pub mod rect;

pub use error::{Error, Result};
pub use image::{ImageBuffer, SamplingMethod};
pub use pixel::{luminance, quantize_step, Channel, Color, Rgba8, LUMA, LUMA_B, LUMA_G, LUMA_R};
pub use rect::Rect;

/// Prelude module for convenient imports.
///
/// ```
/// use raster_core::prelude::*;
///
/// let img = ImageBuffer::new(2, 2);
/// assert_eq!(img.pixel(0, 0), Rgba8::BLACK);
/// ```
pub mod prelude {
    pub use crate::error::{Error, Result};
    pub use crate::image::{ImageBuffer, SamplingMethod};
    pub use crate::pixel::{Channel, Color, Rgba8};
    pub use crate::rect::Rect;
}
