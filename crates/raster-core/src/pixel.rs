//! Pixel types and the arithmetic color model.
//!
//! # Types
//!
//! - [`Rgba8`] - Stored pixel, four `u8` channels
//! - [`Color`] - Working pixel, four `f32` channels used for all arithmetic
//! - [`Channel`] - Color channel selector
//!
//! # Clamping
//!
//! Arithmetic on [`Color`] is never clamped. Values are rounded and clamped
//! to `[0, 255]` only when converted back with [`Color::to_rgba8`], which is
//! the single place a computed value is committed to a buffer slot. Chained
//! operations therefore don't compound rounding error.
//!
//! ```
//! use raster_core::{Color, Rgba8};
//!
//! let p = Rgba8::new(200, 100, 50, 255).to_color();
//! let bright = p * 2.0; // r = 400.0, not yet clamped
//! assert_eq!(bright.r, 400.0);
//! assert_eq!(bright.to_rgba8(), Rgba8::new(255, 200, 100, 255));
//! ```
//!
//! # Alpha
//!
//! Color operations ([`Color::lerp_rgb`], [`Color::quantize`], scaling via
//! [`Color::scale_rgb`]) leave alpha as it was.

use crate::{Error, Result};
use std::fmt;
use std::ops::{Add, AddAssign, Mul, Sub};
use std::str::FromStr;

// ============================================================================
// Luminance
// ============================================================================

/// Luminance weight for the red channel.
pub const LUMA_R: f32 = 0.3;

/// Luminance weight for the green channel.
pub const LUMA_G: f32 = 0.59;

/// Luminance weight for the blue channel.
pub const LUMA_B: f32 = 0.11;

/// Luminance weights as an array [R, G, B].
pub const LUMA: [f32; 3] = [LUMA_R, LUMA_G, LUMA_B];

/// Weighted luminance `0.3*R + 0.59*G + 0.11*B`.
///
/// # Example
/// ```
/// use raster_core::pixel::luminance;
/// assert!((luminance([255.0, 255.0, 255.0]) - 255.0).abs() < 1e-3);
/// ```
#[inline]
pub fn luminance(rgb: [f32; 3]) -> f32 {
    rgb[0] * LUMA_R + rgb[1] * LUMA_G + rgb[2] * LUMA_B
}

/// Distance between quantization levels for `2^nbits` levels per channel.
///
/// `nbits = 1` gives a step of 128, `nbits = 8` a step of 1.
#[inline]
pub fn quantize_step(nbits: u32) -> f32 {
    256.0 / (1u32 << nbits.min(8)) as f32
}

/// Rounds and clamps a working value into a byte.
#[inline]
pub fn clamp_channel(v: f32) -> u8 {
    v.round().clamp(0.0, 255.0) as u8
}

// ============================================================================
// Rgba8
// ============================================================================

/// Stored RGBA pixel with 8 bits per channel.
#[repr(C)]
#[derive(Debug, Copy, Clone, Default, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Rgba8 {
    /// Red channel value.
    pub r: u8,
    /// Green channel value.
    pub g: u8,
    /// Blue channel value.
    pub b: u8,
    /// Alpha channel value.
    pub a: u8,
}

impl Rgba8 {
    /// Opaque black, the initial value of a new buffer.
    pub const BLACK: Self = Self::new(0, 0, 0, 255);

    /// Opaque white.
    pub const WHITE: Self = Self::new(255, 255, 255, 255);

    /// Create a new pixel.
    #[inline]
    pub const fn new(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self { r, g, b, a }
    }

    /// Create an opaque pixel (alpha = 255).
    #[inline]
    pub const fn opaque(r: u8, g: u8, b: u8) -> Self {
        Self::new(r, g, b, 255)
    }

    /// Create an opaque gray pixel.
    #[inline]
    pub const fn gray(v: u8) -> Self {
        Self::new(v, v, v, 255)
    }

    /// Get RGBA values as an array.
    #[inline]
    pub fn to_array(self) -> [u8; 4] {
        [self.r, self.g, self.b, self.a]
    }

    /// Create from an array.
    #[inline]
    pub fn from_array(arr: [u8; 4]) -> Self {
        Self::new(arr[0], arr[1], arr[2], arr[3])
    }

    /// Widen to a working [`Color`].
    #[inline]
    pub fn to_color(self) -> Color {
        Color::from(self)
    }

    /// Weighted luminance of this pixel.
    #[inline]
    pub fn luminance(self) -> f32 {
        luminance([self.r as f32, self.g as f32, self.b as f32])
    }
}

impl From<[u8; 4]> for Rgba8 {
    fn from(arr: [u8; 4]) -> Self {
        Self::from_array(arr)
    }
}

impl fmt::Display for Rgba8 {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Rgba8({}, {}, {}, {})", self.r, self.g, self.b, self.a)
    }
}

// ============================================================================
// Color
// ============================================================================

/// Working pixel with `f32` channels in the 0..255 scale.
///
/// Values may leave `[0, 255]` during a computation; see the module docs.
#[derive(Debug, Copy, Clone, Default, PartialEq)]
pub struct Color {
    /// Red channel value.
    pub r: f32,
    /// Green channel value.
    pub g: f32,
    /// Blue channel value.
    pub b: f32,
    /// Alpha channel value.
    pub a: f32,
}

impl Color {
    /// Create a new color.
    #[inline]
    pub const fn new(r: f32, g: f32, b: f32, a: f32) -> Self {
        Self { r, g, b, a }
    }

    /// Create a gray color with the given alpha.
    #[inline]
    pub const fn gray(v: f32, a: f32) -> Self {
        Self::new(v, v, v, a)
    }

    /// Get RGB component (discarding alpha).
    #[inline]
    pub fn rgb(self) -> [f32; 3] {
        [self.r, self.g, self.b]
    }

    /// Weighted luminance of the RGB channels.
    #[inline]
    pub fn luminance(self) -> f32 {
        luminance(self.rgb())
    }

    /// Linear interpolation `a*(1-t) + b*t` across all four channels.
    ///
    /// `t` is not clamped: values above 1 extrapolate away from `a`.
    #[inline]
    pub fn lerp(a: Self, b: Self, t: f32) -> Self {
        a * (1.0 - t) + b * t
    }

    /// Linear interpolation of RGB only; alpha is taken from `b`.
    ///
    /// # Example
    /// ```
    /// use raster_core::Color;
    ///
    /// let gray = Color::gray(100.0, 255.0);
    /// let px = Color::new(200.0, 100.0, 0.0, 128.0);
    /// let out = Color::lerp_rgb(gray, px, 2.0);
    /// assert_eq!(out.r, 300.0);
    /// assert_eq!(out.a, 128.0);
    /// ```
    #[inline]
    pub fn lerp_rgb(a: Self, b: Self, t: f32) -> Self {
        Self {
            a: b.a,
            ..Self::lerp(a, b, t)
        }
    }

    /// Multiply RGB by a scalar, leaving alpha.
    #[inline]
    pub fn scale_rgb(self, factor: f32) -> Self {
        self.map_rgb(|v| v * factor)
    }

    /// Apply `f` to each RGB channel, leaving alpha.
    #[inline]
    pub fn map_rgb<F: Fn(f32) -> f32>(self, f: F) -> Self {
        Self::new(f(self.r), f(self.g), f(self.b), self.a)
    }

    /// Quantize RGB to `2^nbits` levels with `round(v/step)*step`.
    ///
    /// The top level (256) lands on 255 once committed.
    ///
    /// # Example
    /// ```
    /// use raster_core::Color;
    ///
    /// let q = Color::new(100.0, 200.0, 30.0, 255.0).quantize(1);
    /// assert_eq!(q.rgb(), [128.0, 256.0, 0.0]);
    /// ```
    #[inline]
    pub fn quantize(self, nbits: u32) -> Self {
        let step = quantize_step(nbits);
        self.map_rgb(|v| (v / step).round() * step)
    }

    /// Commit to a stored pixel, rounding and clamping every channel.
    #[inline]
    pub fn to_rgba8(self) -> Rgba8 {
        Rgba8::new(
            clamp_channel(self.r),
            clamp_channel(self.g),
            clamp_channel(self.b),
            clamp_channel(self.a),
        )
    }
}

impl From<Rgba8> for Color {
    #[inline]
    fn from(p: Rgba8) -> Self {
        Self::new(p.r as f32, p.g as f32, p.b as f32, p.a as f32)
    }
}

impl Add for Color {
    type Output = Self;
    #[inline]
    fn add(self, rhs: Self) -> Self {
        Self::new(
            self.r + rhs.r,
            self.g + rhs.g,
            self.b + rhs.b,
            self.a + rhs.a,
        )
    }
}

impl AddAssign for Color {
    #[inline]
    fn add_assign(&mut self, rhs: Self) {
        *self = *self + rhs;
    }
}

impl Sub for Color {
    type Output = Self;
    #[inline]
    fn sub(self, rhs: Self) -> Self {
        Self::new(
            self.r - rhs.r,
            self.g - rhs.g,
            self.b - rhs.b,
            self.a - rhs.a,
        )
    }
}

impl Mul<f32> for Color {
    type Output = Self;
    #[inline]
    fn mul(self, rhs: f32) -> Self {
        Self::new(self.r * rhs, self.g * rhs, self.b * rhs, self.a * rhs)
    }
}

// ============================================================================
// Channel
// ============================================================================

/// A color channel, as selected by channel extraction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "lowercase"))]
pub enum Channel {
    /// Red channel.
    Red,
    /// Green channel.
    Green,
    /// Blue channel.
    Blue,
}

impl TryFrom<u32> for Channel {
    type Error = Error;

    fn try_from(value: u32) -> Result<Self> {
        match value {
            0 => Ok(Self::Red),
            1 => Ok(Self::Green),
            2 => Ok(Self::Blue),
            other => Err(Error::invalid_argument(format!("channel index {other}"))),
        }
    }
}

impl FromStr for Channel {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_ascii_lowercase().as_str() {
            "r" | "red" => Ok(Self::Red),
            "g" | "green" => Ok(Self::Green),
            "b" | "blue" => Ok(Self::Blue),
            _ => Err(Error::invalid_argument(format!("channel '{s}'"))),
        }
    }
}

impl fmt::Display for Channel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Red => "red",
            Self::Green => "green",
            Self::Blue => "blue",
        })
    }
}
