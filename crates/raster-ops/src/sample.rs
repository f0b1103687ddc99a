//! Reconstruction of pixel values at continuous coordinates.
//!
//! Pixel `(i, j)` sits at integer coordinate `(i, j)`. Coordinates outside
//! the image resolve by edge extension, the same policy as convolution.
//!
//! # Samplers
//!
//! - [`PointSampler`] - nearest pixel by truncation
//! - [`BilinearSampler`] - four neighbors, horizontal then vertical lerp
//! - [`GaussianSampler`] - 4x4 neighborhood weighted by distance
//!
//! [`sample`] dispatches on the buffer's selected [`SamplingMethod`]; each
//! strategy can also be used on its own through the [`Sampler`] trait.
//!
//! # Example
//!
//! ```rust
//! use raster_core::{ImageBuffer, Rgba8, SamplingMethod};
//! use raster_ops::sample::sample;
//!
//! let mut img = ImageBuffer::new(2, 1).with_sampling_method(SamplingMethod::Bilinear);
//! img.set_pixel(1, 0, Rgba8::gray(200));
//! assert_eq!(sample(&img, 0.5, 0.0).to_rgba8(), Rgba8::gray(100));
//! ```

use crate::filter::gaussian_weight;
use raster_core::{Color, ImageBuffer, SamplingMethod};

/// A reconstruction filter.
pub trait Sampler {
    /// Reconstructs the color of `src` at `(u, v)`.
    fn sample(&self, src: &ImageBuffer, u: f32, v: f32) -> Color;
}

/// Pulls `c` into `[-margin, extent - 1 + margin]`. Beyond that window every
/// neighbor a sampler reads is the edge pixel, so the result is unchanged.
/// NaN maps to `0`.
#[inline]
fn clamp_coord(c: f32, extent: u32, margin: f32) -> f32 {
    if c.is_nan() {
        return 0.0;
    }
    c.clamp(-margin, extent as f32 - 1.0 + margin)
}

/// Nearest pixel: `(floor(u), floor(v))`, clamped into the image.
#[derive(Debug, Clone, Copy, Default)]
pub struct PointSampler;

impl Sampler for PointSampler {
    #[inline]
    fn sample(&self, src: &ImageBuffer, u: f32, v: f32) -> Color {
        src.pixel_clamped(u.floor() as i64, v.floor() as i64).to_color()
    }
}

/// Bilinear interpolation between the four surrounding pixels.
#[derive(Debug, Clone, Copy, Default)]
pub struct BilinearSampler;

impl Sampler for BilinearSampler {
    fn sample(&self, src: &ImageBuffer, u: f32, v: f32) -> Color {
        let u = clamp_coord(u, src.width(), 1.0);
        let v = clamp_coord(v, src.height(), 1.0);
        let (x0, y0) = (u.floor(), v.floor());
        let (fx, fy) = (u - x0, v - y0);
        let (x0, y0) = (x0 as i64, y0 as i64);

        let p00 = src.pixel_clamped(x0, y0).to_color();
        let p10 = src.pixel_clamped(x0 + 1, y0).to_color();
        let p01 = src.pixel_clamped(x0, y0 + 1).to_color();
        let p11 = src.pixel_clamped(x0 + 1, y0 + 1).to_color();

        let top = Color::lerp(p00, p10, fx);
        let bottom = Color::lerp(p01, p11, fx);
        Color::lerp(top, bottom, fy)
    }
}

/// Gaussian reconstruction over the 4x4 neighborhood around `(u, v)`.
///
/// Each neighbor is weighted by [`gaussian_weight`] of its Euclidean
/// distance to `(u, v)`; weights are normalized per sample.
#[derive(Debug, Clone, Copy, Default)]
pub struct GaussianSampler;

impl GaussianSampler {
    /// Neighbors considered on each side of `floor(u)`.
    const REACH: std::ops::RangeInclusive<i64> = -1..=2;
}

impl Sampler for GaussianSampler {
    fn sample(&self, src: &ImageBuffer, u: f32, v: f32) -> Color {
        let u = clamp_coord(u, src.width(), 3.0);
        let v = clamp_coord(v, src.height(), 3.0);
        let (x0, y0) = (u.floor() as i64, v.floor() as i64);
        let mut sum = Color::default();
        let mut total = 0.0f32;

        for dy in Self::REACH {
            for dx in Self::REACH {
                let (px, py) = (x0 + dx, y0 + dy);
                let d = (px as f32 - u).hypot(py as f32 - v);
                let w = gaussian_weight(d);
                sum += src.pixel_clamped(px, py).to_color() * w;
                total += w;
            }
        }
        sum * (1.0 / total)
    }
}

/// Returns the strategy for a sampling method.
pub fn sampler_for(method: SamplingMethod) -> &'static dyn Sampler {
    match method {
        SamplingMethod::Point => &PointSampler,
        SamplingMethod::Bilinear => &BilinearSampler,
        SamplingMethod::Gaussian => &GaussianSampler,
    }
}

/// Samples `src` at `(u, v)` with its selected sampling method.
#[inline]
pub fn sample(src: &ImageBuffer, u: f32, v: f32) -> Color {
    sampler_for(src.sampling_method()).sample(src, u, v)
}
