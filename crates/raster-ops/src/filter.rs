//! Convolution and the filters built on it.
//!
//! # Kernels
//!
//! - [`Kernel::box_blur`] - Simple average
//! - [`Kernel::gaussian`] - Gaussian falloff, normalized
//! - [`Kernel::edge_detect`] - 3x3 Laplacian, not normalized
//!
//! # Edge handling
//!
//! Samples that fall outside the image are clamped to the nearest edge
//! pixel (edge extension). Nothing wraps and nothing reads as black.
//!
//! # Example
//!
//! ```rust
//! use raster_core::{ImageBuffer, Rgba8};
//! use raster_ops::filter::{blur, convolve, Kernel};
//!
//! let src = ImageBuffer::filled(16, 16, Rgba8::gray(90));
//! let blurred = blur(&src, 5).unwrap();
//! assert_eq!(blurred, src);
//!
//! let edges = convolve(&src, &Kernel::edge_detect());
//! assert_eq!(edges.pixel(8, 8), Rgba8::BLACK);
//! ```

use crate::{OpsError, OpsResult};
use raster_core::{Color, ImageBuffer};
use std::f32::consts::PI;
use tracing::{debug, trace};

/// Gaussian falloff `g(r) = e^(-r^2/2) / sqrt(2*pi)`.
#[inline]
pub fn gaussian_weight(r: f32) -> f32 {
    (-r * r / 2.0).exp() / (2.0 * PI).sqrt()
}

/// Square convolution kernel.
///
/// Row/column `k` sits at offset `k - size/2` from the destination pixel,
/// so even sizes reach one pixel further toward negative offsets.
#[derive(Debug, Clone, PartialEq)]
pub struct Kernel {
    data: Vec<f32>,
    size: usize,
}

impl Kernel {
    /// Creates a new kernel from data.
    ///
    /// # Errors
    ///
    /// [`OpsError::InvalidParameter`] if `size` is zero or the data length
    /// isn't `size * size`.
    pub fn new(data: Vec<f32>, size: usize) -> OpsResult<Self> {
        if size == 0 {
            return Err(OpsError::InvalidParameter("kernel size must be > 0".into()));
        }
        if data.len() != size * size {
            return Err(OpsError::InvalidParameter(format!(
                "kernel data size {} doesn't match {}x{}",
                data.len(),
                size,
                size
            )));
        }
        Ok(Self { data, size })
    }

    /// Creates a box blur kernel (each weight `1/size^2`).
    ///
    /// # Example
    ///
    /// ```rust
    /// use raster_ops::filter::Kernel;
    ///
    /// let k = Kernel::box_blur(4);
    /// assert_eq!(k.data().len(), 16);
    /// assert!((k.sum() - 1.0).abs() < 1e-6);
    /// ```
    pub fn box_blur(size: usize) -> Self {
        let size = size.max(1);
        let count = size * size;
        Self {
            data: vec![1.0 / count as f32; count],
            size,
        }
    }

    /// Creates a normalized Gaussian kernel of any size.
    ///
    /// The weight at offset `(dx, dy)` is [`gaussian_weight`] of the
    /// Chebyshev distance `max(|dx|, |dy|)`, so each ring around the
    /// center shares one weight.
    pub fn gaussian(size: usize) -> Self {
        let size = size.max(1);
        let mut data = Vec::with_capacity(size * size);
        for ky in 0..size {
            for kx in 0..size {
                let (dx, dy) = (kernel_offset(kx, size), kernel_offset(ky, size));
                let r = dx.abs().max(dy.abs()) as f32;
                data.push(gaussian_weight(r));
            }
        }
        let mut kernel = Self { data, size };
        kernel.normalize();
        kernel
    }

    /// Creates the 3x3 Laplacian edge kernel.
    ///
    /// Weights sum to zero; the kernel is used as-is.
    pub fn edge_detect() -> Self {
        Self {
            data: vec![
                -1.0, -1.0, -1.0,
                -1.0, 8.0, -1.0,
                -1.0, -1.0, -1.0,
            ],
            size: 3,
        }
    }

    /// Kernel weights, row-major, `size * size` long.
    #[inline]
    pub fn data(&self) -> &[f32] {
        &self.data
    }

    /// Kernel width and height.
    #[inline]
    pub fn size(&self) -> usize {
        self.size
    }

    /// Sum of all weights.
    pub fn sum(&self) -> f32 {
        self.data.iter().sum()
    }

    /// Scales weights so they sum to 1. Kernels summing to zero are left alone.
    pub fn normalize(&mut self) {
        let sum = self.sum();
        if sum.abs() > f32::EPSILON {
            for w in &mut self.data {
                *w /= sum;
            }
        }
    }

    /// Weight at kernel row `ky`, column `kx`.
    #[inline]
    pub fn weight(&self, kx: usize, ky: usize) -> f32 {
        self.data[ky * self.size + kx]
    }
}

/// Offset of kernel index `k` from the destination pixel.
#[inline]
fn kernel_offset(k: usize, size: usize) -> i64 {
    k as i64 - (size / 2) as i64
}

/// Weighted RGB sums for every pixel, unclamped. Alpha is the source alpha.
fn convolve_colors(src: &ImageBuffer, kernel: &Kernel) -> Vec<Color> {
    let (width, height) = src.dimensions();
    let mut out = Vec::with_capacity(src.pixel_count());
    for y in 0..height {
        for x in 0..width {
            let mut sum = Color::default();
            for ky in 0..kernel.size {
                for kx in 0..kernel.size {
                    let sx = x as i64 + kernel_offset(kx, kernel.size);
                    let sy = y as i64 + kernel_offset(ky, kernel.size);
                    sum += src.pixel_clamped(sx, sy).to_color() * kernel.weight(kx, ky);
                }
            }
            sum.a = src.pixel(x, y).a as f32;
            out.push(sum);
        }
    }
    out
}

/// Convolves RGB with `kernel` into a new image.
///
/// Reads only from `src`, so no output pixel ever sees an already filtered
/// neighbor. Alpha is copied from the source pixel. Sums are clamped to
/// `[0, 255]` when stored.
pub fn convolve(src: &ImageBuffer, kernel: &Kernel) -> ImageBuffer {
    trace!(width = src.width(), height = src.height(), kernel_size = kernel.size, "convolve");
    let mut dst = src.clone();
    for (d, c) in dst.pixels_mut().iter_mut().zip(convolve_colors(src, kernel)) {
        *d = c.to_rgba8();
    }
    dst
}

/// Gaussian blur with an `n x n` kernel.
///
/// # Errors
///
/// [`OpsError::InvalidParameter`] if `n` is zero.
pub fn blur(src: &ImageBuffer, n: usize) -> OpsResult<ImageBuffer> {
    if n == 0 {
        return Err(OpsError::InvalidParameter("blur size must be > 0".into()));
    }
    debug!(n, "blur");
    Ok(convolve(src, &Kernel::gaussian(n)))
}

/// Unsharp masking: extrapolates away from the `n x n` blur by a factor
/// of two, `lerp(blurred, src, 2)`.
///
/// # Errors
///
/// [`OpsError::InvalidParameter`] if `n` is zero.
pub fn sharpen(src: &ImageBuffer, n: usize) -> OpsResult<ImageBuffer> {
    if n == 0 {
        return Err(OpsError::InvalidParameter("sharpen size must be > 0".into()));
    }
    debug!(n, "sharpen");

    // Extrapolate from the unrounded blur so only the final value is clamped.
    let blurred = convolve_colors(src, &Kernel::gaussian(n));
    let mut dst = src.clone();
    for (d, b) in dst.pixels_mut().iter_mut().zip(blurred) {
        *d = Color::lerp_rgb(b, d.to_color(), 2.0).to_rgba8();
    }
    Ok(dst)
}

/// Laplacian edge detection. Flat regions go to black.
pub fn edge_detect(src: &ImageBuffer) -> ImageBuffer {
    convolve(src, &Kernel::edge_detect())
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use raster_core::Rgba8;

    #[test]
    fn test_kernel_new_validates() {
        assert!(Kernel::new(vec![1.0; 4], 2).is_ok());
        assert!(Kernel::new(vec![1.0; 5], 2).is_err());
        assert!(Kernel::new(vec![], 0).is_err());
    }

    #[test]
    fn test_kernel_shape_always_square() {
        let data: Vec<f32> = (0..9).map(|i| i as f32).collect();
        let k = Kernel::new(data.clone(), 3).unwrap();
        assert_eq!(k.data(), &data[..]);
        assert_eq!(k.data().len(), k.size() * k.size());
        assert_relative_eq!(k.weight(2, 1), 5.0);

        // Mismatched shapes never make it into a kernel, so convolve can't
        // index past the weights.
        assert!(Kernel::new(data, 2).is_err());
        for n in 1..=6 {
            for k in [Kernel::box_blur(n), Kernel::gaussian(n)] {
                assert_eq!(k.data().len(), k.size() * k.size());
            }
        }
    }

    #[test]
    fn test_kernel_box() {
        let k = Kernel::box_blur(3);
        assert_eq!(k.size(), 3);
        for v in k.data() {
            assert_relative_eq!(*v, 1.0 / 9.0);
        }
    }

    #[test]
    fn test_kernel_gaussian_normalized() {
        for n in 2..=9 {
            let k = Kernel::gaussian(n);
            assert_eq!(k.data().len(), n * n);
            assert_relative_eq!(k.sum(), 1.0, epsilon = 1e-5);
        }
    }

    #[test]
    fn test_kernel_gaussian_rings() {
        let k = Kernel::gaussian(5);
        // Center is highest; corners and edge midpoints of the outer ring match.
        assert!(k.weight(2, 2) > k.weight(1, 1));
        assert_relative_eq!(k.weight(0, 0), k.weight(2, 0));
        assert_relative_eq!(k.weight(1, 1), k.weight(2, 1));
        assert_relative_eq!(
            k.weight(2, 2) / k.weight(1, 2),
            gaussian_weight(0.0) / gaussian_weight(1.0),
            epsilon = 1e-5
        );
    }

    #[test]
    fn test_kernel_even_offsets() {
        assert_eq!(kernel_offset(0, 2), -1);
        assert_eq!(kernel_offset(1, 2), 0);
        assert_eq!(kernel_offset(0, 3), -1);
        assert_eq!(kernel_offset(2, 3), 1);
    }

    #[test]
    fn test_edge_kernel_not_normalized() {
        let mut k = Kernel::edge_detect();
        assert_eq!(k.sum(), 0.0);
        k.normalize();
        assert_eq!(k.weight(1, 1), 8.0);
    }

    #[test]
    fn test_blur_uniform_unchanged() {
        let src = ImageBuffer::filled(7, 5, Rgba8::new(12, 200, 77, 140));
        for n in 1..=6 {
            assert_eq!(blur(&src, n).unwrap(), src, "n = {n}");
        }
    }

    #[test]
    fn test_blur_zero_rejected() {
        let src = ImageBuffer::new(2, 2);
        assert!(blur(&src, 0).is_err());
        assert!(sharpen(&src, 0).is_err());
    }

    #[test]
    fn test_blur_spreads_from_snapshot() {
        // A single bright pixel spreads symmetrically; a convolution reading
        // its own output would smear further to the right and down.
        let mut src = ImageBuffer::new(5, 5);
        src.set_pixel(2, 2, Rgba8::WHITE);
        let out = blur(&src, 3).unwrap();
        assert_eq!(out.pixel(1, 2), out.pixel(3, 2));
        assert_eq!(out.pixel(2, 1), out.pixel(2, 3));
        assert_eq!(out.pixel(0, 0), Rgba8::BLACK);
        assert_eq!(out.pixel(4, 4), Rgba8::BLACK);
        assert!(out.pixel(2, 2).r < 255);
    }

    #[test]
    fn test_convolve_edge_extension() {
        // Left column white, rest black. With clamping, the left edge
        // sees white beyond the border, so it stays brighter than column 1.
        let mut src = ImageBuffer::new(4, 4);
        for y in 0..4 {
            src.set_pixel(0, y, Rgba8::WHITE);
        }
        let out = convolve(&src, &Kernel::box_blur(3));
        // (2 white columns of 3) -> 170
        assert_eq!(out.pixel(0, 1).r, 170);
        assert_eq!(out.pixel(1, 1).r, 85);
        assert_eq!(out.pixel(3, 1).r, 0);
    }

    #[test]
    fn test_convolve_keeps_alpha() {
        let mut src = ImageBuffer::filled(3, 3, Rgba8::new(50, 50, 50, 0));
        src.set_pixel(1, 1, Rgba8::new(50, 50, 50, 255));
        let out = edge_detect(&src);
        assert_eq!(out.pixel(1, 1).a, 255);
        assert_eq!(out.pixel(0, 0).a, 0);
    }

    #[test]
    fn test_edge_detect_flat_is_black() {
        let src = ImageBuffer::filled(4, 4, Rgba8::new(128, 128, 128, 255));
        let out = edge_detect(&src);
        assert!(out.pixels().iter().all(|p| *p == Rgba8::BLACK));
    }

    #[test]
    fn test_edge_detect_spot() {
        let mut src = ImageBuffer::new(3, 3);
        src.set_pixel(1, 1, Rgba8::gray(20));
        let out = edge_detect(&src);
        assert_eq!(out.pixel(1, 1), Rgba8::gray(160));
        // Neighbors see -20, clamped to 0.
        assert_eq!(out.pixel(0, 0), Rgba8::BLACK);
    }

    #[test]
    fn test_sharpen() {
        let flat = ImageBuffer::filled(6, 6, Rgba8::gray(100));
        assert_eq!(sharpen(&flat, 3).unwrap(), flat);

        let mut step = ImageBuffer::new(6, 1);
        for x in 3..6 {
            step.set_pixel(x, 0, Rgba8::gray(200));
        }
        let out = sharpen(&step, 3).unwrap();
        // Overshoot on both sides of the step.
        assert_eq!(out.pixel(2, 0).r, 0);
        assert_eq!(out.pixel(3, 0).r, 255);
        assert_eq!(out.pixel(0, 0).r, 0);
    }
}
