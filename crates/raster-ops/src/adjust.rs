//! Per-pixel photometric adjustments.
//!
//! Every operation here touches each pixel independently, in one pass,
//! in place. Alpha is never modified.
//!
//! # Example
//!
//! ```rust
//! use raster_core::{ImageBuffer, Rgba8};
//! use raster_ops::adjust::{brighten, change_contrast};
//!
//! let mut img = ImageBuffer::filled(4, 4, Rgba8::gray(100));
//! brighten(&mut img, 1.5);
//! assert_eq!(img.pixel(0, 0), Rgba8::gray(150));
//!
//! change_contrast(&mut img, 0.0);
//! assert_eq!(img.pixel(3, 3), Rgba8::gray(150));
//! ```

use crate::error::check_nbits;
use crate::{OpsError, OpsResult};
use rand::Rng;
use raster_core::{Channel, Color, ImageBuffer, Rgba8};
use tracing::{debug, trace};

/// Scales RGB by `factor`: `rgb' = clamp(factor * rgb)`.
pub fn brighten(img: &mut ImageBuffer, factor: f32) {
    trace!(factor, "brighten");
    img.map_pixels(|p| p.to_color().scale_rgb(factor).to_rgba8());
}

/// Mean luminance over every pixel in the image.
pub fn mean_luminance(img: &ImageBuffer) -> f32 {
    let total: f64 = img.pixels().iter().map(|p| p.luminance() as f64).sum();
    (total / img.pixel_count() as f64) as f32
}

/// Interpolates each pixel against the image's mean-luminance gray.
///
/// `0` collapses the image to uniform gray, `1` is identity, values above
/// `1` push colors away from the mean.
pub fn change_contrast(img: &mut ImageBuffer, factor: f32) {
    let mean = mean_luminance(img);
    debug!(factor, mean, "change_contrast");
    img.map_pixels(|p| {
        let c = p.to_color();
        Color::lerp_rgb(Color::gray(mean, c.a), c, factor).to_rgba8()
    });
}

/// Interpolates each pixel against its own luminance gray.
///
/// `0` yields grayscale, `1` is identity.
pub fn change_saturation(img: &mut ImageBuffer, factor: f32) {
    trace!(factor, "change_saturation");
    img.map_pixels(|p| {
        let c = p.to_color();
        Color::lerp_rgb(Color::gray(c.luminance(), c.a), c, factor).to_rgba8()
    });
}

/// Keeps one color channel and zeroes the other two.
pub fn extract_channel(img: &mut ImageBuffer, channel: Channel) {
    trace!(%channel, "extract_channel");
    img.map_pixels(|p| match channel {
        Channel::Red => Rgba8::new(p.r, 0, 0, p.a),
        Channel::Green => Rgba8::new(0, p.g, 0, p.a),
        Channel::Blue => Rgba8::new(0, 0, p.b, p.a),
    });
}

/// Reduces each RGB channel to `2^nbits` levels without error diffusion.
///
/// Idempotent: quantizing an already quantized image changes nothing.
///
/// # Errors
///
/// [`OpsError::InvalidParameter`] if `nbits` is outside `1..=8`.
pub fn quantize(img: &mut ImageBuffer, nbits: u32) -> OpsResult<()> {
    check_nbits(nbits)?;
    trace!(nbits, "quantize");
    img.map_pixels(|p| p.to_color().quantize(nbits).to_rgba8());
    Ok(())
}

/// Replaces randomly chosen pixels with random opaque colors.
///
/// `floor(pixel_count * factor / 2)` pixels are overwritten; the same pixel
/// may be picked more than once. `factor = 0` leaves the image untouched.
///
/// # Errors
///
/// [`OpsError::InvalidParameter`] if `factor` is not within `[0, 1]`.
///
/// # Example
///
/// ```rust
/// use rand::{rngs::StdRng, SeedableRng};
/// use raster_core::ImageBuffer;
/// use raster_ops::adjust::add_noise;
///
/// let mut img = ImageBuffer::new(16, 16);
/// add_noise(&mut img, 0.5, &mut StdRng::seed_from_u64(7)).unwrap();
/// ```
pub fn add_noise<R: Rng + ?Sized>(img: &mut ImageBuffer, factor: f32, rng: &mut R) -> OpsResult<()> {
    if !(0.0..=1.0).contains(&factor) {
        return Err(OpsError::InvalidParameter(format!(
            "noise factor must be in [0, 1], got {factor}"
        )));
    }
    let count = (img.pixel_count() as f64 * factor as f64 / 2.0) as usize;
    debug!(factor, count, "add_noise");

    let pixels = img.pixels_mut();
    for _ in 0..count {
        let i = rng.gen_range(0..pixels.len());
        pixels[i] = Rgba8::opaque(rng.r#gen(), rng.r#gen(), rng.r#gen());
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;
    use rand::{rngs::StdRng, SeedableRng};

    fn gradient(w: u32, h: u32) -> ImageBuffer {
        let mut img = ImageBuffer::new(w, h);
        for y in 0..h {
            for x in 0..w {
                let v = ((x + y * w) * 255 / (w * h - 1)) as u8;
                img.set_pixel(x, y, Rgba8::new(v, 255 - v, v / 2, 200));
            }
        }
        img
    }

    #[test]
    fn test_brighten_identity() {
        let src = gradient(8, 8);
        let mut img = src.clone();
        brighten(&mut img, 1.0);
        assert_eq!(img, src);
    }

    #[test]
    fn test_brighten_clamps_and_keeps_alpha() {
        let mut img = ImageBuffer::filled(2, 2, Rgba8::new(200, 100, 0, 90));
        brighten(&mut img, 2.0);
        assert_eq!(img.pixel(1, 1), Rgba8::new(255, 200, 0, 90));
        brighten(&mut img, -1.0);
        assert_eq!(img.pixel(0, 0), Rgba8::new(0, 0, 0, 90));
    }

    #[test]
    fn test_contrast_identity() {
        let src = gradient(6, 5);
        let mut img = src.clone();
        change_contrast(&mut img, 1.0);
        assert_eq!(img, src);
    }

    #[test]
    fn test_contrast_zero_is_mean_gray() {
        let mut img = gradient(6, 5);
        let mean = mean_luminance(&img);
        change_contrast(&mut img, 0.0);
        let first = img.pixel(0, 0);
        assert!(img.pixels().iter().all(|p| *p == first));
        assert_abs_diff_eq!(first.r as f32, mean, epsilon = 1.0);
        assert_eq!(first.r, first.g);
        assert_eq!(first.a, 200);
    }

    #[test]
    fn test_contrast_exaggerates() {
        let mut img = ImageBuffer::new(2, 1);
        img.set_pixel(0, 0, Rgba8::gray(100));
        img.set_pixel(1, 0, Rgba8::gray(150));
        change_contrast(&mut img, 2.0);
        assert_eq!(img.pixel(0, 0), Rgba8::gray(75));
        assert_eq!(img.pixel(1, 0), Rgba8::gray(175));
    }

    #[test]
    fn test_saturation() {
        let src = gradient(5, 5);
        let mut img = src.clone();
        change_saturation(&mut img, 1.0);
        assert_eq!(img, src);

        change_saturation(&mut img, 0.0);
        for p in img.pixels() {
            assert_eq!(p.r, p.g);
            assert_eq!(p.g, p.b);
            assert_eq!(p.a, 200);
        }
    }

    #[test]
    fn test_saturation_uses_own_luminance() {
        let mut img = ImageBuffer::new(2, 1);
        img.set_pixel(0, 0, Rgba8::gray(10));
        img.set_pixel(1, 0, Rgba8::gray(240));
        change_saturation(&mut img, 0.0);
        assert_eq!(img.pixel(0, 0), Rgba8::gray(10));
        assert_eq!(img.pixel(1, 0), Rgba8::gray(240));
    }

    #[test]
    fn test_extract_channel() {
        let mut img = ImageBuffer::filled(2, 2, Rgba8::new(10, 20, 30, 40));
        extract_channel(&mut img, Channel::Green);
        assert_eq!(img.pixel(0, 1), Rgba8::new(0, 20, 0, 40));
    }

    #[test]
    fn test_quantize_idempotent() {
        for nbits in 1..=8 {
            let mut once = gradient(16, 16);
            quantize(&mut once, nbits).unwrap();
            let mut twice = once.clone();
            quantize(&mut twice, nbits).unwrap();
            assert_eq!(once, twice, "nbits = {nbits}");
        }
    }

    #[test]
    fn test_quantize_levels() {
        let mut img = gradient(16, 16);
        quantize(&mut img, 1).unwrap();
        for p in img.pixels() {
            for v in [p.r, p.g, p.b] {
                assert!(v == 0 || v == 128 || v == 255, "unexpected level {v}");
            }
            assert_eq!(p.a, 200);
        }
    }

    #[test]
    fn test_quantize_rejects_nbits() {
        let mut img = ImageBuffer::new(1, 1);
        assert!(quantize(&mut img, 0).is_err());
        assert!(quantize(&mut img, 9).is_err());
    }

    #[test]
    fn test_add_noise() {
        let mut img = ImageBuffer::new(10, 10);
        add_noise(&mut img, 0.0, &mut StdRng::seed_from_u64(1)).unwrap();
        assert!(img.pixels().iter().all(|p| *p == Rgba8::BLACK));

        add_noise(&mut img, 1.0, &mut StdRng::seed_from_u64(1)).unwrap();
        let changed = img.pixels().iter().filter(|p| **p != Rgba8::BLACK).count();
        assert!(changed > 0 && changed <= 50);
        assert!(img.pixels().iter().all(|p| p.a == 255));

        assert!(add_noise(&mut img, 1.5, &mut StdRng::seed_from_u64(1)).is_err());
    }

    #[test]
    fn test_add_noise_deterministic() {
        let mut a = ImageBuffer::new(8, 8);
        let mut b = ImageBuffer::new(8, 8);
        add_noise(&mut a, 0.8, &mut StdRng::seed_from_u64(42)).unwrap();
        add_noise(&mut b, 0.8, &mut StdRng::seed_from_u64(42)).unwrap();
        assert_eq!(a, b);
    }
}
