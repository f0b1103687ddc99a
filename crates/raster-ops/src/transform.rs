//! Geometric transformations.
//!
//! # Operations
//!
//! - [`crop`] - Extract a sub-rectangle
//! - [`paste`] - Copy an image into another at an offset
//! - [`scale`] - Resample by independent horizontal and vertical factors
//! - [`rotate`] - Resample rotated about the origin
//!
//! Resampling operations map each destination pixel back into the source
//! and reconstruct it with the source's [`SamplingMethod`](raster_core::SamplingMethod).
//!
//! # Example
//!
//! ```rust
//! use raster_core::ImageBuffer;
//! use raster_ops::transform::{crop, scale};
//!
//! let src = ImageBuffer::new(64, 48);
//! let half = scale(&src, 0.5, 0.5).unwrap();
//! assert_eq!(half.dimensions(), (32, 24));
//!
//! let region = crop(&src, 8, 8, 16, 16).unwrap();
//! assert_eq!(region.dimensions(), (16, 16));
//! ```

use crate::sample::sampler_for;
use crate::{OpsError, OpsResult};
use raster_core::{Error, ImageBuffer, Rect};
use tracing::{debug, trace};

/// Copies the `w x h` region at `(x, y)` into a new buffer.
///
/// The result keeps the source sampling method.
///
/// # Errors
///
/// - [`OpsError::InvalidDimensions`] if `w` or `h` is zero
/// - [`Error::InvalidRegion`] wrapped in [`OpsError::Core`] if the region is
///   not fully inside `src`; this is the out-of-bounds failure for regions
///   and [`OpsError::is_bounds_error`] reports it
///
/// # Example
///
/// ```rust
/// use raster_core::ImageBuffer;
/// use raster_ops::transform::crop;
///
/// let src = ImageBuffer::new(10, 10);
/// assert!(crop(&src, 5, 5, 6, 2).unwrap_err().is_bounds_error());
/// ```
pub fn crop(src: &ImageBuffer, x: u32, y: u32, w: u32, h: u32) -> OpsResult<ImageBuffer> {
    let region = Rect::new(x, y, w, h);
    if region.is_empty() {
        return Err(OpsError::InvalidDimensions(format!(
            "crop region {w}x{h} is empty"
        )));
    }
    let (sw, sh) = src.dimensions();
    if !region.fits_within(sw, sh) {
        return Err(Error::invalid_region(x, y, w, h, sw, sh).into());
    }
    trace!(x, y, w, h, "crop");

    let mut dst = ImageBuffer::new(w, h).with_sampling_method(src.sampling_method());
    let (x0, x1) = (x as usize, (x + w) as usize);
    for row in 0..h {
        dst.row_mut(row).copy_from_slice(&src.row(y + row)[x0..x1]);
    }
    Ok(dst)
}

/// Copies all of `src` into `dst` with its top-left corner at `(x, y)`.
///
/// # Errors
///
/// Returns a bounds error if `src` does not fit inside `dst` at that offset.
pub fn paste(dst: &mut ImageBuffer, src: &ImageBuffer, x: u32, y: u32) -> OpsResult<()> {
    let (w, h) = src.dimensions();
    let (dw, dh) = dst.dimensions();
    if !Rect::new(x, y, w, h).fits_within(dw, dh) {
        return Err(Error::invalid_region(x, y, w, h, dw, dh).into());
    }
    trace!(x, y, w, h, "paste");

    let (x0, x1) = (x as usize, (x + w) as usize);
    for row in 0..h {
        dst.row_mut(y + row)[x0..x1].copy_from_slice(src.row(row));
    }
    Ok(())
}

/// Resamples `src` to `round(W * sx) x round(H * sy)`.
///
/// Destination pixel `(i, j)` is reconstructed from source coordinate
/// `(i / sx, j / sy)`. The result keeps the source sampling method, so
/// `scale(&img, 1.0, 1.0)` reproduces `img` exactly.
///
/// # Errors
///
/// - [`OpsError::InvalidParameter`] if a factor is not finite and positive
/// - [`OpsError::InvalidDimensions`] if a destination side rounds to zero
pub fn scale(src: &ImageBuffer, sx: f32, sy: f32) -> OpsResult<ImageBuffer> {
    for (name, f) in [("sx", sx), ("sy", sy)] {
        if !f.is_finite() || f <= 0.0 {
            return Err(OpsError::InvalidParameter(format!(
                "scale factor {name} must be finite and positive, got {f}"
            )));
        }
    }

    let dst_w = scaled_extent(src.width(), sx);
    let dst_h = scaled_extent(src.height(), sy);
    if dst_w < 1.0 || dst_h < 1.0 || dst_w > u32::MAX as f64 || dst_h > u32::MAX as f64 {
        return Err(OpsError::InvalidDimensions(format!(
            "scaling {}x{} by ({sx}, {sy}) gives {dst_w}x{dst_h}",
            src.width(),
            src.height()
        )));
    }
    let (dst_w, dst_h) = (dst_w as u32, dst_h as u32);
    debug!(
        src_w = src.width(),
        src_h = src.height(),
        dst_w,
        dst_h,
        method = %src.sampling_method(),
        "scale"
    );

    let sampler = sampler_for(src.sampling_method());
    let mut dst = ImageBuffer::try_new(dst_w, dst_h)?.with_sampling_method(src.sampling_method());
    for j in 0..dst_h {
        let v = j as f32 / sy;
        for (i, p) in dst.row_mut(j).iter_mut().enumerate() {
            *p = sampler.sample(src, i as f32 / sx, v).to_rgba8();
        }
    }
    Ok(dst)
}

fn scaled_extent(extent: u32, factor: f32) -> f64 {
    (extent as f64 * factor as f64).round()
}

/// Resamples `src` rotated by `angle` radians about the origin.
///
/// The destination is `dst_w x dst_h`; pixel `(i, j)` is reconstructed
/// from the source coordinate obtained by rotating `(i, j)` by `-angle`.
/// Coordinates landing outside the source take the nearest edge pixel.
///
/// # Errors
///
/// - [`OpsError::InvalidParameter`] if `angle` is not finite
/// - [`OpsError::InvalidDimensions`] if `dst_w` or `dst_h` is zero
///
/// # Example
///
/// ```rust
/// use raster_core::ImageBuffer;
/// use raster_ops::transform::rotate;
///
/// let src = ImageBuffer::new(32, 32);
/// let out = rotate(&src, std::f32::consts::FRAC_PI_4, 45, 45).unwrap();
/// assert_eq!(out.dimensions(), (45, 45));
/// ```
pub fn rotate(src: &ImageBuffer, angle: f32, dst_w: u32, dst_h: u32) -> OpsResult<ImageBuffer> {
    if !angle.is_finite() {
        return Err(OpsError::InvalidParameter(format!(
            "rotation angle must be finite, got {angle}"
        )));
    }
    if dst_w == 0 || dst_h == 0 {
        return Err(OpsError::InvalidDimensions(format!(
            "rotate target {dst_w}x{dst_h} is empty"
        )));
    }
    debug!(angle, dst_w, dst_h, method = %src.sampling_method(), "rotate");

    let (sin, cos) = (-angle).sin_cos();
    let sampler = sampler_for(src.sampling_method());
    let mut dst = ImageBuffer::try_new(dst_w, dst_h)?.with_sampling_method(src.sampling_method());
    for j in 0..dst_h {
        let y = j as f32;
        for (i, p) in dst.row_mut(j).iter_mut().enumerate() {
            let x = i as f32;
            let u = x * cos - y * sin;
            let v = x * sin + y * cos;
            *p = sampler.sample(src, u, v).to_rgba8();
        }
    }
    Ok(dst)
}
