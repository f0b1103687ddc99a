//! Dithering: quantization with the error spread out instead of discarded.
//!
//! # Methods
//!
//! - [`random_dither`] - uniform noise in `[0, step)` before quantizing
//! - [`ordered_dither`] - 4x4 Bayer threshold pattern
//! - [`floyd_steinberg_dither`] - error diffusion in raster order
//!
//! All three reduce RGB to `2^nbits` levels per channel and leave alpha
//! untouched.
//!
//! # Example
//!
//! ```rust
//! use rand::{rngs::StdRng, SeedableRng};
//! use raster_core::{ImageBuffer, Rgba8};
//! use raster_ops::dither::{dither, DitherMethod};
//!
//! let mut img = ImageBuffer::filled(8, 8, Rgba8::gray(100));
//! let mut rng = StdRng::seed_from_u64(0);
//! dither(&mut img, 1, DitherMethod::FloydSteinberg, &mut rng).unwrap();
//! assert!(img.pixels().iter().all(|p| [0, 128, 255].contains(&p.r)));
//! ```

use crate::error::check_nbits;
use crate::{OpsError, OpsResult};
use rand::Rng;
use raster_core::{quantize_step, Color, ImageBuffer};
use std::fmt;
use std::str::FromStr;
use tracing::{debug, trace};

/// 4x4 Bayer threshold matrix, values 0..16.
pub const BAYER4: [[u8; 4]; 4] = [
    [15, 7, 13, 5],
    [3, 11, 1, 9],
    [12, 4, 14, 6],
    [0, 8, 2, 10],
];

/// Floyd-Steinberg weight for the pixel to the right.
pub const FS_RIGHT: f32 = 7.0 / 16.0;
/// Floyd-Steinberg weight for the pixel below-left.
pub const FS_BELOW_LEFT: f32 = 3.0 / 16.0;
/// Floyd-Steinberg weight for the pixel below.
pub const FS_BELOW: f32 = 5.0 / 16.0;
/// Floyd-Steinberg weight for the pixel below-right.
pub const FS_BELOW_RIGHT: f32 = 1.0 / 16.0;

/// Dithering algorithm selector.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DitherMethod {
    /// Independent uniform noise per channel.
    Random,
    /// Bayer 4x4 ordered pattern.
    Ordered,
    /// Floyd-Steinberg error diffusion.
    #[default]
    FloydSteinberg,
}

impl FromStr for DitherMethod {
    type Err = OpsError;

    fn from_str(s: &str) -> OpsResult<Self> {
        match s.to_ascii_lowercase().replace('-', "_").as_str() {
            "random" => Ok(Self::Random),
            "ordered" | "bayer" => Ok(Self::Ordered),
            "floyd_steinberg" | "fs" => Ok(Self::FloydSteinberg),
            _ => Err(OpsError::InvalidParameter(format!("unknown dither method '{s}'"))),
        }
    }
}

impl fmt::Display for DitherMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Random => "random",
            Self::Ordered => "ordered",
            Self::FloydSteinberg => "floyd_steinberg",
        })
    }
}

/// Dithers with the selected method.
///
/// `rng` is only consumed by [`DitherMethod::Random`].
pub fn dither<R: Rng + ?Sized>(
    img: &mut ImageBuffer,
    nbits: u32,
    method: DitherMethod,
    rng: &mut R,
) -> OpsResult<()> {
    match method {
        DitherMethod::Random => random_dither(img, nbits, rng),
        DitherMethod::Ordered => ordered_dither(img, nbits),
        DitherMethod::FloydSteinberg => floyd_steinberg_dither(img, nbits),
    }
}

/// Level at or below `v`, clamped on commit.
#[inline]
fn floor_level(v: f32, step: f32) -> f32 {
    (v / step).floor() * step
}

/// Adds uniform noise in `[0, step)` to every channel, then keeps the level
/// at or below the perturbed value.
///
/// The generator is passed in so that runs are reproducible with a seeded
/// RNG.
///
/// # Errors
///
/// [`OpsError::InvalidParameter`] if `nbits` is outside `1..=8`.
pub fn random_dither<R: Rng + ?Sized>(img: &mut ImageBuffer, nbits: u32, rng: &mut R) -> OpsResult<()> {
    check_nbits(nbits)?;
    let step = quantize_step(nbits);
    trace!(nbits, step, "random_dither");

    img.map_pixels(|p| {
        let c = p.to_color();
        Color::new(
            floor_level(c.r + rng.gen_range(0.0..step), step),
            floor_level(c.g + rng.gen_range(0.0..step), step),
            floor_level(c.b + rng.gen_range(0.0..step), step),
            c.a,
        )
        .to_rgba8()
    });
    Ok(())
}

/// Adds a Bayer threshold offset `(B[x%4][y%4] + 0.5) / 16 * step`, then
/// keeps the level at or below the perturbed value.
///
/// # Errors
///
/// [`OpsError::InvalidParameter`] if `nbits` is outside `1..=8`.
pub fn ordered_dither(img: &mut ImageBuffer, nbits: u32) -> OpsResult<()> {
    check_nbits(nbits)?;
    let step = quantize_step(nbits);
    trace!(nbits, step, "ordered_dither");

    let width = img.width() as usize;
    for (i, p) in img.pixels_mut().iter_mut().enumerate() {
        let (x, y) = (i % width, i / width);
        let offset = (BAYER4[x % 4][y % 4] as f32 + 0.5) / 16.0 * step;
        *p = p
            .to_color()
            .map_rgb(|v| floor_level(v + offset, step))
            .to_rgba8();
    }
    Ok(())
}

/// Floyd-Steinberg error diffusion.
///
/// Pixels are visited strictly left-to-right, top-to-bottom. Each pixel's
/// current value (already carrying error from earlier pixels) is rounded
/// to the nearest level, the committed byte value is stored, and the
/// difference is pushed to the unvisited neighbors:
///
/// ```text
///          *    7/16
///   3/16  5/16  1/16
/// ```
///
/// Neighbors that fall outside the image are dropped and the remaining
/// weights are rescaled to sum to one. The bottom-right pixel has no
/// unvisited neighbor, so its error is discarded.
///
/// # Errors
///
/// [`OpsError::InvalidParameter`] if `nbits` is outside `1..=8`.
pub fn floyd_steinberg_dither(img: &mut ImageBuffer, nbits: u32) -> OpsResult<()> {
    check_nbits(nbits)?;
    let (w, h) = (img.width() as usize, img.height() as usize);
    trace!(width = w, height = h, nbits, "floyd_steinberg_dither");

    // Working copy: accumulated error can push values outside 0..255.
    let mut work: Vec<Color> = img.pixels().iter().map(|p| p.to_color()).collect();
    let pixels = img.pixels_mut();

    for y in 0..h {
        for x in 0..w {
            let i = y * w + x;
            let current = work[i];
            let committed = current.quantize(nbits).to_rgba8();
            pixels[i] = committed;

            let q = committed.to_color();
            let error = Color::new(current.r - q.r, current.g - q.g, current.b - q.b, 0.0);
            let targets = diffusion_targets(x, y, w, h);
            if targets.is_empty() {
                debug!(x, y, r = error.r, g = error.g, b = error.b, "dropping corner error");
                continue;
            }
            for (j, weight) in targets {
                work[j] += error * weight;
            }
        }
    }
    Ok(())
}

/// Unvisited neighbors of `(x, y)` with weights renormalized over the ones
/// inside the image.
fn diffusion_targets(x: usize, y: usize, w: usize, h: usize) -> Vec<(usize, f32)> {
    let mut targets = Vec::with_capacity(4);
    if x + 1 < w {
        targets.push((y * w + x + 1, FS_RIGHT));
    }
    if y + 1 < h {
        let below = (y + 1) * w + x;
        if x > 0 {
            targets.push((below - 1, FS_BELOW_LEFT));
        }
        targets.push((below, FS_BELOW));
        if x + 1 < w {
            targets.push((below + 1, FS_BELOW_RIGHT));
        }
    }

    let total: f32 = targets.iter().map(|(_, wt)| wt).sum();
    for (_, wt) in &mut targets {
        *wt /= total;
    }
    targets
}
