//! Owned RGBA8 image buffer.
//!
//! # Memory Layout
//!
//! Pixels are stored in **row-major** order, top-to-bottom, one [`Rgba8`]
//! per pixel. Pixel `(x, y)` lives at index `y * width + x`.
//!
//! # Ownership
//!
//! An [`ImageBuffer`] exclusively owns its pixel vector. `Clone` is a full
//! deep copy, so a clone is a safe snapshot to read from while the original
//! is being rewritten.
//!
//! # Usage
//!
//! ```rust
//! use raster_core::{ImageBuffer, Rgba8, SamplingMethod};
//!
//! let mut img = ImageBuffer::new(4, 3);
//! assert_eq!(img.pixel(0, 0), Rgba8::BLACK);
//!
//! img.set_pixel(1, 2, Rgba8::opaque(255, 0, 0));
//! img.set_sampling_method(SamplingMethod::Bilinear);
//!
//! let bytes = img.to_rgba8();
//! assert_eq!(bytes.len(), 4 * 3 * 4);
//! ```

use crate::{Error, Rect, Result, Rgba8};
use std::fmt;
use std::str::FromStr;

/// Reconstruction filter used when sampling at continuous coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "lowercase"))]
pub enum SamplingMethod {
    /// Nearest pixel (truncated coordinates).
    #[default]
    Point,
    /// Interpolation between the four surrounding pixels.
    Bilinear,
    /// Gaussian-weighted neighborhood.
    Gaussian,
}

impl SamplingMethod {
    /// All methods, in raw-index order.
    pub const ALL: [SamplingMethod; 3] = [Self::Point, Self::Bilinear, Self::Gaussian];

    /// Lowercase name.
    pub fn name(&self) -> &'static str {
        match self {
            Self::Point => "point",
            Self::Bilinear => "bilinear",
            Self::Gaussian => "gaussian",
        }
    }
}

impl TryFrom<u32> for SamplingMethod {
    type Error = Error;

    fn try_from(value: u32) -> Result<Self> {
        Self::ALL
            .get(value as usize)
            .copied()
            .ok_or_else(|| Error::invalid_argument(format!("sampling method {value}")))
    }
}

impl FromStr for SamplingMethod {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_ascii_lowercase().as_str() {
            "point" | "nearest" => Ok(Self::Point),
            "bilinear" => Ok(Self::Bilinear),
            "gaussian" => Ok(Self::Gaussian),
            _ => Err(Error::invalid_argument(format!("sampling method '{s}'"))),
        }
    }
}

impl fmt::Display for SamplingMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Owned RGBA8 pixel grid with a selected [`SamplingMethod`].
#[derive(Clone, PartialEq, Eq)]
pub struct ImageBuffer {
    pixels: Vec<Rgba8>,
    width: u32,
    height: u32,
    sampling: SamplingMethod,
}

impl ImageBuffer {
    /// Creates an image filled with opaque black.
    ///
    /// # Panics
    ///
    /// Panics if `width` or `height` is zero. Use [`try_new`](Self::try_new)
    /// to get an error instead.
    ///
    /// # Example
    ///
    /// ```rust
    /// use raster_core::ImageBuffer;
    ///
    /// let img = ImageBuffer::new(640, 480);
    /// assert_eq!(img.dimensions(), (640, 480));
    /// ```
    pub fn new(width: u32, height: u32) -> Self {
        assert!(width > 0 && height > 0, "image dimensions must be non-zero");
        Self::filled(width, height, Rgba8::BLACK)
    }

    /// Creates an image filled with opaque black, validating dimensions.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidDimensions`] if either dimension is zero or
    /// the pixel count overflows `usize`.
    pub fn try_new(width: u32, height: u32) -> Result<Self> {
        let count = checked_pixel_count(width, height)?;
        Ok(Self {
            pixels: vec![Rgba8::BLACK; count],
            width,
            height,
            sampling: SamplingMethod::default(),
        })
    }

    /// Creates an image filled with a specific pixel value.
    ///
    /// # Panics
    ///
    /// Panics if `width` or `height` is zero.
    pub fn filled(width: u32, height: u32, pixel: Rgba8) -> Self {
        assert!(width > 0 && height > 0, "image dimensions must be non-zero");
        Self {
            pixels: vec![pixel; width as usize * height as usize],
            width,
            height,
            sampling: SamplingMethod::default(),
        }
    }

    /// Creates an image from decoded RGBA8 bytes (4 bytes per pixel,
    /// row-major, no padding).
    ///
    /// # Errors
    ///
    /// - [`Error::InvalidDimensions`] if either dimension is zero
    /// - [`Error::DataLength`] if `bytes.len() != width * height * 4`
    ///
    /// # Example
    ///
    /// ```rust
    /// use raster_core::{ImageBuffer, Rgba8};
    ///
    /// let bytes = [10, 20, 30, 255, 40, 50, 60, 128];
    /// let img = ImageBuffer::from_rgba8(2, 1, &bytes).unwrap();
    /// assert_eq!(img.pixel(1, 0), Rgba8::new(40, 50, 60, 128));
    /// assert!(ImageBuffer::from_rgba8(2, 2, &bytes).is_err());
    /// ```
    pub fn from_rgba8(width: u32, height: u32, bytes: &[u8]) -> Result<Self> {
        let count = checked_pixel_count(width, height)?;
        let expected = count
            .checked_mul(4)
            .ok_or_else(|| Error::invalid_dimensions(width, height, "byte size overflows"))?;
        if bytes.len() != expected {
            return Err(Error::DataLength {
                expected,
                got: bytes.len(),
            });
        }
        let pixels = bytes
            .chunks_exact(4)
            .map(|c| Rgba8::new(c[0], c[1], c[2], c[3]))
            .collect();
        Ok(Self {
            pixels,
            width,
            height,
            sampling: SamplingMethod::default(),
        })
    }

    /// Creates an image from a pixel vector.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidDimensions`] if a dimension is zero or the
    /// vector length doesn't match.
    pub fn from_pixels(width: u32, height: u32, pixels: Vec<Rgba8>) -> Result<Self> {
        let count = checked_pixel_count(width, height)?;
        if pixels.len() != count {
            return Err(Error::invalid_dimensions(
                width,
                height,
                format!("expected {} pixels, got {}", count, pixels.len()),
            ));
        }
        Ok(Self {
            pixels,
            width,
            height,
            sampling: SamplingMethod::default(),
        })
    }

    /// Exports the pixels as tightly packed RGBA8 bytes for an encoder.
    pub fn to_rgba8(&self) -> Vec<u8> {
        self.pixels.iter().flat_map(|p| p.to_array()).collect()
    }

    /// Returns the image width in pixels.
    #[inline]
    pub fn width(&self) -> u32 {
        self.width
    }

    /// Returns the image height in pixels.
    #[inline]
    pub fn height(&self) -> u32 {
        self.height
    }

    /// Returns the image dimensions as (width, height).
    #[inline]
    pub fn dimensions(&self) -> (u32, u32) {
        (self.width, self.height)
    }

    /// Returns the total number of pixels.
    #[inline]
    pub fn pixel_count(&self) -> usize {
        self.pixels.len()
    }

    /// Returns a rectangle covering the entire image.
    #[inline]
    pub fn bounds(&self) -> Rect {
        Rect::from_size(self.width, self.height)
    }

    /// Currently selected sampling method.
    #[inline]
    pub fn sampling_method(&self) -> SamplingMethod {
        self.sampling
    }

    /// Selects the sampling method used by scale and rotate.
    #[inline]
    pub fn set_sampling_method(&mut self, method: SamplingMethod) {
        self.sampling = method;
    }

    /// Selects the sampling method from a raw index (0 = point,
    /// 1 = bilinear, 2 = gaussian).
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidArgument`] for any other value; the current
    /// method is left unchanged.
    pub fn set_sampling_method_raw(&mut self, method: u32) -> Result<()> {
        self.sampling = SamplingMethod::try_from(method)?;
        Ok(())
    }

    /// Builder-style variant of [`set_sampling_method`](Self::set_sampling_method).
    #[inline]
    pub fn with_sampling_method(mut self, method: SamplingMethod) -> Self {
        self.sampling = method;
        self
    }

    /// All pixels in row-major order.
    #[inline]
    pub fn pixels(&self) -> &[Rgba8] {
        &self.pixels
    }

    /// Mutable access to all pixels in row-major order.
    #[inline]
    pub fn pixels_mut(&mut self) -> &mut [Rgba8] {
        &mut self.pixels
    }

    #[inline]
    fn index(&self, x: u32, y: u32) -> usize {
        assert!(
            x < self.width && y < self.height,
            "pixel ({x}, {y}) out of bounds for {}x{}",
            self.width,
            self.height
        );
        y as usize * self.width as usize + x as usize
    }

    /// Returns the pixel at (x, y).
    ///
    /// # Panics
    ///
    /// Panics if (x, y) is out of bounds.
    #[inline]
    pub fn pixel(&self, x: u32, y: u32) -> Rgba8 {
        self.pixels[self.index(x, y)]
    }

    /// Returns the pixel at (x, y), or `None` if out of bounds.
    #[inline]
    pub fn get_pixel(&self, x: u32, y: u32) -> Option<Rgba8> {
        (x < self.width && y < self.height).then(|| self.pixel(x, y))
    }

    /// Returns the pixel nearest to a possibly out-of-range integer
    /// coordinate (edge extension).
    ///
    /// # Example
    ///
    /// ```rust
    /// use raster_core::{ImageBuffer, Rgba8};
    ///
    /// let mut img = ImageBuffer::new(2, 2);
    /// img.set_pixel(1, 0, Rgba8::WHITE);
    /// assert_eq!(img.pixel_clamped(5, -3), Rgba8::WHITE);
    /// ```
    #[inline]
    pub fn pixel_clamped(&self, x: i64, y: i64) -> Rgba8 {
        let cx = x.clamp(0, self.width as i64 - 1) as usize;
        let cy = y.clamp(0, self.height as i64 - 1) as usize;
        self.pixels[cy * self.width as usize + cx]
    }

    /// Sets the pixel at (x, y).
    ///
    /// # Panics
    ///
    /// Panics if (x, y) is out of bounds.
    #[inline]
    pub fn set_pixel(&mut self, x: u32, y: u32, pixel: Rgba8) {
        let i = self.index(x, y);
        self.pixels[i] = pixel;
    }

    /// Sets the pixel at (x, y), returning an error when out of bounds.
    pub fn try_set_pixel(&mut self, x: u32, y: u32, pixel: Rgba8) -> Result<()> {
        if x >= self.width || y >= self.height {
            return Err(Error::out_of_bounds(x, y, self.width, self.height));
        }
        self.set_pixel(x, y, pixel);
        Ok(())
    }

    /// Fills the entire image with a pixel value.
    pub fn fill(&mut self, pixel: Rgba8) {
        self.pixels.fill(pixel);
    }

    /// Returns a row of pixels as a slice.
    ///
    /// # Panics
    ///
    /// Panics if y >= height.
    #[inline]
    pub fn row(&self, y: u32) -> &[Rgba8] {
        let start = self.index(0, y);
        &self.pixels[start..start + self.width as usize]
    }

    /// Returns a mutable row of pixels.
    ///
    /// # Panics
    ///
    /// Panics if y >= height.
    #[inline]
    pub fn row_mut(&mut self, y: u32) -> &mut [Rgba8] {
        let start = self.index(0, y);
        let w = self.width as usize;
        &mut self.pixels[start..start + w]
    }

    /// Iterates over all pixels with their coordinates.
    pub fn enumerate_pixels(&self) -> impl Iterator<Item = (u32, u32, Rgba8)> + '_ {
        let w = self.width as usize;
        self.pixels
            .iter()
            .enumerate()
            .map(move |(i, p)| ((i % w) as u32, (i / w) as u32, *p))
    }

    /// Applies a function to every pixel in place.
    pub fn map_pixels<F>(&mut self, mut f: F)
    where
        F: FnMut(Rgba8) -> Rgba8,
    {
        for p in &mut self.pixels {
            *p = f(*p);
        }
    }
}

impl fmt::Debug for ImageBuffer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ImageBuffer")
            .field("width", &self.width)
            .field("height", &self.height)
            .field("sampling", &self.sampling)
            .finish_non_exhaustive()
    }
}

fn checked_pixel_count(width: u32, height: u32) -> Result<usize> {
    if width == 0 || height == 0 {
        return Err(Error::invalid_dimensions(
            width,
            height,
            "width and height must be > 0",
        ));
    }
    (width as usize)
        .checked_mul(height as usize)
        .ok_or_else(|| Error::invalid_dimensions(width, height, "pixel count overflows"))
}
