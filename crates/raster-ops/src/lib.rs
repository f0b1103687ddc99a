//! # raster-ops
//!
//! Image processing operations on [`raster_core::ImageBuffer`].
//!
//! # Modules
//!
//! - [`adjust`] - Per-pixel brightness, contrast, saturation, quantization
//! - [`dither`] - Random, ordered and error-diffusion dithering
//! - [`filter`] - Convolution, blur, sharpen, edge detection
//! - [`sample`] - Point, bilinear and Gaussian reconstruction
//! - [`transform`] - Crop, paste, scale, rotate
//!
//! Point operations and dithering work in place. Convolution and resampling
//! read the source and return a new buffer.
//!
//! # Common Operations
//!
//! ## Dither
//!
//! ```rust
//! use raster_core::{ImageBuffer, Rgba8};
//! use raster_ops::dither::floyd_steinberg_dither;
//!
//! let mut img = ImageBuffer::filled(8, 8, Rgba8::gray(100));
//! floyd_steinberg_dither(&mut img, 1).unwrap();
//! ```
//!
//! ## Filter
//!
//! ```rust
//! use raster_core::ImageBuffer;
//! use raster_ops::filter::{blur, edge_detect};
//!
//! let img = ImageBuffer::new(16, 16);
//! let soft = blur(&img, 5).unwrap();
//! let edges = edge_detect(&soft);
//! assert_eq!(edges.dimensions(), (16, 16));
//! ```
//!
//! ## Resample
//!
//! ```rust
//! use raster_core::{ImageBuffer, SamplingMethod};
//! use raster_ops::transform::scale;
//!
//! let img = ImageBuffer::new(20, 10).with_sampling_method(SamplingMethod::Bilinear);
//! let big = scale(&img, 2.0, 1.5).unwrap();
//! assert_eq!(big.dimensions(), (40, 15));
//! ```

#![warn(missing_docs)]
#![warn(rustdoc::missing_crate_level_docs)]

mod error;
pub mod adjust;
pub mod dither;
pub mod filter;
pub mod sample;
pub mod transform;

pub use error::{OpsError, OpsResult};
pub use dither::DitherMethod;
pub use filter::Kernel;
pub use sample::Sampler;
