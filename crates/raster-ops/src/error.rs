//! Error types for image operations.

use thiserror::Error;

/// Error type for image operations.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum OpsError {
    /// Invalid dimensions specified.
    #[error("invalid dimensions: {0}")]
    InvalidDimensions(String),

    /// Invalid parameter value.
    #[error("invalid parameter: {0}")]
    InvalidParameter(String),

    /// Error raised by the underlying buffer.
    #[error(transparent)]
    Core(#[from] raster_core::Error),
}

impl OpsError {
    /// Returns `true` if this wraps a bounds error from the buffer.
    pub fn is_bounds_error(&self) -> bool {
        matches!(self, Self::Core(e) if e.is_bounds_error())
    }
}

/// Result type for image operations.
pub type OpsResult<T> = Result<T, OpsError>;

/// Checks that `nbits` selects between 2 and 256 levels per channel.
pub(crate) fn check_nbits(nbits: u32) -> OpsResult<()> {
    if !(1..=8).contains(&nbits) {
        return Err(OpsError::InvalidParameter(format!(
            "nbits must be in 1..=8, got {nbits}"
        )));
    }
    Ok(())
}
