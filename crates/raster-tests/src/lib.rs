//! Integration tests for the raster crates.
//!
//! End-to-end scenarios that drive `raster-ops` over buffers built and
//! serialized through `raster-core`.
