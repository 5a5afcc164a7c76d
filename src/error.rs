//! Typed error types for the render pipeline.
//!
//! This module provides structured error types so callers at the crate
//! boundary can match on specific failure modes instead of relying on opaque
//! `anyhow` strings. Any of these is fatal to the single render that raised
//! it and should surface to the HTTP caller as a server error; the response
//! stream is never started once one occurs.

use ogpress_assets::AssetError;
use thiserror::Error;

/// Top-level error type for OG-image rendering.
#[derive(Debug, Error)]
pub enum RenderError {
    /// The caller supplied unusable render options (e.g. zero width or
    /// height). Rejected before the layout engine is invoked.
    #[error("invalid render options: {0}")]
    InvalidOptions(String),

    /// No base font could be discovered and the caller supplied none.
    #[error("no usable base font: {0}")]
    BaseFont(String),

    /// The layout engine failed to produce a vector image.
    #[error("layout engine failed: {0}")]
    Layout(#[source] anyhow::Error),

    /// The rasterizer failed to produce raster bytes.
    #[error("rasterizer failed: {0}")]
    Rasterize(#[source] anyhow::Error),

    /// An asset resolution failure escaped the layout engine — under the
    /// default policy this is an emoji-path failure, which aborts the
    /// render rather than degrading like the font path.
    #[error(transparent)]
    Asset(#[from] AssetError),
}
