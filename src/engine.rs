//! Collaborator interfaces: layout engine and rasterizer.
//!
//! Both are external services as far as this crate is concerned; the
//! pipeline is generic over them and only fixes the contracts it needs.

use ogpress_assets::{AssetLoader, FontDescriptor};

use crate::document::DocumentTree;

/// Layout parameters for a single render.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LayoutConfig {
    /// Target canvas width in pixels.
    pub width: u32,
    /// Target canvas height in pixels.
    pub height: u32,
    /// Draw the engine's debug overlay (element boxes, baselines).
    pub debug: bool,
}

/// Converts a document tree into a vector image.
///
/// The engine may call `assets.load_asset` any number of times, including
/// concurrently, for distinct text runs it discovers during layout — the
/// pipeline controls neither ordering nor arity. The returned SVG is
/// complete only once every callback future the engine awaited has settled.
#[allow(async_fn_in_trait)]
pub trait LayoutEngine {
    /// Lay out the document at the given dimensions and return SVG text.
    ///
    /// `fonts` is the initial font list; runs not covered by it trigger
    /// asset callbacks.
    async fn render_svg(
        &self,
        document: &DocumentTree,
        config: &LayoutConfig,
        fonts: &[FontDescriptor],
        assets: &dyn AssetLoader,
    ) -> anyhow::Result<String>;
}

/// Converts a vector image into raster bytes.
pub trait Rasterizer {
    /// Rasterize SVG text to PNG bytes, scaled to fit `fit_width`; output
    /// height follows from the image's aspect ratio.
    fn rasterize(&self, svg: &str, fit_width: u32) -> anyhow::Result<Vec<u8>>;
}
