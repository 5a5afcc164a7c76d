//! Single-pass render orchestration.
//!
//! One render flows one direction: component markup → document fragment →
//! vector image (layout engine, calling back into the asset resolver as it
//! discovers uncovered glyph runs) → raster bytes → response stream.
//! Nothing at this level is cached; only the resolver's sub-results persist
//! across renders.

use std::sync::Arc;

use ogpress_assets::{AssetError, AssetResolver};

use crate::document::{DocumentTree, OgComponent};
use crate::engine::{LayoutConfig, LayoutEngine, Rasterizer};
use crate::error::RenderError;
use crate::options::{Mode, RenderOptions};
use crate::response::ImageResponse;

/// Renders components to PNG image responses.
///
/// Constructed once per process (or server instance); the resolver's cache
/// is shared across every render this instance performs.
pub struct ImageRenderer<L, R> {
    layout: L,
    rasterizer: R,
    resolver: Arc<AssetResolver>,
    mode: Mode,
}

impl<L: LayoutEngine, R: Rasterizer> ImageRenderer<L, R> {
    /// Create a renderer over a layout engine, rasterizer, and resolver.
    pub fn new(layout: L, rasterizer: R, resolver: Arc<AssetResolver>) -> Self {
        Self {
            layout,
            rasterizer,
            resolver,
            mode: Mode::default(),
        }
    }

    /// Override the deployment mode (default production).
    pub fn with_mode(mut self, mode: Mode) -> Self {
        self.mode = mode;
        self
    }

    /// Render one component to a PNG response.
    ///
    /// The component renders synchronously; the layout engine then lays the
    /// fragment out at the requested dimensions, resolving uncovered glyph
    /// runs through the shared asset resolver in whatever order it finds
    /// them. The resulting SVG is rasterized fit-to-width and streamed back
    /// as a single-chunk `image/png` body.
    ///
    /// # Errors
    /// Fails without starting the response stream on invalid options, a
    /// missing base font, a layout or rasterizer failure, or an aborting
    /// asset failure (emoji path under the default policy).
    pub async fn render<C: OgComponent>(
        &self,
        component: &C,
        props: &C::Props,
        options: RenderOptions,
    ) -> Result<ImageResponse, RenderError> {
        options.validate()?;

        let document = DocumentTree::from_markup(&component.render(props));

        let fonts = if options.fonts.is_empty() {
            vec![crate::basefont::base_font()?]
        } else {
            options.fonts.clone()
        };

        let config = LayoutConfig {
            width: options.width,
            height: options.height,
            debug: options.debug,
        };
        let loader = self.resolver.loader(options.emoji);

        log::debug!(
            "Laying out {}x{} document ({} initial fonts)",
            config.width,
            config.height,
            fonts.len()
        );
        let svg = self
            .layout
            .render_svg(&document, &config, &fonts, &loader)
            .await
            .map_err(layout_error)?;

        let png = self
            .rasterizer
            .rasterize(&svg, options.width)
            .map_err(RenderError::Rasterize)?;
        log::debug!("Rasterized {} byte PNG at width {}", png.len(), options.width);

        Ok(ImageResponse::png(png, self.mode, &options.response))
    }
}

/// Classify an error escaping the layout engine.
///
/// An aborting asset failure (emoji path) crosses the engine boundary as an
/// `anyhow` error; recover its type so callers can match on it.
fn layout_error(error: anyhow::Error) -> RenderError {
    match error.downcast::<AssetError>() {
        Ok(asset) => RenderError::Asset(asset),
        Err(other) => RenderError::Layout(other),
    }
}
