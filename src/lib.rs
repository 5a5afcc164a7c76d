//! OG-image rendering pipeline with on-demand glyph asset resolution.
//!
//! This crate provides:
//! - The [`ImageRenderer`] pipeline: component markup → layout → raster →
//!   streamed `image/png` response
//! - [`RenderOptions`] with OG-card defaults (1200×630) and response
//!   header/caching policy per deployment [`Mode`]
//! - Collaborator contracts for the external layout engine and rasterizer
//! - Base-font discovery for renders that supply no font list
//!
//! Dynamic asset resolution (remote fallback fonts, emoji data URIs, the
//! process-lifetime cache) lives in the `ogpress-assets` crate and is
//! re-exported here.
//!
//! # Architecture
//!
//! A render executes once per request and flows one direction. The layout
//! engine is handed the initial font list plus an asset callback; whenever
//! it discovers a text run those fonts cannot cover, it asks the callback
//! for a fallback font (by script) or an inline image (emoji). Resolutions
//! run concurrently and settle out of order; layout completes only after
//! all of them have, and rasterization strictly follows layout.

pub mod basefont;
pub mod document;
pub mod engine;
pub mod error;
pub mod options;
pub mod pipeline;
pub mod response;

// Re-export main types for convenience
pub use basefont::{BASE_FONT_FAMILY, base_font};
pub use document::{DocumentTree, Markup, OgComponent};
pub use engine::{LayoutConfig, LayoutEngine, Rasterizer};
pub use error::RenderError;
pub use options::{DEFAULT_HEIGHT, DEFAULT_WIDTH, Mode, RenderOptions, ResponseInit};
pub use pipeline::ImageRenderer;
pub use response::{ByteStream, ImageResponse};

// Asset-resolution surface
pub use ogpress_assets::{
    Asset, AssetCache, AssetError, AssetKind, AssetLoader, AssetRequest, AssetResolver,
    EmojiFailurePolicy, EmojiSource, EmojiStyle, FontDescriptor, FontFetcher, FontSource,
    FontStyle,
};
