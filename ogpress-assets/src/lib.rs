//! Dynamic glyph asset resolution for the ogpress rendering pipeline.
//!
//! This crate provides:
//! - Script classification (script code → covering web-font family)
//! - Remote font fetching from the Google Fonts CSS2 API
//! - The emoji bridge interface and data-URI wrapping
//! - The memoizing [`AssetResolver`] the layout engine calls back into
//!
//! # Architecture
//!
//! The layout engine, while laying a document out, discovers text runs the
//! supplied fonts cannot cover and asks the [`AssetResolver`] for each one.
//! Emoji runs go through an external [`EmojiSource`] bridge and come back as
//! inline SVG data URIs; script runs are classified to a font family and
//! fetched as subset font binaries. Every outcome is memoized for the
//! process lifetime, keyed by the exact `(kind, coverage text)` pair.

pub mod emoji;
pub mod error;
pub mod google_fonts;
pub mod resolver;
pub mod script;

// Re-export main types for convenience
pub use emoji::{EmojiSource, EmojiStyle, svg_data_uri};
pub use error::AssetError;
pub use google_fonts::{FontFetcher, FontSource, extract_font_url};
pub use resolver::{
    Asset, AssetCache, AssetFuture, AssetKind, AssetLoader, AssetRequest, AssetResolver,
    EmojiFailurePolicy, FontDescriptor, FontStyle, StyledAssets,
};
pub use script::{FALLBACK_FAMILY, font_family_for_script};
