//! Typed error types for asset resolution.
//!
//! This module provides structured error types so callers at the crate
//! boundary can match on specific failure modes instead of relying on opaque
//! `anyhow` strings. Font-path variants are normally caught inside the
//! resolver and degraded to "no asset"; only emoji-path failures (under the
//! default abort policy) escape to the render pipeline.

use thiserror::Error;

/// Errors raised while resolving a dynamic glyph asset.
#[derive(Debug, Error)]
pub enum AssetError {
    // -----------------------------------------------------------------------
    // Remote font path
    // -----------------------------------------------------------------------
    /// The stylesheet request to the font host failed (DNS, TLS, non-2xx,
    /// or body read failure).
    #[error("font stylesheet request failed for '{family}': {reason}")]
    StylesheetFetch {
        /// Font family the stylesheet was requested for.
        family: String,
        /// Human-readable transport error.
        reason: String,
    },

    /// The font host's stylesheet did not contain the expected
    /// `src: url(...) format('opentype'|'truetype')` source declaration.
    ///
    /// This usually means the host changed its CSS shape or ignored the
    /// User-Agent format negotiation; failing loudly here keeps a format
    /// change from corrupting a binary fetch downstream.
    #[error("stylesheet contains no OpenType/TrueType src declaration")]
    MalformedStylesheet,

    /// The extracted font resource URL could not be parsed.
    #[error("invalid font resource URL '{url}': {reason}")]
    InvalidFontUrl {
        /// The URL extracted from the stylesheet.
        url: String,
        /// Parse failure description.
        reason: String,
    },

    /// Downloading the font binary itself failed.
    #[error("font binary download failed from '{url}': {reason}")]
    FontDownload {
        /// Resource URL the download was attempted from.
        url: String,
        /// Human-readable transport error.
        reason: String,
    },

    // -----------------------------------------------------------------------
    // Emoji path
    // -----------------------------------------------------------------------
    /// The emoji bridge failed to produce an image for a glyph run.
    ///
    /// Under [`EmojiFailurePolicy::Abort`](crate::EmojiFailurePolicy::Abort)
    /// this aborts the whole render.
    #[error("emoji asset lookup failed for {text:?}")]
    Emoji {
        /// The glyph run that could not be resolved.
        text: String,
        /// Underlying bridge error.
        #[source]
        source: anyhow::Error,
    },

    // -----------------------------------------------------------------------
    // Runtime
    // -----------------------------------------------------------------------
    /// A blocking fetch task panicked or was cancelled before completing.
    #[error("asset fetch task did not complete: {0}")]
    TaskFailed(String),
}
