//! Emoji asset bridge interface and data-URI wrapping.
//!
//! The core does not know how to turn an emoji glyph run into an image; an
//! external bridge does that in two steps (codepoint lookup, then image by
//! codepoint and style). The core's only job is wrapping the returned SVG
//! bytes into a `data:` URI the layout engine can embed.

use base64::Engine as _;
use base64::engine::general_purpose::STANDARD;
use serde::{Deserialize, Serialize};

/// Emoji artwork style served by the bridge.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EmojiStyle {
    /// Twitter emoji artwork (default).
    #[default]
    Twemoji,
    /// OpenMoji artwork.
    OpenMoji,
    /// Blobmoji artwork.
    Blobmoji,
    /// Noto emoji artwork.
    Noto,
    /// Fluent 3D artwork.
    Fluent,
    /// Fluent flat artwork.
    FluentFlat,
}

/// External bridge resolving emoji glyph runs to vector images.
///
/// Implementations typically perform network I/O; the resolver drives them
/// from a blocking task, so methods may block freely.
pub trait EmojiSource: Send + Sync {
    /// Look up the canonical codepoint sequence for a glyph run
    /// (e.g. `"1f600"` for 😀).
    fn icon_code(&self, text: &str) -> anyhow::Result<String>;

    /// Load the SVG image bytes for a codepoint sequence in a given style.
    fn load(&self, code: &str, style: EmojiStyle) -> anyhow::Result<Vec<u8>>;
}

/// Wrap SVG bytes into an inline `data:image/svg+xml;base64,...` URI.
pub fn svg_data_uri(svg: &[u8]) -> String {
    format!("data:image/svg+xml;base64,{}", STANDARD.encode(svg))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn data_uri_has_svg_base64_prefix() {
        let uri = svg_data_uri(b"<svg/>");
        assert!(uri.starts_with("data:image/svg+xml;base64,"));
    }

    #[test]
    fn data_uri_round_trips_payload() {
        let svg = b"<svg xmlns=\"http://www.w3.org/2000/svg\"/>";
        let uri = svg_data_uri(svg);
        let encoded = uri
            .strip_prefix("data:image/svg+xml;base64,")
            .expect("prefix");
        let decoded = STANDARD.decode(encoded).expect("valid base64");
        assert_eq!(decoded, svg);
    }

    #[test]
    fn style_serializes_lowercase() {
        let json = serde_json::to_string(&EmojiStyle::Twemoji).expect("serialize");
        assert_eq!(json, "\"twemoji\"");
    }
}
