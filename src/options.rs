//! Render options and deployment mode.

use ogpress_assets::{EmojiStyle, FontDescriptor};
use serde::{Deserialize, Serialize};

use crate::error::RenderError;

/// Default canvas width in pixels.
pub const DEFAULT_WIDTH: u32 = 1200;

/// Default canvas height in pixels.
pub const DEFAULT_HEIGHT: u32 = 630;

/// Deployment mode, selecting the response caching policy.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Mode {
    /// Local development: responses are never cached.
    Development,
    /// Production: responses are immutable and cached for a year.
    #[default]
    Production,
}

impl Mode {
    /// Read the mode from the `OGPRESS_MODE` environment variable.
    ///
    /// `development` (case-insensitive) selects [`Mode::Development`];
    /// anything else, including an unset variable, is production.
    pub fn from_env() -> Self {
        match std::env::var("OGPRESS_MODE") {
            Ok(value) if value.eq_ignore_ascii_case("development") => Mode::Development,
            _ => Mode::Production,
        }
    }
}

/// Caller-supplied response overrides, merged over the pipeline's defaults.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ResponseInit {
    /// Override the response status (default 200).
    #[serde(default)]
    pub status: Option<u16>,
    /// Override the status text.
    #[serde(default)]
    pub status_text: Option<String>,
    /// Extra headers; a name already set by the pipeline is replaced
    /// (case-insensitive), anything else is appended.
    #[serde(default)]
    pub headers: Vec<(String, String)>,
}

/// Options for a single render. Immutable once the render starts.
#[derive(Debug, Clone)]
pub struct RenderOptions {
    /// Canvas width in pixels.
    pub width: u32,
    /// Canvas height in pixels.
    pub height: u32,
    /// Draw the layout engine's debug overlay.
    pub debug: bool,
    /// Initial font list; empty means the discovered base font.
    pub fonts: Vec<FontDescriptor>,
    /// Emoji artwork style for this render.
    pub emoji: EmojiStyle,
    /// Response overrides.
    pub response: ResponseInit,
}

impl Default for RenderOptions {
    fn default() -> Self {
        Self {
            width: DEFAULT_WIDTH,
            height: DEFAULT_HEIGHT,
            debug: false,
            fonts: Vec::new(),
            emoji: EmojiStyle::default(),
            response: ResponseInit::default(),
        }
    }
}

impl RenderOptions {
    /// Validate option invariants before any engine is invoked.
    pub fn validate(&self) -> Result<(), RenderError> {
        if self.width == 0 || self.height == 0 {
            return Err(RenderError::InvalidOptions(format!(
                "width and height must be positive, got {}x{}",
                self.width, self.height
            )));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_og_card_dimensions() {
        let options = RenderOptions::default();
        assert_eq!(options.width, 1200);
        assert_eq!(options.height, 630);
        assert!(!options.debug);
        assert!(options.fonts.is_empty());
        assert_eq!(options.emoji, EmojiStyle::Twemoji);
    }

    #[test]
    fn zero_dimensions_are_rejected() {
        let options = RenderOptions {
            width: 0,
            ..RenderOptions::default()
        };
        assert!(matches!(
            options.validate(),
            Err(RenderError::InvalidOptions(_))
        ));

        let options = RenderOptions {
            height: 0,
            ..RenderOptions::default()
        };
        assert!(options.validate().is_err());
    }

    #[test]
    fn default_mode_is_production() {
        assert_eq!(Mode::default(), Mode::Production);
    }

    #[test]
    fn response_init_deserializes_from_json() {
        let init: ResponseInit = serde_json::from_str(
            r#"{ "status": 201, "headers": [["x-card", "1"]] }"#,
        )
        .expect("valid init");
        assert_eq!(init.status, Some(201));
        assert_eq!(init.headers.len(), 1);
        assert!(init.status_text.is_none());
    }
}
