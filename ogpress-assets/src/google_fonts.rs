//! Remote font fetching from the Google Fonts CSS2 API.
//!
//! Fetching a fallback font is two sequential round-trips:
//! 1. `GET /css2?family=<id>&text=<urlencoded>` returns a stylesheet whose
//!    `@font-face` rule is subset to exactly the requested text. Keying the
//!    request by text keeps the payload minimal and is why the asset cache
//!    keys on text too.
//! 2. The `src: url(...)` resource from that stylesheet is downloaded as the
//!    raw font binary.
//!
//! The stylesheet request carries a fixed desktop-Safari User-Agent: the
//! host varies the served format by client sniffing, and this UA makes it
//! return TrueType. A host-side change to that behaviour is an environment
//! assumption we do not validate.

use std::sync::OnceLock;
use std::time::Duration;

use regex::Regex;
use ureq::Agent;
use ureq::tls::{RootCerts, TlsConfig, TlsProvider};

use crate::error::AssetError;

/// Stylesheet endpoint of the Google Fonts CSS2 API.
pub const GOOGLE_FONTS_CSS_ENDPOINT: &str = "https://fonts.googleapis.com/css2";

/// User-Agent sent with stylesheet requests.
///
/// Desktop Safari, chosen because the host serves TrueType sources to it
/// (other UAs get WOFF2, which the layout engine cannot consume).
const STYLESHEET_USER_AGENT: &str = "Mozilla/5.0 (Macintosh; Intel Mac OS X 10_15_6) \
     AppleWebKit/605.1.15 (KHTML, like Gecko) Version/14.0 Safari/605.1.15";

/// Global timeout for all font-host HTTP operations (30 seconds).
const HTTP_TIMEOUT: Duration = Duration::from_secs(30);

/// Maximum stylesheet body size (1 MB).
const MAX_STYLESHEET_SIZE: u64 = 1024 * 1024;

/// Maximum font binary size (10 MB).
const MAX_FONT_SIZE: u64 = 10 * 1024 * 1024;

/// Source of fallback font binaries, keyed by family and coverage text.
///
/// The resolver depends on this seam rather than on [`FontFetcher`] directly
/// so tests can substitute an offline implementation.
pub trait FontSource: Send + Sync {
    /// Fetch a font binary covering `text` for `family`.
    ///
    /// Returns `Ok(None)` when either input is empty — a request with no
    /// coverage text needs no font.
    fn fetch(&self, family: &str, text: &str) -> Result<Option<Vec<u8>>, AssetError>;
}

/// Fetches subset font binaries from a Google-Fonts-compatible host.
pub struct FontFetcher {
    agent: Agent,
    css_endpoint: String,
}

impl FontFetcher {
    /// Create a fetcher against the public Google Fonts endpoint.
    pub fn new() -> Self {
        Self::with_endpoint(GOOGLE_FONTS_CSS_ENDPOINT)
    }

    /// Create a fetcher against a custom stylesheet endpoint.
    ///
    /// Used by tests and by deployments that front the font host with a
    /// caching proxy.
    pub fn with_endpoint(endpoint: impl Into<String>) -> Self {
        let tls_config = TlsConfig::builder()
            .provider(TlsProvider::NativeTls)
            .root_certs(RootCerts::PlatformVerifier)
            .build();

        let agent: Agent = Agent::config_builder()
            .tls_config(tls_config)
            .timeout_global(Some(HTTP_TIMEOUT))
            .build()
            .into();

        Self {
            agent,
            css_endpoint: endpoint.into(),
        }
    }

    /// Build the subset stylesheet URL for a family and coverage text.
    ///
    /// Family words are joined with `+` (the host's canonical family id
    /// spelling); the text is percent-encoded.
    fn stylesheet_url(&self, family: &str, text: &str) -> String {
        let family_id = family.replace(' ', "+");
        let encoded_text: String = url::form_urlencoded::byte_serialize(text.as_bytes()).collect();
        format!(
            "{}?family={}&text={}",
            self.css_endpoint, family_id, encoded_text
        )
    }

    /// Fetch the subset stylesheet body for a family and coverage text.
    fn fetch_stylesheet(&self, family: &str, text: &str) -> Result<String, AssetError> {
        let url = self.stylesheet_url(family, text);
        log::debug!("Requesting font stylesheet: {url}");

        self.agent
            .get(&url)
            .header("User-Agent", STYLESHEET_USER_AGENT)
            .call()
            .map_err(|e| AssetError::StylesheetFetch {
                family: family.to_string(),
                reason: e.to_string(),
            })?
            .into_body()
            .with_config()
            .limit(MAX_STYLESHEET_SIZE)
            .read_to_string()
            .map_err(|e| AssetError::StylesheetFetch {
                family: family.to_string(),
                reason: e.to_string(),
            })
    }

    /// Download the font binary at a resource URL extracted from a stylesheet.
    fn download_font(&self, url: &str) -> Result<Vec<u8>, AssetError> {
        // Sanity-parse before hitting the network so a mangled extraction
        // fails with a typed error rather than a confusing transport one.
        url::Url::parse(url).map_err(|e| AssetError::InvalidFontUrl {
            url: url.to_string(),
            reason: e.to_string(),
        })?;

        self.agent
            .get(url)
            .header("User-Agent", STYLESHEET_USER_AGENT)
            .call()
            .map_err(|e| AssetError::FontDownload {
                url: url.to_string(),
                reason: e.to_string(),
            })?
            .into_body()
            .with_config()
            .limit(MAX_FONT_SIZE)
            .read_to_vec()
            .map_err(|e| AssetError::FontDownload {
                url: url.to_string(),
                reason: e.to_string(),
            })
    }
}

impl Default for FontFetcher {
    fn default() -> Self {
        Self::new()
    }
}

impl FontSource for FontFetcher {
    fn fetch(&self, family: &str, text: &str) -> Result<Option<Vec<u8>>, AssetError> {
        if family.is_empty() || text.is_empty() {
            return Ok(None);
        }

        let css = self.fetch_stylesheet(family, text)?;
        let resource_url = extract_font_url(&css)?;
        let bytes = self.download_font(resource_url)?;
        log::debug!(
            "Fetched {} byte font for family '{family}' ({} chars of coverage)",
            bytes.len(),
            text.chars().count()
        );
        Ok(Some(bytes))
    }
}

/// Extract the downloadable font resource URL from a stylesheet body.
///
/// Scans for `src: url(<resource>) format('opentype')` or `format('truetype')`
/// and returns the captured resource URL. String-matching CSS is brittle by
/// nature, so the match lives here behind a typed failure: an upstream format
/// change surfaces as [`AssetError::MalformedStylesheet`] instead of a
/// corrupted binary fetch.
pub fn extract_font_url(css: &str) -> Result<&str, AssetError> {
    static SRC_PATTERN: OnceLock<Regex> = OnceLock::new();
    let pattern = SRC_PATTERN.get_or_init(|| {
        Regex::new(r"src: url\((.+?)\) format\('(?:opentype|truetype)'\)")
            .unwrap_or_else(|e| panic!("invalid font src pattern: {e}"))
    });

    pattern
        .captures(css)
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str())
        .ok_or(AssetError::MalformedStylesheet)
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE_CSS: &str = "\
/* latin */
@font-face {
  font-family: 'Noto Sans JP';
  font-style: normal;
  font-weight: 400;
  src: url(https://fonts.gstatic.com/l/font?kit=abc123) format('truetype');
}
";

    #[test]
    fn extracts_truetype_src() {
        let url = extract_font_url(SAMPLE_CSS).expect("should extract src url");
        assert_eq!(url, "https://fonts.gstatic.com/l/font?kit=abc123");
    }

    #[test]
    fn extracts_opentype_src() {
        let css = "src: url(https://fonts.gstatic.com/l/font?kit=xyz) format('opentype');";
        let url = extract_font_url(css).expect("should extract src url");
        assert_eq!(url, "https://fonts.gstatic.com/l/font?kit=xyz");
    }

    #[test]
    fn rejects_woff_only_stylesheet() {
        let css = "src: url(https://fonts.gstatic.com/s/x.woff2) format('woff2');";
        let err = extract_font_url(css).expect_err("woff2 is not consumable");
        assert!(matches!(err, AssetError::MalformedStylesheet));
    }

    #[test]
    fn rejects_empty_stylesheet() {
        assert!(matches!(
            extract_font_url(""),
            Err(AssetError::MalformedStylesheet)
        ));
    }

    #[test]
    fn stylesheet_url_encodes_family_and_text() {
        let fetcher = FontFetcher::with_endpoint("https://example.test/css2");
        let url = fetcher.stylesheet_url("Noto Sans JP", "こんにちは");
        assert!(url.starts_with("https://example.test/css2?family=Noto+Sans+JP&text="));
        // Text must be percent-encoded, never raw.
        assert!(!url.contains('こ'));
        assert!(url.contains('%'));
    }

    #[test]
    fn empty_inputs_need_no_network() {
        // `fetch` must short-circuit before any request is attempted.
        let fetcher = FontFetcher::with_endpoint("https://unroutable.invalid/css2");
        assert!(matches!(fetcher.fetch("", "text"), Ok(None)));
        assert!(matches!(fetcher.fetch("Noto Sans", ""), Ok(None)));
    }
}
