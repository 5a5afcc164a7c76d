//! Identity-keyed, memoizing asset resolution.
//!
//! The layout engine calls back into [`AssetResolver`] whenever it discovers
//! a text run it cannot cover with the fonts supplied so far. Requests arrive
//! in no particular order, possibly concurrently, and are keyed by the exact
//! `(kind, coverage text)` pair: two requests with equal fields are the same
//! request regardless of call site.
//!
//! The cache is process-lifetime and append-only — no eviction, no TTL, no
//! size bound. Asset identity is stable for a given key, so repeated renders
//! of the same text reuse the same remote fetch. Concurrent first-time
//! resolutions of one key share a single in-flight computation via a per-key
//! [`OnceCell`], so the duplicate-fetch window is closed without changing
//! externally observable behaviour.

use std::collections::HashMap;
use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;

use parking_lot::Mutex;
use tokio::sync::OnceCell;

use crate::emoji::{EmojiSource, EmojiStyle, svg_data_uri};
use crate::error::AssetError;
use crate::google_fonts::{FontFetcher, FontSource};
use crate::script::font_family_for_script;

/// What kind of asset a layout-engine callback is asking for.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum AssetKind {
    /// An emoji glyph run, resolved through the emoji bridge.
    Emoji,
    /// A text run in the named script, resolved through the remote font
    /// fetcher.
    Script(String),
}

impl AssetKind {
    /// Parse the raw code string the layout engine passes to its callback.
    ///
    /// The engine uses the literal code `"emoji"` for emoji runs; every
    /// other code is a script code.
    pub fn from_code(code: &str) -> Self {
        if code == "emoji" {
            AssetKind::Emoji
        } else {
            AssetKind::Script(code.to_string())
        }
    }

    /// The raw code string for this kind.
    pub fn code(&self) -> &str {
        match self {
            AssetKind::Emoji => "emoji",
            AssetKind::Script(code) => code,
        }
    }
}

/// A single asset resolution request.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct AssetRequest {
    /// Emoji, or the script code of the uncovered run.
    pub kind: AssetKind,
    /// The literal text the asset must be able to render.
    pub coverage_text: String,
}

impl AssetRequest {
    /// Build a request from a kind and coverage text.
    pub fn new(kind: AssetKind, coverage_text: impl Into<String>) -> Self {
        Self {
            kind,
            coverage_text: coverage_text.into(),
        }
    }

    /// Build a request from the raw `(code, text)` pair of a layout-engine
    /// callback.
    pub fn from_code(code: &str, coverage_text: impl Into<String>) -> Self {
        Self::new(AssetKind::from_code(code), coverage_text)
    }

    /// Serialized cache identity: the exact ordered `(kind, text)` pair.
    pub fn cache_key(&self) -> String {
        format!("{}|{}", self.kind.code(), self.coverage_text)
    }
}

/// Style of a resolved fallback font face.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FontStyle {
    /// Upright.
    Normal,
    /// Italic.
    Italic,
}

/// A font binary handed to the layout engine.
#[derive(Clone, PartialEq, Eq)]
pub struct FontDescriptor {
    /// Family name the layout engine registers this face under. Synthesized
    /// per `(script code, coverage text)` pair for fetched fallbacks, so it
    /// never collides with the base font or another fallback within a
    /// render — a collision would make glyph substitution silently fail.
    pub family_name: String,
    /// Raw font binary (TrueType or OpenType).
    pub data: Vec<u8>,
    /// CSS-style weight, 1–1000.
    pub weight: u16,
    /// Face style.
    pub style: FontStyle,
}

impl FontDescriptor {
    /// A regular-weight upright face.
    pub fn regular(family_name: impl Into<String>, data: Vec<u8>) -> Self {
        Self {
            family_name: family_name.into(),
            data,
            weight: 400,
            style: FontStyle::Normal,
        }
    }
}

impl std::fmt::Debug for FontDescriptor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FontDescriptor")
            .field("family_name", &self.family_name)
            .field("data_len", &self.data.len())
            .field("weight", &self.weight)
            .field("style", &self.style)
            .finish()
    }
}

/// A resolved renderable asset.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Asset {
    /// Fallback font covering a script run.
    Font(FontDescriptor),
    /// Inline `data:image/svg+xml;base64,...` image for an emoji run.
    Image(String),
}

/// What to do when the emoji bridge fails for a glyph run.
///
/// A single, central policy switch: the font path always degrades to "no
/// asset", and this decides whether the emoji path does the same or aborts
/// the render.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum EmojiFailurePolicy {
    /// Propagate the failure and abort the whole render (default; matches
    /// the behaviour this pipeline was built against).
    #[default]
    Abort,
    /// Log and resolve as "no asset", like the font path. The run renders
    /// with missing glyphs instead of failing the response.
    Degrade,
}

/// Append-only, process-lifetime asset cache.
///
/// Each entry is a per-key [`OnceCell`]: a settled cell holds the resolved
/// value (including "no asset"), an unsettled cell marks an in-flight
/// computation that concurrent callers await instead of re-fetching. Failed
/// computations leave the cell unsettled, so errors are never cached.
#[derive(Default)]
pub struct AssetCache {
    entries: Mutex<HashMap<String, Arc<OnceCell<Option<Asset>>>>>,
}

impl AssetCache {
    /// Create an empty cache.
    pub fn new() -> Self {
        Self::default()
    }

    /// The cell for a key, inserting an unsettled one if absent.
    fn entry(&self, key: &str) -> Arc<OnceCell<Option<Asset>>> {
        let mut entries = self.entries.lock();
        entries.entry(key.to_string()).or_default().clone()
    }

    /// A settled value for a key, if one has been cached.
    ///
    /// `Some(None)` means the key resolved to "no asset"; `None` means the
    /// key has never settled.
    pub fn get(&self, key: &str) -> Option<Option<Asset>> {
        let entries = self.entries.lock();
        entries.get(key).and_then(|cell| cell.get().cloned())
    }

    /// Number of settled entries.
    pub fn len(&self) -> usize {
        let entries = self.entries.lock();
        entries.values().filter(|cell| cell.get().is_some()).count()
    }

    /// Whether no entry has settled yet.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Boxed future returned by [`AssetLoader::load_asset`].
pub type AssetFuture<'a> = Pin<Box<dyn Future<Output = Result<Option<Asset>, AssetError>> + Send + 'a>>;

/// Capability object handed to the layout engine.
///
/// One async method, no ordering or arity assumptions: the engine may call
/// it any number of times, concurrently, as it discovers uncovered runs.
pub trait AssetLoader: Send + Sync {
    /// Resolve one request to an asset, "no asset", or a fatal error.
    fn load_asset(&self, request: AssetRequest) -> AssetFuture<'_>;
}

/// Resolves asset requests against the emoji bridge and the remote font
/// fetcher, memoizing every outcome in an [`AssetCache`].
///
/// Constructed once per process; the cache is shared across all concurrent
/// renders.
pub struct AssetResolver {
    cache: AssetCache,
    fonts: Arc<dyn FontSource>,
    emoji: Arc<dyn EmojiSource>,
    emoji_policy: EmojiFailurePolicy,
}

impl AssetResolver {
    /// Create a resolver over explicit font and emoji sources.
    pub fn new(fonts: Arc<dyn FontSource>, emoji: Arc<dyn EmojiSource>) -> Self {
        Self {
            cache: AssetCache::new(),
            fonts,
            emoji,
            emoji_policy: EmojiFailurePolicy::default(),
        }
    }

    /// Create a resolver fetching fonts from the public Google Fonts host.
    pub fn with_google_fonts(emoji: Arc<dyn EmojiSource>) -> Self {
        Self::new(Arc::new(FontFetcher::new()), emoji)
    }

    /// Override the emoji failure policy.
    pub fn emoji_policy(mut self, policy: EmojiFailurePolicy) -> Self {
        self.emoji_policy = policy;
        self
    }

    /// The shared cache, for inspection.
    pub fn cache(&self) -> &AssetCache {
        &self.cache
    }

    /// The per-render loader view handed to the layout engine.
    ///
    /// `style` selects the emoji artwork for this render; it does not
    /// participate in cache identity, so renders with differing styles share
    /// whatever the first one cached for a given `(kind, text)` pair.
    pub fn loader(self: &Arc<Self>, style: EmojiStyle) -> StyledAssets {
        StyledAssets {
            resolver: Arc::clone(self),
            style,
        }
    }

    /// Resolve one request, consulting the cache first.
    ///
    /// Cache hits return without touching the network. Misses compute the
    /// value and settle the key; concurrent misses on one key share a single
    /// computation. A font-path failure settles the key as `Ok(None)`
    /// (logged, render continues); an emoji-path failure under the default
    /// [`EmojiFailurePolicy::Abort`] leaves the key unsettled and returns
    /// the error.
    pub async fn resolve(
        &self,
        request: &AssetRequest,
        style: EmojiStyle,
    ) -> Result<Option<Asset>, AssetError> {
        let key = request.cache_key();
        let cell = self.cache.entry(&key);
        let value = cell
            .get_or_try_init(|| self.compute(request, style))
            .await?;
        Ok(value.clone())
    }

    async fn compute(
        &self,
        request: &AssetRequest,
        style: EmojiStyle,
    ) -> Result<Option<Asset>, AssetError> {
        match &request.kind {
            AssetKind::Emoji => self.compute_emoji(&request.coverage_text, style).await,
            AssetKind::Script(code) => Ok(self.compute_font(code, &request.coverage_text).await),
        }
    }

    async fn compute_emoji(
        &self,
        text: &str,
        style: EmojiStyle,
    ) -> Result<Option<Asset>, AssetError> {
        let bridge = Arc::clone(&self.emoji);
        let run = text.to_string();
        // The bridge may block on network I/O; keep it off the async workers.
        let fetched = tokio::task::spawn_blocking(move || -> anyhow::Result<Vec<u8>> {
            let code = bridge.icon_code(&run)?;
            bridge.load(&code, style)
        })
        .await;

        let svg = match fetched {
            Ok(Ok(svg)) => svg,
            Ok(Err(source)) => {
                return self.emoji_failure(
                    text,
                    AssetError::Emoji {
                        text: text.to_string(),
                        source,
                    },
                );
            }
            Err(join) => {
                return self.emoji_failure(text, AssetError::TaskFailed(join.to_string()));
            }
        };

        Ok(Some(Asset::Image(svg_data_uri(&svg))))
    }

    fn emoji_failure(&self, text: &str, error: AssetError) -> Result<Option<Asset>, AssetError> {
        match self.emoji_policy {
            EmojiFailurePolicy::Abort => Err(error),
            EmojiFailurePolicy::Degrade => {
                log::warn!("Emoji asset unresolved for {text:?}: {error}");
                Ok(None)
            }
        }
    }

    /// Font-path computation. Infallible by design: any failure is logged
    /// and resolved (and cached) as "no asset", so one unreachable font
    /// degrades glyph coverage instead of aborting the render.
    async fn compute_font(&self, code: &str, text: &str) -> Option<Asset> {
        let family = font_family_for_script(code);
        let source = Arc::clone(&self.fonts);
        let family_owned = family.to_string();
        let run = text.to_string();
        let fetched =
            tokio::task::spawn_blocking(move || source.fetch(&family_owned, &run)).await;

        match fetched {
            Ok(Ok(Some(data))) => Some(Asset::Font(FontDescriptor::regular(
                fallback_family_name(code, text),
                data,
            ))),
            Ok(Ok(None)) => None,
            Ok(Err(e)) => {
                log::warn!("Fallback font unresolved for script '{code}' (family '{family}'): {e}");
                None
            }
            Err(join) => {
                log::warn!("Fallback font task failed for script '{code}': {join}");
                None
            }
        }
    }
}

/// Per-render [`AssetLoader`] view binding a resolver to an emoji style.
pub struct StyledAssets {
    resolver: Arc<AssetResolver>,
    style: EmojiStyle,
}

impl AssetLoader for StyledAssets {
    fn load_asset(&self, request: AssetRequest) -> AssetFuture<'_> {
        Box::pin(async move { self.resolver.resolve(&request, self.style).await })
    }
}

/// Synthesize the registered family name for a fetched fallback font.
///
/// Unique per `(script code, coverage text)` pair, and the `fallback_`
/// prefix keeps it disjoint from any base-font family a caller supplies.
fn fallback_family_name(code: &str, text: &str) -> String {
    format!("fallback_{code}_{text}")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cache_key_is_the_ordered_pair() {
        let emoji = AssetRequest::from_code("emoji", "😀");
        assert_eq!(emoji.cache_key(), "emoji|😀");

        let script = AssetRequest::from_code("ja-JP", "こん");
        assert_eq!(script.cache_key(), "ja-JP|こん");
    }

    #[test]
    fn equal_fields_mean_equal_requests() {
        let a = AssetRequest::from_code("th-TH", "ไทย");
        let b = AssetRequest::new(AssetKind::Script("th-TH".into()), "ไทย");
        assert_eq!(a, b);
        assert_eq!(a.cache_key(), b.cache_key());
    }

    #[test]
    fn emoji_code_parses_to_emoji_kind() {
        assert_eq!(AssetKind::from_code("emoji"), AssetKind::Emoji);
        assert_eq!(
            AssetKind::from_code("ko-KR"),
            AssetKind::Script("ko-KR".into())
        );
    }

    #[test]
    fn fallback_family_names_are_distinct_per_request() {
        let a = fallback_family_name("ja-JP", "こん");
        let b = fallback_family_name("ja-JP", "にち");
        let c = fallback_family_name("ko-KR", "こん");
        assert_ne!(a, b);
        assert_ne!(a, c);
        assert!(a.starts_with("fallback_"));
    }

    #[test]
    fn descriptor_debug_omits_raw_bytes() {
        let desc = FontDescriptor::regular("fallback_ja-JP_x", vec![0u8; 4096]);
        let debug = format!("{desc:?}");
        assert!(debug.contains("data_len"));
        assert!(!debug.contains("0, 0, 0"));
    }
}
