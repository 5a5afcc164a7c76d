//! Script-to-font-family classification.
//!
//! Maps the short language/script codes reported by the layout engine to the
//! Google Fonts family that covers that script. The table is a deliberately
//! small curated set: scripts with dense non-Latin glyph repertoires. Latin
//! and anything not listed degrade to [`FALLBACK_FAMILY`], which covers far
//! less — missing glyphs for unlisted script families are an acknowledged
//! limitation, not a bug.

/// Universal fallback family for codes absent from the table.
pub const FALLBACK_FAMILY: &str = "Noto Sans";

/// Script code → web-font family, in rough frequency order.
///
/// Codes match what the layout engine emits during segmentation:
/// BCP-47-ish locale pairs for CJK and the major non-Latin locales, plus
/// bare script/class names (`devanagari`, `math`, `symbol`) for runs it
/// classifies without a locale.
const SCRIPT_FAMILIES: &[(&str, &str)] = &[
    // CJK
    ("ja-JP", "Noto Sans JP"),
    ("ko-KR", "Noto Sans KR"),
    ("zh-CN", "Noto Sans SC"),
    ("zh-TW", "Noto Sans TC"),
    ("zh-HK", "Noto Sans HK"),
    // Southeast Asian / Middle Eastern
    ("th-TH", "Noto Sans Thai"),
    ("he-IL", "Noto Sans Hebrew"),
    ("ar-AR", "Noto Sans Arabic"),
    // Indic
    ("bn-IN", "Noto Sans Bengali"),
    ("ta-IN", "Noto Sans Tamil"),
    ("te-IN", "Noto Sans Telugu"),
    ("ml-IN", "Noto Sans Malayalam"),
    ("devanagari", "Noto Sans Devanagari"),
    ("kannada", "Noto Sans Kannada"),
    // Non-language glyph classes
    ("symbol", "Noto Sans Symbols"),
    ("math", "Noto Sans Math"),
];

/// Map a script code to the font family that covers it.
///
/// Pure and total: unknown codes return [`FALLBACK_FAMILY`].
pub fn font_family_for_script(code: &str) -> &'static str {
    SCRIPT_FAMILIES
        .iter()
        .find(|(script, _)| *script == code)
        .map(|(_, family)| *family)
        .unwrap_or(FALLBACK_FAMILY)
}
