//! Base font discovery.
//!
//! When the caller supplies no font list, the pipeline needs one face the
//! layout engine can open for Latin text. It is discovered from the system
//! font database once per process and memoized; every render reuses the
//! same descriptor.

use std::sync::OnceLock;

use fontdb::{Database, Family, Query};
use ogpress_assets::FontDescriptor;

use crate::error::RenderError;

/// Family name the base font registers under.
///
/// Fetched fallback families all carry a `fallback_` prefix, so this can
/// never collide with one — a collision would make glyph substitution
/// silently fail.
pub const BASE_FONT_FAMILY: &str = "og-base";

/// System families tried in order before the generic sans-serif query.
const PREFERRED_FAMILIES: &[&str] = &[
    "Noto Sans",
    "DejaVu Sans",
    "Liberation Sans",
    "Arial",
    "Helvetica",
];

static BASE_FONT: OnceLock<Option<FontDescriptor>> = OnceLock::new();

/// The process-wide base font.
///
/// # Errors
/// Returns [`RenderError::BaseFont`] when no usable sans-serif face exists
/// on the system; callers can avoid discovery entirely by supplying
/// `RenderOptions::fonts`.
pub fn base_font() -> Result<FontDescriptor, RenderError> {
    BASE_FONT
        .get_or_init(load_base_font)
        .clone()
        .ok_or_else(|| {
            RenderError::BaseFont(
                "no sans-serif system font found; supply RenderOptions::fonts".to_string(),
            )
        })
}

fn load_base_font() -> Option<FontDescriptor> {
    let mut db = Database::new();
    db.load_system_fonts();
    log::info!("Loaded {} system fonts for base-font discovery", db.len());

    for family in PREFERRED_FAMILIES {
        if let Some(descriptor) = load_family(&mut db, Family::Name(family)) {
            log::info!("Base font: {family}");
            return Some(descriptor);
        }
    }
    let descriptor = load_family(&mut db, Family::SansSerif);
    if descriptor.is_some() {
        log::info!("Base font: system sans-serif");
    }
    descriptor
}

fn load_family(db: &mut Database, family: Family) -> Option<FontDescriptor> {
    let query = Query {
        families: &[family],
        weight: fontdb::Weight::NORMAL,
        style: fontdb::Style::Normal,
        ..Query::default()
    };
    let id = db.query(&query)?;

    // SAFETY: make_shared_face_data is safe when called with a valid ID
    // from query()
    let (data, _face_index) = unsafe { db.make_shared_face_data(id)? };
    let bytes = data.as_ref().as_ref().to_vec();
    Some(FontDescriptor::regular(BASE_FONT_FAMILY, bytes))
}
