//! Bitmap-font metrics data model and the provider seam.
//!
//! `FontMetrics` is loaded once per face, is immutable, and may be shared
//! read-only (via `Arc`) by arbitrarily many text instances laid out
//! concurrently. Parsing/loading lives in provider crates (e.g.
//! `glint-fonts`); this module only defines the shapes the layout engine
//! consumes.

use std::collections::HashMap;
use std::sync::Arc;

use glam::Vec2;

use crate::primitives::Rect;

/// Per-character metrics supplied by the font source.
#[derive(Clone, Debug, Default)]
pub struct GlyphMetrics {
    /// Horizontal cursor displacement after placing this glyph, in
    /// font-nominal units. Independent of the glyph's visual width.
    pub advance: f32,
    /// Origin offset from the cursor to the glyph rectangle's top-left,
    /// in font-nominal units.
    pub offset: Vec2,
    /// Sub-rectangle of the atlas holding this glyph, in atlas pixels.
    pub atlas_rect: Rect,
    /// Kerning adjustments keyed by the *previous* character code.
    pub kerning: HashMap<u32, f32>,
}

impl GlyphMetrics {
    /// Kerning adjustment to apply when this glyph follows `prev`.
    pub fn kerning_with(&self, prev: u32) -> Option<f32> {
        self.kerning.get(&prev).copied()
    }
}

/// Face-wide metrics for one bitmap font.
#[derive(Clone, Debug)]
pub struct FontMetrics {
    pub face: String,
    /// The size the atlas was generated at. Layout scales everything by
    /// `font_size / nominal_size`.
    pub nominal_size: f32,
    /// Baseline-to-baseline distance in font-nominal units.
    pub line_height: f32,
    /// Atlas page dimensions in pixels, used to normalize UVs.
    pub atlas_size: [f32; 2],
    pub glyphs: HashMap<u32, GlyphMetrics>,
}

impl FontMetrics {
    pub fn glyph(&self, code: u32) -> Option<&GlyphMetrics> {
        self.glyphs.get(&code)
    }

    pub fn glyph_count(&self) -> usize {
        self.glyphs.len()
    }
}

/// Read-only lookup of font metrics by face name.
///
/// Implemented by `glint_fonts::FontRegistry`. Returning `None` for an
/// unknown face is the only failure mode; callers surface it as
/// [`TextError::InvalidFontFace`](crate::TextError::InvalidFontFace).
pub trait FontProvider {
    fn font(&self, face: &str) -> Option<Arc<FontMetrics>>;
}
