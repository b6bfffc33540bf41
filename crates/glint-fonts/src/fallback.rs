//! Synthetic monospaced fallback face.
//!
//! Lets demos and tests run without any font assets on disk: uniform
//! advances, glyph cells laid out on a virtual atlas grid, printable-ASCII
//! coverage, and a couple of kerning pairs so the kerning path is
//! exercisable. There is no real atlas behind the grid; backends render it
//! against a placeholder texture, which shows up as solid cells.

use std::collections::HashMap;

use glam::Vec2;

use glint_text::{FontMetrics, GlyphMetrics, Rect};

/// Face name the fallback registers under.
pub const FALLBACK_FACE: &str = "glint-fallback";

const CELL_W: f32 = 8.0;
const CELL_H: f32 = 12.0;
const GRID_COLS: u32 = 16;
const FIRST_CHAR: u32 = 0x20;
const LAST_CHAR: u32 = 0x7e;

/// Build the fallback face metrics.
pub fn fallback_metrics() -> FontMetrics {
    let mut glyphs = HashMap::new();
    for code in FIRST_CHAR..=LAST_CHAR {
        let cell = code - FIRST_CHAR;
        let col = cell % GRID_COLS;
        let row = cell / GRID_COLS;

        let mut kerning = HashMap::new();
        // A token pair in each direction, enough to see kerning act.
        if code == 'V' as u32 {
            kerning.insert('A' as u32, -1.0);
        }
        if code == 'A' as u32 {
            kerning.insert('V' as u32, -1.0);
        }

        glyphs.insert(
            code,
            GlyphMetrics {
                advance: CELL_W,
                offset: Vec2::ZERO,
                atlas_rect: Rect::from_min_size(
                    [col as f32 * CELL_W, row as f32 * CELL_H],
                    // Spaces take no cell area.
                    if code == 0x20 {
                        [0.0, 0.0]
                    } else {
                        [CELL_W, CELL_H]
                    },
                ),
                kerning,
            },
        );
    }

    FontMetrics {
        face: FALLBACK_FACE.to_string(),
        nominal_size: CELL_H,
        line_height: CELL_H + 2.0,
        atlas_size: [
            GRID_COLS as f32 * CELL_W,
            (LAST_CHAR - FIRST_CHAR).div_ceil(GRID_COLS) as f32 * CELL_H,
        ],
        glyphs,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_covers_printable_ascii() {
        let metrics = fallback_metrics();
        for code in FIRST_CHAR..=LAST_CHAR {
            assert!(metrics.glyph(code).is_some(), "missing glyph {code}");
        }
        assert!(metrics.glyph('\n' as u32).is_none());
    }

    #[test]
    fn test_cells_stay_inside_the_virtual_atlas() {
        let metrics = fallback_metrics();
        for glyph in metrics.glyphs.values() {
            assert!(glyph.atlas_rect.max[0] <= metrics.atlas_size[0]);
            assert!(glyph.atlas_rect.max[1] <= metrics.atlas_size[1]);
        }
    }

    #[test]
    fn test_kerning_pair_present() {
        let metrics = fallback_metrics();
        let v = metrics.glyph('V' as u32).unwrap();
        assert_eq!(v.kerning_with('A' as u32), Some(-1.0));
    }
}
