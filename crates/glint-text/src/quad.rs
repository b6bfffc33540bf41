//! Quad buffer building: placed glyphs -> flat vertex/UV/index buffers.
//!
//! Every glyph becomes an independent quad: 4 vertices (8 floats) and 6
//! indices, no vertex sharing across glyphs. Corner order is fixed as
//! bottom-left, top-left, top-right, bottom-right; UV emission mirrors it
//! with the v axis flipped, since texture-space y grows downward while
//! mesh-space y grows upward in this layout.

use crate::layout::PlacedGlyph;

/// Vertex positions for `glyphs`, 8 floats per glyph.
pub fn vertices(glyphs: &[PlacedGlyph]) -> Vec<f32> {
    let mut out = Vec::new();
    write_vertices(glyphs, &mut out);
    out
}

/// Normalized texture coordinates for `glyphs`, 8 floats per glyph.
pub fn uvs(glyphs: &[PlacedGlyph], atlas_width: f32, atlas_height: f32) -> Vec<f32> {
    let mut out = Vec::new();
    write_uvs(glyphs, atlas_width, atlas_height, &mut out);
    out
}

/// Triangle indices for `count` quads, 6 per quad.
pub fn indices(count: usize) -> Vec<u32> {
    let mut out = Vec::new();
    write_indices(count, &mut out);
    out
}

/// As [`vertices`], writing into a caller-supplied buffer to reuse its
/// allocation across relayouts.
pub fn write_vertices(glyphs: &[PlacedGlyph], out: &mut Vec<f32>) {
    out.clear();
    out.reserve(glyphs.len() * 8);
    for glyph in glyphs {
        let x = glyph.draw_rect.min[0];
        let y = glyph.draw_rect.min[1];
        let w = glyph.draw_rect.width();
        let h = glyph.draw_rect.height();
        // BL, TL, TR, BR
        out.extend_from_slice(&[x, y, x, y + h, x + w, y + h, x + w, y]);
    }
}

/// As [`uvs`], writing into a caller-supplied buffer.
///
/// A missing atlas degrades to zero-area UVs instead of failing.
pub fn write_uvs(glyphs: &[PlacedGlyph], atlas_width: f32, atlas_height: f32, out: &mut Vec<f32>) {
    out.clear();
    if atlas_width <= 0.0 || atlas_height <= 0.0 {
        out.resize(glyphs.len() * 8, 0.0);
        return;
    }
    out.reserve(glyphs.len() * 8);
    for glyph in glyphs {
        let u0 = glyph.src_rect.min[0] / atlas_width;
        let u1 = glyph.src_rect.max[0] / atlas_width;
        let v0 = glyph.src_rect.max[1] / atlas_height;
        let v1 = glyph.src_rect.min[1] / atlas_height;
        // Same corner order as the vertices, v flipped.
        out.extend_from_slice(&[u0, v1, u0, v0, u1, v0, u1, v1]);
    }
}

/// As [`indices`], writing into a caller-supplied buffer.
pub fn write_indices(count: usize, out: &mut Vec<u32>) {
    out.clear();
    out.reserve(count * 6);
    for quad in 0..count as u32 {
        let base = quad * 4;
        out.extend_from_slice(&[base, base + 1, base + 2, base, base + 2, base + 3]);
    }
}

/// The three flat buffers a renderer consumes, with retained allocations.
///
/// A text instance owns one of these exclusively and rebuilds it wholesale
/// on every text or option mutation.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct QuadBuffers {
    pub positions: Vec<f32>,
    pub uvs: Vec<f32>,
    pub indices: Vec<u32>,
}

impl QuadBuffers {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_capacity(glyph_capacity: usize) -> Self {
        Self {
            positions: Vec::with_capacity(glyph_capacity * 8),
            uvs: Vec::with_capacity(glyph_capacity * 8),
            indices: Vec::with_capacity(glyph_capacity * 6),
        }
    }

    /// Rebuild all three buffers from `glyphs`, reusing the allocations.
    pub fn rebuild(&mut self, glyphs: &[PlacedGlyph], atlas_width: f32, atlas_height: f32) {
        write_vertices(glyphs, &mut self.positions);
        write_uvs(glyphs, atlas_width, atlas_height, &mut self.uvs);
        write_indices(glyphs.len(), &mut self.indices);
    }

    pub fn clear(&mut self) {
        self.positions.clear();
        self.uvs.clear();
        self.indices.clear();
    }

    pub fn is_empty(&self) -> bool {
        self.indices.is_empty()
    }

    pub fn glyph_count(&self) -> usize {
        self.positions.len() / 8
    }
}
