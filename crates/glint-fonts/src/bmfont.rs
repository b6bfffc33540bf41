//! BMFont JSON descriptor parsing.
//!
//! The descriptor carries per-character advance/offset/atlas-rect data,
//! face-wide size and line height, atlas page file names, and a flat
//! kerning-pair list. Conversion folds the kerning pairs into each glyph's
//! own map, keyed by the previous character code, which is the shape the
//! layout engine looks them up in.

use std::collections::HashMap;

use glam::Vec2;
use serde::Deserialize;

use glint_text::{FontMetrics, GlyphMetrics, Rect};

use crate::FontError;

/// Raw BMFont JSON descriptor, as emitted by msdf-bmfont.
#[derive(Clone, Debug, Deserialize)]
pub struct FontDescriptor {
    pub info: Info,
    pub common: Common,
    #[serde(default)]
    pub pages: Vec<String>,
    #[serde(default)]
    pub chars: Vec<CharEntry>,
    #[serde(default)]
    pub kernings: Vec<KerningEntry>,
}

#[derive(Clone, Debug, Deserialize)]
pub struct Info {
    pub face: String,
    /// Size the atlas was generated at; the layout engine's nominal size.
    pub size: f32,
}

#[derive(Clone, Debug, Deserialize)]
pub struct Common {
    #[serde(rename = "lineHeight")]
    pub line_height: f32,
    #[serde(rename = "scaleW", default)]
    pub scale_w: f32,
    #[serde(rename = "scaleH", default)]
    pub scale_h: f32,
}

#[derive(Clone, Debug, Deserialize)]
pub struct CharEntry {
    pub id: u32,
    #[serde(default)]
    pub x: f32,
    #[serde(default)]
    pub y: f32,
    #[serde(default)]
    pub width: f32,
    #[serde(default)]
    pub height: f32,
    #[serde(default)]
    pub xoffset: f32,
    #[serde(default)]
    pub yoffset: f32,
    #[serde(default)]
    pub xadvance: f32,
    #[serde(default)]
    pub page: u32,
}

#[derive(Clone, Debug, Deserialize)]
pub struct KerningEntry {
    pub first: u32,
    pub second: u32,
    pub amount: f32,
}

impl FontDescriptor {
    pub fn from_json(json: &str) -> Result<Self, FontError> {
        Ok(serde_json::from_str(json)?)
    }

    /// Atlas page file names, relative to wherever the descriptor lives.
    pub fn page_names(&self) -> &[String] {
        &self.pages
    }

    /// Convert into the metrics shape the layout engine consumes.
    pub fn into_metrics(self) -> FontMetrics {
        let mut glyphs: HashMap<u32, GlyphMetrics> = HashMap::with_capacity(self.chars.len());
        for ch in &self.chars {
            glyphs.insert(
                ch.id,
                GlyphMetrics {
                    advance: ch.xadvance,
                    offset: Vec2::new(ch.xoffset, ch.yoffset),
                    atlas_rect: Rect::from_min_size([ch.x, ch.y], [ch.width, ch.height]),
                    kerning: HashMap::new(),
                },
            );
        }

        // Kerning pairs attach to the *second* character, keyed by the first.
        let mut dropped = 0_usize;
        for pair in &self.kernings {
            match glyphs.get_mut(&pair.second) {
                Some(glyph) => {
                    glyph.kerning.insert(pair.first, pair.amount);
                }
                None => dropped += 1,
            }
        }
        if dropped > 0 {
            log::warn!(
                "face {:?}: dropped {dropped} kerning pairs referencing unknown glyphs",
                self.info.face
            );
        }

        FontMetrics {
            face: self.info.face,
            nominal_size: self.info.size,
            line_height: self.common.line_height,
            atlas_size: [self.common.scale_w, self.common.scale_h],
            glyphs,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: &str = r#"{
        "pages": ["sample.png"],
        "chars": [
            {"id": 65, "char": "A", "x": 0, "y": 0, "width": 20, "height": 24,
             "xoffset": 1, "yoffset": 4, "xadvance": 18, "page": 0, "chnl": 15},
            {"id": 66, "char": "B", "x": 20, "y": 0, "width": 18, "height": 24,
             "xoffset": 2, "yoffset": 4, "xadvance": 17, "page": 0, "chnl": 15},
            {"id": 32, "char": " ", "x": 0, "y": 0, "width": 0, "height": 0,
             "xadvance": 9, "page": 0, "chnl": 15}
        ],
        "info": {"face": "Sample", "size": 42, "bold": 0, "italic": 0,
                 "padding": [2, 2, 2, 2], "spacing": [0, 0]},
        "common": {"lineHeight": 53, "base": 42, "scaleW": 512, "scaleH": 256, "pages": 1},
        "kernings": [
            {"first": 65, "second": 66, "amount": -2},
            {"first": 66, "second": 999, "amount": -1}
        ]
    }"#;

    #[test]
    fn test_parse_sample_descriptor() {
        let descriptor = FontDescriptor::from_json(SAMPLE).unwrap();
        assert_eq!(descriptor.info.face, "Sample");
        assert_eq!(descriptor.page_names(), ["sample.png"]);
        assert_eq!(descriptor.chars.len(), 3);
        assert_eq!(descriptor.kernings.len(), 2);
    }

    #[test]
    fn test_into_metrics() {
        let metrics = FontDescriptor::from_json(SAMPLE).unwrap().into_metrics();
        assert_eq!(metrics.face, "Sample");
        assert_eq!(metrics.nominal_size, 42.0);
        assert_eq!(metrics.line_height, 53.0);
        assert_eq!(metrics.atlas_size, [512.0, 256.0]);

        let a = metrics.glyph('A' as u32).unwrap();
        assert_eq!(a.advance, 18.0);
        assert_eq!(a.offset, Vec2::new(1.0, 4.0));
        assert_eq!(a.atlas_rect, Rect::from_min_size([0.0, 0.0], [20.0, 24.0]));

        // The pair (A, B) lands on B keyed by A.
        let b = metrics.glyph('B' as u32).unwrap();
        assert_eq!(b.kerning_with('A' as u32), Some(-2.0));
        assert_eq!(a.kerning_with('B' as u32), None);
    }

    #[test]
    fn test_missing_optional_fields_default() {
        let json = r#"{
            "info": {"face": "Bare", "size": 10},
            "common": {"lineHeight": 12},
            "chars": [{"id": 97, "xadvance": 5}]
        }"#;
        let metrics = FontDescriptor::from_json(json).unwrap().into_metrics();
        assert_eq!(metrics.atlas_size, [0.0, 0.0]);
        let a = metrics.glyph('a' as u32).unwrap();
        assert_eq!(a.advance, 5.0);
        assert_eq!(a.atlas_rect.width(), 0.0);
    }

    #[test]
    fn test_invalid_json_is_a_parse_error() {
        let err = FontDescriptor::from_json("not json").unwrap_err();
        assert!(matches!(err, FontError::Parse(_)));
    }
}
