//! Debug visualization hook.
//!
//! The layout core never draws. It can describe its bounding boxes to a
//! [`DebugSink`], and backends or tools decide what to do with them: draw
//! outlines, log them, or nothing at all.

use crate::color::Color;
use crate::font::FontMetrics;
use crate::layout::{align_offset, LayoutOptions, LayoutResult};
use crate::primitives::Rect;

/// Verbosity of the debug overlay.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord)]
pub enum DebugLevel {
    #[default]
    Off,
    /// Overall text bounding box.
    TextBox,
    /// Plus per-line bounding boxes.
    LineBoxes,
    /// Plus per-glyph bounding boxes.
    GlyphBoxes,
}

impl DebugLevel {
    /// Next level, wrapping back to `Off`. Handy for a debug keybind.
    pub fn cycled(self) -> Self {
        match self {
            Self::Off => Self::TextBox,
            Self::TextBox => Self::LineBoxes,
            Self::LineBoxes => Self::GlyphBoxes,
            Self::GlyphBoxes => Self::Off,
        }
    }
}

/// What a debug rectangle describes.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum DebugRect {
    TextBounds,
    LineBounds(usize),
    GlyphBounds,
}

impl DebugRect {
    /// Conventional overlay color for this rect kind.
    pub const fn color(self) -> Color {
        match self {
            Self::TextBounds => Color::from_hex(0xffffff),
            Self::LineBounds(_) => Color::from_hex(0x00ff00),
            Self::GlyphBounds => Color::from_hex(0x0000aa),
        }
    }
}

/// Receiver for debug rectangles.
pub trait DebugSink {
    fn emit_rect(&mut self, rect: Rect, kind: DebugRect);
}

/// Sink that discards everything.
#[derive(Clone, Copy, Debug, Default)]
pub struct NullSink;

impl DebugSink for NullSink {
    fn emit_rect(&mut self, _rect: Rect, _kind: DebugRect) {}
}

/// Sink that writes rects to the log at debug level.
#[derive(Clone, Copy, Debug, Default)]
pub struct LogSink;

impl DebugSink for LogSink {
    fn emit_rect(&mut self, rect: Rect, kind: DebugRect) {
        log::debug!(
            "{kind:?}: ({}, {}) {}x{}",
            rect.min[0],
            rect.min[1],
            rect.width(),
            rect.height()
        );
    }
}

/// Describe a layout's bounding boxes to `sink`, gated by `level`.
pub fn emit_debug_rects(
    result: &LayoutResult,
    font: &FontMetrics,
    options: &LayoutOptions,
    level: DebugLevel,
    sink: &mut dyn DebugSink,
) {
    if level < DebugLevel::TextBox {
        return;
    }
    sink.emit_rect(result.bounds, DebugRect::TextBounds);

    if level < DebugLevel::LineBoxes {
        return;
    }
    let scale = options.font_size / font.nominal_size;
    let line_height = font.line_height * scale;
    let line_advance = line_height + options.line_spacing * scale;
    let top = -options.baseline_offset * scale;
    for (index, width) in result.line_widths.iter().enumerate() {
        let x = align_offset(options.align, result.text_width, *width);
        sink.emit_rect(
            Rect::from_min_size([x, top + index as f32 * line_advance], [*width, line_height]),
            DebugRect::LineBounds(index),
        );
    }

    if level < DebugLevel::GlyphBoxes {
        return;
    }
    for glyph in &result.glyphs {
        sink.emit_rect(glyph.draw_rect, DebugRect::GlyphBounds);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::font::GlyphMetrics;
    use crate::layout::layout;
    use std::collections::HashMap;

    struct CountingSink {
        text: usize,
        lines: usize,
        glyphs: usize,
    }

    impl DebugSink for CountingSink {
        fn emit_rect(&mut self, _rect: Rect, kind: DebugRect) {
            match kind {
                DebugRect::TextBounds => self.text += 1,
                DebugRect::LineBounds(_) => self.lines += 1,
                DebugRect::GlyphBounds => self.glyphs += 1,
            }
        }
    }

    fn test_font() -> FontMetrics {
        let mut glyphs = HashMap::new();
        glyphs.insert(
            'a' as u32,
            GlyphMetrics {
                advance: 10.0,
                offset: glam::Vec2::ZERO,
                atlas_rect: Rect::from_min_size([0.0, 0.0], [8.0, 10.0]),
                kerning: HashMap::new(),
            },
        );
        FontMetrics {
            face: "test".into(),
            nominal_size: 10.0,
            line_height: 12.0,
            atlas_size: [64.0, 16.0],
            glyphs,
        }
    }

    fn counts(level: DebugLevel) -> CountingSink {
        let font = test_font();
        let options = LayoutOptions::default().with_font_size(10.0);
        let result = layout("aa\na", &font, &options);
        let mut sink = CountingSink {
            text: 0,
            lines: 0,
            glyphs: 0,
        };
        emit_debug_rects(&result, &font, &options, level, &mut sink);
        sink
    }

    #[test]
    fn test_level_gating() {
        let off = counts(DebugLevel::Off);
        assert_eq!((off.text, off.lines, off.glyphs), (0, 0, 0));

        let text_box = counts(DebugLevel::TextBox);
        assert_eq!((text_box.text, text_box.lines, text_box.glyphs), (1, 0, 0));

        let line_boxes = counts(DebugLevel::LineBoxes);
        assert_eq!(
            (line_boxes.text, line_boxes.lines, line_boxes.glyphs),
            (1, 2, 0)
        );

        let glyph_boxes = counts(DebugLevel::GlyphBoxes);
        assert_eq!(
            (glyph_boxes.text, glyph_boxes.lines, glyph_boxes.glyphs),
            (1, 2, 3)
        );
    }

    #[test]
    fn test_cycled_wraps() {
        assert_eq!(DebugLevel::GlyphBoxes.cycled(), DebugLevel::Off);
        assert_eq!(DebugLevel::Off.cycled(), DebugLevel::TextBox);
    }
}
