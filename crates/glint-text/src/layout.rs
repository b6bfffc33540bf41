//! Text layout: string + font metrics + options -> placed glyphs.
//!
//! The pass walks the text left to right with a scaled cursor, handling
//! kerning-aware advance, explicit line breaks, and greedy word-wrap with
//! backtracking. Alignment needs each line's final width, which is only
//! known once the line closes, so placement runs in two passes: place and
//! measure, then shift every line's rects horizontally.

use glam::Vec2;

use crate::font::FontMetrics;
use crate::primitives::Rect;

/// Horizontal alignment applied per line once all line widths are known.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum Align {
    #[default]
    Left,
    Right,
    Center,
}

/// Layout options for one text instance.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct LayoutOptions {
    /// Rendered size; glyph metrics are scaled by `font_size / nominal_size`.
    pub font_size: f32,
    pub align: Align,
    /// Apply per-pair kerning adjustments from the font.
    pub kerning: bool,
    /// Extra advance after every glyph, in font-nominal units.
    pub letter_spacing: f32,
    /// Extra distance between lines, in font-nominal units.
    pub line_spacing: f32,
    /// Wrap threshold in layout units. `0` disables wrapping.
    pub max_width: f32,
    /// Shifts the first baseline up, in font-nominal units.
    pub baseline_offset: f32,
}

impl Default for LayoutOptions {
    fn default() -> Self {
        Self {
            font_size: 16.0,
            align: Align::Left,
            kerning: true,
            letter_spacing: 0.0,
            line_spacing: 0.0,
            max_width: 0.0,
            baseline_offset: 0.0,
        }
    }
}

impl LayoutOptions {
    pub fn with_font_size(mut self, font_size: f32) -> Self {
        self.font_size = font_size;
        self
    }

    pub fn with_align(mut self, align: Align) -> Self {
        self.align = align;
        self
    }

    pub fn with_kerning(mut self, kerning: bool) -> Self {
        self.kerning = kerning;
        self
    }

    pub fn with_letter_spacing(mut self, letter_spacing: f32) -> Self {
        self.letter_spacing = letter_spacing;
        self
    }

    pub fn with_line_spacing(mut self, line_spacing: f32) -> Self {
        self.line_spacing = line_spacing;
        self
    }

    pub fn with_max_width(mut self, max_width: f32) -> Self {
        self.max_width = max_width;
        self
    }

    pub fn with_baseline_offset(mut self, baseline_offset: f32) -> Self {
        self.baseline_offset = baseline_offset;
        self
    }
}

/// A glyph resolved to its final on-screen and atlas-source rectangles.
///
/// Transient: recreated from scratch on every layout pass and consumed by
/// the quad builder.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct PlacedGlyph {
    pub char_code: u32,
    /// Index of the line this glyph sits on.
    pub line: usize,
    /// On-screen rectangle in scaled local text space, alignment applied.
    pub draw_rect: Rect,
    /// Atlas source rectangle in unscaled atlas pixels.
    pub src_rect: Rect,
}

/// Output of one layout pass.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct LayoutResult {
    pub glyphs: Vec<PlacedGlyph>,
    /// Width of each line before alignment offsets.
    pub line_widths: Vec<f32>,
    /// Widest line. Alignment offsets do not change this.
    pub text_width: f32,
    /// Max glyph-line bottom edge across the text.
    pub text_height: f32,
    pub bounds: Rect,
}

impl LayoutResult {
    pub fn line_count(&self) -> usize {
        self.line_widths.len()
    }
}

/// Replace literal two-character `\n` / `\r` escape sequences with real
/// line breaks.
///
/// Pre-processing contract for text arriving from sources that escape
/// their newlines (config files, network payloads). Layout itself only
/// understands real break characters.
pub fn normalize_escapes(input: &str) -> String {
    let mut out = String::with_capacity(input.len());
    let mut chars = input.chars().peekable();
    while let Some(ch) = chars.next() {
        if ch == '\\' && matches!(chars.peek(), Some('n') | Some('r')) {
            chars.next();
            out.push('\n');
        } else {
            out.push(ch);
        }
    }
    out
}

/// Wrap candidate: the last whitespace seen on the current line.
///
/// `glyph_len` is the placed-glyph count recorded before the whitespace was
/// placed, so a wrap can truncate the list back to the confirmed span
/// instead of splicing out of its middle.
#[derive(Clone, Copy)]
struct WrapPoint {
    index: usize,
    width: f32,
    glyph_len: usize,
}

/// Lay out `text` against `font`.
///
/// Unknown character codes are skipped without advancing the cursor.
/// Face-name resolution (and its failure mode) happens in front of this
/// call, at the [`FontProvider`](crate::FontProvider) boundary; with
/// resolved metrics in hand the pass itself cannot fail.
pub fn layout(text: &str, font: &FontMetrics, options: &LayoutOptions) -> LayoutResult {
    let scale = options.font_size / font.nominal_size;
    let line_height = font.line_height * scale;
    let line_advance = line_height + options.line_spacing * scale;
    let letter_spacing = options.letter_spacing * scale;

    let chars: Vec<char> = text.chars().collect();

    let mut glyphs: Vec<PlacedGlyph> = Vec::with_capacity(chars.len());
    let mut line_widths: Vec<f32> = Vec::new();

    let mut pos = Vec2::new(0.0, -options.baseline_offset * scale);
    let mut prev_char: Option<u32> = None;
    let mut last_line_width = 0.0_f32;
    let mut max_line_width = 0.0_f32;
    let mut max_line_height = 0.0_f32;
    let mut line = 0_usize;
    let mut wrap: Option<WrapPoint> = None;

    // Indexed scan instead of an iterator: the word-wrap backtrack rewinds
    // the scan position to just after the wrapped whitespace.
    let mut i = 0_usize;
    while i < chars.len() {
        let ch = chars[i];
        let code = ch as u32;

        // Explicit line break. "\r\n" counts as a single break.
        if ch == '\r' || ch == '\n' {
            if last_line_width > 0.0 {
                last_line_width -= letter_spacing;
            }
            line_widths.push(last_line_width);
            max_line_width = max_line_width.max(last_line_width);
            line += 1;

            pos.x = 0.0;
            pos.y += line_advance;
            prev_char = None;
            last_line_width = 0.0;
            wrap = None;

            i += if ch == '\r' && chars.get(i + 1) == Some(&'\n') {
                2
            } else {
                1
            };
            continue;
        }

        // Whitespace: candidate wrap point, width measured before it.
        if ch.is_whitespace() {
            wrap = Some(WrapPoint {
                index: i,
                width: last_line_width,
                glyph_len: glyphs.len(),
            });
        }

        // Soft wrap: the cursor ran past the limit and the line has a
        // confirmed break point. Drop everything placed since the
        // candidate whitespace (including the whitespace itself), rewind
        // the scan to just after it, and close the line at the width
        // measured before the whitespace. Truncation keeps kerning and
        // advance state consistent when the scan resumes.
        if let Some(wp) = wrap {
            if options.max_width > 0.0 && pos.x > options.max_width {
                glyphs.truncate(wp.glyph_len);
                i = wp.index + 1;

                let mut width = wp.width;
                if width > 0.0 {
                    width -= letter_spacing;
                }
                line_widths.push(width);
                max_line_width = max_line_width.max(width);
                line += 1;

                pos.x = 0.0;
                pos.y += line_advance;
                prev_char = None;
                last_line_width = 0.0;
                wrap = None;
                continue;
            }
        }

        let Some(metrics) = font.glyph(code) else {
            log::trace!("no glyph for U+{code:04X} in face {:?}, skipping", font.face);
            i += 1;
            continue;
        };

        if options.kerning {
            if let Some(prev) = prev_char {
                if let Some(adjust) = metrics.kerning_with(prev) {
                    pos.x += adjust * scale;
                }
            }
        }

        glyphs.push(PlacedGlyph {
            char_code: code,
            line,
            draw_rect: Rect::from_min_size(
                [
                    pos.x + metrics.offset.x * scale,
                    pos.y + metrics.offset.y * scale,
                ],
                [
                    metrics.atlas_rect.width() * scale,
                    metrics.atlas_rect.height() * scale,
                ],
            ),
            src_rect: metrics.atlas_rect,
        });

        pos.x += (metrics.advance + options.letter_spacing) * scale;
        last_line_width = pos.x;
        max_line_height = max_line_height.max(pos.y + line_height);
        prev_char = Some(code);
        i += 1;
    }

    // The final line closes unconditionally, even when empty.
    line_widths.push(last_line_width);
    max_line_width = max_line_width.max(last_line_width);

    // Alignment pass over the already-placed glyphs. Widths stay
    // pre-alignment; only the rects shift.
    if options.align != Align::Left {
        let offsets: Vec<f32> = line_widths
            .iter()
            .map(|w| align_offset(options.align, max_line_width, *w))
            .collect();
        for glyph in &mut glyphs {
            glyph.draw_rect.offset_x(offsets[glyph.line]);
        }
    }

    LayoutResult {
        glyphs,
        line_widths,
        text_width: max_line_width,
        text_height: max_line_height,
        bounds: Rect::from_min_size([0.0, 0.0], [max_line_width, max_line_height]),
    }
}

/// Horizontal shift for a line of `width` inside a block of `max_width`.
pub fn align_offset(align: Align, max_width: f32, width: f32) -> f32 {
    match align {
        Align::Left => 0.0,
        Align::Right => max_width - width,
        Align::Center => (max_width - width) / 2.0,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::font::GlyphMetrics;
    use approx::assert_relative_eq;
    use std::collections::HashMap;

    /// Monospace fixture: nominal 10, line height 12, advance 10 per glyph,
    /// 8x10 atlas cells, one kerning pair ('B' after 'A' = -2).
    fn test_font() -> FontMetrics {
        let mut glyphs = HashMap::new();
        for (idx, ch) in "abcABC ".chars().enumerate() {
            let mut kerning = HashMap::new();
            if ch == 'B' {
                kerning.insert('A' as u32, -2.0);
            }
            glyphs.insert(
                ch as u32,
                GlyphMetrics {
                    advance: 10.0,
                    offset: glam::Vec2::new(1.0, 2.0),
                    atlas_rect: Rect::from_min_size([idx as f32 * 8.0, 0.0], [8.0, 10.0]),
                    kerning,
                },
            );
        }
        FontMetrics {
            face: "test".into(),
            nominal_size: 10.0,
            line_height: 12.0,
            atlas_size: [64.0, 16.0],
            glyphs,
        }
    }

    fn opts() -> LayoutOptions {
        // scale = 1 against the fixture's nominal size
        LayoutOptions::default().with_font_size(10.0)
    }

    #[test]
    fn test_empty_text() {
        let result = layout("", &test_font(), &opts());
        assert!(result.glyphs.is_empty());
        assert_eq!(result.text_width, 0.0);
        assert_eq!(result.text_height, 0.0);
        assert_eq!(result.line_widths, vec![0.0]);
    }

    #[test]
    fn test_single_line_metrics() {
        let result = layout("abc", &test_font(), &opts());
        assert_eq!(result.glyphs.len(), 3);
        assert_eq!(result.line_count(), 1);
        assert_relative_eq!(result.text_width, 30.0);
        assert_relative_eq!(result.text_height, 12.0);
    }

    #[test]
    fn test_font_size_scales_everything() {
        let result = layout("abc", &test_font(), &opts().with_font_size(20.0));
        assert_relative_eq!(result.text_width, 60.0);
        assert_relative_eq!(result.text_height, 24.0);
        assert_relative_eq!(result.glyphs[1].draw_rect.min[0], 20.0 + 2.0);
        assert_relative_eq!(result.glyphs[1].draw_rect.width(), 16.0);
    }

    #[test]
    fn test_explicit_break_tags_lines() {
        let result = layout("A\nB", &test_font(), &opts());
        assert_eq!(result.line_count(), 2);
        assert_eq!(result.glyphs[0].line, 0);
        assert_eq!(result.glyphs[1].line, 1);
        // Second glyph starts a fresh line at x=0 and one line down.
        assert_relative_eq!(result.glyphs[1].draw_rect.min[0], 1.0);
        assert_relative_eq!(result.glyphs[1].draw_rect.min[1], 12.0 + 2.0);
    }

    #[test]
    fn test_crlf_is_one_break() {
        let a = layout("A\r\nB", &test_font(), &opts());
        let b = layout("A\nB", &test_font(), &opts());
        assert_eq!(a, b);
    }

    #[test]
    fn test_word_wrap_two_lines() {
        // "aaa bbb" runs to x=70 before the second space is reached, which
        // exceeds 60, so the wrap lands at that space and "ccc" starts the
        // second line.
        let result = layout("aaa bbb ccc", &test_font(), &opts().with_max_width(60.0));
        assert_eq!(result.line_count(), 2);
        let line1: String = result
            .glyphs
            .iter()
            .filter(|g| g.line == 1)
            .map(|g| char::from_u32(g.char_code).unwrap())
            .collect();
        assert_eq!(line1, "ccc");
        // The wrapped whitespace is not rendered; the first space is.
        let spaces = result
            .glyphs
            .iter()
            .filter(|g| g.char_code == ' ' as u32)
            .count();
        assert_eq!(spaces, 1);
    }

    #[test]
    fn test_word_wrap_backtracks_mid_word() {
        // The limit is hit while scanning "bbb", so the wrap backtracks to
        // the first space and re-lays the whole word on line 1, then wraps
        // again before "ccc".
        let result = layout("aaa bbb ccc", &test_font(), &opts().with_max_width(45.0));
        assert_eq!(result.line_count(), 3);
        assert_relative_eq!(result.line_widths[0], 30.0);
        assert_relative_eq!(result.line_widths[1], 30.0);
        assert_relative_eq!(result.line_widths[2], 30.0);
        assert!(result.glyphs.iter().all(|g| g.char_code != ' ' as u32));
    }

    #[test]
    fn test_no_wrap_without_whitespace() {
        // A single long word cannot wrap; it overflows instead.
        let result = layout("aaaaaa", &test_font(), &opts().with_max_width(30.0));
        assert_eq!(result.line_count(), 1);
        assert_relative_eq!(result.text_width, 60.0);
    }

    #[test]
    fn test_kerning_applies_scaled_adjustment() {
        let with = layout("AB", &test_font(), &opts().with_font_size(20.0));
        let without = layout(
            "AB",
            &test_font(),
            &opts().with_font_size(20.0).with_kerning(false),
        );
        let dx = without.glyphs[1].draw_rect.min[0] - with.glyphs[1].draw_rect.min[0];
        // adjustment -2 at scale 2
        assert_relative_eq!(dx, 4.0);
    }

    #[test]
    fn test_kerning_resets_across_breaks() {
        let result = layout("A\nB", &test_font(), &opts());
        // 'B' opens the line, so no pair adjustment applies.
        assert_relative_eq!(result.glyphs[1].draw_rect.min[0], 1.0);
    }

    #[test]
    fn test_unknown_glyphs_are_skipped() {
        let with_unknown = layout("a\u{20AC}b", &test_font(), &opts());
        let plain = layout("ab", &test_font(), &opts());
        assert_eq!(with_unknown, plain);
    }

    #[test]
    fn test_center_alignment_midpoint_invariant() {
        let result = layout(
            "aaa\na",
            &test_font(),
            &opts().with_align(Align::Center),
        );
        assert_eq!(result.line_count(), 2);
        // Line 1 is 20 units narrower, so it shifts by half of that. The
        // glyph origin includes the 1.0 x-offset from the fixture.
        assert_relative_eq!(result.glyphs[3].draw_rect.min[0], 10.0 + 1.0);
        // Width stays pre-alignment.
        assert_relative_eq!(result.text_width, 30.0);
    }

    #[test]
    fn test_right_alignment() {
        let result = layout("aaa\na", &test_font(), &opts().with_align(Align::Right));
        assert_relative_eq!(result.glyphs[3].draw_rect.min[0], 20.0 + 1.0);
    }

    #[test]
    fn test_trailing_letter_spacing_subtracted_on_break() {
        let result = layout("ab\nc", &test_font(), &opts().with_letter_spacing(2.0));
        // Two advances of (10 + 2), minus the trailing 2.
        assert_relative_eq!(result.line_widths[0], 22.0);
    }

    #[test]
    fn test_line_spacing_moves_following_lines() {
        let result = layout("a\nb", &test_font(), &opts().with_line_spacing(3.0));
        assert_relative_eq!(result.glyphs[1].draw_rect.min[1], 12.0 + 3.0 + 2.0);
    }

    #[test]
    fn test_baseline_offset_shifts_up() {
        let result = layout("a", &test_font(), &opts().with_baseline_offset(4.0));
        assert_relative_eq!(result.glyphs[0].draw_rect.min[1], -4.0 + 2.0);
    }

    #[test]
    fn test_whitespace_only_line_closes() {
        let result = layout(" \na", &test_font(), &opts());
        assert_eq!(result.line_count(), 2);
        assert_relative_eq!(result.line_widths[0], 10.0);
    }

    #[test]
    fn test_layout_is_deterministic() {
        let a = layout("aaa bbb ccc\nABC", &test_font(), &opts().with_max_width(60.0));
        let b = layout("aaa bbb ccc\nABC", &test_font(), &opts().with_max_width(60.0));
        assert_eq!(a, b);
    }

    #[test]
    fn test_normalize_escapes() {
        assert_eq!(normalize_escapes(r"a\nb\rc"), "a\nb\nc");
        assert_eq!(normalize_escapes("a\nb"), "a\nb");
        assert_eq!(normalize_escapes(r"a\tb"), r"a\tb");
        assert_eq!(normalize_escapes(r"trailing\"), "trailing\\");
    }
}
