//! Style options and the flat shading parameter bundle.
//!
//! The shading stage works in distance thresholds: lower cutoffs make
//! thicker glyphs. The public [`TextStyle::weight`] keeps the intuitive
//! direction (higher = thicker); the inversion to a cutoff happens once, in
//! [`ShadingParams::from_style`], and everything downstream speaks
//! thresholds.

use crate::color::Color;

/// Visual style for one text instance. Layout-independent.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct TextStyle {
    /// Fill color as packed `0xRRGGBB`.
    pub fill_color: u32,
    /// Glyph body thickness in [0, 1]; higher means thicker.
    pub weight: f32,
    /// Stroke color as packed `0xRRGGBB`.
    pub stroke_color: u32,
    /// Stroke thickness as a distance-field span. `0` disables the stroke.
    pub stroke_thickness: f32,
    pub drop_shadow: bool,
    /// Shadow color as packed `0xRRGGBB`.
    pub shadow_color: u32,
    pub shadow_alpha: f32,
    /// Shadow offset in UV units, independent per axis.
    pub shadow_offset: [f32; 2],
    /// Shadow edge smoothing radius.
    pub shadow_blur: f32,
    /// Distance-field pixel range the atlas was generated with.
    pub px_range: f32,
}

impl Default for TextStyle {
    fn default() -> Self {
        Self {
            fill_color: 0xffffff,
            weight: 0.5,
            stroke_color: 0x000000,
            stroke_thickness: 0.0,
            drop_shadow: false,
            shadow_color: 0x000000,
            shadow_alpha: 0.5,
            shadow_offset: [0.002, 0.002],
            shadow_blur: 0.1,
            px_range: 3.0,
        }
    }
}

impl TextStyle {
    pub fn with_fill_color(mut self, fill_color: u32) -> Self {
        self.fill_color = fill_color;
        self
    }

    pub fn with_weight(mut self, weight: f32) -> Self {
        self.weight = weight;
        self
    }

    pub fn with_stroke(mut self, stroke_color: u32, stroke_thickness: f32) -> Self {
        self.stroke_color = stroke_color;
        self.stroke_thickness = stroke_thickness;
        self
    }

    pub fn with_drop_shadow(mut self, shadow_color: u32, shadow_alpha: f32) -> Self {
        self.drop_shadow = true;
        self.shadow_color = shadow_color;
        self.shadow_alpha = shadow_alpha;
        self
    }

    pub fn with_shadow_offset(mut self, shadow_offset: [f32; 2]) -> Self {
        self.shadow_offset = shadow_offset;
        self
    }

    pub fn with_shadow_blur(mut self, shadow_blur: f32) -> Self {
        self.shadow_blur = shadow_blur;
        self
    }

    pub fn with_px_range(mut self, px_range: f32) -> Self {
        self.px_range = px_range;
        self
    }
}

/// Flat parameter bundle forwarded verbatim to the shading stage.
///
/// Immutable once derived; the host passes it to whatever draw/bind step it
/// owns. `tint` and `alpha` default to identity and are supplied by the
/// host scene graph, not the style.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ShadingParams {
    pub color: [f32; 3],
    /// Distance cutoff for the glyph body; `1 - weight`.
    pub fill_weight: f32,
    /// Distance cutoff for the stroke edge, `0` when the stroke is off.
    pub stroke_weight: f32,
    pub stroke_color: [f32; 3],
    pub has_shadow: bool,
    pub shadow_offset: [f32; 2],
    pub shadow_color: [f32; 3],
    pub shadow_alpha: f32,
    pub shadow_smoothing: f32,
    pub px_range: f32,
    /// Rendered font size, for screen-space smoothing width.
    pub font_size: f32,
    pub tint: [f32; 3],
    pub alpha: f32,
}

impl ShadingParams {
    /// Derive the parameter bundle from a style at a given rendered size.
    pub fn from_style(style: &TextStyle, font_size: f32) -> Self {
        let fill_weight = 1.0 - style.weight;
        let stroke_weight = if style.stroke_thickness > 0.0 {
            fill_weight - style.stroke_thickness
        } else {
            0.0
        };

        Self {
            color: Color::from_hex(style.fill_color).to_rgb_array(),
            fill_weight,
            stroke_weight,
            stroke_color: Color::from_hex(style.stroke_color).to_rgb_array(),
            has_shadow: style.drop_shadow,
            shadow_offset: style.shadow_offset,
            shadow_color: Color::from_hex(style.shadow_color).to_rgb_array(),
            shadow_alpha: style.shadow_alpha,
            shadow_smoothing: style.shadow_blur,
            px_range: style.px_range,
            font_size,
            tint: [1.0, 1.0, 1.0],
            alpha: 1.0,
        }
    }

    pub fn with_tint(mut self, tint: [f32; 3]) -> Self {
        self.tint = tint;
        self
    }

    pub fn with_alpha(mut self, alpha: f32) -> Self {
        self.alpha = alpha;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_weight_inversion() {
        let params = ShadingParams::from_style(&TextStyle::default().with_weight(0.7), 32.0);
        assert_relative_eq!(params.fill_weight, 0.3);
    }

    #[test]
    fn test_stroke_disabled_at_zero_thickness() {
        let params = ShadingParams::from_style(&TextStyle::default(), 32.0);
        assert_eq!(params.stroke_weight, 0.0);
    }

    #[test]
    fn test_stroke_weight_derived_from_fill_weight() {
        let style = TextStyle::default()
            .with_weight(0.5)
            .with_stroke(0x112233, 0.1);
        let params = ShadingParams::from_style(&style, 32.0);
        assert_relative_eq!(params.stroke_weight, 0.4);
        assert_relative_eq!(params.stroke_color[0], 0x11 as f32 / 255.0);
    }

    #[test]
    fn test_shadow_offset_is_bidirectional() {
        let style = TextStyle::default()
            .with_drop_shadow(0x000000, 0.8)
            .with_shadow_offset([0.004, -0.002]);
        let params = ShadingParams::from_style(&style, 32.0);
        assert!(params.has_shadow);
        assert_eq!(params.shadow_offset, [0.004, -0.002]);
        assert_relative_eq!(params.shadow_alpha, 0.8);
    }

    #[test]
    fn test_host_tint_and_alpha_default_to_identity() {
        let params = ShadingParams::from_style(&TextStyle::default(), 32.0);
        assert_eq!(params.tint, [1.0, 1.0, 1.0]);
        assert_eq!(params.alpha, 1.0);
        let tinted = params.with_tint([0.5, 0.5, 0.5]).with_alpha(0.25);
        assert_eq!(tinted.tint, [0.5, 0.5, 0.5]);
        assert_eq!(tinted.alpha, 0.25);
    }
}
