//! The public text component.
//!
//! A `Text` owns its layout result and quad buffers exclusively and
//! recomputes both, synchronously, on every mutation. There is no partial
//! or deferred re-layout; each setter returns with the buffers already
//! rebuilt. Font metrics are resolved once at construction and shared
//! read-only with every other instance using the same face.

use std::sync::Arc;

use crate::debug::{emit_debug_rects, DebugLevel, DebugSink};
use crate::error::TextError;
use crate::font::{FontMetrics, FontProvider};
use crate::layout::{layout, normalize_escapes, Align, LayoutOptions, LayoutResult};
use crate::primitives::Rect;
use crate::quad::QuadBuffers;
use crate::style::{ShadingParams, TextStyle};

/// Everything needed to construct a [`Text`] besides the string itself.
#[derive(Clone, Debug)]
pub struct TextOptions {
    pub face: String,
    pub layout: LayoutOptions,
    pub style: TextStyle,
}

impl TextOptions {
    pub fn new(face: impl Into<String>) -> Self {
        Self {
            face: face.into(),
            layout: LayoutOptions::default(),
            style: TextStyle::default(),
        }
    }

    pub fn with_layout(mut self, layout: LayoutOptions) -> Self {
        self.layout = layout;
        self
    }

    pub fn with_style(mut self, style: TextStyle) -> Self {
        self.style = style;
        self
    }
}

/// A styled multi-line text instance with renderer-ready buffers.
#[derive(Clone, Debug)]
pub struct Text {
    text: String,
    options: TextOptions,
    font: Arc<FontMetrics>,
    result: LayoutResult,
    buffers: QuadBuffers,
}

impl Text {
    /// Construct and lay out a text instance.
    ///
    /// Fails with [`TextError::InvalidFontFace`] when `options.face` is not
    /// known to `fonts`; nothing is laid out or built in that case.
    pub fn new(
        text: impl Into<String>,
        options: TextOptions,
        fonts: &impl FontProvider,
    ) -> Result<Self, TextError> {
        let font = fonts
            .font(&options.face)
            .ok_or_else(|| TextError::InvalidFontFace(options.face.clone()))?;

        let mut this = Self {
            text: normalize_escapes(&text.into()),
            options,
            font,
            result: LayoutResult::default(),
            buffers: QuadBuffers::new(),
        };
        this.update();
        Ok(this)
    }

    /// Full re-layout + re-build. Every mutation funnels through here.
    fn update(&mut self) {
        self.result = layout(&self.text, &self.font, &self.options.layout);
        let [atlas_width, atlas_height] = self.font.atlas_size;
        self.buffers
            .rebuild(&self.result.glyphs, atlas_width, atlas_height);
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    /// Replace the text content. Literal `\n`/`\r` escapes are normalized
    /// to real breaks before layout.
    pub fn set_text(&mut self, value: impl Into<String>) {
        self.text = normalize_escapes(&value.into());
        self.update();
    }

    /// Widest line, pre-alignment.
    pub fn text_width(&self) -> f32 {
        self.result.text_width
    }

    pub fn text_height(&self) -> f32 {
        self.result.text_height
    }

    pub fn max_width(&self) -> f32 {
        self.options.layout.max_width
    }

    pub fn bounds(&self) -> Rect {
        self.result.bounds
    }

    pub fn result(&self) -> &LayoutResult {
        &self.result
    }

    pub fn buffers(&self) -> &QuadBuffers {
        &self.buffers
    }

    pub fn font(&self) -> &Arc<FontMetrics> {
        &self.font
    }

    pub fn style(&self) -> &TextStyle {
        &self.options.style
    }

    pub fn layout_options(&self) -> &LayoutOptions {
        &self.options.layout
    }

    /// Shading bundle for the current style at the current font size.
    pub fn shading_params(&self) -> ShadingParams {
        ShadingParams::from_style(&self.options.style, self.options.layout.font_size)
    }

    pub fn set_align(&mut self, align: Align) {
        self.options.layout.align = align;
        self.update();
    }

    pub fn set_max_width(&mut self, max_width: f32) {
        self.options.layout.max_width = max_width;
        self.update();
    }

    pub fn set_font_size(&mut self, font_size: f32) {
        self.options.layout.font_size = font_size;
        self.update();
    }

    pub fn set_letter_spacing(&mut self, letter_spacing: f32) {
        self.options.layout.letter_spacing = letter_spacing;
        self.update();
    }

    pub fn set_line_spacing(&mut self, line_spacing: f32) {
        self.options.layout.line_spacing = line_spacing;
        self.update();
    }

    pub fn set_kerning(&mut self, kerning: bool) {
        self.options.layout.kerning = kerning;
        self.update();
    }

    pub fn set_baseline_offset(&mut self, baseline_offset: f32) {
        self.options.layout.baseline_offset = baseline_offset;
        self.update();
    }

    /// Style changes don't move glyphs, so only the shading bundle is
    /// affected; buffers stay as they are.
    pub fn set_style(&mut self, style: TextStyle) {
        self.options.style = style;
    }

    /// Describe this text's bounding boxes to a debug sink.
    pub fn emit_debug_rects(&self, level: DebugLevel, sink: &mut dyn DebugSink) {
        emit_debug_rects(&self.result, &self.font, &self.options.layout, level, sink);
    }
}
