use bytemuck::{Pod, Zeroable};
use glam::Mat4;

use glint_text::ShadingParams;

/// Uniform block for one text draw.
///
/// Layout matches `TextParams` in `shaders/msdf.wgsl`; distance cutoffs ride
/// in the color alphas to keep the block compact:
/// - `fill_color.w` = fill distance cutoff
/// - `stroke_color.w` = stroke distance cutoff (0 disables the stroke)
/// - `shadow_color.w` = shadow alpha
/// - `tint.w` = world alpha
#[repr(C)]
#[derive(Copy, Clone, Debug, Pod, Zeroable)]
pub struct TextUniforms {
    /// Projection * world transform, supplied by the host scene graph.
    pub transform: [[f32; 4]; 4],
    pub fill_color: [f32; 4],
    pub stroke_color: [f32; 4],
    pub shadow_color: [f32; 4],
    pub tint: [f32; 4],
    pub shadow_offset: [f32; 2],
    pub shadow_smoothing: f32,
    pub px_range: f32,
    pub font_size: f32,
    pub has_shadow: u32,
    pub _pad: [f32; 2],
}

impl TextUniforms {
    pub fn new(params: &ShadingParams, transform: Mat4) -> Self {
        Self {
            transform: transform.to_cols_array_2d(),
            fill_color: [
                params.color[0],
                params.color[1],
                params.color[2],
                params.fill_weight,
            ],
            stroke_color: [
                params.stroke_color[0],
                params.stroke_color[1],
                params.stroke_color[2],
                params.stroke_weight,
            ],
            shadow_color: [
                params.shadow_color[0],
                params.shadow_color[1],
                params.shadow_color[2],
                params.shadow_alpha,
            ],
            tint: [params.tint[0], params.tint[1], params.tint[2], params.alpha],
            shadow_offset: params.shadow_offset,
            shadow_smoothing: params.shadow_smoothing,
            px_range: params.px_range,
            font_size: params.font_size,
            has_shadow: params.has_shadow as u32,
            _pad: [0.0; 2],
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use glint_text::TextStyle;

    #[test]
    fn test_block_size_is_uniform_aligned() {
        // Must match the WGSL struct exactly.
        assert_eq!(std::mem::size_of::<TextUniforms>(), 160);
        assert_eq!(std::mem::size_of::<TextUniforms>() % 16, 0);
    }

    #[test]
    fn test_cutoffs_ride_in_alpha_channels() {
        let style = TextStyle::default()
            .with_weight(0.6)
            .with_stroke(0x000000, 0.1);
        let params = ShadingParams::from_style(&style, 24.0);
        let uniforms = TextUniforms::new(&params, Mat4::IDENTITY);
        assert!((uniforms.fill_color[3] - 0.4).abs() < 1e-6);
        assert!((uniforms.stroke_color[3] - 0.3).abs() < 1e-6);
        assert_eq!(uniforms.has_shadow, 0);
        assert_eq!(uniforms.font_size, 24.0);
    }
}
