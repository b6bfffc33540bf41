//! Atlas texture resolution.
//!
//! MSDF atlas pages arrive as PNG files referenced by the font descriptor.
//! Any failure along the way (missing file, decode error) degrades to a
//! 1x1 placeholder texture with a logged warning; text keeps laying out and
//! drawing, just without real glyph shapes.

use std::path::Path;

/// An atlas page uploaded to the GPU.
pub struct AtlasTexture {
    pub texture: wgpu::Texture,
    pub view: wgpu::TextureView,
    /// Page dimensions in pixels. `[1, 1]` for the placeholder.
    pub size: [f32; 2],
    placeholder: bool,
}

impl AtlasTexture {
    /// Whether this is the degraded placeholder rather than a real page.
    pub fn is_placeholder(&self) -> bool {
        self.placeholder
    }

    /// Decode a PNG atlas page and upload it.
    pub fn from_png_bytes(device: &wgpu::Device, queue: &wgpu::Queue, bytes: &[u8]) -> Self {
        match image::load_from_memory(bytes) {
            Ok(decoded) => {
                let rgba = decoded.to_rgba8();
                let (width, height) = rgba.dimensions();
                Self::upload(device, queue, width, height, &rgba, false)
            }
            Err(err) => {
                log::warn!("failed to decode atlas page: {err}; using placeholder");
                Self::placeholder(device, queue)
            }
        }
    }

    /// Read and decode an atlas page from disk.
    pub fn from_file(device: &wgpu::Device, queue: &wgpu::Queue, path: impl AsRef<Path>) -> Self {
        let path = path.as_ref();
        match std::fs::read(path) {
            Ok(bytes) => Self::from_png_bytes(device, queue, &bytes),
            Err(err) => {
                log::warn!("failed to read atlas page {path:?}: {err}; using placeholder");
                Self::placeholder(device, queue)
            }
        }
    }

    /// The 1x1 opaque-white degradation target.
    pub fn placeholder(device: &wgpu::Device, queue: &wgpu::Queue) -> Self {
        Self::upload(device, queue, 1, 1, &[0xff; 4], true)
    }

    fn upload(
        device: &wgpu::Device,
        queue: &wgpu::Queue,
        width: u32,
        height: u32,
        rgba: &[u8],
        placeholder: bool,
    ) -> Self {
        let texture = device.create_texture(&wgpu::TextureDescriptor {
            label: Some("Glint Atlas Texture"),
            size: wgpu::Extent3d {
                width,
                height,
                depth_or_array_layers: 1,
            },
            mip_level_count: 1,
            sample_count: 1,
            dimension: wgpu::TextureDimension::D2,
            format: wgpu::TextureFormat::Rgba8Unorm,
            usage: wgpu::TextureUsages::TEXTURE_BINDING | wgpu::TextureUsages::COPY_DST,
            view_formats: &[],
        });

        queue.write_texture(
            wgpu::TexelCopyTextureInfo {
                texture: &texture,
                mip_level: 0,
                origin: wgpu::Origin3d::ZERO,
                aspect: wgpu::TextureAspect::All,
            },
            rgba,
            wgpu::TexelCopyBufferLayout {
                offset: 0,
                bytes_per_row: Some(width * 4),
                rows_per_image: Some(height),
            },
            wgpu::Extent3d {
                width,
                height,
                depth_or_array_layers: 1,
            },
        );

        let view = texture.create_view(&wgpu::TextureViewDescriptor::default());

        Self {
            texture,
            view,
            size: [width as f32, height as f32],
            placeholder,
        }
    }
}
