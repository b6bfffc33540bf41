//! The MSDF text render pipeline.
//!
//! One renderer draws any number of text instances per frame. Vertex/index
//! data for all draws is packed into shared growable buffers; per-draw
//! shading parameters and transforms live in a dynamically-offset uniform
//! buffer, one 256-byte slot per draw.

use glam::Mat4;

use glint_text::Text;

use crate::atlas::AtlasTexture;
use crate::uniforms::TextUniforms;
use crate::vertex::TextVertex;

const INITIAL_VERTEX_CAPACITY: usize = 4096;
const INITIAL_INDEX_CAPACITY: usize = 8192;
const INITIAL_DRAW_CAPACITY: usize = 16;

/// Stride of one uniform slot. Covers the largest
/// `min_uniform_buffer_offset_alignment` wgpu allows.
const UNIFORM_STRIDE: usize = 256;

/// One text instance to draw this frame.
///
/// The transform and world alpha come from the host scene graph; the
/// layout core neither computes nor owns them.
pub struct TextDraw<'a> {
    pub text: &'a Text,
    pub transform: Mat4,
    pub world_alpha: f32,
    pub tint: [f32; 3],
}

impl<'a> TextDraw<'a> {
    pub fn new(text: &'a Text, transform: Mat4) -> Self {
        Self {
            text,
            transform,
            world_alpha: 1.0,
            tint: [1.0, 1.0, 1.0],
        }
    }

    pub fn with_world_alpha(mut self, world_alpha: f32) -> Self {
        self.world_alpha = world_alpha;
        self
    }

    pub fn with_tint(mut self, tint: [f32; 3]) -> Self {
        self.tint = tint;
        self
    }
}

/// Index range + uniform slot for one submitted draw.
#[derive(Clone, Copy, Debug)]
struct DrawRange {
    index_start: u32,
    index_end: u32,
    uniform_offset: u32,
}

/// WGPU renderer for glint text.
pub struct TextRenderer {
    pipeline: wgpu::RenderPipeline,

    uniform_buffer: wgpu::Buffer,
    uniform_capacity: usize,
    uniform_layout: wgpu::BindGroupLayout,
    uniform_bind_group: wgpu::BindGroup,

    atlas_layout: wgpu::BindGroupLayout,
    atlas_bind_group: wgpu::BindGroup,
    sampler: wgpu::Sampler,

    vertex_buffer: wgpu::Buffer,
    index_buffer: wgpu::Buffer,
    vertex_capacity: usize,
    index_capacity: usize,

    vertices: Vec<TextVertex>,
    indices: Vec<u32>,
    uniform_bytes: Vec<u8>,
    draws: Vec<DrawRange>,
}

impl TextRenderer {
    pub fn new(device: &wgpu::Device, queue: &wgpu::Queue, surface_format: wgpu::TextureFormat) -> Self {
        let shader = device.create_shader_module(wgpu::ShaderModuleDescriptor {
            label: Some("Glint MSDF Shader"),
            source: wgpu::ShaderSource::Wgsl(include_str!("shaders/msdf.wgsl").into()),
        });

        let uniform_layout = device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
            label: Some("Glint Text Uniform Bind Group Layout"),
            entries: &[wgpu::BindGroupLayoutEntry {
                binding: 0,
                visibility: wgpu::ShaderStages::VERTEX_FRAGMENT,
                ty: wgpu::BindingType::Buffer {
                    ty: wgpu::BufferBindingType::Uniform,
                    has_dynamic_offset: true,
                    min_binding_size: wgpu::BufferSize::new(
                        std::mem::size_of::<TextUniforms>() as u64
                    ),
                },
                count: None,
            }],
        });

        let atlas_layout = device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
            label: Some("Glint Atlas Bind Group Layout"),
            entries: &[
                wgpu::BindGroupLayoutEntry {
                    binding: 0,
                    visibility: wgpu::ShaderStages::FRAGMENT,
                    ty: wgpu::BindingType::Texture {
                        sample_type: wgpu::TextureSampleType::Float { filterable: true },
                        view_dimension: wgpu::TextureViewDimension::D2,
                        multisampled: false,
                    },
                    count: None,
                },
                wgpu::BindGroupLayoutEntry {
                    binding: 1,
                    visibility: wgpu::ShaderStages::FRAGMENT,
                    ty: wgpu::BindingType::Sampler(wgpu::SamplerBindingType::Filtering),
                    count: None,
                },
            ],
        });

        let pipeline_layout = device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
            label: Some("Glint Text Pipeline Layout"),
            bind_group_layouts: &[&uniform_layout, &atlas_layout],
            push_constant_ranges: &[],
        });

        let pipeline = device.create_render_pipeline(&wgpu::RenderPipelineDescriptor {
            label: Some("Glint Text Pipeline"),
            layout: Some(&pipeline_layout),
            vertex: wgpu::VertexState {
                module: &shader,
                entry_point: Some("vs_main"),
                buffers: &[TextVertex::desc()],
                compilation_options: Default::default(),
            },
            fragment: Some(wgpu::FragmentState {
                module: &shader,
                entry_point: Some("fs_main"),
                targets: &[Some(wgpu::ColorTargetState {
                    format: surface_format,
                    blend: Some(wgpu::BlendState::ALPHA_BLENDING),
                    write_mask: wgpu::ColorWrites::ALL,
                })],
                compilation_options: Default::default(),
            }),
            primitive: wgpu::PrimitiveState {
                topology: wgpu::PrimitiveTopology::TriangleList,
                strip_index_format: None,
                front_face: wgpu::FrontFace::Ccw,
                cull_mode: None,
                polygon_mode: wgpu::PolygonMode::Fill,
                unclipped_depth: false,
                conservative: false,
            },
            depth_stencil: None,
            multisample: wgpu::MultisampleState::default(),
            multiview: None,
            cache: None,
        });

        let uniform_buffer = device.create_buffer(&wgpu::BufferDescriptor {
            label: Some("Glint Text Uniform Buffer"),
            size: (INITIAL_DRAW_CAPACITY * UNIFORM_STRIDE) as u64,
            usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
            mapped_at_creation: false,
        });
        let uniform_bind_group = Self::make_uniform_bind_group(device, &uniform_layout, &uniform_buffer);

        let sampler = device.create_sampler(&wgpu::SamplerDescriptor {
            label: Some("Glint Atlas Sampler"),
            address_mode_u: wgpu::AddressMode::ClampToEdge,
            address_mode_v: wgpu::AddressMode::ClampToEdge,
            address_mode_w: wgpu::AddressMode::ClampToEdge,
            mag_filter: wgpu::FilterMode::Linear,
            min_filter: wgpu::FilterMode::Linear,
            mipmap_filter: wgpu::FilterMode::Nearest,
            ..Default::default()
        });

        // Start against the placeholder so the bind group always exists;
        // set_atlas swaps in a real page.
        let placeholder = AtlasTexture::placeholder(device, queue);
        let atlas_bind_group =
            Self::make_atlas_bind_group(device, &atlas_layout, &placeholder, &sampler);

        let vertex_buffer = device.create_buffer(&wgpu::BufferDescriptor {
            label: Some("Glint Text Vertex Buffer"),
            size: (INITIAL_VERTEX_CAPACITY * std::mem::size_of::<TextVertex>()) as u64,
            usage: wgpu::BufferUsages::VERTEX | wgpu::BufferUsages::COPY_DST,
            mapped_at_creation: false,
        });

        let index_buffer = device.create_buffer(&wgpu::BufferDescriptor {
            label: Some("Glint Text Index Buffer"),
            size: (INITIAL_INDEX_CAPACITY * std::mem::size_of::<u32>()) as u64,
            usage: wgpu::BufferUsages::INDEX | wgpu::BufferUsages::COPY_DST,
            mapped_at_creation: false,
        });

        Self {
            pipeline,
            uniform_buffer,
            uniform_capacity: INITIAL_DRAW_CAPACITY,
            uniform_layout,
            uniform_bind_group,
            atlas_layout,
            atlas_bind_group,
            sampler,
            vertex_buffer,
            index_buffer,
            vertex_capacity: INITIAL_VERTEX_CAPACITY,
            index_capacity: INITIAL_INDEX_CAPACITY,
            vertices: Vec::new(),
            indices: Vec::new(),
            uniform_bytes: Vec::new(),
            draws: Vec::new(),
        }
    }

    /// Bind a resolved atlas page for subsequent frames.
    pub fn set_atlas(&mut self, device: &wgpu::Device, atlas: &AtlasTexture) {
        if atlas.is_placeholder() {
            log::warn!("binding placeholder atlas; glyphs will draw as solid cells");
        }
        self.atlas_bind_group =
            Self::make_atlas_bind_group(device, &self.atlas_layout, atlas, &self.sampler);
    }

    /// Record and submit `draws` into one render pass over `view`.
    ///
    /// Existing contents of `view` are loaded, not cleared; text composites
    /// over whatever the host already drew.
    pub fn render(
        &mut self,
        device: &wgpu::Device,
        queue: &wgpu::Queue,
        encoder: &mut wgpu::CommandEncoder,
        view: &wgpu::TextureView,
        draws: &[TextDraw<'_>],
    ) {
        self.vertices.clear();
        self.indices.clear();
        self.uniform_bytes.clear();
        self.draws.clear();

        for draw in draws {
            let buffers = draw.text.buffers();
            if buffers.is_empty() {
                continue;
            }

            let base = self.vertices.len() as u32;
            for (pos, uv) in buffers
                .positions
                .chunks_exact(2)
                .zip(buffers.uvs.chunks_exact(2))
            {
                self.vertices
                    .push(TextVertex::new([pos[0], pos[1]], [uv[0], uv[1]]));
            }

            let index_start = self.indices.len() as u32;
            self.indices
                .extend(buffers.indices.iter().map(|index| base + index));

            let uniform_offset = self.uniform_bytes.len() as u32;
            let params = draw
                .text
                .shading_params()
                .with_tint(draw.tint)
                .with_alpha(draw.world_alpha);
            let uniforms = TextUniforms::new(&params, draw.transform);
            self.uniform_bytes
                .extend_from_slice(bytemuck::bytes_of(&uniforms));
            self.uniform_bytes
                .resize(uniform_offset as usize + UNIFORM_STRIDE, 0);

            self.draws.push(DrawRange {
                index_start,
                index_end: self.indices.len() as u32,
                uniform_offset,
            });
        }

        if self.draws.is_empty() {
            return;
        }

        self.grow_buffers(device);
        queue.write_buffer(&self.vertex_buffer, 0, bytemuck::cast_slice(&self.vertices));
        queue.write_buffer(&self.index_buffer, 0, bytemuck::cast_slice(&self.indices));
        queue.write_buffer(&self.uniform_buffer, 0, &self.uniform_bytes);

        let mut pass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
            label: Some("Glint Text Pass"),
            color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                view,
                resolve_target: None,
                ops: wgpu::Operations {
                    load: wgpu::LoadOp::Load,
                    store: wgpu::StoreOp::Store,
                },
                depth_slice: None,
            })],
            depth_stencil_attachment: None,
            timestamp_writes: None,
            occlusion_query_set: None,
        });

        pass.set_pipeline(&self.pipeline);
        pass.set_vertex_buffer(0, self.vertex_buffer.slice(..));
        pass.set_index_buffer(self.index_buffer.slice(..), wgpu::IndexFormat::Uint32);
        pass.set_bind_group(1, &self.atlas_bind_group, &[]);
        for draw in &self.draws {
            pass.set_bind_group(0, &self.uniform_bind_group, &[draw.uniform_offset]);
            pass.draw_indexed(draw.index_start..draw.index_end, 0, 0..1);
        }
    }

    fn grow_buffers(&mut self, device: &wgpu::Device) {
        if self.vertices.len() > self.vertex_capacity {
            self.vertex_capacity = (self.vertices.len() * 2).next_power_of_two();
            self.vertex_buffer = device.create_buffer(&wgpu::BufferDescriptor {
                label: Some("Glint Text Vertex Buffer"),
                size: (self.vertex_capacity * std::mem::size_of::<TextVertex>()) as u64,
                usage: wgpu::BufferUsages::VERTEX | wgpu::BufferUsages::COPY_DST,
                mapped_at_creation: false,
            });
        }

        if self.indices.len() > self.index_capacity {
            self.index_capacity = (self.indices.len() * 2).next_power_of_two();
            self.index_buffer = device.create_buffer(&wgpu::BufferDescriptor {
                label: Some("Glint Text Index Buffer"),
                size: (self.index_capacity * std::mem::size_of::<u32>()) as u64,
                usage: wgpu::BufferUsages::INDEX | wgpu::BufferUsages::COPY_DST,
                mapped_at_creation: false,
            });
        }

        let draw_count = self.uniform_bytes.len() / UNIFORM_STRIDE;
        if draw_count > self.uniform_capacity {
            self.uniform_capacity = (draw_count * 2).next_power_of_two();
            self.uniform_buffer = device.create_buffer(&wgpu::BufferDescriptor {
                label: Some("Glint Text Uniform Buffer"),
                size: (self.uniform_capacity * UNIFORM_STRIDE) as u64,
                usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
                mapped_at_creation: false,
            });
            self.uniform_bind_group =
                Self::make_uniform_bind_group(device, &self.uniform_layout, &self.uniform_buffer);
        }
    }

    fn make_uniform_bind_group(
        device: &wgpu::Device,
        layout: &wgpu::BindGroupLayout,
        buffer: &wgpu::Buffer,
    ) -> wgpu::BindGroup {
        device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some("Glint Text Uniform Bind Group"),
            layout,
            entries: &[wgpu::BindGroupEntry {
                binding: 0,
                resource: wgpu::BindingResource::Buffer(wgpu::BufferBinding {
                    buffer,
                    offset: 0,
                    size: wgpu::BufferSize::new(std::mem::size_of::<TextUniforms>() as u64),
                }),
            }],
        })
    }

    fn make_atlas_bind_group(
        device: &wgpu::Device,
        layout: &wgpu::BindGroupLayout,
        atlas: &AtlasTexture,
        sampler: &wgpu::Sampler,
    ) -> wgpu::BindGroup {
        device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some("Glint Atlas Bind Group"),
            layout,
            entries: &[
                wgpu::BindGroupEntry {
                    binding: 0,
                    resource: wgpu::BindingResource::TextureView(&atlas.view),
                },
                wgpu::BindGroupEntry {
                    binding: 1,
                    resource: wgpu::BindingResource::Sampler(sampler),
                },
            ],
        })
    }
}
