//! Glint demo: MSDF text layout + rendering.
//!
//! Run with a BMFont JSON descriptor to see real glyphs:
//!
//! ```text
//! cargo run -- path/to/font.json
//! ```
//!
//! Without arguments the built-in fallback face is used; it has no real
//! atlas behind it, so glyphs draw as solid cells against the placeholder
//! texture. Layout, wrapping, alignment, and the debug overlay all still
//! work.
//!
//! Controls:
//! - `D` cycles the debug overlay level and logs the rects
//! - `A` cycles the paragraph's alignment
//! - `K` toggles kerning on the kerning sample
//! - `ESC` exits

use std::sync::Arc;

use glam::{Mat4, Vec3};
use winit::{
    application::ApplicationHandler,
    event::{ElementState, KeyEvent, WindowEvent},
    event_loop::{ActiveEventLoop, ControlFlow, EventLoop},
    keyboard::{KeyCode, PhysicalKey},
    window::{Window, WindowId},
};

use glint_fonts::{FontRegistry, FALLBACK_FACE};
use glint_text::{
    Align, DebugLevel, LayoutOptions, LogSink, Text, TextOptions, TextStyle,
};
use glint_wgpu::{AtlasTexture, TextDraw, TextRenderer};

const PARAGRAPH: &str = "The quick brown fox jumps over the lazy dog, \
then wraps onto the next line whenever the greedy scan runs past the \
configured maximum width.";

struct Demo {
    texts: Vec<(Text, [f32; 2])>,
    /// Index of the wrapped paragraph (for the A keybind).
    paragraph: usize,
    /// Index of the kerning sample (for the K keybind).
    kerning_sample: usize,
    kerning_on: bool,
    debug_level: DebugLevel,
}

impl Demo {
    fn new(face: &str, registry: &FontRegistry) -> Self {
        let title = Text::new(
            "Glint MSDF text",
            TextOptions::new(face)
                .with_layout(LayoutOptions::default().with_font_size(48.0))
                .with_style(
                    TextStyle::default()
                        .with_fill_color(0xf5e0dc)
                        .with_stroke(0x11111b, 0.15),
                ),
            registry,
        )
        .expect("demo face is registered");

        let paragraph = Text::new(
            PARAGRAPH,
            TextOptions::new(face)
                .with_layout(
                    LayoutOptions::default()
                        .with_font_size(20.0)
                        .with_max_width(420.0)
                        .with_line_spacing(2.0),
                )
                .with_style(TextStyle::default().with_fill_color(0xcdd6f4)),
            registry,
        )
        .expect("demo face is registered");

        let kerning = Text::new(
            "AVAVAV WAVE",
            TextOptions::new(face)
                .with_layout(LayoutOptions::default().with_font_size(32.0))
                .with_style(TextStyle::default().with_fill_color(0xa6e3a1)),
            registry,
        )
        .expect("demo face is registered");

        let shadow = Text::new(
            "drop shadow",
            TextOptions::new(face)
                .with_layout(LayoutOptions::default().with_font_size(32.0))
                .with_style(
                    TextStyle::default()
                        .with_fill_color(0xfab387)
                        .with_drop_shadow(0x000000, 0.6)
                        .with_shadow_offset([0.004, 0.004]),
                ),
            registry,
        )
        .expect("demo face is registered");

        let escaped = Text::new(
            r"Escaped\nbreaks arrive as real ones",
            TextOptions::new(face)
                .with_layout(LayoutOptions::default().with_font_size(20.0))
                .with_style(TextStyle::default().with_fill_color(0x94e2d5)),
            registry,
        )
        .expect("demo face is registered");

        Self {
            texts: vec![
                (title, [40.0, 40.0]),
                (paragraph, [40.0, 130.0]),
                (kerning, [40.0, 320.0]),
                (shadow, [40.0, 380.0]),
                (escaped, [40.0, 440.0]),
            ],
            paragraph: 1,
            kerning_sample: 2,
            kerning_on: true,
            debug_level: DebugLevel::Off,
        }
    }

    fn cycle_alignment(&mut self) {
        let text = &mut self.texts[self.paragraph].0;
        let next = match text.layout_options().align {
            Align::Left => Align::Center,
            Align::Center => Align::Right,
            Align::Right => Align::Left,
        };
        text.set_align(next);
        log::info!("paragraph alignment: {next:?}");
    }

    fn toggle_kerning(&mut self) {
        self.kerning_on = !self.kerning_on;
        let text = &mut self.texts[self.kerning_sample].0;
        text.set_kerning(self.kerning_on);
        log::info!(
            "kerning: {} (sample width {})",
            self.kerning_on,
            text.text_width()
        );
    }

    fn cycle_debug(&mut self) {
        self.debug_level = self.debug_level.cycled();
        log::info!("debug level: {:?}", self.debug_level);
        let mut sink = LogSink;
        for (text, _) in &self.texts {
            text.emit_debug_rects(self.debug_level, &mut sink);
        }
    }
}

struct GpuState {
    surface: wgpu::Surface<'static>,
    device: wgpu::Device,
    queue: wgpu::Queue,
    config: wgpu::SurfaceConfiguration,
    renderer: TextRenderer,
}

impl GpuState {
    async fn new(window: Arc<Window>, atlas_path: Option<&std::path::Path>) -> Self {
        let size = window.inner_size();

        let instance = wgpu::Instance::new(&wgpu::InstanceDescriptor {
            backends: wgpu::Backends::all(),
            ..Default::default()
        });

        let surface = instance.create_surface(window.clone()).unwrap();

        let adapter = instance
            .request_adapter(&wgpu::RequestAdapterOptions {
                power_preference: wgpu::PowerPreference::default(),
                compatible_surface: Some(&surface),
                force_fallback_adapter: false,
            })
            .await
            .unwrap();

        let (device, queue) = adapter
            .request_device(&wgpu::DeviceDescriptor {
                label: Some("Device"),
                required_features: wgpu::Features::empty(),
                required_limits: wgpu::Limits::default(),
                memory_hints: wgpu::MemoryHints::default(),
                experimental_features: wgpu::ExperimentalFeatures::default(),
                trace: wgpu::Trace::Off,
            })
            .await
            .unwrap();

        let surface_caps = surface.get_capabilities(&adapter);
        let surface_format = surface_caps
            .formats
            .iter()
            .find(|f| f.is_srgb())
            .copied()
            .unwrap_or(surface_caps.formats[0]);

        let config = wgpu::SurfaceConfiguration {
            usage: wgpu::TextureUsages::RENDER_ATTACHMENT,
            format: surface_format,
            width: size.width,
            height: size.height,
            present_mode: wgpu::PresentMode::AutoVsync,
            alpha_mode: surface_caps.alpha_modes[0],
            view_formats: vec![],
            desired_maximum_frame_latency: 2,
        };
        surface.configure(&device, &config);

        let mut renderer = TextRenderer::new(&device, &queue, surface_format);
        let atlas = match atlas_path {
            Some(path) => AtlasTexture::from_file(&device, &queue, path),
            None => AtlasTexture::placeholder(&device, &queue),
        };
        renderer.set_atlas(&device, &atlas);

        Self {
            surface,
            device,
            queue,
            config,
            renderer,
        }
    }

    fn resize(&mut self, new_size: winit::dpi::PhysicalSize<u32>) {
        if new_size.width > 0 && new_size.height > 0 {
            self.config.width = new_size.width;
            self.config.height = new_size.height;
            self.surface.configure(&self.device, &self.config);
        }
    }

    fn render(&mut self, demo: &Demo) -> Result<(), wgpu::SurfaceError> {
        let output = self.surface.get_current_texture()?;
        let view = output
            .texture
            .create_view(&wgpu::TextureViewDescriptor::default());

        let mut encoder = self
            .device
            .create_command_encoder(&wgpu::CommandEncoderDescriptor {
                label: Some("Glint Demo Encoder"),
            });

        // Clear pass
        {
            let _pass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
                label: Some("Clear Pass"),
                color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                    view: &view,
                    resolve_target: None,
                    ops: wgpu::Operations {
                        load: wgpu::LoadOp::Clear(wgpu::Color {
                            r: 0.07,
                            g: 0.07,
                            b: 0.11,
                            a: 1.0,
                        }),
                        store: wgpu::StoreOp::Store,
                    },
                    depth_slice: None,
                })],
                depth_stencil_attachment: None,
                timestamp_writes: None,
                occlusion_query_set: None,
            });
        }

        // Screen-space projection with y growing down, matching the layout
        // engine's coordinate convention.
        let projection = Mat4::orthographic_rh(
            0.0,
            self.config.width as f32,
            self.config.height as f32,
            0.0,
            -1.0,
            1.0,
        );

        let draws: Vec<TextDraw<'_>> = demo
            .texts
            .iter()
            .map(|(text, position)| {
                TextDraw::new(
                    text,
                    projection * Mat4::from_translation(Vec3::new(position[0], position[1], 0.0)),
                )
            })
            .collect();

        self.renderer
            .render(&self.device, &self.queue, &mut encoder, &view, &draws);

        self.queue.submit(std::iter::once(encoder.finish()));
        output.present();
        Ok(())
    }
}

struct App {
    window: Option<Arc<Window>>,
    gpu_state: Option<GpuState>,
    demo: Demo,
    atlas_path: Option<std::path::PathBuf>,
}

impl ApplicationHandler for App {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.window.is_none() {
            let window_attributes = Window::default_attributes()
                .with_title("Glint - MSDF Text Demo")
                .with_inner_size(winit::dpi::LogicalSize::new(900, 600));

            let window = Arc::new(event_loop.create_window(window_attributes).unwrap());
            self.window = Some(window.clone());
            self.gpu_state = Some(pollster::block_on(GpuState::new(
                window,
                self.atlas_path.as_deref(),
            )));
        }
    }

    fn window_event(
        &mut self,
        event_loop: &ActiveEventLoop,
        _window_id: WindowId,
        event: WindowEvent,
    ) {
        match event {
            WindowEvent::CloseRequested => event_loop.exit(),

            WindowEvent::KeyboardInput {
                event:
                    KeyEvent {
                        physical_key: PhysicalKey::Code(key_code),
                        state: ElementState::Pressed,
                        ..
                    },
                ..
            } => match key_code {
                KeyCode::Escape => event_loop.exit(),
                KeyCode::KeyD => self.demo.cycle_debug(),
                KeyCode::KeyA => self.demo.cycle_alignment(),
                KeyCode::KeyK => self.demo.toggle_kerning(),
                _ => {}
            },

            WindowEvent::Resized(physical_size) => {
                if let Some(gpu_state) = &mut self.gpu_state {
                    gpu_state.resize(physical_size);
                }
            }

            WindowEvent::RedrawRequested => {
                if let Some(gpu_state) = &mut self.gpu_state {
                    match gpu_state.render(&self.demo) {
                        Ok(_) => {}
                        Err(wgpu::SurfaceError::Lost) => {
                            if let Some(window) = &self.window {
                                gpu_state.resize(window.inner_size())
                            }
                        }
                        Err(wgpu::SurfaceError::OutOfMemory) => event_loop.exit(),
                        Err(e) => log::error!("render error: {e:?}"),
                    }
                }
            }

            _ => {}
        }

        if let Some(window) = &self.window {
            window.request_redraw();
        }
    }
}

fn main() {
    env_logger::init();

    let mut registry = FontRegistry::new();
    let descriptor_path = std::env::args().nth(1).map(std::path::PathBuf::from);

    let (face, atlas_path) = match &descriptor_path {
        Some(path) => match registry.load_file(path) {
            Ok(metrics) => {
                let atlas = registry
                    .atlas_pages(&metrics.face)
                    .and_then(|pages| pages.first())
                    .cloned();
                (metrics.face.clone(), atlas)
            }
            Err(err) => {
                log::error!("failed to load {path:?}: {err}; falling back");
                registry.register_fallback();
                (FALLBACK_FACE.to_string(), None)
            }
        },
        None => {
            log::info!("no font descriptor given; using the fallback face");
            registry.register_fallback();
            (FALLBACK_FACE.to_string(), None)
        }
    };

    let demo = Demo::new(&face, &registry);

    let event_loop = EventLoop::new().unwrap();
    event_loop.set_control_flow(ControlFlow::Poll);

    let mut app = App {
        window: None,
        gpu_state: None,
        demo,
        atlas_path,
    };

    event_loop.run_app(&mut app).unwrap();
}
