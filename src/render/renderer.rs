//! Marker renderer using wgpu.
//!
//! Paints one frame from a list of draw commands: clears the surface, builds
//! a vertex buffer from the tessellated markers, and issues a single
//! vertex-colored triangle-list render pass.
//!
//! # Architecture
//!
//! The renderer does NOT own the event loop -- the frame driver's windowed
//! runner drives it. Each frame:
//!
//! 1. The driver advances the simulation and extracts
//!    [`DrawCommand`](crate::scene::DrawCommand)s (pure, headless-testable).
//! 2. [`FrameRenderer::render`] tessellates the commands, colors them by
//!    marker kind, and presents a frame.
//!
//! # Color Mapping
//!
//! | Marker | Entity | Color |
//! |--------|--------|-------|
//! | Directional (triangle) | Animal | White (#FFFFFF) |
//! | Point (circle) | Food | Green (#00FF80) |

use std::sync::Arc;

use wgpu::util::DeviceExt;

use crate::scene::{DrawCommand, POINT_MARKER_SEGMENTS};

// ---------------------------------------------------------------------------
// Vertex
// ---------------------------------------------------------------------------

/// A single vertex with 2D pixel position and RGBA color, sent to the GPU.
#[repr(C)]
#[derive(Copy, Clone, Debug, bytemuck_derive::Pod, bytemuck_derive::Zeroable)]
struct Vertex {
    position: [f32; 2],
    color: [f32; 4],
}

impl Vertex {
    /// Vertex buffer layout for the shader.
    fn desc() -> wgpu::VertexBufferLayout<'static> {
        wgpu::VertexBufferLayout {
            array_stride: std::mem::size_of::<Vertex>() as wgpu::BufferAddress,
            step_mode: wgpu::VertexStepMode::Vertex,
            attributes: &[
                wgpu::VertexAttribute {
                    offset: 0,
                    shader_location: 0,
                    format: wgpu::VertexFormat::Float32x2,
                },
                wgpu::VertexAttribute {
                    offset: std::mem::size_of::<[f32; 2]>() as wgpu::BufferAddress,
                    shader_location: 1,
                    format: wgpu::VertexFormat::Float32x4,
                },
            ],
        }
    }
}

// ---------------------------------------------------------------------------
// PixelCamera
// ---------------------------------------------------------------------------

/// Fixed orthographic mapping from surface pixels to clip space.
///
/// Covers the rectangle `[0, width] x [0, height]` with the Y axis pointing
/// *down*, matching the pixel coordinates the coordinate mapper produces:
/// pixel `(0, 0)` is the top-left corner of the surface.
#[derive(Debug, Clone, Copy)]
pub struct PixelCamera {
    /// Surface width in pixels.
    pub width: f32,
    /// Surface height in pixels.
    pub height: f32,
}

impl PixelCamera {
    /// Produce a column-major 4x4 projection matrix.
    ///
    /// Maps `[0, width] -> [-1, 1]` on X and `[0, height] -> [1, -1]` on Y
    /// (top of the surface at clip +1). Z is unused (2D).
    pub fn projection_matrix(&self) -> [f32; 16] {
        let sx = 2.0 / self.width;
        let sy = -2.0 / self.height;

        // Column-major layout:
        // col0      col1      col2     col3
        [
            sx, 0.0, 0.0, 0.0, // column 0
            0.0, sy, 0.0, 0.0, // column 1
            0.0, 0.0, 1.0, 0.0, // column 2
            -1.0, 1.0, 0.0, 1.0, // column 3
        ]
    }

    /// Map a pixel position to clip space (used by tests; the GPU applies
    /// the same matrix in the vertex shader).
    pub fn to_clip(&self, x: f32, y: f32) -> [f32; 2] {
        [2.0 * x / self.width - 1.0, 1.0 - 2.0 * y / self.height]
    }
}

// ---------------------------------------------------------------------------
// Colors and buffer sizing
// ---------------------------------------------------------------------------

/// White fill for directional (animal) markers: #FFFFFF.
const COLOR_DIRECTIONAL: [f32; 4] = [1.0, 1.0, 1.0, 1.0];

/// Green fill for point (food) markers: #00FF80.
const COLOR_POINT: [f32; 4] = [0.0, 1.0, 0.502, 1.0];

/// The surface clears to black before each frame.
const CLEAR_COLOR: wgpu::Color = wgpu::Color {
    r: 0.0,
    g: 0.0,
    b: 0.0,
    a: 1.0,
};

/// Maximum number of markers per frame (determines vertex buffer size).
/// A point marker is the worst case at `3 * POINT_MARKER_SEGMENTS` vertices.
const MAX_MARKERS: usize = 2048;
const MAX_VERTICES: usize = MAX_MARKERS * 3 * POINT_MARKER_SEGMENTS;

/// Fill color for a draw command, keyed off the marker kind.
fn color_for_command(command: &DrawCommand) -> [f32; 4] {
    match command {
        DrawCommand::DirectionalMarker { .. } => COLOR_DIRECTIONAL,
        DrawCommand::PointMarker { .. } => COLOR_POINT,
    }
}

/// Tessellate draw commands into colored vertices (CPU side, no GPU types).
fn build_vertices(commands: &[DrawCommand]) -> Vec<Vertex> {
    let mut positions = Vec::new();
    let mut vertices = Vec::with_capacity(commands.iter().map(DrawCommand::vertex_count).sum());

    for command in commands.iter().take(MAX_MARKERS) {
        let color = color_for_command(command);
        positions.clear();
        command.tessellate(&mut positions);
        vertices.extend(positions.iter().map(|&position| Vertex { position, color }));
    }

    vertices
}

// ---------------------------------------------------------------------------
// FrameRenderer
// ---------------------------------------------------------------------------

/// Marker renderer bound to one window surface.
///
/// Call [`FrameRenderer::new`] with an `Arc<winit::window::Window>`; this
/// performs async wgpu adapter/device selection, surface creation, and
/// pipeline setup. The camera is fixed at construction to the window's
/// startup pixel size (the window is created non-resizable).
pub struct FrameRenderer {
    surface: wgpu::Surface<'static>,
    device: wgpu::Device,
    queue: wgpu::Queue,
    config: wgpu::SurfaceConfiguration,
    render_pipeline: wgpu::RenderPipeline,
    vertex_buffer: wgpu::Buffer,
    camera_buffer: wgpu::Buffer,
    camera_bind_group: wgpu::BindGroup,
    window: Arc<winit::window::Window>,
    /// The fixed pixel-space camera.
    pub camera: PixelCamera,
}

impl FrameRenderer {
    /// Initialize wgpu: surface, device, queue, pipeline.
    ///
    /// # Errors
    ///
    /// Returns an error if no suitable GPU adapter or device is available.
    pub async fn new(window: Arc<winit::window::Window>) -> Result<Self, anyhow::Error> {
        let size = window.inner_size();
        let width = size.width.max(1);
        let height = size.height.max(1);

        let instance = wgpu::Instance::new(wgpu::InstanceDescriptor {
            backends: wgpu::Backends::all(),
            ..Default::default()
        });

        let surface = instance.create_surface(window.clone())?;

        let adapter = instance
            .request_adapter(&wgpu::RequestAdapterOptions {
                power_preference: wgpu::PowerPreference::LowPower,
                compatible_surface: Some(&surface),
                force_fallback_adapter: false,
            })
            .await
            .ok_or_else(|| anyhow::anyhow!("no suitable GPU adapter found"))?;

        let (device, queue) = adapter
            .request_device(
                &wgpu::DeviceDescriptor {
                    label: Some("flockview_renderer"),
                    required_features: wgpu::Features::empty(),
                    required_limits: wgpu::Limits::default(),
                    memory_hints: wgpu::MemoryHints::default(),
                },
                None,
            )
            .await?;

        let surface_caps = surface.get_capabilities(&adapter);
        let surface_format = surface_caps
            .formats
            .iter()
            .find(|f| f.is_srgb())
            .copied()
            .unwrap_or(surface_caps.formats[0]);

        // AutoVsync ties presentation to the display refresh; requesting a
        // redraw after each presented frame gives the cooperative
        // once-per-refresh cadence the driver expects.
        let config = wgpu::SurfaceConfiguration {
            usage: wgpu::TextureUsages::RENDER_ATTACHMENT,
            format: surface_format,
            width,
            height,
            present_mode: wgpu::PresentMode::AutoVsync,
            alpha_mode: surface_caps.alpha_modes[0],
            view_formats: vec![],
            desired_maximum_frame_latency: 2,
        };
        surface.configure(&device, &config);

        let shader_source = include_str!("shaders.wgsl");
        let shader = device.create_shader_module(wgpu::ShaderModuleDescriptor {
            label: Some("marker_shader"),
            source: wgpu::ShaderSource::Wgsl(shader_source.into()),
        });

        let camera = PixelCamera {
            width: width as f32,
            height: height as f32,
        };
        let camera_matrix = camera.projection_matrix();
        let camera_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("camera_uniform"),
            contents: bytemuck::cast_slice(&camera_matrix),
            usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
        });

        let camera_bind_group_layout =
            device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
                label: Some("camera_bind_group_layout"),
                entries: &[wgpu::BindGroupLayoutEntry {
                    binding: 0,
                    visibility: wgpu::ShaderStages::VERTEX,
                    ty: wgpu::BindingType::Buffer {
                        ty: wgpu::BufferBindingType::Uniform,
                        has_dynamic_offset: false,
                        min_binding_size: None,
                    },
                    count: None,
                }],
            });

        let camera_bind_group = device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some("camera_bind_group"),
            layout: &camera_bind_group_layout,
            entries: &[wgpu::BindGroupEntry {
                binding: 0,
                resource: camera_buffer.as_entire_binding(),
            }],
        });

        let pipeline_layout = device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
            label: Some("marker_pipeline_layout"),
            bind_group_layouts: &[&camera_bind_group_layout],
            push_constant_ranges: &[],
        });

        let render_pipeline = device.create_render_pipeline(&wgpu::RenderPipelineDescriptor {
            label: Some("marker_pipeline"),
            layout: Some(&pipeline_layout),
            vertex: wgpu::VertexState {
                module: &shader,
                entry_point: Some("vs_main"),
                buffers: &[Vertex::desc()],
                compilation_options: wgpu::PipelineCompilationOptions::default(),
            },
            fragment: Some(wgpu::FragmentState {
                module: &shader,
                entry_point: Some("fs_main"),
                targets: &[Some(wgpu::ColorTargetState {
                    format: config.format,
                    blend: Some(wgpu::BlendState::REPLACE),
                    write_mask: wgpu::ColorWrites::ALL,
                })],
                compilation_options: wgpu::PipelineCompilationOptions::default(),
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
            multisample: wgpu::MultisampleState {
                count: 1,
                mask: !0,
                alpha_to_coverage_enabled: false,
            },
            multiview: None,
            cache: None,
        });

        // Pre-allocate the vertex buffer for the worst-case frame.
        let vertex_buffer = device.create_buffer(&wgpu::BufferDescriptor {
            label: Some("marker_vertex_buffer"),
            size: (MAX_VERTICES * std::mem::size_of::<Vertex>()) as wgpu::BufferAddress,
            usage: wgpu::BufferUsages::VERTEX | wgpu::BufferUsages::COPY_DST,
            mapped_at_creation: false,
        });

        Ok(Self {
            surface,
            device,
            queue,
            config,
            render_pipeline,
            vertex_buffer,
            camera_buffer,
            camera_bind_group,
            window,
            camera,
        })
    }

    /// Render one frame from draw commands.
    ///
    /// Clears the surface, uploads the tessellated vertices, draws, and
    /// presents.
    ///
    /// # Errors
    ///
    /// Returns a [`wgpu::SurfaceError`] if the surface cannot provide an
    /// output texture (e.g., window minimized, surface lost).
    pub fn render(&mut self, commands: &[DrawCommand]) -> Result<(), wgpu::SurfaceError> {
        let camera_matrix = self.camera.projection_matrix();
        self.queue
            .write_buffer(&self.camera_buffer, 0, bytemuck::cast_slice(&camera_matrix));

        let vertices = build_vertices(commands);
        if !vertices.is_empty() {
            self.queue
                .write_buffer(&self.vertex_buffer, 0, bytemuck::cast_slice(&vertices));
        }

        let output = self.surface.get_current_texture()?;
        let view = output
            .texture
            .create_view(&wgpu::TextureViewDescriptor::default());

        let mut encoder = self
            .device
            .create_command_encoder(&wgpu::CommandEncoderDescriptor {
                label: Some("marker_encoder"),
            });

        {
            let mut render_pass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
                label: Some("marker_pass"),
                color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                    view: &view,
                    resolve_target: None,
                    ops: wgpu::Operations {
                        load: wgpu::LoadOp::Clear(CLEAR_COLOR),
                        store: wgpu::StoreOp::Store,
                    },
                })],
                depth_stencil_attachment: None,
                timestamp_writes: None,
                occlusion_query_set: None,
            });

            render_pass.set_pipeline(&self.render_pipeline);
            render_pass.set_bind_group(0, &self.camera_bind_group, &[]);
            render_pass.set_vertex_buffer(0, self.vertex_buffer.slice(..));

            let vertex_count = vertices.len() as u32;
            if vertex_count > 0 {
                render_pass.draw(0..vertex_count, 0..1);
            }
        }

        self.queue.submit(std::iter::once(encoder.finish()));
        output.present();

        Ok(())
    }

    /// Reconfigure the surface after a loss or compositor-driven resize.
    ///
    /// The pixel camera keeps its startup dimensions; the window is created
    /// non-resizable, so this only matters for surface recovery.
    pub fn resize(&mut self, new_size: winit::dpi::PhysicalSize<u32>) {
        if new_size.width > 0 && new_size.height > 0 {
            self.config.width = new_size.width;
            self.config.height = new_size.height;
            self.surface.configure(&self.device, &self.config);
        }
    }

    /// Get a reference to the window.
    pub fn window(&self) -> &winit::window::Window {
        &self.window
    }
}

// ---------------------------------------------------------------------------
// Tests (CPU-side only; no GPU required)
// ---------------------------------------------------------------------------
