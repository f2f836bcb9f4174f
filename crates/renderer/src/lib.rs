//! Renderer: wgpu init + depth + filled mesh with a black outline pass.
//! wgpu = 26.x, winit = 0.30.x

use std::num::NonZeroU64;
use std::sync::Arc;

use anyhow::{Context, Result};
use asset::Mesh;
use glam::Mat4;
use wgpu::{
    util::DeviceExt,
    BindGroup, BindGroupLayout, BindGroupLayoutDescriptor, BindGroupLayoutEntry, BindingType,
    Backends, BlendState, Buffer, BufferBindingType, BufferUsages, ColorTargetState, ColorWrites,
    CommandEncoderDescriptor, CompareFunction, DepthBiasState, DepthStencilState, Device,
    DeviceDescriptor, Extent3d, Features, FragmentState, IndexFormat, Instance,
    InstanceDescriptor, Limits, LoadOp, Operations, PipelineLayout, PipelineLayoutDescriptor,
    PowerPreference, PresentMode, PrimitiveState, PrimitiveTopology, Queue,
    RenderPassColorAttachment, RenderPassDescriptor, RenderPipeline, RenderPipelineDescriptor,
    ShaderModule, ShaderModuleDescriptor, ShaderSource, ShaderStages, StoreOp, Surface,
    SurfaceConfiguration, SurfaceError, TextureDescriptor, TextureDimension, TextureFormat,
    TextureUsages, TextureView, TextureViewDescriptor, VertexState,
};
use winit::{dpi::PhysicalSize, window::Window};

pub mod uniform;

pub use uniform::FrameUniforms;
use uniform::POSITION_LAYOUT;

const DEPTH_FORMAT: TextureFormat = TextureFormat::Depth32Float;

const CLEAR_COLOR: wgpu::Color = wgpu::Color {
    r: 0.2,
    g: 0.2,
    b: 0.2,
    a: 1.0,
};

/// Pushes filled triangles slightly back so coplanar outlines pass the depth test.
const FILL_DEPTH_BIAS: DepthBiasState = DepthBiasState {
    constant: 2,
    slope_scale: 1.0,
    clamp: 0.0,
};

/// Mesh buffers uploaded verbatim from the loader.
struct MeshBuffers {
    vertex_buf: Buffer,
    triangle_buf: Buffer,
    triangle_count: u32,
    edge_buf: Buffer,
    edge_count: u32,
}

impl MeshBuffers {
    fn upload(device: &Device, mesh: &Mesh) -> Self {
        let vertex_buf = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("Mesh VB"),
            contents: bytemuck::cast_slice(&mesh.vertices),
            usage: BufferUsages::VERTEX,
        });
        let triangle_buf = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("Mesh Triangle IB"),
            contents: bytemuck::cast_slice(&mesh.triangle_indices),
            usage: BufferUsages::INDEX,
        });
        let edge_buf = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("Mesh Edge IB"),
            contents: bytemuck::cast_slice(&mesh.edge_indices),
            usage: BufferUsages::INDEX,
        });

        Self {
            vertex_buf,
            triangle_buf,
            triangle_count: mesh.triangle_indices.len() as u32,
            edge_buf,
            edge_count: mesh.edge_indices.len() as u32,
        }
    }
}

pub struct GpuState {
    // Surface
    surface: Surface<'static>,
    surface_config: SurfaceConfiguration,

    // Device/queue
    device: Device,
    queue: Queue,

    // Pipelines & geometry
    fill_pipeline: RenderPipeline,
    outline_pipeline: RenderPipeline,
    mesh: MeshBuffers,
    color: [f32; 3],

    // Uniforms
    #[allow(dead_code)]
    uniform_bgl: BindGroupLayout,
    uniform_bg: BindGroup,
    uniform_buf: Buffer,

    // Depth
    depth_view: TextureView,

    // Size cache
    width: u32,
    height: u32,
}

impl GpuState {
    /// Create GPU state bound to an Arc<Window> and upload `mesh`.
    pub async fn new(window: Arc<Window>, backends: Backends, mesh: &Mesh) -> Result<Self> {
        let PhysicalSize { width, height } = window.inner_size();
        let width = width.max(1);
        let height = height.max(1);

        // Instance & surface
        let instance = Instance::new(&InstanceDescriptor {
            backends,
            ..Default::default()
        });
        let surface: Surface<'static> = instance
            .create_surface(window.clone())
            .context("create_surface failed")?;

        let adapter = instance
            .request_adapter(&wgpu::RequestAdapterOptions {
                power_preference: PowerPreference::HighPerformance,
                compatible_surface: Some(&surface),
                force_fallback_adapter: false,
            })
            .await
            .context("No suitable GPU adapter")?;
        log::info!("Using adapter: {:?}", adapter.get_info());

        let (device, queue) = adapter
            .request_device(&DeviceDescriptor {
                label: Some("Prism Device"),
                required_features: Features::empty(),
                required_limits: Limits::downlevel_webgl2_defaults()
                    .using_resolution(adapter.limits()),
                ..Default::default()
            })
            .await
            .context("request_device failed")?;

        // Surface format (prefer sRGB)
        let caps = surface.get_capabilities(&adapter);
        let surface_format = caps
            .formats
            .iter()
            .copied()
            .find(|f| f.is_srgb())
            .or_else(|| caps.formats.first().copied())
            .context("Surface reports no supported formats")?;
        let alpha_mode = caps
            .alpha_modes
            .first()
            .copied()
            .unwrap_or(wgpu::CompositeAlphaMode::Auto);

        let surface_config = SurfaceConfiguration {
            usage: TextureUsages::RENDER_ATTACHMENT,
            format: surface_format,
            width,
            height,
            present_mode: PresentMode::AutoVsync,
            alpha_mode,
            view_formats: vec![],
            desired_maximum_frame_latency: 2,
        };
        surface.configure(&device, &surface_config);

        let depth_view = create_depth_view(&device, &surface_config);

        // ==== Shaders ====
        let shader = device.create_shader_module(ShaderModuleDescriptor {
            label: Some("Mesh WGSL"),
            source: ShaderSource::Wgsl(include_str!("shaders/mesh.wgsl").into()),
        });

        // ==== Uniform BGL/BG ====
        let uniform_bgl = device.create_bind_group_layout(&BindGroupLayoutDescriptor {
            label: Some("Frame BGL"),
            entries: &[BindGroupLayoutEntry {
                binding: 0,
                visibility: ShaderStages::VERTEX | ShaderStages::FRAGMENT,
                ty: BindingType::Buffer {
                    ty: BufferBindingType::Uniform,
                    has_dynamic_offset: false,
                    min_binding_size: NonZeroU64::new(
                        std::mem::size_of::<FrameUniforms>() as u64,
                    ),
                },
                count: None,
            }],
        });

        let uniform_init = FrameUniforms::new(Mat4::IDENTITY, mesh.color);
        let uniform_buf = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("Frame UBO"),
            contents: bytemuck::bytes_of(&uniform_init),
            usage: BufferUsages::UNIFORM | BufferUsages::COPY_DST,
        });
        let uniform_bg = device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some("Frame BG"),
            layout: &uniform_bgl,
            entries: &[wgpu::BindGroupEntry {
                binding: 0,
                resource: uniform_buf.as_entire_binding(),
            }],
        });

        // ==== Pipelines ====
        let pipeline_layout = device.create_pipeline_layout(&PipelineLayoutDescriptor {
            label: Some("Mesh PipelineLayout"),
            bind_group_layouts: &[&uniform_bgl],
            push_constant_ranges: &[],
        });
        let targets = PipelineTargets {
            device: &device,
            layout: &pipeline_layout,
            shader: &shader,
            color_format: surface_format,
        };
        // Winding is taken from the file as is, so nothing is culled.
        let fill_pipeline = targets.build(
            "Fill Pipeline",
            "fs_fill",
            PrimitiveTopology::TriangleList,
            FILL_DEPTH_BIAS,
        );
        let outline_pipeline = targets.build(
            "Outline Pipeline",
            "fs_outline",
            PrimitiveTopology::LineList,
            DepthBiasState::default(),
        );

        // ==== Geometry ====
        let mesh_buffers = MeshBuffers::upload(&device, mesh);
        log::info!(
            "Uploaded mesh: {} vertices, {} triangle indices, {} edge indices",
            mesh.vertex_count(),
            mesh_buffers.triangle_count,
            mesh_buffers.edge_count
        );

        Ok(Self {
            surface,
            surface_config,
            device,
            queue,
            fill_pipeline,
            outline_pipeline,
            mesh: mesh_buffers,
            color: mesh.color,
            uniform_bgl,
            uniform_bg,
            uniform_buf,
            depth_view,
            width,
            height,
        })
    }

    /// Resize: reconfigure surface & recreate depth view.
    pub fn resize(&mut self, width: u32, height: u32) {
        self.width = width.max(1);
        self.height = height.max(1);
        self.surface_config.width = self.width;
        self.surface_config.height = self.height;
        self.surface.configure(&self.device, &self.surface_config);
        self.depth_view = create_depth_view(&self.device, &self.surface_config);
    }

    #[inline]
    pub fn aspect(&self) -> f32 {
        self.width as f32 / self.height as f32
    }

    /// Render one frame: upload MVP, clear, draw fill then outline.
    pub fn render(&mut self, mvp: Mat4) -> Result<(), SurfaceError> {
        let uniforms = FrameUniforms::new(mvp, self.color);
        self.queue
            .write_buffer(&self.uniform_buf, 0, bytemuck::bytes_of(&uniforms));

        let frame = self.surface.get_current_texture()?;
        let view = frame.texture.create_view(&Default::default());

        let mut encoder = self
            .device
            .create_command_encoder(&CommandEncoderDescriptor {
                label: Some("MainEncoder"),
            });

        {
            let mut rpass = encoder.begin_render_pass(&RenderPassDescriptor {
                label: Some("MainPass"),
                color_attachments: &[Some(RenderPassColorAttachment {
                    view: &view,
                    depth_slice: None,
                    resolve_target: None,
                    ops: Operations {
                        load: LoadOp::Clear(CLEAR_COLOR),
                        store: StoreOp::Store,
                    },
                })],
                depth_stencil_attachment: Some(wgpu::RenderPassDepthStencilAttachment {
                    view: &self.depth_view,
                    depth_ops: Some(Operations {
                        load: LoadOp::Clear(1.0),
                        store: StoreOp::Store,
                    }),
                    stencil_ops: None,
                }),
                occlusion_query_set: None,
                timestamp_writes: None,
            });

            rpass.set_bind_group(0, &self.uniform_bg, &[]);
            if self.mesh.triangle_count > 0 {
                rpass.set_vertex_buffer(0, self.mesh.vertex_buf.slice(..));
                rpass.set_pipeline(&self.fill_pipeline);
                rpass.set_index_buffer(self.mesh.triangle_buf.slice(..), IndexFormat::Uint32);
                rpass.draw_indexed(0..self.mesh.triangle_count, 0, 0..1);
            }
            if self.mesh.edge_count > 0 {
                rpass.set_vertex_buffer(0, self.mesh.vertex_buf.slice(..));
                rpass.set_pipeline(&self.outline_pipeline);
                rpass.set_index_buffer(self.mesh.edge_buf.slice(..), IndexFormat::Uint32);
                rpass.draw_indexed(0..self.mesh.edge_count, 0, 0..1);
            }
        }

        self.queue.submit(Some(encoder.finish()));
        frame.present();
        Ok(())
    }

    pub fn is_surface_lost(err: &SurfaceError) -> bool {
        matches!(err, SurfaceError::Lost | SurfaceError::Outdated)
    }

    pub fn recreate_surface(&mut self) {
        self.resize(self.width, self.height);
    }
}

/// State shared by the fill and outline pipelines.
struct PipelineTargets<'a> {
    device: &'a Device,
    layout: &'a PipelineLayout,
    shader: &'a ShaderModule,
    color_format: TextureFormat,
}

impl PipelineTargets<'_> {
    fn build(
        &self,
        label: &str,
        fragment_entry: &str,
        topology: PrimitiveTopology,
        bias: DepthBiasState,
    ) -> RenderPipeline {
        self.device.create_render_pipeline(&RenderPipelineDescriptor {
            label: Some(label),
            layout: Some(self.layout),
            vertex: VertexState {
                module: self.shader,
                entry_point: Some("vs_main"),
                buffers: &[POSITION_LAYOUT],
                compilation_options: wgpu::PipelineCompilationOptions::default(),
            },
            fragment: Some(FragmentState {
                module: self.shader,
                entry_point: Some(fragment_entry),
                targets: &[Some(ColorTargetState {
                    format: self.color_format,
                    blend: Some(BlendState::REPLACE),
                    write_mask: ColorWrites::ALL,
                })],
                compilation_options: wgpu::PipelineCompilationOptions::default(),
            }),
            primitive: PrimitiveState {
                topology,
                cull_mode: None,
                ..Default::default()
            },
            depth_stencil: Some(DepthStencilState {
                format: DEPTH_FORMAT,
                depth_write_enabled: true,
                depth_compare: CompareFunction::LessEqual,
                stencil: wgpu::StencilState::default(),
                bias,
            }),
            multisample: wgpu::MultisampleState::default(),
            multiview: None,
            cache: None,
        })
    }
}

/// Create a depth texture view matching the surface config.
fn create_depth_view(device: &Device, sc: &SurfaceConfiguration) -> TextureView {
    let tex = device.create_texture(&TextureDescriptor {
        label: Some("DepthTex"),
        size: Extent3d {
            width: sc.width.max(1),
            height: sc.height.max(1),
            depth_or_array_layers: 1,
        },
        mip_level_count: 1,
        sample_count: 1,
        dimension: TextureDimension::D2,
        format: DEPTH_FORMAT,
        usage: TextureUsages::RENDER_ATTACHMENT,
        view_formats: &[],
    });
    tex.create_view(&TextureViewDescriptor::default())
}
