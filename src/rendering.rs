//! Rendering system with wgpu pipeline and shader management.

use std::sync::Arc;

use anyhow::{Context, Result};
use bytemuck::{Pod, Zeroable};
use glam::{Mat4, Vec3};
use wgpu::util::DeviceExt;
use winit::window::Window;

use crate::assets::LoadedModel;
use crate::scene::Scene;
use crate::surface::{AnimatedSurface, Vertex};

const DEPTH_FORMAT: wgpu::TextureFormat = wgpu::TextureFormat::Depth32Float;

/// Requested multisample count (antialiased edges on the model)
const MSAA_SAMPLES: u32 = 4;

/// Which lighting terms a draw receives
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Shading {
    /// Point light + ambient (otherwise raw vertex colour)
    pub lit: bool,
    /// Exponential-squared distance fog
    pub fogged: bool,
}

impl Shading {
    /// Gradient-only surface, unaffected by light or fog
    pub const SURFACE: Self = Self {
        lit: false,
        fogged: false,
    };

    pub const MODEL: Self = Self {
        lit: true,
        fogged: true,
    };
}

/// Uniform buffer for one draw (must match `Uniforms` in shader.wgsl)
#[repr(C)]
#[derive(Copy, Clone, Debug, Pod, Zeroable)]
pub struct Uniforms {
    pub view_proj: [[f32; 4]; 4],
    pub model: [[f32; 4]; 4],
    pub eye: [f32; 4],
    /// xyz = position, w = range
    pub light_position: [f32; 4],
    /// rgb = colour * intensity, w = ambient
    pub light_color: [f32; 4],
    /// rgb = colour, w = density
    pub fog_color: [f32; 4],
    /// x = lit, y = fogged
    pub flags: [f32; 4],
}

impl Uniforms {
    pub fn new(view_proj: Mat4, model: Mat4, eye: Vec3, scene: &Scene, shading: Shading) -> Self {
        let sun = scene.sun();
        let fog = scene.fog();
        let flag = |on: bool| if on { 1.0 } else { 0.0 };

        Self {
            view_proj: view_proj.to_cols_array_2d(),
            model: model.to_cols_array_2d(),
            eye: eye.extend(1.0).to_array(),
            light_position: scene.sun_position().extend(sun.range_m).to_array(),
            light_color: (sun.color * sun.intensity).extend(sun.ambient).to_array(),
            fog_color: fog.color.extend(fog.density).to_array(),
            flags: [flag(shading.lit), flag(shading.fogged), 0.0, 0.0],
        }
    }
}

/// GPU-resident mesh (vertex + index buffers)
struct GpuMesh {
    vertex_buffer: wgpu::Buffer,
    index_buffer: wgpu::Buffer,
    index_count: u32,
}

impl GpuMesh {
    fn new(device: &wgpu::Device, label: &str, vertices: &[Vertex], indices: &[u32]) -> Self {
        let vertex_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some(&format!("{} Vertex Buffer", label)),
            contents: bytemuck::cast_slice(vertices),
            usage: wgpu::BufferUsages::VERTEX | wgpu::BufferUsages::COPY_DST,
        });

        let index_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some(&format!("{} Index Buffer", label)),
            contents: bytemuck::cast_slice(indices),
            usage: wgpu::BufferUsages::INDEX,
        });

        Self {
            vertex_buffer,
            index_buffer,
            index_count: indices.len() as u32,
        }
    }
}

/// Uniform buffer plus its bind group
struct DrawUniforms {
    buffer: wgpu::Buffer,
    bind_group: wgpu::BindGroup,
}

impl DrawUniforms {
    fn new(device: &wgpu::Device, layout: &wgpu::BindGroupLayout, label: &str) -> Self {
        let buffer = device.create_buffer(&wgpu::BufferDescriptor {
            label: Some(&format!("{} Uniform Buffer", label)),
            size: std::mem::size_of::<Uniforms>() as wgpu::BufferAddress,
            usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
            mapped_at_creation: false,
        });

        let bind_group = device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some(&format!("{} Bind Group", label)),
            layout,
            entries: &[wgpu::BindGroupEntry {
                binding: 0,
                resource: buffer.as_entire_binding(),
            }],
        });

        Self { buffer, bind_group }
    }
}

/// Rendering system managing wgpu device, pipeline, and buffers
pub struct RenderSystem {
    pub surface: wgpu::Surface<'static>,
    pub device: wgpu::Device,
    pub queue: wgpu::Queue,
    config: wgpu::SurfaceConfiguration,
    pipeline: wgpu::RenderPipeline,
    sample_count: u32,
    targets: RenderTargets,
    surface_mesh: GpuMesh,
    surface_uniforms: DrawUniforms,
    model_mesh: Option<GpuMesh>,
    model_uniforms: DrawUniforms,
}

impl RenderSystem {
    /// Create new rendering system sized to `window`, with buffers for `animated`
    pub async fn new(window: Arc<Window>, animated: &AnimatedSurface) -> Result<Self> {
        let size = window.inner_size();

        let instance = wgpu::Instance::new(wgpu::InstanceDescriptor {
            backends: wgpu::Backends::all(),
            ..Default::default()
        });

        // Create surface (window must have 'static lifetime via Arc)
        let surface = instance
            .create_surface(window)
            .context("Failed to create surface")?;

        let adapter = instance
            .request_adapter(&wgpu::RequestAdapterOptions {
                power_preference: wgpu::PowerPreference::HighPerformance,
                compatible_surface: Some(&surface),
                force_fallback_adapter: false,
            })
            .await
            .context("Failed to find suitable GPU adapter")?;

        log::info!("Using GPU adapter: {}", adapter.get_info().name);

        let (device, queue) = adapter
            .request_device(
                &wgpu::DeviceDescriptor {
                    label: Some("Main Device"),
                    required_features: wgpu::Features::empty(),
                    required_limits: wgpu::Limits::default(),
                    memory_hints: Default::default(),
                },
                None,
            )
            .await
            .context("Failed to request device")?;

        // Configure surface
        let surface_caps = surface.get_capabilities(&adapter);
        let surface_format = surface_caps
            .formats
            .iter()
            .find(|f| f.is_srgb())
            .copied()
            .or_else(|| surface_caps.formats.first().copied())
            .context("Surface reports no supported formats")?;

        let config = wgpu::SurfaceConfiguration {
            usage: wgpu::TextureUsages::RENDER_ATTACHMENT,
            format: surface_format,
            width: size.width.max(1),
            height: size.height.max(1),
            present_mode: wgpu::PresentMode::Fifo,
            alpha_mode: surface_caps.alpha_modes[0],
            view_formats: vec![],
            desired_maximum_frame_latency: 2,
        };
        surface.configure(&device, &config);

        let sample_count = supported_sample_count(&adapter, config.format);
        log::info!("Multisampling: {}x", sample_count);
        let targets = RenderTargets::new(&device, &config, sample_count);

        let shader = device.create_shader_module(wgpu::ShaderModuleDescriptor {
            label: Some("Scene Shader"),
            source: wgpu::ShaderSource::Wgsl(include_str!("shader.wgsl").into()),
        });

        let uniform_bind_group_layout =
            device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
                label: Some("Uniform Bind Group Layout"),
                entries: &[wgpu::BindGroupLayoutEntry {
                    binding: 0,
                    visibility: wgpu::ShaderStages::VERTEX | wgpu::ShaderStages::FRAGMENT,
                    ty: wgpu::BindingType::Buffer {
                        ty: wgpu::BufferBindingType::Uniform,
                        has_dynamic_offset: false,
                        min_binding_size: None,
                    },
                    count: None,
                }],
            });

        let surface_uniforms = DrawUniforms::new(&device, &uniform_bind_group_layout, "Surface");
        let model_uniforms = DrawUniforms::new(&device, &uniform_bind_group_layout, "Model");

        let surface_mesh = GpuMesh::new(
            &device,
            "Surface",
            &animated.vertices(),
            animated.indices(),
        );

        let pipeline_layout = device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
            label: Some("Render Pipeline Layout"),
            bind_group_layouts: &[&uniform_bind_group_layout],
            push_constant_ranges: &[],
        });

        let pipeline = device.create_render_pipeline(&wgpu::RenderPipelineDescriptor {
            label: Some("Scene Render Pipeline"),
            layout: Some(&pipeline_layout),
            vertex: wgpu::VertexState {
                module: &shader,
                entry_point: Some("vs_main"),
                buffers: &[wgpu::VertexBufferLayout {
                    array_stride: std::mem::size_of::<Vertex>() as wgpu::BufferAddress,
                    step_mode: wgpu::VertexStepMode::Vertex,
                    attributes: &wgpu::vertex_attr_array![
                        0 => Float32x3,
                        1 => Float32x3,
                        2 => Float32x3
                    ],
                }],
                compilation_options: Default::default(),
            },
            fragment: Some(wgpu::FragmentState {
                module: &shader,
                entry_point: Some("fs_main"),
                targets: &[Some(wgpu::ColorTargetState {
                    format: config.format,
                    blend: Some(wgpu::BlendState::REPLACE),
                    write_mask: wgpu::ColorWrites::ALL,
                })],
                compilation_options: Default::default(),
            }),
            primitive: wgpu::PrimitiveState {
                topology: wgpu::PrimitiveTopology::TriangleList,
                strip_index_format: None,
                front_face: wgpu::FrontFace::Ccw,
                // Surface is visible from below as well
                cull_mode: None,
                polygon_mode: wgpu::PolygonMode::Fill,
                unclipped_depth: false,
                conservative: false,
            },
            depth_stencil: Some(wgpu::DepthStencilState {
                format: DEPTH_FORMAT,
                depth_write_enabled: true,
                depth_compare: wgpu::CompareFunction::Less,
                stencil: wgpu::StencilState::default(),
                bias: wgpu::DepthBiasState::default(),
            }),
            multisample: wgpu::MultisampleState {
                count: sample_count,
                mask: !0,
                alpha_to_coverage_enabled: false,
            },
            multiview: None,
            cache: None,
        });

        Ok(Self {
            surface,
            device,
            queue,
            config,
            pipeline,
            sample_count,
            targets,
            surface_mesh,
            surface_uniforms,
            model_mesh: None,
            model_uniforms,
        })
    }

    /// Upload this tick's surface vertices
    pub fn update_surface_vertices(&self, vertices: &[Vertex]) {
        self.queue.write_buffer(
            &self.surface_mesh.vertex_buffer,
            0,
            bytemuck::cast_slice(vertices),
        );
    }

    /// Create GPU buffers for a freshly loaded model
    pub fn set_model(&mut self, model: &LoadedModel) {
        self.model_mesh = Some(GpuMesh::new(
            &self.device,
            "Model",
            &model.vertices,
            &model.indices,
        ));
    }

    pub fn update_uniforms(&self, surface: &Uniforms, model: &Uniforms) {
        self.queue.write_buffer(
            &self.surface_uniforms.buffer,
            0,
            bytemuck::cast_slice(&[*surface]),
        );
        self.queue.write_buffer(
            &self.model_uniforms.buffer,
            0,
            bytemuck::cast_slice(&[*model]),
        );
    }

    /// Reconfigure the swapchain and render targets for a new window size
    pub fn resize(&mut self, width: u32, height: u32) {
        if width == 0 || height == 0 {
            return; // Minimized
        }
        self.config.width = width;
        self.config.height = height;
        self.surface.configure(&self.device, &self.config);
        self.targets = RenderTargets::new(&self.device, &self.config, self.sample_count);
    }

    /// Reapply the current configuration (after a lost/outdated surface)
    pub fn reconfigure(&mut self) {
        self.resize(self.config.width, self.config.height);
    }

    /// Render a frame: clear to `background`, draw surface then model
    pub fn render(&self, background: Vec3) -> Result<(), wgpu::SurfaceError> {
        let output = self.surface.get_current_texture()?;
        let view = output
            .texture
            .create_view(&wgpu::TextureViewDescriptor::default());

        let mut encoder = self
            .device
            .create_command_encoder(&wgpu::CommandEncoderDescriptor {
                label: Some("Render Encoder"),
            });

        // Multisampled: draw into the MSAA target and resolve into the frame
        let (color_view, resolve_target) = match &self.targets.msaa_view {
            Some(msaa_view) => (msaa_view, Some(&view)),
            None => (&view, None),
        };

        {
            let mut render_pass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
                label: Some("Render Pass"),
                color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                    view: color_view,
                    resolve_target,
                    ops: wgpu::Operations {
                        load: wgpu::LoadOp::Clear(wgpu::Color {
                            r: background.x as f64,
                            g: background.y as f64,
                            b: background.z as f64,
                            a: 1.0,
                        }),
                        store: wgpu::StoreOp::Store,
                    },
                })],
                depth_stencil_attachment: Some(wgpu::RenderPassDepthStencilAttachment {
                    view: &self.targets.depth_view,
                    depth_ops: Some(wgpu::Operations {
                        load: wgpu::LoadOp::Clear(1.0),
                        store: wgpu::StoreOp::Store,
                    }),
                    stencil_ops: None,
                }),
                timestamp_writes: None,
                occlusion_query_set: None,
            });

            render_pass.set_pipeline(&self.pipeline);

            let draws = [
                Some((&self.surface_mesh, &self.surface_uniforms)),
                self.model_mesh.as_ref().map(|mesh| (mesh, &self.model_uniforms)),
            ];
            for (mesh, uniforms) in draws.into_iter().flatten() {
                render_pass.set_bind_group(0, &uniforms.bind_group, &[]);
                render_pass.set_vertex_buffer(0, mesh.vertex_buffer.slice(..));
                render_pass
                    .set_index_buffer(mesh.index_buffer.slice(..), wgpu::IndexFormat::Uint32);
                render_pass.draw_indexed(0..mesh.index_count, 0, 0..1);
            }
        }

        self.queue.submit(std::iter::once(encoder.finish()));
        output.present();

        Ok(())
    }
}

/// Depth buffer plus, when multisampling, the color target resolved each frame
struct RenderTargets {
    depth_view: wgpu::TextureView,
    msaa_view: Option<wgpu::TextureView>,
}

impl RenderTargets {
    fn new(device: &wgpu::Device, config: &wgpu::SurfaceConfiguration, sample_count: u32) -> Self {
        let depth_view = create_target_view(
            device,
            "Depth Texture",
            DEPTH_FORMAT,
            config,
            sample_count,
        );
        let msaa_view = (sample_count > 1).then(|| {
            create_target_view(device, "MSAA Color Texture", config.format, config, sample_count)
        });
        Self {
            depth_view,
            msaa_view,
        }
    }
}

fn create_target_view(
    device: &wgpu::Device,
    label: &str,
    format: wgpu::TextureFormat,
    config: &wgpu::SurfaceConfiguration,
    sample_count: u32,
) -> wgpu::TextureView {
    let texture = device.create_texture(&wgpu::TextureDescriptor {
        label: Some(label),
        size: wgpu::Extent3d {
            width: config.width,
            height: config.height,
            depth_or_array_layers: 1,
        },
        mip_level_count: 1,
        sample_count,
        dimension: wgpu::TextureDimension::D2,
        format,
        usage: wgpu::TextureUsages::RENDER_ATTACHMENT,
        view_formats: &[],
    });
    texture.create_view(&wgpu::TextureViewDescriptor::default())
}

/// Sample count usable by both the surface format and the depth format
fn supported_sample_count(adapter: &wgpu::Adapter, color_format: wgpu::TextureFormat) -> u32 {
    let color = adapter.get_texture_format_features(color_format).flags;
    let depth = adapter.get_texture_format_features(DEPTH_FORMAT).flags;
    let allowed: Vec<u32> = [1, 2, 4, 8, 16]
        .into_iter()
        .filter(|&n| color.sample_count_supported(n) && depth.sample_count_supported(n))
        .collect();
    choose_sample_count(MSAA_SAMPLES, &allowed)
}

/// `requested` if allowed, else the largest allowed count below it, else 1
fn choose_sample_count(requested: u32, allowed: &[u32]) -> u32 {
    allowed
        .iter()
        .copied()
        .filter(|&n| n >= 1 && n <= requested)
        .max()
        .unwrap_or(1)
}
