// ABOUTME: Window-bound wgpu renderer: surface and device setup, GPU resources, and per-frame passes.
// ABOUTME: Also holds the CPU-side camera state and the demo settings.

use std::sync::Arc;
use std::time::Instant;

use anyhow::Context;
use glam::{Mat4, Vec3};
use wgpu::util::DeviceExt;
use winit::dpi::PhysicalSize;
use winit::window::Window;

use crate::mesh::{CUBE_INDICES, CUBE_VERTICES, QUAD_INDICES, QUAD_VERTICES};
use crate::pipeline::{self, BackdropUniform, CubeUniform};
use crate::spin::{DEFAULT_STEP, Spin};
use crate::texture::{self, TextureSource};
use crate::math;

const NEAR: f32 = 0.1;
const FAR: f32 = 100.0;

/// Demo tunables, filled from the app config.
#[derive(Debug, Clone, PartialEq)]
pub struct DemoSettings {
    pub rotation_step: f32,
    pub fov_degrees: f32,
    pub eye_distance: f32,
    pub texture: TextureSource,
}

impl Default for DemoSettings {
    fn default() -> Self {
        Self {
            rotation_step: DEFAULT_STEP,
            fov_degrees: 60.0,
            eye_distance: 2.5,
            texture: TextureSource::Builtin,
        }
    }
}

/// What to draw this frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Scene {
    /// Gradient only.
    Backdrop { glow: bool },
    /// Gradient, then the spinning cube with depth testing.
    Cube { glow: bool },
}

impl Scene {
    fn glow(self) -> bool {
        match self {
            Scene::Backdrop { glow } | Scene::Cube { glow } => glow,
        }
    }
}

/// CPU-side camera state, kept apart from GPU objects so it can be tested.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CameraState {
    pub projection: Mat4,
    pub view: Mat4,
    fovy: f32,
}

impl CameraState {
    pub fn new(settings: &DemoSettings, size: PhysicalSize<u32>) -> Self {
        let fovy = settings.fov_degrees.clamp(1.0, 179.0).to_radians();
        let view = math::look_at(
            Vec3::new(0.0, 0.0, settings.eye_distance),
            Vec3::ZERO,
            Vec3::Y,
        );
        Self {
            projection: math::perspective(fovy, aspect(size), NEAR, FAR),
            view,
            fovy,
        }
    }

    pub fn resize(&mut self, size: PhysicalSize<u32>) {
        self.projection = math::perspective(self.fovy, aspect(size), NEAR, FAR);
    }

    pub fn mvp(&self, spin: &Spin) -> Mat4 {
        self.projection * self.view * spin.model_matrix()
    }
}

fn aspect(size: PhysicalSize<u32>) -> f32 {
    size.width.max(1) as f32 / size.height.max(1) as f32
}

pub struct Renderer {
    surface: wgpu::Surface<'static>,
    device: wgpu::Device,
    queue: wgpu::Queue,
    config: wgpu::SurfaceConfiguration,
    depth: wgpu::TextureView,

    gradient_pipeline: wgpu::RenderPipeline,
    gradient_buf: wgpu::Buffer,
    gradient_bg: wgpu::BindGroup,
    quad_vb: wgpu::Buffer,
    quad_ib: wgpu::Buffer,

    cube_pipeline: wgpu::RenderPipeline,
    cube_buf: wgpu::Buffer,
    cube_bg: wgpu::BindGroup,
    cube_vb: wgpu::Buffer,
    cube_ib: wgpu::Buffer,

    camera: CameraState,
    spin: Spin,
    step: f32,
    start: Instant,
}

impl Renderer {
    /// Create a renderer bound to a window surface.
    ///
    /// Any failure here (no adapter, no device, unreadable texture) is meant
    /// to abort startup.
    pub async fn new(window: Arc<Window>, settings: &DemoSettings) -> anyhow::Result<Self> {
        let pixels = settings.texture.load().context("load cube texture")?;

        let instance = wgpu::Instance::new(&wgpu::InstanceDescriptor::default());
        let surface = instance
            .create_surface(window.clone())
            .context("create wgpu surface")?;
        let adapter = instance
            .request_adapter(&wgpu::RequestAdapterOptions {
                compatible_surface: Some(&surface),
                power_preference: wgpu::PowerPreference::HighPerformance,
                force_fallback_adapter: false,
            })
            .await
            .context("no suitable GPU adapter")?;
        let info = adapter.get_info();
        tracing::info!("Adapter: {:?} ({:?})", info.name, info.backend);

        let (device, queue) = adapter
            .request_device(&wgpu::DeviceDescriptor {
                label: Some("hudtoggle-device"),
                required_features: wgpu::Features::empty(),
                required_limits: wgpu::Limits::downlevel_defaults(),
                memory_hints: wgpu::MemoryHints::Performance,
                trace: wgpu::Trace::default(),
            })
            .await
            .context("request device")?;
        texture::check_texture_fits(&pixels, device.limits().max_texture_dimension_2d)
            .context("cube texture does not fit the GPU")?;
        device.on_uncaptured_error(Box::new(|e| {
            tracing::error!("wgpu uncaptured error: {e:?}");
        }));

        let size = window.inner_size();
        let caps = surface.get_capabilities(&adapter);
        let format = caps
            .formats
            .iter()
            .copied()
            .find(|f| f.is_srgb())
            .or_else(|| caps.formats.first().copied())
            .context("surface reports no formats")?;
        let alpha_mode = caps
            .alpha_modes
            .first()
            .copied()
            .unwrap_or(wgpu::CompositeAlphaMode::Auto);
        let config = wgpu::SurfaceConfiguration {
            usage: wgpu::TextureUsages::RENDER_ATTACHMENT,
            format,
            width: size.width.max(1),
            height: size.height.max(1),
            present_mode: wgpu::PresentMode::Fifo,
            alpha_mode,
            view_formats: vec![],
            desired_maximum_frame_latency: 2,
        };
        surface.configure(&device, &config);
        let depth = pipeline::create_depth_view(&device, config.width, config.height);

        // Backdrop
        let gradient_shader = pipeline::create_gradient_shader(&device);
        let gradient_bgl = pipeline::create_gradient_bgl(&device);
        let gradient_pipeline =
            pipeline::create_gradient_pipeline(&device, &gradient_shader, &gradient_bgl, format);
        let gradient_buf = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("gradient-uniform"),
            contents: bytemuck::bytes_of(&BackdropUniform {
                viewport: [config.width as f32, config.height as f32],
                time: 0.0,
                glow: 0.0,
            }),
            usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
        });
        let gradient_bg = device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some("gradient-bg"),
            layout: &gradient_bgl,
            entries: &[wgpu::BindGroupEntry {
                binding: 0,
                resource: gradient_buf.as_entire_binding(),
            }],
        });
        let quad_vb = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("quad-vb"),
            contents: bytemuck::cast_slice(&QUAD_VERTICES),
            usage: wgpu::BufferUsages::VERTEX,
        });
        let quad_ib = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("quad-ib"),
            contents: bytemuck::cast_slice(&QUAD_INDICES),
            usage: wgpu::BufferUsages::INDEX,
        });

        // Cube
        let cube_shader = pipeline::create_cube_shader(&device);
        let cube_bgl = pipeline::create_cube_bgl(&device);
        let cube_pipeline =
            pipeline::create_cube_pipeline(&device, &cube_shader, &cube_bgl, format);
        let cube_buf = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("cube-uniform"),
            contents: bytemuck::bytes_of(&CubeUniform {
                mvp: Mat4::IDENTITY.to_cols_array_2d(),
            }),
            usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
        });
        let cube_tex_view = texture::upload(&device, &queue, &pixels);
        let cube_sampler = device.create_sampler(&wgpu::SamplerDescriptor {
            label: Some("cube-sampler"),
            address_mode_u: wgpu::AddressMode::ClampToEdge,
            address_mode_v: wgpu::AddressMode::ClampToEdge,
            mag_filter: wgpu::FilterMode::Linear,
            min_filter: wgpu::FilterMode::Linear,
            mipmap_filter: wgpu::FilterMode::Nearest,
            ..Default::default()
        });
        let cube_bg = device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some("cube-bg"),
            layout: &cube_bgl,
            entries: &[
                wgpu::BindGroupEntry {
                    binding: 0,
                    resource: cube_buf.as_entire_binding(),
                },
                wgpu::BindGroupEntry {
                    binding: 1,
                    resource: wgpu::BindingResource::TextureView(&cube_tex_view),
                },
                wgpu::BindGroupEntry {
                    binding: 2,
                    resource: wgpu::BindingResource::Sampler(&cube_sampler),
                },
            ],
        });
        let cube_vb = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("cube-vb"),
            contents: bytemuck::cast_slice(&CUBE_VERTICES),
            usage: wgpu::BufferUsages::VERTEX,
        });
        let cube_ib = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("cube-ib"),
            contents: bytemuck::cast_slice(&CUBE_INDICES),
            usage: wgpu::BufferUsages::INDEX,
        });

        Ok(Self {
            surface,
            device,
            queue,
            config,
            depth,
            gradient_pipeline,
            gradient_buf,
            gradient_bg,
            quad_vb,
            quad_ib,
            cube_pipeline,
            cube_buf,
            cube_bg,
            cube_vb,
            cube_ib,
            camera: CameraState::new(settings, size),
            spin: Spin::new(settings.rotation_step),
            step: settings.rotation_step,
            start: Instant::now(),
        })
    }

    pub fn size(&self) -> PhysicalSize<u32> {
        PhysicalSize::new(self.config.width, self.config.height)
    }

    pub fn spin(&self) -> &Spin {
        &self.spin
    }

    /// Start the cube over, as when the demo view is re-created.
    pub fn reset_scene(&mut self) {
        self.spin = Spin::new(self.step);
    }

    pub fn resize(&mut self, new_size: PhysicalSize<u32>) {
        if new_size.width == 0 || new_size.height == 0 {
            return;
        }
        self.config.width = new_size.width;
        self.config.height = new_size.height;
        self.surface.configure(&self.device, &self.config);
        self.depth = pipeline::create_depth_view(&self.device, new_size.width, new_size.height);
        self.camera.resize(new_size);
        tracing::debug!("Resized surface to {}x{}", new_size.width, new_size.height);
    }

    pub fn render(&mut self, scene: Scene) -> Result<(), wgpu::SurfaceError> {
        let frame = self.surface.get_current_texture()?;
        let view = frame
            .texture
            .create_view(&wgpu::TextureViewDescriptor::default());

        self.queue.write_buffer(
            &self.gradient_buf,
            0,
            bytemuck::bytes_of(&BackdropUniform {
                viewport: [self.config.width as f32, self.config.height as f32],
                time: self.start.elapsed().as_secs_f32(),
                glow: if scene.glow() { 1.0 } else { 0.0 },
            }),
        );

        let mut encoder = self
            .device
            .create_command_encoder(&wgpu::CommandEncoderDescriptor {
                label: Some("frame-encoder"),
            });

        {
            let mut pass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
                label: Some("gradient-pass"),
                color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                    view: &view,
                    resolve_target: None,
                    depth_slice: None,
                    ops: wgpu::Operations {
                        load: wgpu::LoadOp::Clear(wgpu::Color {
                            r: 0.3,
                            g: 0.0,
                            b: 0.5,
                            a: 1.0,
                        }),
                        store: wgpu::StoreOp::Store,
                    },
                })],
                depth_stencil_attachment: Some(wgpu::RenderPassDepthStencilAttachment {
                    view: &self.depth,
                    depth_ops: Some(wgpu::Operations {
                        load: wgpu::LoadOp::Clear(1.0),
                        store: wgpu::StoreOp::Discard,
                    }),
                    stencil_ops: None,
                }),
                occlusion_query_set: None,
                timestamp_writes: None,
            });
            pass.set_pipeline(&self.gradient_pipeline);
            pass.set_bind_group(0, &self.gradient_bg, &[]);
            pass.set_vertex_buffer(0, self.quad_vb.slice(..));
            pass.set_index_buffer(self.quad_ib.slice(..), wgpu::IndexFormat::Uint16);
            pass.draw_indexed(0..QUAD_INDICES.len() as u32, 0, 0..1);
        }

        if let Scene::Cube { .. } = scene {
            self.spin.advance();
            let mvp = self.camera.mvp(&self.spin);
            self.queue.write_buffer(
                &self.cube_buf,
                0,
                bytemuck::bytes_of(&CubeUniform {
                    mvp: mvp.to_cols_array_2d(),
                }),
            );

            let mut pass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
                label: Some("cube-pass"),
                color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                    view: &view,
                    resolve_target: None,
                    depth_slice: None,
                    ops: wgpu::Operations {
                        load: wgpu::LoadOp::Load,
                        store: wgpu::StoreOp::Store,
                    },
                })],
                depth_stencil_attachment: Some(wgpu::RenderPassDepthStencilAttachment {
                    view: &self.depth,
                    depth_ops: Some(wgpu::Operations {
                        load: wgpu::LoadOp::Clear(1.0),
                        store: wgpu::StoreOp::Store,
                    }),
                    stencil_ops: None,
                }),
                occlusion_query_set: None,
                timestamp_writes: None,
            });
            pass.set_pipeline(&self.cube_pipeline);
            pass.set_bind_group(0, &self.cube_bg, &[]);
            pass.set_vertex_buffer(0, self.cube_vb.slice(..));
            pass.set_index_buffer(self.cube_ib.slice(..), wgpu::IndexFormat::Uint16);
            pass.draw_indexed(0..CUBE_INDICES.len() as u32, 0, 0..1);
        }

        self.queue.submit(Some(encoder.finish()));
        frame.present();
        Ok(())
    }
}
