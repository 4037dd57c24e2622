use std::sync::Arc;
use winit::window::Window;

use crate::core::error::{RenderError, RenderResult};
use crate::render::graph::{PolygonMode, RenderCommand, RenderGraph};
use crate::render::mesh::{GpuMesh, MeshBuilder};
use crate::render::particles::ParticleStream;
use crate::render::wgpu_modules::{
    DynamicParticleBuffer, ParticleUniforms, PipelineBuilder, TransformUniform, UniformBinding,
    DEPTH_FORMAT, PARTICLE_QUAD_VERTICES, PARTICLE_SHADER, TERRAIN_SHADER,
};

/// 渲染器创建参数
#[derive(Debug, Clone, Copy)]
pub struct RendererOptions {
    pub vsync: bool,
    /// 每单位粒子大小对应的像素数
    pub point_scale: f32,
    /// 粒子实例缓冲区容量
    pub particle_capacity: u32,
}

/// 一帧要执行的绘制，由 `RenderGraph` 归并而来
#[derive(Debug, Default)]
struct FramePlan {
    clear: wgpu::Color,
    mode: PolygonMode,
    terrain: Option<(glam::Mat4, u32)>,
    particles: Option<(glam::Mat4, u32)>,
}

impl FramePlan {
    fn from_graph(graph: &RenderGraph) -> Self {
        let mut plan = FramePlan {
            clear: wgpu::Color::BLACK,
            ..Default::default()
        };
        for command in &graph.commands {
            match command {
                RenderCommand::Clear { color } => {
                    plan.clear = wgpu::Color {
                        r: color[0] as f64,
                        g: color[1] as f64,
                        b: color[2] as f64,
                        a: color[3] as f64,
                    };
                }
                RenderCommand::SetPolygonMode(mode) => plan.mode = *mode,
                RenderCommand::DrawTerrain {
                    transform,
                    vertex_count,
                } => plan.terrain = Some((*transform, *vertex_count)),
                RenderCommand::DrawParticles {
                    transform,
                    instance_count,
                } => plan.particles = Some((*transform, *instance_count)),
            }
        }
        plan
    }
}

fn create_depth_view(device: &wgpu::Device, width: u32, height: u32) -> wgpu::TextureView {
    let depth_texture = device.create_texture(&wgpu::TextureDescriptor {
        label: Some("Depth Texture"),
        size: wgpu::Extent3d {
            width,
            height,
            depth_or_array_layers: 1,
        },
        mip_level_count: 1,
        sample_count: 1,
        dimension: wgpu::TextureDimension::D2,
        format: DEPTH_FORMAT,
        usage: wgpu::TextureUsages::RENDER_ATTACHMENT,
        view_formats: &[],
    });
    depth_texture.create_view(&wgpu::TextureViewDescriptor::default())
}

/// wgpu 渲染器：独占表面、设备、管线和所有 GPU 缓冲区
pub struct WgpuRenderer {
    surface: wgpu::Surface<'static>,
    device: wgpu::Device,
    queue: wgpu::Queue,
    config: wgpu::SurfaceConfiguration,
    depth_view: wgpu::TextureView,

    terrain_fill: wgpu::RenderPipeline,
    terrain_line: Option<wgpu::RenderPipeline>,
    particle_pipeline: wgpu::RenderPipeline,

    terrain_uniform: UniformBinding,
    particle_uniform: UniformBinding,
    terrain: GpuMesh,
    particles: DynamicParticleBuffer,

    point_scale: f32,
    line_fallback_warned: bool,
}

impl WgpuRenderer {
    pub async fn new(
        window: Arc<Window>,
        mesh: &MeshBuilder,
        options: RendererOptions,
    ) -> RenderResult<Self> {
        let size = window.inner_size();
        let instance = wgpu::Instance::default();
        let surface = instance
            .create_surface(window)
            .map_err(|e| RenderError::SurfaceCreation(e.to_string()))?;
        let adapter = instance
            .request_adapter(&wgpu::RequestAdapterOptions {
                power_preference: wgpu::PowerPreference::HighPerformance,
                compatible_surface: Some(&surface),
                force_fallback_adapter: false,
            })
            .await
            .ok_or(RenderError::NoAdapter)?;

        let info = adapter.get_info();
        tracing::info!(target: "render", "Adapter: {} ({:?})", info.name, info.backend);

        let line_mode = adapter
            .features()
            .contains(wgpu::Features::POLYGON_MODE_LINE);
        let required_features = if line_mode {
            wgpu::Features::POLYGON_MODE_LINE
        } else {
            wgpu::Features::empty()
        };

        let (device, queue) = adapter
            .request_device(
                &wgpu::DeviceDescriptor {
                    label: Some("Volcano Device"),
                    required_features,
                    required_limits: wgpu::Limits::default(),
                },
                None,
            )
            .await
            .map_err(|e| RenderError::DeviceRequest(e.to_string()))?;

        let caps = surface.get_capabilities(&adapter);
        let format = pick_surface_format(&caps.formats)
            .ok_or_else(|| RenderError::SurfaceCreation("no supported surface format".into()))?;
        let alpha_mode = caps
            .alpha_modes
            .first()
            .copied()
            .unwrap_or(wgpu::CompositeAlphaMode::Auto);
        let present_mode = if options.vsync {
            wgpu::PresentMode::AutoVsync
        } else {
            wgpu::PresentMode::AutoNoVsync
        };
        let config = wgpu::SurfaceConfiguration {
            usage: wgpu::TextureUsages::RENDER_ATTACHMENT,
            format,
            width: size.width.max(1),
            height: size.height.max(1),
            present_mode,
            alpha_mode,
            view_formats: vec![],
            desired_maximum_frame_latency: 2,
        };
        surface.configure(&device, &config);
        tracing::info!(target: "render", "Surface format: {:?}", format);

        let depth_view = create_depth_view(&device, config.width, config.height);

        let terrain_shader = PipelineBuilder::create_shader(&device, "Terrain Shader", TERRAIN_SHADER)?;
        let particle_shader =
            PipelineBuilder::create_shader(&device, "Particle Shader", PARTICLE_SHADER)?;

        let transform_bgl = PipelineBuilder::create_transform_bind_group_layout(&device);
        let particle_bgl = PipelineBuilder::create_particle_bind_group_layout(&device);

        let terrain_fill = PipelineBuilder::create_terrain_pipeline(
            &device,
            &terrain_shader,
            format,
            &transform_bgl,
            PolygonMode::Fill,
        )?;
        let terrain_line = if line_mode {
            Some(PipelineBuilder::create_terrain_pipeline(
                &device,
                &terrain_shader,
                format,
                &transform_bgl,
                PolygonMode::Line,
            )?)
        } else {
            None
        };
        let particle_pipeline = PipelineBuilder::create_particle_pipeline(
            &device,
            &particle_shader,
            format,
            &particle_bgl,
        )?;

        let terrain_uniform = UniformBinding::new(
            &device,
            &transform_bgl,
            "Terrain Uniform",
            &TransformUniform::from_gl(glam::Mat4::IDENTITY),
        );
        let particle_uniform = UniformBinding::new(
            &device,
            &particle_bgl,
            "Particle Uniform",
            &ParticleUniforms::new(
                glam::Mat4::IDENTITY,
                (config.width, config.height),
                options.point_scale,
            ),
        );

        let terrain = GpuMesh::new(&device, mesh);
        let particles = DynamicParticleBuffer::new(&device, options.particle_capacity);

        Ok(Self {
            surface,
            device,
            queue,
            config,
            depth_view,
            terrain_fill,
            terrain_line,
            particle_pipeline,
            terrain_uniform,
            particle_uniform,
            terrain,
            particles,
            point_scale: options.point_scale,
            line_fallback_warned: false,
        })
    }

    pub fn size(&self) -> (u32, u32) {
        (self.config.width, self.config.height)
    }

    /// 重新配置表面与深度缓冲，零尺寸（最小化）时忽略
    pub fn resize(&mut self, width: u32, height: u32) {
        if width == 0 || height == 0 {
            return;
        }
        self.config.width = width;
        self.config.height = height;
        self.surface.configure(&self.device, &self.config);
        self.depth_view = create_depth_view(&self.device, width, height);
    }

    /// 线框模式不可用时只警告一次
    fn note_line_fallback(&mut self, mode: PolygonMode) {
        if mode == PolygonMode::Line && self.terrain_line.is_none() && !self.line_fallback_warned {
            tracing::warn!(
                target: "render",
                "POLYGON_MODE_LINE not supported by this device, wireframe falls back to fill"
            );
            self.line_fallback_warned = true;
        }
    }

    /// 执行一帧：地形，然后粒子，最后呈现
    ///
    /// 表面丢失或过期时重新配置并跳过本帧；显存耗尽返回错误。
    pub fn render(&mut self, graph: &RenderGraph, stream: &ParticleStream) -> RenderResult<()> {
        let plan = FramePlan::from_graph(graph);

        let frame = match self.surface.get_current_texture() {
            Ok(frame) => frame,
            Err(wgpu::SurfaceError::Lost) | Err(wgpu::SurfaceError::Outdated) => {
                tracing::warn!(target: "render", "Surface lost or outdated, reconfiguring");
                self.surface.configure(&self.device, &self.config);
                return Ok(());
            }
            Err(wgpu::SurfaceError::OutOfMemory) => {
                return Err(RenderError::Surface("out of memory".to_string()));
            }
            Err(e) => {
                tracing::warn!(target: "render", "Skipping frame: {}", e);
                return Ok(());
            }
        };

        if let Some((transform, _)) = plan.terrain {
            self.terrain_uniform
                .write(&self.queue, &TransformUniform::from_gl(transform));
        }
        let particle_instances = match plan.particles {
            Some((transform, _)) => {
                let uniforms =
                    ParticleUniforms::new(transform, self.size(), self.point_scale);
                self.particle_uniform.write(&self.queue, &uniforms);
                self.particles.upload(&self.queue, stream)
            }
            None => 0,
        };

        let view = frame
            .texture
            .create_view(&wgpu::TextureViewDescriptor::default());
        let mut encoder = self
            .device
            .create_command_encoder(&wgpu::CommandEncoderDescriptor {
                label: Some("Frame Encoder"),
            });

        self.note_line_fallback(plan.mode);
        {
            let terrain_pipeline = match (plan.mode, &self.terrain_line) {
                (PolygonMode::Line, Some(line)) => line,
                _ => &self.terrain_fill,
            };

            let mut rpass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
                label: Some("Main Pass"),
                color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                    view: &view,
                    resolve_target: None,
                    ops: wgpu::Operations {
                        load: wgpu::LoadOp::Clear(plan.clear),
                        store: wgpu::StoreOp::Store,
                    },
                })],
                depth_stencil_attachment: Some(wgpu::RenderPassDepthStencilAttachment {
                    view: &self.depth_view,
                    depth_ops: Some(wgpu::Operations {
                        load: wgpu::LoadOp::Clear(1.0),
                        store: wgpu::StoreOp::Store,
                    }),
                    stencil_ops: None,
                }),
                occlusion_query_set: None,
                timestamp_writes: None,
            });

            if let Some((_, vertex_count)) = plan.terrain {
                rpass.set_pipeline(terrain_pipeline);
                rpass.set_bind_group(0, &self.terrain_uniform.bind_group, &[]);
                rpass.set_vertex_buffer(0, self.terrain.position_buffer.slice(..));
                rpass.set_vertex_buffer(1, self.terrain.normal_buffer.slice(..));
                rpass.draw(0..vertex_count.min(self.terrain.vertex_count), 0..1);
            }

            if particle_instances > 0 {
                rpass.set_pipeline(&self.particle_pipeline);
                rpass.set_bind_group(0, &self.particle_uniform.bind_group, &[]);
                rpass.set_vertex_buffer(0, self.particles.buffer().slice(..));
                rpass.draw(0..PARTICLE_QUAD_VERTICES, 0..particle_instances);
            }
        }

        self.queue.submit(std::iter::once(encoder.finish()));
        frame.present();
        Ok(())
    }
}

/// 选择表面格式：优先非 sRGB 格式
///
/// 清屏色与着色器输出的颜色都是直接写入的显示值，sRGB 表面会再做一次
/// 编码，把 0.2 的灰色提亮到约 0.48。只有 sRGB 格式可用时退回第一个。
fn pick_surface_format(formats: &[wgpu::TextureFormat]) -> Option<wgpu::TextureFormat> {
    formats
        .iter()
        .copied()
        .find(|f| !f.is_srgb())
        .or_else(|| formats.first().copied())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::render::graph::{build_frame, FrameDesc};
    use crate::scene::Camera;

    #[test]
    fn test_frame_plan_collects_commands() {
        let mut camera = Camera::default();
        camera.is_wireframe = true;
        let graph = build_frame(
            &camera,
            &FrameDesc {
                clear_color: [0.2, 0.2, 0.2, 1.0],
                aspect: 1.5,
                terrain_vertices: 30,
                particle_instances: 4,
            },
        );
        let plan = FramePlan::from_graph(&graph);
        assert_eq!(plan.mode, PolygonMode::Line);
        assert_eq!(plan.terrain.map(|(_, n)| n), Some(30));
        assert_eq!(plan.particles.map(|(_, n)| n), Some(4));
        assert!((plan.clear.r - 0.2).abs() < 1e-6);
    }

    #[test]
    fn test_frame_plan_without_particles() {
        let graph = build_frame(
            &Camera::default(),
            &FrameDesc {
                clear_color: [0.0, 0.0, 0.0, 1.0],
                aspect: 1.0,
                terrain_vertices: 3,
                particle_instances: 0,
            },
        );
        let plan = FramePlan::from_graph(&graph);
        assert_eq!(plan.mode, PolygonMode::Fill);
        assert!(plan.particles.is_none());
    }

    #[test]
    fn test_surface_format_prefers_linear() {
        use wgpu::TextureFormat::*;
        assert_eq!(
            pick_surface_format(&[Bgra8UnormSrgb, Bgra8Unorm]),
            Some(Bgra8Unorm)
        );
        assert_eq!(
            pick_surface_format(&[Rgba8UnormSrgb, Bgra8UnormSrgb]),
            Some(Rgba8UnormSrgb)
        );
        assert_eq!(pick_surface_format(&[]), None);
    }
}
