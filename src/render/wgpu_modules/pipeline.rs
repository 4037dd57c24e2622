//! WGPU 管线创建
//!
//! 地形与粒子两套着色器程序。着色器和管线创建包裹在验证错误作用域中，
//! 失败时转换为 `RenderError`，而不是在设备回调里 panic。

use super::types::{ParticleUniforms, TransformUniform};
use crate::core::error::{RenderError, RenderResult};
use crate::render::graph::PolygonMode;
use crate::render::particles::ParticleVertex;

/// 深度缓冲格式
pub const DEPTH_FORMAT: wgpu::TextureFormat = wgpu::TextureFormat::Depth32Float;

/// 地形着色器：按高度分段着色，Lambert 光照下限 0.3
pub const TERRAIN_SHADER: &str = r#"
struct Transform {
    m: mat4x4<f32>,
};
@group(0) @binding(0) var<uniform> uTransform: Transform;

struct VsOut {
    @builtin(position) clip: vec4<f32>,
    @location(0) world_pos: vec3<f32>,
    @location(1) normal: vec3<f32>,
};

@vertex
fn vs_main(@location(0) position: vec3<f32>, @location(1) normal: vec3<f32>) -> VsOut {
    var out: VsOut;
    out.clip = uTransform.m * vec4<f32>(position, 1.0);
    out.world_pos = position;
    out.normal = normal;
    return out;
}

fn volcano_color(height: f32) -> vec3<f32> {
    let deep_brown = vec3<f32>(0.3, 0.15, 0.05);
    let earth_brown = vec3<f32>(0.5, 0.25, 0.1);
    let rock_gray = vec3<f32>(0.4, 0.35, 0.3);
    let volcanic_orange = vec3<f32>(0.8, 0.3, 0.1);
    let lava_red = vec3<f32>(1.0, 0.2, 0.05);

    var color: vec3<f32>;
    if (height < 0.5) {
        color = mix(deep_brown, earth_brown, height * 2.0);
    } else if (height < 1.2) {
        color = mix(earth_brown, rock_gray, (height - 0.5) / 0.7);
    } else if (height < 2.0) {
        color = mix(rock_gray, volcanic_orange, (height - 1.2) / 0.8);
    } else {
        color = mix(volcanic_orange, lava_red, (height - 2.0) / 0.5);
    }
    return color;
}

@fragment
fn fs_main(in: VsOut) -> @location(0) vec4<f32> {
    if (in.world_pos.y < 0.0) {
        return vec4<f32>(0.8, 0.25, 0.05, 1.0);
    }
    let light_dir = normalize(vec3<f32>(0.5, 1.0, 0.5));
    let diff = max(dot(normalize(in.normal), light_dir), 0.3);
    return vec4<f32>(volcano_color(in.world_pos.y) * diff, 1.0);
}
"#;

/// 粒子着色器：每个实例展开为屏幕对齐的四边形，片元裁成圆形并羽化边缘
pub const PARTICLE_SHADER: &str = r#"
struct ParticleUniforms {
    transform: mat4x4<f32>,
    viewport: vec2<f32>,
    point_scale: f32,
    _pad: f32,
};
@group(0) @binding(0) var<uniform> u: ParticleUniforms;

struct VsOut {
    @builtin(position) clip: vec4<f32>,
    @location(0) color: vec4<f32>,
    @location(1) coord: vec2<f32>,
};

@vertex
fn vs_main(
    @builtin(vertex_index) vertex_index: u32,
    @location(0) position: vec3<f32>,
    @location(1) size: f32,
    @location(2) color: vec4<f32>,
) -> VsOut {
    var corners = array<vec2<f32>, 6>(
        vec2<f32>(-1.0, -1.0),
        vec2<f32>(1.0, -1.0),
        vec2<f32>(1.0, 1.0),
        vec2<f32>(-1.0, -1.0),
        vec2<f32>(1.0, 1.0),
        vec2<f32>(-1.0, 1.0),
    );
    let corner = corners[vertex_index];
    let center = u.transform * vec4<f32>(position, 1.0);
    let pixels = size * u.point_scale;
    let offset = corner * (pixels / u.viewport) * center.w;

    var out: VsOut;
    out.clip = vec4<f32>(center.xy + offset, center.zw);
    out.color = color;
    out.coord = vec2<f32>(corner.x, -corner.y);
    return out;
}

@fragment
fn fs_main(in: VsOut) -> @location(0) vec4<f32> {
    let dist = length(in.coord);
    if (dist > 1.0) {
        discard;
    }
    let alpha = in.color.a * (1.0 - smoothstep(0.6, 1.0, dist));
    return vec4<f32>(in.color.rgb, alpha);
}
"#;

/// 每个粒子四边形的顶点数
pub const PARTICLE_QUAD_VERTICES: u32 = 6;

/// 地形顶点布局：slot 0 位置，slot 1 法线
pub fn terrain_vertex_layouts() -> [wgpu::VertexBufferLayout<'static>; 2] {
    const POSITION: [wgpu::VertexAttribute; 1] = wgpu::vertex_attr_array![0 => Float32x3];
    const NORMAL: [wgpu::VertexAttribute; 1] = wgpu::vertex_attr_array![1 => Float32x3];
    let stride = (3 * std::mem::size_of::<f32>()) as wgpu::BufferAddress;
    [
        wgpu::VertexBufferLayout {
            array_stride: stride,
            step_mode: wgpu::VertexStepMode::Vertex,
            attributes: &POSITION,
        },
        wgpu::VertexBufferLayout {
            array_stride: stride,
            step_mode: wgpu::VertexStepMode::Vertex,
            attributes: &NORMAL,
        },
    ]
}

/// 管线构建器
pub struct PipelineBuilder;

impl PipelineBuilder {
    /// 编译 WGSL 着色器，验证失败时返回 `ShaderCompilation`
    pub fn create_shader(
        device: &wgpu::Device,
        label: &str,
        source: &str,
    ) -> RenderResult<wgpu::ShaderModule> {
        device.push_error_scope(wgpu::ErrorFilter::Validation);
        let module = device.create_shader_module(wgpu::ShaderModuleDescriptor {
            label: Some(label),
            source: wgpu::ShaderSource::Wgsl(source.into()),
        });
        match pollster::block_on(device.pop_error_scope()) {
            Some(err) => Err(RenderError::ShaderCompilation(format!("{}: {}", label, err))),
            None => Ok(module),
        }
    }

    /// 单个 uniform 缓冲区的绑定组布局（group 0, binding 0）
    pub fn create_uniform_bind_group_layout(
        device: &wgpu::Device,
        label: &str,
        size: u64,
    ) -> wgpu::BindGroupLayout {
        device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
            label: Some(label),
            entries: &[wgpu::BindGroupLayoutEntry {
                binding: 0,
                visibility: wgpu::ShaderStages::VERTEX,
                ty: wgpu::BindingType::Buffer {
                    ty: wgpu::BufferBindingType::Uniform,
                    has_dynamic_offset: false,
                    min_binding_size: std::num::NonZeroU64::new(size),
                },
                count: None,
            }],
        })
    }

    pub fn create_transform_bind_group_layout(device: &wgpu::Device) -> wgpu::BindGroupLayout {
        Self::create_uniform_bind_group_layout(
            device,
            "Transform BGL",
            std::mem::size_of::<TransformUniform>() as u64,
        )
    }

    pub fn create_particle_bind_group_layout(device: &wgpu::Device) -> wgpu::BindGroupLayout {
        Self::create_uniform_bind_group_layout(
            device,
            "Particle Uniform BGL",
            std::mem::size_of::<ParticleUniforms>() as u64,
        )
    }

    /// 创建地形管线（填充或线框）
    pub fn create_terrain_pipeline(
        device: &wgpu::Device,
        shader: &wgpu::ShaderModule,
        format: wgpu::TextureFormat,
        layout: &wgpu::BindGroupLayout,
        mode: PolygonMode,
    ) -> RenderResult<wgpu::RenderPipeline> {
        let pipeline_layout = device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
            label: Some("Terrain Pipeline Layout"),
            bind_group_layouts: &[layout],
            push_constant_ranges: &[],
        });
        let buffers = terrain_vertex_layouts();
        let label = match mode {
            PolygonMode::Fill => "Terrain Pipeline (Fill)",
            PolygonMode::Line => "Terrain Pipeline (Line)",
        };

        Self::checked(device, label, || {
            device.create_render_pipeline(&wgpu::RenderPipelineDescriptor {
                label: Some(label),
                layout: Some(&pipeline_layout),
                vertex: wgpu::VertexState {
                    module: shader,
                    entry_point: "vs_main",
                    buffers: &buffers,
                    compilation_options: wgpu::PipelineCompilationOptions::default(),
                },
                fragment: Some(wgpu::FragmentState {
                    module: shader,
                    entry_point: "fs_main",
                    targets: &[Some(wgpu::ColorTargetState {
                        format,
                        blend: Some(wgpu::BlendState::REPLACE),
                        write_mask: wgpu::ColorWrites::ALL,
                    })],
                    compilation_options: wgpu::PipelineCompilationOptions::default(),
                }),
                primitive: wgpu::PrimitiveState {
                    topology: wgpu::PrimitiveTopology::TriangleList,
                    cull_mode: None,
                    polygon_mode: mode.into(),
                    ..Default::default()
                },
                depth_stencil: Some(wgpu::DepthStencilState {
                    format: DEPTH_FORMAT,
                    depth_write_enabled: true,
                    depth_compare: wgpu::CompareFunction::Less,
                    stencil: wgpu::StencilState::default(),
                    bias: wgpu::DepthBiasState::default(),
                }),
                multisample: wgpu::MultisampleState::default(),
                multiview: None,
            })
        })
    }

    /// 创建粒子管线：Alpha 混合，深度测试开启但不写深度
    pub fn create_particle_pipeline(
        device: &wgpu::Device,
        shader: &wgpu::ShaderModule,
        format: wgpu::TextureFormat,
        layout: &wgpu::BindGroupLayout,
    ) -> RenderResult<wgpu::RenderPipeline> {
        let pipeline_layout = device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
            label: Some("Particle Pipeline Layout"),
            bind_group_layouts: &[layout],
            push_constant_ranges: &[],
        });

        Self::checked(device, "Particle Pipeline", || {
            device.create_render_pipeline(&wgpu::RenderPipelineDescriptor {
                label: Some("Particle Pipeline"),
                layout: Some(&pipeline_layout),
                vertex: wgpu::VertexState {
                    module: shader,
                    entry_point: "vs_main",
                    buffers: &[ParticleVertex::vertex_buffer_layout()],
                    compilation_options: wgpu::PipelineCompilationOptions::default(),
                },
                fragment: Some(wgpu::FragmentState {
                    module: shader,
                    entry_point: "fs_main",
                    targets: &[Some(wgpu::ColorTargetState {
                        format,
                        blend: Some(wgpu::BlendState::ALPHA_BLENDING),
                        write_mask: wgpu::ColorWrites::ALL,
                    })],
                    compilation_options: wgpu::PipelineCompilationOptions::default(),
                }),
                primitive: wgpu::PrimitiveState {
                    topology: wgpu::PrimitiveTopology::TriangleList,
                    cull_mode: None,
                    ..Default::default()
                },
                depth_stencil: Some(wgpu::DepthStencilState {
                    format: DEPTH_FORMAT,
                    depth_write_enabled: false,
                    depth_compare: wgpu::CompareFunction::Less,
                    stencil: wgpu::StencilState::default(),
                    bias: wgpu::DepthBiasState::default(),
                }),
                multisample: wgpu::MultisampleState::default(),
                multiview: None,
            })
        })
    }

    fn checked<F>(device: &wgpu::Device, label: &str, create: F) -> RenderResult<wgpu::RenderPipeline>
    where
        F: FnOnce() -> wgpu::RenderPipeline,
    {
        device.push_error_scope(wgpu::ErrorFilter::Validation);
        let pipeline = create();
        match pollster::block_on(device.pop_error_scope()) {
            Some(err) => Err(RenderError::PipelineCreation(format!("{}: {}", label, err))),
            None => Ok(pipeline),
        }
    }
}
