//! 渲染模块
//!
//! - `terrain` / `mesh`: 火山网格生成与 GPU 上传
//! - `particles`: CPU 熔岩与烟雾粒子
//! - `graph`: 与 GPU 无关的每帧命令列表
//! - `wgpu` / `wgpu_modules`: 后端、着色器与管线


pub mod graph;
pub mod mesh;
pub mod particles;
pub mod terrain;
pub mod wgpu;
pub mod wgpu_modules;

pub use graph::{build_frame, FrameDesc, PolygonMode, RenderCommand, RenderGraph};
pub use mesh::{GpuMesh, MeshBuilder};
pub use particles::{ParticleStats, ParticleStream, ParticleSystem};
pub use terrain::VolcanoParams;
pub use self::wgpu::{RendererOptions, WgpuRenderer};
