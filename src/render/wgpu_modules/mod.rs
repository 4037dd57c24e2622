//! WGPU 渲染模块
//!
//! ## 模块结构
//!
//! - `types`: uniform 布局与裁剪空间转换
//! - `buffer`: 动态粒子缓冲区与 uniform 绑定
//! - `pipeline`: 着色器与渲染管线创建
//!
//! ## 使用方式
//!
//! ```ignore
//! use crate::render::wgpu_modules::{PipelineBuilder, DynamicParticleBuffer};
//! ```

pub mod buffer;
pub mod pipeline;
pub mod types;

// 重导出主要类型
pub use buffer::{DynamicParticleBuffer, UniformBinding};
pub use pipeline::{
    PipelineBuilder, DEPTH_FORMAT, PARTICLE_QUAD_VERTICES, PARTICLE_SHADER, TERRAIN_SHADER,
};
pub use types::{ParticleUniforms, TransformUniform, OPENGL_TO_WGPU_MATRIX};
