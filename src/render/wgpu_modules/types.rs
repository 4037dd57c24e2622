//! WGPU 公共类型定义
//!
//! 包含 uniform 布局与裁剪空间转换。

use glam::Mat4;

/// OpenGL 裁剪空间（z ∈ [-1, 1]）到 wgpu 裁剪空间（z ∈ [0, 1]）
#[rustfmt::skip]
pub const OPENGL_TO_WGPU_MATRIX: Mat4 = Mat4::from_cols_array(&[
    1.0, 0.0, 0.0, 0.0,
    0.0, 1.0, 0.0, 0.0,
    0.0, 0.0, 0.5, 0.0,
    0.0, 0.0, 0.5, 1.0,
]);

/// 地形 uniform：`uTransform`
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, bytemuck::Pod, bytemuck::Zeroable)]
pub struct TransformUniform {
    pub transform: [[f32; 4]; 4],
}

impl TransformUniform {
    /// 由 OpenGL 约定的变换矩阵生成，深度范围转换到 wgpu
    pub fn from_gl(transform: Mat4) -> Self {
        Self {
            transform: (OPENGL_TO_WGPU_MATRIX * transform).to_cols_array_2d(),
        }
    }
}

/// 粒子 uniform：变换矩阵、视口尺寸、每单位大小对应的像素数
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, bytemuck::Pod, bytemuck::Zeroable)]
pub struct ParticleUniforms {
    pub transform: [[f32; 4]; 4],
    pub viewport: [f32; 2],
    pub point_scale: f32,
    pub _pad: f32,
}

impl ParticleUniforms {
    pub fn new(transform: Mat4, viewport: (u32, u32), point_scale: f32) -> Self {
        Self {
            transform: TransformUniform::from_gl(transform).transform,
            viewport: [viewport.0.max(1) as f32, viewport.1.max(1) as f32],
            point_scale,
            _pad: 0.0,
        }
    }
}
