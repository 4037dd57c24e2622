//! 三角网格构建与上传
//!
//! `MeshBuilder` 在 CPU 侧累积位置与法线（按属性分离的两个缓冲区），
//! `GpuMesh` 把结果一次性上传为静态顶点缓冲区。

use crate::math::{cross, normalize, Vec3};
use std::sync::Arc;
use wgpu::util::DeviceExt;

/// 每个三角形占用的浮点数（3 个顶点 × 3 个分量）
pub const FLOATS_PER_TRIANGLE: usize = 9;

/// 平面法线：`normalize((v1 - v0) × (v2 - v0))`
///
/// 退化三角形返回零向量。
pub fn compute_normal(v0: Vec3, v1: Vec3, v2: Vec3) -> Vec3 {
    normalize(cross(v1 - v0, v2 - v0))
}

/// 网格构建器
///
/// 不变量：`positions.len() == normals.len()`，且都是 9 的倍数。
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MeshBuilder {
    positions: Vec<f32>,
    normals: Vec<f32>,
}

impl MeshBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// 预分配 `triangles` 个三角形的空间
    pub fn with_capacity(triangles: usize) -> Self {
        Self {
            positions: Vec::with_capacity(triangles * FLOATS_PER_TRIANGLE),
            normals: Vec::with_capacity(triangles * FLOATS_PER_TRIANGLE),
        }
    }

    /// 追加一个三角形
    ///
    /// 顶点顺序决定法线方向：从外侧看应为逆时针。
    pub fn add_triangle(&mut self, v0: Vec3, v1: Vec3, v2: Vec3) {
        for v in [v0, v1, v2] {
            self.positions.extend_from_slice(&v.to_array());
        }
        let n = compute_normal(v0, v1, v2).to_array();
        for _ in 0..3 {
            self.normals.extend_from_slice(&n);
        }
    }

    pub fn positions(&self) -> &[f32] {
        &self.positions
    }

    pub fn normals(&self) -> &[f32] {
        &self.normals
    }

    pub fn vertex_count(&self) -> usize {
        self.positions.len() / 3
    }

    pub fn triangle_count(&self) -> usize {
        self.positions.len() / FLOATS_PER_TRIANGLE
    }

    pub fn is_empty(&self) -> bool {
        self.positions.is_empty()
    }

    /// 第 `index` 个三角形的三个顶点和法线
    pub fn triangle(&self, index: usize) -> Option<([Vec3; 3], Vec3)> {
        let base = index * FLOATS_PER_TRIANGLE;
        let p = self.positions.get(base..base + FLOATS_PER_TRIANGLE)?;
        let n = self.normals.get(base..base + 3)?;
        Some((
            [
                Vec3::from_slice(&p[0..3]),
                Vec3::from_slice(&p[3..6]),
                Vec3::from_slice(&p[6..9]),
            ],
            Vec3::from_slice(n),
        ))
    }

    /// 遍历所有三角形
    pub fn triangles(&self) -> impl Iterator<Item = ([Vec3; 3], Vec3)> + '_ {
        (0..self.triangle_count()).filter_map(move |i| self.triangle(i))
    }
}

/// 已上传到 GPU 的静态网格
///
/// 位置和法线分别位于两个平行缓冲区（着色器 location 0 / 1）。
#[derive(Clone, Debug)]
pub struct GpuMesh {
    pub position_buffer: Arc<wgpu::Buffer>,
    pub normal_buffer: Arc<wgpu::Buffer>,
    pub vertex_count: u32,
}

impl GpuMesh {
    pub fn new(device: &wgpu::Device, mesh: &MeshBuilder) -> Self {
        let position_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("Terrain Position Buffer"),
            contents: bytemuck::cast_slice(mesh.positions()),
            usage: wgpu::BufferUsages::VERTEX,
        });

        let normal_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("Terrain Normal Buffer"),
            contents: bytemuck::cast_slice(mesh.normals()),
            usage: wgpu::BufferUsages::VERTEX,
        });

        Self {
            position_buffer: Arc::new(position_buffer),
            normal_buffer: Arc::new(normal_buffer),
            vertex_count: mesh.vertex_count() as u32,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_add_triangle_appends_flat_normal() {
        let mut mesh = MeshBuilder::new();
        mesh.add_triangle(Vec3::ZERO, Vec3::X, Vec3::Y);

        assert_eq!(mesh.positions().len(), 9);
        assert_eq!(mesh.normals().len(), 9);
        assert_eq!(mesh.triangle_count(), 1);
        assert_eq!(mesh.vertex_count(), 3);
        for chunk in mesh.normals().chunks(3) {
            assert_eq!(chunk, &[0.0, 0.0, 1.0]);
        }
    }

    #[test]
    fn test_winding_flips_normal() {
        let n = compute_normal(Vec3::ZERO, Vec3::Y, Vec3::X);
        assert_eq!(n, Vec3::new(0.0, 0.0, -1.0));
    }

    #[test]
    fn test_degenerate_triangle_keeps_zero_normal() {
        let mut mesh = MeshBuilder::new();
        mesh.add_triangle(Vec3::ONE, Vec3::ONE, Vec3::new(2.0, 2.0, 2.0));
        assert!(mesh.normals().iter().all(|&v| v == 0.0));
    }

    #[test]
    fn test_triangle_accessor() {
        let mut mesh = MeshBuilder::with_capacity(2);
        mesh.add_triangle(Vec3::ZERO, Vec3::X, Vec3::Y);
        mesh.add_triangle(Vec3::ZERO, Vec3::Z, Vec3::X);

        let ([a, b, c], n) = mesh.triangle(1).unwrap();
        assert_eq!((a, b, c), (Vec3::ZERO, Vec3::Z, Vec3::X));
        assert_eq!(n, Vec3::Y);
        assert!(mesh.triangle(2).is_none());
        assert_eq!(mesh.triangles().count(), 2);
    }
}
