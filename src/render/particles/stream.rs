//! 每帧重建的粒子顶点流

use super::emitter::Particle;

/// 每个粒子打包的浮点数：`[x, y, z, size, r, g, b, a]`
pub const FLOATS_PER_PARTICLE: usize = 8;

/// GPU 粒子顶点（对应 WGSL 中 location 0/1/2）
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, bytemuck::Pod, bytemuck::Zeroable)]
pub struct ParticleVertex {
    /// 位置
    pub position: [f32; 3],
    /// 大小
    pub size: f32,
    /// 颜色
    pub color: [f32; 4],
}

impl From<&Particle> for ParticleVertex {
    fn from(p: &Particle) -> Self {
        Self {
            position: p.position.to_array(),
            size: p.size,
            color: p.color.to_array(),
        }
    }
}

impl ParticleVertex {
    pub fn vertex_buffer_layout<'a>() -> wgpu::VertexBufferLayout<'a> {
        const ATTRIBUTES: [wgpu::VertexAttribute; 3] = wgpu::vertex_attr_array![
            0 => Float32x3,
            1 => Float32,
            2 => Float32x4,
        ];
        wgpu::VertexBufferLayout {
            array_stride: std::mem::size_of::<ParticleVertex>() as wgpu::BufferAddress,
            step_mode: wgpu::VertexStepMode::Instance,
            attributes: &ATTRIBUTES,
        }
    }
}

/// 预分配的粒子流
///
/// 容量固定为两个粒子池之和，每帧清空后重新填充，不产生新的分配。
#[derive(Debug, Clone)]
pub struct ParticleStream {
    vertices: Vec<ParticleVertex>,
    capacity: usize,
}

impl ParticleStream {
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            vertices: Vec::with_capacity(capacity),
            capacity,
        }
    }

    pub fn clear(&mut self) {
        self.vertices.clear();
    }

    /// 追加一个粒子；超出容量时丢弃
    pub fn push(&mut self, particle: &Particle) {
        if self.vertices.len() < self.capacity {
            self.vertices.push(ParticleVertex::from(particle));
        }
    }

    pub fn len(&self) -> usize {
        self.vertices.len()
    }

    pub fn is_empty(&self) -> bool {
        self.vertices.is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn vertices(&self) -> &[ParticleVertex] {
        &self.vertices
    }

    /// 按 `[x, y, z, size, r, g, b, a]` 排列的扁平视图
    pub fn as_floats(&self) -> &[f32] {
        bytemuck::cast_slice(&self.vertices)
    }

    pub fn as_bytes(&self) -> &[u8] {
        bytemuck::cast_slice(&self.vertices)
    }
}
