//! WGPU 缓冲区管理
//!
//! 静态网格之外的每帧动态数据：粒子实例与 uniform。

use crate::render::particles::{ParticleStream, ParticleVertex};
use wgpu::util::DeviceExt;

/// 预分配的粒子实例缓冲区
///
/// 每帧整体重写（stream-draw），容量固定，不随帧重新创建。
pub struct DynamicParticleBuffer {
    buffer: wgpu::Buffer,
    /// 容量（实例数）
    capacity: u32,
    /// 当前实例数
    count: u32,
}

impl DynamicParticleBuffer {
    pub fn new(device: &wgpu::Device, capacity: u32) -> Self {
        let size = (capacity.max(1) as usize * std::mem::size_of::<ParticleVertex>())
            as wgpu::BufferAddress;
        let buffer = device.create_buffer(&wgpu::BufferDescriptor {
            label: Some("Particle Instance Buffer"),
            size,
            usage: wgpu::BufferUsages::VERTEX | wgpu::BufferUsages::COPY_DST,
            mapped_at_creation: false,
        });
        Self {
            buffer,
            capacity,
            count: 0,
        }
    }

    /// 上传粒子流，超出容量的部分被截断；返回实例数
    pub fn upload(&mut self, queue: &wgpu::Queue, stream: &ParticleStream) -> u32 {
        let vertices = stream.vertices();
        let count = vertices.len().min(self.capacity as usize);
        if count > 0 {
            queue.write_buffer(&self.buffer, 0, bytemuck::cast_slice(&vertices[..count]));
        }
        self.count = count as u32;
        self.count
    }

    pub fn buffer(&self) -> &wgpu::Buffer {
        &self.buffer
    }

    pub fn capacity(&self) -> u32 {
        self.capacity
    }

    pub fn count(&self) -> u32 {
        self.count
    }
}

/// uniform 缓冲区及其绑定组
pub struct UniformBinding {
    pub buffer: wgpu::Buffer,
    pub bind_group: wgpu::BindGroup,
}

impl UniformBinding {
    pub fn new<T: bytemuck::Pod>(
        device: &wgpu::Device,
        layout: &wgpu::BindGroupLayout,
        label: &str,
        initial: &T,
    ) -> Self {
        let buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some(label),
            contents: bytemuck::bytes_of(initial),
            usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
        });
        let bind_group = device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some(label),
            layout,
            entries: &[wgpu::BindGroupEntry {
                binding: 0,
                resource: buffer.as_entire_binding(),
            }],
        });
        Self { buffer, bind_group }
    }

    pub fn write<T: bytemuck::Pod>(&self, queue: &wgpu::Queue, value: &T) {
        queue.write_buffer(&self.buffer, 0, bytemuck::bytes_of(value));
    }
}
