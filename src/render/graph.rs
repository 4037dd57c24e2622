//! 每帧渲染命令列表
//!
//! 与 GPU 无关：先构建命令，再由后端按顺序执行。

use crate::scene::Camera;
use glam::Mat4;

/// 多边形填充模式
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PolygonMode {
    #[default]
    Fill,
    Line,
}

impl From<PolygonMode> for wgpu::PolygonMode {
    fn from(mode: PolygonMode) -> Self {
        match mode {
            PolygonMode::Fill => wgpu::PolygonMode::Fill,
            PolygonMode::Line => wgpu::PolygonMode::Line,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum RenderCommand {
    /// 清除颜色与深度
    Clear { color: [f32; 4] },
    SetPolygonMode(PolygonMode),
    /// 地形三角形
    DrawTerrain { transform: Mat4, vertex_count: u32 },
    /// 粒子实例
    DrawParticles { transform: Mat4, instance_count: u32 },
}

#[derive(Debug, Default, Clone, PartialEq)]
pub struct RenderGraph {
    pub commands: Vec<RenderCommand>,
}

impl RenderGraph {
    /// 本帧设置的多边形模式
    pub fn polygon_mode(&self) -> Option<PolygonMode> {
        self.commands.iter().find_map(|c| match c {
            RenderCommand::SetPolygonMode(mode) => Some(*mode),
            _ => None,
        })
    }

    pub fn draw_count(&self) -> usize {
        self.commands
            .iter()
            .filter(|c| {
                matches!(
                    c,
                    RenderCommand::DrawTerrain { .. } | RenderCommand::DrawParticles { .. }
                )
            })
            .count()
    }
}

/// 帧输入
#[derive(Debug, Clone, Copy)]
pub struct FrameDesc {
    pub clear_color: [f32; 4],
    pub aspect: f32,
    pub terrain_vertices: u32,
    pub particle_instances: u32,
}

/// 按固定顺序构建一帧：清屏、多边形模式、地形、粒子
pub fn build_frame(camera: &Camera, desc: &FrameDesc) -> RenderGraph {
    let transform = camera.transform(desc.aspect);
    let mode = if camera.is_wireframe {
        PolygonMode::Line
    } else {
        PolygonMode::Fill
    };

    let mut g = RenderGraph::default();
    g.commands.push(RenderCommand::Clear {
        color: desc.clear_color,
    });
    g.commands.push(RenderCommand::SetPolygonMode(mode));
    if desc.terrain_vertices > 0 {
        g.commands.push(RenderCommand::DrawTerrain {
            transform,
            vertex_count: desc.terrain_vertices,
        });
    }
    if desc.particle_instances > 0 {
        g.commands.push(RenderCommand::DrawParticles {
            transform,
            instance_count: desc.particle_instances,
        });
    }
    g
}
