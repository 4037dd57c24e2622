//! 场景
//!
//! 静态火山网格与相机组成的世界。

pub mod camera;

pub use camera::{aspect_ratio, Camera};

use crate::config::AppConfig;
use crate::render::mesh::MeshBuilder;
use crate::render::terrain::{self, VolcanoParams};

/// 世界：一次性生成的地形网格加相机
#[derive(Debug, Clone)]
pub struct World {
    pub params: VolcanoParams,
    pub mesh: MeshBuilder,
    pub camera: Camera,
}

impl World {
    pub fn new(params: VolcanoParams, camera: Camera) -> Self {
        let mesh = terrain::generate_scene_mesh(&params);
        tracing::info!(
            target: "engine",
            "Volcano mesh generated: {} triangles",
            mesh.triangle_count()
        );
        Self {
            params,
            mesh,
            camera,
        }
    }

    pub fn from_config(config: &AppConfig) -> Self {
        Self::new(config.volcano.clone(), Camera::from_config(&config.camera))
    }

    /// 地形绘制的顶点数
    pub fn vertex_count(&self) -> u32 {
        self.mesh.vertex_count() as u32
    }
}

impl Default for World {
    fn default() -> Self {
        Self::new(VolcanoParams::default(), Camera::default())
    }
}
