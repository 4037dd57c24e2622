use super::{ConfigError, ConfigResult};
use crate::impl_default;
use serde::{Deserialize, Serialize};

/// 缩放范围
pub const MIN_ZOOM: f32 = 0.1;
pub const MAX_ZOOM: f32 = 5.0;
/// 俯仰角上限（弧度）
pub const MAX_PITCH: f32 = 1.5;

/// 相机初始状态
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CameraConfig {
    /// 初始俯仰角（弧度）
    pub rotation_x: f32,

    /// 初始偏航角（弧度）
    pub rotation_y: f32,

    /// 眼睛位置
    pub eye: [f32; 3],

    /// 观察中心
    pub center: [f32; 3],

    /// 上方向
    pub up: [f32; 3],

    /// 缩放
    pub zoom: f32,

    /// 透视投影（否则正交）
    pub perspective: bool,

    /// 线框模式
    pub wireframe: bool,
}

impl_default!(CameraConfig {
    rotation_x: 0.2,
    rotation_y: 0.0,
    eye: [0.0, 4.0, 12.0],
    center: [0.0, 0.0, 0.0],
    up: [0.0, 1.0, 0.0],
    zoom: 1.0,
    perspective: true,
    wireframe: false,
});

impl CameraConfig {
    /// 验证配置
    pub fn validate(&self) -> ConfigResult<()> {
        if !(MIN_ZOOM..=MAX_ZOOM).contains(&self.zoom) {
            return Err(ConfigError::ValidationError(format!(
                "Zoom must lie in [{}, {}]",
                MIN_ZOOM, MAX_ZOOM
            )));
        }
        if self.rotation_x.abs() > MAX_PITCH {
            return Err(ConfigError::ValidationError(
                "Initial pitch exceeds 1.5 rad".to_string(),
            ));
        }
        let forward = glam::Vec3::from(self.center) - glam::Vec3::from(self.eye);
        if forward.length() <= f32::EPSILON {
            return Err(ConfigError::ValidationError(
                "Camera eye and center coincide".to_string(),
            ));
        }
        if forward.normalize().cross(glam::Vec3::from(self.up)).length() <= 1e-4 {
            return Err(ConfigError::ValidationError(
                "Camera up vector is parallel to the view direction".to_string(),
            ));
        }
        Ok(())
    }
}
