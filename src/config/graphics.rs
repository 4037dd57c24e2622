use super::{ConfigError, ConfigResult};
use crate::impl_default;
use serde::{Deserialize, Serialize};

/// 窗口配置
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct WindowConfig {
    /// 宽度（像素）
    pub width: u32,

    /// 高度（像素）
    pub height: u32,

    /// 标题
    pub title: String,

    /// 垂直同步
    pub vsync: bool,
}

impl_default!(WindowConfig {
    width: 1200,
    height: 800,
    title: "Volcano 3D".to_string(),
    vsync: true,
});

impl WindowConfig {
    /// 验证配置
    pub fn validate(&self) -> ConfigResult<()> {
        if self.width == 0 || self.height == 0 {
            return Err(ConfigError::ValidationError(
                "Invalid resolution".to_string(),
            ));
        }
        Ok(())
    }
}

/// 图形配置
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GraphicsConfig {
    /// 清屏颜色
    pub clear_color: [f32; 4],

    /// 每单位粒子大小对应的像素数
    pub point_scale: f32,

    /// 单帧最大时间步（秒）
    pub max_frame_delta: f32,
}

impl_default!(GraphicsConfig {
    clear_color: [0.2, 0.2, 0.2, 1.0],
    point_scale: 50.0,
    max_frame_delta: 0.1,
});

impl GraphicsConfig {
    /// 验证配置
    pub fn validate(&self) -> ConfigResult<()> {
        if self.point_scale <= 0.0 {
            return Err(ConfigError::ValidationError(
                "Point scale must be positive".to_string(),
            ));
        }
        if self.max_frame_delta <= 0.0 {
            return Err(ConfigError::ValidationError(
                "Max frame delta must be positive".to_string(),
            ));
        }
        Ok(())
    }
}
