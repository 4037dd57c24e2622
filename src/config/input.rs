use super::{ConfigError, ConfigResult};
use crate::impl_default;
use serde::{Deserialize, Serialize};

/// 输入配置
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct InputConfig {
    /// 鼠标拖动灵敏度（弧度/像素）
    pub mouse_sensitivity: f32,

    /// 滚轮缩放步长
    pub wheel_zoom_step: f32,

    /// 按住按键时每帧移动距离
    pub move_speed: f32,

    /// 按住方向键时每帧旋转角度
    pub rotate_speed: f32,

    /// 按住 +/- 时每帧缩放量
    pub zoom_speed: f32,

    /// 发射速率调整步长
    pub emit_rate_step: u32,

    /// 喷发强度调整步长
    pub power_step: f32,
}

impl_default!(InputConfig {
    mouse_sensitivity: 0.01,
    wheel_zoom_step: 0.1,
    move_speed: 0.01,
    rotate_speed: 0.01,
    zoom_speed: 0.01,
    emit_rate_step: 50,
    power_step: 0.1,
});

impl InputConfig {
    /// 验证配置
    pub fn validate(&self) -> ConfigResult<()> {
        if self.mouse_sensitivity < 0.0
            || self.wheel_zoom_step < 0.0
            || self.move_speed < 0.0
            || self.rotate_speed < 0.0
            || self.zoom_speed < 0.0
            || self.power_step < 0.0
        {
            return Err(ConfigError::ValidationError(
                "Input steps must not be negative".to_string(),
            ));
        }
        Ok(())
    }
}
