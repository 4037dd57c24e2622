use super::{ConfigError, ConfigResult};
use crate::impl_default;
use serde::{Deserialize, Serialize};

/// 熔岩粒子池容量
pub const MAX_LAVA: usize = 3000;
/// 烟雾粒子池容量
pub const MAX_SMOKE: usize = 1500;

/// 发射速率上限（粒子/秒）
pub const MAX_EMIT_RATE: u32 = 5000;
/// 喷发强度范围
pub const MIN_ERUPTION_POWER: f32 = 0.1;
pub const MAX_ERUPTION_POWER: f32 = 5.0;

/// 粒子模拟配置
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ParticleConfig {
    /// 是否启动时即开始喷发
    pub emitting: bool,

    /// 基础熔岩发射速率（粒子/秒）
    pub base_emit_rate: u32,

    /// 喷发强度
    pub eruption_power: f32,

    /// 熔岩粒子大小全局倍率
    pub global_size_mul: f32,

    /// 地面高度（熔岩碰撞平面）
    pub ground_level: f32,

    /// 火山口位置，缺省时取锥顶
    #[serde(skip_serializing_if = "Option::is_none")]
    pub crater: Option<[f32; 3]>,

    /// 随机种子，缺省时随机
    #[serde(skip_serializing_if = "Option::is_none")]
    pub seed: Option<u64>,
}

impl_default!(ParticleConfig {
    emitting: true,
    base_emit_rate: 300,
    eruption_power: 1.0,
    global_size_mul: 1.0,
    ground_level: -0.5,
    crater: None,
    seed: None,
});

impl ParticleConfig {
    /// 验证配置
    pub fn validate(&self) -> ConfigResult<()> {
        if self.base_emit_rate > MAX_EMIT_RATE {
            return Err(ConfigError::ValidationError(format!(
                "Emit rate must not exceed {}",
                MAX_EMIT_RATE
            )));
        }
        if !(MIN_ERUPTION_POWER..=MAX_ERUPTION_POWER).contains(&self.eruption_power) {
            return Err(ConfigError::ValidationError(format!(
                "Eruption power must lie in [{}, {}]",
                MIN_ERUPTION_POWER, MAX_ERUPTION_POWER
            )));
        }
        if self.global_size_mul <= 0.0 {
            return Err(ConfigError::ValidationError(
                "Particle size multiplier must be positive".to_string(),
            ));
        }
        Ok(())
    }
}
