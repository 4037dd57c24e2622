//! 输入映射
//!
//! 把平台输入事件翻译成对相机、渲染模式和粒子系统的命令。

pub mod controller;

pub use controller::InputController;

use glam::Vec3;

/// 应用层命令
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Command {
    /// 旋转相机（弧度）
    Rotate { pitch: f32, yaw: f32 },
    /// 调整缩放
    Zoom(f32),
    /// 平移眼睛位置
    Fly(Vec3),
    ToggleProjection,
    ToggleWireframe,
    ToggleEmission,
    ClearParticles,
    /// 调整基础发射速率
    AdjustEmitRate(i32),
    /// 调整喷发强度
    AdjustEruptionPower(f32),
    /// 帧缓冲尺寸变化
    Resize { width: u32, height: u32 },
    /// 请求退出
    Quit,
}
