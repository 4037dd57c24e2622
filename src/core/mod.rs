//! 核心模块
//!
//! 包含应用的核心功能：
//! - `app` - 世界、粒子与输入的聚合状态
//! - `engine` - 主入口和运行循环
//! - `error` - 错误类型定义

pub mod app;
pub mod engine;
pub mod error;
#[macro_use]
pub mod macros;

// 重新导出错误类型
pub use error::{EngineError, EngineResult, RenderError, RenderResult};

// 重新导出主要类型
pub use app::App;
pub use engine::Engine;
