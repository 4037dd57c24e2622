//! 统一错误处理模块
//!
//! 只有初始化失败是致命的；模拟中的问题（池满、退化几何）被静默吸收。

use crate::config::ConfigError;
use thiserror::Error;

/// 应用核心错误类型
#[derive(Error, Debug)]
pub enum EngineError {
    #[error("Render error: {0}")]
    Render(#[from] RenderError),

    #[error("Config error: {0}")]
    Config(#[from] ConfigError),

    #[error("Window creation failed: {0}")]
    Window(String),

    #[error("Event loop error: {0}")]
    EventLoop(String),
}

/// 渲染系统错误
#[derive(Error, Debug, Clone)]
pub enum RenderError {
    #[error("Failed to create surface: {0}")]
    SurfaceCreation(String),

    #[error("Failed to request adapter: no compatible GPU found")]
    NoAdapter,

    #[error("Failed to request device: {0}")]
    DeviceRequest(String),

    #[error("Failed to create shader: {0}")]
    ShaderCompilation(String),

    #[error("Failed to create pipeline: {0}")]
    PipelineCreation(String),

    #[error("Surface error: {0}")]
    Surface(String),
}

impl From<winit::error::EventLoopError> for EngineError {
    fn from(err: winit::error::EventLoopError) -> Self {
        EngineError::EventLoop(err.to_string())
    }
}

/// 结果类型别名
pub type EngineResult<T> = Result<T, EngineError>;
pub type RenderResult<T> = Result<T, RenderError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = EngineError::from(RenderError::NoAdapter);
        assert_eq!(
            err.to_string(),
            "Render error: Failed to request adapter: no compatible GPU found"
        );

        let err = EngineError::from(ConfigError::ValidationError("bad".to_string()));
        assert_eq!(
            err.to_string(),
            "Config error: Config validation error: bad"
        );
    }

    #[test]
    fn test_window_and_event_loop_display() {
        let err = EngineError::Window("no display".to_string());
        assert_eq!(err.to_string(), "Window creation failed: no display");

        let err = EngineError::EventLoop("already running".to_string());
        assert_eq!(err.to_string(), "Event loop error: already running");
    }
}
