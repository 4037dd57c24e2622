//! 统一配置系统
//!
//! 提供TOML/JSON配置文件与环境变量覆盖
use serde::{Deserialize, Serialize};
use std::env;
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

pub mod camera;
pub mod graphics;
pub mod input;
pub mod simulation;

pub use camera::CameraConfig;
pub use graphics::{GraphicsConfig, WindowConfig};
pub use input::InputConfig;
pub use simulation::ParticleConfig;

use crate::render::terrain::VolcanoParams;

/// 指定配置文件路径的环境变量
pub const CONFIG_PATH_ENV: &str = "VOLCANO_CONFIG";

/// 配置错误
#[derive(Error, Debug)]
pub enum ConfigError {
    /// 文件读取错误
    #[error("Config file error: {0}")]
    FileError(#[from] std::io::Error),
    /// 解析错误
    #[error("Config parse error: {0}")]
    ParseError(String),
    /// 验证错误
    #[error("Config validation error: {0}")]
    ValidationError(String),
}

pub type ConfigResult<T> = Result<T, ConfigError>;

/// 应用主配置
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    /// 窗口配置
    pub window: WindowConfig,

    /// 图形配置
    pub graphics: GraphicsConfig,

    /// 火山几何参数
    pub volcano: VolcanoParams,

    /// 相机配置
    pub camera: CameraConfig,

    /// 粒子配置
    pub particles: ParticleConfig,

    /// 输入配置
    pub input: InputConfig,

    /// 日志配置
    pub logging: LoggingConfig,
}

impl AppConfig {
    /// 创建默认配置
    pub fn new() -> Self {
        Self::default()
    }

    /// 从TOML文件加载配置
    pub fn from_toml_file<P: AsRef<Path>>(path: P) -> ConfigResult<Self> {
        let content = fs::read_to_string(path).map_err(ConfigError::FileError)?;
        Self::from_toml_str(&content)
    }

    /// 从TOML字符串解析配置
    pub fn from_toml_str(content: &str) -> ConfigResult<Self> {
        toml::from_str(content).map_err(|e| ConfigError::ParseError(e.to_string()))
    }

    /// 从JSON文件加载配置
    pub fn from_json_file<P: AsRef<Path>>(path: P) -> ConfigResult<Self> {
        let content = fs::read_to_string(path).map_err(ConfigError::FileError)?;
        Self::from_json_str(&content)
    }

    /// 从JSON字符串解析配置
    pub fn from_json_str(content: &str) -> ConfigResult<Self> {
        serde_json::from_str(content).map_err(|e| ConfigError::ParseError(e.to_string()))
    }

    /// 按扩展名加载（`.json` 为 JSON，其余按 TOML）
    pub fn from_file<P: AsRef<Path>>(path: P) -> ConfigResult<Self> {
        let path = path.as_ref();
        match path.extension().and_then(|ext| ext.to_str()) {
            Some("json") => Self::from_json_file(path),
            _ => Self::from_toml_file(path),
        }
    }

    /// 保存为TOML文件
    pub fn save_toml<P: AsRef<Path>>(&self, path: P) -> ConfigResult<()> {
        let content =
            toml::to_string_pretty(self).map_err(|e| ConfigError::ParseError(e.to_string()))?;
        fs::write(path, content).map_err(ConfigError::FileError)
    }

    /// 保存为JSON文件
    pub fn save_json<P: AsRef<Path>>(&self, path: P) -> ConfigResult<()> {
        let content = serde_json::to_string_pretty(self)
            .map_err(|e| ConfigError::ParseError(e.to_string()))?;
        fs::write(path, content).map_err(ConfigError::FileError)
    }

    /// 从环境变量覆盖配置
    pub fn apply_env_overrides(&mut self) {
        self.apply_overrides(|key| env::var(key).ok());
    }

    /// 以任意键值来源覆盖配置，无法解析的值被忽略
    pub fn apply_overrides<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        // 窗口
        if let Some(width) = lookup("VOLCANO_WIDTH").and_then(|v| v.parse().ok()) {
            self.window.width = width;
        }
        if let Some(height) = lookup("VOLCANO_HEIGHT").and_then(|v| v.parse().ok()) {
            self.window.height = height;
        }
        if let Some(vsync) = lookup("VOLCANO_VSYNC").and_then(|v| v.parse().ok()) {
            self.window.vsync = vsync;
        }

        // 粒子
        if let Some(rate) = lookup("VOLCANO_EMIT_RATE").and_then(|v| v.parse().ok()) {
            self.particles.base_emit_rate = rate;
        }
        if let Some(power) = lookup("VOLCANO_ERUPTION_POWER").and_then(|v| v.parse().ok()) {
            self.particles.eruption_power = power;
        }
        if let Some(seed) = lookup("VOLCANO_SEED").and_then(|v| v.parse().ok()) {
            self.particles.seed = Some(seed);
        }

        // 日志
        if let Some(level) = lookup("VOLCANO_LOG").and_then(|v| LogLevel::parse(&v)) {
            self.logging.level = level;
        }
    }

    /// 验证配置
    pub fn validate(&self) -> ConfigResult<()> {
        self.window.validate()?;
        self.graphics.validate()?;
        self.volcano.validate()?;
        self.camera.validate()?;
        self.particles.validate()?;
        self.input.validate()?;
        Ok(())
    }

    /// 候选配置文件路径
    ///
    /// 按以下顺序查找：
    /// 1. `$VOLCANO_CONFIG`
    /// 2. ./volcano.toml
    /// 3. ./volcano.json
    /// 4. `<config_dir>/volcano/config.toml`
    pub fn candidate_paths() -> Vec<PathBuf> {
        let mut paths = Vec::with_capacity(4);
        if let Some(path) = env::var_os(CONFIG_PATH_ENV) {
            paths.push(PathBuf::from(path));
        }
        paths.push(PathBuf::from("volcano.toml"));
        paths.push(PathBuf::from("volcano.json"));
        if let Some(dir) = dirs::config_dir() {
            paths.push(dir.join("volcano").join("config.toml"));
        }
        paths
    }

    /// 自动查找并加载配置文件，返回配置与其来源
    ///
    /// 找不到或无法解析时使用默认配置；来源为 `None`。
    pub fn load_with_source() -> (Self, Option<PathBuf>) {
        for path in Self::candidate_paths() {
            if let Ok(config) = Self::from_file(&path) {
                return (config, Some(path));
            }
        }
        (Self::default(), None)
    }

    /// 自动查找并加载配置文件
    pub fn load_or_default() -> Self {
        Self::load_with_source().0
    }
}

/// 日志配置
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// 日志级别
    pub level: LogLevel,
}

use crate::impl_default;

impl_default!(LoggingConfig {
    level: LogLevel::Info,
});

/// 日志级别
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum LogLevel {
    /// 跟踪
    Trace,
    /// 调试
    Debug,
    /// 信息
    Info,
    /// 警告
    Warn,
    /// 错误
    Error,
}

impl LogLevel {
    /// 解析不区分大小写的级别名
    pub fn parse(value: &str) -> Option<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "trace" => Some(Self::Trace),
            "debug" => Some(Self::Debug),
            "info" => Some(Self::Info),
            "warn" | "warning" => Some(Self::Warn),
            "error" => Some(Self::Error),
            _ => None,
        }
    }

    /// `EnvFilter` 指令
    pub fn as_directive(&self) -> &'static str {
        match self {
            Self::Trace => "trace",
            Self::Debug => "debug",
            Self::Info => "info",
            Self::Warn => "warn",
            Self::Error => "error",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    #[test]
    fn test_default_config() {
        let config = AppConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.window.width, 1200);
        assert_eq!(config.window.height, 800);
        assert_eq!(config.window.title, "Volcano 3D");
        assert_eq!(config.particles.base_emit_rate, 300);
    }

    #[test]
    fn test_toml_serialization() {
        let config = AppConfig::default();
        let toml_str = toml::to_string(&config).unwrap();
        let parsed: AppConfig = toml::from_str(&toml_str).unwrap();
        assert_eq!(config, parsed);
    }

    #[test]
    fn test_json_serialization() {
        let mut config = AppConfig::default();
        config.particles.seed = Some(7);
        let json_str = serde_json::to_string(&config).unwrap();
        let parsed: AppConfig = serde_json::from_str(&json_str).unwrap();
        assert_eq!(config, parsed);
    }

    #[test]
    fn test_partial_toml_uses_defaults() {
        let config = AppConfig::from_toml_str(
            r#"
            [window]
            width = 640

            [particles]
            eruption_power = 2.5
            "#,
        )
        .unwrap();
        assert_eq!(config.window.width, 640);
        assert_eq!(config.window.height, 800);
        assert_eq!(config.particles.eruption_power, 2.5);
        assert_eq!(config.volcano, VolcanoParams::default());
    }

    #[test]
    fn test_invalid_toml_is_parse_error() {
        let err = AppConfig::from_toml_str("window = 3").unwrap_err();
        assert!(matches!(err, ConfigError::ParseError(_)));
    }

    #[test]
    fn test_file_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let mut config = AppConfig::default();
        config.camera.zoom = 2.0;
        config.logging.level = LogLevel::Debug;

        let toml_path = dir.path().join("volcano.toml");
        config.save_toml(&toml_path).unwrap();
        assert_eq!(AppConfig::from_file(&toml_path).unwrap(), config);

        let json_path = dir.path().join("volcano.json");
        config.save_json(&json_path).unwrap();
        assert_eq!(AppConfig::from_file(&json_path).unwrap(), config);
    }

    #[test]
    fn test_missing_file_is_file_error() {
        let dir = tempfile::tempdir().unwrap();
        let err = AppConfig::from_toml_file(dir.path().join("absent.toml")).unwrap_err();
        assert!(matches!(err, ConfigError::FileError(_)));
    }

    #[test]
    fn test_overrides() {
        let vars: HashMap<&str, &str> = [
            ("VOLCANO_WIDTH", "800"),
            ("VOLCANO_HEIGHT", "not-a-number"),
            ("VOLCANO_VSYNC", "false"),
            ("VOLCANO_EMIT_RATE", "1000"),
            ("VOLCANO_ERUPTION_POWER", "3.5"),
            ("VOLCANO_SEED", "42"),
            ("VOLCANO_LOG", "WARN"),
        ]
        .into_iter()
        .collect();

        let mut config = AppConfig::default();
        config.apply_overrides(|key| vars.get(key).map(|v| v.to_string()));

        assert_eq!(config.window.width, 800);
        assert_eq!(config.window.height, 800);
        assert!(!config.window.vsync);
        assert_eq!(config.particles.base_emit_rate, 1000);
        assert_eq!(config.particles.eruption_power, 3.5);
        assert_eq!(config.particles.seed, Some(42));
        assert_eq!(config.logging.level, LogLevel::Warn);
    }

    #[test]
    fn test_validation_rejects_bad_sections() {
        let mut config = AppConfig::default();
        config.window.width = 0;
        assert!(config.validate().is_err());

        let mut config = AppConfig::default();
        config.camera.zoom = 9.0;
        assert!(config.validate().is_err());

        let mut config = AppConfig::default();
        config.particles.eruption_power = 0.0;
        assert!(config.validate().is_err());

        let mut config = AppConfig::default();
        config.volcano.base_segments = 2;
        assert!(config.validate().is_err());

        let mut config = AppConfig::default();
        config.camera.up = [0.0, -1.0, -3.0];
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_log_level_parse() {
        assert_eq!(LogLevel::parse("Trace"), Some(LogLevel::Trace));
        assert_eq!(LogLevel::parse(" warning "), Some(LogLevel::Warn));
        assert_eq!(LogLevel::parse("loud"), None);
        assert_eq!(LogLevel::Error.as_directive(), "error");
    }
}
