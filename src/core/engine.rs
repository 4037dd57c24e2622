//! 引擎主入口
//!
//! 定义Engine结构和主运行循环

use crate::config::{AppConfig, GraphicsConfig, LogLevel};
use crate::input::Command;
use crate::platform::{EventTranslator, Window, WinitWindow};
use crate::render::particles::STREAM_CAPACITY;
use crate::render::wgpu::{RendererOptions, WgpuRenderer};
use std::time::{Duration, Instant};
use winit::event::{Event, WindowEvent};
use winit::event_loop::{ControlFlow, EventLoop};

use super::app::App;
use super::error::{EngineError, EngineResult};

/// 窗口标题中统计信息的刷新间隔
const TITLE_REFRESH: Duration = Duration::from_secs(1);

/// 火山查看器主结构
///
/// 负责创建窗口与渲染器并驱动主循环。每帧的顺序固定：
/// 输入 → 粒子更新 → 绘制地形 → 绘制粒子 → 呈现。
///
/// # 示例
///
/// ```no_run
/// use volcano_viewer::config::AppConfig;
/// use volcano_viewer::core::Engine;
///
/// fn main() -> Result<(), Box<dyn std::error::Error>> {
///     Engine::run(AppConfig::default())?;
///     Ok(())
/// }
/// ```
pub struct Engine;

impl Engine {
    /// 运行主循环，直到窗口关闭或按下 Esc
    ///
    /// # 错误
    ///
    /// 事件循环、窗口、适配器、设备或着色器初始化失败时返回错误；
    /// 运行中出现的致命渲染错误（显存耗尽）也会在循环结束后返回。
    pub fn run(config: AppConfig) -> EngineResult<()> {
        tracing::info!(target: "engine", "Engine starting");

        let event_loop = EventLoop::new()?;
        event_loop.set_control_flow(ControlFlow::Poll);

        let window = WinitWindow::new(&event_loop, &config.window)?;
        let (width, height) = window.size();
        tracing::info!(
            target: "engine",
            "Window created: {}x{} (scale {:.2})",
            width,
            height,
            window.scale_factor()
        );
        let mut app = App::new(&config);

        let options = RendererOptions {
            vsync: config.window.vsync,
            point_scale: config.graphics.point_scale,
            particle_capacity: STREAM_CAPACITY as u32,
        };
        let renderer = pollster::block_on(WgpuRenderer::new(
            window.handle(),
            &app.world.mesh,
            options,
        ))?;

        app.apply(Command::Resize { width, height });

        Self::run_event_loop(event_loop, window, app, renderer, &config.graphics)?;

        tracing::info!(target: "engine", "Engine shutting down");
        Ok(())
    }

    /// 初始化日志系统
    ///
    /// `RUST_LOG` 优先，否则使用配置的日志级别。
    pub fn initialize_logging(level: LogLevel) {
        let filter = tracing_subscriber::EnvFilter::try_from_default_env()
            .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(level.as_directive()));
        let _ = tracing_subscriber::fmt().with_env_filter(filter).try_init();
    }

    fn run_event_loop(
        event_loop: EventLoop<()>,
        window: WinitWindow,
        mut app: App,
        mut renderer: WgpuRenderer,
        graphics: &GraphicsConfig,
    ) -> EngineResult<()> {
        let mut translator = EventTranslator::new();
        let mut last_frame = Instant::now();
        let mut last_title = Instant::now();
        let mut frames: u32 = 0;
        let mut failure: Option<EngineError> = None;
        let base_title = window.raw().title();

        let result = event_loop.run(|event, elwt| {
            match event {
                Event::WindowEvent {
                    event: WindowEvent::RedrawRequested,
                    ..
                } => {
                    let now = Instant::now();
                    let dt = now
                        .duration_since(last_frame)
                        .as_secs_f32()
                        .min(graphics.max_frame_delta);
                    last_frame = now;

                    app.update(dt);
                    let graph = app.frame_graph(graphics.clear_color);
                    if let Err(e) = renderer.render(&graph, app.stream()) {
                        tracing::error!(target: "render", "Render failed: {}", e);
                        failure = Some(e.into());
                        app.request_quit();
                    }

                    frames += 1;
                    let elapsed = now.duration_since(last_title);
                    if elapsed >= TITLE_REFRESH {
                        let stats = app.stats();
                        let fps = frames as f32 / elapsed.as_secs_f32();
                        window.set_title(&format!(
                            "{} | {:.0} fps | lava {} | smoke {}",
                            base_title, fps, stats.alive_lava, stats.alive_smoke
                        ));
                        tracing::debug!(target: "particles", "{:?}", stats);
                        frames = 0;
                        last_title = now;
                    }
                }
                Event::WindowEvent { event, .. } => {
                    if let Some(input) = translator.translate(&event) {
                        if let Some(Command::Resize { width, height }) = app.handle_event(&input)
                        {
                            renderer.resize(width, height);
                        }
                    }
                }
                Event::AboutToWait => window.request_redraw(),
                _ => {}
            }

            if app.should_quit() {
                elwt.exit();
            }
        });

        result?;
        match failure {
            Some(e) => Err(e),
            None => Ok(()),
        }
    }
}
