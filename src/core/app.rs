//! 应用状态聚合
//!
//! `App` 持有世界（网格 + 相机）、粒子系统、输入控制器和每帧粒子流。
//! 事件处理只是把命令分发到这些部件上；与 GPU 无关，可以直接测试。

use crate::config::AppConfig;
use crate::input::{Command, InputController};
use crate::platform::InputEvent;
use crate::render::graph::{build_frame, FrameDesc, RenderGraph};
use crate::render::particles::{ParticleStats, ParticleStream, ParticleSystem, STREAM_CAPACITY};
use crate::scene::{aspect_ratio, World};

pub struct App {
    pub world: World,
    pub particles: ParticleSystem,
    controller: InputController,
    stream: ParticleStream,
    size: (u32, u32),
    quit: bool,
}

impl App {
    pub fn new(config: &AppConfig) -> Self {
        let world = World::from_config(config);
        let particles = ParticleSystem::new(&config.particles, world.params.crater_top());
        Self::with_parts(
            world,
            particles,
            InputController::new(config.input.clone()),
            (config.window.width, config.window.height),
        )
    }

    pub fn with_parts(
        world: World,
        particles: ParticleSystem,
        controller: InputController,
        size: (u32, u32),
    ) -> Self {
        Self {
            world,
            particles,
            controller,
            stream: ParticleStream::with_capacity(STREAM_CAPACITY),
            size,
            quit: false,
        }
    }

    /// 处理一个平台事件；返回已经应用的命令，便于调用方处理窗口相关的部分
    pub fn handle_event(&mut self, event: &InputEvent) -> Option<Command> {
        let command = self.controller.handle_event(event)?;
        self.apply(command);
        Some(command)
    }

    pub fn apply(&mut self, command: Command) {
        tracing::trace!(target: "input", "{:?}", command);
        match command {
            Command::Rotate { pitch, yaw } => self.world.camera.rotate(pitch, yaw),
            Command::Zoom(delta) => self.world.camera.zoom_by(delta),
            Command::Fly(delta) => self.world.camera.fly(delta),
            Command::ToggleProjection => {
                self.world.camera.toggle_projection();
            }
            Command::ToggleWireframe => {
                self.world.camera.toggle_wireframe();
            }
            Command::ToggleEmission => {
                self.particles.toggle_emitting();
            }
            Command::ClearParticles => {
                self.particles.clear();
                self.stream.clear();
            }
            Command::AdjustEmitRate(delta) => {
                self.particles.adjust_emit_rate(delta);
            }
            Command::AdjustEruptionPower(delta) => {
                self.particles.adjust_eruption_power(delta);
            }
            Command::Resize { width, height } => self.size = (width, height),
            Command::Quit => self.request_quit(),
        }
    }

    /// 推进一帧：按住的按键 → 粒子模拟 → 重建粒子流
    pub fn update(&mut self, dt: f32) {
        for command in self.controller.held_commands() {
            self.apply(command);
        }
        self.particles.update(dt);
        self.particles.write_stream(&mut self.stream);
    }

    pub fn frame_graph(&self, clear_color: [f32; 4]) -> RenderGraph {
        build_frame(
            &self.world.camera,
            &FrameDesc {
                clear_color,
                aspect: self.aspect(),
                terrain_vertices: self.world.vertex_count(),
                particle_instances: self.stream.len() as u32,
            },
        )
    }

    pub fn stream(&self) -> &ParticleStream {
        &self.stream
    }

    pub fn stats(&self) -> ParticleStats {
        self.particles.stats()
    }

    pub fn size(&self) -> (u32, u32) {
        self.size
    }

    pub fn aspect(&self) -> f32 {
        aspect_ratio(self.size.0, self.size.1)
    }

    pub fn request_quit(&mut self) {
        if !self.quit {
            tracing::info!(target: "engine", "Quit requested");
        }
        self.quit = true;
    }

    pub fn should_quit(&self) -> bool {
        self.quit
    }
}
