//! 默认按键绑定
//!
//! | 输入 | 命令 |
//! |---|---|
//! | 左键拖动 | 旋转 |
//! | 滚轮 | 缩放 |
//! | W/S/A/D/R/F（按住） | 平移眼睛 |
//! | 方向键（按住） | 旋转：上/下俯仰 ±，左/右偏航 ± |
//! | `=` / `-`（按住，无 Shift） | 缩放 |
//! | P / M / Space / C | 投影 / 线框 / 喷发 / 清空 |
//! | Shift+`=` / Shift+`-`，小键盘 `+` / `-` | 发射速率 |
//! | `[` / `]` | 喷发强度 |
//! | Esc | 退出 |

use super::Command;
use crate::config::InputConfig;
use crate::platform::{InputEvent, KeyCode, Modifiers, MouseButton};
use glam::Vec3;
use std::collections::HashSet;

/// 输入控制器
#[derive(Debug, Clone)]
pub struct InputController {
    config: InputConfig,
    held: HashSet<KeyCode>,
    modifiers: Modifiers,
    dragging: bool,
    last_cursor: Option<(f32, f32)>,
}

impl Default for InputController {
    fn default() -> Self {
        Self::new(InputConfig::default())
    }
}

impl InputController {
    pub fn new(config: InputConfig) -> Self {
        Self {
            config,
            held: HashSet::new(),
            modifiers: Modifiers::default(),
            dragging: false,
            last_cursor: None,
        }
    }

    pub fn config(&self) -> &InputConfig {
        &self.config
    }

    pub fn is_held(&self, key: KeyCode) -> bool {
        self.held.contains(&key)
    }

    pub fn is_dragging(&self) -> bool {
        self.dragging
    }

    fn shift_down(&self) -> bool {
        self.modifiers.shift || self.held.contains(&KeyCode::Shift)
    }

    /// 处理单个事件，返回由它触发的一次性命令
    pub fn handle_event(&mut self, event: &InputEvent) -> Option<Command> {
        match *event {
            InputEvent::KeyPressed {
                key,
                modifiers,
                repeat,
            } => {
                self.modifiers = modifiers;
                self.held.insert(key);
                self.key_command(key, repeat)
            }
            InputEvent::KeyReleased { key, modifiers } => {
                self.modifiers = modifiers;
                self.held.remove(&key);
                None
            }
            InputEvent::MouseButtonPressed { button, x, y } => {
                if button == MouseButton::Left {
                    self.dragging = true;
                    self.last_cursor = Some((x, y));
                }
                None
            }
            InputEvent::MouseButtonReleased { button, .. } => {
                if button == MouseButton::Left {
                    self.dragging = false;
                }
                None
            }
            InputEvent::MouseMoved { x, y } => {
                let previous = self.last_cursor.replace((x, y));
                match previous {
                    Some((last_x, last_y)) if self.dragging => {
                        let sensitivity = self.config.mouse_sensitivity;
                        Some(Command::Rotate {
                            pitch: (y - last_y) * sensitivity,
                            yaw: (x - last_x) * sensitivity,
                        })
                    }
                    _ => None,
                }
            }
            InputEvent::MouseWheel { delta_y, .. } => {
                Some(Command::Zoom(delta_y * self.config.wheel_zoom_step))
            }
            InputEvent::WindowResized { width, height } => Some(Command::Resize { width, height }),
            InputEvent::WindowFocused(false) => {
                self.held.clear();
                self.dragging = false;
                None
            }
            InputEvent::WindowFocused(true) => None,
            InputEvent::WindowCloseRequested => Some(Command::Quit),
        }
    }

    fn key_command(&self, key: KeyCode, repeat: bool) -> Option<Command> {
        let rate_step = self.config.emit_rate_step as i32;
        let power_step = self.config.power_step;

        // 可随按键重复触发的调整
        let adjust = match key {
            KeyCode::Equal if self.shift_down() => Some(Command::AdjustEmitRate(rate_step)),
            KeyCode::Minus if self.shift_down() => Some(Command::AdjustEmitRate(-rate_step)),
            KeyCode::NumpadAdd => Some(Command::AdjustEmitRate(rate_step)),
            KeyCode::NumpadSubtract => Some(Command::AdjustEmitRate(-rate_step)),
            KeyCode::BracketRight => Some(Command::AdjustEruptionPower(power_step)),
            KeyCode::BracketLeft => Some(Command::AdjustEruptionPower(-power_step)),
            _ => None,
        };
        if adjust.is_some() || repeat {
            return adjust;
        }

        match key {
            KeyCode::P => Some(Command::ToggleProjection),
            KeyCode::M => Some(Command::ToggleWireframe),
            KeyCode::Space => Some(Command::ToggleEmission),
            KeyCode::C => Some(Command::ClearParticles),
            KeyCode::Escape => Some(Command::Quit),
            _ => None,
        }
    }

    /// 按住的按键每帧产生的连续命令
    pub fn held_commands(&self) -> Vec<Command> {
        let mut commands = Vec::new();
        let held = |key: KeyCode| self.held.contains(&key);
        let axis = |positive: KeyCode, negative: KeyCode| -> f32 {
            (held(positive) as i32 - held(negative) as i32) as f32
        };

        let speed = self.config.move_speed;
        let fly = Vec3::new(
            axis(KeyCode::D, KeyCode::A),
            axis(KeyCode::R, KeyCode::F),
            axis(KeyCode::S, KeyCode::W),
        ) * speed;
        if fly != Vec3::ZERO {
            commands.push(Command::Fly(fly));
        }

        let rotate = self.config.rotate_speed;
        let pitch = axis(KeyCode::Up, KeyCode::Down) * rotate;
        let yaw = axis(KeyCode::Left, KeyCode::Right) * rotate;
        if pitch != 0.0 || yaw != 0.0 {
            commands.push(Command::Rotate { pitch, yaw });
        }

        if !self.shift_down() {
            let zoom = axis(KeyCode::Equal, KeyCode::Minus) * self.config.zoom_speed;
            if zoom != 0.0 {
                commands.push(Command::Zoom(zoom));
            }
        }

        commands
    }
}
