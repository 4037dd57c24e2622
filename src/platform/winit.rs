use super::{InputEvent, KeyCode, Modifiers, MouseButton};
use crate::config::WindowConfig;
use crate::core::error::{EngineError, EngineResult};
use std::sync::Arc;
use winit::dpi::PhysicalSize;
use winit::event::{ElementState, MouseScrollDelta, WindowEvent};
use winit::event_loop::EventLoop;
use winit::keyboard::{KeyCode as WinitKey, PhysicalKey};
use winit::window::{Window as WinitWindowRaw, WindowBuilder};

#[derive(Clone)]
pub struct WinitWindow {
    window: Arc<WinitWindowRaw>,
}

impl WinitWindow {
    pub fn new(event_loop: &EventLoop<()>, config: &WindowConfig) -> EngineResult<Self> {
        let window = WindowBuilder::new()
            .with_title(config.title.clone())
            .with_inner_size(PhysicalSize::new(config.width, config.height))
            .build(event_loop)
            .map_err(|e| EngineError::Window(e.to_string()))?;
        Ok(Self {
            window: Arc::new(window),
        })
    }

    pub fn raw(&self) -> &WinitWindowRaw {
        &self.window
    }

    /// 共享句柄，供 `wgpu::Surface<'static>` 持有
    pub fn handle(&self) -> Arc<WinitWindowRaw> {
        Arc::clone(&self.window)
    }
}

impl crate::platform::Window for WinitWindow {
    fn size(&self) -> (u32, u32) {
        let s = self.window.inner_size();
        (s.width, s.height)
    }
    fn scale_factor(&self) -> f64 {
        self.window.scale_factor()
    }
    fn request_redraw(&self) {
        self.window.request_redraw();
    }
    fn set_title(&self, title: &str) {
        self.window.set_title(title);
    }
}

/// 物理按键映射（与键盘布局无关）
pub fn map_key_code(code: WinitKey) -> KeyCode {
    match code {
        WinitKey::KeyA => KeyCode::A,
        WinitKey::KeyB => KeyCode::B,
        WinitKey::KeyC => KeyCode::C,
        WinitKey::KeyD => KeyCode::D,
        WinitKey::KeyE => KeyCode::E,
        WinitKey::KeyF => KeyCode::F,
        WinitKey::KeyG => KeyCode::G,
        WinitKey::KeyH => KeyCode::H,
        WinitKey::KeyI => KeyCode::I,
        WinitKey::KeyJ => KeyCode::J,
        WinitKey::KeyK => KeyCode::K,
        WinitKey::KeyL => KeyCode::L,
        WinitKey::KeyM => KeyCode::M,
        WinitKey::KeyN => KeyCode::N,
        WinitKey::KeyO => KeyCode::O,
        WinitKey::KeyP => KeyCode::P,
        WinitKey::KeyQ => KeyCode::Q,
        WinitKey::KeyR => KeyCode::R,
        WinitKey::KeyS => KeyCode::S,
        WinitKey::KeyT => KeyCode::T,
        WinitKey::KeyU => KeyCode::U,
        WinitKey::KeyV => KeyCode::V,
        WinitKey::KeyW => KeyCode::W,
        WinitKey::KeyX => KeyCode::X,
        WinitKey::KeyY => KeyCode::Y,
        WinitKey::KeyZ => KeyCode::Z,
        WinitKey::Digit0 => KeyCode::Num0,
        WinitKey::Digit1 => KeyCode::Num1,
        WinitKey::Digit2 => KeyCode::Num2,
        WinitKey::Digit3 => KeyCode::Num3,
        WinitKey::Digit4 => KeyCode::Num4,
        WinitKey::Digit5 => KeyCode::Num5,
        WinitKey::Digit6 => KeyCode::Num6,
        WinitKey::Digit7 => KeyCode::Num7,
        WinitKey::Digit8 => KeyCode::Num8,
        WinitKey::Digit9 => KeyCode::Num9,
        WinitKey::Equal => KeyCode::Equal,
        WinitKey::Minus => KeyCode::Minus,
        WinitKey::BracketLeft => KeyCode::BracketLeft,
        WinitKey::BracketRight => KeyCode::BracketRight,
        WinitKey::NumpadAdd => KeyCode::NumpadAdd,
        WinitKey::NumpadSubtract => KeyCode::NumpadSubtract,
        WinitKey::Escape => KeyCode::Escape,
        WinitKey::Tab => KeyCode::Tab,
        WinitKey::ShiftLeft | WinitKey::ShiftRight => KeyCode::Shift,
        WinitKey::ControlLeft | WinitKey::ControlRight => KeyCode::Control,
        WinitKey::AltLeft | WinitKey::AltRight => KeyCode::Alt,
        WinitKey::Space => KeyCode::Space,
        WinitKey::Enter => KeyCode::Enter,
        WinitKey::Backspace => KeyCode::Backspace,
        WinitKey::ArrowLeft => KeyCode::Left,
        WinitKey::ArrowRight => KeyCode::Right,
        WinitKey::ArrowUp => KeyCode::Up,
        WinitKey::ArrowDown => KeyCode::Down,
        _ => KeyCode::Unknown(0),
    }
}

pub fn map_mouse_button(button: winit::event::MouseButton) -> MouseButton {
    match button {
        winit::event::MouseButton::Left => MouseButton::Left,
        winit::event::MouseButton::Right => MouseButton::Right,
        winit::event::MouseButton::Middle => MouseButton::Middle,
        winit::event::MouseButton::Other(b) => MouseButton::Other(b),
        winit::event::MouseButton::Back => MouseButton::Other(8),
        winit::event::MouseButton::Forward => MouseButton::Other(9),
    }
}

/// 将 winit 窗口事件翻译为平台无关的 `InputEvent`
///
/// 跟踪修饰键与光标位置，鼠标按键事件带上当前光标坐标。
#[derive(Debug, Default)]
pub struct EventTranslator {
    modifiers: Modifiers,
    cursor: (f32, f32),
}

impl EventTranslator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn modifiers(&self) -> Modifiers {
        self.modifiers
    }

    pub fn translate(&mut self, event: &WindowEvent) -> Option<InputEvent> {
        match event {
            WindowEvent::Resized(size) => Some(InputEvent::WindowResized {
                width: size.width,
                height: size.height,
            }),
            WindowEvent::Focused(focused) => Some(InputEvent::WindowFocused(*focused)),
            WindowEvent::CloseRequested => Some(InputEvent::WindowCloseRequested),
            WindowEvent::ModifiersChanged(modifiers) => {
                let state = modifiers.state();
                self.modifiers = Modifiers {
                    shift: state.shift_key(),
                    ctrl: state.control_key(),
                    alt: state.alt_key(),
                    logo: state.super_key(),
                };
                None
            }
            WindowEvent::CursorMoved { position, .. } => {
                self.cursor = (position.x as f32, position.y as f32);
                Some(InputEvent::MouseMoved {
                    x: self.cursor.0,
                    y: self.cursor.1,
                })
            }
            WindowEvent::MouseWheel { delta, .. } => {
                let (delta_x, delta_y) = match delta {
                    MouseScrollDelta::LineDelta(x, y) => (*x, *y),
                    // 一行约 120 像素
                    MouseScrollDelta::PixelDelta(p) => (p.x as f32 / 120.0, p.y as f32 / 120.0),
                };
                Some(InputEvent::MouseWheel { delta_x, delta_y })
            }
            WindowEvent::MouseInput { state, button, .. } => {
                let button = map_mouse_button(*button);
                let (x, y) = self.cursor;
                Some(match state {
                    ElementState::Pressed => InputEvent::MouseButtonPressed { button, x, y },
                    ElementState::Released => InputEvent::MouseButtonReleased { button, x, y },
                })
            }
            WindowEvent::KeyboardInput { event, .. } => {
                let key = match event.physical_key {
                    PhysicalKey::Code(code) => map_key_code(code),
                    PhysicalKey::Unidentified(_) => KeyCode::Unknown(0),
                };
                let modifiers = self.modifiers;
                Some(match event.state {
                    ElementState::Pressed => InputEvent::KeyPressed {
                        key,
                        modifiers,
                        repeat: event.repeat,
                    },
                    ElementState::Released => InputEvent::KeyReleased { key, modifiers },
                })
            }
            _ => None,
        }
    }
}
