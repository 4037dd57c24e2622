pub mod winit;

pub use self::winit::{EventTranslator, WinitWindow};

// ============================================================================
// Platform Window Abstraction
// ============================================================================

/// 平台窗口抽象
pub trait Window: Send + Sync {
    /// 帧缓冲尺寸（物理像素）
    fn size(&self) -> (u32, u32);
    fn scale_factor(&self) -> f64;
    fn request_redraw(&self);
    fn set_title(&self, title: &str);
}

// ============================================================================
// Input Abstraction
// ============================================================================

#[derive(Debug, Clone, PartialEq)]
pub enum InputEvent {
    // Keyboard
    KeyPressed {
        key: KeyCode,
        modifiers: Modifiers,
        repeat: bool,
    },
    KeyReleased {
        key: KeyCode,
        modifiers: Modifiers,
    },

    // Mouse
    MouseMoved { x: f32, y: f32 },
    MouseButtonPressed { button: MouseButton, x: f32, y: f32 },
    MouseButtonReleased { button: MouseButton, x: f32, y: f32 },
    MouseWheel { delta_x: f32, delta_y: f32 },

    // Window
    WindowResized { width: u32, height: u32 },
    WindowFocused(bool),
    WindowCloseRequested,
}

impl InputEvent {
    /// 按下按键的便捷构造（无修饰键、非重复）
    pub fn key_pressed(key: KeyCode) -> Self {
        Self::KeyPressed {
            key,
            modifiers: Modifiers::default(),
            repeat: false,
        }
    }

    pub fn key_released(key: KeyCode) -> Self {
        Self::KeyReleased {
            key,
            modifiers: Modifiers::default(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum KeyCode {
    A, B, C, D, E, F, G, H, I, J, K, L, M, N, O, P, Q, R, S, T, U, V, W, X, Y, Z,
    Num0, Num1, Num2, Num3, Num4, Num5, Num6, Num7, Num8, Num9,
    Equal, Minus, BracketLeft, BracketRight,
    NumpadAdd, NumpadSubtract,
    Escape, Tab, Shift, Control, Alt, Space, Enter, Backspace,
    Left, Right, Up, Down,
    Unknown(u32),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Modifiers {
    pub shift: bool,
    pub ctrl: bool,
    pub alt: bool,
    pub logo: bool,
}

impl Modifiers {
    pub const SHIFT: Self = Self {
        shift: true,
        ctrl: false,
        alt: false,
        logo: false,
    };
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MouseButton {
    Left, Right, Middle, Other(u16),
}
