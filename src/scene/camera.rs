//! 相机与变换控制器
//!
//! 保存旋转、缩放、眼睛位置等状态，每帧生成 `uTransform`。

use crate::config::camera::{MAX_PITCH, MAX_ZOOM, MIN_ZOOM};
use crate::config::CameraConfig;
use crate::math::{self, Mat4, Vec3};
use std::f32::consts::FRAC_PI_4;

/// 近裁剪面
pub const NEAR: f32 = 0.01;
/// 远裁剪面
pub const FAR: f32 = 100.0;
/// 场景整体下移量
pub const SCENE_OFFSET_Y: f32 = -0.5;

/// 由帧缓冲尺寸计算宽高比，高度为 0 时按 1 处理
pub fn aspect_ratio(width: u32, height: u32) -> f32 {
    width as f32 / height.max(1) as f32
}

/// 相机状态
#[derive(Debug, Clone, PartialEq)]
pub struct Camera {
    /// 俯仰角，限制在 [-1.5, 1.5]
    pub rotation_x: f32,
    /// 偏航角
    pub rotation_y: f32,
    pub eye: Vec3,
    pub center: Vec3,
    pub up: Vec3,
    /// 缩放，限制在 [0.1, 5.0]
    pub zoom: f32,
    pub is_perspective: bool,
    pub is_wireframe: bool,
}

impl Default for Camera {
    fn default() -> Self {
        Self::from_config(&CameraConfig::default())
    }
}

impl Camera {
    pub fn from_config(config: &CameraConfig) -> Self {
        Self {
            rotation_x: config.rotation_x.clamp(-MAX_PITCH, MAX_PITCH),
            rotation_y: config.rotation_y,
            eye: Vec3::from(config.eye),
            center: Vec3::from(config.center),
            up: Vec3::from(config.up),
            zoom: config.zoom.clamp(MIN_ZOOM, MAX_ZOOM),
            is_perspective: config.perspective,
            is_wireframe: config.wireframe,
        }
    }

    /// 旋转（弧度），俯仰角被限制
    pub fn rotate(&mut self, pitch: f32, yaw: f32) {
        self.rotation_x = (self.rotation_x + pitch).clamp(-MAX_PITCH, MAX_PITCH);
        self.rotation_y += yaw;
    }

    /// 调整缩放，结果限制在 [0.1, 5.0]
    pub fn zoom_by(&mut self, delta: f32) {
        self.zoom = (self.zoom + delta).clamp(MIN_ZOOM, MAX_ZOOM);
    }

    /// 平移眼睛位置
    pub fn fly(&mut self, delta: Vec3) {
        self.eye += delta;
    }

    pub fn toggle_projection(&mut self) -> bool {
        self.is_perspective = !self.is_perspective;
        tracing::info!(
            target: "render",
            "Projection: {}",
            if self.is_perspective { "perspective" } else { "orthographic" }
        );
        self.is_perspective
    }

    pub fn toggle_wireframe(&mut self) -> bool {
        self.is_wireframe = !self.is_wireframe;
        tracing::info!(
            target: "render",
            "Wireframe: {}",
            if self.is_wireframe { "on" } else { "off" }
        );
        self.is_wireframe
    }

    /// `translate(0, -0.5, 0) · rotateXY(rotX, rotY)`
    pub fn model(&self) -> Mat4 {
        math::multiply(
            &math::translate(0.0, SCENE_OFFSET_Y, 0.0),
            &math::rotate_xy(self.rotation_x, self.rotation_y),
        )
    }

    pub fn view(&self) -> Mat4 {
        math::look_at(self.eye, self.center, self.up)
    }

    /// 透视视场角：`clamp(π/4 / zoom, 0.01, 3.0)`
    pub fn fov_y(&self) -> f32 {
        (FRAC_PI_4 / self.zoom).clamp(0.01, 3.0)
    }

    pub fn projection(&self, aspect: f32) -> Mat4 {
        if self.is_perspective {
            math::perspective(self.fov_y(), aspect, NEAR, FAR)
        } else {
            let s = 2.0 / self.zoom;
            math::ortho(-s * aspect, s * aspect, -s, s, NEAR, FAR)
        }
    }

    /// 组合后的 `uTransform = proj · view · model`
    pub fn transform(&self, aspect: f32) -> Mat4 {
        let view_model = math::multiply(&self.view(), &self.model());
        math::multiply(&self.projection(aspect), &view_model)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::math::Vec4;

    #[test]
    fn test_defaults() {
        let camera = Camera::default();
        assert_eq!(camera.rotation_x, 0.2);
        assert_eq!(camera.eye, Vec3::new(0.0, 4.0, 12.0));
        assert_eq!(camera.zoom, 1.0);
        assert!(camera.is_perspective);
        assert!(!camera.is_wireframe);
    }

    #[test]
    fn test_clamps() {
        let mut camera = Camera::default();
        camera.rotate(10.0, 0.5);
        assert_eq!(camera.rotation_x, 1.5);
        assert_eq!(camera.rotation_y, 0.5);
        camera.rotate(-10.0, 0.0);
        assert_eq!(camera.rotation_x, -1.5);

        camera.zoom_by(100.0);
        assert_eq!(camera.zoom, 5.0);
        camera.zoom_by(-100.0);
        assert_eq!(camera.zoom, 0.1);
    }

    #[test]
    fn test_fov_clamp() {
        let mut camera = Camera::default();
        assert!((camera.fov_y() - FRAC_PI_4).abs() < 1e-6);
        camera.zoom = 0.1;
        assert_eq!(camera.fov_y(), 3.0);
    }

    #[test]
    fn test_scene_center_projects_to_screen_center() {
        let camera = Camera::default();
        let clip = camera.transform(1.5) * Vec4::new(0.0, -0.5, 0.0, 1.0);
        assert!(clip.w > 0.0);
        assert!((clip.x / clip.w).abs() < 0.01);
    }

    #[test]
    fn test_transform_is_proj_view_model() {
        let camera = Camera::default();
        let expected = camera.projection(1.5) * camera.view() * camera.model();
        let actual = camera.transform(1.5);
        for (a, e) in actual.to_cols_array().iter().zip(expected.to_cols_array()) {
            assert!((a - e).abs() < 1e-5);
        }

        // 山顶在山脚上方
        let base = actual * Vec4::new(0.0, 0.0, 0.0, 1.0);
        let summit = actual * Vec4::new(0.0, 2.5, 0.0, 1.0);
        assert!(summit.y / summit.w > base.y / base.w);
    }

    #[test]
    fn test_orthographic_extent() {
        let mut camera = Camera::default();
        camera.toggle_projection();
        camera.zoom = 2.0;
        let proj = camera.projection(1.0);
        // s = 1, 所以 x = 1 落在裁剪空间边缘
        let edge = proj * Vec4::new(1.0, 1.0, -1.0, 1.0);
        assert!((edge.x - 1.0).abs() < 1e-6);
        assert!((edge.y - 1.0).abs() < 1e-6);
    }

    #[test]
    fn test_toggles_flip() {
        let mut camera = Camera::default();
        assert!(!camera.toggle_projection());
        assert!(camera.toggle_projection());
        assert!(camera.toggle_wireframe());
        assert!(!camera.toggle_wireframe());
    }

    #[test]
    fn test_aspect_ratio_guards_zero_height() {
        assert_eq!(aspect_ratio(1200, 800), 1.5);
        assert_eq!(aspect_ratio(640, 0), 640.0);
    }
}
