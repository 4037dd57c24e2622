//! 火山地形生成
//!
//! 生成带火山口的锥体网格：逐层带径向噪声的锥面、底面扇形、
//! 火山口竖井和火山口底面，外加一块熔岩平面。
//!
//! ## 结构
//!
//! ```text
//!            ┌──┐   ← 火山口竖井（R_c → 0.8·R_c，深度 D）
//!           /    \
//!          /      \ ← 锥面（L 层 × S_b 段，线性收缩 + 噪声）
//!         /________\
//!  ═══════════════════ ← 熔岩平面（y = -0.01）
//! ```
//!
//! 噪声函数是确定性的，相同参数两次生成的缓冲区逐字节一致。

use crate::config::{ConfigError, ConfigResult};
use crate::math::Vec3;
use crate::render::mesh::MeshBuilder;
use serde::{Deserialize, Serialize};
use std::f32::consts::TAU;

/// 火山几何参数
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct VolcanoParams {
    /// 底面半径 R_b
    pub base_radius: f32,
    /// 火山口顶部半径 R_c
    pub crater_radius: f32,
    /// 总高度 H
    pub height: f32,
    /// 火山口深度 D
    pub crater_depth: f32,
    /// 底面分段数 S_b
    pub base_segments: u32,
    /// 高度层数 L
    pub height_layers: u32,
    /// 火山口分段数 S_c
    pub crater_segments: u32,
    /// 熔岩平面半边长
    pub lava_plane_size: f32,
    /// 熔岩平面高度
    pub lava_plane_y: f32,
}

crate::impl_default!(VolcanoParams {
    base_radius: 2.0,
    crater_radius: 0.3,
    height: 2.5,
    crater_depth: 0.4,
    base_segments: 64,
    height_layers: 8,
    crater_segments: 32,
    lava_plane_size: 5.0,
    lava_plane_y: -0.01,
});

/// 火山口底面半径相对顶部半径的比例
const CRATER_FLOOR_RATIO: f32 = 0.8;

impl VolcanoParams {
    /// 验证参数
    pub fn validate(&self) -> ConfigResult<()> {
        if !(self.base_radius > 0.0 && self.crater_radius > 0.0 && self.height > 0.0) {
            return Err(ConfigError::ValidationError(
                "Volcano radii and height must be positive".to_string(),
            ));
        }
        if self.crater_radius >= self.base_radius {
            return Err(ConfigError::ValidationError(
                "Crater radius must be smaller than base radius".to_string(),
            ));
        }
        if !(self.crater_depth > 0.0 && self.crater_depth < self.height) {
            return Err(ConfigError::ValidationError(
                "Crater depth must lie in (0, height)".to_string(),
            ));
        }
        if self.base_segments < 3 || self.crater_segments < 3 || self.height_layers == 0 {
            return Err(ConfigError::ValidationError(
                "Volcano needs at least 3 segments and 1 layer".to_string(),
            ));
        }
        if self.lava_plane_size <= 0.0 {
            return Err(ConfigError::ValidationError(
                "Lava plane size must be positive".to_string(),
            ));
        }
        Ok(())
    }

    /// 火山口中心（锥顶）
    pub fn crater_top(&self) -> Vec3 {
        Vec3::new(0.0, self.height, 0.0)
    }

    /// 火山体（不含熔岩平面）的三角形数
    pub fn volcano_triangle_count(&self) -> usize {
        let (sb, l, sc) = (
            self.base_segments as usize,
            self.height_layers as usize,
            self.crater_segments as usize,
        );
        2 * sb * l + sb + 2 * sc + sc
    }

    /// 整个场景网格的三角形数
    pub fn scene_triangle_count(&self) -> usize {
        self.volcano_triangle_count() + 2
    }
}

/// 确定性径向噪声：`0.2 · sin(f·x) · cos(f·z)`
#[inline]
pub fn noise(x: f32, z: f32, freq: f32) -> f32 {
    (x * freq).sin() * (z * freq).cos() * 0.2
}

#[inline]
fn ring_point(radius: f32, angle: f32, y: f32) -> Vec3 {
    Vec3::new(radius * angle.cos(), y, radius * angle.sin())
}

/// 角度 `a` 处、频率 `freq` 的半径乘子
#[inline]
fn radial_multiplier(a: f32, freq: f32) -> f32 {
    1.0 + noise(a.cos(), a.sin(), freq)
}

/// 生成完整场景网格（火山 + 熔岩平面）
pub fn generate_scene_mesh(params: &VolcanoParams) -> MeshBuilder {
    let mut mesh = MeshBuilder::with_capacity(params.scene_triangle_count());
    append_volcano(&mut mesh, params);
    append_lava_plane(&mut mesh, params);
    mesh
}

/// 只生成火山体
pub fn generate_volcano(params: &VolcanoParams) -> MeshBuilder {
    let mut mesh = MeshBuilder::with_capacity(params.volcano_triangle_count());
    append_volcano(&mut mesh, params);
    mesh
}

/// 向 `mesh` 追加火山体：锥面、底面、火山口竖井、火山口底面
pub fn append_volcano(mesh: &mut MeshBuilder, params: &VolcanoParams) {
    append_cone_body(mesh, params);
    append_base(mesh, params);
    append_crater_shaft(mesh, params);
    append_crater_floor(mesh, params);
}

/// 锥面：每层每段一个四边形（两个三角形），法线朝外
fn append_cone_body(mesh: &mut MeshBuilder, params: &VolcanoParams) {
    let layers = params.height_layers;
    let segments = params.base_segments;
    let layer_height = params.height / layers as f32;
    let taper = params.base_radius - params.crater_radius;

    for layer in 0..layers {
        let h0 = layer_height * layer as f32;
        let h1 = layer_height * (layer + 1) as f32;
        let r0 = params.base_radius - taper * (h0 / params.height);
        let r1 = params.base_radius - taper * (h1 / params.height);
        // 上沿频率等于上一层的下沿频率，相邻层共享同一圈顶点
        let f0 = 3.0 + layer as f32;
        let f1 = f0 + 1.0;

        for i in 0..segments {
            let a0 = TAU * i as f32 / segments as f32;
            let a1 = TAU * (i + 1) as f32 / segments as f32;

            let lower0 = ring_point(r0 * radial_multiplier(a0, f0), a0, h0);
            let lower1 = ring_point(r0 * radial_multiplier(a1, f0), a1, h0);
            let upper0 = ring_point(r1 * radial_multiplier(a0, f1), a0, h1);
            let upper1 = ring_point(r1 * radial_multiplier(a1, f1), a1, h1);

            mesh.add_triangle(lower0, upper1, lower1);
            mesh.add_triangle(lower0, upper0, upper1);
        }
    }
}

/// 底面扇形（y = 0），法线朝上
fn append_base(mesh: &mut MeshBuilder, params: &VolcanoParams) {
    append_fan(mesh, 0.0, params.base_radius, params.base_segments);
}

/// 火山口竖井：从 (R_c, H) 收缩到 (0.8·R_c, H - D)，法线背离轴线
fn append_crater_shaft(mesh: &mut MeshBuilder, params: &VolcanoParams) {
    let top = params.height;
    let bottom = params.height - params.crater_depth;
    let r_top = params.crater_radius;
    let r_bottom = params.crater_radius * CRATER_FLOOR_RATIO;
    let segments = params.crater_segments;

    for i in 0..segments {
        let a0 = TAU * i as f32 / segments as f32;
        let a1 = TAU * (i + 1) as f32 / segments as f32;

        let top0 = ring_point(r_top, a0, top);
        let top1 = ring_point(r_top, a1, top);
        let bottom0 = ring_point(r_bottom, a0, bottom);
        let bottom1 = ring_point(r_bottom, a1, bottom);

        mesh.add_triangle(top0, top1, bottom0);
        mesh.add_triangle(top1, bottom1, bottom0);
    }
}

/// 火山口底面（y = H - D），法线朝上
fn append_crater_floor(mesh: &mut MeshBuilder, params: &VolcanoParams) {
    append_fan(
        mesh,
        params.height - params.crater_depth,
        params.crater_radius * CRATER_FLOOR_RATIO,
        params.crater_segments,
    );
}

/// 水平扇形，绕 +Y 逆时针排列顶点使法线朝上
fn append_fan(mesh: &mut MeshBuilder, y: f32, radius: f32, segments: u32) {
    let center = Vec3::new(0.0, y, 0.0);
    for i in 0..segments {
        let a0 = TAU * i as f32 / segments as f32;
        let a1 = TAU * (i + 1) as f32 / segments as f32;
        mesh.add_triangle(center, ring_point(radius, a1, y), ring_point(radius, a0, y));
    }
}

/// 熔岩平面：两个三角形，法线朝上
pub fn append_lava_plane(mesh: &mut MeshBuilder, params: &VolcanoParams) {
    let s = params.lava_plane_size;
    let y = params.lava_plane_y;
    let v0 = Vec3::new(-s, y, -s);
    let v1 = Vec3::new(s, y, -s);
    let v2 = Vec3::new(s, y, s);
    let v3 = Vec3::new(-s, y, s);

    mesh.add_triangle(v0, v2, v1);
    mesh.add_triangle(v0, v3, v2);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_params_valid() {
        assert!(VolcanoParams::default().validate().is_ok());
    }

    #[test]
    fn test_invalid_params_rejected() {
        let params = VolcanoParams {
            crater_radius: 3.0,
            ..Default::default()
        };
        assert!(params.validate().is_err());

        let params = VolcanoParams {
            base_segments: 2,
            ..Default::default()
        };
        assert!(params.validate().is_err());

        let params = VolcanoParams {
            crater_depth: 2.5,
            ..Default::default()
        };
        assert!(params.validate().is_err());
    }

    #[test]
    fn test_triangle_counts() {
        let params = VolcanoParams::default();
        assert_eq!(generate_volcano(&params).triangle_count(), 1184);
        let scene = generate_scene_mesh(&params);
        assert_eq!(scene.triangle_count(), 1186);
        assert_eq!(scene.positions().len(), 10674);
    }

    #[test]
    fn test_noise_bounds() {
        for i in 0..100 {
            let a = i as f32 * 0.1;
            let n = noise(a.cos(), a.sin(), 3.0 + (i % 9) as f32);
            assert!(n.abs() <= 0.2);
        }
    }

    #[test]
    fn test_body_normals_face_outward() {
        let params = VolcanoParams::default();
        let mesh = generate_volcano(&params);
        let body = (2 * params.base_segments * params.height_layers) as usize;

        for ([a, b, c], n) in mesh.triangles().take(body) {
            let centroid = (a + b + c) / 3.0;
            let outward = Vec3::new(centroid.x, 0.0, centroid.z);
            assert!(n.dot(outward) >= 0.0, "inward normal {:?} at {:?}", n, centroid);
        }
    }

    #[test]
    fn test_base_and_floor_face_up() {
        let params = VolcanoParams::default();
        let mesh = generate_volcano(&params);
        let sb = params.base_segments as usize;
        let sc = params.crater_segments as usize;
        let body = 2 * sb * params.height_layers as usize;

        for (_, n) in mesh.triangles().skip(body).take(sb) {
            assert!(n.y > 0.99);
        }
        for (_, n) in mesh.triangles().skip(body + sb + 2 * sc) {
            assert!(n.y > 0.99);
        }
    }

    #[test]
    fn test_shaft_spans_crater_depth() {
        let params = VolcanoParams::default();
        let mesh = generate_volcano(&params);
        let sb = params.base_segments as usize;
        let body = 2 * sb * params.height_layers as usize;
        let bottom = params.height - params.crater_depth;

        for ([a, b, c], _) in mesh.triangles().skip(body + sb).take(2 * params.crater_segments as usize) {
            for v in [a, b, c] {
                assert!(v.y >= bottom - 1e-5 && v.y <= params.height + 1e-5);
            }
        }
    }

    #[test]
    fn test_lava_plane_below_cone() {
        let params = VolcanoParams::default();
        let mut mesh = MeshBuilder::new();
        append_lava_plane(&mut mesh, &params);
        assert_eq!(mesh.triangle_count(), 2);
        for ([a, b, c], n) in mesh.triangles() {
            assert!(a.y < 0.0 && b.y < 0.0 && c.y < 0.0);
            assert!(n.y > 0.99);
        }
    }

    #[test]
    fn test_scene_mesh_is_deterministic() {
        let params = VolcanoParams::default();
        let a = generate_scene_mesh(&params);
        let b = generate_scene_mesh(&params);
        assert_eq!(a.positions(), b.positions());
        assert_eq!(a.normals(), b.normals());
    }

    #[test]
    fn test_scene_normals_unit_or_zero() {
        let mesh = generate_scene_mesh(&VolcanoParams::default());
        assert_eq!(mesh.normals().len(), mesh.positions().len());
        for n in mesh.normals().chunks_exact(3) {
            let n = Vec3::new(n[0], n[1], n[2]);
            assert!(n.is_finite(), "non-finite normal {:?}", n);
            let len = n.length();
            assert!(len == 0.0 || (len - 1.0).abs() < 1e-5, "normal length {}", len);
        }
    }
}
