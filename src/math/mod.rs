//! 数学内核
//!
//! 基于 `glam` 的三维向量与 4x4 列主序矩阵运算。
//!
//! 所有矩阵均为列主序存储（`to_cols_array()` 的第 `i` 个元素即 OpenGL 约定中的
//! `m[i]`），`M * v` 将 `M` 编码的变换作用到列向量 `v` 上。

pub use glam::{Mat4, Vec3, Vec4};

/// 归一化向量；零长度向量原样返回，不产生 NaN。
#[inline]
pub fn normalize(v: Vec3) -> Vec3 {
    let len = v.length();
    if len > 0.0 {
        v / len
    } else {
        v
    }
}

#[inline]
pub fn cross(a: Vec3, b: Vec3) -> Vec3 {
    a.cross(b)
}

#[inline]
pub fn dot(a: Vec3, b: Vec3) -> f32 {
    a.dot(b)
}

#[inline]
pub fn identity() -> Mat4 {
    Mat4::IDENTITY
}

/// 标准矩阵乘积 `a · b`（先应用 `b`，再应用 `a`）
#[inline]
pub fn multiply(a: &Mat4, b: &Mat4) -> Mat4 {
    *a * *b
}

pub fn translate(tx: f32, ty: f32, tz: f32) -> Mat4 {
    let mut m = Mat4::IDENTITY.to_cols_array();
    m[12] = tx;
    m[13] = ty;
    m[14] = tz;
    Mat4::from_cols_array(&m)
}

pub fn scale(sx: f32, sy: f32, sz: f32) -> Mat4 {
    let mut m = Mat4::IDENTITY.to_cols_array();
    m[0] = sx;
    m[5] = sy;
    m[10] = sz;
    Mat4::from_cols_array(&m)
}

/// 绕 X 轴旋转 `ax`，再绕 Y 轴旋转 `ay`：返回 `Ry(ay) · Rx(ax)`
///
/// 俯仰先于偏航，与鼠标拖动的直觉一致（竖直移动 → 俯仰，水平移动 → 偏航）。
pub fn rotate_xy(ax: f32, ay: f32) -> Mat4 {
    let (sx, cx) = ax.sin_cos();
    let mut rx = Mat4::IDENTITY.to_cols_array();
    rx[5] = cx;
    rx[6] = sx;
    rx[9] = -sx;
    rx[10] = cx;

    let (sy, cy) = ay.sin_cos();
    let mut ry = Mat4::IDENTITY.to_cols_array();
    ry[0] = cy;
    ry[2] = -sy;
    ry[8] = sy;
    ry[10] = cy;

    multiply(&Mat4::from_cols_array(&ry), &Mat4::from_cols_array(&rx))
}

/// 正交投影（OpenGL 裁剪空间约定，z ∈ [-1, 1]）
pub fn ortho(left: f32, right: f32, bottom: f32, top: f32, near: f32, far: f32) -> Mat4 {
    let mut m = Mat4::IDENTITY.to_cols_array();
    m[0] = 2.0 / (right - left);
    m[5] = 2.0 / (top - bottom);
    m[10] = -2.0 / (far - near);
    m[12] = -(right + left) / (right - left);
    m[13] = -(top + bottom) / (top - bottom);
    m[14] = -(far + near) / (far - near);
    m[15] = 1.0;
    Mat4::from_cols_array(&m)
}

/// 透视投影（OpenGL 裁剪空间约定）
///
/// 要求 `near > 0`、`far > near`、`aspect > 0`。
pub fn perspective(fov_y: f32, aspect: f32, near: f32, far: f32) -> Mat4 {
    let f = 1.0 / (fov_y / 2.0).tan();
    let mut m = [0.0f32; 16];
    m[0] = f / aspect;
    m[5] = f;
    m[10] = (far + near) / (near - far);
    m[11] = -1.0;
    m[14] = (2.0 * far * near) / (near - far);
    m[15] = 0.0;
    Mat4::from_cols_array(&m)
}

/// 观察矩阵：把世界坐标变换到眼睛空间
///
/// `eye == center` 或 `up` 与视线共线时结果退化（归一化保护避免 NaN），
/// 调用方负责避免这些输入。
pub fn look_at(eye: Vec3, center: Vec3, up: Vec3) -> Mat4 {
    let f = normalize(center - eye);
    let s = normalize(cross(f, up));
    let u = cross(s, f);

    let mut m = [0.0f32; 16];
    m[0] = s.x;
    m[4] = s.y;
    m[8] = s.z;
    m[12] = -dot(s, eye);
    m[1] = u.x;
    m[5] = u.y;
    m[9] = u.z;
    m[13] = -dot(u, eye);
    m[2] = -f.x;
    m[6] = -f.y;
    m[10] = -f.z;
    m[14] = dot(f, eye);
    m[15] = 1.0;
    Mat4::from_cols_array(&m)
}


#[cfg(test)]
mod property_tests {
    use super::*;
    use proptest::prelude::*;

    fn finite_f32() -> impl Strategy<Value = f32> {
        (-100.0f32..100.0).prop_filter("must be finite", |&x| x.is_finite())
    }

    fn valid_vec3() -> impl Strategy<Value = Vec3> {
        (finite_f32(), finite_f32(), finite_f32()).prop_map(|(x, y, z)| Vec3::new(x, y, z))
    }

    proptest! {
        #[test]
        fn look_at_centers_eye(eye in valid_vec3(), center in valid_vec3()) {
            let f = center - eye;
            // 退化输入（重合或与 up 共线）由调用方避免
            prop_assume!(f.length() > 0.1);
            prop_assume!(f.normalize().cross(Vec3::Y).length() > 0.1);
            let p = look_at(eye, center, Vec3::Y).transform_point3(eye);
            prop_assert!(p.x.abs() < 1e-3 && p.y.abs() < 1e-3);
        }

        #[test]
        fn rotate_xy_preserves_length(ax in -1.5f32..1.5, ay in -6.3f32..6.3, v in valid_vec3()) {
            let r = rotate_xy(ax, ay).transform_vector3(v);
            prop_assert!((r.length() - v.length()).abs() < 1e-2);
        }
    }
}
