//! Vector and matrix math for the software pipeline
//!
//! Matrices are column-major and act on column vectors, so `a.multiply(b)`
//! applied to `v` transforms by `b` first. The builder methods (`translate`,
//! `rotate_x`, `scale`, ...) post-multiply, which means a chain like
//! `Mat4::IDENTITY.scale(s).translate(t)` yields `S * T`.

use std::ops::{Add, Mul, Neg, Sub};
use serde::{Serialize, Deserialize};

/// 2D Vector (for texture coordinates)
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Vec2 {
    pub x: f32,
    pub y: f32,
}

impl Vec2 {
    pub const ZERO: Vec2 = Vec2 { x: 0.0, y: 0.0 };

    pub fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }

    pub fn lerp(self, end: Vec2, t: f32) -> Vec2 {
        Vec2::new(self.x + (end.x - self.x) * t, self.y + (end.y - self.y) * t)
    }
}

/// 3D Vector
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Vec3 {
    pub x: f32,
    pub y: f32,
    pub z: f32,
}

impl Vec3 {
    pub const ZERO: Vec3 = Vec3 { x: 0.0, y: 0.0, z: 0.0 };
    pub const ONE: Vec3 = Vec3 { x: 1.0, y: 1.0, z: 1.0 };
    pub const X: Vec3 = Vec3 { x: 1.0, y: 0.0, z: 0.0 };
    pub const Y: Vec3 = Vec3 { x: 0.0, y: 1.0, z: 0.0 };
    pub const Z: Vec3 = Vec3 { x: 0.0, y: 0.0, z: 1.0 };

    pub fn new(x: f32, y: f32, z: f32) -> Self {
        Self { x, y, z }
    }

    pub fn dot(self, other: Vec3) -> f32 {
        self.x * other.x + self.y * other.y + self.z * other.z
    }

    pub fn cross(self, other: Vec3) -> Vec3 {
        Vec3 {
            x: self.y * other.z - self.z * other.y,
            y: self.z * other.x - self.x * other.z,
            z: self.x * other.y - self.y * other.x,
        }
    }

    pub fn len(self) -> f32 {
        self.dot(self).sqrt()
    }

    pub fn normalize(self) -> Vec3 {
        let l = self.len();
        if l == 0.0 {
            return Vec3::ZERO;
        }
        Vec3 {
            x: self.x / l,
            y: self.y / l,
            z: self.z / l,
        }
    }

    pub fn scale(self, s: f32) -> Vec3 {
        Vec3 {
            x: self.x * s,
            y: self.y * s,
            z: self.z * s,
        }
    }

    pub fn lerp(self, end: Vec3, t: f32) -> Vec3 {
        self + (end - self).scale(t)
    }

    /// Extend to a homogeneous vector with the given w
    pub fn extend(self, w: f32) -> Vec4 {
        Vec4::new(self.x, self.y, self.z, w)
    }
}

impl Add for Vec3 {
    type Output = Vec3;
    fn add(self, other: Vec3) -> Vec3 {
        Vec3 {
            x: self.x + other.x,
            y: self.y + other.y,
            z: self.z + other.z,
        }
    }
}

impl Sub for Vec3 {
    type Output = Vec3;
    fn sub(self, other: Vec3) -> Vec3 {
        Vec3 {
            x: self.x - other.x,
            y: self.y - other.y,
            z: self.z - other.z,
        }
    }
}

impl Mul<f32> for Vec3 {
    type Output = Vec3;
    fn mul(self, s: f32) -> Vec3 {
        self.scale(s)
    }
}

impl Neg for Vec3 {
    type Output = Vec3;
    fn neg(self) -> Vec3 {
        Vec3::new(-self.x, -self.y, -self.z)
    }
}

/// Homogeneous 4D vector
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Vec4 {
    pub x: f32,
    pub y: f32,
    pub z: f32,
    pub w: f32,
}

impl Vec4 {
    pub fn new(x: f32, y: f32, z: f32, w: f32) -> Self {
        Self { x, y, z, w }
    }

    pub fn xyz(self) -> Vec3 {
        Vec3::new(self.x, self.y, self.z)
    }

    pub fn dot(self, other: Vec4) -> f32 {
        self.x * other.x + self.y * other.y + self.z * other.z + self.w * other.w
    }

    pub fn scale(self, s: f32) -> Vec4 {
        Vec4::new(self.x * s, self.y * s, self.z * s, self.w * s)
    }

    pub fn len(self) -> f32 {
        self.dot(self).sqrt()
    }

    pub fn normalize(self) -> Vec4 {
        let l = self.len();
        if l == 0.0 {
            return Vec4::default();
        }
        self.scale(1.0 / l)
    }

    pub fn lerp(self, end: Vec4, t: f32) -> Vec4 {
        self + (end - self).scale(t)
    }
}

impl Add for Vec4 {
    type Output = Vec4;
    fn add(self, o: Vec4) -> Vec4 {
        Vec4::new(self.x + o.x, self.y + o.y, self.z + o.z, self.w + o.w)
    }
}

impl Sub for Vec4 {
    type Output = Vec4;
    fn sub(self, o: Vec4) -> Vec4 {
        Vec4::new(self.x - o.x, self.y - o.y, self.z - o.z, self.w - o.w)
    }
}

/// 4x4 matrix, column-major (`m[col * 4 + row]`)
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Mat4 {
    pub m: [f32; 16],
}

impl Default for Mat4 {
    fn default() -> Self {
        Self::IDENTITY
    }
}

impl Mat4 {
    pub const IDENTITY: Mat4 = Mat4 {
        m: [
            1.0, 0.0, 0.0, 0.0,
            0.0, 1.0, 0.0, 0.0,
            0.0, 0.0, 1.0, 0.0,
            0.0, 0.0, 0.0, 1.0,
        ],
    };

    pub fn from_cols(m: [f32; 16]) -> Self {
        Self { m }
    }

    /// Element at (row, col)
    pub fn at(&self, row: usize, col: usize) -> f32 {
        self.m[col * 4 + row]
    }

    /// `self * rhs`
    pub fn multiply(&self, rhs: &Mat4) -> Mat4 {
        let mut out = [0.0; 16];
        for col in 0..4 {
            for row in 0..4 {
                let mut sum = 0.0;
                for k in 0..4 {
                    sum += self.m[k * 4 + row] * rhs.m[col * 4 + k];
                }
                out[col * 4 + row] = sum;
            }
        }
        Mat4 { m: out }
    }

    pub fn multiply_vec4(&self, v: Vec4) -> Vec4 {
        let m = &self.m;
        Vec4 {
            x: v.x * m[0] + v.y * m[4] + v.z * m[8] + v.w * m[12],
            y: v.x * m[1] + v.y * m[5] + v.z * m[9] + v.w * m[13],
            z: v.x * m[2] + v.y * m[6] + v.z * m[10] + v.w * m[14],
            w: v.x * m[3] + v.y * m[7] + v.z * m[11] + v.w * m[15],
        }
    }

    pub fn transpose(&self) -> Mat4 {
        let mut out = [0.0; 16];
        for col in 0..4 {
            for row in 0..4 {
                out[row * 4 + col] = self.m[col * 4 + row];
            }
        }
        Mat4 { m: out }
    }

    /// Cofactor expansion inverse. Returns `None` only when the determinant
    /// is exactly zero.
    pub fn inverse(&self) -> Option<Mat4> {
        let m = &self.m;
        let mut inv = [0.0f32; 16];

        inv[0] = m[5] * m[10] * m[15] - m[5] * m[11] * m[14] - m[9] * m[6] * m[15]
            + m[9] * m[7] * m[14] + m[13] * m[6] * m[11] - m[13] * m[7] * m[10];
        inv[4] = -m[4] * m[10] * m[15] + m[4] * m[11] * m[14] + m[8] * m[6] * m[15]
            - m[8] * m[7] * m[14] - m[12] * m[6] * m[11] + m[12] * m[7] * m[10];
        inv[8] = m[4] * m[9] * m[15] - m[4] * m[11] * m[13] - m[8] * m[5] * m[15]
            + m[8] * m[7] * m[13] + m[12] * m[5] * m[11] - m[12] * m[7] * m[9];
        inv[12] = -m[4] * m[9] * m[14] + m[4] * m[10] * m[13] + m[8] * m[5] * m[14]
            - m[8] * m[6] * m[13] - m[12] * m[5] * m[10] + m[12] * m[6] * m[9];
        inv[1] = -m[1] * m[10] * m[15] + m[1] * m[11] * m[14] + m[9] * m[2] * m[15]
            - m[9] * m[3] * m[14] - m[13] * m[2] * m[11] + m[13] * m[3] * m[10];
        inv[5] = m[0] * m[10] * m[15] - m[0] * m[11] * m[14] - m[8] * m[2] * m[15]
            + m[8] * m[3] * m[14] + m[12] * m[2] * m[11] - m[12] * m[3] * m[10];
        inv[9] = -m[0] * m[9] * m[15] + m[0] * m[11] * m[13] + m[8] * m[1] * m[15]
            - m[8] * m[3] * m[13] - m[12] * m[1] * m[11] + m[12] * m[3] * m[9];
        inv[13] = m[0] * m[9] * m[14] - m[0] * m[10] * m[13] - m[8] * m[1] * m[14]
            + m[8] * m[2] * m[13] + m[12] * m[1] * m[10] - m[12] * m[2] * m[9];
        inv[2] = m[1] * m[6] * m[15] - m[1] * m[7] * m[14] - m[5] * m[2] * m[15]
            + m[5] * m[3] * m[14] + m[13] * m[2] * m[7] - m[13] * m[3] * m[6];
        inv[6] = -m[0] * m[6] * m[15] + m[0] * m[7] * m[14] + m[4] * m[2] * m[15]
            - m[4] * m[3] * m[14] - m[12] * m[2] * m[7] + m[12] * m[3] * m[6];
        inv[10] = m[0] * m[5] * m[15] - m[0] * m[7] * m[13] - m[4] * m[1] * m[15]
            + m[4] * m[3] * m[13] + m[12] * m[1] * m[7] - m[12] * m[3] * m[5];
        inv[14] = -m[0] * m[5] * m[14] + m[0] * m[6] * m[13] + m[4] * m[1] * m[14]
            - m[4] * m[2] * m[13] - m[12] * m[1] * m[6] + m[12] * m[2] * m[5];
        inv[3] = -m[1] * m[6] * m[11] + m[1] * m[7] * m[10] + m[5] * m[2] * m[11]
            - m[5] * m[3] * m[10] - m[9] * m[2] * m[7] + m[9] * m[3] * m[6];
        inv[7] = m[0] * m[6] * m[11] - m[0] * m[7] * m[10] - m[4] * m[2] * m[11]
            + m[4] * m[3] * m[10] + m[8] * m[2] * m[7] - m[8] * m[3] * m[6];
        inv[11] = -m[0] * m[5] * m[11] + m[0] * m[7] * m[9] + m[4] * m[1] * m[11]
            - m[4] * m[3] * m[9] - m[8] * m[1] * m[7] + m[8] * m[3] * m[5];
        inv[15] = m[0] * m[5] * m[10] - m[0] * m[6] * m[9] - m[4] * m[1] * m[10]
            + m[4] * m[2] * m[9] + m[8] * m[1] * m[6] - m[8] * m[2] * m[5];

        let det = m[0] * inv[0] + m[1] * inv[4] + m[2] * inv[8] + m[3] * inv[12];
        if det == 0.0 {
            return None;
        }

        let inv_det = 1.0 / det;
        for v in inv.iter_mut() {
            *v *= inv_det;
        }
        Some(Mat4 { m: inv })
    }

    pub fn inverse_transpose(&self) -> Option<Mat4> {
        self.inverse().map(|inv| inv.transpose())
    }

    pub fn translate(&self, v: Vec3) -> Mat4 {
        self.multiply(&Mat4::from_cols([
            1.0, 0.0, 0.0, 0.0,
            0.0, 1.0, 0.0, 0.0,
            0.0, 0.0, 1.0, 0.0,
            v.x, v.y, v.z, 1.0,
        ]))
    }

    pub fn scale(&self, v: Vec3) -> Mat4 {
        self.multiply(&Mat4::from_cols([
            v.x, 0.0, 0.0, 0.0,
            0.0, v.y, 0.0, 0.0,
            0.0, 0.0, v.z, 0.0,
            0.0, 0.0, 0.0, 1.0,
        ]))
    }

    /// Rotate around a unit axis (right-handed, counter-clockwise looking down the axis)
    pub fn rotate(&self, radians: f32, axis: Vec3) -> Mat4 {
        let (x, y, z) = (axis.x, axis.y, axis.z);
        let (s, c) = radians.sin_cos();
        let t = 1.0 - c;

        self.multiply(&Mat4::from_cols([
            c + x * x * t,     y * x * t + z * s, z * x * t - y * s, 0.0,
            x * y * t - z * s, c + y * y * t,     z * y * t + x * s, 0.0,
            x * z * t + y * s, y * z * t - x * s, c + z * z * t,     0.0,
            0.0,               0.0,               0.0,               1.0,
        ]))
    }

    pub fn rotate_x(&self, radians: f32) -> Mat4 {
        self.rotate(radians, Vec3::X)
    }

    pub fn rotate_y(&self, radians: f32) -> Mat4 {
        self.rotate(radians, Vec3::Y)
    }

    pub fn rotate_z(&self, radians: f32) -> Mat4 {
        self.rotate(radians, Vec3::Z)
    }

    /// OpenGL-style perspective projection (camera looks down -Z, NDC z in [-1, 1])
    pub fn perspective(&self, fov_radians: f32, aspect: f32, near: f32, far: f32) -> Mat4 {
        let f = 1.0 / (fov_radians / 2.0).tan();
        self.multiply(&Mat4::from_cols([
            f / aspect, 0.0, 0.0, 0.0,
            0.0, f, 0.0, 0.0,
            0.0, 0.0, -(far + near) / (far - near), -1.0,
            0.0, 0.0, -2.0 * near * far / (far - near), 0.0,
        ]))
    }

    pub fn orthographic(&self, left: f32, right: f32, bottom: f32, top: f32, near: f32, far: f32) -> Mat4 {
        self.scale(Vec3::new(2.0 / (right - left), 2.0 / (top - bottom), -2.0 / (far - near)))
            .translate(Vec3::new(-(right + left) / 2.0, -(top + bottom) / 2.0, (far + near) / 2.0))
    }
}

impl Mul for Mat4 {
    type Output = Mat4;
    fn mul(self, rhs: Mat4) -> Mat4 {
        self.multiply(&rhs)
    }
}

impl Mul<Vec4> for Mat4 {
    type Output = Vec4;
    fn mul(self, v: Vec4) -> Vec4 {
        self.multiply_vec4(v)
    }
}

/// Calculate barycentric coordinates for point (px, py) in the 2D triangle (v1, v2, v3).
/// Returns (u, v, w) with u + v + w = 1; all non-negative when the point is inside.
/// Callers must reject zero-area triangles first.
pub fn barycentric(px: f32, py: f32, v1: Vec3, v2: Vec3, v3: Vec3) -> Vec3 {
    let d = (v2.y - v3.y) * (v1.x - v3.x) + (v3.x - v2.x) * (v1.y - v3.y);

    let u = ((v2.y - v3.y) * (px - v3.x) + (v3.x - v2.x) * (py - v3.y)) / d;
    let v = ((v3.y - v1.y) * (px - v3.x) + (v1.x - v3.x) * (py - v3.y)) / d;
    let w = 1.0 - u - v;

    Vec3::new(u, v, w)
}

/// Rotation quaternion (x, y, z vector part, w scalar part)
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Quat {
    pub x: f32,
    pub y: f32,
    pub z: f32,
    pub w: f32,
}

impl Default for Quat {
    fn default() -> Self {
        Self::IDENTITY
    }
}

impl Quat {
    pub const IDENTITY: Quat = Quat { x: 0.0, y: 0.0, z: 0.0, w: 1.0 };

    pub fn from_axis_angle(axis: Vec3, radians: f32) -> Self {
        let (s, c) = (radians / 2.0).sin_cos();
        let a = axis.normalize();
        Self { x: a.x * s, y: a.y * s, z: a.z * s, w: c }
    }

    pub fn len(self) -> f32 {
        (self.x * self.x + self.y * self.y + self.z * self.z + self.w * self.w).sqrt()
    }

    pub fn normalize(self) -> Quat {
        let l = self.len();
        if l == 0.0 {
            return Quat::IDENTITY;
        }
        Quat { x: self.x / l, y: self.y / l, z: self.z / l, w: self.w / l }
    }

    pub fn conjugate(self) -> Quat {
        Quat { x: -self.x, y: -self.y, z: -self.z, w: self.w }
    }

    /// Hamilton product `self * rhs` (applies `rhs` first)
    pub fn multiply(self, r: Quat) -> Quat {
        Quat {
            x: self.w * r.x + self.x * r.w + self.y * r.z - self.z * r.y,
            y: self.w * r.y - self.x * r.z + self.y * r.w + self.z * r.x,
            z: self.w * r.z + self.x * r.y - self.y * r.x + self.z * r.w,
            w: self.w * r.w - self.x * r.x - self.y * r.y - self.z * r.z,
        }
    }

    pub fn rotate(self, v: Vec3) -> Vec3 {
        let p = Quat { x: v.x, y: v.y, z: v.z, w: 0.0 };
        let r = self.multiply(p).multiply(self.conjugate());
        Vec3::new(r.x, r.y, r.z)
    }

    /// Normalized linear interpolation
    pub fn nlerp(self, end: Quat, t: f32) -> Quat {
        // Take the short way around
        let dot = self.x * end.x + self.y * end.y + self.z * end.z + self.w * end.w;
        let end = if dot < 0.0 {
            Quat { x: -end.x, y: -end.y, z: -end.z, w: -end.w }
        } else {
            end
        };
        Quat {
            x: self.x + (end.x - self.x) * t,
            y: self.y + (end.y - self.y) * t,
            z: self.z + (end.z - self.z) * t,
            w: self.w + (end.w - self.w) * t,
        }
        .normalize()
    }

    pub fn to_mat4(self) -> Mat4 {
        let Quat { x, y, z, w } = self.normalize();
        Mat4::from_cols([
            1.0 - 2.0 * (y * y + z * z), 2.0 * (x * y + z * w),       2.0 * (x * z - y * w),       0.0,
            2.0 * (x * y - z * w),       1.0 - 2.0 * (x * x + z * z), 2.0 * (y * z + x * w),       0.0,
            2.0 * (x * z + y * w),       2.0 * (y * z - x * w),       1.0 - 2.0 * (x * x + y * y), 0.0,
            0.0,                         0.0,                         0.0,                         1.0,
        ])
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const EPS: f32 = 1e-5;

    fn mat_close(a: &Mat4, b: &Mat4) -> bool {
        a.m.iter().zip(b.m.iter()).all(|(x, y)| (x - y).abs() < 1e-4)
    }

    #[test]
    fn test_vec3_dot() {
        let a = Vec3::new(1.0, 2.0, 3.0);
        let b = Vec3::new(4.0, 5.0, 6.0);
        assert!((a.dot(b) - 32.0).abs() < 0.001);
    }

    #[test]
    fn test_vec3_cross() {
        let c = Vec3::new(3.0, -3.0, 1.0).cross(Vec3::new(4.0, 9.0, 2.0));
        assert_eq!(c, Vec3::new(-15.0, -2.0, 39.0));
    }

    #[test]
    fn test_barycentric_inside() {
        let v1 = Vec3::new(0.0, 0.0, 0.0);
        let v2 = Vec3::new(10.0, 0.0, 0.0);
        let v3 = Vec3::new(5.0, 10.0, 0.0);
        let bc = barycentric(5.0, 3.0, v1, v2, v3);
        assert!(bc.x >= 0.0 && bc.y >= 0.0 && bc.z >= 0.0);
        assert!((bc.x + bc.y + bc.z - 1.0).abs() < EPS);
    }

    #[test]
    fn test_barycentric_at_vertex() {
        let v1 = Vec3::new(-0.5, -0.5, 0.0);
        let v2 = Vec3::new(0.5, -0.5, 0.0);
        let v3 = Vec3::new(0.0, 0.5, 0.0);
        let bc = barycentric(v2.x, v2.y, v1, v2, v3);
        assert!((bc - Vec3::new(0.0, 1.0, 0.0)).len() < EPS);
    }

    #[test]
    fn test_normalize_zero_stays_zero() {
        assert_eq!(Vec3::ZERO.normalize(), Vec3::ZERO);
    }

    #[test]
    fn test_lerp_endpoints() {
        let a = Vec4::new(1.0, 1.0, 0.0, 0.0);
        let b = Vec4::new(2.0, 2.0, 0.0, 0.0);
        assert_eq!(a.lerp(b, 0.0), a);
        assert_eq!(a.lerp(b, 1.0), b);
        assert_eq!(a.lerp(b, 0.5), Vec4::new(1.5, 1.5, 0.0, 0.0));
    }

    #[test]
    fn test_inverse_round_trip() {
        let m = Mat4::from_cols([
            2.0, 8.0, 12.0, 4.0,
            11.0, 3.0, 5.0, 9.0,
            6.0, 13.0, 14.0, 10.0,
            7.0, 15.0, 16.0, 17.0,
        ]);
        let inv = m.inverse().expect("matrix is invertible");
        assert!(mat_close(&m.multiply(&inv), &Mat4::IDENTITY));
    }

    #[test]
    fn test_singular_inverse_fails() {
        let m = Mat4::IDENTITY.scale(Vec3::new(1.0, 0.0, 1.0));
        assert!(m.inverse().is_none());
        assert!(m.inverse_transpose().is_none());
    }

    #[test]
    fn test_transpose_swaps_rows_and_cols() {
        let m = Mat4::IDENTITY.translate(Vec3::new(1.0, 2.0, 3.0));
        let t = m.transpose();
        assert_eq!(t.at(3, 0), 1.0);
        assert_eq!(t.at(3, 2), 3.0);
        assert_eq!(t.at(0, 3), 0.0);
    }

    #[test]
    fn test_chain_applies_rightmost_first() {
        // scale then translate in call order: translation is applied to the point first
        let m = Mat4::IDENTITY.scale(Vec3::ONE * 2.0).translate(Vec3::new(1.0, 0.0, 0.0));
        let p = m.multiply_vec4(Vec4::new(0.0, 0.0, 0.0, 1.0));
        assert!((p.x - 2.0).abs() < EPS);
    }

    #[test]
    fn test_rotate_y_quarter_turn() {
        let m = Mat4::IDENTITY.rotate_y(std::f32::consts::FRAC_PI_2);
        let p = m * Vec4::new(1.0, 0.0, 0.0, 0.0);
        assert!(p.x.abs() < EPS);
        assert!((p.z + 1.0).abs() < EPS);
    }

    #[test]
    fn test_perspective_maps_near_far_to_ndc() {
        let p = Mat4::IDENTITY.perspective(70f32.to_radians(), 1.0, 1.0, 150.0);
        let near = p * Vec4::new(0.0, 0.0, -1.0, 1.0);
        let far = p * Vec4::new(0.0, 0.0, -150.0, 1.0);
        assert!((near.z / near.w + 1.0).abs() < EPS);
        assert!((far.z / far.w - 1.0).abs() < 1e-4);
    }

    #[test]
    fn test_orthographic_maps_box_to_cube() {
        let o = Mat4::IDENTITY.orthographic(-5.0, 5.0, -5.0, 5.0, 5.0, 15.0);
        let corner = o * Vec4::new(5.0, -5.0, -15.0, 1.0);
        assert!((corner.x - 1.0).abs() < EPS);
        assert!((corner.y + 1.0).abs() < EPS);
        assert!((corner.z - 1.0).abs() < EPS);
    }

    #[test]
    fn test_quat_matches_matrix_rotation() {
        let q = Quat::from_axis_angle(Vec3::Y, 0.7);
        let m = Mat4::IDENTITY.rotate_y(0.7);
        let v = Vec3::new(0.3, -1.0, 2.0);
        let a = q.rotate(v);
        let b = (m * v.extend(0.0)).xyz();
        assert!((a - b).len() < 1e-5);
        assert!(mat_close(&q.to_mat4(), &m));
    }

    #[test]
    fn test_quat_nlerp_endpoints() {
        let a = Quat::IDENTITY;
        let b = Quat::from_axis_angle(Vec3::X, 1.0);
        let end = a.nlerp(b, 1.0);
        assert!((end.x - b.x).abs() < EPS && (end.w - b.w).abs() < EPS);
    }
}
