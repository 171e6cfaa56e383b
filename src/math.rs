use std::ops::{Add, AddAssign, Div, Mul, Neg, Sub};

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Vec3 {
    pub x: f32,
    pub y: f32,
    pub z: f32,
}

impl Vec3 {
    pub const fn new(x: f32, y: f32, z: f32) -> Self {
        Self { x, y, z }
    }

    pub const fn splat(v: f32) -> Self {
        Self::new(v, v, v)
    }

    pub fn dot(self, rhs: Self) -> f32 {
        (self.x * rhs.x) + (self.y * rhs.y) + (self.z * rhs.z)
    }

    pub fn cross(self, rhs: Self) -> Self {
        Self::new(
            (self.y * rhs.z) - (self.z * rhs.y),
            (self.z * rhs.x) - (self.x * rhs.z),
            (self.x * rhs.y) - (self.y * rhs.x),
        )
    }

    pub fn length(self) -> f32 {
        self.dot(self).sqrt()
    }

    pub fn normalize(self) -> Self {
        let len = self.length();
        if len == 0.0 {
            return self;
        }
        self / len
    }

    pub fn abs(self) -> Self {
        Self::new(self.x.abs(), self.y.abs(), self.z.abs())
    }

    pub fn signum(self) -> Self {
        Self::new(self.x.signum(), self.y.signum(), self.z.signum())
    }

    pub fn min(self, rhs: Self) -> Self {
        Self::new(self.x.min(rhs.x), self.y.min(rhs.y), self.z.min(rhs.z))
    }

    pub fn max(self, rhs: Self) -> Self {
        Self::new(self.x.max(rhs.x), self.y.max(rhs.y), self.z.max(rhs.z))
    }

    pub fn max_component(self) -> f32 {
        self.x.max(self.y).max(self.z)
    }

    pub fn min_component(self) -> f32 {
        self.x.min(self.y).min(self.z)
    }

    pub fn lerp(self, rhs: Self, t: f32) -> Self {
        self + ((rhs - self) * t)
    }

    pub fn clamp01(self) -> Self {
        Self::new(
            self.x.clamp(0.0, 1.0),
            self.y.clamp(0.0, 1.0),
            self.z.clamp(0.0, 1.0),
        )
    }

    pub fn is_finite(self) -> bool {
        self.x.is_finite() && self.y.is_finite() && self.z.is_finite()
    }
}

impl Add for Vec3 {
    type Output = Self;
    fn add(self, rhs: Self) -> Self::Output {
        Self::new(self.x + rhs.x, self.y + rhs.y, self.z + rhs.z)
    }
}

impl AddAssign for Vec3 {
    fn add_assign(&mut self, rhs: Self) {
        *self = *self + rhs;
    }
}

impl Sub for Vec3 {
    type Output = Self;
    fn sub(self, rhs: Self) -> Self::Output {
        Self::new(self.x - rhs.x, self.y - rhs.y, self.z - rhs.z)
    }
}

impl Mul<f32> for Vec3 {
    type Output = Self;
    fn mul(self, rhs: f32) -> Self::Output {
        Self::new(self.x * rhs, self.y * rhs, self.z * rhs)
    }
}

impl Mul<Vec3> for Vec3 {
    type Output = Self;
    fn mul(self, rhs: Vec3) -> Self::Output {
        Self::new(self.x * rhs.x, self.y * rhs.y, self.z * rhs.z)
    }
}

impl Div<f32> for Vec3 {
    type Output = Self;
    fn div(self, rhs: f32) -> Self::Output {
        Self::new(self.x / rhs, self.y / rhs, self.z / rhs)
    }
}

impl Div<Vec3> for Vec3 {
    type Output = Self;
    fn div(self, rhs: Vec3) -> Self::Output {
        Self::new(self.x / rhs.x, self.y / rhs.y, self.z / rhs.z)
    }
}

impl Neg for Vec3 {
    type Output = Self;
    fn neg(self) -> Self::Output {
        Self::new(-self.x, -self.y, -self.z)
    }
}

/// Unit quaternion used for composing rotations.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Quat {
    pub x: f32,
    pub y: f32,
    pub z: f32,
    pub w: f32,
}

impl Quat {
    pub const IDENTITY: Self = Self {
        x: 0.0,
        y: 0.0,
        z: 0.0,
        w: 1.0,
    };

    pub fn from_axis_angle(axis: Vec3, angle: f32) -> Self {
        let (s, c) = (angle * 0.5).sin_cos();
        let a = axis.normalize();
        Self {
            x: a.x * s,
            y: a.y * s,
            z: a.z * s,
            w: c,
        }
    }

    /// Three axis-angle rotations composed in X, Y, Z order.
    pub fn from_euler_xyz(angles: Vec3) -> Self {
        Self::from_axis_angle(Vec3::new(1.0, 0.0, 0.0), angles.x)
            * Self::from_axis_angle(Vec3::new(0.0, 1.0, 0.0), angles.y)
            * Self::from_axis_angle(Vec3::new(0.0, 0.0, 1.0), angles.z)
    }
}

impl Mul for Quat {
    type Output = Self;
    fn mul(self, rhs: Self) -> Self::Output {
        Self {
            x: (self.w * rhs.x) + (self.x * rhs.w) + (self.y * rhs.z) - (self.z * rhs.y),
            y: (self.w * rhs.y) - (self.x * rhs.z) + (self.y * rhs.w) + (self.z * rhs.x),
            z: (self.w * rhs.z) + (self.x * rhs.y) - (self.y * rhs.x) + (self.z * rhs.w),
            w: (self.w * rhs.w) - (self.x * rhs.x) - (self.y * rhs.y) - (self.z * rhs.z),
        }
    }
}

/// Column-major 4x4 matrix. Only the rigid subset (rotation + translation)
/// is ever constructed, which keeps the inverse exact.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Mat4 {
    pub cols: [[f32; 4]; 4],
}

impl Mat4 {
    pub const IDENTITY: Self = Self {
        cols: [
            [1.0, 0.0, 0.0, 0.0],
            [0.0, 1.0, 0.0, 0.0],
            [0.0, 0.0, 1.0, 0.0],
            [0.0, 0.0, 0.0, 1.0],
        ],
    };

    pub fn from_translation(t: Vec3) -> Self {
        let mut m = Self::IDENTITY;
        m.cols[3] = [t.x, t.y, t.z, 1.0];
        m
    }

    pub fn from_quat(q: Quat) -> Self {
        let (x, y, z, w) = (q.x, q.y, q.z, q.w);
        let (x2, y2, z2) = (x + x, y + y, z + z);
        Self {
            cols: [
                [
                    1.0 - (y * y2) - (z * z2),
                    (x * y2) + (w * z2),
                    (x * z2) - (w * y2),
                    0.0,
                ],
                [
                    (x * y2) - (w * z2),
                    1.0 - (x * x2) - (z * z2),
                    (y * z2) + (w * x2),
                    0.0,
                ],
                [
                    (x * z2) + (w * y2),
                    (y * z2) - (w * x2),
                    1.0 - (x * x2) - (y * y2),
                    0.0,
                ],
                [0.0, 0.0, 0.0, 1.0],
            ],
        }
    }

    pub fn from_axis_angle(axis: Vec3, angle: f32) -> Self {
        Self::from_quat(Quat::from_axis_angle(axis, angle))
    }

    /// Apply to a point (w = 1).
    pub fn transform_point(&self, p: Vec3) -> Vec3 {
        self.transform_vector(p) + Vec3::new(self.cols[3][0], self.cols[3][1], self.cols[3][2])
    }

    /// Apply to a direction (w = 0).
    pub fn transform_vector(&self, v: Vec3) -> Vec3 {
        Vec3::new(
            (self.cols[0][0] * v.x) + (self.cols[1][0] * v.y) + (self.cols[2][0] * v.z),
            (self.cols[0][1] * v.x) + (self.cols[1][1] * v.y) + (self.cols[2][1] * v.z),
            (self.cols[0][2] * v.x) + (self.cols[1][2] * v.y) + (self.cols[2][2] * v.z),
        )
    }

    /// Inverse of a rotation + translation matrix: transpose the rotation
    /// block, counter-rotate the translation.
    pub fn inverse_rigid(&self) -> Self {
        let r = [
            [self.cols[0][0], self.cols[1][0], self.cols[2][0], 0.0],
            [self.cols[0][1], self.cols[1][1], self.cols[2][1], 0.0],
            [self.cols[0][2], self.cols[1][2], self.cols[2][2], 0.0],
        ];
        let t = Vec3::new(self.cols[3][0], self.cols[3][1], self.cols[3][2]);
        let mut inv = Self {
            cols: [r[0], r[1], r[2], [0.0, 0.0, 0.0, 1.0]],
        };
        let it = -inv.transform_vector(t);
        inv.cols[3] = [it.x, it.y, it.z, 1.0];
        inv
    }
}

impl Mul for Mat4 {
    type Output = Self;
    fn mul(self, rhs: Self) -> Self::Output {
        let mut out = [[0.0f32; 4]; 4];
        for (col, out_col) in rhs.cols.iter().zip(out.iter_mut()) {
            for (row, cell) in out_col.iter_mut().enumerate() {
                *cell = (self.cols[0][row] * col[0])
                    + (self.cols[1][row] * col[1])
                    + (self.cols[2][row] * col[2])
                    + (self.cols[3][row] * col[3]);
            }
        }
        Self { cols: out }
    }
}

#[derive(Clone, Copy, Debug)]
pub struct Ray {
    pub origin: Vec3,
    pub direction: Vec3,
}

impl Ray {
    pub fn new(origin: Vec3, direction: Vec3) -> Self {
        Self { origin, direction }
    }

    pub fn at(self, t: f32) -> Vec3 {
        self.origin + (self.direction * t)
    }
}

pub fn reflect(direction: Vec3, normal: Vec3) -> Vec3 {
    direction - (normal * (2.0 * direction.dot(normal)))
}

/// Snell refraction. Returns `None` on total internal reflection.
pub fn refract(direction: Vec3, normal: Vec3, eta: f32) -> Option<Vec3> {
    let cos_i = (-direction).dot(normal).clamp(-1.0, 1.0);
    let k = 1.0 - (eta * eta * (1.0 - (cos_i * cos_i)));
    if k < 0.0 {
        None
    } else {
        Some((direction * eta) + (normal * ((eta * cos_i) - k.sqrt())))
    }
}

pub fn mix(a: f32, b: f32, t: f32) -> f32 {
    a + ((b - a) * t)
}

#[cfg(test)]
mod tests {
    use super::*;

    const EPS: f32 = 1e-5;

    fn assert_vec3_near(a: Vec3, b: Vec3, tolerance: f32) {
        assert!((a - b).length() < tolerance, "expected {b:?}, got {a:?}");
    }

    #[test]
    fn reflects_across_surface_normal() {
        let incoming = Vec3::new(1.0, -1.0, 0.0).normalize();
        let bounced = reflect(incoming, Vec3::new(0.0, 1.0, 0.0));
        assert_vec3_near(bounced, Vec3::new(1.0, 1.0, 0.0).normalize(), EPS);
    }

    #[test]
    fn refraction_bends_toward_normal_entering_dense_medium() {
        let incoming = Vec3::new(1.0, -1.0, 0.0).normalize();
        let normal = Vec3::new(0.0, 1.0, 0.0);
        let bent = refract(incoming, normal, 1.0 / 1.5).expect("no TIR entering glass");
        // Angle to the normal must shrink inside the denser medium.
        assert!((-bent.normalize().y) > (-incoming.y));
    }

    #[test]
    fn refraction_reports_total_internal_reflection() {
        let grazing = Vec3::new(1.0, -0.1, 0.0).normalize();
        assert!(refract(grazing, Vec3::new(0.0, 1.0, 0.0), 1.5).is_none());
    }

    #[test]
    fn euler_rotation_matches_single_axis() {
        let angle = 0.7;
        let combined = Quat::from_euler_xyz(Vec3::new(0.0, angle, 0.0));
        let single = Quat::from_axis_angle(Vec3::new(0.0, 1.0, 0.0), angle);
        let p = Vec3::new(0.3, -1.2, 2.0);
        assert_vec3_near(
            Mat4::from_quat(combined).transform_point(p),
            Mat4::from_quat(single).transform_point(p),
            EPS,
        );
    }

    #[test]
    fn rigid_inverse_round_trips_points() {
        let m = Mat4::from_translation(Vec3::new(1.0, -2.0, 0.5))
            * Mat4::from_quat(Quat::from_euler_xyz(Vec3::new(0.4, 1.1, -0.2)));
        let p = Vec3::new(-0.7, 3.0, 1.25);
        assert_vec3_near(m.inverse_rigid().transform_point(m.transform_point(p)), p, 1e-4);
    }

    #[test]
    fn rotation_about_y_maps_z_to_x() {
        let m = Mat4::from_axis_angle(Vec3::new(0.0, 1.0, 0.0), std::f32::consts::FRAC_PI_2);
        assert_vec3_near(
            m.transform_vector(Vec3::new(0.0, 0.0, 1.0)),
            Vec3::new(1.0, 0.0, 0.0),
            EPS,
        );
    }

    #[test]
    fn ray_evaluates_along_direction() {
        let ray = Ray::new(Vec3::new(1.0, 0.0, 0.0), Vec3::new(0.0, 0.0, 1.0));
        assert_vec3_near(ray.at(2.5), Vec3::new(1.0, 0.0, 2.5), EPS);
    }
}
