//! Distance fields for the shape primitives.

use crate::math::Vec3;

pub fn sd_sphere(p: Vec3, radius: f32) -> f32 {
    p.length() - radius
}

pub fn sd_plane(p: Vec3, normal: Vec3, offset: f32) -> f32 {
    p.dot(normal) + offset
}

pub fn sd_torus(p: Vec3, major: f32, minor: f32) -> f32 {
    let ring = ((p.x * p.x) + (p.z * p.z)).sqrt() - major;
    ((ring * ring) + (p.y * p.y)).sqrt() - minor
}

pub fn sd_box(p: Vec3, half_extents: Vec3) -> f32 {
    let q = p.abs() - half_extents;
    let outside = q.max(Vec3::splat(0.0));
    outside.length() + q.max_component().min(0.0)
}

/// Triangle with the edge data the distance query needs precomputed once at
/// construction.
#[derive(Clone, Copy, Debug)]
pub struct Triangle {
    v0: Vec3,
    v1: Vec3,
    v2: Vec3,
    e0: Vec3,
    e1: Vec3,
    e2: Vec3,
    normal: Vec3,
    c0: Vec3,
    c1: Vec3,
    c2: Vec3,
    inv_e0: f32,
    inv_e1: f32,
    inv_e2: f32,
    inv_n: f32,
}

// Sheet primitives are given a hair of thickness so sphere tracing can
// register a hit on either side.
const TRIANGLE_SKIN: f32 = 0.001;

impl Triangle {
    pub fn new(v0: Vec3, v1: Vec3, v2: Vec3) -> Self {
        let e0 = v1 - v0;
        let e1 = v2 - v1;
        let e2 = v0 - v2;
        let normal = e0.cross(e2).normalize();
        Self {
            v0,
            v1,
            v2,
            e0,
            e1,
            e2,
            normal,
            c0: e0.cross(normal),
            c1: e1.cross(normal),
            c2: e2.cross(normal),
            inv_e0: 1.0 / e0.dot(e0),
            inv_e1: 1.0 / e1.dot(e1),
            inv_e2: 1.0 / e2.dot(e2),
            inv_n: 1.0 / normal.dot(normal),
        }
    }

    pub fn distance(&self, p: Vec3) -> f32 {
        let p0 = p - self.v0;
        let p1 = p - self.v1;
        let p2 = p - self.v2;

        // Outside the triangle's prism the closest feature is an edge,
        // otherwise it is the face plane.
        let value = if (sign(self.c0.dot(p0)) + sign(self.c1.dot(p1)) + sign(self.c2.dot(p2))) < 2.0
        {
            let d0 = ((self.e0 * (self.e0.dot(p0) * self.inv_e0).clamp(0.0, 1.0)) - p0).length();
            let d1 = ((self.e1 * (self.e1.dot(p1) * self.inv_e1).clamp(0.0, 1.0)) - p1).length();
            let d2 = ((self.e2 * (self.e2.dot(p2) * self.inv_e2).clamp(0.0, 1.0)) - p2).length();
            d0.min(d1).min(d2)
        } else {
            let n = self.normal.dot(p0);
            (n * n * self.inv_n).sqrt()
        };

        value - TRIANGLE_SKIN
    }
}

fn sign(v: f32) -> f32 {
    if v > 0.0 {
        1.0
    } else if v < 0.0 {
        -1.0
    } else {
        0.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sphere_distance_is_radial() {
        assert_eq!(sd_sphere(Vec3::splat(0.0), 0.5), -0.5);
        assert_eq!(sd_sphere(Vec3::new(0.5, 0.0, 0.0), 0.5), 0.0);
        assert_eq!(sd_sphere(Vec3::new(0.0, 2.0, 0.0), 0.5), 1.5);
    }

    #[test]
    fn plane_distance_is_affine() {
        let n = Vec3::new(0.0, -1.0, 0.0);
        assert_eq!(sd_plane(Vec3::new(3.0, 1.0, -2.0), n, 1.0), 0.0);
        assert_eq!(sd_plane(Vec3::new(0.0, 0.0, 0.0), n, 1.0), 1.0);
        assert_eq!(sd_plane(Vec3::new(0.0, 2.0, 0.0), n, 1.0), -1.0);
    }

    #[test]
    fn torus_distance_vanishes_on_the_ring_surface() {
        // Point on the outer equator of the tube.
        let d = sd_torus(Vec3::new(0.6, 0.0, 0.0), 0.5, 0.1);
        assert!(d.abs() < 1e-6);
        // Ring center line is minor-radius away from the surface.
        let d = sd_torus(Vec3::new(0.5, 0.0, 0.0), 0.5, 0.1);
        assert!((d + 0.1).abs() < 1e-6);
    }

    #[test]
    fn box_distance_inside_and_out() {
        let half = Vec3::splat(0.5);
        assert_eq!(sd_box(Vec3::splat(0.0), half), -0.5);
        assert_eq!(sd_box(Vec3::new(1.0, 0.0, 0.0), half), 0.5);
        // Corner distance is the euclidean offset from the corner.
        let corner = sd_box(Vec3::new(1.0, 1.0, 1.0), half);
        assert!((corner - (3.0f32).sqrt() * 0.5).abs() < 1e-6);
    }

    #[test]
    fn triangle_face_distance_is_plane_distance() {
        let tri = Triangle::new(
            Vec3::new(-1.0, 0.0, -1.0),
            Vec3::new(1.0, 0.0, -1.0),
            Vec3::new(0.0, 0.0, 1.0),
        );
        let above = tri.distance(Vec3::new(0.0, 0.7, 0.0));
        assert!((above - (0.7 - 0.001)).abs() < 1e-5);
    }

    #[test]
    fn triangle_edge_distance_beyond_the_prism() {
        let tri = Triangle::new(
            Vec3::new(-1.0, 0.0, 0.0),
            Vec3::new(1.0, 0.0, 0.0),
            Vec3::new(0.0, 0.0, 1.0),
        );
        // Two units past the v0-v1 edge, in the triangle plane.
        let d = tri.distance(Vec3::new(0.0, 0.0, -2.0));
        assert!((d - (2.0 - 0.001)).abs() < 1e-5);
    }
}
