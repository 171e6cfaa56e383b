//! CSG trees over signed distance functions.
//!
//! A scene object is a tree of [`Node`]s: shape primitives at the leaves,
//! unary modifiers and binary set operations above them. Subtrees are shared
//! through [`NodeRef`] handles and immutable after construction, so the
//! renderer reads them from every worker thread without synchronisation.

pub mod ops;
pub mod shapes;

use std::sync::Arc;

use crate::material::Material;
use crate::math::{Mat4, Quat, Vec3};

use ops::{difference_blend, intersection_blend, union_blend};
use shapes::{sd_box, sd_plane, sd_sphere, sd_torus, Triangle};

pub type NodeRef = Arc<Node>;

/// Distance and material of a field sampled at one point.
///
/// The material is only meaningful when the distance is within hit
/// tolerance; a miss carries the default material.
#[derive(Clone, Copy, Debug)]
pub struct Sample {
    pub distance: f32,
    pub material: Material,
}

impl Sample {
    pub fn miss() -> Self {
        Self {
            distance: f32::INFINITY,
            material: Material::default(),
        }
    }
}

#[derive(Debug)]
pub enum Node {
    /// The neutral element: infinitely far away everywhere.
    Empty,
    Sphere {
        radius: f32,
        material: Material,
    },
    Plane {
        normal: Vec3,
        offset: f32,
        material: Material,
    },
    Torus {
        major: f32,
        minor: f32,
        material: Material,
    },
    Box {
        half_extents: Vec3,
        material: Material,
    },
    Triangle {
        shape: Triangle,
        material: Material,
    },
    Transform {
        child: NodeRef,
        inverse: Mat4,
        scale: Vec3,
    },
    Round {
        child: NodeRef,
        radius: f32,
    },
    Onion {
        child: NodeRef,
        thickness: f32,
    },
    Elongate {
        child: NodeRef,
        amount: Vec3,
    },
    Union {
        a: NodeRef,
        b: NodeRef,
        smoothing: Option<f32>,
    },
    Difference {
        a: NodeRef,
        b: NodeRef,
        smoothing: Option<f32>,
    },
    Intersection {
        a: NodeRef,
        b: NodeRef,
        smoothing: Option<f32>,
    },
}

impl Node {
    pub fn empty() -> Node {
        Node::Empty
    }

    pub fn sphere(radius: f32) -> Node {
        Node::Sphere {
            radius,
            material: Material::default(),
        }
    }

    pub fn plane(normal: Vec3, offset: f32) -> Node {
        Node::Plane {
            normal,
            offset,
            material: Material::default(),
        }
    }

    pub fn torus(major: f32, minor: f32) -> Node {
        Node::Torus {
            major,
            minor,
            material: Material::default(),
        }
    }

    pub fn cuboid(half_extents: Vec3) -> Node {
        Node::Box {
            half_extents,
            material: Material::default(),
        }
    }

    pub fn triangle(v0: Vec3, v1: Vec3, v2: Vec3) -> Node {
        Node::Triangle {
            shape: Triangle::new(v0, v1, v2),
            material: Material::default(),
        }
    }

    /// Assign a material to a primitive. Operators have no material of their
    /// own (they derive one from their children), so this is a no-op on them.
    pub fn with_material(mut self, material: Material) -> Node {
        match &mut self {
            Node::Sphere { material: m, .. }
            | Node::Plane { material: m, .. }
            | Node::Torus { material: m, .. }
            | Node::Box { material: m, .. }
            | Node::Triangle { material: m, .. } => *m = material,
            _ => {}
        }
        self
    }

    /// Signed distance from `p` to the surface this subtree represents.
    /// Negative inside, positive outside.
    pub fn distance(&self, p: Vec3) -> f32 {
        match self {
            Node::Empty => f32::INFINITY,
            Node::Sphere { radius, .. } => sd_sphere(p, *radius),
            Node::Plane { normal, offset, .. } => sd_plane(p, *normal, *offset),
            Node::Torus { major, minor, .. } => sd_torus(p, *major, *minor),
            Node::Box { half_extents, .. } => sd_box(p, *half_extents),
            Node::Triangle { shape, .. } => shape.distance(p),
            Node::Transform {
                child,
                inverse,
                scale,
            } => child.distance(inverse.transform_point(p / *scale)) / scale.min_component(),
            Node::Round { child, radius } => child.distance(p) - radius,
            Node::Onion { child, thickness } => child.distance(p).abs() - thickness,
            Node::Elongate { child, amount } => {
                let q = p.abs() - *amount;
                child.distance(p.signum() * q.max(Vec3::splat(0.0)))
                    + q.max_component().min(0.0)
            }
            Node::Union { a, b, smoothing } => {
                let (da, db) = (a.distance(p), b.distance(p));
                match smoothing {
                    Some(k) => union_blend(da, db, *k).0,
                    None => da.min(db),
                }
            }
            Node::Difference { a, b, smoothing } => {
                let (da, db) = (a.distance(p), b.distance(p));
                match smoothing {
                    Some(k) => difference_blend(da, db, *k).0,
                    None => (-db).max(da),
                }
            }
            Node::Intersection { a, b, smoothing } => {
                let (da, db) = (a.distance(p), b.distance(p));
                match smoothing {
                    Some(k) => intersection_blend(da, db, *k).0,
                    None => da.max(db),
                }
            }
        }
    }

    /// Distance plus the effective material at `p`.
    ///
    /// Primitives report their own material, unary modifiers forward the
    /// child's, binary operators pick the winning side (hard) or blend with
    /// the same weight as the distance (smooth).
    pub fn sample(&self, p: Vec3) -> Sample {
        match self {
            Node::Empty => Sample::miss(),
            Node::Sphere { material, .. }
            | Node::Plane { material, .. }
            | Node::Torus { material, .. }
            | Node::Box { material, .. }
            | Node::Triangle { material, .. } => Sample {
                distance: self.distance(p),
                material: *material,
            },
            Node::Transform {
                child,
                inverse,
                scale,
            } => {
                let mut sample = child.sample(inverse.transform_point(p / *scale));
                sample.distance /= scale.min_component();
                sample
            }
            Node::Round { child, radius } => {
                let mut sample = child.sample(p);
                sample.distance -= radius;
                sample
            }
            Node::Onion { child, thickness } => {
                let mut sample = child.sample(p);
                sample.distance = sample.distance.abs() - thickness;
                sample
            }
            Node::Elongate { child, amount } => {
                let q = p.abs() - *amount;
                let mut sample = child.sample(p.signum() * q.max(Vec3::splat(0.0)));
                sample.distance += q.max_component().min(0.0);
                sample
            }
            Node::Union { a, b, smoothing } => {
                let (sa, sb) = (a.sample(p), b.sample(p));
                match smoothing {
                    Some(k) => {
                        let (value, h) = union_blend(sa.distance, sb.distance, *k);
                        Sample {
                            distance: value,
                            material: Material::mix(&sb.material, &sa.material, h),
                        }
                    }
                    None => {
                        if sa.distance < sb.distance {
                            sa
                        } else {
                            sb
                        }
                    }
                }
            }
            Node::Difference { a, b, smoothing } => {
                let (sa, sb) = (a.sample(p), b.sample(p));
                match smoothing {
                    Some(k) => {
                        let (value, h) = difference_blend(sa.distance, sb.distance, *k);
                        Sample {
                            distance: value,
                            material: Material::mix(&sa.material, &sb.material, h),
                        }
                    }
                    None => Sample {
                        distance: (-sb.distance).max(sa.distance),
                        material: sa.material,
                    },
                }
            }
            Node::Intersection { a, b, smoothing } => {
                let (sa, sb) = (a.sample(p), b.sample(p));
                match smoothing {
                    Some(k) => {
                        let (value, h) = intersection_blend(sa.distance, sb.distance, *k);
                        Sample {
                            distance: value,
                            material: Material::mix(&sa.material, &sb.material, h),
                        }
                    }
                    None => {
                        if sb.distance > sa.distance {
                            sb
                        } else {
                            sa
                        }
                    }
                }
            }
        }
    }

    /// Field gradient direction at `p`, estimated with four tetrahedral
    /// taps. Valid off-surface too, where it tracks the field gradient.
    pub fn normal(&self, p: Vec3, epsilon: f32) -> Vec3 {
        const K: f32 = 0.5773;
        let taps = [
            Vec3::new(K, -K, -K),
            Vec3::new(-K, -K, K),
            Vec3::new(-K, K, -K),
            Vec3::new(K, K, K),
        ];
        let mut gradient = Vec3::splat(0.0);
        for offset in taps {
            gradient += offset * self.distance(p + (offset * epsilon));
        }
        gradient.normalize()
    }
}

/// Union of two trees. A [`Node::Round`] operand is folded into the
/// operator's smoothing factor, additively when both operands are rounded.
pub fn union(a: impl Into<NodeRef>, b: impl Into<NodeRef>) -> NodeRef {
    let (a, b, smoothing) = fold_rounding(a.into(), b.into());
    Arc::new(Node::Union { a, b, smoothing })
}

/// Subtract `b` from `a`. Rounded operands fold as for [`union`].
pub fn difference(a: impl Into<NodeRef>, b: impl Into<NodeRef>) -> NodeRef {
    let (a, b, smoothing) = fold_rounding(a.into(), b.into());
    Arc::new(Node::Difference { a, b, smoothing })
}

/// Intersection of two trees. Rounded operands fold as for [`union`].
pub fn intersection(a: impl Into<NodeRef>, b: impl Into<NodeRef>) -> NodeRef {
    let (a, b, smoothing) = fold_rounding(a.into(), b.into());
    Arc::new(Node::Intersection { a, b, smoothing })
}

pub fn smooth_union(a: impl Into<NodeRef>, b: impl Into<NodeRef>, k: f32) -> NodeRef {
    Arc::new(Node::Union {
        a: a.into(),
        b: b.into(),
        smoothing: Some(k),
    })
}

pub fn smooth_difference(a: impl Into<NodeRef>, b: impl Into<NodeRef>, k: f32) -> NodeRef {
    Arc::new(Node::Difference {
        a: a.into(),
        b: b.into(),
        smoothing: Some(k),
    })
}

pub fn smooth_intersection(a: impl Into<NodeRef>, b: impl Into<NodeRef>, k: f32) -> NodeRef {
    Arc::new(Node::Intersection {
        a: a.into(),
        b: b.into(),
        smoothing: Some(k),
    })
}

/// Inflate the surface outward by `radius`. Kept as an explicit node so a
/// later binary operator can subsume it into its smoothing factor.
pub fn round(node: impl Into<NodeRef>, radius: f32) -> NodeRef {
    Arc::new(Node::Round {
        child: node.into(),
        radius,
    })
}

/// Hollow a tree into a shell of the given thickness. Applying it again
/// yields concentric shells.
pub fn onion(node: impl Into<NodeRef>, thickness: f32) -> NodeRef {
    Arc::new(Node::Onion {
        child: node.into(),
        thickness,
    })
}

/// Stretch a tree along each axis by splitting it at the origin.
pub fn elongate(node: impl Into<NodeRef>, amount: Vec3) -> NodeRef {
    Arc::new(Node::Elongate {
        child: node.into(),
        amount,
    })
}

/// Position a tree in the world: translation, XYZ euler rotation, scale.
///
/// Scale is folded into the distance with a conservative `min(scale)`
/// correction, so non-uniform scales keep sphere tracing safe but report
/// approximate distances.
pub fn transform(node: impl Into<NodeRef>, translate: Vec3, rotate: Vec3, scale: Vec3) -> NodeRef {
    let matrix = Mat4::from_translation(translate) * Mat4::from_quat(Quat::from_euler_xyz(rotate));
    Arc::new(Node::Transform {
        child: node.into(),
        inverse: matrix.inverse_rigid(),
        scale,
    })
}

/// Translation-only shorthand for [`transform`].
pub fn translate(node: impl Into<NodeRef>, offset: Vec3) -> NodeRef {
    transform(node, offset, Vec3::splat(0.0), Vec3::splat(1.0))
}

fn unround(node: &NodeRef) -> Option<(NodeRef, f32)> {
    match &**node {
        Node::Round { child, radius } => Some((child.clone(), *radius)),
        _ => None,
    }
}

fn fold_rounding(a: NodeRef, b: NodeRef) -> (NodeRef, NodeRef, Option<f32>) {
    match (unround(&a), unround(&b)) {
        (Some((ca, ra)), Some((cb, rb))) => (ca, cb, Some(ra + rb)),
        (Some((ca, ra)), None) => (ca, b, Some(ra)),
        (None, Some((cb, rb))) => (a, cb, Some(rb)),
        (None, None) => (a, b, None),
    }
}
