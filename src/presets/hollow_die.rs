use std::f32::consts::PI;

use crate::camera::Camera;
use crate::light::Light;
use crate::material::Material;
use crate::math::Vec3;
use crate::scene::{Scene, SceneProperties};
use crate::sdf::{self, Node, NodeRef};

pub const SCENE_ID: &str = "hollow_die";

/// A hollow glass die built from CSG, smoothly merged with a ring, resting
/// over a ground plane.
pub fn build(width: u32) -> Scene {
    let mut scene = Scene::new(SceneProperties {
        background_color: Vec3::new(0.8, 0.8, 0.9),
        illumination: true,
        fresnel: true,
        max_depth: 8,
        ..SceneProperties::default()
    });

    scene.add_light(Light::new(
        Vec3::new(-0.4, -1.0, -0.7),
        Vec3::splat(1.0),
        10.0,
    ));
    scene.add_light(Light::new(
        Vec3::new(1.3, 0.5, -1.1),
        Vec3::new(0.4, 0.4, 1.0),
        15.0,
    ));

    scene.add_camera(Camera::new(Vec3::new(0.0, 0.0, -3.0), width as f32));

    let body_material = Material {
        albedo: Vec3::new(0.2, 0.5, 0.2),
        ks: 1.0,
        p: 128.0,
        ior: 1.52,
        transmittance: 0.8,
        absorption: 0.5,
        ..Material::default()
    };
    let dot_material = Material {
        albedo: Vec3::splat(1.0),
        ks: 0.1,
        p: 36.0,
        ..Material::default()
    };
    let ring_material = Material {
        albedo: Vec3::new(0.75, 0.1, 0.1),
        ks: 1.0,
        p: 36.0,
        ior: 1.45,
        transmittance: 0.8,
        ..Material::default()
    };

    // Die body: a rounded cube capped by a sphere, hollowed into a shell.
    // The rounding radii fold into the intersection's smoothing factor.
    let cube = sdf::round(Node::cuboid(Vec3::splat(0.5)).with_material(body_material), 0.02);
    let cap = sdf::round(Node::sphere(0.75).with_material(body_material), 0.02);
    let body = sdf::onion(sdf::intersection(cube, cap), 0.04);

    let pip_positions = [
        // One
        Vec3::new(0.0, -0.51, 0.0),
        // Two
        Vec3::new(0.51, -0.25, 0.25),
        Vec3::new(0.51, 0.25, -0.25),
        // Three
        Vec3::new(0.0, 0.0, -0.51),
        Vec3::new(-0.25, -0.25, -0.51),
        Vec3::new(0.25, 0.25, -0.51),
        // Four
        Vec3::new(0.25, 0.25, 0.51),
        Vec3::new(0.25, -0.25, 0.51),
        Vec3::new(-0.25, 0.25, 0.51),
        Vec3::new(-0.25, -0.25, 0.51),
        // Five
        Vec3::new(-0.51, 0.25, 0.25),
        Vec3::new(-0.51, 0.25, -0.25),
        Vec3::new(-0.51, 0.0, 0.0),
        Vec3::new(-0.51, -0.25, 0.25),
        Vec3::new(-0.51, -0.25, -0.25),
        // Six
        Vec3::new(0.25, 0.51, 0.25),
        Vec3::new(-0.25, 0.51, 0.25),
        Vec3::new(0.25, 0.51, -0.25),
        Vec3::new(-0.25, 0.51, -0.25),
        Vec3::new(0.25, 0.51, 0.0),
        Vec3::new(-0.25, 0.51, 0.0),
    ];

    let mut pips: NodeRef = Node::empty().into();
    for position in pip_positions {
        let pip = sdf::translate(Node::sphere(0.1).with_material(dot_material), position);
        pips = sdf::union(pips, pip);
    }

    let die = sdf::transform(
        sdf::difference(body, sdf::round(pips, 0.01)),
        Vec3::new(0.0, 0.25, 0.0),
        Vec3::new(PI / 6.0, PI / 4.0, 0.0),
        Vec3::splat(1.0),
    );

    let ring = sdf::transform(
        Node::torus(0.5, 0.1).with_material(ring_material),
        Vec3::new(0.5, -0.5, -0.2),
        Vec3::new(PI / 1.5, PI / 6.0, 0.0),
        Vec3::splat(1.0),
    );

    scene.add_root(sdf::union(ring, sdf::round(die, 0.1)));

    let ground_material = Material {
        albedo: Vec3::splat(0.8),
        ks: 0.2,
        p: 128.0,
        ior: 1.33,
        ..Material::default()
    };
    scene.add_root(
        Node::plane(Vec3::new(0.0, -1.0, 0.0), 1.0)
            .with_material(ground_material)
            .into(),
    );

    scene
}
