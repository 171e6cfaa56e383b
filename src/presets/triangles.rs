use std::f32::consts::PI;

use crate::camera::Camera;
use crate::light::Light;
use crate::material::Material;
use crate::math::Vec3;
use crate::scene::{Scene, SceneProperties};
use crate::sdf::{self, Node};

pub const SCENE_ID: &str = "triangles";

/// Two translucent triangles smoothly joined, scaled up and tilted over a
/// ground plane.
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

    let yellow = Material {
        albedo: Vec3::new(0.75, 0.75, 0.1),
        ks: 1.0,
        p: 36.0,
        ior: 1.45,
        transmittance: 0.8,
        ..Material::default()
    };
    let cyan = Material {
        albedo: Vec3::new(0.1, 0.75, 0.75),
        ks: 1.0,
        p: 36.0,
        ior: 1.45,
        transmittance: 0.8,
        ..Material::default()
    };

    let first = Node::triangle(
        Vec3::new(0.0, 0.0, 0.0),
        Vec3::new(0.8, 0.0, 0.0),
        Vec3::new(0.8, -0.8, 0.0),
    )
    .with_material(yellow);
    let second = Node::triangle(
        Vec3::new(0.0, -0.8, 0.0),
        Vec3::new(0.6, -0.2, 0.8),
        Vec3::new(0.6, -0.2, -0.8),
    )
    .with_material(cyan);

    let positioned = sdf::transform(
        sdf::union(first, sdf::round(second, 0.2)),
        Vec3::new(-0.4, 0.3, 0.0),
        Vec3::new(PI / 6.0, 0.0, 0.0),
        Vec3::splat(2.0),
    );
    scene.add_root(positioned);

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
