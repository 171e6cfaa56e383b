use crate::camera::Camera;
use crate::light::Light;
use crate::material::Material;
use crate::math::Vec3;
use crate::scene::{Scene, SceneProperties};
use crate::sdf::Node;

pub const SCENE_ID: &str = "sphere_phong";

/// A Phong-shaded sphere under a single white light.
pub fn build(width: u32) -> Scene {
    let mut scene = Scene::new(SceneProperties {
        illumination: true,
        ..SceneProperties::default()
    });

    scene.add_light(Light::new(
        Vec3::new(-0.4, -1.0, -0.7),
        Vec3::splat(1.0),
        10.0,
    ));

    scene.add_camera(Camera::new(Vec3::new(0.0, 0.0, -3.0), width as f32));

    let material = Material {
        albedo: Vec3::splat(0.8),
        ks: 1.0,
        p: 36.0,
        ..Material::default()
    };
    scene.add_root(Node::sphere(0.5).with_material(material).into());

    scene
}
