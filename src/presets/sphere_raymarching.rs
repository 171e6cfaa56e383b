use crate::camera::Camera;
use crate::material::Material;
use crate::math::Vec3;
use crate::scene::{Scene, SceneProperties};
use crate::sdf::Node;

pub const SCENE_ID: &str = "sphere_raymarching";

/// A single unlit sphere; exercises intersection detection alone.
pub fn build(width: u32) -> Scene {
    let mut scene = Scene::new(SceneProperties::default());

    scene.add_camera(Camera::new(Vec3::new(0.0, 0.0, -3.0), width as f32));

    scene.add_root(Node::sphere(0.5).with_material(Material::default()).into());

    scene
}
