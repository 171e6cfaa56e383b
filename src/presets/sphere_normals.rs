use crate::camera::Camera;
use crate::light::Light;
use crate::math::Vec3;
use crate::scene::{DebugProperties, Scene, SceneProperties};
use crate::sdf::Node;

pub const SCENE_ID: &str = "sphere_normals";

/// A single sphere rendered with surface normals as color.
pub fn build(width: u32) -> Scene {
    let mut scene = Scene::new(SceneProperties {
        background_color: Vec3::new(0.2, 0.2, 0.25),
        ..SceneProperties::default()
    });
    scene.set_debug_properties(DebugProperties {
        normals: true,
        depth: false,
    });

    scene.add_light(Light::new(
        Vec3::new(-0.4, -1.0, -0.7),
        Vec3::splat(1.0),
        10.0,
    ));

    scene.add_camera(Camera::new(Vec3::new(0.0, 0.0, -3.0), width as f32));

    scene.add_root(Node::sphere(0.5).into());

    scene
}
