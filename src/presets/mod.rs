//! Built-in example scenes, looked up by identifier.

mod hollow_die;
mod sphere_normals;
mod sphere_phong;
mod sphere_raymarching;
mod triangles;

use crate::scene::Scene;

/// All known preset identifiers, for CLI error messages.
pub const SCENE_IDS: &[&str] = &[
    sphere_normals::SCENE_ID,
    sphere_raymarching::SCENE_ID,
    sphere_phong::SCENE_ID,
    hollow_die::SCENE_ID,
    triangles::SCENE_ID,
];

/// Build a preset scene. The image width doubles as the camera focal length,
/// so the frame size participates in scene construction.
pub fn build_scene(scene_id: &str, width: u32) -> Result<Scene, String> {
    if scene_id.eq_ignore_ascii_case(sphere_normals::SCENE_ID) {
        return Ok(sphere_normals::build(width));
    }
    if scene_id.eq_ignore_ascii_case(sphere_raymarching::SCENE_ID) {
        return Ok(sphere_raymarching::build(width));
    }
    if scene_id.eq_ignore_ascii_case(sphere_phong::SCENE_ID) {
        return Ok(sphere_phong::build(width));
    }
    if scene_id.eq_ignore_ascii_case(hollow_die::SCENE_ID) {
        return Ok(hollow_die::build(width));
    }
    if scene_id.eq_ignore_ascii_case(triangles::SCENE_ID) {
        return Ok(triangles::build(width));
    }

    Err(format!("unknown scene identifier: {scene_id}"))
}
