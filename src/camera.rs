use crate::math::{Mat4, Ray, Vec3};

/// Pinhole camera: a world position, a cumulative rotation, and a focal
/// length expressed in pixels (conventionally the image width).
#[derive(Clone, Copy, Debug)]
pub struct Camera {
    position: Vec3,
    rotation: Mat4,
    focal_length: f32,
}

impl Camera {
    pub fn new(position: Vec3, focal_length: f32) -> Self {
        Self {
            position,
            rotation: Mat4::IDENTITY,
            focal_length,
        }
    }

    pub fn position(&self) -> Vec3 {
        self.position
    }

    pub fn rotation(&self) -> Mat4 {
        self.rotation
    }

    pub fn focal_length(&self) -> f32 {
        self.focal_length
    }

    /// Move the camera. With `local` the offset is rotated into the camera
    /// frame first, so forward stays forward after turning.
    pub fn translate(&mut self, offset: Vec3, local: bool) {
        let delta = if local {
            self.rotation.transform_vector(offset)
        } else {
            offset
        };
        self.position = self.position + delta;
    }

    /// Compose an axis-angle rotation onto the accumulated orientation.
    pub fn rotate(&mut self, axis: Vec3, angle: f32) {
        self.rotation = self.rotation * Mat4::from_axis_angle(axis, angle);
    }
}

impl Ray {
    /// Primary ray through pixel (x, y) of a w-by-h image.
    ///
    /// Keeps the legacy formula: the view-space pixel vector is rotated into
    /// the world and the camera position is subtracted afterwards. The axis
    /// convention is right-handed, +y up, +z forward along the lens.
    pub fn from_view(x: u32, y: u32, w: u32, h: u32, camera: &Camera) -> Ray {
        let pixel = Vec3::new(
            x as f32 - (w as f32 / 2.0),
            y as f32 - (h as f32 / 2.0),
            camera.focal_length(),
        );
        let direction = camera.rotation().transform_vector(pixel) - camera.position();
        Ray::new(camera.position(), direction.normalize())
    }
}
