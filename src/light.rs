use crate::math::Vec3;

pub const MAX_INTENSITY: f32 = 100.0;

/// Point light with inverse falloff, applied by the shader.
#[derive(Clone, Copy, Debug)]
pub struct Light {
    pub position: Vec3,
    /// RGB in [0, 1].
    pub color: Vec3,
    /// Clamped to [0, MAX_INTENSITY] at construction.
    pub intensity: f32,
}

impl Light {
    pub fn new(position: Vec3, color: Vec3, intensity: f32) -> Self {
        Self {
            position,
            color,
            intensity: intensity.clamp(0.0, MAX_INTENSITY),
        }
    }

    pub fn validate_physical(&self) -> Result<(), String> {
        if !self.position.is_finite() {
            return Err("light position must be finite".into());
        }
        if !self.color.is_finite()
            || self.color.min_component() < 0.0
            || self.color.max_component() > 1.0
        {
            return Err(format!(
                "light color components must be in [0, 1], got ({}, {}, {})",
                self.color.x, self.color.y, self.color.z
            ));
        }
        if !self.intensity.is_finite() {
            return Err("light intensity must be finite".into());
        }
        Ok(())
    }
}
