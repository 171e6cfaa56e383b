use crate::math::{mix, Vec3};

/// Optical parameters of a surface point.
///
/// Binary CSG operators blend whole materials, so every field has to be
/// meaningful under linear interpolation.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Material {
    /// Surface color, components in [0, 1].
    pub albedo: Vec3,
    /// Diffuse coefficient, [0, 1].
    pub kd: f32,
    /// Ambient coefficient, [0, 1].
    pub ka: f32,
    /// Specular coefficient, [0, 1].
    pub ks: f32,
    /// Specular exponent, nominally [1, 256].
    pub p: f32,
    /// Index of refraction. Air = 1, water = 1.33, glass = 1.5.
    pub ior: f32,
    /// Fraction of light transmitted through the surface, [0, 1].
    pub transmittance: f32,
    /// Fraction of transmitted light the interior absorbs, [0, 1].
    pub absorption: f32,
}

impl Default for Material {
    fn default() -> Self {
        Self {
            albedo: Vec3::splat(0.8),
            kd: 0.8,
            ka: 0.1,
            ks: 0.0,
            p: 4.0,
            ior: 1.0,
            transmittance: 0.0,
            absorption: 0.0,
        }
    }
}

impl Material {
    /// Linearly interpolate every field between two materials.
    pub fn mix(a: &Material, b: &Material, factor: f32) -> Material {
        Material {
            albedo: a.albedo.lerp(b.albedo, factor),
            kd: mix(a.kd, b.kd, factor),
            ka: mix(a.ka, b.ka, factor),
            ks: mix(a.ks, b.ks, factor),
            p: mix(a.p, b.p, factor),
            ior: mix(a.ior, b.ior, factor),
            transmittance: mix(a.transmittance, b.transmittance, factor),
            absorption: mix(a.absorption, b.absorption, factor),
        }
    }

    pub fn validate_physical(&self) -> Result<(), String> {
        if !self.albedo.is_finite() {
            return Err(format!(
                "albedo components must be finite, got ({}, {}, {})",
                self.albedo.x, self.albedo.y, self.albedo.z
            ));
        }
        validate_unit_interval(self.albedo.x, "albedo.x")?;
        validate_unit_interval(self.albedo.y, "albedo.y")?;
        validate_unit_interval(self.albedo.z, "albedo.z")?;

        validate_unit_interval(self.kd, "kd")?;
        validate_unit_interval(self.ka, "ka")?;
        validate_unit_interval(self.ks, "ks")?;
        validate_unit_interval(self.transmittance, "transmittance")?;
        validate_unit_interval(self.absorption, "absorption")?;

        if !self.p.is_finite() || !(1.0..=256.0).contains(&self.p) {
            return Err(format!(
                "specular exponent must be finite and in [1, 256], got {}",
                self.p
            ));
        }
        if !self.ior.is_finite() || self.ior < 1.0 {
            return Err(format!("ior must be finite and >= 1.0, got {}", self.ior));
        }

        Ok(())
    }
}

fn validate_unit_interval(value: f32, field: &str) -> Result<(), String> {
    if !value.is_finite() || !(0.0..=1.0).contains(&value) {
        return Err(format!("{field} must be finite and in [0, 1], got {value}"));
    }
    Ok(())
}
