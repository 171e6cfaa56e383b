//! Scene graph and the tracer that shades it.
//!
//! The scene owns the CSG roots, lights and cameras. `trace` sphere-traces a
//! ray against the union of the roots, applies Phong local lighting with
//! optional soft shadows, and recurses into Fresnel-weighted reflection and
//! refraction rays.

use std::f32::consts::PI;

use crate::camera::Camera;
use crate::light::Light;
use crate::material::Material;
use crate::math::{reflect, refract, Ray, Vec3};
use crate::sdf::NodeRef;

/// Tolerance at which the sphere tracer accepts a hit.
const HIT_EPSILON: f32 = 1e-5;
/// Distance below which a shadow ray counts as fully occluded.
const SHADOW_EPSILON: f32 = 0.001;
/// Tap spacing for normal estimation.
const NORMAL_EPSILON: f32 = 1e-4;
/// Offset applied along the facing normal to lift secondary rays off the
/// surface they spawned from.
const RAY_BIAS: f32 = 1e-4;
/// Larger bias for shadow rays, which march toward a light across the whole
/// scene and tolerate a coarser start.
const SHADOW_BIAS: f32 = 0.1;

#[derive(Clone, Copy, Debug)]
pub struct SceneProperties {
    /// Returned on ray miss.
    pub background_color: Vec3,
    /// Phong diffuse and specular. When off, diffuse is all-ones.
    pub illumination: bool,
    /// Fresnel-weighted reflection and refraction recursion.
    pub fresnel: bool,
    /// Soft-shadow attenuation of direct lighting.
    pub shadowing: bool,
    /// Beer-like attenuation along transmitted segments.
    pub absorption: bool,
    /// Soft shadow sharpness; higher is harder.
    pub shadow_intensity: f32,
    /// Step cap for the sphere-tracing and shadow loops.
    pub max_raymarch_steps: u32,
    /// Far plane for sphere tracing.
    pub max_raymarch_dist: f32,
    /// Recursion cap for reflection and refraction.
    pub max_depth: u32,
}

impl Default for SceneProperties {
    fn default() -> Self {
        Self {
            background_color: Vec3::splat(0.0),
            illumination: false,
            fresnel: false,
            shadowing: false,
            absorption: false,
            shadow_intensity: 16.0,
            max_raymarch_steps: 500,
            max_raymarch_dist: 20.0,
            max_depth: 4,
        }
    }
}

/// Shading overrides for inspecting geometry. Either flag bypasses the
/// lighting model entirely.
#[derive(Clone, Copy, Debug, Default)]
pub struct DebugProperties {
    /// Color pixels by surface normal, mapped into [0, 1].
    pub normals: bool,
    /// Color pixels by inverse camera-space depth.
    pub depth: bool,
}

#[derive(Debug)]
pub struct Scene {
    properties: SceneProperties,
    debug: DebugProperties,
    roots: Vec<NodeRef>,
    lights: Vec<Light>,
    cameras: Vec<Camera>,
    active_camera: usize,
}

impl Scene {
    pub fn new(properties: SceneProperties) -> Self {
        Self {
            properties,
            debug: DebugProperties::default(),
            roots: Vec::new(),
            lights: Vec::new(),
            cameras: Vec::new(),
            active_camera: 0,
        }
    }

    pub fn properties(&self) -> &SceneProperties {
        &self.properties
    }

    pub fn set_properties(&mut self, properties: SceneProperties) {
        self.properties = properties;
    }

    pub fn set_debug_properties(&mut self, debug: DebugProperties) {
        self.debug = debug;
    }

    pub fn add_root(&mut self, node: NodeRef) {
        self.roots.push(node);
    }

    pub fn add_light(&mut self, light: Light) {
        self.lights.push(light);
    }

    pub fn lights(&self) -> &[Light] {
        &self.lights
    }

    pub fn light_mut(&mut self, index: usize) -> Option<&mut Light> {
        self.lights.get_mut(index)
    }

    /// Add a camera and return its index. The first camera added is active
    /// until `set_active_camera` selects another.
    pub fn add_camera(&mut self, camera: Camera) -> usize {
        self.cameras.push(camera);
        self.cameras.len() - 1
    }

    pub fn set_active_camera(&mut self, index: usize) -> Result<(), String> {
        if index >= self.cameras.len() {
            return Err(format!(
                "camera index {index} out of range ({} cameras)",
                self.cameras.len()
            ));
        }
        self.active_camera = index;
        Ok(())
    }

    pub fn active_camera(&self) -> Option<&Camera> {
        self.cameras.get(self.active_camera)
    }

    pub fn active_camera_mut(&mut self) -> Option<&mut Camera> {
        self.cameras.get_mut(self.active_camera)
    }

    /// Install the fallback light if the scene has none, so the ambient
    /// normalisation by light count stays well defined.
    pub fn ensure_default_light(&mut self) {
        if self.lights.is_empty() {
            self.lights.push(Light::new(
                Vec3::new(0.0, -1.0, -0.5),
                Vec3::splat(1.0),
                10.0,
            ));
        }
    }

    /// Frame-start checks: rendering without a camera is a configuration
    /// error, and every material and light must be physically plausible.
    pub fn validate(&self) -> Result<(), String> {
        if self.active_camera().is_none() {
            return Err("scene has no active camera".into());
        }
        for light in &self.lights {
            light.validate_physical()?;
        }
        Ok(())
    }

    /// Trace a primary ray to a final pixel color.
    pub fn trace(&self, ray: &Ray) -> Vec3 {
        self.trace_depth(ray, self.properties.max_depth)
    }

    fn trace_depth(&self, ray: &Ray, depth: u32) -> Vec3 {
        let (node, t) = self.raycast(ray);
        let Some(node) = node else {
            return self.properties.background_color;
        };
        if t < 0.0 {
            return self.properties.background_color;
        }

        let p = ray.at(t);
        let sample = node.sample(p);
        let material = sample.material;
        let normal = node.normal(p, NORMAL_EPSILON);

        let inside = normal.dot(-ray.direction) < 0.0;
        let facing_normal = if inside { -normal } else { normal };

        if self.debug.normals {
            return (normal * 0.5) + Vec3::splat(0.5);
        }
        if self.debug.depth {
            let Some(camera) = self.active_camera() else {
                return self.properties.background_color;
            };
            return Vec3::splat(1.0 / (p - camera.position()).z);
        }

        let (diffuse, specular) = if self.properties.illumination {
            self.lighting(p, facing_normal, -ray.direction, &material)
        } else {
            (Vec3::splat(1.0), Vec3::splat(0.0))
        };

        let mut kr = 0.5;
        let mut reflection = Vec3::splat(0.0);
        let mut refraction = Vec3::splat(0.0);

        if self.properties.fresnel && depth > 0 {
            let reflected_dir = reflect(ray.direction, facing_normal).normalize();

            let (etai, etat) = if inside {
                (material.ior, 1.0)
            } else {
                (1.0, material.ior)
            };

            kr = fresnel(ray.direction, facing_normal, etai, etat);

            if material.ks > 0.0 {
                let origin = p + (facing_normal * RAY_BIAS);
                reflection = self.trace_depth(&Ray::new(origin, reflected_dir), depth - 1);
            }

            if kr < 1.0 && material.transmittance > 0.0 && material.ks > 0.0 {
                if let Some(transmitted_dir) = refract(ray.direction, facing_normal, etai / etat) {
                    let origin = p - (facing_normal * RAY_BIAS);
                    let transmitted = Ray::new(origin, transmitted_dir.normalize());

                    let mut tint = Vec3::splat(1.0);
                    if self.properties.absorption {
                        // Beer attenuation over the transmitted segment,
                        // tinted toward the albedo.
                        let (_, segment) = self.raycast(&transmitted);
                        if segment > 0.0 {
                            let extinction =
                                (Vec3::splat(1.0) - material.albedo) * material.absorption;
                            tint = Vec3::new(
                                (-extinction.x * segment).exp(),
                                (-extinction.y * segment).exp(),
                                (-extinction.z * segment).exp(),
                            );
                        }
                    }

                    refraction = self.trace_depth(&transmitted, depth - 1) * tint;
                }
            }
        }

        self.final_color(&material, diffuse, specular, refraction, reflection, kr)
    }

    /// Phong diffuse and specular sums over all lights, each attenuated by
    /// its own soft-shadow factor before accumulation.
    fn lighting(&self, p: Vec3, normal: Vec3, view: Vec3, material: &Material) -> (Vec3, Vec3) {
        let mut diffuse = Vec3::splat(0.0);
        let mut specular = Vec3::splat(0.0);

        let shadow_origin = p + (normal * SHADOW_BIAS);

        for light in &self.lights {
            let to_light = light.position - p;
            let l = to_light.normalize();
            let r = reflect(-l, normal).normalize();

            let mut d =
                light.color * (l.dot(normal).max(0.0) * light.intensity / (4.0 * PI * to_light.length()));
            let mut s = light.color * (r.dot(view).max(0.0).powf(material.p) * light.intensity);

            if self.properties.shadowing {
                let factor = self.shadow(
                    &Ray::new(shadow_origin, l),
                    self.properties.shadow_intensity,
                );
                d = d * factor;
                s = s * factor;
            }

            diffuse += d;
            specular += s;
        }

        (diffuse, specular)
    }

    fn final_color(
        &self,
        material: &Material,
        diffuse: Vec3,
        specular: Vec3,
        refraction: Vec3,
        reflection: Vec3,
        kr: f32,
    ) -> Vec3 {
        let reflected = reflection * (kr * material.ks);
        let transmitted = refraction * ((1.0 - kr) * material.transmittance);

        let light_count = self.lights.len().max(1) as f32;
        let ambient = material.albedo * (material.ka / light_count);
        let diffuse = diffuse * material.albedo * material.kd;
        let specular = specular * (kr * material.ks);

        (ambient + diffuse + specular + reflected + transmitted).clamp01()
    }

    /// Root with the smallest signed distance at `p`.
    fn minimum_surface(&self, p: Vec3) -> (Option<&NodeRef>, f32) {
        let mut min = f32::INFINITY;
        let mut min_node = None;
        for node in &self.roots {
            let d = node.distance(p);
            if d < min {
                min = d;
                min_node = Some(node);
            }
        }
        (min_node, min)
    }

    /// Sphere tracing adapted for signed starts: stepping by the absolute
    /// distance lets a ray that begins inside a body walk back out to the
    /// surface.
    ///
    /// Returns the closest node and the hit parameter, `t = -1` on a miss.
    /// Exhausting the step budget returns the state reached so far.
    pub fn raycast(&self, ray: &Ray) -> (Option<&NodeRef>, f32) {
        let mut t = 0.0;
        let mut hit = None;
        for _ in 0..self.properties.max_raymarch_steps {
            let (node, signed) = self.minimum_surface(ray.at(t));
            hit = node;
            let d = signed.abs();
            if d < HIT_EPSILON {
                return (hit, t);
            }
            t += d;
            if t > self.properties.max_raymarch_dist {
                return (hit, -1.0);
            }
        }
        (hit, t)
    }

    /// Closed-form soft shadow attenuation with sharpness `k`.
    /// <https://iquilezles.org/articles/rmshadows/>
    pub fn shadow(&self, ray: &Ray, k: f32) -> f32 {
        let mut res: f32 = 1.0;
        let mut ph = f32::MAX;
        let mut t = 0.0;

        for _ in 0..self.properties.max_raymarch_steps {
            let (_, h) = self.minimum_surface(ray.at(t));
            if h < SHADOW_EPSILON {
                return 0.0;
            }

            let y = (h * h) / (2.0 * ph);
            let d = ((h * h) - (y * y)).max(0.0).sqrt();
            res = res.min(k * d / (t - y).max(1e-4));

            ph = h;
            t += h;
            if t > self.properties.max_raymarch_dist {
                break;
            }
        }

        res.clamp(0.0, 1.0)
    }
}

/// Exact dielectric Fresnel reflectance for unpolarised light.
///
/// Returns the reflected energy fraction in [0, 1]; 1 on total internal
/// reflection.
pub fn fresnel(incident: Vec3, normal: Vec3, etai: f32, etat: f32) -> f32 {
    let mut cos_i = normal.dot(incident).clamp(-1.0, 1.0);
    let sin_t = etai / etat * (1.0 - (cos_i * cos_i)).max(0.0).sqrt();

    if sin_t >= 1.0 {
        return 1.0;
    }

    let cos_t = (1.0 - (sin_t * sin_t)).max(0.0).sqrt();
    cos_i = cos_i.abs();
    let rs = ((etat * cos_i) - (etai * cos_t)) / ((etat * cos_i) + (etai * cos_t));
    let rp = ((etai * cos_i) - (etat * cos_t)) / ((etai * cos_i) + (etat * cos_t));
    ((rs * rs) + (rp * rp)) / 2.0
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sdf::{self, Node};

    fn single_sphere_scene(properties: SceneProperties) -> Scene {
        let mut scene = Scene::new(properties);
        scene.add_root(Node::sphere(0.5).into());
        let index = scene.add_camera(Camera::new(Vec3::new(0.0, 0.0, -3.0), 64.0));
        scene.set_active_camera(index).unwrap();
        scene.add_light(Light::new(
            Vec3::new(-0.4, -1.0, -0.7),
            Vec3::splat(1.0),
            10.0,
        ));
        scene
    }

    fn forward_ray() -> Ray {
        Ray::new(Vec3::new(0.0, 0.0, -3.0), Vec3::new(0.0, 0.0, 1.0))
    }

    #[test]
    fn raycast_hits_the_front_of_the_sphere() {
        let scene = single_sphere_scene(SceneProperties::default());
        let (node, t) = scene.raycast(&forward_ray());
        assert!(node.is_some());
        assert!((t - 2.5).abs() < 1e-3, "expected t near 2.5, got {t}");
    }

    #[test]
    fn raycast_misses_sideways() {
        let scene = single_sphere_scene(SceneProperties::default());
        let ray = Ray::new(Vec3::new(0.0, 0.0, -3.0), Vec3::new(0.0, 1.0, 0.0));
        let (_, t) = scene.raycast(&ray);
        assert_eq!(t, -1.0);
    }

    #[test]
    fn raycast_escapes_from_inside_a_body() {
        let scene = single_sphere_scene(SceneProperties::default());
        let ray = Ray::new(Vec3::splat(0.0), Vec3::new(0.0, 0.0, 1.0));
        let (node, t) = scene.raycast(&ray);
        assert!(node.is_some());
        assert!(t >= 0.0);
        assert!((ray.at(t).length() - 0.5).abs() < 1e-3);
    }

    #[test]
    fn miss_returns_the_background_color() {
        let scene = single_sphere_scene(SceneProperties {
            background_color: Vec3::new(0.1, 0.2, 0.3),
            ..SceneProperties::default()
        });
        let ray = Ray::new(Vec3::new(0.0, 0.0, -3.0), Vec3::new(0.0, -1.0, 0.0));
        assert_eq!(scene.trace(&ray), Vec3::new(0.1, 0.2, 0.3));
    }

    #[test]
    fn empty_scene_is_all_background() {
        let mut scene = Scene::new(SceneProperties::default());
        let index = scene.add_camera(Camera::new(Vec3::new(0.0, 0.0, -3.0), 64.0));
        scene.set_active_camera(index).unwrap();
        assert_eq!(scene.trace(&forward_ray()), Vec3::splat(0.0));
    }

    #[test]
    fn unlit_hit_shades_with_unit_diffuse() {
        let scene = single_sphere_scene(SceneProperties::default());
        let color = scene.trace(&forward_ray());
        let material = Material::default();
        let expected = (material.albedo * (material.ka / 1.0)) + (material.albedo * material.kd);
        assert!((color - expected.clamp01()).length() < 1e-3);
    }

    #[test]
    fn normals_debug_maps_the_facing_direction() {
        let mut scene = single_sphere_scene(SceneProperties::default());
        scene.set_debug_properties(DebugProperties {
            normals: true,
            depth: false,
        });
        let color = scene.trace(&forward_ray());
        // Front of the sphere faces the camera: normal (0, 0, -1).
        assert!((color - Vec3::new(0.5, 0.5, 0.0)).length() < 1e-2);
    }

    #[test]
    fn depth_debug_reports_inverse_camera_depth() {
        let mut scene = single_sphere_scene(SceneProperties::default());
        scene.set_debug_properties(DebugProperties {
            normals: false,
            depth: true,
        });
        let color = scene.trace(&forward_ray());
        // Hit at world z = -0.5, camera at z = -3: depth 2.5.
        assert!((color.x - 1.0 / 2.5).abs() < 1e-2);
    }

    #[test]
    fn phong_lighting_brightens_the_lit_side() {
        let scene = single_sphere_scene(SceneProperties {
            illumination: true,
            ..SceneProperties::default()
        });

        let lit = scene.trace(&forward_ray());
        assert!(lit.max_component() > 0.0);

        // A point on the far side of the sphere faces away from the light.
        let lit_sample = {
            let p = Vec3::new(0.0, 0.0, -0.5);
            let n = Vec3::new(0.0, 0.0, -1.0);
            let material = Material::default();
            scene.lighting(p, n, Vec3::new(0.0, 0.0, -1.0), &material)
        };
        let (diffuse, _) = lit_sample;
        assert!(diffuse.max_component() > 0.0);
    }

    #[test]
    fn shadow_factor_stays_in_unit_range() {
        let mut scene = single_sphere_scene(SceneProperties::default());
        scene.add_root(sdf::translate(
            Node::cuboid(Vec3::splat(0.4)),
            Vec3::new(0.0, -1.5, 0.0),
        ));
        for dir in [
            Vec3::new(0.0, -1.0, 0.0),
            Vec3::new(0.3, -1.0, 0.1).normalize(),
            Vec3::new(0.0, 1.0, 0.0),
        ] {
            let ray = Ray::new(Vec3::new(0.0, 0.8, 0.0), dir);
            let factor = scene.shadow(&ray, 16.0);
            assert!((0.0..=1.0).contains(&factor), "factor {factor} for {dir:?}");
        }
    }

    #[test]
    fn occluded_shadow_ray_returns_zero() {
        let scene = single_sphere_scene(SceneProperties::default());
        // Straight through the sphere toward a light beyond it.
        let ray = Ray::new(Vec3::new(0.0, 0.0, -2.0), Vec3::new(0.0, 0.0, 1.0));
        assert_eq!(scene.shadow(&ray, 16.0), 0.0);
    }

    #[test]
    fn fresnel_stays_in_unit_range() {
        let n = Vec3::new(0.0, 0.0, -1.0);
        for angle in [0.0f32, 0.3, 0.8, 1.2, 1.5] {
            let incident = Vec3::new(angle.sin(), 0.0, angle.cos());
            let kr = fresnel(incident, n, 1.0, 1.5);
            assert!((0.0..=1.0).contains(&kr), "kr {kr} at angle {angle}");
        }
    }

    #[test]
    fn fresnel_saturates_on_total_internal_reflection() {
        // Leaving glass at a grazing angle: sin_t > 1.
        let n = Vec3::new(0.0, 0.0, -1.0);
        let incident = Vec3::new(0.9, 0.0, (1.0f32 - 0.81).sqrt());
        let kr = fresnel(incident, n, 1.5, 1.0);
        assert_eq!(kr, 1.0);
    }

    #[test]
    fn zero_depth_disables_recursion() {
        let material = Material {
            ks: 1.0,
            transmittance: 1.0,
            ior: 1.3,
            ..Material::default()
        };

        let mut scene_a = Scene::new(SceneProperties {
            fresnel: true,
            max_depth: 0,
            ..SceneProperties::default()
        });
        scene_a.add_root(Node::sphere(0.5).with_material(material).into());
        let a = scene_a.trace(&forward_ray());

        let mut scene_b = Scene::new(SceneProperties::default());
        scene_b.add_root(Node::sphere(0.5).with_material(material).into());
        let b = scene_b.trace(&forward_ray());

        // With no recursion budget the Fresnel path contributes nothing.
        assert!((a - b).length() < 1e-6);
    }

    #[test]
    fn transmittance_zero_suppresses_refraction() {
        let material = Material {
            ks: 1.0,
            ior: 1.3,
            ..Material::default()
        };

        let mut scene = Scene::new(SceneProperties {
            fresnel: true,
            max_depth: 2,
            ..SceneProperties::default()
        });
        scene.add_root(Node::sphere(0.8).with_material(material).into());
        let color = scene.trace(&forward_ray());

        // The reflected ray escapes to the (black) background and the
        // transmitted term is disabled, so only local shading remains.
        let expected = (material.albedo * material.ka) + (material.albedo * material.kd);
        assert!((color - expected.clamp01()).length() < 1e-3);
    }

    #[test]
    fn step_exhaustion_reports_the_state_reached() {
        let scene = single_sphere_scene(SceneProperties {
            max_raymarch_steps: 1,
            ..SceneProperties::default()
        });
        // One step covers the full 2.5 units to the surface but leaves no
        // budget to confirm the hit; the tracer hands back what it has.
        let (node, t) = scene.raycast(&forward_ray());
        assert!(node.is_some());
        assert!((t - 2.5).abs() < 1e-4);
    }

    #[test]
    fn absorption_attenuates_the_transmitted_term() {
        // Dark albedo keeps the composited color under the clamp, so the
        // attenuation stays visible in the result.
        let glass = Material {
            albedo: Vec3::splat(0.1),
            ks: 1.0,
            transmittance: 1.0,
            ior: 1.02,
            absorption: 1.0,
            ..Material::default()
        };
        let trace_with = |absorption: bool| {
            let mut scene = Scene::new(SceneProperties {
                background_color: Vec3::splat(1.0),
                fresnel: true,
                absorption,
                max_depth: 2,
                ..SceneProperties::default()
            });
            scene.add_root(Node::sphere(0.8).with_material(glass).into());
            scene.trace(&forward_ray())
        };

        let attenuated = trace_with(true);
        let clear = trace_with(false);
        assert!(
            attenuated.x < clear.x,
            "expected {attenuated:?} darker than {clear:?}"
        );
    }

    #[test]
    fn default_light_is_installed_once() {
        let mut scene = Scene::new(SceneProperties::default());
        scene.ensure_default_light();
        scene.ensure_default_light();
        assert_eq!(scene.lights().len(), 1);
        assert_eq!(scene.lights()[0].intensity, 10.0);
    }

    #[test]
    fn validation_requires_a_camera() {
        let scene = Scene::new(SceneProperties::default());
        assert!(scene.validate().is_err());
    }

    #[test]
    fn lights_can_be_nudged_in_place() {
        let mut scene = single_sphere_scene(SceneProperties::default());
        let original = scene.lights()[0].position;
        if let Some(light) = scene.light_mut(0) {
            light.position += Vec3::new(0.1, 0.0, 0.0);
        }
        assert!((scene.lights()[0].position - original).length() > 0.05);
        assert!(scene.light_mut(7).is_none());
    }

    #[test]
    fn the_active_camera_can_be_driven() {
        let mut scene = single_sphere_scene(SceneProperties::default());
        scene
            .active_camera_mut()
            .unwrap()
            .translate(Vec3::new(0.0, 0.0, -0.1), true);
        let z = scene.active_camera().unwrap().position().z;
        assert!((z + 3.1).abs() < 1e-6);
    }
}
