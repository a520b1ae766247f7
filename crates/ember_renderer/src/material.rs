//! Material trait for surface scattering.

use crate::hittable::HitRecord;
use crate::sampling::{gen_f32, random_unit_vector};
use ember_math::{Ray, Vec3};
use rand::RngCore;

/// Color type alias (RGB values typically 0-1)
pub type Color = Vec3;

/// Result of a successful scatter: the bounced ray and its attenuation.
pub struct ScatterResult {
    pub attenuation: Color,
    pub scattered: Ray,
}

/// Trait for materials that describe how light interacts with surfaces.
///
/// Materials are stateless with respect to rendering, so one instance is
/// safely shared across primitives and threads.
pub trait Material: Send + Sync {
    /// Scatter an incoming ray.
    ///
    /// Returns the attenuated bounce ray, or None if the ray is absorbed.
    fn scatter(
        &self,
        ray_in: &Ray,
        rec: &HitRecord,
        rng: &mut dyn RngCore,
    ) -> Option<ScatterResult>;

    /// Get emitted light from this material.
    ///
    /// Most materials return black (no emission).
    fn emitted(&self, _u: f32, _v: f32, _p: Vec3) -> Color {
        Color::ZERO
    }

    /// Base reflectance, consumed by the denoiser's albedo buffer.
    fn albedo(&self) -> Color;
}

/// Lambertian (diffuse) material.
#[derive(Clone)]
pub struct Lambertian {
    albedo: Color,
}

impl Lambertian {
    /// Create a new Lambertian material with the given albedo color.
    pub fn new(albedo: Color) -> Self {
        Self { albedo }
    }
}

impl Material for Lambertian {
    fn scatter(
        &self,
        _ray_in: &Ray,
        rec: &HitRecord,
        rng: &mut dyn RngCore,
    ) -> Option<ScatterResult> {
        // Cosine-weighted diffuse bounce around the normal
        let mut scatter_direction = rec.normal + random_unit_vector(rng);

        // Catch degenerate scatter direction
        if scatter_direction.length_squared() < 1e-8 {
            scatter_direction = rec.normal;
        }

        Some(ScatterResult {
            attenuation: self.albedo,
            scattered: Ray::new(rec.p, scatter_direction),
        })
    }

    fn albedo(&self) -> Color {
        self.albedo
    }
}

/// Metal (specular) material.
#[derive(Clone)]
pub struct Metal {
    albedo: Color,
    fuzz: f32,
}

impl Metal {
    /// Create a new Metal material.
    ///
    /// - `albedo`: The color of the metal
    /// - `fuzz`: Roughness, 0.0 = perfect mirror, 1.0 = very rough
    pub fn new(albedo: Color, fuzz: f32) -> Self {
        Self {
            albedo,
            fuzz: fuzz.clamp(0.0, 1.0),
        }
    }
}

impl Material for Metal {
    fn scatter(
        &self,
        ray_in: &Ray,
        rec: &HitRecord,
        rng: &mut dyn RngCore,
    ) -> Option<ScatterResult> {
        let reflected = reflect(ray_in.direction().normalize(), rec.normal);
        let scattered_dir = reflected + self.fuzz * random_unit_vector(rng);

        // A fuzzed ray below the surface is absorbed
        if scattered_dir.dot(rec.normal) > 0.0 {
            Some(ScatterResult {
                attenuation: self.albedo,
                scattered: Ray::new(rec.p, scattered_dir),
            })
        } else {
            None
        }
    }

    fn albedo(&self) -> Color {
        self.albedo
    }
}

/// Dielectric (glass) material.
#[derive(Clone)]
pub struct Dielectric {
    /// Index of refraction
    ior: f32,
}

impl Dielectric {
    /// Create a new Dielectric material.
    ///
    /// - `ior`: Index of refraction (1.0 = air, 1.5 = glass, 2.4 = diamond)
    pub fn new(ior: f32) -> Self {
        Self { ior }
    }

    /// Schlick's approximation for reflectance
    fn reflectance(cosine: f32, ior: f32) -> f32 {
        let r0 = ((1.0 - ior) / (1.0 + ior)).powi(2);
        r0 + (1.0 - r0) * (1.0 - cosine).powi(5)
    }
}

impl Material for Dielectric {
    fn scatter(
        &self,
        ray_in: &Ray,
        rec: &HitRecord,
        rng: &mut dyn RngCore,
    ) -> Option<ScatterResult> {
        let refraction_ratio = if rec.front_face {
            1.0 / self.ior
        } else {
            self.ior
        };

        let unit_direction = ray_in.direction().normalize();
        let cos_theta = (-unit_direction).dot(rec.normal).min(1.0);
        let sin_theta = (1.0 - cos_theta * cos_theta).sqrt();

        // Total internal reflection, or a Fresnel draw choosing reflection
        let cannot_refract = refraction_ratio * sin_theta > 1.0;
        let direction =
            if cannot_refract || Self::reflectance(cos_theta, refraction_ratio) > gen_f32(rng) {
                reflect(unit_direction, rec.normal)
            } else {
                refract(unit_direction, rec.normal, refraction_ratio)
            };

        Some(ScatterResult {
            attenuation: Color::ONE,
            scattered: Ray::new(rec.p, direction),
        })
    }

    fn albedo(&self) -> Color {
        // Clear glass carries no reflectance of its own
        Color::ONE
    }
}

/// Diffuse area-light emitter.
#[derive(Clone)]
pub struct DiffuseLight {
    emit: Color,
}

impl DiffuseLight {
    /// Create a new diffuse light with the given emission color.
    pub fn new(emit: Color) -> Self {
        Self { emit }
    }
}

impl Material for DiffuseLight {
    fn scatter(
        &self,
        _ray_in: &Ray,
        _rec: &HitRecord,
        _rng: &mut dyn RngCore,
    ) -> Option<ScatterResult> {
        // Lights don't scatter rays
        None
    }

    fn emitted(&self, _u: f32, _v: f32, _p: Vec3) -> Color {
        self.emit
    }

    fn albedo(&self) -> Color {
        self.emit
    }
}

// =============================================================================
// Helper functions
// =============================================================================

/// Reflect a vector about a normal.
#[inline]
fn reflect(v: Vec3, n: Vec3) -> Vec3 {
    v - 2.0 * v.dot(n) * n
}

/// Refract a vector through a surface.
#[inline]
fn refract(uv: Vec3, n: Vec3, etai_over_etat: f32) -> Vec3 {
    let cos_theta = (-uv).dot(n).min(1.0);
    let r_out_perp = etai_over_etat * (uv + cos_theta * n);
    let r_out_parallel = -(1.0 - r_out_perp.length_squared()).abs().sqrt() * n;
    r_out_perp + r_out_parallel
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn hit_at_origin(normal: Vec3, front_face: bool) -> HitRecord<'static> {
        HitRecord {
            normal,
            front_face,
            ..Default::default()
        }
    }

    #[test]
    fn test_lambertian_always_scatters() {
        let mat = Lambertian::new(Color::new(0.8, 0.2, 0.2));
        let rec = hit_at_origin(Vec3::Y, true);
        let ray = Ray::new(Vec3::new(0.0, 1.0, 0.0), Vec3::new(0.0, -1.0, 0.0));
        let mut rng = StdRng::seed_from_u64(11);

        for _ in 0..50 {
            let result = mat.scatter(&ray, &rec, &mut rng).unwrap();
            assert_eq!(result.attenuation, Color::new(0.8, 0.2, 0.2));
            // Diffuse bounce stays in the normal's hemisphere
            assert!(result.scattered.direction().dot(Vec3::Y) > 0.0);
        }
    }

    #[test]
    fn test_metal_mirror_reflection() {
        let mat = Metal::new(Color::splat(0.9), 0.0);
        let rec = hit_at_origin(Vec3::Y, true);
        // 45 degree incoming ray
        let ray = Ray::new(Vec3::new(-1.0, 1.0, 0.0), Vec3::new(1.0, -1.0, 0.0));
        let mut rng = StdRng::seed_from_u64(12);

        let result = mat.scatter(&ray, &rec, &mut rng).unwrap();
        let dir = result.scattered.direction().normalize();
        let expected = Vec3::new(1.0, 1.0, 0.0).normalize();
        assert!((dir - expected).length() < 1e-4);
    }

    #[test]
    fn test_metal_absorbs_grazing_fuzz() {
        // Maximum fuzz on a grazing reflection eventually pushes the ray
        // under the surface, which must absorb rather than bounce.
        let mat = Metal::new(Color::splat(0.9), 1.0);
        let rec = hit_at_origin(Vec3::Y, true);
        let ray = Ray::new(Vec3::new(-10.0, 0.01, 0.0), Vec3::new(10.0, -0.01, 0.0));
        let mut rng = StdRng::seed_from_u64(13);

        let absorbed = (0..200).any(|_| mat.scatter(&ray, &rec, &mut rng).is_none());
        assert!(absorbed);
    }

    #[test]
    fn test_dielectric_neutral_attenuation() {
        let mat = Dielectric::new(1.5);
        let rec = hit_at_origin(Vec3::Y, true);
        let ray = Ray::new(Vec3::new(0.0, 1.0, 0.0), Vec3::new(0.0, -1.0, 0.0));
        let mut rng = StdRng::seed_from_u64(14);

        let result = mat.scatter(&ray, &rec, &mut rng).unwrap();
        assert_eq!(result.attenuation, Color::ONE);
    }

    #[test]
    fn test_dielectric_total_internal_reflection() {
        // Exiting glass at a grazing angle: sin_theta * ior > 1 forces
        // reflection, pointing the ray back into the medium.
        let mat = Dielectric::new(1.5);
        let rec = hit_at_origin(Vec3::Y, false);
        let grazing = Vec3::new(1.0, -0.1, 0.0).normalize();
        let ray = Ray::new(Vec3::ZERO, grazing);
        let mut rng = StdRng::seed_from_u64(15);

        let result = mat.scatter(&ray, &rec, &mut rng).unwrap();
        // Reflection of grazing about Y flips the y component
        let expected = Vec3::new(grazing.x, -grazing.y, 0.0);
        assert!((result.scattered.direction().normalize() - expected).length() < 1e-4);
    }

    #[test]
    fn test_diffuse_light_emits_and_absorbs() {
        let mat = DiffuseLight::new(Color::new(15.0, 15.0, 15.0));
        let rec = hit_at_origin(Vec3::Y, true);
        let ray = Ray::new(Vec3::new(0.0, 1.0, 0.0), Vec3::new(0.0, -1.0, 0.0));
        let mut rng = StdRng::seed_from_u64(16);

        assert!(mat.scatter(&ray, &rec, &mut rng).is_none());
        assert_eq!(mat.emitted(0.0, 0.0, Vec3::ZERO), Color::splat(15.0));
    }
}
