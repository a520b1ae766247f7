//! Recursive path-tracing integrator.

use crate::{Color, HitRecord, Hittable};
use ember_math::{Interval, Ray, Vec3};
use rand::RngCore;

/// Lower hit bound suppressing self-intersection acne.
const T_MIN: f32 = 0.001;

/// Compute the radiance carried by a ray.
///
/// Recursively bounces through the scene accumulating emitted and
/// attenuated scattered light, stack-bounded by `depth`. Pure and
/// re-entrant over an immutable scene, so it runs concurrently from
/// many threads with no synchronization.
pub fn ray_color(
    ray: &Ray,
    depth: u32,
    world: &dyn Hittable,
    background: Color,
    rng: &mut dyn RngCore,
) -> Color {
    // Bounce budget exhausted: no more light is gathered
    if depth == 0 {
        return Color::ZERO;
    }

    let mut rec = HitRecord::default();
    if !world.hit(ray, Interval::new(T_MIN, f32::INFINITY), &mut rec) {
        return background;
    }

    let emitted = rec.material.emitted(rec.u, rec.v, rec.p);

    match rec.material.scatter(ray, &rec, rng) {
        Some(result) => {
            let scattered = ray_color(&result.scattered, depth - 1, world, background, rng);
            emitted + result.attenuation * scattered
        }
        // Absorbed: only the emission survives
        None => emitted,
    }
}

/// Probe the first hit for the denoiser's auxiliary buffers.
///
/// Returns the hit material's base albedo and the surface normal, or
/// (background, +Z) when the ray escapes the scene.
pub fn ray_first_hit(ray: &Ray, world: &dyn Hittable, background: Color) -> (Color, Vec3) {
    let mut rec = HitRecord::default();
    if world.hit(ray, Interval::new(T_MIN, f32::INFINITY), &mut rec) {
        (rec.material.albedo(), rec.normal)
    } else {
        (background, Vec3::Z)
    }
}
