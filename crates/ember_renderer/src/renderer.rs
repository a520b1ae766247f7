//! Scan-line parallel render driver.
//!
//! Rows are distributed over rayon's work-stealing pool; each worker
//! owns its row's pixels exclusively, so the only cross-thread state is
//! the rows-completed counter feeding progress reporting. Per-row RNGs
//! are seeded from the render seed and the row index, making output
//! independent of scheduling.

use crate::integrator::{ray_color, ray_first_hit};
use crate::{Camera, Color, Denoiser, Hittable, Material, RenderProgress, Triangle};
use ember_core::Mesh;
use ember_math::Vec3;
use rand::rngs::StdRng;
use rand::{RngCore, SeedableRng};
use rayon::prelude::*;
use std::sync::atomic::{AtomicU32, AtomicU64, Ordering};

/// Render configuration beyond what the camera carries.
#[derive(Debug, Clone)]
pub struct RenderConfig {
    /// Base seed for per-row RNG streams.
    pub seed: u64,
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self { seed: 0 }
    }
}

/// Per-pixel result of the sampling controller.
pub struct PixelSample {
    pub color: Color,
    pub albedo: Color,
    pub normal: Vec3,
    /// Non-black samples actually averaged (floor 1)
    pub samples_used: u32,
    /// Radiance samples traced, accepted or not
    pub samples_traced: u32,
}

/// Render one pixel: aux albedo/normal pass plus adaptive radiance pass.
///
/// Radiance samples are traced up to the camera's ceiling; only
/// non-black samples are accumulated and counted, and tracing stops
/// once the floor of non-black samples is reached. An all-black pixel
/// traces the full ceiling and falls back to a count of one.
pub fn render_pixel(
    camera: &Camera,
    world: &dyn Hittable,
    i: u32,
    j: u32,
    rng: &mut dyn RngCore,
) -> PixelSample {
    // Aux pass for the denoiser buffers
    let mut pixel_albedo = Color::ZERO;
    let mut pixel_normal = Vec3::ZERO;
    for _ in 0..camera.samples_per_pixel {
        let ray = camera.get_ray(i, j, rng);
        let (albedo, normal) = ray_first_hit(&ray, world, camera.background);
        pixel_albedo += albedo;
        pixel_normal += normal;
    }

    // Adaptive radiance pass
    let mut pixel_color = Color::ZERO;
    let mut samples_used = 0u32;
    let mut samples_traced = camera.max_samples_per_pixel;

    for sample in 0..camera.max_samples_per_pixel {
        let ray = camera.get_ray(i, j, rng);
        let color = ray_color(&ray, camera.max_depth, world, camera.background, rng);

        if color != Color::ZERO {
            pixel_color += color;
            samples_used += 1;
            if samples_used >= camera.min_samples_per_pixel {
                samples_traced = sample + 1;
                break;
            }
        }
    }

    if samples_used == 0 {
        samples_used = 1;
    }

    PixelSample {
        color: pixel_color / samples_used as f32,
        albedo: pixel_albedo * camera.samples_scale(),
        normal: pixel_normal * camera.samples_scale(),
        samples_used,
        samples_traced,
    }
}

/// Dense per-pixel output planes: color, albedo and normal, each a
/// row-major `width * height * 3` f32 buffer.
pub struct Framebuffer {
    pub width: u32,
    pub height: u32,
    pub color: Vec<f32>,
    pub albedo: Vec<f32>,
    pub normal: Vec<f32>,
}

impl Framebuffer {
    /// Create a black framebuffer.
    pub fn new(width: u32, height: u32) -> Self {
        let len = (width * height * 3) as usize;
        Self {
            width,
            height,
            color: vec![0.0; len],
            albedo: vec![0.0; len],
            normal: vec![0.0; len],
        }
    }

    /// Convert a linear f32 plane to gamma-corrected 8-bit RGB.
    ///
    /// byte = 255.999 * sqrt(v) for v > 0, else 0.
    pub fn to_rgb8(plane: &[f32]) -> Vec<u8> {
        plane
            .iter()
            .map(|&v| {
                let gamma = if v > 0.0 { v.sqrt() } else { 0.0 };
                (255.999 * gamma.clamp(0.0, 1.0)) as u8
            })
            .collect()
    }

    /// Run the denoising collaborator over the color plane.
    ///
    /// A failing backend is reported and the noisy plane kept.
    pub fn denoise_color(&mut self, denoiser: &dyn Denoiser) {
        match denoiser.denoise(
            &self.color,
            &self.albedo,
            &self.normal,
            self.width,
            self.height,
        ) {
            Ok(denoised) => self.color = denoised,
            Err(e) => log::warn!("denoiser failed, keeping noisy buffer: {e}"),
        }
    }
}

/// Render the scene into a framebuffer, rows in parallel.
///
/// The scene and camera are frozen for the whole parallel phase; each
/// row is written by exactly one worker.
pub fn render(
    camera: &mut Camera,
    world: &dyn Hittable,
    config: &RenderConfig,
    progress: &dyn RenderProgress,
) -> Framebuffer {
    camera.initialize();
    let camera = &*camera;

    let width = camera.image_width;
    let height = camera.image_height();
    let mut fb = Framebuffer::new(width, height);

    log::info!(
        "rendering {}x{} on {} threads",
        width,
        height,
        rayon::current_num_threads()
    );

    let rows_completed = AtomicU32::new(0);
    let total_traced = AtomicU64::new(0);
    let row_len = (width * 3) as usize;

    fb.color
        .par_chunks_mut(row_len)
        .zip(fb.albedo.par_chunks_mut(row_len))
        .zip(fb.normal.par_chunks_mut(row_len))
        .enumerate()
        .for_each(|(j, ((color_row, albedo_row), normal_row))| {
            // Per-row stream keeps the render deterministic for a fixed
            // seed regardless of which worker picks the row
            let mut rng =
                StdRng::seed_from_u64(config.seed ^ (j as u64).wrapping_mul(0x9E37_79B9_7F4A_7C15));

            let mut row_traced = 0u64;
            for i in 0..width {
                let sample = render_pixel(camera, world, i, j as u32, &mut rng);
                row_traced += sample.samples_traced as u64;

                let idx = (i * 3) as usize;
                write_rgb(color_row, idx, sample.color);
                write_rgb(albedo_row, idx, sample.albedo);
                write_rgb(normal_row, idx, sample.normal);
            }

            total_traced.fetch_add(row_traced, Ordering::Relaxed);
            let done = rows_completed.fetch_add(1, Ordering::Relaxed) + 1;
            progress.update(done);
        });

    let pixel_count = (width as u64) * (height as u64);
    progress.end(total_traced.load(Ordering::Relaxed) as f64 / pixel_count as f64);

    fb
}

#[inline]
fn write_rgb(row: &mut [f32], idx: usize, value: Vec3) {
    row[idx] = value.x;
    row[idx + 1] = value.y;
    row[idx + 2] = value.z;
}

/// Build a triangle list from a mesh, sharing one material.
pub fn mesh_to_triangles<M: Material + Clone + 'static>(
    mesh: &Mesh,
    scale: f32,
    material: M,
) -> crate::HittableList {
    let mut list = crate::HittableList::new();
    for [a, b, c] in &mesh.triangles {
        list.add(Box::new(Triangle::new(
            mesh.positions[*a] * scale,
            mesh.positions[*b] * scale,
            mesh.positions[*c] * scale,
            material.clone(),
        )));
    }
    list
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{BvhNode, Lambertian, NullProgress, Sphere};
    use rand::SeedableRng;

    fn basic_camera() -> Camera {
        Camera::new()
            .with_resolution(16, 1.0)
            .with_sampling(2, 10, 100, 10)
            .with_position(Vec3::ZERO, Vec3::new(0.0, 0.0, -1.0), Vec3::Y)
            .with_lens(90.0, 0.0, 1.0)
    }

    /// Floor behavior: a non-black background makes every sample
    /// non-black, so exactly `min_samples_per_pixel` are traced.
    #[test]
    fn test_adaptive_floor_all_non_black() {
        let mut camera = basic_camera().with_background(Vec3::new(0.5, 0.7, 1.0));
        camera.initialize();
        let world = BvhNode::new(vec![]);

        let mut rng = StdRng::seed_from_u64(41);
        let sample = render_pixel(&camera, &world, 8, 8, &mut rng);

        assert_eq!(sample.samples_used, 10);
        assert_eq!(sample.samples_traced, 10);
        assert!((sample.color - Vec3::new(0.5, 0.7, 1.0)).length() < 1e-5);
    }

    /// Ceiling behavior: an all-black scene never reaches the floor, so
    /// the full ceiling is traced and the count falls back to one.
    #[test]
    fn test_adaptive_ceiling_all_black() {
        let mut camera = basic_camera().with_background(Vec3::ZERO);
        camera.initialize();
        let world = BvhNode::new(vec![]);

        let mut rng = StdRng::seed_from_u64(42);
        let sample = render_pixel(&camera, &world, 8, 8, &mut rng);

        assert_eq!(sample.samples_used, 1);
        assert_eq!(sample.samples_traced, 100);
        assert_eq!(sample.color, Vec3::ZERO);
    }

    #[test]
    fn test_to_rgb8_gamma() {
        let bytes = Framebuffer::to_rgb8(&[0.0, 0.25, 1.0, -0.5, 4.0, 0.0]);
        assert_eq!(bytes[0], 0);
        assert_eq!(bytes[1], 127); // 255.999 * sqrt(0.25)
        assert_eq!(bytes[2], 255);
        assert_eq!(bytes[3], 0); // negative clamps to 0
        assert_eq!(bytes[4], 255); // overbright clamps to 255
    }

    #[test]
    fn test_render_deterministic_for_seed() {
        let world = BvhNode::new(vec![Box::new(Sphere::new(
            Vec3::new(0.0, 0.0, -2.0),
            0.5,
            Lambertian::new(Vec3::new(0.8, 0.3, 0.3)),
        ))]);
        let config = RenderConfig { seed: 7 };

        let mut cam_a = basic_camera().with_background(Vec3::new(0.5, 0.7, 1.0));
        let fb_a = render(&mut cam_a, &world, &config, &NullProgress);

        let mut cam_b = basic_camera().with_background(Vec3::new(0.5, 0.7, 1.0));
        let fb_b = render(&mut cam_b, &world, &config, &NullProgress);

        assert_eq!(fb_a.color, fb_b.color);
        assert_eq!(fb_a.albedo, fb_b.albedo);
        assert_eq!(fb_a.normal, fb_b.normal);
    }

    #[test]
    fn test_mesh_to_triangles_scale() {
        use ember_core::Mesh;

        let mesh = Mesh::new(
            vec![
                Vec3::new(0.0, 0.0, -1.0),
                Vec3::new(1.0, 0.0, -1.0),
                Vec3::new(0.0, 1.0, -1.0),
            ],
            vec![[0, 1, 2]],
        );

        let list = mesh_to_triangles(&mesh, 2.0, Lambertian::new(Vec3::splat(0.5)));
        assert_eq!(list.len(), 1);

        let bbox = list.bounding_box();
        assert!((bbox.x.max - 2.0).abs() < 1e-3);
        assert!((bbox.y.max - 2.0).abs() < 1e-3);
    }
}
