//! ember renderer - CPU path tracing.
//!
//! A Monte Carlo path tracer: trait-object scene geometry under a BVH,
//! a four-variant material model, a thin-lens camera, a recursive
//! integrator with adaptive per-pixel sampling, and a rayon scan-line
//! renderer producing color, albedo and normal planes for denoising.

mod bvh;
mod camera;
mod denoise;
mod hittable;
mod integrator;
mod material;
mod progress;
mod quad;
mod renderer;
mod sampling;
mod sphere;
mod transform;
mod triangle;

pub use bvh::BvhNode;
pub use camera::Camera;
pub use denoise::{DenoiseError, Denoiser, Passthrough};
pub use hittable::{HitRecord, Hittable, HittableList};
pub use integrator::{ray_color, ray_first_hit};
pub use material::{Color, Dielectric, DiffuseLight, Lambertian, Material, Metal, ScatterResult};
pub use progress::{NullProgress, ProgressBarReporter, RenderProgress};
pub use quad::{make_box, Quad};
pub use renderer::{mesh_to_triangles, render, render_pixel, Framebuffer, PixelSample, RenderConfig};
pub use sphere::Sphere;
pub use transform::{RotateY, Translate};
pub use triangle::Triangle;

/// Re-export common math types from ember_math
pub use ember_math::{Aabb, Interval, Ray, Vec3};
