//! Sphere primitive for ray tracing.

use crate::{
    hittable::{HitRecord, Hittable},
    Material,
};
use ember_math::{Aabb, Interval, Ray, Vec3};
use std::f32::consts::PI;

/// A sphere primitive.
pub struct Sphere<M: Material> {
    center: Vec3,
    radius: f32,
    material: M,
    bbox: Aabb,
}

impl<M: Material> Sphere<M> {
    /// Create a new sphere.
    pub fn new(center: Vec3, radius: f32, material: M) -> Self {
        let radius = radius.max(0.0);
        let rvec = Vec3::splat(radius);
        let bbox = Aabb::from_points(center - rvec, center + rvec);

        Self {
            center,
            radius,
            material,
            bbox,
        }
    }

    /// Get the UV coordinates for a point on the unit sphere.
    fn get_sphere_uv(p: Vec3) -> (f32, f32) {
        // theta: angle down from +Y, phi: angle around Y from +X
        let theta = (-p.y).acos();
        let phi = (-p.z).atan2(p.x) + PI;

        (phi / (2.0 * PI), theta / PI)
    }
}

impl<M: Material + 'static> Hittable for Sphere<M> {
    fn hit<'a>(&'a self, ray: &Ray, ray_t: Interval, rec: &mut HitRecord<'a>) -> bool {
        let oc = self.center - ray.origin();
        let a = ray.direction().length_squared();
        let h = ray.direction().dot(oc);
        let c = oc.length_squared() - self.radius * self.radius;

        let discriminant = h * h - a * c;
        if discriminant < 0.0 {
            return false;
        }

        let sqrtd = discriminant.sqrt();

        // Find the nearest root in the acceptable range
        let mut root = (h - sqrtd) / a;
        if !ray_t.surrounds(root) {
            root = (h + sqrtd) / a;
            if !ray_t.surrounds(root) {
                return false;
            }
        }

        rec.t = root;
        rec.p = ray.at(rec.t);
        let outward_normal = (rec.p - self.center) / self.radius;
        rec.set_face_normal(ray, outward_normal);
        (rec.u, rec.v) = Self::get_sphere_uv(outward_normal);
        rec.material = &self.material;

        true
    }

    fn bounding_box(&self) -> Aabb {
        self.bbox
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::material::Lambertian;

    fn unit_sphere_at(center: Vec3) -> Sphere<Lambertian> {
        Sphere::new(center, 0.5, Lambertian::new(Vec3::splat(0.5)))
    }

    #[test]
    fn test_sphere_hit_distance_and_normal() {
        // Sphere of radius r at origin, ray from +z along -z:
        // hit at t = distance to surface, normal parallel to hit point.
        let sphere = Sphere::new(Vec3::ZERO, 1.0, Lambertian::new(Vec3::splat(0.5)));
        let ray = Ray::new(Vec3::new(0.0, 0.0, 3.0), Vec3::new(0.0, 0.0, -1.0));

        let mut rec = HitRecord::default();
        assert!(sphere.hit(&ray, Interval::new(0.001, f32::INFINITY), &mut rec));
        assert!((rec.t - 2.0).abs() < 1e-4);
        assert!((rec.normal - rec.p.normalize()).length() < 1e-4);
        assert!(rec.front_face);
    }

    #[test]
    fn test_sphere_miss_impact_parameter() {
        // Impact parameter > r misses
        let sphere = Sphere::new(Vec3::ZERO, 1.0, Lambertian::new(Vec3::splat(0.5)));
        let ray = Ray::new(Vec3::new(1.5, 0.0, 3.0), Vec3::new(0.0, 0.0, -1.0));

        let mut rec = HitRecord::default();
        assert!(!sphere.hit(&ray, Interval::new(0.001, f32::INFINITY), &mut rec));
    }

    #[test]
    fn test_sphere_inside_takes_far_root() {
        // Ray origin inside the sphere: near root is behind t_min,
        // the far root is reported and the normal flips.
        let sphere = unit_sphere_at(Vec3::ZERO);
        let ray = Ray::new(Vec3::ZERO, Vec3::new(0.0, 0.0, -1.0));

        let mut rec = HitRecord::default();
        assert!(sphere.hit(&ray, Interval::new(0.001, f32::INFINITY), &mut rec));
        assert!((rec.t - 0.5).abs() < 1e-4);
        assert!(!rec.front_face);
    }

    #[test]
    fn test_sphere_bbox() {
        let sphere = unit_sphere_at(Vec3::new(1.0, 2.0, 3.0));
        let bbox = sphere.bounding_box();
        assert_eq!(bbox.x.min, 0.5);
        assert_eq!(bbox.x.max, 1.5);
        assert_eq!(bbox.y.min, 1.5);
        assert_eq!(bbox.z.max, 3.5);
    }
}
