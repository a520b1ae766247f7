//! Triangle primitive for ray tracing.
//!
//! Uses the Möller-Trumbore algorithm for ray-triangle intersection.

use crate::{
    hittable::{HitRecord, Hittable},
    Material,
};
use ember_math::{Aabb, Interval, Ray, Vec3};

/// A triangle primitive.
pub struct Triangle<M: Material> {
    v0: Vec3,
    /// Edge vectors from v0
    e1: Vec3,
    e2: Vec3,
    /// Pre-computed face normal (unit length)
    normal: Vec3,
    material: M,
    bbox: Aabb,
}

impl<M: Material> Triangle<M> {
    /// Create a new triangle from three vertices.
    pub fn new(v0: Vec3, v1: Vec3, v2: Vec3, material: M) -> Self {
        let e1 = v1 - v0;
        let e2 = v2 - v0;
        let normal = e1.cross(e2).normalize_or_zero();

        Self {
            v0,
            e1,
            e2,
            normal,
            material,
            bbox: Aabb::from_triangle(v0, v1, v2),
        }
    }
}

impl<M: Material + 'static> Hittable for Triangle<M> {
    /// Möller-Trumbore ray-triangle intersection.
    fn hit<'a>(&'a self, ray: &Ray, ray_t: Interval, rec: &mut HitRecord<'a>) -> bool {
        let p = ray.direction().cross(self.e2);
        let det = self.e1.dot(p);

        // Parallel ray or degenerate (zero-area) triangle
        if det.abs() < 1e-8 {
            return false;
        }

        let inv_det = 1.0 / det;
        let s = ray.origin() - self.v0;

        let u = s.dot(p) * inv_det;
        if !(0.0..=1.0).contains(&u) {
            return false;
        }

        let q = s.cross(self.e1);
        let v = ray.direction().dot(q) * inv_det;
        if v < 0.0 || u + v > 1.0 {
            return false;
        }

        let t = self.e2.dot(q) * inv_det;
        if !ray_t.contains(t) {
            return false;
        }

        rec.t = t;
        rec.p = ray.at(t);
        rec.u = u;
        rec.v = v;
        rec.material = &self.material;
        rec.set_face_normal(ray, self.normal);

        true
    }

    fn bounding_box(&self) -> Aabb {
        self.bbox
    }
}
