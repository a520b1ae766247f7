//! Affine transform wrappers over hittables.
//!
//! Rays are moved into object space, the wrapped primitive intersects
//! there, and the resulting hit point and normal are moved back.

use crate::hittable::{HitRecord, Hittable};
use ember_math::{Aabb, Interval, Ray, Vec3};

/// Translate a wrapped hittable by a fixed offset.
pub struct Translate {
    object: Box<dyn Hittable>,
    offset: Vec3,
    bbox: Aabb,
}

impl Translate {
    pub fn new(object: Box<dyn Hittable>, offset: Vec3) -> Self {
        let bbox = object.bounding_box().translate(offset);
        Self {
            object,
            offset,
            bbox,
        }
    }
}

impl Hittable for Translate {
    fn hit<'a>(&'a self, ray: &Ray, ray_t: Interval, rec: &mut HitRecord<'a>) -> bool {
        // Move the ray into object space instead of moving the object
        let offset_ray = Ray::new(ray.origin() - self.offset, ray.direction());

        if !self.object.hit(&offset_ray, ray_t, rec) {
            return false;
        }

        rec.p += self.offset;
        true
    }

    fn bounding_box(&self) -> Aabb {
        self.bbox
    }
}

/// Rotate a wrapped hittable about the Y axis.
pub struct RotateY {
    object: Box<dyn Hittable>,
    sin_theta: f32,
    cos_theta: f32,
    bbox: Aabb,
}

impl RotateY {
    pub fn new(object: Box<dyn Hittable>, angle_degrees: f32) -> Self {
        let radians = angle_degrees.to_radians();
        let sin_theta = radians.sin();
        let cos_theta = radians.cos();

        // World-space box from the rotated corners of the inner box
        let inner = object.bounding_box();
        let mut min = Vec3::splat(f32::INFINITY);
        let mut max = Vec3::splat(f32::NEG_INFINITY);

        for i in 0..2 {
            for j in 0..2 {
                for k in 0..2 {
                    let x = if i == 0 { inner.x.min } else { inner.x.max };
                    let y = if j == 0 { inner.y.min } else { inner.y.max };
                    let z = if k == 0 { inner.z.min } else { inner.z.max };

                    let new_x = cos_theta * x + sin_theta * z;
                    let new_z = -sin_theta * x + cos_theta * z;

                    let corner = Vec3::new(new_x, y, new_z);
                    min = min.min(corner);
                    max = max.max(corner);
                }
            }
        }

        Self {
            object,
            sin_theta,
            cos_theta,
            bbox: Aabb::from_points(min, max),
        }
    }

    /// World space -> object space (rotate by -theta).
    fn to_object(&self, v: Vec3) -> Vec3 {
        Vec3::new(
            self.cos_theta * v.x - self.sin_theta * v.z,
            v.y,
            self.sin_theta * v.x + self.cos_theta * v.z,
        )
    }

    /// Object space -> world space (rotate by +theta).
    fn to_world(&self, v: Vec3) -> Vec3 {
        Vec3::new(
            self.cos_theta * v.x + self.sin_theta * v.z,
            v.y,
            -self.sin_theta * v.x + self.cos_theta * v.z,
        )
    }
}

impl Hittable for RotateY {
    fn hit<'a>(&'a self, ray: &Ray, ray_t: Interval, rec: &mut HitRecord<'a>) -> bool {
        let rotated = Ray::new(self.to_object(ray.origin()), self.to_object(ray.direction()));

        if !self.object.hit(&rotated, ray_t, rec) {
            return false;
        }

        rec.p = self.to_world(rec.p);
        rec.normal = self.to_world(rec.normal);
        true
    }

    fn bounding_box(&self) -> Aabb {
        self.bbox
    }
}
