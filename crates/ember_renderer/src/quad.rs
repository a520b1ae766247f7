//! Planar quad primitive and the box helper built from six of them.

use crate::{
    hittable::{HitRecord, Hittable, HittableList},
    Material,
};
use ember_math::{Aabb, Interval, Ray, Vec3};

/// A parallelogram defined by a corner point and two edge vectors.
pub struct Quad<M: Material> {
    /// Corner point
    q: Vec3,
    /// Edge vectors spanning the quad from q
    u: Vec3,
    v: Vec3,
    /// n / dot(n, n), used to project hit points onto plane coordinates
    w: Vec3,
    normal: Vec3,
    /// Plane offset: dot(normal, q)
    d: f32,
    material: M,
    bbox: Aabb,
}

impl<M: Material> Quad<M> {
    /// Create a new quad from a corner and two edge vectors.
    pub fn new(q: Vec3, u: Vec3, v: Vec3, material: M) -> Self {
        let n = u.cross(v);
        let normal = n.normalize();
        let d = normal.dot(q);
        let w = n / n.dot(n);

        // Box of both diagonals catches every orientation
        let bbox = Aabb::surrounding(
            &Aabb::from_points(q, q + u + v),
            &Aabb::from_points(q + u, q + v),
        );

        Self {
            q,
            u,
            v,
            w,
            normal,
            d,
            material,
            bbox,
        }
    }

    /// True if plane coordinates (alpha, beta) land inside the quad.
    fn is_interior(alpha: f32, beta: f32) -> bool {
        let unit = Interval::new(0.0, 1.0);
        unit.contains(alpha) && unit.contains(beta)
    }
}

impl<M: Material + 'static> Hittable for Quad<M> {
    fn hit<'a>(&'a self, ray: &Ray, ray_t: Interval, rec: &mut HitRecord<'a>) -> bool {
        let denom = self.normal.dot(ray.direction());

        // Ray parallel to the plane
        if denom.abs() < 1e-8 {
            return false;
        }

        let t = (self.d - self.normal.dot(ray.origin())) / denom;
        if !ray_t.contains(t) {
            return false;
        }

        // Project the planar hit point onto the quad's edge basis
        let intersection = ray.at(t);
        let planar_hit = intersection - self.q;
        let alpha = self.w.dot(planar_hit.cross(self.v));
        let beta = self.w.dot(self.u.cross(planar_hit));

        if !Self::is_interior(alpha, beta) {
            return false;
        }

        rec.t = t;
        rec.p = intersection;
        rec.u = alpha;
        rec.v = beta;
        rec.material = &self.material;
        rec.set_face_normal(ray, self.normal);

        true
    }

    fn bounding_box(&self) -> Aabb {
        self.bbox
    }
}

/// Build the six quads of an axis-aligned box spanning two corners.
pub fn make_box<M: Material + Clone + 'static>(a: Vec3, b: Vec3, material: M) -> HittableList {
    let mut sides = HittableList::new();

    let min = a.min(b);
    let max = a.max(b);

    let dx = Vec3::new(max.x - min.x, 0.0, 0.0);
    let dy = Vec3::new(0.0, max.y - min.y, 0.0);
    let dz = Vec3::new(0.0, 0.0, max.z - min.z);

    let m = material;
    // front, right, back, left, top, bottom
    sides.add(Box::new(Quad::new(
        Vec3::new(min.x, min.y, max.z),
        dx,
        dy,
        m.clone(),
    )));
    sides.add(Box::new(Quad::new(
        Vec3::new(max.x, min.y, max.z),
        -dz,
        dy,
        m.clone(),
    )));
    sides.add(Box::new(Quad::new(
        Vec3::new(max.x, min.y, min.z),
        -dx,
        dy,
        m.clone(),
    )));
    sides.add(Box::new(Quad::new(
        Vec3::new(min.x, min.y, min.z),
        dz,
        dy,
        m.clone(),
    )));
    sides.add(Box::new(Quad::new(
        Vec3::new(min.x, max.y, max.z),
        dx,
        -dz,
        m.clone(),
    )));
    sides.add(Box::new(Quad::new(
        Vec3::new(min.x, min.y, min.z),
        dx,
        dz,
        m,
    )));

    sides
}
