//! Triangle mesh container.

use ember_math::Aabb;
use glam::Vec3;

/// A triangle mesh: vertex positions plus triangle index triples.
///
/// Intentionally decoupled from the renderer's primitive types so it can
/// be populated from any file format and converted afterwards.
#[derive(Clone, Debug, Default)]
pub struct Mesh {
    /// Vertex positions (one Vec3 per vertex)
    pub positions: Vec<Vec3>,

    /// Triangle corner indices into `positions`
    pub triangles: Vec<[usize; 3]>,
}

impl Mesh {
    /// Create a mesh from positions and triangle indices.
    pub fn new(positions: Vec<Vec3>, triangles: Vec<[usize; 3]>) -> Self {
        Self {
            positions,
            triangles,
        }
    }

    /// Number of triangles in the mesh.
    pub fn triangle_count(&self) -> usize {
        self.triangles.len()
    }

    /// True if the mesh holds no triangles.
    pub fn is_empty(&self) -> bool {
        self.triangles.is_empty()
    }

    /// Uniformly scale all vertex positions about the origin.
    pub fn scaled(mut self, scale: f32) -> Self {
        for p in &mut self.positions {
            *p *= scale;
        }
        self
    }

    /// Axis-aligned bounds of all vertex positions.
    pub fn bounds(&self) -> Aabb {
        if self.positions.is_empty() {
            return Aabb::EMPTY;
        }

        let mut min = Vec3::splat(f32::INFINITY);
        let mut max = Vec3::splat(f32::NEG_INFINITY);
        for p in &self.positions {
            min = min.min(*p);
            max = max.max(*p);
        }
        Aabb::from_points(min, max)
    }
}
