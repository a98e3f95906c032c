//! Static level geometry
//!
//! An indexed triangle soup handed to the octree once per level load. The
//! level loader owns it; the octree copies the triangles it needs and keeps
//! no reference afterwards. Face normals come from the winding order, so
//! no per-vertex attributes are kept.

use crate::foundation::math::Vec3;
use crate::physics::collision::Triangle;

/// Indexed triangle soup describing the static level
#[derive(Debug, Clone, Default, PartialEq)]
pub struct StaticGeometry {
    /// Vertex positions in world space
    pub positions: Vec<Vec3>,
    /// Triangle list, three indices per triangle
    pub indices: Vec<u32>,
}

impl StaticGeometry {
    /// Create geometry from positions and a triangle index list
    pub fn new(positions: Vec<Vec3>, indices: Vec<u32>) -> Self {
        Self { positions, indices }
    }

    /// Build unindexed geometry from a list of triangles
    pub fn from_triangles(triangles: &[Triangle]) -> Self {
        let mut geometry = Self::default();
        for triangle in triangles {
            geometry.push_triangle(triangle.v0, triangle.v1, triangle.v2);
        }
        geometry
    }

    /// Append one triangle
    pub fn push_triangle(&mut self, v0: Vec3, v1: Vec3, v2: Vec3) {
        let base = self.positions.len() as u32;
        self.positions.extend_from_slice(&[v0, v1, v2]);
        self.indices.extend_from_slice(&[base, base + 1, base + 2]);
    }

    /// Append a quad `a b c d` (counter-clockwise seen from the front) as two triangles
    pub fn push_quad(&mut self, a: Vec3, b: Vec3, c: Vec3, d: Vec3) {
        let base = self.positions.len() as u32;
        self.positions.extend_from_slice(&[a, b, c, d]);
        self.indices.extend_from_slice(&[base, base + 1, base + 2, base, base + 2, base + 3]);
    }

    /// Append all triangles of another geometry
    pub fn append(&mut self, other: &StaticGeometry) {
        let base = self.positions.len() as u32;
        self.positions.extend_from_slice(&other.positions);
        self.indices.extend(other.indices.iter().map(|index| index + base));
    }

    /// Number of complete triangles described by the index list
    pub fn triangle_count(&self) -> usize {
        self.indices.len() / 3
    }

    /// Resolve triangle `index`, `None` when an index is out of range
    pub fn triangle(&self, index: usize) -> Option<Triangle> {
        let corners = self.indices.get(index * 3..index * 3 + 3)?;
        let vertex = |i: u32| self.positions.get(i as usize).copied();
        Some(Triangle::new(vertex(corners[0])?, vertex(corners[1])?, vertex(corners[2])?))
    }

    /// True when there is nothing to collide with
    pub fn is_empty(&self) -> bool {
        self.indices.is_empty()
    }
}
