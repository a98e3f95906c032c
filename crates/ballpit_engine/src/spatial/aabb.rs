//! Axis-aligned bounding boxes

use crate::foundation::math::{utils, Vec3};

/// Axis-Aligned Bounding Box for spatial queries
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AABB {
    /// Minimum corner of the bounding box
    pub min: Vec3,
    /// Maximum corner of the bounding box
    pub max: Vec3,
}

impl AABB {
    /// Create a new AABB from min and max points
    pub fn new(min: Vec3, max: Vec3) -> Self {
        Self { min, max }
    }

    /// Create an AABB centered at a point with given extents
    pub fn from_center_extents(center: Vec3, extents: Vec3) -> Self {
        Self {
            min: center - extents,
            max: center + extents,
        }
    }

    /// Smallest box containing both boxes
    pub fn union(&self, other: &AABB) -> AABB {
        AABB::new(utils::min(self.min, other.min), utils::max(self.max, other.max))
    }

    /// Grow the box by `margin` on every side
    pub fn expanded(&self, margin: f32) -> AABB {
        let margin = Vec3::repeat(margin);
        AABB::new(self.min - margin, self.max + margin)
    }

    /// Get the center of the AABB
    pub fn center(&self) -> Vec3 {
        (self.min + self.max) * 0.5
    }

    /// Get the extents (half-size) of the AABB
    pub fn extents(&self) -> Vec3 {
        (self.max - self.min) * 0.5
    }

    /// Length of the longest side
    pub fn max_side(&self) -> f32 {
        let size = self.max - self.min;
        size.x.max(size.y).max(size.z)
    }

    /// Check if this AABB contains a point
    pub fn contains_point(&self, point: Vec3) -> bool {
        point.x >= self.min.x && point.x <= self.max.x &&
        point.y >= self.min.y && point.y <= self.max.y &&
        point.z >= self.min.z && point.z <= self.max.z
    }

    /// Check if this AABB intersects another AABB
    pub fn intersects(&self, other: &AABB) -> bool {
        self.min.x <= other.max.x && self.max.x >= other.min.x &&
        self.min.y <= other.max.y && self.max.y >= other.min.y &&
        self.min.z <= other.max.z && self.max.z >= other.min.z
    }

    /// Check if a sphere touches this box
    pub fn intersects_sphere(&self, center: Vec3, radius: f32) -> bool {
        let closest_point = Vec3::new(
            center.x.clamp(self.min.x, self.max.x),
            center.y.clamp(self.min.y, self.max.y),
            center.z.clamp(self.min.z, self.max.z),
        );
        (closest_point - center).magnitude_squared() <= radius * radius
    }

    /// Bounds of one of the eight octants
    ///
    /// Octant layout: bit 0 = +X, bit 1 = +Y, bit 2 = +Z
    pub fn octant(&self, index: usize) -> AABB {
        let center = self.center();
        let quarter = self.extents() * 0.5;
        let sign = |bit: usize| if index & bit != 0 { 1.0 } else { -1.0 };
        let child_center = Vec3::new(
            center.x + quarter.x * sign(1),
            center.y + quarter.y * sign(2),
            center.z + quarter.z * sign(4),
        );
        AABB::from_center_extents(child_center, quarter)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_octants_tile_parent() {
        let parent = AABB::new(Vec3::new(-2.0, -2.0, -2.0), Vec3::new(2.0, 2.0, 2.0));
        let mut total = AABB::from_center_extents(parent.center(), Vec3::zeros());
        for i in 0..8 {
            let child = parent.octant(i);
            assert_eq!(child.extents(), Vec3::new(1.0, 1.0, 1.0));
            total = total.union(&child);
        }
        assert_eq!(total, parent);
        assert_eq!(parent.octant(7).min, Vec3::zeros());
        assert_eq!(parent.octant(0).max, Vec3::zeros());
    }

    #[test]
    fn test_sphere_overlap() {
        let aabb = AABB::new(Vec3::zeros(), Vec3::new(1.0, 1.0, 1.0));
        assert!(aabb.intersects_sphere(Vec3::new(1.5, 0.5, 0.5), 0.6));
        assert!(!aabb.intersects_sphere(Vec3::new(2.0, 2.0, 2.0), 1.0));
    }
}
