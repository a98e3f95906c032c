//! Primitive collision shapes and intersection algorithms
//!
//! Provides basic geometric primitives (spheres, capsules, triangles) and the
//! contact descriptor returned by static-geometry queries. All of them are
//! plain `Copy` values; queries never mutate their inputs.

use crate::foundation::math::{utils, Vec3};
use crate::spatial::AABB;

/// Contact with static geometry
///
/// `normal` is a unit vector pointing out of the surface, towards the body.
/// Translating the body by `normal * depth` resolves the penetration.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Contact {
    /// Unit push-out direction
    pub normal: Vec3,
    /// Penetration depth (never negative)
    pub depth: f32,
}

impl Contact {
    /// Build a contact from a total push-out displacement
    ///
    /// Returns `None` when the displacement is too small to give a direction.
    pub fn from_displacement(displacement: Vec3) -> Option<Self> {
        let depth = displacement.magnitude();
        utils::try_normalize(displacement).map(|normal| Self { normal, depth })
    }

    /// The displacement that resolves this contact
    pub fn correction(&self) -> Vec3 {
        self.normal * self.depth
    }
}

/// A bounding sphere for collision detection
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BoundingSphere {
    /// The center position of the sphere in world space
    pub center: Vec3,
    /// The radius of the sphere
    pub radius: f32,
}

impl BoundingSphere {
    /// Creates a new bounding sphere with the given center and radius
    pub fn new(center: Vec3, radius: f32) -> Self {
        Self { center, radius }
    }

    /// Check if this sphere overlaps another (touching does not count)
    pub fn intersects(&self, other: &BoundingSphere) -> bool {
        let distance_squared = (self.center - other.center).magnitude_squared();
        let radius_sum = self.radius + other.radius;
        distance_squared < radius_sum * radius_sum
    }

    /// Get the penetration depth if intersecting (0.0 if not intersecting)
    pub fn penetration_depth(&self, other: &BoundingSphere) -> f32 {
        let distance = (self.center - other.center).magnitude();
        let radius_sum = self.radius + other.radius;
        (radius_sum - distance).max(0.0)
    }

    /// Axis-aligned bounds of the sphere
    pub fn aabb(&self) -> AABB {
        AABB::from_center_extents(self.center, Vec3::repeat(self.radius))
    }
}

/// A capsule: the set of points within `radius` of the segment `start`-`end`
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Capsule {
    /// Bottom of the medial segment
    pub start: Vec3,
    /// Top of the medial segment
    pub end: Vec3,
    /// Swept sphere radius
    pub radius: f32,
}

impl Capsule {
    /// Creates a capsule from its medial segment and radius
    pub fn new(start: Vec3, end: Vec3, radius: f32) -> Self {
        Self { start, end, radius }
    }

    /// Midpoint of the medial segment
    pub fn center(&self) -> Vec3 {
        (self.start + self.end) * 0.5
    }

    /// Move both segment ends by `offset`
    pub fn translate(&mut self, offset: Vec3) {
        self.start += offset;
        self.end += offset;
    }

    /// Copy of this capsule moved by `offset`
    pub fn translated(&self, offset: Vec3) -> Self {
        let mut moved = *self;
        moved.translate(offset);
        moved
    }

    /// The three points the dynamic narrow phase samples: start, end, midpoint
    pub fn sample_points(&self) -> [Vec3; 3] {
        [self.start, self.end, self.center()]
    }

    /// Axis-aligned bounds of the capsule
    pub fn aabb(&self) -> AABB {
        let r = Vec3::repeat(self.radius);
        AABB::new(
            utils::min(self.start, self.end) - r,
            utils::max(self.start, self.end) + r,
        )
    }
}

/// A triangle for collision detection
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Triangle {
    /// First vertex
    pub v0: Vec3,
    /// Second vertex
    pub v1: Vec3,
    /// Third vertex
    pub v2: Vec3,
}

impl Triangle {
    /// Creates a new triangle
    pub fn new(v0: Vec3, v1: Vec3, v2: Vec3) -> Self {
        Self { v0, v1, v2 }
    }

    /// Face normal (right-hand rule), `None` for degenerate triangles
    pub fn normal(&self) -> Option<Vec3> {
        let edge1 = self.v1 - self.v0;
        let edge2 = self.v2 - self.v0;
        utils::try_normalize(edge1.cross(&edge2))
    }

    /// Calculates the centroid (center point) of the triangle
    pub fn centroid(&self) -> Vec3 {
        (self.v0 + self.v1 + self.v2) / 3.0
    }

    /// Axis-aligned bounds of the triangle
    pub fn aabb(&self) -> AABB {
        AABB::new(
            utils::min(utils::min(self.v0, self.v1), self.v2),
            utils::max(utils::max(self.v0, self.v1), self.v2),
        )
    }

    /// True if all three vertices are finite
    pub fn is_finite(&self) -> bool {
        utils::is_finite(&self.v0) && utils::is_finite(&self.v1) && utils::is_finite(&self.v2)
    }

    /// The three edges as segments
    pub fn edges(&self) -> [(Vec3, Vec3); 3] {
        [(self.v0, self.v1), (self.v1, self.v2), (self.v2, self.v0)]
    }

    /// Get the closest point on the triangle to a given point
    ///
    /// Voronoi-region walk from Ericson, *Real-Time Collision Detection* 5.1.5.
    pub fn closest_point(&self, point: Vec3) -> Vec3 {
        let edge1 = self.v1 - self.v0;
        let edge2 = self.v2 - self.v0;
        let v0_to_point = point - self.v0;

        let d1 = edge1.dot(&v0_to_point);
        let d2 = edge2.dot(&v0_to_point);

        // Vertex region outside v0
        if d1 <= 0.0 && d2 <= 0.0 {
            return self.v0;
        }

        // Vertex region outside v1
        let v1_to_point = point - self.v1;
        let d3 = edge1.dot(&v1_to_point);
        let d4 = edge2.dot(&v1_to_point);
        if d3 >= 0.0 && d4 <= d3 {
            return self.v1;
        }

        // Edge region v0-v1
        let vc = d1 * d4 - d3 * d2;
        if vc <= 0.0 && d1 >= 0.0 && d3 <= 0.0 {
            let v = d1 / (d1 - d3);
            return self.v0 + edge1 * v;
        }

        // Vertex region outside v2
        let v2_to_point = point - self.v2;
        let d5 = edge1.dot(&v2_to_point);
        let d6 = edge2.dot(&v2_to_point);
        if d6 >= 0.0 && d5 <= d6 {
            return self.v2;
        }

        // Edge region v0-v2
        let vb = d5 * d2 - d1 * d6;
        if vb <= 0.0 && d2 >= 0.0 && d6 <= 0.0 {
            let w = d2 / (d2 - d6);
            return self.v0 + edge2 * w;
        }

        // Edge region v1-v2
        let va = d3 * d6 - d5 * d4;
        if va <= 0.0 && (d4 - d3) >= 0.0 && (d5 - d6) >= 0.0 {
            let w = (d4 - d3) / ((d4 - d3) + (d5 - d6));
            return self.v1 + (self.v2 - self.v1) * w;
        }

        // Inside the face
        let denom = 1.0 / (va + vb + vc);
        let v = vb * denom;
        let w = vc * denom;
        self.v0 + edge1 * v + edge2 * w
    }

    /// Signed distance from the triangle plane (positive on the normal side)
    pub fn signed_distance(&self, point: Vec3) -> Option<f32> {
        self.normal().map(|normal| normal.dot(&(point - self.v0)))
    }

    /// True if the projection of `point` onto the triangle plane lies inside the triangle
    pub fn contains_projection(&self, point: Vec3) -> bool {
        let edge1 = self.v1 - self.v0;
        let edge2 = self.v2 - self.v0;
        let to_point = point - self.v0;

        let dot11 = edge1.dot(&edge1);
        let dot12 = edge1.dot(&edge2);
        let dot22 = edge2.dot(&edge2);
        let dot1p = edge1.dot(&to_point);
        let dot2p = edge2.dot(&to_point);

        let denom = dot11 * dot22 - dot12 * dot12;
        if denom.abs() <= f32::EPSILON {
            return false;
        }
        let u = (dot22 * dot1p - dot12 * dot2p) / denom;
        let v = (dot11 * dot2p - dot12 * dot1p) / denom;
        u >= 0.0 && v >= 0.0 && u + v <= 1.0
    }

    /// Push-out for a sphere overlapping this triangle
    ///
    /// The normal points from the closest surface point to the sphere
    /// center. A center lying exactly on the face uses the face normal.
    pub fn sphere_contact(&self, sphere: &BoundingSphere) -> Option<Contact> {
        let closest = self.closest_point(sphere.center);
        let offset = sphere.center - closest;
        let distance_sq = offset.magnitude_squared();
        if distance_sq >= sphere.radius * sphere.radius {
            return None;
        }

        let distance = distance_sq.sqrt();
        let normal = utils::try_normalize(offset).or_else(|| self.normal())?;
        Some(Contact {
            normal,
            depth: sphere.radius - distance,
        })
    }

    /// Push-out for a capsule overlapping or touching this triangle
    ///
    /// The segment ends are measured against the plane offset by the radius.
    /// Where the segment meets that offset plane inside the face, the face
    /// normal is used and the deeper end is lifted clear. A capsule resting
    /// exactly on the face gives a contact of depth zero. Otherwise the
    /// closest points between the segment and each edge decide the contact.
    pub fn capsule_contact(&self, capsule: &Capsule) -> Option<Contact> {
        let normal = self.normal()?;
        let d_start = normal.dot(&(capsule.start - self.v0)) - capsule.radius;
        let d_end = normal.dot(&(capsule.end - self.v0)) - capsule.radius;

        // Strictly beyond the surface, or entirely behind the plane
        if (d_start > 0.0 && d_end > 0.0) || (d_start < -capsule.radius && d_end < -capsule.radius) {
            return None;
        }

        let span = d_start.abs() + d_end.abs();
        let t = if span > f32::EPSILON { d_start.abs() / span } else { 0.0 };
        let face_point = capsule.start + (capsule.end - capsule.start) * t;
        if self.contains_projection(face_point) {
            return Some(Contact {
                normal,
                depth: d_start.min(d_end).abs(),
            });
        }

        let mut best: Option<Contact> = None;
        for (a, b) in self.edges() {
            let (on_segment, on_edge) =
                utils::closest_points_between_segments(capsule.start, capsule.end, a, b);
            let offset = on_segment - on_edge;
            let distance_sq = offset.magnitude_squared();
            if distance_sq >= capsule.radius * capsule.radius {
                continue;
            }
            let depth = capsule.radius - distance_sq.sqrt();
            let contact_normal = utils::try_normalize(offset).unwrap_or(normal);
            if best.map_or(true, |contact| depth > contact.depth) {
                best = Some(Contact {
                    normal: contact_normal,
                    depth,
                });
            }
        }
        best
    }
}
