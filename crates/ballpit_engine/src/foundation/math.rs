//! Math utilities and types
//!
//! Provides the value-typed vector and rotation aliases used by the
//! collision and dynamics code. Everything is `Copy`; no function in the
//! engine writes through a shared scratch vector.

pub use nalgebra::{UnitQuaternion, Vector3};

/// 3D vector type
pub type Vec3 = Vector3<f32>;

/// Unit quaternion type for rotations
pub type Quat = UnitQuaternion<f32>;

/// Mathematical constants
pub mod constants {
    /// Lengths below this are treated as zero when normalizing
    pub const NORMALIZE_EPSILON: f32 = 1e-6;

    /// World up axis
    pub const WORLD_UP: [f32; 3] = [0.0, 1.0, 0.0];
}

/// Small vector helpers shared by the collision code
pub mod utils {
    use super::{constants::NORMALIZE_EPSILON, Vec3};

    /// Normalize `v`, returning `None` for (near) zero-length vectors
    pub fn try_normalize(v: Vec3) -> Option<Vec3> {
        v.try_normalize(NORMALIZE_EPSILON)
    }

    /// True if every component is finite
    pub fn is_finite(v: &Vec3) -> bool {
        v.x.is_finite() && v.y.is_finite() && v.z.is_finite()
    }

    /// Component-wise minimum
    pub fn min(a: Vec3, b: Vec3) -> Vec3 {
        a.inf(&b)
    }

    /// Component-wise maximum
    pub fn max(a: Vec3, b: Vec3) -> Vec3 {
        a.sup(&b)
    }

    /// Closest point to `point` on the segment `a`-`b`
    pub fn closest_point_on_segment(a: Vec3, b: Vec3, point: Vec3) -> Vec3 {
        let ab = b - a;
        let length_sq = ab.magnitude_squared();
        if length_sq <= f32::EPSILON {
            return a;
        }
        let t = ((point - a).dot(&ab) / length_sq).clamp(0.0, 1.0);
        a + ab * t
    }

    /// Closest points between segments `p1`-`q1` and `p2`-`q2`
    ///
    /// Returns `(point_on_first, point_on_second)`. Handles parallel and
    /// degenerate (zero-length) segments. After Ericson, *Real-Time
    /// Collision Detection* 5.1.9.
    pub fn closest_points_between_segments(p1: Vec3, q1: Vec3, p2: Vec3, q2: Vec3) -> (Vec3, Vec3) {
        let d1 = q1 - p1;
        let d2 = q2 - p2;
        let r = p1 - p2;
        let a = d1.magnitude_squared();
        let e = d2.magnitude_squared();
        let f = d2.dot(&r);

        if a <= f32::EPSILON && e <= f32::EPSILON {
            return (p1, p2);
        }

        let (s, t) = if a <= f32::EPSILON {
            (0.0, (f / e).clamp(0.0, 1.0))
        } else {
            let c = d1.dot(&r);
            if e <= f32::EPSILON {
                ((-c / a).clamp(0.0, 1.0), 0.0)
            } else {
                let b = d1.dot(&d2);
                let denom = a * e - b * b;
                let mut s = if denom > f32::EPSILON {
                    ((b * f - c * e) / denom).clamp(0.0, 1.0)
                } else {
                    0.0
                };
                let mut t = (b * s + f) / e;
                if t < 0.0 {
                    t = 0.0;
                    s = (-c / a).clamp(0.0, 1.0);
                } else if t > 1.0 {
                    t = 1.0;
                    s = ((b - c) / a).clamp(0.0, 1.0);
                }
                (s, t)
            }
        };

        (p1 + d1 * s, p2 + d2 * t)
    }
}
