//! Dynamic bodies
//!
//! The moving half of the world: pooled projectile spheres and the player
//! capsule. Shapes and radii are fixed at creation; only positions and
//! velocities change.

use std::fmt;

use crate::foundation::math::{utils, Vec3};
use crate::physics::collision::{BoundingSphere, Capsule};

/// Stable index of a body in the [`ColliderRegistry`](super::ColliderRegistry)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct BodyId(usize);

impl BodyId {
    /// Wrap a registry slot index
    pub const fn new(index: usize) -> Self {
        Self(index)
    }

    /// Registry slot index
    pub const fn index(self) -> usize {
        self.0
    }
}

impl fmt::Display for BodyId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "body#{}", self.0)
    }
}

/// A moving sphere
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SphereBody {
    /// World-space center
    pub center: Vec3,
    /// Radius (positive)
    pub radius: f32,
    /// Linear velocity
    pub velocity: Vec3,
}

impl SphereBody {
    /// A sphere at rest
    pub fn new(center: Vec3, radius: f32) -> Self {
        Self {
            center,
            radius,
            velocity: Vec3::zeros(),
        }
    }

    /// Collision shape at the current position
    pub fn shape(&self) -> BoundingSphere {
        BoundingSphere::new(self.center, self.radius)
    }

    /// True if position and velocity are both finite
    pub fn is_finite(&self) -> bool {
        utils::is_finite(&self.center) && utils::is_finite(&self.velocity)
    }
}

/// A moving capsule
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CapsuleBody {
    /// Collision shape at the current position
    pub capsule: Capsule,
    /// Linear velocity
    pub velocity: Vec3,
}

impl CapsuleBody {
    /// A capsule at rest
    pub fn new(capsule: Capsule) -> Self {
        Self {
            capsule,
            velocity: Vec3::zeros(),
        }
    }

    /// True if both segment ends and the velocity are finite
    pub fn is_finite(&self) -> bool {
        utils::is_finite(&self.capsule.start)
            && utils::is_finite(&self.capsule.end)
            && utils::is_finite(&self.velocity)
    }
}

/// Kind of collider stored in a registry slot
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum DynamicBody {
    /// Projectile sphere
    Sphere(SphereBody),
    /// Player capsule
    Capsule(CapsuleBody),
}

impl DynamicBody {
    /// Current velocity
    pub fn velocity(&self) -> Vec3 {
        match self {
            DynamicBody::Sphere(sphere) => sphere.velocity,
            DynamicBody::Capsule(capsule) => capsule.velocity,
        }
    }

    /// Sphere center or capsule midpoint
    pub fn position(&self) -> Vec3 {
        match self {
            DynamicBody::Sphere(sphere) => sphere.center,
            DynamicBody::Capsule(capsule) => capsule.capsule.center(),
        }
    }

    /// Collision radius
    pub fn radius(&self) -> f32 {
        match self {
            DynamicBody::Sphere(sphere) => sphere.radius,
            DynamicBody::Capsule(capsule) => capsule.capsule.radius,
        }
    }

    /// Borrow as a sphere
    pub fn as_sphere(&self) -> Option<&SphereBody> {
        match self {
            DynamicBody::Sphere(sphere) => Some(sphere),
            DynamicBody::Capsule(_) => None,
        }
    }

    /// Mutably borrow as a sphere
    pub fn as_sphere_mut(&mut self) -> Option<&mut SphereBody> {
        match self {
            DynamicBody::Sphere(sphere) => Some(sphere),
            DynamicBody::Capsule(_) => None,
        }
    }

    /// Borrow as a capsule
    pub fn as_capsule(&self) -> Option<&CapsuleBody> {
        match self {
            DynamicBody::Capsule(capsule) => Some(capsule),
            DynamicBody::Sphere(_) => None,
        }
    }

    /// Mutably borrow as a capsule
    pub fn as_capsule_mut(&mut self) -> Option<&mut CapsuleBody> {
        match self {
            DynamicBody::Capsule(capsule) => Some(capsule),
            DynamicBody::Sphere(_) => None,
        }
    }
}

impl From<SphereBody> for DynamicBody {
    fn from(sphere: SphereBody) -> Self {
        DynamicBody::Sphere(sphere)
    }
}

impl From<CapsuleBody> for DynamicBody {
    fn from(capsule: CapsuleBody) -> Self {
        DynamicBody::Capsule(capsule)
    }
}
