//! Abstract static-geometry query interface
//!
//! Dynamic bodies only ever ask the level two questions: how far must this
//! sphere move to leave the geometry, and how far must this capsule move.
//! The integrator and the player controller talk to the level through this
//! trait, so a flat test plane can stand in for a full octree.

use super::Octree;
use crate::physics::collision::{BoundingSphere, Capsule, Contact};

/// Read-only collision queries against static level geometry
///
/// Implementations must be safe to query from several threads at once.
pub trait StaticCollider: Send + Sync {
    /// Total push-out for a sphere, `None` when it touches nothing
    fn sphere_intersect(&self, sphere: &BoundingSphere) -> Option<Contact>;

    /// Total push-out for a capsule, `None` when it touches nothing
    fn capsule_intersect(&self, capsule: &Capsule) -> Option<Contact>;
}

impl StaticCollider for Octree {
    fn sphere_intersect(&self, sphere: &BoundingSphere) -> Option<Contact> {
        Octree::sphere_intersect(self, sphere)
    }

    fn capsule_intersect(&self, capsule: &Capsule) -> Option<Contact> {
        Octree::capsule_intersect(self, capsule)
    }
}
