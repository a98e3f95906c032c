//! Narrow-phase resolution between dynamic bodies
//!
//! Pairs exchange the velocity components along the contact normal and are
//! pushed apart along it. Bodies are processed one at a time against every
//! other occupied slot, and later corrections overwrite earlier ones.

use super::body::{BodyId, CapsuleBody, DynamicBody, SphereBody};
use super::registry::ColliderRegistry;
use crate::foundation::math::utils;

/// Resolve the sphere in slot `id` against every other occupied slot
///
/// Returns the number of contacts resolved. Vacant slots and non-sphere
/// bodies in `id` are skipped.
pub fn resolve_sphere_collisions(registry: &mut ColliderRegistry, id: BodyId) -> usize {
    if registry.sphere(id).is_none() {
        return 0;
    }

    let mut contacts = 0;
    for other in 0..registry.len() {
        let Some((body, other_body)) = registry.pair_mut(id, BodyId::new(other)) else {
            continue;
        };
        let DynamicBody::Sphere(sphere) = body else {
            continue;
        };

        let resolved = match other_body {
            DynamicBody::Sphere(other_sphere) => sphere_sphere(sphere, other_sphere),
            DynamicBody::Capsule(capsule) => sphere_capsule(sphere, capsule) > 0,
        };
        if resolved {
            contacts += 1;
        }
    }
    contacts
}

/// Resolve two overlapping spheres
///
/// Swaps their velocity components along the line of centers and moves each
/// half the overlap apart. Returns `false` when they do not overlap or their
/// centers coincide.
pub fn sphere_sphere(sphere: &mut SphereBody, other: &mut SphereBody) -> bool {
    let radius = sphere.radius + other.radius;
    let offset = sphere.center - other.center;
    let distance_sq = offset.magnitude_squared();
    if distance_sq >= radius * radius {
        return false;
    }
    let Some(normal) = utils::try_normalize(offset) else {
        return false;
    };

    let impulse1 = normal * normal.dot(&sphere.velocity);
    let impulse2 = normal * normal.dot(&other.velocity);
    sphere.velocity += impulse2 - impulse1;
    other.velocity += impulse1 - impulse2;

    let correction = (radius - distance_sq.sqrt()) * 0.5;
    sphere.center += normal * correction;
    other.center -= normal * correction;
    true
}

/// Resolve a sphere against a capsule, sampled at its start, end and midpoint
///
/// Each sample point is treated as a sphere of the capsule's radius. Only the
/// sphere is moved; the capsule keeps its position and only its velocity
/// changes. Returns the number of sample points that were in contact.
pub fn sphere_capsule(sphere: &mut SphereBody, capsule: &mut CapsuleBody) -> usize {
    let radius = sphere.radius + capsule.capsule.radius;
    let radius_sq = radius * radius;
    let mut contacts = 0;

    for point in capsule.capsule.sample_points() {
        let offset = point - sphere.center;
        let distance_sq = offset.magnitude_squared();
        if distance_sq >= radius_sq {
            continue;
        }
        let Some(normal) = utils::try_normalize(offset) else {
            continue;
        };

        let impulse1 = normal * normal.dot(&capsule.velocity);
        let impulse2 = normal * normal.dot(&sphere.velocity);
        capsule.velocity += impulse2 - impulse1;
        sphere.velocity += impulse1 - impulse2;

        let correction = (radius - distance_sq.sqrt()) * 0.5;
        sphere.center -= normal * correction;
        contacts += 1;
    }
    contacts
}
