//! Fixed sub-step integration for projectile spheres
//!
//! One call advances one sphere by one sub-step: move, resolve against the
//! level, apply gravity or bounce, damp, then resolve against every other
//! dynamic body.

use super::body::BodyId;
use super::narrow_phase;
use super::registry::ColliderRegistry;
use crate::core::SimulationConfig;
use crate::foundation::math::{utils, Vec3};
use crate::spatial::StaticCollider;

/// Velocity multiplier increment for exponential damping over `dt`
///
/// Adding `velocity * damping_factor(rate, dt)` to a velocity scales it by
/// `exp(-rate * dt)`. The result lies in `(-1, 0]` for non-negative inputs.
pub fn damping_factor(rate: f32, dt: f32) -> f32 {
    (-rate * dt).exp() - 1.0
}

/// Apply exponential damping to a velocity in place
pub fn apply_damping(velocity: &mut Vec3, rate: f32, dt: f32) {
    let damping = damping_factor(rate, dt);
    *velocity += *velocity * damping;
}

/// Restore a body whose state became NaN or infinite
///
/// The velocity is zeroed and the position falls back to `last_finite`.
/// Returns `true` if a correction was needed.
pub fn guard_finite(id: BodyId, position: &mut Vec3, velocity: &mut Vec3, last_finite: Vec3) -> bool {
    if utils::is_finite(position) && utils::is_finite(velocity) {
        return false;
    }

    log::warn!(
        "{} left the finite range (position {:?}, velocity {:?}); restoring {:?}",
        id,
        position,
        velocity,
        last_finite
    );
    *velocity = Vec3::zeros();
    *position = last_finite;
    true
}

/// Advance the projectile in slot `id` by one sub-step of `dt` seconds
///
/// Vacant slots and non-sphere bodies are left untouched.
pub fn step_sphere<S>(
    registry: &mut ColliderRegistry,
    id: BodyId,
    statics: &S,
    config: &SimulationConfig,
    dt: f32,
) where
    S: StaticCollider + ?Sized,
{
    registry.record_finite(id);
    let last_finite = registry.last_finite(id).unwrap_or_else(Vec3::zeros);
    let Some(sphere) = registry.sphere_mut(id) else {
        return;
    };

    sphere.center += sphere.velocity * dt;

    match statics.sphere_intersect(&sphere.shape()) {
        Some(contact) => {
            let normal_speed = contact.normal.dot(&sphere.velocity);
            sphere.velocity += contact.normal * (-normal_speed * config.restitution);
            sphere.center += contact.correction();
        }
        None => sphere.velocity.y -= config.gravity * dt,
    }

    apply_damping(&mut sphere.velocity, config.ball_damping, dt);

    narrow_phase::resolve_sphere_collisions(registry, id);

    if let Some(sphere) = registry.sphere_mut(id) {
        guard_finite(id, &mut sphere.center, &mut sphere.velocity, last_finite);
    }
    registry.record_finite(id);
}
