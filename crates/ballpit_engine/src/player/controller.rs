//! First-person capsule controller
//!
//! Turns held keys and the camera orientation into player velocity, steps
//! the capsule against the level and throws balls from the projectile pool.

use crate::core::SimulationConfig;
use crate::foundation::math::{Quat, Vec3};
use crate::input::{InputState, MovementKeys};
use crate::physics::integrator::damping_factor;
use crate::physics::{BodyId, Capsule, CapsuleBody, ColliderRegistry, SphereBody};
use crate::scene::CameraPose;
use crate::spatial::StaticCollider;

/// Player capsule state and tuning
#[derive(Debug, Clone)]
pub struct PlayerController {
    body: CapsuleBody,
    on_floor: bool,
    throw_count: u64,
    config: SimulationConfig,
}

impl PlayerController {
    /// Player standing at the configured spawn pose
    pub fn new(config: &SimulationConfig) -> Self {
        Self {
            body: CapsuleBody::new(Self::spawn_capsule(config)),
            on_floor: false,
            throw_count: 0,
            config: config.clone(),
        }
    }

    fn spawn_capsule(config: &SimulationConfig) -> Capsule {
        Capsule::new(config.spawn_start, config.spawn_end, config.player_radius)
    }

    /// Current capsule body
    pub fn body(&self) -> &CapsuleBody {
        &self.body
    }

    /// Replace the capsule body, e.g. after the narrow phase changed its velocity
    pub fn set_body(&mut self, body: CapsuleBody) {
        self.body = body;
    }

    /// Current capsule shape
    pub fn capsule(&self) -> &Capsule {
        &self.body.capsule
    }

    /// Current velocity
    pub fn velocity(&self) -> Vec3 {
        self.body.velocity
    }

    /// Set the velocity directly
    pub fn set_velocity(&mut self, velocity: Vec3) {
        self.body.velocity = velocity;
    }

    /// Whether the last collision pass found an upward-facing surface
    pub fn on_floor(&self) -> bool {
        self.on_floor
    }

    /// Number of balls thrown so far
    pub fn throw_count(&self) -> u64 {
        self.throw_count
    }

    /// Apply held keys for one frame
    ///
    /// Acceleration is stronger on the floor than in the air. Jumping
    /// replaces the vertical velocity and only works from the floor.
    pub fn controls(&mut self, input: &InputState, camera: &CameraPose, frame_delta: f32) {
        let acceleration = if self.on_floor {
            self.config.ground_acceleration
        } else {
            self.config.air_acceleration
        };
        let speed = frame_delta * acceleration;

        let forward = camera.forward();
        let side = camera.side();
        let velocity = &mut self.body.velocity;

        if input.is_held(MovementKeys::FORWARD) {
            *velocity += forward * speed;
        }
        if input.is_held(MovementKeys::BACKWARD) {
            *velocity -= forward * speed;
        }
        if input.is_held(MovementKeys::LEFT) {
            *velocity -= side * speed;
        }
        if input.is_held(MovementKeys::RIGHT) {
            *velocity += side * speed;
        }

        if self.on_floor && input.is_held(MovementKeys::JUMP) {
            velocity.y = self.config.jump_velocity;
        }
    }

    /// Push the capsule out of the level and update the floor flag
    ///
    /// Against walls and ceilings the velocity into the surface is removed;
    /// on the floor it is kept so that gravity does not accumulate.
    pub fn collide<S>(&mut self, statics: &S)
    where
        S: StaticCollider + ?Sized,
    {
        self.on_floor = false;

        let Some(contact) = statics.capsule_intersect(&self.body.capsule) else {
            return;
        };

        self.on_floor = contact.normal.y > 0.0;
        if !self.on_floor {
            let into_surface = contact.normal.dot(&self.body.velocity);
            self.body.velocity -= contact.normal * into_surface;
        }
        self.body.capsule.translate(contact.correction());
    }

    /// Advance the player by one sub-step and move the camera to the eye
    pub fn update<S>(&mut self, statics: &S, dt: f32, camera: &mut CameraPose)
    where
        S: StaticCollider + ?Sized,
    {
        let last_finite = self.body;

        let mut damping = damping_factor(self.config.player_damping, dt);
        if !self.on_floor {
            self.body.velocity.y -= self.config.gravity * dt;
            damping *= self.config.air_damping_factor;
        }
        self.body.velocity += self.body.velocity * damping;

        let offset = self.body.velocity * dt;
        self.body.capsule.translate(offset);

        self.collide(statics);

        if !self.body.is_finite() {
            log::warn!(
                "Player left the finite range (capsule {:?}, velocity {:?}); restoring last finite position",
                self.body.capsule,
                self.body.velocity
            );
            let restored = CapsuleBody::new(last_finite.capsule);
            self.body = if restored.is_finite() {
                restored
            } else {
                CapsuleBody::new(Self::spawn_capsule(&self.config))
            };
        }

        camera.position = self.body.capsule.end;
    }

    /// Throw the next ball of the pool along the view direction
    ///
    /// The pool slot is `throw_count mod ball_count`, so once every ball has
    /// been thrown the oldest one is picked up again.
    pub fn throw_ball(&mut self, registry: &mut ColliderRegistry, camera: &CameraPose) -> Option<BodyId> {
        let id = registry.ball_id(self.throw_count)?;
        let direction = camera.direction();

        let center = self.body.capsule.end + direction * (self.body.capsule.radius * self.config.throw_offset);
        let velocity = direction * self.config.throw_speed + self.body.velocity * self.config.throw_momentum;

        registry.insert(
            id,
            SphereBody {
                center,
                radius: self.config.ball_radius,
                velocity,
            },
        );
        self.throw_count += 1;

        log::debug!("Threw {} (throw #{}) at {:?}", id, self.throw_count, center);
        Some(id)
    }

    /// Put the player back at the spawn pose, at rest, looking down -Z
    pub fn respawn(&mut self, camera: &mut CameraPose) {
        self.body = CapsuleBody::new(Self::spawn_capsule(&self.config));
        self.on_floor = false;
        camera.position = self.body.capsule.end;
        camera.rotation = Quat::identity();
    }

    /// Respawn when the camera has fallen below the kill height
    pub fn teleport_if_out_of_bounds(&mut self, camera: &mut CameraPose) -> bool {
        if camera.position.y > self.config.out_of_bounds_y {
            return false;
        }
        log::debug!("Player fell out of the world at {:?}; respawning", camera.position);
        self.respawn(camera);
        true
    }
}
