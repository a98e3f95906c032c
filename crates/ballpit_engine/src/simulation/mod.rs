//! Frame driver
//!
//! [`Simulation`] owns the level, the collider registry and the player, and
//! advances all of them by one rendered frame per [`Simulation::tick`]:
//!
//! 1. pending throws
//! 2. every projectile in id order, each through all of its fixed sub-steps
//! 3. player controls with the unclamped frame delta, then the player's
//!    sub-steps
//! 4. out-of-bounds respawn
//! 5. transforms published for the renderer

mod transform;

pub use transform::BodyTransform;

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use thiserror::Error;

use crate::assets::{self, LevelError};
use crate::core::{ApplicationConfig, ConfigError, SimulationConfig};
use crate::foundation::math::{utils, Vec3};
use crate::foundation::time::{FrameClock, FrameStep};
use crate::input::InputState;
use crate::physics::integrator;
use crate::physics::{BodyId, Capsule, CapsuleBody, ColliderRegistry, SphereBody};
use crate::player::PlayerController;
use crate::scene::{CameraPose, StaticGeometry};
use crate::spatial::{Octree, OctreeConfig, OctreeError, StaticCollider};

/// Errors raised while setting up or driving a simulation
#[derive(Error, Debug)]
pub enum SimulationError {
    /// Rejected configuration
    #[error("configuration error: {0}")]
    Config(#[from] ConfigError),

    /// The level could not be loaded
    #[error("level error: {0}")]
    Level(#[from] LevelError),

    /// The level geometry could not be indexed
    #[error("octree error: {0}")]
    Octree(#[from] OctreeError),

    /// A caller supplied a NaN or infinite body state
    #[error("non-finite state for {0}")]
    NonFinite(BodyId),

    /// The id does not name a projectile slot
    #[error("{0} is not a projectile slot")]
    UnknownBody(BodyId),
}

/// The running world: level, projectiles, player
pub struct Simulation<S = Octree> {
    config: SimulationConfig,
    statics: S,
    registry: ColliderRegistry,
    player: PlayerController,
    clock: FrameClock,
    transforms: Vec<BodyTransform>,
    throws_consumed: u64,
}

impl Simulation<Octree> {
    /// Load the configured level and start a simulation on it
    pub fn from_config(config: &ApplicationConfig) -> Result<Self, SimulationError> {
        config.validate()?;
        let octree = assets::load_level(&config.level, config.octree.clone())?;
        Self::new(config.simulation.clone(), octree, config.engine.rng_seed)
    }

    /// Index `geometry` and start a simulation on it
    pub fn from_geometry(
        geometry: &StaticGeometry,
        simulation: SimulationConfig,
        octree: OctreeConfig,
        rng_seed: Option<u64>,
    ) -> Result<Self, SimulationError> {
        octree.validate()?;
        let octree = Octree::build(geometry, octree)?;
        Self::new(simulation, octree, rng_seed)
    }
}

impl<S: StaticCollider> Simulation<S> {
    /// Start a simulation against any static collider
    ///
    /// The projectile pool is scattered over the spawn area at rest and the
    /// player stands at the spawn pose.
    pub fn new(config: SimulationConfig, statics: S, rng_seed: Option<u64>) -> Result<Self, SimulationError> {
        config.validate()?;

        let mut rng = match rng_seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };

        let mut registry = ColliderRegistry::new(config.ball_count);
        let extent = config.ball_spawn_extent;
        for id in registry.ball_ids() {
            let center = Vec3::new(
                rng.gen_range(-extent..=extent),
                config.ball_spawn_height,
                rng.gen_range(-extent..=extent),
            );
            registry.insert(id, SphereBody::new(center, config.ball_radius));
        }

        let player = PlayerController::new(&config);
        registry.insert(registry.player_id(), *player.body());

        let mut simulation = Self {
            clock: FrameClock::new(config.max_frame_delta, config.substeps),
            transforms: Vec::with_capacity(registry.len()),
            config,
            statics,
            registry,
            player,
            throws_consumed: 0,
        };
        simulation.publish();

        log::info!(
            "Simulation ready: {} balls, {} sub-steps per frame",
            simulation.config.ball_count,
            simulation.config.substeps
        );
        Ok(simulation)
    }

    /// Advance one rendered frame
    ///
    /// The sub-step size comes from `frame_delta` clamped to the configured
    /// maximum; player acceleration uses the raw delta. The camera position
    /// follows the player's eye; its rotation is reset on respawn.
    pub fn tick(&mut self, frame_delta: f32, input: &InputState, camera: &mut CameraPose) -> FrameStep {
        let step = self.clock.advance(frame_delta);
        self.process_throws(input, camera);

        // Each projectile runs its whole frame before the next one starts
        for index in 0..self.registry.ball_count() {
            for _ in 0..step.substeps {
                integrator::step_sphere(
                    &mut self.registry,
                    BodyId::new(index),
                    &self.statics,
                    &self.config,
                    step.substep_delta,
                );
            }
        }

        // Balls may have pushed the player
        let player_id = self.registry.player_id();
        if let Some(body) = self.registry.capsule(player_id) {
            self.player.set_body(*body);
        }

        self.player.controls(input, camera, step.frame_delta);
        for _ in 0..step.substeps {
            self.player.update(&self.statics, step.substep_delta, camera);
        }
        self.registry.insert(player_id, *self.player.body());

        if self.player.teleport_if_out_of_bounds(camera) {
            self.registry.insert(player_id, *self.player.body());
        }

        self.publish();
        log::trace!(
            "Frame {}: dt {:.4} -> {} x {:.5}",
            self.clock.frame_count(),
            step.frame_delta,
            step.substeps,
            step.substep_delta
        );
        step
    }

    fn process_throws(&mut self, input: &InputState, camera: &CameraPose) {
        let requested = input.throw_requests();
        if requested < self.throws_consumed {
            // The host replaced its input state; start counting again
            self.throws_consumed = requested;
            return;
        }

        while self.throws_consumed < requested {
            self.player.throw_ball(&mut self.registry, camera);
            self.throws_consumed += 1;
        }
    }

    fn publish(&mut self) {
        self.transforms.clear();
        self.transforms
            .extend(self.registry.slots().iter().map(|slot| BodyTransform::from_slot(slot.as_ref())));
    }

    /// Place a projectile directly, bypassing the throw logic
    pub fn place_ball(&mut self, id: BodyId, center: Vec3, velocity: Vec3) -> Result<(), SimulationError> {
        if id.index() >= self.registry.ball_count() {
            return Err(SimulationError::UnknownBody(id));
        }
        if !utils::is_finite(&center) || !utils::is_finite(&velocity) {
            return Err(SimulationError::NonFinite(id));
        }

        self.registry.insert(
            id,
            SphereBody {
                center,
                radius: self.config.ball_radius,
                velocity,
            },
        );
        self.publish();
        Ok(())
    }

    /// Move the player capsule directly, bypassing the controls
    pub fn place_player(&mut self, capsule: Capsule, velocity: Vec3) -> Result<(), SimulationError> {
        let body = CapsuleBody { capsule, velocity };
        let player_id = self.registry.player_id();
        if !body.is_finite() {
            return Err(SimulationError::NonFinite(player_id));
        }

        self.player.set_body(body);
        self.registry.insert(player_id, body);
        self.publish();
        Ok(())
    }

    /// Put the player back at the spawn pose
    pub fn respawn_player(&mut self, camera: &mut CameraPose) {
        self.player.respawn(camera);
        self.registry.insert(self.registry.player_id(), *self.player.body());
        self.publish();
    }

    /// Transforms of every registry slot as of the last tick
    pub fn transforms(&self) -> &[BodyTransform] {
        &self.transforms
    }

    /// Transforms as raw bytes for an instance buffer upload
    pub fn as_bytes(&self) -> &[u8] {
        bytemuck::cast_slice(&self.transforms)
    }

    /// The collider registry
    pub fn registry(&self) -> &ColliderRegistry {
        &self.registry
    }

    /// The player controller
    pub fn player(&self) -> &PlayerController {
        &self.player
    }

    /// The static level
    pub fn statics(&self) -> &S {
        &self.statics
    }

    /// The frame clock
    pub fn clock(&self) -> &FrameClock {
        &self.clock
    }

    /// The simulation tunables
    pub fn config(&self) -> &SimulationConfig {
        &self.config
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::spatial::test_support::GroundPlane;
    use approx::assert_relative_eq;

    fn small_config() -> SimulationConfig {
        SimulationConfig::default().with_ball_count(4)
    }

    #[test]
    fn test_initial_scatter_is_seeded() {
        let a = Simulation::new(small_config(), GroundPlane { height: 0.0 }, Some(7)).unwrap();
        let b = Simulation::new(small_config(), GroundPlane { height: 0.0 }, Some(7)).unwrap();
        assert_eq!(a.transforms(), b.transforms());

        for transform in &a.transforms()[..4] {
            assert_eq!(transform.kind, BodyTransform::SPHERE);
            assert_eq!(transform.position[1], 20.0);
            assert!(transform.position[0].abs() <= 25.0);
            assert!(transform.position[2].abs() <= 25.0);
        }
        assert_eq!(a.transforms()[4].kind, BodyTransform::CAPSULE);
        assert_eq!(a.as_bytes().len(), 5 * 20);
    }

    #[test]
    fn test_rejects_invalid_config() {
        let result = Simulation::new(small_config().with_ball_count(0), GroundPlane { height: 0.0 }, None);
        assert!(matches!(result, Err(SimulationError::Config(_))));
    }

    #[test]
    fn test_place_ball_validation() {
        let mut sim = Simulation::new(small_config(), GroundPlane { height: 0.0 }, Some(1)).unwrap();
        assert!(matches!(
            sim.place_ball(BodyId::new(4), Vec3::zeros(), Vec3::zeros()),
            Err(SimulationError::UnknownBody(_))
        ));
        assert!(matches!(
            sim.place_ball(BodyId::new(0), Vec3::new(f32::NAN, 0.0, 0.0), Vec3::zeros()),
            Err(SimulationError::NonFinite(_))
        ));
        sim.place_ball(BodyId::new(0), Vec3::new(1.0, 1.0, 1.0), Vec3::zeros()).unwrap();
        assert_eq!(sim.transforms()[0].position, [1.0, 1.0, 1.0]);
    }

    #[test]
    fn test_tick_moves_camera_to_eye() {
        let mut sim = Simulation::new(small_config(), GroundPlane { height: 0.0 }, Some(3)).unwrap();
        let mut camera = CameraPose::default();
        let step = sim.tick(1.0 / 60.0, &InputState::new(), &mut camera);

        assert_eq!(step.substeps, 5);
        assert_relative_eq!(camera.position, sim.player().capsule().end);
        assert!(camera.position.y < 11.0);
    }

    #[test]
    fn test_slow_frame_accelerates_player_with_raw_delta() {
        let config = SimulationConfig::default().with_ball_count(1);
        let mut sim = Simulation::new(config, GroundPlane { height: -1000.0 }, Some(3)).unwrap();
        sim.place_ball(BodyId::new(0), Vec3::new(200.0, 0.0, 200.0), Vec3::zeros()).unwrap();
        let mut camera = CameraPose::default();
        let mut input = InputState::new();
        input.set_key("KeyW", true);

        let step = sim.tick(0.2, &input, &mut camera);
        assert_relative_eq!(step.substep_delta, 0.01);

        // Airborne: 8 units/s^2 over the whole 0.2 s, then five damped sub-steps
        let damping = ((-4.0f32 * 0.01).exp() - 1.0) * 0.1;
        let expected = -0.2 * 8.0 * (1.0 + damping).powi(5);
        assert_relative_eq!(sim.player().velocity().z, expected, epsilon = 1e-5);
    }

    #[test]
    fn test_each_ball_finishes_its_frame_before_the_next() {
        let config = SimulationConfig::default().with_ball_count(2);
        let mut sim = Simulation::new(config, GroundPlane { height: -1000.0 }, Some(3)).unwrap();
        sim.place_ball(BodyId::new(0), Vec3::new(0.0, 5.0, 0.0), Vec3::zeros()).unwrap();
        sim.place_ball(BodyId::new(1), Vec3::new(0.5, 5.0, 0.0), Vec3::new(-10.0, 0.0, 0.0))
            .unwrap();
        let mut camera = CameraPose::default();

        sim.tick(0.05, &InputState::new(), &mut camera);

        // Ball 1 only reaches ball 0 after ball 0 has used up its sub-steps,
        // so ball 0 is shifted by the positional split but never flies off
        let struck = sim.registry().sphere(BodyId::new(0)).unwrap();
        assert!(struck.center.x < 0.0, "ball 0 was not hit: {:?}", struck.center);
        assert!(struck.center.x > -0.2, "ball 0 moved after the hit: {:?}", struck.center);

        let striker = sim.registry().sphere(BodyId::new(1)).unwrap();
        assert!(striker.center.x < 0.5);
    }

    #[test]
    fn test_throws_are_counted_once() {
        let mut sim = Simulation::new(small_config(), GroundPlane { height: -1000.0 }, Some(3)).unwrap();
        let mut camera = CameraPose::default();
        let mut input = InputState::new();
        input.press_pointer();

        sim.tick(0.016, &input, &mut camera);
        sim.tick(0.016, &input, &mut camera);
        assert_eq!(sim.player().throw_count(), 1);

        let fresh = InputState::new();
        sim.tick(0.016, &fresh, &mut camera);
        input = fresh;
        input.press_pointer();
        sim.tick(0.016, &input, &mut camera);
        assert_eq!(sim.player().throw_count(), 2);
    }
}
