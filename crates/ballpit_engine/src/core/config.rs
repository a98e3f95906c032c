//! # Unified Configuration System
//!
//! All tunables of the simulation live here, grouped by subsystem. Every
//! struct derives serde with `#[serde(default)]` so a config file only needs
//! the values it changes.
//!
//! ## Configuration Categories
//!
//! - **Engine Config**: logging and reproducibility
//! - **Simulation Config**: physics constants, player tuning, projectile pool
//! - **Octree Config**: static spatial index subdivision limits
//! - **Level Config**: where the static level geometry comes from

use serde::{Serialize, Deserialize};

use crate::foundation::math::{utils, Vec3};
use crate::spatial::OctreeConfig;

pub use crate::config::{Config, ConfigError};

/// # Engine Configuration
///
/// Core engine behavior that is not physics: logging and seeding.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// Default log filter handed to `env_logger` (overridden by `RUST_LOG`)
    pub log_level: String,
    /// Seed for the initial ball scatter; `None` draws from OS entropy
    pub rng_seed: Option<u64>,
}

impl EngineConfig {
    /// Create a new engine configuration
    pub fn new() -> Self {
        Self {
            log_level: "info".to_string(),
            rng_seed: None,
        }
    }

    /// Set log level
    pub fn with_log_level(mut self, level: impl Into<String>) -> Self {
        self.log_level = level.into();
        self
    }

    /// Set a fixed seed for reproducible runs
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.rng_seed = Some(seed);
        self
    }
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self::new()
    }
}

/// # Simulation Configuration
///
/// Physics constants, player tuning and the projectile pool. Units are
/// world units (meters) and seconds.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SimulationConfig {
    /// Number of pooled projectile spheres
    pub ball_count: usize,
    /// Radius of every projectile sphere
    pub ball_radius: f32,
    /// Downward acceleration (positive number)
    pub gravity: f32,
    /// Fixed sub-steps per rendered frame
    pub substeps: u32,
    /// Longest frame delta that is simulated; longer frames are clamped
    pub max_frame_delta: f32,
    /// Bounce multiplier applied to the normal velocity on static contact
    pub restitution: f32,
    /// Exponential damping rate for projectiles (1/s)
    pub ball_damping: f32,
    /// Exponential damping rate for the player (1/s)
    pub player_damping: f32,
    /// Fraction of the player damping applied while airborne
    pub air_damping_factor: f32,
    /// Player acceleration while on the floor (units/s²)
    pub ground_acceleration: f32,
    /// Player acceleration while airborne (units/s²)
    pub air_acceleration: f32,
    /// Vertical velocity set when jumping
    pub jump_velocity: f32,
    /// Launch speed of a thrown ball
    pub throw_speed: f32,
    /// How much of the player's velocity a thrown ball inherits
    pub throw_momentum: f32,
    /// Spawn distance in front of the eye, in player radii
    pub throw_offset: f32,
    /// Player capsule radius
    pub player_radius: f32,
    /// Player capsule bottom at spawn / after an out-of-bounds reset
    pub spawn_start: Vec3,
    /// Player capsule top (eye) at spawn / after an out-of-bounds reset
    pub spawn_end: Vec3,
    /// Camera height at or below which the player is teleported back
    pub out_of_bounds_y: f32,
    /// Initial balls are scattered over x, z in `[-extent, extent]`
    pub ball_spawn_extent: f32,
    /// Initial height of scattered balls
    pub ball_spawn_height: f32,
}

impl SimulationConfig {
    /// Set the projectile pool size
    pub fn with_ball_count(mut self, ball_count: usize) -> Self {
        self.ball_count = ball_count;
        self
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.ball_count == 0 {
            return Err(ConfigError::Invalid("ball_count must be at least 1".to_string()));
        }
        if self.substeps == 0 {
            return Err(ConfigError::Invalid("substeps must be at least 1".to_string()));
        }

        let scalars = [
            ("ball_radius", self.ball_radius),
            ("gravity", self.gravity),
            ("max_frame_delta", self.max_frame_delta),
            ("restitution", self.restitution),
            ("ball_damping", self.ball_damping),
            ("player_damping", self.player_damping),
            ("air_damping_factor", self.air_damping_factor),
            ("ground_acceleration", self.ground_acceleration),
            ("air_acceleration", self.air_acceleration),
            ("jump_velocity", self.jump_velocity),
            ("throw_speed", self.throw_speed),
            ("throw_momentum", self.throw_momentum),
            ("throw_offset", self.throw_offset),
            ("player_radius", self.player_radius),
            ("out_of_bounds_y", self.out_of_bounds_y),
            ("ball_spawn_extent", self.ball_spawn_extent),
            ("ball_spawn_height", self.ball_spawn_height),
        ];
        if let Some((name, _)) = scalars.iter().find(|(_, value)| !value.is_finite()) {
            return Err(ConfigError::Invalid(format!("{name} must be finite")));
        }

        if self.ball_radius <= 0.0 || self.player_radius <= 0.0 {
            return Err(ConfigError::Invalid("radii must be positive".to_string()));
        }
        if self.max_frame_delta <= 0.0 {
            return Err(ConfigError::Invalid("max_frame_delta must be positive".to_string()));
        }
        if self.ball_damping < 0.0 || self.player_damping < 0.0 || self.air_damping_factor < 0.0 {
            return Err(ConfigError::Invalid("damping must not be negative".to_string()));
        }
        if self.ball_spawn_extent < 0.0 {
            return Err(ConfigError::Invalid("ball_spawn_extent must not be negative".to_string()));
        }
        if !utils::is_finite(&self.spawn_start) || !utils::is_finite(&self.spawn_end) {
            return Err(ConfigError::Invalid("spawn pose must be finite".to_string()));
        }

        Ok(())
    }
}

impl Default for SimulationConfig {
    fn default() -> Self {
        Self {
            ball_count: 100,
            ball_radius: 0.2,
            gravity: 30.0,
            substeps: 5,
            max_frame_delta: 0.05,
            restitution: 1.5,
            ball_damping: 1.5,
            player_damping: 4.0,
            air_damping_factor: 0.1,
            ground_acceleration: 25.0,
            air_acceleration: 8.0,
            jump_velocity: 15.0,
            throw_speed: 50.0,
            throw_momentum: 2.0,
            throw_offset: 1.5,
            player_radius: 0.5,
            spawn_start: Vec3::new(0.0, 10.0, 0.0),
            spawn_end: Vec3::new(0.0, 11.0, 0.0),
            out_of_bounds_y: -100.0,
            ball_spawn_extent: 25.0,
            ball_spawn_height: 20.0,
        }
    }
}

/// # Level Configuration
///
/// Where the static level comes from. With no `obj_path` the built-in test
/// arena is generated from the remaining fields.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LevelConfig {
    /// Wavefront OBJ file with the level mesh
    pub obj_path: Option<String>,
    /// Half width of the generated arena floor
    pub arena_half_extent: f32,
    /// Height of the generated arena walls
    pub arena_wall_height: f32,
    /// Add a ramp and a raised platform to the generated arena
    pub arena_ramp: bool,
}

impl LevelConfig {
    /// Validate the configuration
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.obj_path.is_none() {
            if !(self.arena_half_extent.is_finite() && self.arena_half_extent > 0.0) {
                return Err(ConfigError::Invalid("arena_half_extent must be positive".to_string()));
            }
            if !(self.arena_wall_height.is_finite() && self.arena_wall_height >= 0.0) {
                return Err(ConfigError::Invalid("arena_wall_height must not be negative".to_string()));
            }
        }
        Ok(())
    }
}

impl Default for LevelConfig {
    fn default() -> Self {
        Self {
            obj_path: None,
            arena_half_extent: 30.0,
            arena_wall_height: 8.0,
            arena_ramp: true,
        }
    }
}

/// # Complete Application Configuration
///
/// Top-level configuration that encompasses all engine subsystems.
/// This is the main configuration structure hosts should load.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ApplicationConfig {
    /// Engine core configuration
    pub engine: EngineConfig,
    /// Physics and gameplay tunables
    pub simulation: SimulationConfig,
    /// Static spatial index configuration
    pub octree: OctreeConfig,
    /// Level source
    pub level: LevelConfig,
}

impl ApplicationConfig {
    /// Validate the entire configuration
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.simulation.validate()?;
        self.octree.validate()?;
        self.level.validate()?;
        Ok(())
    }
}

impl Config for ApplicationConfig {}
