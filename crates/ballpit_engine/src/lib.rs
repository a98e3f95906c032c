//! # Ballpit Engine
//!
//! Octree-accelerated sphere and capsule dynamics for a first-person
//! ball-throwing game.
//!
//! ## Features
//!
//! - **Static Octree**: level triangles indexed once, queried by spheres and capsules
//! - **Projectile Pool**: a fixed number of balls, recycled on every throw
//! - **Capsule Player**: walking, jumping and throwing with camera-relative controls
//! - **Fixed Sub-steps**: clamped frame delta split into equal integration steps
//! - **Renderer Boundary**: per-body transforms as plain `Pod` data
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use ballpit_engine::prelude::*;
//!
//! fn main() -> Result<(), SimulationError> {
//!     let config = ApplicationConfig::default();
//!     let mut simulation = Simulation::from_config(&config)?;
//!     let mut camera = CameraPose::default();
//!     let mut input = InputState::new();
//!
//!     input.set_key("KeyW", true);
//!     input.press_pointer();
//!     for _ in 0..60 {
//!         simulation.tick(1.0 / 60.0, &input, &mut camera);
//!     }
//!
//!     let instances: &[u8] = simulation.as_bytes();
//!     println!("{} bytes of instance data", instances.len());
//!     Ok(())
//! }
//! ```

#![warn(missing_docs)]
#![warn(clippy::all, clippy::pedantic, clippy::nursery)]
#![allow(clippy::module_name_repetitions, clippy::similar_names, clippy::too_many_arguments)]

// Core engine modules
pub mod config;
pub mod core;
pub mod foundation;

// Simulation
pub mod assets;
pub mod input;
pub mod physics;
pub mod player;
pub mod scene;
pub mod simulation;
pub mod spatial;

pub use simulation::{BodyTransform, Simulation, SimulationError};

/// Common imports for engine users
pub mod prelude {
    pub use crate::{
        assets::LevelError,
        core::{ApplicationConfig, Config, ConfigError, EngineConfig, LevelConfig, SimulationConfig},
        foundation::{
            math::{Quat, Vec3},
            time::{FrameClock, FrameStep},
        },
        input::{InputState, MovementKeys},
        physics::{BodyId, BoundingSphere, Capsule, ColliderRegistry, Contact, DynamicBody},
        player::PlayerController,
        scene::{CameraPose, StaticGeometry},
        simulation::{BodyTransform, Simulation, SimulationError},
        spatial::{Octree, OctreeConfig, OctreeError, StaticCollider, AABB},
    };
}
