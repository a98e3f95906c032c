//! # Core Engine Module
//!
//! Shared configuration types used by every subsystem.
//!
//! ## Organization
//!
//! - **Config**: Unified configuration for engine, simulation, octree and level

pub mod config;

// Re-export commonly used config types
pub use config::{
    ApplicationConfig,
    EngineConfig,
    SimulationConfig,
    LevelConfig,
    Config,
    ConfigError,
};
