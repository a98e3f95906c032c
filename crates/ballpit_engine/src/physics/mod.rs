//! Physics module for dynamic bodies
//!
//! Provides the body registry, the pairwise narrow phase and the fixed
//! sub-step integrator for projectile spheres. Static level collision is
//! answered by [`crate::spatial`].

pub mod body;
pub mod collision;
pub mod integrator;
pub mod narrow_phase;
pub mod registry;

pub use body::{BodyId, CapsuleBody, DynamicBody, SphereBody};
pub use collision::{BoundingSphere, Capsule, Contact, Triangle};
pub use registry::ColliderRegistry;
