//! Collision shapes and contact queries
//!
//! # Module Organization
//!
//! - [`primitives`] - Spheres, capsules, triangles and the [`Contact`] they produce
//!
//! Static queries (body against level) go through
//! [`crate::spatial::StaticCollider`]; dynamic pairs are resolved in
//! [`crate::physics::narrow_phase`].

pub mod primitives;

pub use primitives::{BoundingSphere, Capsule, Contact, Triangle};
