//! Spatial partitioning data structures
//!
//! Provides the static triangle octree the level is loaded into and the
//! query trait dynamic bodies use to collide with it.

mod aabb;
mod octree;
mod spatial_query;

pub use aabb::AABB;
pub use octree::{Octree, OctreeConfig, OctreeError, OctreeNode, OctreeStats};
pub use spatial_query::StaticCollider;

#[cfg(test)]
pub(crate) use spatial_query::test_support;
