//! Scene description consumed by the simulation
//!
//! Static level geometry, the built-in test arena and the camera pose the
//! host shares with the player controller.

pub mod arena;
mod camera;
mod geometry;

pub use camera::CameraPose;
pub use geometry::StaticGeometry;
