//! Player character
//!
//! The player is a capsule driven by keyboard input relative to the camera.
//! It lives in the collider registry next to the projectile pool so that
//! balls bounce off it.

mod controller;

pub use controller::PlayerController;
