//! First-person camera pose shared between the host and the simulation
//!
//! The host owns the pose and rotates it from mouse input; the simulation
//! writes the position every frame and resets the orientation when the
//! player falls out of the world.

use crate::foundation::math::{constants, utils, Quat, Vec3, Vector3};

/// Position and orientation of the player's eye
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CameraPose {
    /// World-space eye position
    pub position: Vec3,
    /// Orientation; identity looks down -Z
    pub rotation: Quat,
    /// Up vector used to derive the strafe direction
    pub up: Vec3,
}

impl Default for CameraPose {
    fn default() -> Self {
        Self {
            position: Vec3::zeros(),
            rotation: Quat::identity(),
            up: Vec3::from(constants::WORLD_UP),
        }
    }
}

impl CameraPose {
    /// Camera at `position` with identity rotation
    pub fn at(position: Vec3) -> Self {
        Self {
            position,
            ..Self::default()
        }
    }

    /// Set the orientation from yaw (about +Y) and pitch (about +X), in radians
    pub fn set_yaw_pitch(&mut self, yaw: f32, pitch: f32) {
        self.rotation = Quat::from_axis_angle(&Vector3::y_axis(), yaw)
            * Quat::from_axis_angle(&Vector3::x_axis(), pitch);
    }

    /// World-space view direction
    pub fn direction(&self) -> Vec3 {
        self.rotation * Vec3::new(0.0, 0.0, -1.0)
    }

    /// View direction flattened onto the ground plane
    ///
    /// Zero when looking straight up or down.
    pub fn forward(&self) -> Vec3 {
        let mut direction = self.direction();
        direction.y = 0.0;
        utils::try_normalize(direction).unwrap_or_else(Vec3::zeros)
    }

    /// Strafe direction: flattened forward crossed with `up`
    pub fn side(&self) -> Vec3 {
        self.forward().cross(&self.up)
    }
}
