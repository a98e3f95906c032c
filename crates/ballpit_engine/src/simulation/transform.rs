//! Per-body transforms published to the renderer

use bytemuck::{Pod, Zeroable};

use crate::physics::DynamicBody;

/// Instance data for one registry slot, laid out for direct GPU upload
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, Pod, Zeroable)]
pub struct BodyTransform {
    /// Sphere center or capsule midpoint
    pub position: [f32; 3],
    /// Collision radius (0 for vacant slots)
    pub radius: f32,
    /// One of [`BodyTransform::VACANT`], [`BodyTransform::SPHERE`], [`BodyTransform::CAPSULE`]
    pub kind: u32,
}

impl BodyTransform {
    /// Slot holds no body
    pub const VACANT: u32 = 0;
    /// Slot holds a projectile sphere
    pub const SPHERE: u32 = 1;
    /// Slot holds the player capsule
    pub const CAPSULE: u32 = 2;

    /// Transform for a registry slot
    pub fn from_slot(slot: Option<&DynamicBody>) -> Self {
        match slot {
            None => Self::zeroed(),
            Some(body) => {
                let position = body.position();
                Self {
                    position: [position.x, position.y, position.z],
                    radius: body.radius(),
                    kind: match body {
                        DynamicBody::Sphere(_) => Self::SPHERE,
                        DynamicBody::Capsule(_) => Self::CAPSULE,
                    },
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::foundation::math::Vec3;
    use crate::physics::SphereBody;

    #[test]
    fn test_layout_is_tightly_packed() {
        assert_eq!(std::mem::size_of::<BodyTransform>(), 20);
        let transforms = [BodyTransform::zeroed(); 3];
        assert_eq!(bytemuck::cast_slice::<_, u8>(&transforms).len(), 60);
    }

    #[test]
    fn test_from_slot() {
        let sphere = DynamicBody::from(SphereBody::new(Vec3::new(1.0, 2.0, 3.0), 0.2));
        let transform = BodyTransform::from_slot(Some(&sphere));
        assert_eq!(transform.position, [1.0, 2.0, 3.0]);
        assert_eq!(transform.kind, BodyTransform::SPHERE);

        assert_eq!(BodyTransform::from_slot(None).kind, BodyTransform::VACANT);
    }
}
