//! Dense, stable-id storage for dynamic bodies
//!
//! Slots `0..ball_count` hold the projectile pool and slot `ball_count` holds
//! the player capsule. Ids never change and slots are recycled rather than
//! removed, so the registry never reallocates after startup.

use super::body::{BodyId, CapsuleBody, DynamicBody, SphereBody};
use crate::foundation::math::{utils, Vec3};

/// Arena of every moving collider in the world
#[derive(Debug, Clone, Default)]
pub struct ColliderRegistry {
    bodies: Vec<Option<DynamicBody>>,
    last_finite: Vec<Vec3>,
    ball_count: usize,
}

impl ColliderRegistry {
    /// Create a registry with `ball_count` projectile slots and one player slot, all vacant
    pub fn new(ball_count: usize) -> Self {
        Self {
            bodies: vec![None; ball_count + 1],
            last_finite: vec![Vec3::zeros(); ball_count + 1],
            ball_count,
        }
    }

    /// Number of projectile slots
    pub fn ball_count(&self) -> usize {
        self.ball_count
    }

    /// Slot of the player capsule
    pub fn player_id(&self) -> BodyId {
        BodyId::new(self.ball_count)
    }

    /// Id of projectile `n`, wrapping around the pool
    pub fn ball_id(&self, n: u64) -> Option<BodyId> {
        if self.ball_count == 0 {
            return None;
        }
        let index = (n % self.ball_count as u64) as usize;
        Some(BodyId::new(index))
    }

    /// Total number of slots, vacant ones included
    pub fn len(&self) -> usize {
        self.bodies.len()
    }

    /// True when the registry has no slots at all
    pub fn is_empty(&self) -> bool {
        self.bodies.is_empty()
    }

    /// Number of occupied slots
    pub fn occupied(&self) -> usize {
        self.bodies.iter().flatten().count()
    }

    /// Place a body in a slot, returning what was there
    ///
    /// Ids past the end of the registry are ignored and `None` is returned.
    pub fn insert(&mut self, id: BodyId, body: impl Into<DynamicBody>) -> Option<DynamicBody> {
        let slot = self.bodies.get_mut(id.index())?;
        let previous = slot.replace(body.into());
        self.record_finite(id);
        previous
    }

    /// Remember the slot's current position if it is finite
    pub fn record_finite(&mut self, id: BodyId) {
        let Some(position) = self.get(id).map(DynamicBody::position) else {
            return;
        };
        if utils::is_finite(&position) {
            self.last_finite[id.index()] = position;
        }
    }

    /// Last finite position recorded for a slot
    ///
    /// Slots that never held a finite body report the origin.
    pub fn last_finite(&self, id: BodyId) -> Option<Vec3> {
        self.last_finite.get(id.index()).copied()
    }

    /// Vacate a slot, returning its body
    pub fn take(&mut self, id: BodyId) -> Option<DynamicBody> {
        self.bodies.get_mut(id.index())?.take()
    }

    /// Get the body in a slot
    pub fn get(&self, id: BodyId) -> Option<&DynamicBody> {
        self.bodies.get(id.index())?.as_ref()
    }

    /// Get mutable access to the body in a slot
    pub fn get_mut(&mut self, id: BodyId) -> Option<&mut DynamicBody> {
        self.bodies.get_mut(id.index())?.as_mut()
    }

    /// Get the sphere in a slot
    pub fn sphere(&self, id: BodyId) -> Option<&SphereBody> {
        self.get(id)?.as_sphere()
    }

    /// Get mutable access to the sphere in a slot
    pub fn sphere_mut(&mut self, id: BodyId) -> Option<&mut SphereBody> {
        self.get_mut(id)?.as_sphere_mut()
    }

    /// Get the capsule in a slot
    pub fn capsule(&self, id: BodyId) -> Option<&CapsuleBody> {
        self.get(id)?.as_capsule()
    }

    /// Get mutable access to the capsule in a slot
    pub fn capsule_mut(&mut self, id: BodyId) -> Option<&mut CapsuleBody> {
        self.get_mut(id)?.as_capsule_mut()
    }

    /// Borrow two distinct occupied slots mutably at once
    ///
    /// Returns `None` if the ids are equal or either slot is vacant.
    pub fn pair_mut(&mut self, a: BodyId, b: BodyId) -> Option<(&mut DynamicBody, &mut DynamicBody)> {
        let (i, j) = (a.index(), b.index());
        if i == j || i >= self.bodies.len() || j >= self.bodies.len() {
            return None;
        }

        if i < j {
            let (head, tail) = self.bodies.split_at_mut(j);
            Some((head[i].as_mut()?, tail[0].as_mut()?))
        } else {
            let (head, tail) = self.bodies.split_at_mut(i);
            Some((tail[0].as_mut()?, head[j].as_mut()?))
        }
    }

    /// All slot ids in order
    pub fn ids(&self) -> impl Iterator<Item = BodyId> {
        (0..self.bodies.len()).map(BodyId::new)
    }

    /// Projectile slot ids in order
    pub fn ball_ids(&self) -> impl Iterator<Item = BodyId> {
        (0..self.ball_count).map(BodyId::new)
    }

    /// Occupied slots with their ids
    pub fn iter(&self) -> impl Iterator<Item = (BodyId, &DynamicBody)> {
        self.bodies
            .iter()
            .enumerate()
            .filter_map(|(index, slot)| slot.as_ref().map(|body| (BodyId::new(index), body)))
    }

    /// Every slot, vacant ones as `None`
    pub fn slots(&self) -> &[Option<DynamicBody>] {
        &self.bodies
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::physics::collision::Capsule;

    #[test]
    fn test_layout_and_wraparound() {
        let registry = ColliderRegistry::new(4);
        assert_eq!(registry.len(), 5);
        assert_eq!(registry.player_id(), BodyId::new(4));
        assert_eq!(registry.occupied(), 0);
        assert_eq!(registry.ball_id(6), Some(BodyId::new(2)));
        assert!(ColliderRegistry::new(0).ball_id(1).is_none());
    }

    #[test]
    fn test_insert_get_and_typed_access() {
        let mut registry = ColliderRegistry::new(2);
        registry.insert(BodyId::new(0), SphereBody::new(Vec3::new(1.0, 2.0, 3.0), 0.2));
        let player = registry.player_id();
        registry.insert(
            player,
            CapsuleBody::new(Capsule::new(Vec3::zeros(), Vec3::new(0.0, 1.0, 0.0), 0.5)),
        );

        assert_eq!(registry.occupied(), 2);
        assert!(registry.sphere(BodyId::new(0)).is_some());
        assert!(registry.capsule(BodyId::new(0)).is_none());
        assert!(registry.get(BodyId::new(1)).is_none());
        assert!(registry.capsule(player).is_some());
        assert!(registry.insert(BodyId::new(99), SphereBody::new(Vec3::zeros(), 1.0)).is_none());

        let ids: Vec<_> = registry.iter().map(|(id, _)| id.index()).collect();
        assert_eq!(ids, vec![0, 2]);
    }

    #[test]
    fn test_pair_mut() {
        let mut registry = ColliderRegistry::new(3);
        for i in 0..3 {
            registry.insert(BodyId::new(i), SphereBody::new(Vec3::new(i as f32, 0.0, 0.0), 0.2));
        }

        let (a, b) = registry.pair_mut(BodyId::new(2), BodyId::new(0)).unwrap();
        assert_eq!(a.position().x, 2.0);
        assert_eq!(b.position().x, 0.0);

        let player = registry.player_id();
        assert!(registry.pair_mut(BodyId::new(1), BodyId::new(1)).is_none());
        assert!(registry.pair_mut(BodyId::new(0), player).is_none());
    }

    #[test]
    fn test_last_finite_position_survives_corruption() {
        let mut registry = ColliderRegistry::new(1);
        let id = BodyId::new(0);
        assert_eq!(registry.last_finite(id), Some(Vec3::zeros()));

        registry.insert(id, SphereBody::new(Vec3::new(1.0, 2.0, 3.0), 0.2));
        registry.sphere_mut(id).unwrap().center.y = f32::NAN;
        registry.record_finite(id);
        assert_eq!(registry.last_finite(id), Some(Vec3::new(1.0, 2.0, 3.0)));
        assert!(registry.last_finite(BodyId::new(5)).is_none());
    }
}
