//! Input state captured by the host
//!
//! The host translates its window events into an [`InputState`] value and
//! hands it to the simulation each tick. Held movement keys are a bit set;
//! pointer presses bump a counter so that no throw is lost between ticks.

use bitflags::bitflags;

bitflags! {
    /// Movement keys currently held down
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
    pub struct MovementKeys: u8 {
        /// `KeyW`
        const FORWARD = 1 << 0;
        /// `KeyS`
        const BACKWARD = 1 << 1;
        /// `KeyA`
        const LEFT = 1 << 2;
        /// `KeyD`
        const RIGHT = 1 << 3;
        /// `Space`
        const JUMP = 1 << 4;
    }
}

impl MovementKeys {
    /// Map a DOM-style key code name to its flag
    pub fn from_key_name(name: &str) -> Option<Self> {
        match name {
            "KeyW" => Some(Self::FORWARD),
            "KeyS" => Some(Self::BACKWARD),
            "KeyA" => Some(Self::LEFT),
            "KeyD" => Some(Self::RIGHT),
            "Space" => Some(Self::JUMP),
            _ => None,
        }
    }
}

/// Snapshot of player input
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct InputState {
    keys: MovementKeys,
    throw_requests: u64,
}

impl InputState {
    /// No keys held, no throws requested
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a key press or release by name; unknown names are ignored
    pub fn set_key(&mut self, name: &str, pressed: bool) {
        match MovementKeys::from_key_name(name) {
            Some(key) => self.keys.set(key, pressed),
            None => log::trace!("Ignoring key {}", name),
        }
    }

    /// Check whether every key in `keys` is held
    pub fn is_held(&self, keys: MovementKeys) -> bool {
        self.keys.contains(keys)
    }

    /// All held keys
    pub fn keys(&self) -> MovementKeys {
        self.keys
    }

    /// Release every key
    pub fn release_all(&mut self) {
        self.keys = MovementKeys::empty();
    }

    /// Request one throw
    pub fn press_pointer(&mut self) {
        self.throw_requests = self.throw_requests.wrapping_add(1);
    }

    /// Total throws requested since the input was created
    pub fn throw_requests(&self) -> u64 {
        self.throw_requests
    }
}
