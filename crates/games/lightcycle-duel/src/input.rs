use lightcycle_core::{Direction, PlayerSlot};

/// One pending direction change per rider. A newer valid request replaces
/// the older one; invalid requests leave the slot alone.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DirectionQueue {
    slots: [Option<Direction>; 2],
}

impl DirectionQueue {
    pub fn new() -> Self {
        Self::default()
    }

    /// Store `requested` for `slot` if it is a 90 degree turn from `current`.
    /// Returns whether the request was kept.
    pub fn offer(&mut self, slot: PlayerSlot, current: Direction, requested: Direction) -> bool {
        if !current.is_turn_to(requested) {
            return false;
        }
        self.slots[slot.index()] = Some(requested);
        true
    }

    pub fn pending(&self, slot: PlayerSlot) -> Option<Direction> {
        self.slots[slot.index()]
    }

    /// Remove and return the pending change for `slot`.
    pub fn take(&mut self, slot: PlayerSlot) -> Option<Direction> {
        self.slots[slot.index()].take()
    }

    pub fn clear(&mut self) {
        self.slots = [None, None];
    }
}
