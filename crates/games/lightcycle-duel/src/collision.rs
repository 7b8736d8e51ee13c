use serde::{Deserialize, Serialize};

use lightcycle_core::Player;

use crate::arena::Arena;
use crate::occupancy::{GridPoint, OccupancyIndex};

/// Why a rider crashed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum CollisionCause {
    /// The body crossed an arena edge.
    OutOfBounds,
    /// The rider entered a cell the opponent has occupied.
    OpponentTrail,
    /// The rider re-entered one of its own earlier cells.
    OwnTrail,
}

/// Check a rider that just moved into `cell`.
///
/// `own` must be the rider's index as it was before this tick, without
/// `cell` inserted, or every step would look like a self-collision.
pub fn check_collision(
    player: &Player,
    cell: GridPoint,
    own: &OccupancyIndex,
    opponent: &OccupancyIndex,
    arena: &Arena,
) -> Option<CollisionCause> {
    if arena.is_out_of_bounds(player) {
        Some(CollisionCause::OutOfBounds)
    } else if opponent.contains(cell) {
        Some(CollisionCause::OpponentTrail)
    } else if own.contains(cell) {
        Some(CollisionCause::OwnTrail)
    } else {
        None
    }
}
