use serde::{Deserialize, Serialize};

use crate::error::{CoreError, CoreResult};
use crate::player::Player;
use crate::trail::Trail;

/// Seat of a rider in a duel. Iteration order is always `One` then `Two`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PlayerSlot {
    One,
    Two,
}

impl PlayerSlot {
    pub const BOTH: [PlayerSlot; 2] = [PlayerSlot::One, PlayerSlot::Two];

    pub fn index(self) -> usize {
        match self {
            PlayerSlot::One => 0,
            PlayerSlot::Two => 1,
        }
    }

    pub fn other(self) -> PlayerSlot {
        match self {
            PlayerSlot::One => PlayerSlot::Two,
            PlayerSlot::Two => PlayerSlot::One,
        }
    }
}

/// A player paired with the trail it leaves behind.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Rider {
    pub player: Player,
    pub trail: Trail,
}

impl Rider {
    pub fn new(player: Player, trail: Trail) -> Self {
        Self { player, trail }
    }

    /// Seed history and trail with the player's current position.
    pub fn seed(&mut self) {
        self.player.start_new_segment();
        self.trail.add_point(self.player.position);
    }
}

/// Both riders plus the outcome of one match.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MatchState {
    riders: [Rider; 2],
    running: bool,
    winner: Option<PlayerSlot>,
}

impl MatchState {
    /// Pair two seeded riders into a running match.
    pub fn new(one: Rider, two: Rider) -> CoreResult<Self> {
        if one.player.name == two.player.name {
            return Err(CoreError::DuplicatePlayerName(one.player.name));
        }
        if one.trail.is_empty() || two.trail.is_empty() {
            return Err(CoreError::EmptyTrail);
        }
        Ok(Self {
            riders: [one, two],
            running: true,
            winner: None,
        })
    }

    pub fn rider(&self, slot: PlayerSlot) -> &Rider {
        &self.riders[slot.index()]
    }

    pub fn rider_mut(&mut self, slot: PlayerSlot) -> &mut Rider {
        &mut self.riders[slot.index()]
    }

    pub fn player(&self, slot: PlayerSlot) -> &Player {
        &self.rider(slot).player
    }

    pub fn trail(&self, slot: PlayerSlot) -> &Trail {
        &self.rider(slot).trail
    }

    /// Riders in fixed slot order.
    pub fn riders(&self) -> impl Iterator<Item = (PlayerSlot, &Rider)> {
        PlayerSlot::BOTH.into_iter().zip(self.riders.iter())
    }

    pub fn is_running(&self) -> bool {
        self.running
    }

    pub fn winner(&self) -> Option<PlayerSlot> {
        self.winner
    }

    pub fn winner_player(&self) -> Option<&Player> {
        self.winner.map(|slot| self.player(slot))
    }

    /// End the match. Has no effect once the match is already over.
    pub fn finish(&mut self, winner: Option<PlayerSlot>) {
        if !self.running {
            return;
        }
        self.running = false;
        self.winner = winner;
    }

    /// Start over from the spawns, keeping names, colors, speeds and trail settings.
    pub fn reset(&mut self) {
        for rider in &mut self.riders {
            rider.trail.clear();
            rider.player.respawn();
            rider.seed();
        }
        self.running = true;
        self.winner = None;
    }
}
