use std::collections::VecDeque;
use std::collections::vec_deque;

use lightcycle_core::{Direction, PlayerSlot};

/// What a key press asks for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Intent {
    Steer {
        slot: PlayerSlot,
        direction: Direction,
    },
    Quit,
}

/// WASD steers player one, the arrow keys steer player two, Escape quits.
pub fn map_key(key: &str) -> Option<Intent> {
    let steer = |slot, direction| Some(Intent::Steer { slot, direction });
    match key {
        "KeyW" => steer(PlayerSlot::One, Direction::Up),
        "KeyS" => steer(PlayerSlot::One, Direction::Down),
        "KeyA" => steer(PlayerSlot::One, Direction::Left),
        "KeyD" => steer(PlayerSlot::One, Direction::Right),
        "ArrowUp" => steer(PlayerSlot::Two, Direction::Up),
        "ArrowDown" => steer(PlayerSlot::Two, Direction::Down),
        "ArrowLeft" => steer(PlayerSlot::Two, Direction::Left),
        "ArrowRight" => steer(PlayerSlot::Two, Direction::Right),
        "Escape" => Some(Intent::Quit),
        _ => None,
    }
}

/// Collects key presses between frames, per player, in arrival order.
#[derive(Debug, Default)]
pub struct InputHandler {
    queues: [VecDeque<Direction>; 2],
    quit: bool,
}

impl InputHandler {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record<'a>(&mut self, keys: impl IntoIterator<Item = &'a str>) {
        for key in keys {
            match map_key(key) {
                Some(Intent::Steer { slot, direction }) => {
                    self.queues[slot.index()].push_back(direction);
                },
                Some(Intent::Quit) => self.quit = true,
                None => tracing::trace!(key, "Unmapped key"),
            }
        }
    }

    /// Take every direction recorded for `slot` since the last drain.
    pub fn drain(&mut self, slot: PlayerSlot) -> vec_deque::IntoIter<Direction> {
        std::mem::take(&mut self.queues[slot.index()]).into_iter()
    }

    pub fn quit_requested(&self) -> bool {
        self.quit
    }
}
