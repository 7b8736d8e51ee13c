use serde::{Deserialize, Serialize};

use lightcycle_core::Player;

/// Rectangular playing field with its origin in the top-left corner.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Arena {
    pub width: f64,
    pub height: f64,
}

impl Arena {
    pub fn new(width: f64, height: f64) -> Self {
        Self { width, height }
    }

    /// Whether a rider's body crosses any of the four edges.
    pub fn is_out_of_bounds(&self, player: &Player) -> bool {
        let r = player.radius();
        let p = player.position;
        p.x < r || p.y < r || p.x > self.width - r || p.y > self.height - r
    }
}

impl From<(f64, f64)> for Arena {
    fn from((width, height): (f64, f64)) -> Self {
        Self::new(width, height)
    }
}
