use std::collections::HashSet;

use serde::{Deserialize, Serialize};

use lightcycle_core::{Point, Rider};

/// Scale applied before rounding. Matches the one-decimal rounding in
/// `Player::move_forward`, so every step lands in a fresh cell.
pub const GRID_SCALE: f64 = 10.0;

/// A quantized arena position used as a collision key.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct GridPoint {
    pub x: i64,
    pub y: i64,
}

impl GridPoint {
    pub fn from_point(point: Point) -> Self {
        Self {
            x: quantize(point.x),
            y: quantize(point.y),
        }
    }
}

fn quantize(value: f64) -> i64 {
    (value * GRID_SCALE).round() as i64
}

/// Every cell a rider has occupied. A cache over the rider's history that
/// can always be rebuilt from it.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct OccupancyIndex {
    cells: HashSet<GridPoint>,
}

impl OccupancyIndex {
    pub fn new() -> Self {
        Self::default()
    }

    /// Quantize every point into a fresh index.
    pub fn rebuild<'a>(points: impl IntoIterator<Item = &'a Point>) -> Self {
        Self {
            cells: points
                .into_iter()
                .map(|p| GridPoint::from_point(*p))
                .collect(),
        }
    }

    /// Index covering a rider's full history and its current trail.
    pub fn for_rider(rider: &Rider) -> Self {
        Self::rebuild(rider.player.history().iter().chain(rider.trail.points()))
    }

    pub fn contains(&self, cell: GridPoint) -> bool {
        self.cells.contains(&cell)
    }

    /// Returns `true` if the cell was not occupied before.
    pub fn insert(&mut self, cell: GridPoint) -> bool {
        self.cells.insert(cell)
    }

    pub fn len(&self) -> usize {
        self.cells.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }
}
