use serde::{Deserialize, Serialize};

use crate::direction::Direction;

/// A position in arena coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

impl From<(f64, f64)> for Point {
    fn from((x, y): (f64, f64)) -> Self {
        Self { x, y }
    }
}

/// Rider and trail color.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlayerColor {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl PlayerColor {
    pub const BLACK: PlayerColor = PlayerColor { r: 0, g: 0, b: 0 };
    pub const WHITE: PlayerColor = PlayerColor {
        r: 255,
        g: 255,
        b: 255,
    };
    pub const GREEN: PlayerColor = PlayerColor { r: 0, g: 255, b: 0 };
    pub const RED: PlayerColor = PlayerColor { r: 255, g: 0, b: 0 };
}

impl Default for PlayerColor {
    fn default() -> Self {
        Self::WHITE
    }
}

/// Where and facing which way a rider starts a match.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Spawn {
    pub position: Point,
    pub direction: Direction,
}

/// Round to one decimal place so positions stay on the 0.1 lattice.
pub fn round_to_tenth(value: f64) -> f64 {
    (value * 10.0).round() / 10.0
}

/// A light-cycle rider.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Player {
    pub name: String,
    /// Centre of the body.
    pub position: Point,
    pub color: PlayerColor,
    /// Body diameter.
    pub width: u32,
    pub direction: Direction,
    /// Distance covered per tick.
    pub speed: f64,
    spawn: Spawn,
    /// Every position visited, including turn vertices. Never truncated.
    history: Vec<Point>,
}

impl Player {
    pub fn new(
        name: impl Into<String>,
        spawn: Spawn,
        color: PlayerColor,
        width: u32,
        speed: f64,
    ) -> Self {
        Self {
            name: name.into(),
            position: spawn.position,
            color,
            width,
            direction: spawn.direction,
            speed,
            spawn,
            history: Vec::new(),
        }
    }

    /// Advance one step along the current direction.
    pub fn move_forward(&mut self) {
        let (dx, dy) = self.direction.vector();
        self.position = Point::new(
            round_to_tenth(self.position.x + f64::from(dx) * self.speed),
            round_to_tenth(self.position.y + f64::from(dy) * self.speed),
        );
        self.history.push(self.position);
    }

    /// Pin the current position as a vertex without moving.
    pub fn start_new_segment(&mut self) {
        self.history.push(self.position);
    }

    pub fn radius(&self) -> f64 {
        f64::from(self.width) / 2.0
    }

    /// Body footprint as `(left, top, width, height)`.
    pub fn body_rect(&self) -> (f64, f64, f64, f64) {
        let r = self.radius();
        let w = f64::from(self.width);
        (self.position.x - r, self.position.y - r, w, w)
    }

    pub fn history(&self) -> &[Point] {
        &self.history
    }

    pub fn spawn(&self) -> Spawn {
        self.spawn
    }

    /// Put the rider back on its spawn and forget everything it visited.
    pub fn respawn(&mut self) {
        self.position = self.spawn.position;
        self.direction = self.spawn.direction;
        self.history.clear();
    }
}
