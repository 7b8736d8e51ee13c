use std::collections::VecDeque;

use serde::{Deserialize, Serialize};

use crate::error::{CoreError, CoreResult};
use crate::player::Point;

/// Bounded path history of one rider, oldest point first.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Trail {
    max_length: usize,
    width: u32,
    points: VecDeque<Point>,
}

impl Trail {
    pub fn new(max_length: usize, width: u32) -> Self {
        Self {
            max_length,
            width,
            points: VecDeque::with_capacity(max_length.min(4096)),
        }
    }

    /// A trail that already holds its first point.
    pub fn seeded(max_length: usize, width: u32, seed: Point) -> Self {
        let mut trail = Self::new(max_length, width);
        trail.add_point(seed);
        trail
    }

    /// Append a point, evicting and returning the oldest one once the bound is exceeded.
    pub fn add_point(&mut self, point: Point) -> Option<Point> {
        self.points.push_back(point);
        if self.points.len() > self.max_length {
            self.points.pop_front()
        } else {
            None
        }
    }

    /// Most recently added point.
    pub fn last_point(&self) -> CoreResult<Point> {
        self.points.back().copied().ok_or(CoreError::EmptyTrail)
    }

    /// Consecutive point pairs, for drawing line segments.
    pub fn segments(&self) -> impl Iterator<Item = (Point, Point)> + '_ {
        self.points.iter().copied().zip(self.points.iter().copied().skip(1))
    }

    pub fn points(&self) -> impl ExactSizeIterator<Item = &Point> + '_ {
        self.points.iter()
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    pub fn max_length(&self) -> usize {
        self.max_length
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn clear(&mut self) {
        self.points.clear();
    }
}
