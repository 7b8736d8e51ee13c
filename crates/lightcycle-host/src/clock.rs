use std::time::{Duration, Instant};

use lightcycle_core::ports::Clock;

/// Sleeps so that consecutive ticks are at least one frame apart.
///
/// A late frame is not made up for later; the next frame is measured from
/// when the late one finished.
#[derive(Debug, Default)]
pub struct FrameClock {
    last: Option<Instant>,
}

impl FrameClock {
    pub fn new() -> Self {
        Self::default()
    }
}

pub fn frame_duration(frame_rate: u32) -> Duration {
    Duration::from_secs_f64(1.0 / f64::from(frame_rate.max(1)))
}

impl Clock for FrameClock {
    fn tick(&mut self, frame_rate: u32) {
        let frame = frame_duration(frame_rate);
        if let Some(last) = self.last
            && let Some(remaining) = frame.checked_sub(last.elapsed())
        {
            std::thread::sleep(remaining);
        }
        self.last = Some(Instant::now());
    }
}

/// Never waits. Used for headless runs and tests.
#[derive(Debug, Default, Clone, Copy)]
pub struct Unpaced;

impl Clock for Unpaced {
    fn tick(&mut self, _frame_rate: u32) {}
}
