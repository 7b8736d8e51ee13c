use std::time::Duration;

use serde::Serialize;

use lightcycle_core::ports::{Clock, Renderer};
use lightcycle_core::{Direction, PlayerSlot, Point};
use lightcycle_duel::collision::CollisionCause;
use lightcycle_duel::{DuelEvent, LightCycleDuel};

use crate::input::InputHandler;
use crate::script::InputScript;

/// How the host loop runs a match.
#[derive(Debug, Clone)]
pub struct SessionOptions {
    /// Stop after this many ticks even if nobody crashed.
    pub max_ticks: Option<u64>,
    pub frame_rate: u32,
    /// Time to keep the clock running after the match ends.
    pub linger: Duration,
}

impl Default for SessionOptions {
    fn default() -> Self {
        Self {
            max_ticks: None,
            frame_rate: 120,
            linger: Duration::from_millis(1500),
        }
    }
}

/// Where one rider ended up.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RiderSummary {
    pub slot: PlayerSlot,
    pub name: String,
    pub position: Point,
    pub direction: Direction,
    pub trail_points: usize,
    pub crash: Option<CollisionCause>,
}

/// Outcome of [`run_match`].
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MatchSummary {
    pub winner: Option<String>,
    pub ticks: u64,
    pub finished: bool,
    /// Escape was pressed before the match ended.
    pub aborted: bool,
    pub riders: Vec<RiderSummary>,
}

impl MatchSummary {
    fn collect(game: &LightCycleDuel, crashes: [Option<CollisionCause>; 2], aborted: bool) -> Self {
        let state = game.state();
        let riders = state
            .riders()
            .map(|(slot, rider)| RiderSummary {
                slot,
                name: rider.player.name.clone(),
                position: rider.player.position,
                direction: rider.player.direction,
                trail_points: rider.trail.len(),
                crash: crashes[slot.index()],
            })
            .collect();
        Self {
            winner: state.winner_player().map(|p| p.name.clone()),
            ticks: game.ticks(),
            finished: !state.is_running(),
            aborted,
            riders,
        }
    }
}

/// Number of clock ticks that cover `linger` at `frame_rate`.
fn linger_frames(linger: Duration, frame_rate: u32) -> u64 {
    (linger.as_secs_f64() * f64::from(frame_rate)).ceil() as u64
}

/// Drive `game` until someone crashes, Escape is pressed, or `max_ticks`
/// is reached.
///
/// Keys scheduled for tick `n` are fed in just before tick `n` is
/// simulated. After the deciding tick the game over frame is drawn once and
/// the clock keeps running for the linger time.
pub fn run_match(
    game: &mut LightCycleDuel,
    renderer: &mut dyn Renderer,
    clock: &mut dyn Clock,
    script: &InputScript,
    options: &SessionOptions,
) -> MatchSummary {
    let mut input = InputHandler::new();
    let mut crashes = [None; 2];
    let mut aborted = false;

    tracing::info!(
        max_ticks = ?options.max_ticks,
        frame_rate = options.frame_rate,
        "Match started"
    );

    while game.is_running() {
        if let Some(max) = options.max_ticks
            && game.ticks() >= max
        {
            tracing::info!(ticks = game.ticks(), "Tick limit reached");
            break;
        }

        let tick = game.ticks() + 1;
        input.record(script.keys_at(tick));
        if input.quit_requested() {
            tracing::info!(tick, "Quit requested");
            aborted = true;
            break;
        }
        for slot in PlayerSlot::BOTH {
            for direction in input.drain(slot) {
                game.queue_direction_change(slot, direction);
            }
        }

        for event in game.advance_one_tick(renderer) {
            match event {
                DuelEvent::Turned { slot, direction } => {
                    tracing::trace!(tick, ?slot, ?direction, "Turn applied");
                },
                DuelEvent::Collided { slot, cause } => {
                    tracing::debug!(tick, ?slot, ?cause, "Rider crashed");
                    crashes[slot.index()] = Some(cause);
                },
                DuelEvent::MatchOver { winner } => {
                    tracing::debug!(tick, ?winner, "Match decided");
                },
            }
        }
        clock.tick(options.frame_rate);
    }

    if !game.is_running() {
        game.advance_one_tick(renderer);
        for _ in 0..linger_frames(options.linger, options.frame_rate) {
            clock.tick(options.frame_rate);
        }
    }
    renderer.close();

    let summary = MatchSummary::collect(game, crashes, aborted);
    tracing::info!(
        ticks = summary.ticks,
        winner = ?summary.winner,
        aborted = summary.aborted,
        "Session finished"
    );
    summary
}
