pub mod config;
pub mod direction;
pub mod error;
pub mod match_state;
pub mod player;
pub mod ports;
pub mod trail;

pub use direction::Direction;
pub use error::{ConfigError, CoreError, CoreResult};
pub use match_state::{MatchState, PlayerSlot, Rider};
pub use player::{Player, PlayerColor, Point, Spawn};
pub use trail::Trail;

#[cfg(any(test, feature = "test-helpers"))]
pub mod test_helpers {
    use crate::config::{GameConfig, PlayerConfig};
    use crate::direction::Direction;
    use crate::player::{Player, PlayerColor, Point};
    use crate::ports::{Clock, Renderer};
    use crate::trail::Trail;

    /// One renderer call, as seen by [`RecordingRenderer`].
    #[derive(Debug, Clone, PartialEq)]
    pub enum DrawCall {
        Clear,
        Player { name: String, position: Point },
        Trail { name: String, points: Vec<Point> },
        GameOver { winner: Option<String> },
        Update,
        Close,
    }

    /// Renderer that records every call in order.
    #[derive(Debug, Default)]
    pub struct RecordingRenderer {
        pub calls: Vec<DrawCall>,
    }

    impl RecordingRenderer {
        pub fn new() -> Self {
            Self::default()
        }

        /// Calls recorded since the last `take`.
        pub fn take(&mut self) -> Vec<DrawCall> {
            std::mem::take(&mut self.calls)
        }

        /// Number of presented frames.
        pub fn frames(&self) -> usize {
            self.calls
                .iter()
                .filter(|c| matches!(c, DrawCall::Update))
                .count()
        }
    }

    impl Renderer for RecordingRenderer {
        fn clear(&mut self) {
            self.calls.push(DrawCall::Clear);
        }

        fn draw_player(&mut self, player: &Player) {
            self.calls.push(DrawCall::Player {
                name: player.name.clone(),
                position: player.position,
            });
        }

        fn draw_trail(&mut self, player: &Player, trail: &Trail) {
            self.calls.push(DrawCall::Trail {
                name: player.name.clone(),
                points: trail.points().copied().collect(),
            });
        }

        fn draw_game_over(&mut self, winner: Option<&Player>) {
            self.calls.push(DrawCall::GameOver {
                winner: winner.map(|p| p.name.clone()),
            });
        }

        fn update(&mut self) {
            self.calls.push(DrawCall::Update);
        }

        fn close(&mut self) {
            self.calls.push(DrawCall::Close);
        }
    }

    /// Clock that never blocks and counts how often it was asked to.
    #[derive(Debug, Default)]
    pub struct CountingClock {
        pub ticks: usize,
        pub last_frame_rate: Option<u32>,
    }

    impl Clock for CountingClock {
        fn tick(&mut self, frame_rate: u32) {
            self.ticks += 1;
            self.last_frame_rate = Some(frame_rate);
        }
    }

    /// Player settings with width 10 and speed 1.0.
    pub fn player_config(name: &str, start: (f64, f64), direction: Direction) -> PlayerConfig {
        PlayerConfig {
            name: name.to_string(),
            start_position: start,
            color: PlayerColor::WHITE,
            width: 10,
            direction,
            speed: 1.0,
        }
    }

    /// A duel on a `width` x `height` arena with the given riders.
    pub fn duel_config(
        width: f64,
        height: f64,
        one: PlayerConfig,
        two: PlayerConfig,
    ) -> GameConfig {
        GameConfig {
            arena_width: width,
            arena_height: height,
            player_one: one,
            player_two: two,
            ..GameConfig::default()
        }
    }

    /// 100x100 arena, riders far apart on the middle row, both heading up.
    pub fn small_duel_config() -> GameConfig {
        duel_config(
            100.0,
            100.0,
            player_config("One", (20.0, 50.0), Direction::Up),
            player_config("Two", (80.0, 50.0), Direction::Up),
        )
    }
}
