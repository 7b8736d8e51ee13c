pub mod arena;
pub mod collision;
pub mod input;
pub mod occupancy;

use serde::{Deserialize, Serialize};

use lightcycle_core::config::GameConfig;
use lightcycle_core::ports::Renderer;
use lightcycle_core::{CoreResult, Direction, MatchState, PlayerSlot};

use arena::Arena;
use collision::CollisionCause;
use input::DirectionQueue;
use occupancy::{GridPoint, OccupancyIndex};

/// Things that happened during one tick, in the order they happened.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum DuelEvent {
    /// A queued direction change took effect.
    Turned {
        slot: PlayerSlot,
        direction: Direction,
    },
    /// A rider crashed this tick.
    Collided {
        slot: PlayerSlot,
        cause: CollisionCause,
    },
    /// The match ended.
    MatchOver { winner: Option<PlayerSlot> },
}

/// The two-rider simulation: owns the match state and advances it one tick
/// at a time.
pub struct LightCycleDuel {
    state: MatchState,
    arena: Arena,
    occupancy: [OccupancyIndex; 2],
    queue: DirectionQueue,
    ticks: u64,
}

impl LightCycleDuel {
    pub fn new(state: MatchState, board_size: (f64, f64)) -> Self {
        let occupancy = PlayerSlot::BOTH.map(|slot| OccupancyIndex::for_rider(state.rider(slot)));
        Self {
            state,
            arena: Arena::from(board_size),
            occupancy,
            queue: DirectionQueue::new(),
            ticks: 0,
        }
    }

    pub fn from_config(config: &GameConfig) -> CoreResult<Self> {
        let state = config.build_match_state()?;
        tracing::info!(
            player_one = %state.player(PlayerSlot::One).name,
            player_two = %state.player(PlayerSlot::Two).name,
            width = config.arena_width,
            height = config.arena_height,
            "Light-cycle duel created"
        );
        Ok(Self::new(state, config.board_size()))
    }

    pub fn state(&self) -> &MatchState {
        &self.state
    }

    pub fn arena(&self) -> Arena {
        self.arena
    }

    pub fn board_size(&self) -> (f64, f64) {
        (self.arena.width, self.arena.height)
    }

    pub fn is_running(&self) -> bool {
        self.state.is_running()
    }

    /// Ticks simulated since creation or the last reset.
    pub fn ticks(&self) -> u64 {
        self.ticks
    }

    pub fn pending_direction(&self, slot: PlayerSlot) -> Option<Direction> {
        self.queue.pending(slot)
    }

    pub fn occupancy(&self, slot: PlayerSlot) -> &OccupancyIndex {
        &self.occupancy[slot.index()]
    }

    /// Request a direction change for the next tick.
    ///
    /// Requests for the current direction, its reverse, or after the match
    /// has ended are dropped. Of several valid requests between two ticks
    /// only the latest is applied. Returns whether the request was kept.
    pub fn queue_direction_change(&mut self, slot: PlayerSlot, direction: Direction) -> bool {
        if !self.state.is_running() {
            return false;
        }
        let player = self.state.player(slot);
        let accepted = self.queue.offer(slot, player.direction, direction);
        if accepted {
            tracing::debug!(player = %player.name, ?direction, "Direction change queued");
        } else {
            tracing::debug!(
                player = %player.name,
                ?direction,
                current = ?player.direction,
                "Ignored direction change"
            );
        }
        accepted
    }

    /// Advance the match by one tick and draw the resulting frame.
    ///
    /// Once the match is over this only redraws the game over screen.
    pub fn advance_one_tick(&mut self, renderer: &mut dyn Renderer) -> Vec<DuelEvent> {
        if !self.state.is_running() {
            renderer.clear();
            renderer.draw_game_over(self.state.winner_player());
            renderer.update();
            return Vec::new();
        }

        self.ticks += 1;
        let mut events = self.apply_direction_changes();
        let collisions = PlayerSlot::BOTH.map(|slot| (slot, self.advance_rider(slot)));
        self.render_scene(renderer);

        // First crash in slot order loses; a crash by both still names player two.
        let mut loser = None;
        for (slot, cause) in collisions {
            if let Some(cause) = cause {
                events.push(DuelEvent::Collided { slot, cause });
                loser.get_or_insert(slot);
            }
        }

        if let Some(loser) = loser {
            let winner = loser.other();
            self.state.finish(Some(winner));
            tracing::info!(
                ticks = self.ticks,
                loser = %self.state.player(loser).name,
                winner = %self.state.player(winner).name,
                "Match over"
            );
            events.push(DuelEvent::MatchOver {
                winner: Some(winner),
            });
        } else {
            tracing::trace!(ticks = self.ticks, "Tick advanced");
        }

        events
    }

    /// Start the match over from the spawns.
    pub fn reset(&mut self) {
        self.state.reset();
        self.queue.clear();
        self.occupancy = PlayerSlot::BOTH.map(|slot| OccupancyIndex::for_rider(self.state.rider(slot)));
        self.ticks = 0;
        tracing::info!("Match reset");
    }

    /// Whether each occupancy index equals a rebuild from its rider's history.
    pub fn occupancy_is_consistent(&self) -> bool {
        PlayerSlot::BOTH.iter().all(|&slot| {
            self.occupancy[slot.index()] == OccupancyIndex::for_rider(self.state.rider(slot))
        })
    }

    fn apply_direction_changes(&mut self) -> Vec<DuelEvent> {
        let mut events = Vec::new();
        for slot in PlayerSlot::BOTH {
            let Some(direction) = self.queue.take(slot) else {
                continue;
            };
            let rider = self.state.rider_mut(slot);
            rider.player.direction = direction;
            rider.player.start_new_segment();
            rider.trail.add_point(rider.player.position);
            tracing::debug!(
                player = %rider.player.name,
                ?direction,
                x = rider.player.position.x,
                y = rider.player.position.y,
                "Turned"
            );
            events.push(DuelEvent::Turned { slot, direction });
        }
        events
    }

    /// Move one rider, then test the new cell against the indexes as they
    /// were before this move. The cell is recorded either way.
    fn advance_rider(&mut self, slot: PlayerSlot) -> Option<CollisionCause> {
        let rider = self.state.rider_mut(slot);
        rider.player.move_forward();
        rider.trail.add_point(rider.player.position);

        let player = &self.state.rider(slot).player;
        let cell = GridPoint::from_point(player.position);
        let cause = collision::check_collision(
            player,
            cell,
            &self.occupancy[slot.index()],
            &self.occupancy[slot.other().index()],
            &self.arena,
        );
        self.occupancy[slot.index()].insert(cell);
        cause
    }

    fn render_scene(&self, renderer: &mut dyn Renderer) {
        renderer.clear();
        for (_, rider) in self.state.riders() {
            renderer.draw_trail(&rider.player, &rider.trail);
            renderer.draw_player(&rider.player);
        }
        renderer.update();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use lightcycle_core::test_helpers::{
        DrawCall, RecordingRenderer, duel_config, player_config, small_duel_config,
    };
    use lightcycle_core::Point;

    fn duel(config: &lightcycle_core::config::GameConfig) -> LightCycleDuel {
        LightCycleDuel::from_config(config).unwrap()
    }

    fn run_until_over(game: &mut LightCycleDuel, max_ticks: usize) -> Vec<DuelEvent> {
        let mut renderer = RecordingRenderer::new();
        let mut events = Vec::new();
        for _ in 0..max_ticks {
            events.extend(game.advance_one_tick(&mut renderer));
            if !game.is_running() {
                break;
            }
        }
        events
    }

    fn collisions(events: &[DuelEvent]) -> Vec<(PlayerSlot, CollisionCause)> {
        events
            .iter()
            .filter_map(|e| match *e {
                DuelEvent::Collided { slot, cause } => Some((slot, cause)),
                _ => None,
            })
            .collect()
    }

    #[test]
    fn new_duel_indexes_spawn_cells() {
        let game = duel(&small_duel_config());
        assert!(game.is_running());
        assert_eq!(game.ticks(), 0);
        assert_eq!(game.board_size(), (100.0, 100.0));
        assert!(game.occupancy(PlayerSlot::One).contains(GridPoint { x: 200, y: 500 }));
        assert!(game.occupancy(PlayerSlot::Two).contains(GridPoint { x: 800, y: 500 }));
        assert!(game.occupancy_is_consistent());
    }

    #[test]
    fn tick_moves_both_riders_and_extends_trails() {
        let mut game = duel(&small_duel_config());
        let mut renderer = RecordingRenderer::new();

        let events = game.advance_one_tick(&mut renderer);

        assert!(events.is_empty());
        assert_eq!(game.ticks(), 1);
        assert_eq!(game.state().player(PlayerSlot::One).position, Point::new(20.0, 49.0));
        assert_eq!(game.state().player(PlayerSlot::Two).position, Point::new(80.0, 49.0));
        assert_eq!(game.state().trail(PlayerSlot::One).len(), 2);
        assert_eq!(game.occupancy(PlayerSlot::One).len(), 2);
    }

    #[test]
    fn frame_draws_trail_then_body_in_slot_order() {
        let mut game = duel(&small_duel_config());
        let mut renderer = RecordingRenderer::new();
        game.advance_one_tick(&mut renderer);

        let calls = renderer.take();
        assert_eq!(calls.len(), 6);
        assert_eq!(calls[0], DrawCall::Clear);
        assert!(matches!(&calls[1], DrawCall::Trail { name, .. } if name == "One"));
        assert!(matches!(&calls[2], DrawCall::Player { name, .. } if name == "One"));
        assert!(matches!(&calls[3], DrawCall::Trail { name, .. } if name == "Two"));
        assert!(matches!(&calls[4], DrawCall::Player { name, .. } if name == "Two"));
        assert_eq!(calls[5], DrawCall::Update);
    }

    #[test]
    fn head_on_riders_produce_exactly_one_collision() {
        let config = duel_config(
            100.0,
            100.0,
            player_config("One", (20.0, 50.0), Direction::Right),
            player_config("Two", (80.0, 50.0), Direction::Left),
        );
        let mut game = duel(&config);

        let events = run_until_over(&mut game, 200);

        assert!(!game.is_running());
        assert_eq!(
            collisions(&events),
            vec![(PlayerSlot::Two, CollisionCause::OpponentTrail)]
        );
        assert_eq!(game.state().winner(), Some(PlayerSlot::One));
        assert_eq!(
            events.last(),
            Some(&DuelEvent::MatchOver {
                winner: Some(PlayerSlot::One)
            })
        );
        assert_eq!(game.ticks(), 30);
    }

    #[test]
    fn reversal_request_is_ignored() {
        let mut game = duel(&small_duel_config());
        let mut renderer = RecordingRenderer::new();

        assert!(!game.queue_direction_change(PlayerSlot::One, Direction::Down));
        assert_eq!(game.pending_direction(PlayerSlot::One), None);
        let events = game.advance_one_tick(&mut renderer);

        assert!(events.is_empty());
        assert_eq!(game.state().player(PlayerSlot::One).direction, Direction::Up);
        assert_eq!(game.state().player(PlayerSlot::One).position, Point::new(20.0, 49.0));
    }

    #[test]
    fn left_edge_is_hit_exactly_when_body_crosses_it() {
        let config = duel_config(
            100.0,
            100.0,
            player_config("One", (10.0, 50.0), Direction::Left),
            player_config("Two", (80.0, 50.0), Direction::Up),
        );
        let mut game = duel(&config);
        let mut renderer = RecordingRenderer::new();

        // x: 9, 8, 7, 6, 5 are all still inside with radius 5
        for _ in 0..5 {
            game.advance_one_tick(&mut renderer);
            assert!(game.is_running());
        }
        assert_eq!(game.state().player(PlayerSlot::One).position.x, 5.0);

        let events = game.advance_one_tick(&mut renderer);
        assert_eq!(game.state().player(PlayerSlot::One).position.x, 4.0);
        assert_eq!(
            collisions(&events),
            vec![(PlayerSlot::One, CollisionCause::OutOfBounds)]
        );
        assert_eq!(game.state().winner(), Some(PlayerSlot::Two));
    }

    #[test]
    fn turn_pins_a_vertex_in_the_trail() {
        let mut game = duel(&small_duel_config());
        let mut renderer = RecordingRenderer::new();
        for _ in 0..3 {
            game.advance_one_tick(&mut renderer);
        }
        let corner = Point::new(20.0, 47.0);
        assert_eq!(game.state().player(PlayerSlot::One).position, corner);

        assert!(game.queue_direction_change(PlayerSlot::One, Direction::Left));
        let events = game.advance_one_tick(&mut renderer);

        assert_eq!(
            events,
            vec![DuelEvent::Turned {
                slot: PlayerSlot::One,
                direction: Direction::Left
            }]
        );
        let points: Vec<Point> = game.state().trail(PlayerSlot::One).points().copied().collect();
        assert_eq!(
            points,
            vec![
                Point::new(20.0, 50.0),
                Point::new(20.0, 49.0),
                Point::new(20.0, 48.0),
                corner,
                corner,
                Point::new(19.0, 47.0),
            ]
        );
        let history = game.state().player(PlayerSlot::One).history();
        assert_eq!(&history[history.len() - 2..], &[corner, Point::new(19.0, 47.0)]);
        assert_eq!(game.pending_direction(PlayerSlot::One), None);
        assert!(game.occupancy_is_consistent());
    }

    #[test]
    fn only_latest_queued_turn_is_applied() {
        let mut game = duel(&small_duel_config());
        let mut renderer = RecordingRenderer::new();

        game.queue_direction_change(PlayerSlot::Two, Direction::Left);
        game.queue_direction_change(PlayerSlot::Two, Direction::Down);
        game.queue_direction_change(PlayerSlot::Two, Direction::Right);
        let events = game.advance_one_tick(&mut renderer);

        assert_eq!(
            events,
            vec![DuelEvent::Turned {
                slot: PlayerSlot::Two,
                direction: Direction::Right
            }]
        );
        assert_eq!(game.state().player(PlayerSlot::Two).position, Point::new(81.0, 50.0));
    }

    #[test]
    fn turning_back_into_own_trail_is_a_crash() {
        let mut game = duel(&small_duel_config());
        let mut renderer = RecordingRenderer::new();

        // Up to y=48, right one step, down two steps, then left into the spawn cell.
        game.advance_one_tick(&mut renderer);
        game.advance_one_tick(&mut renderer);
        game.queue_direction_change(PlayerSlot::One, Direction::Right);
        game.advance_one_tick(&mut renderer);
        game.queue_direction_change(PlayerSlot::One, Direction::Down);
        game.advance_one_tick(&mut renderer);
        game.advance_one_tick(&mut renderer);
        assert!(game.is_running());
        assert_eq!(game.state().player(PlayerSlot::One).position, Point::new(21.0, 50.0));

        game.queue_direction_change(PlayerSlot::One, Direction::Left);
        let events = game.advance_one_tick(&mut renderer);

        assert_eq!(
            collisions(&events),
            vec![(PlayerSlot::One, CollisionCause::OwnTrail)]
        );
        assert_eq!(game.state().winner(), Some(PlayerSlot::Two));
    }

    fn play_turning_match(game: &mut LightCycleDuel) {
        let mut renderer = RecordingRenderer::new();
        for tick in 1..=20 {
            if tick == 3 {
                game.queue_direction_change(PlayerSlot::One, Direction::Right);
                game.queue_direction_change(PlayerSlot::Two, Direction::Left);
            }
            if tick == 12 {
                game.queue_direction_change(PlayerSlot::One, Direction::Down);
            }
            game.advance_one_tick(&mut renderer);
        }
        assert!(game.is_running());
    }

    #[test]
    fn trail_rebuild_matches_index_until_eviction() {
        let mut game = duel(&small_duel_config());
        play_turning_match(&mut game);

        for slot in PlayerSlot::BOTH {
            let from_trail = OccupancyIndex::rebuild(game.state().trail(slot).points());
            assert_eq!(&from_trail, game.occupancy(slot), "{slot:?}");
        }
        assert!(game.occupancy_is_consistent());
    }

    #[test]
    fn evicted_trail_points_stay_occupied() {
        let config = lightcycle_core::config::GameConfig {
            trail_max_length: 5,
            ..small_duel_config()
        };
        let mut game = duel(&config);
        play_turning_match(&mut game);

        for slot in PlayerSlot::BOTH {
            let trail = game.state().trail(slot);
            assert_eq!(trail.len(), 5);
            let from_trail = OccupancyIndex::rebuild(trail.points());
            assert!(from_trail.len() < game.occupancy(slot).len(), "{slot:?}");
            assert!(
                trail
                    .points()
                    .all(|p| game.occupancy(slot).contains(GridPoint::from_point(*p)))
            );
            // The spawn cell has left the trail but still blocks.
            assert!(game.occupancy(slot).contains(GridPoint::from_point(
                game.state().player(slot).spawn().position
            )));
        }
        assert!(game.occupancy_is_consistent());
    }

    #[test]
    fn straight_line_never_self_collides() {
        let config = duel_config(
            1000.0,
            1000.0,
            player_config("One", (20.0, 500.0), Direction::Right),
            player_config("Two", (500.0, 980.0), Direction::Up),
        );
        let mut game = duel(&config);
        let mut renderer = RecordingRenderer::new();
        for _ in 0..400 {
            game.advance_one_tick(&mut renderer);
        }
        assert!(game.is_running());
        assert!(game.occupancy_is_consistent());
    }

    #[test]
    fn simultaneous_crash_is_resolved_in_slot_order() {
        // Known asymmetry: when both riders crash on the same tick, player
        // one is checked first, loses, and player two is named the winner.
        let config = duel_config(
            100.0,
            100.0,
            player_config("One", (10.0, 50.0), Direction::Left),
            player_config("Two", (90.0, 50.0), Direction::Right),
        );
        let mut game = duel(&config);

        let events = run_until_over(&mut game, 50);

        assert_eq!(
            collisions(&events),
            vec![
                (PlayerSlot::One, CollisionCause::OutOfBounds),
                (PlayerSlot::Two, CollisionCause::OutOfBounds),
            ]
        );
        assert_eq!(game.state().winner(), Some(PlayerSlot::Two));
    }

    #[test]
    fn collision_frame_is_rendered_before_game_over() {
        let config = duel_config(
            100.0,
            100.0,
            player_config("One", (6.0, 50.0), Direction::Left),
            player_config("Two", (80.0, 50.0), Direction::Up),
        );
        let mut game = duel(&config);
        let mut renderer = RecordingRenderer::new();

        game.advance_one_tick(&mut renderer);
        game.advance_one_tick(&mut renderer);
        assert!(!game.is_running());
        let calls = renderer.take();
        assert!(calls.iter().all(|c| !matches!(c, DrawCall::GameOver { .. })));
        assert!(matches!(
            &calls[calls.len() - 2],
            DrawCall::Player { name, position } if name == "Two" && *position == Point::new(80.0, 48.0)
        ));
    }

    #[test]
    fn finished_match_only_redraws_game_over() {
        let config = duel_config(
            100.0,
            100.0,
            player_config("One", (6.0, 50.0), Direction::Left),
            player_config("Two", (80.0, 50.0), Direction::Up),
        );
        let mut game = duel(&config);
        run_until_over(&mut game, 10);
        let before = game.state().clone();
        let ticks = game.ticks();
        let mut renderer = RecordingRenderer::new();

        for _ in 0..3 {
            assert!(!game.queue_direction_change(PlayerSlot::Two, Direction::Left));
            assert!(game.advance_one_tick(&mut renderer).is_empty());
        }

        assert_eq!(game.state(), &before);
        assert_eq!(game.ticks(), ticks);
        let frame = vec![
            DrawCall::Clear,
            DrawCall::GameOver {
                winner: Some("Two".to_string()),
            },
            DrawCall::Update,
        ];
        assert_eq!(renderer.take(), [frame.clone(), frame.clone(), frame].concat());
    }

    #[test]
    fn reset_starts_a_fresh_match() {
        let config = duel_config(
            100.0,
            100.0,
            player_config("One", (6.0, 50.0), Direction::Left),
            player_config("Two", (80.0, 50.0), Direction::Up),
        );
        let mut game = duel(&config);
        run_until_over(&mut game, 10);
        assert!(!game.is_running());

        game.reset();

        assert!(game.is_running());
        assert_eq!(game.ticks(), 0);
        assert_eq!(game.state().winner(), None);
        assert_eq!(game.occupancy(PlayerSlot::One).len(), 1);
        assert!(game.occupancy_is_consistent());
        assert_eq!(game.state().player(PlayerSlot::One).position, Point::new(6.0, 50.0));
    }

    #[test]
    fn default_match_ends_when_player_one_hits_the_top_wall() {
        let mut game = LightCycleDuel::from_config(&GameConfig::default()).unwrap();
        let events = run_until_over(&mut game, 2000);
        assert!(!game.is_running());
        // Both riders head up at the same speed; the first-checked rider loses.
        assert_eq!(
            collisions(&events),
            vec![
                (PlayerSlot::One, CollisionCause::OutOfBounds),
                (PlayerSlot::Two, CollisionCause::OutOfBounds),
            ]
        );
        assert_eq!(game.state().winner(), Some(PlayerSlot::Two));
    }

    mod proptests {
        use super::*;
        use proptest::prelude::*;

        fn any_direction() -> impl Strategy<Value = Direction> {
            prop::sample::select(Direction::ALL.to_vec())
        }

        proptest! {
            #[test]
            fn occupancy_stays_reconcilable(
                turns in prop::collection::vec(
                    (any_direction(), any_direction(), 1usize..20),
                    1..20,
                ),
            ) {
                let config = duel_config(
                    400.0,
                    400.0,
                    player_config("One", (100.0, 200.0), Direction::Up),
                    player_config("Two", (300.0, 200.0), Direction::Down),
                );
                let mut game = LightCycleDuel::from_config(&config).unwrap();
                let mut renderer = RecordingRenderer::new();

                for (one, two, steps) in turns {
                    game.queue_direction_change(PlayerSlot::One, one);
                    game.queue_direction_change(PlayerSlot::Two, two);
                    for _ in 0..steps {
                        game.advance_one_tick(&mut renderer);
                    }
                    prop_assert!(game.occupancy_is_consistent());
                    prop_assert_eq!(game.state().winner().is_some(), !game.is_running());
                }
            }
        }
    }
}
