use crate::player::Player;
use crate::trail::Trail;

/// Drawing surface driven by the simulation.
///
/// A normal tick calls `clear`, then `draw_trail` and `draw_player` for each
/// rider in slot order, then `update`. Once the match is over every tick calls
/// `clear`, `draw_game_over`, `update`.
pub trait Renderer {
    /// Clear the drawing surface.
    fn clear(&mut self);

    /// Draw a rider's body.
    fn draw_player(&mut self, player: &Player);

    /// Draw a trail in the owning player's color.
    fn draw_trail(&mut self, player: &Player, trail: &Trail);

    /// Draw the game over overlay, naming the winner if there is one.
    fn draw_game_over(&mut self, winner: Option<&Player>);

    /// Present the frame.
    fn update(&mut self);

    /// Release whatever the renderer holds.
    fn close(&mut self);
}

/// Frame pacing for the host loop.
pub trait Clock {
    /// Block until one frame at `frame_rate` ticks per second has elapsed
    /// since the previous call.
    fn tick(&mut self, frame_rate: u32);
}
