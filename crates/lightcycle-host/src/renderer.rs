use std::io::Write;

use lightcycle_core::ports::Renderer;
use lightcycle_core::{Player, PlayerColor, Point, Trail};

pub const DEFAULT_COLUMNS: u16 = 64;
/// Upper bound for either grid dimension.
pub const MAX_CELLS: usize = 1024;

/// Draws the arena as a grid of characters.
///
/// Each cell covers a square of the board. Every cell touched by a trail's
/// width is marked with the lowercase initial of its rider, every cell under
/// a body with the uppercase initial. A light background shows as `.`. Only
/// every `render_every`-th frame is written; the game over banner is always
/// written.
pub struct TextRenderer<W: Write> {
    out: W,
    cell_size: f64,
    columns: usize,
    rows: usize,
    grid: Vec<char>,
    blank: char,
    banner: Option<String>,
    render_every: usize,
    frames: usize,
    failed: bool,
}

impl<W: Write> TextRenderer<W> {
    pub fn new(out: W, board_size: (f64, f64), columns: usize, render_every: usize) -> Self {
        let columns = columns.clamp(1, MAX_CELLS);
        let cell_size = (board_size.0 / columns as f64).max(f64::MIN_POSITIVE);
        let rows = ((board_size.1 / cell_size).ceil() as usize).clamp(1, MAX_CELLS);
        Self {
            out,
            cell_size,
            columns,
            rows,
            grid: vec![' '; columns * rows],
            blank: ' ',
            banner: None,
            render_every: render_every.max(1),
            frames: 0,
            failed: false,
        }
    }

    /// Fill empty cells according to the arena's background color.
    pub fn with_background(mut self, color: PlayerColor) -> Self {
        let luma = (299 * u32::from(color.r) + 587 * u32::from(color.g) + 114 * u32::from(color.b)) / 1000;
        self.blank = if luma > 127 { '.' } else { ' ' };
        self.grid.fill(self.blank);
        self
    }

    pub fn columns(&self) -> usize {
        self.columns
    }

    pub fn rows(&self) -> usize {
        self.rows
    }

    /// Frames presented so far, written or not.
    pub fn frames(&self) -> usize {
        self.frames
    }

    pub fn into_inner(self) -> W {
        self.out
    }

    /// Cells overlapping `[start, start + size)` along one axis, clipped to `0..limit`.
    fn span(&self, start: f64, size: f64, limit: usize) -> Option<(usize, usize)> {
        let first = (start / self.cell_size).floor();
        let last = ((start + size) / self.cell_size).ceil() - 1.0;
        if !first.is_finite() || !last.is_finite() || last < 0.0 || first >= limit as f64 {
            return None;
        }
        let first = first.max(0.0) as usize;
        let last = (last.max(first as f64) as usize).min(limit - 1);
        Some((first, last))
    }

    /// Mark every cell under the rectangle `(left, top, width, height)`.
    fn mark_rect(&mut self, (left, top, width, height): (f64, f64, f64, f64), glyph: char) {
        let Some((col_start, col_end)) = self.span(left, width, self.columns) else {
            return;
        };
        let Some((row_start, row_end)) = self.span(top, height, self.rows) else {
            return;
        };
        for row in row_start..=row_end {
            let line = row * self.columns;
            self.grid[line + col_start..=line + col_end].fill(glyph);
        }
    }

    fn mark_square(&mut self, center: Point, size: f64, glyph: char) {
        let half = size / 2.0;
        self.mark_rect((center.x - half, center.y - half, size, size), glyph);
    }

    fn mark_segment(&mut self, from: Point, to: Point, size: f64, glyph: char) {
        let length = (to.x - from.x).hypot(to.y - from.y);
        if !length.is_finite() {
            self.mark_square(from, size, glyph);
            self.mark_square(to, size, glyph);
            return;
        }
        // Half-cell sampling, but never more samples than the grid could show.
        let limit = 2 * (self.columns + self.rows);
        let steps = ((length / (self.cell_size / 2.0)).ceil() as usize).clamp(1, limit);
        for step in 0..=steps {
            let t = step as f64 / steps as f64;
            let point = Point::new(from.x + (to.x - from.x) * t, from.y + (to.y - from.y) * t);
            self.mark_square(point, size, glyph);
        }
    }

    fn write_frame(&mut self) -> std::io::Result<()> {
        let border = format!("+{}+", "-".repeat(self.columns));
        writeln!(self.out, "frame {}", self.frames)?;
        writeln!(self.out, "{border}")?;
        for row in self.grid.chunks(self.columns) {
            let line: String = row.iter().collect();
            writeln!(self.out, "|{line}|")?;
        }
        writeln!(self.out, "{border}")
    }

    fn write_banner(&mut self, banner: &str) -> std::io::Result<()> {
        writeln!(self.out, "GAME OVER")?;
        writeln!(self.out, "{banner}")
    }

    fn report(&mut self, result: std::io::Result<()>) {
        if let Err(e) = result
            && !self.failed
        {
            self.failed = true;
            tracing::warn!(error = %e, "Text renderer output failed, dropping frames");
        }
    }
}

fn initial(player: &Player) -> char {
    player.name.chars().find(|c| !c.is_whitespace()).unwrap_or('?')
}

impl<W: Write> Renderer for TextRenderer<W> {
    fn clear(&mut self) {
        self.grid.fill(self.blank);
    }

    fn draw_player(&mut self, player: &Player) {
        let glyph = initial(player).to_ascii_uppercase();
        self.mark_rect(player.body_rect(), glyph);
    }

    fn draw_trail(&mut self, player: &Player, trail: &Trail) {
        let glyph = initial(player).to_ascii_lowercase();
        let size = f64::from(trail.width());
        if trail.len() == 1
            && let Some(&point) = trail.points().next()
        {
            self.mark_square(point, size, glyph);
        }
        for (from, to) in trail.segments() {
            self.mark_segment(from, to, size, glyph);
        }
    }

    fn draw_game_over(&mut self, winner: Option<&Player>) {
        let banner = match winner {
            Some(player) => format!("{} wins", player.name),
            None => "No winner".to_string(),
        };
        self.banner = Some(banner);
    }

    fn update(&mut self) {
        self.frames += 1;
        if self.failed {
            return;
        }
        let result = match self.banner.take() {
            Some(banner) => self.write_banner(&banner),
            None if self.frames % self.render_every == 0 => self.write_frame(),
            None => Ok(()),
        };
        self.report(result);
    }

    fn close(&mut self) {
        let result = self.out.flush();
        self.report(result);
    }
}
