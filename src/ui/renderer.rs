/// Presentation layer: double-buffered, diff-based terminal renderer.
///
/// How it works:
///   1. Build the next frame into `front` buffer (array of Cell)
///   2. Compare each cell with `back` buffer (previous frame)
///   3. Only emit terminal commands for cells that changed
///   4. All commands are batched with `queue!`, flushed once at the end
///   5. Swap front/back
///
/// This eliminates flicker caused by full-screen redraws.
///
/// The renderer is strictly a reader: it takes `&World` and never mutates
/// game state.

use std::io::{self, BufWriter, Write};

use crossterm::{
    cursor::{self, MoveTo},
    execute, queue,
    style::{Color, Print, ResetColor, SetBackgroundColor, SetForegroundColor},
    terminal::{self, Clear, ClearType},
};

use crate::domain::entity::{Facing, PlayerState};
use crate::domain::field::{FIELD_END_X, FIELD_START_X, VIEW_H, VIEW_W};
use crate::sim::world::{Phase, World};

// ── Cell: the unit of the back-buffer ──

#[derive(Clone, Copy, PartialEq, Eq)]
struct Cell {
    ch: char,
    fg: Color,
    bg: Color,
}

impl Cell {
    /// Explicit dark background for all "empty" terminal cells.
    ///
    /// On VTE-based Linux terminals the inter-row gap pixels use the
    /// background color from the last Clear or the terminal's configured
    /// default. Using the SAME explicit RGB for both `Clear(ClearType::All)`
    /// and every cell's background keeps the gap color consistent with the
    /// cell color, eliminating visible horizontal lines.
    const BASE_BG: Color = Color::Rgb { r: 22, g: 22, b: 35 };

    const BLANK: Cell = Cell {
        ch: ' ',
        fg: Color::White,
        bg: Cell::BASE_BG,
    };

    /// Sentinel cell used to invalidate the back buffer.
    /// Different from any real cell, so every position will be diff'd.
    const INVALID: Cell = Cell {
        ch: '?',
        fg: Color::Magenta,
        bg: Color::Magenta,
    };

    /// Normalize bg: Color::Reset becomes BASE_BG so that every cell gets
    /// an explicit background color (never terminal-default).
    #[inline]
    fn norm_bg(bg: Color) -> Color {
        match bg {
            Color::Reset => Self::BASE_BG,
            other => other,
        }
    }

    fn new(ch: char, fg: Color, bg: Color) -> Self {
        Cell { ch, fg, bg: Self::norm_bg(bg) }
    }
}

// ── FrameBuffer: a 2D grid of Cells ──

struct FrameBuffer {
    width: usize,
    height: usize,
    cells: Vec<Cell>,
}

impl FrameBuffer {
    fn new(w: usize, h: usize) -> Self {
        FrameBuffer {
            width: w,
            height: h,
            cells: vec![Cell::BLANK; w * h],
        }
    }

    fn resize(&mut self, w: usize, h: usize) {
        if self.width != w || self.height != h {
            self.width = w;
            self.height = h;
            self.cells = vec![Cell::BLANK; w * h];
        }
    }

    fn clear(&mut self) {
        self.cells.fill(Cell::BLANK);
    }

    fn set(&mut self, x: usize, y: usize, cell: Cell) {
        if x < self.width && y < self.height {
            self.cells[y * self.width + x] = cell;
        }
    }

    fn get(&self, x: usize, y: usize) -> Cell {
        if x < self.width && y < self.height {
            self.cells[y * self.width + x]
        } else {
            Cell::BLANK
        }
    }

    /// Write a string at (x, y) with given colors. Each char occupies 1 column.
    fn put_str(&mut self, x: usize, y: usize, s: &str, fg: Color, bg: Color) {
        let mut cx = x;
        for ch in s.chars() {
            if cx >= self.width {
                break;
            }
            self.set(cx, y, Cell::new(ch, fg, bg));
            cx += 1;
        }
    }
}

// ── Renderer ──

/// Each grid cell spans 3 terminal columns, enough for a small sprite.
const CELL_W: usize = 3;

/// Vertical layout.
const SCORE_ROW: usize = 0;
/// Top sideline row; playable rows follow, then the bottom sideline.
const FIELD_TOP: usize = 2;
const HELP_ROW: usize = FIELD_TOP + VIEW_H as usize + 3;

/// Terminal columns spanned by the viewport.
const VIEW_COLS: usize = VIEW_W as usize * CELL_W;

// Field palette.
const GRASS: Color = Color::Rgb { r: 22, g: 92, b: 30 };
const GRASS_STRIPE: Color = Color::Rgb { r: 32, g: 112, b: 40 };
const ENDZONE_ATTACK: Color = Color::Rgb { r: 130, g: 100, b: 10 };
const ENDZONE_OWN: Color = Color::Rgb { r: 20, g: 40, b: 110 };
const SIDELINE: Color = Color::Rgb { r: 200, g: 200, b: 200 };
const MARKER_FG: Color = Color::Rgb { r: 255, g: 220, b: 50 };
const SCORE_BG: Color = Color::Rgb { r: 20, g: 20, b: 60 };

pub struct Renderer {
    writer: BufWriter<io::Stdout>,
    front: FrameBuffer,
    back: FrameBuffer,
    term_w: usize,
    term_h: usize,
    last_phase: Option<Phase>,
}

impl Renderer {
    pub fn new() -> Self {
        Renderer {
            writer: BufWriter::with_capacity(16384, io::stdout()),
            front: FrameBuffer::new(0, 0),
            back: FrameBuffer::new(0, 0),
            term_w: 0,
            term_h: 0,
            last_phase: None,
        }
    }

    pub fn init(&mut self) -> io::Result<()> {
        terminal::enable_raw_mode()?;
        execute!(
            self.writer,
            terminal::EnterAlternateScreen,
            cursor::Hide,
            SetBackgroundColor(Cell::BASE_BG),
            Clear(ClearType::All)
        )?;

        let (tw, th) = terminal::size().unwrap_or((80, 24));
        self.term_w = tw as usize;
        self.term_h = th as usize;
        self.front.resize(self.term_w, self.term_h);
        self.back.resize(self.term_w, self.term_h);
        // Force full repaint on first frame: back ≠ front for every cell.
        self.back.cells.fill(Cell::INVALID);

        Ok(())
    }

    pub fn cleanup(&mut self) -> io::Result<()> {
        execute!(
            self.writer,
            ResetColor,
            cursor::Show,
            terminal::LeaveAlternateScreen
        )?;
        terminal::disable_raw_mode()
    }

    pub fn render(&mut self, world: &World) -> io::Result<()> {
        // Detect terminal resize
        let (tw, th) = terminal::size().unwrap_or((80, 24));
        if tw as usize != self.term_w || th as usize != self.term_h {
            self.term_w = tw as usize;
            self.term_h = th as usize;
            self.front.resize(self.term_w, self.term_h);
            self.back.resize(self.term_w, self.term_h);
            // Force full repaint after resize.
            self.back.cells.fill(Cell::INVALID);
            queue!(self.writer, SetBackgroundColor(Cell::BASE_BG), Clear(ClearType::All))?;
        }

        // Phase change: clear for a clean transition.
        let phase_changed = self.last_phase != Some(world.phase);
        if phase_changed {
            self.back.cells.fill(Cell::INVALID);
            queue!(self.writer, SetBackgroundColor(Cell::BASE_BG), Clear(ClearType::All))?;
            self.last_phase = Some(world.phase);
        }

        self.front.clear();

        match world.phase {
            Phase::Menu => self.compose_menu(),
            Phase::Ready | Phase::Playing | Phase::Tackled | Phase::Touchdown => {
                self.compose_game(world)
            }
            Phase::GameOver => {
                self.compose_game(world);
                self.compose_game_over(world);
            }
        }

        self.flush_diff()?;
        std::mem::swap(&mut self.front, &mut self.back);

        Ok(())
    }

    // ── Diff flush: only write changed cells ──

    fn flush_diff(&mut self) -> io::Result<()> {
        let mut last_fg = Color::White;
        let mut last_bg = Cell::BASE_BG;
        let mut need_move = true;
        let mut last_x: usize = 0;
        let mut last_y: usize = 0;

        // Set explicit base colors at start of frame.
        // IMPORTANT: Do NOT use ResetColor here — it resets to the terminal's
        // native default, which may differ from BASE_BG and cause artifacts.
        queue!(
            self.writer,
            SetForegroundColor(Color::White),
            SetBackgroundColor(Cell::BASE_BG),
        )?;

        for y in 0..self.front.height {
            for x in 0..self.front.width {
                let cell = self.front.get(x, y);
                let prev = self.back.get(x, y);

                if cell == prev {
                    need_move = true;
                    continue;
                }

                if need_move || x != last_x + 1 || y != last_y {
                    queue!(self.writer, MoveTo(x as u16, y as u16))?;
                    need_move = false;
                }

                if cell.fg != last_fg {
                    queue!(self.writer, SetForegroundColor(cell.fg))?;
                    last_fg = cell.fg;
                }
                if cell.bg != last_bg {
                    queue!(self.writer, SetBackgroundColor(cell.bg))?;
                    last_bg = cell.bg;
                }

                queue!(self.writer, Print(cell.ch))?;
                last_x = x;
                last_y = y;
            }
        }

        self.writer.flush()
    }

    // ── Game view ──

    fn compose_game(&mut self, w: &World) {
        self.compose_scoreboard(w);
        self.compose_field(w);
        self.compose_entities(w);

        match w.phase {
            Phase::Ready => self.compose_banner("GET READY", Color::Rgb { r: 80, g: 255, b: 80 }),
            Phase::Touchdown if w.show_td_sprite => {
                self.compose_banner("* TOUCHDOWN! *", MARKER_FG)
            }
            _ => {}
        }

        if HELP_ROW < self.front.height {
            let help = " Arrows/WASD: Run   ESC/Q: Quit";
            self.front.put_str(0, HELP_ROW, help, Color::DarkGrey, Color::Reset);
        }
    }

    fn compose_scoreboard(&mut self, w: &World) {
        let buf_w = self.front.width;
        for x in 0..buf_w {
            self.front.set(x, SCORE_ROW, Cell::new(' ', Color::White, SCORE_BG));
        }

        let down = w.attempts - w.downs.attempts_remaining + 1;
        let line = format!(
            " TIME {:>2}   SCORE {:>3}   DOWN {}/{}   YARDS {:>2} ",
            w.time_remaining, w.score, down.min(w.attempts), w.attempts, w.downs.yards_to_go,
        );
        self.front.put_str(0, SCORE_ROW, &line, Color::White, SCORE_BG);
    }

    /// Background color for a grid column: endzones, yard stripes, marker.
    fn column_bg(&self, w: &World, gx: i32) -> Color {
        if gx < FIELD_START_X {
            return ENDZONE_ATTACK;
        }
        if gx >= FIELD_END_X {
            return ENDZONE_OWN;
        }
        if gx == w.downs.marker_x {
            return Color::Rgb { r: 80, g: 110, b: 20 };
        }
        // Yard stripe every 5 columns, anchored at the attacking goal line.
        if (gx - FIELD_START_X) % 5 == 0 {
            GRASS_STRIPE
        } else {
            GRASS
        }
    }

    fn compose_field(&mut self, w: &World) {
        let cam_x = w.camera.x;
        let bottom = FIELD_TOP + 1 + VIEW_H as usize;

        for vx in 0..VIEW_W {
            let gx = cam_x + vx;
            let bg = self.column_bg(w, gx);
            let col = vx as usize * CELL_W;

            // Sidelines, with the first-down marker arrows on both.
            let on_marker = gx == w.downs.marker_x;
            for dx in 0..CELL_W {
                let (top_ch, bot_ch) = if on_marker && dx == 1 {
                    ('v', '^')
                } else {
                    ('=', '=')
                };
                let side_fg = if on_marker { MARKER_FG } else { Color::Rgb { r: 60, g: 60, b: 60 } };
                self.front.set(col + dx, FIELD_TOP, Cell::new(top_ch, side_fg, SIDELINE));
                self.front.set(col + dx, bottom, Cell::new(bot_ch, side_fg, SIDELINE));
            }

            // Playable rows.
            for gy in 0..VIEW_H {
                let row = FIELD_TOP + 1 + gy as usize;
                for dx in 0..CELL_W {
                    let ch = if gx < FIELD_START_X && gy == VIEW_H / 2 && dx == 1 {
                        // Goal text dotting the attacking endzone.
                        '*'
                    } else {
                        ' '
                    };
                    self.front.set(col + dx, row, Cell::new(ch, Color::Rgb { r: 200, g: 170, b: 40 }, bg));
                }
            }
        }
    }

    /// Map a grid cell to the leftmost terminal column of its sprite,
    /// if visible through the camera.
    fn sprite_pos(&self, w: &World, gx: i32, gy: i32) -> Option<(usize, usize)> {
        let vx = gx - w.camera.x;
        if vx < 0 || vx >= VIEW_W || gy < 0 || gy >= VIEW_H {
            return None;
        }
        Some((vx as usize * CELL_W, FIELD_TOP + 1 + gy as usize))
    }

    fn put_sprite(&mut self, col: usize, row: usize, sprite: &str, fg: Color, bg: Color) {
        self.front.put_str(col, row, sprite, fg, bg);
    }

    fn compose_entities(&mut self, w: &World) {
        let white = Color::Rgb { r: 235, g: 235, b: 235 };
        let defender_fg = Color::Rgb { r: 220, g: 60, b: 60 };
        let referee_fg = Color::Rgb { r: 30, g: 30, b: 30 };

        // Knocked-down defenders first, so standing bodies draw over them.
        for d in &w.defenders {
            if !d.knocked_down {
                continue;
            }
            if let Some((col, row)) = self.sprite_pos(w, d.x, d.y) {
                let bg = self.column_bg(w, d.x);
                self.put_sprite(col, row, "_x_", defender_fg, bg);
            }
        }

        for r in &w.referees {
            if let Some((col, row)) = self.sprite_pos(w, r.x, r.y) {
                let bg = self.column_bg(w, r.x);
                let sprite = match r.facing {
                    Facing::Left => "<R|",
                    Facing::Right => "|R>",
                };
                self.put_sprite(col, row, sprite, referee_fg, bg);
            }
        }

        for d in &w.defenders {
            if d.knocked_down {
                continue;
            }
            if let Some((col, row)) = self.sprite_pos(w, d.x, d.y) {
                let bg = self.column_bg(w, d.x);
                let sprite = match d.facing {
                    Facing::Left => "<D|",
                    Facing::Right => "|D>",
                };
                self.put_sprite(col, row, sprite, defender_fg, bg);
            }
        }

        // The tackler, posed over the runner's neighbor cell.
        if w.phase == Phase::Tackled {
            if let Some((tx, ty)) = w.tackle_source {
                if let Some((col, row)) = self.sprite_pos(w, tx, ty) {
                    let bg = self.column_bg(w, tx);
                    self.put_sprite(col, row, ">D<", defender_fg, bg);
                }
            }
        }

        // Runner last, always on top. Hidden during the blink-off phases
        // of the touchdown celebration.
        if w.phase == Phase::Touchdown && !w.show_td_sprite {
            return;
        }
        if let Some((col, row)) = self.sprite_pos(w, w.player.x, w.player.y) {
            let bg = self.column_bg(w, w.player.x);
            let sprite = player_sprite(w);
            self.put_sprite(col, row, sprite, white, bg);
        }
    }

    /// Centered one-line banner over the field.
    fn compose_banner(&mut self, text: &str, fg: Color) {
        let row = FIELD_TOP + 1 + VIEW_H as usize / 2;
        let cx = VIEW_COLS.saturating_sub(text.len()) / 2;
        self.front.put_str(cx, row, text, fg, Color::Rgb { r: 10, g: 10, b: 10 });
    }

    // ── Static screens ──

    fn compose_menu(&mut self) {
        let title = [
            r"  ___  ___  ___  ___   ___  ___  ___  _  _ ",
            r" | __|| _ \|_ _||   \ |_ _|| _ \/ _ \| \| |",
            r" | _| |   / | | | |) | | | |   / (_) | .` |",
            r" |___||_|_\|___||___/ |___||_|_\\___/|_|\_|",
        ];
        for (i, line) in title.iter().enumerate() {
            self.front.put_str(2, 2 + i, line, MARKER_FG, Color::Reset);
        }

        let subtitle = "== Terminal Gridiron ==";
        self.front.put_str(12, 7, subtitle, Color::Rgb { r: 80, g: 255, b: 80 }, Color::Reset);

        let menu_base = 10;
        self.front.put_str(8, menu_base, "ENTER   Kickoff", Color::Rgb { r: 80, g: 255, b: 80 }, Color::Reset);
        self.front.put_str(8, menu_base + 1, "  Q     Quit", Color::White, Color::Reset);

        let help = [
            "How to play",
            "  Arrows / WASD   Run with the ball (leftward!)",
            "  Run into a defender to juke past him: +1 point",
            "  Reach the far endzone for a touchdown: +7",
            "  Four downs to gain ten yards, sixty seconds on the clock",
        ];
        let help_base = menu_base + 3;
        for (i, line) in help.iter().enumerate() {
            let color = if i == 0 { MARKER_FG } else { Color::White };
            self.front.put_str(8, help_base + i, line, color, Color::Reset);
        }
    }

    fn compose_game_over(&mut self, w: &World) {
        let headline = if w.time_remaining == 0 {
            "+===========================+
|        TIME'S  UP!        |
+===========================+"
        } else {
            "+===========================+
|        GAME  OVER         |
+===========================+"
        };

        let top = FIELD_TOP + 1;
        let cx = VIEW_COLS.saturating_sub(29) / 2;
        for (i, line) in headline.lines().enumerate() {
            self.front.put_str(cx, top + i, line, Color::Rgb { r: 255, g: 60, b: 60 }, Color::Rgb { r: 10, g: 10, b: 10 });
        }

        let score = format!("  Final score: {}", w.score);
        self.front.put_str(cx, top + 4, &score, Color::White, Color::Reset);
        self.front.put_str(cx, top + 6, "  SPACE: Play again   ESC: Quit", Color::Rgb { r: 80, g: 255, b: 80 }, Color::Reset);
    }
}

/// Pick the runner's three-column pose from facing, run state and stride.
fn player_sprite(w: &World) -> &'static str {
    if w.phase == Phase::Tackled {
        return "_O_";
    }
    match w.player.state {
        PlayerState::Stand => match w.player.facing {
            Facing::Left => "<O|",
            Facing::Right => "|O>",
        },
        PlayerState::RunSide => match w.player.facing {
            Facing::Left => "<O/",
            Facing::Right => r"\O>",
        },
        PlayerState::RunUp => {
            if w.player.step_left_foot { "/O|" } else { "|O\\" }
        }
        PlayerState::RunDown => {
            if w.player.step_left_foot { "\\O|" } else { "|O/" }
        }
    }
}
