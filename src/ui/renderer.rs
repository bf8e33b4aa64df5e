/// Presentation layer: double-buffered, diff-based terminal renderer.
///
/// How it works:
///   1. Build the next frame into `front` buffer (array of Glyph)
///   2. Compare each glyph with `back` buffer (previous frame)
///   3. Only emit terminal commands for glyphs that changed
///   4. All commands are batched with `queue!`, flushed once at the end
///   5. Swap front/back
///
/// Screen layout, top to bottom: HUD line, first-person view (with the
/// minimap in its top-right corner), message bar, help bar.

use std::f32::consts::{FRAC_PI_2, FRAC_PI_3, TAU};
use std::io::{self, BufWriter, Write};

use crossterm::{
    cursor::{self, MoveTo},
    event::{
        DisableMouseCapture, EnableMouseCapture, KeyboardEnhancementFlags,
        PopKeyboardEnhancementFlags, PushKeyboardEnhancementFlags,
    },
    execute, queue,
    style::{Color, Print, ResetColor, SetBackgroundColor, SetForegroundColor},
    terminal::{self, Clear, ClearType},
};

use mazewalk::domain::collision::Vec2;
use mazewalk::domain::navigator::SessionState;
use mazewalk::sim::session::Session;

use super::raycast::{cast_ray, Face};

// ── Glyph: the unit of the back-buffer ──

#[derive(Clone, Copy, PartialEq, Eq)]
struct Glyph {
    ch: char,
    fg: Color,
    bg: Color,
}

impl Glyph {
    /// Explicit dark background for all "empty" terminal cells, so the
    /// gap between rows matches the cell colour on VTE terminals.
    const BASE_BG: Color = Color::Rgb { r: 22, g: 22, b: 35 };

    const BLANK: Glyph = Glyph { ch: ' ', fg: Color::White, bg: Glyph::BASE_BG };

    /// Sentinel used to invalidate the back buffer.
    const INVALID: Glyph = Glyph { ch: '?', fg: Color::Magenta, bg: Color::Magenta };

    fn new(ch: char, fg: Color, bg: Color) -> Self {
        let bg = match bg {
            Color::Reset => Self::BASE_BG,
            other => other,
        };
        Glyph { ch, fg, bg }
    }
}

// ── FrameBuffer: a 2D grid of Glyphs ──

struct FrameBuffer {
    width: usize,
    height: usize,
    cells: Vec<Glyph>,
}

impl FrameBuffer {
    fn new(w: usize, h: usize) -> Self {
        FrameBuffer { width: w, height: h, cells: vec![Glyph::BLANK; w * h] }
    }

    fn resize(&mut self, w: usize, h: usize) {
        if self.width != w || self.height != h {
            self.width = w;
            self.height = h;
            self.cells = vec![Glyph::BLANK; w * h];
        }
    }

    fn clear(&mut self) {
        self.cells.fill(Glyph::BLANK);
    }

    fn set(&mut self, x: usize, y: usize, g: Glyph) {
        if x < self.width && y < self.height {
            self.cells[y * self.width + x] = g;
        }
    }

    fn get(&self, x: usize, y: usize) -> Glyph {
        if x < self.width && y < self.height {
            self.cells[y * self.width + x]
        } else {
            Glyph::BLANK
        }
    }

    fn put_str(&mut self, x: usize, y: usize, s: &str, fg: Color, bg: Color) {
        for (i, ch) in s.chars().enumerate() {
            if x + i >= self.width { break; }
            self.set(x + i, y, Glyph::new(ch, fg, bg));
        }
    }

    fn fill_row(&mut self, y: usize, bg: Color) {
        for x in 0..self.width {
            self.set(x, y, Glyph::new(' ', Color::White, bg));
        }
    }
}

// ── Per-frame info the session does not own ──

pub struct Overlay<'a> {
    pub seed: u64,
    pub paused: bool,
    pub message: &'a str,
    pub gamepad: bool,
}

/// Remembers which maze and state the last frame showed.
#[derive(Default)]
struct SceneTracker {
    last: Option<(u64, SessionState)>,
}

impl SceneTracker {
    /// True when the seed or session state differs from the previous call.
    fn changed(&mut self, seed: u64, state: SessionState) -> bool {
        let now = Some((seed, state));
        let changed = self.last != now;
        self.last = now;
        changed
    }
}

// ── Renderer ──

const HUD_ROW: usize = 0;
const VIEW_ROW: usize = 1;
/// HUD + message + help.
const RESERVED_ROWS: usize = 3;
const FOV: f32 = FRAC_PI_3;

const HUD_BG: Color = Color::Rgb { r: 20, g: 20, b: 60 };
const MSG_BG: Color = Color::Rgb { r: 200, g: 180, b: 50 };
const CEILING: Color = Color::Rgb { r: 28, g: 30, b: 48 };
const GOAL_FLOOR: Color = Color::Rgb { r: 40, g: 160, b: 70 };

pub struct Renderer {
    writer: BufWriter<io::Stdout>,
    front: FrameBuffer,
    back: FrameBuffer,
    term_w: usize,
    term_h: usize,
    scene: SceneTracker,
    keyboard_enhanced: bool,
}

impl Renderer {
    pub fn new() -> Self {
        Renderer {
            writer: BufWriter::with_capacity(16384, io::stdout()),
            front: FrameBuffer::new(0, 0),
            back: FrameBuffer::new(0, 0),
            term_w: 0,
            term_h: 0,
            scene: SceneTracker::default(),
            keyboard_enhanced: false,
        }
    }

    /// Enter raw alternate-screen mode. Returns whether the terminal
    /// reports key release events.
    pub fn init(&mut self) -> io::Result<bool> {
        terminal::enable_raw_mode()?;
        execute!(
            self.writer,
            terminal::EnterAlternateScreen,
            cursor::Hide,
            EnableMouseCapture,
            SetBackgroundColor(Glyph::BASE_BG),
            Clear(ClearType::All)
        )?;

        if terminal::supports_keyboard_enhancement().unwrap_or(false) {
            execute!(
                self.writer,
                PushKeyboardEnhancementFlags(KeyboardEnhancementFlags::REPORT_EVENT_TYPES)
            )?;
            self.keyboard_enhanced = true;
        }
        log::debug!("keyboard enhancement: {}", self.keyboard_enhanced);

        let (tw, th) = terminal::size().unwrap_or((80, 24));
        self.term_w = tw as usize;
        self.term_h = th as usize;
        self.front.resize(self.term_w, self.term_h);
        self.back.resize(self.term_w, self.term_h);
        self.back.cells.fill(Glyph::INVALID);

        Ok(self.keyboard_enhanced)
    }

    pub fn cleanup(&mut self) -> io::Result<()> {
        if self.keyboard_enhanced {
            execute!(self.writer, PopKeyboardEnhancementFlags)?;
        }
        execute!(
            self.writer,
            DisableMouseCapture,
            ResetColor,
            cursor::Show,
            terminal::LeaveAlternateScreen
        )?;
        terminal::disable_raw_mode()
    }

    pub fn render(&mut self, session: &Session, overlay: &Overlay) -> io::Result<()> {
        let (tw, th) = terminal::size().unwrap_or((80, 24));
        if tw as usize != self.term_w || th as usize != self.term_h {
            self.term_w = tw as usize;
            self.term_h = th as usize;
            self.front.resize(self.term_w, self.term_h);
            self.back.resize(self.term_w, self.term_h);
            self.invalidate()?;
        }

        // New maze or win: repaint everything.
        if self.scene.changed(overlay.seed, session.state()) {
            self.invalidate()?;
        }

        self.front.clear();
        let view_h = self.term_h.saturating_sub(RESERVED_ROWS).max(1);

        self.compose_hud(session, overlay);
        self.compose_view(session, view_h);
        self.compose_minimap(session, view_h);
        self.compose_bars(overlay, view_h);
        if overlay.paused {
            self.compose_pause_overlay(view_h);
        }

        self.flush_diff()?;
        std::mem::swap(&mut self.front, &mut self.back);
        Ok(())
    }

    /// Force a full repaint on the next flush.
    pub fn invalidate(&mut self) -> io::Result<()> {
        self.back.cells.fill(Glyph::INVALID);
        queue!(self.writer, SetBackgroundColor(Glyph::BASE_BG), Clear(ClearType::All))
    }

    // ── Diff flush: only write changed glyphs ──

    fn flush_diff(&mut self) -> io::Result<()> {
        let mut last_fg = Color::White;
        let mut last_bg = Glyph::BASE_BG;
        let mut need_move = true;
        let mut last_x: usize = 0;
        let mut last_y: usize = 0;

        // Explicit base colours; ResetColor would fall back to the
        // terminal default and leave line artifacts.
        queue!(self.writer, SetForegroundColor(Color::White), SetBackgroundColor(Glyph::BASE_BG))?;

        for y in 0..self.front.height {
            for x in 0..self.front.width {
                let g = self.front.get(x, y);
                if g == self.back.get(x, y) {
                    need_move = true;
                    continue;
                }

                if need_move || x != last_x + 1 || y != last_y {
                    queue!(self.writer, MoveTo(x as u16, y as u16))?;
                    need_move = false;
                }
                if g.fg != last_fg {
                    queue!(self.writer, SetForegroundColor(g.fg))?;
                    last_fg = g.fg;
                }
                if g.bg != last_bg {
                    queue!(self.writer, SetBackgroundColor(g.bg))?;
                    last_bg = g.bg;
                }
                queue!(self.writer, Print(g.ch))?;
                last_x = x;
                last_y = y;
            }
        }

        self.writer.flush()
    }

    // ── Compose: build front buffer content ──

    fn compose_hud(&mut self, session: &Session, overlay: &Overlay) {
        let (row, col) = session.navigator_cell();
        let state = match session.state() {
            SessionState::Exploring => "EXPLORING",
            SessionState::Won => "SOLVED",
        };
        let pad = if overlay.gamepad { "  [pad]" } else { "" };
        let hud = format!(
            " Maze {}x{}  seed {}  cell ({}, {})  {}{} ",
            session.grid().rows(),
            session.grid().cols(),
            overlay.seed,
            row,
            col,
            state,
            pad,
        );
        self.front.fill_row(HUD_ROW, HUD_BG);
        self.front.put_str(0, HUD_ROW, &hud, Color::White, HUD_BG);
    }

    /// First-person view: one ray per terminal column, walls scaled by
    /// inverse perpendicular distance, floor cells of the goal tinted.
    fn compose_view(&mut self, session: &Session, view_h: usize) {
        let view_w = self.term_w;
        if view_w == 0 {
            return;
        }
        let grid = session.grid();
        let nav = session.navigator();
        let cs = session.tuning().cell_size;
        let goal = session.goal();
        let show_goal = session.goal_visible();

        let max_distance = cs * (grid.rows() + grid.cols()) as f32;
        let proj = view_h as f32;
        let half = view_h as f32 / 2.0;
        // Looking up moves the horizon down the screen.
        let horizon = half + (nav.pitch / FRAC_PI_2) * half;

        for x in 0..view_w {
            let t = (x as f32 + 0.5) / view_w as f32;
            let angle = nav.yaw - FOV / 2.0 + FOV * t;
            let diff_cos = (angle - nav.yaw).cos().max(1e-3);
            let hit = cast_ray(grid, nav.position, angle, cs, max_distance);

            let perp = (hit.distance * diff_cos).max(1e-3);
            let half_wall = proj * (cs / 2.0) / perp;
            let top = horizon - half_wall;
            let bottom = horizon + half_wall;
            let (wall_ch, wall_fg) = wall_shade(perp / cs, hit.face);

            for y in 0..view_h {
                let yf = y as f32 + 0.5;
                let glyph = if yf < top {
                    Glyph::new(' ', Color::White, CEILING)
                } else if yf <= bottom {
                    Glyph::new(wall_ch, wall_fg, Glyph::BASE_BG)
                } else {
                    let floor_perp = proj * (cs / 2.0) / (yf - horizon);
                    let reach = floor_perp / diff_cos;
                    let p = Vec2::new(nav.position.x + angle.cos() * reach, nav.position.z + angle.sin() * reach);
                    let on_goal = show_goal
                        && grid.world_to_cell(p.x, p.z, cs) == Some((goal.row, goal.col));
                    if on_goal {
                        Glyph::new(' ', Color::White, GOAL_FLOOR)
                    } else {
                        Glyph::new(' ', Color::White, floor_shade(floor_perp / cs))
                    }
                };
                self.front.set(x, VIEW_ROW + y, glyph);
            }
        }
    }

    /// Top-down map in the view's top-right corner, one column per cell.
    /// Skipped when the terminal is too small to hold it.
    fn compose_minimap(&mut self, session: &Session, view_h: usize) {
        let grid = session.grid();
        if grid.rows() > view_h || grid.cols() + 20 > self.term_w {
            return;
        }
        let x0 = self.term_w - grid.cols() - 1;
        let wall_bg = Color::Rgb { r: 90, g: 90, b: 110 };
        let path_bg = Color::Rgb { r: 10, g: 10, b: 18 };

        for (r, cells) in grid.iter_rows().enumerate() {
            for (c, cell) in cells.iter().enumerate() {
                let bg = if cell.is_wall() { wall_bg } else { path_bg };
                self.front.set(x0 + c, VIEW_ROW + r, Glyph::new(' ', Color::White, bg));
            }
        }

        self.front.set(x0, VIEW_ROW, Glyph::new('S', Color::Rgb { r: 100, g: 200, b: 255 }, path_bg));
        if session.goal_visible() {
            let g = session.goal();
            self.front.set(x0 + g.col, VIEW_ROW + g.row, Glyph::new('G', Color::Black, GOAL_FLOOR));
        }

        let (row, col) = session.navigator_cell();
        if let (Ok(r), Ok(c)) = (usize::try_from(row), usize::try_from(col)) {
            if r < grid.rows() && c < grid.cols() {
                let arrow = heading_arrow(session.navigator().yaw);
                self.front.set(x0 + c, VIEW_ROW + r, Glyph::new(arrow, Color::Rgb { r: 255, g: 220, b: 50 }, path_bg));
            }
        }
    }

    fn compose_bars(&mut self, overlay: &Overlay, view_h: usize) {
        let msg_row = VIEW_ROW + view_h;
        if msg_row < self.front.height && !overlay.message.is_empty() {
            let msg = format!(" ◈ {} ", overlay.message);
            self.front.fill_row(msg_row, MSG_BG);
            self.front.put_str(0, msg_row, &msg, Color::Black, MSG_BG);
        }

        let help_row = msg_row + 1;
        if help_row < self.front.height {
            let help = " W/S:Move  A/D:Strafe  ←/→ Q/E:Turn  ↑/↓:Pitch  Drag:Look  N:New  P:Pause  Esc:Quit";
            self.front.put_str(0, help_row, help, Color::DarkGrey, Color::Reset);
        }
    }

    fn compose_pause_overlay(&mut self, view_h: usize) {
        let dim = Color::Rgb { r: 40, g: 40, b: 40 };
        let hdr = Color::Rgb { r: 255, g: 220, b: 50 };
        let key_c = Color::Rgb { r: 100, g: 200, b: 255 };

        let box_w = 32_usize.min(self.term_w);
        let box_h = 8_usize.min(view_h);
        let box_x = self.term_w.saturating_sub(box_w) / 2;
        let box_y = VIEW_ROW + view_h.saturating_sub(box_h) / 2;

        for y in box_y..box_y + box_h {
            for x in box_x..box_x + box_w {
                self.front.set(x, y, Glyph::new(' ', Color::Reset, dim));
            }
        }

        self.front.put_str(box_x + 11, box_y + 1, "PAUSED", hdr, dim);
        self.front.put_str(box_x + 2, box_y + 3, "P / F1  Resume", key_c, dim);
        self.front.put_str(box_x + 2, box_y + 4, "N       New maze", key_c, dim);
        self.front.put_str(box_x + 2, box_y + 5, "Esc     Quit", key_c, dim);
    }
}

/// Wall character and colour by distance in cells.
fn wall_shade(cells_away: f32, face: Face) -> (char, Color) {
    let ch = if cells_away < 1.5 {
        '█'
    } else if cells_away < 3.0 {
        '▓'
    } else if cells_away < 6.0 {
        '▒'
    } else {
        '░'
    };
    let fg = match face {
        Face::EastWest => Color::Rgb { r: 200, g: 200, b: 215 },
        Face::NorthSouth => Color::Rgb { r: 145, g: 145, b: 170 },
    };
    (ch, fg)
}

fn floor_shade(cells_away: f32) -> Color {
    let k = (60.0 - cells_away * 6.0).clamp(18.0, 60.0) as u8;
    Color::Rgb { r: k / 2, g: k / 2, b: k }
}

/// Map arrow for a yaw; yaw grows clockwise with +z pointing down the map.
fn heading_arrow(yaw: f32) -> char {
    const ARROWS: [char; 8] = ['→', '↘', '↓', '↙', '←', '↖', '↑', '↗'];
    let octant = (yaw.rem_euclid(TAU) / (TAU / 8.0) + 0.5).floor() as usize % 8;
    ARROWS[octant]
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::f32::consts::PI;

    #[test]
    fn heading_arrow_follows_map_orientation() {
        assert_eq!(heading_arrow(0.0), '→');
        assert_eq!(heading_arrow(FRAC_PI_2), '↓');
        assert_eq!(heading_arrow(PI), '←');
        assert_eq!(heading_arrow(-FRAC_PI_2), '↑');
        assert_eq!(heading_arrow(TAU - 0.01), '→');
    }

    #[test]
    fn new_maze_with_same_state_forces_repaint() {
        let mut scene = SceneTracker::default();
        assert!(scene.changed(7, SessionState::Exploring));
        assert!(!scene.changed(7, SessionState::Exploring));
        assert!(scene.changed(8, SessionState::Exploring));
        assert!(scene.changed(8, SessionState::Won));
        assert!(!scene.changed(8, SessionState::Won));
    }

    #[test]
    fn nearer_walls_are_denser() {
        assert_eq!(wall_shade(0.5, Face::EastWest).0, '█');
        assert_eq!(wall_shade(10.0, Face::EastWest).0, '░');
    }
}
