//! Rendering layer — all terminal I/O lives here.
//!
//! Each function receives a mutable writer and an immutable view of the
//! game state.  No game logic is performed; this module only translates
//! state (in presentation units) into terminal cells.

use std::io::Write;

use crossterm::{
    cursor,
    style::{self, Color, Print},
    terminal,
    QueueableCommand,
};
use sweep_shooter::entities::{Adversary, AdversaryKind, GameState, Projectile, ScreenMode};

// ── Colour palette ────────────────────────────────────────────────────────────

const C_BORDER: Color = Color::DarkBlue;
const C_HUD_SCORE: Color = Color::Yellow;
const C_HUD_LIVES: Color = Color::Green;
const C_PLAYER: Color = Color::White;
const C_ADVERSARY: Color = Color::Red;
const C_LABEL: Color = Color::White;
const C_PROJECTILE: Color = Color::Cyan;
const C_HINT: Color = Color::DarkGrey;
const C_TITLE: Color = Color::Yellow;

// ── World → terminal mapping ──────────────────────────────────────────────────

/// Maps presentation units onto the cells inside the border.
/// Row 0 is the HUD, rows 1 and `rows - 2` are the border, the last row
/// holds the controls hint.
#[derive(Clone, Copy, Debug)]
struct Viewport {
    cols: u16,
    rows: u16,
    world_w: i32,
    world_h: i32,
}

impl Viewport {
    fn new(state: &GameState) -> std::io::Result<Self> {
        let (cols, rows) = terminal::size()?;
        Ok(Self {
            cols,
            rows,
            world_w: state.width.max(1),
            world_h: state.height.max(1),
        })
    }

    fn inner_cols(&self) -> i32 {
        self.cols.saturating_sub(2) as i32
    }

    fn inner_rows(&self) -> i32 {
        self.rows.saturating_sub(4) as i32
    }

    /// Cell for a world point, or `None` when it falls outside the play area.
    fn cell(&self, x: i32, y: i32) -> Option<(u16, u16)> {
        if x < 0 || y < 0 || x >= self.world_w || y >= self.world_h {
            return None;
        }
        let col = 1 + x as i64 * self.inner_cols() as i64 / self.world_w as i64;
        let row = 2 + y as i64 * self.inner_rows() as i64 / self.world_h as i64;
        Some((col as u16, row as u16))
    }

    /// Width of a world span in cells, at least one.
    fn span(&self, w: i32) -> usize {
        ((w as i64 * self.inner_cols() as i64 / self.world_w as i64).max(1)) as usize
    }
}

// ── Public entry points ───────────────────────────────────────────────────────

/// Render one complete frame for whatever screen the session is on.
pub fn render<W: Write>(out: &mut W, state: &GameState) -> std::io::Result<()> {
    let view = Viewport::new(state)?;
    out.queue(terminal::Clear(terminal::ClearType::All))?;

    match state.session.mode {
        ScreenMode::Start => draw_menu(out, &view)?,
        ScreenMode::Config => draw_controls(out, &view)?,
        mode if mode.is_terminal() => {
            draw_play_field(out, state, &view)?;
            draw_run_over(out, state, &view)?;
        }
        _ => {
            draw_play_field(out, state, &view)?;
            if state.session.paused {
                draw_paused(out, state, &view)?;
            } else {
                draw_milestone(out, state, &view)?;
            }
        }
    }

    // Park cursor in a harmless spot and flush
    out.queue(style::ResetColor)?;
    out.queue(cursor::MoveTo(0, view.rows.saturating_sub(1)))?;
    out.flush()?;
    Ok(())
}

/// The fire cue.  The terminal bell is the only sound we have.
pub fn fire_cue<W: Write>(out: &mut W, state: &GameState) -> std::io::Result<()> {
    if !state.session.muted {
        out.queue(Print("\x07"))?;
    }
    Ok(())
}

// ── Menu screens ──────────────────────────────────────────────────────────────

fn draw_menu<W: Write>(out: &mut W, view: &Viewport) -> std::io::Result<()> {
    let cx = view.cols / 2;
    let cy = view.rows / 2;

    let title = "S W E E P   S H O O T E R";
    centered(out, cx, cy.saturating_sub(5), title, C_TITLE)?;

    let options: &[(&str, &str)] = &[
        ("ENTER / 1", "Play"),
        ("C / 2", "Controls"),
        ("Q", "Quit"),
    ];
    for (i, (key, label)) in options.iter().enumerate() {
        let row = cy.saturating_sub(2) + i as u16;
        out.queue(cursor::MoveTo(cx.saturating_sub(10), row))?;
        out.queue(style::SetForegroundColor(C_HINT))?;
        out.queue(Print(format!("[{:<9}] ", key)))?;
        out.queue(style::SetForegroundColor(Color::Yellow))?;
        out.queue(Print(*label))?;
    }
    Ok(())
}

fn draw_controls<W: Write>(out: &mut W, view: &Viewport) -> std::io::Result<()> {
    let cx = view.cols / 2;
    let cy = view.rows / 2;
    let lines = [
        "← → / A D : Move",
        "SPACE / O  : Fire",
        "P          : Pause",
        "M          : Mute",
        "Q / ESC    : Quit",
        "",
        "Any key to go back",
    ];
    for (i, line) in lines.iter().enumerate() {
        let row = cy.saturating_sub(4) + i as u16;
        out.queue(cursor::MoveTo(cx.saturating_sub(10), row))?;
        out.queue(style::SetForegroundColor(Color::White))?;
        out.queue(Print(*line))?;
    }
    Ok(())
}

// ── Play field ────────────────────────────────────────────────────────────────

fn draw_play_field<W: Write>(
    out: &mut W,
    state: &GameState,
    view: &Viewport,
) -> std::io::Result<()> {
    draw_border(out, view)?;
    draw_hud(out, state, view)?;

    for adversary in state.adversaries.iter().filter(|a| a.alive) {
        draw_adversary(out, adversary, view)?;
    }
    for projectile in state.projectiles.iter().filter(|p| p.alive) {
        draw_projectile(out, projectile, view)?;
    }
    draw_player(out, state, view)?;
    draw_controls_hint(out, view)?;
    Ok(())
}

fn draw_border<W: Write>(out: &mut W, view: &Viewport) -> std::io::Result<()> {
    let w = view.cols as usize;
    let h = view.rows;

    out.queue(style::SetForegroundColor(C_BORDER))?;

    out.queue(cursor::MoveTo(0, 1))?;
    out.queue(Print(format!("┌{}┐", "─".repeat(w.saturating_sub(2)))))?;

    out.queue(cursor::MoveTo(0, h.saturating_sub(2)))?;
    out.queue(Print(format!("└{}┘", "─".repeat(w.saturating_sub(2)))))?;

    for row in 2..h.saturating_sub(2) {
        out.queue(cursor::MoveTo(0, row))?;
        out.queue(Print("│"))?;
        out.queue(cursor::MoveTo(view.cols.saturating_sub(1), row))?;
        out.queue(Print("│"))?;
    }
    Ok(())
}

fn draw_hud<W: Write>(out: &mut W, state: &GameState, view: &Viewport) -> std::io::Result<()> {
    out.queue(cursor::MoveTo(1, 0))?;
    out.queue(style::SetForegroundColor(C_HUD_SCORE))?;
    out.queue(Print(format!("Score:{:>6}", state.score)))?;

    if state.session.muted {
        let tag = "[muted]";
        let mx = (view.cols / 2).saturating_sub(tag.len() as u16 / 2);
        out.queue(cursor::MoveTo(mx, 0))?;
        out.queue(style::SetForegroundColor(C_HINT))?;
        out.queue(Print(tag))?;
    }

    let lives = format!("Lives:{:>2}", state.player.lives);
    let rx = view.cols.saturating_sub(lives.chars().count() as u16 + 1);
    out.queue(cursor::MoveTo(rx, 0))?;
    out.queue(style::SetForegroundColor(C_HUD_LIVES))?;
    out.queue(Print(&lives))?;
    Ok(())
}

fn draw_player<W: Write>(out: &mut W, state: &GameState, view: &Viewport) -> std::io::Result<()> {
    let p = &state.player;
    let Some((col, row)) = view.cell(p.x, p.y) else {
        return Ok(());
    };
    let width = view.span(p.width).max(3);
    out.queue(style::SetForegroundColor(C_PLAYER))?;
    out.queue(cursor::MoveTo(col + (width / 2) as u16, row))?;
    out.queue(Print("▲"))?;
    if row + 1 < view.rows.saturating_sub(2) {
        out.queue(cursor::MoveTo(col, row + 1))?;
        out.queue(Print(format!("/{}\\", "█".repeat(width.saturating_sub(2)))))?;
    }
    Ok(())
}

fn label(kind: AdversaryKind) -> &'static str {
    match kind {
        AdversaryKind::Vanguard => "Vanguard",
        AdversaryKind::Flanker => "Flanker",
        AdversaryKind::Captain => "Captain",
        AdversaryKind::Grunt => "Grunt",
    }
}

fn draw_adversary<W: Write>(
    out: &mut W,
    adversary: &Adversary,
    view: &Viewport,
) -> std::io::Result<()> {
    let Some((col, row)) = view.cell(adversary.x.max(0), adversary.y) else {
        return Ok(());
    };
    let room = view.cols.saturating_sub(1).saturating_sub(col) as usize;
    let width = view.span(adversary.width).min(room);
    if width == 0 {
        return Ok(());
    }
    let name: String = label(adversary.kind).chars().take(width).collect();

    out.queue(cursor::MoveTo(col, row))?;
    out.queue(style::SetBackgroundColor(C_ADVERSARY))?;
    out.queue(style::SetForegroundColor(C_LABEL))?;
    out.queue(Print(format!("{:<width$}", name, width = width)))?;
    out.queue(style::SetBackgroundColor(Color::Reset))?;
    Ok(())
}

fn draw_projectile<W: Write>(
    out: &mut W,
    projectile: &Projectile,
    view: &Viewport,
) -> std::io::Result<()> {
    if let Some((col, row)) = view.cell(projectile.x, projectile.y) {
        out.queue(cursor::MoveTo(col, row))?;
        out.queue(style::SetForegroundColor(C_PROJECTILE))?;
        out.queue(Print("║"))?;
    }
    Ok(())
}

fn draw_controls_hint<W: Write>(out: &mut W, view: &Viewport) -> std::io::Result<()> {
    out.queue(cursor::MoveTo(1, view.rows.saturating_sub(1)))?;
    out.queue(style::SetForegroundColor(C_HINT))?;
    out.queue(Print("← → / A D : Move   SPACE / O : Fire   P : Pause   M : Mute   Q : Quit"))?;
    Ok(())
}

// ── Overlays ──────────────────────────────────────────────────────────────────

/// Encouragement shown while the score sits on a milestone.
fn milestone_message(score: i64) -> Option<&'static str> {
    match score {
        10 => Some("Courage is your middle name!"),
        20 => Some("Keep it up!"),
        30 => Some("Whatever it takes!"),
        40 => Some("Stronger than ever!"),
        _ => None,
    }
}

fn draw_milestone<W: Write>(out: &mut W, state: &GameState, view: &Viewport) -> std::io::Result<()> {
    if let Some(msg) = milestone_message(state.score) {
        centered(out, view.cols / 2, view.rows / 2, msg, Color::White)?;
    }
    Ok(())
}

fn draw_paused<W: Write>(out: &mut W, state: &GameState, view: &Viewport) -> std::io::Result<()> {
    let cx = view.cols / 2;
    let cy = view.rows / 2;
    centered(out, cx, cy, "PAUSED", Color::White)?;
    let hint = if state.session.muted {
        "P - Resume   M - Unmute"
    } else {
        "P - Resume   M - Mute"
    };
    centered(out, cx, cy + 1, hint, C_HINT)
}

fn draw_run_over<W: Write>(out: &mut W, state: &GameState, view: &Viewport) -> std::io::Result<()> {
    let banner = match state.session.mode {
        ScreenMode::GameWon => "YOU  WIN",
        ScreenMode::GameLost => "YOU  LOSE",
        ScreenMode::GameFinished => "FINISHED",
        _ => "GAME  OVER",
    };
    let cx = view.cols / 2;
    let cy = view.rows / 2;
    centered(out, cx, cy.saturating_sub(1), "╔════════════════════╗", Color::Red)?;
    centered(out, cx, cy, &format!("║{:^20}║", banner), Color::Red)?;
    centered(out, cx, cy + 1, "╚════════════════════╝", Color::Red)?;
    centered(out, cx, cy + 2, &format!("Final Score: {:>6}", state.score), Color::Yellow)?;
    centered(out, cx, cy + 3, "R - Menu  Q - Quit", Color::White)
}

fn centered<W: Write>(
    out: &mut W,
    cx: u16,
    row: u16,
    text: &str,
    color: Color,
) -> std::io::Result<()> {
    let col = cx.saturating_sub(text.chars().count() as u16 / 2);
    out.queue(cursor::MoveTo(col, row))?;
    out.queue(style::SetForegroundColor(color))?;
    out.queue(Print(text))?;
    Ok(())
}
