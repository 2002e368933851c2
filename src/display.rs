/// Rendering layer: all terminal I/O lives here.
///
/// Each function receives a mutable writer and an immutable `Snapshot` of
/// the match.  No game logic is performed; this module only translates the
/// 700 × 500 logical field into terminal cells.

use std::io::Write;

use crossterm::{
    cursor,
    style::{self, Color, Print},
    terminal,
    QueueableCommand,
};
use space_invaders::constants::{EXPLOSION_LAST_FRAME, FIELD_HEIGHT, FIELD_WIDTH};
use space_invaders::entities::{BossBullet, Bullet, Explosion, Heading};
use space_invaders::snapshot::{BossView, Snapshot};

// ── Colour palette ────────────────────────────────────────────────────────────

const C_BORDER: Color = Color::DarkBlue;
const C_HUD_LIVES: Color = Color::Red;
const C_HUD_BOSS: Color = Color::Red;
const C_PLAYER: Color = Color::White;
const C_ENEMY: Color = Color::Green;
const C_BOSS: Color = Color::Magenta;
const C_BULLET_PLAYER: Color = Color::Cyan;
const C_BULLET_ENEMY: Color = Color::Magenta;
const C_EXPLOSION: Color = Color::Yellow;
const C_BANNER: Color = Color::Yellow;
const C_HINT: Color = Color::DarkGrey;

const EXPLOSION_GLYPHS: [&str; 5] = ["✺", "✹", "✶", "*", "·"];

/// Terminal area the field is drawn into.
#[derive(Clone, Copy, Debug)]
pub struct Viewport {
    pub width: u16,
    pub height: u16,
}

impl Viewport {
    /// Map a field coordinate to a cell inside the border (rows 2 .. h-3).
    /// Returns `None` for anything outside the visible field.
    fn cell(&self, x: i32, y: i32) -> Option<(u16, u16)> {
        if !(0..FIELD_WIDTH).contains(&x) || !(0..FIELD_HEIGHT).contains(&y) {
            return None;
        }
        let inner_w = self.width.saturating_sub(2) as i32;
        let inner_h = self.height.saturating_sub(4) as i32;
        let col = 1 + x * inner_w / FIELD_WIDTH;
        let row = 2 + y * inner_h / FIELD_HEIGHT;
        Some((col as u16, row as u16))
    }

    fn play_bottom(&self) -> u16 {
        self.height.saturating_sub(2)
    }
}

// ── Public entry point ────────────────────────────────────────────────────────

/// Render one complete frame.
pub fn render<W: Write>(
    out: &mut W,
    view: Viewport,
    snapshot: &Snapshot,
    difficulty: &str,
) -> std::io::Result<()> {
    out.queue(terminal::Clear(terminal::ClearType::All))?;

    draw_border(out, view)?;
    draw_hud(out, view, snapshot, difficulty)?;

    for enemy in &snapshot.enemies {
        draw_sprite(out, view, enemy.x, enemy.y, &["«▼»"], C_ENEMY)?;
    }
    if let Some(boss) = snapshot.boss.as_ref().filter(|b| b.alive) {
        draw_sprite(out, view, boss.x, boss.y, &["╔═▼═▼═╗", "╚═╦═╦═╝"], C_BOSS)?;
    }
    for explosion in snapshot.explosions.iter().chain(&snapshot.boss_explosion) {
        draw_explosion(out, view, explosion)?;
    }
    for bullet in &snapshot.player_bullets {
        draw_bullet(out, view, bullet, "║", C_BULLET_PLAYER)?;
    }
    for bullet in &snapshot.enemy_bullets {
        draw_bullet(out, view, bullet, "↓", C_BULLET_ENEMY)?;
    }
    for bullet in &snapshot.boss_bullets {
        draw_boss_bullet(out, view, bullet)?;
    }

    if snapshot.player_alive {
        let (x, y) = snapshot.player;
        draw_sprite(out, view, x, y, &["▲", "/█\\"], C_PLAYER)?;
    }
    draw_controls_hint(out, view)?;

    if snapshot.boss_intro_banner {
        draw_banner(out, view, "B O S S   B A T T L E", C_BANNER)?;
    }
    if snapshot.win_banner {
        draw_banner(out, view, "Y O U   W I N !", C_BANNER)?;
    }
    if snapshot.game_over_pending {
        draw_banner(out, view, "G A M E   O V E R", Color::Red)?;
    }

    // Park cursor in a harmless spot and flush
    out.queue(style::ResetColor)?;
    out.queue(cursor::MoveTo(0, view.height.saturating_sub(1)))?;
    out.flush()?;
    Ok(())
}

// ── Border ────────────────────────────────────────────────────────────────────

fn draw_border<W: Write>(out: &mut W, view: Viewport) -> std::io::Result<()> {
    let w = view.width as usize;
    let h = view.height;

    out.queue(style::SetForegroundColor(C_BORDER))?;

    out.queue(cursor::MoveTo(0, 1))?;
    out.queue(Print(format!("┌{}┐", "─".repeat(w.saturating_sub(2)))))?;

    out.queue(cursor::MoveTo(0, h.saturating_sub(2)))?;
    out.queue(Print(format!("└{}┘", "─".repeat(w.saturating_sub(2)))))?;

    for row in 2..h.saturating_sub(2) {
        out.queue(cursor::MoveTo(0, row))?;
        out.queue(Print("│"))?;
        out.queue(cursor::MoveTo(view.width.saturating_sub(1), row))?;
        out.queue(Print("│"))?;
    }

    Ok(())
}

// ── HUD (row 0) ───────────────────────────────────────────────────────────────

fn draw_hud<W: Write>(
    out: &mut W,
    view: Viewport,
    snapshot: &Snapshot,
    difficulty: &str,
) -> std::io::Result<()> {
    // Reserve ships: left.  The ship in play isn't counted.
    out.queue(cursor::MoveTo(1, 0))?;
    out.queue(style::SetForegroundColor(C_HUD_LIVES))?;
    let reserve = "▲ ".repeat(snapshot.lives.saturating_sub(1) as usize);
    out.queue(Print(format!("Lives remaining: {}", reserve)))?;

    // Difficulty: centre
    let label = format!("[ {} ]", difficulty.to_uppercase());
    let lx = (view.width / 2).saturating_sub(label.len() as u16 / 2);
    out.queue(cursor::MoveTo(lx, 0))?;
    out.queue(style::SetForegroundColor(Color::White))?;
    out.queue(Print(&label))?;

    // Boss health: right
    if let Some(boss) = snapshot.boss.as_ref().filter(|b| b.alive) {
        draw_boss_health(out, view, boss)?;
    }

    Ok(())
}

fn draw_boss_health<W: Write>(out: &mut W, view: Viewport, boss: &BossView) -> std::io::Result<()> {
    const BAR_WIDTH: usize = 20;
    let filled = (boss.health_fraction * BAR_WIDTH as f32).ceil() as usize;
    let bar = format!(
        "Boss health: {}{}",
        "█".repeat(filled.min(BAR_WIDTH)),
        "░".repeat(BAR_WIDTH.saturating_sub(filled))
    );
    let rx = view.width.saturating_sub(bar.chars().count() as u16 + 1);
    out.queue(cursor::MoveTo(rx, 0))?;
    out.queue(style::SetForegroundColor(C_HUD_BOSS))?;
    out.queue(Print(bar))?;
    Ok(())
}

// ── Entities ──────────────────────────────────────────────────────────────────

/// Draw a multi-row sprite horizontally centred on the entity position.
fn draw_sprite<W: Write>(
    out: &mut W,
    view: Viewport,
    x: i32,
    y: i32,
    rows: &[&str],
    color: Color,
) -> std::io::Result<()> {
    let Some((col, row)) = view.cell(x, y) else {
        return Ok(());
    };
    out.queue(style::SetForegroundColor(color))?;
    for (i, line) in rows.iter().enumerate() {
        let r = row + i as u16;
        if r >= view.play_bottom() {
            break;
        }
        let half = line.chars().count() as u16 / 2;
        out.queue(cursor::MoveTo(col.saturating_sub(half).max(1), r))?;
        out.queue(Print(*line))?;
    }
    Ok(())
}

fn draw_bullet<W: Write>(
    out: &mut W,
    view: Viewport,
    bullet: &Bullet,
    glyph: &str,
    color: Color,
) -> std::io::Result<()> {
    if let Some((col, row)) = view.cell(bullet.x, bullet.y) {
        out.queue(cursor::MoveTo(col, row))?;
        out.queue(style::SetForegroundColor(color))?;
        out.queue(Print(glyph))?;
    }
    Ok(())
}

fn draw_boss_bullet<W: Write>(
    out: &mut W,
    view: Viewport,
    bullet: &BossBullet,
) -> std::io::Result<()> {
    let glyph = match bullet.heading {
        Heading::DiagonalLeft => "↙",
        Heading::Down => "↓",
        Heading::DiagonalRight => "↘",
    };
    let as_bullet = Bullet {
        x: bullet.x,
        y: bullet.y,
    };
    draw_bullet(out, view, &as_bullet, glyph, C_BULLET_ENEMY)
}

fn draw_explosion<W: Write>(
    out: &mut W,
    view: Viewport,
    explosion: &Explosion,
) -> std::io::Result<()> {
    let stage = explosion.frame as usize * EXPLOSION_GLYPHS.len() / (EXPLOSION_LAST_FRAME as usize + 1);
    let glyph = EXPLOSION_GLYPHS[stage.min(EXPLOSION_GLYPHS.len() - 1)];
    draw_sprite(out, view, explosion.x, explosion.y, &[glyph], C_EXPLOSION)
}

// ── Controls hint (last row) ──────────────────────────────────────────────────

fn draw_controls_hint<W: Write>(out: &mut W, view: Viewport) -> std::io::Result<()> {
    out.queue(cursor::MoveTo(1, view.height.saturating_sub(1)))?;
    out.queue(style::SetForegroundColor(C_HINT))?;
    out.queue(Print("← → / A D : Move   SPACE : Shoot   Q : Quit"))?;
    Ok(())
}

// ── Overlays & screens ────────────────────────────────────────────────────────

fn draw_banner<W: Write>(out: &mut W, view: Viewport, text: &str, color: Color) -> std::io::Result<()> {
    let inner = text.chars().count() + 4;
    let lines = [
        format!("╔{}╗", "═".repeat(inner)),
        format!("║  {}  ║", text),
        format!("╚{}╝", "═".repeat(inner)),
    ];
    let start_row = (view.height / 3).max(2);
    centered_lines(out, view, start_row, &lines, color)
}

/// Print each line centred horizontally, starting at `start_row`.
pub fn centered_lines<W: Write, S: AsRef<str>>(
    out: &mut W,
    view: Viewport,
    start_row: u16,
    lines: &[S],
    color: Color,
) -> std::io::Result<()> {
    out.queue(style::SetForegroundColor(color))?;
    for (i, line) in lines.iter().enumerate() {
        let line = line.as_ref();
        let col = (view.width / 2).saturating_sub(line.chars().count() as u16 / 2);
        out.queue(cursor::MoveTo(col, start_row + i as u16))?;
        out.queue(Print(line))?;
    }
    Ok(())
}

/// A full-screen page: title, body lines, and a key legend at the bottom.
pub fn draw_screen<W: Write>(
    out: &mut W,
    view: Viewport,
    title: &str,
    title_color: Color,
    body: &[String],
    legend: &str,
) -> std::io::Result<()> {
    out.queue(terminal::Clear(terminal::ClearType::All))?;

    let total_rows = body.len() as u16 + 2;
    let start_row = (view.height / 2).saturating_sub(total_rows / 2 + 2);

    centered_lines(out, view, start_row, &[title], title_color)?;
    centered_lines(out, view, start_row + 2, body, Color::White)?;
    centered_lines(
        out,
        view,
        (start_row + total_rows + 2).min(view.height.saturating_sub(2)),
        &[legend],
        C_HINT,
    )?;

    out.queue(style::ResetColor)?;
    out.flush()?;
    Ok(())
}
