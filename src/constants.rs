/// Playfield geometry, entity speeds and timer periods.
///
/// Coordinates live in a fixed 700 × 500 logical field; the display layer
/// scales them to whatever terminal size is available.

// ── Field ─────────────────────────────────────────────────────────────────────

pub const FIELD_WIDTH: i32 = 700;
pub const FIELD_HEIGHT: i32 = 500;

/// Where dead entities are parked so nothing can collide with them.
pub const OFFSCREEN: (i32, i32) = (-50, -50);

// ── Simulation clock ──────────────────────────────────────────────────────────

/// Length of one logical step.  Every timer period is a multiple of this.
pub const TICK_MS: u32 = 5;

pub const PLAYER_MOVE_MS: u32 = 15;
pub const BULLET_MOVE_MS: u32 = 10;
pub const SHOOT_COOLDOWN_MS: u32 = 300;
pub const EXPLOSION_FRAME_MS: u32 = 50;
pub const BOSS_EXPLOSION_FRAME_MS: u32 = 100;
pub const RESPAWN_DELAY_MS: u32 = 2000;
pub const BANNER_DELAY_MS: u32 = 2000;
pub const GAME_OVER_DELAY_MS: u32 = 2000;

// ── Player ────────────────────────────────────────────────────────────────────

pub const PLAYER_START: (i32, i32) = (350, 410);
pub const PLAYER_LIVES: u32 = 3;
pub const PLAYER_STEP: i32 = 5;
pub const PLAYER_MIN_X: i32 = 10;
pub const PLAYER_MAX_X: i32 = 680;
pub const PLAYER_HALF_EXTENTS: (i32, i32) = (15, 10);

// ── Enemy formation ───────────────────────────────────────────────────────────

pub const FORMATION_COLUMNS: std::ops::Range<i32> = 30..500;
pub const FORMATION_ROWS: std::ops::Range<i32> = 40..150;
pub const FORMATION_SPACING: usize = 50;
pub const FORMATION_STEP: i32 = 20;
/// Margin kept between the outermost enemy and the field edge.
pub const FORMATION_MARGIN: i32 = 20;
/// Once the last enemy of the formation sinks below this row the match is lost.
pub const FORMATION_INVASION_Y: i32 = 400;
pub const ENEMY_HALF_EXTENTS: (i32, i32) = (20, 11);

// ── Boss ──────────────────────────────────────────────────────────────────────

pub const BOSS_START: (i32, i32) = (250, 40);
pub const BOSS_STEP: i32 = 3;
pub const BOSS_MARGIN: i32 = 20;
pub const BOSS_HALF_EXTENTS: (i32, i32) = (50, 30);

// ── Projectiles ───────────────────────────────────────────────────────────────

pub const PLAYER_BULLET_STEP: i32 = 3;
pub const ENEMY_BULLET_STEP: i32 = 3;
pub const BOSS_BULLET_STRAIGHT_STEP: i32 = 3;
pub const BOSS_BULLET_DIAGONAL_STEP: i32 = 2;
/// Enemy and boss bullets are discarded below this row.
pub const BULLET_FLOOR_Y: i32 = 550;
pub const BOSS_BULLET_MIN_X: i32 = 10;
pub const BOSS_BULLET_MAX_X: i32 = 700;

// ── Explosions ────────────────────────────────────────────────────────────────

/// Index of the final explosion frame (14 frames: 0..=13).
pub const EXPLOSION_LAST_FRAME: u8 = 13;
