/// All game entity types: pure data, no logic.

use crate::config::SessionParams;
use crate::timer::Timer;

#[derive(Clone, Debug, PartialEq)]
pub enum GameStatus {
    Playing,
    Won,
    Lost,
}

/// Two-stage delay used by the boss-intro and victory banners: the banner
/// stays hidden for one delay, then is shown for a second one.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum BannerStage {
    Delay,
    Visible,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Phase {
    /// The invader formation is alive and advancing.
    Wave,
    /// Formation cleared; waiting to bring in the boss.
    BossIntro(BannerStage),
    Boss,
    /// Boss destroyed; waiting to announce the win.
    Victory(BannerStage),
}

// ── Projectiles ───────────────────────────────────────────────────────────────

/// Direction a boss bullet was fired in.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Heading {
    DiagonalLeft,
    Down,
    DiagonalRight,
}

impl Heading {
    pub const ALL: [Heading; 3] = [Heading::DiagonalLeft, Heading::Down, Heading::DiagonalRight];
}

/// Player and enemy bullets travel straight up or down.
#[derive(Clone, Debug, PartialEq)]
pub struct Bullet {
    pub x: i32,
    pub y: i32,
}

#[derive(Clone, Debug, PartialEq)]
pub struct BossBullet {
    pub x: i32,
    pub y: i32,
    pub heading: Heading,
}

#[derive(Clone, Debug, PartialEq)]
pub struct Explosion {
    pub x: i32,
    pub y: i32,
    /// Animation frame, 0 ..= EXPLOSION_LAST_FRAME.
    pub frame: u8,
}

// ── Player, enemies & boss ────────────────────────────────────────────────────

#[derive(Clone, Debug, PartialEq)]
pub struct Player {
    pub x: i32,
    pub y: i32,
    pub lives: u32,
    pub alive: bool,
}

#[derive(Clone, Debug, PartialEq)]
pub struct Enemy {
    pub x: i32,
    pub y: i32,
}

#[derive(Clone, Debug, PartialEq)]
pub struct Boss {
    pub x: i32,
    pub y: i32,
    pub health: u32,
    pub total_health: u32,
    pub alive: bool,
    pub moving_right: bool,
}

// ── Input & events ────────────────────────────────────────────────────────────

/// Keys currently held by the player.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Controls {
    pub left: bool,
    pub right: bool,
    pub fire: bool,
}

/// Something that happened during one simulation step.
#[derive(Clone, Debug, PartialEq)]
pub enum GameEvent {
    EnemyDestroyed { x: i32, y: i32, remaining: usize },
    PlayerHit { lives_left: u32 },
    PlayerRespawned,
    BossHit { health_left: u32 },
    BossDefeated { x: i32, y: i32 },
    PhaseChanged(Phase),
    GameOverPending,
    MatchWon,
    MatchLost,
}

// ── Clocks ────────────────────────────────────────────────────────────────────

/// One countdown per independent clock of the game.
#[derive(Clone, Debug)]
pub struct Timers {
    pub player_move: Timer,
    pub bullets: Timer,
    pub shoot_cooldown: Timer,
    pub enemy_move: Timer,
    pub enemy_fire: Timer,
    pub boss_move: Timer,
    pub boss_fire: Timer,
    pub explosion: Timer,
    pub boss_explosion: Timer,
    pub respawn: Timer,
    pub banner: Timer,
    pub game_over: Timer,
}

// ── Master game state ─────────────────────────────────────────────────────────

/// The entire match state.  Cloneable so pure update functions can
/// return a new copy without mutating the current one.
#[derive(Clone, Debug)]
pub struct GameState {
    pub player: Player,
    /// Ordered: the first enemy is the leftmost, the last the rightmost.
    pub enemies: Vec<Enemy>,
    pub formation_moving_right: bool,
    /// Only present once the boss phase has begun.
    pub boss: Option<Boss>,
    pub player_bullets: Vec<Bullet>,
    pub enemy_bullets: Vec<Bullet>,
    pub boss_bullets: Vec<BossBullet>,
    pub explosions: Vec<Explosion>,
    pub boss_explosion: Option<Explosion>,
    pub phase: Phase,
    pub status: GameStatus,
    pub params: SessionParams,
    pub controls: Controls,
    pub timers: Timers,
    /// Events raised by the most recent step.
    pub events: Vec<GameEvent>,
    pub frame: u64,
}
