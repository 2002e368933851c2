/// Read-only view of a match handed to the presentation layer once per
/// frame.  Rendering never touches `GameState` directly.

use crate::entities::{BossBullet, Bullet, Enemy, Explosion, GameState, GameStatus, Phase};
use crate::phase;

#[derive(Clone, Debug, PartialEq)]
pub struct BossView {
    pub x: i32,
    pub y: i32,
    pub alive: bool,
    /// Remaining health as a fraction of the total, 0.0 ..= 1.0.
    pub health_fraction: f32,
}

#[derive(Clone, Debug, PartialEq)]
pub struct Snapshot {
    pub lives: u32,
    pub player_alive: bool,
    pub player: (i32, i32),
    pub enemies: Vec<Enemy>,
    pub boss: Option<BossView>,
    pub player_bullets: Vec<Bullet>,
    pub enemy_bullets: Vec<Bullet>,
    pub boss_bullets: Vec<BossBullet>,
    pub explosions: Vec<Explosion>,
    pub boss_explosion: Option<Explosion>,
    pub boss_intro_banner: bool,
    pub win_banner: bool,
    pub game_over_pending: bool,
    pub phase: Phase,
    pub status: GameStatus,
}

impl Snapshot {
    pub fn of(state: &GameState) -> Self {
        Snapshot {
            lives: state.player.lives,
            player_alive: state.player.alive,
            player: (state.player.x, state.player.y),
            enemies: state.enemies.clone(),
            boss: state.boss.as_ref().map(|b| BossView {
                x: b.x,
                y: b.y,
                alive: b.alive,
                health_fraction: b.health as f32 / b.total_health.max(1) as f32,
            }),
            player_bullets: state.player_bullets.clone(),
            enemy_bullets: state.enemy_bullets.clone(),
            boss_bullets: state.boss_bullets.clone(),
            explosions: state.explosions.clone(),
            boss_explosion: state.boss_explosion.clone(),
            boss_intro_banner: phase::boss_intro_banner(state),
            win_banner: phase::win_banner(state),
            game_over_pending: phase::game_over_pending(state),
            phase: state.phase,
            status: state.status.clone(),
        }
    }
}
