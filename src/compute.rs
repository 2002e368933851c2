/// Game-logic functions.
///
/// Every public function takes an immutable reference to the current
/// `GameState` (and, where needed, an RNG handle) and returns a brand-new
/// `GameState`.  Side effects are limited to the injected RNG.  Internally a
/// step clones once and runs the `*_step` passes in place, in a fixed order:
/// input → motion → collision → spawn → animation → phase.

use rand::Rng;
use tracing::debug;

use crate::config::SessionParams;
use crate::constants::*;
use crate::entities::{
    Boss, BossBullet, Bullet, Controls, Enemy, Explosion, GameEvent, GameState, GameStatus,
    Heading, Phase, Player, Timers,
};
use crate::phase;
use crate::timer::Timer;

// ── Constructors ─────────────────────────────────────────────────────────────

/// The invader grid, column by column, so the first enemy is the top-left
/// one and the last is the bottom-right one.
pub fn initial_formation() -> Vec<Enemy> {
    FORMATION_COLUMNS
        .step_by(FORMATION_SPACING)
        .flat_map(|x| {
            FORMATION_ROWS
                .step_by(FORMATION_SPACING)
                .map(move |y| Enemy { x, y })
        })
        .collect()
}

impl Boss {
    pub fn new(total_health: u32) -> Self {
        Boss {
            x: BOSS_START.0,
            y: BOSS_START.1,
            health: total_health,
            total_health,
            alive: true,
            moving_right: true,
        }
    }
}

impl Timers {
    /// Clocks for a fresh match: the wave-phase timers run, boss and
    /// one-shot timers wait to be started.
    pub fn new(params: &SessionParams) -> Self {
        Timers {
            player_move: Timer::repeating(PLAYER_MOVE_MS).running(),
            bullets: Timer::repeating(BULLET_MOVE_MS).running(),
            shoot_cooldown: Timer::one_shot(SHOOT_COOLDOWN_MS),
            enemy_move: Timer::repeating(params.enemy_move_ms).running(),
            enemy_fire: Timer::repeating(params.enemy_fire_ms).running(),
            boss_move: Timer::repeating(params.boss_move_ms),
            boss_fire: Timer::repeating(params.boss_fire_ms),
            explosion: Timer::repeating(EXPLOSION_FRAME_MS).running(),
            boss_explosion: Timer::repeating(BOSS_EXPLOSION_FRAME_MS),
            respawn: Timer::one_shot(RESPAWN_DELAY_MS),
            banner: Timer::one_shot(BANNER_DELAY_MS),
            game_over: Timer::one_shot(GAME_OVER_DELAY_MS),
        }
    }
}

/// Build the initial match state for the given session parameters.
pub fn init_state(params: SessionParams) -> GameState {
    GameState {
        player: Player {
            x: PLAYER_START.0,
            y: PLAYER_START.1,
            lives: PLAYER_LIVES,
            alive: true,
        },
        enemies: initial_formation(),
        formation_moving_right: true,
        boss: None,
        player_bullets: Vec::new(),
        enemy_bullets: Vec::new(),
        boss_bullets: Vec::new(),
        explosions: Vec::new(),
        boss_explosion: None,
        phase: Phase::Wave,
        status: GameStatus::Playing,
        timers: Timers::new(&params),
        params,
        controls: Controls::default(),
        events: Vec::new(),
        frame: 0,
    }
}

// ── Input-driven state transitions (pure) ───────────────────────────────────

pub fn set_controls(state: &GameState, controls: Controls) -> GameState {
    GameState {
        controls,
        ..state.clone()
    }
}

pub fn move_player_left(state: &GameState) -> GameState {
    let mut next = state.clone();
    if next.player.x > PLAYER_MIN_X {
        next.player.x -= PLAYER_STEP;
    }
    next
}

pub fn move_player_right(state: &GameState) -> GameState {
    let mut next = state.clone();
    if next.player.x < PLAYER_MAX_X {
        next.player.x += PLAYER_STEP;
    }
    next
}

/// Fire a bullet from the player, at most once per shoot cooldown.
pub fn player_shoot(state: &GameState) -> GameState {
    let mut next = state.clone();
    shoot_step(&mut next);
    next
}

// ── Motion & collision passes (pure wrappers) ────────────────────────────────

pub fn move_formation(state: &GameState) -> GameState {
    let mut next = state.clone();
    formation_step(&mut next);
    next
}

pub fn move_boss(state: &GameState) -> GameState {
    let mut next = state.clone();
    boss_step(&mut next);
    next
}

pub fn move_bullets(state: &GameState) -> GameState {
    let mut next = state.clone();
    bullet_step(&mut next);
    next
}

pub fn resolve_collisions(state: &GameState) -> GameState {
    let mut next = state.clone();
    collision_step(&mut next);
    next
}

pub fn enemy_fire(state: &GameState, rng: &mut impl Rng) -> GameState {
    let mut next = state.clone();
    enemy_fire_step(&mut next, rng);
    next
}

pub fn boss_fire(state: &GameState) -> GameState {
    let mut next = state.clone();
    boss_fire_step(&mut next);
    next
}

pub fn advance_explosions(state: &GameState) -> GameState {
    let mut next = state.clone();
    explosion_step(&mut next);
    next
}

// ── Per-step tick (nearly pure: RNG is injected) ───────────────────────────

/// Advance the simulation by one logical step of `TICK_MS`.  All randomness
/// comes through `rng` so callers control determinism.  Once the match has
/// been won or lost the state is returned unchanged.
pub fn tick(state: &GameState, rng: &mut impl Rng) -> GameState {
    let mut next = state.clone();
    next.events.clear();
    if next.status != GameStatus::Playing {
        return next;
    }
    next.frame += 1;

    // ── 1. Input ─────────────────────────────────────────────────────────────
    next.timers.shoot_cooldown.advance(TICK_MS);
    shoot_step(&mut next);
    if next.timers.player_move.advance(TICK_MS) {
        player_step(&mut next);
    }

    // ── 2. Motion & collision ────────────────────────────────────────────────
    if next.timers.enemy_move.advance(TICK_MS) {
        formation_step(&mut next);
    }
    if next.timers.boss_move.advance(TICK_MS) {
        boss_step(&mut next);
    }
    if next.timers.bullets.advance(TICK_MS) {
        bullet_step(&mut next);
        collision_step(&mut next);
    }

    // ── 3. Spawn ─────────────────────────────────────────────────────────────
    if next.timers.enemy_fire.advance(TICK_MS) {
        enemy_fire_step(&mut next, rng);
    }
    if next.timers.boss_fire.advance(TICK_MS) {
        boss_fire_step(&mut next);
    }

    // ── 4. Animation & respawn ───────────────────────────────────────────────
    if next.timers.explosion.advance(TICK_MS) {
        explosion_step(&mut next);
    }
    if next.timers.boss_explosion.advance(TICK_MS) {
        boss_explosion_step(&mut next);
    }
    if next.timers.respawn.advance(TICK_MS) {
        respawn_step(&mut next);
    }

    // ── 5. Phase sequencing ──────────────────────────────────────────────────
    phase::sequence(&mut next);

    next
}

// ── In-place passes ──────────────────────────────────────────────────────────

fn shoot_step(state: &mut GameState) {
    if !state.controls.fire || !state.player.alive || state.timers.shoot_cooldown.is_active() {
        return;
    }
    state.player_bullets.push(Bullet {
        x: state.player.x,
        y: state.player.y,
    });
    state.timers.shoot_cooldown.start();
}

/// Left and right are not exclusive: holding both applies both.
fn player_step(state: &mut GameState) {
    if state.controls.left && state.player.x > PLAYER_MIN_X {
        state.player.x -= PLAYER_STEP;
    }
    if state.controls.right && state.player.x < PLAYER_MAX_X {
        state.player.x += PLAYER_STEP;
    }
}

/// Shift the whole formation sideways; on touching an edge, drop one row and
/// reverse instead.
fn formation_step(state: &mut GameState) {
    let (Some(first), Some(last)) = (state.enemies.first(), state.enemies.last()) else {
        return;
    };

    let (dx, dy) = if state.formation_moving_right {
        if last.x + FORMATION_MARGIN < FIELD_WIDTH {
            (FORMATION_STEP, 0)
        } else {
            state.formation_moving_right = false;
            (0, FORMATION_STEP)
        }
    } else if first.x - FORMATION_MARGIN > 0 {
        (-FORMATION_STEP, 0)
    } else {
        state.formation_moving_right = true;
        (0, FORMATION_STEP)
    };

    for enemy in &mut state.enemies {
        enemy.x += dx;
        enemy.y += dy;
    }
}

/// The boss sweeps left and right; hitting an edge only turns it around.
fn boss_step(state: &mut GameState) {
    let Some(boss) = state.boss.as_mut() else {
        return;
    };
    if boss.moving_right {
        if boss.x + BOSS_MARGIN < FIELD_WIDTH {
            boss.x += BOSS_STEP;
        } else {
            boss.moving_right = false;
        }
    } else if boss.x > 0 {
        boss.x -= BOSS_STEP;
    } else {
        boss.moving_right = true;
    }
}

fn bullet_step(state: &mut GameState) {
    for bullet in &mut state.player_bullets {
        bullet.y -= PLAYER_BULLET_STEP;
    }
    state.player_bullets.retain(|b| b.y >= 0);

    for bullet in &mut state.enemy_bullets {
        bullet.y += ENEMY_BULLET_STEP;
    }
    state.enemy_bullets.retain(|b| b.y <= BULLET_FLOOR_Y);

    for bullet in &mut state.boss_bullets {
        match bullet.heading {
            Heading::DiagonalLeft => {
                bullet.x -= BOSS_BULLET_DIAGONAL_STEP;
                bullet.y += BOSS_BULLET_DIAGONAL_STEP;
            }
            Heading::Down => bullet.y += BOSS_BULLET_STRAIGHT_STEP,
            Heading::DiagonalRight => {
                bullet.x += BOSS_BULLET_DIAGONAL_STEP;
                bullet.y += BOSS_BULLET_DIAGONAL_STEP;
            }
        }
    }
    state.boss_bullets.retain(|b| {
        b.y <= BULLET_FLOOR_Y && (BOSS_BULLET_MIN_X..=BOSS_BULLET_MAX_X).contains(&b.x)
    });
}

/// Open-interval AABB test: is `(x, y)` strictly inside the box of the given
/// half-extents centred on `(cx, cy)`?
pub fn overlaps(x: i32, y: i32, cx: i32, cy: i32, half_extents: (i32, i32)) -> bool {
    (x - cx).abs() < half_extents.0 && (y - cy).abs() < half_extents.1
}

fn collision_step(state: &mut GameState) {
    hit_enemies(state);
    hit_player(state);
    hit_boss(state);
}

/// Each player bullet destroys at most one enemy; the first enemy in
/// formation order wins.  Removal keeps the formation order intact.
fn hit_enemies(state: &mut GameState) {
    if state.enemies.is_empty() {
        return;
    }
    let mut spent = Vec::new();
    for (bi, bullet) in state.player_bullets.iter().enumerate() {
        let hit = state
            .enemies
            .iter()
            .position(|e| overlaps(bullet.x, bullet.y, e.x, e.y, ENEMY_HALF_EXTENTS));
        if let Some(ei) = hit {
            let enemy = state.enemies.remove(ei);
            state.explosions.push(Explosion {
                x: enemy.x,
                y: enemy.y,
                frame: 0,
            });
            state.events.push(GameEvent::EnemyDestroyed {
                x: enemy.x,
                y: enemy.y,
                remaining: state.enemies.len(),
            });
            debug!(x = enemy.x, y = enemy.y, remaining = state.enemies.len(), "enemy destroyed");
            spent.push(bi);
        }
    }
    remove_indices(&mut state.player_bullets, &spent);
}

/// Enemy and boss bullets against the player.  A hit parks the player
/// offscreen, so at most one life is lost per pass.
fn hit_player(state: &mut GameState) {
    let hx = PLAYER_HALF_EXTENTS;
    if let Some(bi) = state
        .enemy_bullets
        .iter()
        .position(|b| overlaps(b.x, b.y, state.player.x, state.player.y, hx))
    {
        state.enemy_bullets.remove(bi);
        kill_player(state);
    }
    if let Some(bi) = state
        .boss_bullets
        .iter()
        .position(|b| overlaps(b.x, b.y, state.player.x, state.player.y, hx))
    {
        state.boss_bullets.remove(bi);
        kill_player(state);
    }
}

fn kill_player(state: &mut GameState) {
    let (x, y) = (state.player.x, state.player.y);
    state.player.lives = state.player.lives.saturating_sub(1);
    state.player.alive = false;
    state.player.x = OFFSCREEN.0;
    state.player.y = OFFSCREEN.1;
    state.explosions.push(Explosion { x, y, frame: 0 });
    state.timers.respawn.start();
    state.events.push(GameEvent::PlayerHit {
        lives_left: state.player.lives,
    });
    debug!(lives_left = state.player.lives, "player hit");
}

fn hit_boss(state: &mut GameState) {
    let Some(boss) = state.boss.as_mut() else {
        return;
    };
    if !boss.alive {
        return;
    }
    let mut spent = Vec::new();
    for (bi, bullet) in state.player_bullets.iter().enumerate() {
        if boss.health == 0 {
            break;
        }
        if overlaps(bullet.x, bullet.y, boss.x, boss.y, BOSS_HALF_EXTENTS) {
            boss.health -= 1;
            spent.push(bi);
            state.events.push(GameEvent::BossHit {
                health_left: boss.health,
            });
            if boss.health == 0 {
                state.boss_explosion = Some(Explosion {
                    x: boss.x,
                    y: boss.y,
                    frame: 0,
                });
                state.events.push(GameEvent::BossDefeated { x: boss.x, y: boss.y });
                debug!(x = boss.x, y = boss.y, "boss defeated");
            }
        }
    }
    remove_indices(&mut state.player_bullets, &spent);
}

/// Remove the given ascending indices without disturbing the order of the
/// remaining elements.
fn remove_indices<T>(items: &mut Vec<T>, indices: &[usize]) {
    for &i in indices.iter().rev() {
        items.remove(i);
    }
}

fn enemy_fire_step(state: &mut GameState, rng: &mut impl Rng) {
    if state.enemies.is_empty() {
        return;
    }
    let shooter = &state.enemies[rng.gen_range(0..state.enemies.len())];
    state.enemy_bullets.push(Bullet {
        x: shooter.x,
        y: shooter.y,
    });
}

fn boss_fire_step(state: &mut GameState) {
    let Some(boss) = state.boss.as_ref().filter(|b| b.alive) else {
        return;
    };
    for heading in Heading::ALL {
        state.boss_bullets.push(BossBullet {
            x: boss.x,
            y: boss.y,
            heading,
        });
    }
}

/// Finished explosions are dropped, the rest move to their next frame.
fn explosion_step(state: &mut GameState) {
    state.explosions.retain(|e| e.frame < EXPLOSION_LAST_FRAME);
    for explosion in &mut state.explosions {
        explosion.frame += 1;
    }
}

fn boss_explosion_step(state: &mut GameState) {
    let finished = match state.boss_explosion.as_mut() {
        Some(explosion) if explosion.frame < EXPLOSION_LAST_FRAME => {
            explosion.frame += 1;
            false
        }
        _ => true,
    };
    if finished {
        state.boss_explosion = None;
        state.timers.boss_explosion.stop();
    }
}

/// A player with no lives left stays down.
fn respawn_step(state: &mut GameState) {
    if state.player.lives == 0 {
        return;
    }
    state.player.x = PLAYER_START.0;
    state.player.y = PLAYER_START.1;
    state.player.alive = true;
    state.events.push(GameEvent::PlayerRespawned);
}
