use space_invaders::compute::*;
use space_invaders::config::Difficulty;
use space_invaders::constants::*;
use space_invaders::entities::*;
use space_invaders::snapshot::Snapshot;

use rand::rngs::StdRng;
use rand::SeedableRng;

fn seeded_rng() -> StdRng {
    StdRng::seed_from_u64(42)
}

/// Wave-phase state with a frozen, silent formation.
fn quiet_state() -> GameState {
    let mut s = init_state(Difficulty::Easy.params());
    s.timers.enemy_move.stop();
    s.timers.enemy_fire.stop();
    s
}

/// A boss battle already under way, with the boss parked and not shooting.
fn boss_battle(health: u32) -> GameState {
    let mut s = quiet_state();
    s.enemies.clear();
    s.phase = Phase::Boss;
    let mut boss = Boss::new(Difficulty::Easy.params().boss_health);
    boss.health = health;
    s.boss = Some(boss);
    s
}

/// Tick until `done` holds, collecting every event on the way.  Panics if it
/// takes more than `max` steps.
fn run_until(
    mut state: GameState,
    rng: &mut StdRng,
    max: usize,
    done: impl Fn(&GameState) -> bool,
) -> (GameState, usize, Vec<GameEvent>) {
    let mut events = Vec::new();
    for n in 1..=max {
        state = tick(&state, rng);
        events.extend(state.events.iter().cloned());
        if done(&state) {
            return (state, n, events);
        }
    }
    panic!("condition not reached within {max} ticks");
}

const BANNER_TICKS: usize = (BANNER_DELAY_MS / TICK_MS) as usize;

// ── Wave → boss intro → boss ──────────────────────────────────────────────────

#[test]
fn cleared_wave_starts_boss_intro() {
    let mut s = quiet_state();
    s.enemies.clear();
    let s2 = tick(&s, &mut seeded_rng());
    assert_eq!(s2.phase, Phase::BossIntro(BannerStage::Delay));
    assert!(s2
        .events
        .contains(&GameEvent::PhaseChanged(Phase::BossIntro(BannerStage::Delay))));
    assert!(s2.timers.banner.is_active());
    assert!(!Snapshot::of(&s2).boss_intro_banner);
}

#[test]
fn wave_continues_while_enemies_remain() {
    let s = quiet_state();
    let s2 = tick(&s, &mut seeded_rng());
    assert_eq!(s2.phase, Phase::Wave);
}

#[test]
fn boss_intro_shows_banner_then_starts_battle() {
    let mut s = quiet_state();
    s.enemies.clear();
    s.timers.enemy_fire.start();
    s.timers.enemy_move.start();
    let mut rng = seeded_rng();

    let (s, _, _) = run_until(s, &mut rng, 10, |s| s.phase != Phase::Wave);
    let (s, n, _) = run_until(s, &mut rng, 2 * BANNER_TICKS, |s| {
        s.phase == Phase::BossIntro(BannerStage::Visible)
    });
    assert!(n >= BANNER_TICKS - 1 && n <= BANNER_TICKS + 1);
    assert!(Snapshot::of(&s).boss_intro_banner);
    assert!(s.boss.is_none());

    let (s, n, _) = run_until(s, &mut rng, 2 * BANNER_TICKS, |s| s.phase == Phase::Boss);
    assert!(n >= BANNER_TICKS - 1 && n <= BANNER_TICKS + 1);
    assert!(!Snapshot::of(&s).boss_intro_banner);

    let boss = s.boss.as_ref().unwrap();
    assert!(boss.alive);
    assert_eq!(boss.health, 20);
    assert_eq!(boss.total_health, 20);
    assert_eq!((boss.x, boss.y), BOSS_START);
    assert!(!s.timers.enemy_move.is_active());
    assert!(!s.timers.enemy_fire.is_active());
    assert!(s.timers.boss_move.is_active());
    assert!(s.timers.boss_fire.is_active());
}

#[test]
fn boss_moves_and_fires_during_battle() {
    let mut s = boss_battle(20);
    s.timers.boss_move.start();
    s.timers.boss_fire.start();
    let ticks = (Difficulty::Easy.params().boss_fire_ms / TICK_MS) as usize;
    let mut rng = seeded_rng();
    let (s, _, _) = run_until(s, &mut rng, ticks, |s| !s.boss_bullets.is_empty());
    assert_eq!(s.boss_bullets.len(), 3);
    assert!(s.boss.as_ref().unwrap().x > BOSS_START.0);
}

// ── Boss defeat → victory ─────────────────────────────────────────────────────

#[test]
fn final_hit_starts_victory_sequence() {
    let mut s = boss_battle(1);
    // Rises onto the boss on the first bullet step.
    s.player_bullets = vec![Bullet { x: 250, y: 40 + PLAYER_BULLET_STEP }];
    let mut rng = seeded_rng();
    let (s, n, events) = run_until(s, &mut rng, 4, |s| s.phase != Phase::Boss);
    assert_eq!(n, 2);

    let boss = s.boss.as_ref().unwrap();
    assert_eq!(boss.health, 0);
    assert!(!boss.alive);
    assert_eq!(s.boss_explosion, Some(Explosion { x: 250, y: 40, frame: 0 }));
    assert_eq!(s.phase, Phase::Victory(BannerStage::Delay));
    assert!(s.timers.banner.is_active());
    assert!(s.timers.boss_explosion.is_active());
    assert!(!s.timers.boss_fire.is_active());
    assert!(events.contains(&GameEvent::BossDefeated { x: 250, y: 40 }));
    assert!(!Snapshot::of(&s).win_banner);
}

#[test]
fn victory_banner_then_match_won() {
    let mut s = boss_battle(1);
    s.player_bullets = vec![Bullet { x: 250, y: 40 + PLAYER_BULLET_STEP }];
    let mut rng = seeded_rng();
    let (s, _, _) = run_until(s, &mut rng, 4, |s| s.phase != Phase::Boss);

    let (s, _, _) = run_until(s, &mut rng, 2 * BANNER_TICKS, |s| {
        s.phase == Phase::Victory(BannerStage::Visible)
    });
    assert!(Snapshot::of(&s).win_banner);
    assert_eq!(s.status, GameStatus::Playing);

    let (s, n, events) =
        run_until(s, &mut rng, 2 * BANNER_TICKS, |s| s.status != GameStatus::Playing);
    assert!(n >= BANNER_TICKS - 1 && n <= BANNER_TICKS + 1);
    assert_eq!(s.status, GameStatus::Won);
    assert_eq!(events.iter().filter(|e| **e == GameEvent::MatchWon).count(), 1);
    assert_eq!(s.events, vec![GameEvent::MatchWon]);
}

#[test]
fn boss_explosion_plays_out_and_clears() {
    let mut s = boss_battle(1);
    s.player_bullets = vec![Bullet { x: 250, y: 40 + PLAYER_BULLET_STEP }];
    let mut rng = seeded_rng();
    let mut last_frame = 0;
    for _ in 0..2 * BANNER_TICKS {
        s = tick(&s, &mut rng);
        match &s.boss_explosion {
            Some(e) => {
                assert!(e.frame <= EXPLOSION_LAST_FRAME);
                assert!(e.frame >= last_frame);
                last_frame = e.frame;
            }
            None if last_frame > 0 => break,
            None => {}
        }
    }
    assert_eq!(last_frame, EXPLOSION_LAST_FRAME);
    assert!(s.boss_explosion.is_none());
    assert!(!s.timers.boss_explosion.is_active());
}

#[test]
fn finished_match_no_longer_changes() {
    let mut s = boss_battle(1);
    s.status = GameStatus::Won;
    s.enemy_bullets = vec![Bullet { x: 100, y: 100 }];
    let s2 = tick(&s, &mut seeded_rng());
    assert_eq!(s2.frame, s.frame);
    assert_eq!(s2.enemy_bullets, s.enemy_bullets);
    assert!(s2.events.is_empty());
}

// ── Game over ─────────────────────────────────────────────────────────────────

#[test]
fn last_life_lost_starts_game_over_once() {
    let mut s = quiet_state();
    s.player.lives = 1;
    s.enemy_bullets = vec![Bullet { x: 350, y: 410 - ENEMY_BULLET_STEP }];
    let mut rng = seeded_rng();

    let (s, n, events) = run_until(s, &mut rng, 4, |s| s.player.lives == 0);
    assert_eq!(n, 2);
    assert!(!s.player.alive);
    assert!(events.contains(&GameEvent::GameOverPending));
    assert!(Snapshot::of(&s).game_over_pending);

    // More bullets through the player's old spot change nothing.
    let mut s = s;
    s.enemy_bullets.push(Bullet { x: 350, y: 405 });
    let (s, n, more) =
        run_until(s, &mut rng, 3 * BANNER_TICKS, |s| s.status != GameStatus::Playing);
    assert!(n >= BANNER_TICKS - 3 && n <= BANNER_TICKS + 1);
    assert_eq!(s.status, GameStatus::Lost);

    let all: Vec<_> = events.iter().chain(&more).collect();
    assert_eq!(all.iter().filter(|e| ***e == GameEvent::GameOverPending).count(), 1);
    assert_eq!(all.iter().filter(|e| ***e == GameEvent::MatchLost).count(), 1);
    assert_eq!(s.player.lives, 0);
}

#[test]
fn entities_keep_moving_while_game_over_pending() {
    let mut s = quiet_state();
    s.player.lives = 1;
    s.enemy_bullets = vec![Bullet { x: 350, y: 407 }, Bullet { x: 100, y: 200 }];
    let mut rng = seeded_rng();
    let (s, _, _) = run_until(s, &mut rng, 4, |s| s.player.lives == 0);
    let y_before = s.enemy_bullets[0].y;
    let frame_before = s.explosions[0].frame;

    let s = (0..40).fold(s, |s, _| tick(&s, &mut rng));
    assert_eq!(s.status, GameStatus::Playing);
    assert!(s.enemy_bullets[0].y > y_before);
    assert!(s.explosions[0].frame > frame_before);
}

#[test]
fn no_respawn_without_lives() {
    let mut s = quiet_state();
    s.player.lives = 1;
    s.enemy_bullets = vec![Bullet { x: 350, y: 407 }];
    let mut rng = seeded_rng();
    let (s, _, events) =
        run_until(s, &mut rng, 3 * BANNER_TICKS, |s| s.status != GameStatus::Playing);
    assert!(!s.player.alive);
    assert!(!events.contains(&GameEvent::PlayerRespawned));
}

#[test]
fn invading_formation_ends_the_match() {
    let mut s = quiet_state();
    for enemy in &mut s.enemies {
        enemy.y += FORMATION_INVASION_Y - 140 + FORMATION_STEP;
    }
    let s2 = tick(&s, &mut seeded_rng());
    assert!(s2.events.contains(&GameEvent::GameOverPending));
    assert_eq!(s2.player.lives, 3);
}

#[test]
fn formation_at_invasion_line_is_still_safe() {
    let mut s = quiet_state();
    for enemy in &mut s.enemies {
        enemy.y += FORMATION_INVASION_Y - 140;
    }
    let s2 = tick(&s, &mut seeded_rng());
    assert!(!s2.events.contains(&GameEvent::GameOverPending));
}

#[test]
fn boss_battle_can_be_lost() {
    let mut s = boss_battle(10);
    s.player.lives = 1;
    s.boss_bullets = vec![BossBullet { x: 350, y: 407, heading: Heading::Down }];
    let mut rng = seeded_rng();
    let (s, _, events) =
        run_until(s, &mut rng, 3 * BANNER_TICKS, |s| s.status != GameStatus::Playing);
    assert_eq!(s.status, GameStatus::Lost);
    assert!(events.contains(&GameEvent::MatchLost));
    assert_eq!(s.phase, Phase::Boss);
}

// ── Snapshot ──────────────────────────────────────────────────────────────────

#[test]
fn snapshot_reports_boss_health_fraction() {
    let s = boss_battle(5);
    let snap = Snapshot::of(&s);
    let boss = snap.boss.unwrap();
    assert!((boss.health_fraction - 0.25).abs() < f32::EPSILON);
    assert!(boss.alive);
}

#[test]
fn snapshot_mirrors_the_store() {
    let s = quiet_state();
    let snap = Snapshot::of(&s);
    assert_eq!(snap.lives, 3);
    assert!(snap.player_alive);
    assert_eq!(snap.player, PLAYER_START);
    assert_eq!(snap.enemies.len(), 30);
    assert!(snap.boss.is_none());
    assert!(!snap.boss_intro_banner && !snap.win_banner && !snap.game_over_pending);
    assert_eq!(snap.phase, Phase::Wave);
    assert_eq!(snap.status, GameStatus::Playing);
}
