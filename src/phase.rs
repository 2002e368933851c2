/// Level sequencing: wave → boss intro → boss → victory, with the game-over
/// countdown running alongside whichever phase is current.

use tracing::info;

use crate::constants::{FORMATION_INVASION_Y, TICK_MS};
use crate::entities::{BannerStage, Boss, GameEvent, GameState, GameStatus, Phase};

/// Run once at the end of every step, after entities have moved and
/// collided.
pub(crate) fn sequence(state: &mut GameState) {
    let banner_elapsed = state.timers.banner.advance(TICK_MS);
    let game_over_elapsed = state.timers.game_over.advance(TICK_MS);

    match state.phase {
        Phase::Wave => {
            if state.enemies.is_empty() {
                enter(state, Phase::BossIntro(BannerStage::Delay));
                state.timers.banner.start();
            }
        }
        Phase::BossIntro(BannerStage::Delay) if banner_elapsed => {
            enter(state, Phase::BossIntro(BannerStage::Visible));
            state.timers.banner.start();
        }
        Phase::BossIntro(BannerStage::Visible) if banner_elapsed => begin_boss_battle(state),
        Phase::Boss => {
            if state.boss.as_ref().is_some_and(|b| b.health == 0) {
                finish_boss_battle(state);
            }
        }
        Phase::Victory(BannerStage::Delay) if banner_elapsed => {
            enter(state, Phase::Victory(BannerStage::Visible));
            state.timers.banner.start();
        }
        Phase::Victory(BannerStage::Visible) if banner_elapsed => {
            state.status = GameStatus::Won;
            state.events.push(GameEvent::MatchWon);
            info!(frame = state.frame, "match won");
            return;
        }
        _ => {}
    }

    if is_doomed(state) && !state.timers.game_over.is_active() && !game_over_elapsed {
        state.timers.game_over.start();
        state.events.push(GameEvent::GameOverPending);
        info!(lives = state.player.lives, "game over pending");
    }
    if game_over_elapsed {
        state.status = GameStatus::Lost;
        state.events.push(GameEvent::MatchLost);
        info!(frame = state.frame, "match lost");
    }
}

/// Out of lives, or the formation has marched down onto the player.
fn is_doomed(state: &GameState) -> bool {
    let invaded = state.phase == Phase::Wave
        && state
            .enemies
            .last()
            .is_some_and(|e| e.y > FORMATION_INVASION_Y);
    state.player.lives < 1 || invaded
}

fn enter(state: &mut GameState, phase: Phase) {
    info!(from = ?state.phase, to = ?phase, "phase change");
    state.phase = phase;
    state.events.push(GameEvent::PhaseChanged(phase));
}

fn begin_boss_battle(state: &mut GameState) {
    state.timers.enemy_move.stop();
    state.timers.enemy_fire.stop();
    state.boss = Some(Boss::new(state.params.boss_health));
    state.timers.boss_move.start();
    state.timers.boss_fire.start();
    enter(state, Phase::Boss);
}

fn finish_boss_battle(state: &mut GameState) {
    if let Some(boss) = state.boss.as_mut() {
        boss.alive = false;
    }
    state.timers.boss_move.stop();
    state.timers.boss_fire.stop();
    state.timers.boss_explosion.start();
    state.timers.banner.start();
    enter(state, Phase::Victory(BannerStage::Delay));
}

/// Banner flags as the presentation layer sees them.
pub fn boss_intro_banner(state: &GameState) -> bool {
    state.phase == Phase::BossIntro(BannerStage::Visible)
}

pub fn win_banner(state: &GameState) -> bool {
    state.phase == Phase::Victory(BannerStage::Visible)
}

pub fn game_over_pending(state: &GameState) -> bool {
    state.timers.game_over.is_active()
}
