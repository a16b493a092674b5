//! Per-frame simulation tick
//!
//! Core game loop step: apply one command, advance phase timers, and while
//! Playing move every entity and resolve collisions.

use serde::{Deserialize, Serialize};

use super::collision::resolve_collisions;
use super::entity::{Direction, LootKind};
use super::state::{GameEvent, GamePhase, GameState};

/// Discrete player commands
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Command {
    Move(Direction),
    TogglePause,
    /// Start the game, or restart after it ended
    Confirm,
}

/// Input for a single tick: at most one command
#[derive(Debug, Clone, Default)]
pub struct TickInput {
    pub command: Option<Command>,
}

impl TickInput {
    pub fn with(command: Command) -> Self {
        Self {
            command: Some(command),
        }
    }
}

/// Advance the game state by `dt` seconds
///
/// `dt` is clamped to `[0, tuning.max_dt]` so a stalled frame cannot teleport
/// entities.
pub fn tick(state: &mut GameState, input: &TickInput, dt: f32) {
    let dt = if dt.is_finite() {
        dt.clamp(0.0, state.tuning.max_dt)
    } else {
        0.0
    };
    state.clock += dt;

    if let Some(command) = input.command {
        apply_command(state, command);
    }

    state.advance_phase_timer();

    if state.phase != GamePhase::Playing {
        return;
    }

    update(state, dt);
    resolve_collisions(state, dt);
}

fn apply_command(state: &mut GameState, command: Command) {
    match (command, state.phase) {
        (Command::Confirm, GamePhase::Start) => {
            state.set_phase(GamePhase::Playing);
            state.events.push(GameEvent::Started);
        }
        (Command::Confirm, phase) if phase.is_terminal() => state.restart(),
        (Command::TogglePause, GamePhase::Playing) => {
            state.set_phase(GamePhase::Paused);
            state.events.push(GameEvent::Paused);
        }
        (Command::TogglePause, GamePhase::Paused) => {
            state.set_phase(GamePhase::Playing);
            state.events.push(GameEvent::Resumed);
        }
        (Command::Move(dir), GamePhase::Playing) => state.player.queue_move(dir),
        _ => {}
    }
}

/// Move everything one step (Playing only)
fn update(state: &mut GameState, dt: f32) {
    state.game_time += dt;
    let now = state.game_time;

    // Enemy count only ratchets up
    if now >= state.next_spawn_at {
        state.spawn_enemy();
        state.next_spawn_at += state.tuning.enemy_spawn_interval.max(f32::EPSILON);
    }

    // Collected items come back at once; the key waits for the buddy
    for idx in 0..state.loot.len() {
        let loot = &state.loot[idx];
        let withheld = loot.kind == LootKind::Key && !state.buddy.is_paired;
        if loot.collected || withheld {
            state.respawn_loot(idx);
        }
    }

    let cfg = state.table.level(state.level);
    for enemy in &mut state.enemies {
        enemy.update(dt, &mut state.rng, &state.table, &cfg.enemy_lanes);
    }

    state.player.update(&cfg.bounds, now);

    let target = state.player.body.pos;
    let chase_factor = state.tuning.boss_chase_factor();
    state.boss.update(dt, target, chase_factor);
}
