//! Collision detection and response between entities
//!
//! Runs once per Playing tick, after movement. Checks run in a fixed order.
//! Once a strike moves the game out of Playing, the remaining player checks
//! are skipped: a dead player collects nothing and a failed one pairs with
//! nobody. Enemies still bump each other.

use super::entity::{Enemy, LootKind, Reaction};
use super::geom::{Hitboxed, overlap};
use super::state::{GameEvent, GamePhase, GameState};

/// Speed change applied to each enemy in a bump, before ratio scaling
const BUMP_SPEED: f32 = 10.0;

/// Run every collision check for one tick
pub fn resolve_collisions(state: &mut GameState, dt: f32) {
    player_vs_enemies(state);
    let proximity = state.tuning.enemy_bump_proximity;
    enemies_vs_enemies(&mut state.enemies, proximity, dt);
    if state.phase != GamePhase::Playing {
        return;
    }
    player_vs_boss(state);
    if state.phase != GamePhase::Playing {
        return;
    }
    player_vs_buddy(state);
    player_vs_loot(state);
}

/// Enemies touching the player hurt (unless invincible) and always respawn
fn player_vs_enemies(state: &mut GameState) {
    let player_box = state.player.hitbox();
    let hits: Vec<usize> = state
        .enemies
        .iter()
        .enumerate()
        .filter(|(_, e)| overlap(&player_box, &e.hitbox(), 0.0))
        .map(|(i, _)| i)
        .collect();

    for idx in hits {
        if !state.player.is_invincible() {
            state.strike();
        }
        state.reset_enemy(idx);
    }
}

/// Push apart every pair of enemies within bump range
pub fn enemies_vs_enemies(enemies: &mut [Enemy], proximity: f32, dt: f32) {
    for i in 0..enemies.len() {
        let (head, tail) = enemies.split_at_mut(i + 1);
        let a = &mut head[i];
        for b in tail.iter_mut() {
            if overlap(&a.hitbox(), &b.hitbox(), proximity) {
                resolve_enemy_bump(a, b, dt);
            }
        }
    }
}

/// Speed up and nudge the leading enemy, slow and pull back the trailing one
///
/// Both receive equal and opposite position and speed changes. This is a
/// separation heuristic; dense lanes may keep overlapping slightly.
pub fn resolve_enemy_bump(a: &mut Enemy, b: &mut Enemy, dt: f32) {
    let (behind, infront) = if a.body.pos.x < b.body.pos.x {
        (a, b)
    } else {
        (b, a)
    };

    let front_speed = if infront.speed.abs() > f32::EPSILON {
        infront.speed
    } else {
        f32::EPSILON
    };
    let ratio = behind.speed / front_speed;
    let dv = if ratio >= 1.0 {
        BUMP_SPEED * ratio
    } else if ratio.abs() > f32::EPSILON {
        BUMP_SPEED / ratio
    } else {
        BUMP_SPEED
    };
    let dv = dv.abs();
    let bounce = (2.0 * front_speed * ratio * dt).abs();

    infront.body.pos.x += bounce;
    infront.speed += dv;
    behind.body.pos.x -= bounce;
    behind.speed -= dv;
}

/// Sleeping boss: warn and step aside. Chasing boss: strike and send it home.
fn player_vs_boss(state: &mut GameState) {
    if !overlap(&state.player.hitbox(), &state.boss.hitbox(), 0.0) {
        return;
    }

    if state.boss.is_sleeping {
        let now = state.game_time;
        let duration = state.tuning.speech_duration;
        state.player.say(Reaction::Sleep, now, duration);
        let boss_body = state.boss.body;
        state.player.sidestep(&boss_body);
    } else {
        state.strike();
        state.boss.reset();
    }
}

/// Touching the buddy pairs up and wakes the boss
fn player_vs_buddy(state: &mut GameState) {
    if !overlap(&state.player.hitbox(), &state.buddy.hitbox(), 0.0) {
        return;
    }

    if state.buddy.pair() {
        log::info!("Buddy paired on level {}", state.level);
        let now = state.game_time;
        let duration = state.tuning.speech_duration;
        state.player.say(Reaction::Paired, now, duration);
        state.events.push(GameEvent::BuddyPaired);
    }
    if state.boss.awake() {
        log::info!("Boss is awake");
        state.events.push(GameEvent::BossAwake);
    }
}

/// Pick up loot: score, then the item's effect
fn player_vs_loot(state: &mut GameState) {
    let player_box = state.player.hitbox();

    for idx in 0..state.loot.len() {
        if !overlap(&player_box, &state.loot[idx].hitbox(), 0.0) {
            continue;
        }
        let Some(points) = state.loot[idx].collect() else {
            continue;
        };
        let kind = state.loot[idx].kind;
        state.score += u64::from(points);
        log::debug!("Collected {:?} for {} points", kind, points);
        state.events.push(GameEvent::LootCollected { kind, points });

        match kind {
            LootKind::Heart => state.player.heal(),
            LootKind::Star => {
                let now = state.game_time;
                let duration = state.tuning.invincibility_duration;
                state.player.grant_invincibility(now, duration);
            }
            LootKind::Key if state.buddy.is_paired => {
                // Loot is rebuilt for the next level; stop here
                state.finish_level();
                return;
            }
            LootKind::Unknown => {
                log::warn!("Collected an unknown loot kind; ignoring");
            }
            LootKind::Key | LootKind::BlueGem | LootKind::GreenGem | LootKind::OrangeGem => {}
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::consts::MAX_LIVES;
    use crate::sim::entity::{Loot, Species};
    use crate::sim::geom::{Body, Offset};
    use glam::Vec2;

    fn enemy_at(x: f32, speed: f32) -> Enemy {
        Enemy {
            body: Body::new(Vec2::new(x, 133.0), Vec2::new(90.0, 83.0)),
            offset: Offset::new(10.0, 10.0, -10.0, -30.0),
            species: Species::Yellow,
            speed,
            lane: 1,
        }
    }

    fn playing_state() -> GameState {
        let mut state = GameState::classic(1234);
        state.phase = GamePhase::Playing;
        // Park everything far from the player
        for enemy in &mut state.enemies {
            enemy.body.pos = Vec2::new(-5000.0, -5000.0);
        }
        for loot in &mut state.loot {
            loot.body.pos = Vec2::new(-5000.0, 5000.0);
        }
        state
    }

    #[test]
    fn test_bump_equal_and_opposite() {
        let mut slow = enemy_at(100.0, 40.0);
        let mut fast = enemy_at(150.0, 60.0);
        assert!(overlap(&slow.hitbox(), &fast.hitbox(), 80.0));

        let dt = 0.016;
        resolve_enemy_bump(&mut slow, &mut fast, dt);

        let front_dx = fast.body.pos.x - 150.0;
        let back_dx = slow.body.pos.x - 100.0;
        assert!(front_dx > 0.0);
        assert!(back_dx < 0.0);
        assert!((front_dx + back_dx).abs() < 1e-4);
        assert!((fast.speed - 75.0).abs() < 1e-4);
        assert!((slow.speed - 25.0).abs() < 1e-4);
    }

    #[test]
    fn test_bump_argument_order_irrelevant() {
        let mut slow = enemy_at(100.0, 40.0);
        let mut fast = enemy_at(150.0, 60.0);
        resolve_enemy_bump(&mut fast, &mut slow, 0.016);
        assert!(fast.body.pos.x > 150.0);
        assert!(slow.body.pos.x < 100.0);
    }

    #[test]
    fn test_far_enemies_untouched() {
        let mut enemies = vec![enemy_at(0.0, 40.0), enemy_at(600.0, 60.0)];
        enemies_vs_enemies(&mut enemies, 80.0, 0.016);
        assert_eq!(enemies[0].speed, 40.0);
        assert_eq!(enemies[1].speed, 60.0);
    }

    #[test]
    fn test_enemy_hit_last_life_game_over() {
        let mut state = playing_state();
        state.player.lives = 1;
        state.score = 700;
        state.enemies[0].body.pos = state.player.body.pos;

        resolve_collisions(&mut state, 0.016);

        assert_eq!(state.phase, GamePhase::GameOver);
        assert_eq!(state.player.lives, 0);
        assert_eq!(state.score, 700);
        assert_eq!(state.enemies[0].body.pos.x, -state.table.world_width);
    }

    #[test]
    fn test_invincible_player_still_resets_enemy() {
        let mut state = playing_state();
        state.player.grant_invincibility(0.0, 3.5);
        state.enemies[0].body.pos = state.player.body.pos;

        resolve_collisions(&mut state, 0.016);

        assert_eq!(state.phase, GamePhase::Playing);
        assert_eq!(state.player.lives, MAX_LIVES);
        assert_eq!(state.enemies[0].body.pos.x, -state.table.world_width);
    }

    #[test]
    fn test_double_hit_costs_one_life() {
        let mut state = playing_state();
        state.boss.awake();
        let boss_pos = state.player.body.pos;
        state.boss.body.pos = boss_pos;
        state.enemies[0].body.pos = state.player.body.pos;

        resolve_collisions(&mut state, 0.016);

        assert_eq!(state.phase, GamePhase::Fail);
        assert_eq!(state.player.lives, MAX_LIVES - 1);
        // Boss check skipped once the enemy hit ended Playing
        assert_eq!(state.boss.body.pos, boss_pos);
    }

    #[test]
    fn test_chasing_boss_strike_resets_boss() {
        let mut state = playing_state();
        state.boss.awake();
        state.boss.body.pos = state.player.body.pos;

        resolve_collisions(&mut state, 0.016);

        assert_eq!(state.phase, GamePhase::Fail);
        assert_eq!(state.player.lives, MAX_LIVES - 1);
        assert_eq!(state.boss.body.pos, state.boss.spawn);
        assert!(state.boss.is_chasing);
    }

    #[test]
    fn test_no_pickup_after_killing_hit() {
        let mut state = playing_state();
        state.player.lives = 1;
        state.enemies[0].body.pos = state.player.body.pos;
        state.loot[0] = Loot::new(LootKind::Heart, state.player.body.pos, 0.0, 0.0);

        resolve_collisions(&mut state, 0.016);

        assert_eq!(state.phase, GamePhase::GameOver);
        assert_eq!(state.player.lives, 0);
        assert_eq!(state.score, 0);
        assert!(!state.loot[0].collected);
    }

    #[test]
    fn test_no_pairing_while_failed() {
        let mut state = playing_state();
        state.enemies[0].body.pos = state.player.body.pos;
        state.buddy.body.pos = state.level_config().player_pos;

        resolve_collisions(&mut state, 0.016);

        assert_eq!(state.phase, GamePhase::Fail);
        assert!(!state.buddy.is_paired);
        assert!(state.boss.is_sleeping);
        assert!(!state.drain_events().contains(&GameEvent::BuddyPaired));
    }

    #[test]
    fn test_no_pickup_after_boss_strike() {
        let mut state = playing_state();
        state.boss.awake();
        state.boss.body.pos = state.player.body.pos;
        state.loot[0] = Loot::new(LootKind::Star, state.player.body.pos, 0.0, 0.0);

        resolve_collisions(&mut state, 0.016);

        assert_eq!(state.phase, GamePhase::Fail);
        assert_eq!(state.score, 0);
        assert!(!state.player.is_invincible());
    }

    #[test]
    fn test_sleeping_boss_only_warns() {
        let mut state = playing_state();
        state.player.direction = Some(crate::sim::Direction::Up);
        state.boss.body.pos = state.player.body.pos + Vec2::new(0.0, -20.0);

        resolve_collisions(&mut state, 0.016);

        assert_eq!(state.phase, GamePhase::Playing);
        assert_eq!(state.player.lives, MAX_LIVES);
        assert_eq!(state.player.speech.map(|s| s.reaction), Some(Reaction::Sleep));
        assert!(!overlap(&state.player.hitbox(), &state.boss.hitbox(), 0.0));
    }

    #[test]
    fn test_pairing_is_idempotent() {
        let mut state = playing_state();
        state.buddy.body.pos = state.player.body.pos;

        resolve_collisions(&mut state, 0.016);
        assert!(state.buddy.is_paired);
        assert!(state.boss.is_chasing);
        let events = state.drain_events();
        assert!(events.contains(&GameEvent::BuddyPaired));
        assert!(events.contains(&GameEvent::BossAwake));

        resolve_collisions(&mut state, 0.016);
        assert!(state.buddy.is_paired);
        assert!(state.boss.is_chasing);
        assert!(!state.boss.is_sleeping);
        assert!(state.drain_events().is_empty());
    }

    #[test]
    fn test_star_scores_and_protects() {
        let mut state = playing_state();
        state.loot[0] = Loot::new(LootKind::Star, state.player.body.pos, 0.0, 0.0);

        resolve_collisions(&mut state, 0.016);
        assert_eq!(state.score, 500);
        assert!(state.player.is_invincible());

        // Already collected: no double scoring
        resolve_collisions(&mut state, 0.016);
        assert_eq!(state.score, 500);
    }

    #[test]
    fn test_heart_heals_capped() {
        let mut state = playing_state();
        state.player.lives = 2;
        state.loot[0] = Loot::new(LootKind::Heart, state.player.body.pos, 0.0, 0.0);
        state.loot[1] = Loot::new(LootKind::Heart, state.player.body.pos, 0.0, 0.0);

        resolve_collisions(&mut state, 0.016);
        assert_eq!(state.player.lives, MAX_LIVES);
        assert_eq!(state.score, 1000);
    }

    #[test]
    fn test_key_without_buddy_is_just_points() {
        let mut state = playing_state();
        state.loot[0] = Loot::new(LootKind::Key, state.player.body.pos, 0.0, 0.0);

        resolve_collisions(&mut state, 0.016);
        assert_eq!(state.phase, GamePhase::Playing);
        assert_eq!(state.level, 1);
        assert_eq!(state.score, 500);
    }

    #[test]
    fn test_unknown_loot_is_noop() {
        let mut state = playing_state();
        state.loot[0] = Loot::new(LootKind::Unknown, state.player.body.pos, 0.0, 0.0);

        resolve_collisions(&mut state, 0.016);
        assert_eq!(state.score, 0);
        assert!(state.loot[0].collected);
    }
}
