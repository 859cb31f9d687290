//! Spawn policy
//!
//! Three independent countdowns decide when enemies, eggs and enemy shots
//! appear. Cooldowns shrink and speeds grow with time survived.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::entity::{Entity, EntityKind};
use super::rng::RandomSource;
use super::state::GameState;
use super::tick::SimConfig;

/// Initial countdowns (seconds)
pub const ENEMY_INITIAL_COOLDOWN: f32 = 1.2;
pub const EGG_INITIAL_COOLDOWN: f32 = 2.5;
pub const ENEMY_SHOT_INITIAL_COOLDOWN: f32 = 1.8;

/// Enemy spawn lane and shape
pub const SPAWN_MIN_X: f32 = 0.10;
pub const SPAWN_MAX_X: f32 = 0.90;
pub const ENEMY_SPAWN_Y: f32 = -0.12;
pub const ENEMY_MIN_SIZE: f32 = 0.12;
pub const ENEMY_MAX_SIZE: f32 = 0.18;
pub const ENEMY_MAX_DRIFT: f32 = 0.225;

/// Egg shape and fall speed
pub const EGG_SPAWN_Y: f32 = -0.15;
pub const EGG_SIZE: f32 = 0.08;
pub const EGG_SPEED: f32 = 0.18;

/// Enemy shots
pub const ENEMY_BULLET_SIZE: f32 = 0.04;
pub const ENEMY_SHOT_LEAD: f32 = 0.9;
pub const ENEMY_SHOT_MAX_DRIFT: f32 = 0.4;

/// Countdown state for the three spawners
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SpawnTimers {
    pub enemy: f32,
    pub egg: f32,
    pub enemy_shot: f32,
}

impl Default for SpawnTimers {
    fn default() -> Self {
        Self {
            enemy: ENEMY_INITIAL_COOLDOWN,
            egg: EGG_INITIAL_COOLDOWN,
            enemy_shot: ENEMY_SHOT_INITIAL_COOLDOWN,
        }
    }
}

/// Enemy respawn cooldown: faster as the run goes on, floored at 0.35s
pub fn enemy_cooldown_for(elapsed_seconds: u32) -> f32 {
    (1.1 - elapsed_seconds as f32 * 0.02).clamp(0.35, 1.0)
}

/// Enemy fall speed, capped at 0.45
pub fn enemy_speed_for(elapsed_seconds: u32) -> f32 {
    (0.25 + elapsed_seconds as f32 * 0.003).min(0.45)
}

/// Enemy shot fall speed, capped at 0.95
pub fn enemy_shot_speed_for(elapsed_seconds: u32) -> f32 {
    (0.6 + elapsed_seconds as f32 * 0.003).min(0.95)
}

/// Run all spawn timers for one tick, appending new entities to the state
pub fn run_spawn_policy(
    state: &mut GameState,
    dt: f32,
    config: &SimConfig,
    rng: &mut dyn RandomSource,
) {
    state.timers.enemy -= dt;
    if state.timers.enemy <= 0.0 {
        let enemy = spawn_enemy(state, config, rng);
        state.enemies.push(enemy);
        state.timers.enemy = enemy_cooldown_for(state.elapsed_seconds);
    }

    state.timers.egg -= dt;
    if state.timers.egg <= 0.0 {
        let egg = spawn_egg(state, rng);
        state.eggs.push(egg);
        state.timers.egg = rng.range(2.5, 4.5);
    }

    if !config.enemy_fire_enabled {
        return;
    }
    state.timers.enemy_shot -= dt;
    if state.timers.enemy_shot <= 0.0 {
        // No shooter on screen: re-arm without firing
        if let Some(shot) = spawn_enemy_shot(state, rng) {
            state.enemy_bullets.push(shot);
        }
        state.timers.enemy_shot = rng.range(0.8, 1.6).max(0.45);
    }
}

fn spawn_enemy(state: &mut GameState, config: &SimConfig, rng: &mut dyn RandomSource) -> Entity {
    let x = rng.range(SPAWN_MIN_X, SPAWN_MAX_X);
    let size = rng.range(ENEMY_MIN_SIZE, ENEMY_MAX_SIZE);
    let drift = if config.enemy_horizontal_drift {
        rng.range(-ENEMY_MAX_DRIFT, ENEMY_MAX_DRIFT)
    } else {
        0.0
    };
    let id = state.next_entity_id();
    Entity::new(id, EntityKind::Enemy, Vec2::new(x, ENEMY_SPAWN_Y), size)
        .with_velocity(enemy_speed_for(state.elapsed_seconds), drift)
}

fn spawn_egg(state: &mut GameState, rng: &mut dyn RandomSource) -> Entity {
    let x = rng.range(SPAWN_MIN_X, SPAWN_MAX_X);
    let id = state.next_entity_id();
    Entity::new(id, EntityKind::Egg, Vec2::new(x, EGG_SPAWN_Y), EGG_SIZE).with_velocity(EGG_SPEED, 0.0)
}

fn spawn_enemy_shot(state: &mut GameState, rng: &mut dyn RandomSource) -> Option<Entity> {
    if state.enemies.is_empty() {
        return None;
    }
    let count = state.enemies.len();
    let index = ((rng.next_f32() * count as f32) as usize).min(count - 1);
    let origin = state.enemies[index].pos;
    let lead = ((state.player.pos.x - origin.x) * ENEMY_SHOT_LEAD)
        .clamp(-ENEMY_SHOT_MAX_DRIFT, ENEMY_SHOT_MAX_DRIFT);
    let id = state.next_entity_id();
    Some(
        Entity::new(id, EntityKind::EnemyBullet, origin, ENEMY_BULLET_SIZE)
            .with_velocity(enemy_shot_speed_for(state.elapsed_seconds), lead),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::rng::ScriptedRandom;

    fn armed_config() -> SimConfig {
        SimConfig {
            enemy_fire_enabled: true,
            enemy_horizontal_drift: true,
            ..SimConfig::default()
        }
    }

    #[test]
    fn test_enemy_cooldown_shrinks_to_floor() {
        let mut previous = enemy_cooldown_for(0);
        assert!(previous <= 1.1);
        for secs in 1..=60 {
            let cooldown = enemy_cooldown_for(secs);
            assert!((0.35..=1.1).contains(&cooldown));
            assert!(cooldown <= previous);
            // Strictly decreasing between the ceiling and the floor
            if previous < 1.0 && previous > 0.35 {
                assert!(cooldown < previous, "not decreasing at {secs}s");
            }
            previous = cooldown;
        }
        assert_eq!(enemy_cooldown_for(60), 0.35);
    }

    #[test]
    fn test_speed_curves_are_capped() {
        assert!((enemy_speed_for(0) - 0.25).abs() < 1e-6);
        assert_eq!(enemy_speed_for(1000), 0.45);
        assert!((enemy_shot_speed_for(0) - 0.6).abs() < 1e-6);
        assert_eq!(enemy_shot_speed_for(1000), 0.95);
    }

    #[test]
    fn test_enemy_spawns_when_timer_expires() {
        let mut state = GameState::default();
        let mut rng = ScriptedRandom::constant(0.5);
        state.timers.enemy = 0.01;
        run_spawn_policy(&mut state, 0.016, &armed_config(), &mut rng);

        assert_eq!(state.enemies.len(), 1);
        let enemy = &state.enemies[0];
        assert_eq!(enemy.kind, EntityKind::Enemy);
        assert!((enemy.pos.x - 0.5).abs() < 1e-6);
        assert_eq!(enemy.pos.y, ENEMY_SPAWN_Y);
        assert!((enemy.size - 0.15).abs() < 1e-6);
        assert!(enemy.horizontal_speed.abs() < 1e-6);
        assert_eq!(state.timers.enemy, enemy_cooldown_for(0));
    }

    #[test]
    fn test_enemy_drift_spans_full_range() {
        // Draw order per enemy: x, size, drift
        for (draw, expected) in [(0.0, -ENEMY_MAX_DRIFT), (0.999, ENEMY_MAX_DRIFT)] {
            let mut state = GameState::default();
            let mut rng = ScriptedRandom::new(vec![0.5, 0.5, draw]);
            state.timers.enemy = 0.0;
            run_spawn_policy(&mut state, 0.016, &armed_config(), &mut rng);
            let drift = state.enemies[0].horizontal_speed;
            assert!((drift - expected).abs() < 1e-3, "drift {drift} for draw {draw}");
            assert!((-ENEMY_MAX_DRIFT..=ENEMY_MAX_DRIFT).contains(&drift));
        }
    }

    #[test]
    fn test_no_drift_variant_spawns_straight() {
        let mut state = GameState::default();
        let mut rng = ScriptedRandom::constant(0.99);
        state.timers.enemy = 0.0;
        run_spawn_policy(&mut state, 0.016, &SimConfig::default(), &mut rng);
        assert_eq!(state.enemies[0].horizontal_speed, 0.0);
    }

    #[test]
    fn test_egg_spawn_and_reset_range() {
        let mut state = GameState::default();
        let mut rng = ScriptedRandom::new(vec![0.0, 0.999]);
        state.timers.egg = 0.0;
        run_spawn_policy(&mut state, 0.016, &SimConfig::default(), &mut rng);

        assert_eq!(state.eggs.len(), 1);
        assert_eq!(state.eggs[0].size, EGG_SIZE);
        assert_eq!(state.eggs[0].vertical_speed, EGG_SPEED);
        assert!((2.5..4.5).contains(&state.timers.egg));
    }

    #[test]
    fn test_enemy_shot_requires_shooter() {
        let mut state = GameState::default();
        let mut rng = ScriptedRandom::constant(0.1);
        state.timers.enemy_shot = 0.0;
        run_spawn_policy(&mut state, 0.016, &armed_config(), &mut rng);
        assert!(state.enemy_bullets.is_empty());
        assert!(state.timers.enemy_shot >= 0.45);
    }

    #[test]
    fn test_enemy_shot_leads_toward_player() {
        let mut state = GameState::default();
        let shooter_id = state.next_entity_id();
        state.enemies.push(
            Entity::new(shooter_id, EntityKind::Enemy, Vec2::new(0.1, 0.2), 0.15).with_velocity(0.3, 0.0),
        );
        state.player.pos.x = 0.9;
        state.timers.enemy_shot = 0.0;
        let mut rng = ScriptedRandom::constant(0.0);
        run_spawn_policy(&mut state, 0.016, &armed_config(), &mut rng);

        assert_eq!(state.enemy_bullets.len(), 1);
        let shot = &state.enemy_bullets[0];
        assert_eq!(shot.pos, Vec2::new(0.1, 0.2));
        assert_eq!(shot.horizontal_speed, ENEMY_SHOT_MAX_DRIFT);
        assert!((shot.vertical_speed - 0.6).abs() < 1e-6);
        assert!(shot.id > shooter_id);
    }

    #[test]
    fn test_enemy_fire_disabled_never_shoots() {
        let mut state = GameState::default();
        let id = state.next_entity_id();
        state
            .enemies
            .push(Entity::new(id, EntityKind::Enemy, Vec2::new(0.5, 0.2), 0.15));
        state.timers.enemy_shot = 0.0;
        let mut rng = ScriptedRandom::constant(0.5);
        run_spawn_policy(&mut state, 0.016, &SimConfig::default(), &mut rng);
        assert!(state.enemy_bullets.is_empty());
    }
}
