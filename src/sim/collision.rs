//! Collision detection and resolution
//!
//! Every body is a circle whose diameter is its `size`. Resolution runs in a
//! fixed order and each entity is consumed at most once per tick.

use glam::Vec2;

use super::entity::Entity;
use super::state::{GameEvent, GameState};
use crate::consts::*;

/// Strict circle overlap: touching circles do not collide
#[inline]
pub fn circles_overlap(a_pos: Vec2, a_size: f32, b_pos: Vec2, b_size: f32) -> bool {
    a_pos.distance(b_pos) < (a_size + b_size) * 0.5
}

/// Check collision between two entities
#[inline]
pub fn collides(a: &Entity, b: &Entity) -> bool {
    circles_overlap(a.pos, a.size, b.pos, b.size)
}

/// Resolve all collisions for one tick, in order:
/// 1. player bullets vs enemies
/// 2. surviving bullets vs enemy bullets
/// 3. enemies vs player (contact or reaching the bottom)
/// 4. enemy bullets vs player
/// 5. eggs vs player
pub fn resolve_collisions(state: &mut GameState, events: &mut Vec<GameEvent>) {
    bullets_vs_enemies(state, events);
    bullets_vs_enemy_bullets(state, events);

    let player = state.player.as_entity();
    enemies_vs_player(state, &player, events);
    enemy_bullets_vs_player(state, &player, events);
    eggs_vs_player(state, &player, events);
}

fn bullets_vs_enemies(state: &mut GameState, events: &mut Vec<GameEvent>) {
    let bullets = std::mem::take(&mut state.bullets);
    let mut survivors = Vec::with_capacity(bullets.len());

    for bullet in bullets {
        match state.enemies.iter().position(|enemy| collides(&bullet, enemy)) {
            Some(hit) => {
                state.enemies.remove(hit);
                state.score += ENEMY_KILL_SCORE;
                state.enemies_down += 1;
                state.gain_energy(ENEMY_KILL_ENERGY);
                events.push(GameEvent::EnemyDestroyed);
            }
            None => survivors.push(bullet),
        }
    }
    state.bullets = survivors;
}

fn bullets_vs_enemy_bullets(state: &mut GameState, events: &mut Vec<GameEvent>) {
    if state.enemy_bullets.is_empty() {
        return;
    }
    let bullets = std::mem::take(&mut state.bullets);
    let mut survivors = Vec::with_capacity(bullets.len());

    for bullet in bullets {
        match state.enemy_bullets.iter().position(|shot| collides(&bullet, shot)) {
            Some(hit) => {
                state.enemy_bullets.remove(hit);
                state.score += SHOT_DOWN_SCORE;
                state.gain_energy(SHOT_DOWN_ENERGY);
                events.push(GameEvent::EnemyBulletDestroyed);
            }
            None => survivors.push(bullet),
        }
    }
    state.bullets = survivors;
}

fn enemies_vs_player(state: &mut GameState, player: &Entity, events: &mut Vec<GameEvent>) {
    let mut hits = 0u32;
    state.enemies.retain(|enemy| {
        let reached_bottom = enemy.pos.y >= ENEMY_BOTTOM_Y;
        if reached_bottom || collides(enemy, player) {
            hits += 1;
            false
        } else {
            true
        }
    });
    for _ in 0..hits {
        state.lose_life();
        events.push(GameEvent::PlayerHit);
    }
}

fn enemy_bullets_vs_player(state: &mut GameState, player: &Entity, events: &mut Vec<GameEvent>) {
    let before = state.enemy_bullets.len();
    state.enemy_bullets.retain(|shot| !collides(shot, player));
    for _ in state.enemy_bullets.len()..before {
        state.lose_life();
        events.push(GameEvent::PlayerHit);
    }
}

fn eggs_vs_player(state: &mut GameState, player: &Entity, events: &mut Vec<GameEvent>) {
    let before = state.eggs.len();
    state.eggs.retain(|egg| !collides(egg, player));
    for _ in state.eggs.len()..before {
        state.bonus_eggs += 1;
        state.score += EGG_SCORE;
        state.gain_energy(EGG_ENERGY);
        events.push(GameEvent::EggCollected);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::entity::EntityKind;
    use crate::sim::state::GamePhase;

    fn entity(state: &mut GameState, kind: EntityKind, x: f32, y: f32, size: f32) -> Entity {
        let id = state.next_entity_id();
        Entity::new(id, kind, Vec2::new(x, y), size)
    }

    fn running() -> GameState {
        GameState {
            phase: GamePhase::Running,
            energy: 0.5,
            ..GameState::default()
        }
    }

    #[test]
    fn test_touching_circles_do_not_collide() {
        // Distance 0.5, radius sum 0.5
        assert!(!circles_overlap(Vec2::new(0.0, 0.0), 0.5, Vec2::new(0.5, 0.0), 0.5));
        assert!(circles_overlap(Vec2::new(0.0, 0.0), 0.5, Vec2::new(0.499, 0.0), 0.5));
    }

    #[test]
    fn test_collision_is_symmetric() {
        let a = Entity::new(1, EntityKind::Bullet, Vec2::new(0.3, 0.3), 0.035);
        let b = Entity::new(2, EntityKind::Enemy, Vec2::new(0.32, 0.31), 0.15);
        assert_eq!(collides(&a, &b), collides(&b, &a));
    }

    #[test]
    fn test_bullet_destroys_first_enemy_only() {
        let mut state = running();
        let bullet = entity(&mut state, EntityKind::Bullet, 0.5, 0.4, 0.035);
        let first = entity(&mut state, EntityKind::Enemy, 0.5, 0.4, 0.15);
        let second = entity(&mut state, EntityKind::Enemy, 0.51, 0.4, 0.15);
        state.bullets.push(bullet);
        state.enemies.push(first);
        state.enemies.push(second.clone());

        let mut events = Vec::new();
        resolve_collisions(&mut state, &mut events);

        assert!(state.bullets.is_empty());
        assert_eq!(state.enemies, vec![second]);
        assert_eq!(state.score, ENEMY_KILL_SCORE);
        assert_eq!(state.enemies_down, 1);
        assert!((state.energy - 0.55).abs() < 1e-6);
        assert_eq!(events, vec![GameEvent::EnemyDestroyed]);
    }

    #[test]
    fn test_enemy_hit_takes_priority_over_enemy_bullet() {
        let mut state = running();
        let bullet = entity(&mut state, EntityKind::Bullet, 0.5, 0.4, 0.035);
        let enemy = entity(&mut state, EntityKind::Enemy, 0.5, 0.4, 0.15);
        let shot = entity(&mut state, EntityKind::EnemyBullet, 0.5, 0.4, 0.04);
        state.bullets.push(bullet);
        state.enemies.push(enemy);
        state.enemy_bullets.push(shot);

        let mut events = Vec::new();
        resolve_collisions(&mut state, &mut events);

        assert!(state.enemies.is_empty());
        assert_eq!(state.enemy_bullets.len(), 1);
        assert_eq!(events, vec![GameEvent::EnemyDestroyed]);
    }

    #[test]
    fn test_bullet_shoots_down_enemy_bullet() {
        let mut state = running();
        let bullet = entity(&mut state, EntityKind::Bullet, 0.3, 0.4, 0.035);
        let shot = entity(&mut state, EntityKind::EnemyBullet, 0.3, 0.41, 0.04);
        state.bullets.push(bullet);
        state.enemy_bullets.push(shot);

        let mut events = Vec::new();
        resolve_collisions(&mut state, &mut events);

        assert!(state.bullets.is_empty());
        assert!(state.enemy_bullets.is_empty());
        assert_eq!(state.score, SHOT_DOWN_SCORE);
        assert!((state.energy - 0.52).abs() < 1e-6);
    }

    #[test]
    fn test_enemy_reaching_bottom_costs_a_life() {
        let mut state = running();
        let enemy = entity(&mut state, EntityKind::Enemy, 0.1, ENEMY_BOTTOM_Y, 0.12);
        state.enemies.push(enemy);

        let mut events = Vec::new();
        resolve_collisions(&mut state, &mut events);

        assert!(state.enemies.is_empty());
        assert_eq!(state.lives, STARTING_LIVES - 1);
        assert_eq!(events, vec![GameEvent::PlayerHit]);
    }

    #[test]
    fn test_enemy_bullet_hits_player() {
        let mut state = running();
        let (x, y) = (state.player.pos.x, state.player.pos.y);
        let shot = entity(&mut state, EntityKind::EnemyBullet, x, y, 0.04);
        state.enemy_bullets.push(shot);

        let mut events = Vec::new();
        resolve_collisions(&mut state, &mut events);

        assert!(state.enemy_bullets.is_empty());
        assert_eq!(state.lives, STARTING_LIVES - 1);
    }

    #[test]
    fn test_lives_never_negative() {
        let mut state = running();
        state.lives = 1;
        let (x, y) = (state.player.pos.x, state.player.pos.y);
        for _ in 0..3 {
            let enemy = entity(&mut state, EntityKind::Enemy, x, y, 0.15);
            state.enemies.push(enemy);
        }
        let mut events = Vec::new();
        resolve_collisions(&mut state, &mut events);
        assert_eq!(state.lives, 0);
        assert_eq!(events.len(), 3);
    }

    #[test]
    fn test_egg_pickup() {
        let mut state = running();
        state.energy = 0.9;
        let (x, y) = (state.player.pos.x, state.player.pos.y);
        let egg = entity(&mut state, EntityKind::Egg, x + 0.05, y, 0.08);
        state.eggs.push(egg);

        let mut events = Vec::new();
        resolve_collisions(&mut state, &mut events);

        assert!(state.eggs.is_empty());
        assert_eq!(state.bonus_eggs, 1);
        assert_eq!(state.score, EGG_SCORE);
        assert_eq!(state.energy, 1.0);
        assert_eq!(events, vec![GameEvent::EggCollected]);
    }
}
