//! Moving game objects and background decoration

use glam::Vec2;
use serde::{Deserialize, Serialize};

use crate::consts::*;

/// Entity categories
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum EntityKind {
    Player,
    Enemy,
    /// Player shot, travels up
    Bullet,
    /// Enemy shot, travels down toward the player
    EnemyBullet,
    /// Bonus pickup
    Egg,
}

/// A moving game object
///
/// `size` is a diameter, expressed as a fraction of the shorter playfield
/// dimension. Speeds are playfield units per second.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Entity {
    pub id: u64,
    pub kind: EntityKind,
    pub pos: Vec2,
    pub size: f32,
    pub vertical_speed: f32,
    pub horizontal_speed: f32,
}

impl Entity {
    pub fn new(id: u64, kind: EntityKind, pos: Vec2, size: f32) -> Self {
        debug_assert!(size > 0.0, "entity size must be positive");
        Self {
            id,
            kind,
            pos,
            size: size.max(f32::EPSILON),
            vertical_speed: 0.0,
            horizontal_speed: 0.0,
        }
    }

    pub fn with_velocity(mut self, vertical_speed: f32, horizontal_speed: f32) -> Self {
        self.vertical_speed = vertical_speed;
        self.horizontal_speed = horizontal_speed;
        self
    }

    /// Move by one timestep. Player bullets climb, everything else falls.
    /// Enemies bounce off the drift lanes.
    pub fn advance(&mut self, dt: f32) {
        match self.kind {
            EntityKind::Player => {}
            EntityKind::Bullet => {
                self.pos.y -= self.vertical_speed * dt;
                self.pos.x += self.horizontal_speed * dt;
            }
            EntityKind::Enemy => {
                self.pos.y += self.vertical_speed * dt;
                self.pos.x += self.horizontal_speed * dt;
                if self.pos.x < ENEMY_DRIFT_MIN_X {
                    self.pos.x = ENEMY_DRIFT_MIN_X;
                    self.horizontal_speed = self.horizontal_speed.abs();
                } else if self.pos.x > ENEMY_DRIFT_MAX_X {
                    self.pos.x = ENEMY_DRIFT_MAX_X;
                    self.horizontal_speed = -self.horizontal_speed.abs();
                }
            }
            EntityKind::EnemyBullet | EntityKind::Egg => {
                self.pos.y += self.vertical_speed * dt;
                self.pos.x += self.horizontal_speed * dt;
            }
        }
    }

    /// Returns true once the entity has left the playfield for good
    pub fn is_out_of_bounds(&self) -> bool {
        match self.kind {
            EntityKind::Player => false,
            EntityKind::Bullet | EntityKind::EnemyBullet => {
                self.pos.y <= PROJECTILE_MIN_Y
                    || self.pos.x < PROJECTILE_MIN_X
                    || self.pos.x > PROJECTILE_MAX_X
            }
            EntityKind::Enemy | EntityKind::Egg => self.pos.y >= FALLING_MAX_Y,
        }
    }
}

/// The player's ship
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Player {
    pub pos: Vec2,
    pub size: f32,
}

impl Default for Player {
    fn default() -> Self {
        Self {
            pos: Vec2::new(PLAYER_START_X, PLAYER_START_Y),
            size: PLAYER_SIZE,
        }
    }
}

impl Player {
    /// Move by a delta, staying inside the movement box
    pub fn move_by(&mut self, delta: Vec2) {
        let target = self.pos + delta;
        if !target.is_finite() {
            return;
        }
        self.pos = target.clamp(
            Vec2::new(PLAYER_MIN_X, PLAYER_MIN_Y),
            Vec2::new(PLAYER_MAX_X, PLAYER_MAX_Y),
        );
    }

    /// The ship as a collision body
    pub fn as_entity(&self) -> Entity {
        Entity::new(0, EntityKind::Player, self.pos, self.size)
    }

    /// Where a fresh bullet appears
    pub fn muzzle(&self) -> Vec2 {
        Vec2::new(self.pos.x, self.pos.y - self.size * BULLET_SPAWN_OFFSET)
    }
}

/// Background star (cosmetic only)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Star {
    pub id: u32,
    pub pos: Vec2,
    pub size: f32,
    pub speed: f32,
}

impl Star {
    /// Scroll down, wrapping back to the top past the bottom edge
    pub fn advance(&mut self, dt: f32) {
        self.pos.y += self.speed * dt;
        if self.pos.y > 1.0 {
            self.pos.y = self.pos.y.rem_euclid(1.0);
        }
    }
}
