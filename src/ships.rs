//! Ship upgrade catalog

use std::fmt;

use crate::audio::SoundEffect;
use crate::persistence::PlayerRepository;

/// One purchasable ship tier
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ShipLevel {
    pub level: u32,
    /// Price of buying this tier; `None` for the last one
    pub price_points: Option<u64>,
    pub damage: u32,
}

pub const SHIP_LEVELS: [ShipLevel; 5] = [
    ShipLevel { level: 1, price_points: Some(2000), damage: 1 },
    ShipLevel { level: 2, price_points: Some(3000), damage: 2 },
    ShipLevel { level: 3, price_points: Some(7000), damage: 3 },
    ShipLevel { level: 4, price_points: Some(11000), damage: 4 },
    ShipLevel { level: 5, price_points: None, damage: 5 },
];

pub fn max_level() -> u32 {
    SHIP_LEVELS.iter().map(|s| s.level).max().unwrap_or(1)
}

/// Tier by level, falling back to the first tier
pub fn by_level(level: u32) -> ShipLevel {
    SHIP_LEVELS
        .iter()
        .copied()
        .find(|s| s.level == level)
        .unwrap_or(SHIP_LEVELS[0])
}

pub fn next_of(level: u32) -> Option<ShipLevel> {
    SHIP_LEVELS.iter().copied().find(|s| s.level == level + 1)
}

/// Why an upgrade was refused
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PurchaseError {
    /// Already on the top tier, or the next tier has no price
    MaxLevel,
    NotEnoughPoints { price: u64, available: u64 },
}

impl fmt::Display for PurchaseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PurchaseError::MaxLevel => write!(f, "ship is already at the top tier"),
            PurchaseError::NotEnoughPoints { price, available } => {
                write!(f, "need {price} points, have {available}")
            }
        }
    }
}

impl std::error::Error for PurchaseError {}

/// Buy the tier after the player's current ship
pub fn buy_next_ship(repo: &mut dyn PlayerRepository) -> Result<ShipLevel, PurchaseError> {
    let player = repo.player();
    let next = next_of(player.ship_level).ok_or(PurchaseError::MaxLevel)?;
    let price = next.price_points.ok_or(PurchaseError::MaxLevel)?;
    if !repo.try_spend(price as i64) {
        return Err(PurchaseError::NotEnoughPoints {
            price,
            available: player.points,
        });
    }
    repo.set_ship_level(next.level);
    log::info!("Ship upgraded to level {} for {} points", next.level, price);
    Ok(next)
}

/// Cue to play after a purchase attempt
pub fn purchase_cue(outcome: &Result<ShipLevel, PurchaseError>) -> Option<SoundEffect> {
    match outcome {
        Ok(_) => Some(SoundEffect::ShipPurchase),
        Err(PurchaseError::NotEnoughPoints { .. }) => Some(SoundEffect::NotEnoughMoney),
        Err(PurchaseError::MaxLevel) => None,
    }
}
