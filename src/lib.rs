//! Blockfield - a top-down arcade extraction shooter
//!
//! Core modules:
//! - `sim`: the raid simulation (entities, loot, per-tick update, state machine)
//! - `wallet`: persistent currency saved between sessions
//!
//! The crate is front-end agnostic: a driver feeds [`sim::TickInput`] intents
//! into [`sim::tick`] once per fixed tick and renders from the public fields
//! of [`sim::RaidState`]. `main.rs` ships a headless autopilot driver.

pub mod sim;
pub mod wallet;

pub use sim::{RaidPhase, RaidState, TickInput, tick};
pub use wallet::Wallet;

use glam::Vec2;

/// Game configuration constants
pub mod consts {
    /// Reference tick rate (ticks per second); per-tick speeds assume this
    pub const TICK_RATE: f64 = 60.0;

    /// Playfield dimensions
    pub const FIELD_WIDTH: f32 = 1900.0;
    pub const FIELD_HEIGHT: f32 = 1000.0;
    /// Soft walls inset the walkable area on every side
    pub const WALL_PADDING: f32 = 50.0;

    /// Player defaults
    pub const PLAYER_SIZE: f32 = 30.0;
    pub const PLAYER_SPEED: f32 = 5.0; // px per tick
    pub const PLAYER_MAX_HEALTH: u32 = 100;
    pub const PLAYER_MAX_AMMO: u32 = 60;
    /// Shots per second
    pub const PLAYER_FIRE_RATE: f64 = 6.0;
    pub const PLAYER_RELOAD_TIME: f64 = 3.5;
    /// Invulnerability window between hits, seconds
    pub const PLAYER_DAMAGE_COOLDOWN: f64 = 1.0;
    pub const PLAYER_SHOT_SPEED: f32 = 15.0; // px per tick
    pub const PLAYER_SHOT_DAMAGE: u32 = 25;
    pub const INVENTORY_SLOTS: usize = 25;

    /// Enemy defaults
    pub const ENEMY_SIZE: f32 = 30.0;
    pub const ENEMY_SPEED: f32 = 2.0; // px per tick
    pub const ENEMY_HEALTH: u32 = 100;
    pub const ENEMY_DAMAGE: u32 = 15;
    pub const ENEMY_ATTACK_RANGE: f32 = 300.0;
    pub const ENEMY_ATTACK_COOLDOWN: f64 = 1.0;
    pub const ENEMY_SHOT_SPEED: f32 = 10.0; // px per tick
    /// Distance from an enemy's center at which a shot connects
    pub const ENEMY_HIT_RADIUS: f32 = 20.0;

    /// Spawning
    pub const ENEMY_WAVE_SIZE: usize = 5;
    pub const ENEMY_SPAWN_INTERVAL: f64 = 60.0;
    pub const MEDKIT_SPAWN_INTERVAL: f64 = 30.0;
    pub const MEDKIT_SIZE: f32 = 30.0;

    /// Containers
    pub const CONTAINER_SIZE: f32 = 50.0;
    pub const CONTAINER_CAPACITY: usize = 7;

    /// Extraction zone (square, inset from the bottom-right corner)
    pub const EXTRACT_ZONE_SIZE: f32 = 100.0;
    pub const EXTRACT_ZONE_INSET: f32 = 150.0;
    /// Continuous seconds inside the zone required to extract
    pub const EXTRACTION_TIME: f64 = 10.0;
}

/// Unit direction vector for an angle in radians
#[inline]
pub fn angle_to_dir(angle: f32) -> Vec2 {
    Vec2::new(angle.cos(), angle.sin())
}

/// Angle (radians) of the vector from `from` to `to`
#[inline]
pub fn aim_angle(from: Vec2, to: Vec2) -> f32 {
    (to.y - from.y).atan2(to.x - from.x)
}
