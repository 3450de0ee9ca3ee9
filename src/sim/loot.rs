//! Loot catalog and container generation
//!
//! Items are fixed catalog entries: a name, a display color for the grid UI,
//! and a market value. Containers roll 3-7 items per raid setup; the two
//! rare items are session-unique and carry raid-count pity timers so a dry
//! streak is bounded.

use rand::Rng;
use rand::distr::Distribution;
use rand::distr::weighted::WeightedIndex;

use crate::consts::CONTAINER_CAPACITY;

/// RGB display color for inventory/container grids
pub type Color = [u8; 3];

pub const WHITE: Color = [255, 255, 255];
pub const RED: Color = [255, 0, 0];
pub const GREEN: Color = [0, 255, 0];
pub const BLUE: Color = [0, 0, 255];
pub const PURPLE: Color = [128, 0, 128];
pub const GOLD: Color = [255, 215, 0];

/// A lootable valuable; immutable once generated
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Item {
    pub name: &'static str,
    pub color: Color,
    pub value: u64,
}

pub const PIRATE_SILVER_COIN: Item = Item {
    name: "Pirate Silver Coin",
    color: BLUE,
    value: 13_000,
};

pub const SOLVENT: Item = Item {
    name: "Solvent",
    color: GREEN,
    value: 3_600,
};

pub const MOUSE: Item = Item {
    name: "Mouse",
    color: WHITE,
    value: 1_000,
};

pub const SPY_PEN: Item = Item {
    name: "Spy Pen",
    color: PURPLE,
    value: 32_000,
};

pub const PIRATE_GOLD_COIN: Item = Item {
    name: "Pirate Gold Coin",
    color: GOLD,
    value: 65_000,
};

/// Common loot with draw weights (sampling is with replacement)
pub const COMMON_LOOT: [(Item, u32); 5] = [
    (PIRATE_SILVER_COIN, 40),
    (SOLVENT, 30),
    (MOUSE, 30),
    (SPY_PEN, 10),
    (PIRATE_GOLD_COIN, 5),
];

/// Jackpot rare; at most one per raid
pub const AFRICA_STAR: Item = Item {
    name: "Africa Star",
    color: RED,
    value: 13_460_000,
};

/// Secondary rare; at most one per raid
pub const TANK: Item = Item {
    name: "Tank",
    color: RED,
    value: 30_610,
};

/// Minimum items rolled per container
pub const MIN_CONTAINER_ITEMS: usize = 3;

/// Africa Star base chance per container and pity threshold (raids)
pub const AFRICA_STAR_CHANCE: f64 = 0.01;
pub const AFRICA_STAR_PITY: u32 = 100;

/// Tank base chance per container and pity threshold (raids)
pub const TANK_CHANCE: f64 = 0.02;
pub const TANK_PITY: u32 = 50;

/// Rare-spawn bookkeeping that outlives any single raid
///
/// The pity counters tick up once per raid setup and reset to 0 only when
/// the corresponding rare actually spawns; the spawned flags scope
/// uniqueness to the current raid. Held by the session and passed by
/// reference into generation so tests can inject any starting state.
#[derive(Debug, Clone, Default)]
pub struct RaidEconomy {
    /// Raids since the Africa Star last spawned
    pub africa_star_counter: u32,
    /// Raids since the Tank last spawned
    pub tank_counter: u32,
    pub africa_star_spawned: bool,
    pub tank_spawned: bool,
}

impl RaidEconomy {
    /// Per-raid-setup bookkeeping, called once before containers generate.
    ///
    /// The increment always happens, even when generation will reset the
    /// counter moments later in the same setup.
    pub fn begin_raid(&mut self) {
        self.africa_star_counter += 1;
        self.tank_counter += 1;
        self.africa_star_spawned = false;
        self.tank_spawned = false;
    }
}

/// Roll the contents of one container.
///
/// Rare checks run first and consume slots from the rolled target count;
/// the remainder is weighted common loot. Both rares may land in the same
/// container.
pub fn generate_container_loot(rng: &mut impl Rng, economy: &mut RaidEconomy) -> Vec<Item> {
    let mut items = Vec::with_capacity(CONTAINER_CAPACITY);
    let mut remaining = rng.random_range(MIN_CONTAINER_ITEMS..=CONTAINER_CAPACITY);

    if !economy.africa_star_spawned
        && (rng.random::<f64>() < AFRICA_STAR_CHANCE
            || economy.africa_star_counter >= AFRICA_STAR_PITY)
    {
        items.push(AFRICA_STAR);
        economy.africa_star_spawned = true;
        economy.africa_star_counter = 0;
        remaining = remaining.saturating_sub(1);
        log::debug!("rare spawn: {}", AFRICA_STAR.name);
    }

    if !economy.tank_spawned
        && (rng.random::<f64>() < TANK_CHANCE || economy.tank_counter >= TANK_PITY)
    {
        items.push(TANK);
        economy.tank_spawned = true;
        economy.tank_counter = 0;
        remaining = remaining.saturating_sub(1);
        log::debug!("rare spawn: {}", TANK.name);
    }

    // Weights are const and non-zero, so the index always builds
    let table = WeightedIndex::new(COMMON_LOOT.iter().map(|(_, w)| *w))
        .expect("common loot weights are valid");
    for _ in 0..remaining {
        items.push(COMMON_LOOT[table.sample(rng)].0);
    }

    items
}
