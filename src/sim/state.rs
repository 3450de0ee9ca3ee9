//! Entity models and the raid session root
//!
//! Cooldowns are wall-clock timestamps (seconds) supplied by the driver's
//! clock; movement and projectile advance are per-tick displacements at the
//! 60 Hz reference rate.

use glam::Vec2;
use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;

use super::collision::Rect;
use super::loot::{self, Item, RaidEconomy};
use crate::angle_to_dir;
use crate::consts::*;
use crate::wallet::Wallet;

/// Current phase of a session
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RaidPhase {
    /// Between raids; banked balance on display
    Menu,
    /// Active raid
    Playing,
    /// Raid lost; loot forfeited
    Dead,
    /// Standing in the extraction zone, countdown running
    Extracting,
    /// Extraction complete; loot banked
    Success,
}

/// A bullet in flight, owned by whoever fired it
#[derive(Debug, Clone, Copy)]
pub struct Projectile {
    pub pos: Vec2,
    pub angle: f32,
    pub speed: f32,
    pub damage: u32,
    pub created: f64,
}

impl Projectile {
    /// Advance one tick along the firing angle
    pub fn advance(&mut self) {
        self.pos += angle_to_dir(self.angle) * self.speed;
    }
}

/// Reload progress; the enum makes a second in-flight reload unrepresentable
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ReloadState {
    Idle,
    Reloading { started: f64 },
}

/// The operator
#[derive(Debug, Clone)]
pub struct Player {
    pub pos: Vec2,
    pub health: u32,
    pub max_health: u32,
    pub ammo: u32,
    pub max_ammo: u32,
    pub reload: ReloadState,
    /// Aim angle recorded on the last successful shot
    pub facing: f32,
    pub rect: Rect,
    pub projectiles: Vec<Projectile>,
    /// Fixed-size backpack; `None` slots are free
    pub inventory: Vec<Option<Item>>,
    last_shot: f64,
    last_damage: f64,
}

impl Player {
    pub fn new() -> Self {
        let pos = Vec2::new(FIELD_WIDTH / 2.0, FIELD_HEIGHT / 2.0);
        Self {
            pos,
            health: PLAYER_MAX_HEALTH,
            max_health: PLAYER_MAX_HEALTH,
            ammo: PLAYER_MAX_AMMO,
            max_ammo: PLAYER_MAX_AMMO,
            reload: ReloadState::Idle,
            facing: 0.0,
            rect: Rect::from_center(pos, PLAYER_SIZE, PLAYER_SIZE),
            projectiles: Vec::new(),
            inventory: vec![None; INVENTORY_SLOTS],
            // Armed in the past so the first shot/hit is never suppressed
            last_shot: -1.0 / PLAYER_FIRE_RATE,
            last_damage: -PLAYER_DAMAGE_COOLDOWN,
        }
    }

    /// Move by the intent vector (each axis in [-1, 1]) and clamp to the
    /// soft-walled field
    pub fn integrate(&mut self, intent: Vec2) {
        self.pos += intent * PLAYER_SPEED;
        self.pos.x = self.pos.x.clamp(WALL_PADDING, FIELD_WIDTH - WALL_PADDING);
        self.pos.y = self.pos.y.clamp(WALL_PADDING, FIELD_HEIGHT - WALL_PADDING);
        self.rect = Rect::from_center(self.pos, PLAYER_SIZE, PLAYER_SIZE);
    }

    pub fn is_reloading(&self) -> bool {
        matches!(self.reload, ReloadState::Reloading { .. })
    }

    /// Fire toward `angle`. No-op while reloading, out of ammo, or inside
    /// the fire-rate window. Returns whether a shot left the barrel.
    pub fn shoot(&mut self, angle: f32, now: f64) -> bool {
        if self.is_reloading() || self.ammo == 0 {
            return false;
        }
        if now - self.last_shot < 1.0 / PLAYER_FIRE_RATE {
            return false;
        }
        self.last_shot = now;
        self.ammo -= 1;
        self.facing = angle;
        self.projectiles.push(Projectile {
            pos: self.pos,
            angle,
            speed: PLAYER_SHOT_SPEED,
            damage: PLAYER_SHOT_DAMAGE,
            created: now,
        });
        true
    }

    /// Apply damage unless inside the invulnerability window.
    /// Returns true if this hit was lethal.
    pub fn take_damage(&mut self, amount: u32, now: f64) -> bool {
        if now - self.last_damage < PLAYER_DAMAGE_COOLDOWN {
            return false;
        }
        self.last_damage = now;
        self.health = self.health.saturating_sub(amount);
        self.health == 0
    }

    /// Medkit effect: +50 capped at max from the lower half, full heal from
    /// the upper half
    pub fn heal(&mut self) {
        if self.health <= 50 {
            self.health = (self.health + 50).min(self.max_health);
        } else {
            self.health = self.max_health;
        }
    }

    /// Begin a reload; ignored while one is running or the magazine is full
    pub fn start_reload(&mut self, now: f64) {
        if !self.is_reloading() && self.ammo < self.max_ammo {
            self.reload = ReloadState::Reloading { started: now };
        }
    }

    /// Complete the reload once its duration has elapsed
    pub fn update_reload(&mut self, now: f64) {
        if let ReloadState::Reloading { started } = self.reload
            && now - started >= PLAYER_RELOAD_TIME
        {
            self.finish_reload();
        }
    }

    /// Force-complete a reload (extraction grants it for free)
    pub fn finish_reload(&mut self) {
        if self.is_reloading() {
            self.ammo = self.max_ammo;
            self.reload = ReloadState::Idle;
        }
    }

    /// Reload completion fraction for the HUD, if one is running
    pub fn reload_progress(&self, now: f64) -> Option<f32> {
        match self.reload {
            ReloadState::Reloading { started } => {
                Some(((now - started) / PLAYER_RELOAD_TIME).clamp(0.0, 1.0) as f32)
            }
            ReloadState::Idle => None,
        }
    }

    pub fn can_pickup(&self) -> bool {
        self.inventory.iter().any(|slot| slot.is_none())
    }

    /// First-fit insert; false when the backpack is full
    pub fn add_to_inventory(&mut self, item: Item) -> bool {
        for slot in &mut self.inventory {
            if slot.is_none() {
                *slot = Some(item);
                return true;
            }
        }
        false
    }

    /// Market value of everything currently carried
    pub fn inventory_value(&self) -> u64 {
        self.inventory.iter().flatten().map(|item| item.value).sum()
    }
}

impl Default for Player {
    fn default() -> Self {
        Self::new()
    }
}

/// A hostile that closes on the player and fires in range
#[derive(Debug, Clone)]
pub struct Enemy {
    pub pos: Vec2,
    pub health: u32,
    pub damage: u32,
    pub rect: Rect,
    pub projectiles: Vec<Projectile>,
    last_attack: f64,
}

impl Enemy {
    pub fn new(pos: Vec2) -> Self {
        Self {
            pos,
            health: ENEMY_HEALTH,
            damage: ENEMY_DAMAGE,
            rect: Rect::from_center(pos, ENEMY_SIZE, ENEMY_SIZE),
            projectiles: Vec::new(),
            last_attack: -ENEMY_ATTACK_COOLDOWN,
        }
    }

    /// Chase the player; fire when in range and off cooldown
    pub fn update(&mut self, player_pos: Vec2, now: f64) {
        let to_player = player_pos - self.pos;
        let dist = to_player.length();
        if dist > 0.0 {
            self.pos += to_player / dist * ENEMY_SPEED;
        }
        self.rect = Rect::from_center(self.pos, ENEMY_SIZE, ENEMY_SIZE);

        if dist < ENEMY_ATTACK_RANGE && now - self.last_attack >= ENEMY_ATTACK_COOLDOWN {
            self.last_attack = now;
            self.projectiles.push(Projectile {
                pos: self.pos,
                angle: to_player.y.atan2(to_player.x),
                speed: ENEMY_SHOT_SPEED,
                damage: self.damage,
                created: now,
            });
        }
    }

    /// Unconditional damage; returns true when destroyed
    pub fn take_damage(&mut self, amount: u32) -> bool {
        self.health = self.health.saturating_sub(amount);
        self.health == 0
    }
}

/// A dropped medkit; consumed on contact
#[derive(Debug, Clone, Copy)]
pub struct Medkit {
    pub rect: Rect,
}

/// A lootable container placed at raid setup
#[derive(Debug, Clone)]
pub struct Container {
    pub pos: Vec2,
    pub name: &'static str,
    pub rect: Rect,
    pub items: Vec<Item>,
    pub is_open: bool,
}

impl Container {
    pub fn new(pos: Vec2, name: &'static str, items: Vec<Item>) -> Self {
        Self {
            pos,
            name,
            rect: Rect::from_center(pos, CONTAINER_SIZE, CONTAINER_SIZE),
            items,
            is_open: false,
        }
    }

    /// Move the item at `index` into the player's backpack and return its
    /// value. Fails closed: on a bad index or a full backpack nothing moves.
    pub fn transfer_item(&mut self, index: usize, player: &mut Player) -> Option<u64> {
        if index >= self.items.len() || !player.can_pickup() {
            return None;
        }
        let item = self.items.remove(index);
        if player.add_to_inventory(item) {
            Some(item.value)
        } else {
            // Unreachable with the guard above; keeps the transfer atomic
            self.items.insert(index, item);
            None
        }
    }

    /// Accept an item back from the player; false when at capacity
    pub fn receive_item(&mut self, item: Item) -> bool {
        if self.items.len() < CONTAINER_CAPACITY {
            self.items.push(item);
            true
        } else {
            false
        }
    }
}

/// Fixed container placements for every raid
const CONTAINER_LAYOUT: [(&str, Vec2); 6] = [
    ("Jacket", Vec2::new(200.0, 150.0)),
    ("Wardrobe", Vec2::new(1000.0, 180.0)),
    ("Weapon Crate", Vec2::new(250.0, 550.0)),
    ("Deluxe Cache", Vec2::new(950.0, 600.0)),
    ("Storage Box", Vec2::new(600.0, 300.0)),
    ("Field Supply Crate", Vec2::new(650.0, 500.0)),
];

/// Attempts at placing a medkit clear of containers before giving up for
/// the tick
const MEDKIT_PLACEMENT_ATTEMPTS: usize = 64;

/// The complete session: raid entities, economy, and the banked wallet
#[derive(Debug)]
pub struct RaidState {
    pub phase: RaidPhase,
    pub player: Player,
    pub enemies: Vec<Enemy>,
    pub containers: Vec<Container>,
    pub medkits: Vec<Medkit>,
    pub extract_zone: Rect,
    /// First container (list order) overlapping the player, if any
    pub adjacent_container: Option<usize>,
    pub inventory_open: bool,
    /// Value of everything currently in the backpack
    pub current_raid_value: u64,
    /// Value banked on the last successful extraction
    pub extracted_value: u64,
    pub extraction_start: f64,
    /// Rare-spawn pity state; survives across raids
    pub economy: RaidEconomy,
    pub wallet: Wallet,
    pub(crate) last_enemy_spawn: f64,
    pub(crate) last_medkit_spawn: f64,
    pub(crate) rng: Pcg32,
}

impl RaidState {
    /// A fresh session in the menu, holding the loaded wallet
    pub fn new(seed: u64, wallet: Wallet) -> Self {
        Self {
            phase: RaidPhase::Menu,
            player: Player::new(),
            enemies: Vec::new(),
            containers: Vec::new(),
            medkits: Vec::new(),
            extract_zone: Rect::new(
                FIELD_WIDTH - EXTRACT_ZONE_INSET,
                FIELD_HEIGHT - EXTRACT_ZONE_INSET,
                EXTRACT_ZONE_SIZE,
                EXTRACT_ZONE_SIZE,
            ),
            adjacent_container: None,
            inventory_open: false,
            current_raid_value: 0,
            extracted_value: 0,
            extraction_start: 0.0,
            economy: RaidEconomy::default(),
            wallet,
            last_enemy_spawn: 0.0,
            last_medkit_spawn: 0.0,
            rng: Pcg32::seed_from_u64(seed),
        }
    }

    /// Reset everything raid-scoped and enter Playing. Pity counters carry
    /// over from previous raids and tick up here, before containers roll
    /// their loot.
    pub fn start_raid(&mut self, now: f64) {
        self.player = Player::new();
        self.enemies.clear();
        self.medkits.clear();
        self.containers.clear();
        self.adjacent_container = None;
        self.inventory_open = false;
        self.current_raid_value = 0;
        self.extracted_value = 0;
        self.economy.begin_raid();

        for (name, pos) in CONTAINER_LAYOUT {
            let items = loot::generate_container_loot(&mut self.rng, &mut self.economy);
            self.containers.push(Container::new(pos, name, items));
        }
        for _ in 0..ENEMY_WAVE_SIZE {
            self.spawn_enemy(now);
        }
        // The first medkit is due on the first tick
        self.last_medkit_spawn = now - MEDKIT_SPAWN_INTERVAL;

        self.phase = RaidPhase::Playing;
        log::info!(
            "raid started (star pity {}, tank pity {})",
            self.economy.africa_star_counter,
            self.economy.tank_counter
        );
    }

    /// Spawn one enemy just outside a uniformly chosen field edge
    pub(crate) fn spawn_enemy(&mut self, now: f64) {
        let padding = 100.0;
        let pos = match self.rng.random_range(0..4u8) {
            0 => Vec2::new(
                self.rng.random_range(padding..=FIELD_WIDTH - padding),
                -50.0,
            ),
            1 => Vec2::new(
                FIELD_WIDTH + 50.0,
                self.rng.random_range(padding..=FIELD_HEIGHT - padding),
            ),
            2 => Vec2::new(
                self.rng.random_range(padding..=FIELD_WIDTH - padding),
                FIELD_HEIGHT + 50.0,
            ),
            _ => Vec2::new(
                -50.0,
                self.rng.random_range(padding..=FIELD_HEIGHT - padding),
            ),
        };
        self.enemies.push(Enemy::new(pos));
        self.last_enemy_spawn = now;
    }

    /// Place one medkit clear of every container (bounded rejection
    /// sampling; on exhaustion the timer is left armed and we retry next
    /// tick)
    pub(crate) fn spawn_medkit(&mut self, now: f64) {
        for _ in 0..MEDKIT_PLACEMENT_ATTEMPTS {
            let center = Vec2::new(
                self.rng
                    .random_range(WALL_PADDING..=FIELD_WIDTH - WALL_PADDING),
                self.rng
                    .random_range(WALL_PADDING..=FIELD_HEIGHT - WALL_PADDING),
            );
            let rect = Rect::from_center(center, MEDKIT_SIZE, MEDKIT_SIZE);
            if self.containers.iter().all(|c| !rect.overlaps(&c.rect)) {
                self.medkits.push(Medkit { rect });
                self.last_medkit_spawn = now;
                return;
            }
        }
        log::debug!("no clear medkit position found, retrying next tick");
    }

    /// Take the item at `index` from the open adjacent container
    pub fn transfer_slot(&mut self, index: usize) {
        let Some(ci) = self.adjacent_container else {
            return;
        };
        if !self.containers[ci].is_open {
            return;
        }
        if let Some(value) = self.containers[ci].transfer_item(index, &mut self.player) {
            self.current_raid_value += value;
        }
    }

    /// Put the backpack item at `slot` back into the open adjacent container
    pub fn stash_slot(&mut self, slot: usize) {
        let Some(ci) = self.adjacent_container else {
            return;
        };
        let container = &mut self.containers[ci];
        if !container.is_open {
            return;
        }
        let Some(item) = self.player.inventory.get(slot).copied().flatten() else {
            return;
        };
        if container.receive_item(item) {
            self.player.inventory[slot] = None;
            self.current_raid_value = self.current_raid_value.saturating_sub(item.value);
        }
    }
}
