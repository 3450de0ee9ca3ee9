//! The raid simulation
//!
//! All gameplay logic lives here, free of rendering and platform
//! dependencies:
//! - Stable update order within a tick
//! - Seeded RNG only
//! - Time injected as `f64` seconds from a [`Clock`]

pub mod clock;
pub mod collision;
pub mod loot;
pub mod state;
pub mod tick;

pub use clock::{Clock, ManualClock, SystemClock};
pub use collision::Rect;
pub use loot::{Item, RaidEconomy, generate_container_loot};
pub use state::{Container, Enemy, Medkit, Player, Projectile, RaidPhase, RaidState, ReloadState};
pub use tick::{TickInput, tick};
