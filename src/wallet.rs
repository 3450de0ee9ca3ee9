//! Persistent currency wallet
//!
//! The only thing that survives a raid: a single coin balance, round-tripped
//! through a small JSON document. Loading fails open (missing, unreadable or
//! corrupt files become a zero balance); saving is best effort via a temp
//! file renamed over the target.

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

/// Default save location, next to the executable's working directory
pub const SAVE_FILE: &str = "havoc_coins_save.json";

/// Banked currency, credited on every successful extraction
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Wallet {
    pub havoc_coins: u64,
}

impl Wallet {
    /// Load from the default save file
    pub fn load() -> Self {
        Self::load_from(Path::new(SAVE_FILE))
    }

    /// Load from `path`; any failure yields a zero balance
    pub fn load_from(path: &Path) -> Self {
        match fs::read_to_string(path) {
            Ok(json) => match serde_json::from_str::<Wallet>(&json) {
                Ok(wallet) => {
                    log::info!("loaded balance: {} coins", wallet.havoc_coins);
                    wallet
                }
                Err(err) => {
                    log::warn!("save file unreadable ({err}), starting at zero");
                    Self::default()
                }
            },
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => {
                log::info!("no save file, starting fresh");
                Self::default()
            }
            Err(err) => {
                log::warn!("could not read save file ({err}), starting at zero");
                Self::default()
            }
        }
    }

    /// Save to the default save file
    pub fn save(&self) {
        self.save_to(Path::new(SAVE_FILE));
    }

    /// Write to `path` via a sibling temp file; failures are logged and
    /// swallowed
    pub fn save_to(&self, path: &Path) {
        let json = match serde_json::to_string(self) {
            Ok(json) => json,
            Err(err) => {
                log::warn!("could not encode save ({err}), skipping");
                return;
            }
        };
        let tmp = path.with_extension("json.tmp");
        if let Err(err) = fs::write(&tmp, &json).and_then(|_| fs::rename(&tmp, path)) {
            log::warn!("could not write save file ({err}), skipping");
            return;
        }
        log::info!("saved balance: {} coins", self.havoc_coins);
    }

    /// Credit an extraction payout
    pub fn deposit(&mut self, amount: u64) {
        self.havoc_coins = self.havoc_coins.saturating_add(amount);
    }
}
