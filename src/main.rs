//! Blockfield entry point
//!
//! Headless driver: runs one autopilot raid at the reference tick rate on a
//! hand-stepped clock and prints the outcome. The interactive front ends
//! (touch or keyboard/mouse) are thin adapters producing the same
//! [`TickInput`] stream; this one doubles as a smoke test of the full loop.

use glam::Vec2;

use blockfield::aim_angle;
use blockfield::consts::*;
use blockfield::sim::{Clock, ManualClock, RaidPhase, RaidState, TickInput, tick};
use blockfield::wallet::Wallet;

fn main() {
    env_logger::init();

    let seed = std::env::args()
        .nth(1)
        .and_then(|arg| arg.parse().ok())
        .unwrap_or(0xB10C_F1E1D);
    log::info!("autopilot raid, seed {seed}");

    let wallet = Wallet::load();
    let mut state = RaidState::new(seed, wallet);
    let mut clock = ManualClock::new();
    let dt = 1.0 / TICK_RATE;

    let mut input = TickInput {
        start_raid: true,
        ..Default::default()
    };
    let mut last_phase = state.phase;
    let mut looted: Vec<usize> = Vec::new();

    // Cap the run at 20 minutes of simulated time
    let max_ticks = (20.0 * 60.0 * TICK_RATE) as u64;
    for _ in 0..max_ticks {
        tick(&mut state, &input, clock.now());

        if state.phase != last_phase {
            log::info!("phase: {last_phase:?} -> {:?}", state.phase);
            if state.phase == RaidPhase::Success {
                // Bank the payout immediately, not just on exit
                state.wallet.save();
            }
            last_phase = state.phase;
        }
        if matches!(state.phase, RaidPhase::Dead | RaidPhase::Success) {
            break;
        }

        input = autopilot(&state, &mut looted);
        clock.advance(dt);
    }

    match state.phase {
        RaidPhase::Success => println!(
            "extracted with {} coins of loot; balance now {}",
            state.extracted_value, state.wallet.havoc_coins
        ),
        RaidPhase::Dead => println!(
            "raid lost; {} coins of loot stayed behind, balance {}",
            state.current_raid_value, state.wallet.havoc_coins
        ),
        _ => println!("raid timed out in phase {:?}", state.phase),
    }
    state.wallet.save();
}

/// Compute the next tick's intents: loot every container once, fight back
/// when threatened, then hold the extraction zone
fn autopilot(state: &RaidState, looted: &mut Vec<usize>) -> TickInput {
    let player = &state.player;
    let mut input = TickInput::default();

    // Return fire at the nearest enemy inside its own attack range
    input.fire = state
        .enemies
        .iter()
        .map(|e| (e.pos.distance_squared(player.pos), e.pos))
        .min_by(|a, b| a.0.total_cmp(&b.0))
        .filter(|(d2, _)| *d2 < ENEMY_ATTACK_RANGE * ENEMY_ATTACK_RANGE)
        .map(|(_, pos)| aim_angle(player.pos, pos));
    if player.ammo == 0 {
        input.reload = true;
    }

    // Work the container we are standing on until it runs dry
    if let Some(ci) = state.adjacent_container
        && !looted.contains(&ci)
    {
        let container = &state.containers[ci];
        if !container.is_open {
            input.toggle_interact = true;
        } else if !container.items.is_empty() && player.can_pickup() {
            input.transfer_slot = Some(0);
        } else {
            input.toggle_interact = true;
            looted.push(ci);
        }
        return input;
    }

    // Walk to the nearest unvisited container, then to extraction
    let target = state
        .containers
        .iter()
        .enumerate()
        .filter(|(i, _)| !looted.contains(i))
        .map(|(_, c)| c.pos)
        .min_by(|a, b| {
            a.distance_squared(player.pos)
                .total_cmp(&b.distance_squared(player.pos))
        })
        .unwrap_or_else(|| state.extract_zone.center());
    let to_target = target - player.pos;
    if to_target.length() > PLAYER_SPEED {
        input.movement = to_target.normalize();
    }
    input
}
