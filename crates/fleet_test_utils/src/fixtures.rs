//! Test fixtures and helpers.
//!
//! Pre-built battles and ship configurations
//! for consistent testing.

use glam::Vec2;
use tracing_subscriber::EnvFilter;

use fleet_core::components::{ShipId, WeaponKind};
use fleet_core::config::SimConfig;
use fleet_core::fleets::FleetId;
use fleet_core::ship::ShipSpawnParams;
use fleet_core::simulation::Simulation;

/// Install a test-friendly tracing subscriber.
///
/// Honours `RUST_LOG`, defaulting to `warn`. Safe to call from every test;
/// only the first call installs anything.
pub fn init_test_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_test_writer()
        .try_init();
}

/// Default configuration with a smaller fleet strength.
#[must_use]
pub fn battle_config(fleet_strength: usize) -> SimConfig {
    SimConfig {
        fleet_strength,
        ..SimConfig::default()
    }
}

/// A simulation with both fleets already at `fleet_strength`.
///
/// # Panics
///
/// Panics if the built-in configuration fails validation.
#[must_use]
pub fn populated_battle(fleet_strength: usize) -> Simulation {
    let mut sim = Simulation::new(battle_config(fleet_strength)).expect("built-in config is valid");
    sim.populate_fleets();
    sim
}

/// Spawn a stationary cruiser with an explicit loadout.
pub fn spawn_armed(
    sim: &mut Simulation,
    fleet: FleetId,
    position: Vec2,
    loadout: &[WeaponKind],
) -> ShipId {
    spawn_hull(sim, fleet, position, "cruiser", loadout)
}

/// Spawn a stationary ship of hull `type_key` with an explicit loadout.
pub fn spawn_hull(
    sim: &mut Simulation,
    fleet: FleetId,
    position: Vec2,
    type_key: &str,
    loadout: &[WeaponKind],
) -> ShipId {
    sim.spawn_ship_with(
        ShipSpawnParams::new(position, fleet, type_key)
            .with_loadout(loadout.to_vec())
            .with_velocity(Vec2::ZERO),
    )
}

/// Two stationary cruisers facing each other `distance` apart on the
/// arena's horizontal midline. Returns `(fleet1_ship, fleet2_ship)`.
pub fn duel(
    sim: &mut Simulation,
    distance: f32,
    attacker: &[WeaponKind],
    defender: &[WeaponKind],
) -> (ShipId, ShipId) {
    let center = sim.world().arena.center();
    let a = spawn_armed(sim, FleetId::Fleet1, center - Vec2::new(distance / 2.0, 0.0), attacker);
    let b = spawn_armed(sim, FleetId::Fleet2, center + Vec2::new(distance / 2.0, 0.0), defender);
    (a, b)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_duel_spacing() {
        let mut sim = Simulation::default();
        let (a, b) = duel(&mut sim, 300.0, &[WeaponKind::Coilgun], &[WeaponKind::PulseLaser]);
        let arena = sim.world().arena;
        let d = arena.distance(sim.ship(a).unwrap().position, sim.ship(b).unwrap().position);
        assert!((d - 300.0).abs() < 1e-3);
    }

    #[test]
    fn test_populated_battle_strength() {
        init_test_tracing();
        let sim = populated_battle(4);
        assert_eq!(sim.world().ships.count_fleet(FleetId::Fleet1), 4);
        assert_eq!(sim.world().ships.count_fleet(FleetId::Fleet2), 4);
    }
}
