//! Lockstep replay checks for the simulation.
//!
//! Two simulations built by the same setup function are stepped side by
//! side. After every tick their [`TickEvents`] and [`WorldSnapshot`]s must
//! be equal; the first mismatch is reported as a [`Divergence`] carrying
//! both sides, so a failing test shows exactly what split.
//!
//! Within one process run the sources of drift are:
//!
//! - **Iteration order**: ships and projectiles live in ordered maps and
//!   are visited by id.
//! - **Randomness**: every roll comes from the PCG generator seeded from
//!   [`fleet_core::config::SimConfig::seed`].
//! - **Mid-pass mutation**: spawns are buffered and removals only flag.

use std::fmt;
use std::thread;

use fleet_core::simulation::{Simulation, TickEvents};
use fleet_core::snapshot::WorldSnapshot;

/// What differed between two lockstepped runs.
#[derive(Debug, Clone, PartialEq)]
pub enum Mismatch {
    /// The runs started from different states.
    Setup(Box<(WorldSnapshot, WorldSnapshot)>),
    /// The tick produced different events.
    Events(Box<(TickEvents, TickEvents)>),
    /// The events matched but the resulting state did not.
    State(Box<(WorldSnapshot, WorldSnapshot)>),
}

/// First point at which two runs split.
#[derive(Debug, Clone, PartialEq)]
pub struct Divergence {
    /// Tick counter of the left run when the mismatch was seen.
    pub tick: u64,
    /// The differing halves.
    pub mismatch: Mismatch,
}

impl fmt::Display for Divergence {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.mismatch {
            Mismatch::Setup(_) => write!(f, "runs differ before the first tick"),
            Mismatch::Events(pair) => write!(
                f,
                "tick {} events differ: {} vs {} damage events, {} vs {} removals",
                self.tick,
                pair.0.damage.len(),
                pair.1.damage.len(),
                pair.0.destroyed_ships.len() + pair.0.destroyed_projectiles.len(),
                pair.1.destroyed_ships.len() + pair.1.destroyed_projectiles.len(),
            ),
            Mismatch::State(pair) => {
                let ship = pair
                    .0
                    .ships
                    .iter()
                    .zip(&pair.1.ships)
                    .find(|(l, r)| l != r)
                    .map(|(l, _)| l.id.to_string());
                write!(
                    f,
                    "tick {} state differs (first ship: {})",
                    self.tick,
                    ship.as_deref().unwrap_or("projectiles only")
                )
            }
        }
    }
}

impl std::error::Error for Divergence {}

/// Step two runs of `setup` in lockstep for `ticks` ticks at `time_scale`.
///
/// Returns the final snapshot when the runs never split.
///
/// # Errors
///
/// Returns the first [`Divergence`].
pub fn lockstep<F>(setup: F, ticks: u64, time_scale: f32) -> Result<WorldSnapshot, Divergence>
where
    F: Fn() -> Simulation,
{
    let mut left = setup();
    let mut right = setup();

    let (l, r) = (left.snapshot(), right.snapshot());
    if l != r {
        return Err(Divergence {
            tick: 0,
            mismatch: Mismatch::Setup(Box::new((l, r))),
        });
    }

    let mut last = l;
    for _ in 0..ticks {
        let (le, re) = (left.tick(time_scale), right.tick(time_scale));
        if le != re {
            return Err(Divergence {
                tick: left.get_tick(),
                mismatch: Mismatch::Events(Box::new((le, re))),
            });
        }
        let (l, r) = (left.snapshot(), right.snapshot());
        if l != r {
            return Err(Divergence {
                tick: left.get_tick(),
                mismatch: Mismatch::State(Box::new((l, r))),
            });
        }
        last = l;
    }
    Ok(last)
}

/// Panic with a readable report unless two runs of `setup` stay in lockstep.
///
/// # Panics
///
/// Panics on the first divergence.
pub fn assert_lockstep<F>(setup: F, ticks: u64)
where
    F: Fn() -> Simulation,
{
    if let Err(divergence) = lockstep(setup, ticks, 1.0) {
        panic!("simulation diverged: {divergence}");
    }
}

/// Run `setup` on `count` scoped threads for `ticks` ticks each and return
/// every final state hash.
///
/// # Panics
///
/// Panics if a simulation thread panics.
pub fn parallel_hashes<F>(setup: F, count: usize, ticks: u64) -> Vec<u64>
where
    F: Fn() -> Simulation + Sync,
{
    thread::scope(|s| {
        let runs: Vec<_> = (0..count)
            .map(|_| {
                s.spawn(|| {
                    let mut sim = setup();
                    for _ in 0..ticks {
                        sim.tick(1.0);
                    }
                    sim.state_hash()
                })
            })
            .collect();
        runs.into_iter()
            .map(|run| run.join().expect("simulation thread panicked"))
            .collect()
    })
}

/// Proptest strategies for simulation inputs.
pub mod strategies {
    use glam::Vec2;
    use proptest::prelude::*;

    use fleet_core::components::WeaponKind;
    use fleet_core::fleets::FleetId;

    /// A point inside the default 5000 x 3000 arena.
    pub fn arb_position() -> impl Strategy<Value = Vec2> {
        (0.0f32..5000.0, 0.0f32..3000.0).prop_map(|(x, y)| Vec2::new(x, y))
    }

    /// A drift velocity within a typical hull speed.
    pub fn arb_velocity() -> impl Strategy<Value = Vec2> {
        (-3.0f32..3.0, -3.0f32..3.0).prop_map(|(x, y)| Vec2::new(x, y))
    }

    /// Either fleet.
    pub fn arb_fleet() -> impl Strategy<Value = FleetId> {
        prop_oneof![Just(FleetId::Fleet1), Just(FleetId::Fleet2)]
    }

    /// One of the built-in hull keys.
    pub fn arb_type_key() -> impl Strategy<Value = &'static str> {
        prop_oneof![Just("frigate"), Just("destroyer"), Just("cruiser")]
    }

    /// Any weapon kind.
    pub fn arb_weapon() -> impl Strategy<Value = WeaponKind> {
        proptest::sample::select(WeaponKind::ALL.to_vec())
    }

    /// A loadout of one to three weapons.
    pub fn arb_loadout() -> impl Strategy<Value = Vec<WeaponKind>> {
        proptest::collection::vec(arb_weapon(), 1..=3)
    }

    /// Parameters for spawning a test ship.
    #[derive(Debug, Clone)]
    pub struct TestShipParams {
        /// Position.
        pub position: Vec2,
        /// Initial velocity.
        pub velocity: Vec2,
        /// Owning fleet.
        pub fleet: FleetId,
        /// Hull key.
        pub type_key: &'static str,
        /// Weapons.
        pub loadout: Vec<WeaponKind>,
    }

    /// Generate parameters for a test ship.
    pub fn arb_ship_params() -> impl Strategy<Value = TestShipParams> {
        (
            arb_position(),
            arb_velocity(),
            arb_fleet(),
            arb_type_key(),
            arb_loadout(),
        )
            .prop_map(|(position, velocity, fleet, type_key, loadout)| TestShipParams {
                position,
                velocity,
                fleet,
                type_key,
                loadout,
            })
    }

    /// Generate a list of ship spawn parameters.
    pub fn arb_ship_list(max_ships: usize) -> impl Strategy<Value = Vec<TestShipParams>> {
        proptest::collection::vec(arb_ship_params(), 1..max_ships)
    }
}
