//! Core simulation loop.
//!
//! [`Simulation`] owns the [`World`] and the per-ship control flags and
//! advances everything one tick at a time. External collaborators drive
//! it with commands between ticks and read it back through
//! [`Simulation::snapshot`] or the borrowing accessors.
//!
//! # Determinism
//!
//! Within one process run, identical configuration, seed and commands
//! produce identical state:
//! - All randomness comes from the seeded RNG in the world
//! - Ships and projectiles are visited in ascending id order
//! - Spawns are buffered and committed at fixed points in the tick
//!
//! # Example
//!
//! ```
//! use fleet_core::prelude::*;
//! use glam::Vec2;
//!
//! let mut sim = Simulation::default();
//! let a = sim.spawn_ship(Vec2::new(100.0, 100.0), FleetId::Fleet1, "frigate");
//! let b = sim.spawn_ship(Vec2::new(250.0, 100.0), FleetId::Fleet2, "cruiser");
//!
//! sim.fire_weapon(a, 0, TargetRef::Ship(b));
//! let events = sim.tick(1.0);
//!
//! assert_eq!(sim.get_tick(), 1);
//! assert!(events.destroyed_ships.is_empty());
//! ```

use std::collections::hash_map::DefaultHasher;
use std::collections::BTreeMap;
use std::hash::{Hash, Hasher};
use std::mem;
use std::sync::Arc;

use glam::Vec2;
use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::ai::{self, AutoEngagement, ControlState, ManualInput};
use crate::components::{BehaviorState, ProjectileId, ShipId, TargetRef};
use crate::config::SimConfig;
use crate::damage::{self, DamageCause, DamageEvent, DestroyedShip};
use crate::data::ShipTypeData;
use crate::error::{GameError, Result};
use crate::fleets::FleetId;
use crate::guidance::{self, GuidanceEffect};
use crate::projectile::Projectile;
use crate::ship::{Ship, ShipSpawnParams};
use crate::snapshot::{ProjectileSnapshot, ShipSnapshot, WorldSnapshot};
use crate::weapons::{self, FireOutcome};
use crate::world::World;

/// An area charge burst and the ships it jammed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Detonation {
    /// The charge.
    pub projectile: ProjectileId,
    /// Burst centre.
    pub position: Vec2,
    /// Burst radius.
    pub radius: f32,
    /// Enemy ships caught in the burst.
    pub jammed: Vec<ShipId>,
}

/// A drone that docked with its owner.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Dock {
    /// The drone.
    pub drone: ProjectileId,
    /// Ship it docked with.
    pub owner: ShipId,
    /// Ammunition returned.
    pub ammo: f32,
}

/// Events generated during a simulation tick.
///
/// These events can be used by the presentation layer to trigger effects,
/// sounds and animations without the core knowing about them.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TickEvents {
    /// Every application of damage, in the order it happened.
    pub damage: Vec<DamageEvent>,
    /// Ships removed this tick.
    pub destroyed_ships: Vec<DestroyedShip>,
    /// Projectiles and drones removed this tick.
    pub destroyed_projectiles: Vec<ProjectileId>,
    /// Ships spawned by respawn timers.
    pub spawned_ships: Vec<ShipId>,
    /// Projectiles and drones committed to the world this tick.
    pub spawned_projectiles: Vec<ProjectileId>,
    /// Area charge bursts.
    pub detonations: Vec<Detonation>,
    /// Drones that docked.
    pub docks: Vec<Dock>,
}

impl TickEvents {
    /// Whether nothing happened.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.damage.is_empty()
            && self.destroyed_ships.is_empty()
            && self.destroyed_projectiles.is_empty()
            && self.spawned_ships.is_empty()
            && self.spawned_projectiles.is_empty()
            && self.detonations.is_empty()
            && self.docks.is_empty()
    }
}

/// The fleet combat simulation.
///
/// # System Execution Order
///
/// Each tick, systems run in this order:
/// 1. **AI** - state machine or manual control, firing
/// 2. **Guidance** - projectile and drone physics
/// 3. **Effects** - detonation jamming, drone contact, docking
/// 4. **Collisions** - contact, intercepts, impacts
/// 5. **Removal & Respawn** - filter out the dead, run respawn timers
/// 6. **Integration** - resources and ship motion
/// 7. **Boundaries** - wrap ships, expire projectiles that left the arena
#[derive(Debug, Clone)]
pub struct Simulation {
    /// Current simulation tick.
    tick: u64,
    /// Ships, projectiles, configuration and RNG.
    world: World,
    /// Control flags for ships that have any.
    controls: BTreeMap<ShipId, ControlState>,
    /// Ticks until the next respawn, per fleet.
    respawn_timers: [f32; 2],
    /// Hull used for unknown type keys.
    fallback_hull: ShipTypeData,
}

impl Simulation {
    /// Create a simulation from validated configuration.
    ///
    /// # Errors
    ///
    /// Returns [`GameError::InvalidConfig`] if the configuration fails
    /// [`SimConfig::validate`].
    pub fn new(config: SimConfig) -> Result<Self> {
        config.validate()?;
        let fallback_hull = config
            .ship_type(&config.default_ship_type)
            .cloned()
            .ok_or_else(|| {
                GameError::InvalidConfig(format!(
                    "default ship type {} is not in the ship table",
                    config.default_ship_type
                ))
            })?;
        Ok(Self::with_parts(Arc::new(config), fallback_hull))
    }

    /// Create a simulation from RON configuration text.
    ///
    /// # Errors
    ///
    /// Returns [`GameError::ConfigParse`] or [`GameError::InvalidConfig`].
    pub fn from_ron_str(text: &str) -> Result<Self> {
        Self::new(SimConfig::from_ron_str(text)?)
    }

    fn with_parts(config: Arc<SimConfig>, fallback_hull: ShipTypeData) -> Self {
        let respawn = config.respawn_time;
        Self {
            tick: 0,
            world: World::new(config),
            controls: BTreeMap::new(),
            respawn_timers: [respawn; 2],
            fallback_hull,
        }
    }

    /// Get the current tick number.
    #[must_use]
    pub const fn get_tick(&self) -> u64 {
        self.tick
    }

    /// The world: ships, projectiles, arena and configuration.
    #[must_use]
    pub fn world(&self) -> &World {
        &self.world
    }

    /// Mutable world access for scenario setup and tooling.
    pub fn world_mut(&mut self) -> &mut World {
        &mut self.world
    }

    /// Static configuration.
    #[must_use]
    pub fn config(&self) -> &SimConfig {
        &self.world.config
    }

    /// Get a ship by id.
    #[must_use]
    pub fn ship(&self, id: ShipId) -> Option<&Ship> {
        self.world.ships.get(id)
    }

    /// Get a ship by id, failing if it does not exist.
    ///
    /// # Errors
    ///
    /// Returns [`GameError::ShipNotFound`] if there is no such ship.
    pub fn try_ship(&self, id: ShipId) -> Result<&Ship> {
        self.world.ships.get(id).ok_or(GameError::ShipNotFound(id))
    }

    /// All ships in id order.
    pub fn ships(&self) -> impl Iterator<Item = &Ship> {
        self.world.ships.iter()
    }

    /// All projectiles and drones in id order.
    pub fn projectiles(&self) -> impl Iterator<Item = &Projectile> {
        self.world.projectiles.values()
    }

    /// Control flags of a ship. Ships without any report the defaults.
    #[must_use]
    pub fn control_state(&self, id: ShipId) -> ControlState {
        self.controls.get(&id).copied().unwrap_or_default()
    }

    /// Ticks until `fleet`'s next respawn.
    #[must_use]
    pub fn respawn_timer(&self, fleet: FleetId) -> f32 {
        self.respawn_timers[fleet.index()]
    }

    // ========================================================================
    // Tick
    // ========================================================================

    /// Advance the simulation by `time_scale` ticks.
    ///
    /// A `time_scale` of zero or less is a pause: nothing changes, not even
    /// the tick counter or the RNG.
    pub fn tick(&mut self, time_scale: f32) -> TickEvents {
        let mut events = TickEvents::default();
        if time_scale.is_nan() || time_scale <= 0.0 {
            return events;
        }

        // 1. AI
        self.run_ai_system();
        events.damage.append(&mut self.world.damage_log);
        events.spawned_projectiles = self.world.commit_spawns();

        // 2. Guidance
        let effects = guidance::update_projectiles(&mut self.world, time_scale);

        // 3. Detonation, drone contact and docking
        self.apply_guidance_effects(&effects, &mut events);

        // 4. Collisions
        events.damage.extend(damage::resolve_collisions(&mut self.world));

        // 5. Removal and respawn
        self.run_removal_system(&mut events);
        self.run_respawn_system(time_scale, &mut events);

        // 6. Integration
        self.run_integration_system(time_scale, &mut events);

        // 7. Boundaries
        damage::flag_out_of_bounds(&mut self.world);
        self.run_removal_system(&mut events);
        events.spawned_projectiles.extend(self.world.commit_spawns());
        self.clear_stale_targets();

        self.tick += 1;

        #[cfg(debug_assertions)]
        {
            let hash = self.state_hash();
            tracing::debug!(tick = self.tick, state_hash = hash, "Simulation state hash");
        }

        events
    }

    fn run_ai_system(&mut self) {
        for id in self.world.ships.ids() {
            let control = self.control_state(id);
            ai::update_ship(&mut self.world, id, &control);
        }
    }

    fn apply_guidance_effects(&mut self, effects: &[GuidanceEffect], events: &mut TickEvents) {
        let jam_duration = self.world.config.tuning.resources.jam_duration;
        let arena = self.world.arena;

        for effect in effects {
            match *effect {
                GuidanceEffect::Detonation {
                    projectile,
                    fleet,
                    position,
                    radius,
                } => {
                    let mut jammed = Vec::new();
                    for ship in self.world.ships.iter_mut() {
                        if ship.fleet == fleet || !ship.is_alive() {
                            continue;
                        }
                        if arena.distance(position, ship.position) <= radius {
                            ship.jam.apply(jam_duration);
                            jammed.push(ship.id);
                        }
                    }
                    tracing::debug!(%projectile, jammed = jammed.len(), "Area charge detonated");
                    events.detonations.push(Detonation {
                        projectile,
                        position,
                        radius,
                        jammed,
                    });
                }
                GuidanceEffect::DroneContact {
                    target,
                    damage: amount,
                    ..
                } => {
                    if let Some(ship) = self.world.ships.get_mut(target) {
                        let dealt = ship.apply_damage(amount);
                        events
                            .damage
                            .push(DamageEvent::ship(target, dealt, DamageCause::Drone));
                    }
                }
                GuidanceEffect::DroneDocked { drone, owner, ammo } => {
                    if let Some(ship) = self.world.ships.get_mut(owner) {
                        ship.resources.resupply(&ship.hull, ammo);
                        ship.drones.retain(|&d| d != drone);
                    }
                    events.docks.push(Dock { drone, owner, ammo });
                }
            }
        }
    }

    fn run_removal_system(&mut self, events: &mut TickEvents) {
        let removed = damage::remove_destroyed(&mut self.world);
        for ship in &removed.ships {
            self.controls.remove(&ship.id);
        }
        events.destroyed_ships.extend(removed.ships);
        events.destroyed_projectiles.extend(removed.projectiles);
    }

    /// Count down each under-strength fleet's timer and spawn one ship
    /// whenever it runs out.
    fn run_respawn_system(&mut self, time_scale: f32, events: &mut TickEvents) {
        let strength = self.world.config.fleet_strength;
        let respawn_time = self.world.config.respawn_time;

        for fleet in FleetId::ALL {
            if self.world.ships.count_fleet(fleet) >= strength {
                continue;
            }
            let timer = &mut self.respawn_timers[fleet.index()];
            *timer -= time_scale;
            if *timer > 0.0 {
                continue;
            }
            *timer = respawn_time;
            let id = self.spawn_reinforcement(fleet);
            tracing::debug!(ship = %id, %fleet, "Respawned ship");
            events.spawned_ships.push(id);
        }
    }

    fn run_integration_system(&mut self, time_scale: f32, events: &mut TickEvents) {
        let config = Arc::clone(&self.world.config);
        let arena = self.world.arena;

        for ship in self.world.ships.iter_mut() {
            if !ship.is_alive() {
                continue;
            }
            let overheat = ship.integrate(time_scale, &config.tuning);
            ship.position = arena.wrap(ship.position);
            if overheat > 0.0 {
                events
                    .damage
                    .push(DamageEvent::ship(ship.id, overheat, DamageCause::Overheat));
            }
        }
    }

    fn clear_stale_targets(&mut self) {
        let stale: Vec<(ShipId, bool, bool)> = self
            .world
            .ships
            .iter()
            .map(|ship| {
                let lost = |t: Option<TargetRef>| t.is_some_and(|t| self.world.resolve(t).is_none());
                (ship.id, lost(ship.beam_target), lost(ship.manual_target))
            })
            .filter(|&(_, beam, manual)| beam || manual)
            .collect();

        for (id, beam, manual) in stale {
            if let Some(ship) = self.world.ships.get_mut(id) {
                if beam {
                    ship.beam_target = None;
                }
                if manual {
                    ship.manual_target = None;
                }
            }
        }
    }

    // ========================================================================
    // Spawning
    // ========================================================================

    /// Spawn a ship with a random loadout and drift.
    ///
    /// Unknown type keys fall back to the configured default hull.
    pub fn spawn_ship(&mut self, position: Vec2, fleet: FleetId, type_key: &str) -> ShipId {
        self.spawn_ship_with(ShipSpawnParams::new(position, fleet, type_key))
    }

    /// Spawn a ship from explicit parameters.
    ///
    /// Unknown type keys fall back to the configured default hull.
    pub fn spawn_ship_with(&mut self, params: ShipSpawnParams) -> ShipId {
        let config = Arc::clone(&self.world.config);
        let hull = match config.ship_type(&params.type_key) {
            Some(hull) => hull.clone(),
            None => {
                tracing::warn!(
                    type_key = %params.type_key,
                    fallback = %self.fallback_hull.key,
                    "Unknown ship type, using default"
                );
                self.fallback_hull.clone()
            }
        };

        let id = self.world.ships.allocate_id();
        let mut ship = Ship::build(id, &params, &hull, &config, &mut self.world.rng);
        ship.position = self.world.arena.wrap(ship.position);
        self.world.ships.insert(ship);
        id
    }

    /// Spawn one random hull at a random point on `fleet`'s half.
    fn spawn_reinforcement(&mut self, fleet: FleetId) -> ShipId {
        let config = Arc::clone(&self.world.config);
        let rng = &mut self.world.rng;
        let key = config.ship_types[rng.random_range(0..config.ship_types.len())]
            .key
            .clone();
        let (u, v) = (rng.random::<f32>(), rng.random::<f32>());
        let position = fleet.deployment_point(&self.world.arena, u, v);
        self.spawn_ship_with(ShipSpawnParams::new(position, fleet, key))
    }

    /// Bring both fleets up to their configured strength.
    ///
    /// Returns the ids of the new ships.
    pub fn populate_fleets(&mut self) -> Vec<ShipId> {
        let strength = self.world.config.fleet_strength;
        let mut spawned = Vec::new();
        for fleet in FleetId::ALL {
            let missing = strength.saturating_sub(self.world.ships.count_fleet(fleet));
            for _ in 0..missing {
                spawned.push(self.spawn_reinforcement(fleet));
            }
        }
        tracing::debug!(ships = spawned.len(), "Populated fleets");
        spawned
    }

    // ========================================================================
    // Commands
    // ========================================================================

    /// Fire mount `slot` of `ship` at `target`.
    ///
    /// Projectiles are committed at the start of the next tick.
    pub fn fire_weapon(&mut self, ship: ShipId, slot: usize, target: TargetRef) -> FireOutcome {
        let override_fire_control = self.control_state(ship).fire_control_override;
        weapons::fire(&mut self.world, ship, slot, target, override_fire_control)
    }

    /// Put `ship` under manual control with this tick's input.
    pub fn set_manual_control(&mut self, ship: ShipId, thrust: Vec2, fire: bool) {
        if let Some(control) = self.control_mut(ship) {
            control.manual = Some(ManualInput { thrust, fire });
        }
    }

    /// Hand `ship` back to the AI. Clears the manual target and resets the
    /// behaviour state to `Patrol`.
    pub fn release_manual_control(&mut self, ship: ShipId) {
        if let Some(control) = self.controls.get_mut(&ship) {
            control.manual = None;
        }
        if let Some(s) = self.world.ships.get_mut(ship) {
            s.manual_target = None;
            s.state = BehaviorState::Patrol;
        }
    }

    /// Set or clear the manual target of `ship`.
    pub fn set_manual_target(&mut self, ship: ShipId, target: Option<TargetRef>) {
        if let Some(s) = self.world.ships.get_mut(ship) {
            s.manual_target = target;
        }
    }

    /// Lift or restore range limits for `ship`.
    pub fn set_fire_control_override(&mut self, ship: ShipId, enabled: bool) {
        if let Some(control) = self.control_mut(ship) {
            control.fire_control_override = enabled;
        }
    }

    /// Switch mount `slot` of `ship` on or off. Returns the new state.
    pub fn toggle_weapon_enabled(&mut self, ship: ShipId, slot: usize) -> Option<bool> {
        let mount = self.world.ships.get_mut(ship)?.mounts.get_mut(slot)?;
        mount.enabled = !mount.enabled;
        Some(mount.enabled)
    }

    /// Flip an auto-engagement switch of `ship`. Returns the new state.
    pub fn toggle_auto_engagement(&mut self, ship: ShipId, kind: AutoEngagement) -> Option<bool> {
        self.control_mut(ship).map(|control| control.toggles.toggle(kind))
    }

    fn control_mut(&mut self, ship: ShipId) -> Option<&mut ControlState> {
        if !self.world.ships.contains(ship) {
            return None;
        }
        Some(self.controls.entry(ship).or_default())
    }

    // ========================================================================
    // Queries
    // ========================================================================

    /// Copy out everything a renderer needs.
    #[must_use]
    pub fn snapshot(&self) -> WorldSnapshot {
        WorldSnapshot {
            tick: self.tick,
            arena: self.world.arena,
            ships: self
                .world
                .ships
                .iter()
                .map(|ship| ShipSnapshot::capture(ship, self.control_state(ship.id)))
                .collect(),
            projectiles: self
                .world
                .projectiles
                .values()
                .map(ProjectileSnapshot::from)
                .collect(),
            respawn_timers: self.respawn_timers,
        }
    }

    /// Calculate a hash of the current simulation state.
    ///
    /// Two simulations with identical state produce identical hashes.
    #[must_use]
    pub fn state_hash(&self) -> u64 {
        let mut hasher = DefaultHasher::new();

        self.tick.hash(&mut hasher);
        for timer in self.respawn_timers {
            timer.to_bits().hash(&mut hasher);
        }

        self.world.ships.len().hash(&mut hasher);
        for ship in self.world.ships.iter() {
            ship.id.hash(&mut hasher);
            ship.fleet.hash(&mut hasher);
            hash_vec(ship.position, &mut hasher);
            hash_vec(ship.velocity, &mut hasher);
            ship.health.to_bits().hash(&mut hasher);
            ship.resources.energy.to_bits().hash(&mut hasher);
            ship.resources.heat.to_bits().hash(&mut hasher);
            ship.resources.delta_v.to_bits().hash(&mut hasher);
            ship.resources.ammo.to_bits().hash(&mut hasher);
            mem::discriminant(&ship.state).hash(&mut hasher);
            ship.jam.remaining.to_bits().hash(&mut hasher);
            for mount in &ship.mounts {
                mount.kind.hash(&mut hasher);
                mount.cooldown_remaining.to_bits().hash(&mut hasher);
                mount.enabled.hash(&mut hasher);
                mount.warhead.hash(&mut hasher);
            }
            ship.drones.hash(&mut hasher);
        }

        self.world.projectiles.len().hash(&mut hasher);
        for p in self.world.projectiles.values() {
            p.id.hash(&mut hasher);
            p.fleet.hash(&mut hasher);
            p.weapon.hash(&mut hasher);
            hash_vec(p.position, &mut hasher);
            hash_vec(p.velocity, &mut hasher);
            p.alive.hash(&mut hasher);
            mem::discriminant(&p.kind).hash(&mut hasher);
            if let Some(structure) = p.structure() {
                structure.to_bits().hash(&mut hasher);
            }
        }

        hasher.finish()
    }
}

fn hash_vec(v: Vec2, hasher: &mut DefaultHasher) {
    v.x.to_bits().hash(hasher);
    v.y.to_bits().hash(hasher);
}

impl Default for Simulation {
    /// A simulation on the built-in configuration.
    fn default() -> Self {
        let config = SimConfig::default();
        let fallback_hull = config
            .ship_type(&config.default_ship_type)
            .cloned()
            .unwrap_or_default();
        Self::with_parts(Arc::new(config), fallback_hull)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::components::WeaponKind;

    fn small_config() -> SimConfig {
        SimConfig {
            fleet_strength: 3,
            respawn_time: 5.0,
            ..SimConfig::default()
        }
    }

    fn spawn(sim: &mut Simulation, fleet: FleetId, position: Vec2, loadout: &[WeaponKind]) -> ShipId {
        sim.spawn_ship_with(
            ShipSpawnParams::new(position, fleet, "cruiser")
                .with_loadout(loadout.to_vec())
                .with_velocity(Vec2::ZERO),
        )
    }

    #[test]
    fn test_simulation_new() {
        let sim = Simulation::default();
        assert_eq!(sim.get_tick(), 0);
        assert_eq!(sim.ships().count(), 0);
        assert_eq!(sim.respawn_timer(FleetId::Fleet1), 30.0);
    }

    #[test]
    fn test_new_rejects_invalid_config() {
        let config = SimConfig {
            default_ship_type: "battleship".to_string(),
            ..SimConfig::default()
        };
        assert!(matches!(
            Simulation::new(config),
            Err(GameError::InvalidConfig(_))
        ));
    }

    #[test]
    fn test_tick_increments() {
        let mut sim = Simulation::default();
        sim.tick(1.0);
        sim.tick(0.5);
        assert_eq!(sim.get_tick(), 2);
    }

    #[test]
    fn test_pause_changes_nothing() {
        let mut sim = Simulation::new(small_config()).unwrap();
        sim.populate_fleets();
        sim.tick(1.0);
        let before = sim.state_hash();
        for _ in 0..5 {
            assert!(sim.tick(0.0).is_empty());
            sim.tick(-1.0);
        }
        assert_eq!(sim.state_hash(), before);
        assert_eq!(sim.get_tick(), 1);
    }

    #[test]
    fn test_unknown_type_falls_back() {
        let mut sim = Simulation::default();
        let id = sim.spawn_ship(Vec2::new(10.0, 10.0), FleetId::Fleet1, "battleship");
        assert_eq!(sim.ship(id).unwrap().hull.key, "frigate");
    }

    #[test]
    fn test_spawn_wraps_position() {
        let mut sim = Simulation::default();
        let id = sim.spawn_ship(Vec2::new(-10.0, 3010.0), FleetId::Fleet1, "frigate");
        let position = sim.ship(id).unwrap().position;
        assert_eq!(position, Vec2::new(5000.0, 0.0));
    }

    #[test]
    fn test_try_ship_reports_missing() {
        let sim = Simulation::default();
        assert!(matches!(
            sim.try_ship(ShipId(3)),
            Err(GameError::ShipNotFound(ShipId(3)))
        ));
    }

    #[test]
    fn test_populate_fleets_splits_arena() {
        let mut sim = Simulation::new(small_config()).unwrap();
        let spawned = sim.populate_fleets();
        assert_eq!(spawned.len(), 6);
        for ship in sim.ships() {
            let left = ship.position.x < 2500.0;
            assert_eq!(left, ship.fleet == FleetId::Fleet1);
        }
        assert!(sim.populate_fleets().is_empty());
    }

    #[test]
    fn test_respawn_timer_runs_only_under_strength() {
        let mut sim = Simulation::new(small_config()).unwrap();
        sim.populate_fleets();
        sim.tick(1.0);
        assert_eq!(sim.respawn_timer(FleetId::Fleet1), 5.0);

        let victim = sim
            .ships()
            .find(|s| s.fleet == FleetId::Fleet1)
            .map(|s| s.id)
            .unwrap();
        sim.world.ships.get_mut(victim).unwrap().health = 0.0;

        let mut respawned = Vec::new();
        for _ in 0..5 {
            respawned.extend(sim.tick(1.0).spawned_ships);
        }
        assert_eq!(respawned.len(), 1);
        assert_eq!(sim.ship(respawned[0]).unwrap().fleet, FleetId::Fleet1);
        assert_eq!(sim.respawn_timer(FleetId::Fleet1), 5.0);
    }

    #[test]
    fn test_fire_weapon_commits_next_tick() {
        let mut sim = Simulation::default();
        let a = spawn(&mut sim, FleetId::Fleet1, Vec2::new(100.0, 100.0), &[WeaponKind::Coilgun]);
        let b = spawn(&mut sim, FleetId::Fleet2, Vec2::new(1500.0, 100.0), &[WeaponKind::PulseLaser]);
        sim.set_manual_control(a, Vec2::ZERO, false);
        sim.set_manual_control(b, Vec2::ZERO, false);
        sim.set_fire_control_override(a, true);

        assert_eq!(sim.fire_weapon(a, 0, TargetRef::Ship(b)), FireOutcome::Fired);
        assert_eq!(sim.projectiles().count(), 0);

        let events = sim.tick(1.0);
        assert_eq!(events.spawned_projectiles.len(), 1);
        assert_eq!(sim.projectiles().count(), 1);
    }

    #[test]
    fn test_manual_release_resets_state() {
        let mut sim = Simulation::default();
        let a = spawn(&mut sim, FleetId::Fleet1, Vec2::new(100.0, 100.0), &[WeaponKind::Coilgun]);
        let b = spawn(&mut sim, FleetId::Fleet2, Vec2::new(300.0, 100.0), &[WeaponKind::Coilgun]);
        sim.tick(1.0);
        assert_eq!(sim.ship(a).unwrap().state, BehaviorState::Attack);

        sim.set_manual_control(a, Vec2::new(1.0, 0.0), false);
        sim.set_manual_target(a, Some(TargetRef::Ship(b)));
        sim.tick(1.0);
        assert_eq!(sim.ship(a).unwrap().state, BehaviorState::Attack);

        sim.release_manual_control(a);
        let ship = sim.ship(a).unwrap();
        assert_eq!(ship.state, BehaviorState::Patrol);
        assert!(ship.manual_target.is_none());
        assert!(sim.control_state(a).manual.is_none());
    }

    #[test]
    fn test_toggles() {
        let mut sim = Simulation::default();
        let a = spawn(&mut sim, FleetId::Fleet1, Vec2::ZERO, &[WeaponKind::Coilgun, WeaponKind::Missile]);
        assert_eq!(sim.toggle_weapon_enabled(a, 1), Some(false));
        assert_eq!(sim.toggle_weapon_enabled(a, 1), Some(true));
        assert_eq!(sim.toggle_weapon_enabled(a, 7), None);
        assert_eq!(sim.toggle_auto_engagement(a, AutoEngagement::AntiDrone), Some(true));
        assert!(sim.control_state(a).toggles.anti_drone);
        assert_eq!(sim.toggle_auto_engagement(ShipId(99), AutoEngagement::AntiDrone), None);
    }

    #[test]
    fn test_emp_burst_jams_enemies() {
        let mut sim = Simulation::default();
        let a = spawn(&mut sim, FleetId::Fleet1, Vec2::new(100.0, 100.0), &[WeaponKind::EmpCharge]);
        let b = spawn(&mut sim, FleetId::Fleet2, Vec2::new(300.0, 100.0), &[WeaponKind::Coilgun]);
        for id in [a, b] {
            sim.set_manual_control(id, Vec2::ZERO, false);
        }
        assert_eq!(sim.fire_weapon(a, 0, TargetRef::Ship(b)), FireOutcome::Fired);

        let mut detonations = Vec::new();
        for _ in 0..40 {
            detonations.extend(sim.tick(1.0).detonations);
        }
        assert_eq!(detonations.len(), 1);
        assert_eq!(detonations[0].jammed, vec![b]);
        assert!(sim.ship(b).unwrap().jam.is_jammed());
        assert!(!sim.ship(a).unwrap().jam.is_jammed());
    }

    #[test]
    fn test_deterministic_hash() {
        let run = || {
            let mut sim = Simulation::new(small_config()).unwrap();
            sim.populate_fleets();
            for _ in 0..50 {
                sim.tick(1.0);
            }
            sim.state_hash()
        };
        assert_eq!(run(), run());
    }

    #[test]
    fn test_snapshot_reports_type_defaults() {
        let mut sim = Simulation::default();
        let id = sim.spawn_ship(Vec2::new(50.0, 60.0), FleetId::Fleet2, "destroyer");
        let snapshot = sim.snapshot();
        let ship = snapshot.ship(id).unwrap();
        assert_eq!(ship.type_key, "destroyer");
        assert_eq!(ship.health, 500.0);
        assert_eq!(ship.resources.energy, 150.0);
        assert_eq!(ship.resources.heat, 0.0);
        assert_eq!(ship.mounts.len(), 2);
        assert_eq!(ship.state, BehaviorState::Patrol);
        assert_eq!(snapshot.tick, 0);
    }
}
