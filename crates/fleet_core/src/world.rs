//! The world context passed to every system.
//!
//! [`World`] owns the ships, the projectiles, the configuration and the
//! seeded RNG. Systems receive it explicitly; there is no global state.
//! Both entity collections are ordered by id so every pass visits
//! entities in the same order on every run.

use std::collections::BTreeMap;
use std::sync::Arc;

use glam::Vec2;
use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;

use crate::components::{ProjectileId, ShipId, TargetRef};
use crate::config::SimConfig;
use crate::damage::DamageEvent;
use crate::fleets::FleetId;
use crate::math::Arena;
use crate::projectile::Projectile;
use crate::ship::Ship;

/// Storage for all ships.
///
/// Ids are handed out sequentially and never reused. Iteration is in id
/// order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ShipStorage {
    ships: BTreeMap<ShipId, Ship>,
    next_id: u64,
}

impl ShipStorage {
    /// Create empty storage.
    #[must_use]
    pub fn new() -> Self {
        Self {
            ships: BTreeMap::new(),
            next_id: 1,
        }
    }

    /// Reserve the id the next inserted ship will get.
    pub fn allocate_id(&mut self) -> ShipId {
        let id = ShipId(self.next_id.max(1));
        self.next_id = id.0 + 1;
        id
    }

    /// Insert a ship under its own id.
    pub fn insert(&mut self, ship: Ship) {
        self.ships.insert(ship.id, ship);
    }

    /// Remove a ship by id.
    pub fn remove(&mut self, id: ShipId) -> Option<Ship> {
        self.ships.remove(&id)
    }

    /// Get a ship by id.
    #[must_use]
    pub fn get(&self, id: ShipId) -> Option<&Ship> {
        self.ships.get(&id)
    }

    /// Get a mutable reference to a ship by id.
    pub fn get_mut(&mut self, id: ShipId) -> Option<&mut Ship> {
        self.ships.get_mut(&id)
    }

    /// Check if a ship exists.
    #[must_use]
    pub fn contains(&self, id: ShipId) -> bool {
        self.ships.contains_key(&id)
    }

    /// Number of ships.
    #[must_use]
    pub fn len(&self) -> usize {
        self.ships.len()
    }

    /// Check if storage is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.ships.is_empty()
    }

    /// Ship ids in ascending order.
    #[must_use]
    pub fn ids(&self) -> Vec<ShipId> {
        self.ships.keys().copied().collect()
    }

    /// Iterate over ships in id order.
    pub fn iter(&self) -> impl Iterator<Item = &Ship> {
        self.ships.values()
    }

    /// Iterate mutably over ships in id order.
    pub fn iter_mut(&mut self) -> impl Iterator<Item = &mut Ship> {
        self.ships.values_mut()
    }

    /// Keep only the ships for which `keep` returns true.
    pub fn retain(&mut self, mut keep: impl FnMut(&Ship) -> bool) {
        self.ships.retain(|_, ship| keep(ship));
    }

    /// Ships belonging to `fleet`.
    #[must_use]
    pub fn count_fleet(&self, fleet: FleetId) -> usize {
        self.ships.values().filter(|s| s.fleet == fleet).count()
    }
}

/// Position and motion of a resolved [`TargetRef`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TargetInfo {
    /// Current position.
    pub position: Vec2,
    /// Current velocity. Zero for fixed points.
    pub velocity: Vec2,
    /// Fleet of the target, if it is an entity.
    pub fleet: Option<FleetId>,
    /// Whether the target is a seeking missile.
    pub is_missile: bool,
}

/// Everything the per-tick systems read and write.
#[derive(Debug, Clone)]
pub struct World {
    /// Arena geometry.
    pub arena: Arena,
    /// Static configuration, shared with clones of this world.
    pub config: Arc<SimConfig>,
    /// All ships.
    pub ships: ShipStorage,
    /// All projectiles and drones, in id order.
    pub projectiles: BTreeMap<ProjectileId, Projectile>,
    /// Simulation RNG.
    pub rng: Pcg32,
    /// Damage dealt outside the collision pass, drained into tick events.
    pub damage_log: Vec<DamageEvent>,
    next_projectile_id: u64,
    pending: Vec<Projectile>,
}

impl World {
    /// Create an empty world for `config`, seeding the RNG from it.
    #[must_use]
    pub fn new(config: Arc<SimConfig>) -> Self {
        Self {
            arena: config.arena,
            rng: Pcg32::seed_from_u64(config.seed),
            config,
            ships: ShipStorage::new(),
            projectiles: BTreeMap::new(),
            damage_log: Vec::new(),
            next_projectile_id: 1,
            pending: Vec::new(),
        }
    }

    /// Reserve a fresh projectile id.
    pub fn allocate_projectile_id(&mut self) -> ProjectileId {
        let id = ProjectileId(self.next_projectile_id);
        self.next_projectile_id += 1;
        id
    }

    /// Buffer a projectile for insertion at the next commit.
    pub fn queue_projectile(&mut self, projectile: Projectile) {
        self.pending.push(projectile);
    }

    /// Projectiles fired since the last commit.
    #[must_use]
    pub fn pending_projectiles(&self) -> &[Projectile] {
        &self.pending
    }

    /// Move buffered projectiles into the world, returning their ids.
    pub fn commit_spawns(&mut self) -> Vec<ProjectileId> {
        let mut ids = Vec::with_capacity(self.pending.len());
        for projectile in self.pending.drain(..) {
            ids.push(projectile.id);
            self.projectiles.insert(projectile.id, projectile);
        }
        ids
    }

    /// Uniform roll in `[0, 1)`.
    pub fn roll(&mut self) -> f32 {
        self.rng.random::<f32>()
    }

    /// A living ship by id.
    #[must_use]
    pub fn live_ship(&self, id: ShipId) -> Option<&Ship> {
        self.ships.get(id).filter(|s| s.is_alive())
    }

    /// A live projectile by id, committed or still buffered.
    #[must_use]
    pub fn live_projectile(&self, id: ProjectileId) -> Option<&Projectile> {
        self.projectiles
            .get(&id)
            .or_else(|| self.pending.iter().find(|p| p.id == id))
            .filter(|p| p.alive)
    }

    /// Resolve a target reference. Destroyed entities resolve to `None`.
    #[must_use]
    pub fn resolve(&self, target: TargetRef) -> Option<TargetInfo> {
        match target {
            TargetRef::Ship(id) => self.live_ship(id).map(|ship| TargetInfo {
                position: ship.position,
                velocity: ship.velocity,
                fleet: Some(ship.fleet),
                is_missile: false,
            }),
            TargetRef::Projectile(id) => self.live_projectile(id).map(|p| TargetInfo {
                position: p.position,
                velocity: p.velocity,
                fleet: Some(p.fleet),
                is_missile: p.is_missile(),
            }),
            TargetRef::Point(position) => Some(TargetInfo {
                position,
                velocity: Vec2::ZERO,
                fleet: None,
                is_missile: false,
            }),
        }
    }

    /// Nearest living ship not in `fleet`, with its wrapped distance.
    #[must_use]
    pub fn nearest_enemy_ship(&self, from: Vec2, fleet: FleetId) -> Option<(ShipId, f32)> {
        self.nearest_enemy_ship_within(from, fleet, f32::INFINITY)
    }

    /// Nearest living ship not in `fleet` closer than `radius`.
    #[must_use]
    pub fn nearest_enemy_ship_within(
        &self,
        from: Vec2,
        fleet: FleetId,
        radius: f32,
    ) -> Option<(ShipId, f32)> {
        let mut best: Option<(ShipId, f32)> = None;
        for ship in self.ships.iter() {
            if ship.fleet == fleet || !ship.is_alive() {
                continue;
            }
            let d = self.arena.distance(from, ship.position);
            if d < radius && best.map_or(true, |(_, bd)| d < bd) {
                best = Some((ship.id, d));
            }
        }
        best
    }

    /// Nearest live projectile not in `fleet` that satisfies `filter`.
    #[must_use]
    pub fn nearest_enemy_projectile(
        &self,
        from: Vec2,
        fleet: FleetId,
        filter: impl Fn(&Projectile) -> bool,
    ) -> Option<(ProjectileId, f32)> {
        let mut best: Option<(ProjectileId, f32)> = None;
        for p in self.projectiles.values() {
            if p.fleet == fleet || !p.alive || !filter(p) {
                continue;
            }
            let d = self.arena.distance(from, p.position);
            if best.map_or(true, |(_, bd)| d < bd) {
                best = Some((p.id, d));
            }
        }
        best
    }
}
