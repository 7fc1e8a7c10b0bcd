//! Damage and collision resolution.
//!
//! Runs after movement each tick, in a fixed order:
//!
//! 1. Ship contact scrapes between opposing ships
//! 2. Projectile-versus-projectile kills involving a missile
//! 3. Projectile impacts on ships (with warhead dispatch) and on drones
//!
//! Destroyed entities are only flagged here. [`remove_destroyed`] filters
//! them out afterwards, so nothing is removed by index mid-iteration.

use std::collections::BTreeSet;
use std::sync::Arc;

use glam::Vec2;
use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::components::{ProjectileId, ShipId, Warhead, WeaponKind};
use crate::fleets::FleetId;
use crate::projectile::ProjectileKind;
use crate::world::World;

/// What took the damage.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum DamageTarget {
    /// A ship.
    Ship(ShipId),
    /// A missile or drone.
    Projectile(ProjectileId),
}

/// Where the damage came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum DamageCause {
    /// A laser beam or a direct round.
    Weapon(WeaponKind),
    /// Direct missile hit.
    Warhead(Warhead),
    /// Blast from a missile that hit something else.
    Blast(Warhead),
    /// Scraping against an enemy ship.
    Contact,
    /// Rammed by a drone.
    Drone,
    /// Running at maximum heat.
    Overheat,
}

/// A single application of damage.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DamageEvent {
    /// What took the damage.
    pub target: DamageTarget,
    /// Hit points removed.
    pub amount: f32,
    /// Where it came from.
    pub cause: DamageCause,
}

impl DamageEvent {
    /// Damage to a ship.
    #[must_use]
    pub const fn ship(id: ShipId, amount: f32, cause: DamageCause) -> Self {
        Self {
            target: DamageTarget::Ship(id),
            amount,
            cause,
        }
    }

    /// Damage to a projectile.
    #[must_use]
    pub const fn projectile(id: ProjectileId, amount: f32, cause: DamageCause) -> Self {
        Self {
            target: DamageTarget::Projectile(id),
            amount,
            cause,
        }
    }
}

/// A ship removed by [`remove_destroyed`].
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DestroyedShip {
    /// The ship.
    pub id: ShipId,
    /// Its fleet.
    pub fleet: FleetId,
    /// Where it died.
    pub position: Vec2,
}

/// Entities removed by one removal pass.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Removed {
    /// Destroyed ships.
    pub ships: Vec<DestroyedShip>,
    /// Destroyed or expired projectiles.
    pub projectiles: Vec<ProjectileId>,
}

/// Run every collision check and return the damage dealt.
pub fn resolve_collisions(world: &mut World) -> Vec<DamageEvent> {
    let mut events = Vec::new();
    resolve_ship_contacts(world, &mut events);
    resolve_projectile_intercepts(world);
    resolve_projectile_impacts(world, &mut events);
    events
}

/// Opposing ships inside the contact radius scrape each other. One of the
/// pair, chosen at random, takes the contact damage.
pub fn resolve_ship_contacts(world: &mut World, events: &mut Vec<DamageEvent>) {
    let combat = &world.config.tuning.combat;
    let radius_sq = combat.contact_radius * combat.contact_radius;
    let damage = combat.contact_damage;
    let ships: Vec<(ShipId, FleetId, Vec2)> = world
        .ships
        .iter()
        .filter(|s| s.is_alive())
        .map(|s| (s.id, s.fleet, s.position))
        .collect();

    for (i, &(a, fleet_a, pos_a)) in ships.iter().enumerate() {
        for &(b, fleet_b, pos_b) in &ships[i + 1..] {
            if fleet_a == fleet_b || world.arena.distance_squared(pos_a, pos_b) >= radius_sq {
                continue;
            }
            let victim = if world.rng.random_bool(0.5) { b } else { a };
            if let Some(ship) = world.ships.get_mut(victim) {
                let dealt = ship.apply_damage(damage);
                if dealt > 0.0 {
                    events.push(DamageEvent::ship(victim, dealt, DamageCause::Contact));
                }
            }
        }
    }
}

/// Opposing projectiles that meet, where at least one is a missile, destroy
/// each other.
pub fn resolve_projectile_intercepts(world: &mut World) {
    let radius = world.config.tuning.combat.projectile_kill_radius;
    let live: Vec<(ProjectileId, FleetId, Vec2, bool)> = world
        .projectiles
        .values()
        .filter(|p| p.alive)
        .map(|p| (p.id, p.fleet, p.position, p.is_missile()))
        .collect();

    let mut killed = BTreeSet::new();
    for &(id, fleet, position, is_missile) in &live {
        if !is_missile || killed.contains(&id) {
            continue;
        }
        let hit = live.iter().find(|&&(other, other_fleet, other_position, _)| {
            other != id
                && other_fleet != fleet
                && !killed.contains(&other)
                && world.arena.distance(position, other_position) < radius
        });
        if let Some(&(other, ..)) = hit {
            killed.insert(id);
            killed.insert(other);
        }
    }

    for id in killed {
        if let Some(p) = world.projectiles.get_mut(&id) {
            p.alive = false;
        }
    }
}

/// Rounds and missiles hit the first opposing ship inside the hit radius.
/// Rounds that miss every ship may still hit an opposing drone.
pub fn resolve_projectile_impacts(world: &mut World, events: &mut Vec<DamageEvent>) {
    let config = Arc::clone(&world.config);
    let combat = &config.tuning.combat;
    let candidates: Vec<ProjectileId> = world
        .projectiles
        .values()
        .filter(|p| p.alive && (p.is_round() || p.is_missile()))
        .map(|p| p.id)
        .collect();

    for id in candidates {
        let Some(p) = world.projectiles.get(&id).filter(|p| p.alive) else {
            continue;
        };
        let (fleet, position, damage, weapon, kind) = (p.fleet, p.position, p.damage, p.weapon, p.kind);

        let struck = world
            .ships
            .iter()
            .find(|s| {
                s.fleet != fleet
                    && s.is_alive()
                    && world.arena.distance(position, s.position) < combat.ship_hit_radius
            })
            .map(|s| s.id);

        match (struck, kind) {
            (Some(ship), ProjectileKind::Missile(missile)) => {
                apply_warhead(world, fleet, damage, missile.warhead, ship, events);
                kill_projectile(world, id);
            }
            (Some(ship), _) => {
                if let Some(target) = world.ships.get_mut(ship) {
                    let dealt = target.apply_damage(damage);
                    events.push(DamageEvent::ship(ship, dealt, DamageCause::Weapon(weapon)));
                }
                kill_projectile(world, id);
            }
            (None, ProjectileKind::Kinetic | ProjectileKind::Energy) => {
                let drone = world
                    .projectiles
                    .values()
                    .find(|d| {
                        d.is_drone()
                            && d.alive
                            && d.fleet != fleet
                            && world.arena.distance(position, d.position) < combat.drone_hit_radius
                    })
                    .map(|d| d.id);
                if let Some(drone) = drone {
                    if let Some(target) = world.projectiles.get_mut(&drone) {
                        target.apply_damage(damage);
                        events.push(DamageEvent::projectile(drone, damage, DamageCause::Weapon(weapon)));
                    }
                    kill_projectile(world, id);
                }
            }
            (None, _) => {}
        }
    }
}

/// Detonate a missile warhead on `primary`.
///
/// The primary takes `base * multiplier`. Warheads with a blast radius
/// also damage every other ship and drone not in `fleet` within the
/// radius, scaled by the configured shares and a linear falloff measured
/// from the primary.
pub fn apply_warhead(
    world: &mut World,
    fleet: FleetId,
    base: f32,
    warhead: Warhead,
    primary: ShipId,
    events: &mut Vec<DamageEvent>,
) {
    let config = Arc::clone(&world.config);
    let combat = &config.tuning.combat;
    let Some(profile) = config.warhead(warhead) else {
        return;
    };
    let direct = base * profile.damage_multiplier;

    let Some(target) = world.ships.get_mut(primary) else {
        return;
    };
    let impact = target.position;
    let dealt = target.apply_damage(direct);
    events.push(DamageEvent::ship(primary, dealt, DamageCause::Warhead(warhead)));

    if !profile.has_blast() {
        return;
    }

    let arena = world.arena;
    for ship in world.ships.iter_mut() {
        if ship.id == primary || ship.fleet == fleet || !ship.is_alive() {
            continue;
        }
        let falloff = profile.falloff(arena.distance(impact, ship.position));
        if falloff <= 0.0 {
            continue;
        }
        let dealt = ship.apply_damage(direct * combat.blast_ship_share * falloff);
        events.push(DamageEvent::ship(ship.id, dealt, DamageCause::Blast(warhead)));
    }
    for drone in world.projectiles.values_mut() {
        if !drone.is_drone() || !drone.alive || drone.fleet == fleet {
            continue;
        }
        let falloff = profile.falloff(arena.distance(impact, drone.position));
        if falloff <= 0.0 {
            continue;
        }
        let amount = direct * combat.blast_drone_share * falloff;
        drone.apply_damage(amount);
        events.push(DamageEvent::projectile(drone.id, amount, DamageCause::Blast(warhead)));
    }
}

/// Flag projectiles that have left the arena. Drones wrap instead.
pub fn flag_out_of_bounds(world: &mut World) {
    let margin = world.config.tuning.combat.bounds_margin;
    let arena = world.arena;
    for p in world.projectiles.values_mut() {
        if p.alive && !p.wraps() && arena.is_outside(p.position, margin) {
            p.alive = false;
        }
    }
}

/// Remove dead ships and projectiles, then forget drones that no longer exist.
pub fn remove_destroyed(world: &mut World) -> Removed {
    let mut removed = Removed::default();

    for ship in world.ships.iter().filter(|s| !s.is_alive()) {
        tracing::debug!(ship = %ship.id, fleet = %ship.fleet, "Ship destroyed");
        removed.ships.push(DestroyedShip {
            id: ship.id,
            fleet: ship.fleet,
            position: ship.position,
        });
    }
    world.ships.retain(|s| s.is_alive());

    removed.projectiles = world
        .projectiles
        .values()
        .filter(|p| !p.alive)
        .map(|p| p.id)
        .collect();
    world.projectiles.retain(|_, p| p.alive);

    let projectiles = &world.projectiles;
    for ship in world.ships.iter_mut() {
        ship.drones.retain(|id| projectiles.contains_key(id));
    }

    removed
}

fn kill_projectile(world: &mut World, id: ProjectileId) {
    if let Some(p) = world.projectiles.get_mut(&id) {
        p.alive = false;
    }
}
