//! Weapon firing controller.
//!
//! [`fire`] runs the readiness, targeting and resource gates for one mount
//! and then dispatches on the weapon kind:
//!
//! - lasers resolve instantly against the target
//! - EMP launchers spawn a lead-intercept area charge
//! - drone bays launch an escort drone beside the ship
//! - everything else spawns a straight round or a seeking missile
//!
//! Spawned projectiles are buffered in the [`World`] and committed between
//! passes.

use std::f32::consts::TAU;
use std::fmt;
use std::sync::Arc;

use glam::Vec2;
use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::components::{DroneBehavior, ShipId, TargetRef, Warhead, WeaponKind};
use crate::damage::{DamageCause, DamageEvent};
use crate::data::WeaponData;
use crate::fleets::FleetId;
use crate::guidance::lead_point;
use crate::math::EPSILON;
use crate::projectile::{ChargeState, DroneState, MissileState, Projectile, ProjectileKind};
use crate::resources::ResourceRefusal;
use crate::ship::Ship;
use crate::world::World;

/// Result of a fire command.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum FireOutcome {
    /// The weapon fired and, for lasers, connected.
    Fired,
    /// A laser fired and missed, or fired out of range. Costs were paid.
    Missed,
    /// The shooter does not exist or is destroyed.
    ShipMissing,
    /// No mount at that index.
    InvalidSlot,
    /// The mount is switched off.
    Disabled,
    /// The mount is still cycling.
    CoolingDown,
    /// The target is gone or friendly.
    NoTarget,
    /// A resource or jamming gate refused the shot.
    Refused(ResourceRefusal),
    /// The target is beyond range and fire control is not overridden.
    OutOfRange,
    /// The ship already has its maximum number of drones out.
    DroneLimit,
}

impl FireOutcome {
    /// Whether the weapon actually discharged and paid its costs.
    #[must_use]
    pub const fn discharged(self) -> bool {
        matches!(self, Self::Fired | Self::Missed)
    }
}

impl From<ResourceRefusal> for FireOutcome {
    fn from(refusal: ResourceRefusal) -> Self {
        Self::Refused(refusal)
    }
}

impl fmt::Display for FireOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Fired => f.write_str("fired"),
            Self::Missed => f.write_str("missed"),
            Self::ShipMissing => f.write_str("ship missing"),
            Self::InvalidSlot => f.write_str("invalid slot"),
            Self::Disabled => f.write_str("disabled"),
            Self::CoolingDown => f.write_str("cooling down"),
            Self::NoTarget => f.write_str("no target"),
            Self::Refused(refusal) => write!(f, "refused: {refusal:?}"),
            Self::OutOfRange => f.write_str("out of range"),
            Self::DroneLimit => f.write_str("drone limit"),
        }
    }
}

/// Index of the first enabled mount that is off cooldown.
#[must_use]
pub fn ready_weapon(ship: &Ship) -> Option<usize> {
    ship.mounts
        .iter()
        .position(|m| m.enabled && m.is_ready())
}

/// Fire the first ready mount of `shooter` at `target`.
///
/// Returns [`FireOutcome::CoolingDown`] when no mount is ready.
pub fn fire_first_ready(
    world: &mut World,
    shooter: ShipId,
    target: TargetRef,
    override_fire_control: bool,
) -> FireOutcome {
    let Some(ship) = world.live_ship(shooter) else {
        return FireOutcome::ShipMissing;
    };
    match ready_weapon(ship) {
        Some(slot) => fire(world, shooter, slot, target, override_fire_control),
        None => FireOutcome::CoolingDown,
    }
}

/// Fire mount `slot` of `shooter` at `target`.
///
/// Under `override_fire_control` range limits are lifted but accuracy
/// degrades with distance.
pub fn fire(
    world: &mut World,
    shooter: ShipId,
    slot: usize,
    target: TargetRef,
    override_fire_control: bool,
) -> FireOutcome {
    let config = Arc::clone(&world.config);
    let combat = &config.tuning.combat;

    let Some(ship) = world.live_ship(shooter) else {
        return FireOutcome::ShipMissing;
    };
    let Some(mount) = ship.mounts.get(slot).copied() else {
        return FireOutcome::InvalidSlot;
    };
    if !mount.enabled {
        return FireOutcome::Disabled;
    }
    if !mount.is_ready() {
        return FireOutcome::CoolingDown;
    }
    let Some(weapon) = config.weapon(mount.kind) else {
        return FireOutcome::InvalidSlot;
    };
    let Some(info) = world.resolve(target) else {
        return FireOutcome::NoTarget;
    };
    if info.fleet == Some(ship.fleet) {
        return FireOutcome::NoTarget;
    }
    if let Err(refusal) = ship.resources.check_fire(
        &ship.hull,
        weapon,
        ship.jam.is_jammed(),
        &config.tuning.resources,
    ) {
        return refusal.into();
    }

    let shot = Shot {
        shooter,
        fleet: ship.fleet,
        origin: ship.position,
        ship_velocity: ship.velocity,
        offset: world.arena.delta(ship.position, info.position),
        target,
        target_velocity: info.velocity,
        range: if info.is_missile {
            combat.engagement_radius
        } else {
            weapon.range
        },
        override_fire_control,
    };
    let drones_out = ship.drones.len();
    let in_range = override_fire_control || shot.distance() <= shot.range;

    match mount.kind {
        kind if kind.is_hit_scan() => {
            pay(world, shooter, slot, weapon);
            if in_range && fire_beam(world, &shot, weapon) {
                FireOutcome::Fired
            } else {
                FireOutcome::Missed
            }
        }
        WeaponKind::EmpCharge => {
            if !in_range {
                return FireOutcome::OutOfRange;
            }
            pay(world, shooter, slot, weapon);
            launch_charge(world, &shot, weapon);
            FireOutcome::Fired
        }
        WeaponKind::DroneBay => {
            if drones_out >= combat.max_drones_per_ship {
                return FireOutcome::DroneLimit;
            }
            pay(world, shooter, slot, weapon);
            launch_drone(world, &shot, weapon);
            FireOutcome::Fired
        }
        _ => {
            if !in_range {
                return FireOutcome::OutOfRange;
            }
            pay(world, shooter, slot, weapon);
            launch_round(world, &shot, weapon, mount.warhead);
            FireOutcome::Fired
        }
    }
}

/// Geometry of one shot, captured before any mutation.
struct Shot {
    shooter: ShipId,
    fleet: FleetId,
    origin: Vec2,
    ship_velocity: Vec2,
    /// Shortest wrapped offset from the shooter to the target.
    offset: Vec2,
    target: TargetRef,
    target_velocity: Vec2,
    /// Range the falloff and spread are measured against.
    range: f32,
    override_fire_control: bool,
}

impl Shot {
    fn distance(&self) -> f32 {
        self.offset.length()
    }

    fn range_ratio(&self) -> f32 {
        self.distance() / self.range.max(EPSILON)
    }
}

fn pay(world: &mut World, shooter: ShipId, slot: usize, weapon: &WeaponData) {
    let Some(ship) = world.ships.get_mut(shooter) else {
        return;
    };
    ship.resources.spend(&ship.hull, weapon);
    if let Some(mount) = ship.mounts.get_mut(slot) {
        mount.cooldown_remaining = weapon.cooldown;
    }
}

/// Resolve a laser shot. Returns whether it connected.
fn fire_beam(world: &mut World, shot: &Shot, weapon: &WeaponData) -> bool {
    let config = Arc::clone(&world.config);
    let combat = &config.tuning.combat;
    let accuracy = &config.tuning.overrides;

    if shot.override_fire_control {
        let miss_chance = (accuracy.base_miss_chance
            + (accuracy.miss_chance_per_range * shot.range_ratio())
                .min(accuracy.max_extra_miss_chance))
        .max(accuracy.min_miss_chance);
        if world.roll() < miss_chance {
            let angle = world.rng.random_range(0.0..TAU);
            let magnitude = (accuracy.miss_offset_base
                + accuracy.miss_offset_per_distance * shot.distance())
                * world.rng.random_range(0.6..1.4);
            let displacement = Vec2::from_angle(angle) * magnitude;
            if displacement.length() > combat.laser_hit_tolerance {
                return false;
            }
        }
    }

    let falloff = (1.0 - shot.range_ratio()).max(combat.laser_min_falloff);
    let amount = weapon.damage * falloff;
    let cause = DamageCause::Weapon(weapon.kind);
    match shot.target {
        TargetRef::Ship(id) => {
            if let Some(ship) = world.ships.get_mut(id) {
                let dealt = ship.apply_damage(amount);
                world.damage_log.push(DamageEvent::ship(id, dealt, cause));
            }
        }
        TargetRef::Projectile(id) => {
            if let Some(p) = world.projectiles.get_mut(&id) {
                p.apply_damage(amount);
                world.damage_log.push(DamageEvent::projectile(id, amount, cause));
            }
        }
        TargetRef::Point(_) => {}
    }
    if let Some(ship) = world.ships.get_mut(shot.shooter) {
        ship.beam_target = Some(shot.target);
    }
    true
}

fn launch_charge(world: &mut World, shot: &Shot, weapon: &WeaponData) {
    let tuning = world.config.tuning.charge.clone();
    let speed = weapon.speed_or(1.0);
    let aim_point = lead_point(
        &world.arena,
        shot.origin,
        shot.origin + shot.offset,
        shot.target_velocity,
        speed,
    );
    let id = world.allocate_projectile_id();
    world.queue_projectile(Projectile {
        id,
        fleet: shot.fleet,
        position: shot.origin,
        velocity: (aim_point - shot.origin).normalize_or_zero() * speed,
        damage: weapon.damage,
        alive: true,
        weapon: weapon.kind,
        kind: ProjectileKind::AreaCharge(ChargeState {
            target: shot.target,
            aim_point,
            activated: false,
            lifespan: tuning.lifespan,
            proximity_radius: tuning.proximity_radius,
            effect_radius: tuning.effect_radius,
        }),
    });
}

fn launch_drone(world: &mut World, shot: &Shot, weapon: &WeaponData) {
    let tuning = world.config.tuning.drone.clone();
    let launch_offset = world.config.tuning.combat.drone_launch_offset;
    let angle = world.rng.random_range(0.0..TAU);
    let position = world
        .arena
        .wrap(shot.origin + Vec2::from_angle(angle) * launch_offset);

    let id = world.allocate_projectile_id();
    world.queue_projectile(Projectile {
        id,
        fleet: shot.fleet,
        position,
        velocity: shot.ship_velocity,
        damage: weapon.damage,
        alive: true,
        weapon: weapon.kind,
        kind: ProjectileKind::Drone(DroneState {
            health: tuning.health,
            propellant: tuning.propellant,
            max_propellant: tuning.propellant,
            behavior: DroneBehavior::Patrol,
            owner: shot.shooter,
            formation_angle: angle,
            formation_radius: tuning.formation_radius,
            contact_cooldown: 0.0,
            target: None,
        }),
    });
    if let Some(ship) = world.ships.get_mut(shot.shooter) {
        ship.drones.push(id);
    }
}

fn launch_round(world: &mut World, shot: &Shot, weapon: &WeaponData, warhead: Option<Warhead>) {
    let speed = weapon.speed_or(1.0);
    let mut direction = shot.offset.normalize_or_zero();
    if direction == Vec2::ZERO {
        direction = shot.ship_velocity.normalize_or(Vec2::X);
    }
    if shot.override_fire_control {
        let accuracy = &world.config.tuning.overrides;
        let width = accuracy.base_spread
            + (accuracy.spread_per_range * shot.range_ratio()).min(accuracy.max_extra_spread);
        let spread = world.rng.random_range(-1.0f32..1.0) * width;
        direction = Vec2::from_angle(spread).rotate(direction);
    }

    let kind = match weapon.kind {
        WeaponKind::PointDefense => ProjectileKind::Energy,
        WeaponKind::Missile => {
            let tuning = &world.config.tuning.missile;
            ProjectileKind::Missile(MissileState {
                target: match shot.target {
                    TargetRef::Point(_) => None,
                    entity => Some(entity),
                },
                propellant: tuning.propellant,
                health: tuning.health,
                warhead: warhead.unwrap_or(Warhead::Kinetic),
                navigation_gain: tuning.navigation_gain,
                max_accel: tuning.max_accel,
                max_speed: speed,
            })
        }
        _ => ProjectileKind::Kinetic,
    };

    let id = world.allocate_projectile_id();
    world.queue_projectile(Projectile {
        id,
        fleet: shot.fleet,
        position: shot.origin,
        velocity: direction * speed,
        damage: weapon.damage,
        alive: true,
        weapon: weapon.kind,
        kind,
    });
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::SimConfig;
    use crate::ship::ShipSpawnParams;

    fn world() -> World {
        World::new(Arc::new(SimConfig::default()))
    }

    fn add_ship(world: &mut World, fleet: FleetId, position: Vec2, loadout: &[WeaponKind]) -> ShipId {
        let id = world.ships.allocate_id();
        let config = Arc::clone(&world.config);
        let hull = config.ship_type("cruiser").unwrap();
        let params = ShipSpawnParams::new(position, fleet, "cruiser")
            .with_loadout(loadout.to_vec())
            .with_velocity(Vec2::ZERO);
        world
            .ships
            .insert(Ship::build(id, &params, hull, &config, &mut world.rng));
        id
    }

    fn ship(world: &World, id: ShipId) -> &Ship {
        world.ships.get(id).unwrap()
    }

    #[test]
    fn test_ready_weapon_skips_disabled_and_cooling() {
        let mut world = world();
        let id = add_ship(
            &mut world,
            FleetId::Fleet1,
            Vec2::ZERO,
            &[WeaponKind::Coilgun, WeaponKind::Missile, WeaponKind::PulseLaser],
        );
        let s = world.ships.get_mut(id).unwrap();
        s.mounts[0].cooldown_remaining = 3.0;
        s.mounts[1].enabled = false;
        assert_eq!(ready_weapon(ship(&world, id)), Some(2));
    }

    #[test]
    fn test_cooling_slot_never_fires() {
        let mut world = world();
        let me = add_ship(&mut world, FleetId::Fleet1, Vec2::new(100.0, 100.0), &[WeaponKind::Coilgun]);
        let enemy = add_ship(&mut world, FleetId::Fleet2, Vec2::new(200.0, 100.0), &[WeaponKind::Coilgun]);
        world.ships.get_mut(me).unwrap().mounts[0].cooldown_remaining = 0.5;
        let before = ship(&world, me).resources;

        let outcome = fire(&mut world, me, 0, TargetRef::Ship(enemy), false);

        assert_eq!(outcome, FireOutcome::CoolingDown);
        assert_eq!(ship(&world, me).resources, before);
        assert!(world.pending_projectiles().is_empty());
    }

    #[test]
    fn test_invalid_slot_and_missing_target_are_no_ops() {
        let mut world = world();
        let me = add_ship(&mut world, FleetId::Fleet1, Vec2::ZERO, &[WeaponKind::Coilgun]);
        let friend = add_ship(&mut world, FleetId::Fleet1, Vec2::new(10.0, 0.0), &[WeaponKind::Coilgun]);
        assert_eq!(
            fire(&mut world, me, 5, TargetRef::Ship(friend), false),
            FireOutcome::InvalidSlot
        );
        assert_eq!(
            fire(&mut world, me, 0, TargetRef::Ship(ShipId(99)), false),
            FireOutcome::NoTarget
        );
        assert_eq!(
            fire(&mut world, me, 0, TargetRef::Ship(friend), false),
            FireOutcome::NoTarget
        );
        assert_eq!(
            fire(&mut world, ShipId(42), 0, TargetRef::Ship(friend), false),
            FireOutcome::ShipMissing
        );
    }

    #[test]
    fn test_coilgun_spawns_kinetic_round_and_pays() {
        let mut world = world();
        let me = add_ship(&mut world, FleetId::Fleet1, Vec2::new(100.0, 100.0), &[WeaponKind::Coilgun]);
        let enemy = add_ship(&mut world, FleetId::Fleet2, Vec2::new(300.0, 100.0), &[WeaponKind::Coilgun]);

        let outcome = fire(&mut world, me, 0, TargetRef::Ship(enemy), false);

        assert_eq!(outcome, FireOutcome::Fired);
        let s = ship(&world, me);
        assert_eq!(s.mounts[0].cooldown_remaining, 90.0);
        assert_eq!(s.resources.energy, s.hull.max_energy - 12.0);
        assert_eq!(s.resources.heat, 10.0);
        assert_eq!(s.resources.ammo, s.hull.max_ammo - 3.0);
        let round = &world.pending_projectiles()[0];
        assert_eq!(round.kind, ProjectileKind::Kinetic);
        assert!((round.velocity - Vec2::new(50.0, 0.0)).length() < 1e-4);
    }

    #[test]
    fn test_direct_fire_out_of_range_costs_nothing() {
        let mut world = world();
        let me = add_ship(&mut world, FleetId::Fleet1, Vec2::new(100.0, 100.0), &[WeaponKind::Coilgun]);
        let enemy = add_ship(&mut world, FleetId::Fleet2, Vec2::new(1000.0, 100.0), &[WeaponKind::Coilgun]);
        let before = ship(&world, me).resources;

        assert_eq!(
            fire(&mut world, me, 0, TargetRef::Ship(enemy), false),
            FireOutcome::OutOfRange
        );
        assert_eq!(ship(&world, me).resources, before);
        assert!(ship(&world, me).mounts[0].is_ready());
    }

    #[test]
    fn test_override_lifts_range_limit() {
        let mut world = world();
        let me = add_ship(&mut world, FleetId::Fleet1, Vec2::new(100.0, 100.0), &[WeaponKind::Coilgun]);
        let enemy = add_ship(&mut world, FleetId::Fleet2, Vec2::new(1000.0, 100.0), &[WeaponKind::Coilgun]);
        assert_eq!(
            fire(&mut world, me, 0, TargetRef::Ship(enemy), true),
            FireOutcome::Fired
        );
        let round = &world.pending_projectiles()[0];
        let spread = round.velocity.y.atan2(round.velocity.x).abs();
        assert!(spread <= 0.18 + 0.6 + 1e-4);
    }

    #[test]
    fn test_laser_pays_even_out_of_range() {
        let mut world = world();
        let me = add_ship(&mut world, FleetId::Fleet1, Vec2::new(100.0, 100.0), &[WeaponKind::PulseLaser]);
        let enemy = add_ship(&mut world, FleetId::Fleet2, Vec2::new(600.0, 100.0), &[WeaponKind::Coilgun]);

        assert_eq!(
            fire(&mut world, me, 0, TargetRef::Ship(enemy), false),
            FireOutcome::Missed
        );
        let s = ship(&world, me);
        assert_eq!(s.mounts[0].cooldown_remaining, 30.0);
        assert_eq!(s.resources.heat, 6.0);
        assert_eq!(ship(&world, enemy).health, 900.0);
    }

    #[test]
    fn test_laser_falloff_and_floor() {
        let mut world = world();
        let me = add_ship(&mut world, FleetId::Fleet1, Vec2::new(100.0, 100.0), &[WeaponKind::PulseLaser]);
        let near = add_ship(&mut world, FleetId::Fleet2, Vec2::new(155.0, 100.0), &[WeaponKind::Coilgun]);

        assert_eq!(
            fire(&mut world, me, 0, TargetRef::Ship(near), false),
            FireOutcome::Fired
        );
        // 2.0 * (1 - 55/220)
        assert!((900.0 - ship(&world, near).health - 1.5).abs() < 1e-4);
        assert_eq!(ship(&world, me).beam_target, Some(TargetRef::Ship(near)));
        assert_eq!(world.damage_log.len(), 1);

        let edge = add_ship(&mut world, FleetId::Fleet2, Vec2::new(310.0, 100.0), &[WeaponKind::Coilgun]);
        world.ships.get_mut(me).unwrap().mounts[0].cooldown_remaining = 0.0;
        fire(&mut world, me, 0, TargetRef::Ship(edge), false);
        // 2.0 * max(0.3, 1 - 210/220)
        assert!((900.0 - ship(&world, edge).health - 0.6).abs() < 1e-4);
    }

    #[test]
    fn test_missile_target_uses_engagement_radius() {
        let mut world = world();
        let me = add_ship(&mut world, FleetId::Fleet1, Vec2::new(100.0, 100.0), &[WeaponKind::Coilgun]);
        let id = world.allocate_projectile_id();
        world.projectiles.insert(
            id,
            Projectile {
                id,
                fleet: FleetId::Fleet2,
                position: Vec2::new(250.0, 100.0),
                velocity: Vec2::ZERO,
                damage: 4.0,
                alive: true,
                weapon: WeaponKind::Missile,
                kind: ProjectileKind::Missile(MissileState {
                    target: Some(TargetRef::Ship(me)),
                    propellant: 10.0,
                    health: 2.0,
                    warhead: Warhead::Kinetic,
                    navigation_gain: 4.0,
                    max_accel: 0.25,
                    max_speed: 6.0,
                }),
            },
        );
        assert_eq!(
            fire(&mut world, me, 0, TargetRef::Projectile(id), false),
            FireOutcome::OutOfRange
        );
    }

    #[test]
    fn test_missile_carries_mount_warhead() {
        let mut world = world();
        let me = add_ship(&mut world, FleetId::Fleet1, Vec2::new(100.0, 100.0), &[WeaponKind::Missile]);
        let enemy = add_ship(&mut world, FleetId::Fleet2, Vec2::new(400.0, 100.0), &[WeaponKind::Coilgun]);
        world.ships.get_mut(me).unwrap().mounts[0].warhead = Some(Warhead::Nuclear);

        fire(&mut world, me, 0, TargetRef::Ship(enemy), false);

        let ProjectileKind::Missile(missile) = world.pending_projectiles()[0].kind else {
            panic!("expected a missile");
        };
        assert_eq!(missile.warhead, Warhead::Nuclear);
        assert_eq!(missile.target, Some(TargetRef::Ship(enemy)));
    }

    #[test]
    fn test_drone_bay_bounded() {
        let mut world = world();
        let me = add_ship(&mut world, FleetId::Fleet1, Vec2::new(500.0, 500.0), &[WeaponKind::DroneBay]);
        let enemy = add_ship(&mut world, FleetId::Fleet2, Vec2::new(2000.0, 500.0), &[WeaponKind::Coilgun]);

        for _ in 0..3 {
            world.ships.get_mut(me).unwrap().mounts[0].cooldown_remaining = 0.0;
            assert_eq!(
                fire(&mut world, me, 0, TargetRef::Ship(enemy), false),
                FireOutcome::Fired
            );
        }
        world.ships.get_mut(me).unwrap().mounts[0].cooldown_remaining = 0.0;
        assert_eq!(
            fire(&mut world, me, 0, TargetRef::Ship(enemy), false),
            FireOutcome::DroneLimit
        );
        assert_eq!(ship(&world, me).drones.len(), 3);
        for drone in world.pending_projectiles() {
            let d = world.arena.distance(drone.position, Vec2::new(500.0, 500.0));
            assert!((d - 30.0).abs() < 1e-3);
        }
    }

    #[test]
    fn test_jammed_ship_fires_only_jam_proof_kinds() {
        let mut world = world();
        let me = add_ship(
            &mut world,
            FleetId::Fleet1,
            Vec2::new(100.0, 100.0),
            &[WeaponKind::PulseLaser, WeaponKind::Coilgun],
        );
        let enemy = add_ship(&mut world, FleetId::Fleet2, Vec2::new(150.0, 100.0), &[WeaponKind::Coilgun]);
        world.ships.get_mut(me).unwrap().jam.apply(100.0);

        assert_eq!(
            fire(&mut world, me, 0, TargetRef::Ship(enemy), false),
            FireOutcome::Refused(ResourceRefusal::Jammed)
        );
        assert_eq!(
            fire(&mut world, me, 1, TargetRef::Ship(enemy), false),
            FireOutcome::Fired
        );
    }

    #[test]
    fn test_emp_charge_aims_at_lead_point() {
        let mut world = world();
        let me = add_ship(&mut world, FleetId::Fleet1, Vec2::new(100.0, 100.0), &[WeaponKind::EmpCharge]);
        let enemy = add_ship(&mut world, FleetId::Fleet2, Vec2::new(300.0, 100.0), &[WeaponKind::Coilgun]);
        world.ships.get_mut(enemy).unwrap().velocity = Vec2::new(0.0, 2.0);

        assert_eq!(
            fire(&mut world, me, 0, TargetRef::Ship(enemy), false),
            FireOutcome::Fired
        );
        let charge = &world.pending_projectiles()[0];
        let ProjectileKind::AreaCharge(state) = charge.kind else {
            panic!("expected a charge");
        };
        assert!(state.aim_point.y > 100.0);
        assert!((charge.velocity.length() - 8.0).abs() < 1e-4);
    }
}
