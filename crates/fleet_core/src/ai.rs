//! Combat state machine and manual control.
//!
//! Each tick every ship is updated in id order. [`decide`] reads the world
//! and produces a [`Decision`]; [`apply_decision`] writes it back and fires.
//! Splitting the two keeps the state machine a pure function of the world.
//!
//! Autonomous ships pick one state per tick, highest priority first:
//!
//! 1. `Intercept` - an enemy missile or drone is inside the engagement radius
//! 2. `Flee` - below half health with any enemy alive
//! 3. `Attack` - an enemy inside the primary weapon's range
//! 4. `Patrol` - otherwise
//!
//! Manual ships skip the state machine. Their movement comes straight from
//! the input and the auto-engagement toggles choose what to shoot.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use crate::components::{BehaviorState, ProjectileId, ShipId, TargetRef};
use crate::steering::{alignment, cohesion, flee, seek, separation};
use crate::weapons::{fire_first_ready, FireOutcome};
use crate::world::World;

// ============================================================================
// Control state
// ============================================================================

/// Player input for a manually controlled ship.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct ManualInput {
    /// Thrust direction. Each axis is clamped to `[-1, 1]`.
    pub thrust: Vec2,
    /// Fire the first ready weapon this tick.
    pub fire: bool,
}

/// Automatic target classes a manual ship can engage on its own.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum AutoEngagement {
    /// Keep a live enemy ship as the manual target and shoot it.
    AntiShip,
    /// Shoot the nearest enemy missile.
    AntiMissile,
    /// Shoot the nearest enemy drone.
    AntiDrone,
}

/// Which auto-engagements are switched on. All start off.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct EngagementToggles {
    /// Anti-ship engagement.
    pub anti_ship: bool,
    /// Anti-missile engagement.
    pub anti_missile: bool,
    /// Anti-drone engagement.
    pub anti_drone: bool,
}

impl EngagementToggles {
    /// Whether `kind` is switched on.
    #[must_use]
    pub const fn is_enabled(&self, kind: AutoEngagement) -> bool {
        match kind {
            AutoEngagement::AntiShip => self.anti_ship,
            AutoEngagement::AntiMissile => self.anti_missile,
            AutoEngagement::AntiDrone => self.anti_drone,
        }
    }

    /// Flip `kind`, returning the new value.
    pub fn toggle(&mut self, kind: AutoEngagement) -> bool {
        let flag = match kind {
            AutoEngagement::AntiShip => &mut self.anti_ship,
            AutoEngagement::AntiMissile => &mut self.anti_missile,
            AutoEngagement::AntiDrone => &mut self.anti_drone,
        };
        *flag = !*flag;
        *flag
    }
}

/// Per-ship control flags owned by the simulation.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct ControlState {
    /// Latest manual input, or `None` under AI control.
    pub manual: Option<ManualInput>,
    /// Auto-engagement switches used in manual mode.
    pub toggles: EngagementToggles,
    /// Lift range limits at the cost of accuracy.
    pub fire_control_override: bool,
}

impl ControlState {
    /// The mode this ship is updated in.
    #[must_use]
    pub fn mode(&self) -> ControlMode {
        match self.manual {
            Some(input) => ControlMode::Manual(input),
            None => ControlMode::Autonomous,
        }
    }
}

/// How a ship is driven this tick.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ControlMode {
    /// The combat state machine decides.
    Autonomous,
    /// The player steers; toggles decide what to shoot.
    Manual(ManualInput),
}

// ============================================================================
// Decisions
// ============================================================================

/// What one ship does this tick.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Decision {
    /// New behaviour state. `None` leaves it unchanged.
    pub state: Option<BehaviorState>,
    /// Steering force to accumulate.
    pub force: Vec2,
    /// Direct velocity change from manual thrust.
    pub thrust: Vec2,
    /// Newly acquired manual target.
    pub acquire: Option<TargetRef>,
    /// Targets to shoot, each with the first mount ready at that moment.
    pub shots: Vec<TargetRef>,
}

/// Decide what ship `id` does this tick. Returns `None` for missing or
/// destroyed ships.
#[must_use]
pub fn decide(world: &World, id: ShipId, mode: ControlMode, toggles: EngagementToggles) -> Option<Decision> {
    world.live_ship(id)?;
    Some(match mode {
        ControlMode::Autonomous => decide_autonomous(world, id)?,
        ControlMode::Manual(input) => decide_manual(world, id, input, toggles)?,
    })
}

/// Write a decision back to ship `id` and fire its shots.
pub fn apply_decision(
    world: &mut World,
    id: ShipId,
    decision: &Decision,
    override_fire_control: bool,
) -> Vec<FireOutcome> {
    let Some(ship) = world.ships.get_mut(id) else {
        return Vec::new();
    };
    if let Some(state) = decision.state {
        ship.state = state;
    }
    ship.apply_force(decision.force);
    if ship.resources.can_maneuver() {
        ship.velocity += decision.thrust;
    }
    if let Some(target) = decision.acquire {
        ship.manual_target = Some(target);
    }

    decision
        .shots
        .iter()
        .map(|&target| fire_first_ready(world, id, target, override_fire_control))
        .collect()
}

/// Decide and apply in one step.
pub fn update_ship(world: &mut World, id: ShipId, control: &ControlState) -> Vec<FireOutcome> {
    match decide(world, id, control.mode(), control.toggles) {
        Some(decision) => apply_decision(world, id, &decision, control.fire_control_override),
        None => Vec::new(),
    }
}

fn decide_autonomous(world: &World, id: ShipId) -> Option<Decision> {
    let ship = world.live_ship(id)?;
    let config = &world.config;
    let steering = &config.tuning.steering;
    let arena = &world.arena;
    let (position, velocity) = (ship.position, ship.velocity);
    let (max_speed, max_force) = (ship.hull.max_speed, steering.max_force);

    let enemy = world
        .nearest_enemy_ship(position, ship.fleet)
        .and_then(|(enemy_id, d)| world.live_ship(enemy_id).map(|s| (s, d)));
    let threat: Option<(ProjectileId, Vec2)> = world
        .nearest_enemy_projectile(position, ship.fleet, |p| p.is_threat())
        .filter(|&(_, d)| d < config.tuning.combat.engagement_radius)
        .and_then(|(pid, _)| world.live_projectile(pid).map(|p| (pid, p.position)));
    let primary = ship.primary_weapon().and_then(|kind| config.weapon(kind));

    let mut decision = Decision {
        force: separation(arena, ship, world.ships.iter(), steering) * steering.separation_weight,
        ..Decision::default()
    };

    let state = if let Some((threat_id, threat_position)) = threat {
        decision.force +=
            seek(arena, position, velocity, threat_position, max_speed, max_force) * steering.attack_weight;
        decision.shots.push(TargetRef::Projectile(threat_id));
        BehaviorState::Intercept
    } else if let Some((target, _)) = enemy.filter(|_| ship.health < ship.hull.max_health / 2.0) {
        decision.force +=
            flee(arena, position, velocity, target.position, max_speed, max_force) * steering.flee_weight;
        BehaviorState::Flee
    } else if let Some(((target, distance), weapon)) =
        enemy.zip(primary).filter(|((_, d), w)| *d < w.range)
    {
        let (close_beyond, evade_within) = if weapon.kind.is_hit_scan() {
            (weapon.range * 0.8, steering.separation_radius)
        } else {
            (weapon.range * 0.9, weapon.range * 0.5)
        };
        let movement = if distance > close_beyond {
            seek(arena, position, velocity, target.position, max_speed, max_force)
        } else if distance < evade_within {
            flee(arena, position, velocity, target.position, max_speed, max_force)
        } else {
            Vec2::ZERO
        };
        decision.force += movement * steering.attack_weight;
        decision.shots.push(TargetRef::Ship(target.id));
        BehaviorState::Attack
    } else {
        decision.force += alignment(arena, ship, world.ships.iter(), steering) * steering.alignment_weight
            + cohesion(arena, ship, world.ships.iter(), steering) * steering.cohesion_weight;
        BehaviorState::Patrol
    };

    decision.state = Some(state);
    Some(decision)
}

fn decide_manual(
    world: &World,
    id: ShipId,
    input: ManualInput,
    toggles: EngagementToggles,
) -> Option<Decision> {
    let ship = world.live_ship(id)?;
    let tuning = &world.config.tuning;
    let thrust = input.thrust.clamp(Vec2::NEG_ONE, Vec2::ONE) * tuning.steering.manual_thrust;
    let mut decision = Decision {
        thrust,
        ..Decision::default()
    };

    let live_target = ship
        .manual_target
        .filter(|t| !matches!(t, TargetRef::Point(_)) && world.resolve(*t).is_some());
    let mut target = live_target;

    if toggles.anti_ship {
        if target.is_none() {
            target = world
                .nearest_enemy_ship(ship.position, ship.fleet)
                .map(|(enemy, _)| TargetRef::Ship(enemy));
            decision.acquire = target;
        }
        if let Some(t) = target {
            decision.shots.push(t);
        }
    }

    if toggles.anti_missile || toggles.anti_drone {
        let threat = world.nearest_enemy_projectile(ship.position, ship.fleet, |p| {
            (p.is_missile() && toggles.anti_missile) || (p.is_drone() && toggles.anti_drone)
        });
        if let Some((pid, _)) = threat {
            decision.shots.push(TargetRef::Projectile(pid));
        }
    }

    if input.fire {
        let aim = target.unwrap_or_else(|| {
            TargetRef::Point(ship.position + ship.velocity * tuning.combat.manual_aim_lead)
        });
        decision.shots.push(aim);
    }

    Some(decision)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    use crate::components::{Warhead, WeaponKind};
    use crate::config::SimConfig;
    use crate::fleets::FleetId;
    use crate::projectile::{MissileState, Projectile, ProjectileKind};
    use crate::ship::{Ship, ShipSpawnParams};

    fn world() -> World {
        World::new(Arc::new(SimConfig::default()))
    }

    fn add_ship(world: &mut World, fleet: FleetId, position: Vec2, loadout: &[WeaponKind]) -> ShipId {
        let id = world.ships.allocate_id();
        let config = Arc::clone(&world.config);
        let hull = config.ship_type("destroyer").unwrap();
        let params = ShipSpawnParams::new(position, fleet, "destroyer")
            .with_loadout(loadout.to_vec())
            .with_velocity(Vec2::ZERO);
        world
            .ships
            .insert(Ship::build(id, &params, hull, &config, &mut world.rng));
        id
    }

    fn add_missile(world: &mut World, fleet: FleetId, position: Vec2) -> ProjectileId {
        let id = world.allocate_projectile_id();
        world.projectiles.insert(
            id,
            Projectile {
                id,
                fleet,
                position,
                velocity: Vec2::ZERO,
                damage: 4.0,
                alive: true,
                weapon: WeaponKind::Missile,
                kind: ProjectileKind::Missile(MissileState {
                    target: None,
                    propellant: 50.0,
                    health: 2.0,
                    warhead: Warhead::Kinetic,
                    navigation_gain: 4.0,
                    max_accel: 0.25,
                    max_speed: 6.0,
                }),
            },
        );
        id
    }

    fn auto(world: &World, id: ShipId) -> Decision {
        decide(world, id, ControlMode::Autonomous, EngagementToggles::default()).unwrap()
    }

    #[test]
    fn test_patrol_without_enemies() {
        let mut world = world();
        let me = add_ship(&mut world, FleetId::Fleet1, Vec2::new(500.0, 500.0), &[WeaponKind::Coilgun]);
        let decision = auto(&world, me);
        assert_eq!(decision.state, Some(BehaviorState::Patrol));
        assert!(decision.shots.is_empty());
    }

    #[test]
    fn test_attack_inside_primary_range() {
        let mut world = world();
        let me = add_ship(&mut world, FleetId::Fleet1, Vec2::new(500.0, 500.0), &[WeaponKind::Coilgun]);
        let enemy = add_ship(&mut world, FleetId::Fleet2, Vec2::new(830.0, 500.0), &[WeaponKind::Coilgun]);

        let decision = auto(&world, me);

        assert_eq!(decision.state, Some(BehaviorState::Attack));
        assert_eq!(decision.shots, vec![TargetRef::Ship(enemy)]);
        // 330 is beyond 90% of 350: close in.
        assert!(decision.force.x > 0.0);
    }

    #[test]
    fn test_projectile_primary_backs_off_when_too_close() {
        let mut world = world();
        let me = add_ship(&mut world, FleetId::Fleet1, Vec2::new(500.0, 500.0), &[WeaponKind::Coilgun]);
        add_ship(&mut world, FleetId::Fleet2, Vec2::new(600.0, 500.0), &[WeaponKind::Coilgun]);
        let decision = auto(&world, me);
        assert_eq!(decision.state, Some(BehaviorState::Attack));
        assert!(decision.force.x < 0.0);
    }

    #[test]
    fn test_laser_primary_holds_mid_range() {
        let mut world = world();
        let me = add_ship(&mut world, FleetId::Fleet1, Vec2::new(500.0, 500.0), &[WeaponKind::PulseLaser]);
        add_ship(&mut world, FleetId::Fleet2, Vec2::new(600.0, 500.0), &[WeaponKind::Coilgun]);
        let decision = auto(&world, me);
        assert_eq!(decision.state, Some(BehaviorState::Attack));
        assert_eq!(decision.force, Vec2::ZERO);
    }

    #[test]
    fn test_flee_when_damaged() {
        let mut world = world();
        let me = add_ship(&mut world, FleetId::Fleet1, Vec2::new(500.0, 500.0), &[WeaponKind::Coilgun]);
        add_ship(&mut world, FleetId::Fleet2, Vec2::new(2000.0, 500.0), &[WeaponKind::Coilgun]);
        world.ships.get_mut(me).unwrap().health = 200.0;

        let decision = auto(&world, me);

        assert_eq!(decision.state, Some(BehaviorState::Flee));
        assert!(decision.force.x < 0.0);
        assert!(decision.shots.is_empty());
    }

    #[test]
    fn test_intercept_outranks_flee() {
        let mut world = world();
        let me = add_ship(&mut world, FleetId::Fleet1, Vec2::new(500.0, 500.0), &[WeaponKind::PointDefense]);
        add_ship(&mut world, FleetId::Fleet2, Vec2::new(700.0, 500.0), &[WeaponKind::Coilgun]);
        let missile = add_missile(&mut world, FleetId::Fleet2, Vec2::new(560.0, 500.0));
        world.ships.get_mut(me).unwrap().health = 10.0;

        let decision = auto(&world, me);

        assert_eq!(decision.state, Some(BehaviorState::Intercept));
        assert_eq!(decision.shots, vec![TargetRef::Projectile(missile)]);
    }

    #[test]
    fn test_manual_thrust_and_point_fire() {
        let mut world = world();
        let me = add_ship(&mut world, FleetId::Fleet1, Vec2::new(500.0, 500.0), &[WeaponKind::Coilgun]);
        world.ships.get_mut(me).unwrap().velocity = Vec2::new(1.0, 0.0);
        let input = ManualInput {
            thrust: Vec2::new(3.0, -1.0),
            fire: true,
        };

        let decision = decide(&world, me, ControlMode::Manual(input), EngagementToggles::default()).unwrap();

        assert_eq!(decision.state, None);
        assert_eq!(decision.force, Vec2::ZERO);
        assert!((decision.thrust - Vec2::new(0.15, -0.15)).length() < 1e-6);
        assert_eq!(decision.shots, vec![TargetRef::Point(Vec2::new(510.0, 500.0))]);
    }

    #[test]
    fn test_anti_ship_acquires_nearest_enemy() {
        let mut world = world();
        let me = add_ship(&mut world, FleetId::Fleet1, Vec2::new(500.0, 500.0), &[WeaponKind::Coilgun]);
        add_ship(&mut world, FleetId::Fleet2, Vec2::new(1500.0, 500.0), &[WeaponKind::Coilgun]);
        let near = add_ship(&mut world, FleetId::Fleet2, Vec2::new(900.0, 500.0), &[WeaponKind::Coilgun]);
        let mut toggles = EngagementToggles::default();
        assert!(toggles.toggle(AutoEngagement::AntiShip));

        let mut control = ControlState {
            manual: Some(ManualInput::default()),
            toggles,
            fire_control_override: false,
        };
        update_ship(&mut world, me, &control);

        assert_eq!(world.ships.get(me).unwrap().manual_target, Some(TargetRef::Ship(near)));

        control.toggles.toggle(AutoEngagement::AntiShip);
        assert!(!control.toggles.is_enabled(AutoEngagement::AntiShip));
    }

    #[test]
    fn test_anti_missile_targets_any_distance() {
        let mut world = world();
        let me = add_ship(&mut world, FleetId::Fleet1, Vec2::new(500.0, 500.0), &[WeaponKind::PointDefense]);
        let missile = add_missile(&mut world, FleetId::Fleet2, Vec2::new(1500.0, 500.0));
        let toggles = EngagementToggles {
            anti_missile: true,
            ..EngagementToggles::default()
        };
        let decision = decide(&world, me, ControlMode::Manual(ManualInput::default()), toggles).unwrap();
        assert_eq!(decision.shots, vec![TargetRef::Projectile(missile)]);
    }

    #[test]
    fn test_destroyed_ship_has_no_decision() {
        let mut world = world();
        let me = add_ship(&mut world, FleetId::Fleet1, Vec2::ZERO, &[WeaponKind::Coilgun]);
        world.ships.get_mut(me).unwrap().health = 0.0;
        assert!(decide(&world, me, ControlMode::Autonomous, EngagementToggles::default()).is_none());
    }
}
