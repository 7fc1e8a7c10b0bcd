//! Guided projectile physics: seeking missiles, area charges and drones.
//!
//! [`update_projectiles`] advances every live projectile by one tick.
//! Effects that touch other entities (bursts, drone contact damage,
//! docking) are returned as [`GuidanceEffect`]s and applied by the caller,
//! so each projectile only ever mutates itself during the pass.

use std::collections::BTreeMap;

use glam::Vec2;

use crate::components::{DroneBehavior, ProjectileId, ShipId, TargetRef};
use crate::fleets::FleetId;
use crate::math::{clamp_turn, Arena, VecExt, EPSILON};
use crate::projectile::{ChargeState, DroneState, MissileState, Projectile, ProjectileKind};
use crate::ship::Ship;
use crate::steering::steer_towards;
use crate::world::{TargetInfo, World};

/// Side effect of a guidance update, applied after the pass.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum GuidanceEffect {
    /// An area charge went off.
    Detonation {
        /// The charge.
        projectile: ProjectileId,
        /// Fleet that fired it. Only the other fleet is affected.
        fleet: FleetId,
        /// Burst centre.
        position: Vec2,
        /// Burst radius.
        radius: f32,
    },
    /// A drone rammed an enemy ship.
    DroneContact {
        /// The drone.
        drone: ProjectileId,
        /// Ship it hit.
        target: ShipId,
        /// Damage dealt.
        damage: f32,
    },
    /// A drone returned home.
    DroneDocked {
        /// The drone.
        drone: ProjectileId,
        /// Ship it docked with.
        owner: ShipId,
        /// Ammunition handed back.
        ammo: f32,
    },
}

/// Proportional navigation command.
///
/// `relative_position` and `relative_velocity` are target minus pursuer.
/// The returned acceleration is perpendicular to the line of sight with
/// magnitude `gain * max(closing_speed, 0) * |los_rate|`.
#[must_use]
pub fn proportional_navigation(relative_position: Vec2, relative_velocity: Vec2, gain: f32) -> Vec2 {
    let range_sq = relative_position.length_squared();
    if range_sq <= EPSILON {
        return Vec2::ZERO;
    }
    let los = relative_position / range_sq.sqrt();
    let los_rate = relative_position.perp_dot(relative_velocity) / range_sq;
    let closing_speed = -los.dot(relative_velocity);
    let magnitude = gain * closing_speed.max(0.0) * los_rate.abs();
    los.perp_ccw() * magnitude.copysign(los_rate)
}

/// Smallest positive time at which a projectile fired at `speed` meets a
/// target at `relative_position` moving with constant `target_velocity`.
///
/// Returns `None` when no positive real solution exists.
#[must_use]
pub fn intercept_time(relative_position: Vec2, target_velocity: Vec2, speed: f32) -> Option<f32> {
    let a = target_velocity.length_squared() - speed * speed;
    let b = 2.0 * relative_position.dot(target_velocity);
    let c = relative_position.length_squared();

    if a.abs() <= EPSILON {
        if b.abs() <= EPSILON {
            return None;
        }
        let t = -c / b;
        return (t > 0.0).then_some(t);
    }

    let discriminant = b * b - 4.0 * a * c;
    if discriminant < 0.0 {
        return None;
    }
    let root = discriminant.sqrt();
    let t1 = (-b - root) / (2.0 * a);
    let t2 = (-b + root) / (2.0 * a);
    match (t1 > 0.0, t2 > 0.0) {
        (true, true) => Some(t1.min(t2)),
        (true, false) => Some(t1),
        (false, true) => Some(t2),
        (false, false) => None,
    }
}

/// Aim point for a constant-speed shot from `shooter` at a moving target.
///
/// The point is expressed relative to `shooter` along the shortest wrapped
/// path, so it may lie outside the arena. Falls back to the target's
/// current position when there is no intercept solution.
#[must_use]
pub fn lead_point(
    arena: &Arena,
    shooter: Vec2,
    target_position: Vec2,
    target_velocity: Vec2,
    speed: f32,
) -> Vec2 {
    let offset = arena.delta(shooter, target_position);
    match intercept_time(offset, target_velocity, speed) {
        Some(t) => shooter + offset + target_velocity * t,
        None => {
            tracing::trace!(
                ?offset,
                ?target_velocity,
                speed,
                "No intercept solution, aiming directly"
            );
            shooter + offset
        }
    }
}

/// Advance every live projectile by `time_scale` ticks.
///
/// Rounds fly straight. Missiles, charges and drones run their guidance.
/// Destroyed projectiles are flagged, not removed.
pub fn update_projectiles(world: &mut World, time_scale: f32) -> Vec<GuidanceEffect> {
    let siblings: Vec<(ProjectileId, ShipId, Vec2)> = world
        .projectiles
        .values()
        .filter(|p| p.alive)
        .filter_map(|p| p.drone_owner().map(|owner| (p.id, owner, p.position)))
        .collect();

    let tracks = Tracks::capture(world);

    let mut projectiles = std::mem::take(&mut world.projectiles);
    let mut effects = Vec::new();
    for projectile in projectiles.values_mut() {
        if !projectile.alive {
            continue;
        }
        match projectile.kind {
            ProjectileKind::Kinetic | ProjectileKind::Energy => {
                projectile.position += projectile.velocity * time_scale;
            }
            ProjectileKind::Missile(_) => {
                update_missile(projectile, world, &tracks, time_scale);
            }
            ProjectileKind::AreaCharge(_) => {
                update_charge(projectile, world, &tracks, time_scale, &mut effects);
            }
            ProjectileKind::Drone(_) => {
                update_drone(projectile, world, &siblings, time_scale, &mut effects);
            }
        }
    }
    merge_back(world, projectiles);
    effects
}

/// Live projectiles as they stood at the start of the pass.
///
/// The projectile map is taken out of the world while guidance runs, so
/// projectile targets are resolved against this instead.
struct Tracks(BTreeMap<ProjectileId, TargetInfo>);

impl Tracks {
    fn capture(world: &World) -> Self {
        Self(
            world
                .projectiles
                .keys()
                .filter_map(|&id| world.resolve(TargetRef::Projectile(id)).map(|info| (id, info)))
                .collect(),
        )
    }

    fn resolve(&self, world: &World, target: TargetRef) -> Option<TargetInfo> {
        match target {
            TargetRef::Projectile(id) => self.0.get(&id).copied(),
            other => world.resolve(other),
        }
    }
}

fn merge_back(world: &mut World, mut projectiles: BTreeMap<ProjectileId, Projectile>) {
    projectiles.append(&mut world.projectiles);
    world.projectiles = projectiles;
}

fn update_missile(projectile: &mut Projectile, world: &World, tracks: &Tracks, time_scale: f32) {
    let ProjectileKind::Missile(missile) = &mut projectile.kind else {
        return;
    };
    if missile.propellant <= 0.0 || missile.health <= 0.0 {
        projectile.alive = false;
        return;
    }

    let target =
        acquire_missile_target(missile, projectile.position, projectile.fleet, world, tracks);
    if let Some((target_position, target_velocity)) = target {
        let tuning = &world.config.tuning.missile;
        let offset = world.arena.delta(projectile.position, target_position);
        let relative_velocity = target_velocity - projectile.velocity;
        let accel = (proportional_navigation(offset, relative_velocity, missile.navigation_gain)
            + offset.with_magnitude(tuning.chase_accel))
        .limit(missile.max_accel);

        projectile.velocity = (projectile.velocity + accel * time_scale).limit(missile.max_speed);
        missile.propellant -= accel.length() * tuning.burn_rate * time_scale;
    }
    projectile.position += projectile.velocity * time_scale;
}

fn acquire_missile_target(
    missile: &mut MissileState,
    position: Vec2,
    fleet: FleetId,
    world: &World,
    tracks: &Tracks,
) -> Option<(Vec2, Vec2)> {
    if let Some(info) = missile.target.and_then(|t| tracks.resolve(world, t)) {
        return Some((info.position, info.velocity));
    }
    missile.target = world
        .nearest_enemy_ship(position, fleet)
        .map(|(id, _)| TargetRef::Ship(id));
    missile
        .target
        .and_then(|t| world.resolve(t))
        .map(|info| (info.position, info.velocity))
}

fn update_charge(
    projectile: &mut Projectile,
    world: &World,
    tracks: &Tracks,
    time_scale: f32,
    effects: &mut Vec<GuidanceEffect>,
) {
    let ProjectileKind::AreaCharge(charge) = &mut projectile.kind else {
        return;
    };
    if charge.activated {
        projectile.alive = false;
        return;
    }

    projectile.position += projectile.velocity * time_scale;
    charge.lifespan -= time_scale;

    if should_detonate(charge, projectile.position, world, tracks) {
        charge.activated = true;
        projectile.alive = false;
        effects.push(GuidanceEffect::Detonation {
            projectile: projectile.id,
            fleet: projectile.fleet,
            position: projectile.position,
            radius: charge.effect_radius,
        });
    }
}

fn should_detonate(charge: &ChargeState, position: Vec2, world: &World, tracks: &Tracks) -> bool {
    if charge.lifespan <= 0.0 {
        return true;
    }
    let Some(target) = tracks.resolve(world, charge.target) else {
        return true;
    };
    world.arena.distance(position, target.position) <= charge.proximity_radius
        || world.arena.distance(position, charge.aim_point) <= charge.proximity_radius
}

fn update_drone(
    projectile: &mut Projectile,
    world: &World,
    siblings: &[(ProjectileId, ShipId, Vec2)],
    time_scale: f32,
    effects: &mut Vec<GuidanceEffect>,
) {
    let id = projectile.id;
    let position = projectile.position;
    let velocity = projectile.velocity;
    let ProjectileKind::Drone(drone) = &mut projectile.kind else {
        return;
    };
    let Some(owner) = world.live_ship(drone.owner) else {
        projectile.alive = false;
        return;
    };
    if drone.propellant <= 0.0 || drone.health <= 0.0 {
        projectile.alive = false;
        return;
    }

    let tuning = &world.config.tuning.drone;
    let arena = &world.arena;
    drone.contact_cooldown = (drone.contact_cooldown - time_scale).max(0.0);
    drone.formation_angle += tuning.formation_spin * time_scale;

    if drone.propellant_fraction() < tuning.return_threshold {
        drone.behavior = DroneBehavior::Return;
        drone.target = None;
    }

    let mut accel = match drone.behavior {
        DroneBehavior::Return => {
            let to_owner = arena.delta(position, owner.position);
            if to_owner.length() <= tuning.dock_radius {
                projectile.alive = false;
                effects.push(GuidanceEffect::DroneDocked {
                    drone: id,
                    owner: owner.id,
                    ammo: tuning.resupply_ammo,
                });
                return;
            }
            steer_towards(to_owner, velocity, tuning.max_speed, tuning.max_accel)
        }
        DroneBehavior::Patrol | DroneBehavior::Attack => {
            let fleet = projectile.fleet;
            drone_combat_accel(id, drone, position, velocity, fleet, world, effects)
                .unwrap_or_else(|| formation_accel(drone, position, velocity, owner, world))
        }
    };

    for &(other, owner_id, other_position) in siblings {
        if other == id || owner_id != drone.owner {
            continue;
        }
        let away = arena.delta(other_position, position);
        let d = away.length();
        if d < tuning.repulsion_radius {
            let strength = tuning.repulsion_strength * (1.0 - d / tuning.repulsion_radius);
            accel += away.with_magnitude(strength);
        }
    }
    let accel = accel.limit(tuning.max_accel);

    let next = (velocity + accel * time_scale).limit(tuning.max_speed);
    projectile.velocity = clamp_turn(velocity, next, tuning.max_turn_rate * time_scale);
    projectile.position = arena.wrap(position + projectile.velocity * time_scale);

    drone.propellant -= accel.length() * tuning.burn_rate * time_scale;
    if drone.propellant <= 0.0 {
        drone.propellant = 0.0;
        projectile.alive = false;
    }
}

/// Chase the current or nearest enemy ship in sensor range.
///
/// Returns `None`, leaving the drone in `Patrol`, when nothing is in range.
fn drone_combat_accel(
    id: ProjectileId,
    drone: &mut DroneState,
    position: Vec2,
    velocity: Vec2,
    fleet: FleetId,
    world: &World,
    effects: &mut Vec<GuidanceEffect>,
) -> Option<Vec2> {
    let tuning = &world.config.tuning.drone;
    let arena = &world.arena;

    let current = drone
        .target
        .and_then(|t| world.live_ship(t))
        .filter(|ship| arena.distance(position, ship.position) <= tuning.sensor_radius);
    let target = match current {
        Some(ship) => ship,
        None => {
            let nearest = world.nearest_enemy_ship_within(position, fleet, tuning.sensor_radius);
            match nearest.and_then(|(ship_id, _)| world.live_ship(ship_id)) {
                Some(ship) => ship,
                None => {
                    drone.behavior = DroneBehavior::Patrol;
                    drone.target = None;
                    return None;
                }
            }
        }
    };
    drone.behavior = DroneBehavior::Attack;
    drone.target = Some(target.id);

    let in_contact = arena.distance(position, target.position) <= tuning.contact_range;
    if in_contact && drone.contact_cooldown <= 0.0 {
        drone.contact_cooldown = tuning.contact_cooldown;
        effects.push(GuidanceEffect::DroneContact {
            drone: id,
            target: target.id,
            damage: tuning.contact_damage,
        });
    }

    let lead = target.position + target.velocity * tuning.lead_factor;
    Some(steer_towards(
        arena.delta(position, lead),
        velocity,
        tuning.max_speed,
        tuning.max_accel,
    ))
}

/// Hold the rotating formation slot around the owner.
fn formation_accel(
    drone: &DroneState,
    position: Vec2,
    velocity: Vec2,
    owner: &Ship,
    world: &World,
) -> Vec2 {
    let tuning = &world.config.tuning.drone;
    let slot = owner.position + Vec2::from_angle(drone.formation_angle) * drone.formation_radius;
    let desired = owner.velocity + world.arena.delta(position, slot) * tuning.formation_gain;
    (desired - velocity).limit(tuning.max_accel)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pn_zero_for_constant_bearing() {
        // Target flying straight at the pursuer: no line-of-sight rotation.
        let cmd = proportional_navigation(Vec2::new(100.0, 0.0), Vec2::new(-5.0, 0.0), 4.0);
        assert_eq!(cmd, Vec2::ZERO);
    }

    #[test]
    fn test_pn_turns_toward_crossing_target() {
        let cmd = proportional_navigation(Vec2::new(100.0, 0.0), Vec2::new(-5.0, 1.0), 4.0);
        assert!(cmd.y > 0.0);
        assert!(cmd.x.abs() < 1e-6);
        // |cmd| = N * Vc * |los_rate| = 4 * 5 * (100 / 10_000)
        assert!((cmd.length() - 0.2).abs() < 1e-5);
    }

    #[test]
    fn test_pn_ignores_opening_targets() {
        let cmd = proportional_navigation(Vec2::new(100.0, 0.0), Vec2::new(5.0, 1.0), 4.0);
        assert_eq!(cmd, Vec2::ZERO);
    }

    #[test]
    fn test_intercept_time_stationary_target() {
        let t = intercept_time(Vec2::new(30.0, 40.0), Vec2::ZERO, 5.0).unwrap();
        assert!((t - 10.0).abs() < 1e-4);
    }

    #[test]
    fn test_intercept_time_equal_speeds() {
        // Target approaching head-on at the same speed as the shot.
        let t = intercept_time(Vec2::new(100.0, 0.0), Vec2::new(-5.0, 0.0), 5.0).unwrap();
        assert!((t - 10.0).abs() < 1e-4);
        // Same speed, running away: never caught.
        assert!(intercept_time(Vec2::new(100.0, 0.0), Vec2::new(5.0, 0.0), 5.0).is_none());
    }

    #[test]
    fn test_intercept_time_faster_target_escapes() {
        assert!(intercept_time(Vec2::new(100.0, 0.0), Vec2::new(10.0, 0.0), 5.0).is_none());
    }

    #[test]
    fn test_lead_point_falls_back_to_direct_aim() {
        let arena = Arena::default();
        let aim = lead_point(&arena, Vec2::ZERO, Vec2::new(100.0, 0.0), Vec2::new(10.0, 0.0), 5.0);
        assert_eq!(aim, Vec2::new(100.0, 0.0));

        let lead = lead_point(&arena, Vec2::ZERO, Vec2::new(100.0, 0.0), Vec2::new(0.0, 3.0), 5.0);
        assert!(lead.y > 0.0);
        let t = lead.length() / 5.0;
        assert!((lead.y - 3.0 * t).abs() < 1e-3);
    }
}
