//! Flocking and combat steering.
//!
//! Every behaviour returns a steering force: the difference between a
//! desired velocity at full speed and the current velocity, clamped to
//! `max_force`. Distances are measured across the wrapped arena edges.

use glam::Vec2;

use crate::data::SteeringTuning;
use crate::math::{Arena, VecExt, EPSILON};
use crate::ship::Ship;

/// Steer from `velocity` toward `desired` at `max_speed`, clamped to `max_force`.
///
/// A zero `desired` direction yields zero force.
#[must_use]
pub fn steer_towards(desired: Vec2, velocity: Vec2, max_speed: f32, max_force: f32) -> Vec2 {
    if desired.length_squared() <= EPSILON * EPSILON {
        return Vec2::ZERO;
    }
    (desired.with_magnitude(max_speed) - velocity).limit(max_force)
}

/// Steer toward `target` by the shortest wrapped path.
#[must_use]
pub fn seek(
    arena: &Arena,
    position: Vec2,
    velocity: Vec2,
    target: Vec2,
    max_speed: f32,
    max_force: f32,
) -> Vec2 {
    steer_towards(arena.delta(position, target), velocity, max_speed, max_force)
}

/// Steer directly away from `threat` by the shortest wrapped path.
#[must_use]
pub fn flee(
    arena: &Arena,
    position: Vec2,
    velocity: Vec2,
    threat: Vec2,
    max_speed: f32,
    max_force: f32,
) -> Vec2 {
    steer_towards(arena.delta(threat, position), velocity, max_speed, max_force)
}

/// Push away from every ship, friend or foe, inside the separation radius.
#[must_use]
pub fn separation<'a>(
    arena: &Arena,
    ship: &Ship,
    others: impl IntoIterator<Item = &'a Ship>,
    tuning: &SteeringTuning,
) -> Vec2 {
    let mut sum = Vec2::ZERO;
    let mut count = 0u32;
    for other in others {
        if other.id == ship.id {
            continue;
        }
        let away = arena.delta(other.position, ship.position);
        let d = away.length();
        if d < tuning.separation_radius {
            sum += if d > EPSILON { away / d } else { Vec2::ZERO };
            count += 1;
        }
    }
    if count == 0 {
        return Vec2::ZERO;
    }
    steer_towards(
        sum / count as f32,
        ship.velocity,
        ship.hull.max_speed,
        tuning.max_force,
    )
}

/// Match the average velocity of nearby fleet-mates.
#[must_use]
pub fn alignment<'a>(
    arena: &Arena,
    ship: &Ship,
    others: impl IntoIterator<Item = &'a Ship>,
    tuning: &SteeringTuning,
) -> Vec2 {
    let mut sum = Vec2::ZERO;
    let mut count = 0u32;
    for other in others {
        if !is_flockmate(arena, ship, other, tuning.perception_radius) {
            continue;
        }
        sum += other.velocity;
        count += 1;
    }
    if count == 0 {
        return Vec2::ZERO;
    }
    steer_towards(
        sum / count as f32,
        ship.velocity,
        ship.hull.max_speed,
        tuning.max_force,
    )
}

/// Seek the centre of nearby fleet-mates.
///
/// The centre is averaged from wrapped offsets so a flock straddling an
/// edge is not pulled across the whole arena.
#[must_use]
pub fn cohesion<'a>(
    arena: &Arena,
    ship: &Ship,
    others: impl IntoIterator<Item = &'a Ship>,
    tuning: &SteeringTuning,
) -> Vec2 {
    let mut sum = Vec2::ZERO;
    let mut count = 0u32;
    for other in others {
        if !is_flockmate(arena, ship, other, tuning.perception_radius) {
            continue;
        }
        sum += arena.delta(ship.position, other.position);
        count += 1;
    }
    if count == 0 {
        return Vec2::ZERO;
    }
    steer_towards(
        sum / count as f32,
        ship.velocity,
        ship.hull.max_speed,
        tuning.max_force,
    )
}

fn is_flockmate(arena: &Arena, ship: &Ship, other: &Ship, radius: f32) -> bool {
    other.id != ship.id
        && other.fleet == ship.fleet
        && arena.distance_squared(ship.position, other.position) < radius * radius
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::components::{ShipId, WeaponKind};
    use crate::config::SimConfig;
    use crate::fleets::FleetId;
    use crate::ship::ShipSpawnParams;
    use rand::SeedableRng;
    use rand_pcg::Pcg32;

    fn ship(id: u64, fleet: FleetId, position: Vec2, velocity: Vec2) -> Ship {
        let config = SimConfig::default();
        let hull = config.ship_type("frigate").unwrap().clone();
        let params = ShipSpawnParams::new(position, fleet, "frigate")
            .with_loadout(vec![WeaponKind::Coilgun])
            .with_velocity(velocity);
        Ship::build(ShipId(id), &params, &hull, &config, &mut Pcg32::seed_from_u64(id))
    }

    #[test]
    fn test_separation_zero_without_close_neighbours() {
        let arena = Arena::default();
        let tuning = SteeringTuning::default();
        let me = ship(1, FleetId::Fleet1, Vec2::new(100.0, 100.0), Vec2::X);
        let far = ship(2, FleetId::Fleet2, Vec2::new(150.0, 100.0), Vec2::X);
        let ships = [me.clone(), far];
        assert_eq!(separation(&arena, &me, &ships, &tuning), Vec2::ZERO);
    }

    #[test]
    fn test_separation_pushes_away_across_edge() {
        let arena = Arena::new(1000.0, 1000.0);
        let tuning = SteeringTuning::default();
        let me = ship(1, FleetId::Fleet1, Vec2::new(2.0, 500.0), Vec2::ZERO);
        let close = ship(2, FleetId::Fleet2, Vec2::new(995.0, 500.0), Vec2::ZERO);
        let force = separation(&arena, &me, [&me, &close], &tuning);
        assert!(force.x > 0.0);
        assert!((force.length() - tuning.max_force).abs() < 1e-5);
    }

    #[test]
    fn test_alignment_and_cohesion_ignore_enemies() {
        let arena = Arena::default();
        let tuning = SteeringTuning::default();
        let me = ship(1, FleetId::Fleet1, Vec2::new(500.0, 500.0), Vec2::ZERO);
        let enemy = ship(2, FleetId::Fleet2, Vec2::new(550.0, 500.0), Vec2::Y);
        let ships = [me.clone(), enemy];
        assert_eq!(alignment(&arena, &me, &ships, &tuning), Vec2::ZERO);
        assert_eq!(cohesion(&arena, &me, &ships, &tuning), Vec2::ZERO);
    }

    #[test]
    fn test_cohesion_pulls_toward_flock() {
        let arena = Arena::default();
        let tuning = SteeringTuning::default();
        let me = ship(1, FleetId::Fleet1, Vec2::new(500.0, 500.0), Vec2::ZERO);
        let mate = ship(2, FleetId::Fleet1, Vec2::new(560.0, 500.0), Vec2::Y);
        let ships = [me.clone(), mate];
        let pull = cohesion(&arena, &me, &ships, &tuning);
        assert!(pull.x > 0.0 && pull.y.abs() < 1e-6);
        let align = alignment(&arena, &me, &ships, &tuning);
        assert!(align.y > 0.0);
    }

    #[test]
    fn test_seek_and_flee_are_opposite() {
        let arena = Arena::default();
        let toward = seek(&arena, Vec2::ZERO, Vec2::ZERO, Vec2::new(10.0, 0.0), 2.0, 0.05);
        let away = flee(&arena, Vec2::ZERO, Vec2::ZERO, Vec2::new(10.0, 0.0), 2.0, 0.05);
        assert!((toward + away).length() < 1e-6);
        assert!((toward.length() - 0.05).abs() < 1e-6);
    }
}
