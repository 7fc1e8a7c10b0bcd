//! Projectiles, guided munitions and drones.
//!
//! Every projectile shares a small common header (id, fleet, motion, base
//! damage) and carries kind-specific state in [`ProjectileKind`]. Behaviour
//! is dispatched with `match` in [`crate::guidance`] and [`crate::damage`].

use glam::Vec2;
use serde::{Deserialize, Serialize};

use crate::components::{DroneBehavior, ProjectileId, ShipId, TargetRef, Warhead, WeaponKind};
use crate::fleets::FleetId;

/// Flight state of a seeking missile.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MissileState {
    /// What the missile is homing on. Reacquired when lost.
    pub target: Option<TargetRef>,
    /// Propellant left. The missile is destroyed when it runs out.
    pub propellant: f32,
    /// Structural hit points.
    pub health: f32,
    /// Payload.
    pub warhead: Warhead,
    /// Proportional navigation gain.
    pub navigation_gain: f32,
    /// Acceleration limit.
    pub max_accel: f32,
    /// Speed limit.
    pub max_speed: f32,
}

/// Flight state of an area-effect charge.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ChargeState {
    /// What the charge was fired at.
    pub target: TargetRef,
    /// Lead-intercept point the charge flies toward.
    pub aim_point: Vec2,
    /// Set once the charge has detonated.
    pub activated: bool,
    /// Ticks until the charge detonates on its own.
    pub lifespan: f32,
    /// Detonation distance to the target or aim point.
    pub proximity_radius: f32,
    /// Jamming radius of the burst.
    pub effect_radius: f32,
}

/// State of an escort drone.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DroneState {
    /// Structural hit points.
    pub health: f32,
    /// Propellant left.
    pub propellant: f32,
    /// Propellant at launch, for the return threshold.
    pub max_propellant: f32,
    /// Current behaviour.
    pub behavior: DroneBehavior,
    /// Launching ship.
    pub owner: ShipId,
    /// Angle of the formation slot around the owner.
    pub formation_angle: f32,
    /// Distance of the formation slot from the owner.
    pub formation_radius: f32,
    /// Ticks until contact damage can be dealt again.
    pub contact_cooldown: f32,
    /// Enemy ship being chased.
    pub target: Option<ShipId>,
}

impl DroneState {
    /// Fraction of launch propellant remaining.
    #[must_use]
    pub fn propellant_fraction(&self) -> f32 {
        if self.max_propellant > 0.0 {
            self.propellant / self.max_propellant
        } else {
            0.0
        }
    }
}

/// Kind-specific projectile state.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum ProjectileKind {
    /// Straight-line solid round.
    Kinetic,
    /// Straight-line energy bolt.
    Energy,
    /// Seeking missile.
    Missile(MissileState),
    /// Lead-intercept area charge.
    AreaCharge(ChargeState),
    /// Escort drone.
    Drone(DroneState),
}

/// A projectile or drone in flight.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Projectile {
    /// Unique identifier.
    pub id: ProjectileId,
    /// Fleet that fired it.
    pub fleet: FleetId,
    /// World position.
    pub position: Vec2,
    /// Velocity in world units per tick.
    pub velocity: Vec2,
    /// Base damage on impact.
    pub damage: f32,
    /// Cleared when the projectile should be removed.
    pub alive: bool,
    /// Weapon that fired it.
    pub weapon: WeaponKind,
    /// Kind-specific state.
    pub kind: ProjectileKind,
}

impl Projectile {
    /// Whether this is a seeking missile.
    #[must_use]
    pub fn is_missile(&self) -> bool {
        matches!(self.kind, ProjectileKind::Missile(_))
    }

    /// Whether this is a drone.
    #[must_use]
    pub fn is_drone(&self) -> bool {
        matches!(self.kind, ProjectileKind::Drone(_))
    }

    /// Whether this is a plain kinetic or energy round.
    #[must_use]
    pub fn is_round(&self) -> bool {
        matches!(self.kind, ProjectileKind::Kinetic | ProjectileKind::Energy)
    }

    /// Missiles and drones are what ships intercept.
    #[must_use]
    pub fn is_threat(&self) -> bool {
        self.alive && (self.is_missile() || self.is_drone())
    }

    /// Drones wrap at the arena edges; everything else leaves it.
    #[must_use]
    pub fn wraps(&self) -> bool {
        self.is_drone()
    }

    /// Owner of a drone.
    #[must_use]
    pub fn drone_owner(&self) -> Option<ShipId> {
        match self.kind {
            ProjectileKind::Drone(drone) => Some(drone.owner),
            _ => None,
        }
    }

    /// Structural hit points, for kinds that have them.
    #[must_use]
    pub fn structure(&self) -> Option<f32> {
        match self.kind {
            ProjectileKind::Missile(missile) => Some(missile.health),
            ProjectileKind::Drone(drone) => Some(drone.health),
            _ => None,
        }
    }

    /// Damage a missile or drone; any other kind is destroyed outright.
    ///
    /// Returns `true` if the projectile was destroyed.
    pub fn apply_damage(&mut self, amount: f32) -> bool {
        let health = match &mut self.kind {
            ProjectileKind::Missile(missile) => &mut missile.health,
            ProjectileKind::Drone(drone) => &mut drone.health,
            _ => {
                self.alive = false;
                return true;
            }
        };
        *health = (*health - amount.max(0.0)).max(0.0);
        if *health <= 0.0 {
            self.alive = false;
        }
        !self.alive
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn drone(health: f32) -> Projectile {
        Projectile {
            id: ProjectileId(1),
            fleet: FleetId::Fleet1,
            position: Vec2::ZERO,
            velocity: Vec2::ZERO,
            damage: 0.0,
            alive: true,
            weapon: WeaponKind::DroneBay,
            kind: ProjectileKind::Drone(DroneState {
                health,
                propellant: 100.0,
                max_propellant: 300.0,
                behavior: DroneBehavior::Patrol,
                owner: ShipId(7),
                formation_angle: 0.0,
                formation_radius: 30.0,
                contact_cooldown: 0.0,
                target: None,
            }),
        }
    }

    #[test]
    fn test_drone_damage_and_destruction() {
        let mut p = drone(6.0);
        assert!(p.is_threat());
        assert!(p.wraps());
        assert_eq!(p.drone_owner(), Some(ShipId(7)));
        assert!(!p.apply_damage(2.0));
        assert_eq!(p.structure(), Some(4.0));
        assert!(p.apply_damage(10.0));
        assert_eq!(p.structure(), Some(0.0));
        assert!(!p.alive);
        assert!(!p.is_threat());
    }

    #[test]
    fn test_rounds_die_on_any_damage() {
        let mut p = drone(1.0);
        p.kind = ProjectileKind::Kinetic;
        assert!(p.is_round());
        assert!(p.structure().is_none());
        assert!(p.apply_damage(0.1));
    }

    #[test]
    fn test_propellant_fraction() {
        let p = drone(1.0);
        let ProjectileKind::Drone(state) = p.kind else {
            unreachable!()
        };
        assert!((state.propellant_fraction() - 1.0 / 3.0).abs() < 1e-6);
    }
}
