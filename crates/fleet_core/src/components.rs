//! Component definitions shared by ships and projectiles.
//!
//! Components are plain data. Behaviour lives in the system modules
//! ([`crate::resources`], [`crate::steering`], [`crate::weapons`], ...).

use std::fmt;

use glam::Vec2;
use serde::{Deserialize, Serialize};

/// Stable identifier for a ship. Never reused within a simulation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct ShipId(pub u64);

/// Stable identifier for a projectile or drone. Never reused within a simulation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct ProjectileId(pub u64);

impl fmt::Display for ShipId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "ship#{}", self.0)
    }
}

impl fmt::Display for ProjectileId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "projectile#{}", self.0)
    }
}

/// Something a weapon can be pointed at.
///
/// Entity variants are resolved against the world each time they are
/// used; a destroyed entity resolves to nothing.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum TargetRef {
    /// A ship.
    Ship(ShipId),
    /// A missile, drone, or other projectile.
    Projectile(ProjectileId),
    /// A fixed point in space (manual "fire ahead").
    Point(Vec2),
}

// ============================================================================
// Weapons
// ============================================================================

/// Weapon families a mount can carry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum WeaponKind {
    /// Hit-scan, slow-cycling beam.
    PulseLaser,
    /// Hit-scan, fires every tick for low damage.
    ContinuousLaser,
    /// Rapid-fire cannon. Unaffected by jamming.
    RapidEnergy,
    /// Fast, short-ranged rounds for missile defence.
    PointDefense,
    /// Heavy, slow-cycling kinetic round. Unaffected by jamming.
    Coilgun,
    /// Seeking missile carrying a warhead.
    Missile,
    /// Lead-intercept charge that jams ships on detonation.
    EmpCharge,
    /// Launches escort drones.
    DroneBay,
}

impl WeaponKind {
    /// Every weapon kind, in table order.
    pub const ALL: [WeaponKind; 8] = [
        WeaponKind::PulseLaser,
        WeaponKind::ContinuousLaser,
        WeaponKind::RapidEnergy,
        WeaponKind::PointDefense,
        WeaponKind::Coilgun,
        WeaponKind::Missile,
        WeaponKind::EmpCharge,
        WeaponKind::DroneBay,
    ];

    /// Lasers resolve instantly instead of spawning a projectile.
    #[must_use]
    pub const fn is_hit_scan(self) -> bool {
        matches!(self, Self::PulseLaser | Self::ContinuousLaser)
    }

    /// Kinds that can still fire while jammed.
    #[must_use]
    pub const fn ignores_jamming(self) -> bool {
        matches!(self, Self::RapidEnergy | Self::Coilgun)
    }

    /// Whether firing draws on the ship's ammunition pool.
    #[must_use]
    pub const fn uses_ammo(self) -> bool {
        !self.is_hit_scan()
    }
}

impl fmt::Display for WeaponKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::PulseLaser => "pulse_laser",
            Self::ContinuousLaser => "continuous_laser",
            Self::RapidEnergy => "rapid_energy",
            Self::PointDefense => "point_defense",
            Self::Coilgun => "coilgun",
            Self::Missile => "missile",
            Self::EmpCharge => "emp",
            Self::DroneBay => "drone_bay",
        };
        f.write_str(name)
    }
}

/// Missile payload.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Warhead {
    /// Plain direct-hit damage.
    Kinetic,
    /// Armour-piercing: extra direct damage, no blast.
    ArmorPiercing,
    /// High explosive: direct damage plus a small blast.
    HighExplosive,
    /// Heavy direct damage plus a wide blast.
    Nuclear,
}

impl Warhead {
    /// Every warhead, in table order.
    pub const ALL: [Warhead; 4] = [
        Warhead::Kinetic,
        Warhead::ArmorPiercing,
        Warhead::HighExplosive,
        Warhead::Nuclear,
    ];
}

/// A single weapon hardpoint on a ship.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct WeaponMount {
    /// What the mount fires.
    pub kind: WeaponKind,
    /// Ticks until the mount can fire again.
    pub cooldown_remaining: f32,
    /// Disabled mounts never fire.
    pub enabled: bool,
    /// Payload for missile mounts.
    pub warhead: Option<Warhead>,
}

impl WeaponMount {
    /// Create an enabled, ready mount.
    #[must_use]
    pub const fn new(kind: WeaponKind, warhead: Option<Warhead>) -> Self {
        Self {
            kind,
            cooldown_remaining: 0.0,
            enabled: true,
            warhead,
        }
    }

    /// Enabled and off cooldown.
    #[must_use]
    pub fn is_ready(&self) -> bool {
        self.enabled && self.cooldown_remaining <= 0.0
    }

    /// Count the cooldown down by `time_scale` ticks.
    pub fn cool(&mut self, time_scale: f32) {
        self.cooldown_remaining = (self.cooldown_remaining - time_scale).max(0.0);
    }
}

// ============================================================================
// Behaviour
// ============================================================================

/// Combat state chosen by the ship AI each tick.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum BehaviorState {
    /// Fly with the flock.
    #[default]
    Patrol,
    /// Engage the nearest enemy ship.
    Attack,
    /// Run from the nearest enemy ship.
    Flee,
    /// Shoot down an incoming missile or drone.
    Intercept,
}

/// Drone behaviour.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum DroneBehavior {
    /// Hold formation around the owner.
    #[default]
    Patrol,
    /// Chase a nearby enemy ship.
    Attack,
    /// Head home to dock and resupply.
    Return,
}

/// Electronic-warfare status of a ship.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct JamStatus {
    /// Ticks of jamming left.
    pub remaining: f32,
    /// Whether the ship is currently jammed.
    pub jammed: bool,
}

impl JamStatus {
    /// Jam for at least `duration` ticks. Never shortens an active jam.
    pub fn apply(&mut self, duration: f32) {
        self.remaining = self.remaining.max(duration);
        self.jammed = self.remaining > 0.0;
    }

    /// Count the jam down by `time_scale` ticks.
    pub fn decay(&mut self, time_scale: f32) {
        if self.remaining > 0.0 {
            self.remaining = (self.remaining - time_scale).max(0.0);
            if self.remaining <= 0.0 {
                self.jammed = false;
            }
        }
    }

    /// Whether weapons other than the exempt kinds are blocked.
    #[must_use]
    pub fn is_jammed(&self) -> bool {
        self.jammed && self.remaining > 0.0
    }
}
