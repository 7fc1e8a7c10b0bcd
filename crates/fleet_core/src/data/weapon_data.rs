//! Weapon and warhead data for data-driven weapon definitions.

use serde::{Deserialize, Serialize};

use crate::components::{Warhead, WeaponKind};

/// Static properties of one weapon kind.
///
/// # Example RON
///
/// ```ron
/// WeaponData(
///     kind: Coilgun,
///     damage: 6.0,
///     cooldown: 90.0,
///     range: 350.0,
///     speed: Some(50.0),
///     energy_cost: 12.0,
///     heat_gen: 10.0,
///     ammo_cost: 3.0,
/// )
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WeaponData {
    /// Which weapon these properties describe.
    pub kind: WeaponKind,

    /// Base damage per hit.
    pub damage: f32,

    /// Ticks between shots.
    pub cooldown: f32,

    /// Engagement range in world units.
    pub range: f32,

    /// Launch speed for spawned projectiles. `None` for hit-scan kinds.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub speed: Option<f32>,

    /// Energy drawn per shot.
    pub energy_cost: f32,

    /// Heat added per shot.
    pub heat_gen: f32,

    /// Ammunition volume consumed per shot (ignored for lasers).
    #[serde(default)]
    pub ammo_cost: f32,
}

impl WeaponData {
    /// Launch speed, falling back to `default` for kinds without one.
    #[must_use]
    pub fn speed_or(&self, default: f32) -> f32 {
        self.speed.unwrap_or(default)
    }
}

/// Damage profile of one warhead.
///
/// # Example RON
///
/// ```ron
/// WarheadData(warhead: Nuclear, damage_multiplier: 5.0, blast_radius: 200.0, weight: 0.04)
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WarheadData {
    /// Which warhead these properties describe.
    pub warhead: Warhead,

    /// Multiplier on the missile's base damage.
    pub damage_multiplier: f32,

    /// Blast radius for secondary damage. Zero means direct hit only.
    #[serde(default)]
    pub blast_radius: f32,

    /// Relative likelihood of a missile mount being loaded with this warhead.
    pub weight: f32,
}

impl WarheadData {
    /// Whether this warhead damages bystanders.
    #[must_use]
    pub fn has_blast(&self) -> bool {
        self.blast_radius > 0.0
    }

    /// Linear falloff at `distance` from the burst: 1 at the centre, 0 at the rim.
    #[must_use]
    pub fn falloff(&self, distance: f32) -> f32 {
        if !self.has_blast() {
            return 0.0;
        }
        (1.0 - distance / self.blast_radius).max(0.0)
    }
}

/// Built-in weapon table.
#[must_use]
pub fn default_weapons() -> Vec<WeaponData> {
    let w = |kind, damage, cooldown, range, speed, energy_cost, heat_gen, ammo_cost| WeaponData {
        kind,
        damage,
        cooldown,
        range,
        speed,
        energy_cost,
        heat_gen,
        ammo_cost,
    };
    vec![
        w(WeaponKind::PulseLaser, 2.0, 30.0, 220.0, None, 8.0, 6.0, 0.0),
        w(WeaponKind::ContinuousLaser, 0.45, 1.0, 180.0, None, 0.6, 0.5, 0.0),
        w(WeaponKind::RapidEnergy, 0.9, 6.0, 200.0, Some(30.0), 1.5, 1.2, 0.5),
        w(WeaponKind::PointDefense, 0.6, 4.0, 120.0, Some(35.0), 0.8, 0.6, 0.2),
        w(WeaponKind::Coilgun, 6.0, 90.0, 350.0, Some(50.0), 12.0, 10.0, 3.0),
        w(WeaponKind::Missile, 4.0, 180.0, 800.0, Some(6.0), 10.0, 5.0, 8.0),
        w(WeaponKind::EmpCharge, 0.0, 240.0, 400.0, Some(8.0), 20.0, 8.0, 6.0),
        w(WeaponKind::DroneBay, 0.0, 300.0, 600.0, Some(3.5), 15.0, 4.0, 10.0),
    ]
}

/// Built-in warhead table.
#[must_use]
pub fn default_warheads() -> Vec<WarheadData> {
    vec![
        WarheadData {
            warhead: Warhead::Kinetic,
            damage_multiplier: 1.0,
            blast_radius: 0.0,
            weight: 0.45,
        },
        WarheadData {
            warhead: Warhead::ArmorPiercing,
            damage_multiplier: 1.5,
            blast_radius: 0.0,
            weight: 0.30,
        },
        WarheadData {
            warhead: Warhead::HighExplosive,
            damage_multiplier: 1.0,
            blast_radius: 60.0,
            weight: 0.21,
        },
        WarheadData {
            warhead: Warhead::Nuclear,
            damage_multiplier: 5.0,
            blast_radius: 200.0,
            weight: 0.04,
        },
    ]
}
