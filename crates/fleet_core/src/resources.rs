//! Per-ship resource bookkeeping: energy, heat, delta-v and ammunition.
//!
//! Resources regenerate or decay once per tick in [`ShipResources::integrate`]
//! and are spent by the weapon controller through [`ShipResources::check_fire`]
//! and [`ShipResources::spend`]. Every mutation ends with a clamp, so callers
//! can rely on `0 <= value <= max` at all times.

use serde::{Deserialize, Serialize};

use crate::data::{ResourceTuning, ShipTypeData, WeaponData};

/// Why a weapon was not allowed to fire for resource reasons.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ResourceRefusal {
    /// Not enough energy for the shot.
    InsufficientEnergy,
    /// The shot would push heat past the fire ceiling.
    Overheated,
    /// The ship is jammed and the weapon is not exempt.
    Jammed,
    /// Not enough ammunition volume for the shot.
    InsufficientAmmo,
}

/// Current resource levels of one ship.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ShipResources {
    /// Capacitor charge.
    pub energy: f32,
    /// Accumulated heat.
    pub heat: f32,
    /// Remaining maneuvering propellant.
    pub delta_v: f32,
    /// Remaining pooled ammunition volume.
    pub ammo: f32,
}

impl ShipResources {
    /// Fresh resources for a newly built hull: full tanks, cold.
    #[must_use]
    pub fn full(hull: &ShipTypeData) -> Self {
        Self {
            energy: hull.max_energy,
            heat: 0.0,
            delta_v: hull.max_delta_v,
            ammo: hull.max_ammo,
        }
    }

    /// Advance passive resource changes by `time_scale` ticks.
    ///
    /// `speed` is the ship's current speed, used for delta-v burn. Returns the
    /// hull damage taken from running at maximum heat.
    pub fn integrate(
        &mut self,
        hull: &ShipTypeData,
        speed: f32,
        time_scale: f32,
        tuning: &ResourceTuning,
    ) -> f32 {
        // Overheat is judged on the heat carried into the tick.
        let overheat = if self.heat >= hull.max_heat {
            tuning.overheat_damage * time_scale
        } else {
            0.0
        };

        self.heat -= tuning.heat_dissipation * time_scale;
        self.energy += tuning.energy_regen * time_scale;
        if speed > tuning.stationary_speed {
            self.delta_v -= tuning.delta_v_per_speed * speed * time_scale;
        }

        self.clamp(hull);
        overheat
    }

    /// Check every resource gate for one shot of `weapon`.
    ///
    /// Gates are checked in a fixed order: jamming, energy, heat, ammunition.
    ///
    /// # Errors
    ///
    /// Returns the first gate that refuses the shot.
    pub fn check_fire(
        &self,
        hull: &ShipTypeData,
        weapon: &WeaponData,
        jammed: bool,
        tuning: &ResourceTuning,
    ) -> Result<(), ResourceRefusal> {
        if jammed && !weapon.kind.ignores_jamming() {
            return Err(ResourceRefusal::Jammed);
        }
        if self.energy < weapon.energy_cost {
            return Err(ResourceRefusal::InsufficientEnergy);
        }
        if self.heat + weapon.heat_gen > hull.max_heat * tuning.fire_heat_ceiling {
            return Err(ResourceRefusal::Overheated);
        }
        if weapon.kind.uses_ammo() && self.ammo < weapon.ammo_cost {
            return Err(ResourceRefusal::InsufficientAmmo);
        }
        Ok(())
    }

    /// Pay for one shot of `weapon`. Does not re-check the gates.
    pub fn spend(&mut self, hull: &ShipTypeData, weapon: &WeaponData) {
        self.energy -= weapon.energy_cost;
        self.heat += weapon.heat_gen;
        if weapon.kind.uses_ammo() {
            self.ammo -= weapon.ammo_cost;
        }
        self.clamp(hull);
    }

    /// Return ammunition to the pool, e.g. from a docking drone.
    pub fn resupply(&mut self, hull: &ShipTypeData, ammo: f32) {
        self.ammo += ammo;
        self.clamp(hull);
    }

    /// Whether the ship still has propellant to maneuver.
    #[must_use]
    pub fn can_maneuver(&self) -> bool {
        self.delta_v > 0.0
    }

    /// Clamp every level into `[0, max]`.
    pub fn clamp(&mut self, hull: &ShipTypeData) {
        self.energy = self.energy.clamp(0.0, hull.max_energy);
        self.heat = self.heat.clamp(0.0, hull.max_heat);
        self.delta_v = self.delta_v.clamp(0.0, hull.max_delta_v);
        self.ammo = self.ammo.clamp(0.0, hull.max_ammo);
    }
}
