//! Static simulation configuration.
//!
//! A [`SimConfig`] bundles the arena, the data tables and the tuning
//! constants. It is built once at startup, either from
//! [`SimConfig::default`] or from RON text, and never changes while the
//! simulation runs.

use serde::{Deserialize, Serialize};

use crate::components::{Warhead, WeaponKind};
use crate::data::{
    default_ship_types, default_warheads, default_weapons, ShipTypeData, TuningData, WarheadData,
    WeaponData,
};
use crate::error::{GameError, Result};
use crate::math::Arena;

/// Upper bound on weapon mounts per hull.
pub const MAX_WEAPON_SLOTS: usize = 8;

/// Complete configuration for one simulation.
///
/// # Example RON
///
/// ```ron
/// SimConfig(
///     arena: Arena(width: 2000.0, height: 1200.0),
///     seed: 7,
///     fleet_strength: 40,
///     tuning: TuningData(
///         resources: ResourceTuning(energy_regen: 0.5),
///     ),
/// )
/// ```
///
/// Omitted fields keep their built-in values.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SimConfig {
    /// World dimensions.
    pub arena: Arena,
    /// Seed for the simulation RNG.
    pub seed: u64,
    /// Ships each fleet deploys with and respawns back up to.
    pub fleet_strength: usize,
    /// Ticks between respawns while a fleet is under strength.
    pub respawn_time: f32,
    /// Hull used when `spawn_ship` is given an unknown key.
    pub default_ship_type: String,
    /// Hull table.
    pub ship_types: Vec<ShipTypeData>,
    /// Weapon table. Must contain every [`WeaponKind`].
    pub weapons: Vec<WeaponData>,
    /// Warhead table. Must contain every [`Warhead`].
    pub warheads: Vec<WarheadData>,
    /// Tuning constants.
    pub tuning: TuningData,
}

impl Default for SimConfig {
    fn default() -> Self {
        Self {
            arena: Arena::default(),
            seed: 0x5eed,
            fleet_strength: 250,
            respawn_time: 30.0,
            default_ship_type: "frigate".to_string(),
            ship_types: default_ship_types(),
            weapons: default_weapons(),
            warheads: default_warheads(),
            tuning: TuningData::default(),
        }
    }
}

impl SimConfig {
    /// Parse and validate a configuration from RON text.
    ///
    /// # Errors
    ///
    /// Returns [`GameError::ConfigParse`] for malformed text and
    /// [`GameError::InvalidConfig`] when validation fails.
    pub fn from_ron_str(text: &str) -> Result<Self> {
        let config: Self = ron::from_str(text)?;
        config.validate()?;
        Ok(config)
    }

    /// Check that every table is complete and every value usable.
    ///
    /// # Errors
    ///
    /// Returns [`GameError::InvalidConfig`] describing the first problem found.
    pub fn validate(&self) -> Result<()> {
        if !(self.arena.width > 0.0 && self.arena.height > 0.0) {
            return Err(invalid(format!(
                "arena must have positive size, got {}x{}",
                self.arena.width, self.arena.height
            )));
        }
        if self.ship_types.is_empty() {
            return Err(invalid("ship type table is empty"));
        }
        for ship in &self.ship_types {
            if ship.weapon_slots == 0 || ship.weapon_slots > MAX_WEAPON_SLOTS {
                return Err(invalid(format!(
                    "ship type '{}' has {} weapon slots (allowed 1..={MAX_WEAPON_SLOTS})",
                    ship.key, ship.weapon_slots
                )));
            }
            let maxima = [
                ship.max_health,
                ship.max_speed,
                ship.max_energy,
                ship.max_heat,
                ship.max_delta_v,
                ship.max_ammo,
            ];
            if maxima.iter().any(|v| !(*v > 0.0)) {
                return Err(invalid(format!(
                    "ship type '{}' has a non-positive maximum",
                    ship.key
                )));
            }
        }
        if self.ship_type(&self.default_ship_type).is_none() {
            return Err(invalid(format!(
                "default ship type '{}' is not in the ship table",
                self.default_ship_type
            )));
        }
        for kind in WeaponKind::ALL {
            let Some(weapon) = self.weapon(kind) else {
                return Err(invalid(format!("weapon table is missing {kind}")));
            };
            if weapon.range <= 0.0 || weapon.cooldown < 0.0 {
                return Err(invalid(format!("weapon {kind} has invalid range or cooldown")));
            }
            if !kind.is_hit_scan() && weapon.speed.map_or(true, |s| s <= 0.0) {
                return Err(invalid(format!("weapon {kind} needs a positive launch speed")));
            }
        }
        for warhead in Warhead::ALL {
            if self.warhead(warhead).is_none() {
                return Err(invalid(format!("warhead table is missing {warhead:?}")));
            }
        }
        if self.warheads.iter().map(|w| w.weight).sum::<f32>() <= 0.0 {
            return Err(invalid("warhead weights must sum to a positive value"));
        }
        Ok(())
    }

    /// Look up a hull by key.
    #[must_use]
    pub fn ship_type(&self, key: &str) -> Option<&ShipTypeData> {
        self.ship_types.iter().find(|t| t.key == key)
    }

    /// Look up a weapon's static properties.
    #[must_use]
    pub fn weapon(&self, kind: WeaponKind) -> Option<&WeaponData> {
        self.weapons.iter().find(|w| w.kind == kind)
    }

    /// Look up a warhead's damage profile.
    #[must_use]
    pub fn warhead(&self, warhead: Warhead) -> Option<&WarheadData> {
        self.warheads.iter().find(|w| w.warhead == warhead)
    }

    /// Pick a warhead given a uniform roll in `[0, 1)`.
    #[must_use]
    pub fn warhead_for_roll(&self, roll: f32) -> Warhead {
        let total: f32 = self.warheads.iter().map(|w| w.weight).sum();
        let mut threshold = roll * total;
        for entry in &self.warheads {
            if threshold < entry.weight {
                return entry.warhead;
            }
            threshold -= entry.weight;
        }
        self.warheads
            .last()
            .map_or(Warhead::Kinetic, |entry| entry.warhead)
    }
}

fn invalid(message: impl Into<String>) -> GameError {
    GameError::InvalidConfig(message.into())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_is_valid() {
        assert!(SimConfig::default().validate().is_ok());
    }

    #[test]
    fn test_partial_ron_keeps_defaults() {
        let config = SimConfig::from_ron_str(
            "(arena: (width: 800.0, height: 600.0), seed: 3, \
             tuning: (resources: (energy_regen: 1.25)))",
        )
        .unwrap();
        assert_eq!(config.arena, Arena::new(800.0, 600.0));
        assert_eq!(config.seed, 3);
        assert_eq!(config.tuning.resources.energy_regen, 1.25);
        assert_eq!(config.tuning.resources.heat_dissipation, 0.5);
        assert_eq!(config.ship_types.len(), 3);
    }

    #[test]
    fn test_malformed_ron_is_a_parse_error() {
        let err = SimConfig::from_ron_str("(arena: (width: ").unwrap_err();
        assert!(matches!(err, GameError::ConfigParse(_)));
    }

    #[test]
    fn test_validation_rejects_bad_tables() {
        let mut config = SimConfig::default();
        config.arena.width = 0.0;
        assert!(matches!(config.validate(), Err(GameError::InvalidConfig(_))));

        let mut config = SimConfig::default();
        config.ship_types[0].weapon_slots = 0;
        assert!(config.validate().is_err());

        let mut config = SimConfig::default();
        config.weapons.retain(|w| w.kind != WeaponKind::Missile);
        let err = config.validate().unwrap_err();
        assert!(err.to_string().contains("missile"));

        let mut config = SimConfig::default();
        config.default_ship_type = "battleship".to_string();
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_warhead_roll_follows_weights() {
        let config = SimConfig::default();
        assert_eq!(config.warhead_for_roll(0.0), Warhead::Kinetic);
        assert_eq!(config.warhead_for_roll(0.44), Warhead::Kinetic);
        assert_eq!(config.warhead_for_roll(0.5), Warhead::ArmorPiercing);
        assert_eq!(config.warhead_for_roll(0.8), Warhead::HighExplosive);
        assert_eq!(config.warhead_for_roll(0.97), Warhead::Nuclear);
        assert_eq!(config.warhead_for_roll(0.9999), Warhead::Nuclear);
    }
}
