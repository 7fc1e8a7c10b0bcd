//! Ship type data structures for data-driven hull definitions.

use serde::{Deserialize, Serialize};

/// Data-driven ship type definition.
///
/// # Example RON
///
/// ```ron
/// ShipTypeData(
///     key: "destroyer",
///     label: "Destroyer",
///     max_health: 500.0,
///     max_speed: 2.2,
///     max_energy: 150.0,
///     max_heat: 150.0,
///     max_delta_v: 1500.0,
///     max_ammo: 100.0,
///     weapon_slots: 2,
/// )
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ShipTypeData {
    /// Unique string identifier, used by `spawn_ship`.
    pub key: String,

    /// Human-readable name for status panels.
    pub label: String,

    /// Hull points.
    pub max_health: f32,

    /// Top speed in world units per tick.
    pub max_speed: f32,

    /// Capacitor size.
    pub max_energy: f32,

    /// Heat the hull tolerates before taking overheat damage.
    pub max_heat: f32,

    /// Maneuvering propellant.
    pub max_delta_v: f32,

    /// Pooled ammunition volume shared by all mounts.
    pub max_ammo: f32,

    /// Number of weapon mounts.
    pub weapon_slots: usize,
}

/// The frigate: the smallest built-in hull.
impl Default for ShipTypeData {
    fn default() -> Self {
        Self {
            key: "frigate".to_string(),
            label: "Frigate".to_string(),
            max_health: 300.0,
            max_speed: 2.8,
            max_energy: 100.0,
            max_heat: 100.0,
            max_delta_v: 1000.0,
            max_ammo: 60.0,
            weapon_slots: 1,
        }
    }
}

/// Built-in hull table.
#[must_use]
pub fn default_ship_types() -> Vec<ShipTypeData> {
    vec![
        ShipTypeData::default(),
        ShipTypeData {
            key: "destroyer".to_string(),
            label: "Destroyer".to_string(),
            max_health: 500.0,
            max_speed: 2.2,
            max_energy: 150.0,
            max_heat: 150.0,
            max_delta_v: 1500.0,
            max_ammo: 100.0,
            weapon_slots: 2,
        },
        ShipTypeData {
            key: "cruiser".to_string(),
            label: "Cruiser".to_string(),
            max_health: 900.0,
            max_speed: 1.6,
            max_energy: 220.0,
            max_heat: 200.0,
            max_delta_v: 2200.0,
            max_ammo: 160.0,
            weapon_slots: 3,
        },
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_hulls_are_ordered_by_size() {
        let types = default_ship_types();
        assert_eq!(types.len(), 3);
        for pair in types.windows(2) {
            assert!(pair[0].weapon_slots < pair[1].weapon_slots);
            assert!(pair[0].max_health < pair[1].max_health);
            assert!(pair[0].max_speed > pair[1].max_speed);
        }
    }
}
