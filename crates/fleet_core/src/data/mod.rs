//! Data structures for weapon, warhead, hull and tuning tables.
//!
//! All structs deserialize from RON. The built-in tables returned by the
//! `default_*` functions are what [`crate::config::SimConfig::default`]
//! ships with.
//!
//! **Note:** This module contains no IO - it only defines data types.
//! Callers read configuration text and hand it to
//! [`crate::config::SimConfig::from_ron_str`].

mod ship_data;
mod tuning;
mod weapon_data;

pub use ship_data::{default_ship_types, ShipTypeData};
pub use tuning::{
    ChargeTuning, CombatTuning, DroneTuning, MissileTuning, OverrideTuning, ResourceTuning,
    SteeringTuning, TuningData,
};
pub use weapon_data::{default_warheads, default_weapons, WarheadData, WeaponData};
