//! # Fleet Core
//!
//! Deterministic fleet combat simulation core.
//!
//! This crate contains **only** simulation logic:
//! - No rendering
//! - No IO
//! - No system randomness (a seeded PCG generator lives in the world)
//!
//! Two fleets fight across a toroidal arena. Ships flock, pick a combat
//! state every tick, and fire resource-gated weapons: lasers, rounds,
//! seeking missiles, jamming area charges and escort drones. Destroyed
//! ships respawn on their fleet's half of the arena.
//!
//! ## Crate Structure
//!
//! - [`simulation`] - Core simulation loop and external commands
//! - [`world`] - Entity storage, spawn buffering and target lookup
//! - [`ai`] - Combat state machine and manual control
//! - [`weapons`] - Firing gates and weapon dispatch
//! - [`guidance`] - Missile, charge and drone flight
//! - [`damage`] - Collisions, warheads and removal
//! - [`steering`] - Flocking behaviours
//! - [`resources`] - Energy, heat, delta-v and ammunition
//! - [`config`] / [`data`] - RON-loadable tables and tuning
//! - [`math`] - Toroidal arena geometry

#![forbid(unsafe_code)]
#![warn(missing_docs)]
#![warn(clippy::all, clippy::pedantic)]

pub mod ai;
pub mod components;
pub mod config;
pub mod damage;
pub mod data;
pub mod error;
pub mod fleets;
pub mod guidance;
pub mod math;
pub mod projectile;
pub mod resources;
pub mod ship;
pub mod simulation;
pub mod snapshot;
pub mod steering;
pub mod weapons;
pub mod world;

/// Re-export commonly used types
pub mod prelude {
    pub use crate::ai::{AutoEngagement, ControlMode, ControlState, EngagementToggles, ManualInput};
    pub use crate::components::*;
    pub use crate::config::SimConfig;
    pub use crate::damage::{DamageCause, DamageEvent, DamageTarget, DestroyedShip};
    pub use crate::data::{ShipTypeData, TuningData, WarheadData, WeaponData};
    pub use crate::error::{GameError, Result};
    pub use crate::fleets::FleetId;
    pub use crate::math::Arena;
    pub use crate::projectile::{Projectile, ProjectileKind};
    pub use crate::resources::{ResourceRefusal, ShipResources};
    pub use crate::ship::{Ship, ShipSpawnParams};
    pub use crate::simulation::{Detonation, Dock, Simulation, TickEvents};
    pub use crate::snapshot::{ProjectileSnapshot, ShipSnapshot, WorldSnapshot};
    pub use crate::weapons::FireOutcome;
}
