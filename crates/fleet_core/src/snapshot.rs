//! Read-only views of the simulation for renderers and status panels.
//!
//! A [`WorldSnapshot`] is a plain, serializable copy of everything an
//! external collaborator needs to draw a frame. It holds no references
//! into the simulation.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use crate::ai::ControlState;
use crate::components::{
    BehaviorState, JamStatus, ProjectileId, ShipId, TargetRef, WeaponKind, WeaponMount,
};
use crate::fleets::FleetId;
use crate::math::Arena;
use crate::projectile::{Projectile, ProjectileKind};
use crate::resources::ShipResources;
use crate::ship::Ship;

/// One ship as seen from outside.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ShipSnapshot {
    /// Ship id.
    pub id: ShipId,
    /// Owning fleet.
    pub fleet: FleetId,
    /// Hull key.
    pub type_key: String,
    /// Hull display name.
    pub label: String,
    /// Position.
    pub position: Vec2,
    /// Velocity.
    pub velocity: Vec2,
    /// Hull points.
    pub health: f32,
    /// Maximum hull points.
    pub max_health: f32,
    /// Resource levels.
    pub resources: ShipResources,
    /// Resource maxima, in the same layout as `resources`.
    pub resource_limits: ShipResources,
    /// Behaviour state.
    pub state: BehaviorState,
    /// Jamming status.
    pub jam: JamStatus,
    /// Weapon mounts with cooldowns and warheads.
    pub mounts: Vec<WeaponMount>,
    /// Live drones.
    pub drones: Vec<ProjectileId>,
    /// Manual target, if any.
    pub manual_target: Option<TargetRef>,
    /// Last laser target, for beam rendering.
    pub beam_target: Option<TargetRef>,
    /// Control flags.
    pub control: ControlState,
}

impl ShipSnapshot {
    /// Capture `ship` with its control flags.
    #[must_use]
    pub fn capture(ship: &Ship, control: ControlState) -> Self {
        Self {
            id: ship.id,
            fleet: ship.fleet,
            type_key: ship.hull.key.clone(),
            label: ship.hull.label.clone(),
            position: ship.position,
            velocity: ship.velocity,
            health: ship.health,
            max_health: ship.hull.max_health,
            resources: ship.resources,
            resource_limits: ShipResources {
                energy: ship.hull.max_energy,
                heat: ship.hull.max_heat,
                delta_v: ship.hull.max_delta_v,
                ammo: ship.hull.max_ammo,
            },
            state: ship.state,
            jam: ship.jam,
            mounts: ship.mounts.clone(),
            drones: ship.drones.clone(),
            manual_target: ship.manual_target,
            beam_target: ship.beam_target,
            control,
        }
    }
}

/// One projectile or drone as seen from outside.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProjectileSnapshot {
    /// Projectile id.
    pub id: ProjectileId,
    /// Firing fleet.
    pub fleet: FleetId,
    /// Position.
    pub position: Vec2,
    /// Velocity.
    pub velocity: Vec2,
    /// Weapon that fired it.
    pub weapon: WeaponKind,
    /// Kind-specific state.
    pub kind: ProjectileKind,
}

impl From<&Projectile> for ProjectileSnapshot {
    fn from(p: &Projectile) -> Self {
        Self {
            id: p.id,
            fleet: p.fleet,
            position: p.position,
            velocity: p.velocity,
            weapon: p.weapon,
            kind: p.kind,
        }
    }
}

/// Everything visible at the end of a tick.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WorldSnapshot {
    /// Tick number.
    pub tick: u64,
    /// Arena dimensions.
    pub arena: Arena,
    /// Ships in id order.
    pub ships: Vec<ShipSnapshot>,
    /// Projectiles in id order.
    pub projectiles: Vec<ProjectileSnapshot>,
    /// Ticks until each fleet's next respawn, indexed by [`FleetId::index`].
    pub respawn_timers: [f32; 2],
}

impl WorldSnapshot {
    /// Look up a ship by id.
    #[must_use]
    pub fn ship(&self, id: ShipId) -> Option<&ShipSnapshot> {
        self.ships.iter().find(|s| s.id == id)
    }

    /// Ships belonging to `fleet`.
    pub fn fleet(&self, fleet: FleetId) -> impl Iterator<Item = &ShipSnapshot> {
        self.ships.iter().filter(move |s| s.fleet == fleet)
    }
}
