//! Ships: hull, weapons, resources and per-tick integration.

use glam::Vec2;
use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::components::{
    BehaviorState, JamStatus, ProjectileId, ShipId, TargetRef, WeaponKind, WeaponMount,
};
use crate::config::SimConfig;
use crate::data::{ShipTypeData, TuningData};
use crate::fleets::FleetId;
use crate::math::{clamp_turn, VecExt};
use crate::resources::ShipResources;

/// Parameters for spawning a new ship.
///
/// Only `position`, `fleet` and `type_key` are required. A missing loadout
/// is rolled at random per slot and a missing velocity is a random drift in
/// `[-1, 1]` on each axis.
#[derive(Debug, Clone, PartialEq)]
pub struct ShipSpawnParams {
    /// Spawn position.
    pub position: Vec2,
    /// Owning fleet.
    pub fleet: FleetId,
    /// Hull key into the ship type table.
    pub type_key: String,
    /// Explicit weapon loadout, truncated to the hull's slot count.
    pub loadout: Option<Vec<WeaponKind>>,
    /// Explicit initial velocity.
    pub velocity: Option<Vec2>,
}

impl ShipSpawnParams {
    /// Spawn parameters with a random loadout and drift.
    #[must_use]
    pub fn new(position: Vec2, fleet: FleetId, type_key: impl Into<String>) -> Self {
        Self {
            position,
            fleet,
            type_key: type_key.into(),
            loadout: None,
            velocity: None,
        }
    }

    /// Use a fixed weapon loadout.
    #[must_use]
    pub fn with_loadout(mut self, loadout: impl Into<Vec<WeaponKind>>) -> Self {
        self.loadout = Some(loadout.into());
        self
    }

    /// Use a fixed initial velocity.
    #[must_use]
    pub fn with_velocity(mut self, velocity: Vec2) -> Self {
        self.velocity = Some(velocity);
        self
    }
}

/// A combat ship.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Ship {
    /// Unique identifier.
    pub id: ShipId,
    /// Owning fleet.
    pub fleet: FleetId,
    /// Hull the ship was built from.
    pub hull: ShipTypeData,
    /// World position.
    pub position: Vec2,
    /// Velocity in world units per tick.
    pub velocity: Vec2,
    /// Steering forces accumulated this tick.
    pub acceleration: Vec2,
    /// Current hull points.
    pub health: f32,
    /// Energy, heat, delta-v and ammunition.
    pub resources: ShipResources,
    /// Weapon hardpoints, in firing priority order.
    pub mounts: Vec<WeaponMount>,
    /// Combat state chosen by the AI this tick.
    pub state: BehaviorState,
    /// Electronic-warfare status.
    pub jam: JamStatus,
    /// Live drones launched by this ship.
    pub drones: Vec<ProjectileId>,
    /// Target chosen by the player or by anti-ship auto-engagement.
    pub manual_target: Option<TargetRef>,
    /// Last hit-scan target, kept for renderers.
    pub beam_target: Option<TargetRef>,
}

impl Ship {
    /// Build a ship from spawn parameters and a resolved hull.
    ///
    /// Missile mounts get a warhead rolled from the configured distribution.
    pub fn build<R: Rng>(
        id: ShipId,
        params: &ShipSpawnParams,
        hull: &ShipTypeData,
        config: &SimConfig,
        rng: &mut R,
    ) -> Self {
        let kinds: Vec<WeaponKind> = match &params.loadout {
            Some(loadout) => loadout.iter().copied().take(hull.weapon_slots).collect(),
            None => (0..hull.weapon_slots)
                .map(|_| WeaponKind::ALL[rng.random_range(0..WeaponKind::ALL.len())])
                .collect(),
        };
        let mounts = kinds
            .into_iter()
            .map(|kind| {
                let warhead = (kind == WeaponKind::Missile)
                    .then(|| config.warhead_for_roll(rng.random::<f32>()));
                WeaponMount::new(kind, warhead)
            })
            .collect();
        let velocity = params.velocity.unwrap_or_else(|| {
            Vec2::new(
                rng.random_range(-1.0..=1.0),
                rng.random_range(-1.0..=1.0),
            )
        });

        Self {
            id,
            fleet: params.fleet,
            hull: hull.clone(),
            position: params.position,
            velocity,
            acceleration: Vec2::ZERO,
            health: hull.max_health,
            resources: ShipResources::full(hull),
            mounts,
            state: BehaviorState::Patrol,
            jam: JamStatus::default(),
            drones: Vec::new(),
            manual_target: None,
            beam_target: None,
        }
    }

    /// Whether the ship still has hull points.
    #[must_use]
    pub fn is_alive(&self) -> bool {
        self.health > 0.0
    }

    /// Current speed.
    #[must_use]
    pub fn speed(&self) -> f32 {
        self.velocity.length()
    }

    /// Weapon in the first mount, which drives attack ranges.
    #[must_use]
    pub fn primary_weapon(&self) -> Option<WeaponKind> {
        self.mounts.first().map(|m| m.kind)
    }

    /// Accumulate a steering force for this tick.
    pub fn apply_force(&mut self, force: Vec2) {
        self.acceleration += force;
    }

    /// Subtract hull points, never going below zero.
    ///
    /// Returns the damage actually absorbed.
    pub fn apply_damage(&mut self, amount: f32) -> f32 {
        if amount <= 0.0 {
            return 0.0;
        }
        let before = self.health;
        self.health = (self.health - amount).clamp(0.0, self.hull.max_health);
        before - self.health
    }

    /// Advance cooldowns, jamming, resources and motion by `time_scale` ticks.
    ///
    /// Returns the overheat damage taken. Position is not wrapped here.
    pub fn integrate(&mut self, time_scale: f32, tuning: &TuningData) -> f32 {
        for mount in &mut self.mounts {
            mount.cool(time_scale);
        }
        self.jam.decay(time_scale);

        let speed = self.speed();
        let overheat = self
            .resources
            .integrate(&self.hull, speed, time_scale, &tuning.resources);
        let overheat = self.apply_damage(overheat);

        let previous = self.velocity;
        if self.resources.can_maneuver() {
            self.velocity += self.acceleration * time_scale;
        }
        self.velocity = self.velocity.limit(self.hull.max_speed);
        self.velocity = clamp_turn(
            previous,
            self.velocity,
            tuning.steering.max_turn_rate * time_scale,
        );
        self.position += self.velocity * time_scale;
        self.acceleration = Vec2::ZERO;

        overheat
    }
}
