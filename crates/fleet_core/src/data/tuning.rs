//! Tuning constants for steering, resources, combat and guided projectiles.
//!
//! Every group carries `#[serde(default)]`, so a RON file only needs to
//! list the values it changes.

use serde::{Deserialize, Serialize};

/// Flocking and combat-movement parameters.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SteeringTuning {
    /// Largest steering force any single behaviour may produce.
    pub max_force: f32,
    /// Radius within which same-fleet ships align and cohere.
    pub perception_radius: f32,
    /// Radius within which any ship pushes others away.
    pub separation_radius: f32,
    /// Weight on the separation force.
    pub separation_weight: f32,
    /// Weight on the alignment force.
    pub alignment_weight: f32,
    /// Weight on the cohesion force.
    pub cohesion_weight: f32,
    /// Weight on attack and intercept movement.
    pub attack_weight: f32,
    /// Weight on flee movement.
    pub flee_weight: f32,
    /// Largest heading change per tick, in radians.
    pub max_turn_rate: f32,
    /// Velocity change per tick from a full manual input.
    pub manual_thrust: f32,
}

impl Default for SteeringTuning {
    fn default() -> Self {
        Self {
            max_force: 0.05,
            perception_radius: 100.0,
            separation_radius: 20.0,
            separation_weight: 6.0,
            alignment_weight: 3.0,
            cohesion_weight: 3.0,
            attack_weight: 1.5,
            flee_weight: 1.0,
            max_turn_rate: 0.15,
            manual_thrust: 0.15,
        }
    }
}

/// Per-tick resource rates.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ResourceTuning {
    /// Heat shed per tick.
    pub heat_dissipation: f32,
    /// Energy regained per tick.
    pub energy_regen: f32,
    /// Delta-v burned per unit of speed per tick.
    pub delta_v_per_speed: f32,
    /// Speed below which a ship counts as stationary.
    pub stationary_speed: f32,
    /// Hull damage per tick while at maximum heat.
    pub overheat_damage: f32,
    /// Firing is refused when projected heat would exceed this fraction of max heat.
    pub fire_heat_ceiling: f32,
    /// Ticks a detonated charge keeps ships jammed.
    pub jam_duration: f32,
}

impl Default for ResourceTuning {
    fn default() -> Self {
        Self {
            heat_dissipation: 0.5,
            energy_regen: 0.3,
            delta_v_per_speed: 0.02,
            stationary_speed: 0.1,
            overheat_damage: 0.5,
            fire_heat_ceiling: 0.9,
            jam_duration: 180.0,
        }
    }
}

/// Ranges, thresholds and accuracy constants for weapons and collisions.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CombatTuning {
    /// Enemy missiles or drones closer than this trigger intercept.
    pub engagement_radius: f32,
    /// Opposing ships closer than this scrape each other.
    pub contact_radius: f32,
    /// Damage dealt by a ship-to-ship scrape.
    pub contact_damage: f32,
    /// Projectile-to-ship hit distance.
    pub ship_hit_radius: f32,
    /// Projectile-to-drone hit distance.
    pub drone_hit_radius: f32,
    /// Projectile-to-projectile kill distance when a missile is involved.
    pub projectile_kill_radius: f32,
    /// Projectiles this far outside the arena are removed.
    pub bounds_margin: f32,
    /// Laser damage floor as a fraction of base damage.
    pub laser_min_falloff: f32,
    /// Displaced laser aim still hits within this distance.
    pub laser_hit_tolerance: f32,
    /// Share of scaled blast damage applied to bystander ships.
    pub blast_ship_share: f32,
    /// Share of scaled blast damage applied to bystander drones.
    pub blast_drone_share: f32,
    /// Distance from the hull at which drone bays release drones.
    pub drone_launch_offset: f32,
    /// Most live drones a single ship may own.
    pub max_drones_per_ship: usize,
    /// Lead distance, in ticks of own velocity, for manual fire with no target.
    pub manual_aim_lead: f32,
}

impl Default for CombatTuning {
    fn default() -> Self {
        Self {
            engagement_radius: 100.0,
            contact_radius: 15.0,
            contact_damage: 1.0,
            ship_hit_radius: 10.0,
            drone_hit_radius: 6.0,
            projectile_kill_radius: 10.0,
            bounds_margin: 10.0,
            laser_min_falloff: 0.3,
            laser_hit_tolerance: 12.0,
            blast_ship_share: 0.7,
            blast_drone_share: 0.5,
            drone_launch_offset: 30.0,
            max_drones_per_ship: 3,
            manual_aim_lead: 10.0,
        }
    }
}

/// Accuracy penalties applied under fire-control override.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct OverrideTuning {
    /// Base miss chance for lasers.
    pub base_miss_chance: f32,
    /// Miss chance added per unit of distance/range.
    pub miss_chance_per_range: f32,
    /// Cap on the distance-based miss chance.
    pub max_extra_miss_chance: f32,
    /// Floor on the total miss chance.
    pub min_miss_chance: f32,
    /// Constant part of the laser aim displacement.
    pub miss_offset_base: f32,
    /// Displacement added per unit of distance.
    pub miss_offset_per_distance: f32,
    /// Base angular spread for projectiles, radians.
    pub base_spread: f32,
    /// Spread added per unit of distance/range.
    pub spread_per_range: f32,
    /// Cap on the distance-based spread.
    pub max_extra_spread: f32,
}

impl Default for OverrideTuning {
    fn default() -> Self {
        Self {
            base_miss_chance: 0.35,
            miss_chance_per_range: 0.25,
            max_extra_miss_chance: 0.5,
            min_miss_chance: 0.25,
            miss_offset_base: 10.0,
            miss_offset_per_distance: 0.15,
            base_spread: 0.18,
            spread_per_range: 0.12,
            max_extra_spread: 0.6,
        }
    }
}

/// Seeking missile flight model.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MissileTuning {
    /// Propellant at launch.
    pub propellant: f32,
    /// Propellant burned per unit of acceleration.
    pub burn_rate: f32,
    /// Structural hit points.
    pub health: f32,
    /// Proportional navigation gain.
    pub navigation_gain: f32,
    /// Acceleration limit.
    pub max_accel: f32,
    /// Constant thrust along the line of sight.
    pub chase_accel: f32,
}

impl Default for MissileTuning {
    fn default() -> Self {
        Self {
            propellant: 200.0,
            burn_rate: 4.0,
            health: 2.0,
            navigation_gain: 4.0,
            max_accel: 0.25,
            chase_accel: 0.05,
        }
    }
}

/// Area charge flight model.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ChargeTuning {
    /// Ticks before the charge detonates on its own.
    pub lifespan: f32,
    /// Detonates this close to the target or aim point.
    pub proximity_radius: f32,
    /// Ships within this radius of the burst are jammed.
    pub effect_radius: f32,
}

impl Default for ChargeTuning {
    fn default() -> Self {
        Self {
            lifespan: 150.0,
            proximity_radius: 25.0,
            effect_radius: 120.0,
        }
    }
}

/// Drone flight model and behaviour.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DroneTuning {
    /// Structural hit points.
    pub health: f32,
    /// Propellant at launch.
    pub propellant: f32,
    /// Propellant burned per unit of acceleration.
    pub burn_rate: f32,
    /// Fraction of propellant below which the drone heads home.
    pub return_threshold: f32,
    /// Top speed.
    pub max_speed: f32,
    /// Acceleration limit.
    pub max_accel: f32,
    /// Largest heading change per tick, in radians.
    pub max_turn_rate: f32,
    /// Enemy ships further than this are ignored.
    pub sensor_radius: f32,
    /// Ticks of target velocity to lead by when attacking.
    pub lead_factor: f32,
    /// Distance at which contact damage is dealt.
    pub contact_range: f32,
    /// Damage per contact.
    pub contact_damage: f32,
    /// Ticks between contacts.
    pub contact_cooldown: f32,
    /// Distance from the owner of the formation slot.
    pub formation_radius: f32,
    /// Formation rotation per tick, in radians.
    pub formation_spin: f32,
    /// Gain pulling the drone onto its formation slot.
    pub formation_gain: f32,
    /// Docking distance.
    pub dock_radius: f32,
    /// Ammunition returned to the owner on docking.
    pub resupply_ammo: f32,
    /// Sibling drones closer than this push apart.
    pub repulsion_radius: f32,
    /// Strength of sibling repulsion.
    pub repulsion_strength: f32,
}

impl Default for DroneTuning {
    fn default() -> Self {
        Self {
            health: 6.0,
            propellant: 300.0,
            burn_rate: 1.0,
            return_threshold: 0.5,
            max_speed: 3.5,
            max_accel: 0.15,
            max_turn_rate: 0.2,
            sensor_radius: 250.0,
            lead_factor: 10.0,
            contact_range: 12.0,
            contact_damage: 0.3,
            contact_cooldown: 10.0,
            formation_radius: 30.0,
            formation_spin: 0.02,
            formation_gain: 0.05,
            dock_radius: 12.0,
            resupply_ammo: 10.0,
            repulsion_radius: 15.0,
            repulsion_strength: 0.05,
        }
    }
}

/// All tuning groups.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct TuningData {
    /// Flocking and movement.
    pub steering: SteeringTuning,
    /// Resource rates.
    pub resources: ResourceTuning,
    /// Weapon and collision constants.
    pub combat: CombatTuning,
    /// Override accuracy model.
    pub overrides: OverrideTuning,
    /// Missile flight.
    pub missile: MissileTuning,
    /// Area charge flight.
    pub charge: ChargeTuning,
    /// Drone flight and behaviour.
    pub drone: DroneTuning,
}
