//! Fleet identifiers and deployment sides.

use std::fmt;

use glam::Vec2;
use serde::{Deserialize, Serialize};

use crate::math::Arena;

/// The two opposing fleets.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum FleetId {
    /// Deploys on the western half of the arena.
    Fleet1,
    /// Deploys on the eastern half of the arena.
    Fleet2,
}

impl FleetId {
    /// Both fleets, in a stable order.
    pub const ALL: [FleetId; 2] = [FleetId::Fleet1, FleetId::Fleet2];

    /// The opposing fleet.
    #[must_use]
    pub const fn opponent(self) -> Self {
        match self {
            Self::Fleet1 => Self::Fleet2,
            Self::Fleet2 => Self::Fleet1,
        }
    }

    /// Index into per-fleet arrays.
    #[must_use]
    pub const fn index(self) -> usize {
        match self {
            Self::Fleet1 => 0,
            Self::Fleet2 => 1,
        }
    }

    /// Short name for logs.
    #[must_use]
    pub const fn short_name(self) -> &'static str {
        match self {
            Self::Fleet1 => "fleet1",
            Self::Fleet2 => "fleet2",
        }
    }

    /// Map unit-square coordinates onto this fleet's half of the arena.
    ///
    /// `u` and `v` are expected in `[0, 1)`.
    #[must_use]
    pub fn deployment_point(self, arena: &Arena, u: f32, v: f32) -> Vec2 {
        let half = arena.width * 0.5;
        let x = match self {
            Self::Fleet1 => u * half,
            Self::Fleet2 => half + u * half,
        };
        Vec2::new(x, v * arena.height)
    }
}

impl fmt::Display for FleetId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.short_name())
    }
}
