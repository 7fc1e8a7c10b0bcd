//! Error types for the fleet simulation.
//!
//! The tick loop itself never fails. Errors only surface at the
//! configuration boundary and from the fallible query helpers.

use thiserror::Error;

use crate::components::ShipId;

/// Result type alias using [`GameError`].
pub type Result<T> = std::result::Result<T, GameError>;

/// Top-level error type for all simulation errors.
#[derive(Debug, Error)]
pub enum GameError {
    /// Configuration text could not be parsed.
    #[error("Failed to parse configuration: {0}")]
    ConfigParse(#[from] ron::error::SpannedError),

    /// Configuration parsed but contains unusable values.
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    /// Ship identifier does not name a live ship.
    #[error("Ship not found: {0}")]
    ShipNotFound(ShipId),
}
