use thiserror::Error;

use crate::core::types::{CellCoord, UnitId};
use crate::units::unit::UnitStatus;

#[derive(Error, Debug)]
pub enum WarError {
    #[error("Lookup miss: {0}")]
    LookupMiss(String),

    #[error("Cell out of bounds: {0:?}")]
    CellOutOfBounds(CellCoord),

    #[error("Cell {0:?} is occupied")]
    CellOccupied(CellCoord),

    #[error("Cell {0:?} is not a movement destination")]
    Unreachable(CellCoord),

    #[error("Unit not found: {0:?}")]
    UnitNotFound(UnitId),

    #[error("Unit {unit:?} cannot {action} while {status:?}")]
    InvalidStateTransition {
        unit: UnitId,
        status: UnitStatus,
        action: &'static str,
    },

    /// A state transition that needs a selected unit when there is none
    #[error("Cannot {action}: no unit is selected")]
    NoSelection { action: &'static str },

    #[error("Unit {0:?} does not belong to the active platoon")]
    NotYourTurn(UnitId),

    #[error("Not enough action points: needed {needed}, remaining {remaining}")]
    InsufficientActionPoints { needed: u32, remaining: u32 },

    #[error("Invalid target: {0:?}")]
    InvalidTarget(UnitId),

    #[error("Structure invariant violated: {0}")]
    StructureInvariantViolation(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("TOML error: {0}")]
    Toml(#[from] toml::de::Error),
}

pub type Result<T> = std::result::Result<T, WarError>;
