//! Grid cells

use serde::{Deserialize, Serialize};

use crate::core::types::{CellCoord, StructureId, UnitId};

/// A pending "move here" confirmation left on a reachable cell.
/// Firing it asks the game to move `unit` onto the cell.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct MoveIntent {
    pub unit: UnitId,
}

/// One square of the board
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Cell {
    pub coord: CellCoord,
    /// Highlighted as a movement destination for the current selection
    pub visible: bool,
    pub occupant: Option<UnitId>,
    /// Covering structure (the highest one if floors overlap)
    pub structure: Option<StructureId>,
    /// Altitude of `structure`, 0 when uncovered
    pub structure_altitude: u32,
    /// Cost of stepping onto this cell; rewritten per reachable-set computation
    pub action_penalty: u32,
    callbacks: Vec<MoveIntent>,
    #[serde(skip)]
    pub hovered: bool,
}

impl Cell {
    pub fn new(coord: CellCoord) -> Self {
        Self {
            coord,
            visible: false,
            occupant: None,
            structure: None,
            structure_altitude: 0,
            action_penalty: 0,
            callbacks: Vec::new(),
            hovered: false,
        }
    }

    pub fn add_callback(&mut self, intent: MoveIntent) {
        self.callbacks.push(intent);
    }

    pub fn callbacks(&self) -> &[MoveIntent] {
        &self.callbacks
    }

    /// Forget this selection cycle's highlight
    pub fn clear(&mut self) {
        self.visible = false;
        self.hovered = false;
        self.callbacks.clear();
    }
}
