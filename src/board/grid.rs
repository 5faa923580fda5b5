//! The board: a dense lattice of cells, registered structures and
//! named overlay layers

use ahash::AHashMap;
use glam::Vec2;

use crate::board::cell::{Cell, MoveIntent};
use crate::board::overlay::{OverlayItem, OverlayLayer, OVERLAY_LAYER};
use crate::board::structure::{Observer, Structure};
use crate::core::config::GameConfig;
use crate::core::error::Result;
use crate::core::types::{CellCoord, IdGenerator, OverlayId, StructureId, UnitId};

/// A destination produced by a reachability scan
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ReachableCell {
    pub coord: CellCoord,
    pub penalty: u32,
}

#[derive(Debug, Clone)]
pub struct Board {
    width: u32,
    height: u32,
    cell_scale: f32,
    /// Row-major, `width * height` entries
    cells: Vec<Cell>,
    /// Flattened: every registered structure followed by its nested floors
    structures: Vec<Structure>,
    layers: AHashMap<String, OverlayLayer>,
    ids: IdGenerator,
}

impl Board {
    pub fn new(width: u32, height: u32, cell_scale: f32, id_seed: u64) -> Self {
        let mut layers = AHashMap::new();
        layers.insert(OVERLAY_LAYER.to_string(), OverlayLayer::new());

        let mut board = Self {
            width,
            height,
            cell_scale,
            cells: Vec::new(),
            structures: Vec::new(),
            layers,
            ids: IdGenerator::new(id_seed),
        };
        board.build_grid_cells();
        board
    }

    pub fn from_config(config: &GameConfig) -> Self {
        Self::new(
            config.grid_width,
            config.grid_height,
            config.cell_scale,
            config.seed,
        )
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn cell_scale(&self) -> f32 {
        self.cell_scale
    }

    /// Change the cell-to-world scale, e.g. after the container resized
    pub fn set_cell_scale(&mut self, scale: f32) {
        if scale > 0.0 {
            self.cell_scale = scale;
        } else {
            tracing::warn!("Ignoring non-positive cell scale {}", scale);
        }
    }

    pub fn in_bounds(&self, coord: CellCoord) -> bool {
        coord.x >= 0 && coord.y >= 0 && (coord.x as u32) < self.width && (coord.y as u32) < self.height
    }

    fn index(&self, coord: CellCoord) -> Option<usize> {
        if self.in_bounds(coord) {
            Some(coord.y as usize * self.width as usize + coord.x as usize)
        } else {
            None
        }
    }

    pub fn cell(&self, coord: CellCoord) -> Option<&Cell> {
        self.index(coord).and_then(|i| self.cells.get(i))
    }

    pub fn cell_mut(&mut self, coord: CellCoord) -> Option<&mut Cell> {
        let index = self.index(coord)?;
        self.cells.get_mut(index)
    }

    pub fn cells(&self) -> &[Cell] {
        &self.cells
    }

    pub fn cells_mut(&mut self) -> &mut [Cell] {
        &mut self.cells
    }

    /// Cell under a world-space point
    pub fn cell_at_point(&self, point: Vec2) -> Option<&Cell> {
        let coord = CellCoord::new(
            (point.x / self.cell_scale).floor() as i32,
            (point.y / self.cell_scale).floor() as i32,
        );
        self.cell(coord)
    }

    /// Currently highlighted movement destinations
    pub fn reachable_cells(&self) -> impl Iterator<Item = &Cell> {
        self.cells.iter().filter(|c| c.visible)
    }

    // === STRUCTURES ===

    /// Register a structure tree. Every nested floor is flattened into the
    /// structure list and the cells are rebuilt, dropping occupancy.
    pub fn register_structure(&mut self, structure: Structure) -> Result<()> {
        structure.validate()?;

        let floors: Vec<Structure> = structure.all_substructures().into_iter().cloned().collect();
        tracing::debug!(
            "Registering structure {:?} at altitude {} with {} floors",
            structure.footprint,
            structure.altitude,
            floors.len()
        );
        self.structures.push(structure);
        self.structures.extend(floors);

        self.build_grid_cells();
        Ok(())
    }

    pub fn structures(&self) -> &[Structure] {
        &self.structures
    }

    pub fn structures_mut(&mut self) -> &mut [Structure] {
        &mut self.structures
    }

    pub fn structure(&self, id: StructureId) -> Option<&Structure> {
        self.structures.iter().find(|s| s.id == id)
    }

    /// Highest structure covering a cell; the earliest registered wins ties
    pub fn covering_structure(&self, coord: CellCoord) -> Option<&Structure> {
        let mut best: Option<&Structure> = None;
        for structure in self.structures.iter().filter(|s| s.collides_on_grid(coord)) {
            match best {
                Some(current) if current.altitude >= structure.altitude => {}
                _ => best = Some(structure),
            }
        }
        best
    }

    /// Re-create every cell from the structure list
    pub fn build_grid_cells(&mut self) {
        let mut cells = Vec::with_capacity(self.width as usize * self.height as usize);
        for y in 0..self.height as i32 {
            for x in 0..self.width as i32 {
                let coord = CellCoord::new(x, y);
                let mut cell = Cell::new(coord);
                if let Some(structure) = self.covering_structure(coord) {
                    cell.structure = Some(structure.id);
                    cell.structure_altitude = structure.altitude;
                    cell.action_penalty = 1;
                }
                cells.push(cell);
            }
        }
        self.cells = cells;
    }

    /// Is the sightline between `target` and `actor` blocked by any structure?
    pub fn occludes(&self, target: &impl Observer, actor: &impl Observer) -> bool {
        self.structures
            .iter()
            .any(|s| s.blocks_view(target, actor, self.cell_scale))
    }

    // === CELL STATE ===

    /// Hide every highlight and drop every pending move intent
    pub fn clear_cells(&mut self) {
        for cell in &mut self.cells {
            cell.clear();
        }
    }

    /// Highlight reachable cells for `unit`
    pub fn mark_reachable(&mut self, unit: UnitId, reachable: &[ReachableCell]) {
        for entry in reachable {
            if let Some(cell) = self.cell_mut(entry.coord) {
                cell.visible = true;
                cell.action_penalty = entry.penalty;
                cell.add_callback(MoveIntent { unit });
            }
        }
    }

    pub fn place_occupant(&mut self, coord: CellCoord, unit: UnitId) {
        if let Some(cell) = self.cell_mut(coord) {
            cell.occupant = Some(unit);
        }
    }

    /// Clear `coord` if `unit` is the one standing there
    pub fn vacate(&mut self, coord: CellCoord, unit: UnitId) {
        if let Some(cell) = self.cell_mut(coord) {
            if cell.occupant == Some(unit) {
                cell.occupant = None;
            }
        }
    }

    // === OVERLAYS ===

    pub fn add_layer(&mut self, name: &str) {
        self.layers.entry(name.to_string()).or_default();
    }

    pub fn layer(&self, name: &str) -> Option<&OverlayLayer> {
        self.layers.get(name)
    }

    /// Store an overlay item in a named layer. Unknown layers store nothing.
    pub fn register_entity(&mut self, item: OverlayItem, layer: &str) -> Option<OverlayId> {
        let Some(entries) = self.layers.get_mut(layer) else {
            tracing::debug!("No overlay layer named {:?}; item dropped", layer);
            return None;
        };
        let id = self.ids.next_id();
        entries.insert(id, item);
        Some(id)
    }

    /// Remove an overlay item. Absent layers or ids are a no-op.
    pub fn unregister_entity(&mut self, layer: &str, id: OverlayId) -> Option<OverlayItem> {
        self.layers.get_mut(layer)?.remove(id)
    }

    pub fn overlay_count(&self, layer: &str) -> usize {
        self.layers.get(layer).map_or(0, |l| l.len())
    }
}
