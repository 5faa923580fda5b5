//! Pointer dispatch for the presentation layer
//!
//! Clicks probe visible cells first, then living units, then structures.
//! The first entity that handles the click wins; a cell whose move is
//! rejected (say an enemy stands on it) lets the click fall through to the
//! unit underneath. Rejected actions are logged and otherwise ignored.

use glam::Vec2;

use crate::board::{Clickable, Hitbox, HoverChange, Hoverable, Observer, OverlayItem, OVERLAY_LAYER};
use crate::core::types::{CellCoord, UnitId};
use crate::game::state::{find_unit, find_unit_mut, Game};
use crate::units::constants::MELEE_RANGE;
use crate::units::UnitStatus;

impl Game {
    /// Handle a click at a world-space point. Returns true if anything was hit.
    pub fn hit_test_click(&mut self, point: Vec2) -> bool {
        let scale = self.board.cell_scale();

        let cell_hit = self
            .board
            .cell_at_point(point)
            .filter(|c| c.is_clickable() && c.contains_world_point(point, scale))
            .map(|c| c.coord);
        if let Some(coord) = cell_hit {
            if self.click_cell(coord) {
                return true;
            }
        }

        let unit_hit = self
            .units()
            .find(|u| u.is_clickable() && u.contains_world_point(point, scale))
            .map(|u| u.id);
        if let Some(id) = unit_hit {
            self.click_unit(id);
            return true;
        }

        if let Some(structure) = self
            .board
            .structures()
            .iter()
            .find(|s| s.is_clickable() && s.contains_world_point(point, scale))
        {
            tracing::debug!(
                "Clicked structure {:?} at altitude {}",
                structure.footprint,
                structure.altitude
            );
            return true;
        }

        false
    }

    /// Fire a highlighted cell's move intents. True if a unit moved.
    fn click_cell(&mut self, coord: CellCoord) -> bool {
        let intents = match self.board.cell(coord) {
            Some(cell) if cell.visible => cell.callbacks().to_vec(),
            _ => return false,
        };

        for intent in intents {
            match self.move_unit(intent.unit, coord) {
                Ok(()) => return true,
                Err(e) => tracing::debug!("Move to {:?} rejected: {}", coord, e),
            }
        }
        false
    }

    fn click_unit(&mut self, id: UnitId) {
        let Some(clicked) = self.unit(id) else {
            return;
        };
        let (status, platoon) = (clicked.status(), clicked.platoon);
        let active_platoon = self.active_platoon().map(|p| p.id);

        if status == UnitStatus::Unactivated
            && active_platoon == Some(platoon)
            && self.active_unit().is_none()
        {
            if let Err(e) = self.select_unit(id) {
                tracing::debug!("Select rejected: {}", e);
            }
            return;
        }

        match self.active_unit() {
            Some(active) if active_platoon != Some(platoon) => {
                let Some(attacker) = self.unit(active) else {
                    return;
                };
                let in_melee = self
                    .unit(id)
                    .map_or(false, |target| attacker.is_within_melee(target, MELEE_RANGE));
                let in_sight = attacker.can_target(id);

                let result = if in_melee {
                    self.fight(active, id)
                } else if in_sight {
                    self.shoot(active, id)
                } else {
                    tracing::debug!("{:?} is out of reach of {:?}", id, active);
                    return;
                };
                if let Err(e) = result {
                    tracing::debug!("Attack rejected: {}", e);
                }
            }
            None => {
                if self.selected_unit().is_some() {
                    if let Err(e) = self.deselect_unit() {
                        tracing::debug!("Deselect rejected: {}", e);
                    }
                }
            }
            _ => {}
        }
    }

    /// Update hover state for every hoverable entity.
    /// Returns true if the pointer is over any of them.
    pub fn hit_test_hover(&mut self, point: Vec2) -> bool {
        let scale = self.board.cell_scale();
        let mut hovering = false;

        for cell in self.board.cells_mut() {
            cell.update_hover(point, scale);
            hovering |= cell.hovered;
        }
        for structure in self.board.structures_mut() {
            structure.update_hover(point, scale);
            hovering |= structure.hovered;
        }

        let mut changes = Vec::new();
        for platoon in &mut self.platoons {
            for unit in platoon.units_mut() {
                let change = unit.update_hover(point, scale);
                hovering |= unit.hovered;
                if change != HoverChange::Unchanged {
                    changes.push((unit.id, change));
                }
            }
        }
        for (id, change) in changes {
            match change {
                HoverChange::Entered => self.show_target_line(id),
                HoverChange::Left => self.hide_target_line(id),
                HoverChange::Unchanged => {}
            }
        }

        hovering
    }

    /// The pointer left the board: nothing is hovered any more
    pub fn pointer_left(&mut self) {
        for cell in self.board.cells_mut() {
            cell.clear_hover();
        }
        for structure in self.board.structures_mut() {
            structure.clear_hover();
        }
        for platoon in &mut self.platoons {
            for unit in platoon.units_mut() {
                unit.clear_hover();
            }
        }
        self.clear_hover_lines();
    }

    /// Draw a line from the active unit to `target` if it is a valid target
    fn show_target_line(&mut self, target: UnitId) {
        let Some(active) = self.active_unit() else {
            return;
        };
        let Some(attacker) = find_unit(&self.platoons, active) else {
            return;
        };
        if !attacker.can_target(target) {
            return;
        }
        let Some(victim) = find_unit(&self.platoons, target) else {
            return;
        };

        let scale = self.board.cell_scale();
        let line = OverlayItem::TargetLine {
            from: attacker.eye_position(scale),
            to: victim.eye_position(scale),
        };
        let overlay = self.board.register_entity(line, OVERLAY_LAYER);
        let stale = find_unit_mut(&mut self.platoons, target)
            .and_then(|u| std::mem::replace(&mut u.hover_line, overlay));
        if let Some(stale) = stale {
            self.board.unregister_entity(OVERLAY_LAYER, stale);
        }
    }

    pub(crate) fn hide_target_line(&mut self, target: UnitId) {
        let line = find_unit_mut(&mut self.platoons, target).and_then(|u| u.hover_line.take());
        if let Some(line) = line {
            self.board.unregister_entity(OVERLAY_LAYER, line);
        }
    }

    pub(crate) fn clear_hover_lines(&mut self) {
        let lines: Vec<_> = self
            .platoons
            .iter_mut()
            .flat_map(|p| p.units_mut().iter_mut())
            .filter_map(|u| u.hover_line.take())
            .collect();
        for line in lines {
            self.board.unregister_entity(OVERLAY_LAYER, line);
        }
    }
}
