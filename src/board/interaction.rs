//! Pointer interaction capabilities
//!
//! Cells, units and structures each expose a world-space hitbox. The game
//! walks its typed registries and asks these traits whether a pointer
//! position lands on an entity.

use glam::Vec2;

use crate::board::cell::Cell;
use crate::board::structure::Structure;
use crate::geometry::Footprint;

/// Result of feeding a pointer position to a hoverable entity
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HoverChange {
    Entered,
    Left,
    Unchanged,
}

pub trait Hitbox {
    /// Grid footprint; scaled to world space at hit-test time
    fn hitbox(&self) -> Footprint;

    fn contains_world_point(&self, point: Vec2, scale: f32) -> bool {
        self.hitbox().contains_world_point(point, scale)
    }
}

pub trait Hoverable: Hitbox {
    fn is_hovered(&self) -> bool;
    fn set_hovered(&mut self, hovered: bool);

    /// Whether the entity currently reacts to hover at all
    fn is_hoverable(&self) -> bool {
        true
    }

    fn update_hover(&mut self, point: Vec2, scale: f32) -> HoverChange {
        let inside = self.is_hoverable() && self.contains_world_point(point, scale);
        match (inside, self.is_hovered()) {
            (true, false) => {
                self.set_hovered(true);
                HoverChange::Entered
            }
            (false, true) => {
                self.set_hovered(false);
                HoverChange::Left
            }
            _ => HoverChange::Unchanged,
        }
    }

    /// Pointer left the board
    fn clear_hover(&mut self) -> HoverChange {
        if self.is_hovered() {
            self.set_hovered(false);
            HoverChange::Left
        } else {
            HoverChange::Unchanged
        }
    }
}

pub trait Clickable: Hitbox {
    fn is_clickable(&self) -> bool {
        true
    }
}

impl Hitbox for Cell {
    fn hitbox(&self) -> Footprint {
        Footprint::cell(self.coord)
    }
}

/// Only highlighted movement destinations react to the pointer
impl Hoverable for Cell {
    fn is_hovered(&self) -> bool {
        self.hovered
    }
    fn set_hovered(&mut self, hovered: bool) {
        self.hovered = hovered;
    }
    fn is_hoverable(&self) -> bool {
        self.visible
    }
}

impl Clickable for Cell {
    fn is_clickable(&self) -> bool {
        self.visible
    }
}

impl Hitbox for Structure {
    fn hitbox(&self) -> Footprint {
        self.footprint
    }
}

impl Hoverable for Structure {
    fn is_hovered(&self) -> bool {
        self.hovered
    }
    fn set_hovered(&mut self, hovered: bool) {
        self.hovered = hovered;
    }
}

impl Clickable for Structure {}
