//! Transient overlay entities: target highlights and targeting lines

use glam::Vec2;
use serde::{Deserialize, Serialize};

use crate::core::types::{OverlayId, UnitId};
use crate::geometry::Footprint;

/// Layer that holds target highlights and hover lines
pub const OVERLAY_LAYER: &str = "overlay";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum OverlayItem {
    /// Highlight drawn over a unit the active unit can target
    TargetOutline { target: UnitId, footprint: Footprint },
    /// Line from the active unit to a hovered target
    TargetLine { from: Vec2, to: Vec2 },
}

/// A named layer of overlay items, kept in draw order
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct OverlayLayer {
    entries: Vec<(OverlayId, OverlayItem)>,
}

impl OverlayLayer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, id: OverlayId, item: OverlayItem) {
        self.entries.push((id, item));
    }

    pub fn remove(&mut self, id: OverlayId) -> Option<OverlayItem> {
        let index = self.entries.iter().position(|(entry, _)| *entry == id)?;
        Some(self.entries.remove(index).1)
    }

    pub fn get(&self, id: OverlayId) -> Option<&OverlayItem> {
        self.entries
            .iter()
            .find(|(entry, _)| *entry == id)
            .map(|(_, item)| item)
    }

    pub fn iter(&self) -> impl Iterator<Item = &(OverlayId, OverlayItem)> {
        self.entries.iter()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
