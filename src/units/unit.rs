//! Units: position, stats and the activation lifecycle
//!
//! Lifecycle per round:
//! `Unactivated -> Selected -> Active -> Activated`, with `Selected` able
//! to fall back to `Unactivated`, and `Dead` reachable from anywhere.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use crate::board::interaction::{Clickable, Hitbox, Hoverable};
use crate::board::structure::Observer;
use crate::core::error::{Result, WarError};
use crate::core::types::{CellCoord, OverlayId, PlatoonId, StructureId, UnitId};
use crate::geometry::Footprint;
use crate::units::equipment::{Equipment, EquipmentClass};

/// Base combat statistics
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct UnitStats {
    pub health: f32,
    /// Movement radius in cells
    pub speed: u32,
    /// Probability of landing a shot, in [0, 1]
    pub shooting_skill: f32,
    /// Weighed against the opponent's fighting skill in melee, in [0, 1]
    pub fighting_skill: f32,
    /// Divides all incoming damage
    pub armor: f32,
    /// Divides incoming melee damage
    pub agility: f32,
    /// Agility also divides incoming ranged damage
    pub hyper_agile: bool,
    pub action_points: u32,
}

impl Default for UnitStats {
    fn default() -> Self {
        Self {
            health: 10.0,
            speed: 10,
            shooting_skill: 0.5,
            fighting_skill: 0.5,
            armor: 1.0,
            agility: 1.0,
            hyper_agile: false,
            action_points: 3,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum UnitStatus {
    Unactivated,
    Selected,
    Active,
    Activated,
    Dead,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Unit {
    pub id: UnitId,
    pub platoon: PlatoonId,
    pub position: CellCoord,
    pub health: f32,
    pub stats: UnitStats,
    pub equipment: Vec<Equipment>,
    /// Derived from the covering structure
    pub altitude: u32,
    pub standing_on: Option<StructureId>,
    status: UnitStatus,
    valid_targets: Vec<UnitId>,
    /// Highlights registered for `valid_targets`
    target_overlays: Vec<OverlayId>,
    /// Line from the active unit while this unit is hovered as a target
    pub(crate) hover_line: Option<OverlayId>,
    #[serde(skip)]
    pub hovered: bool,
}

impl Unit {
    pub fn new(platoon: PlatoonId, position: CellCoord, stats: UnitStats) -> Self {
        Self {
            id: UnitId::new(),
            platoon,
            position,
            health: stats.health,
            stats,
            equipment: Vec::new(),
            altitude: 0,
            standing_on: None,
            status: UnitStatus::Unactivated,
            valid_targets: Vec::new(),
            target_overlays: Vec::new(),
            hover_line: None,
            hovered: false,
        }
    }

    pub fn status(&self) -> UnitStatus {
        self.status
    }

    pub fn is_alive(&self) -> bool {
        self.status != UnitStatus::Dead
    }

    /// Enemies currently in sight
    pub fn valid_targets(&self) -> &[UnitId] {
        &self.valid_targets
    }

    pub fn can_target(&self, other: UnitId) -> bool {
        self.valid_targets.contains(&other)
    }

    pub fn target_overlays(&self) -> &[OverlayId] {
        &self.target_overlays
    }

    /// Cache a fresh target computation; stale highlights must already be gone
    pub(crate) fn set_targets(&mut self, targets: Vec<UnitId>, overlays: Vec<OverlayId>) {
        self.valid_targets = targets;
        self.target_overlays = overlays;
    }

    /// Drop the cached targets, returning the highlight ids to unregister
    pub(crate) fn take_targets(&mut self) -> Vec<OverlayId> {
        self.valid_targets.clear();
        std::mem::take(&mut self.target_overlays)
    }

    pub fn is_within_melee(&self, other: &Unit, range: u32) -> bool {
        self.position.chebyshev_distance(&other.position) <= range
    }

    // === EQUIPMENT ===

    pub fn equip(&mut self, item: Equipment) {
        if let Some(bonus) = item.health {
            self.health += bonus;
        }
        self.equipment.push(item);
    }

    /// Base armor plus worn armor bonuses
    pub fn effective_armor(&self) -> f32 {
        self.stats.armor + self.equipment.iter().filter_map(|e| e.armor).sum::<f32>()
    }

    /// Hardest-hitting weapon of the given class
    pub fn best_weapon(&self, class: EquipmentClass) -> Option<&Equipment> {
        self.equipment
            .iter()
            .filter(|e| e.classification == class)
            .max_by(|a, b| {
                a.damage
                    .unwrap_or(0.0)
                    .total_cmp(&b.damage.unwrap_or(0.0))
            })
    }

    // === STATUS TRANSITIONS ===

    fn transition(&mut self, from: &[UnitStatus], to: UnitStatus, action: &'static str) -> Result<()> {
        if from.contains(&self.status) {
            self.status = to;
            Ok(())
        } else {
            Err(WarError::InvalidStateTransition {
                unit: self.id,
                status: self.status,
                action,
            })
        }
    }

    pub fn select(&mut self) -> Result<()> {
        self.transition(&[UnitStatus::Unactivated], UnitStatus::Selected, "select")
    }

    pub fn deselect(&mut self) -> Result<()> {
        self.transition(&[UnitStatus::Selected], UnitStatus::Unactivated, "deselect")
    }

    /// Selected units become active; active units restart their phase
    pub fn activate(&mut self) -> Result<()> {
        self.transition(
            &[UnitStatus::Selected, UnitStatus::Active],
            UnitStatus::Active,
            "activate",
        )
    }

    /// Out of action points for this round
    pub fn exhaust(&mut self) -> Result<()> {
        self.transition(&[UnitStatus::Active], UnitStatus::Activated, "exhaust")
    }

    /// New round: living units may act again
    pub fn ready(&mut self) -> Result<()> {
        self.transition(
            &[UnitStatus::Unactivated, UnitStatus::Activated],
            UnitStatus::Unactivated,
            "ready",
        )
    }

    pub fn kill(&mut self) {
        self.status = UnitStatus::Dead;
        self.valid_targets.clear();
        self.hovered = false;
    }

    /// Apply damage; returns true if this killed the unit
    pub fn take_damage(&mut self, amount: f32) -> bool {
        if !self.is_alive() {
            return false;
        }
        self.health -= amount;
        if self.health <= 0.0 {
            self.kill();
            true
        } else {
            false
        }
    }
}

impl Observer for Unit {
    /// Center of the unit's cell
    fn eye_position(&self, scale: f32) -> Vec2 {
        self.position.center(scale)
    }

    fn altitude(&self) -> u32 {
        self.altitude
    }

    fn standing_on(&self) -> Option<StructureId> {
        self.standing_on
    }
}

impl Hitbox for Unit {
    fn hitbox(&self) -> Footprint {
        Footprint::cell(self.position)
    }
}

impl Hoverable for Unit {
    fn is_hovered(&self) -> bool {
        self.hovered
    }
    fn set_hovered(&mut self, hovered: bool) {
        self.hovered = hovered;
    }
    fn is_hoverable(&self) -> bool {
        self.is_alive()
    }
}

impl Clickable for Unit {
    fn is_clickable(&self) -> bool {
        self.is_alive()
    }
}
