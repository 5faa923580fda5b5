//! Structures: rectangular footprints with an altitude and nested floors
//!
//! A structure blocks the sightline between two observers unless both
//! stand at or above its altitude, or the line leaves the structure right
//! next to an observer who is standing on it (a doorway or rooftop edge).

use glam::Vec2;
use serde::{Deserialize, Serialize};

use crate::core::error::{Result, WarError};
use crate::core::types::{CellCoord, StructureId};
use crate::geometry::{EdgeAxis, Footprint, Segment};

/// Anything that can see or be seen across the board
pub trait Observer {
    /// World-space eye position at the given cell scale
    fn eye_position(&self, scale: f32) -> Vec2;
    fn altitude(&self) -> u32;
    fn standing_on(&self) -> Option<StructureId>;
}

/// Default altitude of a freshly built structure
pub const DEFAULT_STRUCTURE_ALTITUDE: u32 = 1;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Structure {
    pub id: StructureId,
    pub footprint: Footprint,
    pub altitude: u32,
    substructures: Vec<Structure>,
    /// Cosmetic hover state, the only field that may change after registration
    #[serde(skip)]
    pub hovered: bool,
}

impl Structure {
    pub fn new(footprint: Footprint) -> Self {
        Self::with_altitude(footprint, DEFAULT_STRUCTURE_ALTITUDE)
    }

    pub fn with_altitude(footprint: Footprint, altitude: u32) -> Self {
        Self {
            id: StructureId::new(),
            footprint,
            altitude,
            substructures: Vec::new(),
            hovered: false,
        }
    }

    /// Nest a floor inside this structure.
    ///
    /// The floor must fit inside this footprint and sit strictly higher.
    pub fn add_substructure(&mut self, sub: Structure) -> Result<()> {
        if !self.footprint.contains_footprint(&sub.footprint) {
            return Err(WarError::StructureInvariantViolation(format!(
                "substructure {:?} does not fit inside {:?}",
                sub.footprint, self.footprint
            )));
        }
        if sub.altitude <= self.altitude {
            return Err(WarError::StructureInvariantViolation(format!(
                "substructure altitude {} must exceed parent altitude {}",
                sub.altitude, self.altitude
            )));
        }
        self.substructures.push(sub);
        Ok(())
    }

    /// Builder form of [`Structure::add_substructure`]
    pub fn with_substructure(mut self, sub: Structure) -> Result<Self> {
        self.add_substructure(sub)?;
        Ok(self)
    }

    pub fn substructures(&self) -> &[Structure] {
        &self.substructures
    }

    /// Re-check the nesting rules over the whole tree
    pub fn validate(&self) -> Result<()> {
        for sub in &self.substructures {
            if !self.footprint.contains_footprint(&sub.footprint) || sub.altitude <= self.altitude {
                return Err(WarError::StructureInvariantViolation(format!(
                    "substructure {:?} at altitude {} breaks nesting under {:?} at altitude {}",
                    sub.footprint, sub.altitude, self.footprint, self.altitude
                )));
            }
            sub.validate()?;
        }
        Ok(())
    }

    pub fn collides_on_grid(&self, coord: CellCoord) -> bool {
        self.footprint.contains_cell(coord)
    }

    /// Edge segments in world space: top, bottom, left, right
    pub fn boundaries(&self, scale: f32) -> [(EdgeAxis, Segment); 4] {
        self.footprint.edges(scale)
    }

    /// True if `id` is this structure or any floor nested inside it
    pub fn has_substructure(&self, id: Option<StructureId>) -> bool {
        match id {
            Some(id) => {
                self.id == id || self.substructures.iter().any(|s| s.has_substructure(Some(id)))
            }
            None => false,
        }
    }

    /// Every nested floor, depth-first, excluding self
    pub fn all_substructures(&self) -> Vec<&Structure> {
        let mut all = Vec::new();
        for sub in &self.substructures {
            all.push(sub);
            all.extend(sub.all_substructures());
        }
        all
    }

    /// Does this structure interrupt the sightline from `actor` to `target`?
    pub fn blocks_view(&self, target: &impl Observer, actor: &impl Observer, scale: f32) -> bool {
        // Both can see over it
        if target.altitude() >= self.altitude && actor.altitude() >= self.altitude {
            return false;
        }

        let target_pos = target.eye_position(scale);
        let actor_pos = actor.eye_position(scale);
        let sightline = Segment::new(target_pos, actor_pos);

        for (axis, edge) in self.boundaries(scale) {
            if !sightline.crosses(&edge) {
                continue;
            }

            let near_edge = |pos: Vec2| match axis {
                EdgeAxis::Vertical => (pos.x - edge.start.x).abs() < scale,
                EdgeAxis::Horizontal => (pos.y - edge.start.y).abs() < scale,
            };

            if near_edge(target_pos) && self.has_substructure(target.standing_on()) {
                return false;
            }
            if near_edge(actor_pos) && self.has_substructure(actor.standing_on()) {
                return false;
            }
            return true;
        }

        false
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SCALE: f32 = 20.0;

    struct Spot {
        cell: CellCoord,
        altitude: u32,
        standing_on: Option<StructureId>,
    }

    impl Spot {
        fn ground(x: i32, y: i32) -> Self {
            Self {
                cell: CellCoord::new(x, y),
                altitude: 0,
                standing_on: None,
            }
        }

        fn on(x: i32, y: i32, structure: &Structure) -> Self {
            Self {
                cell: CellCoord::new(x, y),
                altitude: structure.altitude,
                standing_on: Some(structure.id),
            }
        }
    }

    impl Observer for Spot {
        fn eye_position(&self, scale: f32) -> Vec2 {
            self.cell.center(scale)
        }
        fn altitude(&self) -> u32 {
            self.altitude
        }
        fn standing_on(&self) -> Option<StructureId> {
            self.standing_on
        }
    }

    fn two_story() -> Structure {
        Structure::with_altitude(Footprint::new(5, 15, 15, 10), 1)
            .with_substructure(Structure::with_altitude(Footprint::new(5, 15, 5, 5), 2))
            .unwrap()
    }

    #[test]
    fn test_substructure_must_fit_inside_parent() {
        let mut ground = Structure::new(Footprint::new(0, 0, 4, 4));
        let err = ground
            .add_substructure(Structure::with_altitude(Footprint::new(2, 2, 4, 4), 2))
            .unwrap_err();
        assert!(matches!(err, WarError::StructureInvariantViolation(_)));
        assert!(ground.substructures().is_empty());
    }

    #[test]
    fn test_substructure_must_be_higher() {
        let mut ground = Structure::with_altitude(Footprint::new(0, 0, 4, 4), 2);
        let err = ground
            .add_substructure(Structure::with_altitude(Footprint::new(1, 1, 2, 2), 2))
            .unwrap_err();
        assert!(matches!(err, WarError::StructureInvariantViolation(_)));
    }

    #[test]
    fn test_has_substructure_is_reflexive_and_transitive() {
        let attic = Structure::with_altitude(Footprint::new(6, 16, 2, 2), 3);
        let attic_id = attic.id;
        let upper = Structure::with_altitude(Footprint::new(5, 15, 5, 5), 2)
            .with_substructure(attic)
            .unwrap();
        let upper_id = upper.id;
        let ground = Structure::with_altitude(Footprint::new(5, 15, 15, 10), 1)
            .with_substructure(upper)
            .unwrap();

        assert!(ground.has_substructure(Some(ground.id)));
        assert!(ground.has_substructure(Some(upper_id)));
        assert!(ground.has_substructure(Some(attic_id)));
        assert!(!ground.has_substructure(None));
        assert!(!ground.has_substructure(Some(StructureId::new())));
        assert_eq!(ground.all_substructures().len(), 2);
        assert!(ground.validate().is_ok());
    }

    #[test]
    fn test_wall_blocks_ground_level_sightline() {
        let building = Structure::new(Footprint::new(10, 10, 5, 5));
        let actor = Spot::ground(8, 12);
        let target = Spot::ground(17, 12);
        assert!(building.blocks_view(&target, &actor, SCALE));
        assert!(building.blocks_view(&actor, &target, SCALE));
    }

    #[test]
    fn test_sightline_missing_structure_is_clear() {
        let building = Structure::new(Footprint::new(10, 10, 5, 5));
        let actor = Spot::ground(8, 2);
        let target = Spot::ground(17, 2);
        assert!(!building.blocks_view(&target, &actor, SCALE));
    }

    #[test]
    fn test_observers_above_structure_see_over_it() {
        let building = Structure::new(Footprint::new(10, 10, 5, 5));
        let mut actor = Spot::ground(8, 12);
        let mut target = Spot::ground(17, 12);
        actor.altitude = 1;
        target.altitude = 1;
        assert!(!building.blocks_view(&target, &actor, SCALE));

        // One observer below is enough to restore the block
        target.altitude = 0;
        assert!(building.blocks_view(&target, &actor, SCALE));
    }

    #[test]
    fn test_rooftop_edge_exception() {
        let ground = two_story();
        // On the ground floor roof, half a cell from the right wall at x=20
        let actor = Spot::on(19, 17, &ground);
        let target = Spot::ground(25, 17);
        assert!(!ground.blocks_view(&target, &actor, SCALE));
    }

    #[test]
    fn test_rooftop_far_from_edge_is_blocked() {
        let ground = two_story();
        let actor = Spot::on(12, 17, &ground);
        let target = Spot::ground(25, 17);
        assert!(ground.blocks_view(&target, &actor, SCALE));
    }

    #[test]
    fn test_upper_floor_counts_for_parent_edge_exception() {
        let ground = two_story();
        let upper = &ground.substructures()[0];
        // Upper floor spans x 5..10; standing at its west edge next to the
        // ground floor's west wall at x=5
        let actor = Spot::on(5, 17, upper);
        let target = Spot::ground(1, 17);
        assert!(!ground.blocks_view(&target, &actor, SCALE));
        assert!(!upper.blocks_view(&target, &actor, SCALE));
    }

    #[test]
    fn test_edge_exception_needs_standing_on_structure() {
        let building = Structure::new(Footprint::new(10, 10, 5, 5));
        // Right next to the wall but standing on the ground outside
        let actor = Spot::ground(9, 12);
        let target = Spot::ground(16, 12);
        assert!(building.blocks_view(&target, &actor, SCALE));
    }
}
