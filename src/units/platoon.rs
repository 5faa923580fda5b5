//! Platoons: fixed rosters of units that share a turn slot

use ahash::AHashSet;
use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::core::types::{CellCoord, PlatoonId, UnitId};
use crate::units::constants::SPAWN_ATTEMPTS;
use crate::units::unit::{Unit, UnitStats, UnitStatus};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Platoon {
    pub id: PlatoonId,
    pub name: String,
    units: Vec<Unit>,
}

impl Platoon {
    pub fn new(name: &str) -> Self {
        Self {
            id: PlatoonId::new(),
            name: name.to_string(),
            units: Vec::new(),
        }
    }

    /// Add a unit while building the roster
    pub fn add_unit(&mut self, position: CellCoord, stats: UnitStats) -> UnitId {
        let unit = Unit::new(self.id, position, stats);
        let id = unit.id;
        self.units.push(unit);
        id
    }

    /// Roster of `size` units on random free cells of a `width` x `height` board.
    /// Cells in `occupied` are avoided and the chosen cells are added to it.
    pub fn spawn<R: Rng>(
        name: &str,
        size: usize,
        stats: &UnitStats,
        width: u32,
        height: u32,
        occupied: &mut AHashSet<CellCoord>,
        rng: &mut R,
    ) -> Self {
        let mut platoon = Self::new(name);
        if width == 0 || height == 0 {
            return platoon;
        }

        for _ in 0..size {
            let random = (0..SPAWN_ATTEMPTS)
                .map(|_| {
                    CellCoord::new(
                        rng.gen_range(0..width) as i32,
                        rng.gen_range(0..height) as i32,
                    )
                })
                .find(|c| !occupied.contains(c));

            let position = random.or_else(|| {
                (0..height as i32)
                    .flat_map(|y| (0..width as i32).map(move |x| CellCoord::new(x, y)))
                    .find(|c| !occupied.contains(c))
            });

            match position {
                Some(position) => {
                    occupied.insert(position);
                    platoon.add_unit(position, stats.clone());
                }
                None => {
                    tracing::warn!(
                        "Board full; platoon {} spawned with {} of {} units",
                        name,
                        platoon.units.len(),
                        size
                    );
                    break;
                }
            }
        }
        platoon
    }

    pub fn units(&self) -> &[Unit] {
        &self.units
    }

    pub(crate) fn units_mut(&mut self) -> &mut [Unit] {
        &mut self.units
    }

    pub fn unit(&self, id: UnitId) -> Option<&Unit> {
        self.units.iter().find(|u| u.id == id)
    }

    pub(crate) fn unit_mut(&mut self, id: UnitId) -> Option<&mut Unit> {
        self.units.iter_mut().find(|u| u.id == id)
    }

    pub fn living_units(&self) -> impl Iterator<Item = &Unit> {
        self.units.iter().filter(|u| u.is_alive())
    }

    /// Any living unit still waiting to act this round?
    pub fn has_unactivated(&self) -> bool {
        self.units
            .iter()
            .any(|u| u.status() == UnitStatus::Unactivated)
    }

    pub fn is_wiped_out(&self) -> bool {
        self.living_units().next().is_none()
    }
}
