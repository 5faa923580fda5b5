//! Game configuration with documented defaults
//!
//! Every tunable the rules engine reads is collected here so the
//! presentation layer can pass its own values instead of relying on
//! hard-coded numbers.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::core::error::{Result, WarError};
use crate::units::unit::UnitStats;

/// Configuration for a skirmish
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct GameConfig {
    // === BOARD ===
    /// Number of cell columns
    pub grid_width: u32,

    /// Number of cell rows
    pub grid_height: u32,

    /// Cell-to-world scale (world units per cell)
    ///
    /// Usually derived from the container size with [`fit_cell_scale`].
    /// Line-of-sight tolerances scale with it, so the rules behave the
    /// same at any zoom level.
    pub cell_scale: f32,

    // === MOVEMENT ===
    /// Extra radius (in cells) added to a unit's speed when deciding
    /// which cells are reachable
    ///
    /// At 0.5 a unit with speed 1 reaches its full Moore neighbourhood
    /// (diagonal distance ~0.71 cells to the near corner) but nothing at
    /// distance 2.
    pub movement_tolerance: f32,

    // === ROSTERS ===
    /// Units spawned per platoon
    pub platoon_size: usize,

    /// Stats given to freshly spawned units
    pub unit_defaults: UnitStats,

    /// Seed for spawn placement, combat rolls and overlay ids
    pub seed: u64,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            grid_width: 40,
            grid_height: 60,
            cell_scale: 20.0,
            movement_tolerance: 0.5,
            platoon_size: 10,
            unit_defaults: UnitStats::default(),
            seed: 0,
        }
    }
}

impl GameConfig {
    /// Parse a TOML document; missing keys fall back to defaults
    pub fn from_toml_str(content: &str) -> Result<Self> {
        let config: GameConfig = toml::from_str(content)?;
        config.validate().map_err(WarError::Config)?;
        Ok(config)
    }

    /// Load and validate a TOML config file
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        Self::from_toml_str(&content)
    }

    /// Validate configuration values
    pub fn validate(&self) -> std::result::Result<(), String> {
        if self.grid_width == 0 || self.grid_height == 0 {
            return Err(format!(
                "grid dimensions must be non-zero (got {}x{})",
                self.grid_width, self.grid_height
            ));
        }

        if self.cell_scale <= 0.0 {
            return Err(format!("cell_scale ({}) must be positive", self.cell_scale));
        }

        if self.movement_tolerance < 0.0 {
            return Err(format!(
                "movement_tolerance ({}) must not be negative",
                self.movement_tolerance
            ));
        }

        let stats = &self.unit_defaults;
        for (name, skill) in [
            ("shooting_skill", stats.shooting_skill),
            ("fighting_skill", stats.fighting_skill),
        ] {
            if !(0.0..=1.0).contains(&skill) {
                return Err(format!("{} ({}) must be within [0, 1]", name, skill));
            }
        }

        // Both are divisors in the damage formulas
        if stats.armor <= 0.0 || stats.agility <= 0.0 {
            return Err("armor and agility must be positive".into());
        }

        Ok(())
    }
}

/// Largest whole-pixel cell scale at which a `grid_w` x `grid_h` board fits
/// inside a `container_w` x `container_h` area. Never below 1.
pub fn fit_cell_scale(container_w: f32, container_h: f32, grid_w: u32, grid_h: u32) -> f32 {
    if grid_w == 0 || grid_h == 0 {
        return 1.0;
    }
    let by_width = container_w / grid_w as f32;
    let by_height = container_h / grid_h as f32;
    by_width.min(by_height).floor().max(1.0)
}
