pub mod config;
pub mod error;
pub mod types;

pub use config::{fit_cell_scale, GameConfig};
pub use error::{Result, WarError};
pub use types::{CellCoord, IdGenerator, OverlayId, PlatoonId, StructureId, UnitId};
