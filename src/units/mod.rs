//! Units, platoons, movement and combat rules

pub mod combat;
pub mod constants;
pub mod equipment;
pub mod movement;
pub mod platoon;
pub mod unit;

pub use combat::{AttackKind, AttackOutcome};
pub use equipment::{Equipment, EquipmentClass};
pub use movement::{altitude_at, reachable_cells, step_penalty};
pub use platoon::Platoon;
pub use unit::{Unit, UnitStats, UnitStatus};
