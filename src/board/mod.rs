//! Spatial grid: cells, structures, overlays and pointer hit-testing

pub mod cell;
pub mod grid;
pub mod interaction;
pub mod overlay;
pub mod structure;

pub use cell::{Cell, MoveIntent};
pub use grid::{Board, ReachableCell};
pub use interaction::{Clickable, Hitbox, HoverChange, Hoverable};
pub use overlay::{OverlayItem, OverlayLayer, OVERLAY_LAYER};
pub use structure::{Observer, Structure, DEFAULT_STRUCTURE_ALTITUDE};
