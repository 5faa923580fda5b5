//! Turn controller, pointer dispatch and the game event log

pub mod events;
pub mod input;
pub mod state;

pub use events::{GameEvent, GameEventKind, SoundCue};
pub use state::{Control, Game};
