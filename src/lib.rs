//! War Roulette - tactical combat rules for a grid-based, turn-based wargame

pub mod board;
pub mod core;
pub mod game;
pub mod geometry;
pub mod units;
