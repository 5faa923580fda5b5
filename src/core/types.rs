//! Core type definitions used throughout the codebase

use rand::{RngCore, SeedableRng};
use rand_chacha::ChaCha8Rng;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Unique identifier for a unit
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct UnitId(pub Uuid);

impl UnitId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for UnitId {
    fn default() -> Self {
        Self::new()
    }
}

/// Unique identifier for a platoon
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PlatoonId(pub Uuid);

impl PlatoonId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for PlatoonId {
    fn default() -> Self {
        Self::new()
    }
}

/// Unique identifier for a structure (including each nested floor)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct StructureId(pub Uuid);

impl StructureId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for StructureId {
    fn default() -> Self {
        Self::new()
    }
}

/// Identifier of an entry in an overlay layer. Only [`IdGenerator`] hands these out.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct OverlayId(pub Uuid);

/// Seeded source of overlay identifiers, owned by the board
#[derive(Debug, Clone)]
pub struct IdGenerator {
    rng: ChaCha8Rng,
    issued: u64,
}

impl IdGenerator {
    pub fn new(seed: u64) -> Self {
        Self {
            rng: ChaCha8Rng::seed_from_u64(seed),
            issued: 0,
        }
    }

    pub fn next_id(&mut self) -> OverlayId {
        let mut bytes = [0u8; 16];
        self.rng.fill_bytes(&mut bytes);
        self.issued += 1;
        OverlayId(uuid::Builder::from_random_bytes(bytes).into_uuid())
    }

    /// Number of ids handed out so far
    pub fn issued(&self) -> u64 {
        self.issued
    }
}

/// Integer grid coordinate of a cell
///
/// Signed so that movement scans may step past the board edge before the
/// lookup rejects them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct CellCoord {
    pub x: i32,
    pub y: i32,
}

impl CellCoord {
    pub fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    /// Chebyshev distance (king moves)
    pub fn chebyshev_distance(&self, other: &CellCoord) -> u32 {
        (self.x - other.x).unsigned_abs().max((self.y - other.y).unsigned_abs())
    }

    /// World-space center of this cell at the given cell scale
    pub fn center(&self, scale: f32) -> glam::Vec2 {
        glam::Vec2::new(
            self.x as f32 * scale + scale / 2.0,
            self.y as f32 * scale + scale / 2.0,
        )
    }
}
