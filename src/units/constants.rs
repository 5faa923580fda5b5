//! Combat and roster constants

/// Damage dealt by an unarmed ranged hit before armor
pub const RANGED_BASE_DAMAGE: f32 = 4.0;

/// Damage dealt by an unarmed melee hit before armor and agility
pub const MELEE_BASE_DAMAGE: f32 = 5.0;

/// Armor never drops below this after armor piercing
pub const MIN_EFFECTIVE_ARMOR: f32 = 0.25;

/// Melee reach in cells (Chebyshev distance)
pub const MELEE_RANGE: u32 = 1;

/// Action points spent by a shot or a melee swing
pub const ATTACK_COST: u32 = 1;

/// Base action points spent by a move, before the cell's penalty
pub const MOVE_BASE_COST: u32 = 1;

/// Random placements tried per unit before falling back to a scan
pub const SPAWN_ATTEMPTS: usize = 32;
