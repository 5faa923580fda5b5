//! Attack resolution
//!
//! Ranged: hit chance is the shooter's skill times weapon accuracy.
//! Damage is divided by the target's armor, and also by its agility
//! when it is hyper-agile.
//!
//! Melee: hit chance weighs both fighters' skill. Damage is divided by
//! armor and agility.

use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::units::constants::{MELEE_BASE_DAMAGE, MIN_EFFECTIVE_ARMOR, RANGED_BASE_DAMAGE};
use crate::units::equipment::EquipmentClass;
use crate::units::unit::Unit;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum AttackKind {
    Ranged,
    Melee,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct AttackOutcome {
    pub kind: AttackKind,
    pub hit: bool,
    /// Damage applied (0 on a miss)
    pub damage: f32,
    pub killed: bool,
}

fn armor_after_piercing(defender: &Unit, piercing: f32) -> f32 {
    (defender.effective_armor() - piercing).max(MIN_EFFECTIVE_ARMOR)
}

pub fn ranged_hit_chance(attacker: &Unit) -> f32 {
    let accuracy = attacker
        .best_weapon(EquipmentClass::Ranged)
        .and_then(|w| w.accuracy)
        .unwrap_or(1.0);
    (attacker.stats.shooting_skill * accuracy).clamp(0.0, 1.0)
}

pub fn ranged_damage(attacker: &Unit, defender: &Unit) -> f32 {
    let weapon = attacker.best_weapon(EquipmentClass::Ranged);
    let bonus = weapon.and_then(|w| w.damage).unwrap_or(0.0);
    let piercing = weapon.and_then(|w| w.armor_piercing).unwrap_or(0.0);

    let mut damage = (RANGED_BASE_DAMAGE + bonus) / armor_after_piercing(defender, piercing);
    if defender.stats.hyper_agile {
        damage /= defender.stats.agility;
    }
    damage
}

pub fn melee_hit_chance(attacker: &Unit, defender: &Unit) -> f32 {
    let total = attacker.stats.fighting_skill + defender.stats.fighting_skill;
    if total <= 0.0 {
        return 0.5;
    }
    (attacker.stats.fighting_skill / total).clamp(0.0, 1.0)
}

pub fn melee_damage(attacker: &Unit, defender: &Unit) -> f32 {
    let weapon = attacker.best_weapon(EquipmentClass::Melee);
    let bonus = weapon.and_then(|w| w.damage).unwrap_or(0.0);
    let piercing = weapon.and_then(|w| w.armor_piercing).unwrap_or(0.0);

    (MELEE_BASE_DAMAGE + bonus) / (armor_after_piercing(defender, piercing) * defender.stats.agility)
}

/// Roll an attack. Returns `(hit, damage)`; nothing is applied yet.
pub fn roll_attack<R: Rng>(
    kind: AttackKind,
    attacker: &Unit,
    defender: &Unit,
    rng: &mut R,
) -> (bool, f32) {
    let (chance, damage) = match kind {
        AttackKind::Ranged => (ranged_hit_chance(attacker), ranged_damage(attacker, defender)),
        AttackKind::Melee => (
            melee_hit_chance(attacker, defender),
            melee_damage(attacker, defender),
        ),
    };
    let hit = rng.gen::<f32>() < chance;
    (hit, if hit { damage } else { 0.0 })
}
