//! Equipment carried by units

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EquipmentClass {
    Melee,
    Ranged,
    Armor,
    Other,
}

/// A piece of kit. Optional stats only apply when set.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Equipment {
    pub name: String,
    /// Roster cost
    pub points: u32,
    pub classification: EquipmentClass,
    /// Added to the bearer's armor
    pub armor: Option<f32>,
    /// Added to the bearer's health when equipped
    pub health: Option<f32>,
    /// Multiplier on the chance to hit
    pub accuracy: Option<f32>,
    /// Subtracted from the target's armor
    pub armor_piercing: Option<f32>,
    /// Added to base damage
    pub damage: Option<f32>,
}

impl Equipment {
    pub fn new(name: &str, classification: EquipmentClass) -> Self {
        Self {
            name: name.to_string(),
            points: 1,
            classification,
            armor: None,
            health: None,
            accuracy: None,
            armor_piercing: None,
            damage: None,
        }
    }

    pub fn rifle() -> Self {
        Self {
            points: 2,
            accuracy: Some(1.0),
            damage: Some(1.0),
            ..Self::new("rifle", EquipmentClass::Ranged)
        }
    }

    pub fn sniper_rifle() -> Self {
        Self {
            points: 4,
            accuracy: Some(1.5),
            armor_piercing: Some(0.5),
            damage: Some(2.0),
            ..Self::new("sniper rifle", EquipmentClass::Ranged)
        }
    }

    pub fn bayonet() -> Self {
        Self {
            damage: Some(1.0),
            ..Self::new("bayonet", EquipmentClass::Melee)
        }
    }

    pub fn power_sword() -> Self {
        Self {
            points: 3,
            armor_piercing: Some(1.0),
            damage: Some(3.0),
            ..Self::new("power sword", EquipmentClass::Melee)
        }
    }

    pub fn flak_armor() -> Self {
        Self {
            points: 2,
            armor: Some(1.0),
            ..Self::new("flak armor", EquipmentClass::Armor)
        }
    }

    pub fn medkit() -> Self {
        Self {
            health: Some(2.0),
            ..Self::new("medkit", EquipmentClass::Other)
        }
    }

    pub fn is_weapon(&self) -> bool {
        matches!(
            self.classification,
            EquipmentClass::Melee | EquipmentClass::Ranged
        )
    }
}
