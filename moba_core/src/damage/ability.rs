//! AbilityData - immutable per-ability tuning

use crate::types::{DamageType, WeaponDamageType};
use serde::{Deserialize, Serialize};

/// Content-authored numbers for one ability
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AbilityData {
    pub id: String,
    pub name: String,

    // === Output ===
    #[serde(default)]
    pub damage_type: DamageType,
    /// Weapon(s) whose rolled damage is added to the output
    #[serde(default)]
    pub weapon_damage_type: WeaponDamageType,

    // === Scaling ===
    #[serde(default)]
    pub attack_power_ratio: f64,
    #[serde(default)]
    pub spell_power_ratio: f64,
    /// Fraction of the target's MaxHealth added to damage
    #[serde(default)]
    pub max_health_ratio: f64,
    /// Fraction of the target's missing health added to damage
    #[serde(default)]
    pub missing_health_ratio: f64,
    #[serde(default)]
    pub base_value: f64,

    // === Properties ===
    /// Marks the passive health-regeneration ability
    #[serde(default)]
    pub health_regen: bool,
    #[serde(default)]
    pub passive: bool,
    /// Maximum distance to the target
    #[serde(default = "default_range")]
    pub range: f64,
    /// Travel speed for projectile abilities, instant when absent
    #[serde(default)]
    pub projectile_speed: Option<f64>,

    // === Cost ===
    /// Seconds between casts; attacks use their weapon cooldown instead
    #[serde(default)]
    pub cooldown: f64,
    #[serde(default)]
    pub mana_cost: f64,
}

fn default_range() -> f64 {
    150.0
}

impl AbilityData {
    /// A weapon-driven physical auto attack
    pub fn basic_attack() -> Self {
        AbilityData {
            id: "basic_attack".to_string(),
            name: "Basic Attack".to_string(),
            damage_type: DamageType::Physical,
            weapon_damage_type: WeaponDamageType::MainHand,
            attack_power_ratio: 1.0,
            spell_power_ratio: 0.0,
            max_health_ratio: 0.0,
            missing_health_ratio: 0.0,
            base_value: 0.0,
            health_regen: false,
            passive: false,
            range: default_range(),
            projectile_speed: None,
            cooldown: 0.0,
            mana_cost: 0.0,
        }
    }

    /// Uses weapon damage and therefore weapon cooldowns
    pub fn is_attack(&self) -> bool {
        self.weapon_damage_type != WeaponDamageType::None
    }

    pub fn is_projectile(&self) -> bool {
        self.projectile_speed.is_some_and(|s| s > 0.0)
    }
}
