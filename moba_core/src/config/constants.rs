//! Game constants configuration

use serde::{Deserialize, Serialize};

/// Tunable game constants
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct GameConstants {
    #[serde(default)]
    pub inventory: InventoryConstants,
    #[serde(default)]
    pub combat: CombatConstants,
}

impl GameConstants {
    /// Load from the bundled constants file
    pub fn bundled() -> Self {
        let toml = include_str!("../../config/constants.toml");
        super::parse_toml(toml).unwrap_or_else(|e| {
            tracing::warn!("bundled constants failed to parse: {}", e);
            GameConstants::default()
        })
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InventoryConstants {
    /// Inventory slots per character
    #[serde(default = "default_capacity")]
    pub capacity: usize,
}

impl Default for InventoryConstants {
    fn default() -> Self {
        InventoryConstants {
            capacity: default_capacity(),
        }
    }
}

fn default_capacity() -> usize {
    6
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CombatConstants {
    /// Off-hand attack rate multiplier
    #[serde(default = "default_dual_wield_bonus")]
    pub dual_wield_bonus: f64,
    /// Seconds per HealthRegen period (HealthRegen is per 5 seconds)
    #[serde(default = "default_regen_period")]
    pub regen_period: f64,
}

impl Default for CombatConstants {
    fn default() -> Self {
        CombatConstants {
            dual_wield_bonus: default_dual_wield_bonus(),
            regen_period: default_regen_period(),
        }
    }
}

fn default_dual_wield_bonus() -> f64 {
    1.15
}
fn default_regen_period() -> f64 {
    5.0
}
