//! CombatResult - outcome of applying a resolved spec

use crate::types::DamageType;
use serde::{Deserialize, Serialize};

/// What one spec did to its target
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CombatResult {
    pub ability_id: String,
    pub damage_type: DamageType,

    // === Amounts ===
    /// Health delta the calculator produced
    pub calculated_delta: f64,
    /// Health delta after clamping
    pub applied_delta: f64,

    // === State Changes ===
    pub health_before: f64,
    pub health_after: f64,

    // === Flags ===
    pub is_heal: bool,
    pub is_killing_blow: bool,
}

impl CombatResult {
    pub fn new() -> Self {
        Self::default()
    }

    /// Damage dealt as a positive number
    pub fn damage_dealt(&self) -> f64 {
        if self.is_heal {
            0.0
        } else {
            -self.applied_delta
        }
    }

    pub fn healing_done(&self) -> f64 {
        if self.is_heal {
            self.applied_delta
        } else {
            0.0
        }
    }

    /// Healing lost to the MaxHealth cap, or damage beyond remaining health
    pub fn overflow(&self) -> f64 {
        (self.calculated_delta - self.applied_delta).abs()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_overkill() {
        let result = CombatResult {
            calculated_delta: -80.0,
            applied_delta: -50.0,
            health_before: 50.0,
            health_after: 0.0,
            is_killing_blow: true,
            ..CombatResult::new()
        };
        assert!((result.damage_dealt() - 50.0).abs() < f64::EPSILON);
        assert!((result.overflow() - 30.0).abs() < f64::EPSILON);
        assert!(result.healing_done().abs() < f64::EPSILON);
    }
}
