//! Damage and healing formulas
//!
//! Pure functions over two snapshots and an ability. Nothing here mutates
//! attributes; the result is turned into a single Health modifier that the
//! attribute pipeline applies.

use super::ability::AbilityData;
use super::snapshot::AttributeSnapshot;
use crate::attribute::Attribute;
use crate::effect::Modifier;
use crate::types::DamageType;
use serde::{Deserialize, Serialize};

/// Signed health change produced by one resolution
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct CalculationOutput {
    pub damage_type: DamageType,
    /// Negative for damage, positive for healing, zero for no-op
    pub health_delta: f64,
    pub is_heal: bool,
}

impl CalculationOutput {
    pub fn none() -> Self {
        CalculationOutput::default()
    }

    fn from_magnitude(damage_type: DamageType, magnitude: f64) -> Self {
        if magnitude.is_nan() || magnitude <= 0.0 {
            return CalculationOutput {
                damage_type,
                ..CalculationOutput::none()
            };
        }
        let is_heal = damage_type == DamageType::Heal;
        CalculationOutput {
            damage_type,
            health_delta: if is_heal { magnitude } else { -magnitude },
            is_heal,
        }
    }

    pub fn magnitude(&self) -> f64 {
        self.health_delta.abs()
    }

    pub fn is_empty(&self) -> bool {
        self.health_delta == 0.0
    }

    /// The additive Health modifier to apply, if any
    pub fn modifier(&self) -> Option<Modifier> {
        if self.is_empty() {
            None
        } else {
            Some(Modifier::add(Attribute::Health, self.health_delta))
        }
    }
}

/// Resolve an ability with no weapon contribution
pub fn resolve(
    ability: &AbilityData,
    source: &AttributeSnapshot,
    target: &AttributeSnapshot,
) -> CalculationOutput {
    resolve_with_weapon(ability, source, target, 0.0)
}

/// Resolve an ability including pre-rolled weapon damage
pub fn resolve_with_weapon(
    ability: &AbilityData,
    source: &AttributeSnapshot,
    target: &AttributeSnapshot,
    weapon_damage: f64,
) -> CalculationOutput {
    let flat = target.get(Attribute::FlatDamageReduction);
    let magnitude = match ability.damage_type {
        DamageType::None => return CalculationOutput::none(),
        DamageType::Physical => {
            let pdr = target.get(Attribute::PhysicalDamageReduction);
            damage_numerator(ability, source, target, weapon_damage) * (1.0 - pdr) * (1.0 - flat)
        }
        DamageType::Environmental => {
            let edr = target.get(Attribute::EnvironmentalDamageReduction);
            damage_numerator(ability, source, target, weapon_damage) * (1.0 - edr) * (1.0 - flat)
        }
        DamageType::TrueDamage => {
            damage_numerator(ability, source, target, weapon_damage) * (1.0 - flat)
        }
        DamageType::Heal => healing_amount(ability, source, target),
    };
    CalculationOutput::from_magnitude(ability.damage_type, magnitude)
}

/// Pre-mitigation damage
///
/// `Base + APR·AP + SPR·SP + weapon + MHR·MaxHealth + MiHR·(MaxHealth − Health)`
/// where the health terms read the target.
pub fn damage_numerator(
    ability: &AbilityData,
    source: &AttributeSnapshot,
    target: &AttributeSnapshot,
    weapon_damage: f64,
) -> f64 {
    let max_health = target.get(Attribute::MaxHealth);
    let missing = (max_health - target.get(Attribute::Health)).max(0.0);

    ability.base_value
        + ability.attack_power_ratio * source.get(Attribute::AttackPower)
        + ability.spell_power_ratio * source.get(Attribute::SpellPower)
        + weapon_damage
        + ability.max_health_ratio * max_health
        + ability.missing_health_ratio * missing
}

/// Healing before the zero floor
pub fn healing_amount(
    ability: &AbilityData,
    source: &AttributeSnapshot,
    target: &AttributeSnapshot,
) -> f64 {
    let modifier = target.get(Attribute::HealingModifier);
    if ability.health_regen {
        return target.get(Attribute::HealthRegen) / 5.0 * modifier;
    }
    (ability.base_value
        + ability.attack_power_ratio * source.get(Attribute::AttackPower)
        + ability.spell_power_ratio * source.get(Attribute::SpellPower))
        * modifier
}
