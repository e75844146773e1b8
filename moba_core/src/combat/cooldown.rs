//! Attack cooldown magnitudes

use crate::attribute::{Attribute, AttributeSet};
use crate::config::CombatConstants;
use crate::types::WeaponDamageType;

fn inverse(rate: f64) -> f64 {
    if rate > 0.0 {
        1.0 / rate
    } else {
        0.0
    }
}

/// Unarmed attack: `1 / AttackSpeed`
pub fn basic_attack_cooldown(attributes: &AttributeSet) -> f64 {
    inverse(attributes.get(Attribute::AttackSpeed))
}

/// `1 / (MainHandAttackSpeed × (1 + BonusAttackSpeed))`
pub fn main_hand_cooldown(attributes: &AttributeSet) -> f64 {
    let bonus = 1.0 + attributes.get(Attribute::BonusAttackSpeed);
    inverse(attributes.get(Attribute::MainHandAttackSpeed) * bonus)
}

/// `1 / (OffHandAttackSpeed × (1 + BonusAttackSpeed) × dual_wield_bonus)`
pub fn off_hand_cooldown(attributes: &AttributeSet, dual_wield_bonus: f64) -> f64 {
    let bonus = 1.0 + attributes.get(Attribute::BonusAttackSpeed);
    inverse(attributes.get(Attribute::OffHandAttackSpeed) * bonus * dual_wield_bonus)
}

/// Cooldown for an ability's weapon usage
///
/// Weaponless and both-hands attacks fall back to the unarmed and main-hand
/// rates. A hand with no weapon speed also falls back to the unarmed rate.
pub fn attack_cooldown(
    kind: WeaponDamageType,
    attributes: &AttributeSet,
    constants: &CombatConstants,
) -> f64 {
    let cooldown = match kind {
        WeaponDamageType::None => return basic_attack_cooldown(attributes),
        WeaponDamageType::MainHand | WeaponDamageType::BothHands => main_hand_cooldown(attributes),
        WeaponDamageType::OffHand => off_hand_cooldown(attributes, constants.dual_wield_bonus),
    };
    if cooldown > 0.0 {
        cooldown
    } else {
        basic_attack_cooldown(attributes)
    }
}
