//! EffectSpec - an ability in flight
//!
//! Created when the ability fires: the source side is snapshotted and weapon
//! damage is rolled then. The target side is captured when the spec resolves.

use super::ability::AbilityData;
use super::calculation::{resolve_with_weapon, CalculationOutput};
use super::capture::{captures_for, CapturePhase, CaptureSide};
use super::snapshot::AttributeSnapshot;
use crate::attribute::{Attribute, AttributeSet};
use crate::effect::EffectContext;
use crate::types::WeaponDamageType;
use rand::Rng;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EffectSpec {
    pub ability: AbilityData,
    pub source: AttributeSnapshot,
    /// Weapon damage rolled at creation
    pub weapon_damage: f64,
    pub context: EffectContext,
}

impl EffectSpec {
    pub fn new(
        ability: &AbilityData,
        source: &AttributeSet,
        context: EffectContext,
        rng: &mut impl Rng,
    ) -> Self {
        let captures = captures_for(ability.damage_type);
        let snapshot =
            AttributeSnapshot::capture(source, CaptureSide::Source, CapturePhase::Creation, captures);
        let weapon_damage = roll_weapon_damage(ability.weapon_damage_type, &snapshot, rng);
        EffectSpec {
            ability: ability.clone(),
            source: snapshot,
            weapon_damage,
            context: context.with_ability(ability.id.clone()),
        }
    }

    /// Capture the target now and compute the output
    pub fn resolve(&self, target: &AttributeSet) -> CalculationOutput {
        let captures = captures_for(self.ability.damage_type);
        let target_snapshot =
            AttributeSnapshot::capture(target, CaptureSide::Target, CapturePhase::Resolution, captures);
        resolve_with_weapon(&self.ability, &self.source, &target_snapshot, self.weapon_damage)
    }
}

/// Roll weapon damage from a source snapshot
pub fn roll_weapon_damage(
    kind: WeaponDamageType,
    source: &AttributeSnapshot,
    rng: &mut impl Rng,
) -> f64 {
    let main = || {
        (
            source.get(Attribute::MainHandMinDamage),
            source.get(Attribute::MainHandMaxDamage),
        )
    };
    let off = || {
        (
            source.get(Attribute::OffHandMinDamage),
            source.get(Attribute::OffHandMaxDamage),
        )
    };
    match kind {
        WeaponDamageType::None => 0.0,
        WeaponDamageType::MainHand => roll(main(), rng),
        WeaponDamageType::OffHand => roll(off(), rng),
        WeaponDamageType::BothHands => roll(main(), rng) + roll(off(), rng),
    }
}

fn roll((min, max): (f64, f64), rng: &mut impl Rng) -> f64 {
    if max > min {
        rng.gen_range(min..=max)
    } else {
        min.max(0.0)
    }
}
