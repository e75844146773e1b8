//! Spec resolution - run the calculator and push its output through the pipeline

use super::result::CombatResult;
use crate::attribute::{Attribute, AttributeSet};
use crate::damage::EffectSpec;
use tracing::debug;

/// Resolve a spec against a target and apply the health change
///
/// The calculator reads the target as it is now. A zero output leaves the
/// target untouched and emits no notification.
pub fn resolve_effect(spec: &EffectSpec, target: &mut AttributeSet) -> CombatResult {
    let output = spec.resolve(target);
    let health_before = target.get(Attribute::Health);

    let mut result = CombatResult {
        ability_id: spec.ability.id.clone(),
        damage_type: output.damage_type,
        calculated_delta: output.health_delta,
        is_heal: output.is_heal,
        health_before,
        health_after: health_before,
        ..CombatResult::new()
    };

    let Some(modifier) = output.modifier() else {
        debug!(ability = %spec.ability.id, "resolution produced no output");
        return result;
    };

    let health_after = target.apply_modifier(&modifier, &spec.context);
    result.health_after = health_after;
    result.applied_delta = health_after - health_before;
    result.is_killing_blow = health_before > 0.0 && health_after <= 0.0;

    debug!(
        ability = %spec.ability.id,
        delta = result.applied_delta,
        health = health_after,
        "resolved"
    );
    result
}
