//! Damage system - ability data, capture tables and the damage/healing formulas

mod ability;
mod calculation;
mod capture;
mod snapshot;
mod spec;

pub use ability::AbilityData;
pub use calculation::{
    damage_numerator, healing_amount, resolve, resolve_with_weapon, CalculationOutput,
};
pub use capture::{
    captures_for, CaptureDefinition, CapturePhase, CaptureSide, DAMAGE_CAPTURES, HEALING_CAPTURES,
};
pub use snapshot::AttributeSnapshot;
pub use spec::{roll_weapon_damage, EffectSpec};
