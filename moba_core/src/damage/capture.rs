//! Capture tables - which attributes each calculator reads, and from whom

use crate::attribute::Attribute;
use crate::types::DamageType;

/// Which side of an exchange an attribute is read from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CaptureSide {
    Source,
    Target,
}

/// When a capture is read
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CapturePhase {
    /// Frozen into the spec when the ability fires
    Creation,
    /// Read live when the spec lands
    Resolution,
}

/// One attribute a calculator reads
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CaptureDefinition {
    pub attribute: Attribute,
    pub side: CaptureSide,
    /// Read when the spec is created rather than when it resolves
    pub snapshot: bool,
}

impl CaptureDefinition {
    pub fn phase(&self) -> CapturePhase {
        if self.snapshot {
            CapturePhase::Creation
        } else {
            CapturePhase::Resolution
        }
    }
}

const fn source(attribute: Attribute) -> CaptureDefinition {
    CaptureDefinition {
        attribute,
        side: CaptureSide::Source,
        snapshot: true,
    }
}

const fn target(attribute: Attribute) -> CaptureDefinition {
    CaptureDefinition {
        attribute,
        side: CaptureSide::Target,
        snapshot: false,
    }
}

/// Damage reads offense from the attacker at launch and defense from the
/// defender at impact
pub const DAMAGE_CAPTURES: &[CaptureDefinition] = &[
    source(Attribute::AttackPower),
    source(Attribute::SpellPower),
    source(Attribute::CriticalChance),
    source(Attribute::CriticalDamage),
    source(Attribute::MainHandMinDamage),
    source(Attribute::MainHandMaxDamage),
    source(Attribute::OffHandMinDamage),
    source(Attribute::OffHandMaxDamage),
    target(Attribute::Health),
    target(Attribute::MaxHealth),
    target(Attribute::PhysicalDamageReduction),
    target(Attribute::EnvironmentalDamageReduction),
    target(Attribute::FlatDamageReduction),
];

pub const HEALING_CAPTURES: &[CaptureDefinition] = &[
    source(Attribute::AttackPower),
    source(Attribute::SpellPower),
    target(Attribute::HealingModifier),
    target(Attribute::HealthRegen),
];

/// Capture table for a damage type
pub fn captures_for(damage_type: DamageType) -> &'static [CaptureDefinition] {
    match damage_type {
        DamageType::Heal => HEALING_CAPTURES,
        _ => DAMAGE_CAPTURES,
    }
}
