//! Attribute model - the fixed catalogue of character stats
//!
//! Every stat a character carries is a variant of [`Attribute`]. Each one has
//! a default base value and a declared valid range; storage in
//! [`AttributeSet`] is a flat array indexed by [`Attribute::index`].

mod range;
mod set;
mod value;

pub use range::{AttributeRange, Bound};
pub use set::{AttributeChanged, AttributeSet, AttributeSetBuilder};
pub use value::{Aggregate, AttributeValue};

use serde::{Deserialize, Serialize};
use strum::{EnumCount, EnumIter, IntoEnumIterator};

/// Broad grouping used for display and iteration
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, strum::Display)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum AttributeCategory {
    Vital,
    Progression,
    Offense,
    Defense,
    Movement,
}

/// A named numeric stat
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    PartialOrd,
    Ord,
    Serialize,
    Deserialize,
    EnumIter,
    EnumCount,
    strum::Display,
    strum::EnumString,
    strum::AsRefStr,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case", ascii_case_insensitive)]
pub enum Attribute {
    // === Vital ===
    Health,
    MaxHealth,
    /// Health restored per 5 seconds
    HealthRegen,
    Mana,
    MaxMana,
    /// Mana restored per 5 seconds
    ManaRegen,
    /// Multiplier on all incoming healing
    HealingModifier,

    // === Progression ===
    Level,
    MaxLevel,
    Experience,
    MaxExperience,

    // === Offense ===
    AttackPower,
    SpellPower,
    /// Attacks per second without a weapon
    AttackSpeed,
    /// Fractional bonus applied on top of weapon attack speed
    BonusAttackSpeed,
    AttackRange,
    CriticalChance,
    CriticalDamage,
    MainHandMinDamage,
    MainHandMaxDamage,
    MainHandAttackSpeed,
    MainHandAttackRange,
    OffHandMinDamage,
    OffHandMaxDamage,
    OffHandAttackSpeed,
    OffHandAttackRange,

    // === Defense ===
    Armor,
    /// Derived from Armor
    PhysicalDamageReduction,
    EnvironmentalResistance,
    /// Derived from EnvironmentalResistance
    EnvironmentalDamageReduction,
    FlatDamageReduction,

    // === Movement ===
    MovementSpeed,
}

impl Attribute {
    /// Storage index into an attribute array
    pub fn index(self) -> usize {
        self as usize
    }

    /// Number of attributes in the catalogue
    pub fn count() -> usize {
        Attribute::COUNT
    }

    /// Iterate every attribute in declaration order
    pub fn all() -> impl Iterator<Item = Attribute> {
        Attribute::iter()
    }

    pub fn category(self) -> AttributeCategory {
        use Attribute::*;
        match self {
            Health | MaxHealth | HealthRegen | Mana | MaxMana | ManaRegen | HealingModifier => {
                AttributeCategory::Vital
            }
            Level | MaxLevel | Experience | MaxExperience => AttributeCategory::Progression,
            Armor
            | PhysicalDamageReduction
            | EnvironmentalResistance
            | EnvironmentalDamageReduction
            | FlatDamageReduction => AttributeCategory::Defense,
            MovementSpeed => AttributeCategory::Movement,
            _ => AttributeCategory::Offense,
        }
    }

    /// Base value a fresh character starts with
    pub fn default_value(self) -> f64 {
        use Attribute::*;
        match self {
            Health | MaxHealth => 500.0,
            HealthRegen => 7.0,
            Mana | MaxMana => 300.0,
            ManaRegen => 7.3,
            HealingModifier => 1.0,
            Level => 1.0,
            MaxLevel => 18.0,
            Experience => 0.0,
            MaxExperience => 280.0,
            AttackPower => 55.0,
            AttackSpeed => 0.7,
            CriticalChance => 0.1,
            CriticalDamage => 2.0,
            AttackRange => 150.0,
            MovementSpeed => 600.0,
            _ => 0.0,
        }
    }

    /// Declared valid range; some bounds are other attributes
    pub fn range(self) -> AttributeRange {
        use Attribute::*;
        match self {
            Health => AttributeRange::up_to(0.0, MaxHealth),
            Mana => AttributeRange::up_to(0.0, MaxMana),
            Level => AttributeRange::up_to(1.0, MaxLevel),
            MaxHealth | MaxLevel => AttributeRange::at_least(1.0),
            HealthRegen | ManaRegen => AttributeRange::between(0.0, 9999.0),
            HealingModifier => AttributeRange::between(0.0, 10.0),
            AttackPower => AttributeRange::between(0.0, 1000.0),
            SpellPower => AttributeRange::between(0.0, 2000.0),
            AttackSpeed | MainHandAttackSpeed | OffHandAttackSpeed => {
                AttributeRange::between(0.0, 2.5)
            }
            BonusAttackSpeed => AttributeRange::between(0.0, 5.0),
            AttackRange | MainHandAttackRange | OffHandAttackRange => {
                AttributeRange::between(0.0, 800.0)
            }
            CriticalChance | FlatDamageReduction => AttributeRange::between(0.0, 1.0),
            PhysicalDamageReduction | EnvironmentalDamageReduction => {
                AttributeRange::between(-1.0, 1.0)
            }
            MovementSpeed => AttributeRange::between(0.0, 2000.0),
            Armor | EnvironmentalResistance => AttributeRange::UNBOUNDED,
            MaxMana | Experience | MaxExperience | CriticalDamage | MainHandMinDamage
            | MainHandMaxDamage | OffHandMinDamage | OffHandMaxDamage => {
                AttributeRange::at_least(0.0)
            }
        }
    }

    /// The derived attribute recomputed whenever this one changes
    pub fn derived(self) -> Option<Attribute> {
        match self {
            Attribute::Armor => Some(Attribute::PhysicalDamageReduction),
            Attribute::EnvironmentalResistance => Some(Attribute::EnvironmentalDamageReduction),
            _ => None,
        }
    }

    /// Attributes whose range is bounded by this one
    pub fn bounds(self) -> Option<Attribute> {
        match self {
            Attribute::MaxHealth => Some(Attribute::Health),
            Attribute::MaxMana => Some(Attribute::Mana),
            Attribute::MaxLevel => Some(Attribute::Level),
            _ => None,
        }
    }
}
