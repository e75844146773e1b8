//! Core types shared by the combat, attribute and inventory modules

use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};

/// How an ability's output is mitigated, or whether it heals
#[derive(
    Debug,
    Clone,
    Copy,
    Default,
    PartialEq,
    Eq,
    Hash,
    Serialize,
    Deserialize,
    strum::Display,
    strum::EnumString,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case", ascii_case_insensitive)]
pub enum DamageType {
    #[default]
    None,
    Physical,
    Environmental,
    TrueDamage,
    Heal,
}

impl DamageType {
    /// Whether this type reduces health
    pub fn is_damage(&self) -> bool {
        matches!(
            self,
            DamageType::Physical | DamageType::Environmental | DamageType::TrueDamage
        )
    }
}

/// Which weapon(s) contribute rolled damage to an ability
#[derive(
    Debug,
    Clone,
    Copy,
    Default,
    PartialEq,
    Eq,
    Hash,
    Serialize,
    Deserialize,
    strum::Display,
    strum::EnumString,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case", ascii_case_insensitive)]
pub enum WeaponDamageType {
    #[default]
    None,
    MainHand,
    OffHand,
    BothHands,
}

/// Identity of a character in the simulation
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct CharacterId(pub u32);

impl fmt::Display for CharacterId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "char#{}", self.0)
    }
}

static NEXT_ITEM_ID: AtomicU64 = AtomicU64::new(1);

/// Unique identity of a runtime item instance
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ItemId(pub u64);

impl ItemId {
    /// Allocate a process-wide unique id
    pub fn next() -> Self {
        ItemId(NEXT_ITEM_ID.fetch_add(1, Ordering::Relaxed))
    }
}

impl fmt::Display for ItemId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "item#{}", self.0)
    }
}
