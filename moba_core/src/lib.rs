//! moba_core - Attribute, combat and equipment core for MOBA characters
//!
//! This library provides:
//! - AttributeSet: Per-character attributes behind a single mutation pipeline
//! - EffectSpec: Abilities in flight, snapshotted at cast time
//! - Damage/Healing: Mitigation formulas resolved against the live target
//! - Loadout: Inventory and equipment with atomic, validated operations
//! - TaskSet: Deferred range and projectile waits for abilities

pub mod attribute;
pub mod character;
pub mod combat;
pub mod config;
pub mod damage;
pub mod defense;
pub mod effect;
pub mod events;
pub mod inventory;
pub mod prelude;
pub mod task;
pub mod types;

// Re-export core types for convenience
pub use attribute::{Attribute, AttributeChanged, AttributeSet};
pub use character::Character;
pub use combat::CombatResult;
pub use config::{default_abilities, default_effects, default_items, default_levels, ContentPack};
pub use damage::{AbilityData, EffectSpec};
pub use effect::{EffectContext, EffectTarget, Modifier};
pub use inventory::{InventoryError, Loadout, SlotType};
pub use types::{CharacterId, DamageType, ItemId, WeaponDamageType};
