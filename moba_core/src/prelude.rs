//! Prelude module for convenient imports
//!
//! ```rust
//! use moba_core::prelude::*;
//! ```

// Core types
pub use crate::attribute::{Attribute, AttributeChanged, AttributeSet};
pub use crate::character::Character;
pub use crate::types::{CharacterId, DamageType, ItemId, WeaponDamageType};

// Effects
pub use crate::effect::{EffectContext, EffectDefinition, EffectTarget, GrantSource, Modifier, ModifierOp};

// Damage system
pub use crate::damage::{AbilityData, CalculationOutput, EffectSpec};

// Combat
pub use crate::combat::{attack_cooldown, resolve_effect, CombatResult};

// Inventory
pub use crate::inventory::{InventoryError, ItemCatalog, ItemInstance, Loadout, LoadoutChanged, SlotType};

// Tasks
pub use crate::task::{TaskEvent, TaskSet, WaitInRange};

// Config
pub use crate::config::{ContentPack, GameConstants, LevelTable};
