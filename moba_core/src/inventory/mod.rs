//! Inventory and equipment
//!
//! Item classes live in an [`ItemCatalog`]; each character owns a
//! [`Loadout`] holding a fixed-size [`Inventory`] plus equipped slots.
//! Equipped items grant their effects through [`crate::effect::EffectTarget`].

mod error;
mod item;
mod loadout;
mod storage;

pub use error::InventoryError;
pub use item::{
    GrantedEffect, ItemCatalog, ItemDefinition, ItemInstance, ItemKind, SlotType, WeaponStats,
};
pub use loadout::{EquipmentSlotChange, InventorySlotChange, ItemRef, Loadout, LoadoutChanged};
pub use storage::Inventory;
